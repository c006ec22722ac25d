use crate::types::SymbolId;
use thiserror::Error;

/// Raised when a symbol ID falls inside the active symbol table's range but the table has no
/// text for it. This happens when a shared table import could not be matched exactly, or when a
/// local `symbols` list declared a non-string entry.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("symbol ID ${sid} is in range but its text is unknown")]
pub struct UnknownSymbolTextError {
    sid: SymbolId,
}

impl UnknownSymbolTextError {
    pub(crate) fn new(sid: SymbolId) -> Self {
        UnknownSymbolTextError { sid }
    }

    pub fn sid(&self) -> SymbolId {
        self.sid
    }
}
