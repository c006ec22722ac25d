use std::borrow::Cow;
use thiserror::Error;

/// Describes a malformed-stream condition: an invalid type descriptor, a length that overruns
/// its parent container, a symbol ID beyond the active table's max ID, etc.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{description}")]
pub struct DecodingError {
    description: Cow<'static, str>,
}

impl DecodingError {
    pub(crate) fn new(description: impl Into<Cow<'static, str>>) -> Self {
        DecodingError {
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        self.description.as_ref()
    }
}
