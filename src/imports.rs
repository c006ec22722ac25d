//! The import chain of a local symbol table: the system symbol table followed by zero or more
//! shared symbol tables fetched from a [`Catalog`].

use crate::catalog::Catalog;
use crate::constants::v1_0;
use crate::result::decoding_error;
use crate::shared_symbol_table::SharedSymbolTable;
use crate::symbol_table::MAX_SYMBOL_ID;
use crate::{IonResult, SymbolId};

/// An entry in the `imports` list of a local symbol table, as it appeared in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDescriptor {
    name: String,
    version: usize,
    max_id: Option<usize>,
}

impl ImportDescriptor {
    pub fn new<A: Into<String>>(name: A, version: usize, max_id: Option<usize>) -> Self {
        Self {
            name: name.into(),
            version,
            max_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> usize {
        self.version
    }

    pub fn max_id(&self) -> Option<usize> {
        self.max_id
    }
}

/// A shared symbol table that has been imported into a local symbol table.
///
/// When the catalog could not supply the exact table that was requested (the version was
/// missing, the declared `max_id` differed, or no table by that name existed) the import still
/// occupies `max_id` symbol IDs, but only the IDs covered by the closest available table have
/// text. The rest resolve to unknown text.
#[derive(Debug, Clone)]
pub struct SymbolTableImport {
    name: String,
    version: usize,
    max_id: usize,
    table: Option<SharedSymbolTable>,
    is_exact: bool,
}

impl SymbolTableImport {
    pub(crate) fn new<A: Into<String>>(
        name: A,
        version: usize,
        max_id: usize,
        table: Option<SharedSymbolTable>,
        is_exact: bool,
    ) -> Self {
        SymbolTableImport {
            name: name.into(),
            version,
            max_id,
            table,
            is_exact,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version that was requested, which may differ from the version the catalog supplied.
    pub fn version(&self) -> usize {
        self.version
    }

    /// The number of symbol IDs this import occupies.
    pub fn max_id(&self) -> usize {
        self.max_id
    }

    /// Returns `true` if the catalog supplied a table with the requested version and `max_id`.
    pub fn is_exact(&self) -> bool {
        self.is_exact
    }

    // `local_sid` is in `1..=max_id`
    fn text_for(&self, local_sid: SymbolId) -> Option<&str> {
        self.table.as_ref()?.text_for(local_sid)
    }

    fn sid_for(&self, text: &str) -> Option<SymbolId> {
        let table = self.table.as_ref()?;
        table
            .symbols()
            .iter()
            .take(self.max_id)
            .position(|symbol| symbol.as_deref() == Some(text))
            .map(|index| index + 1)
    }
}

/// The resolved import chain of a local symbol table. The Ion 1.0 system symbol table is always
/// the implicit first import, so symbol IDs `1` through `9` are never reassigned.
#[derive(Debug, Clone)]
pub struct LocalSymbolTableImports {
    imports: Vec<SymbolTableImport>,
    max_id: usize,
}

impl LocalSymbolTableImports {
    /// An import chain containing only the system symbol table.
    pub fn system() -> Self {
        Self {
            imports: Vec::new(),
            max_id: v1_0::SYSTEM_MAX_ID,
        }
    }

    /// Looks up each descriptor in `catalog` and lays the resulting tables out after the system
    /// symbols in declaration order.
    pub fn resolve_imports(
        catalog: &dyn Catalog,
        descriptors: &[ImportDescriptor],
    ) -> IonResult<Self> {
        let mut resolved = Self::system();
        resolved.imports.reserve(descriptors.len());
        for descriptor in descriptors {
            let import =
                catalog.resolve(descriptor.name(), descriptor.version(), descriptor.max_id())?;
            resolved.max_id = match resolved.max_id.checked_add(import.max_id()) {
                Some(max_id) if max_id <= MAX_SYMBOL_ID => max_id,
                _ => {
                    return decoding_error(format!(
                        "importing '{}' would exceed the largest supported symbol ID \
                         (${MAX_SYMBOL_ID})",
                        import.name()
                    ))
                }
            };
            resolved.imports.push(import);
        }
        Ok(resolved)
    }

    /// The highest symbol ID covered by the system table and every import.
    pub fn max_id(&self) -> usize {
        self.max_id
    }

    /// The shared tables imported after the system table.
    pub fn imports(&self) -> &[SymbolTableImport] {
        &self.imports
    }

    /// Returns `None` if `sid` is beyond [`max_id`](Self::max_id), `Some(None)` if it is in
    /// range but has no known text, and `Some(Some(text))` otherwise.
    pub fn text_for(&self, sid: SymbolId) -> Option<Option<&str>> {
        if sid > self.max_id {
            return None;
        }
        if sid == 0 {
            return Some(None);
        }
        if sid <= v1_0::SYSTEM_MAX_ID {
            return Some(v1_0::SYSTEM_SYMBOLS.get(sid - 1).copied());
        }
        let mut offset = v1_0::SYSTEM_MAX_ID;
        for import in &self.imports {
            if sid <= offset + import.max_id() {
                return Some(import.text_for(sid - offset));
            }
            offset += import.max_id();
        }
        Some(None)
    }

    /// Returns the lowest symbol ID in the import chain whose text is `text`.
    pub fn sid_for(&self, text: &str) -> Option<SymbolId> {
        if let Some(sid) = v1_0::SYSTEM_SYMBOL_TEXT_TO_ID.get(text) {
            return Some(*sid);
        }
        let mut offset = v1_0::SYSTEM_MAX_ID;
        for import in &self.imports {
            if let Some(local_sid) = import.sid_for(text) {
                return Some(offset + local_sid);
            }
            offset += import.max_id();
        }
        None
    }
}

impl Default for LocalSymbolTableImports {
    fn default() -> Self {
        Self::system()
    }
}
