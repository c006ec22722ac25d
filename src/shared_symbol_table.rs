use crate::result::illegal_operation;
use crate::{IonResult, SymbolId};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Stores [`SharedSymbolTable`] with the table name, version and symbols.
/// For more information on [`SharedSymbolTable`], see:
/// <https://amazon-ion.github.io/ion-docs/docs/symbols.html#shared-symbol-tables>
///
/// A `None` entry in `symbols` occupies a symbol ID but has no text.
pub struct SharedSymbolTable {
    name: String,
    version: usize,
    symbols: Vec<Option<String>>,
}

impl SharedSymbolTable {
    pub fn new(name: String, version: usize, symbols: Vec<Option<String>>) -> IonResult<Self> {
        // As per Ion Specification, the name field should be a string with length at least one.
        // If the field has any other value, then materialization of this symbol table must fail.
        if name.is_empty() {
            return illegal_operation("shared symbol table with empty name is not allowed");
        }
        if version < 1 {
            return illegal_operation(format!(
                "shared symbol table '{name}' must have a version of at least 1"
            ));
        }

        Ok(Self {
            name,
            version,
            symbols,
        })
    }

    /// Returns the version of this [`SharedSymbolTable`]
    pub fn version(&self) -> usize {
        self.version
    }

    /// Returns the name of this [`SharedSymbolTable`]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the symbols defined in this [`SharedSymbolTable`]
    pub fn symbols(&self) -> &[Option<String>] {
        &self.symbols
    }

    /// The number of symbol IDs this table defines. Its IDs are numbered `1` through `max_id`.
    pub fn max_id(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the text of the symbol with the given table-relative ID. IDs start at `1`.
    /// Returns `None` if the ID is out of range or the slot has no text.
    pub fn text_for(&self, local_sid: SymbolId) -> Option<&str> {
        let index = local_sid.checked_sub(1)?;
        self.symbols.get(index)?.as_deref()
    }
}
