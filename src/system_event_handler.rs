use crate::SymbolTable;

/// Functions that will be called when the reader handles system-level events that would otherwise
/// not be surfaced to the user level.
pub trait SystemEventHandler {
    /// Invoked when the cursor encounters an Ion Version Marker. The in-scope symbol table has
    /// already been reset to the system table.
    fn on_ivm(&mut self, _ion_version: (u8, u8)) {}
    /// Invoked when new symbols are added to the end of the existing table. `_starting_id` is
    /// the ID of the first new symbol.
    fn on_symbol_table_append<'a>(
        &'a mut self,
        _symbol_table: &'a SymbolTable,
        _starting_id: usize,
    ) {
    }
    /// Invoked when a local symbol table replaces the active symbol table.
    fn on_symbol_table_reset<'a>(&'a mut self, _symbol_table: &'a SymbolTable) {}
}
