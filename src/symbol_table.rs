use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::imports::LocalSymbolTableImports;
use crate::result::{decoding_error, unknown_symbol_text_raw};
use crate::{IonResult, SymbolId};

/// The largest symbol ID a table may define. Import chains and local symbols that would
/// extend a table beyond it are rejected.
pub const MAX_SYMBOL_ID: SymbolId = u32::MAX as SymbolId;

/// Stores mappings from Symbol IDs to text and vice-versa.
///
/// IDs `0` through [`first_local_id`](Self::first_local_id)` - 1` belong to the import chain
/// (the system symbols and any shared tables). IDs from `first_local_id` through
/// [`max_id`](Self::max_id) were declared by the stream's local symbol tables.
// SymbolTable instances always have at least system symbols; they are never empty.
#[allow(clippy::len_without_is_empty)]
#[derive(Clone)]
pub struct SymbolTable {
    imports: LocalSymbolTableImports,
    local_symbols: Vec<Option<Arc<str>>>,
    ids_by_text: FxHashMap<Arc<str>, SymbolId>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::system_only()
    }
}

impl SymbolTable {
    const INITIAL_SYMBOLS_CAPACITY: usize = 32;

    /// Constructs a table with the provided imports and no local symbols.
    pub fn new(imports: LocalSymbolTableImports) -> SymbolTable {
        SymbolTable {
            imports,
            local_symbols: Vec::with_capacity(Self::INITIAL_SYMBOLS_CAPACITY),
            ids_by_text: FxHashMap::default(),
        }
    }

    /// The table that is in effect at the beginning of a stream and after every Ion Version
    /// Marker.
    pub fn system_only() -> SymbolTable {
        Self::new(LocalSymbolTableImports::system())
    }

    pub fn imports(&self) -> &LocalSymbolTableImports {
        &self.imports
    }

    /// The ID that will be (or was) assigned to the first local symbol.
    pub fn first_local_id(&self) -> SymbolId {
        self.imports.max_id() + 1
    }

    /// The highest symbol ID that can be used with this table.
    pub fn max_id(&self) -> SymbolId {
        self.imports.max_id() + self.local_symbols.len()
    }

    /// Returns the number of symbol IDs defined by the table, including `$0`.
    pub fn len(&self) -> usize {
        self.max_id() + 1
    }

    /// Returns `Ok(Some(text))` if `sid` has known text and `Ok(None)` if it is in range but
    /// textless. A `sid` beyond [`max_id`](Self::max_id) is a decoding error.
    pub fn resolve(&self, sid: SymbolId) -> IonResult<Option<&str>> {
        if sid > self.max_id() {
            return decoding_error(format!(
                "symbol ID ${sid} exceeds the symbol table's max ID (${})",
                self.max_id()
            ));
        }
        let first_local_id = self.first_local_id();
        if sid < first_local_id {
            return Ok(self.imports.text_for(sid).flatten());
        }
        Ok(self.local_symbols[sid - first_local_id].as_deref())
    }

    /// Like [`resolve`](Self::resolve), but a symbol with unknown text is an
    /// [`UnknownSymbolText`](crate::IonError::UnknownSymbolText) error.
    pub fn resolve_symbol(&self, sid: SymbolId) -> IonResult<&str> {
        self.resolve(sid)?
            .ok_or_else(|| unknown_symbol_text_raw(sid))
    }

    /// If defined, returns the lowest Symbol ID associated with the provided text.
    pub fn sid_for<A: AsRef<str>>(&self, text: A) -> Option<SymbolId> {
        let text = text.as_ref();
        self.imports
            .sid_for(text)
            .or_else(|| self.ids_by_text.get(text).copied())
    }

    /// Returns `true` if `sid` is in the range `0..=max_id`. A valid ID may still have unknown
    /// text.
    pub fn sid_is_valid(&self, sid: SymbolId) -> bool {
        sid <= self.max_id()
    }

    /// Returns an iterator over the text of the locally declared symbols in ID order.
    pub fn local_symbols(&self) -> impl Iterator<Item = Option<&str>> {
        self.local_symbols.iter().map(|s| s.as_deref())
    }

    /// Assigns the next available IDs to `symbols` and returns the ID given to the first one.
    /// A `None` entry occupies an ID with unknown text.
    ///
    /// If the new symbols would push the table past [`MAX_SYMBOL_ID`], returns a decoding error
    /// and leaves the table unchanged.
    pub fn append_symbols<I>(&mut self, symbols: I) -> IonResult<SymbolId>
    where
        I: IntoIterator<Item = Option<String>>,
        I::IntoIter: ExactSizeIterator,
    {
        let symbols = symbols.into_iter();
        let first_new_id = self.max_id() + 1;
        match self.max_id().checked_add(symbols.len()) {
            Some(max_id) if max_id <= MAX_SYMBOL_ID => {}
            _ => {
                return decoding_error(format!(
                    "appending {} symbols to a table with max ID ${} exceeds the largest \
                     supported symbol ID (${MAX_SYMBOL_ID})",
                    symbols.len(),
                    self.max_id()
                ))
            }
        }
        for maybe_text in symbols {
            let sid = self.max_id() + 1;
            let symbol: Option<Arc<str>> = maybe_text.map(Arc::from);
            if let Some(text) = &symbol {
                self.ids_by_text.entry(Arc::clone(text)).or_insert(sid);
            }
            self.local_symbols.push(symbol);
        }
        Ok(first_new_id)
    }
}

impl Debug for SymbolTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SymbolTable {{ imports: {}, first_local_id: {}, ",
            self.imports.imports().len(),
            self.first_local_id()
        )?;
        for (index, text) in self.local_symbols().enumerate() {
            write!(f, "{}: {:?}, ", self.first_local_id() + index, text)?;
        }
        write!(f, "}}")
    }
}
