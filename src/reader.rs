use std::io::Read;
use std::mem;

use bigdecimal::BigDecimal;
use delegate::delegate;
use tracing::debug;

use crate::binary::cursor::{AnnotationIds, Event, Marker};
use crate::binary::scalar_reader::ScalarReader;
use crate::catalog::Catalog;
use crate::constants::v1_0::system_symbol_ids;
use crate::imports::{ImportDescriptor, LocalSymbolTableImports};
use crate::read_config::ReadConfig;
use crate::result::{decoding_error, illegal_operation, incomplete_error, IonResult};
use crate::symbol_table::SymbolTable;
use crate::system_event_handler::SystemEventHandler;
use crate::types::{Decimal, Int, IntegerSize, IonType, SymbolId, Timestamp};

/// Where the reader is in the stream's system-level structure.
///
/// Every state other than `ReadingValue` is inside a local symbol table. Each one can be resumed
/// after the wrapped reader reports [Event::NeedsData].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SymbolTableState {
    /// Passing user values through to the caller.
    ReadingValue,
    /// On a top-level `$ion_symbol_table::{...}` struct that has not been stepped into.
    OnSymbolTableStruct,
    /// Inside the symbol table struct, looking for the next field.
    OnSymbolTableField,
    /// On the `symbols` list.
    OnSymbols,
    /// Inside the `symbols` list.
    ReadingSymbolsList,
    /// On the `imports` list.
    OnImports,
    /// Inside the `imports` list.
    ReadingImportsList,
    /// Inside one of the structs in the `imports` list.
    ReadingImportStruct,
}

/// The fields of an import struct that have been read so far.
#[derive(Debug, Default)]
struct PendingImport {
    name: Option<String>,
    version: Option<i64>,
    max_id: Option<usize>,
}

impl PendingImport {
    /// Applies the defaults for missing or out-of-range fields. Imports without a usable name
    /// are dropped.
    fn into_descriptor(self) -> Option<ImportDescriptor> {
        let name = self.name.filter(|name| !name.is_empty() && name != "$ion")?;
        let version = match self.version {
            Some(version) if version >= 1 => version as usize,
            _ => 1,
        };
        Some(ImportDescriptor::new(name, version, self.max_id))
    }
}

/// Everything read from a local symbol table that has not been committed yet.
#[derive(Debug, Default)]
struct PendingSymbolTable {
    saw_symbols: bool,
    saw_imports: bool,
    // `None` means the new symbols are appended to the current table.
    imports: Option<Vec<ImportDescriptor>>,
    symbols: Vec<Option<String>>,
    import: PendingImport,
}

/// A streaming binary Ion reader that interprets local symbol tables and Ion version markers
/// and resolves symbol IDs into the appropriate text.
///
/// Local symbol tables are consumed by [advance](Self::advance) and never surfaced. Reading one
/// can be interrupted by [Event::NeedsData] at any point; the table only takes effect once its
/// closing byte has been read.
pub struct Reader {
    reader: ScalarReader,
    symbol_table: SymbolTable,
    config: ReadConfig,
    state: SymbolTableState,
    pending: PendingSymbolTable,
}

impl Reader {
    /// Constructs a reader over `data` that resolves imports against an empty catalog.
    pub fn new(data: Vec<u8>) -> Reader {
        Reader::with_config(ReadConfig::new(), data)
    }

    pub(crate) fn with_config(config: ReadConfig, data: Vec<u8>) -> Reader {
        Reader {
            reader: ScalarReader::new(data),
            symbol_table: SymbolTable::system_only(),
            config,
            state: SymbolTableState::ReadingValue,
            pending: PendingSymbolTable::default(),
        }
    }

    /// Advances to the next user-level event, processing any system-level directives
    /// encountered along the way.
    pub fn advance(&mut self) -> IonResult<Event> {
        use SymbolTableState::*;
        loop {
            match self.state {
                ReadingValue => {
                    let event = self.reader.advance()?;
                    self.process_version_markers();
                    if event == Event::StartContainer && self.is_on_symbol_table() {
                        self.pending = PendingSymbolTable::default();
                        self.state = OnSymbolTableStruct;
                        continue;
                    }
                    return Ok(event);
                }
                OnSymbolTableStruct => {
                    self.reader.step_into_container()?;
                    self.state = OnSymbolTableField;
                }
                OnSymbolTableField => match self.reader.advance()? {
                    Event::NeedsData => return Ok(Event::NeedsData),
                    Event::EndContainer => {
                        self.commit_symbol_table()?;
                        self.state = ReadingValue;
                        self.reader.step_out_of_container()?;
                    }
                    event => self.on_symbol_table_field(event)?,
                },
                OnSymbols => {
                    self.reader.step_into_container()?;
                    self.state = ReadingSymbolsList;
                }
                ReadingSymbolsList => match self.reader.advance()? {
                    Event::NeedsData => return Ok(Event::NeedsData),
                    Event::EndContainer => {
                        self.state = OnSymbolTableField;
                        self.reader.step_out_of_container()?;
                    }
                    _ => {
                        let text = match self.reader.current_type() {
                            Some(IonType::String) if !self.reader.is_null() => {
                                Some(self.reader.read_str()?.to_owned())
                            }
                            // Anything else occupies a symbol ID without text
                            _ => None,
                        };
                        self.pending.symbols.push(text);
                    }
                },
                OnImports => {
                    self.reader.step_into_container()?;
                    self.state = ReadingImportsList;
                }
                ReadingImportsList => match self.reader.advance()? {
                    Event::NeedsData => return Ok(Event::NeedsData),
                    Event::EndContainer => {
                        self.state = OnSymbolTableField;
                        self.reader.step_out_of_container()?;
                    }
                    Event::StartContainer if self.reader.current_type() == Some(IonType::Struct) => {
                        self.pending.import = PendingImport::default();
                        self.reader.step_into_container()?;
                        self.state = ReadingImportStruct;
                    }
                    // Non-struct entries are ignored
                    _ => {}
                },
                ReadingImportStruct => match self.reader.advance()? {
                    Event::NeedsData => return Ok(Event::NeedsData),
                    Event::EndContainer => {
                        let import = mem::take(&mut self.pending.import);
                        if let Some(descriptor) = import.into_descriptor() {
                            self.pending
                                .imports
                                .get_or_insert_with(Vec::new)
                                .push(descriptor);
                        }
                        self.state = ReadingImportsList;
                        self.reader.step_out_of_container()?;
                    }
                    _ => self.on_import_field()?,
                },
            }
        }
    }

    fn is_on_symbol_table(&self) -> bool {
        self.reader.depth() == 0
            && self.reader.current_type() == Some(IonType::Struct)
            && self.reader.annotation_ids().next() == Some(system_symbol_ids::ION_SYMBOL_TABLE)
    }

    fn on_symbol_table_field(&mut self, event: Event) -> IonResult<()> {
        let is_container = event == Event::StartContainer;
        let ion_type = self.reader.current_type();
        match self.reader.field_id() {
            Some(system_symbol_ids::SYMBOLS) => {
                if mem::replace(&mut self.pending.saw_symbols, true) {
                    return decoding_error("found a local symbol table with two 'symbols' fields");
                }
                if is_container && ion_type == Some(IonType::List) {
                    self.state = SymbolTableState::OnSymbols;
                }
            }
            Some(system_symbol_ids::IMPORTS) => {
                if mem::replace(&mut self.pending.saw_imports, true) {
                    return decoding_error("found a local symbol table with two 'imports' fields");
                }
                if is_container && ion_type == Some(IonType::List) {
                    // Even an empty list replaces the current table.
                    self.pending.imports = Some(Vec::new());
                    self.state = SymbolTableState::OnImports;
                }
                // `imports: $ion_symbol_table` (or any other non-list value) leaves
                // `pending.imports` as `None`, which appends.
            }
            // Other fields are skipped by the next call to `advance`.
            _ => {}
        }
        Ok(())
    }

    fn on_import_field(&mut self) -> IonResult<()> {
        if self.reader.is_null() {
            return Ok(());
        }
        let ion_type = self.reader.current_type();
        match (self.reader.field_id(), ion_type) {
            (Some(system_symbol_ids::NAME), Some(IonType::String)) => {
                self.pending.import.name = Some(self.reader.read_str()?.to_owned());
            }
            (Some(system_symbol_ids::VERSION), Some(IonType::Int)) => {
                // Versions that overflow an i64 fall back to 1 like any other invalid version.
                self.pending.import.version = Some(self.reader.read_int()?.as_i64().unwrap_or(0));
            }
            (Some(system_symbol_ids::MAX_ID), Some(IonType::Int)) => {
                let max_id = self.reader.read_int()?;
                if max_id.is_negative() {
                    return decoding_error(format!("found an import with a max_id of {max_id}"));
                }
                let max_id = max_id
                    .as_i64()
                    .and_then(|max_id| usize::try_from(max_id).ok());
                match max_id {
                    Some(max_id) => self.pending.import.max_id = Some(max_id),
                    None => return decoding_error("found an import with an oversized max_id"),
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn commit_symbol_table(&mut self) -> IonResult<()> {
        let PendingSymbolTable {
            imports, symbols, ..
        } = mem::take(&mut self.pending);
        let num_symbols = symbols.len();
        match imports {
            None => {
                let starting_id = self.symbol_table.append_symbols(symbols)?;
                debug!(
                    num_symbols,
                    starting_id,
                    max_id = self.symbol_table.max_id(),
                    "appended to the local symbol table"
                );
                self.invoke_on_append_handler(starting_id);
            }
            Some(descriptors) => {
                let imports =
                    LocalSymbolTableImports::resolve_imports(self.config.catalog(), &descriptors)?;
                let mut symbol_table = SymbolTable::new(imports);
                symbol_table.append_symbols(symbols)?;
                debug!(
                    num_imports = descriptors.len(),
                    num_symbols,
                    max_id = symbol_table.max_id(),
                    "replaced the local symbol table"
                );
                self.symbol_table = symbol_table;
                self.invoke_on_symbol_table_reset_handler();
            }
        }
        Ok(())
    }

    fn process_version_markers(&mut self) {
        for ion_version in self.reader.take_ivms() {
            self.symbol_table = SymbolTable::system_only();
            self.invoke_on_ivm_handler(ion_version);
            self.invoke_on_symbol_table_reset_handler();
        }
    }

    fn invoke_on_ivm_handler(&mut self, ion_version: (u8, u8)) {
        if let Some(handler) = self.config.event_handler.as_mut() {
            handler.on_ivm(ion_version);
        }
    }

    fn invoke_on_symbol_table_reset_handler(&mut self) {
        // Temporarily break apart 'self' to get simultaneous references to the symbol table
        // and the system event handler.
        let Reader {
            config,
            symbol_table,
            ..
        } = self;
        if let Some(handler) = config.event_handler.as_mut() {
            handler.on_symbol_table_reset(symbol_table);
        }
    }

    fn invoke_on_append_handler(&mut self, starting_id: SymbolId) {
        let Reader {
            config,
            symbol_table,
            ..
        } = self;
        if let Some(handler) = config.event_handler.as_mut() {
            handler.on_symbol_table_append(symbol_table, starting_id);
        }
    }

    fn is_reading_symbol_table(&self) -> bool {
        self.state != SymbolTableState::ReadingValue
    }

    /// The number of containers the caller has stepped into. A local symbol table that has only
    /// been partly read does not count.
    pub fn depth(&self) -> usize {
        if self.is_reading_symbol_table() {
            0
        } else {
            self.reader.depth()
        }
    }

    /// The byte range of the innermost container the caller has stepped into.
    pub fn container_marker(&self) -> Option<&Marker> {
        if self.is_reading_symbol_table() {
            None
        } else {
            self.reader.container_marker()
        }
    }

    pub fn step_into_container(&mut self) -> IonResult<Event> {
        if self.is_reading_symbol_table() {
            return illegal_operation(
                "step_into_container requires the reader to be on a container",
            );
        }
        self.reader.step_into_container()
    }

    pub fn step_out_of_container(&mut self) -> IonResult<Event> {
        if self.is_reading_symbol_table() {
            return illegal_operation("cannot step out of the top level");
        }
        self.reader.step_out_of_container()
    }

    /// The symbol table currently in scope.
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.config.catalog()
    }

    pub fn resolve_symbol(&self, sid: SymbolId) -> IonResult<&str> {
        self.symbol_table.resolve_symbol(sid)
    }

    /// Returns the text of the current value's field name, or `None` outside of a struct.
    pub fn field_name(&self) -> IonResult<Option<&str>> {
        match self.reader.field_id() {
            Some(sid) => self.symbol_table.resolve_symbol(sid).map(Some),
            None => Ok(None),
        }
    }

    /// Resolves each of the current value's annotations.
    pub fn annotations(&self) -> impl Iterator<Item = IonResult<&str>> + '_ {
        self.reader
            .annotation_ids()
            .map(move |sid| self.symbol_table.resolve_symbol(sid))
    }

    /// Reads the current symbol value and resolves its text.
    pub fn read_symbol(&self) -> IonResult<&str> {
        let sid = self.reader.read_symbol_id()?;
        self.symbol_table.resolve_symbol(sid)
    }

    /// Reports whether the stream ended cleanly. Call this once [advance](Self::advance) has
    /// returned [Event::NeedsData] and no more input is coming; an unfinished value, container
    /// or local symbol table is an [IonError::Incomplete](crate::IonError::Incomplete) error.
    pub fn finish(&self) -> IonResult<()> {
        let position = self.reader.bytes_consumed();
        if self.state != SymbolTableState::ReadingValue {
            return incomplete_error("a local symbol table", position);
        }
        if self.reader.depth() > 0 {
            return incomplete_error("a container", position);
        }
        if self.reader.has_unfinished_input() {
            return incomplete_error("a value", position);
        }
        Ok(())
    }

    // The Reader needs to expose many of the same functions as the ScalarReader, but only some
    // of those need to be re-defined to allow for system value processing. Any method listed
    // here will be delegated to self.reader directly.
    delegate! {
        to self.reader {
            pub fn fill_value(&mut self) -> IonResult<Event>;
            pub fn current_type(&self) -> Option<IonType>;
            pub fn is_null(&self) -> bool;
            pub fn field_id(&self) -> Option<SymbolId>;
            pub fn annotation_ids(&self) -> AnnotationIds<'_>;
            pub fn has_annotations(&self) -> bool;
            pub fn value_marker(&self) -> Option<&Marker>;
            pub fn annotation_marker(&self) -> Option<&Marker>;
            pub fn last_event(&self) -> Event;
            pub fn ion_version(&self) -> (u8, u8);
            pub fn append_bytes(&mut self, bytes: &[u8]);
            pub fn read_from<R: Read>(&mut self, source: R, length: usize) -> IonResult<usize>;
            pub fn bytes_consumed(&self) -> usize;
            pub fn bytes_available(&self) -> usize;
            pub fn raw_value_bytes(&self) -> Option<&[u8]>;
            pub fn raw_header_bytes(&self) -> Option<&[u8]>;
            pub fn raw_field_id_bytes(&self) -> Option<&[u8]>;
            pub fn raw_annotations_bytes(&self) -> Option<&[u8]>;

            pub fn read_null(&self) -> IonResult<IonType>;
            pub fn read_bool(&self) -> IonResult<bool>;
            pub fn read_int(&self) -> IonResult<Int>;
            pub fn read_i64(&self) -> IonResult<i64>;
            pub fn integer_size(&self) -> IonResult<IntegerSize>;
            pub fn read_f32(&self) -> IonResult<f32>;
            pub fn read_f64(&self) -> IonResult<f64>;
            pub fn read_decimal(&self) -> IonResult<Decimal>;
            pub fn read_big_decimal(&self) -> IonResult<BigDecimal>;
            pub fn read_timestamp(&self) -> IonResult<Timestamp>;
            pub fn read_str(&self) -> IonResult<&str>;
            pub fn read_str_bytes(&self) -> IonResult<&[u8]>;
            pub fn read_symbol_id(&self) -> IonResult<SymbolId>;
            pub fn read_blob_bytes(&self) -> IonResult<&[u8]>;
            pub fn read_clob_bytes(&self) -> IonResult<&[u8]>;
            pub fn lob_size(&self) -> IonResult<usize>;
            pub fn read_lob_chunk(&self, offset: usize, destination: &mut [u8]) -> IonResult<usize>;
        }
    }
}

/// Constructs a [Reader] with a catalog, an event handler, or both.
///
/// ```
/// use ion_continuable::{Event, MapCatalog, ReaderBuilder};
/// let mut reader = ReaderBuilder::new()
///     .with_catalog(MapCatalog::new())
///     .with_initial_buffer(vec![0xE0, 0x01, 0x00, 0xEA, 0x21, 0x05])
///     .build();
/// assert_eq!(reader.advance().unwrap(), Event::StartScalar);
/// assert_eq!(reader.read_i64().unwrap(), 5);
/// ```
#[derive(Default)]
pub struct ReaderBuilder {
    config: ReadConfig,
    initial_buffer: Vec<u8>,
}

impl ReaderBuilder {
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Shared symbol table imports are resolved against `catalog`.
    pub fn with_catalog(mut self, catalog: impl Catalog + 'static) -> Self {
        self.config.set_catalog(catalog);
        self
    }

    /// Allows the user to specify an implementation of SystemEventHandler to respond to
    /// otherwise internal events like version markers and symbol table appends.
    pub fn with_event_handler(mut self, handler: impl SystemEventHandler + 'static) -> Self {
        self.config.set_event_handler(handler);
        self
    }

    /// The bytes the reader starts with. More can be added with [Reader::append_bytes].
    pub fn with_initial_buffer(mut self, data: Vec<u8>) -> Self {
        self.initial_buffer = data;
        self
    }

    pub fn build(self) -> Reader {
        Reader::with_config(self.config, self.initial_buffer)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::binary::constants::v1_0::IVM;
    use crate::catalog::MapCatalog;
    use crate::shared_symbol_table::SharedSymbolTable;
    use crate::IonError;
    use rstest::*;

    // Create a growable byte vector that starts with the Ion 1.0 version marker
    fn ion_data(bytes: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&IVM);
        data.extend_from_slice(bytes);
        data
    }

    fn ion_reader_for(bytes: &[u8]) -> Reader {
        Reader::new(ion_data(bytes))
    }

    const EXAMPLE_STREAM: &[u8] = &[
        // $ion_symbol_table::{imports: $ion_symbol_table, symbols: ["foo", "bar", "baz"]}
        0xEE, // Var len annotations
        0x95, // Annotations + Value length: 21 bytes
        0x81, // Annotations length: 1
        0x83, // Annotation 3 ('$ion_symbol_table')
        0xDE, // Var len struct
        0x91, // Length: 17 bytes
        0x86, // Field ID 6 ('imports')
        0x71, 0x03, // Symbol 3 ('$ion_symbol_table')
        0x87, // Field ID 7 ('symbols')
        0xBC, // 12-byte List
        0x83, 0x66, 0x6f, 0x6f, // "foo"
        0x83, 0x62, 0x61, 0x72, // "bar"
        0x83, 0x62, 0x61, 0x7a, // "baz"
        // System: {$10: 1, $11: 2, $12: 3}
        // User: {foo: 1, bar: 1, baz: 1}
        0xD9, // 9-byte struct
        0x8A, // Field ID 10
        0x21, 0x01, // Integer 1
        0x8B, // Field ID 11
        0x21, 0x02, // Integer 2
        0x8C, // Field ID 12
        0x21, 0x03, // Integer 3
    ];

    #[derive(Default)]
    struct Recorded {
        ivms: Vec<(u8, u8)>,
        resets: Vec<usize>,
        appends: Vec<(usize, Vec<Option<String>>)>,
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Recorded>>);

    impl SystemEventHandler for Recorder {
        fn on_ivm(&mut self, ion_version: (u8, u8)) {
            self.0.borrow_mut().ivms.push(ion_version);
        }

        fn on_symbol_table_append<'a>(
            &'a mut self,
            symbol_table: &'a SymbolTable,
            starting_id: usize,
        ) {
            let new_symbols = symbol_table
                .local_symbols()
                .skip(starting_id - symbol_table.first_local_id())
                .map(|s| s.map(str::to_owned))
                .collect();
            self.0.borrow_mut().appends.push((starting_id, new_symbols));
        }

        fn on_symbol_table_reset<'a>(&'a mut self, symbol_table: &'a SymbolTable) {
            self.0.borrow_mut().resets.push(symbol_table.max_id());
        }
    }

    #[test]
    fn test_read_struct() -> IonResult<()> {
        let recorder = Recorder::default();
        let mut reader = ReaderBuilder::new()
            .with_event_handler(recorder.clone())
            .with_initial_buffer(ion_data(EXAMPLE_STREAM))
            .build();

        assert_eq!(reader.advance()?, Event::StartContainer);
        assert_eq!(reader.current_type(), Some(IonType::Struct));
        reader.step_into_container()?;

        assert_eq!(reader.advance()?, Event::StartScalar);
        assert_eq!(reader.field_name()?, Some("foo"));
        assert_eq!(reader.read_i64()?, 1);

        assert_eq!(reader.advance()?, Event::StartScalar);
        assert_eq!(reader.field_name()?, Some("bar"));

        assert_eq!(reader.advance()?, Event::StartScalar);
        assert_eq!(reader.field_name()?, Some("baz"));

        assert_eq!(reader.advance()?, Event::EndContainer);
        reader.step_out_of_container()?;
        assert_eq!(reader.advance()?, Event::NeedsData);
        reader.finish()?;

        let recorded = recorder.0.borrow();
        assert_eq!(recorded.ivms, vec![(1, 0)]);
        assert_eq!(recorded.resets, vec![9]);
        let expected = vec![Some("foo".to_owned()), Some("bar".to_owned()), Some("baz".to_owned())];
        assert_eq!(recorded.appends, vec![(10, expected)]);
        Ok(())
    }

    #[test]
    fn symbol_table_with_imports_replaces_the_current_table() -> IonResult<()> {
        let mut catalog = MapCatalog::new();
        catalog.insert_table(SharedSymbolTable::new(
            "greetings".to_string(),
            1,
            vec![Some("hello".to_string()), Some("hi".to_string())],
        )?);
        let data = ion_data(&[
            // $ion_symbol_table::{symbols: ["a"]}
            0xE7, 0x81, 0x83, 0xD4, 0x87, 0xB2, 0x81, b'a',
            // $ion_symbol_table::{imports: [{name: "greetings", version: 1}], symbols: ["b"]}
            0xEE, 0x9B, 0x81, 0x83, // annotation wrapper, 27 bytes
            0xDE, 0x97, // struct, 23 bytes
            0x86, 0xBE, 0x90, // imports: list, 16 bytes
            0xDE, 0x8E, // struct, 14 bytes
            0x84, 0x89, b'g', b'r', b'e', b'e', b't', b'i', b'n', b'g', b's', // name
            0x85, 0x21, 0x01, // version: 1
            0x87, 0xB2, 0x81, b'b', // symbols: ["b"]
            // $11 $12
            0x71, 0x0B, 0x71, 0x0C,
        ]);
        let mut reader = ReaderBuilder::new()
            .with_catalog(catalog)
            .with_initial_buffer(data)
            .build();
        assert_eq!(reader.advance()?, Event::StartScalar);
        assert_eq!(reader.read_symbol()?, "hi");
        assert_eq!(reader.advance()?, Event::StartScalar);
        assert_eq!(reader.read_symbol()?, "b");
        // "a" was dropped along with the first table
        assert_eq!(reader.symbol_table().sid_for("a"), None);
        assert_eq!(reader.symbol_table().first_local_id(), 12);
        Ok(())
    }

    #[test]
    fn ivm_resets_the_symbol_table() -> IonResult<()> {
        let mut data = EXAMPLE_STREAM[..23].to_vec();
        data.extend_from_slice(&IVM);
        // $10
        data.extend_from_slice(&[0x71, 0x0A]);
        let mut reader = ion_reader_for(&data);
        assert_eq!(reader.advance()?, Event::StartScalar);
        assert_eq!(reader.symbol_table().max_id(), 9);
        assert!(matches!(reader.read_symbol(), Err(IonError::Decoding(_))));
        Ok(())
    }

    #[test]
    fn annotations_and_field_names_resolve() -> IonResult<()> {
        let mut data = EXAMPLE_STREAM[..23].to_vec();
        data.extend_from_slice(&[
            0xE4, 0x82, 0x8A, 0x8B, 0x20, // foo::bar::0
            0xE3, 0x81, 0x80, 0x20, // $0::0
        ]);
        let mut reader = ion_reader_for(&data);
        assert_eq!(reader.advance()?, Event::StartScalar);
        let annotations: Vec<&str> = reader.annotations().collect::<IonResult<_>>()?;
        assert_eq!(annotations, vec!["foo", "bar"]);
        assert_eq!(reader.field_name()?, None);
        assert_eq!(reader.advance()?, Event::StartScalar);
        let result: IonResult<Vec<&str>> = reader.annotations().collect();
        assert!(matches!(result, Err(IonError::UnknownSymbolText(_))));
        Ok(())
    }

    #[test]
    fn unknown_fields_and_non_strings_are_tolerated() -> IonResult<()> {
        let data = ion_data(&[
            // $ion_symbol_table::{name: "x", symbols: ["a", null, 5, "b"]}
            0xEE, 0x90, 0x81, 0x83, // annotation wrapper, 16 bytes
            0xDD, // struct, 13 bytes
            0x84, 0x81, b'x', // name: "x"
            0x87, 0xB8, // symbols: list, 8 bytes
            0x81, b'a', 0x8F, 0x21, 0x05, 0x81, b'b', 0x00, // "a", null.string, 5, "b", padding
            0x71, 0x0D, // $13
        ]);
        let mut reader = ion_reader_for(&data);
        assert_eq!(reader.advance()?, Event::StartScalar);
        assert_eq!(reader.read_symbol()?, "b");
        let table = reader.symbol_table();
        assert_eq!(table.max_id(), 13);
        assert_eq!(table.resolve(11)?, None);
        assert_eq!(table.resolve(12)?, None);
        Ok(())
    }

    #[rstest]
    // $ion_symbol_table::{symbols: [], symbols: []}
    #[case::duplicate_symbols(&[0xE7, 0x81, 0x83, 0xD4, 0x87, 0xB0, 0x87, 0xB0])]
    // $ion_symbol_table::{imports: [], imports: []}
    #[case::duplicate_imports(&[0xE7, 0x81, 0x83, 0xD4, 0x86, 0xB0, 0x86, 0xB0])]
    // $ion_symbol_table::{imports: [{name: "missing"}]}, which has no max_id
    #[case::unresolvable_import(&[0xEE, 0x8F, 0x81, 0x83, 0xDC, 0x86, 0xBA, 0xD9, 0x84, 0x87, b'm', b'i', b's', b's', b'i', b'n', b'g'])]
    fn malformed_symbol_tables(#[case] body: &[u8]) {
        let mut reader = ion_reader_for(body);
        assert!(matches!(reader.advance(), Err(IonError::Decoding(_))));
    }

    #[test]
    fn symbol_table_split_across_appends() -> IonResult<()> {
        let data = ion_data(EXAMPLE_STREAM);
        let mut reader = Reader::new(data[..12].to_vec());
        assert_eq!(reader.advance()?, Event::NeedsData);
        // Nothing is visible until the table is complete
        assert_eq!(reader.symbol_table().max_id(), 9);
        assert!(reader.finish().is_err());
        reader.append_bytes(&data[12..24]);
        assert_eq!(reader.advance()?, Event::NeedsData);
        assert_eq!(reader.symbol_table().max_id(), 9);
        reader.append_bytes(&data[24..]);
        assert_eq!(reader.advance()?, Event::StartContainer);
        assert_eq!(reader.symbol_table().max_id(), 12);
        Ok(())
    }

    #[test]
    fn partly_read_symbol_table_is_not_visible() -> IonResult<()> {
        let data = ion_data(EXAMPLE_STREAM);
        // Ends inside the symbol table struct, between the 'imports' field ID and its value
        let mut reader = Reader::new(data[..12].to_vec());
        assert_eq!(reader.advance()?, Event::NeedsData);
        assert_eq!(reader.depth(), 0);
        assert_eq!(reader.container_marker(), None);
        assert_eq!(reader.current_type(), None);
        assert_eq!(reader.field_id(), None);
        assert!(matches!(
            reader.step_out_of_container(),
            Err(IonError::IllegalOperation(_))
        ));
        assert!(matches!(
            reader.step_into_container(),
            Err(IonError::IllegalOperation(_))
        ));

        // The failed calls did not disturb the symbol table in progress
        reader.append_bytes(&data[12..]);
        assert_eq!(reader.advance()?, Event::StartContainer);
        assert_eq!(reader.depth(), 0);
        assert_eq!(reader.step_into_container()?, Event::NeedsInstruction);
        assert_eq!(reader.depth(), 1);
        assert!(reader.container_marker().is_some());
        assert_eq!(reader.advance()?, Event::StartScalar);
        assert_eq!(reader.field_name()?, Some("foo"));
        Ok(())
    }

    #[test]
    fn null_struct_is_not_a_symbol_table() -> IonResult<()> {
        // $ion_symbol_table::null.struct
        let mut reader = ion_reader_for(&[0xE3, 0x81, 0x83, 0xDF]);
        assert_eq!(reader.advance()?, Event::StartScalar);
        assert_eq!(reader.read_null()?, IonType::Struct);
        Ok(())
    }

    #[test]
    fn finish_reports_truncated_input() -> IonResult<()> {
        // A 3-byte string with only 1 byte of body
        let mut reader = ion_reader_for(&[0x83, b'a']);
        assert_eq!(reader.advance()?, Event::NeedsData);
        assert!(matches!(reader.finish(), Err(IonError::Incomplete(_))));

        let mut reader = ion_reader_for(&[0x21, 0x01]);
        assert_eq!(reader.advance()?, Event::StartScalar);
        assert_eq!(reader.advance()?, Event::NeedsData);
        reader.finish()?;
        Ok(())
    }
}
