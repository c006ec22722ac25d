//! A continuable reader for binary Ion 1.0.
//!
//! Input can be supplied in pieces of any size. When an operation needs bytes that have not
//! arrived yet it returns [`Event::NeedsData`] without changing any visible state; append more
//! input and repeat the call.
//!
//! ```
//! use ion_continuable::{Event, IonResult, Reader};
//!
//! # fn main() -> IonResult<()> {
//! let mut reader = Reader::new(vec![0xE0, 0x01, 0x00]);
//! assert_eq!(reader.advance()?, Event::NeedsData);
//! // The rest of the version marker and the int `5`
//! reader.append_bytes(&[0xEA, 0x21, 0x05]);
//! assert_eq!(reader.advance()?, Event::StartScalar);
//! assert_eq!(reader.read_i64()?, 5);
//! assert_eq!(reader.advance()?, Event::NeedsData);
//! reader.finish()?;
//! # Ok(())
//! # }
//! ```

pub mod result;

pub mod binary;
pub mod types;

pub mod catalog;
pub mod constants;
pub mod imports;
mod read_config;
mod reader;
mod shared_symbol_table;
mod symbol_table;
mod system_event_handler;

pub use binary::cursor::{BinaryCursor, Event, Marker};
pub use binary::scalar_reader::ScalarReader;
pub use binary::type_descriptor::EncodingVersion;
pub use catalog::{Catalog, EmptyCatalog, MapCatalog};
pub use imports::{ImportDescriptor, LocalSymbolTableImports, SymbolTableImport};
pub use reader::{Reader, ReaderBuilder};
pub use result::{IonError, IonResult};
pub use shared_symbol_table::SharedSymbolTable;
pub use symbol_table::SymbolTable;
pub use system_event_handler::SystemEventHandler;
pub use types::{
    Coefficient, Decimal, Int, IntegerSize, IonType, Precision, Sign, SymbolId, Timestamp, UInt,
};
