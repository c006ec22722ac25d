use std::convert::From;
use std::io;

use crate::result::decoding_error::DecodingError;
use crate::result::illegal_operation::IllegalOperation;
use crate::result::incomplete::IncompleteError;
use crate::result::unknown_symbol_text::UnknownSymbolTextError;
use crate::types::SymbolId;
use io_error::IoError;
use thiserror::Error;

pub mod decoding_error;
pub mod illegal_operation;
pub mod incomplete;
pub mod io_error;
pub mod unknown_symbol_text;

/// A unified Result type representing the outcome of method calls that may fail.
pub type IonResult<T> = Result<T, IonError>;

/// Represents the different types of high-level failures that might occur when reading Ion data.
///
/// Running out of buffered input is *not* one of them; the cursor reports that condition as
/// [`Event::NeedsData`](crate::Event::NeedsData). [`IonError::Incomplete`] is only produced once
/// the caller has declared that no more input is coming.
#[derive(Debug, Error)]
pub enum IonError {
    /// Indicates that an IO error was encountered while pulling bytes from a data source.
    #[error("{0}")]
    Io(#[from] IoError),

    /// Indicates that the stream ended in the middle of a value or container.
    #[error("{0}")]
    Incomplete(#[from] IncompleteError),

    /// Indicates that the data stream being read contained illegal or otherwise unreadable data.
    /// The stream should be abandoned.
    #[error("{0}")]
    Decoding(#[from] DecodingError),

    /// Indicates that a symbol ID was within the range of the active symbol table but its text
    /// is not known. This does not invalidate the rest of the stream.
    #[error("{0}")]
    UnknownSymbolText(#[from] UnknownSymbolTextError),

    /// Returned when the user has performed an illegal operation (for example: calling
    /// `step_out_of_container()` at the top level.)
    #[error("{0}")]
    IllegalOperation(#[from] IllegalOperation),
}

impl From<io::Error> for IonError {
    fn from(io_error: io::Error) -> Self {
        IoError::from(io_error).into()
    }
}

impl From<io::ErrorKind> for IonError {
    fn from(error_kind: io::ErrorKind) -> Self {
        // io::ErrorKind -> io::Error
        let io_error = io::Error::from(error_kind);
        // io::Error -> IoError -> IonError
        IoError::from(io_error).into()
    }
}

pub(crate) fn incomplete_error<T>(label: &'static str, position: usize) -> IonResult<T> {
    Err(incomplete_error_raw(label, position))
}

pub(crate) fn incomplete_error_raw(label: &'static str, position: usize) -> IonError {
    IncompleteError::new(label, position).into()
}

/// A convenience method for creating an IonResult containing an IonError::Decoding with the
/// provided description text.
pub fn decoding_error<T, S: Into<String>>(description: S) -> IonResult<T> {
    Err(decoding_error_raw(description))
}

/// A convenience method for creating an IonError::Decoding with the provided description
/// text. Useful for calling Option#ok_or_else.
#[inline(never)]
pub(crate) fn decoding_error_raw<S: Into<String>>(description: S) -> IonError {
    DecodingError::new(description.into()).into()
}

/// A convenience method for creating an IonResult containing an IonError::IllegalOperation with the
/// provided operation text.
pub fn illegal_operation<T, S: Into<String>>(operation: S) -> IonResult<T> {
    Err(illegal_operation_raw(operation))
}

/// A convenience method for creating an IonError::IllegalOperation with the provided operation
/// text. Useful for calling Option#ok_or_else.
#[inline(never)]
pub(crate) fn illegal_operation_raw<S: Into<String>>(operation: S) -> IonError {
    IllegalOperation::new(operation.into()).into()
}

/// Constructs an IonError::UnknownSymbolText for the provided symbol ID.
#[inline(never)]
pub(crate) fn unknown_symbol_text_raw(sid: SymbolId) -> IonError {
    UnknownSymbolTextError::new(sid).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories_are_distinct() {
        let decoding = decoding_error_raw("symbol ID $12 exceeds the table's max ID (11)");
        let unknown = unknown_symbol_text_raw(11);
        assert!(matches!(decoding, IonError::Decoding(_)));
        assert!(matches!(unknown, IonError::UnknownSymbolText(_)));
        assert_eq!(unknown.to_string(), "symbol ID $11 is in range but its text is unknown");
    }

    #[test]
    fn incomplete_error_reports_position() {
        let error = incomplete_error_raw("a value", 17);
        match error {
            IonError::Incomplete(incomplete) => assert_eq!(incomplete.position(), 17),
            other => panic!("expected IonError::Incomplete, but found: {other:?}"),
        }
    }

    #[test]
    fn io_errors_convert() {
        let error: IonError = io::ErrorKind::UnexpectedEof.into();
        assert!(matches!(error, IonError::Io(_)));
    }
}
