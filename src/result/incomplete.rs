use std::borrow::Cow;
use thiserror::Error;

/// Indicates that the input ended while the reader was in the middle of a value or container.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("unexpected end of input while reading {label} at offset {position}")]
pub struct IncompleteError {
    label: Cow<'static, str>,
    position: usize,
}

impl IncompleteError {
    pub(crate) fn new(label: impl Into<Cow<'static, str>>, position: usize) -> Self {
        IncompleteError {
            label: label.into(),
            position,
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_ref()
    }

    /// The absolute stream offset at which input ran out.
    pub fn position(&self) -> usize {
        self.position
    }
}
