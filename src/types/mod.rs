//! In-memory representations of the values that the scalar decoder materializes. These follow
//! the [Ion Data Model](https://amazon-ion.github.io/ion-docs/docs/spec.html#the-ion-data-model).

/// A symbol ID. Symbol ID `0` is the symbol with unknown text; IDs `1` through `9` are defined
/// by the Ion 1.0 system symbol table.
pub type SymbolId = usize;

mod coefficient;
mod decimal;
mod integer;
mod timestamp;

pub use coefficient::{Coefficient, Sign};
pub use decimal::Decimal;
pub use integer::{Int, IntegerSize, UInt};
pub use timestamp::{
    DaySetter, FractionalSecondSetter, HourAndMinuteSetter, MonthSetter, Precision, SecondSetter,
    Timestamp,
};

use std::fmt;

/// Represents the Ion data type of a given value.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub enum IonType {
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    Timestamp,
    Symbol,
    String,
    Clob,
    Blob,
    List,
    SExp,
    Struct,
}

impl fmt::Display for IonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                IonType::Null => "null",
                IonType::Bool => "bool",
                IonType::Int => "int",
                IonType::Float => "float",
                IonType::Decimal => "decimal",
                IonType::Timestamp => "timestamp",
                IonType::Symbol => "symbol",
                IonType::String => "string",
                IonType::Clob => "clob",
                IonType::Blob => "blob",
                IonType::List => "list",
                IonType::SExp => "sexp",
                IonType::Struct => "struct",
            }
        )
    }
}

impl IonType {
    pub fn is_container(&self) -> bool {
        use IonType::*;
        matches!(self, List | SExp | Struct)
    }

    pub fn is_lob(&self) -> bool {
        matches!(self, IonType::Blob | IonType::Clob)
    }
}
