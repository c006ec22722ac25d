use crate::types::IonType;

/// Represents the type information found in the high nibble of each binary Ion type descriptor.
/// While this value can be readily mapped to a user-level [`IonType`], it is a distinct concept.
/// The IonTypeCode enum captures system-level information that is not exposed to end users of the
/// library, including:
/// * Whether the cursor is positioned over padding that needs to be skipped.
/// * Whether the integer value being read is positive or negative.
/// * Whether the next type code is reserved.
///
/// See the
/// [Typed Value Formats](https://amazon-ion.github.io/ion-docs/docs/binary.html#typed-value-formats)
/// section of the binary Ion spec for more information.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum IonTypeCode {
    NullOrNop,       // 0
    Boolean,         // 1
    PositiveInteger, // 2
    NegativeInteger, // 3
    Float,           // 4
    Decimal,         // 5
    Timestamp,       // 6
    Symbol,          // 7
    String,          // 8
    Clob,            // 9
    Blob,            // 10
    List,            // 11
    SExpression,     // 12
    Struct,          // 13
    AnnotationOrIvm, // 14
    Reserved,        // 15
}

impl IonTypeCode {
    /// Maps the high nibble of a type descriptor byte to its type code. Only the low four bits
    /// of `nibble` are considered.
    pub const fn from_nibble(nibble: u8) -> IonTypeCode {
        use IonTypeCode::*;
        match nibble & 0x0F {
            0 => NullOrNop,
            1 => Boolean,
            2 => PositiveInteger,
            3 => NegativeInteger,
            4 => Float,
            5 => Decimal,
            6 => Timestamp,
            7 => Symbol,
            8 => String,
            9 => Clob,
            10 => Blob,
            11 => List,
            12 => SExpression,
            13 => Struct,
            14 => AnnotationOrIvm,
            _ => Reserved,
        }
    }

    /// Returns the user-level [`IonType`] for type codes that introduce a value. NOP pads,
    /// annotation wrappers, IVMs and the reserved code have none.
    pub const fn ion_type(self, length_code: u8) -> Option<IonType> {
        use IonTypeCode::*;
        match self {
            NullOrNop if length_code == 15 => Some(IonType::Null),
            NullOrNop => None,
            Boolean => Some(IonType::Bool),
            PositiveInteger | NegativeInteger => Some(IonType::Int),
            Float => Some(IonType::Float),
            Decimal => Some(IonType::Decimal),
            Timestamp => Some(IonType::Timestamp),
            Symbol => Some(IonType::Symbol),
            String => Some(IonType::String),
            Clob => Some(IonType::Clob),
            Blob => Some(IonType::Blob),
            List => Some(IonType::List),
            SExpression => Some(IonType::SExp),
            Struct => Some(IonType::Struct),
            AnnotationOrIvm | Reserved => None,
        }
    }
}
