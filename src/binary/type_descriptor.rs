use crate::binary::constants::v1_0::length_codes;
use crate::binary::type_code::IonTypeCode;
use crate::result::decoding_error;
use crate::types::IonType;
use crate::IonResult;

/// The binary encodings that the cursor knows how to navigate. Each version owns its own table of
/// type descriptors; an IVM announcing any other version is rejected when it is read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum EncodingVersion {
    Ion_1_0,
}

impl EncodingVersion {
    /// Maps the major and minor version numbers found in an IVM to an encoding.
    pub fn from_ivm(major: u8, minor: u8) -> IonResult<EncodingVersion> {
        match (major, minor) {
            (1, 0) => Ok(EncodingVersion::Ion_1_0),
            (1, 1) => decoding_error("Ion 1.1 streams are not supported"),
            (major, minor) => decoding_error(format!("unsupported Ion version {major}.{minor}")),
        }
    }

    /// Returns the `(major, minor)` pair that identifies this encoding in an IVM.
    pub fn version(&self) -> (u8, u8) {
        match self {
            EncodingVersion::Ion_1_0 => (1, 0),
        }
    }

    /// Looks up the descriptor for the provided type descriptor byte.
    #[inline]
    pub(crate) fn type_descriptor(&self, byte: u8) -> TypeDescriptor {
        match self {
            EncodingVersion::Ion_1_0 => ION_1_0_TYPE_DESCRIPTORS[byte as usize],
        }
    }
}

/// Contains all of the information that can be extracted from the one-octet type descriptor
/// found at the beginning of each value, annotations wrapper, IVM, or NOP in a binary Ion stream.
/// For more information, consult the
/// [Typed Value Formats](https://amazon-ion.github.io/ion-docs/docs/binary.html#typed-value-formats)
/// section of the binary Ion spec.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub ion_type_code: IonTypeCode,
    pub ion_type: Option<IonType>,
    pub length_code: u8,
    /// `false` for type code/length code combinations that may never appear in a stream.
    pub is_valid: bool,
}

/// A statically defined array of TypeDescriptor that allows the cursor to map a given
/// byte (`u8`) to a `TypeDescriptor` without having to perform any masking or bitshift operations.
pub(crate) static ION_1_0_TYPE_DESCRIPTORS: [TypeDescriptor; 256] = init_type_descriptor_cache();

const DEFAULT_HEADER: TypeDescriptor = TypeDescriptor {
    ion_type_code: IonTypeCode::NullOrNop,
    ion_type: None,
    length_code: 0,
    is_valid: false,
};

const fn init_type_descriptor_cache() -> [TypeDescriptor; 256] {
    let mut jump_table = [DEFAULT_HEADER; 256];
    let mut index: usize = 0;
    while index < 256 {
        jump_table[index] = TypeDescriptor::from_byte(index as u8);
        index += 1;
    }
    jump_table
}

impl TypeDescriptor {
    /// Splits the provided byte into its type code and length code and decides whether the
    /// combination is legal in Ion 1.0.
    pub const fn from_byte(byte: u8) -> TypeDescriptor {
        let ion_type_code = IonTypeCode::from_nibble(byte >> 4);
        let length_code = byte & 0x0F;
        use IonTypeCode::*;
        let is_valid = match ion_type_code {
            Boolean => matches!(length_code, 0 | 1 | length_codes::NULL),
            // Negative zero is not a legal integer encoding.
            NegativeInteger => length_code != 0,
            Float => matches!(length_code, 0 | 4 | 8 | length_codes::NULL),
            Timestamp => length_code > 1,
            // 0xE0 starts an IVM. A wrapper needs at least one byte each for its annotations
            // length, its annotations and its value, and cannot be null.
            AnnotationOrIvm => matches!(length_code, 0 | 3..=14),
            Reserved => false,
            _ => true,
        };
        TypeDescriptor {
            ion_type_code,
            ion_type: ion_type_code.ion_type(length_code),
            length_code,
            is_valid,
        }
    }

    pub fn is_null(&self) -> bool {
        self.ion_type.is_some() && self.length_code == length_codes::NULL
    }

    pub fn is_nop(&self) -> bool {
        self.ion_type_code == IonTypeCode::NullOrNop && self.length_code != length_codes::NULL
    }

    pub fn is_ivm_start(&self) -> bool {
        self.ion_type_code == IonTypeCode::AnnotationOrIvm && self.length_code == 0
    }

    pub fn is_annotation_wrapper(&self) -> bool {
        self.ion_type_code == IonTypeCode::AnnotationOrIvm && self.length_code > 0
    }

    /// Returns `true` for lists, s-expressions and structs, including their typed nulls.
    pub fn is_container(&self) -> bool {
        matches!(self.ion_type, Some(t) if t.is_container())
    }

    /// Returns `true` for the `0x3L` integer type code.
    pub fn is_negative_int(&self) -> bool {
        self.ion_type_code == IonTypeCode::NegativeInteger
    }

    /// Returns `true` for a struct whose fields are sorted by symbol ID (`0xD1`).
    pub fn is_ordered_struct(&self) -> bool {
        self.ion_type_code == IonTypeCode::Struct
            && self.length_code == length_codes::ORDERED_STRUCT
    }

    /// Ion 1.0 has no delimited containers; every value declares its length up front.
    pub fn is_delimited(&self) -> bool {
        false
    }

    /// Interprets a value's length code the way the binary format assigns meaning to it. If the
    /// length is stored in a VarUInt after the type descriptor, returns `None`.
    pub fn inline_length(&self) -> Option<usize> {
        match self.ion_type {
            // Null and bool values are complete once the type descriptor has been read.
            Some(IonType::Null) | Some(IonType::Bool) => Some(0),
            _ if self.length_code == length_codes::NULL => Some(0),
            _ if self.length_code == length_codes::VAR_UINT => None,
            _ if self.is_ordered_struct() => None,
            _ => Some(self.length_code as usize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case::ivm(0xE0, true)]
    #[case::short_wrapper(0xE1, false)]
    #[case::two_byte_wrapper(0xE2, false)]
    #[case::wrapper(0xE3, true)]
    #[case::null_wrapper(0xEF, false)]
    #[case::bool_true(0x11, true)]
    #[case::bool_bad_length(0x12, false)]
    #[case::negative_zero_int(0x30, false)]
    #[case::float_32(0x44, true)]
    #[case::float_16(0x42, false)]
    #[case::one_byte_timestamp(0x61, false)]
    #[case::ordered_struct(0xD1, true)]
    #[case::reserved(0xF0, false)]
    #[case::nop(0x00, true)]
    #[case::null_null(0x0F, true)]
    fn validity(#[case] byte: u8, #[case] expected: bool) {
        assert_eq!(ION_1_0_TYPE_DESCRIPTORS[byte as usize].is_valid, expected);
    }

    #[test]
    fn classification() {
        let td = EncodingVersion::Ion_1_0.type_descriptor(0x0F);
        assert!(td.is_null());
        assert!(!td.is_nop());
        assert_eq!(td.ion_type, Some(IonType::Null));

        let td = EncodingVersion::Ion_1_0.type_descriptor(0x03);
        assert!(td.is_nop());
        assert_eq!(td.ion_type, None);

        let td = EncodingVersion::Ion_1_0.type_descriptor(0x3F);
        assert!(td.is_null());
        assert!(td.is_negative_int());

        let td = EncodingVersion::Ion_1_0.type_descriptor(0xD1);
        assert!(td.is_ordered_struct());
        assert_eq!(td.inline_length(), None);
    }

    #[rstest]
    #[case(0x21, Some(1))]
    #[case(0x2E, None)]
    #[case(0x2F, Some(0))]
    #[case(0x11, Some(0))]
    #[case(0xDE, None)]
    #[case(0xD3, Some(3))]
    fn inline_lengths(#[case] byte: u8, #[case] expected: Option<usize>) {
        assert_eq!(ION_1_0_TYPE_DESCRIPTORS[byte as usize].inline_length(), expected);
    }

    #[test]
    fn ivm_versions() {
        assert_eq!(
            EncodingVersion::from_ivm(1, 0).unwrap(),
            EncodingVersion::Ion_1_0
        );
        assert!(EncodingVersion::from_ivm(1, 1).is_err());
        assert!(EncodingVersion::from_ivm(2, 0).is_err());
    }
}
