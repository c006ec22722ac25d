use crate::types::{Coefficient, Int};

/// Represents a fixed-length signed integer. See the
/// [UInt and Int Fields](https://amazon-ion.github.io/ion-docs/docs/binary.html#uint-and-int-fields)
/// section of the binary Ion spec for more details.
///
/// Unlike VarInts, Int fields use the first bit of the first byte as a sign bit, and the
/// remaining bits as a big-endian magnitude. A set sign bit over a zero magnitude is negative
/// zero, which decimal coefficients need to preserve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInt {
    value: Int,
    // [Int] is not capable of natively representing negative zero. We track the sign of the value
    // separately so we can distinguish between 0 and -0.
    is_negative: bool,
    size_in_bytes: usize,
}

impl DecodedInt {
    pub(crate) fn new(value: Int, is_negative: bool, size_in_bytes: usize) -> Self {
        DecodedInt {
            value,
            is_negative,
            size_in_bytes,
        }
    }

    /// Constructs a DecodedInt that represents zero. This is what an empty (zero-length) Int field
    /// decodes to.
    pub fn zero() -> Self {
        DecodedInt::new(Int::I64(0), false, 0)
    }

    /// Returns `true` if the Int is negative zero.
    pub fn is_negative_zero(&self) -> bool {
        self.value.is_zero() && self.is_negative
    }

    /// Returns the value of the signed integer.
    #[inline(always)]
    pub fn value(&self) -> &Int {
        &self.value
    }

    /// Returns the number of bytes that were read from the data source to construct this
    /// signed integer.
    #[inline(always)]
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }
}

impl From<DecodedInt> for Coefficient {
    fn from(int: DecodedInt) -> Self {
        if int.is_negative_zero() {
            return Coefficient::negative_zero();
        }
        let DecodedInt { value, .. } = int;
        value.into()
    }
}

impl From<DecodedInt> for Int {
    fn from(int: DecodedInt) -> Self {
        let DecodedInt { value, .. } = int;
        value
    }
}
