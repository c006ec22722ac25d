/// Represents a variable-length signed integer. See the
/// [VarUInt and VarInt Fields](https://amazon-ion.github.io/ion-docs/docs/binary.html#varuint-and-varint-fields)
/// section of the binary Ion spec for more details.
///
/// The sign bit is kept separately from the value so that negative zero, which timestamps use
/// to mark an unknown offset, can be detected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VarInt {
    value: i64,
    is_negative: bool,
    size_in_bytes: usize,
}

impl VarInt {
    pub(crate) fn new(value: i64, is_negative: bool, size_in_bytes: usize) -> Self {
        VarInt {
            value,
            is_negative,
            size_in_bytes,
        }
    }

    /// Returns `true` if the VarInt is negative zero.
    pub fn is_negative_zero(&self) -> bool {
        // `self.value` can only be 0 if it is either -0 or +0.
        self.value == 0 && self.is_negative
    }

    /// Returns the value of the signed integer
    #[inline(always)]
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Returns the number of bytes that were read from the data source to construct this
    /// signed integer
    #[inline(always)]
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero() {
        assert!(VarInt::new(0, true, 1).is_negative_zero());
        assert!(!VarInt::new(0, false, 1).is_negative_zero());
        assert!(!VarInt::new(-3, true, 1).is_negative_zero());
    }
}
