use std::mem;

use crate::types::UInt;

/// Represents a fixed-length unsigned integer. See the
/// [UInt and Int Fields](https://amazon-ion.github.io/ion-docs/docs/binary.html#uint-and-int-fields)
/// section of the binary Ion spec for more details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedUInt {
    value: UInt,
    size_in_bytes: usize,
}

impl DecodedUInt {
    pub(crate) fn new(value: UInt, size_in_bytes: usize) -> Self {
        DecodedUInt {
            value,
            size_in_bytes,
        }
    }

    /// Interprets all of the bytes in the provided slice as big-endian unsigned integer bytes.
    /// The caller must confirm that `uint_bytes` is no longer than 8 bytes.
    pub(crate) fn small_uint_from_slice(uint_bytes: &[u8]) -> u64 {
        debug_assert!(uint_bytes.len() <= mem::size_of::<u64>());
        uint_bytes
            .iter()
            .fold(0u64, |magnitude, byte| (magnitude << 8) | u64::from(*byte))
    }

    /// Returns the magnitude of the unsigned integer.
    #[inline(always)]
    pub fn value(&self) -> &UInt {
        &self.value
    }

    /// Returns the number of bytes that were read from the data source to construct this
    /// unsigned integer.
    #[inline(always)]
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }
}

impl From<DecodedUInt> for UInt {
    fn from(uint: DecodedUInt) -> Self {
        let DecodedUInt { value, .. } = uint;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_uints() {
        assert_eq!(DecodedUInt::small_uint_from_slice(&[]), 0);
        assert_eq!(DecodedUInt::small_uint_from_slice(&[0x01, 0x00]), 256);
        assert_eq!(
            DecodedUInt::small_uint_from_slice(&[0xFF; 8]),
            u64::MAX
        );
    }
}
