use std::io::Read;
use std::mem;

use num_bigint::{BigInt, BigUint, Sign};

use crate::binary::constants::v1_0::{length_codes, IVM, IVM_END, IVM_START};
use crate::binary::int::DecodedInt;
use crate::binary::type_descriptor::{EncodingVersion, TypeDescriptor};
use crate::binary::uint::DecodedUInt;
use crate::binary::var_int::VarInt;
use crate::binary::var_uint::VarUInt;
use crate::result::{decoding_error, incomplete_error, incomplete_error_raw};
use crate::types::{Int, IonType, UInt};
use crate::IonResult;

// This number was chosen somewhat arbitrarily and could be lifted if a use case demands it.
const MAX_UINT_SIZE_IN_BYTES: usize = 2048;

// This number was chosen somewhat arbitrarily and could be lifted if a use case demands it.
const MAX_INT_SIZE_IN_BYTES: usize = 2048;

/// A wrapper around an `AsRef<[u8]>` that provides methods to read Ion's encoding primitives.
///
/// Every `read_*` method either consumes the bytes it decoded and returns `Ok(_)`, or leaves the
/// buffer untouched and returns an error. A read that runs off the end of the available data
/// fails with [`IonError::Incomplete`](crate::IonError::Incomplete).
///
/// When the wrapped type is a `Vec<u8>`, data can be appended to the buffer between read
/// operations.
#[derive(Debug, PartialEq)]
pub(crate) struct BinaryBuffer<A: AsRef<[u8]>> {
    data: A,
    start: usize,
    end: usize,
    // The absolute stream offset of `start`. This keeps counting across calls to `restack`.
    total_consumed: usize,
}

impl<A: AsRef<[u8]>> BinaryBuffer<A> {
    /// Constructs a new BinaryBuffer that wraps `data`.
    #[inline]
    pub fn new(data: A) -> BinaryBuffer<A> {
        let end = data.as_ref().len();
        BinaryBuffer {
            data,
            start: 0,
            end,
            total_consumed: 0,
        }
    }

    /// Creates an independent view of the `BinaryBuffer`'s data. The `BinaryBuffer` that is
    /// returned tracks its own position and consumption without affecting the original.
    pub fn slice(&self) -> BinaryBuffer<&A> {
        BinaryBuffer {
            data: &self.data,
            start: self.start,
            end: self.end,
            total_consumed: self.total_consumed,
        }
    }

    /// Returns a slice containing all of the buffer's remaining bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data.as_ref()[self.start..self.end]
    }

    /// Returns the bytes between the absolute stream offsets `start` and `end`. Returns `None` if
    /// any part of that range has already been discarded or has not been appended yet.
    pub fn bytes_at(&self, start: usize, end: usize) -> Option<&[u8]> {
        let buffer_start = self.total_consumed.checked_sub(self.start)?;
        let from = start.checked_sub(buffer_start)?;
        let to = end.checked_sub(buffer_start)?;
        if from > to || to > self.end {
            return None;
        }
        self.data.as_ref().get(from..to)
    }

    /// Returns the number of bytes that have been marked as read either via the
    /// [`consume`](Self::consume) method or one of the `read_*` methods.
    pub fn total_consumed(&self) -> usize {
        self.total_consumed
    }

    /// Returns the absolute stream offset one past the last byte that is currently available.
    pub fn available_end(&self) -> usize {
        self.total_consumed + self.remaining()
    }

    /// Returns the number of unread bytes left in the buffer.
    pub fn remaining(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if there are no bytes remaining in the buffer. Otherwise, returns `false`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// If the buffer is not empty, returns `Some(_)` containing the next byte in the buffer.
    /// Otherwise, returns `None`.
    pub fn peek_next_byte(&self) -> Option<u8> {
        self.bytes().first().copied()
    }

    /// If there are at least `n` bytes left in the buffer, returns `Some(_)` containing a slice
    /// with the first `n` bytes. Otherwise, returns `None`.
    pub fn peek_n_bytes(&self, n: usize) -> Option<&[u8]> {
        self.bytes().get(..n)
    }

    /// Marks the first `num_bytes_to_consume` bytes in the buffer as having been read.
    ///
    /// After data has been inspected using the `peek` methods, those bytes can be marked as read
    /// by calling the `consume` method.
    ///
    /// Note that the various `read_*` methods to parse Ion encoding primitives automatically
    /// consume the bytes they read if they are successful.
    #[inline]
    pub fn consume(&mut self, num_bytes_to_consume: usize) {
        // This assertion is always run during testing but is removed in the release build.
        debug_assert!(num_bytes_to_consume <= self.remaining());
        self.start += num_bytes_to_consume;
        self.total_consumed += num_bytes_to_consume;
    }

    /// Reads (but does not consume) the first byte in the buffer and returns it as a
    /// [TypeDescriptor] of the provided encoding.
    pub fn peek_type_descriptor(&self, encoding: EncodingVersion) -> IonResult<TypeDescriptor> {
        match self.peek_next_byte() {
            Some(byte) => Ok(encoding.type_descriptor(byte)),
            None => incomplete_error("a type descriptor", self.total_consumed()),
        }
    }

    /// Reads the first four bytes in the buffer as an Ion version marker. If it is successful,
    /// returns an `Ok(_)` containing a `(major, minor)` version tuple and consumes the
    /// source bytes.
    ///
    /// See: <https://amazon-ion.github.io/ion-docs/docs/binary.html#value-streams>
    pub fn read_ivm(&mut self) -> IonResult<(u8, u8)> {
        let bytes = self
            .peek_n_bytes(IVM.len())
            .ok_or_else(|| incomplete_error_raw("an IVM", self.total_consumed()))?;

        match *bytes {
            [IVM_START, major, minor, IVM_END] => {
                self.consume(IVM.len());
                Ok((major, minor))
            }
            _ => decoding_error(format!(
                "invalid IVM {:02X?} at offset {}",
                bytes,
                self.total_consumed()
            )),
        }
    }

    /// Reads a `VarUInt` encoding primitive from the beginning of the buffer. If it is successful,
    /// returns an `Ok(_)` containing its [VarUInt] representation and consumes the source bytes.
    ///
    /// See: <https://amazon-ion.github.io/ion-docs/docs/binary.html#varuint-and-varint-fields>
    pub fn read_var_uint(&mut self) -> IonResult<VarUInt> {
        const BITS_PER_ENCODED_BYTE: usize = 7;
        const STORAGE_SIZE_IN_BITS: usize = mem::size_of::<usize>() * 8;
        const MAX_ENCODED_SIZE_IN_BYTES: usize = STORAGE_SIZE_IN_BITS / BITS_PER_ENCODED_BYTE;

        const LOWER_7_BITMASK: u8 = 0b0111_1111;
        const HIGHEST_BIT_VALUE: u8 = 0b1000_0000;

        let mut magnitude: usize = 0;
        let mut encoded_size_in_bytes = 0;

        for byte in self.bytes().iter().copied() {
            encoded_size_in_bytes += 1;
            // Running out of bytes after the size limit cannot be fixed by appending more data.
            if encoded_size_in_bytes > MAX_ENCODED_SIZE_IN_BYTES {
                return Self::value_too_large(
                    "a VarUInt",
                    encoded_size_in_bytes,
                    MAX_ENCODED_SIZE_IN_BYTES,
                );
            }
            magnitude <<= 7; // Shifts 0 to 0 in the first iteration
            magnitude |= (LOWER_7_BITMASK & byte) as usize;
            if byte >= HIGHEST_BIT_VALUE {
                // This is the final byte.
                self.consume(encoded_size_in_bytes);
                return Ok(VarUInt::new(magnitude, encoded_size_in_bytes));
            }
        }

        incomplete_error("a VarUInt", self.total_consumed() + encoded_size_in_bytes)
    }

    /// Reads a `VarInt` encoding primitive from the beginning of the buffer. If it is successful,
    /// returns an `Ok(_)` containing its [VarInt] representation and consumes the source bytes.
    ///
    /// See: <https://amazon-ion.github.io/ion-docs/docs/binary.html#varuint-and-varint-fields>
    pub fn read_var_int(&mut self) -> IonResult<VarInt> {
        const BITS_PER_ENCODED_BYTE: usize = 7;
        const STORAGE_SIZE_IN_BITS: usize = mem::size_of::<i64>() * 8;
        const MAX_ENCODED_SIZE_IN_BYTES: usize = STORAGE_SIZE_IN_BITS / BITS_PER_ENCODED_BYTE;

        const LOWER_6_BITMASK: u8 = 0b0011_1111;
        const LOWER_7_BITMASK: u8 = 0b0111_1111;
        const HIGHEST_BIT_VALUE: u8 = 0b1000_0000;
        const SIGN_BIT: u8 = 0b0100_0000;

        // Unlike VarUInt's encoding, the first byte in a VarInt is a special case because
        // bit #6 (0-indexed, from the right) indicates whether the value is positive (0) or
        // negative (1).
        let first_byte = match self.peek_next_byte() {
            Some(byte) => byte,
            None => return incomplete_error("a VarInt", self.total_consumed()),
        };
        let is_negative = first_byte & SIGN_BIT == SIGN_BIT;
        let sign: i64 = if is_negative { -1 } else { 1 };
        let mut magnitude = (first_byte & LOWER_6_BITMASK) as i64;

        if first_byte >= HIGHEST_BIT_VALUE {
            self.consume(1);
            return Ok(VarInt::new(magnitude * sign, is_negative, 1));
        }

        let mut encoded_size_in_bytes = 1;
        for byte in self.bytes()[1..].iter().copied() {
            encoded_size_in_bytes += 1;
            if encoded_size_in_bytes > MAX_ENCODED_SIZE_IN_BYTES {
                return Self::value_too_large(
                    "a VarInt",
                    encoded_size_in_bytes,
                    MAX_ENCODED_SIZE_IN_BYTES,
                );
            }
            magnitude <<= 7;
            magnitude |= (LOWER_7_BITMASK & byte) as i64;
            if byte >= HIGHEST_BIT_VALUE {
                self.consume(encoded_size_in_bytes);
                return Ok(VarInt::new(
                    magnitude * sign,
                    is_negative,
                    encoded_size_in_bytes,
                ));
            }
        }

        incomplete_error("a VarInt", self.total_consumed() + encoded_size_in_bytes)
    }

    /// Reads the first `length` bytes from the buffer as a `UInt` encoding primitive. If it is
    /// successful, returns an `Ok(_)` containing its [DecodedUInt] representation and consumes the
    /// source bytes.
    ///
    /// See: <https://amazon-ion.github.io/ion-docs/docs/binary.html#uint-and-int-fields>
    pub fn read_uint(&mut self, length: usize) -> IonResult<DecodedUInt> {
        if length <= mem::size_of::<u64>() {
            return self.read_small_uint(length);
        }

        // The UInt is too large to fit in a u64; read it as a BigUInt instead.
        self.read_big_uint(length)
    }

    /// Reads the first `length` bytes from the buffer as a `UInt`. The caller must confirm that
    /// `length` is small enough to fit in a `u64`.
    #[inline]
    fn read_small_uint(&mut self, length: usize) -> IonResult<DecodedUInt> {
        let uint_bytes = self
            .peek_n_bytes(length)
            .ok_or_else(|| incomplete_error_raw("a UInt", self.total_consumed()))?;
        let magnitude = DecodedUInt::small_uint_from_slice(uint_bytes);
        self.consume(length);
        Ok(DecodedUInt::new(UInt::U64(magnitude), length))
    }

    /// Reads the first `length` bytes from the buffer as a `UInt`. If `length` is small enough
    /// that the value can fit in a `usize`, it is strongly recommended that you use
    /// `read_small_uint` instead as it will be much faster.
    #[inline(never)]
    // This method performs allocations and its generated assembly is rather large. Isolating its
    // logic in a separate method that is never inlined keeps `read_uint` (its caller) small enough
    // to inline.
    fn read_big_uint(&mut self, length: usize) -> IonResult<DecodedUInt> {
        if length > MAX_UINT_SIZE_IN_BYTES {
            return Self::value_too_large("a UInt", length, MAX_UINT_SIZE_IN_BYTES);
        }

        let uint_bytes = self
            .peek_n_bytes(length)
            .ok_or_else(|| incomplete_error_raw("a UInt", self.total_consumed()))?;

        let magnitude = BigUint::from_bytes_be(uint_bytes);
        self.consume(length);
        Ok(DecodedUInt::new(UInt::from(magnitude), length))
    }

    #[inline(never)]
    // This method is inline(never) because it is rarely invoked and its allocations/formatting
    // compile to a non-trivial number of instructions.
    fn value_too_large<T>(label: &str, length: usize, max_length: usize) -> IonResult<T> {
        decoding_error(format!(
            "found {label} that was too large; size = {length}, max size = {max_length}"
        ))
    }

    /// Reads the first `length` bytes from the buffer as an `Int` encoding primitive. If it is
    /// successful, returns an `Ok(_)` containing its [DecodedInt] representation and consumes the
    /// source bytes.
    ///
    /// See: <https://amazon-ion.github.io/ion-docs/docs/binary.html#uint-and-int-fields>
    pub fn read_int(&mut self, length: usize) -> IonResult<DecodedInt> {
        if length == 0 {
            return Ok(DecodedInt::zero());
        } else if length > MAX_INT_SIZE_IN_BYTES {
            return Self::value_too_large("an Int", length, MAX_INT_SIZE_IN_BYTES);
        }

        let int_bytes = self
            .peek_n_bytes(length)
            .ok_or_else(|| incomplete_error_raw("an Int encoding primitive", self.total_consumed()))?;

        let is_negative = int_bytes[0] & 0b1000_0000 != 0;
        let value = if length <= mem::size_of::<i64>() {
            // This Int will fit in an i64.
            let mut magnitude: i64 = i64::from(int_bytes[0] & 0b0111_1111);
            for &byte in &int_bytes[1..] {
                magnitude <<= 8;
                magnitude |= i64::from(byte);
            }
            Int::I64(if is_negative { -magnitude } else { magnitude })
        } else {
            // The leading sign bit is the only part of the input that can't be considered
            // unsigned, big-endian integer bytes. Clear it in a copy before decoding.
            let mut owned_int_bytes = Vec::from(int_bytes);
            owned_int_bytes[0] &= 0b0111_1111;
            let sign = if is_negative { Sign::Minus } else { Sign::Plus };
            Int::from(BigInt::from_bytes_be(sign, owned_int_bytes.as_slice()))
        };
        self.consume(length);
        Ok(DecodedInt::new(value, is_negative, length))
    }

    /// Interprets the length code in the provided [TypeDescriptor]; if necessary, will read more
    /// bytes from the buffer to interpret as the value's length. If it is successful, returns an
    /// `Ok(_)` containing a [VarUInt] representation of the value's length and consumes any
    /// additional bytes read. If no additional bytes were read, the returned `VarUInt`'s
    /// `size_in_bytes()` method will return `0`.
    pub fn read_value_length(&mut self, header: TypeDescriptor) -> IonResult<VarUInt> {
        let length = match header.inline_length() {
            Some(length) => VarUInt::new(length, 0),
            None => self.read_var_uint()?,
        };

        // After we get the length, perform some type-specific validation.
        match header.ion_type {
            Some(IonType::Timestamp) if !header.is_null() && length.value() <= 1 => {
                return decoding_error("found a timestamp with length <= 1")
            }
            Some(IonType::Struct) if header.is_ordered_struct() && length.value() == 0 => {
                return decoding_error("found an empty ordered struct")
            }
            _ => {}
        };

        Ok(length)
    }

    /// Interprets a type descriptor's `L` nibble (length) in the way used by most Ion types.
    ///
    /// If `L` is...
    ///   * `f`: the value is a typed `null` and its length is `0`.
    ///   * `e`: the length is encoded as a `VarUInt` that follows the type descriptor.
    ///   * anything else: the `L` represents the actual length.
    ///
    /// If successful, returns an `Ok(_)` that contains the [VarUInt] representation
    /// of the value's length and consumes any additional bytes read.
    pub fn read_length(&mut self, length_code: u8) -> IonResult<VarUInt> {
        let length = match length_code {
            length_codes::NULL => VarUInt::new(0, 0),
            length_codes::VAR_UINT => self.read_var_uint()?,
            magnitude => VarUInt::new(magnitude as usize, 0),
        };

        Ok(length)
    }
}

/// These methods are only available to `BinaryBuffer`s that wrap a `Vec<u8>`. That is: buffers
/// that own a growable array into which more data can be appended.
impl BinaryBuffer<Vec<u8>> {
    /// Moves any unread bytes to the front of the `Vec<u8>`, making room for more data at the tail.
    /// This should only happen when the bytes remaining in the buffer represent an incomplete
    /// value; as such, the required `memcpy` should typically be quite small.
    fn restack(&mut self) {
        let remaining = self.remaining();
        self.data.copy_within(self.start..self.end, 0);
        self.start = 0;
        self.end = remaining;
        self.data.truncate(remaining);
    }

    /// Copies the provided bytes to end of the input buffer.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.restack();
        self.data.extend_from_slice(bytes);
        self.end += bytes.len();
    }

    /// Tries to read `length` bytes from `source`. Unlike [`append_bytes`](Self::append_bytes),
    /// this method does not do any copying. A slice of the reader's buffer is handed to `source`
    /// so it can be populated directly.
    ///
    /// If successful, returns an `Ok(_)` containing the number of bytes that were actually read.
    pub fn read_from<R: Read>(&mut self, mut source: R, length: usize) -> IonResult<usize> {
        self.restack();
        // Make sure that there are `length` bytes in the `Vec` beyond `self.end`.
        self.data.resize(self.end + length, 0);
        let read_buffer = &mut self.data.as_mut_slice()[self.end..self.end + length];
        let bytes_read = source.read(read_buffer)?;
        self.end += bytes_read;
        // Drop the zeroed tail that `source` did not fill.
        self.data.truncate(self.end);

        Ok(bytes_read)
    }
}

/// Constructs a [BinaryBuffer] from anything that can be viewed as a slice of bytes, including
/// `&[u8]`, `Vec<u8>`, etc.
impl<A: AsRef<[u8]>> From<A> for BinaryBuffer<A> {
    fn from(data: A) -> Self {
        BinaryBuffer::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IonError;
    use num_traits::Num;

    fn input_test<I: AsRef<[u8]> + Into<BinaryBuffer<I>>>(input: I) {
        let mut input = input.into();
        // We can peek at the first byte...
        assert_eq!(input.peek_next_byte(), Some(b'f'));
        // ...without modifying the input. Looking at the next 3 bytes still includes 'f'.
        assert_eq!(input.peek_n_bytes(3), Some("foo".as_bytes()));
        // Advancing the cursor by 1...
        input.consume(1);
        // ...causes next_byte() to return 'o'.
        assert_eq!(input.peek_next_byte(), Some(b'o'));
        input.consume(2);
        assert_eq!(input.peek_n_bytes(2), Some(" b".as_bytes()));
        assert_eq!(input.peek_n_bytes(60), None);
    }

    #[test]
    fn slice_test() {
        input_test("foo bar baz".as_bytes());
    }

    #[test]
    fn vec_test() {
        input_test(Vec::from("foo bar baz".as_bytes()));
    }

    #[test]
    fn absolute_offsets_survive_restacking() {
        let mut buffer = BinaryBuffer::new(vec![1u8, 2, 3, 4]);
        buffer.consume(3);
        buffer.append_bytes(&[5, 6]);
        assert_eq!(buffer.total_consumed(), 3);
        assert_eq!(buffer.available_end(), 6);
        assert_eq!(buffer.bytes(), &[4, 5, 6]);
        assert_eq!(buffer.bytes_at(4, 6), Some([5u8, 6].as_slice()));
        // Discarded by the restack.
        assert_eq!(buffer.bytes_at(2, 4), None);
        // Not appended yet.
        assert_eq!(buffer.bytes_at(5, 7), None);
    }

    #[test]
    fn read_from_source() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(vec![0xAAu8]);
        let source: &[u8] = &[1, 2, 3];
        assert_eq!(buffer.read_from(source, 8)?, 3);
        assert_eq!(buffer.bytes(), &[0xAA, 1, 2, 3]);
        assert_eq!(buffer.remaining(), 4);
        Ok(())
    }

    #[test]
    fn read_ivm() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0xE0, 0x01, 0x00, 0xEA, 0x20]);
        assert_eq!(buffer.read_ivm()?, (1, 0));
        assert_eq!(buffer.remaining(), 1);

        let mut buffer = BinaryBuffer::new(&[0xE0, 0x01, 0x00]);
        assert!(matches!(buffer.read_ivm(), Err(IonError::Incomplete(_))));

        let mut buffer = BinaryBuffer::new(&[0xE0, 0x01, 0x00, 0xEB]);
        assert!(matches!(buffer.read_ivm(), Err(IonError::Decoding(_))));
        Ok(())
    }

    #[test]
    fn read_var_uint() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0b0111_1001, 0b0000_1111, 0b1000_0001]);
        let var_uint = buffer.read_var_uint()?;
        assert_eq!(3, var_uint.size_in_bytes());
        assert_eq!(1_984_385, var_uint.value());
        Ok(())
    }

    #[test]
    fn read_var_uint_zero() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0b1000_0000]);
        let var_uint = buffer.read_var_uint()?;
        assert_eq!(var_uint.size_in_bytes(), 1);
        assert_eq!(var_uint.value(), 0);
        Ok(())
    }

    #[test]
    fn read_incomplete_var_uint() {
        let mut buffer = BinaryBuffer::new(&[0b0111_1001, 0b0000_1111]);
        match buffer.read_var_uint() {
            Err(IonError::Incomplete(e)) => assert_eq!(e.position(), 2),
            other => panic!("expected IonError::Incomplete, but found: {other:?}"),
        }
        // A failed read consumes nothing.
        assert_eq!(buffer.total_consumed(), 0);
    }

    #[test]
    fn read_var_uint_overflow_detection() {
        let mut buffer = BinaryBuffer::new(&[0b0111_1111; 10]);
        match buffer.read_var_uint() {
            Err(IonError::Decoding(_)) => {}
            other => panic!("expected IonError::Decoding, but found: {other:?}"),
        }
    }

    #[test]
    fn read_var_int_zero() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0b1000_0000]);
        let var_int = buffer.read_var_int()?;
        assert_eq!(var_int.size_in_bytes(), 1);
        assert_eq!(var_int.value(), 0);
        assert!(!var_int.is_negative_zero());
        Ok(())
    }

    #[test]
    fn read_var_int_negative_zero() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0b1100_0000]);
        let var_int = buffer.read_var_int()?;
        assert!(var_int.is_negative_zero());
        Ok(())
    }

    #[test]
    fn read_negative_var_int() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0b0111_1001, 0b0000_1111, 0b1000_0001]);
        let var_int = buffer.read_var_int()?;
        assert_eq!(var_int.size_in_bytes(), 3);
        assert_eq!(var_int.value(), -935_809);
        Ok(())
    }

    #[test]
    fn read_positive_var_int() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0b0011_1001, 0b0000_1111, 0b1000_0001]);
        let var_int = buffer.read_var_int()?;
        assert_eq!(var_int.size_in_bytes(), 3);
        assert_eq!(var_int.value(), 935_809);
        Ok(())
    }

    #[test]
    fn read_var_int_overflow_detection() {
        let mut buffer = BinaryBuffer::new(&[0b0111_1111; 10]);
        buffer
            .read_var_int()
            .expect_err("This should have failed due to overflow.");
    }

    #[test]
    fn read_three_byte_uint() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0b0011_1100, 0b1000_0111, 0b1000_0001]);
        let uint = buffer.read_uint(buffer.remaining())?;
        assert_eq!(uint.size_in_bytes(), 3);
        assert_eq!(uint.value(), &UInt::U64(3_966_849));
        Ok(())
    }

    #[test]
    fn read_ten_byte_uint() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(vec![0xFFu8; 10]);
        let uint = buffer.read_uint(buffer.remaining())?;
        assert_eq!(uint.size_in_bytes(), 10);
        assert_eq!(
            uint.value(),
            &UInt::BigUInt(BigUint::from_str_radix("ffffffffffffffffffff", 16).unwrap())
        );
        Ok(())
    }

    #[test]
    fn read_uint_too_large() {
        let mut buffer = BinaryBuffer::new(vec![1u8; MAX_UINT_SIZE_IN_BYTES + 1]);
        buffer
            .read_uint(buffer.remaining())
            .expect_err("This exceeded the configured max UInt size.");
    }

    #[test]
    fn read_int_negative_zero() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0b1000_0000]);
        let int = buffer.read_int(buffer.remaining())?;
        assert_eq!(int.size_in_bytes(), 1);
        assert_eq!(int.value(), &Int::I64(0));
        assert!(int.is_negative_zero());
        Ok(())
    }

    #[test]
    fn read_int_length_zero() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[]);
        let int = buffer.read_int(0)?;
        assert_eq!(int.size_in_bytes(), 0);
        assert!(!int.is_negative_zero());
        Ok(())
    }

    #[test]
    fn read_three_byte_negative_int() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0b1011_1100, 0b1000_0111, 0b1000_0001]);
        let int = buffer.read_int(buffer.remaining())?;
        assert_eq!(int.size_in_bytes(), 3);
        assert_eq!(int.value(), &Int::I64(-3_966_849));
        Ok(())
    }

    #[test]
    fn read_nine_byte_negative_int() -> IonResult<()> {
        let mut buffer = BinaryBuffer::new(&[0x80, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        let int = buffer.read_int(buffer.remaining())?;
        assert_eq!(int.value(), &-Int::from(u64::MAX));
        Ok(())
    }

    #[test]
    fn read_value_length_validation() {
        let encoding = EncodingVersion::Ion_1_0;
        // Timestamp whose VarUInt length is 1
        let mut buffer = BinaryBuffer::new(&[0x81]);
        assert!(buffer
            .read_value_length(encoding.type_descriptor(0x6E))
            .is_err());
        // Empty ordered struct
        let mut buffer = BinaryBuffer::new(&[0x80]);
        assert!(buffer
            .read_value_length(encoding.type_descriptor(0xD1))
            .is_err());
        // Ordered struct with a length
        let mut buffer = BinaryBuffer::new(&[0x83]);
        assert_eq!(
            buffer
                .read_value_length(encoding.type_descriptor(0xD1))
                .unwrap()
                .value(),
            3
        );
    }
}
