use crate::result::{decoding_error, IonError};
use num_bigint::{BigInt, BigUint, Sign as BigSign};
use num_traits::{ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// The cheapest in-memory representation that can hold a given integer value.
///
/// The scalar decoder reports this before materializing an integer so that callers can avoid
/// allocating a [`BigInt`] when a machine word will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntegerSize {
    /// The value fits in an `i32`.
    I32,
    /// The value fits in an `i64` but not in an `i32`.
    I64,
    /// The value requires arbitrary precision.
    BigInt,
}

/// Represents a UInt of any size. Used for reading binary integer magnitudes and symbol IDs.
/// Also used to represent the unsigned magnitude of Decimal values.
#[derive(Debug, Clone)]
pub enum UInt {
    U64(u64),
    BigUInt(BigUint),
}

impl UInt {
    /// Compares a [u64] integer with a [BigUint]. This method never allocates. It will always
    /// prefer to downgrade the BigUint and compare the two integers as u64 values. If this is
    /// not possible, then the BigUint is larger than the u64.
    fn cross_representation_cmp(m1: u64, m2: &BigUint) -> Ordering {
        if let Some(downgraded_m2) = m2.to_u64() {
            return m1.cmp(&downgraded_m2);
        }
        Ordering::Less
    }

    pub fn is_zero(&self) -> bool {
        match self {
            UInt::U64(value) => *value == 0,
            UInt::BigUInt(value) => value.is_zero(),
        }
    }

    /// Returns the number of digits in the base-10 representation of this value.
    pub(crate) fn number_of_decimal_digits(&self) -> u64 {
        match self {
            UInt::U64(value) => value.checked_ilog10().map(|log| log as u64 + 1).unwrap_or(1),
            UInt::BigUInt(value) => value.to_string().len() as u64,
        }
    }
}

impl PartialEq for UInt {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for UInt {}

impl PartialOrd for UInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UInt {
    fn cmp(&self, other: &Self) -> Ordering {
        use UInt::*;
        match (self, other) {
            (U64(m1), U64(m2)) => m1.cmp(m2),
            (BigUInt(m1), BigUInt(m2)) => m1.cmp(m2),
            (U64(m1), BigUInt(m2)) => UInt::cross_representation_cmp(*m1, m2),
            (BigUInt(m1), U64(m2)) => UInt::cross_representation_cmp(*m2, m1).reverse(),
        }
    }
}

impl From<UInt> for Int {
    fn from(value: UInt) -> Self {
        match value {
            UInt::U64(uint) => match i64::try_from(uint) {
                Ok(signed) => Int::I64(signed),
                // The magnitude needs the 64th bit; up-convert it to a BigInt.
                Err(_) => big_integer_from_u64(uint),
            },
            UInt::BigUInt(big_uint) => big_integer_from_big_uint(big_uint),
        }
    }
}

impl From<BigUint> for UInt {
    fn from(value: BigUint) -> Self {
        // prefer a compact representation for the magnitude
        match value.to_u64() {
            Some(unsigned) => UInt::U64(unsigned),
            None => UInt::BigUInt(value),
        }
    }
}

impl From<UInt> for BigUint {
    fn from(value: UInt) -> Self {
        match value {
            UInt::U64(m) => BigUint::from(m),
            UInt::BigUInt(m) => m,
        }
    }
}

macro_rules! impl_uint_from_small_unsigned_int_types {
    ($($t:ty),*) => ($(
        impl From<$t> for UInt {
            fn from(value: $t) -> UInt {
                UInt::U64(value as u64)
            }
        }
    )*)
}

impl_uint_from_small_unsigned_int_types!(u8, u16, u32, u64, usize);

impl From<u128> for UInt {
    fn from(value: u128) -> UInt {
        match u64::try_from(value) {
            Ok(small) => UInt::U64(small),
            Err(_) => UInt::BigUInt(BigUint::from(value)),
        }
    }
}

#[inline(never)]
fn big_integer_from_u64(value: u64) -> Int {
    Int::BigInt(BigInt::from(value))
}

#[inline(never)]
fn big_integer_from_big_uint(value: BigUint) -> Int {
    Int::BigInt(BigInt::from(value))
}

impl TryFrom<&UInt> for usize {
    type Error = IonError;

    fn try_from(value: &UInt) -> Result<Self, Self::Error> {
        match value {
            UInt::U64(uint) => usize::try_from(*uint).or_else(|_| {
                decoding_error(format!(
                    "unsigned integer {uint} was too large to be represented as a usize"
                ))
            }),
            UInt::BigUInt(big_uint) => usize::try_from(big_uint).or_else(|_| {
                decoding_error(format!(
                    "unsigned integer {big_uint} was too large to be represented as a usize"
                ))
            }),
        }
    }
}

impl Display for UInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match &self {
            UInt::U64(i) => write!(f, "{i}"),
            UInt::BigUInt(i) => write!(f, "{i}"),
        }
    }
}

/// Container for either an integer that can fit in a 64-bit word or an arbitrarily sized
/// [`BigInt`].
#[derive(Debug, Clone)]
pub enum Int {
    I64(i64),
    BigInt(BigInt),
}

impl Int {
    /// Compares an [i64] with a [BigInt] without allocating. A BigInt that cannot be
    /// downgraded to an i64 lies beyond the i64 range on the side indicated by its sign.
    fn cross_representation_cmp(m1: i64, m2: &BigInt) -> Ordering {
        if let Some(downgraded_m2) = m2.to_i64() {
            return m1.cmp(&downgraded_m2);
        }
        match m2.sign() {
            BigSign::Minus => Ordering::Greater,
            _ => Ordering::Less,
        }
    }

    /// Returns the value as an `i64` if it can be represented as such.
    pub fn as_i64(&self) -> Option<i64> {
        match &self {
            Int::I64(i) => Some(*i),
            Int::BigInt(big) => big.to_i64(),
        }
    }

    /// Returns a reference to the wrapped [`BigInt`] if that is how the value is stored.
    pub fn as_big_int(&self) -> Option<&BigInt> {
        match &self {
            Int::I64(_) => None,
            Int::BigInt(big) => Some(big),
        }
    }

    /// Reports the smallest [`IntegerSize`] that can hold this value.
    pub fn size(&self) -> IntegerSize {
        match self.as_i64() {
            Some(value) if i32::try_from(value).is_ok() => IntegerSize::I32,
            Some(_) => IntegerSize::I64,
            None => IntegerSize::BigInt,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Int::I64(value) => *value < 0,
            Int::BigInt(value) => value.sign() == BigSign::Minus,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Int::I64(value) => *value == 0i64,
            Int::BigInt(value) => value.is_zero(),
        }
    }
}

impl PartialEq for Int {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Int {}

impl Neg for Int {
    type Output = Self;

    fn neg(self) -> Self::Output {
        use Int::*;
        match self {
            I64(value) => match value.checked_neg() {
                Some(negated) => I64(negated),
                None => BigInt(-num_bigint::BigInt::from(value)),
            },
            BigInt(value) => {
                let negated = -value;
                // -(2^63) arrives here as the negation of a BigInt magnitude; keep it compact.
                match negated.to_i64() {
                    Some(small) => I64(small),
                    None => BigInt(negated),
                }
            }
        }
    }
}

impl PartialOrd for Int {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Int {
    fn cmp(&self, other: &Self) -> Ordering {
        use Int::*;
        match (self, other) {
            (I64(m1), I64(m2)) => m1.cmp(m2),
            (BigInt(m1), BigInt(m2)) => m1.cmp(m2),
            (I64(m1), BigInt(m2)) => Int::cross_representation_cmp(*m1, m2),
            (BigInt(m1), I64(m2)) => Int::cross_representation_cmp(*m2, m1).reverse(),
        }
    }
}

// Trivial conversion to Int::I64 from integers that can safely be converted to an i64
macro_rules! impl_int_i64_from {
    ($($t:ty),*) => ($(
        impl From<$t> for Int {
            fn from(value: $t) -> Int {
                let i64_value = i64::from(value);
                Int::I64(i64_value)
            }
        }
    )*)
}
impl_int_i64_from!(u8, u16, u32, i8, i16, i32, i64);

// Conversion to Int from integer types that may or may not fit in an i64
macro_rules! impl_int_from {
    ($($t:ty),*) => ($(
        impl From<$t> for Int {
            fn from(value: $t) -> Int {
                match i64::try_from(value) {
                    Ok(i64_value) => Int::I64(i64_value),
                    Err(_) => Int::BigInt(BigInt::from(value))
                }
            }
        }
    )*)
}

impl_int_from!(isize, usize, u64, i128, u128);

impl From<BigUint> for Int {
    fn from(value: BigUint) -> Self {
        UInt::from(value).into()
    }
}

impl From<BigInt> for Int {
    fn from(value: BigInt) -> Self {
        match value.to_i64() {
            Some(small) => Int::I64(small),
            None => Int::BigInt(value),
        }
    }
}

impl From<Int> for BigInt {
    fn from(value: Int) -> Self {
        match value {
            Int::I64(i) => BigInt::from(i),
            Int::BigInt(i) => i,
        }
    }
}

impl Display for Int {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match &self {
            Int::I64(i) => write!(f, "{i}"),
            Int::BigInt(i) => write!(f, "{i}"),
        }
    }
}

#[cfg(test)]
mod integer_tests {
    use num_bigint::BigInt;
    use num_bigint::BigUint;
    // The 'Big' alias helps distinguish between the enum variant and the wrapped numeric type
    use crate::types::Int::{self, BigInt as Big, I64};
    use crate::types::{IntegerSize, UInt};
    use rstest::*;
    use std::cmp::Ordering;

    #[test]
    fn is_zero() {
        assert!(I64(0).is_zero());
        assert!(Big(BigInt::from(0)).is_zero());
        assert!(!I64(55).is_zero());
        assert!(!Big(BigInt::from(-55)).is_zero());
    }

    #[rstest]
    #[case::i64(I64(5), I64(4), Ordering::Greater)]
    #[case::i64_equal(I64(-5), I64(-5), Ordering::Equal)]
    #[case::i64_gt_big_int(I64(4), Big(BigInt::from(3)), Ordering::Greater)]
    #[case::i64_eq_big_int(I64(3), Big(BigInt::from(3)), Ordering::Equal)]
    #[case::i64_lt_big_int(I64(-3), Big(BigInt::from(5)), Ordering::Less)]
    #[case::i64_gt_huge_negative(I64(-3), Big(-BigInt::from(u128::MAX)), Ordering::Greater)]
    #[case::i64_lt_huge_positive(I64(i64::MAX), Big(BigInt::from(u128::MAX)), Ordering::Less)]
    #[case::big_int(Big(BigInt::from(1100)), Big(BigInt::from(-1005)), Ordering::Greater)]
    fn int_ordering(#[case] this: Int, #[case] other: Int, #[case] expected: Ordering) {
        assert_eq!(this.cmp(&other), expected)
    }

    #[rstest]
    #[case::u64(UInt::U64(5), UInt::U64(4), Ordering::Greater)]
    #[case::u64_equal(UInt::U64(5), UInt::U64(5), Ordering::Equal)]
    #[case::u64_lt_big_uint(UInt::U64(2), UInt::BigUInt(BigUint::from(u128::MAX)), Ordering::Less)]
    #[case::u64_eq_big_uint(UInt::U64(3), UInt::BigUInt(BigUint::from(3u64)), Ordering::Equal)]
    #[case::big_uint(
        UInt::BigUInt(BigUint::from(1100u64)),
        UInt::BigUInt(BigUint::from(1005u64)),
        Ordering::Greater
    )]
    fn uint_ordering(#[case] this: UInt, #[case] other: UInt, #[case] expected: Ordering) {
        assert_eq!(this.cmp(&other), expected)
    }

    #[rstest]
    #[case(I64(0), IntegerSize::I32)]
    #[case(I64(i32::MAX as i64), IntegerSize::I32)]
    #[case(I64(i32::MIN as i64), IntegerSize::I32)]
    #[case(I64(i32::MAX as i64 + 1), IntegerSize::I64)]
    #[case(I64(i64::MIN), IntegerSize::I64)]
    #[case(Big(BigInt::from(12)), IntegerSize::I32)]
    #[case(Big(BigInt::from(u64::MAX)), IntegerSize::BigInt)]
    fn integer_size(#[case] value: Int, #[case] expected: IntegerSize) {
        assert_eq!(value.size(), expected);
    }

    #[test]
    fn negating_i64_min_promotes() {
        let negated = -I64(i64::MIN);
        assert_eq!(negated, Big(-BigInt::from(i64::MIN)));
        assert_eq!(negated.size(), IntegerSize::BigInt);
    }

    #[test]
    fn negating_two_to_the_63rd_stays_compact() {
        let magnitude = Int::from(UInt::U64(1u64 << 63));
        assert!(matches!(magnitude, Big(_)));
        assert_eq!(-magnitude, I64(i64::MIN));
    }

    #[rstest]
    #[case(UInt::U64(0), 1)]
    #[case(UInt::U64(9), 1)]
    #[case(UInt::U64(10), 2)]
    #[case(UInt::U64(u64::MAX), 20)]
    #[case(UInt::BigUInt(BigUint::from(u128::MAX)), 39)]
    fn decimal_digits(#[case] value: UInt, #[case] expected: u64) {
        assert_eq!(value.number_of_decimal_digits(), expected);
    }

    #[rstest]
    #[case(I64(-5), "-5")]
    #[case(Big(BigInt::from(1100)), "1100")]
    fn int_display(#[case] value: Int, #[case] expect: &str) {
        assert_eq!(value.to_string(), expect);
    }
}
