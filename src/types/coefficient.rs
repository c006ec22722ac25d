use num_bigint::{BigInt, BigUint};

use crate::result::{illegal_operation, IonError};
use crate::types::{Int, UInt};
use std::fmt::{Display, Formatter};

/// Indicates whether the Coefficient's magnitude is less than 0 (negative) or not (positive).
/// When the magnitude is zero, the Sign can be used to distinguish between -0 and 0.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Sign {
    Negative,
    Positive,
}

/// A signed integer that can be used as the coefficient of a Decimal value. This type does not
/// consider `0` and `-0` to be equal and supports magnitudes of arbitrary size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coefficient {
    pub(crate) sign: Sign,
    pub(crate) magnitude: UInt,
}

impl Coefficient {
    pub(crate) fn new<I: Into<UInt>>(sign: Sign, magnitude: I) -> Self {
        Coefficient {
            sign,
            magnitude: magnitude.into(),
        }
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn magnitude(&self) -> &UInt {
        &self.magnitude
    }

    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Negative
    }

    /// Constructs a new Coefficient that represents negative zero.
    pub(crate) fn negative_zero() -> Self {
        Coefficient {
            sign: Sign::Negative,
            magnitude: UInt::U64(0),
        }
    }

    /// Returns true if the Coefficient represents negative zero.
    pub fn is_negative_zero(&self) -> bool {
        self.sign == Sign::Negative && self.magnitude.is_zero()
    }

    /// Returns true if the Coefficient represents a zero of any sign.
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    pub(crate) fn number_of_decimal_digits(&self) -> u64 {
        self.magnitude.number_of_decimal_digits()
    }
}

macro_rules! impl_coefficient_from_unsigned_int_types {
    ($($t:ty),*) => ($(
        impl From<$t> for Coefficient {
            fn from(value: $t) -> Coefficient {
                Coefficient::new(Sign::Positive, value)
            }
        }
    )*)
}
impl_coefficient_from_unsigned_int_types!(u8, u16, u32, u64, u128, usize, UInt);

macro_rules! impl_coefficient_from_signed_int_types {
    ($($t:ty),*) => ($(
        impl From<$t> for Coefficient {
            fn from(value: $t) -> Coefficient {
                let sign = if value < 0 { Sign::Negative } else { Sign::Positive };
                Coefficient::new(sign, value.unsigned_abs())
            }
        }
    )*)
}
impl_coefficient_from_signed_int_types!(i8, i16, i32, i64, i128, isize);

impl From<BigUint> for Coefficient {
    fn from(value: BigUint) -> Self {
        Coefficient::new(Sign::Positive, UInt::from(value))
    }
}

impl From<BigInt> for Coefficient {
    fn from(value: BigInt) -> Self {
        let (sign, magnitude) = value.into_parts();
        let sign = match sign {
            num_bigint::Sign::Minus => Sign::Negative,
            _ => Sign::Positive,
        };
        Coefficient::new(sign, UInt::from(magnitude))
    }
}

impl From<Int> for Coefficient {
    fn from(value: Int) -> Self {
        match value {
            Int::I64(i) => i.into(),
            Int::BigInt(b) => b.into(),
        }
    }
}

impl TryFrom<&Coefficient> for Int {
    type Error = IonError;

    /// Attempts to convert a [`Coefficient`] to an [`Int`]. This fails for negative zero, which
    /// an `Int` cannot represent.
    fn try_from(value: &Coefficient) -> Result<Self, Self::Error> {
        if value.is_negative_zero() {
            return illegal_operation("cannot convert negative zero Decimal to an Int");
        }
        let magnitude: Int = value.magnitude.clone().into();
        Ok(match value.sign {
            Sign::Positive => magnitude,
            Sign::Negative => -magnitude,
        })
    }
}

impl TryFrom<&Coefficient> for BigInt {
    type Error = IonError;

    fn try_from(value: &Coefficient) -> Result<Self, Self::Error> {
        Int::try_from(value).map(BigInt::from)
    }
}

impl Display for Coefficient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.sign == Sign::Negative {
            write!(f, "-")?;
        }
        write!(f, "{}", self.magnitude)
    }
}
