//! Types related to [`Decimal`], the in-memory representation of an Ion decimal value.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Neg;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};

use crate::result::{illegal_operation, IonError};
use crate::types::{Coefficient, Sign, UInt};

/// An arbitrary-precision Decimal type with a distinct representation of negative zero (`-0`).
///
/// A `Decimal` can be thought of as a `(coefficient, exponent)` pair, and its value can be
/// calculated using the formula `coefficient * 10^exponent`.
///
/// `==` and [`Ord`] compare numeric values, so `1.0` equals `1.00` and `-0.` equals `0.`.
/// Use [`Decimal::ion_eq`] when the precision and the sign of zero matter.
///
/// ```
/// use ion_continuable::{Decimal, Sign, UInt};
/// // Equivalent to: 1225 * 10^-2, or 12.25
/// let decimal = Decimal::new(1225, -2);
/// assert_eq!(decimal.coefficient().sign(), Sign::Positive);
/// assert_eq!(decimal.coefficient().magnitude(), &UInt::from(1225u64));
/// assert_eq!(decimal.exponent(), -2);
/// assert_eq!(decimal.scale(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Decimal {
    pub(crate) coefficient: Coefficient,
    pub(crate) exponent: i64,
}

impl Decimal {
    /// Constructs a new Decimal with the provided components. The value of the decimal is:
    ///    `coefficient * 10^exponent`
    pub fn new<C: Into<Coefficient>, E: Into<i64>>(coefficient: C, exponent: E) -> Decimal {
        Decimal {
            coefficient: coefficient.into(),
            exponent: exponent.into(),
        }
    }

    /// Returns this `Decimal`'s coefficient.
    pub fn coefficient(&self) -> &Coefficient {
        &self.coefficient
    }

    /// Returns this `Decimal`'s exponent.
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Returns the scale of the Decimal value: the negated exponent. A positive scale is the
    /// number of digits to the right of the decimal point.
    pub fn scale(&self) -> i64 {
        self.exponent.neg()
    }

    /// Returns the sign of the coefficient. This is the only way to tell `-0` from `0`.
    pub fn sign(&self) -> Sign {
        self.coefficient.sign()
    }

    /// Returns the number of digits in the non-scaled integer representation of the decimal.
    pub fn precision(&self) -> u64 {
        self.coefficient.number_of_decimal_digits()
    }

    /// Constructs a Decimal with the value `-0d0`. Rust ignores a unary minus applied to a zero
    /// literal, so negative zero needs its own constructor.
    pub fn negative_zero() -> Decimal {
        Decimal::negative_zero_with_exponent(0)
    }

    /// Constructs a Decimal with a coefficient of `-0` and the specified exponent.
    pub fn negative_zero_with_exponent(exponent: i64) -> Decimal {
        Decimal {
            coefficient: Coefficient::negative_zero(),
            exponent,
        }
    }

    /// Returns `true` if this Decimal is a zero of any sign or exponent.
    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    /// Returns `true` if this Decimal is zero with a negative sign.
    pub fn is_negative_zero(&self) -> bool {
        self.coefficient.is_negative_zero()
    }

    /// Returns true if this Decimal's coefficient has a negative sign AND a magnitude greater than
    /// zero. Otherwise, returns false. (Negative zero returns false.)
    pub fn is_less_than_zero(&self) -> bool {
        self.coefficient.is_negative() && !self.coefficient.is_zero()
    }

    /// Returns `true` if this Decimal is numerically >= 1.
    pub(crate) fn is_greater_than_or_equal_to_one(&self) -> bool {
        !self.coefficient.is_negative() && *self >= Decimal::new(1, 0)
    }

    /// Compares the representations of two decimals: same sign, same coefficient magnitude and
    /// same exponent. `1.0` and `1.00` are not `ion_eq`, nor are `0.` and `-0.`.
    pub fn ion_eq(&self, other: &Decimal) -> bool {
        self.exponent == other.exponent && self.coefficient == other.coefficient
    }

    // Compare the magnitudes (absolute values) of the provided decimal values.
    fn compare_magnitudes(d1: &Decimal, d2: &Decimal) -> Ordering {
        if d1.exponent == d2.exponent {
            return d1.coefficient.magnitude().cmp(d2.coefficient.magnitude());
        }
        // Scale up the coefficient with the larger exponent so both share the smaller exponent.
        // For example, 16e3 and 1600e1 compare as 1600 and 1600.
        if d1.exponent > d2.exponent {
            Self::compare_scaled_coefficients(d1, d2)
        } else {
            Self::compare_scaled_coefficients(d2, d1).reverse()
        }
    }

    // `d1` must have a larger exponent than `d2`.
    fn compare_scaled_coefficients(d1: &Decimal, d2: &Decimal) -> Ordering {
        let exponent_delta = d1.exponent.abs_diff(d2.exponent);
        // If the delta is wider than the smaller coefficient's digit count, the scaled value
        // dwarfs it unless the larger-exponent coefficient is zero.
        if exponent_delta > d2.precision() + 1 {
            return if d1.coefficient.is_zero() {
                if d2.coefficient.is_zero() {
                    Ordering::Equal
                } else {
                    Ordering::Less
                }
            } else {
                Ordering::Greater
            };
        }
        let magnitude: BigUint = d1.coefficient.magnitude().clone().into();
        let scaled = magnitude * BigUint::from(10u32).pow(exponent_delta as u32);
        UInt::from(scaled).cmp(d2.coefficient.magnitude())
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_zero() && other.is_zero() {
            // Ignore the sign/exponent if they're both some flavor of zero.
            return Ordering::Equal;
        }
        // Zero has no sign for ordering purposes; treat it as positive.
        let sign = |d: &Decimal| {
            if d.is_zero() {
                Sign::Positive
            } else {
                d.sign()
            }
        };
        let sign_cmp = sign(self).cmp(&sign(other));
        if sign_cmp != Ordering::Equal {
            return sign_cmp;
        }
        let ordering = Decimal::compare_magnitudes(self, other);
        match sign(self) {
            Sign::Positive => ordering,
            // -100 has a greater magnitude than -99, but -99 is the larger number.
            Sign::Negative => ordering.reverse(),
        }
    }
}

macro_rules! impl_decimal_from_integer {
    ($($t:ty),*) => ($(
        impl From<$t> for Decimal {
            fn from(value: $t) -> Self {
                Decimal::new(value, 0)
            }
        }
    )*)
}
impl_decimal_from_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl TryFrom<&Decimal> for BigDecimal {
    type Error = IonError;

    /// Attempts to create a BigDecimal from a Decimal. Returns an Error if the Decimal being
    /// converted is a negative zero, which BigDecimal cannot represent.
    fn try_from(value: &Decimal) -> Result<Self, Self::Error> {
        if value.is_negative_zero() {
            return illegal_operation("cannot convert negative zero Decimal to BigDecimal");
        }
        let coefficient = BigInt::try_from(&value.coefficient)?;
        // BigDecimal uses 'scale' rather than 'exponent' in its API.
        Ok(BigDecimal::new(coefficient, value.scale()))
    }
}

impl TryFrom<Decimal> for BigDecimal {
    type Error = IonError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        BigDecimal::try_from(&value)
    }
}

impl From<BigDecimal> for Decimal {
    fn from(value: BigDecimal) -> Self {
        // From the BigDecimal docs: "a positive exponent indicates a negative power of 10."
        let (coefficient, scale) = value.into_bigint_and_exponent();
        Decimal::new(coefficient, scale.neg())
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.coefficient, self.exponent)
    }
}

#[cfg(test)]
mod decimal_tests {
    use super::*;
    use crate::IonResult;
    use rstest::*;
    use std::str::FromStr;

    #[rstest]
    #[case(Decimal::new(80, 2), Decimal::new(8, 3), Ordering::Equal)]
    #[case(Decimal::new(10, 0), Decimal::new(100, -1), Ordering::Equal)]
    #[case(Decimal::new(-1, 3), Decimal::new(-10, 2), Ordering::Equal)]
    #[case(Decimal::new(1, 0), Decimal::new(2, 0), Ordering::Less)]
    #[case(Decimal::new(-1, 0), Decimal::new(-2, 0), Ordering::Greater)]
    #[case(Decimal::new(-5, 0), Decimal::new(0, 0), Ordering::Less)]
    #[case(Decimal::new(1, 100), Decimal::new(99, 0), Ordering::Greater)]
    #[case(Decimal::new(0, 100), Decimal::new(1, 0), Ordering::Less)]
    #[case(Decimal::negative_zero(), Decimal::new(0, 3), Ordering::Equal)]
    #[case(Decimal::negative_zero(), Decimal::new(-1, -2), Ordering::Greater)]
    fn numeric_ordering(#[case] d1: Decimal, #[case] d2: Decimal, #[case] expected: Ordering) {
        assert_eq!(d1.cmp(&d2), expected);
        assert_eq!(d2.cmp(&d1), expected.reverse());
    }

    #[test]
    fn ion_eq_distinguishes_representation() {
        assert_eq!(Decimal::new(10, -1), Decimal::new(100, -2));
        assert!(!Decimal::new(10, -1).ion_eq(&Decimal::new(100, -2)));
        assert_eq!(Decimal::negative_zero(), Decimal::new(0, 0));
        assert!(!Decimal::negative_zero().ion_eq(&Decimal::new(0, 0)));
        assert!(Decimal::negative_zero().ion_eq(&Decimal::negative_zero_with_exponent(0)));
    }

    #[test]
    fn negative_zero_queries() {
        let negative_zero = Decimal::negative_zero_with_exponent(-3);
        assert!(negative_zero.is_zero());
        assert!(negative_zero.is_negative_zero());
        assert!(!negative_zero.is_less_than_zero());
        assert_eq!(negative_zero.sign(), Sign::Negative);
        assert_eq!(negative_zero.scale(), 3);
    }

    #[rstest]
    #[case(Decimal::new(1, 0), true)]
    #[case(Decimal::new(999, -3), false)]
    #[case(Decimal::new(1000, -3), true)]
    #[case(Decimal::new(-5, 0), false)]
    fn greater_than_or_equal_to_one(#[case] value: Decimal, #[case] expected: bool) {
        assert_eq!(value.is_greater_than_or_equal_to_one(), expected);
    }

    #[test]
    fn big_decimal_conversion() -> IonResult<()> {
        let decimal = Decimal::new(-1225, -2);
        let big_decimal = BigDecimal::try_from(&decimal)?;
        assert_eq!(big_decimal, BigDecimal::from_str("-12.25").unwrap());
        let round_tripped: Decimal = big_decimal.into();
        assert!(round_tripped.ion_eq(&decimal));
        assert!(BigDecimal::try_from(Decimal::negative_zero()).is_err());
        Ok(())
    }

    #[test]
    fn display() {
        assert_eq!(Decimal::new(-1225, -2).to_string(), "-1225d-2");
        assert_eq!(Decimal::negative_zero().to_string(), "-0d0");
    }
}
