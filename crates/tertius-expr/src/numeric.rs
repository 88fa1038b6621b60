//! Numbers stored in numeric nodes.
//!
//! A [`Number`] is either an exact rational (backed by `dashu`) or a machine
//! float produced by `evalf`. Mixing the two yields a float.

use dashu::base::{Abs, Inverse, Signed as DashuSigned};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{ExError, Result};

/// A numeric value: exact rational or float.
///
/// Exact rationals are always in lowest terms with a positive denominator.
/// Equality and ordering are structural: `2` and `2.0` are different numbers.
#[derive(Clone)]
pub enum Number {
    /// Arbitrary precision rational.
    Exact(RBig),
    /// Machine float.
    Float(f64),
}

impl Number {
    /// Creates an exact integer.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Number::Exact(RBig::from(IBig::from(value)))
    }

    /// Creates an exact rational `num/den`.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::DivisionByZero`] if `den` is zero.
    pub fn rational(num: i64, den: i64) -> Result<Self> {
        if den == 0 {
            return Err(ExError::DivisionByZero);
        }
        let num = if den < 0 { -IBig::from(num) } else { IBig::from(num) };
        Ok(Number::Exact(RBig::from_parts(
            num,
            UBig::from(den.unsigned_abs()),
        )))
    }

    /// Creates a float.
    #[must_use]
    pub fn float(value: f64) -> Self {
        Number::Float(value)
    }

    /// Returns true for an exact number.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        matches!(self, Number::Exact(_))
    }

    /// Returns true for an exact integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        match self {
            Number::Exact(r) => r.denominator().is_one(),
            Number::Float(_) => false,
        }
    }

    /// Returns true for an exact integer that is even.
    #[must_use]
    pub fn is_even(&self) -> bool {
        match self {
            Number::Exact(r) if r.denominator().is_one() => {
                (r.numerator() % IBig::from(2)).is_zero()
            }
            _ => false,
        }
    }

    /// Returns true for an exact integer that is odd.
    #[must_use]
    pub fn is_odd(&self) -> bool {
        self.is_integer() && !self.is_even()
    }

    /// Returns the sign: -1, 0, or 1. NaN reports 0.
    #[must_use]
    pub fn signum(&self) -> i8 {
        match self {
            Number::Exact(r) => {
                if r.is_zero() {
                    0
                } else if DashuSigned::is_positive(r) {
                    1
                } else {
                    -1
                }
            }
            Number::Float(f) => {
                if *f > 0.0 {
                    1
                } else if *f < 0.0 {
                    -1
                } else {
                    0
                }
            }
        }
    }

    /// Returns true if the number is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.signum() < 0
    }

    /// Returns true if the number is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.signum() > 0
    }

    /// Returns true for exactly minus one.
    #[must_use]
    pub fn is_minus_one(&self) -> bool {
        match self {
            Number::Exact(r) => r.denominator().is_one() && *r.numerator() == IBig::from(-1),
            Number::Float(_) => false,
        }
    }

    /// Converts an exact integer to `i64` if it fits.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Number::Exact(r) if r.denominator().is_one() => r.numerator().clone().try_into().ok(),
            _ => None,
        }
    }

    /// Converts to a float, rounding exact values.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Exact(r) => r.to_f64().value(),
            Number::Float(f) => *f,
        }
    }

    /// Returns the numerator of an exact number.
    #[must_use]
    pub fn numerator(&self) -> Option<IBig> {
        match self {
            Number::Exact(r) => Some(r.numerator().clone()),
            Number::Float(_) => None,
        }
    }

    /// Returns the denominator of an exact number.
    #[must_use]
    pub fn denominator(&self) -> Option<IBig> {
        match self {
            Number::Exact(r) => Some(IBig::from(r.denominator().clone())),
            Number::Float(_) => None,
        }
    }

    /// Converts the number to a float number.
    #[must_use]
    pub fn to_float(&self) -> Self {
        Number::Float(self.to_f64())
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        match self {
            Number::Exact(r) => Number::Exact(r.clone().abs()),
            Number::Float(f) => Number::Float(f.abs()),
        }
    }

    /// Adds two numbers.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Number::Exact(a + b),
            _ => Number::Float(self.to_f64() + other.to_f64()),
        }
    }

    /// Subtracts `other` from `self`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies two numbers.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Number::Exact(a * b),
            _ => Number::Float(self.to_f64() * other.to_f64()),
        }
    }

    /// Negates the number.
    #[must_use]
    pub fn neg(&self) -> Self {
        match self {
            Number::Exact(r) => Number::Exact(-r.clone()),
            Number::Float(f) => Number::Float(-f),
        }
    }

    /// Returns the reciprocal.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::DivisionByZero`] for an exact zero.
    pub fn recip(&self) -> Result<Self> {
        match self {
            Number::Exact(r) if r.is_zero() => Err(ExError::DivisionByZero),
            Number::Exact(r) => Ok(Number::Exact(r.clone().inv())),
            Number::Float(f) => Ok(Number::Float(1.0 / f)),
        }
    }

    /// Divides `self` by `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::DivisionByZero`] if `other` is an exact zero.
    pub fn div(&self, other: &Self) -> Result<Self> {
        Ok(self.mul(&other.recip()?))
    }

    /// Raises to an integer power.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::DivisionByZero`] for zero raised to a negative power.
    pub fn powi(&self, exp: i64) -> Result<Self> {
        match self {
            Number::Exact(r) => {
                let magnitude = usize::try_from(exp.unsigned_abs())
                    .map_err(|_| ExError::InvalidArgument(format!("exponent {exp} too large")))?;
                let raised = Number::Exact(r.pow(magnitude));
                if exp < 0 {
                    raised.recip()
                } else {
                    Ok(raised)
                }
            }
            Number::Float(f) => {
                let exp = i32::try_from(exp)
                    .map_err(|_| ExError::InvalidArgument(format!("exponent {exp} too large")))?;
                Ok(Number::Float(f.powi(exp)))
            }
        }
    }

    /// Raises to a numeric power if the result is representable.
    ///
    /// Exact bases with integer exponents stay exact, float operands use
    /// `powf`. Exact bases with fractional exponents return `None` so the
    /// power can stay symbolic.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::DivisionByZero`] for an exact zero raised to a
    /// negative power.
    pub fn pow(&self, exp: &Self) -> Result<Option<Self>> {
        if let Some(n) = exp.to_i64() {
            return self.powi(n).map(Some);
        }
        match (self, exp) {
            (Number::Exact(_), Number::Exact(_)) => Ok(None),
            _ => Ok(Some(Number::Float(self.to_f64().powf(exp.to_f64())))),
        }
    }

    /// Symmetric remainder modulo `xi`, in `(-xi/2, xi/2]`.
    ///
    /// Only exact integers are reduced; everything else is returned as is.
    #[must_use]
    pub fn smod(&self, xi: &Self) -> Self {
        let (Some(a), Some(m)) = (self.integer_value(), xi.integer_value()) else {
            return self.clone();
        };
        if m.is_zero() {
            return self.clone();
        }
        let m = m.abs();
        let mut r = &a % &m;
        if DashuSigned::is_negative(&r) {
            r += &m;
        }
        let half = &m / IBig::from(2);
        if r > half {
            r -= &m;
        }
        Number::Exact(RBig::from(r))
    }

    /// Greatest common divisor of two exact rationals: the gcd of the
    /// numerators over the lcm of the denominators. Always non-negative.
    /// Floats have no content and give one.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        let (Number::Exact(a), Number::Exact(b)) = (self, other) else {
            return Number::one();
        };
        let num = gcd_ibig(a.numerator(), b.numerator());
        let (da, db) = (IBig::from(a.denominator().clone()), IBig::from(b.denominator().clone()));
        let lcm = &da / gcd_ibig(&da, &db) * &db;
        Number::Exact(RBig::from(num) / RBig::from(lcm))
    }

    fn integer_value(&self) -> Option<IBig> {
        match self {
            Number::Exact(r) if r.denominator().is_one() => Some(r.numerator().clone()),
            _ => None,
        }
    }

    /// Total structural order: every exact number sorts before every float.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => a.cmp(b),
            (Number::Float(a), Number::Float(b)) => a.total_cmp(b),
            (Number::Exact(_), Number::Float(_)) => Ordering::Less,
            (Number::Float(_), Number::Exact(_)) => Ordering::Greater,
        }
    }
}

fn gcd_ibig(a: &IBig, b: &IBig) -> IBig {
    let (mut a, mut b) = (a.clone(), b.clone());
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a.abs()
}

impl Zero for Number {
    fn zero() -> Self {
        Number::Exact(RBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_zero(),
            Number::Float(f) => *f == 0.0,
        }
    }
}

impl One for Number {
    fn one() -> Self {
        Number::Exact(RBig::ONE)
    }

    fn is_one(&self) -> bool {
        match self {
            Number::Exact(r) => *r == RBig::ONE,
            Number::Float(f) => *f == 1.0,
        }
    }
}

impl std::ops::Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Self) -> Self::Output {
        Number::mul(&self, &rhs)
    }
}

impl std::ops::Add for Number {
    type Output = Number;

    fn add(self, rhs: Self) -> Self::Output {
        Number::add(&self, &rhs)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Number::Exact(r) => {
                0u8.hash(state);
                r.hash(state);
            }
            Number::Float(f) => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<IBig> for Number {
    fn from(value: IBig) -> Self {
        Number::Exact(RBig::from(value))
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Exact(_) => write!(f, "Number({self})"),
            Number::Float(x) => write!(f, "Number({x:?})"),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Exact(r) => {
                if r.denominator().is_one() {
                    write!(f, "{}", r.numerator())
                } else {
                    write!(f, "{}/{}", r.numerator(), r.denominator())
                }
            }
            Number::Float(x) => write!(f, "{x:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Number {
        Number::rational(n, d).unwrap()
    }

    #[test]
    fn test_rational_normalizes() {
        assert_eq!(q(2, 4), q(1, 2));
        assert_eq!(q(1, -2), q(-1, 2));
        assert_eq!(q(6, 3), Number::integer(2));
        assert!(q(6, 3).is_integer());
        let big = q(i64::MIN, -1);
        assert_eq!(big, Number::from(-IBig::from(i64::MIN)));
        assert!(big.is_positive());
        assert_eq!(Number::rational(1, 0), Err(ExError::DivisionByZero));
    }

    #[test]
    fn test_gcd_of_rationals() {
        assert_eq!(Number::integer(12).gcd(&Number::integer(-18)), Number::integer(6));
        assert_eq!(q(2, 3).gcd(&q(4, 9)), q(2, 9));
        assert_eq!(Number::integer(0).gcd(&q(-3, 4)), q(3, 4));
        assert_eq!(Number::float(2.0).gcd(&Number::integer(4)), Number::integer(1));
    }

    #[test]
    fn test_exact_and_float_differ() {
        assert_ne!(Number::integer(2), Number::float(2.0));
        assert_eq!(
            Number::integer(2).compare(&Number::float(-100.0)),
            Ordering::Less
        );
        assert_eq!(Number::integer(2).add(&Number::float(0.5)), Number::float(2.5));
    }

    #[test]
    fn test_powers() {
        assert_eq!(Number::integer(2).powi(10).unwrap(), Number::integer(1024));
        assert_eq!(Number::integer(2).powi(-2).unwrap(), q(1, 4));
        assert_eq!(Number::zero().powi(-1), Err(ExError::DivisionByZero));
        assert_eq!(Number::integer(2).pow(&q(1, 2)).unwrap(), None);
        assert_eq!(
            Number::float(4.0).pow(&q(1, 2)).unwrap(),
            Some(Number::float(2.0))
        );
    }

    #[test]
    fn test_parity_and_sign() {
        assert!(Number::integer(4).is_even());
        assert!(Number::integer(-3).is_odd());
        assert!(!q(1, 2).is_even());
        assert!(!q(1, 2).is_odd());
        assert!(Number::integer(-1).is_minus_one());
        assert_eq!(Number::float(-0.5).signum(), -1);
    }

    #[test]
    fn test_smod_symmetric() {
        let seven = Number::integer(7);
        assert_eq!(Number::integer(5).smod(&seven), Number::integer(-2));
        assert_eq!(Number::integer(3).smod(&seven), Number::integer(3));
        assert_eq!(Number::integer(-10).smod(&seven), Number::integer(-3));
        assert_eq!(q(1, 2).smod(&seven), q(1, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(q(-3, 4).to_string(), "-3/4");
        assert_eq!(Number::integer(12).to_string(), "12");
        assert_eq!(Number::float(2.0).to_string(), "2.0");
    }
}
