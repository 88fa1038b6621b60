//! Arithmetic operators and elementary functions on expressions.
//!
//! Operators always produce canonical results and panic when evaluation
//! fails. Division by an exact zero is the common case, but a product can
//! also fail when merging like bases reaches an undefined power, as in
//! `0^x * 0^(-x)`. Use [`Ex::try_div`], [`Ex::try_mul`] or [`Ex::try_pow`]
//! to get a `Result` instead.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::Result;
use crate::eval;
use crate::ex::Ex;
use crate::flyweight::{ex1_2, ex_1};
use crate::node::FunctionId;

#[track_caller]
fn unwrap_op(result: Result<Ex>) -> Ex {
    match result {
        Ok(e) => e,
        Err(err) => panic!("{err}"),
    }
}

fn negate(e: Ex) -> Ex {
    unwrap_op(eval::mul([ex_1(), e]))
}

impl Ex {
    /// `self / rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ExError::DivisionByZero`] if `rhs` is an exact zero.
    pub fn try_div(&self, rhs: impl Into<Ex>) -> Result<Ex> {
        let inverse = eval::power(rhs.into(), ex_1())?;
        eval::mul([self.clone(), inverse])
    }
}

macro_rules! binary_ops {
    ($lhs:ty, $rhs:ty) => {
        impl Add<$rhs> for $lhs {
            type Output = Ex;

            fn add(self, rhs: $rhs) -> Ex {
                eval::add([Ex::from(self), Ex::from(rhs)])
            }
        }

        impl Sub<$rhs> for $lhs {
            type Output = Ex;

            fn sub(self, rhs: $rhs) -> Ex {
                eval::add([Ex::from(self), negate(Ex::from(rhs))])
            }
        }

        impl Mul<$rhs> for $lhs {
            type Output = Ex;

            /// # Panics
            ///
            /// Panics if merging like bases yields an undefined power such
            /// as `0^0`. See [`Ex::try_mul`].
            #[track_caller]
            fn mul(self, rhs: $rhs) -> Ex {
                unwrap_op(eval::mul([Ex::from(self), Ex::from(rhs)]))
            }
        }

        impl Div<$rhs> for $lhs {
            type Output = Ex;

            /// # Panics
            ///
            /// Panics if `rhs` is an exact zero.
            #[track_caller]
            fn div(self, rhs: $rhs) -> Ex {
                unwrap_op(Ex::from(self).try_div(rhs))
            }
        }
    };
}

binary_ops!(Ex, Ex);
binary_ops!(Ex, &Ex);
binary_ops!(&Ex, Ex);
binary_ops!(&Ex, &Ex);

macro_rules! literal_ops {
    ($($lit:ty),*) => {$(
        binary_ops!(Ex, $lit);
        binary_ops!(&Ex, $lit);
        binary_ops!($lit, Ex);
        binary_ops!($lit, &Ex);
    )*};
}

literal_ops!(i32, f64);

impl Neg for Ex {
    type Output = Ex;

    fn neg(self) -> Ex {
        negate(self)
    }
}

impl Neg for &Ex {
    type Output = Ex;

    fn neg(self) -> Ex {
        negate(self.clone())
    }
}

impl<T: Into<Ex>> AddAssign<T> for Ex {
    fn add_assign(&mut self, rhs: T) {
        *self = eval::add([std::mem::take(self), rhs.into()]);
    }
}

impl<T: Into<Ex>> SubAssign<T> for Ex {
    fn sub_assign(&mut self, rhs: T) {
        *self = eval::add([std::mem::take(self), negate(rhs.into())]);
    }
}

impl<T: Into<Ex>> MulAssign<T> for Ex {
    fn mul_assign(&mut self, rhs: T) {
        *self = unwrap_op(eval::mul([std::mem::take(self), rhs.into()]));
    }
}

impl<T: Into<Ex>> DivAssign<T> for Ex {
    #[track_caller]
    fn div_assign(&mut self, rhs: T) {
        *self = unwrap_op(self.try_div(rhs));
    }
}

/// `base^exp`.
///
/// # Panics
///
/// Panics for `0^0` and negative powers of zero; see [`Ex::try_pow`].
#[track_caller]
pub fn pow(base: impl Into<Ex>, exp: impl Into<Ex>) -> Ex {
    unwrap_op(base.into().try_pow(exp))
}

/// Square root, `x^(1/2)`. `sqrt(0)` is `0`.
#[must_use]
pub fn sqrt(x: impl Into<Ex>) -> Ex {
    pow(x, ex1_2())
}

#[track_caller]
fn apply(id: FunctionId, arg: impl Into<Ex>) -> Ex {
    unwrap_op(eval::function(id, arg.into()))
}

/// Sine.
#[must_use]
pub fn sin(x: impl Into<Ex>) -> Ex {
    apply(FunctionId::Sin, x)
}

/// Cosine.
#[must_use]
pub fn cos(x: impl Into<Ex>) -> Ex {
    apply(FunctionId::Cos, x)
}

/// Tangent.
#[must_use]
pub fn tan(x: impl Into<Ex>) -> Ex {
    apply(FunctionId::Tan, x)
}

/// Exponential.
#[must_use]
pub fn exp(x: impl Into<Ex>) -> Ex {
    apply(FunctionId::Exp, x)
}

/// Natural logarithm.
///
/// # Panics
///
/// Panics for an exact zero; use [`Ex::function`] to get a `Result`.
#[must_use]
#[track_caller]
pub fn log(x: impl Into<Ex>) -> Ex {
    apply(FunctionId::Log, x)
}

/// Absolute value.
#[must_use]
pub fn abs(x: impl Into<Ex>) -> Ex {
    apply(FunctionId::Abs, x)
}

/// Order term `O(x)` of a truncated series.
#[must_use]
pub fn order(x: impl Into<Ex>) -> Ex {
    apply(FunctionId::Order, x)
}
