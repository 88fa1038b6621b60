//! Truncated Taylor series.

use num_traits::One;

use crate::error::{ExError, Result};
use crate::eval::{self, function};
use crate::ex::Ex;
use crate::flags::{SeriesOptions, SubsOptions};
use crate::flyweight::{ex0, ex_1};
use crate::kind::TypeTag;
use crate::node::{FunctionId, RelOp};
use crate::numeric::Number;

/// Splits `x == p` (or a bare `x`) into the variable and the point.
fn expansion_point(rel: &Ex) -> Result<(Ex, Ex)> {
    match rel.tag() {
        TypeTag::Symbol => Ok((rel.clone(), ex0())),
        TypeTag::Relational => {
            let r = crate::cast::ex_to::<crate::kind::Relational>(rel);
            if r.operator() == RelOp::Equal && r.lhs().tag() == TypeTag::Symbol {
                Ok((r.lhs().clone(), r.rhs().clone()))
            } else {
                Err(ExError::InvalidArgument(format!(
                    "series point must be `symbol == value`, got {rel}"
                )))
            }
        }
        _ => Err(ExError::InvalidArgument(format!(
            "series point must be a symbol or an equation, got {rel}"
        ))),
    }
}

/// Value of `e` at `x = point`.
fn value_at(e: &Ex, x: &Ex, point: &Ex, options: SeriesOptions) -> Result<Ex> {
    if !options.contains(SeriesOptions::SUPPRESS_BRANCHCUT) {
        let logs = e.find(&Ex::function(FunctionId::Log, Ex::wild(0))?);
        for log in logs {
            let arg = log
                .op(0)
                .subs_lists(std::slice::from_ref(x), std::slice::from_ref(point), SubsOptions::NO_PATTERN)
                .map_err(|err| pole(&err, x, point))?;
            if arg.as_number().is_some_and(Number::is_negative) {
                return Err(ExError::Series(format!(
                    "{log} has a branch cut at {x} == {point}"
                )));
            }
        }
    }
    e.subs_lists(
        std::slice::from_ref(x),
        std::slice::from_ref(point),
        SubsOptions::NO_PATTERN,
    )
    .map_err(|err| pole(&err, x, point))
}

fn pole(err: &ExError, x: &Ex, point: &Ex) -> ExError {
    match err {
        ExError::DivisionByZero => ExError::Series(format!("pole at {x} == {point}")),
        other => other.clone(),
    }
}

/// Taylor expansion of `e` up to, not including, `order`.
pub(crate) fn series(e: &Ex, rel: &Ex, order: i32, options: SeriesOptions) -> Result<Ex> {
    let (x, point) = expansion_point(rel)?;
    if order < 0 {
        return Err(ExError::InvalidArgument(format!(
            "series order must be non-negative, got {order}"
        )));
    }
    let shift = eval::add([x.clone(), eval::mul([ex_1(), point.clone()])?]);

    let mut terms = Vec::new();
    let mut derivative = e.clone();
    let mut factorial = Number::one();
    let mut exact = false;
    for k in 0..order {
        if k > 0 {
            derivative = derivative.diff(&x, 1)?;
            factorial = factorial.mul(&Number::integer(i64::from(k)));
        }
        if derivative.is_zero() {
            exact = true;
            break;
        }
        let value = value_at(&derivative, &x, &point, options)?;
        if value.is_zero() {
            continue;
        }
        let coeff = eval::mul([value, Ex::number(factorial.recip()?)])?;
        terms.push(eval::mul([coeff, eval::power(shift.clone(), Ex::from(k))?])?);
    }
    if !exact {
        let next = if order == 0 {
            derivative
        } else {
            derivative.diff(&x, 1)?
        };
        if !next.is_zero() {
            let remainder = eval::power(shift, Ex::from(order))?;
            terms.push(function(FunctionId::Order, remainder)?);
        }
    }
    tracing::debug!(order, terms = terms.len(), exact, "series truncated");
    Ok(eval::add(terms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{cos, exp, log, order, pow, sin};

    #[test]
    fn test_exponential_at_zero() {
        let x = Ex::symbol("x");
        let s = exp(&x).series(&x, 3, SeriesOptions::empty()).unwrap();
        let expected = 1 + &x + pow(&x, 2) / 2 + order(pow(&x, 3));
        assert_eq!(s, expected);
    }

    #[test]
    fn test_polynomial_series_is_exact() {
        let x = Ex::symbol("x");
        let p = pow(&x, 2) + 1;
        let s = p.series(&x, 5, SeriesOptions::empty()).unwrap();
        assert_eq!(s, p);
        assert!(!s.has(&order(Ex::wild(0))));
    }

    #[test]
    fn test_expansion_point_shift() {
        let x = Ex::symbol("x");
        let s = pow(&x, 2)
            .series(&Ex::equation(x.clone(), 1), 2, SeriesOptions::empty())
            .unwrap();
        let shifted = &x - 1;
        let expected = 1 + 2 * &shifted + order(pow(&shifted, 2));
        assert_eq!(s, expected);
    }

    #[test]
    fn test_sine_skips_zero_terms() {
        let x = Ex::symbol("x");
        let s = sin(&x).series(&x, 4, SeriesOptions::empty()).unwrap();
        let expected = &x - pow(&x, 3) / 6 + order(pow(&x, 4));
        assert_eq!(s, expected);
        let c = cos(&x).series(&x, 1, SeriesOptions::empty()).unwrap();
        assert_eq!(c, 1 + order(&x));
    }

    #[test]
    fn test_pole_is_an_error() {
        let x = Ex::symbol("x");
        let e = pow(&x, -1);
        assert!(matches!(
            e.series(&x, 2, SeriesOptions::empty()),
            Err(ExError::Series(_))
        ));
    }

    #[test]
    fn test_branch_cut() {
        let x = Ex::symbol("x");
        let e = log(&x - 1);
        let err = e.series(&x, 2, SeriesOptions::empty()).unwrap_err();
        assert!(matches!(err, ExError::Series(ref msg) if msg.contains("branch cut")));
        let s = e.series(&x, 2, SeriesOptions::SUPPRESS_BRANCHCUT).unwrap();
        assert!(s.has(&log(Ex::from(-1))));
    }

    #[test]
    fn test_bad_point() {
        let x = Ex::symbol("x");
        assert!(matches!(
            x.series(&Ex::from(1), 2, SeriesOptions::empty()),
            Err(ExError::InvalidArgument(_))
        ));
    }
}
