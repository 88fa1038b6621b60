//! Degrees, coefficients and the polynomial test.

use hashbrown::HashMap;
use num_traits::{One, Zero};

use crate::error::{ExError, Result};
use crate::eval;
use crate::ex::Ex;
use crate::flags::{ExpandOptions, Info};
use crate::flyweight::{ex0, ex1, ex_1};
use crate::kind::TypeTag;
use crate::node::NodeData;
use crate::numeric::Number;

/// Integer exponent of a power, `None` when it is not an exact integer.
fn integer_exponent(e: &Ex) -> Result<Option<i32>> {
    match e.as_number() {
        Some(n) if n.is_integer() => n
            .to_i64()
            .and_then(|k| i32::try_from(k).ok())
            .map(Some)
            .ok_or_else(|| ExError::Overflow(format!("exponent {e} exceeds the degree range"))),
        _ => Ok(None),
    }
}

fn non_integer_power(e: &Ex, s: &Ex) -> ExError {
    ExError::Inconsistency(format!("{s} occurs under a non-integer exponent in {e}"))
}

fn degree_overflow(e: &Ex, s: &Ex) -> ExError {
    ExError::Overflow(format!("degree of {e} in {s}"))
}

fn sum_degrees(e: &Ex, s: &Ex, part: fn(&Ex, &Ex) -> Result<i32>) -> Result<i32> {
    e.ops().iter().try_fold(0i32, |acc, f| {
        acc.checked_add(part(f, s)?).ok_or_else(|| degree_overflow(e, s))
    })
}

fn power_degree(e: &Ex, s: &Ex, lowest: bool) -> Result<i32> {
    let (base, exp) = (e.op(0), e.op(1));
    let Some(n) = integer_exponent(&exp)? else {
        return if base.has(s) { Err(non_integer_power(e, s)) } else { Ok(0) };
    };
    // a negative exponent swaps the highest and lowest powers of the base
    let d = if (n >= 0) != lowest { degree(&base, s)? } else { ldegree(&base, s)? };
    d.checked_mul(n).ok_or_else(|| degree_overflow(e, s))
}

/// Highest power of `s` in `e`.
pub(crate) fn degree(e: &Ex, s: &Ex) -> Result<i32> {
    if e.is_equal(s) {
        return Ok(1);
    }
    match e.node().data() {
        NodeData::Add => e.ops().iter().try_fold(i32::MIN, |acc, t| Ok(acc.max(degree(t, s)?))),
        NodeData::Mul => sum_degrees(e, s, degree),
        NodeData::Power => power_degree(e, s, false),
        _ => Ok(0),
    }
}

/// Lowest power of `s` in `e`.
pub(crate) fn ldegree(e: &Ex, s: &Ex) -> Result<i32> {
    if e.is_equal(s) {
        return Ok(1);
    }
    match e.node().data() {
        NodeData::Add => e.ops().iter().try_fold(i32::MAX, |acc, t| Ok(acc.min(ldegree(t, s)?))),
        NodeData::Mul => sum_degrees(e, s, ldegree),
        NodeData::Power => power_degree(e, s, true),
        _ => Ok(0),
    }
}

/// Coefficient of `s^n` in `e`.
pub(crate) fn coeff(e: &Ex, s: &Ex, n: i32) -> Result<Ex> {
    if e.is_equal(s) {
        return Ok(if n == 1 { ex1() } else { ex0() });
    }
    match e.node().data() {
        NodeData::Add => {
            let terms = e
                .ops()
                .iter()
                .map(|t| coeff(t, s, n))
                .collect::<Result<Vec<_>>>()?;
            Ok(eval::add(terms))
        }
        NodeData::Mul if n == 0 => {
            let factors = e
                .ops()
                .iter()
                .map(|f| coeff(f, s, 0))
                .collect::<Result<Vec<_>>>()?;
            eval::mul(factors)
        }
        NodeData::Mul => {
            let mut found = false;
            let mut factors = Vec::with_capacity(e.nops());
            for f in e.ops() {
                let c = coeff(f, s, n)?;
                if c.is_zero() {
                    factors.push(f.clone());
                } else {
                    found = true;
                    factors.push(c);
                }
            }
            if found {
                eval::mul(factors)
            } else {
                Ok(ex0())
            }
        }
        NodeData::Power if e.op(0).is_equal(s) => {
            // non-integer exponents count as degree zero
            match integer_exponent(&e.op(1)) {
                Ok(Some(k)) if k == n => Ok(ex1()),
                Ok(Some(_)) | Err(_) => Ok(ex0()),
                Ok(None) if n == 0 => Ok(e.clone()),
                Ok(None) => Ok(ex0()),
            }
        }
        _ => Ok(if n == 0 { e.clone() } else { ex0() }),
    }
}

// === Numeric content ===

fn term_coefficient(t: &Ex) -> Number {
    t.as_number().cloned().unwrap_or_else(|| eval::split_coeff(t).0)
}

/// Numeric coefficients of the terms of `e`, the constant term included.
fn coefficients(e: &Ex) -> Vec<Number> {
    match e.node().data() {
        NodeData::Add => e.ops().iter().map(term_coefficient).collect(),
        _ => vec![term_coefficient(e)],
    }
}

/// Gcd of the numeric coefficients of an expanded polynomial, as a
/// non-negative rational.
pub(crate) fn integer_content(e: &Ex) -> Number {
    match e.as_number() {
        Some(n) => n.abs(),
        None => coefficients(e)
            .iter()
            .fold(Number::zero(), |acc, c| acc.gcd(c)),
    }
}

/// Largest absolute value among the numeric coefficients of an expanded
/// polynomial.
pub(crate) fn max_coefficient(e: &Ex) -> Number {
    coefficients(e)
        .into_iter()
        .map(|c| c.abs())
        .max_by(Number::compare)
        .unwrap_or_else(Number::one)
}

// === Collection ===

/// Rewrites `e` as a polynomial in `s`, grouping the coefficient of each
/// power. A list of variables collects recursively, so the coefficients of
/// the first variable are collected in the rest, or by whole monomials when
/// `distributed` is set.
pub(crate) fn collect(e: &Ex, s: &Ex, distributed: bool) -> Result<Ex> {
    let collected = match s.tag() {
        TypeTag::Lst if distributed => collect_distributed(e, s.ops())?,
        TypeTag::Lst => collect_recursive(e, s.ops())?,
        _ => collect_recursive(e, std::slice::from_ref(s))?,
    };
    // terms the coefficient walk cannot separate, such as negative powers of sums
    let lost = eval::add([e.clone(), eval::mul([ex_1(), collected.clone()])?]);
    let lost = eval::expand(&lost, ExpandOptions::empty())?;
    Ok(eval::add([collected, lost]))
}

fn collect_recursive(e: &Ex, vars: &[Ex]) -> Result<Ex> {
    let Some((v, rest)) = vars.split_first() else {
        return Ok(e.clone());
    };
    let expanded = eval::expand(e, ExpandOptions::empty())?;
    let (lo, hi) = (ldegree(&expanded, v)?, degree(&expanded, v)?);
    let mut terms = Vec::new();
    for n in lo..=hi {
        let c = coeff(&expanded, v, n)?;
        if !c.is_zero() {
            let c = collect_recursive(&c, rest)?;
            terms.push(eval::mul([c, eval::power(v.clone(), Ex::from(n))?])?);
        }
    }
    Ok(eval::add(terms))
}

fn collect_distributed(e: &Ex, vars: &[Ex]) -> Result<Ex> {
    let expanded = eval::expand(e, ExpandOptions::empty())?;
    let terms = if expanded.tag() == TypeTag::Add {
        expanded.ops().to_vec()
    } else {
        vec![expanded]
    };
    let mut groups: HashMap<Vec<i32>, (Ex, Vec<Ex>)> = HashMap::new();
    for term in terms {
        let mut key = Vec::with_capacity(vars.len());
        let mut monomial = Vec::with_capacity(vars.len());
        let mut rest = vec![term.clone()];
        for v in vars {
            let k = degree(&term, v)?;
            key.push(k);
            monomial.push(eval::power(v.clone(), Ex::from(k))?);
            let inverse = k.checked_neg().ok_or_else(|| degree_overflow(&term, v))?;
            rest.push(eval::power(v.clone(), Ex::from(inverse))?);
        }
        let coefficient = eval::mul(rest)?;
        let monomial = eval::mul(monomial)?;
        groups
            .entry(key)
            .or_insert_with(|| (monomial, Vec::new()))
            .1
            .push(coefficient);
    }
    let terms = groups
        .into_values()
        .map(|(monomial, coeffs)| eval::mul([eval::add(coeffs), monomial]))
        .collect::<Result<Vec<_>>>()?;
    Ok(eval::add(terms))
}

// === Polynomial test ===

/// Returns true if `e` is a polynomial in `var`.
pub(crate) fn is_polynomial(e: &Ex, var: &Ex) -> bool {
    match e.node().data() {
        NodeData::Numeric(_) | NodeData::Symbol(_) => true,
        NodeData::Add | NodeData::Mul => e.ops().iter().all(|op| is_polynomial(op, var)),
        NodeData::Power => {
            let (base, exp) = (e.op(0), e.op(1));
            if !is_polynomial(&base, var) {
                return false;
            }
            if base.has(var) {
                exp.info(Info::NonNegInt)
            } else {
                !exp.has(var)
            }
        }
        _ => !e.has(var) || e.is_equal(var),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{pow, sin, sqrt};

    #[test]
    fn test_degree_and_ldegree() {
        let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
        let p = 3 * pow(&x, 4) * &y + pow(&x, 2) + 5;
        assert_eq!(p.degree(&x), Ok(4));
        assert_eq!(p.ldegree(&x), Ok(0));
        assert_eq!(p.degree(&y), Ok(1));
        let laurent = pow(&x, -2) + &x;
        assert_eq!(laurent.degree(&x), Ok(1));
        assert_eq!(laurent.ldegree(&x), Ok(-2));
    }

    #[test]
    fn test_degree_rejects_fractional_power() {
        let x = Ex::symbol("x");
        let y = Ex::symbol("y");
        assert!(matches!(sqrt(&x).degree(&x), Err(ExError::Inconsistency(_))));
        assert_eq!(sqrt(&y).degree(&x), Ok(0));
    }

    #[test]
    fn test_degree_overflow_is_reported() {
        let x = Ex::symbol("x");
        let big = Ex::from(1i64 << 20);
        let nested = pow(pow(&x, &big) + 1, &big);
        assert!(matches!(nested.degree(&x), Err(ExError::Overflow(_))));
        assert!(matches!(nested.ldegree(&x), Ok(0)));
        let huge = pow(&x, Ex::from(1i64 << 31));
        assert!(matches!(huge.degree(&x), Err(ExError::Overflow(_))));
        assert!(matches!(huge.ldegree(&x), Err(ExError::Overflow(_))));
        assert!(huge.coeff(&x, 1).unwrap().is_zero());
        let half = Ex::from(1i64 << 30);
        let wide = pow(&x, &half) * pow(&x + 1, &half);
        assert!(matches!(wide.degree(&x), Err(ExError::Overflow(_))));
        assert_eq!(wide.ldegree(&x), Ok(1 << 30));
    }

    #[test]
    fn test_coefficients() {
        let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
        let p = 3 * pow(&x, 2) * &y + 2 * &x + 7;
        assert_eq!(p.coeff(&x, 2).unwrap(), 3 * &y);
        assert_eq!(p.coeff(&x, 1).unwrap(), Ex::from(2));
        assert_eq!(p.coeff(&x, 0).unwrap(), Ex::from(7));
        assert!(p.coeff(&x, 5).unwrap().is_zero());
        assert_eq!(p.lcoeff(&x).unwrap(), 3 * &y);
        assert_eq!(p.tcoeff(&x).unwrap(), Ex::from(7));
    }

    #[test]
    fn test_integer_content_and_max_coefficient() {
        let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
        let p = 6 * &x - 4 * pow(&y, 2) + 10;
        assert_eq!(p.integer_content(), Number::integer(2));
        assert_eq!(p.max_coefficient(), Number::integer(10));
        let third = Ex::from(Number::rational(2, 3).unwrap());
        let q = &third * &x + Ex::from(Number::rational(4, 9).unwrap());
        assert_eq!(q.integer_content(), Number::rational(2, 9).unwrap());
        assert_eq!(Ex::from(-5).integer_content(), Number::integer(5));
        assert_eq!(x.integer_content(), Number::integer(1));
        assert_eq!((-7 * &x * &y).max_coefficient(), Number::integer(7));
        assert_eq!(x.max_coefficient(), Number::integer(1));
    }

    #[test]
    fn test_collect_single_variable() {
        let (x, a, b) = (Ex::symbol("x"), Ex::symbol("a"), Ex::symbol("b"));
        let e = &a * &x + &b * &x + pow(&x, 2) + &a * pow(&x, 2) + 3;
        let expected = (&a + &b) * &x + (1 + &a) * pow(&x, 2) + 3;
        assert_eq!(e.collect(&x, false).unwrap(), expected);

        let product = (&x + 1) * (&x + &a);
        let expected = pow(&x, 2) + (1 + &a) * &x + &a;
        assert_eq!(product.collect(&x, false).unwrap(), expected);
        assert!(matches!(sqrt(&x).collect(&x, false), Err(ExError::Inconsistency(_))));
    }

    #[test]
    fn test_collect_variable_lists() {
        let (x, y, a) = (Ex::symbol("x"), Ex::symbol("y"), Ex::symbol("a"));
        let vars = Ex::lst([x.clone(), y.clone()]);
        let e = &x * &y + &x + &a * &x * &y;
        let recursive = e.collect(&vars, false).unwrap();
        assert_eq!(recursive, &x * (1 + (1 + &a) * &y));

        let distributed = e.collect(&vars, true).unwrap();
        assert_eq!(distributed, (1 + &a) * &x * &y + &x);
    }

    #[test]
    fn test_is_polynomial() {
        let (x, s) = (Ex::symbol("x"), Ex::symbol("s"));
        assert!((sin(&x) + 2 * &s).is_polynomial(&s));
        assert!((pow(2, &x) + 2 * &s).is_polynomial(&s));
        assert!(!(pow(2, &x) + 2 * &s).is_polynomial(&x));
        assert!(!sqrt(&s).is_polynomial(&s));
        assert!(!pow(&s, -1).is_polynomial(&s));
        assert!(!sin(&s).is_polynomial(&s));
        assert!(pow(&s + 1, 3).is_polynomial(&s));
    }
}
