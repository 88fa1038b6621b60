//! Substitution and operand mapping.

use crate::error::{ExError, Result};
use crate::eval;
use crate::ex::Ex;
use crate::flags::{Info, SubsOptions};
use crate::kind::TypeTag;
use crate::pattern::{match_with, Bindings};

/// Splits `x == y` or a list of such equations into the two sides.
fn relations(rules: &Ex) -> Result<(Vec<Ex>, Vec<Ex>)> {
    let equations: Vec<Ex> = match rules.tag() {
        TypeTag::Lst => rules.ops().to_vec(),
        _ => vec![rules.clone()],
    };
    let mut from = Vec::with_capacity(equations.len());
    let mut to = Vec::with_capacity(equations.len());
    for eq in equations {
        if !eq.info(Info::RelationEqual) {
            return Err(ExError::InvalidArgument(format!(
                "substitution rules must be equations, got {eq}"
            )));
        }
        from.push(eq.op(0));
        to.push(eq.op(1));
    }
    Ok((from, to))
}

pub(crate) fn subs(e: &Ex, rules: &Ex, options: SubsOptions) -> Result<Ex> {
    let (from, to) = relations(rules)?;
    subs_lists(e, &from, &to, options)
}

pub(crate) fn subs_lists(e: &Ex, from: &[Ex], to: &[Ex], options: SubsOptions) -> Result<Ex> {
    if from.len() != to.len() {
        return Err(ExError::InvalidArgument(format!(
            "{} patterns but {} replacements",
            from.len(),
            to.len()
        )));
    }
    if from.is_empty() {
        return Ok(e.clone());
    }
    substitute(e, from, to, options)
}

fn substitute(e: &Ex, from: &[Ex], to: &[Ex], options: SubsOptions) -> Result<Ex> {
    let rebuilt = if e.nops() == 0 {
        e.clone()
    } else {
        let ops = e
            .ops()
            .iter()
            .map(|op| substitute(op, from, to, options))
            .collect::<Result<Vec<_>>>()?;
        eval::rebuild(e, ops)?
    };
    replace(&rebuilt, from, to, options)
}

/// One-level replacement of the node itself.
fn replace(e: &Ex, from: &[Ex], to: &[Ex], options: SubsOptions) -> Result<Ex> {
    for (pattern, replacement) in from.iter().zip(to) {
        if options.contains(SubsOptions::NO_PATTERN) {
            if e.is_equal(pattern) {
                return Ok(replacement.clone());
            }
            continue;
        }
        let mut bindings = Bindings::new();
        if match_with(e, pattern, &mut bindings) {
            return instantiate(replacement, &bindings);
        }
    }
    if options.contains(SubsOptions::ALGEBRAIC) {
        for (pattern, replacement) in from.iter().zip(to) {
            if let Some(result) = algebraic(e, pattern, replacement)? {
                return Ok(result);
            }
        }
    }
    Ok(e.clone())
}

/// Substitutes the bound values for the wildcards of `replacement`.
fn instantiate(replacement: &Ex, bindings: &Bindings) -> Result<Ex> {
    if bindings.is_empty() {
        return Ok(replacement.clone());
    }
    subs_lists(
        replacement,
        &bindings.wildcards(),
        &bindings.values(),
        SubsOptions::NO_PATTERN,
    )
}

fn as_power(e: &Ex) -> (Ex, Ex) {
    if e.tag() == TypeTag::Power {
        (e.op(0), e.op(1))
    } else {
        (e.clone(), Ex::from(1))
    }
}

fn integer_exponent(e: &Ex) -> Option<i64> {
    e.as_number().and_then(crate::numeric::Number::to_i64)
}

/// How many whole copies of `base^step` fit into `base^exp`.
fn multiplicity(exp: i64, step: i64) -> i64 {
    if step == 0 || exp.signum() != step.signum() {
        0
    } else {
        exp / step
    }
}

/// Algebraic replacement of powers and sub-products.
fn algebraic(e: &Ex, pattern: &Ex, replacement: &Ex) -> Result<Option<Ex>> {
    match (e.tag(), pattern.tag()) {
        (TypeTag::Power, TypeTag::Power) => {
            let (base, exp) = as_power(e);
            let (pbase, pexp) = as_power(pattern);
            let (Some(n), Some(m)) = (integer_exponent(&exp), integer_exponent(&pexp)) else {
                return Ok(None);
            };
            let mut bindings = Bindings::new();
            let k = multiplicity(n, m);
            if k < 1 || !match_with(&base, &pbase, &mut bindings) {
                return Ok(None);
            }
            let replaced = instantiate(replacement, &bindings)?;
            let factors = [
                replaced.try_pow(k)?,
                base.try_pow(n - k * m)?,
            ];
            eval::mul(factors).map(Some)
        }
        (TypeTag::Mul, TypeTag::Mul) => algebraic_product(e, pattern, replacement),
        _ => Ok(None),
    }
}

/// Replaces `k` copies of the product `pattern` inside the product `e`,
/// where `k` is the smallest multiplicity over the pattern's factors.
fn algebraic_product(e: &Ex, pattern: &Ex, replacement: &Ex) -> Result<Option<Ex>> {
    if pattern.ops().iter().any(|f| f.as_number().is_some()) {
        return Ok(None);
    }
    let mut factors: Vec<(Ex, Ex)> = e.ops().iter().map(as_power).collect();
    let mut hits: Vec<(usize, i64)> = Vec::with_capacity(pattern.nops());
    let mut k = i64::MAX;
    for wanted in pattern.ops() {
        let (pbase, pexp) = as_power(wanted);
        let Some(m) = integer_exponent(&pexp) else {
            return Ok(None);
        };
        let found = factors.iter().enumerate().find_map(|(i, (base, exp))| {
            let n = integer_exponent(exp)?;
            (base.is_equal(&pbase) && multiplicity(n, m) >= 1).then_some((i, n))
        });
        let Some((i, n)) = found else {
            return Ok(None);
        };
        k = k.min(multiplicity(n, m));
        hits.push((i, m));
    }
    for (i, m) in hits {
        let n = integer_exponent(&factors[i].1).unwrap_or(0);
        factors[i].1 = Ex::from(n - k * m);
    }
    let mut rebuilt = Vec::with_capacity(factors.len() + 1);
    for (base, exp) in factors {
        rebuilt.push(base.try_pow(exp)?);
    }
    rebuilt.push(replacement.try_pow(k)?);
    eval::mul(rebuilt).map(Some)
}

/// Applies `f` to every operand of `e` and rebuilds it.
pub(crate) fn map<F>(e: &Ex, mut f: F) -> Result<Ex>
where
    F: FnMut(&Ex) -> Result<Ex>,
{
    if e.nops() == 0 {
        return Ok(e.clone());
    }
    let ops = e.ops().iter().map(&mut f).collect::<Result<Vec<_>>>()?;
    eval::rebuild(e, ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{pow, sin};

    #[test]
    fn test_plain_substitution() {
        let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
        let e = pow(&x, 2) + &x;
        let r = e.subs(&Ex::equation(x.clone(), 3), SubsOptions::empty()).unwrap();
        assert_eq!(r, Ex::from(12));
        let r = e
            .subs_lists(&[x.clone()], &[y.clone()], SubsOptions::empty())
            .unwrap();
        assert_eq!(r, pow(&y, 2) + &y);
    }

    #[test]
    fn test_list_of_rules_and_bad_rules() {
        let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
        let e = &x + &y;
        let rules = Ex::lst([Ex::equation(x.clone(), 1), Ex::equation(y.clone(), 2)]);
        assert_eq!(e.subs(&rules, SubsOptions::empty()).unwrap(), Ex::from(3));

        assert!(matches!(
            e.subs(&x, SubsOptions::empty()),
            Err(ExError::InvalidArgument(_))
        ));
        assert!(matches!(
            e.subs_lists(&[x.clone()], &[], SubsOptions::empty()),
            Err(ExError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_wildcard_substitution() {
        let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
        let e = sin(&x) + sin(&y);
        let rule = Ex::equation(sin(Ex::wild(0)), pow(Ex::wild(0), 2));
        let r = e.subs(&rule, SubsOptions::empty()).unwrap();
        assert_eq!(r, pow(&x, 2) + pow(&y, 2));

        let literal = e.subs(&rule, SubsOptions::NO_PATTERN).unwrap();
        assert_eq!(literal, e);
    }

    #[test]
    fn test_algebraic_powers() {
        let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
        let rule = Ex::equation(pow(&x, 2), y.clone());
        let e = pow(&x, 5);
        assert_eq!(e.subs(&rule, SubsOptions::empty()).unwrap(), e);
        let r = e.subs(&rule, SubsOptions::ALGEBRAIC).unwrap();
        assert_eq!(r, pow(&y, 2) * &x);
    }

    #[test]
    fn test_algebraic_products() {
        let (x, y, z, t) = (
            Ex::symbol("x"),
            Ex::symbol("y"),
            Ex::symbol("z"),
            Ex::symbol("t"),
        );
        let e = pow(&x, 2) * pow(&y, 3) * &z;
        let rule = Ex::equation(&x * &y, t.clone());
        let r = e.subs(&rule, SubsOptions::ALGEBRAIC).unwrap();
        assert_eq!(r, pow(&t, 2) * &y * &z);
    }

    #[test]
    fn test_substitution_reevaluates() {
        let x = Ex::symbol("x");
        let e = pow(&x, -1);
        assert_eq!(
            e.subs(&Ex::equation(x.clone(), 0), SubsOptions::empty()),
            Err(ExError::DivisionByZero)
        );
    }

    #[test]
    fn test_map_rebuilds() {
        let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
        let e = Ex::lst([x.clone(), y.clone()]);
        let doubled = e.map(|op| Ok(op * 2)).unwrap();
        assert_eq!(doubled.op(1), 2 * &y);
        let sum = &x + &y;
        let collapsed = sum.map(|_| Ok(x.clone())).unwrap();
        assert_eq!(collapsed, 2 * &x);
        assert_eq!(x.map(|_| Ok(Ex::from(0))).unwrap(), x);
    }
}
