//! Canonical-form constructors and whole-tree evaluation.
//!
//! Every node produced here is in canonical form and carries
//! [`StatusFlags::EVALUATED`]:
//!
//! - sums are flat, like terms are collected and the numeric constant trails;
//! - products are flat, like bases are collected and the numeric coefficient
//!   leads;
//! - powers, functions and orders fold what can be folded exactly.

use num_traits::{One, Zero};

use crate::error::{ExError, Result};
use crate::ex::{are_trivially_equal, Ex};
use crate::flags::{ExpandOptions, Info, ReturnType, StatusFlags};
use crate::flyweight::{ex0, ex1};
use crate::kind::TypeTag;
use crate::node::{FunctionId, Node, NodeData};
use crate::numeric::Number;

/// Depth budget of `eval` and `evalf`.
pub const MAX_RECURSION_LEVEL: i32 = 1024;

// === Sums ===

/// Splits a term into its numeric coefficient and the remaining product.
pub(crate) fn split_coeff(term: &Ex) -> (Number, Ex) {
    if term.tag() == TypeTag::Mul {
        if let Some(c) = term.op(0).as_number() {
            let rest = &term.ops()[1..];
            let rest = if rest.len() == 1 {
                rest[0].clone()
            } else {
                Ex::evaluated(Node::new(NodeData::Mul, rest.iter().cloned()))
            };
            return (c.clone(), rest);
        }
    }
    (Number::one(), term.clone())
}

/// `c * rest` for a `rest` that carries no coefficient of its own.
fn with_coeff(c: Number, rest: Ex) -> Ex {
    if c.is_exact() && c.is_one() {
        return rest;
    }
    let coeff = Ex::number(c);
    if rest.tag() == TypeTag::Mul {
        Ex::evaluated(Node::new(
            NodeData::Mul,
            std::iter::once(coeff).chain(rest.ops().iter().cloned()),
        ))
    } else {
        Ex::evaluated(Node::new(NodeData::Mul, [coeff, rest]))
    }
}

fn flatten(items: impl IntoIterator<Item = Ex>, tag: TypeTag) -> Vec<Ex> {
    let mut pending: Vec<Ex> = items.into_iter().collect();
    pending.reverse();
    let mut flat = Vec::with_capacity(pending.len());
    while let Some(item) = pending.pop() {
        if item.tag() == tag {
            pending.extend(item.ops().iter().rev().cloned());
        } else {
            flat.push(item);
        }
    }
    flat
}

/// Canonical sum of `terms`.
pub(crate) fn add(terms: impl IntoIterator<Item = Ex>) -> Ex {
    let mut constant = Number::zero();
    let mut pairs: Vec<(Ex, Number)> = Vec::new();
    for term in flatten(terms, TypeTag::Add) {
        if let Some(n) = term.as_number() {
            constant = constant.add(n);
        } else {
            let (c, rest) = split_coeff(&term);
            pairs.push((rest, c));
        }
    }

    pairs.sort_by(|a, b| a.0.compare(&b.0));
    let mut merged: Vec<(Ex, Number)> = Vec::with_capacity(pairs.len());
    for (rest, c) in pairs {
        match merged.last_mut() {
            Some((last, acc)) if last.is_equal(&rest) => *acc = acc.add(&c),
            _ => merged.push((rest, c)),
        }
    }

    let mut out: Vec<Ex> = merged
        .into_iter()
        .filter(|(_, c)| !c.is_zero())
        .map(|(rest, c)| with_coeff(c, rest))
        .collect();
    if !constant.is_zero() {
        out.push(Ex::number(constant));
    }

    match out.len() {
        0 => ex0(),
        1 => out.swap_remove(0),
        _ => Ex::evaluated(Node::new(NodeData::Add, out)),
    }
}

// === Products ===

fn split_power(factor: &Ex) -> (Ex, Ex) {
    if factor.tag() == TypeTag::Power {
        (factor.op(0), factor.op(1))
    } else {
        (factor.clone(), ex1())
    }
}

/// Canonical commutative product of `factors`.
///
/// Two or more non-commutative factors yield an ordered product instead.
pub(crate) fn mul(factors: impl IntoIterator<Item = Ex>) -> Result<Ex> {
    let flat = flatten(factors, TypeTag::Mul);
    let nc = flat
        .iter()
        .filter(|f| f.return_type() != ReturnType::Commutative)
        .count();
    if nc >= 2 {
        return ncmul(flat);
    }

    let mut coeff = Number::one();
    let mut pairs: Vec<(Ex, Ex)> = Vec::with_capacity(flat.len());
    for factor in &flat {
        match factor.as_number() {
            Some(n) => coeff = coeff.mul(n),
            None => pairs.push(split_power(factor)),
        }
    }
    if coeff.is_zero() {
        return Ok(Ex::number(coeff));
    }

    pairs.sort_by(|a, b| a.0.compare(&b.0));
    let mut merged: Vec<(Ex, Vec<Ex>)> = Vec::with_capacity(pairs.len());
    for (base, exp) in pairs {
        match merged.last_mut() {
            Some((last, exps)) if last.is_equal(&base) => exps.push(exp),
            _ => merged.push((base, vec![exp])),
        }
    }

    let mut out: Vec<Ex> = Vec::with_capacity(merged.len());
    let mut products: Vec<Ex> = Vec::new();
    for (base, exps) in merged {
        let exp = if exps.len() == 1 {
            exps.into_iter().next().unwrap_or_else(ex1)
        } else {
            add(exps)
        };
        let p = power(base, exp)?;
        if let Some(n) = p.as_number() {
            coeff = coeff.mul(n);
        } else if p.tag() == TypeTag::Mul {
            products.push(p);
        } else {
            out.push(p);
        }
    }
    if !products.is_empty() {
        let rest = std::iter::once(Ex::number(coeff)).chain(out).chain(products);
        return mul(rest);
    }
    if coeff.is_zero() {
        return Ok(Ex::number(coeff));
    }

    out.sort_by(Ex::compare);
    match out.len() {
        0 => Ok(Ex::number(coeff)),
        1 if coeff.is_exact() && coeff.is_one() => Ok(out.swap_remove(0)),
        1 if coeff.is_exact() && out[0].tag() == TypeTag::Add => {
            let terms = out[0]
                .ops()
                .iter()
                .map(|t| mul([Ex::number(coeff.clone()), t.clone()]))
                .collect::<Result<Vec<_>>>()?;
            Ok(add(terms))
        }
        _ => {
            let lead = (!(coeff.is_exact() && coeff.is_one())).then(|| Ex::number(coeff));
            Ok(Ex::evaluated(Node::new(
                NodeData::Mul,
                lead.into_iter().chain(out),
            )))
        }
    }
}

/// Ordered product of `factors`; commutative factors move to the front.
pub(crate) fn ncmul(factors: impl IntoIterator<Item = Ex>) -> Result<Ex> {
    let mut commutative = Vec::new();
    let mut ordered = Vec::new();
    for factor in flatten(factors, TypeTag::NcMul) {
        if factor.tag() == TypeTag::Mul {
            for f in factor.ops() {
                if f.return_type() == ReturnType::Commutative {
                    commutative.push(f.clone());
                } else if f.tag() == TypeTag::NcMul {
                    ordered.extend(f.ops().iter().cloned());
                } else {
                    ordered.push(f.clone());
                }
            }
        } else if factor.return_type() == ReturnType::Commutative {
            commutative.push(factor);
        } else {
            ordered.push(factor);
        }
    }
    if ordered.len() < 2 {
        return mul(commutative.into_iter().chain(ordered));
    }
    let product = Ex::evaluated(Node::new(NodeData::NcMul, ordered));
    if commutative.is_empty() {
        Ok(product)
    } else {
        commutative.push(product);
        mul(commutative)
    }
}

// === Powers and functions ===

fn exact_integer(e: &Ex) -> Option<i64> {
    e.as_number().and_then(Number::to_i64)
}

/// Canonical `base^exp`.
pub(crate) fn power(base: Ex, exp: Ex) -> Result<Ex> {
    if let (Some(b), Some(x)) = (base.as_number(), exp.as_number()) {
        if b.is_zero() {
            return match x.signum() {
                0 => Err(ExError::InvalidArgument("0^0 is undefined".to_string())),
                s if s < 0 => Err(ExError::DivisionByZero),
                _ => Ok(base),
            };
        }
        if let Some(folded) = b.pow(x)? {
            return Ok(Ex::number(folded));
        }
    }
    if exp.is_zero() {
        return Ok(ex1());
    }
    if exp.is_one() || base.is_one() {
        return Ok(if exp.is_one() { base } else { ex1() });
    }
    if exact_integer(&exp).is_some() {
        match base.tag() {
            TypeTag::Power => {
                let combined = mul([base.op(1), exp])?;
                return power(base.op(0), combined);
            }
            TypeTag::Mul => {
                let factors = base
                    .ops()
                    .iter()
                    .map(|f| power(f.clone(), exp.clone()))
                    .collect::<Result<Vec<_>>>()?;
                return mul(factors);
            }
            _ => {}
        }
    }
    Ok(Ex::evaluated(Node::new(NodeData::Power, [base, exp])))
}

fn float_function(id: FunctionId, x: f64) -> Option<f64> {
    match id {
        FunctionId::Sin => Some(x.sin()),
        FunctionId::Cos => Some(x.cos()),
        FunctionId::Tan => Some(x.tan()),
        FunctionId::Exp => Some(x.exp()),
        FunctionId::Log if x > 0.0 => Some(x.ln()),
        FunctionId::Abs => Some(x.abs()),
        FunctionId::Log | FunctionId::Order => None,
    }
}

/// Canonical application of a built-in function.
pub(crate) fn function(id: FunctionId, arg: Ex) -> Result<Ex> {
    if let Some(n) = arg.as_number() {
        match (id, n) {
            (FunctionId::Order, _) => {
                return Ok(if n.is_zero() {
                    ex0()
                } else {
                    Ex::evaluated(Node::new(NodeData::Function(id), [ex1()]))
                });
            }
            (_, Number::Float(x)) => {
                if let Some(y) = float_function(id, *x) {
                    return Ok(Ex::number(Number::float(y)));
                }
            }
            (FunctionId::Sin | FunctionId::Tan, _) if n.is_zero() => return Ok(ex0()),
            (FunctionId::Cos | FunctionId::Exp, _) if n.is_zero() => return Ok(ex1()),
            (FunctionId::Log, _) if n.is_zero() => return Err(ExError::DivisionByZero),
            (FunctionId::Log, _) if n.is_one() => return Ok(ex0()),
            (FunctionId::Abs, _) => return Ok(Ex::number(n.abs())),
            _ => {}
        }
    }
    match (id, arg.tag()) {
        (FunctionId::Exp, TypeTag::Function) if function_id(&arg) == Some(FunctionId::Log) => {
            return Ok(arg.op(0));
        }
        (FunctionId::Abs, TypeTag::Function) if function_id(&arg) == Some(FunctionId::Abs) => {
            return Ok(arg);
        }
        (FunctionId::Order, TypeTag::Mul) if arg.op(0).as_number().is_some() => {
            let (_, rest) = split_coeff(&arg);
            return function(id, rest);
        }
        _ => {}
    }
    Ok(Ex::evaluated(Node::new(NodeData::Function(id), [arg])))
}

pub(crate) fn function_id(e: &Ex) -> Option<FunctionId> {
    match e.node().data() {
        NodeData::Function(id) => Some(*id),
        _ => None,
    }
}

// === Rebuilding ===

/// Rebuilds `e` with new operands through the canonical constructors.
///
/// If every operand is the one `e` already holds and `e` is canonical, `e`
/// itself is returned.
pub(crate) fn rebuild(e: &Ex, ops: Vec<Ex>) -> Result<Ex> {
    let unchanged = ops.len() == e.nops()
        && ops.iter().zip(e.ops()).all(|(a, b)| are_trivially_equal(a, b));
    if unchanged && e.node().flags().contains(StatusFlags::EVALUATED) {
        return Ok(e.clone());
    }
    let mut ops = ops;
    match e.node().data() {
        NodeData::Add => Ok(add(ops)),
        NodeData::Mul => mul(ops),
        NodeData::NcMul => ncmul(ops),
        NodeData::Power if ops.len() == 2 => {
            let exp = ops.pop().unwrap_or_else(ex1);
            let base = ops.pop().unwrap_or_else(ex0);
            power(base, exp)
        }
        NodeData::Function(id) if ops.len() == 1 => function(*id, ops.swap_remove(0)),
        NodeData::Indexed if !ops.is_empty() => {
            let base = ops.remove(0);
            Ok(Ex::indexed(base, ops))
        }
        NodeData::Lst => Ok(Ex::lst(ops)),
        NodeData::Matrix { rows, cols } => Ex::matrix(*rows, *cols, ops),
        NodeData::Relational(op) if ops.len() == 2 => {
            let rhs = ops.pop().unwrap_or_else(ex0);
            let lhs = ops.pop().unwrap_or_else(ex0);
            Ok(Ex::relational(lhs, *op, rhs))
        }
        NodeData::Numeric(n) => Ok(Ex::number(n.clone())),
        NodeData::Constant(_) | NodeData::Symbol(_) | NodeData::Wildcard(_) => {
            e.node().set_flags(StatusFlags::EVALUATED);
            Ok(e.clone())
        }
        data => Err(ExError::InvalidArgument(format!(
            "{} node with {} operands",
            data.tag(),
            ops.len()
        ))),
    }
}

fn check_depth(level: i32) -> Result<()> {
    if level <= -MAX_RECURSION_LEVEL {
        tracing::debug!(level, "evaluation depth budget exhausted");
        return Err(ExError::RecursionLimit);
    }
    Ok(())
}

/// Canonical form of `e`; see [`Ex::eval`] for `level`.
pub(crate) fn eval(e: &Ex, level: i32) -> Result<Ex> {
    check_depth(level)?;
    if e.node().flags().contains(StatusFlags::EVALUATED) {
        return Ok(e.clone());
    }
    let ops = if level == 1 {
        e.ops().to_vec()
    } else {
        e.ops()
            .iter()
            .map(|op| eval(op, level - 1))
            .collect::<Result<Vec<_>>>()?
    };
    rebuild(e, ops)
}

/// Float evaluation of `e`; see [`Ex::evalf`].
pub(crate) fn evalf(e: &Ex, level: i32) -> Result<Ex> {
    check_depth(level)?;
    match e.node().data() {
        NodeData::Numeric(n) => Ok(Ex::number(n.to_float())),
        NodeData::Constant(id) => Ok(Ex::number(Number::float(id.value()))),
        _ if e.nops() == 0 => Ok(e.clone()),
        _ => {
            let ops = if level == 1 {
                e.ops().to_vec()
            } else {
                e.ops()
                    .iter()
                    .map(|op| evalf(op, level - 1))
                    .collect::<Result<Vec<_>>>()?
            };
            rebuild(e, ops)
        }
    }
}

// === Expansion ===

/// Multiplies out `factors`, distributing over every sum among them.
fn distribute(factors: &[Ex], ordered: bool) -> Result<Ex> {
    let mut acc: Vec<Ex> = vec![ex1()];
    for factor in factors {
        let terms = if factor.tag() == TypeTag::Add {
            factor.ops()
        } else {
            std::slice::from_ref(factor)
        };
        let mut next = Vec::with_capacity(acc.len() * terms.len());
        for a in &acc {
            for t in terms {
                let pair = [a.clone(), t.clone()];
                next.push(if ordered { ncmul(pair)? } else { mul(pair)? });
            }
        }
        acc = next;
    }
    Ok(add(acc))
}

/// Expands products and non-negative integer powers of sums.
pub(crate) fn expand(e: &Ex, options: ExpandOptions) -> Result<Ex> {
    if e.info(Info::Expanded) {
        return Ok(e.clone());
    }
    if e.tag() == TypeTag::Function && options.contains(ExpandOptions::EXPAND_FUNCTION_ARGS_OFF) {
        return Ok(e.clone());
    }
    let expand_ops = |e: &Ex| -> Result<Vec<Ex>> {
        e.ops().iter().map(|op| expand(op, options)).collect()
    };
    let result = match e.node().data() {
        NodeData::Add => add(expand_ops(e)?),
        NodeData::Mul => distribute(&expand_ops(e)?, false)?,
        NodeData::NcMul => distribute(&expand_ops(e)?, true)?,
        NodeData::Power => {
            let base = expand(&e.op(0), options)?;
            let exp = expand(&e.op(1), options)?;
            match exact_integer(&exp) {
                Some(n) if n > 1 && base.tag() == TypeTag::Add => {
                    let mut acc = base.clone();
                    for _ in 1..n {
                        acc = distribute(&[acc, base.clone()], false)?;
                    }
                    acc
                }
                _ => power(base, exp)?,
            }
        }
        _ => rebuild(e, expand_ops(e)?)?,
    };
    if options.is_empty() {
        result.node().set_flags(StatusFlags::EXPANDED);
    }
    Ok(result)
}

// === Modular reduction ===

/// Symmetric reduction of integer coefficients modulo `xi`.
pub(crate) fn smod(e: &Ex, xi: &Number) -> Result<Ex> {
    match e.node().data() {
        NodeData::Numeric(n) => Ok(Ex::number(n.smod(xi))),
        NodeData::Add => {
            let terms = e
                .ops()
                .iter()
                .map(|t| smod(t, xi))
                .collect::<Result<Vec<_>>>()?;
            Ok(add(terms))
        }
        NodeData::Mul => {
            let factors = e.ops().iter().map(|f| match f.as_number() {
                Some(n) => Ex::number(n.smod(xi)),
                None => f.clone(),
            });
            mul(factors)
        }
        _ => Ok(e.clone()),
    }
}
