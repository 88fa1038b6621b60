//! Symbolic differentiation.

use crate::cast::try_ex_to;
use crate::error::{ExError, Result};
use crate::eval::{self, function};
use crate::ex::Ex;
use crate::flyweight::{ex0, ex1, ex_1};
use crate::kind::Symbol;
use crate::node::{FunctionId, NodeData};

/// `nth` derivative of `e` with respect to the symbol `s`.
pub(crate) fn diff(e: &Ex, s: &Ex, nth: u32) -> Result<Ex> {
    try_ex_to::<Symbol>(s)?;
    let mut result = e.clone();
    for _ in 0..nth {
        result = derivative(&result, s)?;
    }
    Ok(result)
}

fn unsupported(e: &Ex) -> ExError {
    ExError::Unsupported {
        op: "diff",
        kind: e.tag().name(),
    }
}

/// Replaces operand `i` of a product by `d` and rebuilds it.
fn product_term(ops: &[Ex], i: usize, d: Ex, ordered: bool) -> Result<Ex> {
    let factors = ops
        .iter()
        .enumerate()
        .map(|(j, op)| if i == j { d.clone() } else { op.clone() });
    if ordered {
        eval::ncmul(factors)
    } else {
        eval::mul(factors)
    }
}

fn derivative(e: &Ex, s: &Ex) -> Result<Ex> {
    match e.node().data() {
        NodeData::Numeric(_) | NodeData::Constant(_) => Ok(ex0()),
        NodeData::Symbol(_) => Ok(if e.is_equal(s) { ex1() } else { ex0() }),
        NodeData::Add => {
            let terms = e
                .ops()
                .iter()
                .map(|t| derivative(t, s))
                .collect::<Result<Vec<_>>>()?;
            Ok(eval::add(terms))
        }
        NodeData::Mul | NodeData::NcMul => {
            let ordered = matches!(e.node().data(), NodeData::NcMul);
            let mut terms = Vec::with_capacity(e.nops());
            for (i, factor) in e.ops().iter().enumerate() {
                let d = derivative(factor, s)?;
                if !d.is_zero() {
                    terms.push(product_term(e.ops(), i, d, ordered)?);
                }
            }
            Ok(eval::add(terms))
        }
        NodeData::Power => {
            let (base, exp) = (e.op(0), e.op(1));
            let db = derivative(&base, s)?;
            if exp.as_number().is_some() {
                // n*a^(n-1)*a'
                let lowered = eval::power(base, eval::add([exp.clone(), ex_1()]))?;
                return eval::mul([exp, lowered, db]);
            }
            let de = derivative(&exp, s)?;
            let log_part = eval::mul([de, function(FunctionId::Log, base.clone())?])?;
            let inverse = eval::power(base, ex_1())?;
            let base_part = eval::mul([exp, db, inverse])?;
            eval::mul([e.clone(), eval::add([log_part, base_part])])
        }
        NodeData::Function(FunctionId::Order) => Err(unsupported(e)),
        NodeData::Function(id) => {
            let arg = e.op(0);
            let da = derivative(&arg, s)?;
            if da.is_zero() {
                return Ok(ex0());
            }
            let outer = match id {
                FunctionId::Sin => function(FunctionId::Cos, arg)?,
                FunctionId::Cos => eval::mul([ex_1(), function(FunctionId::Sin, arg)?])?,
                FunctionId::Tan => {
                    let tan = function(FunctionId::Tan, arg)?;
                    eval::add([ex1(), eval::power(tan, Ex::from(2))?])
                }
                FunctionId::Exp => e.clone(),
                FunctionId::Log => eval::power(arg, ex_1())?,
                FunctionId::Abs => {
                    let inverse = eval::power(arg.clone(), ex_1())?;
                    eval::mul([function(FunctionId::Abs, arg)?, inverse])?
                }
                FunctionId::Order => return Err(unsupported(e)),
            };
            eval::mul([outer, da])
        }
        NodeData::Lst => {
            let items = e
                .ops()
                .iter()
                .map(|item| derivative(item, s))
                .collect::<Result<Vec<_>>>()?;
            Ok(Ex::lst(items))
        }
        NodeData::Matrix { rows, cols } => {
            let entries = e
                .ops()
                .iter()
                .map(|entry| derivative(entry, s))
                .collect::<Result<Vec<_>>>()?;
            Ex::matrix(*rows, *cols, entries)
        }
        NodeData::Wildcard(_) | NodeData::Indexed | NodeData::Relational(_) => {
            Err(unsupported(e))
        }
    }
}
