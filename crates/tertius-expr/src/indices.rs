//! Free-index analysis of indexed expressions.

use crate::error::{ExError, Result};
use crate::ex::Ex;
use crate::node::NodeData;

/// Indices occurring exactly once; more than two occurrences are an error.
fn uncontracted(indices: Vec<Ex>) -> Result<Vec<Ex>> {
    let mut counted: Vec<(Ex, usize)> = Vec::with_capacity(indices.len());
    for idx in indices {
        match counted.iter_mut().find(|(seen, _)| seen.is_equal(&idx)) {
            Some((_, n)) => *n += 1,
            None => counted.push((idx, 1)),
        }
    }
    if let Some((idx, _)) = counted.iter().find(|(_, n)| *n > 2) {
        return Err(ExError::Inconsistency(format!(
            "index {idx} occurs more than twice"
        )));
    }
    Ok(counted
        .into_iter()
        .filter(|(_, n)| *n == 1)
        .map(|(idx, _)| idx)
        .collect())
}

fn sorted(mut indices: Vec<Ex>) -> Vec<Ex> {
    indices.sort_by(Ex::compare);
    indices
}

/// Indices of `e` that are not contracted.
pub(crate) fn free_indices(e: &Ex) -> Result<Vec<Ex>> {
    match e.node().data() {
        NodeData::Indexed => uncontracted(e.ops()[1..].to_vec()),
        NodeData::Add => {
            let mut terms = e.ops().iter();
            let Some(first) = terms.next() else {
                return Ok(Vec::new());
            };
            let free = free_indices(first)?;
            let reference = sorted(free.clone());
            for term in terms {
                if sorted(free_indices(term)?) != reference {
                    return Err(ExError::Inconsistency(format!(
                        "terms of {e} have different free indices"
                    )));
                }
            }
            Ok(free)
        }
        NodeData::Mul | NodeData::NcMul => {
            let mut all = Vec::new();
            for factor in e.ops() {
                all.extend(free_indices(factor)?);
            }
            uncontracted(all)
        }
        NodeData::Power => {
            if e.op(1).as_number().and_then(crate::numeric::Number::to_i64) == Some(2) {
                Ok(Vec::new())
            } else {
                free_indices(&e.op(0))
            }
        }
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::pow;

    fn setup() -> (Ex, Ex, Ex, Ex) {
        (
            Ex::symbol("A"),
            Ex::symbol("B"),
            Ex::symbol("i"),
            Ex::symbol("j"),
        )
    }

    #[test]
    fn test_indexed_reports_single_indices() {
        let (a, _, i, j) = setup();
        let aij = Ex::indexed(a.clone(), [i.clone(), j.clone()]);
        assert_eq!(aij.get_free_indices().unwrap(), vec![i.clone(), j]);
        let trace = Ex::indexed(a, [i.clone(), i]);
        assert!(trace.get_free_indices().unwrap().is_empty());
    }

    #[test]
    fn test_product_contracts() {
        let (a, b, i, j) = setup();
        let ai = Ex::indexed(a, [i.clone()]);
        let bij = Ex::indexed(b, [i.clone(), j.clone()]);
        let prod = &ai * &bij;
        assert_eq!(prod.get_free_indices().unwrap(), vec![j.clone()]);
        assert!(pow(&ai, 2).get_free_indices().unwrap().is_empty());
        let cubed = pow(&ai, 3) * &bij;
        assert_eq!(cubed.get_free_indices().unwrap(), vec![j]);
        let triple = Ex::indexed(Ex::symbol("C"), [i.clone(), i.clone(), i]);
        assert!(matches!(
            triple.get_free_indices(),
            Err(ExError::Inconsistency(_))
        ));
    }

    #[test]
    fn test_sum_requires_matching_indices() {
        let (a, b, i, j) = setup();
        let ai = Ex::indexed(a, [i.clone()]);
        let bi = Ex::indexed(b.clone(), [i.clone()]);
        assert_eq!((&ai + &bi).get_free_indices().unwrap(), vec![i]);
        let bj = Ex::indexed(b, [j]);
        assert!(matches!(
            (&ai + &bj).get_free_indices(),
            Err(ExError::Inconsistency(_))
        ));
    }
}
