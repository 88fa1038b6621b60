//! Matrix arithmetic behind `evalm`.

use crate::cast::ex_to;
use crate::error::{ExError, Result};
use crate::eval;
use crate::ex::Ex;
use crate::flyweight::{ex0, ex1};
use crate::kind::{Matrix, TypeTag};
use crate::node::NodeData;
use crate::numeric::Number;

fn shape(m: &Ex) -> (usize, usize) {
    let view = ex_to::<Matrix>(m);
    (view.rows(), view.cols())
}

fn incompatible(what: &str, a: &Ex, b: &Ex) -> ExError {
    let ((ar, ac), (br, bc)) = (shape(a), shape(b));
    ExError::InvalidArgument(format!("cannot {what} a {ar}x{ac} and a {br}x{bc} matrix"))
}

fn add_matrices(a: &Ex, b: &Ex) -> Result<Ex> {
    let (rows, cols) = shape(a);
    if shape(b) != (rows, cols) {
        return Err(incompatible("add", a, b));
    }
    let entries = a
        .ops()
        .iter()
        .zip(b.ops())
        .map(|(x, y)| eval::add([x.clone(), y.clone()]));
    Ex::matrix(rows, cols, entries)
}

fn mul_matrices(a: &Ex, b: &Ex) -> Result<Ex> {
    let ((rows, inner), (inner_b, cols)) = (shape(a), shape(b));
    if inner != inner_b {
        return Err(incompatible("multiply", a, b));
    }
    let (ma, mb) = (ex_to::<Matrix>(a), ex_to::<Matrix>(b));
    let mut entries = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let products = (0..inner)
                .map(|k| eval::mul([ma.get(r, k).clone(), mb.get(k, c).clone()]))
                .collect::<Result<Vec<_>>>()?;
            entries.push(eval::add(products));
        }
    }
    Ex::matrix(rows, cols, entries)
}

fn scale(m: &Ex, factor: &Ex) -> Result<Ex> {
    let (rows, cols) = shape(m);
    let entries = m
        .ops()
        .iter()
        .map(|x| eval::mul([factor.clone(), x.clone()]))
        .collect::<Result<Vec<_>>>()?;
    Ex::matrix(rows, cols, entries)
}

fn identity(n: usize) -> Result<Ex> {
    let entries = (0..n * n).map(|i| if i / n == i % n { ex1() } else { ex0() });
    Ex::matrix(n, n, entries)
}

fn pow_matrix(m: &Ex, exp: i64) -> Result<Ex> {
    let (rows, cols) = shape(m);
    if rows != cols {
        return Err(ExError::InvalidArgument(format!(
            "cannot raise a non-square {rows}x{cols} matrix to a power"
        )));
    }
    if exp < 0 {
        return Err(ExError::Unsupported {
            op: "negative power",
            kind: TypeTag::Matrix.name(),
        });
    }
    // square and multiply
    let mut result = identity(rows)?;
    let mut square = m.clone();
    let mut k = exp;
    while k > 0 {
        if k & 1 == 1 {
            result = mul_matrices(&result, &square)?;
        }
        k >>= 1;
        if k > 0 {
            square = mul_matrices(&square, &square)?;
        }
    }
    Ok(result)
}

/// Evaluates the matrix arithmetic in `e`.
///
/// Sums of matrices add entrywise, products multiply in order and scalar
/// factors scale. Anything that does not reduce to a matrix is rebuilt from
/// its evaluated operands.
pub(crate) fn evalm(e: &Ex) -> Result<Ex> {
    let is_matrix = |x: &Ex| x.tag() == TypeTag::Matrix;
    match e.node().data() {
        NodeData::Matrix { .. } => Ok(e.clone()),
        NodeData::Add => {
            let terms = e.ops().iter().map(evalm).collect::<Result<Vec<_>>>()?;
            match terms.split_first() {
                Some((first, rest)) if terms.iter().all(is_matrix) => rest
                    .iter()
                    .try_fold(first.clone(), |acc, t| add_matrices(&acc, t)),
                _ => Ok(eval::add(terms)),
            }
        }
        NodeData::Mul | NodeData::NcMul => {
            let factors = e.ops().iter().map(evalm).collect::<Result<Vec<_>>>()?;
            let (matrices, scalars): (Vec<Ex>, Vec<Ex>) =
                factors.iter().cloned().partition(is_matrix);
            let Some((first, rest)) = matrices.split_first() else {
                return eval::rebuild(e, factors);
            };
            let ordered = e.tag() == TypeTag::NcMul;
            if ordered && !scalars.is_empty() {
                return eval::rebuild(e, factors);
            }
            let product = rest
                .iter()
                .try_fold(first.clone(), |acc, m| mul_matrices(&acc, m))?;
            if scalars.is_empty() {
                Ok(product)
            } else {
                scale(&product, &eval::mul(scalars)?)
            }
        }
        NodeData::Power => {
            let base = evalm(&e.op(0))?;
            let exp = e.op(1);
            match exp.as_number().and_then(Number::to_i64) {
                Some(n) if is_matrix(&base) => pow_matrix(&base, n),
                _ => eval::power(base, exp),
            }
        }
        _ if e.nops() == 0 => Ok(e.clone()),
        _ => {
            let ops = e.ops().iter().map(evalm).collect::<Result<Vec<_>>>()?;
            eval::rebuild(e, ops)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::pow;

    fn m2(entries: [i32; 4]) -> Ex {
        Ex::matrix(2, 2, entries.map(Ex::from)).unwrap()
    }

    #[test]
    fn test_sum_and_scalar_multiple() {
        let (a, b) = (m2([1, 2, 3, 4]), m2([0, 1, 1, 0]));
        assert_eq!((&a + &b).evalm().unwrap(), m2([1, 3, 4, 4]));
        let x = Ex::symbol("x");
        let scaled = (&x * &a).evalm().unwrap();
        assert_eq!(scaled.op(3), 4 * &x);
        assert_eq!((2 * &a).evalm().unwrap(), m2([2, 4, 6, 8]));
    }

    #[test]
    fn test_products_keep_order() {
        let (a, b) = (m2([1, 2, 3, 4]), m2([0, 1, 1, 0]));
        let ab = &a * &b;
        assert_eq!(ab.tag(), TypeTag::NcMul);
        assert_eq!(ab.evalm().unwrap(), m2([2, 1, 4, 3]));
        assert_eq!((&b * &a).evalm().unwrap(), m2([3, 4, 1, 2]));
        assert_eq!((3 * &a * &b).evalm().unwrap(), m2([6, 3, 12, 9]));
    }

    #[test]
    fn test_integer_powers() {
        let a = m2([1, 1, 0, 1]);
        assert_eq!(pow(&a, 5).evalm().unwrap(), m2([1, 5, 0, 1]));
        assert!(pow(&a, 0).evalm().unwrap().is_one());
        assert!(matches!(
            pow(&a, -1).evalm(),
            Err(ExError::Unsupported { op: "negative power", .. })
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let row = Ex::matrix(1, 2, [Ex::from(1), Ex::from(2)]).unwrap();
        let square = m2([1, 2, 3, 4]);
        assert!(matches!((&row + &square).evalm(), Err(ExError::InvalidArgument(_))));
        let product = Ex::matrix(1, 2, [7, 10].map(Ex::from)).unwrap();
        assert_eq!((&row * &square).evalm().unwrap(), product);
        assert!(matches!((&square * &row).evalm(), Err(ExError::InvalidArgument(_))));
    }

    #[test]
    fn test_nested_in_containers() {
        let (a, y) = (m2([1, 0, 0, 1]), Ex::symbol("y"));
        let l = Ex::lst([&a + &a, y.clone()]);
        let evaluated = l.evalm().unwrap();
        assert_eq!(evaluated.op(0), m2([2, 0, 0, 2]));
        assert_eq!(evaluated.op(1), y);
        assert_eq!((&y + 1).evalm().unwrap(), &y + 1);
    }
}
