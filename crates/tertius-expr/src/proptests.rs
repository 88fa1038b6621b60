//! Property-based tests for expression handles.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::builder::ContainerInit;
    use crate::cast::{ex_to, is_a, try_ex_to};
    use crate::flags::ExpandOptions;
    use crate::kind::{Numeric, Symbol};
    use crate::ops::pow;
    use crate::{are_trivially_equal, Ex, Number};

    // Strategy for terms c * x^a * y^b with small exponents
    fn terms() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
        prop::collection::vec((-5i64..=5, 0i64..3, 0i64..3), 0..5)
    }

    // Strategy for non-zero coefficients
    fn non_zero() -> impl Strategy<Value = i64> {
        prop_oneof![(-9i64..=-1i64), (1i64..=9i64)]
    }

    fn polynomial(terms: &[(i64, i64, i64)], x: &Ex, y: &Ex) -> Ex {
        Ex::add(
            terms
                .iter()
                .map(|&(c, a, b)| Ex::from(c) * pow(x, a) * pow(y, b)),
        )
    }

    proptest! {
        #[test]
        fn add_commutative(p in terms(), q in terms()) {
            let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
            let (p, q) = (polynomial(&p, &x, &y), polynomial(&q, &x, &y));
            prop_assert_eq!(&p + &q, &q + &p);
        }

        #[test]
        fn mul_commutative(p in terms(), q in terms()) {
            let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
            let (p, q) = (polynomial(&p, &x, &y), polynomial(&q, &x, &y));
            prop_assert_eq!(&p * &q, &q * &p);
        }

        #[test]
        fn equal_expressions_hash_equal(p in terms(), q in terms()) {
            let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
            let (p, q) = (polynomial(&p, &x, &y), polynomial(&q, &x, &y));
            let (a, b) = (&p + &q, &q + &p);
            prop_assert!(a.is_equal(&b));
            prop_assert_eq!(a.gethash(), b.gethash());
        }

        #[test]
        fn subtraction_cancels(p in terms()) {
            let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
            let p = polynomial(&p, &x, &y);
            prop_assert!((&p - &p).is_zero());
        }

        #[test]
        fn expanded_degree_adds(a in non_zero(), m in 1i64..4, b in non_zero(), n in 1i64..4) {
            let x = Ex::symbol("x");
            let p = Ex::from(a) * pow(&x, m) + 1;
            let q = Ex::from(b) * pow(&x, n) - 1;
            let product = (&p * &q).expand(ExpandOptions::empty()).unwrap();
            let expected = p.degree(&x).unwrap() + q.degree(&x).unwrap();
            prop_assert_eq!(product.degree(&x), Ok(expected));
        }

        #[test]
        fn copy_on_write_isolates(values in prop::collection::vec(-100i64..100, 1..8), pick in 0usize..8) {
            let original = Ex::lst(values.iter().map(|&v| Ex::from(v)));
            let mut copy = original.clone();
            prop_assert!(are_trivially_equal(&original, &copy));
            let i = pick % values.len();
            *copy.let_op(i).unwrap() = Ex::symbol("z");
            prop_assert!(!are_trivially_equal(&original, &copy));
            for (k, &v) in values.iter().enumerate() {
                prop_assert_eq!(original.op(k), Ex::from(v));
            }
            prop_assert_eq!(original.refcount(), 1);
        }

        #[test]
        fn is_a_licenses_ex_to(v in -1000i64..1000, as_symbol in any::<bool>()) {
            let e = if as_symbol { Ex::symbol("s") } else { Ex::from(v) };
            prop_assert_eq!(is_a::<Numeric>(&e), try_ex_to::<Numeric>(&e).is_ok());
            prop_assert_eq!(is_a::<Symbol>(&e), try_ex_to::<Symbol>(&e).is_ok());
            if is_a::<Numeric>(&e) {
                prop_assert_eq!(ex_to::<Numeric>(&e).value(), &Number::integer(v));
            } else {
                prop_assert_eq!(ex_to::<Symbol>(&e).name(), "s");
            }
        }

        #[test]
        fn builder_matches_direct_pushes(values in prop::collection::vec(-100i64..100, 0..8)) {
            let mut built: Vec<Ex> = Vec::new();
            let mut init = ContainerInit::new(&mut built);
            for &v in &values {
                init = init.push(v);
            }
            let direct: Vec<Ex> = values.iter().map(|&v| Ex::from(v)).collect();
            prop_assert_eq!(built, direct);
        }

        #[test]
        fn iterator_distance_is_nops(values in prop::collection::vec(-100i64..100, 0..8)) {
            let l = Ex::lst(values.iter().map(|&v| Ex::from(v)));
            prop_assert_eq!(l.end() - l.begin(), isize::try_from(l.nops()).unwrap());
            prop_assert_eq!(l.iter().count(), values.len());
            prop_assert_eq!(l.iter().rev().count(), values.len());
        }
    }
}
