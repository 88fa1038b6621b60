//! End-to-end behaviour of expression handles through the public API.

use tertius_expr::cast::{ex_to, is_a, is_exactly_a};
use tertius_expr::kind::{Basic, ExPairSeq, Mul, Numeric, Symbol};
use tertius_expr::{
    are_trivially_equal, lst, pow, sin, swap, Ex, ExError, Info, Number, SubsOptions,
};

#[test]
fn test_polynomial_detection_scenario() {
    let x = Ex::symbol("x");
    let s = Ex::symbol("s");

    let e = sin(&x) + 2 * &s;
    assert!(e.is_polynomial(&s));
    assert_eq!(e.degree(&s), Ok(1));
    assert_eq!(e.coeff(&s, 1).unwrap(), Ex::from(2));
    assert_eq!(e.coeff(&s, 0).unwrap(), sin(&x));

    let g = pow(2, &x) + 2 * &s;
    assert!(g.is_polynomial(&s));
    assert_eq!(g.degree(&s), Ok(1));
}

#[test]
fn test_aliases_survive_writes() {
    let x = Ex::symbol("x");
    let a = lst![1, &x, 2.5];
    let mut b = a.clone();
    assert!(are_trivially_equal(&a, &b));
    assert_eq!(a.refcount(), 2);

    b[1] = Ex::symbol("y");
    assert_eq!(a.op(1), x);
    assert_ne!(a, b);
    assert_eq!(a.refcount(), 1);
    assert_eq!(b.refcount(), 1);
}

#[test]
fn test_swap_exchanges_values() {
    let x = Ex::symbol("x");
    let third = Ex::lst([x.clone()]);
    let mut a = &x + 1;
    let mut b = pow(&x, 2);
    let (before_a, before_b) = (a.clone(), b.clone());
    swap(&mut a, &mut b);
    assert!(are_trivially_equal(&a, &before_b));
    assert!(are_trivially_equal(&b, &before_a));
    assert_eq!(third.op(0), x);
}

#[test]
fn test_iterator_positions() {
    let l = lst![10, 20, 30];
    let begin = l.begin();
    let second = begin + 1;
    assert_eq!(second.get(), Ex::from(20));
    assert_eq!((begin + 2) - begin, 2);
    assert!(begin < second);
    assert_eq!(l.iter().collect::<Vec<_>>(), vec![Ex::from(10), Ex::from(20), Ex::from(30)]);
}

#[test]
fn test_type_queries() {
    let x = Ex::symbol("x");
    let prod = 3 * &x * Ex::symbol("y");
    assert!(is_a::<Mul>(&prod));
    assert!(is_a::<ExPairSeq>(&prod));
    assert!(is_a::<Basic>(&prod));
    assert!(!is_exactly_a::<ExPairSeq>(&prod));
    assert_eq!(ex_to::<Mul>(&prod).overall_coeff(), Number::integer(3));
    assert!(is_exactly_a::<Symbol>(&x));
    assert!(is_a::<Numeric>(&Ex::from(7)));
    assert!(matches!(
        tertius_expr::cast::try_ex_to::<Numeric>(&x),
        Err(ExError::TypeMismatch { .. })
    ));
}

#[test]
fn test_parse_and_substitute() {
    let x = Ex::symbol("x");
    let y = Ex::symbol("y");
    let e = Ex::parse("x^2 + y", &lst![&x, &y]).unwrap();
    let at = e.subs(&Ex::equation(x.clone(), 3), SubsOptions::empty()).unwrap();
    assert_eq!(at, 9 + &y);
    assert!(at.info(Info::Polynomial));
    assert!(matches!(
        Ex::parse("x + z", &lst![&x, &y]),
        Err(ExError::UndeclaredSymbol { .. })
    ));
}
