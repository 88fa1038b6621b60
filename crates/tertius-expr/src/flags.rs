//! Flag sets and option bitmasks.
//!
//! Status flags record derived facts about a node. Option bitmasks steer
//! `subs`, `series` and `expand`.

use bitflags::bitflags;

bitflags! {
    /// Derived facts cached on a node.
    ///
    /// None of these is observable except through performance: clearing
    /// them only forces recomputation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StatusFlags: u8 {
        /// The node lives behind an `Rc` owned by at least one `Ex`.
        const DYNALLOCATED = 1 << 0;
        /// The node is in canonical form.
        const EVALUATED = 1 << 1;
        /// The node is fully expanded.
        const EXPANDED = 1 << 2;
        /// The cached structural hash is valid.
        const HASH_CALCULATED = 1 << 3;
        /// The node is a canonical singleton and must never be written in place.
        const FLYWEIGHT = 1 << 4;
    }
}

bitflags! {
    /// Options for substitution.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SubsOptions: u8 {
        /// Compare `from` patterns structurally; wildcards are ordinary leaves.
        const NO_PATTERN = 1 << 0;
        /// Also replace powers and sub-products algebraically,
        /// e.g. `x^4` under `x^2 -> y` becomes `y^2`.
        const ALGEBRAIC = 1 << 1;
    }
}

bitflags! {
    /// Options for series expansion.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SeriesOptions: u8 {
        /// Expand through a logarithm whose argument is negative at the
        /// expansion point, keeping the value symbolic.
        const SUPPRESS_BRANCHCUT = 1 << 0;
    }
}

bitflags! {
    /// Options for expansion.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExpandOptions: u8 {
        /// Do not descend into function arguments.
        const EXPAND_FUNCTION_ARGS_OFF = 1 << 0;
    }
}

/// Predicates answered by [`crate::Ex::info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Info {
    /// Any number.
    Numeric,
    /// A real number (every number here is real).
    Real,
    /// An exact rational number.
    Rational,
    /// An exact integer.
    Integer,
    /// A number greater than zero.
    Positive,
    /// A number less than zero.
    Negative,
    /// A number greater than or equal to zero.
    NonNegative,
    /// An integer greater than zero.
    PosInt,
    /// An integer less than zero.
    NegInt,
    /// An integer greater than or equal to zero.
    NonNegInt,
    /// An even integer.
    Even,
    /// An odd integer.
    Odd,
    /// A symbol.
    Symbol,
    /// A list.
    List,
    /// Any relation.
    Relation,
    /// An equation `a == b`.
    RelationEqual,
    /// An inequation `a != b`.
    RelationNotEqual,
    /// A polynomial in all of its symbols.
    Polynomial,
    /// A polynomial with integer coefficients.
    IntegerPolynomial,
    /// A polynomial with rational coefficients.
    RationalPolynomial,
    /// The node is known to be fully expanded.
    Expanded,
}

/// Commutativity class of an expression, used to order products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReturnType {
    /// Commutes with everything.
    Commutative,
    /// Does not commute with other non-commutative expressions.
    NonCommutative,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flags_default_empty() {
        let flags = StatusFlags::default();
        assert!(flags.is_empty());
        assert!(!flags.contains(StatusFlags::EVALUATED));
    }

    #[test]
    fn test_subs_options_combine() {
        let opts = SubsOptions::NO_PATTERN | SubsOptions::ALGEBRAIC;
        assert!(opts.contains(SubsOptions::ALGEBRAIC));
        assert!(opts.contains(SubsOptions::NO_PATTERN));
    }
}
