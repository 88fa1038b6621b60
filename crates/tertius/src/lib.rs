//! # Tertius
//!
//! Symbolic expressions for the Tertius Computer Algebra System.
//!
//! Expressions are immutable trees shared between cheap, value-semantic
//! handles. A handle copies its tree only when it is written to while
//! other handles still see it.
//!
//! ## Features
//!
//! - **Shared Handles**: reference-counted nodes with copy-on-write
//! - **Canonical Forms**: sums and products are sorted and collected on construction
//! - **Exact Arithmetic**: arbitrary precision rationals, floats on request
//! - **Calculus**: differentiation and truncated Taylor series
//! - **Rewriting**: substitution and wildcard pattern matching
//!
//! ## Quick Start
//!
//! ```rust
//! use tertius::prelude::*;
//!
//! let x = Ex::symbol("x");
//! let e = sin(&x) * pow(&x, 2);
//! let d = e.diff(&x, 1).unwrap();
//! assert!(d.has(&cos(&x)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use tertius_expr as expr;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tertius_expr::cast::{ex_to, is_a, is_exactly_a, try_ex_to};
    pub use tertius_expr::{abs, cos, exp, log, order, pow, sin, sqrt, tan};
    pub use tertius_expr::{lst, Ex, ExError, ExpandOptions, Number, SeriesOptions, SubsOptions};
}
