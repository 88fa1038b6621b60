//! # tertius-expr
//!
//! Shared, copy-on-write expression handles for the Tertius Computer
//! Algebra System.
//!
//! This crate provides:
//! - [`Ex`], a cheap-to-clone handle over a reference-counted expression node
//! - Copy-on-write mutation of operands through [`Ex::let_op`] and `IndexMut`
//! - Kind-checked downcasts ([`cast::is_a`], [`cast::ex_to`])
//! - Bidirectional operand iteration ([`ConstIter`])
//! - Chained container construction ([`ContainerInit`], [`lst!`])
//! - Automatic evaluation to canonical form, plus expansion, differentiation,
//!   truncated series, substitution, pattern matching and a small parser
//!
//! ## Design Principles
//!
//! - **Value semantics**: an `Ex` behaves like a value; sharing is invisible
//!   except through [`Ex::refcount`] and [`are_trivially_equal`]
//! - **Immutable once shared**: a node reachable from two handles is never
//!   written in place
//! - **Flyweights**: the small integers `0`, `1`, `-1`, `2` and `1/2` are
//!   preallocated per thread
//!
//! ## Quick Start
//!
//! ```rust
//! use tertius_expr::{pow, Ex};
//!
//! let x = Ex::symbol("x");
//! let e = pow(&x + 1, 2).expand(Default::default()).unwrap();
//! assert_eq!(e.degree(&x), Ok(2));
//! assert_eq!(e.coeff(&x, 1).unwrap(), Ex::from(2));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod cast;
mod diff;
pub mod error;
pub mod eval;
mod ex;
pub mod flags;
pub mod flyweight;
mod indices;
pub mod iter;
pub mod kind;
mod matrix;
pub mod node;
pub mod numeric;
pub mod ops;
mod parser;
pub mod pattern;
mod poly;
pub mod print;
mod series;
mod subs;

#[cfg(test)]
mod proptests;

pub use builder::{ContainerInit, Sequence};
pub use error::{ExError, Result};
pub use eval::MAX_RECURSION_LEVEL;
pub use ex::{are_trivially_equal, swap, Ex};
pub use flags::{ExpandOptions, Info, ReturnType, SeriesOptions, StatusFlags, SubsOptions};
pub use flyweight::{ex0, ex1, ex1_2, ex2, ex_1};
pub use iter::ConstIter;
pub use node::{ConstantId, FunctionId, RelOp};
pub use numeric::Number;
pub use ops::{abs, cos, exp, log, order, pow, sin, sqrt, tan};
pub use pattern::Bindings;
pub use print::{PrintContext, PrintStyle};
