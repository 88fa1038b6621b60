//! Type queries and downcasts.
//!
//! ```
//! use tertius_expr::{cast::{ex_to, is_a}, kind::Symbol, Ex};
//!
//! let x = Ex::symbol("x");
//! if is_a::<Symbol>(&x) {
//!     assert_eq!(ex_to::<Symbol>(&x).name(), "x");
//! }
//! ```

use crate::error::{ExError, Result};
use crate::ex::Ex;
use crate::kind::Kind;

/// Returns true if the node is of kind `T` or one of its descendants.
#[must_use]
pub fn is_a<'a, T: Kind<'a>>(e: &Ex) -> bool {
    e.tag().is_a(T::TAG)
}

/// Returns true if the node is of kind `T` exactly.
#[must_use]
pub fn is_exactly_a<'a, T: Kind<'a>>(e: &Ex) -> bool {
    e.tag() == T::TAG
}

/// Views the node as `T` without a release-mode check.
///
/// Callers check [`is_a`] first. The kind is verified in debug builds and
/// whenever the `checked-casts` feature is enabled; otherwise a wrong kind
/// surfaces as a panic in the first accessor that inspects the payload.
///
/// # Panics
///
/// Panics on a kind mismatch when the check is compiled in.
#[must_use]
pub fn ex_to<'a, T: Kind<'a>>(e: &'a Ex) -> T {
    #[cfg(feature = "checked-casts")]
    assert!(is_a::<T>(e), "ex_to::<{}> on a {} node", T::TAG, e.tag());
    #[cfg(not(feature = "checked-casts"))]
    debug_assert!(is_a::<T>(e), "ex_to::<{}> on a {} node", T::TAG, e.tag());
    T::view(e.node())
}

/// Views the node as `T`, checking the kind.
///
/// # Errors
///
/// Returns [`ExError::TypeMismatch`] if the node is not a `T`.
pub fn try_ex_to<'a, T: Kind<'a>>(e: &'a Ex) -> Result<T> {
    if is_a::<T>(e) {
        Ok(T::view(e.node()))
    } else {
        Err(ExError::TypeMismatch {
            expected: T::TAG.name(),
            found: e.tag().name(),
        })
    }
}
