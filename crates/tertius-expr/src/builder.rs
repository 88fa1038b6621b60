//! Chained container initialisation.
//!
//! ```
//! use tertius_expr::{builder::ContainerInit, Ex};
//!
//! let x = Ex::symbol("x");
//! let mut v: Vec<Ex> = Vec::new();
//! ContainerInit::new(&mut v).push(1).push(2.5).push(&x);
//! assert_eq!(v.len(), 3);
//! ```

use smallvec::{Array, SmallVec};

/// A growable sequence the builder can append to.
pub trait Sequence {
    /// Element type.
    type Element;

    /// Appends one element.
    fn push_back(&mut self, item: Self::Element);
}

impl<T> Sequence for Vec<T> {
    type Element = T;

    fn push_back(&mut self, item: T) {
        self.push(item);
    }
}

impl<A: Array> Sequence for SmallVec<A> {
    type Element = A::Item;

    fn push_back(&mut self, item: A::Item) {
        self.push(item);
    }
}

/// Appends converted values to a borrowed sequence, one `push` at a time.
///
/// The builder holds the only mutable borrow of the sequence, so it cannot
/// outlive it.
#[must_use = "the builder does nothing unless values are pushed"]
pub struct ContainerInit<'a, S: Sequence> {
    seq: &'a mut S,
}

impl<'a, S: Sequence> ContainerInit<'a, S> {
    /// Starts appending to `seq`.
    pub fn new(seq: &'a mut S) -> Self {
        Self { seq }
    }

    /// Converts `value` and appends it.
    pub fn push<V: Into<S::Element>>(self, value: V) -> Self {
        self.seq.push_back(value.into());
        self
    }
}

/// Builds a list expression from literals, handles and symbols.
///
/// ```
/// use tertius_expr::{lst, Ex};
///
/// let x = Ex::symbol("x");
/// let l = lst![1, 2.5, &x];
/// assert_eq!(l.nops(), 3);
/// ```
#[macro_export]
macro_rules! lst {
    () => {
        $crate::Ex::lst(::std::iter::empty::<$crate::Ex>())
    };
    ($($item:expr),+ $(,)?) => {{
        let mut items: ::std::vec::Vec<$crate::Ex> = ::std::vec::Vec::new();
        let _ = $crate::builder::ContainerInit::new(&mut items)$(.push($item))+;
        $crate::Ex::lst(items)
    }};
}
