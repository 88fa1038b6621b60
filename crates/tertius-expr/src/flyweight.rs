//! Canonical singleton numbers.
//!
//! The table is created lazily the first time a thread asks for one of its
//! entries and lives until that thread exits. Every entry carries
//! [`StatusFlags::FLYWEIGHT`], so the copy-on-write path clones it before any
//! in-place edit regardless of the observed reference count.

use std::rc::Rc;

use crate::ex::Ex;
use crate::flags::StatusFlags;
use crate::node::{Node, NodeData};
use crate::numeric::Number;

struct Flyweights {
    zero: Ex,
    one: Ex,
    minus_one: Ex,
    two: Ex,
    half: Ex,
}

impl Flyweights {
    fn new() -> Self {
        Self {
            zero: make(Number::integer(0)),
            one: make(Number::integer(1)),
            minus_one: make(Number::integer(-1)),
            two: make(Number::integer(2)),
            half: make(Number::Exact(dashu::rational::RBig::from_parts(
                1.into(),
                2u8.into(),
            ))),
        }
    }
}

fn make(value: Number) -> Ex {
    let node = Node::atom(NodeData::Numeric(value));
    node.set_flags(
        StatusFlags::DYNALLOCATED
            | StatusFlags::EVALUATED
            | StatusFlags::EXPANDED
            | StatusFlags::FLYWEIGHT,
    );
    Ex::from_rc(Rc::new(node))
}

thread_local! {
    static FLYWEIGHTS: Flyweights = Flyweights::new();
}

/// The additive identity.
#[must_use]
pub fn ex0() -> Ex {
    FLYWEIGHTS.with(|f| f.zero.clone())
}

/// The multiplicative identity.
#[must_use]
pub fn ex1() -> Ex {
    FLYWEIGHTS.with(|f| f.one.clone())
}

/// Minus one.
#[must_use]
pub fn ex_1() -> Ex {
    FLYWEIGHTS.with(|f| f.minus_one.clone())
}

/// Two.
#[must_use]
pub fn ex2() -> Ex {
    FLYWEIGHTS.with(|f| f.two.clone())
}

/// One half.
#[must_use]
pub fn ex1_2() -> Ex {
    FLYWEIGHTS.with(|f| f.half.clone())
}

/// Returns the shared node for `value` if the table has one.
pub(crate) fn lookup(value: &Number) -> Option<Ex> {
    if !value.is_exact() {
        return None;
    }
    FLYWEIGHTS.with(|f| {
        [&f.zero, &f.one, &f.minus_one, &f.two, &f.half]
            .into_iter()
            .find(|e| e.as_number() == Some(value))
            .cloned()
    })
}
