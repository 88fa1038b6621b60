//! Operand cursors.

use std::cmp::Ordering;
use std::ops::{Add, Sub};

use crate::ex::Ex;
use crate::node::Node;

/// Random-access cursor over the operands of a node.
///
/// The cursor borrows the node and hands out fresh [`Ex`] handles; it never
/// exposes references into operand storage. Two cursors are equal iff they
/// walk the same node and sit at the same position.
///
/// The cursor is also an [`Iterator`], whose `partial_cmp` method shadows the
/// [`PartialOrd`] one in method-call syntax. Compare positions with `<` or
/// with `PartialOrd::partial_cmp(&a, &b)`.
#[derive(Clone, Copy)]
pub struct ConstIter<'a> {
    node: &'a Node,
    index: usize,
    end: usize,
}

impl<'a> ConstIter<'a> {
    pub(crate) fn new(node: &'a Node, index: usize) -> Self {
        Self {
            node,
            index,
            end: node.nops(),
        }
    }

    /// Position of the cursor.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The operand under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at or past the end.
    #[must_use]
    pub fn get(&self) -> Ex {
        self.node.op(self.index).clone()
    }

    /// Moves the cursor `n` positions forward.
    pub fn advance(&mut self, n: usize) {
        self.index += n;
    }

    /// Moves the cursor `n` positions back.
    ///
    /// # Panics
    ///
    /// Panics if this moves before the first operand.
    pub fn retreat(&mut self, n: usize) {
        self.index = self
            .index
            .checked_sub(n)
            .unwrap_or_else(|| panic!("cursor moved before the first operand"));
    }
}

impl Iterator for ConstIter<'_> {
    type Item = Ex;

    fn next(&mut self) -> Option<Ex> {
        if self.index >= self.end {
            return None;
        }
        let item = self.get();
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end.saturating_sub(self.index);
        (n, Some(n))
    }
}

impl DoubleEndedIterator for ConstIter<'_> {
    fn next_back(&mut self) -> Option<Ex> {
        if self.index >= self.end {
            return None;
        }
        self.end -= 1;
        Some(self.node.op(self.end).clone())
    }
}

impl ExactSizeIterator for ConstIter<'_> {}

impl Add<isize> for ConstIter<'_> {
    type Output = Self;

    fn add(mut self, n: isize) -> Self {
        if n >= 0 {
            self.advance(n.unsigned_abs());
        } else {
            self.retreat(n.unsigned_abs());
        }
        self
    }
}

impl Sub<isize> for ConstIter<'_> {
    type Output = Self;

    fn sub(self, n: isize) -> Self {
        self + -n
    }
}

impl Sub for ConstIter<'_> {
    type Output = isize;

    /// Signed distance between two cursors over the same node.
    #[allow(clippy::cast_possible_wrap)]
    fn sub(self, other: Self) -> isize {
        debug_assert!(std::ptr::eq(self.node, other.node));
        self.index as isize - other.index as isize
    }
}

impl PartialEq for ConstIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node) && self.index == other.index
    }
}

impl Eq for ConstIter<'_> {}

impl PartialOrd for ConstIter<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        std::ptr::eq(self.node, other.node).then(|| self.index.cmp(&other.index))
    }
}

impl std::fmt::Debug for ConstIter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstIter")
            .field("node", &std::ptr::from_ref(self.node))
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Ex {
        Ex::lst([Ex::from(10), Ex::symbol("y"), Ex::from(30)])
    }

    #[test]
    fn test_get_at_offset() {
        let l = three();
        let it = l.begin() + 1;
        assert_eq!(it.get(), l.op(1));
        assert_eq!((it - 1).get(), Ex::from(10));
    }

    #[test]
    fn test_distance() {
        let l = three();
        assert_eq!(l.end() - l.begin(), 3);
        let a = l.begin();
        let b = a + 2;
        assert_eq!(b - a, 2);
        assert_eq!(a - b, -2);
    }

    #[test]
    fn test_equality_needs_same_node() {
        let l = three();
        let m = three();
        assert_eq!(l.begin() + 3, l.end());
        assert_ne!(l.begin(), m.begin());
        assert!(l.begin() < l.end());
        assert_eq!(PartialOrd::partial_cmp(&l.begin(), &m.begin()), None);
        assert_eq!(PartialOrd::partial_cmp(&l.begin(), &l.end()), Some(Ordering::Less));
    }

    #[test]
    fn test_iterator_traits() {
        let l = three();
        assert_eq!(l.iter().len(), 3);
        let rev: Vec<Ex> = l.iter().rev().collect();
        assert_eq!(rev[0], Ex::from(30));
        let forward: Vec<Ex> = (&l).into_iter().collect();
        assert_eq!(forward, l.ops().to_vec());
    }

    #[test]
    fn test_advance_and_retreat() {
        let l = three();
        let mut it = l.begin();
        it.advance(2);
        assert_eq!(it.get(), Ex::from(30));
        it.retreat(1);
        assert_eq!(it.index(), 1);
    }
}
