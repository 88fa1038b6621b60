//! The expression handle.
//!
//! [`Ex`] owns exactly one shared [`Node`]. Cloning an `Ex` bumps the
//! reference count; nothing is ever copied until a write needs a private
//! node (copy-on-write). Every algebraic request is routed to the node's
//! kind and returns a new handle.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};
use std::rc::Rc;

use crate::builder::Sequence;
use crate::cast::try_ex_to;
use crate::error::{ExError, Result};
use crate::flags::{ExpandOptions, Info, ReturnType, SeriesOptions, StatusFlags, SubsOptions};
use crate::flyweight;
use crate::iter::ConstIter;
use crate::kind::{Lst, Symbol, TypeTag};
use crate::node::{ConstantId, FunctionId, Node, NodeData, RelOp, SymbolInfo};
use crate::numeric::Number;
use crate::pattern::Bindings;
use crate::print::PrintContext;
use crate::{diff, eval, indices, matrix, parser, pattern, poly, series, subs};

/// Lightweight, value-semantic handle to an expression tree.
#[derive(Clone)]
pub struct Ex {
    node: Rc<Node>,
}

impl Ex {
    // === Ownership ===

    pub(crate) fn from_rc(node: Rc<Node>) -> Self {
        Self { node }
    }

    pub(crate) fn into_rc(self) -> Rc<Node> {
        self.node
    }

    /// Wraps a node and takes shared ownership of it.
    ///
    /// The node is kept as given; call [`Ex::eval`] to bring it into
    /// canonical form.
    #[must_use]
    pub fn from_node(node: Node) -> Self {
        node.set_flags(StatusFlags::DYNALLOCATED);
        Self::from_rc(Rc::new(node))
    }

    /// Wraps a node that is already canonical.
    pub(crate) fn evaluated(node: Node) -> Self {
        node.set_flags(StatusFlags::EVALUATED);
        Self::from_node(node)
    }

    /// Wraps a container node; it counts as canonical only if all of its
    /// operands are.
    fn container(node: Node) -> Self {
        let canonical = node
            .ops()
            .iter()
            .all(|op| op.node().flags().contains(StatusFlags::EVALUATED));
        if canonical {
            Self::evaluated(node)
        } else {
            Self::from_node(node)
        }
    }

    /// The node this handle points to.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Number of handles sharing the node, including this one.
    #[must_use]
    pub fn refcount(&self) -> usize {
        Rc::strong_count(&self.node)
    }

    /// Returns a node this handle owns exclusively, cloning it first when it
    /// is shared or a flyweight.
    fn make_writable(&mut self) -> &mut Node {
        let shared = Rc::strong_count(&self.node) > 1
            || Rc::weak_count(&self.node) > 0
            || self.node.flags().contains(StatusFlags::FLYWEIGHT);
        if shared {
            tracing::trace!(
                kind = %self.node.tag(),
                refcount = Rc::strong_count(&self.node),
                "copy-on-write clone"
            );
            let copy = (*self.node).clone();
            copy.set_flags(StatusFlags::DYNALLOCATED);
            self.node = Rc::new(copy);
        }
        Rc::make_mut(&mut self.node)
    }

    /// Exchanges the nodes of two handles without touching reference counts.
    pub fn swap(&mut self, other: &mut Ex) {
        std::mem::swap(&mut self.node, &mut other.node);
    }

    // === Construction ===

    /// Wraps a number, reusing a flyweight when one exists.
    #[must_use]
    pub fn number(value: Number) -> Self {
        if let Some(shared) = flyweight::lookup(&value) {
            return shared;
        }
        let node = Node::atom(NodeData::Numeric(value));
        node.set_flags(StatusFlags::EXPANDED);
        Self::evaluated(node)
    }

    /// Declares a fresh commutative symbol.
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Self::evaluated(Node::atom(NodeData::Symbol(SymbolInfo::fresh(name, true))))
    }

    /// Declares a fresh non-commutative symbol.
    #[must_use]
    pub fn symbol_nc(name: &str) -> Self {
        Self::evaluated(Node::atom(NodeData::Symbol(SymbolInfo::fresh(name, false))))
    }

    /// A pattern wildcard.
    #[must_use]
    pub fn wild(label: u32) -> Self {
        Self::evaluated(Node::atom(NodeData::Wildcard(label)))
    }

    /// A named constant.
    #[must_use]
    pub fn constant(id: ConstantId) -> Self {
        Self::evaluated(Node::atom(NodeData::Constant(id)))
    }

    /// A list of the given elements.
    #[must_use]
    pub fn lst(items: impl IntoIterator<Item = Ex>) -> Self {
        Self::container(Node::new(NodeData::Lst, items))
    }

    /// A `rows` × `cols` matrix from row-major entries.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::InvalidArgument`] if the entry count does not match.
    pub fn matrix(rows: usize, cols: usize, entries: impl IntoIterator<Item = Ex>) -> Result<Self> {
        let node = Node::new(NodeData::Matrix { rows, cols }, entries);
        if node.nops() != rows * cols {
            return Err(ExError::InvalidArgument(format!(
                "{} entries for a {rows}x{cols} matrix",
                node.nops()
            )));
        }
        Ok(Self::container(node))
    }

    /// `base` carrying the given indices.
    #[must_use]
    pub fn indexed(base: Ex, indices: impl IntoIterator<Item = Ex>) -> Self {
        Self::container(Node::new(
            NodeData::Indexed,
            std::iter::once(base).chain(indices),
        ))
    }

    /// The relation `lhs op rhs`.
    #[must_use]
    pub fn relational(lhs: Ex, op: RelOp, rhs: Ex) -> Self {
        Self::container(Node::new(NodeData::Relational(op), [lhs, rhs]))
    }

    /// The equation `lhs == rhs`.
    #[must_use]
    pub fn equation(lhs: impl Into<Ex>, rhs: impl Into<Ex>) -> Self {
        Self::relational(lhs.into(), RelOp::Equal, rhs.into())
    }

    /// Applies a built-in function.
    ///
    /// # Errors
    ///
    /// Returns an error if the function has a pole at `arg`, e.g. `log(0)`.
    pub fn function(id: FunctionId, arg: Ex) -> Result<Self> {
        eval::function(id, arg)
    }

    /// Parses `text`, resolving names against the declared `symbols`.
    ///
    /// `symbols` is a list of symbols (or a single symbol). Function names
    /// (`sin`, `log`, ...) and constants (`Pi`, ...) are always known.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::Parse`] for malformed text and
    /// [`ExError::UndeclaredSymbol`] for names not in `symbols`.
    pub fn parse(text: &str, symbols: &Ex) -> Result<Self> {
        parser::parse(text, symbols)
    }

    /// Sum of the given terms, in canonical form.
    #[must_use]
    pub fn add(terms: impl IntoIterator<Item = Ex>) -> Self {
        eval::add(terms)
    }

    /// Product of the given factors, in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::DivisionByZero`] if combining factors produces a
    /// negative power of zero and [`ExError::InvalidArgument`] if it
    /// produces `0^0`.
    pub fn try_mul(factors: impl IntoIterator<Item = Ex>) -> Result<Self> {
        eval::mul(factors)
    }

    /// Ordered product of the given factors.
    ///
    /// # Errors
    ///
    /// As [`Ex::try_mul`].
    pub fn ncmul(factors: impl IntoIterator<Item = Ex>) -> Result<Self> {
        eval::ncmul(factors)
    }

    /// `self^exponent` in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::DivisionByZero`] for a negative power of zero and
    /// [`ExError::InvalidArgument`] for `0^0`.
    pub fn try_pow(&self, exponent: impl Into<Ex>) -> Result<Self> {
        eval::power(self.clone(), exponent.into())
    }

    // === Operands ===

    /// The type tag of the node.
    #[must_use]
    pub fn tag(&self) -> TypeTag {
        self.node.tag()
    }

    /// Number of operands.
    #[must_use]
    pub fn nops(&self) -> usize {
        self.node.nops()
    }

    /// Operand `i` as a new handle.
    ///
    /// # Panics
    ///
    /// Panics if `i >= nops()`.
    #[must_use]
    pub fn op(&self, i: usize) -> Ex {
        self.node.op(i).clone()
    }

    /// Operand `i`, checked.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::IndexOutOfRange`] if `i >= nops()`.
    pub fn try_op(&self, i: usize) -> Result<Ex> {
        self.node.ops().get(i).cloned().ok_or(ExError::IndexOutOfRange {
            index: i,
            nops: self.nops(),
        })
    }

    /// All operands.
    #[must_use]
    pub fn ops(&self) -> &[Ex] {
        self.node.ops()
    }

    /// Writable access to operand `i`, unsharing the node first.
    ///
    /// The node loses its canonical-form flag; call [`Ex::eval`] after
    /// editing.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::IndexOutOfRange`] if `i >= nops()`.
    pub fn let_op(&mut self, i: usize) -> Result<&mut Ex> {
        let nops = self.nops();
        if i >= nops {
            return Err(ExError::IndexOutOfRange { index: i, nops });
        }
        Ok(&mut self.make_writable().ops_mut()[i])
    }

    /// Operand selected by an expression index, which must be an exact
    /// non-negative integer.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::InvalidArgument`] for any other index and
    /// [`ExError::IndexOutOfRange`] past the last operand.
    pub fn op_at(&self, index: &Ex) -> Result<Ex> {
        self.try_op(operand_index(index)?)
    }

    /// Writable operand selected by an expression index; see [`Ex::op_at`].
    ///
    /// # Errors
    ///
    /// As [`Ex::op_at`].
    pub fn let_op_at(&mut self, index: &Ex) -> Result<&mut Ex> {
        let i = operand_index(index)?;
        self.let_op(i)
    }

    /// Overwrites the matrix entry at row `r`, column `c`.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::TypeMismatch`] if this is not a matrix and
    /// [`ExError::IndexOutOfRange`] for a position outside it.
    pub fn matrix_set(&mut self, r: usize, c: usize, value: Ex) -> Result<()> {
        let m = try_ex_to::<crate::kind::Matrix>(self)?;
        let (rows, cols) = (m.rows(), m.cols());
        if r >= rows || c >= cols {
            return Err(ExError::IndexOutOfRange {
                index: r * cols + c,
                nops: rows * cols,
            });
        }
        *self.let_op(r * cols + c)? = value;
        Ok(())
    }

    /// Appends an element to a list.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::TypeMismatch`] if this is not a list.
    pub fn append(&mut self, item: impl Into<Ex>) -> Result<()> {
        try_ex_to::<Lst>(self)?;
        self.make_writable().ops_mut().push(item.into());
        Ok(())
    }

    /// Cursor at the first operand.
    #[must_use]
    pub fn begin(&self) -> ConstIter<'_> {
        ConstIter::new(&self.node, 0)
    }

    /// Cursor one past the last operand.
    #[must_use]
    pub fn end(&self) -> ConstIter<'_> {
        ConstIter::new(&self.node, self.nops())
    }

    /// Iterates over the operands, yielding new handles.
    #[must_use]
    pub fn iter(&self) -> ConstIter<'_> {
        self.begin()
    }

    // === Comparison ===

    /// Total structural order; identical nodes compare equal without a walk.
    #[must_use]
    pub fn compare(&self, other: &Ex) -> Ordering {
        if Rc::ptr_eq(&self.node, &other.node) {
            return Ordering::Equal;
        }
        self.node.compare(&other.node)
    }

    /// Structural equality; identical nodes are equal without a walk.
    #[must_use]
    pub fn is_equal(&self, other: &Ex) -> bool {
        if Rc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        self.node.is_equal(&other.node)
    }

    /// Structural hash.
    #[must_use]
    pub fn gethash(&self) -> u64 {
        self.node.gethash()
    }

    /// The number stored in a numeric node.
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self.node.data() {
            NodeData::Numeric(n) => Some(n),
            _ => None,
        }
    }

    /// Returns true if the expression is the number zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(num_traits::Zero::is_zero)
    }

    /// Returns true if the expression is the number one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(num_traits::One::is_one)
    }

    /// Answers an [`Info`] predicate.
    #[must_use]
    pub fn info(&self, flag: Info) -> bool {
        self.node.info(flag)
    }

    /// Commutativity class.
    #[must_use]
    pub fn return_type(&self) -> ReturnType {
        self.node.return_type()
    }

    /// Left-hand side of a relation.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::TypeMismatch`] if this is not a relation.
    pub fn lhs(&self) -> Result<Ex> {
        Ok(try_ex_to::<crate::kind::Relational>(self)?.lhs().clone())
    }

    /// Right-hand side of a relation.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::TypeMismatch`] if this is not a relation.
    pub fn rhs(&self) -> Result<Ex> {
        Ok(try_ex_to::<crate::kind::Relational>(self)?.rhs().clone())
    }

    // === Algebra ===

    /// Brings the expression into canonical form.
    ///
    /// `level == 1` evaluates only the top node, `level == 0` the whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::RecursionLimit`] if the tree is deeper than the
    /// evaluation budget, or any error of the canonical constructors.
    pub fn eval(&self, level: i32) -> Result<Ex> {
        eval::eval(self, level)
    }

    /// Evaluates numbers and constants to floats.
    ///
    /// # Errors
    ///
    /// As [`Ex::eval`].
    pub fn evalf(&self, level: i32) -> Result<Ex> {
        eval::evalf(self, level)
    }

    /// Distributes products over sums.
    ///
    /// # Errors
    ///
    /// Returns an error if re-canonicalising an expanded product fails.
    pub fn expand(&self, options: ExpandOptions) -> Result<Ex> {
        eval::expand(self, options)
    }

    /// `nth` derivative with respect to the symbol `s`.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::TypeMismatch`] if `s` is not a symbol and
    /// [`ExError::Unsupported`] for kinds without a derivative.
    pub fn diff(&self, s: &Ex, nth: u32) -> Result<Ex> {
        diff::diff(self, s, nth)
    }

    /// Truncated series about `rel` (`x == p`, or a bare symbol for `p = 0`).
    ///
    /// # Errors
    ///
    /// Returns [`ExError::Series`] at poles and branch cuts.
    pub fn series(&self, rel: &Ex, order: i32, options: SeriesOptions) -> Result<Ex> {
        series::series(self, rel, order, options)
    }

    /// Substitutes `to[i]` for every occurrence of `from[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::InvalidArgument`] if the lists differ in length.
    pub fn subs_lists(&self, from: &[Ex], to: &[Ex], options: SubsOptions) -> Result<Ex> {
        subs::subs_lists(self, from, to, options)
    }

    /// Substitutes according to an equation `a == b` or a list of them.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::InvalidArgument`] if `rules` holds anything but
    /// equations.
    pub fn subs(&self, rules: &Ex, options: SubsOptions) -> Result<Ex> {
        subs::subs(self, rules, options)
    }

    /// Matches against a pattern, returning the wildcard bindings.
    #[must_use]
    pub fn matches(&self, pattern: &Ex) -> Option<Bindings> {
        let mut bindings = Bindings::new();
        pattern::match_with(self, pattern, &mut bindings).then_some(bindings)
    }

    /// Matches against a pattern, extending existing bindings.
    ///
    /// On failure `bindings` is left as it was.
    pub fn match_with(&self, pattern: &Ex, bindings: &mut Bindings) -> bool {
        pattern::match_with(self, pattern, bindings)
    }

    /// Returns true if the expression or any subexpression matches `pattern`.
    #[must_use]
    pub fn has(&self, pattern: &Ex) -> bool {
        pattern::has(self, pattern)
    }

    /// All distinct subexpressions matching `pattern`, sorted.
    #[must_use]
    pub fn find(&self, pattern: &Ex) -> Vec<Ex> {
        pattern::find(self, pattern)
    }

    /// Applies `f` to every operand and rebuilds the node.
    ///
    /// # Errors
    ///
    /// Propagates errors from `f` and from re-canonicalisation.
    pub fn map<F>(&self, f: F) -> Result<Ex>
    where
        F: FnMut(&Ex) -> Result<Ex>,
    {
        subs::map(self, f)
    }

    /// Highest power of `s`.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::Inconsistency`] if `s` occurs under a non-integer
    /// exponent.
    pub fn degree(&self, s: &Ex) -> Result<i32> {
        poly::degree(self, s)
    }

    /// Lowest power of `s`.
    ///
    /// # Errors
    ///
    /// As [`Ex::degree`].
    pub fn ldegree(&self, s: &Ex) -> Result<i32> {
        poly::ldegree(self, s)
    }

    /// Coefficient of `s^n`.
    ///
    /// # Errors
    ///
    /// Returns an error if rebuilding the coefficient fails.
    pub fn coeff(&self, s: &Ex, n: i32) -> Result<Ex> {
        poly::coeff(self, s, n)
    }

    /// Leading coefficient in `s`.
    ///
    /// # Errors
    ///
    /// As [`Ex::degree`].
    pub fn lcoeff(&self, s: &Ex) -> Result<Ex> {
        self.coeff(s, self.degree(s)?)
    }

    /// Trailing coefficient in `s`.
    ///
    /// # Errors
    ///
    /// As [`Ex::degree`].
    pub fn tcoeff(&self, s: &Ex) -> Result<Ex> {
        self.coeff(s, self.ldegree(s)?)
    }

    /// Returns true if the expression is a polynomial in `var`.
    #[must_use]
    pub fn is_polynomial(&self, var: &Ex) -> bool {
        poly::is_polynomial(self, var)
    }

    /// Reduces integer coefficients into the symmetric range modulo `xi`.
    ///
    /// # Errors
    ///
    /// Returns an error if rebuilding a reduced product fails.
    pub fn smod(&self, xi: &Number) -> Result<Ex> {
        eval::smod(self, xi)
    }

    /// Gcd of the numeric coefficients of an expanded polynomial.
    #[must_use]
    pub fn integer_content(&self) -> Number {
        poly::integer_content(self)
    }

    /// Largest absolute numeric coefficient of an expanded polynomial.
    #[must_use]
    pub fn max_coefficient(&self) -> Number {
        poly::max_coefficient(self)
    }

    /// Groups the expression by powers of `s`. `s` may be a list of
    /// variables: the result is then recursive in them, or sorted by
    /// monomials when `distributed` is set.
    ///
    /// # Errors
    ///
    /// As [`Ex::degree`], for every variable collected.
    pub fn collect(&self, s: &Ex, distributed: bool) -> Result<Ex> {
        poly::collect(self, s, distributed)
    }

    /// Evaluates sums, products and integer powers of matrices.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::InvalidArgument`] for matrices of incompatible
    /// shapes and [`ExError::Unsupported`] for negative matrix powers.
    pub fn evalm(&self) -> Result<Ex> {
        matrix::evalm(self)
    }

    /// Indices that are not contracted.
    ///
    /// # Errors
    ///
    /// Returns [`ExError::Inconsistency`] for sums whose terms disagree and
    /// for indices repeated more than twice.
    pub fn get_free_indices(&self) -> Result<Vec<Ex>> {
        indices::free_indices(self)
    }

    // === Output ===

    /// Prints through a print context; `level` is the binding strength of
    /// the surrounding context.
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying writer.
    pub fn print(&self, c: &mut PrintContext<'_>, level: u32) -> fmt::Result {
        crate::print::print(self, c, level)
    }

    /// Writes the expression to standard error.
    pub fn dbgprint(&self) {
        eprintln!("{self}");
    }

    /// Writes the node tree with flags and counts to standard error.
    pub fn dbgprinttree(&self) {
        eprint!("{}", crate::print::tree_string(self));
    }
}

/// Identity-only equality probe.
///
/// `true` guarantees structural equality; `false` is inconclusive.
#[must_use]
pub fn are_trivially_equal(a: &Ex, b: &Ex) -> bool {
    Rc::ptr_eq(&a.node, &b.node)
}

/// Exchanges two handles.
pub fn swap(a: &mut Ex, b: &mut Ex) {
    a.swap(b);
}

impl Default for Ex {
    fn default() -> Self {
        flyweight::ex0()
    }
}

impl PartialEq for Ex {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for Ex {}

impl PartialOrd for Ex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

fn operand_index(index: &Ex) -> Result<usize> {
    index
        .as_number()
        .and_then(Number::to_i64)
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| {
            ExError::InvalidArgument(format!("operand index {index} is not a non-negative integer"))
        })
}

impl Hash for Ex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.gethash());
    }
}

impl Index<usize> for Ex {
    type Output = Ex;

    fn index(&self, i: usize) -> &Ex {
        self.node.op(i)
    }
}

impl IndexMut<usize> for Ex {
    /// Unshares the node before handing out the operand.
    fn index_mut(&mut self, i: usize) -> &mut Ex {
        let nops = self.nops();
        assert!(i < nops, "operand index {i} out of range for {nops} operands");
        &mut self.make_writable().ops_mut()[i]
    }
}

impl<'a> IntoIterator for &'a Ex {
    type Item = Ex;
    type IntoIter = ConstIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl From<Node> for Ex {
    fn from(node: Node) -> Self {
        Ex::from_node(node)
    }
}

impl From<Number> for Ex {
    fn from(value: Number) -> Self {
        Ex::number(value)
    }
}

impl From<&Ex> for Ex {
    fn from(e: &Ex) -> Self {
        e.clone()
    }
}

impl From<Symbol<'_>> for Ex {
    /// Wraps a declared symbol. The copy keeps the symbol's serial, so it is
    /// the same symbol.
    fn from(s: Symbol<'_>) -> Self {
        Ex::evaluated(s.node().clone())
    }
}

impl From<i32> for Ex {
    fn from(value: i32) -> Self {
        Ex::number(Number::integer(i64::from(value)))
    }
}

impl From<u32> for Ex {
    fn from(value: u32) -> Self {
        Ex::number(Number::integer(i64::from(value)))
    }
}

impl From<i64> for Ex {
    fn from(value: i64) -> Self {
        Ex::number(Number::integer(value))
    }
}

impl From<u64> for Ex {
    fn from(value: u64) -> Self {
        Ex::number(Number::from(dashu::integer::IBig::from(value)))
    }
}

impl From<f64> for Ex {
    fn from(value: f64) -> Self {
        Ex::number(Number::float(value))
    }
}

impl Sequence for Ex {
    type Element = Ex;

    /// Appends to a list.
    ///
    /// # Panics
    ///
    /// Panics if the expression is not a list.
    fn push_back(&mut self, item: Ex) {
        if let Err(err) = self.append(item) {
            panic!("{err}");
        }
    }
}

impl fmt::Display for Ex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut c = PrintContext::new(f);
        self.print(&mut c, 0)
    }
}

impl fmt::Debug for Ex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ex({self})")
    }
}
