//! Expression nodes.
//!
//! A [`Node`] is the unit of sharing: one kind tag ([`NodeData`]), an ordered
//! operand list of [`Ex`] handles, a cached structural hash and a small flag
//! set. Nodes are reached only through `Ex`; the reference count lives in the
//! `Rc` that owns the node.

use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

use crate::ex::Ex;
use crate::flags::{Info, ReturnType, StatusFlags};
use crate::kind::TypeTag;
use crate::numeric::Number;

/// Operand storage; most nodes have at most two operands.
pub type Operands = SmallVec<[Ex; 2]>;

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionId {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Log,
    /// Absolute value.
    Abs,
    /// Order term `O(x^n)` of a truncated series.
    Order,
}

impl FunctionId {
    /// Every built-in function, in declaration order.
    pub const ALL: [FunctionId; 7] = [
        FunctionId::Sin,
        FunctionId::Cos,
        FunctionId::Tan,
        FunctionId::Exp,
        FunctionId::Log,
        FunctionId::Abs,
        FunctionId::Order,
    ];

    /// Name used by the parser and printer.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FunctionId::Sin => "sin",
            FunctionId::Cos => "cos",
            FunctionId::Tan => "tan",
            FunctionId::Exp => "exp",
            FunctionId::Log => "log",
            FunctionId::Abs => "abs",
            FunctionId::Order => "Order",
        }
    }

    /// Number of arguments.
    #[must_use]
    pub const fn nparams(self) -> usize {
        1
    }

    /// Looks a function up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// Named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstantId {
    /// Archimedes' constant.
    Pi,
    /// Euler–Mascheroni constant.
    Euler,
    /// Catalan's constant.
    Catalan,
}

impl ConstantId {
    /// Name used by the parser and printer.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ConstantId::Pi => "Pi",
            ConstantId::Euler => "Euler",
            ConstantId::Catalan => "Catalan",
        }
    }

    /// Floating-point value.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            ConstantId::Pi => std::f64::consts::PI,
            ConstantId::Euler => 0.577_215_664_901_532_9,
            ConstantId::Catalan => 0.915_965_594_177_219,
        }
    }

    /// Looks a constant up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [ConstantId::Pi, ConstantId::Euler, ConstantId::Catalan]
            .into_iter()
            .find(|id| id.name() == name)
    }
}

/// Relation operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelOp {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
}

impl RelOp {
    /// Operator text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            RelOp::Equal => "==",
            RelOp::NotEqual => "!=",
            RelOp::Less => "<",
            RelOp::LessOrEqual => "<=",
            RelOp::Greater => ">",
            RelOp::GreaterOrEqual => ">=",
        }
    }
}

/// Identity of a symbol.
///
/// Two symbols are the same symbol iff their serials agree; the name is only
/// used for printing and parsing.
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    /// Unique serial.
    pub serial: u32,
    /// Display name.
    pub name: Rc<str>,
    /// False for symbols of a non-commutative algebra.
    pub commutative: bool,
}

static NEXT_SERIAL: AtomicU32 = AtomicU32::new(0);

impl SymbolInfo {
    /// Creates a fresh symbol identity.
    #[must_use]
    pub fn fresh(name: &str, commutative: bool) -> Self {
        Self {
            serial: NEXT_SERIAL.fetch_add(1, AtomicOrdering::Relaxed),
            name: Rc::from(name),
            commutative,
        }
    }
}

/// The kind of a node plus its non-operand payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// A number; no operands.
    Numeric(Number),
    /// A named constant; no operands.
    Constant(ConstantId),
    /// A symbol; no operands.
    Symbol(SymbolInfo),
    /// A wildcard with its label; no operands.
    Wildcard(u32),
    /// Sum of the operands.
    Add,
    /// Commutative product of the operands.
    Mul,
    /// Ordered product of the operands.
    NcMul,
    /// `op(0)^op(1)`.
    Power,
    /// Function applied to the operands.
    Function(FunctionId),
    /// `op(0)` indexed by the remaining operands.
    Indexed,
    /// List of the operands.
    Lst,
    /// Row-major matrix of the operands.
    Matrix {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
    /// `op(0) <op> op(1)`.
    Relational(RelOp),
}

impl NodeData {
    /// The type tag of this kind.
    #[must_use]
    pub fn tag(&self) -> TypeTag {
        match self {
            NodeData::Numeric(_) => TypeTag::Numeric,
            NodeData::Constant(_) => TypeTag::Constant,
            NodeData::Symbol(_) => TypeTag::Symbol,
            NodeData::Wildcard(_) => TypeTag::Wildcard,
            NodeData::Add => TypeTag::Add,
            NodeData::Mul => TypeTag::Mul,
            NodeData::NcMul => TypeTag::NcMul,
            NodeData::Power => TypeTag::Power,
            NodeData::Function(_) => TypeTag::Function,
            NodeData::Indexed => TypeTag::Indexed,
            NodeData::Lst => TypeTag::Lst,
            NodeData::Matrix { .. } => TypeTag::Matrix,
            NodeData::Relational(_) => TypeTag::Relational,
        }
    }

    /// Orders payloads of the same kind.
    fn compare_payload(&self, other: &NodeData) -> Ordering {
        match (self, other) {
            (NodeData::Numeric(a), NodeData::Numeric(b)) => a.compare(b),
            (NodeData::Constant(a), NodeData::Constant(b)) => a.cmp(b),
            (NodeData::Symbol(a), NodeData::Symbol(b)) => {
                a.name.cmp(&b.name).then(a.serial.cmp(&b.serial))
            }
            (NodeData::Wildcard(a), NodeData::Wildcard(b)) => a.cmp(b),
            (NodeData::Function(a), NodeData::Function(b)) => a.cmp(b),
            (
                NodeData::Matrix { rows: r1, cols: c1 },
                NodeData::Matrix { rows: r2, cols: c2 },
            ) => r1.cmp(r2).then(c1.cmp(c2)),
            (NodeData::Relational(a), NodeData::Relational(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    fn hash_payload(&self, state: &mut FxHasher) {
        self.tag().hash(state);
        match self {
            NodeData::Numeric(n) => n.hash(state),
            NodeData::Constant(id) => id.hash(state),
            NodeData::Symbol(info) => info.serial.hash(state),
            NodeData::Wildcard(label) => label.hash(state),
            NodeData::Function(id) => id.hash(state),
            NodeData::Matrix { rows, cols } => (rows, cols).hash(state),
            NodeData::Relational(op) => op.hash(state),
            NodeData::Add
            | NodeData::Mul
            | NodeData::NcMul
            | NodeData::Power
            | NodeData::Indexed
            | NodeData::Lst => {}
        }
    }
}

#[cfg(test)]
thread_local! {
    static LIVE_NODES: Cell<isize> = const { Cell::new(0) };
}

/// Number of nodes alive on this thread (test builds only).
#[cfg(test)]
pub(crate) fn live_nodes() -> isize {
    LIVE_NODES.with(Cell::get)
}

#[cfg(test)]
fn track(delta: isize) {
    LIVE_NODES.with(|n| n.set(n.get() + delta));
}

#[cfg(not(test))]
#[inline]
fn track(_delta: isize) {}

/// A tree element.
///
/// The operand count and kind of a node are fixed once it is shared; only
/// the copy-on-write path in [`Ex`] ever writes operands.
pub struct Node {
    data: NodeData,
    ops: Operands,
    flags: Cell<StatusFlags>,
    hash: Cell<u64>,
}

impl Node {
    /// Creates a node with the given kind and operands.
    #[must_use]
    pub fn new(data: NodeData, ops: impl IntoIterator<Item = Ex>) -> Self {
        track(1);
        Self {
            data,
            ops: ops.into_iter().collect(),
            flags: Cell::new(StatusFlags::empty()),
            hash: Cell::new(0),
        }
    }

    /// Creates a node without operands.
    #[must_use]
    pub fn atom(data: NodeData) -> Self {
        Self::new(data, std::iter::empty())
    }

    /// The kind and payload.
    #[must_use]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// The type tag.
    #[must_use]
    pub fn tag(&self) -> TypeTag {
        self.data.tag()
    }

    /// Number of operands.
    #[must_use]
    pub fn nops(&self) -> usize {
        self.ops.len()
    }

    /// Operand `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= nops()`.
    #[must_use]
    pub fn op(&self, i: usize) -> &Ex {
        &self.ops[i]
    }

    /// All operands.
    #[must_use]
    pub fn ops(&self) -> &[Ex] {
        &self.ops
    }

    /// Mutable operand storage. Invalidates every cached fact.
    pub(crate) fn ops_mut(&mut self) -> &mut Operands {
        self.clear_flags(StatusFlags::EVALUATED | StatusFlags::EXPANDED | StatusFlags::HASH_CALCULATED);
        &mut self.ops
    }

    /// Current flag set.
    #[must_use]
    pub fn flags(&self) -> StatusFlags {
        self.flags.get()
    }

    pub(crate) fn set_flags(&self, flags: StatusFlags) {
        self.flags.set(self.flags.get() | flags);
    }

    pub(crate) fn clear_flags(&self, flags: StatusFlags) {
        self.flags.set(self.flags.get() - flags);
    }

    /// Structural hash, computed once and cached.
    #[must_use]
    pub fn gethash(&self) -> u64 {
        if self.flags().contains(StatusFlags::HASH_CALCULATED) {
            return self.hash.get();
        }
        let mut state = FxHasher::default();
        self.data.hash_payload(&mut state);
        self.ops.len().hash(&mut state);
        for op in &self.ops {
            op.gethash().hash(&mut state);
        }
        let hash = state.finish();
        self.hash.set(hash);
        self.set_flags(StatusFlags::HASH_CALCULATED);
        hash
    }

    /// Total structural order used for canonical sorting.
    #[must_use]
    pub fn compare(&self, other: &Node) -> Ordering {
        if std::ptr::eq(self, other) {
            return Ordering::Equal;
        }
        self.tag()
            .cmp(&other.tag())
            .then_with(|| self.data.compare_payload(&other.data))
            .then_with(|| self.nops().cmp(&other.nops()))
            .then_with(|| {
                self.ops
                    .iter()
                    .zip(&other.ops)
                    .map(|(a, b)| a.compare(b))
                    .find(|ord| ord.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }

    /// Structural equality.
    #[must_use]
    pub fn is_equal(&self, other: &Node) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.tag() != other.tag()
            || self.nops() != other.nops()
            || self.data.compare_payload(&other.data).is_ne()
        {
            return false;
        }
        let both_hashed = self.flags().contains(StatusFlags::HASH_CALCULATED)
            && other.flags().contains(StatusFlags::HASH_CALCULATED);
        if both_hashed && self.hash.get() != other.hash.get() {
            return false;
        }
        self.ops.iter().zip(&other.ops).all(|(a, b)| a.is_equal(b))
    }

    /// Returns true if both nodes have the same kind and payload; operands
    /// are not compared.
    pub(crate) fn same_payload(&self, other: &Node) -> bool {
        self.tag() == other.tag() && self.data.compare_payload(&other.data).is_eq()
    }

    /// Answers an [`Info`] predicate.
    #[must_use]
    pub fn info(&self, flag: Info) -> bool {
        if flag == Info::Expanded {
            return self.ops.is_empty() || self.flags().contains(StatusFlags::EXPANDED);
        }
        match &self.data {
            NodeData::Numeric(n) => numeric_info(n, flag),
            NodeData::Constant(_) => matches!(
                flag,
                Info::Real
                    | Info::Positive
                    | Info::NonNegative
                    | Info::Polynomial
                    | Info::RationalPolynomial
                    | Info::IntegerPolynomial
            ),
            NodeData::Symbol(_) => matches!(
                flag,
                Info::Symbol | Info::Polynomial | Info::IntegerPolynomial | Info::RationalPolynomial
            ),
            NodeData::Lst => flag == Info::List,
            NodeData::Relational(op) => match flag {
                Info::Relation => true,
                Info::RelationEqual => *op == RelOp::Equal,
                Info::RelationNotEqual => *op == RelOp::NotEqual,
                _ => false,
            },
            NodeData::Add | NodeData::Mul => match flag {
                Info::Polynomial | Info::IntegerPolynomial | Info::RationalPolynomial => {
                    self.ops.iter().all(|op| op.info(flag))
                }
                _ => false,
            },
            NodeData::Power => match flag {
                Info::Polynomial | Info::IntegerPolynomial | Info::RationalPolynomial => {
                    self.op(0).info(flag) && self.op(1).info(Info::NonNegInt)
                }
                _ => false,
            },
            NodeData::Wildcard(_)
            | NodeData::NcMul
            | NodeData::Function(_)
            | NodeData::Indexed
            | NodeData::Matrix { .. } => false,
        }
    }

    /// Commutativity class of the node.
    #[must_use]
    pub fn return_type(&self) -> ReturnType {
        match &self.data {
            NodeData::Symbol(info) if !info.commutative => ReturnType::NonCommutative,
            NodeData::Add => self
                .ops
                .first()
                .map_or(ReturnType::Commutative, Ex::return_type),
            // a canonical Mul holds at most one non-commutative factor
            NodeData::Mul | NodeData::NcMul => {
                if self.ops.iter().any(|op| op.return_type() != ReturnType::Commutative) {
                    ReturnType::NonCommutative
                } else {
                    ReturnType::Commutative
                }
            }
            NodeData::Power if self.op(1).info(Info::Integer) => self.op(0).return_type(),
            NodeData::Indexed => self.op(0).return_type(),
            NodeData::Matrix { .. } => ReturnType::NonCommutative,
            _ => ReturnType::Commutative,
        }
    }
}

fn numeric_info(n: &Number, flag: Info) -> bool {
    match flag {
        Info::Numeric | Info::Real | Info::Polynomial => true,
        Info::Rational | Info::RationalPolynomial => n.is_exact(),
        Info::Integer | Info::IntegerPolynomial => n.is_integer(),
        Info::Positive => n.is_positive(),
        Info::Negative => n.is_negative(),
        Info::NonNegative => !n.is_negative(),
        Info::PosInt => n.is_integer() && n.is_positive(),
        Info::NegInt => n.is_integer() && n.is_negative(),
        Info::NonNegInt => n.is_integer() && !n.is_negative(),
        Info::Even => n.is_even(),
        Info::Odd => n.is_odd(),
        _ => false,
    }
}

impl Clone for Node {
    /// Shallow copy: operands are shared, transient flags are dropped.
    fn clone(&self) -> Self {
        track(1);
        let keep = StatusFlags::EVALUATED | StatusFlags::EXPANDED | StatusFlags::HASH_CALCULATED;
        Self {
            data: self.data.clone(),
            ops: self.ops.clone(),
            flags: Cell::new(self.flags() & keep),
            hash: Cell::new(self.hash.get()),
        }
    }
}

impl Drop for Node {
    /// Releases the subtree with an explicit work list so that deep trees do
    /// not recurse once per level.
    fn drop(&mut self) {
        track(-1);
        if self.ops.is_empty() {
            return;
        }
        let mut pending: Vec<Ex> = self.ops.drain(..).collect();
        while let Some(child) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(child.into_rc()) {
                pending.extend(node.ops.drain(..));
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("data", &self.data)
            .field("ops", &self.ops)
            .field("flags", &self.flags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Node {
        Node::atom(NodeData::Symbol(SymbolInfo::fresh(name, true)))
    }

    #[test]
    fn test_symbols_are_distinct_by_serial() {
        let a = sym("x");
        let b = sym("x");
        assert!(!a.is_equal(&b));
        assert!(a.is_equal(&a.clone()));
        assert_ne!(a.compare(&b), Ordering::Equal);
    }

    #[test]
    fn test_hash_is_cached_and_structural() {
        let n = Node::atom(NodeData::Numeric(Number::integer(7)));
        let m = Node::atom(NodeData::Numeric(Number::integer(7)));
        assert!(!n.flags().contains(StatusFlags::HASH_CALCULATED));
        assert_eq!(n.gethash(), m.gethash());
        assert!(n.flags().contains(StatusFlags::HASH_CALCULATED));
    }

    #[test]
    fn test_tag_order_drives_compare() {
        let num = Node::atom(NodeData::Numeric(Number::integer(100)));
        let s = sym("a");
        assert_eq!(num.compare(&s), Ordering::Less);
    }

    #[test]
    fn test_function_lookup() {
        assert_eq!(FunctionId::from_name("sin"), Some(FunctionId::Sin));
        assert_eq!(FunctionId::from_name("sinh"), None);
        assert_eq!(ConstantId::from_name("Pi"), Some(ConstantId::Pi));
    }

    #[test]
    fn test_numeric_info() {
        let n = Node::atom(NodeData::Numeric(Number::integer(-4)));
        assert!(n.info(Info::Integer));
        assert!(n.info(Info::NegInt));
        assert!(n.info(Info::Even));
        assert!(!n.info(Info::NonNegative));
        assert!(!n.info(Info::Symbol));
    }

    #[test]
    fn test_return_type_classification() {
        use crate::ops::pow;

        let (x, a, b) = (Ex::symbol("x"), Ex::symbol_nc("A"), Ex::symbol_nc("B"));
        assert_eq!(x.return_type(), ReturnType::Commutative);
        assert_eq!(a.return_type(), ReturnType::NonCommutative);

        let scaled = 3 * &x * &a;
        assert_eq!(scaled.tag(), TypeTag::Mul);
        assert_eq!(scaled.return_type(), ReturnType::NonCommutative);
        assert_eq!((2 * &x).return_type(), ReturnType::Commutative);

        let ordered = &a * &b;
        assert_eq!(ordered.tag(), TypeTag::NcMul);
        assert_eq!(ordered.return_type(), ReturnType::NonCommutative);
        let mixed = &x * &ordered;
        assert_eq!(mixed.tag(), TypeTag::Mul);
        assert_eq!(mixed.return_type(), ReturnType::NonCommutative);

        assert_eq!(pow(&a, 2).return_type(), ReturnType::NonCommutative);
        assert_eq!(pow(&x, 2).return_type(), ReturnType::Commutative);
        assert_eq!(pow(&a, &x).return_type(), ReturnType::Commutative);
        let m = Ex::matrix(1, 1, [Ex::from(1)]).unwrap();
        assert_eq!(m.return_type(), ReturnType::NonCommutative);
    }
}
