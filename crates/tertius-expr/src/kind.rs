//! Node kinds and their place in the type hierarchy.
//!
//! Every concrete node has a [`TypeTag`]. Tags form a tree rooted at
//! [`TypeTag::Basic`]; hierarchical queries walk the parent chain, exact
//! queries compare tags directly.
//!
//! Each tag has a typed view (`Symbol`, `Power`, ...) that borrows a [`Node`].
//! Views are obtained through [`crate::cast::ex_to`] and expose the
//! kind-specific accessors; they live as long as the handle they came from.

use std::fmt;
use std::ops::Deref;

use crate::ex::Ex;
use crate::node::{ConstantId, FunctionId, Node, NodeData, RelOp};
use crate::numeric::Number;

/// Dynamic type tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    /// Root of the hierarchy. Never the tag of a concrete node.
    Basic,
    /// Exact or float number.
    Numeric,
    /// Named mathematical constant.
    Constant,
    /// Symbolic variable.
    Symbol,
    /// Pattern wildcard.
    Wildcard,
    /// Abstract base of sums and products.
    ExPairSeq,
    /// Sum.
    Add,
    /// Commutative product.
    Mul,
    /// Non-commutative product.
    NcMul,
    /// Power `base^exponent`.
    Power,
    /// Abstract base of sequence-like kinds.
    ExprSeq,
    /// Function application.
    Function,
    /// Indexed object `base.i.j`.
    Indexed,
    /// List.
    Lst,
    /// Matrix.
    Matrix,
    /// Relation between two expressions.
    Relational,
}

impl TypeTag {
    /// Returns the parent kind, `None` for [`TypeTag::Basic`].
    #[must_use]
    pub const fn parent(self) -> Option<TypeTag> {
        match self {
            TypeTag::Basic => None,
            TypeTag::Add | TypeTag::Mul => Some(TypeTag::ExPairSeq),
            TypeTag::Function | TypeTag::Indexed | TypeTag::NcMul => Some(TypeTag::ExprSeq),
            TypeTag::Numeric
            | TypeTag::Constant
            | TypeTag::Symbol
            | TypeTag::Wildcard
            | TypeTag::ExPairSeq
            | TypeTag::Power
            | TypeTag::ExprSeq
            | TypeTag::Lst
            | TypeTag::Matrix
            | TypeTag::Relational => Some(TypeTag::Basic),
        }
    }

    /// Returns true if `self` is `ancestor` or one of its descendants.
    #[must_use]
    pub fn is_a(self, ancestor: TypeTag) -> bool {
        let mut current = Some(self);
        while let Some(tag) = current {
            if tag == ancestor {
                return true;
            }
            current = tag.parent();
        }
        false
    }

    /// Lowercase kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Basic => "basic",
            TypeTag::Numeric => "numeric",
            TypeTag::Constant => "constant",
            TypeTag::Symbol => "symbol",
            TypeTag::Wildcard => "wildcard",
            TypeTag::ExPairSeq => "expairseq",
            TypeTag::Add => "add",
            TypeTag::Mul => "mul",
            TypeTag::NcMul => "ncmul",
            TypeTag::Power => "power",
            TypeTag::ExprSeq => "exprseq",
            TypeTag::Function => "function",
            TypeTag::Indexed => "indexed",
            TypeTag::Lst => "lst",
            TypeTag::Matrix => "matrix",
            TypeTag::Relational => "relational",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A typed view over a node of a given kind.
///
/// Implemented only by the view types of this module.
pub trait Kind<'a>: sealed::Sealed + Copy {
    /// The tag this view stands for.
    const TAG: TypeTag;

    /// Wraps a node as this view without checking its tag.
    fn view(node: &'a Node) -> Self;
}

macro_rules! kind_view {
    ($(#[$meta:meta])* $name:ident => $tag:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name<'a>(&'a Node);

        impl sealed::Sealed for $name<'_> {}

        impl<'a> Kind<'a> for $name<'a> {
            const TAG: TypeTag = TypeTag::$tag;

            fn view(node: &'a Node) -> Self {
                $name(node)
            }
        }

        impl<'a> $name<'a> {
            /// The viewed node.
            #[must_use]
            pub fn node(self) -> &'a Node {
                self.0
            }
        }

        impl Deref for $name<'_> {
            type Target = Node;

            fn deref(&self) -> &Node {
                self.0
            }
        }

        impl fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(self.0).finish()
            }
        }
    };
}

kind_view!(
    /// Any node.
    Basic => Basic
);
kind_view!(
    /// A number.
    Numeric => Numeric
);
kind_view!(
    /// A named constant such as `Pi`.
    Constant => Constant
);
kind_view!(
    /// A symbolic variable.
    Symbol => Symbol
);
kind_view!(
    /// A pattern wildcard.
    Wildcard => Wildcard
);
kind_view!(
    /// A sum or a commutative product.
    ExPairSeq => ExPairSeq
);
kind_view!(
    /// A sum.
    Add => Add
);
kind_view!(
    /// A commutative product.
    Mul => Mul
);
kind_view!(
    /// A non-commutative product.
    NcMul => NcMul
);
kind_view!(
    /// A power.
    Power => Power
);
kind_view!(
    /// A function application, indexed object or non-commutative product.
    ExprSeq => ExprSeq
);
kind_view!(
    /// A function application.
    Function => Function
);
kind_view!(
    /// An indexed object.
    Indexed => Indexed
);
kind_view!(
    /// A list.
    Lst => Lst
);
kind_view!(
    /// A matrix.
    Matrix => Matrix
);
kind_view!(
    /// A relation.
    Relational => Relational
);

#[cold]
fn wrong_kind(expected: TypeTag, node: &Node) -> ! {
    panic!(
        "{expected} view used on a {} node; check is_a() before ex_to()",
        node.tag()
    )
}

impl<'a> Numeric<'a> {
    /// The number.
    #[must_use]
    pub fn value(self) -> &'a Number {
        match self.0.data() {
            NodeData::Numeric(n) => n,
            _ => wrong_kind(TypeTag::Numeric, self.0),
        }
    }
}

impl Constant<'_> {
    /// The constant's identifier.
    #[must_use]
    pub fn id(self) -> ConstantId {
        match self.0.data() {
            NodeData::Constant(id) => *id,
            _ => wrong_kind(TypeTag::Constant, self.0),
        }
    }
}

impl<'a> Symbol<'a> {
    /// The symbol's name.
    #[must_use]
    pub fn name(self) -> &'a str {
        match self.0.data() {
            NodeData::Symbol(info) => &info.name,
            _ => wrong_kind(TypeTag::Symbol, self.0),
        }
    }

    /// The serial number distinguishing equally named symbols.
    #[must_use]
    pub fn serial(self) -> u32 {
        match self.0.data() {
            NodeData::Symbol(info) => info.serial,
            _ => wrong_kind(TypeTag::Symbol, self.0),
        }
    }

    /// Returns true unless the symbol was declared non-commutative.
    #[must_use]
    pub fn is_commutative(self) -> bool {
        match self.0.data() {
            NodeData::Symbol(info) => info.commutative,
            _ => wrong_kind(TypeTag::Symbol, self.0),
        }
    }
}

impl Wildcard<'_> {
    /// The wildcard label.
    #[must_use]
    pub fn label(self) -> u32 {
        match self.0.data() {
            NodeData::Wildcard(label) => *label,
            _ => wrong_kind(TypeTag::Wildcard, self.0),
        }
    }
}

impl Add<'_> {
    /// The numeric constant term, zero if there is none.
    #[must_use]
    pub fn overall_coeff(self) -> Number {
        self.0
            .ops()
            .iter()
            .find_map(|term| term.as_number().cloned())
            .unwrap_or_else(|| Number::integer(0))
    }
}

impl Mul<'_> {
    /// The numeric coefficient, one if there is none.
    #[must_use]
    pub fn overall_coeff(self) -> Number {
        self.0
            .ops()
            .iter()
            .find_map(|factor| factor.as_number().cloned())
            .unwrap_or_else(|| Number::integer(1))
    }
}

impl<'a> Power<'a> {
    /// The base.
    #[must_use]
    pub fn base(self) -> &'a Ex {
        self.0.op(0)
    }

    /// The exponent.
    #[must_use]
    pub fn exponent(self) -> &'a Ex {
        self.0.op(1)
    }
}

impl Function<'_> {
    /// The function identifier.
    #[must_use]
    pub fn id(self) -> FunctionId {
        match self.0.data() {
            NodeData::Function(id) => *id,
            _ => wrong_kind(TypeTag::Function, self.0),
        }
    }

    /// The function name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.id().name()
    }
}

impl<'a> Indexed<'a> {
    /// The indexed base.
    #[must_use]
    pub fn base(self) -> &'a Ex {
        self.0.op(0)
    }

    /// The indices, in order.
    #[must_use]
    pub fn indices(self) -> &'a [Ex] {
        &self.0.ops()[1..]
    }
}

impl Lst<'_> {
    /// Number of elements.
    #[must_use]
    pub fn len(self) -> usize {
        self.0.nops()
    }

    /// Returns true if the list has no elements.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0.nops() == 0
    }
}

impl<'a> Matrix<'a> {
    /// Number of rows.
    #[must_use]
    pub fn rows(self) -> usize {
        match self.0.data() {
            NodeData::Matrix { rows, .. } => *rows,
            _ => wrong_kind(TypeTag::Matrix, self.0),
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(self) -> usize {
        match self.0.data() {
            NodeData::Matrix { cols, .. } => *cols,
            _ => wrong_kind(TypeTag::Matrix, self.0),
        }
    }

    /// Entry at row `r`, column `c`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the matrix.
    #[must_use]
    pub fn get(self, r: usize, c: usize) -> &'a Ex {
        assert!(r < self.rows() && c < self.cols(), "matrix position out of range");
        self.0.op(r * self.cols() + c)
    }
}

impl<'a> Relational<'a> {
    /// The relation operator.
    #[must_use]
    pub fn operator(self) -> RelOp {
        match self.0.data() {
            NodeData::Relational(op) => *op,
            _ => wrong_kind(TypeTag::Relational, self.0),
        }
    }

    /// Left-hand side.
    #[must_use]
    pub fn lhs(self) -> &'a Ex {
        self.0.op(0)
    }

    /// Right-hand side.
    #[must_use]
    pub fn rhs(self) -> &'a Ex {
        self.0.op(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy() {
        assert!(TypeTag::Add.is_a(TypeTag::ExPairSeq));
        assert!(TypeTag::Add.is_a(TypeTag::Basic));
        assert!(TypeTag::Function.is_a(TypeTag::ExprSeq));
        assert!(!TypeTag::Add.is_a(TypeTag::Mul));
        assert!(!TypeTag::Power.is_a(TypeTag::ExPairSeq));
        assert!(!TypeTag::Basic.is_a(TypeTag::Symbol));
    }

    #[test]
    fn test_every_tag_reaches_basic() {
        let tags = [
            TypeTag::Numeric,
            TypeTag::Constant,
            TypeTag::Symbol,
            TypeTag::Wildcard,
            TypeTag::Add,
            TypeTag::Mul,
            TypeTag::NcMul,
            TypeTag::Power,
            TypeTag::Function,
            TypeTag::Indexed,
            TypeTag::Lst,
            TypeTag::Matrix,
            TypeTag::Relational,
        ];
        for tag in tags {
            assert!(tag.is_a(TypeTag::Basic), "{tag}");
        }
    }

    #[test]
    fn test_views_borrow_the_handle() {
        use crate::cast::ex_to;
        use crate::ops::pow;

        let x = Ex::symbol("x");
        let p = pow(&x, 3);
        let base = {
            let view = ex_to::<Power>(&p);
            view.base()
        };
        assert_eq!(base, &x);
        assert!(std::ptr::eq(ex_to::<Power>(&p).node(), p.node()));
        let name = ex_to::<Symbol>(base).name();
        assert_eq!(name, "x");
        assert_eq!(Ex::from(ex_to::<Symbol>(&x)), x);
    }
}
