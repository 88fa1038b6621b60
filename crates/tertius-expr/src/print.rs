//! Text output.
//!
//! The default style prints compact infix text such as `2*s+sin(x)`,
//! inserting parentheses only where precedence requires them. The tree
//! style prints one node per line with its kind, hash, flags and operand
//! count, indented by depth.

use std::fmt::{self, Write};

use crate::ex::Ex;
use crate::node::NodeData;
use crate::numeric::Number;

/// Precedence of relations.
pub const PREC_RELATIONAL: u32 = 20;
/// Precedence of sums.
pub const PREC_ADD: u32 = 40;
/// Precedence of products.
pub const PREC_MUL: u32 = 50;
/// Precedence of powers.
pub const PREC_POWER: u32 = 60;

/// Output style of a [`PrintContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintStyle {
    /// Infix text.
    #[default]
    Default,
    /// One node per line with internal details.
    Tree,
}

/// Destination and style of printed output.
pub struct PrintContext<'a> {
    out: &'a mut dyn Write,
    style: PrintStyle,
}

impl<'a> PrintContext<'a> {
    /// Infix output into `out`.
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self {
            out,
            style: PrintStyle::Default,
        }
    }

    /// Tree output into `out`.
    pub fn tree(out: &'a mut dyn Write) -> Self {
        Self {
            out,
            style: PrintStyle::Tree,
        }
    }

    /// The output style.
    #[must_use]
    pub fn style(&self) -> PrintStyle {
        self.style
    }
}

pub(crate) fn print(e: &Ex, c: &mut PrintContext<'_>, level: u32) -> fmt::Result {
    match c.style {
        PrintStyle::Default => infix(e, c.out, level),
        PrintStyle::Tree => tree(e, c.out, 0),
    }
}

fn number(n: &Number, out: &mut dyn Write, level: u32) -> fmt::Result {
    let parens = (n.is_negative() && level > PREC_ADD)
        || (n.is_exact() && !n.is_integer() && level > PREC_MUL);
    if parens {
        write!(out, "({n})")
    } else {
        write!(out, "{n}")
    }
}

fn joined(ops: &[Ex], sep: &str, out: &mut dyn Write, level: u32) -> fmt::Result {
    for (i, op) in ops.iter().enumerate() {
        if i > 0 {
            out.write_str(sep)?;
        }
        infix(op, out, level)?;
    }
    Ok(())
}

fn infix(e: &Ex, out: &mut dyn Write, level: u32) -> fmt::Result {
    let own = match e.node().data() {
        NodeData::Add => PREC_ADD,
        NodeData::Mul | NodeData::NcMul => PREC_MUL,
        NodeData::Power => PREC_POWER,
        NodeData::Relational(_) => PREC_RELATIONAL,
        _ => u32::MAX,
    };
    let parens = level > own;
    if parens {
        out.write_char('(')?;
    }
    match e.node().data() {
        NodeData::Numeric(n) => number(n, out, level)?,
        NodeData::Constant(id) => out.write_str(id.name())?,
        NodeData::Symbol(info) => out.write_str(&info.name)?,
        NodeData::Wildcard(label) => write!(out, "${label}")?,
        NodeData::Add => {
            for (i, term) in e.ops().iter().enumerate() {
                let mut text = String::new();
                infix(term, &mut text, PREC_ADD)?;
                if i > 0 && !text.starts_with('-') {
                    out.write_char('+')?;
                }
                out.write_str(&text)?;
            }
        }
        NodeData::Mul => {
            let mut factors = e.ops();
            if let Some(coeff) = factors.first().and_then(Ex::as_number) {
                factors = &factors[1..];
                if coeff.is_minus_one() {
                    out.write_char('-')?;
                } else {
                    number(coeff, out, PREC_ADD)?;
                    out.write_char('*')?;
                }
            }
            joined(factors, "*", out, PREC_MUL)?;
        }
        NodeData::NcMul => joined(e.ops(), "*", out, PREC_MUL)?,
        NodeData::Power => {
            infix(&e.op(0), out, PREC_POWER + 1)?;
            out.write_char('^')?;
            infix(&e.op(1), out, PREC_POWER + 1)?;
        }
        NodeData::Function(id) => {
            write!(out, "{}(", id.name())?;
            joined(e.ops(), ",", out, 0)?;
            out.write_char(')')?;
        }
        NodeData::Indexed => {
            infix(&e.op(0), out, PREC_POWER + 1)?;
            for idx in &e.ops()[1..] {
                out.write_char('.')?;
                infix(idx, out, PREC_POWER + 1)?;
            }
        }
        NodeData::Lst => {
            out.write_char('{')?;
            joined(e.ops(), ",", out, 0)?;
            out.write_char('}')?;
        }
        NodeData::Matrix { cols, .. } => {
            out.write_char('[')?;
            for (r, row) in e.ops().chunks((*cols).max(1)).enumerate() {
                if r > 0 {
                    out.write_char(',')?;
                }
                out.write_char('[')?;
                joined(row, ",", out, 0)?;
                out.write_char(']')?;
            }
            out.write_char(']')?;
        }
        NodeData::Relational(op) => {
            infix(&e.op(0), out, PREC_RELATIONAL + 1)?;
            out.write_str(op.symbol())?;
            infix(&e.op(1), out, PREC_RELATIONAL + 1)?;
        }
    }
    if parens {
        out.write_char(')')?;
    }
    Ok(())
}

fn tree(e: &Ex, out: &mut dyn Write, depth: usize) -> fmt::Result {
    let node = e.node();
    write!(out, "{:indent$}{}", "", node.tag(), indent = depth * 4)?;
    match node.data() {
        NodeData::Numeric(n) => write!(out, " {n}")?,
        NodeData::Constant(id) => write!(out, " {}", id.name())?,
        NodeData::Symbol(info) => write!(out, " {} (serial {})", info.name, info.serial)?,
        NodeData::Wildcard(label) => write!(out, " ${label}")?,
        NodeData::Function(id) => write!(out, " {}", id.name())?,
        NodeData::Relational(op) => write!(out, " {}", op.symbol())?,
        _ => {}
    }
    writeln!(
        out,
        ", hash=0x{:016x}, flags={:?}, refcount={}, nops={}",
        e.gethash(),
        node.flags(),
        e.refcount(),
        e.nops()
    )?;
    for op in e.ops() {
        tree(op, out, depth + 1)?;
    }
    Ok(())
}

/// The tree rendering of `e` as a string.
pub(crate) fn tree_string(e: &Ex) -> String {
    let mut text = String::new();
    // writing into a String cannot fail
    let _ = tree(e, &mut text, 0);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ConstantId, RelOp};
    use crate::ops::{pow, sin};

    #[test]
    fn test_sums_and_products() {
        let (x, s) = (Ex::symbol("x"), Ex::symbol("s"));
        assert_eq!((2 * &s + sin(&x)).to_string(), "2*s+sin(x)");
        assert_eq!((&x - 1).to_string(), "x-1");
        assert_eq!((-&x).to_string(), "-x");
        assert_eq!((-2 * &x * &s).to_string(), "-2*s*x");
        assert_eq!((&x / 2).to_string(), "1/2*x");
    }

    #[test]
    fn test_powers_parenthesize() {
        let (x, y) = (Ex::symbol("x"), Ex::symbol("y"));
        assert_eq!(pow(&x, -1).to_string(), "x^(-1)");
        assert_eq!(pow(&x + 1, 2).to_string(), "(x+1)^2");
        assert_eq!(pow(&x, Ex::from(1) / 2).to_string(), "x^(1/2)");
        assert_eq!(pow(&x, &y + 1).to_string(), "x^(y+1)");
        assert_eq!(((&x + &y) * &x).to_string(), "x*(x+y)");
    }

    #[test]
    fn test_containers() {
        let (a, i, j) = (Ex::symbol("A"), Ex::symbol("i"), Ex::symbol("j"));
        assert_eq!(Ex::lst([Ex::from(1), a.clone()]).to_string(), "{1,A}");
        assert_eq!(Ex::indexed(a.clone(), [i, j]).to_string(), "A.i.j");
        let m = Ex::matrix(2, 2, [1, 2, 3, 4].map(Ex::from)).unwrap();
        assert_eq!(m.to_string(), "[[1,2],[3,4]]");
        let rel = Ex::relational(a, RelOp::LessOrEqual, Ex::constant(ConstantId::Pi));
        assert_eq!(rel.to_string(), "A<=Pi");
        assert_eq!(Ex::wild(2).to_string(), "$2");
        assert_eq!(Ex::from(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_tree_style() {
        let x = Ex::symbol("x");
        let e = &x + 1;
        let mut text = String::new();
        e.print(&mut PrintContext::tree(&mut text), 0).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("add, hash=0x"));
        assert!(lines[1].starts_with("    symbol x (serial "));
        assert!(lines[2].starts_with("    numeric 1,"));
        assert_eq!(text, tree_string(&e));
    }
}
