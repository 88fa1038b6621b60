//! Error type shared by every fallible expression operation.

use thiserror::Error;

/// Errors reported by expression construction and algebra.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExError {
    /// The text handed to the parser is malformed.
    #[error("parse error at offset {position} in `{input}`: {message}")]
    Parse {
        /// The complete input text.
        input: String,
        /// Byte offset of the offending token.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// The text refers to a name that was not declared.
    #[error("undeclared symbol `{name}` in `{input}`")]
    UndeclaredSymbol {
        /// The complete input text.
        input: String,
        /// The unknown name.
        name: String,
    },

    /// A checked downcast found a node of another kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind that was requested.
        expected: &'static str,
        /// Kind that was found.
        found: &'static str,
    },

    /// An operand index is past the end of the operand list.
    #[error("operand index {index} out of range for {nops} operands")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of operands present.
        nops: usize,
    },

    /// Division by an exact zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The evaluation depth budget ran out.
    #[error("maximum recursion level reached")]
    RecursionLimit,

    /// Two algebraic facts about an expression disagree.
    #[error("algebraic inconsistency: {0}")]
    Inconsistency(String),

    /// Series expansion is not possible at the requested point.
    #[error("series expansion failed: {0}")]
    Series(String),

    /// The node kind does not support the operation.
    #[error("{op} is not supported for {kind}")]
    Unsupported {
        /// Name of the operation.
        op: &'static str,
        /// Name of the node kind.
        kind: &'static str,
    },

    /// A machine-sized result does not fit its type.
    #[error("integer overflow: {0}")]
    Overflow(String),

    /// An argument has the wrong shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias for expression operations.
pub type Result<T> = std::result::Result<T, ExError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_input() {
        let err = ExError::UndeclaredSymbol {
            input: "x + y".to_string(),
            name: "y".to_string(),
        };
        assert_eq!(err.to_string(), "undeclared symbol `y` in `x + y`");

        let err = ExError::IndexOutOfRange { index: 3, nops: 2 };
        assert!(err.to_string().contains("index 3"));
    }
}
