use thiserror::Error;

use crate::data::{BinaryOp, OperandClass, Radix, UnaryOp, ValueType};
use crate::location::Locatable;
use crate::InternedStr;

use std::fmt;

/// Semantic errors are non-exhaustive and may have new variants added at any time
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum SemanticError {
    #[error("invalid specifier-qualifier list: {0}")]
    InvalidSpecifierQualifierList(String),

    // Only the operand on `side` is reported; the other one gets its own
    // error if it is also wrong.
    #[error("{side} operand of '{op}' must have {expected} type (have '{}')",
            if *.side == Side::Left { .lhs.data } else { .rhs.data })]
    BinaryOperandsWrongTypes {
        op: BinaryOp,
        expected: OperandClass,
        lhs: Locatable<ValueType>,
        rhs: Locatable<ValueType>,
        side: Side,
    },

    #[error("operand of unary '{op}' must have {expected} type (have '{}')", .operand.data)]
    UnaryOperandWrongType {
        op: UnaryOp,
        expected: OperandClass,
        operand: Locatable<ValueType>,
    },

    #[error("invalid suffix '{0}' on integer constant")]
    UnrecognizedIntegerSuffix(InternedStr),

    #[error("invalid suffix '{0}' on floating constant")]
    UnrecognizedFloatingSuffix(InternedStr),

    #[error("'{digits}' is not a valid {radix} integer constant")]
    InvalidIntegerLiteral { digits: InternedStr, radix: Radix },

    #[error("invalid floating constant: {0}")]
    InvalidFloatingPointLiteral(String),

    #[error("integer constant '{0}' is too large for any integer type")]
    NoCompatibleIntegerType(InternedStr),
}

/// Which operand of a binary operator a diagnostic is about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}
