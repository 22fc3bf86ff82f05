pub mod types;

pub use types::{FloatingType, IntegerKind, IntegerType, Signedness, StandardInteger, ValueType};

use crate::preprocess::TokenKind;

use std::fmt;

pub(crate) fn joined<I: IntoIterator<Item = T>, T: ToString>(it: I, delim: &str) -> String {
    it.into_iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(delim)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn as_u32(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let word = match self {
            Radix::Binary => "binary",
            Radix::Octal => "octal",
            Radix::Decimal => "decimal",
            Radix::Hexadecimal => "hexadecimal",
        };
        write!(f, "{}", word)
    }
}

bitflags::bitflags! {
    /// Type qualifiers. They are accepted in casts and then ignored.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Qualifiers: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
        const RESTRICT = 1 << 2;
        const ATOMIC = 1 << 3;
    }
}

impl fmt::Display for Qualifiers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names = [
            (Qualifiers::CONST, "const"),
            (Qualifiers::VOLATILE, "volatile"),
            (Qualifiers::RESTRICT, "restrict"),
            (Qualifiers::ATOMIC, "_Atomic"),
        ];
        let present = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| name);
        write!(f, "{}", joined(present, " "))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Integer(u128),
    Float(f64),
    /// The value of a character constant, which has type `int`.
    Char(u32),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LiteralValue::Integer(i) => write!(f, "{}", i),
            LiteralValue::Float(n) => write!(f, "{:?}", n),
            LiteralValue::Char(c) => match char::from_u32(*c) {
                Some(c) => write!(f, "'{}'", c.escape_default()),
                None => write!(f, "'\\x{:x}'", c),
            },
        }
    }
}

/// What an operator requires of its operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperandClass {
    Integer,
    Arithmetic,
    Real,
    Scalar,
}

impl fmt::Display for OperandClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            OperandClass::Integer => "integer",
            OperandClass::Arithmetic => "arithmetic",
            OperandClass::Real => "real",
            OperandClass::Scalar => "scalar",
        };
        write!(f, "{}", s)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComparisonToken {
    Less,
    Greater,
    EqualEqual,
    NotEqual,
    LessEqual,
    GreaterEqual,
}

impl ComparisonToken {
    pub fn is_equality(self) -> bool {
        matches!(self, ComparisonToken::EqualEqual | ComparisonToken::NotEqual)
    }
}

impl fmt::Display for ComparisonToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ComparisonToken::*;
        let s = match self {
            Less => "<",
            Greater => ">",
            EqualEqual => "==",
            NotEqual => "!=",
            LessEqual => "<=",
            GreaterEqual => ">=",
        };
        write!(f, "{}", s)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    LogicalOr,
    BitwiseOr,
    LogicalAnd,
    BitwiseAnd,
    Xor,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    // Token: make >, <, <=, ... part of the same variant
    Compare(ComparisonToken),
}

impl BinaryOp {
    /// 6.5.5 - 6.5.14 constraints on operand types
    pub fn operand_class(self) -> OperandClass {
        use BinaryOp::*;
        match self {
            Mod | Shl | Shr | BitwiseAnd | Xor | BitwiseOr => OperandClass::Integer,
            Mul | Div | Add | Sub => OperandClass::Arithmetic,
            Compare(cmp) if cmp.is_equality() => OperandClass::Arithmetic,
            Compare(_) => OperandClass::Real,
            LogicalAnd | LogicalOr => OperandClass::Scalar,
        }
    }
}

impl TryFrom<&TokenKind> for BinaryOp {
    type Error = ();
    fn try_from(t: &TokenKind) -> Result<BinaryOp, ()> {
        use BinaryOp::*;
        Ok(match t {
            TokenKind::Star => Mul,
            TokenKind::Divide => Div,
            TokenKind::Mod => Mod,
            TokenKind::Plus => Add,
            TokenKind::Minus => Sub,
            TokenKind::ShiftLeft => Shl,
            TokenKind::ShiftRight => Shr,

            TokenKind::Less => Compare(ComparisonToken::Less),
            TokenKind::Greater => Compare(ComparisonToken::Greater),
            TokenKind::LessEqual => Compare(ComparisonToken::LessEqual),
            TokenKind::GreaterEqual => Compare(ComparisonToken::GreaterEqual),
            TokenKind::EqualEqual => Compare(ComparisonToken::EqualEqual),
            TokenKind::NotEqual => Compare(ComparisonToken::NotEqual),

            TokenKind::Ampersand => BitwiseAnd,
            TokenKind::Xor => Xor,
            TokenKind::BitwiseOr => BitwiseOr,
            TokenKind::LogicalAnd => LogicalAnd,
            TokenKind::LogicalOr => LogicalOr,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use BinaryOp::*;
        let s = match self {
            LogicalOr => "||",
            BitwiseOr => "|",
            LogicalAnd => "&&",
            BitwiseAnd => "&",
            Xor => "^",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Add => "+",
            Sub => "-",
            Shl => "<<",
            Shr => ">>",
            Compare(compare) => return write!(f, "{}", compare),
        };
        write!(f, "{}", s)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Negate,
    BitwiseNot,
    LogicalNot,
}

impl UnaryOp {
    pub fn operand_class(self) -> OperandClass {
        match self {
            UnaryOp::Plus | UnaryOp::Negate => OperandClass::Arithmetic,
            UnaryOp::BitwiseNot => OperandClass::Integer,
            UnaryOp::LogicalNot => OperandClass::Scalar,
        }
    }
}

impl TryFrom<&TokenKind> for UnaryOp {
    type Error = ();
    fn try_from(t: &TokenKind) -> Result<UnaryOp, ()> {
        Ok(match t {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::BinaryNot => UnaryOp::BitwiseNot,
            TokenKind::LogicalNot => UnaryOp::LogicalNot,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            UnaryOp::Plus => "+",
            UnaryOp::Negate => "-",
            UnaryOp::BitwiseNot => "~",
            UnaryOp::LogicalNot => "!",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifiers_display() {
        assert_eq!(Qualifiers::empty().to_string(), "");
        assert_eq!(
            (Qualifiers::CONST | Qualifiers::ATOMIC).to_string(),
            "const _Atomic"
        );
    }

    #[test]
    fn operand_classes() {
        assert_eq!(BinaryOp::Mod.operand_class(), OperandClass::Integer);
        assert_eq!(BinaryOp::Div.operand_class(), OperandClass::Arithmetic);
        assert_eq!(
            BinaryOp::Compare(ComparisonToken::Less).operand_class(),
            OperandClass::Real
        );
        assert_eq!(
            BinaryOp::Compare(ComparisonToken::NotEqual).operand_class(),
            OperandClass::Arithmetic
        );
        assert_eq!(UnaryOp::LogicalNot.operand_class(), OperandClass::Scalar);
    }
}
