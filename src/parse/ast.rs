use crate::data::{joined, BinaryOp, Radix, UnaryOp};
use crate::location::Locatable;
use crate::preprocess::Keyword;
use crate::InternedStr;

use std::fmt;

use derive_more::From;

pub type Expr = Locatable<ExprType>;

#[derive(Clone, Debug, PartialEq)]
pub enum ExprType {
    /// `0x1Fu`: the digits after any radix prefix, and the suffix.
    IntegerConstant {
        value: InternedStr,
        suffix: InternedStr,
        radix: Radix,
    },
    /// `1.5e-3f`. The exponent keeps its sign.
    FloatingConstant {
        significand: InternedStr,
        fraction: InternedStr,
        exponent: InternedStr,
        suffix: InternedStr,
        radix: FloatRadix,
    },
    CharConstant(u32),

    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Cast(TypeName, Box<Expr>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FloatRadix {
    Decimal,
    Hexadecimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeName {
    pub specifiers: Vec<Locatable<DeclarationSpecifier>>,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", joined(self.specifiers.iter().map(|s| &s.data), " "))
    }
}

#[derive(Clone, Debug, PartialEq, From)]
pub enum DeclarationSpecifier {
    #[from]
    Unit(UnitSpecifier),
    /// `_BitInt(N)`, holding the spelling of `N`
    BitInt(InternedStr),
}

impl fmt::Display for DeclarationSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeclarationSpecifier::Unit(unit) => write!(f, "{}", unit),
            DeclarationSpecifier::BitInt(width) => write!(f, "_BitInt({})", width),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitSpecifier {
    // types
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
    Signed,
    Unsigned,

    // weird types
    Bool,
    Complex,
    Imaginary,

    // qualifiers
    Const,
    Volatile,
    Restrict,
    // weird qualifiers
    Atomic,
    ThreadLocal,
    // function qualifiers
    Inline,
    NoReturn,

    // storage classes
    Auto,
    Register,
    Static,
    Extern,
    Typedef,
}

impl UnitSpecifier {
    pub fn is_qualifier(self) -> bool {
        use UnitSpecifier::*;
        matches!(self, Const | Volatile | Restrict | Atomic)
    }

    /// Storage classes and function specifiers, which never belong in a type name.
    pub fn is_storage_class(self) -> bool {
        use UnitSpecifier::*;
        matches!(
            self,
            Auto | Register | Static | Extern | Typedef | ThreadLocal | Inline | NoReturn
        )
    }
}

impl TryFrom<Keyword> for UnitSpecifier {
    type Error = Keyword;
    fn try_from(keyword: Keyword) -> Result<UnitSpecifier, Keyword> {
        use UnitSpecifier::*;
        Ok(match keyword {
            Keyword::Char => Char,
            Keyword::Short => Short,
            Keyword::Int => Int,
            Keyword::Long => Long,
            Keyword::Float => Float,
            Keyword::Double => Double,
            Keyword::Void => Void,
            Keyword::Signed => Signed,
            Keyword::Unsigned => Unsigned,
            Keyword::Bool => Bool,
            Keyword::Complex => Complex,
            Keyword::Imaginary => Imaginary,
            Keyword::Const => Const,
            Keyword::Volatile => Volatile,
            Keyword::Restrict => Restrict,
            Keyword::Atomic => Atomic,
            Keyword::ThreadLocal => ThreadLocal,
            Keyword::Inline => Inline,
            Keyword::NoReturn => NoReturn,
            Keyword::Auto => Auto,
            Keyword::Register => Register,
            Keyword::Static => Static,
            Keyword::Extern => Extern,
            Keyword::Typedef => Typedef,
            other => return Err(other),
        })
    }
}

impl From<UnitSpecifier> for Keyword {
    fn from(spec: UnitSpecifier) -> Keyword {
        use UnitSpecifier::*;
        match spec {
            Char => Keyword::Char,
            Short => Keyword::Short,
            Int => Keyword::Int,
            Long => Keyword::Long,
            Float => Keyword::Float,
            Double => Keyword::Double,
            Void => Keyword::Void,
            Signed => Keyword::Signed,
            Unsigned => Keyword::Unsigned,
            Bool => Keyword::Bool,
            Complex => Keyword::Complex,
            Imaginary => Keyword::Imaginary,
            Const => Keyword::Const,
            Volatile => Keyword::Volatile,
            Restrict => Keyword::Restrict,
            Atomic => Keyword::Atomic,
            ThreadLocal => Keyword::ThreadLocal,
            Inline => Keyword::Inline,
            NoReturn => Keyword::NoReturn,
            Auto => Keyword::Auto,
            Register => Keyword::Register,
            Static => Keyword::Static,
            Extern => Keyword::Extern,
            Typedef => Keyword::Typedef,
        }
    }
}

impl fmt::Display for UnitSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", Keyword::from(*self))
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExprType::IntegerConstant {
                value,
                suffix,
                radix,
            } => {
                let prefix = match radix {
                    Radix::Binary => "0b",
                    Radix::Octal => "0",
                    Radix::Decimal => "",
                    Radix::Hexadecimal => "0x",
                };
                write!(f, "{}{}{}", prefix, value, suffix)
            }
            ExprType::FloatingConstant {
                significand,
                fraction,
                exponent,
                suffix,
                radix,
            } => {
                let (prefix, marker) = match radix {
                    FloatRadix::Decimal => ("", 'e'),
                    FloatRadix::Hexadecimal => ("0x", 'p'),
                };
                write!(f, "{}{}.{}", prefix, significand, fraction)?;
                if !exponent.is_empty() {
                    write!(f, "{}{}", marker, exponent)?;
                }
                write!(f, "{}", suffix)
            }
            ExprType::CharConstant(c) => write!(f, "{}", crate::data::LiteralValue::Char(*c)),
            ExprType::Unary(op, inner) => write!(f, "{}({})", op, inner.data),
            ExprType::Binary(op, left, right) => {
                write!(f, "({}) {} ({})", left.data, op, right.data)
            }
            ExprType::Cast(ctype, inner) => write!(f, "({})({})", ctype, inner.data),
        }
    }
}
