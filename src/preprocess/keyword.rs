use std::str::FromStr;

use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    // statements
    If,
    Else,
    Do,
    While,
    For,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    Goto,

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
    Typedef,

    // user-defined types
    Union,
    Struct,
    Enum,

    // weird types
    Bool,
    Complex,
    Imaginary,
    BitInt,

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

    // intrinsics
    Sizeof,
    Generic,
    StaticAssert,
    Alignas,
    Alignof,
}

impl Keyword {
    /// Whether this keyword may begin a declaration specifier list,
    /// which is how `(type) expr` is told apart from `(expr)`.
    pub fn is_decl_specifier(self) -> bool {
        use Keyword::*;
        matches!(
            self,
            Char | Short
                | Int
                | Long
                | Float
                | Double
                | Void
                | Signed
                | Unsigned
                | Typedef
                | Union
                | Struct
                | Enum
                | Bool
                | Complex
                | Imaginary
                | BitInt
                | Const
                | Volatile
                | Restrict
                | Atomic
                | ThreadLocal
                | Inline
                | NoReturn
                | Auto
                | Register
                | Static
                | Extern
                | Alignas
        )
    }
}

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("not a keyword")]
pub struct NotAKeyword;

impl FromStr for Keyword {
    type Err = NotAKeyword;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        use Keyword::*;
        Ok(match value {
            "if" => If,
            "else" => Else,
            "do" => Do,
            "while" => While,
            "for" => For,
            "switch" => Switch,
            "case" => Case,
            "default" => Default,
            "break" => Break,
            "continue" => Continue,
            "return" => Return,
            "goto" => Goto,

            "char" => Char,
            "short" => Short,
            "int" => Int,
            "long" => Long,
            "float" => Float,
            "double" => Double,
            "void" => Void,
            "signed" => Signed,
            "unsigned" => Unsigned,
            "typedef" => Typedef,

            "union" => Union,
            "struct" => Struct,
            "enum" => Enum,

            "_Bool" => Bool,
            "_Complex" => Complex,
            "_Imaginary" => Imaginary,
            "_BitInt" => BitInt,

            "const" => Const,
            "volatile" => Volatile,
            "restrict" => Restrict,
            "_Atomic" => Atomic,
            "_Thread_local" => ThreadLocal,
            "inline" => Inline,
            "_Noreturn" => NoReturn,

            "auto" => Auto,
            "register" => Register,
            "static" => Static,
            "extern" => Extern,

            "sizeof" => Sizeof,
            "_Generic" => Generic,
            "_Static_assert" => StaticAssert,
            "_Alignas" => Alignas,
            "_Alignof" => Alignof,

            _ => return Err(NotAKeyword),
        })
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Keyword::Alignas
            | Keyword::Alignof
            | Keyword::Bool
            | Keyword::Complex
            | Keyword::Imaginary
            | Keyword::Atomic
            | Keyword::Generic => write!(f, "_{:?}", self),
            Keyword::BitInt => write!(f, "_BitInt"),
            Keyword::NoReturn => write!(f, "_Noreturn"),
            Keyword::ThreadLocal => write!(f, "_Thread_local"),
            Keyword::StaticAssert => write!(f, "_Static_assert"),
            _ => write!(f, "{}", &format!("{:?}", self).to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_from_str() {
        for kw in [
            Keyword::Int,
            Keyword::Bool,
            Keyword::BitInt,
            Keyword::NoReturn,
            Keyword::ThreadLocal,
            Keyword::StaticAssert,
            Keyword::Alignof,
        ] {
            assert_eq!(kw.to_string().parse::<Keyword>(), Ok(kw));
        }
    }

    #[test]
    fn identifiers_are_not_keywords() {
        assert_eq!("integer".parse::<Keyword>(), Err(NotAKeyword));
        assert_eq!("__VA_ARGS__".parse::<Keyword>(), Err(NotAKeyword));
    }
}
