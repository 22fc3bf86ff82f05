use crate::get_str;
use crate::location::{Locatable, Location};
use crate::InternedStr;

use super::keyword::Keyword;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub type Token = Locatable<TokenKind>;

static_assertions::const_assert!(std::mem::size_of::<TokenKind>() <= 12);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Literal(LiteralKind, InternedStr),
    Identifier(InternedStr),
    Keyword(Keyword),
    HeaderName { global: bool, name: InternedStr },
    Unknown(char),

    Whitespace(WhitespaceKind),

    Hash,
    HashHash,

    LeftBrace, // {
    RightBrace,
    LeftBracket, // [
    RightBracket,
    LeftParen,
    RightParen,

    PlusPlus,
    MinusMinus,

    Equal,
    AddEqual,
    SubEqual,
    MulEqual,
    DivEqual,
    ModEqual,
    ShlEqual,
    ShrEqual,
    AndEqual,
    OrEqual,
    XorEqual,

    Less,
    Greater,
    EqualEqual,
    NotEqual,
    LessEqual,
    GreaterEqual,

    Plus,
    Minus,
    Star,
    Divide,
    Mod,
    Xor,
    Ampersand,
    LogicalAnd,
    BitwiseOr,
    LogicalOr,
    BinaryNot,  // ~
    LogicalNot, // !
    ShiftLeft,
    ShiftRight,

    Semicolon,
    Colon,
    Comma,
    Dot,
    Question,
    StructDeref, // ->

    // Misc
    Ellipsis, // ...
}

impl TokenKind {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Whitespace(_))
    }

    pub fn is_newline(&self) -> bool {
        matches!(self, TokenKind::Whitespace(WhitespaceKind::Newline))
    }

    pub fn as_identifier(&self) -> Option<InternedStr> {
        match self {
            TokenKind::Identifier(id) => Some(*id),
            _ => None,
        }
    }

    // whether preprocessor spacing can skip the space
    pub fn can_omit_space(&self, next: &TokenKind) -> bool {
        use LiteralKind::*;
        use TokenKind::*;
        match (self, next) {
            // short circuit this first
            (Whitespace(_), _) | (_, Whitespace(_)) => true,

            (Identifier(s), Literal(String(_), _) | Literal(Char(_), _)) => {
                get_str!(s).parse::<EncodingKind>().is_err()
            }
            (
                Identifier(_) | TokenKind::Keyword(_),
                Identifier(_) | TokenKind::Keyword(_) | Literal(Number, _) | Unknown(_),
            ) => false,
            (
                Literal(Number, _),
                Identifier(_)
                | TokenKind::Keyword(_)
                | Literal(Number, _)
                | Dot
                | Ellipsis
                | Plus
                | Minus,
            ) => false,

            (
                Equal | Less | Greater | Plus | Minus | Star | Divide | Mod | Xor | Ampersand
                | BitwiseOr | LogicalNot | ShiftLeft | ShiftRight,
                Equal,
            ) => false,

            (Less, Colon | Less | Mod) => false,
            (Greater, Greater) => false,

            (Plus, Plus) => false,
            (Minus, Minus | Greater) => false,

            (Divide, Divide | Star) => false,
            (Mod, Colon | Greater) => false,
            (Ampersand, Ampersand) => false,
            (BitwiseOr, BitwiseOr) => false,

            (Colon, Greater) => false,
            (Hash, Hash) => false,

            (Dot | Ellipsis, Dot | Ellipsis | Literal(Number, _)) => false,

            _ => true,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use LiteralKind::*;
        use TokenKind::*;

        match self {
            Literal(Number, s) => write!(f, "{}", s),
            Literal(String(encoding), s) => write!(f, "{}\"{}\"", encoding, s),
            Literal(Char(encoding), s) => write!(f, "{}\'{}\'", encoding, s),
            Identifier(s) => write!(f, "{}", s),
            TokenKind::Keyword(k) => write!(f, "{}", k),
            HeaderName {
                global: true,
                name: s,
            } => write!(f, "<{}>", s),
            HeaderName {
                global: false,
                name: s,
            } => write!(f, "\"{}\"", s),
            Unknown(c) => write!(f, "{}", c),

            Whitespace(s) => write!(f, "{}", s),

            Hash => write!(f, "#"),
            HashHash => write!(f, "##"),

            LeftBrace => write!(f, "{{"),
            RightBrace => write!(f, "}}"),
            LeftBracket => write!(f, "["),
            RightBracket => write!(f, "]"),
            LeftParen => write!(f, "("),
            RightParen => write!(f, ")"),

            PlusPlus => write!(f, "++"),
            MinusMinus => write!(f, "--"),

            Equal => write!(f, "="),
            AddEqual => write!(f, "+="),
            SubEqual => write!(f, "-="),
            MulEqual => write!(f, "*="),
            DivEqual => write!(f, "/="),
            ModEqual => write!(f, "%="),
            ShlEqual => write!(f, "<<="),
            ShrEqual => write!(f, ">>="),
            AndEqual => write!(f, "&="),
            OrEqual => write!(f, "|="),
            XorEqual => write!(f, "^="),

            Less => write!(f, "<"),
            Greater => write!(f, ">"),
            EqualEqual => write!(f, "=="),
            NotEqual => write!(f, "!="),
            LessEqual => write!(f, "<="),
            GreaterEqual => write!(f, ">="),

            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Star => write!(f, "*"),
            Divide => write!(f, "/"),
            Mod => write!(f, "%"),
            Xor => write!(f, "^"),
            Ampersand => write!(f, "&"),
            LogicalAnd => write!(f, "&&"),
            BitwiseOr => write!(f, "|"),
            LogicalOr => write!(f, "||"),
            BinaryNot => write!(f, "~"),
            LogicalNot => write!(f, "!"),
            ShiftLeft => write!(f, "<<"),
            ShiftRight => write!(f, ">>"),

            Semicolon => write!(f, ";"),
            Colon => write!(f, ":"),
            Comma => write!(f, ","),
            Dot => write!(f, "."),
            Question => write!(f, "?"),
            StructDeref => write!(f, "->"),

            Ellipsis => write!(f, "..."),
        }
    }
}

/// Comments are kept as whitespace tokens so that a directive can tell
/// where its replacement list ends, but their text is dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WhitespaceKind {
    Newline,
    Space,
    LineComment,
    BlockComment,
}

impl fmt::Display for WhitespaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            WhitespaceKind::Newline => writeln!(f),
            _ => write!(f, " "),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncodingKind {
    Normal,
    Utf8,
    Utf16,
    Utf32,
    Wide,
}

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid encoding kind")]
pub struct InvalidEncodingKind;

impl FromStr for EncodingKind {
    type Err = InvalidEncodingKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        use EncodingKind::*;
        match value {
            "" => Ok(Normal),
            "u8" => Ok(Utf8),
            "u" => Ok(Utf16),
            "U" => Ok(Utf32),
            "L" => Ok(Wide),
            _ => Err(InvalidEncodingKind),
        }
    }
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use EncodingKind::*;
        match self {
            Normal => write!(f, ""),
            Utf8 => write!(f, "u8"),
            Utf16 => write!(f, "u"),
            Utf32 => write!(f, "U"),
            Wide => write!(f, "L"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    /// A preprocessing number: anything from `0` to `1.5e+3f` to `0x1p-2`.
    Number,
    String(EncodingKind),
    Char(EncodingKind),
}

/// Render tokens back to source text.
///
/// A space is written between two tokens unless they were adjacent in the
/// source or gluing them together cannot change how they lex.
/// Blank lines are collapsed.
pub fn pretty_print<T: IntoIterator<Item = Token> + Clone>(collection: T) -> impl fmt::Display {
    struct PrettyPrint<T: IntoIterator<Item = Token> + Clone>(T);

    impl<T: IntoIterator<Item = Token> + Clone> fmt::Display for PrettyPrint<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            let mut last = TokenKind::Whitespace(WhitespaceKind::Newline);
            let mut last_location = Location::default();
            let mut had_non_whitespace = false;

            for token in self.0.clone() {
                match token.data {
                    TokenKind::Whitespace(WhitespaceKind::Newline) => {
                        if had_non_whitespace {
                            had_non_whitespace = false;
                            last = token.data;
                            writeln!(f)?;
                        }
                        continue;
                    }
                    // spacing is recomputed below
                    TokenKind::Whitespace(_) => continue,
                    _ => had_non_whitespace = true,
                }

                if !(last.can_omit_space(&token.data)
                    || last_location.is_directly_before(token.location))
                {
                    write!(f, " ")?;
                }
                write!(f, "{}", token.data)?;

                last = token.data;
                last_location = token.location;
            }

            Ok(())
        }
    }

    PrettyPrint(collection)
}
