use crate::InternedStr;

use super::token::TokenKind;

use thiserror::Error;

/// Lex errors are non-exhaustive and may have new variants added at any time
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LexError {
    #[error("unterminated /* comment")]
    UnterminatedComment,

    #[error("missing terminating {} character in {} literal",
        if *(.string) { "\"" } else { "'" },
        if *(.string) { "string" } else { "character" })]
    MissingEndQuote { string: bool },

    #[error("missing terminating {} character in header name",
        if *(.global) { ">" } else { "\"" })]
    MissingHeaderEnd { global: bool },

    #[error("empty character constant")]
    EmptyChar,
}

/// Inclusion errors are non-exhaustive and may have new variants added at any time
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum IncludeError {
    /// An `#include ""` was present.
    #[error("empty filename")]
    EmptyInclude,

    #[error("file '{0}' not found")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    // io::Error is neither Clone nor PartialEq
    IO(String),

    #[error("#include nested too deeply (more than {0} levels)")]
    NestedTooDeeply(usize),
}

/// Preprocessing errors are non-exhaustive and may have new variants added at any time
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum CppError {
    #[error("failed to open included file: {0}")]
    IncludeDirectiveFileOpenFailed(#[from] IncludeError),

    #[error("failed to lex input: {0}")]
    LexingError(#[from] LexError),

    /// An invalid directive was present, such as `#invalid`
    #[error("invalid preprocessing directive '#{0}'")]
    InvalidDirective(TokenKind),

    /// A valid token was present in an invalid position, such as `#include +`
    ///
    /// The `&str` describes the expected token;
    /// the `Token` is the actual token found.
    #[error("expected {0}, got '{1}'")]
    UnexpectedToken(&'static str, TokenKind),

    /// The file ended in the middle of a directive.
    #[error("expected {0}, got <end-of-file>")]
    UnexpectedEOF(&'static str),

    /// `#define` or `#undef` was not followed by a name.
    #[error("macro name missing{}",
        .0.as_ref().map_or(String::new(), |t| format!(", got '{}'", t)))]
    MacroExpectedIdentifier(Option<TokenKind>),

    /// If a macro is redefined, the new definition must be identical to the
    /// original.
    #[error("redefinition of '{0}' does not match original definition")]
    IllegalMacroRedefinition(InternedStr),

    #[error("'{0}' may not appear in macro parameter list")]
    IllegalMacroParameterToken(TokenKind),

    #[error("missing ')' in macro parameter list")]
    UnterminatedMacroParameterList,

    #[error("'...' must be the last macro parameter")]
    MacroEllipsisNotLast,

    #[error("duplicate macro parameter '{0}'")]
    DuplicateMacroParameter(InternedStr),

    #[error("unterminated argument list invoking macro '{0}'")]
    UnterminatedMacroInvocation(InternedStr),

    #[error("macro '{name}' requires {}{expected} argument{}, but {given} given",
        if *.variadic { "at least " } else { "" },
        if *.expected == 1 { "" } else { "s" })]
    UnexpectedMacroInvocationArgumentCount {
        name: InternedStr,
        expected: usize,
        variadic: bool,
        given: usize,
    },

    /// '#' in a function macro not followed by function parameter
    #[error("'#' is not followed by a macro parameter")]
    HashNotFollowedByParameter,

    #[error("expanding '{0}' nested more than {1} macros deep")]
    MacroExpansionTooDeep(InternedStr, usize),
}

/// Preprocessor results carry the failing token's location.
pub type CppResult<T> = Result<T, crate::location::Locatable<CppError>>;
