use crate::preprocess::TokenKind;
use crate::InternedStr;

use thiserror::Error;

/// Syntax errors are non-exhaustive and may have new variants added at any time
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum SyntaxError {
    #[error("expected {0}, got <end-of-file>")]
    UnexpectedEOF(&'static str),

    // an operator or '(' was not followed by an operand
    #[error("expected expression, got '{0}'")]
    ExpectedExpression(TokenKind),

    #[error("expected '{expected}', got {}",
        .found.as_ref().map_or("<end-of-file>".into(),
                               |t| std::borrow::Cow::Owned(format!("'{}'", t))))]
    ExpectedToken {
        expected: TokenKind,
        found: Option<TokenKind>,
    },

    #[error("invalid character constant '{0}': {1}")]
    InvalidCharacterConstant(InternedStr, &'static str),
}
