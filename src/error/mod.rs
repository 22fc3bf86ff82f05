mod diagnostic;
mod handler;
mod warning;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use warning::*;

use thiserror::Error;

use crate::analyze::SemanticError;
use crate::location::Locatable;
use crate::parse::SyntaxError;
use crate::preprocess::error::{CppError, LexError};

pub type ErrorHandler<T = Error> = handler::ErrorHandler<T, Warning>;

pub type CompileResult<T> = Result<T, Locatable<Error>>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("invalid program: {0}")]
    Semantic(#[from] SemanticError),

    #[error("invalid syntax: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("invalid macro: {0}")]
    PreProcessor(#[from] CppError),
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Error {
        CppError::from(err).into()
    }
}

impl From<Locatable<CppError>> for Locatable<Error> {
    fn from(err: Locatable<CppError>) -> Self {
        err.map(Into::into)
    }
}

impl From<Locatable<SyntaxError>> for Locatable<Error> {
    fn from(err: Locatable<SyntaxError>) -> Self {
        err.map(Into::into)
    }
}

impl From<Locatable<SemanticError>> for Locatable<Error> {
    fn from(err: Locatable<SemanticError>) -> Self {
        err.map(Into::into)
    }
}
