//! A C front-end: a macro-expanding preprocessor feeding a recursive-descent
//! expression parser, with type deduction and operand checking on top.
//!
//! Each stage is an iterator over the previous one:
//! `Preprocessor` yields tokens, `Parser` yields `ast::Expr`,
//! and `Analyzer` yields typed `hir::Expr`.

pub mod analyze;
pub mod arch;
pub mod data;
pub mod error;
pub mod hir;
pub mod intern;
pub mod location;
pub mod parse;
pub mod preprocess;
pub mod unit;

pub use intern::InternedStr;

use arcstr::ArcStr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Source {
    pub code: ArcStr,
    pub path: PathBuf,
}

impl AsRef<str> for Source {
    fn as_ref(&self) -> &str {
        self.code.as_ref()
    }
}

pub type Files = codespan::Files<Source>;
