pub mod error;
pub mod keyword;
mod lexer;
mod manager;
mod preprocessor;
pub mod token;

pub use keyword::Keyword;
pub use lexer::{LexResult, Lexer};
pub use manager::FileManager;
pub use preprocessor::{Macro, MacroTable, Preprocessor, ReplacementList, DEFAULT_EXPANSION_LIMIT};
pub use token::*;
