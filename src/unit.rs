//! Running the whole pipeline over one source buffer.

use std::path::PathBuf;

use codespan::FileId;

use crate::analyze::Analyzer;
use crate::error::Diagnostic;
use crate::hir;
use crate::parse::Parser;
use crate::preprocess::{FileManager, Preprocessor, Token, DEFAULT_EXPANSION_LIMIT};
use crate::{Files, Source};

/// Settings shared by every stage.
#[derive(Clone, Debug)]
pub struct Options {
    /// Directories searched by `#include "file"` after the including file's own directory.
    pub search_path: Vec<PathBuf>,
    pub expansion_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            search_path: Vec::new(),
            expansion_limit: DEFAULT_EXPANSION_LIMIT,
        }
    }
}

/// What a run produced, along with everything that was reported on the way.
///
/// `files` holds every file that was read, so diagnostics can be rendered.
pub struct Outcome<T> {
    pub output: T,
    pub diagnostics: Vec<Diagnostic>,
    pub files: Files,
}

impl<T> Outcome<T> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

pub struct TranslationUnit {
    manager: FileManager,
    file: FileId,
    options: Options,
}

impl TranslationUnit {
    pub fn from_source(name: &str, source: Source, options: Options) -> Self {
        let mut manager = FileManager::new().with_search_path(options.search_path.clone());
        let file = manager.add_source(name, source);
        TranslationUnit {
            manager,
            file,
            options,
        }
    }

    fn preprocessor(self) -> Preprocessor {
        Preprocessor::new(self.manager, self.file).expansion_limit(self.options.expansion_limit)
    }

    /// Expand macros and stop there.
    ///
    /// Newlines are kept so the output can be printed line by line.
    /// A fatal error ends the output early and is the last diagnostic.
    pub fn preprocess(self) -> Outcome<Vec<Token>> {
        let mut cpp = self.preprocessor().emit_newlines(true);
        let mut output = Vec::new();
        let mut fatal = Vec::new();
        for token in cpp.by_ref() {
            match token {
                Ok(token) => output.push(token),
                Err(err) => fatal.push(Diagnostic::from(err)),
            }
        }

        let mut diagnostics = cpp.take_diagnostics();
        diagnostics.extend(fatal);
        Outcome {
            output,
            diagnostics,
            files: cpp.file_manager.into_files(),
        }
    }

    /// Preprocess, parse and type every expression statement.
    ///
    /// Expressions that were analyzed before a fatal error are still returned.
    pub fn analyze(self) -> Outcome<Vec<hir::Expr>> {
        let mut cpp = self.preprocessor();
        let mut output = Vec::new();
        let mut errors = Vec::new();

        let mut analyzer = Analyzer::new(Parser::new(cpp.by_ref()));
        for expr in analyzer.by_ref() {
            match expr {
                Ok(expr) => output.push(expr),
                Err(err) => errors.push(Diagnostic::from(err)),
            }
        }
        let warnings: Vec<_> = analyzer
            .inner
            .warnings()
            .into_iter()
            .map(Diagnostic::from)
            .collect();
        drop(analyzer);

        let mut diagnostics = cpp.take_diagnostics();
        diagnostics.extend(errors);
        diagnostics.extend(warnings);
        log::debug!(
            "analyzed {} expressions with {} diagnostics",
            output.len(),
            diagnostics.len()
        );
        Outcome {
            output,
            diagnostics,
            files: cpp.file_manager.into_files(),
        }
    }
}
