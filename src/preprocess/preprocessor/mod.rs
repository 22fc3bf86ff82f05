mod define;
mod expand;
mod macros;

#[cfg(test)]
mod tests;

pub use macros::{Macro, MacroTable, ReplacementList};

use crate::error::{CompileResult, Diagnostic, ErrorHandler, Warning};
use crate::location::{Locatable, SourceKind};
use crate::InternedStr;

use super::error::*;
use super::keyword::Keyword;
use super::lexer::Lexer;
use super::manager::FileManager;
use super::token::*;

use codespan::FileId;

use crate::get_str;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use expand::{ExpansionContext, TailChain};

/// How many macro expansions may be live at once before giving up.
pub const DEFAULT_EXPANSION_LIMIT: usize = 256;

const MAX_INCLUDE_DEPTH: usize = 200;

/// A token together with the macro whose expansion it was read from.
///
/// The origin is what the recursion guard compares against.
type Pulled = (Token, Option<InternedStr>);

/// The macro-expanding preprocessor.
///
/// Tokens are pulled one at a time. Input comes from, in order of priority:
/// tokens that were read ahead and pushed back, the innermost live macro
/// expansion, and finally the lexer on top of the include stack.
pub struct Preprocessor {
    /// The include stack; the last lexer is the file being read.
    lexers: Vec<Lexer>,
    macros: MacroTable,
    /// Live macro expansions, innermost last.
    contexts: Vec<ExpansionContext>,
    /// Expansions that ran out while the current token was being read.
    retired: TailChain,
    pushback: Vec<Pulled>,
    /// Expanded tokens handed back by `until`.
    pending: VecDeque<Token>,

    at_line_start: bool,
    emit_newlines: bool,
    expansion_limit: usize,
    finished: bool,

    pub file_manager: FileManager,
    error_handler: ErrorHandler<CppError>,
}

impl Preprocessor {
    pub fn new(file_manager: FileManager, file: FileId) -> Self {
        let code = file_manager.source(file).code.clone();
        Self {
            lexers: vec![Lexer::new(SourceKind::File(file), code)],
            macros: MacroTable::new(),
            contexts: Vec::new(),
            retired: TailChain::default(),
            pushback: Vec::new(),
            pending: VecDeque::new(),

            at_line_start: true,
            emit_newlines: false,
            expansion_limit: DEFAULT_EXPANSION_LIMIT,
            finished: false,

            file_manager,
            error_handler: ErrorHandler::new(),
        }
    }

    /// Keep newlines in the output. Used when printing preprocessed source.
    pub fn emit_newlines(mut self, emit: bool) -> Self {
        self.emit_newlines = emit;
        self
    }

    pub fn expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = limit;
        self
    }

    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// Drain every recoverable error and warning recorded so far,
    /// including those recorded by the lexers.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        for lexer in &mut self.lexers {
            self.error_handler.append(&mut lexer.error_handler);
        }
        let errors = self
            .error_handler
            .take_errors()
            .into_iter()
            .map(|err| Diagnostic::from(Locatable::<crate::error::Error>::from(err)));
        let warnings = self
            .error_handler
            .take_warnings()
            .into_iter()
            .map(Diagnostic::from);
        errors.chain(warnings).collect()
    }

    /// Yield expanded tokens up to, but not including, the first one
    /// matching `pred`. That token is left for the next call to `next`.
    pub fn until<'a, P>(&'a mut self, mut pred: P) -> impl Iterator<Item = CompileResult<Token>> + 'a
    where
        P: FnMut(&TokenKind) -> bool + 'a,
    {
        std::iter::from_fn(move || match self.next()? {
            Ok(token) if pred(&token.data) => {
                self.pending.push_front(token);
                None
            }
            other => Some(other),
        })
    }

    /// Return the next fully expanded token.
    ///
    /// Whitespace is dropped, and so are newlines unless `emit_newlines`
    /// was set. `Ok(None)` means every file has been read.
    pub fn next_token(&mut self) -> CppResult<Option<Token>> {
        loop {
            // only expansions that end at this token lead into it
            self.retired = TailChain::default();
            let (token, origin) = match self.next_raw_token()? {
                Some(pulled) => pulled,
                None => return Ok(None),
            };

            let id = match token.data {
                TokenKind::Whitespace(WhitespaceKind::Newline) if self.emit_newlines => {
                    return Ok(Some(token))
                }
                TokenKind::Whitespace(_) => continue,
                TokenKind::Identifier(id) => id,
                _ => return Ok(Some(token)),
            };

            let mac = match self.macros.get_macro(id) {
                Some(mac) => mac.clone(),
                None => return Ok(Some(token)),
            };
            if self.macro_recursion_check(id, origin, token) {
                return Ok(Some(token));
            }
            if !self.start_macro_expansion(mac, token)? {
                return Ok(Some(token));
            }
        }
    }

    /// An identifier read from the expansion of the macro it names is left
    /// alone. Only the innermost expansion is checked.
    fn macro_recursion_check(
        &mut self,
        id: InternedStr,
        origin: Option<InternedStr>,
        token: Token,
    ) -> bool {
        if origin == Some(id) {
            self.error_handler
                .warn(Warning::MacroDefinedInTermsOfItself(id), token.location);
            true
        } else {
            false
        }
    }

    /// Return the next token from the include stack, running any directives
    /// found along the way.
    fn next_lexed(&mut self) -> CppResult<Option<Pulled>> {
        loop {
            let lexer = match self.lexers.last_mut() {
                Some(lexer) => lexer,
                None => return Ok(None),
            };

            let token = match lexer.next() {
                Some(Ok(token)) => token,
                Some(Err(err)) => {
                    self.error_handler.push_error(err);
                    continue;
                }
                None => {
                    if let Some(mut done) = self.lexers.pop() {
                        log::debug!("finished reading {:?}", done.source());
                        self.error_handler.append(&mut done.error_handler);
                    }
                    self.at_line_start = true;
                    continue;
                }
            };

            match token.data {
                TokenKind::Whitespace(WhitespaceKind::Newline) => self.at_line_start = true,
                TokenKind::Whitespace(_) => {}
                TokenKind::Hash if self.at_line_start => {
                    self.directive()?;
                    continue;
                }
                _ => self.at_line_start = false,
            }
            return Ok(Some((token, None)));
        }
    }

    fn directive(&mut self) -> CppResult<()> {
        let mut lexer = match self.lexers.pop() {
            Some(lexer) => lexer,
            None => return Ok(()),
        };
        let included = self.handle_directive(&mut lexer);
        self.lexers.push(lexer);
        if let Some(included) = included? {
            self.lexers.push(included);
        }
        Ok(())
    }

    // Consumes the whole directive line, including the newline.
    // Returns the lexer for an included file, if any.
    fn handle_directive(&mut self, lexer: &mut Lexer) -> CppResult<Option<Lexer>> {
        let token = match lexer.next_non_whitespace() {
            // null directive
            None => return Ok(None),
            Some(Ok(token)) if token.data.is_newline() => return Ok(None),
            Some(Ok(token)) => token,
            Some(Err(err)) => {
                self.error_handler.push_error(err);
                lexer.skip_line();
                return Ok(None);
            }
        };

        let name = match token.data {
            TokenKind::Identifier(name) => name,
            other => return Err(token.location.with(CppError::InvalidDirective(other))),
        };
        let directive = DirectiveKind::try_from(get_str!(name))
            .map_err(|_| token.location.with(CppError::InvalidDirective(token.data)))?;
        log::debug!("#{} directive", name);

        use DirectiveKind::*;
        match directive {
            Define => self.define(lexer).map(|_| None),
            Undef => self.undef(lexer).map(|_| None),
            Include => self.include(lexer),
            If | IfDef | IfNDef | Elif | Else | EndIf | Line | Warning | Error | Pragma => {
                self.error_handler
                    .warn(crate::error::Warning::UnsupportedDirective(name), token.location);
                lexer.skip_line();
                Ok(None)
            }
        }
    }

    // Consumes tokens like this:
    // before:
    // #include "file.h"
    //         ^
    // after:
    // eats entire line
    fn include(&mut self, lexer: &mut Lexer) -> CppResult<Option<Lexer>> {
        lexer.set_include_mode(true);
        let header = lexer.next_non_whitespace();
        lexer.set_include_mode(false);

        let (name, location) = match header {
            Some(Ok(Locatable {
                data: TokenKind::HeaderName {
                    global: false,
                    name,
                },
                location,
            })) => (name, location),
            Some(Ok(token)) if token.data.is_newline() => {
                return Err(token.map(|t| CppError::UnexpectedToken("header name", t)))
            }
            // <file> and macro-expanded includes
            Some(Ok(token)) => {
                self.error_handler
                    .warn(Warning::UnimplementedInclude, token.location);
                lexer.skip_line();
                return Ok(None);
            }
            Some(Err(err)) => return Err(err.map(Into::into)),
            None => {
                return Err(lexer
                    .span(lexer.offset())
                    .with(CppError::UnexpectedEOF("header name")))
            }
        };
        Self::expect_end_of_directive(lexer)?;

        if self.lexers.len() + 1 >= MAX_INCLUDE_DEPTH {
            return Err(location.with(IncludeError::NestedTooDeeply(MAX_INCLUDE_DEPTH).into()));
        }

        let current_path = match lexer.source() {
            SourceKind::File(id) => self.file_manager.source(id).path.clone(),
            SourceKind::Generated => PathBuf::new(),
        };
        let (code, id) = self
            .file_manager
            .include_path(Path::new(get_str!(name)), &current_path)
            .map_err(|err| location.with(CppError::from(err)))?;
        log::debug!("including {}", name);

        self.at_line_start = true;
        Ok(Some(Lexer::new(SourceKind::File(id), code)))
    }

    fn expect_id(lexer: &mut Lexer) -> CppResult<Locatable<InternedStr>> {
        match lexer.next_non_whitespace() {
            Some(Ok(Locatable {
                data: TokenKind::Identifier(name),
                location,
            })) => Ok(Locatable::new(name, location)),
            Some(Ok(newline)) if newline.data.is_newline() => {
                Err(newline.map(|_| CppError::MacroExpectedIdentifier(None)))
            }
            Some(Ok(other)) => {
                Err(other.map(|tok| CppError::MacroExpectedIdentifier(Some(tok))))
            }
            Some(Err(err)) => Err(err.map(Into::into)),
            None => Err(lexer
                .span(lexer.offset())
                .with(CppError::MacroExpectedIdentifier(None))),
        }
    }

    fn expect_end_of_directive(lexer: &mut Lexer) -> CppResult<()> {
        match lexer.next_non_whitespace() {
            None => Ok(()),
            Some(Ok(token)) if token.data.is_newline() => Ok(()),
            Some(Ok(token)) => Err(token.map(|t| CppError::UnexpectedToken("newline", t))),
            Some(Err(err)) => Err(err.map(Into::into)),
        }
    }
}

impl Iterator for Preprocessor {
    type Item = CompileResult<Token>;

    /// Return the next expanded token, with keywords recognised.
    ///
    /// A fatal error is returned once, after which the iterator is done.
    /// Recoverable problems are left for `take_diagnostics`.
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(Ok(token));
        }
        if self.finished {
            return None;
        }

        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token.map(|data| match data {
                TokenKind::Identifier(id) => Keyword::from_str(get_str!(id))
                    .map_or(data, TokenKind::Keyword),
                _ => data,
            }))),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err.into()))
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DirectiveKind {
    If,
    IfDef,
    IfNDef,
    Elif,
    Else,
    EndIf,
    Include,
    Define,
    Undef,
    Line,
    Warning,
    Error,
    Pragma,
}

impl TryFrom<&str> for DirectiveKind {
    type Error = ();
    fn try_from(s: &str) -> Result<Self, ()> {
        use DirectiveKind::*;
        Ok(match s {
            "if" => If,
            "elif" => Elif,
            "endif" => EndIf,
            "else" => Else,
            "ifdef" => IfDef,
            "ifndef" => IfNDef,
            "include" => Include,
            "define" => Define,
            "undef" => Undef,
            "line" => Line,
            "warning" => Warning,
            "error" => Error,
            "pragma" => Pragma,
            _ => return Err(()),
        })
    }
}
