//! Basic preprocessing lexer.
//!
//! The functions in this module handle the basics of reading C,
//! namely 5.1.1.2 phases 1 and 2. Tokenizing the characters into C
//! preprocessing tokens lives in `lex.rs`.

mod lex;

use super::error::LexError;

use crate::error::{ErrorHandler, Warning};
use crate::location::{Locatable, Location, SourceKind};

use arcstr::ArcStr;

pub type LexResult<T> = Result<T, Locatable<LexError>>;

#[derive(Clone, Debug)]
pub struct Lexer {
    initial: ArcStr,

    // byte offset of the next raw char
    offset: usize,
    // the current location of the parser
    location: SingleLocation,
    /// used for 2-character tokens
    current: Option<(char, u32)>,
    /// used for 3-character tokens
    lookahead: Option<(char, u32)>,

    pub error_handler: ErrorHandler<LexError>,

    /// Whether `<` and `"` start a header name rather than an operator or
    /// string literal. Only set while lexing an `#include` line.
    pub parse_header: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct SingleLocation {
    pub offset: u32,
    pub source: SourceKind,
}

impl Lexer {
    /// Creates a Lexer from a file id and the contents of the file
    pub fn new(source: SourceKind, initial: ArcStr) -> Lexer {
        Self {
            initial,

            offset: 0,
            location: SingleLocation { offset: 0, source },
            current: None,
            lookahead: None,
            parse_header: false,

            error_handler: ErrorHandler::new(),
        }
    }

    pub fn source(&self) -> SourceKind {
        self.location.source
    }

    pub fn offset(&self) -> u32 {
        self.location.offset
    }

    /// Given the start of a span as an offset,
    /// return a span lasting until the current location in the file.
    pub fn span(&self, start: u32) -> Location {
        Location {
            span: (start..self.location.offset).into(),
            source: self.location.source,
        }
    }

    /// Returns the next char in the stream, updating internal location
    /// information. If a lookahead already exists, use that instead.
    ///
    /// Everything in `lex.rs` goes through this (and `peek`), so that
    /// offsets stay correct across backslash-newline splices.
    pub fn next_char(&mut self) -> Option<char> {
        if self.current.is_none() {
            self.peek();
        }
        let (c, width) = self.current.take()?;
        self.location.offset += width;
        Some(c)
    }

    fn chars(&self) -> std::str::Chars<'_> {
        self.initial[self.offset..].chars()
    }

    fn next_raw_char(&mut self) -> Option<char> {
        let c = self.chars().next()?;
        self.offset += c.len_utf8();
        Some(c)
    }

    // Reads one logical char; the width includes any spliced-out
    // backslash-newline pairs in front of it.
    fn advance_char_lookaheads(&mut self) -> Option<(char, u32)> {
        let mut width = 0;
        let mut c = self.next_raw_char();
        if let Some(c) = c {
            width += c.len_utf8() as u32;
        }

        // Section 5.1.1.2 phase 2: discard backslashes before newlines
        while c == Some('\\') && self.chars().next() == Some('\n') {
            self.offset += 1;
            width += 1;

            c = self.next_raw_char();
            match c {
                Some(c) => width += c.len_utf8() as u32,
                None => {
                    let location = self.span(self.location.offset);
                    self.error_handler
                        .warn(Warning::BackslashNewlineAtEOF, location);
                }
            }
        }

        c.map(|c| (c, width))
    }

    /// Return the character that would be returned by `next_char`.
    /// Can be called any number of times and will still return the same result.
    fn peek(&mut self) -> Option<char> {
        self.current = self
            .current
            .or_else(|| self.lookahead.take())
            .or_else(|| self.advance_char_lookaheads());

        self.current.map(|x| x.0)
    }

    /// Return the character that would be returned if you called `next_char()` twice in a row.
    /// Can be called any number of the times and will still return the same result.
    fn peek_next(&mut self) -> Option<char> {
        self.peek();
        self.lookahead = self.lookahead.or_else(|| self.advance_char_lookaheads());
        self.lookahead.map(|x| x.0)
    }
}
