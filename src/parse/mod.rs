pub mod ast;
mod error;
mod expr;
pub mod literal;

pub use error::SyntaxError;

use crate::error::{CompileResult, Error};
use crate::location::{Locatable, Location};
use crate::preprocess::{Token, TokenKind};

use std::collections::VecDeque;

pub type Lexeme = CompileResult<Token>;

/// A recursive-descent parser over a stream of preprocessed tokens.
///
/// The input is a sequence of expression statements (`expr ;`). Each call
/// to `next` parses one of them. The first error ends the stream, so an
/// `Err` is always the last item.
pub struct Parser<I: Iterator<Item = Lexeme>> {
    /// We iterate lazily over the tokens, so if we have a program that's mostly valid but
    /// breaks at the end, we don't only show lex errors
    tokens: I,
    /// Tokens read ahead of the current position. At most two are needed,
    /// to tell `(type) expr` from `(expr)`.
    lookahead: VecDeque<Token>,
    /// Where end-of-file errors are reported.
    last_location: Location,
    finished: bool,
}

impl<I: Iterator<Item = Lexeme>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            lookahead: VecDeque::new(),
            last_location: Location::default(),
            finished: false,
        }
    }

    /// Return whether this parser has fully finished parsing.
    ///
    /// This can be used if, for example, you call `parser.expr()`
    /// and want to see if there are any left-over tokens.
    pub fn is_empty(&mut self) -> CompileResult<bool> {
        Ok(self.peek_token()?.is_none())
    }

    // make sure `n` tokens are buffered, unless the input runs out first
    fn fill(&mut self, n: usize) -> CompileResult<()> {
        while self.lookahead.len() < n {
            match self.tokens.next() {
                Some(token) => self.lookahead.push_back(token?),
                None => break,
            }
        }
        Ok(())
    }

    fn peek_token(&mut self) -> CompileResult<Option<&TokenKind>> {
        self.fill(1)?;
        Ok(self.lookahead.front().map(|t| &t.data))
    }

    fn peek_next_token(&mut self) -> CompileResult<Option<&TokenKind>> {
        self.fill(2)?;
        Ok(self.lookahead.get(1).map(|t| &t.data))
    }

    fn next_token(&mut self) -> CompileResult<Option<Token>> {
        self.fill(1)?;
        let token = self.lookahead.pop_front();
        if let Some(token) = &token {
            self.last_location = token.location;
        }
        Ok(token)
    }

    /// Consume the next token if it is `kind`.
    fn match_next(&mut self, kind: &TokenKind) -> CompileResult<Option<Token>> {
        if self.peek_token()? == Some(kind) {
            self.next_token()
        } else {
            Ok(None)
        }
    }

    fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        match self.next_token()? {
            Some(token) if token.data == expected => Ok(token),
            Some(token) => Err(token.location.with(
                SyntaxError::ExpectedToken {
                    expected,
                    found: Some(token.data),
                }
                .into(),
            )),
            None => Err(self.last_location.with(
                SyntaxError::ExpectedToken {
                    expected,
                    found: None,
                }
                .into(),
            )),
        }
    }

    /// The error for a missing operand at the current position.
    fn expected_expression(&mut self) -> Locatable<Error> {
        let found = match self.peek_token() {
            Ok(found) => found.copied(),
            Err(err) => return err,
        };
        match (found, self.lookahead.front()) {
            (Some(found), Some(token)) => token
                .location
                .with(SyntaxError::ExpectedExpression(found).into()),
            _ => self
                .last_location
                .with(SyntaxError::UnexpectedEOF("expression").into()),
        }
    }

    // expression_statement: expr ';'
    fn expression_statement(&mut self) -> CompileResult<Option<ast::Expr>> {
        if self.is_empty()? {
            return Ok(None);
        }
        let expr = match self.expr()? {
            Some(expr) => expr,
            None => return Err(self.expected_expression()),
        };
        self.expect(TokenKind::Semicolon)?;
        log::trace!("parsed {}", expr.data);
        Ok(Some(expr))
    }
}

impl<I: Iterator<Item = Lexeme>> Iterator for Parser<I> {
    type Item = CompileResult<ast::Expr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let next = self.expression_statement().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.finished = true;
        }
        next
    }
}
