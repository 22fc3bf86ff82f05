use crate::location::Locatable;
use crate::InternedStr;

use crate::preprocess::error::LexError;
use crate::preprocess::lexer::Lexer;
use crate::preprocess::token::*;

use super::LexResult;

use std::str::FromStr;

/// Returns whether the char is whitespace
/// according to the C standard.
fn is_c_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n' || c == '\r' || c == '\u{0B}' || c == '\u{0C}'
}

impl Lexer {
    pub fn set_include_mode(&mut self, parse_header: bool) {
        self.parse_header = parse_header;
    }

    /// Remove all consecutive whitespace of the same type pending in the stream.
    /// The 4 types are newline, line comment, block comment, and all other whitespace.
    fn consume_whitespace(&mut self) -> Option<WhitespaceKind> {
        if self.peek() == Some('\n') {
            self.next_char();
            return Some(WhitespaceKind::Newline);
        }

        let mut touched = false;
        while let Some(c) = self.peek() {
            if c == '\n' || !is_c_whitespace(c) {
                break;
            };

            touched = true;
            self.next_char();
        }
        if touched {
            return Some(WhitespaceKind::Space);
        }

        if self.peek() == Some('/') {
            match self.peek_next() {
                Some('/') => {
                    self.skip_line();
                    return Some(WhitespaceKind::LineComment);
                }
                Some('*') => {
                    self.next_char();
                    self.next_char();
                    if let Err(err) = self.consume_multi_comment() {
                        self.error_handler.push_error(err);
                    }
                    return Some(WhitespaceKind::BlockComment);
                }
                _ => {}
            }
        }

        None
    }

    /// Remove all characters between now and the next '\n' character.
    ///
    /// Before: u8s{"blah `invalid tokens``\nhello // blah"}
    /// After:  chars{"\nhello // blah"}
    pub fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }

            self.next_char();
        }
    }

    /// Remove a multi-line C-style comment, i.e. until the next '*/'.
    /// Assumes the leading `/*` has been eaten
    ///
    /// Before: u8s{"hello this is a lot of text */ int main(){}"}
    /// After:  chars{" int main(){}"}
    fn consume_multi_comment(&mut self) -> LexResult<()> {
        let start = self.offset() - 2;
        while let Some(c) = self.next_char() {
            if c == '*' && self.peek() == Some('/') {
                self.next_char();
                return Ok(());
            }
        }
        Err(self.span(start).with(LexError::UnterminatedComment))
    }

    /// Parse an identifier, given the starting letter.
    ///
    /// Identifiers match the following regex: `[a-zA-Z_][a-zA-Z0-9_]*`
    fn parse_id(&mut self, start: char) -> String {
        let mut ret = String::with_capacity(8);
        ret.push(start);

        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | 'a'..='z' | 'A'..='Z' | '_' => {
                    ret.push(c);
                    self.next_char();
                }
                _ => break,
            }
        }
        ret
    }

    // Reads the body of a quoted literal, keeping escapes as written.
    // Assumes the leading quote has been eaten.
    fn parse_quoted(&mut self, quote: char) -> Result<String, LexError> {
        let string = quote == '"';
        let mut ret = String::with_capacity(8);

        loop {
            match self.peek() {
                Some('\\') => {
                    self.next_char();
                    ret.push('\\');
                    match self.peek() {
                        Some('\n') | None => {}
                        Some(c) => {
                            self.next_char();
                            ret.push(c);
                        }
                    }
                }
                Some(c) if c == quote => {
                    self.next_char();
                    return Ok(ret);
                }
                // leave the newline for the preprocessor
                Some('\n') | None => return Err(LexError::MissingEndQuote { string }),
                Some(c) => {
                    self.next_char();
                    ret.push(c);
                }
            }
        }
    }

    fn parse_char(&mut self, encoding: EncodingKind) -> Result<TokenKind, LexError> {
        let ret = self.parse_quoted('\'')?;
        if ret.is_empty() {
            return Err(LexError::EmptyChar);
        }

        Ok(TokenKind::Literal(
            LiteralKind::Char(encoding),
            InternedStr::get_or_intern(ret),
        ))
    }

    fn parse_string(&mut self, encoding: EncodingKind) -> Result<TokenKind, LexError> {
        let ret = self.parse_quoted('"')?;

        Ok(TokenKind::Literal(
            LiteralKind::String(encoding),
            InternedStr::get_or_intern(ret),
        ))
    }

    fn parse_header_name(&mut self, global: bool) -> Result<TokenKind, LexError> {
        let mut name = String::with_capacity(8);

        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.next_char();
            if (c == '>' && global) || (c == '"' && !global) {
                return Ok(TokenKind::HeaderName {
                    global,
                    name: InternedStr::get_or_intern(name),
                });
            }
            name.push(c);
        }

        Err(LexError::MissingHeaderEnd { global })
    }

    /// Parse a preprocessing number, given its first char (a digit, or a
    /// `.` that is known to be followed by a digit).
    ///
    /// Validating the digits and suffix is left to the parser.
    fn parse_number(&mut self, start_char: char) -> TokenKind {
        let mut ret = String::with_capacity(8);
        ret.push(start_char);

        loop {
            match self.peek() {
                Some(c @ ('e' | 'E' | 'p' | 'P')) => {
                    ret.push(c);
                    self.next_char();

                    if let Some(c @ ('+' | '-')) = self.peek() {
                        ret.push(c);
                        self.next_char();
                    }
                }
                Some(c @ ('0'..='9' | 'a'..='z' | 'A'..='Z' | '_' | '.')) => {
                    ret.push(c);
                    self.next_char();
                }
                _ => break,
            }
        }

        TokenKind::Literal(LiteralKind::Number, InternedStr::get_or_intern(ret))
    }

    /// Like `next`, but skips spaces and comments. Newlines are returned.
    pub fn next_non_whitespace(&mut self) -> Option<LexResult<Token>> {
        loop {
            match self.next() {
                Some(Ok(token)) if token.data.is_whitespace() && !token.data.is_newline() => {
                    continue
                }
                other => break other,
            }
        }
    }

    fn lex_punctuator(&mut self, c: char) -> TokenKind {
        use TokenKind::*;

        // this giant switch is most of the logic
        match c {
            '#' => match self.peek() {
                Some('#') => {
                    self.next_char();
                    HashHash
                }
                _ => Hash,
            },
            '+' => match self.peek() {
                Some('=') => {
                    self.next_char();
                    AddEqual
                }
                Some('+') => {
                    self.next_char();
                    PlusPlus
                }
                _ => Plus,
            },
            '-' => match self.peek() {
                Some('=') => {
                    self.next_char();
                    SubEqual
                }
                Some('-') => {
                    self.next_char();
                    MinusMinus
                }
                Some('>') => {
                    self.next_char();
                    StructDeref
                }
                _ => Minus,
            },
            '*' => match self.peek() {
                Some('=') => {
                    self.next_char();
                    MulEqual
                }
                _ => Star,
            },
            '/' => match self.peek() {
                Some('=') => {
                    self.next_char();
                    DivEqual
                }
                _ => Divide,
            },
            '%' => match self.peek() {
                Some('=') => {
                    self.next_char();
                    ModEqual
                }
                _ => Mod,
            },
            '^' => match self.peek() {
                Some('=') => {
                    self.next_char();
                    XorEqual
                }
                _ => Xor,
            },
            '=' => match self.peek() {
                Some('=') => {
                    self.next_char();
                    EqualEqual
                }
                _ => Equal,
            },
            '!' => match self.peek() {
                Some('=') => {
                    self.next_char();
                    NotEqual
                }
                _ => LogicalNot,
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.next_char();
                    GreaterEqual
                }
                Some('>') => {
                    self.next_char();
                    match self.peek() {
                        Some('=') => {
                            self.next_char();
                            ShrEqual
                        }
                        _ => ShiftRight,
                    }
                }
                _ => Greater,
            },
            '<' => match self.peek() {
                Some('=') => {
                    self.next_char();
                    LessEqual
                }
                Some('<') => {
                    self.next_char();
                    match self.peek() {
                        Some('=') => {
                            self.next_char();
                            ShlEqual
                        }
                        _ => ShiftLeft,
                    }
                }
                _ => Less,
            },
            '&' => match self.peek() {
                Some('&') => {
                    self.next_char();
                    LogicalAnd
                }
                Some('=') => {
                    self.next_char();
                    AndEqual
                }
                _ => Ampersand,
            },
            '|' => match self.peek() {
                Some('|') => {
                    self.next_char();
                    LogicalOr
                }
                Some('=') => {
                    self.next_char();
                    OrEqual
                }
                _ => BitwiseOr,
            },
            '{' => LeftBrace,
            '}' => RightBrace,
            '(' => LeftParen,
            ')' => RightParen,
            '[' => LeftBracket,
            ']' => RightBracket,
            '~' => BinaryNot,
            ':' => Colon,
            ';' => Semicolon,
            ',' => Comma,
            '.' => match self.peek() {
                Some('.') if self.peek_next() == Some('.') => {
                    self.next_char();
                    self.next_char();
                    Ellipsis
                }
                _ => Dot,
            },
            '?' => Question,
            x => Unknown(x),
        }
    }
}

impl Iterator for Lexer {
    // option: whether the stream is exhausted
    // result: whether the next lexeme is an error
    type Item = LexResult<Token>;

    /// Return the next token in the stream.
    ///
    /// This iterator never resumes after it is depleted,
    /// i.e. once it returns None once, it will always return None.
    ///
    /// Any item may be an error, but items will always have an associated location.
    /// The file may be empty to start, in which case the iterator will return None.
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.error_handler.pop_error() {
            return Some(Err(err));
        }

        let span_start = self.offset();

        if let Some(data) = self.consume_whitespace() {
            return Some(Ok(self.span(span_start).with(TokenKind::Whitespace(data))));
        }

        let c = self.next_char()?;
        let data = match c {
            '<' if self.parse_header => self.parse_header_name(true),
            '"' if self.parse_header => self.parse_header_name(false),
            '.' if matches!(self.peek(), Some('0'..='9')) => Ok(self.parse_number('.')),
            c @ '0'..='9' => Ok(self.parse_number(c)),
            'a'..='z' | 'A'..='Z' | '_' => {
                let id = self.parse_id(c);
                match (EncodingKind::from_str(&id), self.peek()) {
                    (Ok(encoding), Some('"')) => {
                        self.next_char();
                        self.parse_string(encoding)
                    }
                    (Ok(encoding), Some('\'')) => {
                        self.next_char();
                        self.parse_char(encoding)
                    }
                    _ => Ok(TokenKind::Identifier(InternedStr::get_or_intern(id))),
                }
            }
            '\'' => self.parse_char(EncodingKind::Normal),
            '"' => self.parse_string(EncodingKind::Normal),
            c => Ok(self.lex_punctuator(c)),
        };

        let location = self.span(span_start);
        let token = data.map(|data| location.with(data)).map_err(|err| location.with(err));
        log::trace!("lexed {:?}", token);
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::SourceKind;

    fn lex(input: &str) -> Vec<Result<TokenKind, LexError>> {
        Lexer::new(SourceKind::Generated, input.into())
            .filter(|t| !matches!(t, Ok(Locatable { data, .. }) if data.is_whitespace()))
            .map(|t| t.map(|t| t.data).map_err(|e| e.data))
            .collect()
    }

    fn number(s: &str) -> TokenKind {
        TokenKind::Literal(LiteralKind::Number, s.into())
    }

    #[test]
    fn numbers_keep_exponent_signs() {
        assert_eq!(
            lex("1.5e+3f 0x1p-2 .5 42ull"),
            vec![
                Ok(number("1.5e+3f")),
                Ok(number("0x1p-2")),
                Ok(number(".5")),
                Ok(number("42ull")),
            ]
        );
    }

    #[test]
    fn punctuators_are_maximal_munch() {
        assert_eq!(
            lex("a<<=b->c...d"),
            vec![
                Ok(TokenKind::Identifier("a".into())),
                Ok(TokenKind::ShlEqual),
                Ok(TokenKind::Identifier("b".into())),
                Ok(TokenKind::StructDeref),
                Ok(TokenKind::Identifier("c".into())),
                Ok(TokenKind::Ellipsis),
                Ok(TokenKind::Identifier("d".into())),
            ]
        );
    }

    #[test]
    fn encoding_prefixes() {
        assert_eq!(
            lex(r#"L'x' u8"s" u"#),
            vec![
                Ok(TokenKind::Literal(
                    LiteralKind::Char(EncodingKind::Wide),
                    "x".into()
                )),
                Ok(TokenKind::Literal(
                    LiteralKind::String(EncodingKind::Utf8),
                    "s".into()
                )),
                Ok(TokenKind::Identifier("u".into())),
            ]
        );
    }

    #[test]
    fn escapes_are_kept_verbatim() {
        assert_eq!(
            lex(r#"'\'' "a\"b""#),
            vec![
                Ok(TokenKind::Literal(
                    LiteralKind::Char(EncodingKind::Normal),
                    "\\'".into()
                )),
                Ok(TokenKind::Literal(
                    LiteralKind::String(EncodingKind::Normal),
                    "a\\\"b".into()
                )),
            ]
        );
    }

    #[test]
    fn comments_are_whitespace() {
        let kinds: Vec<_> = Lexer::new(SourceKind::Generated, "a// x\n/* y */b".into())
            .map(|t| t.map(|t| t.data).map_err(|e| e.data))
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                Ok(TokenKind::Identifier("a".into())),
                Ok(TokenKind::Whitespace(WhitespaceKind::LineComment)),
                Ok(TokenKind::Whitespace(WhitespaceKind::Newline)),
                Ok(TokenKind::Whitespace(WhitespaceKind::BlockComment)),
                Ok(TokenKind::Identifier("b".into())),
            ]
        );
    }

    #[test]
    fn lex_errors() {
        assert_eq!(lex("''"), vec![Err(LexError::EmptyChar)]);
        assert_eq!(
            lex("\"abc\n"),
            vec![Err(LexError::MissingEndQuote { string: true })]
        );
        assert_eq!(lex("/* abc"), vec![Err(LexError::UnterminatedComment)]);
    }

    #[test]
    fn backslash_newline_is_spliced() {
        assert_eq!(
            lex("ab\\\ncd"),
            vec![Ok(TokenKind::Identifier("abcd".into()))]
        );
    }
}
