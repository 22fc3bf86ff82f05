use super::*;

use indexmap::IndexSet;

impl Preprocessor {
    // Consumes tokens like this:
    // before:
    // #define f(a, b, c) a + b + c
    //        ^
    // after:
    // eats entire line
    pub(super) fn define(&mut self, lexer: &mut Lexer) -> CppResult<()> {
        let name = Self::expect_id(lexer)?;
        if name.data.is_va_args() {
            return Err(name.map(|id| {
                CppError::MacroExpectedIdentifier(Some(TokenKind::Identifier(id)))
            }));
        }

        // What directly follows the name decides the kind of macro:
        // '(' with no space starts a parameter list, anything else
        // starts the replacement list of an object-like macro.
        let mut first = None;
        let mut params = None;
        match lexer.next() {
            None => {}
            Some(Err(err)) => self.error_handler.push_error(err),
            Some(Ok(token)) => match token.data {
                TokenKind::LeftParen => params = Some(self.expect_macro_params(lexer, token)?),
                TokenKind::Whitespace(_) => first = Some(token),
                _ => {
                    self.error_handler
                        .warn(Warning::NoSpaceAfterMacroIdentifier, token.location);
                    first = Some(token);
                }
            },
        }

        let replacement = self.expect_replacement_list(lexer, first);
        let mac = match params {
            Some((params, variadic)) => {
                Self::check_stringify_operands(&replacement, &params, variadic)?;
                Macro::Function {
                    name: name.data,
                    replacement,
                    params,
                    variadic,
                }
            }
            None => Macro::Object {
                name: name.data,
                replacement,
            },
        };

        self.define_macro(name, mac)
    }

    fn define_macro(&mut self, name: Locatable<InternedStr>, definition: Macro) -> CppResult<()> {
        // repeating a definition token for token is accepted, any change is an error
        if let Some(existing) = self.macros.get_macro(name.data) {
            if **existing != definition {
                return Err(name.map(CppError::IllegalMacroRedefinition));
            }
        }

        log::debug!("defined {:?}", definition);
        self.macros.register_macro(name.data, definition);
        Ok(())
    }

    // Consumes tokens like this:
    // before:
    // #undef f
    //       ^
    // after:
    // eats entire line
    pub(super) fn undef(&mut self, lexer: &mut Lexer) -> CppResult<()> {
        let name = Self::expect_id(lexer)?;
        Self::expect_end_of_directive(lexer)?;
        if self.macros.erase_macro(name.data).is_some() {
            log::debug!("undefined {}", name.data);
        }
        Ok(())
    }

    // Consumes tokens like this:
    // before:
    // #define f(a, b, c) a + b + c
    //           ^
    // after:
    // #define f(a, b, c) a + b + c
    //                   ^
    fn expect_macro_params(
        &mut self,
        lexer: &mut Lexer,
        open: Token,
    ) -> CppResult<(IndexSet<InternedStr>, bool)> {
        let mut params = IndexSet::new();

        let mut token = Self::expect_param_token(lexer, open)?;
        if token.data == TokenKind::RightParen {
            return Ok((params, false));
        }

        loop {
            match token.data {
                TokenKind::Ellipsis => {
                    let close = Self::expect_param_token(lexer, open)?;
                    return if close.data == TokenKind::RightParen {
                        Ok((params, true))
                    } else {
                        Err(close.location.with(CppError::MacroEllipsisNotLast))
                    };
                }
                TokenKind::Identifier(id) if !id.is_va_args() => {
                    if !params.insert(id) {
                        return Err(token.location.with(CppError::DuplicateMacroParameter(id)));
                    }
                }
                other => {
                    return Err(token
                        .location
                        .with(CppError::IllegalMacroParameterToken(other)))
                }
            }

            let separator = Self::expect_param_token(lexer, open)?;
            match separator.data {
                TokenKind::Comma => token = Self::expect_param_token(lexer, open)?,
                TokenKind::RightParen => return Ok((params, false)),
                other => {
                    return Err(separator
                        .location
                        .with(CppError::IllegalMacroParameterToken(other)))
                }
            }
        }
    }

    fn expect_param_token(lexer: &mut Lexer, open: Token) -> CppResult<Token> {
        match lexer.next_non_whitespace() {
            Some(Ok(token)) if token.data.is_newline() => {
                Err(token.location.with(CppError::UnterminatedMacroParameterList))
            }
            Some(Ok(token)) => Ok(token),
            Some(Err(err)) => Err(err.map(Into::into)),
            None => Err(open
                .location
                .with(CppError::UnterminatedMacroParameterList)),
        }
    }

    // Consumes tokens like this:
    // before:
    // #define F a + b + c // comment
    //          ^
    // after:
    // eats entire line
    //
    // Whitespace, comments included, is dropped.
    fn expect_replacement_list(&mut self, lexer: &mut Lexer, first: Option<Token>) -> ReplacementList {
        let mut tokens = ReplacementList::new();
        let mut cur = match first {
            Some(token) => Some(Ok(token)),
            None => lexer.next(),
        };

        loop {
            match cur {
                None => break,
                Some(Ok(token)) if token.data.is_newline() => break,
                Some(Ok(token)) if token.data.is_whitespace() => {}
                Some(Ok(token)) => tokens.push(token),
                Some(Err(err)) => self.error_handler.push_error(err),
            }
            cur = lexer.next();
        }

        tokens
    }

    // `#` in a function-like macro must be followed by a parameter.
    fn check_stringify_operands(
        replacement: &[Token],
        params: &IndexSet<InternedStr>,
        variadic: bool,
    ) -> CppResult<()> {
        let names_param = |token: Option<&Token>| match token.map(|t| t.data) {
            Some(TokenKind::Identifier(id)) => {
                params.contains(&id) || (variadic && id.is_va_args())
            }
            _ => false,
        };

        for (i, token) in replacement.iter().enumerate() {
            if token.data == TokenKind::Hash && !names_param(replacement.get(i + 1)) {
                return Err(token.location.with(CppError::HashNotFollowedByParameter));
            }
        }
        Ok(())
    }
}
