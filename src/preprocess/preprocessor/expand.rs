use super::*;

use crate::location::Location;

use std::rc::Rc;

/// One in-progress macro expansion.
#[derive(Debug)]
pub(super) struct ExpansionContext {
    mac: Rc<Macro>,
    /// One list per named parameter, then `__VA_ARGS__` when variadic.
    args: Vec<ReplacementList>,
    /// Index of the next body token.
    progress: usize,
    /// (argument, position) while a parameter is being substituted.
    arg_cursor: Option<(usize, usize)>,
    /// The finished expansions this one took the place of, itself included.
    chain: TailChain,
}

impl ExpansionContext {
    fn new(mac: Rc<Macro>, args: Vec<ReplacementList>, chain: TailChain) -> Self {
        Self {
            mac,
            args,
            progress: 0,
            arg_cursor: None,
            chain,
        }
    }

    fn is_exhausted(&self) -> bool {
        let arg_done = self
            .arg_cursor
            .map_or(true, |(arg, pos)| pos >= self.args[arg].len());
        arg_done && self.progress >= self.mac.replacement().len()
    }
}

/// Macros whose expansions ran out while an invocation was being read.
///
/// An invocation in tail position replaces the expansion it ends instead of
/// nesting inside it, so it does not count as a live context. `repeats`
/// counts how often such a chain came back to a macro it already went
/// through, which is how `#define A B` / `#define B A` still hits the limit.
#[derive(Debug, Default)]
pub(super) struct TailChain {
    names: Vec<InternedStr>,
    repeats: usize,
}

impl TailChain {
    fn merge(&mut self, other: TailChain) {
        for name in other.names {
            if !self.names.contains(&name) {
                self.names.push(name);
            }
        }
        self.repeats = self.repeats.max(other.repeats);
    }

    fn enter(&mut self, name: InternedStr) {
        if self.names.contains(&name) {
            self.repeats += 1;
        } else {
            self.names.push(name);
        }
    }
}

impl Preprocessor {
    /// Return the next token before macro expansion, whitespace included.
    ///
    /// Parameters of the innermost function-like expansion are replaced
    /// by their arguments here, and `#` is applied.
    pub(super) fn next_raw_token(&mut self) -> CppResult<Option<Pulled>> {
        if let Some(pulled) = self.pushback.pop() {
            return Ok(Some(pulled));
        }

        loop {
            self.pop_exhausted_contexts();

            let ctx = match self.contexts.last_mut() {
                Some(ctx) => ctx,
                None => return self.next_lexed(),
            };
            let origin = Some(ctx.mac.name());

            if let Some((arg, pos)) = ctx.arg_cursor {
                if let Some(&token) = ctx.args[arg].get(pos) {
                    ctx.arg_cursor = Some((arg, pos + 1));
                    return Ok(Some((token, origin)));
                }
                ctx.arg_cursor = None;
            }

            let body = ctx.mac.replacement();
            let token = body[ctx.progress];
            let after = body.get(ctx.progress + 1).copied();
            ctx.progress += 1;

            if let Some(index) = ctx.mac.param_index(&token.data) {
                ctx.arg_cursor = Some((index, 0));
                continue;
            }

            if token.data == TokenKind::Hash && matches!(*ctx.mac, Macro::Function { .. }) {
                let index = after
                    .and_then(|next| ctx.mac.param_index(&next.data))
                    .ok_or_else(|| token.location.with(CppError::HashNotFollowedByParameter))?;
                ctx.progress += 1;
                let string = stringify(&ctx.args[index], token.location);
                return Ok(Some((string, origin)));
            }

            return Ok(Some((token, origin)));
        }
    }

    fn pop_exhausted_contexts(&mut self) {
        while self.contexts.last().map_or(false, ExpansionContext::is_exhausted) {
            let mut popped = match self.contexts.pop() {
                Some(ctx) => ctx,
                None => break,
            };
            log::trace!("finished expanding {}", popped.mac.name());
            self.retired.merge(std::mem::take(&mut popped.chain));

            // a finished `__VA_ARGS__` leaves the binding to its owner
            if popped.mac.name().is_va_args() {
                continue;
            }

            let va_args = InternedStr::va_args();
            match self.contexts.last() {
                Some(top) if top.mac.is_variadic() => {
                    // a nested variadic call may have rebound it
                    let replacement = top.args.last().cloned().unwrap_or_default();
                    self.macros.register_macro(
                        va_args,
                        Macro::Object {
                            name: va_args,
                            replacement,
                        },
                    );
                }
                Some(top) if matches!(*top.mac, Macro::Object { .. }) => {}
                _ => {
                    self.macros.erase_macro(va_args);
                }
            }
        }
    }

    fn in_variadic_expansion(&self) -> bool {
        self.contexts.iter().any(|ctx| ctx.mac.is_variadic())
    }

    /// Begin expanding `mac`, invoked by `name`.
    ///
    /// Returns `false` if `mac` is function-like but `name` is not followed
    /// by `(`, in which case `name` is an ordinary identifier.
    ///
    /// Expansions that already ran out are popped first, so the limit
    /// counts live contexts plus the repeats of the tail chain.
    pub(super) fn start_macro_expansion(&mut self, mac: Rc<Macro>, name: Token) -> CppResult<bool> {
        // `name` may have been the last token of the expansions below it
        self.pop_exhausted_contexts();

        let args = match &*mac {
            Macro::Object { name: id, .. } => {
                if !id.is_va_args() && !self.in_variadic_expansion() {
                    self.macros.erase_macro(InternedStr::va_args());
                }
                Vec::new()
            }
            Macro::Function {
                name: id,
                params,
                variadic,
                ..
            } => {
                if !self.expect_invocation_paren()? {
                    return Ok(false);
                }
                let (mut args, commas) = self.gather_macro_args(*id, name.location)?;
                // before `__VA_ARGS__` is rebound below
                self.pop_exhausted_contexts();

                // `F()` passes no arguments rather than one empty one
                let given = if params.is_empty() && args.len() == 1 && args[0].is_empty() {
                    args.clear();
                    0
                } else {
                    args.len()
                };
                let arity_ok = if *variadic {
                    given >= params.len()
                } else {
                    given == params.len()
                };
                if !arity_ok {
                    return Err(name.location.with(
                        CppError::UnexpectedMacroInvocationArgumentCount {
                            name: *id,
                            expected: params.len(),
                            variadic: *variadic,
                            given,
                        },
                    ));
                }

                if *variadic {
                    let va_args = join_variadic_args(args.split_off(params.len()), &commas, params.len());
                    let va_name = InternedStr::va_args();
                    self.macros.register_macro(
                        va_name,
                        Macro::Object {
                            name: va_name,
                            replacement: va_args.clone(),
                        },
                    );
                    args.push(va_args);
                }
                args
            }
        };

        let mut chain = std::mem::take(&mut self.retired);
        chain.enter(mac.name());
        if self.contexts.len() + chain.repeats >= self.expansion_limit {
            return Err(name.location.with(CppError::MacroExpansionTooDeep(
                mac.name(),
                self.expansion_limit,
            )));
        }

        log::trace!("expanding {} with {} argument(s)", mac.name(), args.len());
        self.contexts.push(ExpansionContext::new(mac, args, chain));
        Ok(true)
    }

    // Looks past spaces and comments, but not newlines, for the `(` that
    // turns a function-like macro name into an invocation.
    fn expect_invocation_paren(&mut self) -> CppResult<bool> {
        loop {
            let pulled = match self.next_raw_token()? {
                Some(pulled) => pulled,
                None => return Ok(false),
            };
            match pulled.0.data {
                TokenKind::LeftParen => return Ok(true),
                TokenKind::Whitespace(kind) if kind != WhitespaceKind::Newline => continue,
                _ => {
                    self.pushback.push(pulled);
                    return Ok(false);
                }
            }
        }
    }

    // Consumes tokens like this:
    // before:
    // f(a, (b, c), d) + 1
    //   ^
    // after:
    // f(a, (b, c), d) + 1
    //                ^
    //
    // Arguments are read raw, so parameters of the enclosing expansion are
    // already substituted but macros are left for the rescan.
    // Also returns the top-level commas, which `__VA_ARGS__` keeps.
    fn gather_macro_args(
        &mut self,
        name: InternedStr,
        call_site: Location,
    ) -> CppResult<(Vec<ReplacementList>, Vec<Token>)> {
        let mut args = vec![ReplacementList::new()];
        let mut commas = Vec::new();
        let mut left_parens_seen = 0usize;

        loop {
            let (token, _) = match self.next_raw_token()? {
                Some(pulled) => pulled,
                None => return Err(call_site.with(CppError::UnterminatedMacroInvocation(name))),
            };

            match token.data {
                TokenKind::Whitespace(WhitespaceKind::Newline) => {
                    return Err(token
                        .location
                        .with(CppError::UnterminatedMacroInvocation(name)))
                }
                TokenKind::Whitespace(_) => continue,
                TokenKind::RightParen if left_parens_seen == 0 => break,
                TokenKind::Comma if left_parens_seen == 0 => {
                    commas.push(token);
                    args.push(ReplacementList::new());
                    continue;
                }
                TokenKind::LeftParen => left_parens_seen += 1,
                TokenKind::RightParen => left_parens_seen -= 1,
                _ => {}
            }

            if let Some(arg) = args.last_mut() {
                arg.push(token);
            }
        }

        Ok((args, commas))
    }
}

// Joins the arguments past the named ones back together with the commas
// that originally separated them.
fn join_variadic_args(surplus: Vec<ReplacementList>, commas: &[Token], named: usize) -> ReplacementList {
    let mut joined = ReplacementList::new();
    for (i, arg) in surplus.into_iter().enumerate() {
        if i > 0 {
            // commas[k] separates argument k from argument k + 1
            if let Some(&comma) = commas.get(named + i - 1) {
                joined.push(comma);
            }
        }
        joined.extend(arg);
    }
    joined
}

/// Apply `#` to an unexpanded argument.
///
/// Tokens that were adjacent in the source stay adjacent; anything else is
/// separated by exactly one space.
fn stringify(arg: &[Token], location: Location) -> Token {
    let mut text = String::new();
    let mut previous: Option<Location> = None;

    for token in arg {
        if let Some(previous) = previous {
            if !previous.is_directly_before(token.location) {
                text.push(' ');
            }
        }

        match token.data {
            TokenKind::Literal(LiteralKind::String(_) | LiteralKind::Char(_), _) => {
                for c in token.data.to_string().chars() {
                    if c == '"' || c == '\\' {
                        text.push('\\');
                    }
                    text.push(c);
                }
            }
            other => text.push_str(&other.to_string()),
        }
        previous = Some(token.location);
    }

    location.with(TokenKind::Literal(
        LiteralKind::String(EncodingKind::Normal),
        InternedStr::get_or_intern(text),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Span;

    fn at(kind: TokenKind, start: u32, end: u32, file: FileId) -> Token {
        Location {
            span: Span { start, end },
            source: SourceKind::File(file),
        }
        .with(kind)
    }

    #[test]
    fn stringify_spacing_follows_adjacency() {
        let mut files = crate::Files::new();
        let file = files.add(
            "t.c",
            crate::Source {
                code: "a+ b".into(),
                path: "t.c".into(),
            },
        );
        let arg = [
            at(TokenKind::Identifier("a".into()), 0, 1, file),
            at(TokenKind::Plus, 1, 2, file),
            at(TokenKind::Identifier("b".into()), 3, 4, file),
        ];
        let string = stringify(&arg, Location::default());
        assert_eq!(string.data.to_string(), r#""a+ b""#);
    }

    #[test]
    fn stringify_escapes_literals() {
        let arg = [Location::default().with(TokenKind::Literal(
            LiteralKind::String(EncodingKind::Normal),
            r"x\n".into(),
        ))];
        let string = stringify(&arg, Location::default());
        assert_eq!(string.data.to_string(), r#""\"x\\n\"""#);
    }

    #[test]
    fn variadic_args_keep_their_commas() {
        let comma = Location::default().with(TokenKind::Comma);
        let one = |s: &str| vec![Location::default().with(TokenKind::Identifier(s.into()))];
        let joined = join_variadic_args(vec![one("b"), one("c")], &[comma, comma], 1);
        let kinds: Vec<_> = joined.into_iter().map(|t| t.data).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier("b".into()),
                TokenKind::Comma,
                TokenKind::Identifier("c".into()),
            ]
        );
    }
}
