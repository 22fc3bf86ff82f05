use super::*;
use crate::analyze::SemanticError;
use crate::data::{BinaryOp, UnaryOp};
use crate::get_str;
use crate::parse::ast::{DeclarationSpecifier, Expr, ExprType, TypeName, UnitSpecifier};
use crate::parse::literal::{char_literal, number_literal};
use crate::preprocess::{Keyword, LiteralKind};

type Operand<I> = fn(&mut Parser<I>) -> CompileResult<Option<Expr>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[rustfmt::skip]
enum BinaryPrecedence {
    Mul,
    Add,
    Shift,
    Relational,
    Equality,
    BitAnd,
    BitXor,
    BitOr,
    LogAnd,
    LogOr,
}

impl BinaryPrecedence {
    fn prec(self) -> usize {
        use BinaryPrecedence::*;
        match self {
            Mul => 12,
            Add => 11,
            Shift => 10,
            Relational => 9,
            Equality => 8,
            BitAnd => 7,
            BitXor => 6,
            BitOr => 5,
            LogAnd => 4,
            LogOr => 3,
        }
    }
}

impl From<BinaryOp> for BinaryPrecedence {
    fn from(op: BinaryOp) -> Self {
        use BinaryOp::*;
        match op {
            Mul | Div | Mod => BinaryPrecedence::Mul,
            Add | Sub => BinaryPrecedence::Add,
            Shl | Shr => BinaryPrecedence::Shift,
            Compare(cmp) if cmp.is_equality() => BinaryPrecedence::Equality,
            Compare(_) => BinaryPrecedence::Relational,
            BitwiseAnd => BinaryPrecedence::BitAnd,
            Xor => BinaryPrecedence::BitXor,
            BitwiseOr => BinaryPrecedence::BitOr,
            LogicalAnd => BinaryPrecedence::LogAnd,
            LogicalOr => BinaryPrecedence::LogOr,
        }
    }
}

// Each level returns `Ok(None)` when the input does not start with an
// expression of that level, and an error once an operator has been consumed
// without a right operand.
impl<I: Iterator<Item = Lexeme>> Parser<I> {
    #[inline]
    pub fn expr(&mut self) -> CompileResult<Option<Expr>> {
        self.logical_or_expr()
    }

    fn logical_or_expr(&mut self) -> CompileResult<Option<Expr>> {
        self.left_associative(BinaryPrecedence::LogOr, Self::logical_and_expr)
    }

    fn logical_and_expr(&mut self) -> CompileResult<Option<Expr>> {
        self.left_associative(BinaryPrecedence::LogAnd, Self::bitwise_or_expr)
    }

    fn bitwise_or_expr(&mut self) -> CompileResult<Option<Expr>> {
        self.left_associative(BinaryPrecedence::BitOr, Self::bitwise_xor_expr)
    }

    fn bitwise_xor_expr(&mut self) -> CompileResult<Option<Expr>> {
        self.left_associative(BinaryPrecedence::BitXor, Self::bitwise_and_expr)
    }

    fn bitwise_and_expr(&mut self) -> CompileResult<Option<Expr>> {
        self.left_associative(BinaryPrecedence::BitAnd, Self::equality_expr)
    }

    fn equality_expr(&mut self) -> CompileResult<Option<Expr>> {
        self.left_associative(BinaryPrecedence::Equality, Self::relational_expr)
    }

    fn relational_expr(&mut self) -> CompileResult<Option<Expr>> {
        self.left_associative(BinaryPrecedence::Relational, Self::shift_expr)
    }

    fn shift_expr(&mut self) -> CompileResult<Option<Expr>> {
        self.left_associative(BinaryPrecedence::Shift, Self::additive_expr)
    }

    fn additive_expr(&mut self) -> CompileResult<Option<Expr>> {
        self.left_associative(BinaryPrecedence::Add, Self::multiplicative_expr)
    }

    fn multiplicative_expr(&mut self) -> CompileResult<Option<Expr>> {
        self.left_associative(BinaryPrecedence::Mul, Self::cast_expr)
    }

    // level: level op operand | operand
    fn left_associative(
        &mut self,
        level: BinaryPrecedence,
        operand: Operand<I>,
    ) -> CompileResult<Option<Expr>> {
        let mut left = match operand(self)? {
            Some(expr) => expr,
            None => return Ok(None),
        };
        while let Some(op) = self.match_binary_op(level)? {
            let right = match operand(self)? {
                Some(expr) => expr,
                None => return Err(self.expected_expression()),
            };
            let location = left.location.maybe_merge(right.location);
            left = location.with(ExprType::Binary(op, Box::new(left), Box::new(right)));
        }
        Ok(Some(left))
    }

    fn match_binary_op(&mut self, level: BinaryPrecedence) -> CompileResult<Option<BinaryOp>> {
        let op = match self.peek_token()?.map(BinaryOp::try_from) {
            Some(Ok(op)) if BinaryPrecedence::from(op).prec() == level.prec() => op,
            _ => return Ok(None),
        };
        self.next_token()?;
        Ok(Some(op))
    }

    // cast_expression: '(' type_name ')' cast_expression | unary_expression
    fn cast_expr(&mut self) -> CompileResult<Option<Expr>> {
        let ctype = match self.parenthesized_type()? {
            Some(ctype) => ctype,
            None => return self.unary_expr(),
        };
        let inner = match self.cast_expr()? {
            Some(expr) => expr,
            None => return Err(self.expected_expression()),
        };
        let location = ctype.location.maybe_merge(inner.location);
        Ok(Some(location.with(ExprType::Cast(ctype.data, Box::new(inner)))))
    }

    // ambiguity between '(' expr ')' and '(' type_name ')'
    fn parenthesized_type(&mut self) -> CompileResult<Option<Locatable<TypeName>>> {
        if self.peek_token()? != Some(&TokenKind::LeftParen) {
            return Ok(None);
        }
        match self.peek_next_token()? {
            Some(TokenKind::Keyword(keyword)) if keyword.is_decl_specifier() => {}
            _ => return Ok(None),
        }

        let left_paren = self.expect(TokenKind::LeftParen)?.location;
        let mut ctype = self.type_name()?;
        let right_paren = self.expect(TokenKind::RightParen)?.location;
        ctype.location = left_paren.maybe_merge(right_paren);
        Ok(Some(ctype))
    }

    // type_name: specifier_qualifier_list
    //
    // Only the specifiers are collected here. Whether they make sense
    // together is decided by the analyzer.
    fn type_name(&mut self) -> CompileResult<Locatable<TypeName>> {
        let mut specifiers = Vec::new();
        let mut location = self.last_location;

        while let Some(&TokenKind::Keyword(keyword)) = self.peek_token()? {
            if !keyword.is_decl_specifier() {
                break;
            }
            let token = self.expect(TokenKind::Keyword(keyword))?;
            let spec = match keyword {
                Keyword::BitInt => self.bit_int_width(token)?,
                _ => match UnitSpecifier::try_from(keyword) {
                    Ok(unit) => token.location.with(DeclarationSpecifier::Unit(unit)),
                    Err(unsupported) => {
                        return Err(token.location.with(
                            SemanticError::InvalidSpecifierQualifierList(format!(
                                "'{}' is not supported in a type name",
                                unsupported
                            ))
                            .into(),
                        ))
                    }
                },
            };
            location = location.maybe_merge(spec.location);
            specifiers.push(spec);
        }

        Ok(location.with(TypeName { specifiers }))
    }

    // _BitInt '(' constant ')'
    fn bit_int_width(&mut self, keyword: Token) -> CompileResult<Locatable<DeclarationSpecifier>> {
        self.expect(TokenKind::LeftParen)?;
        let width = match self.next_token()? {
            Some(Locatable {
                data: TokenKind::Literal(LiteralKind::Number, width),
                ..
            }) => width,
            Some(other) => {
                return Err(other
                    .location
                    .with(SyntaxError::ExpectedExpression(other.data).into()))
            }
            None => {
                return Err(self
                    .last_location
                    .with(SyntaxError::UnexpectedEOF("bit width").into()))
            }
        };
        let close = self.expect(TokenKind::RightParen)?;
        let location = keyword.location.maybe_merge(close.location);
        Ok(location.with(DeclarationSpecifier::BitInt(width)))
    }

    // unary_expression: unary_operator cast_expression | primary_expression
    fn unary_expr(&mut self) -> CompileResult<Option<Expr>> {
        let op = match self.peek_token()?.map(UnaryOp::try_from) {
            Some(Ok(op)) => op,
            _ => return self.primary_expr(),
        };
        let start = self.next_token()?.map_or(self.last_location, |t| t.location);
        let inner = match self.cast_expr()? {
            Some(expr) => expr,
            None => return Err(self.expected_expression()),
        };
        let location = start.maybe_merge(inner.location);
        Ok(Some(location.with(ExprType::Unary(op, Box::new(inner)))))
    }

    // primary_expression: CONSTANT | CHAR_CONSTANT | '(' expr ')'
    fn primary_expr(&mut self) -> CompileResult<Option<Expr>> {
        if let Some(paren) = self.match_next(&TokenKind::LeftParen)? {
            let mut inner = match self.expr()? {
                Some(expr) => expr,
                None => return Err(self.expected_expression()),
            };
            let end = self.expect(TokenKind::RightParen)?.location;
            inner.location = paren.location.maybe_merge(end);
            return Ok(Some(inner));
        }

        let (kind, value) = match self.peek_token()? {
            Some(&TokenKind::Literal(kind @ (LiteralKind::Number | LiteralKind::Char(_)), value)) => {
                (kind, value)
            }
            _ => return Ok(None),
        };
        let location = self.next_token()?.map_or(self.last_location, |t| t.location);

        let expr = match kind {
            LiteralKind::Number => number_literal(get_str!(value)).map_err(|err| {
                location.with(SemanticError::InvalidFloatingPointLiteral(err.to_string()))
            })?,
            _ => ExprType::CharConstant(char_literal(value).map_err(|err| location.with(err))?),
        };
        Ok(Some(location.with(expr)))
    }
}
