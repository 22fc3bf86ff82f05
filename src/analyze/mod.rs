mod error;
#[cfg(test)]
mod tests;

pub use error::{SemanticError, Side};

use std::collections::VecDeque;

use counter::Counter;

use crate::arch::BITINT_MAXWIDTH;
use crate::data::{
    FloatingType, IntegerType, LiteralValue, Qualifiers, Radix, Signedness, StandardInteger,
    UnaryOp, ValueType,
};
use crate::error::{CompileResult, Error, ErrorHandler, Warning};
use crate::get_str;
use crate::hir;
use crate::location::{Locatable, Location};
use crate::parse::ast::{self, DeclarationSpecifier, FloatRadix, TypeName, UnitSpecifier};
use crate::parse::{Lexeme, Parser};
use crate::InternedStr;

/// The driver for `PureAnalyzer`.
///
/// This implements `Iterator` and ensures that expressions and errors are returned in the correct order:
/// errors recorded while checking an expression come out just before the expression itself.
pub struct Analyzer<T: Iterator<Item = Lexeme>> {
    expressions: Parser<T>,
    pub inner: PureAnalyzer,
    pending: Option<hir::Expr>,
    finished: bool,
}

/// A `PureAnalyzer` turns AST expressions into typed HIR expressions.
///
/// Type deduction (`deduce`) fails fast: a bad constant or type name is returned as `Err`.
/// Operand checking (`check`) only records errors, so every bad operand gets reported.
/// Use this if you need to analyze a specific AST expression without parsing a whole program.
#[derive(Debug, Default)]
pub struct PureAnalyzer {
    /// Internal API which makes it easier to return errors lazily
    error_handler: ErrorHandler,
}

impl<T: Iterator<Item = Lexeme>> Analyzer<T> {
    pub fn new(parser: Parser<T>) -> Self {
        Self {
            expressions: parser,
            inner: PureAnalyzer::new(),
            pending: None,
            finished: false,
        }
    }
}

impl<T: Iterator<Item = Lexeme>> Iterator for Analyzer<T> {
    type Item = CompileResult<hir::Expr>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Instead of returning `SemanticResult`, `check` puts all errors into `error_handler`.
            // NOTE: this returns errors for an expression before the expression itself
            if let Some(err) = self.inner.error_handler.pop_error() {
                return Some(Err(err));
            } else if let Some(expr) = self.pending.take() {
                log::debug!("hir: {}: {}", expr, expr.ctype);
                return Some(Ok(expr));
            } else if self.finished {
                return None;
            }

            let next = match self.expressions.next() {
                Some(Ok(expr)) => expr,
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(err));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            };
            match self.inner.analyze(next) {
                Ok(expr) => self.pending = Some(expr),
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl PureAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return all warnings seen so far.
    ///
    /// These warnings are consumed and will not be returned if you call
    /// `warnings()` again.
    pub fn warnings(&mut self) -> VecDeque<Locatable<Warning>> {
        self.error_handler.take_warnings()
    }

    /// Return the operand errors recorded so far, for callers that bypass `Analyzer`.
    pub fn errors(&mut self) -> VecDeque<Locatable<Error>> {
        self.error_handler.take_errors()
    }

    /// Deduce the type of every node, then check every operator's operands.
    pub fn analyze(&mut self, expr: ast::Expr) -> CompileResult<hir::Expr> {
        let expr = self.deduce(expr)?;
        self.check(&expr);
        Ok(expr)
    }

    /// Build the typed tree bottom-up. Each node's type is computed once, here.
    pub fn deduce(&mut self, expr: ast::Expr) -> CompileResult<hir::Expr> {
        use ast::ExprType::*;

        let location = expr.location;
        let (expr, ctype) = match expr.data {
            IntegerConstant {
                value,
                suffix,
                radix,
            } => {
                let (value, ctype) =
                    integer_constant(value, suffix, radix).map_err(|err| location.with(err))?;
                (hir::ExprType::Literal(LiteralValue::Integer(value)), ctype.into())
            }
            FloatingConstant {
                significand,
                fraction,
                exponent,
                suffix,
                radix,
            } => {
                let (value, ctype) =
                    floating_constant(significand, fraction, exponent, suffix, radix)
                        .map_err(|err| location.with(err))?;
                (hir::ExprType::Literal(LiteralValue::Float(value)), ctype.into())
            }
            // 6.4.4.4p10: an integer character constant has type int
            CharConstant(c) => (hir::ExprType::Literal(LiteralValue::Char(c)), ValueType::INT),
            Unary(op, inner) => {
                let inner = self.deduce(*inner)?;
                let ctype = match op {
                    UnaryOp::LogicalNot => ValueType::INT,
                    UnaryOp::Plus | UnaryOp::Negate | UnaryOp::BitwiseNot => inner.ctype.promote(),
                };
                (hir::ExprType::Unary(op, Box::new(inner)), ctype)
            }
            Binary(op, left, right) => {
                let left = self.deduce(*left)?;
                let right = self.deduce(*right)?;
                let ctype = left.ctype.usual_arithmetic_conversions(right.ctype);
                (hir::ExprType::Binary(op, Box::new(left), Box::new(right)), ctype)
            }
            Cast(ctype, inner) => {
                let ctype = self.type_name(ctype, location)?;
                let inner = self.deduce(*inner)?;
                (hir::ExprType::Cast(Box::new(inner)), ctype)
            }
        };
        Ok(hir::Expr::new(expr, ctype, location))
    }

    /// Record an error for every operand whose type the operator does not accept.
    ///
    /// Both operands of a binary operator are always looked at,
    /// so `1.0 % 2.0` is two errors.
    pub fn check(&mut self, expr: &hir::Expr) {
        match &expr.expr {
            hir::ExprType::Literal(_) => {}
            hir::ExprType::Cast(inner) => self.check(inner),
            hir::ExprType::Unary(op, inner) => {
                self.check(inner);
                let expected = op.operand_class();
                if !inner.ctype.satisfies(expected) {
                    let err = SemanticError::UnaryOperandWrongType {
                        op: *op,
                        expected,
                        operand: inner.located_type(),
                    };
                    self.error_handler.error(err, inner.location);
                }
            }
            hir::ExprType::Binary(op, left, right) => {
                self.check(left);
                self.check(right);
                let expected = op.operand_class();
                for (side, operand) in [(Side::Left, left), (Side::Right, right)] {
                    if operand.ctype.satisfies(expected) {
                        continue;
                    }
                    let err = SemanticError::BinaryOperandsWrongTypes {
                        op: *op,
                        expected,
                        lhs: left.located_type(),
                        rhs: right.located_type(),
                        side,
                    };
                    self.error_handler.error(err, operand.location);
                }
            }
        }
    }

    // 6.7.7 Type names, restricted to arithmetic types
    fn type_name(&mut self, ctype: TypeName, location: Location) -> CompileResult<ValueType> {
        use UnitSpecifier::*;

        let spelling = ctype.to_string();
        let invalid = |reason: String| -> Locatable<Error> {
            location.with(SemanticError::InvalidSpecifierQualifierList(reason).into())
        };

        let mut counter = Counter::<UnitSpecifier, usize>::new();
        let mut bit_width = None;
        for spec in ctype.specifiers {
            match spec.data {
                DeclarationSpecifier::Unit(unit) => counter.update(std::iter::once(unit)),
                DeclarationSpecifier::BitInt(_) if bit_width.is_some() => {
                    return Err(invalid("duplicate '_BitInt'".into()));
                }
                DeclarationSpecifier::BitInt(width) => bit_width = Some(spec.location.with(width)),
            }
        }

        let mut qualifiers = Qualifiers::empty();
        for (&spec, &count) in counter.iter() {
            if spec.is_storage_class() {
                return Err(invalid(format!("'{}' cannot appear in a type name", spec)));
            }
            if matches!(spec, Void | Complex | Imaginary) {
                return Err(invalid(format!("'{}' is not supported in casts", spec)));
            }
            if spec.is_qualifier() {
                qualifiers |= match spec {
                    Const => Qualifiers::CONST,
                    Volatile => Qualifiers::VOLATILE,
                    Restrict => Qualifiers::RESTRICT,
                    _ => Qualifiers::ATOMIC,
                };
                if count > 1 {
                    self.error_handler
                        .warn(Warning::DuplicateSpecifier(spec, count), location);
                }
            } else if count > 1 && !(spec == Long && count == 2) {
                return Err(invalid(format!("'{}' is repeated in '{}'", spec, spelling)));
            }
        }
        if !qualifiers.is_empty() {
            self.error_handler
                .warn(Warning::IgnoredQualifier(qualifiers), location);
        }

        let has = |spec: UnitSpecifier| counter.get(&spec).is_some();
        let signedness = match (has(Signed), has(Unsigned)) {
            (true, true) => {
                return Err(invalid(
                    "types cannot be both signed and unsigned".into(),
                ))
            }
            (true, false) => Signedness::Signed,
            (false, true) => Signedness::Unsigned,
            (false, false) => Signedness::Unspecified,
        };
        let sign_given = signedness != Signedness::Unspecified;
        let signed_by_default = if sign_given {
            signedness
        } else {
            Signedness::Signed
        };
        let longs = counter.get(&Long).copied().unwrap_or(0);
        let base: Vec<UnitSpecifier> = [Bool, Char, Short, Float, Double]
            .into_iter()
            .filter(|&spec| has(spec))
            .collect();

        if let Some(width) = bit_width {
            if !base.is_empty() || longs > 0 || has(Int) {
                return Err(invalid(format!("cannot combine specifiers in '{}'", spelling)));
            }
            let width = bit_int_width(width, signed_by_default)?;
            return Ok(IntegerType::bit_precise(width, signed_by_default).into());
        }

        let int = |kind: StandardInteger, signedness: Signedness| -> CompileResult<ValueType> {
            Ok(IntegerType::standard(kind, signedness).into())
        };
        let plain = !has(Int) && !sign_given;
        match (base.as_slice(), longs) {
            ([], 0) if has(Int) || sign_given => int(StandardInteger::Int, signed_by_default),
            ([], 1) => int(StandardInteger::Long, signed_by_default),
            ([], 2) => int(StandardInteger::LongLong, signed_by_default),
            ([Short], 0) => int(StandardInteger::Short, signed_by_default),
            // plain `char` keeps its own identity
            ([Char], 0) if !has(Int) => int(StandardInteger::Char, signedness),
            ([Bool], 0) if plain => int(StandardInteger::Bool, Signedness::Unspecified),
            ([Float], 0) if plain => Ok(FloatingType::Float.into()),
            ([Double], 0) if plain => Ok(FloatingType::Double.into()),
            ([Double], 1) if plain => Ok(FloatingType::LongDouble.into()),
            ([], 0) => Err(invalid("missing type specifier".into())),
            _ => Err(invalid(format!("cannot combine specifiers in '{}'", spelling))),
        }
    }
}

// 6.7.2.1: a signed `_BitInt` needs a sign bit and at least one value bit
fn bit_int_width(
    width: Locatable<InternedStr>,
    signedness: Signedness,
) -> Result<u32, Locatable<SemanticError>> {
    let location = width.location;
    let invalid = |reason: String| location.with(SemanticError::InvalidSpecifierQualifierList(reason));

    let value = match crate::parse::literal::number_literal(get_str!(width.data)) {
        Ok(ast::ExprType::IntegerConstant {
            value,
            suffix,
            radix,
        }) if suffix.is_empty() => integer_constant(value, suffix, radix)
            .map_err(|err| location.with(err))?
            .0,
        _ => {
            return Err(invalid(format!(
                "'_BitInt' width '{}' is not an integer constant",
                width.data
            )))
        }
    };

    let minimum = if signedness == Signedness::Unsigned {
        1
    } else {
        2
    };
    match u32::try_from(value) {
        Ok(bits) if (minimum..=BITINT_MAXWIDTH).contains(&bits) => Ok(bits),
        _ => Err(invalid(format!(
            "{} '_BitInt' width must be between {} and {}, not {}",
            if minimum == 1 { "unsigned" } else { "signed" },
            minimum,
            BITINT_MAXWIDTH,
            value
        ))),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LengthSuffix {
    None,
    Long,
    LongLong,
    BitPrecise,
}

// `u` may come before or after the length; the case of `ll` must match
fn integer_suffix(suffix: &str) -> Option<(bool, LengthSuffix)> {
    fn length(suffix: &str) -> Option<LengthSuffix> {
        Some(match suffix {
            "" => LengthSuffix::None,
            "l" | "L" => LengthSuffix::Long,
            "ll" | "LL" => LengthSuffix::LongLong,
            "wb" | "WB" => LengthSuffix::BitPrecise,
            _ => return None,
        })
    }

    if let Some(rest) = suffix.strip_prefix(['u', 'U']) {
        Some((true, length(rest)?))
    } else if let Some(rest) = suffix.strip_suffix(['u', 'U']) {
        Some((true, length(rest)?))
    } else {
        Some((false, length(suffix)?))
    }
}

/// 6.4.4.1p5: the type of an integer constant is the first candidate that can represent it.
///
/// Decimal constants without `u` only ever get signed types.
/// Other radixes also try the unsigned type of each rank.
fn integer_constant(
    digits: InternedStr,
    suffix: InternedStr,
    radix: Radix,
) -> Result<(u128, IntegerType), SemanticError> {
    use std::num::IntErrorKind;
    use StandardInteger::*;

    let (unsigned, length) =
        integer_suffix(get_str!(suffix)).ok_or(SemanticError::UnrecognizedIntegerSuffix(suffix))?;

    let spelling = get_str!(digits);
    let value = u128::from_str_radix(spelling, radix.as_u32()).map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => SemanticError::NoCompatibleIntegerType(digits),
        _ => SemanticError::InvalidIntegerLiteral { digits, radix },
    })?;

    let candidates: &[StandardInteger] = match length {
        LengthSuffix::None => &[Int, Long, LongLong],
        LengthSuffix::Long => &[Long, LongLong],
        LengthSuffix::LongLong => &[LongLong],
        LengthSuffix::BitPrecise => {
            let needed = u128::BITS - value.leading_zeros();
            let (width, signedness) = if unsigned {
                (needed.max(1), Signedness::Unsigned)
            } else {
                ((needed + 1).max(2), Signedness::Signed)
            };
            if width > BITINT_MAXWIDTH {
                return Err(SemanticError::NoCompatibleIntegerType(digits));
            }
            return Ok((value, IntegerType::bit_precise(width, signedness)));
        }
    };

    for &kind in candidates {
        let signed = IntegerType::standard(kind, Signedness::Signed);
        let unsigned_type = IntegerType::standard(kind, Signedness::Unsigned);
        if !unsigned && signed.can_represent(value) {
            return Ok((value, signed));
        }
        if (unsigned || radix != Radix::Decimal) && unsigned_type.can_represent(value) {
            return Ok((value, unsigned_type));
        }
    }
    Err(SemanticError::NoCompatibleIntegerType(digits))
}

/// 6.4.4.2: `f` means float, `l` means long double, no suffix means double.
fn floating_constant(
    significand: InternedStr,
    fraction: InternedStr,
    exponent: InternedStr,
    suffix: InternedStr,
    radix: FloatRadix,
) -> Result<(f64, FloatingType), SemanticError> {
    let ctype = match get_str!(suffix) {
        "" => FloatingType::Double,
        "f" | "F" => FloatingType::Float,
        "l" | "L" => FloatingType::LongDouble,
        _ => return Err(SemanticError::UnrecognizedFloatingSuffix(suffix)),
    };
    let or_zero = |part: InternedStr| {
        if part.is_empty() {
            "0".to_string()
        } else {
            part.resolve_and_clone()
        }
    };

    let value = match radix {
        FloatRadix::Decimal => {
            let text = format!(
                "{}.{}e{}",
                or_zero(significand),
                or_zero(fraction),
                or_zero(exponent)
            );
            text.parse::<f64>()
                .map_err(|err| SemanticError::InvalidFloatingPointLiteral(err.to_string()))?
        }
        FloatRadix::Hexadecimal => {
            let mut text = format!("0x{}", or_zero(significand));
            if !fraction.is_empty() {
                text.push('.');
                text.push_str(get_str!(fraction));
            }
            text.push('p');
            text.push_str(&or_zero(exponent));
            let literal = text.parse::<hexponent::FloatLiteral>().map_err(|_| {
                SemanticError::InvalidFloatingPointLiteral(format!(
                    "'{}' is not a hexadecimal floating constant",
                    text
                ))
            })?;
            literal.convert::<f64>().inner()
        }
    };
    Ok((value, ctype))
}
