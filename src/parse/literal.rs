use crate::data::Radix;
use crate::parse::ast::{ExprType, FloatRadix};
use crate::parse::SyntaxError;
use crate::InternedStr;

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum NumericLiteralError {
    #[error("hexadecimal floating point literals require an exponent")]
    MissingHexExponent,

    #[error("exponent is missing digits")]
    EmptyExponent,

    #[error("binary literals cannot have a fraction")]
    BinaryFraction,
}

/// Split a numeric constant into its parts.
///
/// Only the shape is checked here. Whether the digits are valid for the
/// radix and whether the suffix means anything is decided during analysis.
pub fn number_literal(value: &str) -> Result<ExprType, NumericLiteralError> {
    // So, integer literals in C are actually pretty complicated, given
    // hexadecimal, binary, integral, and octal. We do parsing in a linear
    // scan fashion here.

    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    enum Mode {
        Hex,
        Bin,
        Oct,
        Dec,
    }

    impl Mode {
        fn chars_to_skip(self) -> usize {
            match self {
                Mode::Hex | Mode::Bin => 2,
                Mode::Oct => 1,
                Mode::Dec => 0,
            }
        }

        fn is_digit(self, c: char) -> bool {
            match self {
                Mode::Hex => c.is_ascii_hexdigit(),
                // invalid digits are reported later, along with the radix
                Mode::Bin | Mode::Oct | Mode::Dec => c.is_ascii_digit(),
            }
        }

        fn is_exponent(self, rest: &str) -> bool {
            match self {
                Mode::Hex => rest.starts_with(['p', 'P']),
                Mode::Oct | Mode::Dec => rest.starts_with(['e', 'E']),
                Mode::Bin => false,
            }
        }

        fn to_integer_radix(self) -> Radix {
            match self {
                Mode::Hex => Radix::Hexadecimal,
                Mode::Bin => Radix::Binary,
                Mode::Oct => Radix::Octal,
                Mode::Dec => Radix::Decimal,
            }
        }

        fn to_float_radix(self) -> FloatRadix {
            match self {
                Mode::Hex => FloatRadix::Hexadecimal,
                Mode::Bin | Mode::Oct | Mode::Dec => FloatRadix::Decimal,
            }
        }
    }

    let integer_constant = |mode: Mode, value: &str, suffix: &str| ExprType::IntegerConstant {
        value: value.into(),
        suffix: suffix.into(),
        radix: mode.to_integer_radix(),
    };
    let float_constant =
        |mode: Mode, significand: &str, fraction: &str, exponent: &str, suffix: &str| {
            ExprType::FloatingConstant {
                significand: significand.into(),
                fraction: fraction.into(),
                exponent: exponent.into(),
                suffix: suffix.into(),
                radix: mode.to_float_radix(),
            }
        };

    let mut mode = if value.starts_with("0x") || value.starts_with("0X") {
        Mode::Hex
    } else if value.starts_with("0b") || value.starts_with("0B") {
        Mode::Bin
    } else if value.starts_with('0') {
        Mode::Oct
    } else {
        Mode::Dec
    };

    // This (along with `mode` above), may get changed depending on
    // what the rest of the scan reveals. For instance, a lone `0` is `0`,
    // not an empty octal constant, while `0.7` or `0.` are float literals.
    let mut rest = &value[mode.chars_to_skip()..];

    // finds the end of the integer part, or `None` if `rest` is all digits
    let non_integer_start = if mode == Mode::Oct && rest.is_empty() {
        mode = Mode::Dec;
        rest = value;
        None
    } else {
        rest.find(|c: char| !mode.is_digit(c))
    };

    let Some(non_integer_start) = non_integer_start else {
        return Ok(integer_constant(mode, rest, ""));
    };

    let remainder = &rest[non_integer_start..];
    let is_fraction = remainder.starts_with('.');
    if !is_fraction && !mode.is_exponent(remainder) {
        // an integer with a suffix
        return Ok(integer_constant(mode, &rest[..non_integer_start], remainder));
    }
    if mode == Mode::Bin {
        return Err(NumericLiteralError::BinaryFraction);
    }

    // `017.5` is decimal, so the leading zero belongs to the significand
    let integer = if mode == Mode::Oct {
        mode = Mode::Dec;
        &value[..non_integer_start + 1]
    } else {
        &rest[..non_integer_start]
    };

    let mut rest = remainder;
    let fraction = if is_fraction {
        let fraction_part = &rest[1..];
        let end = fraction_part
            .find(|c: char| !mode.is_digit(c))
            .unwrap_or(fraction_part.len());
        rest = &fraction_part[end..];
        &fraction_part[..end]
    } else {
        ""
    };

    let exponent = if mode.is_exponent(rest) {
        let exponent_part = &rest[1..];
        let sign_len = usize::from(exponent_part.starts_with(['+', '-']));
        let end = exponent_part[sign_len..]
            .find(|c: char| !c.is_ascii_digit())
            .map_or(exponent_part.len(), |end| end + sign_len);
        if end == sign_len {
            return Err(NumericLiteralError::EmptyExponent);
        }
        rest = &exponent_part[end..];
        &exponent_part[..end]
    } else {
        if mode == Mode::Hex {
            return Err(NumericLiteralError::MissingHexExponent);
        }
        ""
    };

    Ok(float_constant(mode, integer, fraction, exponent, rest))
}

/// Decode the text between the quotes of a character constant.
///
/// The value is that of the first character; any further characters are
/// ignored, which matches the common reading of multi-character constants.
pub fn char_literal(text: InternedStr) -> Result<u32, SyntaxError> {
    let invalid = |reason: &'static str| SyntaxError::InvalidCharacterConstant(text, reason);

    let spelling = text.resolve_and_clone();
    let mut chars = spelling.chars().peekable();
    let first = chars.next().ok_or_else(|| invalid("empty character constant"))?;
    if first != '\\' {
        return Ok(u32::from(first));
    }

    let escape = chars.next().ok_or_else(|| invalid("incomplete escape sequence"))?;
    let value = match escape {
        'n' => '\n' as u32,
        't' => '\t' as u32,
        'r' => '\r' as u32,
        'a' => 0x07,
        'b' => 0x08,
        'f' => 0x0c,
        'v' => 0x0b,
        '\\' | '\'' | '"' | '?' => escape as u32,
        '0'..='7' => {
            let mut value = escape.to_digit(8).unwrap_or_default();
            for _ in 0..2 {
                match chars.peek().and_then(|c| c.to_digit(8)) {
                    Some(digit) => {
                        value = value * 8 + digit;
                        chars.next();
                    }
                    None => break,
                }
            }
            value
        }
        'x' => {
            let mut value: u32 = 0;
            let mut seen = false;
            while let Some(digit) = chars.peek().and_then(|c| c.to_digit(16)) {
                value = value
                    .checked_mul(16)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or_else(|| invalid("hex escape sequence out of range"))?;
                seen = true;
                chars.next();
            }
            if !seen {
                return Err(invalid("\\x used with no following hex digits"));
            }
            value
        }
        _ => return Err(invalid("unknown escape sequence")),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: &str, suffix: &str, radix: Radix) -> Result<ExprType, NumericLiteralError> {
        Ok(ExprType::IntegerConstant {
            value: value.into(),
            suffix: suffix.into(),
            radix,
        })
    }

    fn float(
        significand: &str,
        fraction: &str,
        exponent: &str,
        suffix: &str,
        radix: FloatRadix,
    ) -> Result<ExprType, NumericLiteralError> {
        Ok(ExprType::FloatingConstant {
            significand: significand.into(),
            fraction: fraction.into(),
            exponent: exponent.into(),
            suffix: suffix.into(),
            radix,
        })
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(number_literal("100"), int("100", "", Radix::Decimal));
        assert_eq!(number_literal("0"), int("0", "", Radix::Decimal));
        assert_eq!(number_literal("01"), int("1", "", Radix::Octal));
        assert_eq!(number_literal("1abcde123"), int("1", "abcde123", Radix::Decimal));
        assert_eq!(
            number_literal("0x1abcde123!"),
            int("1abcde123", "!", Radix::Hexadecimal)
        );
        assert_eq!(number_literal("0b101u"), int("101", "u", Radix::Binary));
        assert_eq!(number_literal("42ull"), int("42", "ull", Radix::Decimal));
    }

    #[test]
    fn test_float_literals() {
        assert_eq!(
            number_literal("1.1"),
            float("1", "1", "", "", FloatRadix::Decimal)
        );
        assert_eq!(
            number_literal("1.1e5"),
            float("1", "1", "5", "", FloatRadix::Decimal)
        );
        assert_eq!(
            number_literal("1.1e5zzz"),
            float("1", "1", "5", "zzz", FloatRadix::Decimal)
        );
        assert_eq!(
            number_literal("0x1.1p5"),
            float("1", "1", "5", "", FloatRadix::Hexadecimal)
        );
        assert_eq!(
            number_literal("1e-3f"),
            float("1", "", "-3", "f", FloatRadix::Decimal)
        );
        assert_eq!(
            number_literal(".5"),
            float("", "5", "", "", FloatRadix::Decimal)
        );
        assert_eq!(
            number_literal("017.5"),
            float("017", "5", "", "", FloatRadix::Decimal)
        );
        assert_eq!(
            number_literal("0x1p+2L"),
            float("1", "", "+2", "L", FloatRadix::Hexadecimal)
        );
    }

    #[test]
    fn test_malformed_literals() {
        assert_eq!(
            number_literal("0x1.5"),
            Err(NumericLiteralError::MissingHexExponent)
        );
        assert_eq!(number_literal("1e"), Err(NumericLiteralError::EmptyExponent));
        assert_eq!(number_literal("1e+"), Err(NumericLiteralError::EmptyExponent));
        assert_eq!(
            number_literal("0b1.0"),
            Err(NumericLiteralError::BinaryFraction)
        );
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(char_literal("a".into()), Ok('a' as u32));
        assert_eq!(char_literal(r"\n".into()), Ok(10));
        assert_eq!(char_literal(r"\0".into()), Ok(0));
        assert_eq!(char_literal(r"\101".into()), Ok(65));
        assert_eq!(char_literal(r"\x41".into()), Ok(65));
        assert_eq!(char_literal(r"\'".into()), Ok('\'' as u32));
        assert_eq!(char_literal("ab".into()), Ok('a' as u32));
        assert!(char_literal(r"\q".into()).is_err());
        assert!(char_literal(r"\x".into()).is_err());
    }
}
