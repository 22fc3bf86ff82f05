use super::*;
use crate::error::Error;
use crate::preprocess::{FileManager, Preprocessor};
use crate::Source;

use test_log::test;

struct Analyzed {
    items: Vec<CompileResult<hir::Expr>>,
    warnings: Vec<Warning>,
}

fn analyze(code: &str) -> Analyzed {
    let mut manager = FileManager::new();
    let id = manager.add_source(
        "<test>",
        Source {
            code: code.into(),
            path: "<test>".into(),
        },
    );
    let mut analyzer = Analyzer::new(Parser::new(Preprocessor::new(manager, id)));
    let items = analyzer.by_ref().collect();
    let warnings = analyzer
        .inner
        .warnings()
        .into_iter()
        .map(|w| w.data)
        .collect();
    Analyzed { items, warnings }
}

fn analyze_one(code: &str) -> hir::Expr {
    let mut analyzed = analyze(code).items;
    assert_eq!(analyzed.len(), 1, "expected exactly one result for {:?}", code);
    match analyzed.remove(0) {
        Ok(expr) => expr,
        Err(err) => panic!("{:?} failed: {}", code, err.data),
    }
}

fn ctype(code: &str) -> String {
    analyze_one(&format!("{};", code)).ctype.to_string()
}

fn semantic_err(code: &str) -> SemanticError {
    let analyzed = analyze(&format!("{};", code)).items;
    match analyzed.into_iter().find_map(Result::err) {
        Some(Locatable {
            data: Error::Semantic(err),
            ..
        }) => err,
        other => panic!("{:?} should be a semantic error, got {:?}", code, other),
    }
}

#[test]
fn integer_constants() {
    assert_eq!(ctype("1"), "int");
    assert_eq!(ctype("2147483647"), "int");
    assert_eq!(ctype("2147483648"), "long");
    assert_eq!(ctype("0x7fffffff"), "int");
    assert_eq!(ctype("0x80000000"), "unsigned int");
    assert_eq!(ctype("0xFFFFFFFFFFFFFFFF"), "unsigned long");
    assert_eq!(ctype("0b1111"), "int");
    assert_eq!(ctype("017"), "int");
}

#[test]
fn integer_suffixes() {
    assert_eq!(ctype("1u"), "unsigned int");
    assert_eq!(ctype("1U"), "unsigned int");
    assert_eq!(ctype("1l"), "long");
    assert_eq!(ctype("1ul"), "unsigned long");
    assert_eq!(ctype("1LU"), "unsigned long");
    assert_eq!(ctype("1ll"), "long long");
    assert_eq!(ctype("1ULL"), "unsigned long long");
    assert_eq!(ctype("4294967296u"), "unsigned long");
}

#[test]
fn bit_precise_constants() {
    assert_eq!(ctype("5wb"), "_BitInt(4)");
    assert_eq!(ctype("0wb"), "_BitInt(2)");
    assert_eq!(ctype("1uwb"), "unsigned _BitInt(1)");
    assert_eq!(ctype("255WBU"), "unsigned _BitInt(8)");
}

#[test]
fn bad_integer_constants() {
    assert_eq!(
        semantic_err("1xyz"),
        SemanticError::UnrecognizedIntegerSuffix("xyz".into())
    );
    assert_eq!(
        semantic_err("1lL"),
        SemanticError::UnrecognizedIntegerSuffix("lL".into())
    );
    assert_eq!(
        semantic_err("0b102"),
        SemanticError::InvalidIntegerLiteral {
            digits: "102".into(),
            radix: Radix::Binary
        }
    );
    assert_eq!(
        semantic_err("08"),
        SemanticError::InvalidIntegerLiteral {
            digits: "8".into(),
            radix: Radix::Octal
        }
    );
    assert_eq!(
        semantic_err("9223372036854775808"),
        SemanticError::NoCompatibleIntegerType("9223372036854775808".into())
    );
}

#[test]
fn floating_constants() {
    assert_eq!(ctype("1.0"), "double");
    assert_eq!(ctype("1.0f"), "float");
    assert_eq!(ctype("1.0L"), "long double");
    assert_eq!(ctype("1e3"), "double");
    assert_eq!(ctype("0x1p3"), "double");
    assert_eq!(
        semantic_err("1.0q"),
        SemanticError::UnrecognizedFloatingSuffix("q".into())
    );
}

#[test]
fn floating_values() {
    let value = |code: &str| match analyze_one(&format!("{};", code)).expr {
        hir::ExprType::Literal(LiteralValue::Float(f)) => f,
        other => panic!("not a float: {:?}", other),
    };
    assert_eq!(value("1.5"), 1.5);
    assert_eq!(value("2e2"), 200.0);
    assert_eq!(value(".25"), 0.25);
    assert_eq!(value("0x1.8p1"), 3.0);
    assert_eq!(value("0x1p-2"), 0.25);
}

#[test]
fn char_constants() {
    assert_eq!(ctype("'a'"), "int");
    assert_eq!(
        analyze_one("'\\n';").expr,
        hir::ExprType::Literal(LiteralValue::Char(10))
    );
}

#[test]
fn operators() {
    assert_eq!(ctype("1 + 1.0f"), "float");
    assert_eq!(ctype("1.0f * 2.0"), "double");
    assert_eq!(ctype("1u + 1"), "unsigned int");
    assert_eq!(ctype("1l + 1u"), "long");
    assert_eq!(ctype("1ll - 1ul"), "unsigned long long");
    assert_eq!(ctype("(char)1 + (char)1"), "int");
    assert_eq!(ctype("-(short)1"), "int");
    assert_eq!(ctype("~(unsigned char)1"), "int");
    assert_eq!(ctype("!1.0"), "int");
    assert_eq!(ctype("1 < 2u"), "unsigned int");
}

#[test]
fn casts() {
    assert_eq!(ctype("(char)1"), "char");
    assert_eq!(ctype("(signed char)1"), "signed char");
    assert_eq!(ctype("(unsigned char)1"), "unsigned char");
    assert_eq!(ctype("(_Bool)1"), "_Bool");
    assert_eq!(ctype("(short int)1"), "short");
    assert_eq!(ctype("(unsigned)1"), "unsigned int");
    assert_eq!(ctype("(long long unsigned int)1"), "unsigned long long");
    assert_eq!(ctype("(long int long)1"), "long long");
    assert_eq!(ctype("(long double)1"), "long double");
    assert_eq!(ctype("(float)1"), "float");
    assert_eq!(ctype("(_BitInt(12))1"), "_BitInt(12)");
    assert_eq!(ctype("(unsigned _BitInt(1))1"), "unsigned _BitInt(1)");
}

#[test]
fn qualifiers_are_ignored() {
    let analyzed = analyze("(const int)1;");
    assert!(analyzed.items[0].is_ok());
    assert_eq!(
        analyzed.warnings,
        vec![Warning::IgnoredQualifier(Qualifiers::CONST)]
    );

    let analyzed = analyze("(const volatile const long)1;");
    assert_eq!(analyzed.items[0].as_ref().map(|e| e.ctype.to_string()), Ok("long".into()));
    assert!(analyzed
        .warnings
        .contains(&Warning::DuplicateSpecifier(UnitSpecifier::Const, 2)));
    assert!(analyzed.warnings.contains(&Warning::IgnoredQualifier(
        Qualifiers::CONST | Qualifiers::VOLATILE
    )));
}

#[test]
fn invalid_type_names() {
    for code in [
        "(void)1",
        "(static int)1",
        "(inline int)1",
        "(signed unsigned)1",
        "(long long long)1",
        "(int int)1",
        "(float double)1",
        "(unsigned float)1",
        "(short char)1",
        "(_Complex double)1",
        "(const)1",
        "(_BitInt(1))1",
        "(unsigned _BitInt(0))1",
        "(long _BitInt(8))1",
    ] {
        assert!(
            matches!(
                semantic_err(code),
                SemanticError::InvalidSpecifierQualifierList(_)
            ),
            "{} should be rejected",
            code
        );
    }
}

#[test]
fn operands_are_checked_on_both_sides() {
    let items = analyze("1.0 % 2.0;").items;
    assert_eq!(items.len(), 3);
    let sides: Vec<_> = items[..2]
        .iter()
        .map(|item| match item {
            Err(Locatable {
                data: Error::Semantic(SemanticError::BinaryOperandsWrongTypes { side, .. }),
                ..
            }) => *side,
            other => panic!("expected an operand error, got {:?}", other),
        })
        .collect();
    assert_eq!(sides, vec![Side::Left, Side::Right]);
    assert!(items[2].is_ok());
}

#[test]
fn only_the_bad_operand_is_reported() {
    let items = analyze("1.5 << 2;").items;
    assert_eq!(items.len(), 2);
    let err = items[0].as_ref().unwrap_err();
    assert_eq!(err.data.to_string(), "invalid program: left operand of '<<' must have integer type (have 'double')");

    let items = analyze("1 & 2.0f;").items;
    assert_eq!(items.len(), 2);
    assert!(matches!(
        &items[0],
        Err(Locatable {
            data: Error::Semantic(SemanticError::BinaryOperandsWrongTypes {
                side: Side::Right,
                ..
            }),
            ..
        })
    ));
}

#[test]
fn error_points_at_the_operand() {
    let items = analyze("1 | 2.5;").items;
    let err = items[0].as_ref().unwrap_err();
    assert_eq!((err.location.span.start, err.location.span.end), (4, 7));
}

#[test]
fn nested_operands_are_checked() {
    let items = analyze("~1.0 + (2.0 % 3);").items;
    let errors = items.iter().filter(|item| item.is_err()).count();
    assert_eq!(errors, 2);
    assert!(matches!(
        &items[0],
        Err(Locatable {
            data: Error::Semantic(SemanticError::UnaryOperandWrongType { .. }),
            ..
        })
    ));
    assert!(items.last().unwrap().is_ok());
}

#[test]
fn valid_operators_are_quiet() {
    for code in ["1.0 && 2;", "1.0 < 2;", "!2.5;", "-1.0 * +2.0;", "1.0 == 2;"] {
        assert!(analyze(code).items.iter().all(Result::is_ok), "{}", code);
    }
}

#[test]
fn fatal_errors_end_the_stream() {
    let items = analyze("1; 1xyz; 2;").items;
    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(items[1].is_err());
}

#[test]
fn macros_feed_the_analyzer() {
    let code = "#define HALF(x) ((x) / 2.0f)\n#define ONE 1u\nHALF(ONE);\n";
    let expr = analyze_one(code);
    insta::assert_snapshot!(format!("{}: {}", expr, expr.ctype), @"(1) / (2.0): float");
}

#[test]
fn typed_tree() {
    let expr = analyze_one("(1 + 2.5f) * (unsigned char)'a';");
    insta::assert_snapshot!(format!("{}: {}", expr, expr.ctype), @"((1) + (2.5)) * ((unsigned char)('a')): float");
}
