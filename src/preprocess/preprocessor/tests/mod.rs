use super::*;

use crate::error::DiagnosticKind;
use crate::Source;

use std::io::Write;

use test_log::test;

fn preprocessor(code: &str) -> Preprocessor {
    let mut manager = FileManager::new();
    let id = manager.add_source(
        "test.c",
        Source {
            code: code.into(),
            path: "test.c".into(),
        },
    );
    Preprocessor::new(manager, id)
}

fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| token.data.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// Expand `code`, panicking on a fatal error.
fn expand(code: &str) -> (String, Vec<Diagnostic>) {
    let mut cpp = preprocessor(code);
    let tokens = cpp
        .by_ref()
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|err| panic!("failed to preprocess {:?}: {}", code, err.data));
    (render(&tokens), cpp.take_diagnostics())
}

fn assert_expands_to(code: &str, expected: &str) {
    assert_eq!(expand(code).0, expected);
}

// Expand `code`, which must fail.
fn expand_err(code: &str) -> CppError {
    match preprocessor(code).find_map(Result::err) {
        Some(err) => match err.data {
            crate::error::Error::PreProcessor(err) => err,
            other => panic!("expected a preprocessor error, got {}", other),
        },
        None => panic!("{:?} should have failed", code),
    }
}

fn warnings(diagnostics: &[Diagnostic]) -> Vec<Warning> {
    diagnostics
        .iter()
        .filter_map(|diag| match &diag.kind {
            DiagnosticKind::Warning(warning) => Some(warning.clone()),
            DiagnosticKind::Error(_) => None,
        })
        .collect()
}

#[test]
fn object_like() {
    assert_expands_to("#define A 1\nA\n", "1");
    assert_expands_to("#define EMPTY\nEMPTY 1\n", "1");
}

#[test]
fn chained_object_like() {
    assert_expands_to("#define A B\n#define B 1\nA\n", "1");
}

#[test]
fn self_reference_is_left_alone() {
    let (output, diagnostics) = expand("#define NAME NAME\nNAME\n");
    assert_eq!(output, "NAME");
    assert_eq!(
        warnings(&diagnostics),
        vec![Warning::MacroDefinedInTermsOfItself("NAME".into())]
    );
}

#[test]
fn mutual_recursion_hits_the_limit() {
    let too_deep = |code: &str| match preprocessor(code)
        .expansion_limit(16)
        .find_map(Result::err)
        .map(|err| err.data)
    {
        Some(crate::error::Error::PreProcessor(CppError::MacroExpansionTooDeep(_, limit))) => {
            limit
        }
        other => panic!("{:?} should be too deep, got {:?}", code, other),
    };
    // each expansion ends in the other one
    assert_eq!(too_deep("#define A B\n#define B A\nA\n"), 16);
    // each expansion is nested inside the other one
    assert_eq!(too_deep("#define A B + 1\n#define B A + 1\nA\n"), 16);
    assert_eq!(too_deep("#define F() G()\n#define G() F()\nF()\n"), 16);
}

// A macro that ends in another one is finished before the next one starts.
fn tail_chain(links: usize, function_like: bool) -> String {
    let mut code = String::new();
    let call = if function_like { "()" } else { "" };
    for i in 0..links {
        code.push_str(&format!("#define A{}{} A{}{}\n", i, call, i + 1, call));
    }
    code.push_str(&format!("#define A{}{} 7\nA0{}\n", links, call, call));
    code
}

#[test]
fn tail_chains_are_not_nested() {
    for function_like in [false, true] {
        let code = tail_chain(20, function_like);
        let tokens = preprocessor(&code)
            .expansion_limit(8)
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or_else(|err| panic!("{} failed: {}", code, err.data));
        assert_eq!(render(&tokens), "7");
    }
    assert_expands_to(&tail_chain(300, false), "7");
}

#[test]
fn nesting_past_the_limit() {
    let code = "#define A0 (A1)\n#define A1 (A2)\n#define A2 (A3)\n#define A3 1\nA0\n";
    let tokens = preprocessor(code)
        .expansion_limit(3)
        .collect::<Result<Vec<_>, _>>()
        .map(|tokens| render(&tokens))
        .map_err(|err| err.data);
    assert_eq!(
        tokens,
        Err(crate::error::Error::from(CppError::MacroExpansionTooDeep(
            "A3".into(),
            3
        )))
    );
    assert_expands_to(code, "( ( ( 1 ) ) )");
}

#[test]
fn comments_end_the_replacement_list() {
    assert_expands_to("#define NAME 2 // comment\nNAME * 3\n", "2 * 3");
    assert_expands_to("#define NAME 2 /* comment */\nNAME * 3\n", "2 * 3");
}

#[test]
fn keywords_are_recognised_after_expansion() {
    let tokens: Vec<_> = preprocessor("#define T int\nT x\n")
        .map(|token| token.map(|t| t.data))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        tokens,
        vec![
            TokenKind::Keyword(Keyword::Int),
            TokenKind::Identifier("x".into()),
        ]
    );
}

#[test]
fn function_like() {
    assert_expands_to("#define SQ(x) x * x\nSQ(3)\n", "3 * 3");
    assert_expands_to("#define ADD(a, b) a + b\nADD(1, 2)\n", "1 + 2");
    assert_expands_to("#define ZERO() 0\nZERO()\n", "0");
}

#[test]
fn function_like_without_parens_is_an_identifier() {
    assert_expands_to("#define F(x) x\nF + 1\n", "F + 1");
}

#[test]
fn nested_parens_stay_in_one_argument() {
    assert_expands_to("#define F(x) [x]\nF((1, 2))\n", "[ ( 1 , 2 ) ]");
}

#[test]
fn comma_from_a_macro_is_not_a_separator() {
    assert_expands_to(
        "#define COMMA ,\n#define FN_MACRO(x) [x]\nFN_MACRO(90 COMMA 1)\n",
        "[ 90 , 1 ]",
    );
}

#[test]
fn parameters_do_not_leak_into_other_macros() {
    assert_expands_to("#define M1 a\n#define M2(a) M1\nM2(5)\n", "a");
}

#[test]
fn arguments_are_expanded() {
    assert_expands_to("#define ONE 1\n#define ID(x) x\nID(ONE)\n", "1");
}

#[test]
fn nested_calls_forward_enclosing_arguments() {
    assert_expands_to(
        "#define ADD(a, b) a + b\n\
         #define MULT(a, b) a * b\n\
         #define COMBINED(a, b, c) ADD(a, MULT(b, c))\n\
         COMBINED(1, 2, 3)\n",
        "1 + 2 * 3",
    );
}

// Arguments are read from the enclosing expansion, so a call nested in
// another call's arguments counts as part of its own expansion.
#[test]
fn nested_call_of_the_same_macro_is_left_alone() {
    let (output, diagnostics) = expand("#define ADD(a, b) a + b\nADD(ADD(1, 2), 3)\n");
    assert_eq!(output, "ADD ( 1 , 2 ) + 3");
    assert_eq!(
        warnings(&diagnostics),
        vec![Warning::MacroDefinedInTermsOfItself("ADD".into())]
    );
}

#[test]
fn variadic_arguments() {
    assert_expands_to(
        "#define OTHER_VA(...) someFn(__VA_ARGS__)\n\
         #define VA(a, ...) {a, OTHER_VA(17, __VA_ARGS__), __VA_ARGS__}\n\
         VA(9, 1)\n",
        "{ 9 , someFn ( 17 , 1 ) , 1 }",
    );
    assert_expands_to("#define V(...) f(__VA_ARGS__)\nV(1, 2, 3)\n", "f ( 1 , 2 , 3 )");
}

#[test]
fn va_args_is_unbound_outside_expansions() {
    assert_expands_to(
        "#define V(...) __VA_ARGS__\nV(1)\n__VA_ARGS__\n",
        "1 __VA_ARGS__",
    );
}

#[test]
fn wrong_argument_count() {
    assert_eq!(
        expand_err("#define F(a, b) a\nF(1)\n"),
        CppError::UnexpectedMacroInvocationArgumentCount {
            name: "F".into(),
            expected: 2,
            variadic: false,
            given: 1,
        }
    );
    assert_eq!(
        expand_err("#define F(a) a\nF(1, 2)\n"),
        CppError::UnexpectedMacroInvocationArgumentCount {
            name: "F".into(),
            expected: 1,
            variadic: false,
            given: 2,
        }
    );
    assert_eq!(
        expand_err("#define V(a, b, ...) a\nV(1)\n"),
        CppError::UnexpectedMacroInvocationArgumentCount {
            name: "V".into(),
            expected: 2,
            variadic: true,
            given: 1,
        }
    );
}

#[test]
fn unterminated_invocation() {
    assert_eq!(
        expand_err("#define F(x) x\nF(1\n2)\n"),
        CppError::UnterminatedMacroInvocation("F".into())
    );
    assert_eq!(
        expand_err("#define F(x) x\nF(1"),
        CppError::UnterminatedMacroInvocation("F".into())
    );
}

#[test]
fn stringize() {
    assert_expands_to("#define S(x) #x\nS(a+ b \"q\")\n", r#""a+ b \"q\"""#);
    assert_expands_to("#define S(...) #__VA_ARGS__\nS(a, b)\n", r#""a, b""#);
}

#[test]
fn stringize_needs_a_parameter() {
    assert_eq!(
        expand_err("#define S(x) #y\n"),
        CppError::HashNotFollowedByParameter
    );
}

#[test]
fn malformed_definitions() {
    assert_eq!(
        expand_err("#define F(a, a) a\n"),
        CppError::DuplicateMacroParameter("a".into())
    );
    assert_eq!(
        expand_err("#define F(..., a) a\n"),
        CppError::MacroEllipsisNotLast
    );
    assert_eq!(
        expand_err("#define F(a\n"),
        CppError::UnterminatedMacroParameterList
    );
    assert_eq!(
        expand_err("#define F(1) a\n"),
        CppError::IllegalMacroParameterToken(TokenKind::Literal(
            LiteralKind::Number,
            "1".into()
        ))
    );
    assert_eq!(expand_err("#define\n"), CppError::MacroExpectedIdentifier(None));
    assert_eq!(
        expand_err("#define __VA_ARGS__ 1\n"),
        CppError::MacroExpectedIdentifier(Some(TokenKind::Identifier("__VA_ARGS__".into())))
    );
}

#[test]
fn missing_space_after_name() {
    let (output, diagnostics) = expand("#define A+1\nA\n");
    assert_eq!(output, "+ 1");
    assert_eq!(
        warnings(&diagnostics),
        vec![Warning::NoSpaceAfterMacroIdentifier]
    );
}

#[test]
fn redefinition() {
    // only a different definition is an error; repeating one is accepted
    assert_expands_to("#define A 1\n#define A 1\nA\n", "1");
    assert_expands_to("#define F(a) a\n#define F(a) a\nF(2)\n", "2");
    assert_eq!(
        expand_err("#define A 1\n#define A 2\n"),
        CppError::IllegalMacroRedefinition("A".into())
    );
    assert_eq!(
        expand_err("#define F(a, b) a\n#define F(b, a) a\n"),
        CppError::IllegalMacroRedefinition("F".into())
    );
}

#[test]
fn undef() {
    assert_expands_to("#define A 1\n#undef A\nA\n", "A");
    assert_expands_to("#undef NEVER_DEFINED\n1\n", "1");
}

#[test]
fn directives() {
    assert_expands_to("#\n1\n", "1");
    assert_eq!(
        expand_err("#foo\n"),
        CppError::InvalidDirective(TokenKind::Identifier("foo".into()))
    );
    // only a `#` at the start of a line begins a directive
    assert_expands_to("1 # 2\n", "1 # 2");
}

#[test]
fn unsupported_directives_are_skipped() {
    let (output, diagnostics) = expand("#ifdef X\n1\n#endif\n");
    assert_eq!(output, "1");
    assert_eq!(
        warnings(&diagnostics),
        vec![
            Warning::UnsupportedDirective("ifdef".into()),
            Warning::UnsupportedDirective("endif".into()),
        ]
    );
}

#[test]
fn include() {
    let dir = std::env::temp_dir().join(format!("ccfront-include-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let mut header = std::fs::File::create(dir.join("answer.h")).unwrap();
    writeln!(header, "#define ANSWER 42").unwrap();

    let mut manager = FileManager::new();
    let id = manager.add_source(
        "main.c",
        Source {
            code: "#include \"answer.h\"\nANSWER\n".into(),
            path: dir.join("main.c"),
        },
    );
    let tokens = Preprocessor::new(manager, id)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(render(&tokens), "42");

    assert_eq!(
        expand_err("#include \"does-not-exist.h\"\n"),
        CppError::IncludeDirectiveFileOpenFailed(IncludeError::FileNotFound(
            "does-not-exist.h".into()
        ))
    );
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn until_leaves_the_matching_token() {
    let mut cpp = preprocessor("#define END ;\n1 + 2 END 3\n");
    let before = cpp
        .until(|kind| *kind == TokenKind::Semicolon)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(render(&before), "1 + 2");
    let rest = cpp.collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(render(&rest), "; 3");
}

#[test]
fn fatal_errors_end_the_stream() {
    let mut cpp = preprocessor("#foo\n1\n");
    assert!(matches!(cpp.next(), Some(Err(_))));
    assert!(cpp.next().is_none());
}

#[test]
fn pretty_printed_output() {
    let tokens = preprocessor("#define SQ(x) ((x)*(x))\nint y = SQ(2);\n")
        .emit_newlines(true)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let printed = pretty_print(tokens).to_string();
    insta::assert_display_snapshot!(printed.trim_end(), @"int y=((2)*(2));");
}
