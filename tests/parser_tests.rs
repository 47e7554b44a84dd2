// tests/parser_tests.rs

use cohort_rule::ast::{
    CompareOp, Expr, FunctionCall, Literal, Operand, PathSegment, Position, Token, TokenKind,
    VariableRef,
};
use cohort_rule::parser::MAX_NESTING;
use cohort_rule::{Error, Parser, compile, parse, tokenize};

fn var(path: &str) -> VariableRef {
    VariableRef::from_dotted(path)
}

fn cmp(path: &str, op: CompareOp, lit: Literal) -> Expr {
    Expr::compare(var(path), op, lit)
}

fn eq_int(path: &str, n: i64) -> Expr {
    cmp(path, CompareOp::Equal, Literal::Integer(n))
}

fn parse_err(source: &str) -> cohort_rule::ParseError {
    match compile(source) {
        Err(Error::Parse(e)) => e,
        other => panic!("expected parse error for {:?}, got {:?}", source, other),
    }
}

// ============================================================================
// Simple tests
// ============================================================================

#[test]
fn test_comparison() {
    let expr = compile("{enrollee.subject} = true").unwrap();
    assert_eq!(expr, cmp("enrollee.subject", CompareOp::Equal, Literal::Boolean(true)));
}

#[test]
fn test_all_operators() {
    let test_cases = vec![
        ("=", CompareOp::Equal),
        ("!=", CompareOp::NotEqual),
        ("<", CompareOp::LessThan),
        ("<=", CompareOp::LessEqual),
        (">", CompareOp::GreaterThan),
        (">=", CompareOp::GreaterEqual),
        ("contains", CompareOp::Contains),
    ];

    for (spelling, op) in test_cases {
        let expr = compile(&format!("{{age}} {} 18", spelling)).unwrap();
        assert_eq!(expr, cmp("age", op, Literal::Integer(18)), "Failed for {}", spelling);
    }
}

#[test]
fn test_parse_from_tokens() {
    let tokens = tokenize("{a} = 1").unwrap();
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Whitespace));
    assert_eq!(parse(tokens).unwrap(), eq_int("a", 1));
}

#[test]
fn test_parser_adds_missing_eof() {
    let tokens: Vec<_> = tokenize("{a} = 1")
        .unwrap()
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .collect();
    assert_eq!(Parser::new(tokens).parse().unwrap(), eq_int("a", 1));
}

// ============================================================================
// Literals and Operands
// ============================================================================

#[test]
fn test_literals() {
    let test_cases = vec![
        ("42", Literal::Integer(42)),
        ("3.5", Literal::Float(3.5)),
        ("'hello world'", Literal::String("hello world".to_string())),
        ("''", Literal::String(String::new())),
        ("true", Literal::Boolean(true)),
        ("false", Literal::Boolean(false)),
        ("null", Literal::Null),
    ];

    for (input, expected) in test_cases {
        assert_eq!(compile(input).unwrap(), Expr::Literal(expected), "Failed for {}", input);
    }
}

#[test]
fn test_huge_integer_becomes_float() {
    let expr = compile("99999999999999999999").unwrap();
    assert!(matches!(expr, Expr::Literal(Literal::Float(n)) if n > 9.9e19));
}

#[test]
fn test_bare_variable() {
    assert_eq!(compile("{enrollee.subject}").unwrap(), Expr::Variable(var("enrollee.subject")));
}

#[test]
fn test_variable_segments() {
    let expr = compile(r#"{question1[0]["sub"]}.trailer != null"#).unwrap();
    let Expr::Comparison { left: Operand::Variable(v), op, right } = expr else {
        panic!("expected comparison");
    };
    assert_eq!(op, CompareOp::NotEqual);
    assert_eq!(right, Operand::Literal(Literal::Null));
    assert_eq!(
        v.segments(),
        &[
            PathSegment::Field("question1".into()),
            PathSegment::Index(0),
            PathSegment::Key("sub".into()),
            PathSegment::Field("trailer".into()),
        ]
    );
}

#[test]
fn test_literal_on_left() {
    let expr = compile("18 <= {age}").unwrap();
    assert_eq!(
        expr,
        Expr::compare(Literal::Integer(18), CompareOp::LessEqual, var("age"))
    );
}

#[test]
fn test_variable_on_both_sides() {
    let expr = compile("{profile.givenName} = {profile.familyName}").unwrap();
    assert_eq!(
        expr,
        Expr::compare(var("profile.givenName"), CompareOp::Equal, var("profile.familyName"))
    );
}

#[test]
fn test_constant_comparison_is_legal() {
    assert_eq!(
        compile("1 = 1").unwrap(),
        Expr::compare(Literal::Integer(1), CompareOp::Equal, Literal::Integer(1))
    );
}

// ============================================================================
// Precedence and Grouping
// ============================================================================

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = compile("{a}=1 or {b}=2 and {c}=3").unwrap();
    assert_eq!(
        expr,
        Expr::or(eq_int("a", 1), Expr::and(eq_int("b", 2), eq_int("c", 3)))
    );
}

#[test]
fn test_parentheses_override_precedence() {
    let expr = compile("({a}=1 or {b}=2) and {c}=3").unwrap();
    assert_eq!(
        expr,
        Expr::and(Expr::or(eq_int("a", 1), eq_int("b", 2)), eq_int("c", 3))
    );
}

#[test]
fn test_and_chain_is_left_leaning() {
    let expr = compile("{a}=1 and {b}=2 and {c}=3 and {d}=4").unwrap();
    assert_eq!(
        expr,
        Expr::and(
            Expr::and(Expr::and(eq_int("a", 1), eq_int("b", 2)), eq_int("c", 3)),
            eq_int("d", 4)
        )
    );
}

#[test]
fn test_or_chain_is_left_leaning() {
    let expr = compile("{a}=1 or {b}=2 or {c}=3").unwrap();
    assert_eq!(
        expr,
        Expr::or(Expr::or(eq_int("a", 1), eq_int("b", 2)), eq_int("c", 3))
    );
}

#[test]
fn test_redundant_parentheses_leave_no_trace() {
    assert_eq!(compile("((({a}=1)))").unwrap(), eq_int("a", 1));
}

// ============================================================================
// Unary Forms
// ============================================================================

#[test]
fn test_not_binds_tighter_than_and() {
    let expr = compile("!{a}=1 and {b}=2").unwrap();
    assert_eq!(expr, Expr::and(Expr::not(eq_int("a", 1)), eq_int("b", 2)));
}

#[test]
fn test_double_negation_is_preserved() {
    assert_eq!(
        compile("!!{a}=1").unwrap(),
        Expr::not(Expr::not(eq_int("a", 1)))
    );
}

#[test]
fn test_not_group() {
    let expr = compile("!({a}=1 or {b}=2)").unwrap();
    assert_eq!(expr, Expr::not(Expr::or(eq_int("a", 1), eq_int("b", 2))));
}

#[test]
fn test_include() {
    let expr = compile("include({enrollee.consented} = true and {age} > 17)").unwrap();
    assert!(expr.is_inclusion());
    assert_eq!(
        expr,
        Expr::include(Expr::and(
            cmp("enrollee.consented", CompareOp::Equal, Literal::Boolean(true)),
            cmp("age", CompareOp::GreaterThan, Literal::Integer(17))
        ))
    );
}

#[test]
fn test_include_inside_or() {
    let expr = compile("include({a}=1) or {b}=2").unwrap();
    assert_eq!(expr, Expr::or(Expr::include(eq_int("a", 1)), eq_int("b", 2)));
}

// ============================================================================
// Function Calls
// ============================================================================

#[test]
fn test_standalone_function_call() {
    let expr = compile("max({a}, {b}, 3)").unwrap();
    assert_eq!(
        expr,
        Expr::Call(FunctionCall::new(
            "max",
            vec![
                Expr::Variable(var("a")),
                Expr::Variable(var("b")),
                Expr::Literal(Literal::Integer(3)),
            ]
        ))
    );
}

#[test]
fn test_function_call_without_arguments() {
    assert_eq!(compile("now()").unwrap(), Expr::Call(FunctionCall::new("now", vec![])));
}

#[test]
fn test_function_call_as_operand() {
    let expr = compile("lower({profile.name}) = 'john'").unwrap();
    assert_eq!(
        expr,
        Expr::compare(
            FunctionCall::new("lower", vec![Expr::Variable(var("profile.name"))]),
            CompareOp::Equal,
            Literal::String("john".to_string())
        )
    );
}

#[test]
fn test_function_arguments_are_expressions() {
    let expr = compile("f({a} = 1 or {b} = 2, !{c})").unwrap();
    assert_eq!(
        expr,
        Expr::Call(FunctionCall::new(
            "f",
            vec![
                Expr::or(eq_int("a", 1), eq_int("b", 2)),
                Expr::not(Expr::Variable(var("c"))),
            ]
        ))
    );
}

#[test]
fn test_unknown_functions_still_parse() {
    assert!(compile("no_such_function({a}) = 1").is_ok());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_input() {
    let err = parse_err("");
    assert_eq!(err.found_kind, TokenKind::Eof);
    assert_eq!(err.expected, "an expression");

    let err = parse_err("   ");
    assert_eq!(err.found_kind, TokenKind::Eof);
}

#[test]
fn test_missing_right_operand() {
    let err = parse_err("{a} = ");
    assert_eq!(err.found_kind, TokenKind::Eof);
    assert_eq!(err.position.offset, 6);
    assert_eq!(err.found, "end of input");
}

#[test]
fn test_missing_left_operand() {
    let err = parse_err("= 1");
    assert_eq!(err.found_kind, TokenKind::Operator);
    assert_eq!(err.position.offset, 0);
}

#[test]
fn test_unbalanced_parentheses() {
    let err = parse_err("({a} = 1");
    assert_eq!(err.expected, "')'");
    assert_eq!(err.found_kind, TokenKind::Eof);

    let err = parse_err("{a} = 1)");
    assert_eq!(err.expected, "end of input");
    assert_eq!(err.found_kind, TokenKind::ParenClose);
    assert_eq!(err.position.offset, 7);
}

#[test]
fn test_trailing_tokens() {
    let err = parse_err("{a} = 1 {b} = 2");
    assert_eq!(err.found_kind, TokenKind::Variable);
    assert_eq!(err.position.offset, 8);
}

#[test]
fn test_chained_comparison_is_rejected() {
    let err = parse_err("{a} = {b} = {c}");
    assert_eq!(err.found_kind, TokenKind::Operator);
}

#[test]
fn test_dangling_boolean_operator() {
    assert_eq!(parse_err("{a} = 1 and").found_kind, TokenKind::Eof);
    assert_eq!(parse_err("or {a} = 1").found_kind, TokenKind::Or);
    assert_eq!(parse_err("{a} = 1 and or {b} = 2").found_kind, TokenKind::Or);
}

#[test]
fn test_unclosed_function_call() {
    let err = parse_err("lower({a}");
    assert_eq!(err.expected, "',' or ')' in argument list");
    assert_eq!(err.found_kind, TokenKind::Eof);
}

#[test]
fn test_function_name_without_parentheses() {
    let err = parse_err("lower = 1");
    assert_eq!(err.expected, "'(' after function name");
}

#[test]
fn test_trailing_comma_in_arguments() {
    assert_eq!(parse_err("max({a},)").found_kind, TokenKind::ParenClose);
}

#[test]
fn test_include_requires_parentheses() {
    assert_eq!(parse_err("include {a} = 1").expected, "'(' after include");
}

#[test]
fn test_comparison_operand_cannot_be_group() {
    let err = parse_err("{a} = ({b})");
    assert_eq!(err.found_kind, TokenKind::ParenOpen);
}

#[test]
fn test_lex_errors_pass_through() {
    assert!(matches!(compile("{a} = 'x"), Err(Error::Lex(_))));
}

#[test]
fn test_error_message() {
    assert_eq!(
        parse_err("{a} = ").to_string(),
        "expected a variable, literal or function call at line 1, column 7, found end of input"
    );
}

#[test]
fn test_malformed_string_token() {
    for lexeme in ["", "'", "abc", "'abc"] {
        let err = parse(vec![Token::new(TokenKind::String, lexeme, Position::start())]).unwrap_err();
        assert_eq!(err.expected, "a quoted string", "Failed for {:?}", lexeme);
        assert_eq!(err.found_kind, TokenKind::String);
    }
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn test_nesting_within_limit() {
    let depth = MAX_NESTING - 1;
    let source = format!("{}{{a}} = 1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(compile(&source).unwrap(), eq_int("a", 1));

    let source = format!("{}{{a}} = 1", "!".repeat(depth));
    assert!(compile(&source).is_ok());
}

#[test]
fn test_deep_parentheses_are_rejected() {
    let source = format!("{}{{a}} = 1{}", "(".repeat(50_000), ")".repeat(50_000));
    let err = parse_err(&source);
    assert_eq!(err.expected, "shallower nesting");
    assert_eq!(err.found_kind, TokenKind::ParenOpen);
}

#[test]
fn test_deep_negation_is_rejected() {
    let source = format!("{}{{a}} = 1", "!".repeat(50_000));
    assert_eq!(parse_err(&source).expected, "shallower nesting");
}

#[test]
fn test_deep_function_arguments_are_rejected() {
    let source = format!("{}{{a}}{}", "lower(".repeat(1_000), ")".repeat(1_000));
    assert_eq!(parse_err(&source).expected, "shallower nesting");
}
