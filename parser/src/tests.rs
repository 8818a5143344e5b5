//! FILENAME: parser/src/tests.rs
//! PURPOSE: Consolidated unit tests for the parser crate.

use crate::ast::{
    ArithmeticOperator, ComparisonOperator, Expression, LogicalOperator, UnaryOperator,
};
use crate::codec::{from_json_str, from_json_value, to_json, to_json_string, CodecError};
use crate::lexer::{is_keyword, Lexer};
use crate::parser::{parse, parse_prefix};
use crate::token::{Token, TokenKind};
use serde_json::json;

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input).map(|t| t.kind).collect()
}

fn texts(input: &str) -> Vec<String> {
    Lexer::new(input).map(|t| t.text).collect()
}

fn var(name: &str) -> Expression {
    Expression::variable(name)
}

fn num(value: f64) -> Expression {
    Expression::literal(value)
}

// ========================================
// LEXER TESTS
// ========================================

#[test]
fn lexer_tokenizes_simple_math() {
    let mut lexer = Lexer::new("A + B");

    assert_eq!(lexer.next_token(), Token::new(TokenKind::Variable, "A", 0));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Operator, "+", 2));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Variable, "B", 4));
    assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
}

#[test]
fn lexer_returns_end_of_input_forever() {
    let mut lexer = Lexer::new("1");
    assert_eq!(lexer.next_token().kind, TokenKind::Number);
    for _ in 0..3 {
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::EndOfInput);
        assert_eq!(token.position, 1);
    }
}

#[test]
fn lexer_positions_account_for_leading_whitespace() {
    let mut lexer = Lexer::new("   price");
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Variable, "price", 3));
}

#[test]
fn lexer_splits_digits_from_identifiers() {
    assert_eq!(kinds("A1"), vec![TokenKind::Variable, TokenKind::Number]);
    assert_eq!(texts("A1"), vec!["A", "1"]);
}

#[test]
fn lexer_keeps_space_between_words() {
    assert_eq!(kinds("A B"), vec![TokenKind::Variable, TokenKind::Variable]);
    assert_eq!(kinds("A   B"), vec![TokenKind::Variable, TokenKind::Variable]);
}

#[test]
fn lexer_accepts_underscores_in_identifiers() {
    assert_eq!(texts("base_price * 2"), vec!["base_price", "*", "2"]);
}

#[test]
fn lexer_reads_decimal_numbers_without_validating_dots() {
    assert_eq!(texts("3.14"), vec!["3.14"]);
    assert_eq!(texts("1.2.3"), vec!["1.2.3"]);
}

#[test]
fn lexer_recognizes_latin_keywords_in_any_case() {
    assert_eq!(
        kinds("if a then b else c or d and e"),
        vec![
            TokenKind::If,
            TokenKind::Variable,
            TokenKind::Then,
            TokenKind::Variable,
            TokenKind::Else,
            TokenKind::Variable,
            TokenKind::Or,
            TokenKind::Variable,
            TokenKind::And,
            TokenKind::Variable,
        ]
    );
}

#[test]
fn lexer_recognizes_cyrillic_keywords() {
    assert_eq!(
        kinds("ЕСЛИ x ТОГДА 1 ИНАЧЕ 2"),
        vec![
            TokenKind::If,
            TokenKind::Variable,
            TokenKind::Then,
            TokenKind::Number,
            TokenKind::Else,
            TokenKind::Number,
        ]
    );
    assert_eq!(kinds("a и b или c"), vec![
        TokenKind::Variable,
        TokenKind::And,
        TokenKind::Variable,
        TokenKind::Or,
        TokenKind::Variable,
    ]);
}

#[test]
fn lexer_keeps_keyword_original_casing_in_text() {
    let mut lexer = Lexer::new("Если");
    assert_eq!(lexer.next_token(), Token::new(TokenKind::If, "Если", 0));
}

#[test]
fn lexer_detects_functions_by_lookahead() {
    assert_eq!(
        kinds("max (a, b)"),
        vec![
            TokenKind::Function,
            TokenKind::ParenOpen,
            TokenKind::Variable,
            TokenKind::Comma,
            TokenKind::Variable,
            TokenKind::ParenClose,
        ]
    );
    assert_eq!(kinds("max"), vec![TokenKind::Variable]);
}

#[test]
fn lexer_prefers_compound_operators() {
    assert_eq!(
        texts(">= <= == != ** > <"),
        vec![">=", "<=", "==", "!=", "**", ">", "<"]
    );
}

#[test]
fn lexer_tokenizes_power_and_modulo() {
    assert_eq!(texts("2 ^ 3 % 4"), vec!["2", "^", "3", "%", "4"]);
}

#[test]
fn lexer_skips_unknown_characters() {
    let tokens: Vec<Token> = Lexer::new("2 $ 3").collect();
    assert_eq!(
        tokens,
        vec![
            Token::new(TokenKind::Number, "2", 0),
            Token::new(TokenKind::Number, "3", 4),
        ]
    );
}

#[test]
fn keyword_lookup_covers_both_tables() {
    assert!(is_keyword("иначе"));
    assert!(is_keyword("Then"));
    assert!(!is_keyword("price"));
}

// ========================================
// PARSER TESTS - PRECEDENCE
// ========================================

#[test]
fn parser_respects_multiplication_precedence() {
    let result = parse("2 + 3 * 4").unwrap();
    assert_eq!(
        result,
        Expression::operation(
            ArithmeticOperator::Add,
            num(2.0),
            Expression::operation(ArithmeticOperator::Multiply, num(3.0), num(4.0)),
        )
    );
}

#[test]
fn parser_respects_parentheses() {
    let result = parse("(2 + 3) * 4").unwrap();
    assert_eq!(
        result,
        Expression::operation(
            ArithmeticOperator::Multiply,
            Expression::operation(ArithmeticOperator::Add, num(2.0), num(3.0)),
            num(4.0),
        )
    );
}

#[test]
fn parser_chains_comparisons_left_associatively() {
    let result = parse("5 > 3 > 1").unwrap();
    assert_eq!(
        result,
        Expression::comparison(
            ComparisonOperator::GreaterThan,
            Expression::comparison(ComparisonOperator::GreaterThan, num(5.0), num(3.0)),
            num(1.0),
        )
    );
}

#[test]
fn parser_accepts_double_equals() {
    assert_eq!(
        parse("A == B").unwrap(),
        Expression::comparison(ComparisonOperator::Equal, var("A"), var("B"))
    );
}

#[test]
fn parser_binds_and_tighter_than_or() {
    let result = parse("A OR B AND C").unwrap();
    assert_eq!(
        result,
        Expression::logical(
            LogicalOperator::Or,
            var("A"),
            Expression::logical(LogicalOperator::And, var("B"), var("C")),
        )
    );
}

#[test]
fn parser_parses_unary_minus() {
    let result = parse("-A + B").unwrap();
    assert_eq!(
        result,
        Expression::operation(
            ArithmeticOperator::Add,
            Expression::unary(UnaryOperator::Negate, var("A")),
            var("B"),
        )
    );
}

#[test]
fn parser_power_is_right_associative_and_binds_tighter_than_negation() {
    assert_eq!(
        parse("2 ^ 3 ** 2").unwrap(),
        Expression::operation(
            ArithmeticOperator::Power,
            num(2.0),
            Expression::operation(ArithmeticOperator::Power, num(3.0), num(2.0)),
        )
    );
    assert_eq!(
        parse("-2 ^ 2").unwrap(),
        Expression::unary(
            UnaryOperator::Negate,
            Expression::operation(ArithmeticOperator::Power, num(2.0), num(2.0)),
        )
    );
}

#[test]
fn parser_parses_modulo_at_multiplicative_level() {
    assert_eq!(
        parse("1 + 7 % 4").unwrap(),
        Expression::operation(
            ArithmeticOperator::Add,
            num(1.0),
            Expression::operation(ArithmeticOperator::Modulo, num(7.0), num(4.0)),
        )
    );
}

// ========================================
// PARSER TESTS - CONDITIONALS AND CALLS
// ========================================

#[test]
fn parser_parses_if_statement() {
    let expected = Expression::conditional(
        Expression::comparison(ComparisonOperator::GreaterThan, var("A"), num(1.0)),
        num(2.0),
        Some(num(3.0)),
    );
    assert_eq!(parse("IF A > 1 THEN 2 ELSE 3").unwrap(), expected);
    assert_eq!(parse("ЕСЛИ A > 1 ТОГДА 2 ИНАЧЕ 3").unwrap(), expected);
}

#[test]
fn parser_parses_if_statement_without_else() {
    assert_eq!(
        parse("IF A THEN 2").unwrap(),
        Expression::conditional(var("A"), num(2.0), None)
    );
}

#[test]
fn parser_parses_if_call_form() {
    assert_eq!(
        parse("IF(0 > 1, 5)").unwrap(),
        Expression::conditional(
            Expression::comparison(ComparisonOperator::GreaterThan, num(0.0), num(1.0)),
            num(5.0),
            None,
        )
    );
    assert_eq!(
        parse("ЕСЛИ(A, 1, 2)").unwrap(),
        Expression::conditional(var("A"), num(1.0), Some(num(2.0)))
    );
}

#[test]
fn parser_parses_parenthesized_statement_condition() {
    let result = parse("ЕСЛИ(age = 18 И B = 1) ТОГДА salary * 1.2 ИНАЧЕ salary").unwrap();
    assert_eq!(
        result,
        Expression::conditional(
            Expression::logical(
                LogicalOperator::And,
                Expression::comparison(ComparisonOperator::Equal, var("age"), num(18.0)),
                Expression::comparison(ComparisonOperator::Equal, var("B"), num(1.0)),
            ),
            Expression::operation(ArithmeticOperator::Multiply, var("salary"), num(1.2)),
            Some(var("salary")),
        )
    );
}

#[test]
fn parser_continues_condition_after_leading_parenthesis() {
    assert_eq!(
        parse("IF (A) > 1 THEN 1").unwrap(),
        Expression::conditional(
            Expression::comparison(ComparisonOperator::GreaterThan, var("A"), num(1.0)),
            num(1.0),
            None,
        )
    );
}

#[test]
fn parser_allows_conditional_inside_expression() {
    assert_eq!(
        parse("2 * IF(A > 1, 3, 4) + 1").unwrap(),
        Expression::operation(
            ArithmeticOperator::Add,
            Expression::operation(
                ArithmeticOperator::Multiply,
                num(2.0),
                Expression::conditional(
                    Expression::comparison(ComparisonOperator::GreaterThan, var("A"), num(1.0)),
                    num(3.0),
                    Some(num(4.0)),
                ),
            ),
            num(1.0),
        )
    );
}

#[test]
fn parser_parses_function_calls() {
    assert_eq!(
        parse("max(a, b + 1)").unwrap(),
        Expression::function(
            "max",
            vec![
                var("a"),
                Expression::operation(ArithmeticOperator::Add, var("b"), num(1.0)),
            ],
        )
    );
    assert_eq!(parse("myFunc()").unwrap(), Expression::function("myFunc", vec![]));
}

// ========================================
// PARSER TESTS - ERRORS
// ========================================

#[test]
fn parser_rejects_empty_formula() {
    let err = parse("   ").unwrap_err();
    assert_eq!(err.message, "empty formula");
    assert_eq!(err.position, None);
}

#[test]
fn parser_reports_unclosed_parenthesis() {
    let err = parse("(1 + 2").unwrap_err();
    assert!(err.message.starts_with("expected ')'"), "{}", err.message);
    assert_eq!(err.position, Some(6));
}

#[test]
fn parser_reports_missing_then() {
    let err = parse("IF A > 1 ELSE 2").unwrap_err();
    assert!(err.message.contains("expected THEN/ТОГДА"), "{}", err.message);
    assert_eq!(err.position, Some(9));
}

#[test]
fn parser_reports_unclosed_if_call() {
    let err = parse("IF(A > 1, 2").unwrap_err();
    assert!(err.message.contains("expected ')' to close IF function"), "{}", err.message);
}

#[test]
fn parser_wraps_branch_errors_with_context() {
    let err = parse("IF A THEN * 2").unwrap_err();
    assert!(err.message.starts_with("error parsing IF then branch"), "{}", err.message);
    assert_eq!(err.position, Some(10));
}

#[test]
fn parser_reports_dangling_operator() {
    let err = parse("1 +").unwrap_err();
    assert_eq!(err.message, "unexpected end of expression");
}

#[test]
fn parser_reports_invalid_number() {
    let err = parse("1..2").unwrap_err();
    assert_eq!(err.message, "invalid number: 1..2");
    assert_eq!(err.position, Some(0));
}

#[test]
fn parser_rejects_numbers_that_overflow() {
    let digits = format!("1{}", "0".repeat(400));
    let err = parse(&format!("2 + {}", digits)).unwrap_err();
    assert_eq!(err.message, format!("invalid number: {}", digits));
    assert_eq!(err.position, Some(4));

    assert_eq!(parse("1e3").unwrap_err().message, "unexpected token after expression: 'e'");
}

#[test]
fn parser_rejects_trailing_tokens() {
    let err = parse("A B").unwrap_err();
    assert!(err.message.starts_with("unexpected token after expression"), "{}", err.message);
    assert_eq!(err.position, Some(2));
}

#[test]
fn parse_prefix_ignores_trailing_tokens() {
    assert_eq!(parse_prefix("A B").unwrap(), var("A"));
    assert_eq!(parse_prefix("1 + 2 )").unwrap(), Expression::operation(ArithmeticOperator::Add, num(1.0), num(2.0)));
}

#[test]
fn display_output_reparses_to_same_tree() {
    let original = parse("IF(A > 1 AND B != 2, -B % 3, max(2, C ^ 2))").unwrap();
    let rendered = original.to_string();
    assert_eq!(parse(&rendered).unwrap(), original, "rendered: {}", rendered);
}

#[test]
fn display_of_negative_literal_reparses_as_negation() {
    let decoded = Expression::operation(ArithmeticOperator::Subtract, num(1.0), num(-3.0));
    let rendered = decoded.to_string();
    assert_eq!(rendered, "(1 - -3)");
    assert_eq!(
        parse(&rendered).unwrap(),
        Expression::operation(
            ArithmeticOperator::Subtract,
            num(1.0),
            Expression::unary(UnaryOperator::Negate, num(3.0)),
        )
    );
}

// ========================================
// CODEC TESTS
// ========================================

#[test]
fn codec_decodes_nested_operation() {
    let input = r#"{
        "type": "operation",
        "operator": "+",
        "left": { "type": "variable", "name": "a" },
        "right": {
            "type": "operation",
            "operator": "*",
            "left": { "type": "variable", "name": "b" },
            "right": { "type": "literal", "value": 2 }
        }
    }"#;
    assert_eq!(
        from_json_str(input).unwrap(),
        Expression::operation(
            ArithmeticOperator::Add,
            var("a"),
            Expression::operation(ArithmeticOperator::Multiply, var("b"), num(2.0)),
        )
    );
}

#[test]
fn codec_accepts_double_star_as_power() {
    let value = json!({
        "type": "operation",
        "operator": "**",
        "left": { "type": "literal", "value": 2 },
        "right": { "type": "literal", "value": 3 }
    });
    assert_eq!(
        from_json_value(&value).unwrap(),
        Expression::operation(ArithmeticOperator::Power, num(2.0), num(3.0))
    );
}

#[test]
fn codec_reports_missing_field() {
    let err = from_json_value(&json!({ "type": "literal" })).unwrap_err();
    assert!(matches!(err, CodecError::MissingField { field: "value", .. }));
    assert_eq!(err.to_string(), "literal node missing value");
}

#[test]
fn codec_wraps_child_errors_with_branch() {
    let value = json!({
        "type": "comparison",
        "operator": ">",
        "left": { "type": "variable" },
        "right": { "type": "literal", "value": 1 }
    });
    let err = from_json_value(&value).unwrap_err();
    assert_eq!(
        err.to_string(),
        "error parsing left operand: variable node missing name"
    );
}

#[test]
fn codec_names_failing_argument_index() {
    let value = json!({
        "type": "function",
        "name": "max",
        "args": [
            { "type": "literal", "value": 1 },
            { "type": "literal" }
        ]
    });
    let err = from_json_value(&value).unwrap_err();
    assert_eq!(
        err.to_string(),
        "error parsing function argument 1: literal node missing value"
    );
}

#[test]
fn codec_rejects_unknown_type_and_operator() {
    let err = from_json_value(&json!({ "type": "matrix" })).unwrap_err();
    assert_eq!(err.to_string(), "unknown node type: matrix");

    let err = from_json_value(&json!({
        "type": "operation",
        "operator": "&",
        "left": { "type": "literal", "value": 1 },
        "right": { "type": "literal", "value": 2 }
    }))
    .unwrap_err();
    assert!(matches!(err, CodecError::UnknownOperator { node: "operation", .. }));
}

#[test]
fn codec_rejects_empty_variable_name() {
    let err = from_json_value(&json!({ "type": "variable", "name": "" })).unwrap_err();
    assert!(matches!(err, CodecError::EmptyName { node: "variable" }));
}

#[test]
fn codec_treats_missing_args_as_empty() {
    let value = json!({ "type": "function", "name": "sum" });
    assert_eq!(from_json_value(&value).unwrap(), Expression::function("sum", vec![]));
}

#[test]
fn codec_omits_absent_else_branch() {
    let expr = Expression::conditional(var("a"), num(1.0), None);
    let value = to_json(&expr).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "conditional",
            "condition": { "type": "variable", "name": "a" },
            "then": { "type": "literal", "value": 1.0 }
        })
    );
}

#[test]
fn codec_round_trips_every_variant() {
    let expr = Expression::conditional(
        Expression::logical(
            LogicalOperator::Or,
            Expression::comparison(ComparisonOperator::LessEqual, var("a"), num(10.0)),
            Expression::comparison(ComparisonOperator::NotEqual, var("b"), num(0.0)),
        ),
        Expression::operation(
            ArithmeticOperator::Modulo,
            Expression::unary(UnaryOperator::Negate, var("a")),
            num(3.0),
        ),
        Some(Expression::function(
            "max",
            vec![
                Expression::operation(ArithmeticOperator::Power, var("b"), num(2.0)),
                Expression::unary(UnaryOperator::Plus, num(1.5)),
            ],
        )),
    );

    let value = to_json(&expr).unwrap();
    assert_eq!(from_json_value(&value).unwrap(), expr);

    let text = serde_json::to_string(&expr).unwrap();
    let decoded: Expression = serde_json::from_str(&text).unwrap();
    assert_eq!(decoded, expr);
}

#[test]
fn codec_round_trips_parsed_formula() {
    let expr = parse("ЕСЛИ a > 1 И b < 2 ТОГДА sum(a, b) ИНАЧЕ -a").unwrap();
    let value = to_json(&expr).unwrap();
    assert_eq!(value["type"], "conditional");
    assert_eq!(value["condition"]["operator"], "AND");
    assert_eq!(from_json_value(&value).unwrap(), expr);
}

#[test]
fn codec_writes_json_text() {
    let expr = parse("max(a, 2)").unwrap();
    let text = to_json_string(&expr).unwrap();

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "function",
            "name": "max",
            "args": [
                { "type": "variable", "name": "a" },
                { "type": "literal", "value": 2.0 }
            ]
        })
    );
    assert_eq!(from_json_str(&text).unwrap(), expr);
}

#[test]
fn codec_refuses_non_finite_literals() {
    let expr = Expression::operation(ArithmeticOperator::Add, var("a"), num(f64::INFINITY));
    assert!(matches!(
        to_json(&expr).unwrap_err(),
        CodecError::InvalidField { field: "value", expected: "a finite number", .. }
    ));

    let nested = Expression::conditional(var("a"), num(1.0), Some(num(f64::NAN)));
    assert!(to_json_string(&nested).is_err());
    assert!(to_json(&Expression::function("sum", vec![num(f64::NEG_INFINITY)])).is_err());
}
