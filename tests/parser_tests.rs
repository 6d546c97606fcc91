// tests/parser_tests.rs

use uel_lang::ast::{BinOp, Expr, UnaryOp};
use uel_lang::{Parser, parse};

// ============================================================================
// Precedence structure
// ============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expr = parse("1 + 2 * 3").unwrap();

    // Should be: Add(1, Multiply(2, 3))
    match expr {
        Expr::BinaryOp {
            op: BinOp::Add,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::Integer(1)));
            match *right {
                Expr::BinaryOp {
                    op: BinOp::Multiply,
                    left,
                    right,
                } => {
                    assert!(matches!(*left, Expr::Integer(2)));
                    assert!(matches!(*right, Expr::Integer(3)));
                }
                _ => panic!("Expected multiplication on the right"),
            }
        }
        _ => panic!("Expected addition at the top"),
    }
}

#[test]
fn test_parentheses_group() {
    let expr = parse("(1 + 2) * 3").unwrap();

    // Should be: Multiply(Group(Add(1, 2)), 3)
    match expr {
        Expr::BinaryOp {
            op: BinOp::Multiply,
            left,
            right,
        } => {
            match *left {
                Expr::Group(inner) => {
                    assert!(matches!(*inner, Expr::BinaryOp { op: BinOp::Add, .. }));
                }
                _ => panic!("Expected group on the left"),
            }
            assert!(matches!(*right, Expr::Integer(3)));
        }
        _ => panic!("Expected multiplication at the top"),
    }
}

#[test]
fn test_comparison_binds_looser_than_arithmetic() {
    let expr = parse("1 + 2 < 3 * 4").unwrap();

    match expr {
        Expr::BinaryOp {
            op: BinOp::LessThan,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::BinaryOp { op: BinOp::Add, .. }));
            assert!(matches!(
                *right,
                Expr::BinaryOp {
                    op: BinOp::Multiply,
                    ..
                }
            ));
        }
        _ => panic!("Expected comparison at the top"),
    }
}

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = parse("a or b and c").unwrap();

    match expr {
        Expr::BinaryOp {
            op: BinOp::Or,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::Identifier(ref n) if n == "a"));
            assert!(matches!(*right, Expr::BinaryOp { op: BinOp::And, .. }));
        }
        _ => panic!("Expected disjunction at the top"),
    }
}

#[test]
fn test_left_associative_chain() {
    let expr = parse("1 - 2 - 3").unwrap();

    // Should be: Subtract(Subtract(1, 2), 3)
    match expr {
        Expr::BinaryOp {
            op: BinOp::Subtract,
            left,
            right,
        } => {
            assert!(matches!(
                *left,
                Expr::BinaryOp {
                    op: BinOp::Subtract,
                    ..
                }
            ));
            assert!(matches!(*right, Expr::Integer(3)));
        }
        _ => panic!("Expected subtraction at the top"),
    }
}

#[test]
fn test_chained_comparison_stays_binary() {
    // No chained-comparison sugar: a < b < c is (a < b) < c.
    let expr = parse("a < b < c").unwrap();

    match expr {
        Expr::BinaryOp {
            op: BinOp::LessThan,
            left,
            right,
        } => {
            assert!(matches!(
                *left,
                Expr::BinaryOp {
                    op: BinOp::LessThan,
                    ..
                }
            ));
            assert!(matches!(*right, Expr::Identifier(ref n) if n == "c"));
        }
        _ => panic!("Expected comparison at the top"),
    }
}

#[test]
fn test_exponent_binds_tighter_than_unary_minus() {
    // -2 ^ 2 is -(2 ^ 2), not (-2) ^ 2.
    let expr = parse("-2 ^ 2").unwrap();

    match expr {
        Expr::UnaryOp {
            op: UnaryOp::Negate,
            operand,
        } => {
            assert!(matches!(
                *operand,
                Expr::BinaryOp {
                    op: BinOp::Power,
                    ..
                }
            ));
        }
        _ => panic!("Expected negation at the top"),
    }
}

#[test]
fn test_not_binds_looser_than_comparison() {
    let expr = parse("not a < b").unwrap();

    match expr {
        Expr::UnaryOp {
            op: UnaryOp::Not,
            operand,
        } => {
            assert!(matches!(
                *operand,
                Expr::BinaryOp {
                    op: BinOp::LessThan,
                    ..
                }
            ));
        }
        _ => panic!("Expected boolean negation at the top"),
    }
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_parse_integer() {
    assert!(matches!(parse("42").unwrap(), Expr::Integer(42)));
}

#[test]
fn test_parse_float() {
    assert!(matches!(parse("3.15").unwrap(), Expr::Float(n) if (n - 3.15).abs() < 1e-9));
}

#[test]
fn test_parse_underscored_integer() {
    assert!(matches!(parse("1_000").unwrap(), Expr::Integer(1000)));
}

#[test]
fn test_parse_trailing_dot_float() {
    assert!(matches!(parse("1.").unwrap(), Expr::Float(n) if n == 1.0));
}

#[test]
fn test_parse_leading_dot_float() {
    assert!(matches!(parse(".5").unwrap(), Expr::Float(n) if n == 0.5));
}

#[test]
fn test_parse_identifier() {
    assert!(matches!(parse("elevation").unwrap(), Expr::Identifier(ref n) if n == "elevation"));
}

#[test]
fn test_identifier_may_contain_digits() {
    assert!(
        matches!(parse("tmax_days_above_95").unwrap(), Expr::Identifier(ref n) if n == "tmax_days_above_95")
    );
}

// ============================================================================
// Operator spellings
// ============================================================================

#[test]
fn test_not_equal_synonyms() {
    for source in ["1 != 2", "1 ~= 2", "1 <> 2"] {
        let expr = parse(source).unwrap();
        assert!(
            matches!(
                expr,
                Expr::BinaryOp {
                    op: BinOp::NotEqual,
                    ..
                }
            ),
            "{} should parse as not-equal",
            source
        );
    }
}

#[test]
fn test_symbolic_and_keyword_spellings_agree() {
    assert_eq!(parse("a && b").unwrap(), parse("a and b").unwrap());
    assert_eq!(parse("a || b").unwrap(), parse("a or b").unwrap());
    assert_eq!(parse("! a").unwrap(), parse("not a").unwrap());
}

#[test]
fn test_keyword_operators_are_case_insensitive() {
    assert_eq!(parse("a AND b").unwrap(), parse("a and b").unwrap());
    assert_eq!(parse("a Or b").unwrap(), parse("a or b").unwrap());
    assert_eq!(parse("NOT a").unwrap(), parse("not a").unwrap());
}

#[test]
fn test_less_equal_is_not_less_then_garbage() {
    let expr = parse("a <= 2").unwrap();
    assert!(matches!(
        expr,
        Expr::BinaryOp {
            op: BinOp::LessEqual,
            ..
        }
    ));
}

// ============================================================================
// Boundary safety
// ============================================================================

#[test]
fn test_andy_is_one_identifier() {
    assert!(matches!(parse("andy").unwrap(), Expr::Identifier(ref n) if n == "andy"));
}

#[test]
fn test_orchid_is_not_a_disjunction() {
    assert!(matches!(parse("orchid").unwrap(), Expr::Identifier(ref n) if n == "orchid"));
}

#[test]
fn test_keyword_operator_followed_by_identifier_char_does_not_match() {
    // "x andy" is two identifiers with no operator between them.
    let err = parse("x andy").unwrap_err();
    assert_eq!(err.message, "unparsed input");
    assert_eq!(err.position.column, 3);
}

// ============================================================================
// Comments and whitespace
// ============================================================================

#[test]
fn test_comments_are_skipped() {
    let expr = parse("1 # a one\n + 2 # add a two\n").unwrap();
    assert!(matches!(expr, Expr::BinaryOp { op: BinOp::Add, .. }));
}

#[test]
fn test_leading_and_trailing_trivia() {
    let expr = parse("  # leading\n  7  # trailing").unwrap();
    assert!(matches!(expr, Expr::Integer(7)));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unparsed_input_is_located() {
    let err = parse("1 + 2 3").unwrap_err();
    assert_eq!(err.message, "unparsed input");
    assert_eq!(err.position.line, 1);
    assert_eq!(err.position.column, 7);
}

#[test]
fn test_unparsed_input_on_later_line() {
    let err = parse("1 +\nx 2").unwrap_err();
    assert_eq!(err.message, "unparsed input");
    assert_eq!(err.position.line, 2);
    assert_eq!(err.position.column, 3);
}

#[test]
fn test_trailing_operator_is_unparsed_input() {
    let err = parse("1 +").unwrap_err();
    assert_eq!(err.message, "unparsed input");
    assert_eq!(err.position.column, 3);
}

#[test]
fn test_unterminated_parenthesis() {
    let err = parse("(1 + 2").unwrap_err();
    assert_eq!(
        err.message,
        "subexpression ended unexpectedly, found end of input"
    );
}

#[test]
fn test_mismatched_close() {
    let err = parse("(1 + 2 x").unwrap_err();
    assert_eq!(err.message, "subexpression ended unexpectedly, found 'x'");
}

#[test]
fn test_empty_group_is_an_error() {
    let err = parse("()").unwrap_err();
    assert_eq!(err.message, "expression expected");
}

#[test]
fn test_empty_input_is_an_error() {
    let err = parse("").unwrap_err();
    assert_eq!(err.message, "expression expected");

    let err = parse("  # only a comment").unwrap_err();
    assert_eq!(err.message, "expression expected");
}

#[test]
fn test_malformed_number_located_at_span_start() {
    let err = parse("1 + 1.2.3").unwrap_err();
    assert_eq!(err.message, "malformed number '1.2.3'");
    assert_eq!(err.position.line, 1);
    assert_eq!(err.position.column, 5);
}

#[test]
fn test_stray_underscores_are_malformed() {
    for source in ["1__0", "1_", "1._5"] {
        let err = parse(source).unwrap_err();
        assert!(
            err.message.starts_with("malformed number"),
            "{} should be a malformed number, got: {}",
            source,
            err.message
        );
    }
}

#[test]
fn test_parse_error_display_has_location() {
    let err = parse("1 + 2 3").unwrap_err();
    assert_eq!(
        err.to_string(),
        "error at line 1, column 7: unparsed input"
    );
}

// ============================================================================
// Re-serialization
// ============================================================================

#[test]
fn test_display_parenthesizes_operands() {
    let expr = parse("1 + 2 * 3").unwrap();
    assert_eq!(expr.to_string(), "(1) + ((2) * (3))");
}

#[test]
fn test_display_output_reparses() {
    for source in [
        "1 + 2 * 3 / 4 * 5",
        "(1 + 2) * 3",
        "not (a != b) and c or d",
        "-2 ^ 2",
        "x <= 2.5 or y <> 1_000",
    ] {
        let expr = parse(source).unwrap();
        let reparsed = Parser::new(&expr.to_string()).parse().unwrap();
        // Grouping differs, structure-modulo-groups must not; a second
        // print normalizes both.
        assert_eq!(
            reparsed.to_string().replace(['(', ')'], ""),
            expr.to_string().replace(['(', ')'], ""),
            "{} did not round-trip",
            source
        );
    }
}
