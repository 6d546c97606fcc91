// tests/integration_tests.rs
//
// End-to-end flows: JSON environments in, JSON results out, dry validation
// before full evaluation, and text round-trips.

use uel_lang::cli::{CheckOptions, CheckResult, CliError, environment_from_json, execute_check};
use uel_lang::{Environment, EvalError, Value, evaluate, parse};

// ============================================================================
// JSON environments
// ============================================================================

#[test]
fn test_json_environment_binds_scalars_and_columns() {
    let env = environment_from_json(
        r#"{"threshold": 100, "scale": 0.5, "elevation": [120.0, 15.5, 300.0], "keep": [true, false, true]}"#,
    )
    .unwrap();

    assert_eq!(env.lookup("threshold"), Some(&Value::Integer(100)));
    assert_eq!(env.lookup("scale"), Some(&Value::Float(0.5)));
    assert_eq!(
        env.lookup("elevation"),
        Some(&Value::Series(vec![120.0, 15.5, 300.0]))
    );
    assert_eq!(
        env.lookup("keep"),
        Some(&Value::Mask(vec![true, false, true]))
    );
}

#[test]
fn test_json_environment_prebinds_booleans() {
    let env = environment_from_json("{}").unwrap();
    assert_eq!(
        evaluate("true or false", &env).unwrap(),
        Value::Boolean(true)
    );
}

#[test]
fn test_json_environment_rejects_non_objects() {
    assert!(matches!(
        environment_from_json("[1, 2]"),
        Err(CliError::InvalidBinding(_))
    ));
    assert!(matches!(
        environment_from_json(r#"{"x": "text"}"#),
        Err(CliError::InvalidBinding(_))
    ));
    assert!(matches!(
        environment_from_json("not json"),
        Err(CliError::Json(_))
    ));
}

// ============================================================================
// Check pipeline
// ============================================================================

#[test]
fn test_execute_check_evaluates_to_json() {
    let options = CheckOptions {
        expression: "elevation > threshold".to_string(),
        env: Some(r#"{"elevation": [120.0, 15.5, 300.0], "threshold": 100}"#.to_string()),
        conjunction: false,
        validate_only: false,
    };
    match execute_check(&options).unwrap() {
        CheckResult::Value(json) => {
            assert_eq!(json, serde_json::json!([true, false, true]));
        }
        other => panic!("Expected a value, got {:?}", other),
    }
}

#[test]
fn test_dry_validation_passes_without_touching_full_columns() {
    let options = CheckOptions {
        expression: "elevation > 100 and tmean_avg < 20".to_string(),
        env: Some(r#"{"elevation": [120.0, 15.5], "tmean_avg": [12.0, 25.0]}"#.to_string()),
        conjunction: false,
        validate_only: true,
    };
    assert!(matches!(
        execute_check(&options).unwrap(),
        CheckResult::Valid
    ));
}

#[test]
fn test_dry_validation_surfaces_unbound_identifiers() {
    let options = CheckOptions {
        expression: "elevation > cutoff".to_string(),
        env: Some(r#"{"elevation": [120.0, 15.5]}"#.to_string()),
        conjunction: false,
        validate_only: true,
    };
    match execute_check(&options) {
        Err(CliError::Eval(EvalError::UnboundIdentifier(name))) => {
            assert_eq!(name, "cutoff");
        }
        other => panic!("Expected unbound identifier, got {:?}", other),
    }
}

#[test]
fn test_dry_validation_surfaces_located_parse_errors() {
    let options = CheckOptions {
        expression: "elevation > ".to_string(),
        env: None,
        conjunction: false,
        validate_only: true,
    };
    match execute_check(&options) {
        Err(CliError::Parse(e)) => {
            assert_eq!(e.message, "unparsed input");
            assert_eq!(e.position.column, 11);
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_check_with_conjunction_grammar_rejects_full_grammar() {
    let options = CheckOptions {
        expression: "(elevation > 100)".to_string(),
        env: None,
        conjunction: true,
        validate_only: true,
    };
    assert!(matches!(execute_check(&options), Err(CliError::Parse(_))));
}

// ============================================================================
// Filtering end to end
// ============================================================================

#[test]
fn test_filter_pipeline() {
    // Validate against one row, evaluate against all, select the rows.
    let env = environment_from_json(
        r#"{"elevation": [120.0, 15.5, 300.0], "tmean_avg": [12.0, 25.0, 4.0]}"#,
    )
    .unwrap();
    let source = "elevation > 100 and tmean_avg < 20";

    let expr = parse(source).unwrap();
    expr.run(&env.checking()).unwrap();

    let mask = expr.run(&env).unwrap();
    assert_eq!(mask, Value::Mask(vec![true, false, true]));

    let rows = env.lookup("tmean_avg").unwrap().select(&mask).unwrap();
    assert_eq!(rows, Value::Series(vec![12.0, 4.0]));
}

// ============================================================================
// Re-serialization idempotence
// ============================================================================

#[test]
fn test_reserialized_trees_evaluate_identically() {
    let mut env = Environment::new();
    env.bind("true", true);
    env.bind("false", false);
    env.bind("x", 4);
    env.bind("y", 2.5);
    env.bind("col", vec![1.0, 2.0, 3.0]);

    for source in [
        "1 + 2 * 3 / 4 * 5",
        "(1 + 2) * 3 / 4 * 5",
        "x ^ 2 - y",
        "-x ^ 2",
        "not (x != 4) and true",
        "col * 2 + x",
        "col > 2 or col < 1.5",
        "1 # one\n + 2",
    ] {
        let direct = evaluate(source, &env).unwrap();
        let reserialized = parse(source).unwrap().to_string();
        let through_text = evaluate(&reserialized, &env).unwrap();
        assert_eq!(direct, through_text, "{:?} -> {:?}", source, reserialized);
    }
}
