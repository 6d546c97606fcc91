//! Validate and evaluate expressions against a JSON environment.

use super::{CliError, environment_from_json, value_to_json};
use crate::{ConjunctionParser, Environment, Parser};

/// Options for the check/eval pipeline
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to parse
    pub expression: String,
    /// JSON object of identifier bindings
    pub env: Option<String>,
    /// Parse with the restricted conjunction grammar
    pub conjunction: bool,
    /// Stop after dry validation against the one-row checking environment
    pub validate_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Parsed, and dry-validated when an environment was given
    Valid,
    /// Evaluated successfully with JSON output
    Value(serde_json::Value),
}

/// Parse the expression, then either dry-validate it against the reduced
/// checking environment or evaluate it in full.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expr = if options.conjunction {
        ConjunctionParser::new(&options.expression).parse()
    } else {
        Parser::new(&options.expression).parse()
    }?;

    let env = match &options.env {
        Some(json) => environment_from_json(json)?,
        None => {
            let mut env = Environment::new();
            env.bind("true", true);
            env.bind("false", false);
            env
        }
    };

    if options.validate_only {
        // One representative row per binding is enough to surface unbound
        // identifiers and type errors without touching the full columns.
        expr.run(&env.checking())?;
        return Ok(CheckResult::Valid);
    }

    let result = expr.run(&env)?;
    Ok(CheckResult::Value(value_to_json(&result)))
}
