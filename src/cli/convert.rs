//! Conversions between JSON and UEL values and environments.

use super::CliError;
use crate::{Environment, Value};

/// Convert a JSON value to a UEL value. Arrays become columns: an array of
/// booleans is a mask, any other array must be all numbers and becomes a
/// series.
pub fn json_to_value(v: &serde_json::Value) -> Result<Value, CliError> {
    match v {
        serde_json::Value::Bool(b) => Ok(Value::Boolean(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else if let Some(x) = n.as_f64() {
                Ok(Value::Float(x))
            } else {
                Err(CliError::InvalidBinding(format!(
                    "number out of range: {}",
                    n
                )))
            }
        }
        serde_json::Value::Array(items) => {
            if !items.is_empty() && items.iter().all(|item| item.is_boolean()) {
                Ok(Value::Mask(
                    items.iter().filter_map(|item| item.as_bool()).collect(),
                ))
            } else {
                let mut rows = Vec::with_capacity(items.len());
                for item in items {
                    let Some(x) = item.as_f64() else {
                        return Err(CliError::InvalidBinding(format!(
                            "series element is not a number: {}",
                            item
                        )));
                    };
                    rows.push(x);
                }
                Ok(Value::Series(rows))
            }
        }
        other => Err(CliError::InvalidBinding(format!(
            "unsupported binding: {}",
            other
        ))),
    }
}

/// Convert a UEL value to JSON. Non-finite floats have no JSON
/// representation and become null.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(n) => serde_json::Value::Number((*n).into()),
        Value::Float(x) => float_to_json(*x),
        Value::Series(xs) => {
            serde_json::Value::Array(xs.iter().map(|x| float_to_json(*x)).collect())
        }
        Value::Mask(xs) => {
            serde_json::Value::Array(xs.iter().map(|b| serde_json::Value::Bool(*b)).collect())
        }
    }
}

fn float_to_json(x: f64) -> serde_json::Value {
    serde_json::Number::from_f64(x)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Build an environment from a JSON object of bindings. `true` and `false`
/// are pre-bound — they are identifiers, not grammar keywords — and a
/// binding in the object may shadow them.
pub fn environment_from_json(json: &str) -> Result<Environment, CliError> {
    let mut env = Environment::new();
    env.bind("true", true);
    env.bind("false", false);
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Object(map) = parsed else {
        return Err(CliError::InvalidBinding(
            "environment must be a JSON object".to_string(),
        ));
    };
    for (name, v) in &map {
        env.bind(name.clone(), json_to_value(v)?);
    }
    Ok(env)
}
