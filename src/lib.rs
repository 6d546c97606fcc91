//! # UEL — an embeddable expression language
//!
//! UEL parses and evaluates small expressions against a caller-supplied
//! [`Environment`]. Identifier bindings and operator semantics are
//! pluggable: bind scalars and an expression evaluates to a scalar; bind
//! columns ([`Value::Series`]) and the same expression evaluates
//! elementwise, with comparisons producing boolean masks for row selection.
//!
//! ## Grammar
//!
//! Operators, loosest binding first (spellings are case-insensitive):
//!
//! | level            | spellings            |
//! |------------------|----------------------|
//! | disjunction      | `or`, `\|\|`         |
//! | conjunction      | `and`, `&&`          |
//! | boolean negation | `not`, `!`           |
//! | comparison       | `<` `<=` `==` `!=` (`~=`, `<>`) `>` `>=` |
//! | additive         | `+`, `-`             |
//! | multiplicative   | `*`, `/`             |
//! | negation         | `-` (prefix)         |
//! | exponentiation   | `^`                  |
//!
//! Plus parenthesized subexpressions, `#` comments to end of line, numeric
//! literals (`1_000`, `2.5`, `.5`), and identifiers. `true` and `false` are
//! ordinary identifiers the caller binds, not keywords.
//!
//! ## Quick start
//!
//! ```
//! use uel_lang::{evaluate, Environment, Value};
//!
//! let mut env = Environment::new();
//! env.bind("elevation", vec![120.0, 15.5, 300.0]);
//! env.bind("threshold", 100.0);
//!
//! let mask = evaluate("elevation > threshold", &env).unwrap();
//! assert_eq!(mask, Value::Mask(vec![true, false, true]));
//!
//! // The mask selects rows from any like-shaped column.
//! let rows = env.lookup("elevation").unwrap().select(&mask).unwrap();
//! assert_eq!(rows, Value::Series(vec![120.0, 300.0]));
//! ```
//!
//! ## Validating before evaluating
//!
//! Parsing and evaluation are separate: [`parse`] checks structure,
//! [`Environment::checking`] derives a one-row environment that catches
//! unbound identifiers cheaply, and the restricted
//! [`ConjunctionParser`] accepts only `identifier comparator literal`
//! clauses joined by `and` so structured filter state can round-trip
//! through text (see [`conjunction::clauses`]).

pub mod ast;
pub mod cli;
pub mod conjunction;
pub mod cursor;
pub mod evaluator;
pub mod parser;
pub mod value;

pub use ast::{BinOp, Expr, UnaryOp};
pub use conjunction::{Clause, ConjunctionParser};
pub use cursor::{Cursor, Position};
pub use evaluator::{Environment, EvalError};
pub use parser::{ParseError, Parser};
pub use value::Value;

/// Any failure from a combined parse-and-evaluate call.
#[derive(Debug, Clone)]
pub enum Error {
    Parse(ParseError),
    Eval(EvalError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Eval(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Error::Eval(e)
    }
}

/// Parse a full-grammar expression without evaluating it.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    Parser::new(source).parse()
}

/// Parse and evaluate a full-grammar expression.
pub fn evaluate(source: &str, env: &Environment) -> Result<Value, Error> {
    Ok(parse(source)?.run(env)?)
}

/// Parse a restricted conjunction (`identifier comparator literal` clauses
/// joined by `and`) without evaluating it.
pub fn parse_conjunction(source: &str) -> Result<Expr, ParseError> {
    ConjunctionParser::new(source).parse()
}

/// Parse and evaluate a restricted conjunction.
pub fn evaluate_conjunction(source: &str, env: &Environment) -> Result<Value, Error> {
    Ok(parse_conjunction(source)?.run(env)?)
}

/// Parse input that must be exactly one bare identifier.
pub fn parse_identifier(source: &str) -> Result<Expr, ParseError> {
    ConjunctionParser::new(source).parse_identifier_only()
}
