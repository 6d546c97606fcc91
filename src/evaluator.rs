use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};

use crate::ast::{BinOp, Expr, UnaryOp};
use crate::value::Value;

/// Errors that can occur while evaluating an expression.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// Operation applied to operands that do not support it
    TypeError(String),

    /// Identifier with no binding in the environment
    UnboundIdentifier(String),

    /// Division by a scalar zero
    DivisionByZero,

    /// Elementwise operation over columns of different lengths
    LengthMismatch { left: usize, right: usize },
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::UnboundIdentifier(name) => {
                write!(f, "Unbound identifier: '{}' is not defined", name)
            }
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::LengthMismatch { left, right } => {
                write!(f, "Length mismatch: series of length {} against {}", left, right)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// An overriding implementation of one binary operator kind.
pub type BinaryFn = Arc<dyn Fn(Value, Value) -> Result<Value, EvalError> + Send + Sync>;

/// An overriding implementation of one prefix operator kind.
pub type UnaryFn = Arc<dyn Fn(Value) -> Result<Value, EvalError> + Send + Sync>;

/// The bindings an expression is evaluated against: identifier values plus
/// optional per-kind operator overrides. Read-only during evaluation; the
/// evaluator consults the override for an operator kind first and falls back
/// to the default table.
#[derive(Default, Clone)]
pub struct Environment {
    bindings: HashMap<String, Value>,
    binary_overrides: HashMap<BinOp, BinaryFn>,
    unary_overrides: HashMap<UnaryOp, UnaryFn>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an identifier to a value.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(name.into(), value.into());
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Replace the default semantics of one binary operator kind for
    /// evaluations against this environment.
    pub fn override_binary<F>(&mut self, op: BinOp, f: F)
    where
        F: Fn(Value, Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.binary_overrides.insert(op, Arc::new(f));
    }

    /// Replace the default semantics of one prefix operator kind.
    pub fn override_unary<F>(&mut self, op: UnaryOp, f: F)
    where
        F: Fn(Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.unary_overrides.insert(op, Arc::new(f));
    }

    pub fn binary_override(&self, op: BinOp) -> Option<&BinaryFn> {
        self.binary_overrides.get(&op)
    }

    pub fn unary_override(&self, op: UnaryOp) -> Option<&UnaryFn> {
        self.unary_overrides.get(&op)
    }

    /// Derive the reduced environment used for dry validation: every column
    /// cut down to its first row, overrides shared. Running an expression
    /// against this catches unbound identifiers and type errors without
    /// touching the full data.
    pub fn checking(&self) -> Environment {
        let bindings = self
            .bindings
            .iter()
            .map(|(name, value)| {
                let reduced = match value {
                    Value::Series(xs) => Value::Series(xs.iter().take(1).copied().collect()),
                    Value::Mask(xs) => Value::Mask(xs.iter().take(1).copied().collect()),
                    scalar => scalar.clone(),
                };
                (name.clone(), reduced)
            })
            .collect();
        Environment {
            bindings,
            binary_overrides: self.binary_overrides.clone(),
            unary_overrides: self.unary_overrides.clone(),
        }
    }
}

impl Expr {
    /// Evaluate this expression against an environment.
    ///
    /// Both operands of a binary operation are always evaluated — there is
    /// no short-circuiting, since either side may be columnar and
    /// short-circuit evaluation is undefined for columns. Group nodes are
    /// transparent. Identifier resolution failures surface as
    /// [`EvalError::UnboundIdentifier`] naming the identifier.
    pub fn run(&self, env: &Environment) -> Result<Value, EvalError> {
        match self {
            Expr::Integer(n) => Ok(Value::Integer(*n)),
            Expr::Float(x) => Ok(Value::Float(*x)),
            Expr::Identifier(name) => env
                .lookup(name)
                .cloned()
                .ok_or_else(|| EvalError::UnboundIdentifier(name.clone())),
            Expr::Group(inner) => inner.run(env),
            Expr::UnaryOp { op, operand } => {
                let value = operand.run(env)?;
                match env.unary_override(*op) {
                    Some(f) => f(value),
                    None => apply_unary(*op, &value),
                }
            }
            Expr::BinaryOp { op, left, right } => {
                let lhs = left.run(env)?;
                let rhs = right.run(env)?;
                match env.binary_override(*op) {
                    Some(f) => f(lhs, rhs),
                    None => apply_binary(*op, &lhs, &rhs),
                }
            }
        }
    }
}

/// Default semantics for a binary operator kind. Total over every kind;
/// statically initialized, never mutated, safe to call from any number of
/// concurrent evaluations.
pub fn apply_binary(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinOp::Or | BinOp::And => logical(op, left, right),
        BinOp::Add => add(left, right),
        BinOp::Subtract => subtract(left, right),
        BinOp::Multiply => multiply(left, right),
        BinOp::Divide => divide(left, right),
        BinOp::Power => power(left, right),
        BinOp::LessThan
        | BinOp::LessEqual
        | BinOp::Equal
        | BinOp::NotEqual
        | BinOp::GreaterThan
        | BinOp::GreaterEqual => compare(op, left, right),
    }
}

/// Default semantics for a prefix operator kind.
pub fn apply_unary(op: UnaryOp, value: &Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Not => match truth_rows(value) {
            Some(xs) => Ok(Value::Mask(xs.into_iter().map(|b| !b).collect())),
            None => Ok(Value::Boolean(!truthy(value)?)),
        },
        UnaryOp::Negate => match value {
            Value::Integer(n) => Ok(Value::Integer(-n)),
            Value::Float(x) => Ok(Value::Float(-x)),
            Value::Series(xs) => Ok(Value::Series(xs.iter().map(|x| -x).collect())),
            v => Err(EvalError::TypeError(format!("cannot negate {}", v.type_name()))),
        },
    }
}

/// Mixed integer/float arithmetic goes through `Decimal` so results landing
/// on a whole number come back as integers: `1 + (10 / 2)` equals `6`, and
/// `2.5 * 2` equals `5`.
fn mixed(
    a: Option<Decimal>,
    b: Option<Decimal>,
    apply: fn(Decimal, Decimal) -> Decimal,
    fallback: f64,
) -> Value {
    if let Some(ad) = a
        && let Some(bd) = b
    {
        let rd = apply(ad, bd);
        if rd.is_integer()
            && let Some(r) = rd.to_i64()
        {
            return Value::Integer(r);
        } else if let Some(r) = rd.to_f64() {
            return Value::Float(r);
        }
    }
    Value::Float(fallback)
}

fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
        (Value::Integer(a), Value::Float(b)) => Ok(mixed(
            Decimal::from_i64(*a),
            Decimal::from_f64(*b),
            |x, y| x + y,
            *a as f64 + b,
        )),
        (Value::Float(a), Value::Integer(b)) => Ok(mixed(
            Decimal::from_f64(*a),
            Decimal::from_i64(*b),
            |x, y| x + y,
            a + *b as f64,
        )),
        (Value::Series(_), _) | (_, Value::Series(_)) => elementwise(BinOp::Add, left, right),
        (a, b) => Err(EvalError::TypeError(format!(
            "cannot add {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn subtract(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a - b)),
        (Value::Integer(a), Value::Float(b)) => Ok(mixed(
            Decimal::from_i64(*a),
            Decimal::from_f64(*b),
            |x, y| x - y,
            *a as f64 - b,
        )),
        (Value::Float(a), Value::Integer(b)) => Ok(mixed(
            Decimal::from_f64(*a),
            Decimal::from_i64(*b),
            |x, y| x - y,
            a - *b as f64,
        )),
        (Value::Series(_), _) | (_, Value::Series(_)) => elementwise(BinOp::Subtract, left, right),
        (a, b) => Err(EvalError::TypeError(format!(
            "cannot subtract {} from {}",
            b.type_name(),
            a.type_name()
        ))),
    }
}

fn multiply(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a * b)),
        (Value::Integer(a), Value::Float(b)) => Ok(mixed(
            Decimal::from_i64(*a),
            Decimal::from_f64(*b),
            |x, y| x * y,
            *a as f64 * b,
        )),
        (Value::Float(a), Value::Integer(b)) => Ok(mixed(
            Decimal::from_f64(*a),
            Decimal::from_i64(*b),
            |x, y| x * y,
            a * *b as f64,
        )),
        (Value::Series(_), _) | (_, Value::Series(_)) => elementwise(BinOp::Multiply, left, right),
        (a, b) => Err(EvalError::TypeError(format!(
            "cannot multiply {} by {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn divide(left: &Value, right: &Value) -> Result<Value, EvalError> {
    // A scalar zero divisor fails the whole evaluation. Zeros inside a
    // divisor column divide elementwise IEEE-754 style instead.
    if right.as_number() == Some(0.0) {
        return Err(EvalError::DivisionByZero);
    }
    match (left, right) {
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),
        (Value::Integer(a), Value::Integer(b)) => {
            if a % b == 0 {
                Ok(Value::Integer(a / b))
            } else {
                Ok(Value::Float(*a as f64 / *b as f64))
            }
        }
        (Value::Integer(a), Value::Float(b)) => Ok(mixed(
            Decimal::from_i64(*a),
            Decimal::from_f64(*b),
            |x, y| x / y,
            *a as f64 / b,
        )),
        (Value::Float(a), Value::Integer(b)) => Ok(mixed(
            Decimal::from_f64(*a),
            Decimal::from_i64(*b),
            |x, y| x / y,
            a / *b as f64,
        )),
        (Value::Series(_), _) | (_, Value::Series(_)) => elementwise(BinOp::Divide, left, right),
        (a, b) => Err(EvalError::TypeError(format!(
            "cannot divide {} by {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn power(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            if let Ok(exp) = u32::try_from(*b)
                && let Some(r) = a.checked_pow(exp)
            {
                return Ok(Value::Integer(r));
            }
            // Negative or overflowing exponents drop to floats.
            Ok(Value::Float((*a as f64).powf(*b as f64)))
        }
        (Value::Series(_), _) | (_, Value::Series(_)) => elementwise(BinOp::Power, left, right),
        (a, b) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Ok(Value::Float(x.powf(y))),
            _ => Err(EvalError::TypeError(format!(
                "cannot raise {} to {}",
                a.type_name(),
                b.type_name()
            ))),
        },
    }
}

/// Arithmetic with at least one series operand, elementwise with scalar
/// broadcast.
fn elementwise(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let f = |a: f64, b: f64| -> f64 {
        match op {
            BinOp::Add => a + b,
            BinOp::Subtract => a - b,
            BinOp::Multiply => a * b,
            BinOp::Divide => a / b,
            BinOp::Power => a.powf(b),
            _ => unreachable!("not an arithmetic operator: {op}"),
        }
    };
    match (left, right) {
        (Value::Series(xs), Value::Series(ys)) => {
            check_rows(xs.len(), ys.len())?;
            Ok(Value::Series(
                xs.iter().zip(ys).map(|(a, b)| f(*a, *b)).collect(),
            ))
        }
        (Value::Series(xs), scalar) => {
            let y = number_operand(op, scalar, left)?;
            Ok(Value::Series(xs.iter().map(|a| f(*a, y)).collect()))
        }
        (scalar, Value::Series(ys)) => {
            let x = number_operand(op, scalar, right)?;
            Ok(Value::Series(ys.iter().map(|b| f(x, *b)).collect()))
        }
        _ => unreachable!("elementwise called without a series operand"),
    }
}

fn number_operand(op: BinOp, scalar: &Value, other: &Value) -> Result<f64, EvalError> {
    scalar.as_number().ok_or_else(|| {
        EvalError::TypeError(format!(
            "cannot apply '{}' to {} and {}",
            op,
            other.type_name(),
            scalar.type_name()
        ))
    })
}

fn compare(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let f = |a: f64, b: f64| -> bool {
        match op {
            BinOp::LessThan => a < b,
            BinOp::LessEqual => a <= b,
            BinOp::Equal => a == b,
            BinOp::NotEqual => a != b,
            BinOp::GreaterThan => a > b,
            BinOp::GreaterEqual => a >= b,
            _ => unreachable!("not a comparison operator: {op}"),
        }
    };
    match (left, right) {
        (Value::Series(xs), Value::Series(ys)) => {
            check_rows(xs.len(), ys.len())?;
            Ok(Value::Mask(
                xs.iter().zip(ys).map(|(a, b)| f(*a, *b)).collect(),
            ))
        }
        (Value::Series(xs), scalar) => {
            let y = number_operand(op, scalar, left)?;
            Ok(Value::Mask(xs.iter().map(|a| f(*a, y)).collect()))
        }
        (scalar, Value::Series(ys)) => {
            let x = number_operand(op, scalar, right)?;
            Ok(Value::Mask(ys.iter().map(|b| f(x, *b)).collect()))
        }
        (Value::Boolean(a), Value::Boolean(b)) => match op {
            BinOp::Equal => Ok(Value::Boolean(a == b)),
            BinOp::NotEqual => Ok(Value::Boolean(a != b)),
            _ => Err(EvalError::TypeError(format!(
                "cannot order booleans with '{}'",
                op
            ))),
        },
        (Value::Mask(xs), Value::Mask(ys)) => match op {
            BinOp::Equal => {
                check_rows(xs.len(), ys.len())?;
                Ok(Value::Mask(xs.iter().zip(ys).map(|(a, b)| a == b).collect()))
            }
            BinOp::NotEqual => {
                check_rows(xs.len(), ys.len())?;
                Ok(Value::Mask(xs.iter().zip(ys).map(|(a, b)| a != b).collect()))
            }
            _ => Err(EvalError::TypeError(format!(
                "cannot order masks with '{}'",
                op
            ))),
        },
        (a, b) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Ok(Value::Boolean(f(x, y))),
            _ => Err(EvalError::TypeError(format!(
                "cannot compare {} {} {}",
                a.type_name(),
                op,
                b.type_name()
            ))),
        },
    }
}

/// Non-short-circuit logical and/or. Scalars use numeric truthiness
/// (nonzero is true); columnar operands combine elementwise, broadcasting a
/// scalar against a column.
fn logical(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let f = |a: bool, b: bool| -> bool {
        match op {
            BinOp::Or => a || b,
            BinOp::And => a && b,
            _ => unreachable!("not a logical operator: {op}"),
        }
    };
    match (truth_rows(left), truth_rows(right)) {
        (Some(xs), Some(ys)) => {
            check_rows(xs.len(), ys.len())?;
            Ok(Value::Mask(
                xs.into_iter().zip(ys).map(|(a, b)| f(a, b)).collect(),
            ))
        }
        (Some(xs), None) => {
            let b = truthy(right)?;
            Ok(Value::Mask(xs.into_iter().map(|a| f(a, b)).collect()))
        }
        (None, Some(ys)) => {
            let a = truthy(left)?;
            Ok(Value::Mask(ys.into_iter().map(|b| f(a, b)).collect()))
        }
        (None, None) => Ok(Value::Boolean(f(truthy(left)?, truthy(right)?))),
    }
}

/// Elementwise truth of a columnar operand; `None` for scalars.
fn truth_rows(value: &Value) -> Option<Vec<bool>> {
    match value {
        Value::Mask(xs) => Some(xs.clone()),
        Value::Series(xs) => Some(xs.iter().map(|x| *x != 0.0).collect()),
        _ => None,
    }
}

/// Scalar truthiness: booleans as themselves, numbers by nonzero.
fn truthy(value: &Value) -> Result<bool, EvalError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Integer(n) => Ok(*n != 0),
        Value::Float(x) => Ok(*x != 0.0),
        v => Err(EvalError::TypeError(format!(
            "{} has no single truth value",
            v.type_name()
        ))),
    }
}

fn check_rows(left: usize, right: usize) -> Result<(), EvalError> {
    if left == right {
        Ok(())
    } else {
        Err(EvalError::LengthMismatch { left, right })
    }
}
