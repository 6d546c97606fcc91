use crate::evaluator::EvalError;

/// A value an expression can evaluate to or an environment can bind.
///
/// The scalar variants (`Boolean`, `Integer`, `Float`) cover ordinary
/// single-value evaluation. `Series` and `Mask` are the columnar variants:
/// a series is a column of numbers, a mask the like-shaped column of
/// booleans a comparison over it produces. Every operator is elementwise
/// over the columnar variants, so the same parsed expression filters one
/// row or a whole table depending solely on what the environment binds.
///
/// # Numeric equality
///
/// Integers and floats compare numerically across representations, because
/// arithmetic moves between them: `10 / 2` is `Integer(5)` while
/// `10.0 / 2` collapses through the same division to the same value.
///
/// ```
/// use uel_lang::Value;
///
/// assert_eq!(Value::Integer(6), Value::Float(6.0));
/// assert_eq!(Value::Series(vec![1.0, 2.0]), Value::Series(vec![1.0, 2.0]));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Boolean scalar. `true`/`false` reach expressions as environment
    /// bindings, not grammar keywords.
    Boolean(bool),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// Column of numbers; arithmetic and comparison apply elementwise
    Series(Vec<f64>),

    /// Column of booleans, as produced by an elementwise comparison
    Mask(Vec<bool>),
}

impl Value {
    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Series(_) => "series",
            Value::Mask(_) => "mask",
        }
    }

    /// The numeric value of a scalar, if it is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Row count of a columnar value, `None` for scalars.
    pub fn row_count(&self) -> Option<usize> {
        match self {
            Value::Series(xs) => Some(xs.len()),
            Value::Mask(xs) => Some(xs.len()),
            _ => None,
        }
    }

    /// Boolean-mask selection: keep the rows where `mask` is true.
    ///
    /// Scalars pass through unchanged, which is what makes them and columns
    /// interchangeable in an environment; columnar values are filtered
    /// row-by-row and must match the mask's length.
    ///
    /// ```
    /// use uel_lang::Value;
    ///
    /// let column = Value::Series(vec![120.0, 15.5, 300.0]);
    /// let mask = Value::Mask(vec![true, false, true]);
    /// assert_eq!(
    ///     column.select(&mask).unwrap(),
    ///     Value::Series(vec![120.0, 300.0])
    /// );
    /// assert_eq!(Value::Integer(7).select(&mask).unwrap(), Value::Integer(7));
    /// ```
    pub fn select(&self, mask: &Value) -> Result<Value, EvalError> {
        let Value::Mask(keep) = mask else {
            return Err(EvalError::TypeError(format!(
                "selection mask must be a mask, got {}",
                mask.type_name()
            )));
        };
        match self {
            Value::Series(xs) => {
                if xs.len() != keep.len() {
                    return Err(EvalError::LengthMismatch {
                        left: xs.len(),
                        right: keep.len(),
                    });
                }
                Ok(Value::Series(
                    xs.iter()
                        .zip(keep)
                        .filter(|&(_, &k)| k)
                        .map(|(x, _)| *x)
                        .collect(),
                ))
            }
            Value::Mask(xs) => {
                if xs.len() != keep.len() {
                    return Err(EvalError::LengthMismatch {
                        left: xs.len(),
                        right: keep.len(),
                    });
                }
                Ok(Value::Mask(
                    xs.iter()
                        .zip(keep)
                        .filter(|&(_, &k)| k)
                        .map(|(x, _)| *x)
                        .collect(),
                ))
            }
            scalar => Ok(scalar.clone()),
        }
    }
}

/// Numeric equality crosses the integer/float divide; everything else is
/// structural.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                *a as f64 == *b
            }
            (Value::Series(a), Value::Series(b)) => a == b,
            (Value::Mask(a), Value::Mask(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Vec<f64>> for Value {
    fn from(xs: Vec<f64>) -> Self {
        Value::Series(xs)
    }
}

impl From<Vec<bool>> for Value {
    fn from(xs: Vec<bool>) -> Self {
        Value::Mask(xs)
    }
}
