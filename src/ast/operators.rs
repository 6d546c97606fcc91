/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    // Logical
    /// Logical OR (`or`, `||`)
    Or,
    /// Logical AND (`and`, `&&`)
    And,

    // Comparison
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`, `~=`, `<>`)
    NotEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
    /// Exponentiation (`^`)
    Power,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Boolean negation (`not`, `!`)
    Not,
    /// Arithmetic negation (`-`)
    Negate,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinOp::Or => "or",
            BinOp::And => "and",
            BinOp::LessThan => "<",
            BinOp::LessEqual => "<=",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::GreaterThan => ">",
            BinOp::GreaterEqual => ">=",
            BinOp::Add => "+",
            BinOp::Subtract => "-",
            BinOp::Multiply => "*",
            BinOp::Divide => "/",
            BinOp::Power => "^",
        };
        write!(f, "{}", symbol)
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "not"),
            UnaryOp::Negate => write!(f, "-"),
        }
    }
}

/// One precedence level's operators: each kind with its accepted spellings,
/// lowercase, tried in declared order. Matching is case-insensitive, and a
/// kind that matches but whose right-hand side fails to parse is rolled back
/// so the next spelling gets its turn (`<` then `<=` relies on this).
pub(crate) type OpTable<K> = &'static [(K, &'static [&'static str])];

pub(crate) const DISJUNCTION_OPS: OpTable<BinOp> = &[(BinOp::Or, &["||", "or"])];

pub(crate) const CONJUNCTION_OPS: OpTable<BinOp> = &[(BinOp::And, &["&&", "and"])];

pub(crate) const COMPARISON_OPS: OpTable<BinOp> = &[
    (BinOp::LessThan, &["<"]),
    (BinOp::LessEqual, &["<="]),
    (BinOp::Equal, &["=="]),
    (BinOp::NotEqual, &["!=", "~=", "<>"]),
    (BinOp::GreaterThan, &[">"]),
    (BinOp::GreaterEqual, &[">="]),
];

pub(crate) const ADDITIVE_OPS: OpTable<BinOp> =
    &[(BinOp::Add, &["+"]), (BinOp::Subtract, &["-"])];

pub(crate) const MULTIPLICATIVE_OPS: OpTable<BinOp> =
    &[(BinOp::Multiply, &["*"]), (BinOp::Divide, &["/"])];

pub(crate) const EXPONENT_OPS: OpTable<BinOp> = &[(BinOp::Power, &["^"])];

pub(crate) const BOOL_NEGATION_OPS: OpTable<UnaryOp> = &[(UnaryOp::Not, &["!", "not"])];

pub(crate) const VALUE_NEGATION_OPS: OpTable<UnaryOp> = &[(UnaryOp::Negate, &["-"])];
