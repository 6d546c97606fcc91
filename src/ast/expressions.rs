use crate::ast::{BinOp, UnaryOp};

/// Abstract Syntax Tree node representing a parsed expression.
///
/// A successfully parsed tree is total: every node has all of its children,
/// and no partial node is ever handed to a caller. Evaluation is defined by
/// [`Expr::run`](crate::evaluator) against an
/// [`Environment`](crate::Environment).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal integer
    ///
    /// # Example
    /// ```text
    /// 42
    /// ```
    Integer(i64),

    /// Literal floating point number
    ///
    /// # Example
    /// ```text
    /// 42.5
    /// ```
    Float(f64),

    /// Unresolved variable reference, looked up in the environment at
    /// evaluation time. `true` and `false` are identifiers too, bound by the
    /// caller rather than baked into the grammar.
    Identifier(String),

    /// Parenthesized subexpression. Purely a parsing construct; evaluation
    /// passes straight through to the inner expression.
    Group(Box<Expr>),

    /// Prefix operation (`not x`, `-x`)
    UnaryOp { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation (logical, comparison, arithmetic)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Re-serialization. Every operand is parenthesized, so the printed text
/// re-parses to a tree that evaluates identically (groups are transparent).
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Integer(n) => write!(f, "{}", n),
            Expr::Float(n) => write!(f, "{}", n),
            Expr::Identifier(name) => write!(f, "{}", name),
            Expr::Group(inner) => write!(f, "({})", inner),
            Expr::UnaryOp { op, operand } => write!(f, "{} ({})", op, operand),
            Expr::BinaryOp { op, left, right } => {
                write!(f, "({}) {} ({})", left, op, right)
            }
        }
    }
}
