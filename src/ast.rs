//! # UEL - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for UEL expressions.
//!
//! - **[expressions]** - Expression nodes (literals, identifiers, groups,
//!   operations)
//! - **[operators]** - Binary and prefix operator kinds with their accepted
//!   spellings
//!
//! Trees are produced by [`Parser`](crate::Parser) (full grammar) or
//! [`ConjunctionParser`](crate::ConjunctionParser) (restricted filter
//! grammar) and evaluated with [`Expr::run`](crate::evaluator) against an
//! environment of identifier bindings and optional operator overrides.

pub mod expressions;
pub mod operators;

pub use expressions::Expr;
pub use operators::{BinOp, UnaryOp};
