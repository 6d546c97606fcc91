//! Restricted filter grammar: comparisons joined by `and`.
//!
//! This grammar accepts only `identifier comparator literal` clauses
//! (`elevation > 100 and tmean_avg <= 21.5`) plus an identifier-only entry
//! point. It exists to validate structured filter state round-tripped
//! through text: anything the filter editor cannot represent — disjunction,
//! parentheses, arithmetic — is a parse error here even though the full
//! grammar accepts it. The cursor and lexical primitives are shared with
//! [`Parser`](crate::Parser), so identical source text tokenizes identically
//! in both grammars.

use crate::ast::operators::{self, OpTable};
use crate::ast::{BinOp, Expr, UnaryOp};
use crate::cursor::Cursor;
use crate::parser::{ParseError, scan_identifier, scan_number};
use crate::value::Value;

type Rule = fn(&mut ConjunctionParser) -> Result<Option<Expr>, ParseError>;

pub struct ConjunctionParser {
    cursor: Cursor,
}

impl ConjunctionParser {
    pub fn new(source: &str) -> Self {
        ConjunctionParser {
            cursor: Cursor::new(source),
        }
    }

    fn error_here(&self, message: &str) -> ParseError {
        ParseError::new(message, self.cursor.position())
    }

    /// Parse a complete conjunction: a single comparison or a left-nested
    /// `and` chain of them, requiring end of input.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        self.cursor.skip_all();
        let expr = self.parse_conjunction()?;
        if !self.cursor.at_end() {
            return Err(self.error_here("unparsed input"));
        }
        Ok(expr)
    }

    /// Parse exactly one bare identifier, used to check that a selection
    /// expression names a single variable and nothing else.
    pub fn parse_identifier_only(&mut self) -> Result<Expr, ParseError> {
        self.cursor.skip_all();
        match scan_identifier(&mut self.cursor) {
            Some(ident) if self.cursor.at_end() => Ok(ident),
            Some(_) => Err(self.error_here("unparsed input")),
            None if self.cursor.at_end() => Err(self.error_here("identifier expected")),
            None => Err(self.error_here("unparsed input")),
        }
    }

    fn parse_conjunction(&mut self) -> Result<Expr, ParseError> {
        let mut value = self.parse_comparison()?;
        while !self.cursor.at_end() {
            let Some((op, rhs)) =
                self.parse_op_and_rhs(Self::comparison_rule, operators::CONJUNCTION_OPS)?
            else {
                break;
            };
            value = Expr::BinaryOp {
                op,
                left: Box::new(value),
                right: Box::new(rhs),
            };
        }
        Ok(value)
    }

    fn comparison_rule(parser: &mut Self) -> Result<Option<Expr>, ParseError> {
        parser.parse_comparison().map(Some)
    }

    /// `identifier comparator value`. Unlike the full grammar there is no
    /// graceful fallback: a missing identifier or comparator fails the parse
    /// on the spot.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let Some(lhs) = scan_identifier(&mut self.cursor) else {
            return Err(self.error_here("identifier expected"));
        };
        let Some((op, rhs)) =
            self.parse_op_and_rhs(Self::parse_signed_value, operators::COMPARISON_OPS)?
        else {
            return Err(self.error_here("comparison expected"));
        };
        Ok(Expr::BinaryOp {
            op,
            left: Box::new(lhs),
            right: Box::new(rhs),
        })
    }

    /// `["-"] number` — the only arithmetic this grammar allows.
    fn parse_signed_value(&mut self) -> Result<Option<Expr>, ParseError> {
        if let Some((op, operand)) =
            self.parse_op_and_rhs(Self::number_rule, operators::VALUE_NEGATION_OPS)?
        {
            return Ok(Some(Expr::UnaryOp {
                op,
                operand: Box::new(operand),
            }));
        }
        scan_number(&mut self.cursor)
    }

    fn number_rule(parser: &mut Self) -> Result<Option<Expr>, ParseError> {
        scan_number(&mut parser.cursor)
    }

    /// Same speculative operator matching as the full parser: consume a
    /// boundary-safe spelling, parse the right-hand side, restore on a
    /// no-node result.
    fn parse_op_and_rhs<K: Copy>(
        &mut self,
        operand: Rule,
        ops: OpTable<K>,
    ) -> Result<Option<(K, Expr)>, ParseError> {
        let checkpoint = self.cursor.checkpoint();
        for &(op, spellings) in ops {
            for &spelling in spellings {
                if self.cursor.matches_symbol(spelling) && self.cursor.is_boundary(spelling.len())
                {
                    self.cursor.advance_by(spelling.len());
                    self.cursor.skip_all();
                    if let Some(rhs) = operand(self)? {
                        return Ok(Some((op, rhs)));
                    }
                    self.cursor.restore(checkpoint);
                }
            }
        }
        Ok(None)
    }
}

/// One clause of a conjunction: `identifier comparator value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub identifier: String,
    pub comparator: BinOp,
    pub value: Value,
}

/// Recover the ordered clause list from a parsed conjunction, for rebuilding
/// filter-editor state from free text. Returns `None` for trees that are not
/// a conjunction of simple comparisons (anything [`ConjunctionParser::parse`]
/// produces reconstructs).
pub fn clauses(expr: &Expr) -> Option<Vec<Clause>> {
    let mut list = Vec::new();
    collect(expr, &mut list)?;
    Some(list)
}

fn collect(expr: &Expr, into: &mut Vec<Clause>) -> Option<()> {
    match expr {
        Expr::BinaryOp {
            op: BinOp::And,
            left,
            right,
        } => {
            collect(left, into)?;
            into.push(clause_of(right)?);
            Some(())
        }
        other => {
            into.push(clause_of(other)?);
            Some(())
        }
    }
}

fn clause_of(expr: &Expr) -> Option<Clause> {
    let Expr::BinaryOp { op, left, right } = expr else {
        return None;
    };
    let Expr::Identifier(name) = left.as_ref() else {
        return None;
    };
    let comparator = match op {
        BinOp::LessThan
        | BinOp::LessEqual
        | BinOp::Equal
        | BinOp::NotEqual
        | BinOp::GreaterThan
        | BinOp::GreaterEqual => *op,
        _ => return None,
    };
    Some(Clause {
        identifier: name.clone(),
        comparator,
        value: literal_value(right)?,
    })
}

fn literal_value(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Integer(n) => Some(Value::Integer(*n)),
        Expr::Float(x) => Some(Value::Float(*x)),
        Expr::UnaryOp {
            op: UnaryOp::Negate,
            operand,
        } => match operand.as_ref() {
            Expr::Integer(n) => Some(Value::Integer(-n)),
            Expr::Float(x) => Some(Value::Float(-x)),
            _ => None,
        },
        _ => None,
    }
}
