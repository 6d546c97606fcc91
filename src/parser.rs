use crate::ast::operators::{self, OpTable};
use crate::ast::{BinOp, Expr, UnaryOp};
use crate::cursor::{
    Cursor, Position, is_ident_char, is_ident_start_disallowed, is_number_char,
};

/// A parse failure with its exact 1-based source location.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error at {}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Scan an identifier at the cursor: `[A-Za-z_][A-Za-z0-9_]*`. A leading
/// digit or `.` is not an identifier (it starts a number), so this returns
/// `None` without consuming anything.
pub(crate) fn scan_identifier(cursor: &mut Cursor) -> Option<Expr> {
    if cursor.current_char().is_some_and(is_ident_start_disallowed) {
        return None;
    }
    cursor.scan_run(is_ident_char).map(Expr::Identifier)
}

/// Scan a numeric literal at the cursor. The span is the greedy `[0-9_.]`
/// run; a malformed span (stray underscore, second `.`) is a located error
/// at the span's start rather than a silent truncation.
pub(crate) fn scan_number(cursor: &mut Cursor) -> Result<Option<Expr>, ParseError> {
    let start = cursor.position();
    let Some(span) = cursor.scan_run(is_number_char) else {
        return Ok(None);
    };
    match numeric_literal(&span) {
        Some(expr) => Ok(Some(expr)),
        None => Err(ParseError::new(
            format!("malformed number '{}'", span),
            start,
        )),
    }
}

/// Underscores are digit separators and must sit between digits; at most one
/// decimal point. `1_000`, `1.`, and `.5` are numbers; `1__0`, `1_`, and
/// `1.2.3` are not.
fn numeric_literal(span: &str) -> Option<Expr> {
    let chars: Vec<char> = span.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' {
            let digit_before = i > 0 && chars[i - 1].is_ascii_digit();
            let digit_after = chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());
            if !digit_before || !digit_after {
                return None;
            }
        }
    }
    let digits: String = chars.iter().filter(|&&c| c != '_').collect();
    if digits.matches('.').count() > 1 || digits == "." {
        return None;
    }
    if digits.contains('.') {
        digits.parse::<f64>().ok().map(Expr::Float)
    } else {
        match digits.parse::<i64>() {
            Ok(n) => Some(Expr::Integer(n)),
            // Wider than i64: keep the value, lose integerness.
            Err(_) => digits.parse::<f64>().ok().map(Expr::Float),
        }
    }
}

type Rule = fn(&mut Parser) -> Result<Option<Expr>, ParseError>;

/// Recursive-descent parser for the full expression grammar.
///
/// Each precedence level is one method, loosest binding first: disjunction,
/// conjunction, boolean negation, comparison, additive, multiplicative,
/// arithmetic negation, exponentiation, primary. Tokenization happens inline
/// at the cursor; operator matching speculates with checkpoint/restore, so a
/// matched operator whose right-hand side turns out not to parse is rolled
/// back instead of raising, leaving the trailing text for the caller's
/// end-of-input check.
pub struct Parser {
    cursor: Cursor,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Parser {
            cursor: Cursor::new(source),
        }
    }

    fn error_here(&self, message: &str) -> ParseError {
        ParseError::new(message, self.cursor.position())
    }

    /// Parse a complete expression, requiring end of input. Trailing text
    /// that no grammar rule consumed is an "unparsed input" error located at
    /// its first character.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        self.cursor.skip_all();
        let expr = self.parse_expression()?;
        if !self.cursor.at_end() {
            return Err(self.error_here("unparsed input"));
        }
        expr.ok_or_else(|| self.error_here("expression expected"))
    }

    fn parse_expression(&mut self) -> Result<Option<Expr>, ParseError> {
        self.parse_disjunction()
    }

    fn parse_disjunction(&mut self) -> Result<Option<Expr>, ParseError> {
        self.parse_operation(Self::parse_conjunction, operators::DISJUNCTION_OPS)
    }

    fn parse_conjunction(&mut self) -> Result<Option<Expr>, ParseError> {
        self.parse_operation(Self::parse_bool_negation, operators::CONJUNCTION_OPS)
    }

    fn parse_bool_negation(&mut self) -> Result<Option<Expr>, ParseError> {
        self.parse_modifier(Self::parse_comparison, operators::BOOL_NEGATION_OPS)
    }

    fn parse_comparison(&mut self) -> Result<Option<Expr>, ParseError> {
        self.parse_operation(Self::parse_additive, operators::COMPARISON_OPS)
    }

    fn parse_additive(&mut self) -> Result<Option<Expr>, ParseError> {
        self.parse_operation(Self::parse_multiplicative, operators::ADDITIVE_OPS)
    }

    fn parse_multiplicative(&mut self) -> Result<Option<Expr>, ParseError> {
        self.parse_operation(Self::parse_value_negation, operators::MULTIPLICATIVE_OPS)
    }

    fn parse_value_negation(&mut self) -> Result<Option<Expr>, ParseError> {
        self.parse_modifier(Self::parse_exponentiation, operators::VALUE_NEGATION_OPS)
    }

    fn parse_exponentiation(&mut self) -> Result<Option<Expr>, ParseError> {
        self.parse_operation(Self::parse_primary, operators::EXPONENT_OPS)
    }

    /// Primary: parenthesized subexpression, identifier, or number.
    fn parse_primary(&mut self) -> Result<Option<Expr>, ParseError> {
        if self.cursor.current_char() != Some('(') {
            return self.parse_literal();
        }
        self.cursor.advance();
        let inner = self.parse_expression()?;
        self.cursor.skip_all();
        match self.cursor.current_char() {
            Some(')') => {
                let inner = inner.ok_or_else(|| self.error_here("expression expected"))?;
                self.cursor.advance();
                self.cursor.skip_all();
                Ok(Some(Expr::Group(Box::new(inner))))
            }
            Some(found) => Err(self.error_here(&format!(
                "subexpression ended unexpectedly, found '{}'",
                found
            ))),
            None => Err(self.error_here("subexpression ended unexpectedly, found end of input")),
        }
    }

    fn parse_literal(&mut self) -> Result<Option<Expr>, ParseError> {
        if let Some(ident) = scan_identifier(&mut self.cursor) {
            return Ok(Some(ident));
        }
        scan_number(&mut self.cursor)
    }

    /// One left-associative binary level: parse an operand at the tighter
    /// level, then fold in operators from this level's table while they
    /// match.
    fn parse_operation(
        &mut self,
        operand: Rule,
        ops: OpTable<BinOp>,
    ) -> Result<Option<Expr>, ParseError> {
        let Some(mut value) = operand(self)? else {
            return Ok(None);
        };
        while !self.cursor.at_end() {
            let Some((op, rhs)) = self.parse_op_and_rhs(operand, ops)? else {
                break;
            };
            value = Expr::BinaryOp {
                op,
                left: Box::new(value),
                right: Box::new(rhs),
            };
        }
        Ok(Some(value))
    }

    /// One prefix level: an operator from the table followed by an operand at
    /// the tighter level, or just the tighter level when no prefix matches.
    fn parse_modifier(
        &mut self,
        operand: Rule,
        mods: OpTable<UnaryOp>,
    ) -> Result<Option<Expr>, ParseError> {
        if let Some((op, value)) = self.parse_op_and_rhs(operand, mods)? {
            return Ok(Some(Expr::UnaryOp {
                op,
                operand: Box::new(value),
            }));
        }
        operand(self)
    }

    /// Try each spelling in the table at the cursor. On a boundary-safe match
    /// the spelling is consumed and the right-hand side parsed; if that
    /// produces no node the cursor is restored and the next spelling gets a
    /// turn. A located failure inside the right-hand side propagates.
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
