//! Positional scanner over expression source text.
//!
//! Both grammars (the full expression grammar and the restricted conjunction
//! grammar) tokenize inline while parsing, driven by a [`Cursor`]. The cursor
//! tracks a 1-based line/column pair for error reporting and supports cheap
//! [`Checkpoint`] snapshots so operator matching can speculate and roll back.

/// A 1-based source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Snapshot of a cursor's position. Plain `Copy` data; taking one allocates
/// nothing, which matters because one is taken on every operator-match
/// attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    position: usize,
    line: usize,
    column: usize,
}

pub struct Cursor {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

/// Characters an identifier may contain.
pub(crate) fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Characters an identifier may not start with (they start a number instead).
pub(crate) fn is_ident_start_disallowed(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.'
}

/// Characters a numeric literal span may contain.
pub(crate) fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '_' || ch == '.'
}

impl Cursor {
    pub fn new(input: &str) -> Self {
        Cursor {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Step forward one character. Callers must not advance past
    /// end-of-input.
    pub fn advance(&mut self) {
        assert!(!self.at_end(), "cursor advanced past end of input");
        if self.input[self.position] == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    pub fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
    }

    /// Consume a `#` comment through the end of the line, leaving the cursor
    /// on the newline itself. Returns whether a comment was consumed.
    pub fn skip_comment(&mut self) -> bool {
        if self.current_char() != Some('#') {
            return false;
        }
        self.advance();
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
        true
    }

    /// Consume one whitespace character or one comment.
    pub fn skip_whitespace(&mut self) -> bool {
        if self.skip_comment() {
            return true;
        }
        match self.current_char() {
            Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    /// Consume every run of whitespace and comments at the cursor.
    pub fn skip_all(&mut self) -> bool {
        let mut any_skipped = false;
        while self.skip_whitespace() {
            any_skipped = true;
        }
        any_skipped
    }

    /// Greedily consume characters of one class. Returns `None` without
    /// moving if the first character fails the class; otherwise returns the
    /// consumed span with trailing whitespace and comments already skipped.
    pub fn scan_run(&mut self, class: fn(char) -> bool) -> Option<String> {
        if !self.current_char().is_some_and(class) {
            return None;
        }
        let mut span = String::new();
        while let Some(ch) = self.current_char() {
            if !class(ch) {
                break;
            }
            span.push(ch);
            self.advance();
        }
        self.skip_all();
        Some(span)
    }

    /// Case-insensitive match of an ASCII operator spelling at the cursor,
    /// without consuming it.
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        symbol.chars().enumerate().all(|(offset, expected)| {
            self.peek_char(offset)
                .is_some_and(|ch| ch.to_ascii_lowercase() == expected)
        })
    }

    /// Boundary rule for keyword-style operators: the last character of a
    /// `width`-wide match and the character after it must not both be
    /// identifier characters, so `andy` never lexes as `and` + `y`.
    pub fn is_boundary(&self, width: usize) -> bool {
        !(self.peek_char(width - 1).is_some_and(is_ident_char)
            && self.peek_char(width).is_some_and(is_ident_char))
    }
}

#[test]
fn test_line_column_tracking() {
    let mut cursor = Cursor::new("ab\ncd");
    assert_eq!(cursor.position(), Position { line: 1, column: 1 });
    cursor.advance_by(3);
    assert_eq!(cursor.position(), Position { line: 2, column: 1 });
    cursor.advance();
    assert_eq!(cursor.position(), Position { line: 2, column: 2 });
}

#[test]
fn test_checkpoint_restore() {
    let mut cursor = Cursor::new("x < 10\ny");
    cursor.advance_by(2);
    let checkpoint = cursor.checkpoint();
    cursor.advance_by(5);
    assert_eq!(cursor.position(), Position { line: 2, column: 1 });
    cursor.restore(checkpoint);
    assert_eq!(cursor.position(), Position { line: 1, column: 3 });
    assert_eq!(cursor.current_char(), Some('<'));
}

#[test]
fn test_skip_comment_stops_at_newline() {
    let mut cursor = Cursor::new("# note\nx");
    assert!(cursor.skip_comment());
    assert_eq!(cursor.current_char(), Some('\n'));
    cursor.skip_all();
    assert_eq!(cursor.current_char(), Some('x'));
}

#[test]
fn test_scan_run_skips_trailing_whitespace() {
    let mut cursor = Cursor::new("abc_1  # tail\n< 2");
    let span = cursor.scan_run(is_ident_char);
    assert_eq!(span.as_deref(), Some("abc_1"));
    assert_eq!(cursor.current_char(), Some('<'));
    assert!(cursor.scan_run(is_ident_char).is_none());
}
