//! Line-oriented splitter for SQL schema scripts.
//!
//! This is not a SQL parser. It only finds statement boundaries and drops
//! comment lines, using three fixed line rules:
//!
//! - a line starting with `--` is dropped
//! - a line containing a `/* ... */;` block is dropped (a self-contained no-op)
//! - a line containing `;` ends the pending statement
//!
//! Every other line is accumulated into the pending statement.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::Lines;

/// Matches a block comment immediately followed by the statement terminator.
static TERMINATED_BLOCK_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*.+\*/;").unwrap());

/// How a single script line is treated by the splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `-- ...` at the very start of the line
    LineComment,
    /// `/* ... */;` anywhere on the line
    TerminatedBlockComment,
    /// Contains `;` and closes the pending statement
    Terminator,
    /// Part of the pending statement
    Continuation,
}

impl LineKind {
    /// Classify one line (without its line ending).
    ///
    /// The rules are checked in order; the first match wins.
    pub fn classify(line: &str) -> Self {
        if line.starts_with("--") {
            LineKind::LineComment
        } else if TERMINATED_BLOCK_COMMENT_RE.is_match(line) {
            LineKind::TerminatedBlockComment
        } else if line.contains(';') {
            LineKind::Terminator
        } else {
            LineKind::Continuation
        }
    }
}

/// One executable statement taken from a script.
///
/// The text keeps every accumulated line, each followed by `\n`, so joining
/// statements back together reproduces a script that splits the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    text: String,
}

impl SqlStatement {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text.trim_end())
    }
}

/// Pending-statement buffer driven one line at a time.
#[derive(Debug, Default)]
pub struct StatementBuffer {
    pending: String,
}

impl StatementBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line; returns a statement when the line closes one.
    pub fn push_line(&mut self, line: &str) -> Option<SqlStatement> {
        match LineKind::classify(line) {
            LineKind::LineComment | LineKind::TerminatedBlockComment => None,
            LineKind::Terminator => {
                self.append(line);
                Some(SqlStatement {
                    text: std::mem::take(&mut self.pending),
                })
            }
            LineKind::Continuation => {
                self.append(line);
                None
            }
        }
    }

    /// End of input. Text without a terminator is discarded, never executed.
    pub fn finish(self) -> Option<SqlStatement> {
        discard_unterminated(self.pending)
    }

    /// Whether anything is waiting for a terminator.
    pub fn has_pending(&self) -> bool {
        !self.pending.trim().is_empty()
    }

    fn append(&mut self, line: &str) {
        self.pending.push_str(line);
        self.pending.push('\n');
    }
}

/// Policy for a trailing statement that never saw a `;`.
fn discard_unterminated(_pending: String) -> Option<SqlStatement> {
    None
}

/// Lazy, single-pass iterator over the statements of a script.
pub struct Statements<'a> {
    lines: Lines<'a>,
    buffer: Option<StatementBuffer>,
}

impl<'a> Iterator for Statements<'a> {
    type Item = SqlStatement;

    fn next(&mut self) -> Option<SqlStatement> {
        let buffer = self.buffer.as_mut()?;
        for line in self.lines.by_ref() {
            if let Some(stmt) = buffer.push_line(line) {
                return Some(stmt);
            }
        }
        self.buffer.take().and_then(StatementBuffer::finish)
    }
}

/// Split a script's text into statements, in source order.
pub fn split(script: &str) -> Statements<'_> {
    Statements {
        lines: script.lines(),
        buffer: Some(StatementBuffer::new()),
    }
}
