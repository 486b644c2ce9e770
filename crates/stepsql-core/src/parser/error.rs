//! Parser error types.

use std::fmt;

use thiserror::Error;

use crate::ast::Query;
use crate::lexer::Span;

/// The clause an error is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    /// SELECT field list and table.
    Select,
    /// SELECT TOP row count.
    Top,
    /// INSERT INTO table, fields and values.
    InsertInto,
    /// UPDATE table and SET list.
    Update,
    /// DELETE FROM table.
    DeleteFrom,
    /// WHERE conditions.
    Where,
    /// ORDER BY list.
    OrderBy,
    /// JOIN type and table.
    Join,
    /// JOIN ... ON conditions.
    On,
}

impl Clause {
    /// Returns the clause keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Top => "TOP",
            Self::InsertInto => "INSERT INTO",
            Self::Update => "UPDATE",
            Self::DeleteFrom => "DELETE FROM",
            Self::Where => "WHERE",
            Self::OrderBy => "ORDER BY",
            Self::Join => "JOIN",
            Self::On => "ON",
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the offending token text, or a marker for end of input.
fn describe_found(text: &str) -> String {
    if text.is_empty() {
        String::from("end of statement")
    } else {
        format!("'{text}'")
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The statement does not start with SELECT, INSERT INTO, UPDATE or
    /// DELETE FROM.
    #[error("invalid query type")]
    InvalidQueryType,

    /// A token did not fit the grammar at the current step.
    #[error("at {clause}: expected {expected}, found {}", describe_found(.found))]
    Unexpected {
        /// Clause being parsed.
        clause: Clause,
        /// What the step accepts.
        expected: &'static str,
        /// The token text that was read (empty at end of input).
        found: String,
    },

    /// The operator position held something other than a comparison.
    #[error("at {clause}: unknown operator {}", describe_found(.found))]
    UnknownOperator {
        /// Clause being parsed.
        clause: Clause,
        /// The token text that was read.
        found: String,
    },

    /// `TOP` was not followed by an unsigned integer.
    #[error("at TOP: invalid row count '{0}'")]
    InvalidRowCount(String),

    /// WHERE keyword with no condition after it.
    #[error("at WHERE: empty WHERE clause")]
    EmptyWhere,

    /// No statement kind was recognized.
    #[error("query type cannot be empty")]
    MissingQueryType,

    /// No table was read.
    #[error("table name cannot be empty")]
    MissingTable,

    /// UPDATE or DELETE without conditions.
    #[error("at WHERE: WHERE clause is mandatory for UPDATE & DELETE")]
    MissingWhere,

    /// A condition never received its operator.
    #[error("at {clause}: condition without operator")]
    ConditionWithoutOperator {
        /// WHERE or ON.
        clause: Clause,
    },

    /// A condition has no left operand.
    #[error("at {clause}: condition with empty left side operand")]
    EmptyLeftOperand {
        /// WHERE or ON.
        clause: Clause,
    },

    /// A condition has no right operand.
    #[error("at {clause}: condition with empty right side operand")]
    EmptyRightOperand {
        /// WHERE or ON.
        clause: Clause,
    },

    /// A JOIN with no table or no ON condition.
    #[error("at JOIN: incomplete JOIN clause")]
    IncompleteJoin,

    /// INSERT with no VALUES row.
    #[error("at INSERT INTO: need at least one row to insert")]
    MissingInsertRows,

    /// An INSERT row whose length differs from the field list.
    #[error(
        "at INSERT INTO: value count doesn't match field count \
         (row {row}: expected {expected}, found {found})"
    )]
    InsertShapeMismatch {
        /// Zero-based row index.
        row: usize,
        /// Number of declared fields.
        expected: usize,
        /// Number of values in the row.
        found: usize,
    },
}

/// A located parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {}", .span.start)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where it went wrong, in the normalized statement.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(clause: Clause, expected: &'static str, found: &str, span: Span) -> Self {
        Self::new(
            ParseErrorKind::Unexpected {
                clause,
                expected,
                found: found.to_string(),
            },
            span,
        )
    }

    /// Renders the statement with a caret under the error position,
    /// followed by the message.
    ///
    /// `sql` must be the normalized statement the span refers to.
    #[must_use]
    pub fn render(&self, sql: &str) -> String {
        let column = sql
            .get(..self.span.start)
            .map_or(self.span.start, |prefix| prefix.chars().count());
        format!("{sql}\n{}^\n{self}", " ".repeat(column))
    }
}

/// A failure inside a batch of statements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("statement {index}: {source}")]
pub struct BatchError {
    /// Zero-based index of the failing statement.
    pub index: usize,
    /// Statements parsed before the failure, in order.
    pub parsed: Vec<Query>,
    /// The failure itself.
    pub source: ParseError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unexpected() {
        let err = ParseError::unexpected(Clause::Select, "comma or FROM", "x", Span::new(9, 10));
        assert_eq!(
            err.to_string(),
            "at SELECT: expected comma or FROM, found 'x' at position 9"
        );
    }

    #[test]
    fn test_display_unexpected_at_end() {
        let err = ParseError::unexpected(Clause::Update, "'='", "", Span::at(12));
        assert_eq!(
            err.to_string(),
            "at UPDATE: expected '=', found end of statement at position 12"
        );
    }

    #[test]
    fn test_display_validation() {
        let err = ParseError::new(ParseErrorKind::MissingWhere, Span::at(17));
        assert_eq!(
            err.to_string(),
            "at WHERE: WHERE clause is mandatory for UPDATE & DELETE at position 17"
        );
    }

    #[test]
    fn test_render_caret() {
        let err = ParseError::new(ParseErrorKind::InvalidQueryType, Span::new(0, 4));
        assert_eq!(
            err.render("DROP t"),
            "DROP t\n^\ninvalid query type at position 0"
        );

        let err = ParseError::unexpected(Clause::Select, "table name", "", Span::at(14));
        let rendered = err.render("SELECT a FROM ");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], format!("{}^", " ".repeat(14)));
    }

    #[test]
    fn test_batch_error_display_and_source() {
        let err = BatchError {
            index: 2,
            parsed: vec![Query::new(), Query::new()],
            source: ParseError::new(ParseErrorKind::InvalidQueryType, Span::at(0)),
        };
        assert_eq!(
            err.to_string(),
            "statement 2: invalid query type at position 0"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
