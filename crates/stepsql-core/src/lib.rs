//! # stepsql-core
//!
//! A parser for a small SQL subset, built as an explicit state machine.
//!
//! This crate provides:
//! - A pure scanner over a fixed, ordered reserved-word catalogue
//! - A step-by-step parser that fills a flat [`Query`] model
//! - A validator for the structural rules no single step can see
//!
//! Four statement kinds are understood: `SELECT` (with `TOP`, `JOIN ... ON`,
//! `WHERE` and `ORDER BY`), `INSERT INTO ... VALUES`, `UPDATE ... SET` and
//! `DELETE FROM`. `WHERE` conditions are joined by `AND` only.
//!
//! ## Parsing a statement
//!
//! ```rust
//! use stepsql_core::{parse, Operand, Operator, QueryKind};
//!
//! let query = parse("SELECT name, email FROM users WHERE id = 42 ORDER BY name DESC").unwrap();
//! assert_eq!(query.kind, QueryKind::Select);
//! assert_eq!(query.fields, vec!["name", "email"]);
//! assert_eq!(query.table, "users");
//! assert_eq!(query.conditions[0].operator, Operator::Eq);
//! assert_eq!(
//!     query.conditions[0].operand2,
//!     Some(Operand::Literal(String::from("42")))
//! );
//! ```
//!
//! ## Errors
//!
//! The first problem found is reported, located in the normalized statement:
//!
//! ```rust
//! use stepsql_core::{normalize, parse, ParseErrorKind};
//!
//! let sql = "DELETE FROM users";
//! let err = parse(sql).unwrap_err();
//! assert_eq!(err.kind, ParseErrorKind::MissingWhere);
//! println!("{}", err.render(&normalize(sql)));
//! ```

pub mod ast;
pub mod lexer;
mod normalize;
pub mod parser;

pub use ast::{
    Condition, Join, JoinCondition, JoinKind, Operand, Operator, OrderDirection, Query, QueryKind,
};
pub use lexer::{Lexer, ReservedWord, Span, Token, TokenKind};
pub use normalize::normalize;
pub use parser::{BatchError, Clause, ParseError, ParseErrorKind, Parser};

/// Normalizes, parses and validates one statement.
///
/// Error spans refer to the normalized text, see [`normalize`]. The partial
/// query is dropped on error; drive [`Parser::run`] and read
/// [`Parser::query`] to keep it.
///
/// # Errors
///
/// Returns the first grammar or validation error.
pub fn parse(sql: &str) -> Result<Query, ParseError> {
    let normalized = normalize(sql);
    Parser::new(&normalized).parse()
}

/// Parses statements in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the index of the failing statement, its error, and every query
/// parsed before it.
pub fn parse_many<I>(statements: I) -> Result<Vec<Query>, BatchError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut parsed = Vec::new();
    for (index, sql) in statements.into_iter().enumerate() {
        match parse(sql.as_ref()) {
            Ok(query) => parsed.push(query),
            Err(source) => {
                return Err(BatchError {
                    index,
                    parsed,
                    source,
                })
            }
        }
    }
    Ok(parsed)
}
