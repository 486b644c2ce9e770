//! Statement scanner.
//!
//! The scanner never owns a cursor: every lookup is a pure function of the
//! statement text and a byte offset, so the parser can peek as often as it
//! likes and only advances when it decides to consume a token.

mod scanner;
mod span;
mod token;

pub use scanner::Lexer;
pub use span::Span;
pub use token::{is_identifier, is_reserved_word, ReservedWord, Token, TokenKind};
