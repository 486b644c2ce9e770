//! SQL Parser
//!
//! An explicit state machine over the scanner: one [`Step`] per grammar
//! position, a single dispatch function, and a structural validator that runs
//! once the input is exhausted.

mod error;
#[allow(clippy::module_inception)]
mod parser;
mod step;
mod validate;

pub use error::{BatchError, Clause, ParseError, ParseErrorKind};
pub use parser::Parser;
pub use step::Step;
pub use validate::validate;
