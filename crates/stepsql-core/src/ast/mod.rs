//! The query model produced by the parser.

mod display;
mod query;

pub use query::{
    Condition, Join, JoinCondition, JoinKind, Operand, Operator, OrderDirection, Query, QueryKind,
};
