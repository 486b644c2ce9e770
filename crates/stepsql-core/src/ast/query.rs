//! Query AST types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lexer::ReservedWord;

/// The statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueryKind {
    /// Not classified yet.
    #[default]
    Unknown,
    /// SELECT statement.
    Select,
    /// INSERT INTO statement.
    Insert,
    /// UPDATE statement.
    Update,
    /// DELETE FROM statement.
    Delete,
}

impl QueryKind {
    /// Returns the leading keyword of the statement kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Select => "SELECT",
            Self::Insert => "INSERT INTO",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE FROM",
        }
    }

    /// Returns true for the statements that modify rows in place and must
    /// carry a WHERE clause.
    #[must_use]
    pub const fn requires_where(&self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Operator {
    /// Not read yet.
    #[default]
    Unknown,
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `!=`
    Ne,
}

impl Operator {
    /// Maps a scanned reserved word to an operator.
    #[must_use]
    pub const fn from_reserved(word: ReservedWord) -> Option<Self> {
        match word {
            ReservedWord::Eq => Some(Self::Eq),
            ReservedWord::Gt => Some(Self::Gt),
            ReservedWord::GtEq => Some(Self::Gte),
            ReservedWord::Lt => Some(Self::Lt),
            ReservedWord::LtEq => Some(Self::Lte),
            ReservedWord::NotEq => Some(Self::Ne),
            _ => None,
        }
    }

    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "?",
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Ne => "!=",
        }
    }
}

/// The right-hand side of a WHERE condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// A reference to a field.
    Field(String),
    /// A literal value: quoted text or a bare number.
    Literal(String),
}

impl Operand {
    /// Returns the field name or the literal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Field(s) | Self::Literal(s) => s,
        }
    }

    /// Returns true for field references.
    #[must_use]
    pub const fn is_field(&self) -> bool {
        matches!(self, Self::Field(_))
    }
}

/// A single WHERE condition: `field <op> field-or-literal`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    /// The left operand, always a field.
    pub operand1: String,
    /// The comparison.
    pub operator: Operator,
    /// The right operand; `None` until the parser reads it.
    pub operand2: Option<Operand>,
}

impl Condition {
    /// Starts a condition on `field` with no operator yet.
    #[must_use]
    pub fn on_field(field: impl Into<String>) -> Self {
        Self {
            operand1: field.into(),
            ..Self::default()
        }
    }

    /// Creates a complete condition.
    #[must_use]
    pub fn new(field: impl Into<String>, operator: Operator, operand2: Operand) -> Self {
        Self {
            operand1: field.into(),
            operator,
            operand2: Some(operand2),
        }
    }
}

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Join kind, as written in the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    /// Plain `JOIN`.
    Join,
    /// `LEFT JOIN`.
    Left,
    /// `RIGHT JOIN`.
    Right,
    /// `INNER JOIN`.
    Inner,
}

impl JoinKind {
    /// Maps a scanned reserved word to a join kind.
    #[must_use]
    pub const fn from_reserved(word: ReservedWord) -> Option<Self> {
        match word {
            ReservedWord::Join => Some(Self::Join),
            ReservedWord::LeftJoin => Some(Self::Left),
            ReservedWord::RightJoin => Some(Self::Right),
            ReservedWord::InnerJoin => Some(Self::Inner),
            _ => None,
        }
    }

    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Inner => "INNER JOIN",
        }
    }
}

/// A join condition: `table1.operand1 <op> table2.operand2`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JoinCondition {
    /// Table owning the left field.
    pub table1: String,
    /// Left field.
    pub operand1: String,
    /// The comparison.
    pub operator: Operator,
    /// Table owning the right field.
    pub table2: String,
    /// Right field.
    pub operand2: String,
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    /// The kind of join.
    pub kind: JoinKind,
    /// The joined table.
    pub table: String,
    /// ON conditions, ANDed together.
    pub conditions: Vec<JoinCondition>,
}

impl Join {
    /// Creates a join with no table and no conditions yet.
    #[must_use]
    pub const fn new(kind: JoinKind) -> Self {
        Self {
            kind,
            table: String::new(),
            conditions: Vec::new(),
        }
    }
}

/// A parsed statement.
///
/// Which fields are meaningful depends on [`Query::kind`]: `fields` lists the
/// selected columns of a SELECT and the target columns of an INSERT,
/// `updates` is only filled for UPDATE, `inserts` only for INSERT.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Query {
    /// The statement kind.
    pub kind: QueryKind,
    /// Database qualifier of the table (`db.table`).
    pub database: Option<String>,
    /// The target table.
    pub table: String,
    /// Selected or inserted fields, in source order. `*` is kept verbatim.
    pub fields: Vec<String>,
    /// `SELECT TOP n` row cap.
    pub max_rows: Option<u64>,
    /// WHERE conditions, ANDed left to right.
    pub conditions: Vec<Condition>,
    /// UPDATE assignments. A repeated field keeps the last value.
    pub updates: BTreeMap<String, String>,
    /// INSERT rows, each aligned with `fields`.
    pub inserts: Vec<Vec<String>>,
    /// ORDER BY fields.
    pub order_fields: Vec<String>,
    /// ORDER BY directions, parallel to `order_fields`.
    pub order_dirs: Vec<OrderDirection>,
    /// JOIN clauses, in source order.
    pub joins: Vec<Join>,
}

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table from a possibly qualified reference.
    ///
    /// `db.table` splits on the first dot into database and table.
    pub fn set_table(&mut self, reference: &str) {
        match reference.split_once('.') {
            Some((database, table)) => {
                self.database = Some(database.to_string());
                self.table = table.to_string();
            }
            None => self.table = reference.to_string(),
        }
    }

    /// Appends an ORDER BY field with the default direction.
    pub fn push_order(&mut self, field: impl Into<String>) {
        self.order_fields.push(field.into());
        self.order_dirs.push(OrderDirection::default());
    }

    /// Overrides the direction of the last ORDER BY field, if any.
    pub fn set_last_order_direction(&mut self, direction: OrderDirection) {
        if let Some(last) = self.order_dirs.last_mut() {
            *last = direction;
        }
    }

    /// Iterates ORDER BY entries as `(field, direction)` pairs.
    pub fn order_by(&self) -> impl Iterator<Item = (&str, OrderDirection)> {
        self.order_fields
            .iter()
            .map(String::as_str)
            .zip(self.order_dirs.iter().copied())
    }

    /// Returns the `database.table` reference as written.
    #[must_use]
    pub fn qualified_table(&self) -> String {
        match &self.database {
            Some(database) => format!("{database}.{}", self.table),
            None => self.table.clone(),
        }
    }
}
