//! Grammar positions of the parsing state machine.

/// The parser's current position in the grammar.
///
/// Each variant names the token the parser expects next. Steps that need to
/// remember something across tokens carry it inline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Step {
    /// Classify the statement by its first token.
    #[default]
    Type,
    /// `TOP n` after SELECT.
    Top,

    // SELECT
    SelectField,
    SelectComma,
    SelectFrom,
    SelectFromTable,

    // INSERT INTO
    InsertTable,
    InsertFieldsOpeningParens,
    InsertField,
    InsertFieldsCommaOrClosingParens,
    InsertValuesKeyword,
    InsertValuesOpeningParens,
    InsertValue,
    InsertValuesCommaOrClosingParens,
    /// Between rows: a comma, the unsupported upsert tail, or the end.
    InsertRowsComma,

    // UPDATE
    UpdateTable,
    UpdateSet,
    UpdateField,
    /// The `=` after a SET field.
    UpdateEquals {
        /// Field being assigned.
        field: String,
    },
    /// The value assigned to a SET field.
    UpdateValue {
        /// Field being assigned.
        field: String,
    },
    UpdateComma,

    // DELETE FROM
    DeleteFromTable,

    // WHERE
    Where,
    WhereField,
    WhereOperator,
    WhereValue,
    WhereAnd,

    // ORDER BY
    Order,
    OrderField,
    OrderDirectionOrComma,
    OrderComma,

    // JOIN
    Join,
    JoinTable,
    JoinOn,
    JoinLeftOperand,
    JoinOperator,
    JoinRightOperand,

    /// Parsing stopped early on purpose; the rest of the input is ignored.
    Done,
}

impl Step {
    /// Returns true once the machine has stopped on purpose.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}
