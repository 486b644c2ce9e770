//! Whole-query structural checks.

use super::error::{Clause, ParseErrorKind};
use super::step::Step;
use crate::ast::{Operand, Operator, Query, QueryKind};

/// Checks what no single step can see, given the query and the step the
/// machine stopped in.
///
/// Checks run in a fixed order and the first failure wins: empty WHERE,
/// statement kind, table, mandatory WHERE, conditions and joins, INSERT rows,
/// INSERT row shape, and finally a list left dangling at the end of input.
///
/// # Errors
///
/// Returns the kind of the first failed check.
pub fn validate(query: &Query, step: &Step) -> Result<(), ParseErrorKind> {
    if query.conditions.is_empty() && matches!(step, Step::WhereField) {
        return Err(ParseErrorKind::EmptyWhere);
    }
    if query.kind == QueryKind::Unknown {
        return Err(ParseErrorKind::MissingQueryType);
    }
    if query.table.is_empty() {
        return Err(ParseErrorKind::MissingTable);
    }
    if query.conditions.is_empty() && query.kind.requires_where() {
        return Err(ParseErrorKind::MissingWhere);
    }
    check_conditions(query)?;
    check_joins(query)?;
    if query.kind == QueryKind::Insert {
        if query.inserts.is_empty() {
            return Err(ParseErrorKind::MissingInsertRows);
        }
        let expected = query.fields.len();
        if let Some((row, values)) = query
            .inserts
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != expected)
        {
            return Err(ParseErrorKind::InsertShapeMismatch {
                row,
                expected,
                found: values.len(),
            });
        }
    }
    if let Some((clause, expected)) = dangling(step) {
        return Err(ParseErrorKind::Unexpected {
            clause,
            expected,
            found: String::new(),
        });
    }
    Ok(())
}

fn check_conditions(query: &Query) -> Result<(), ParseErrorKind> {
    let clause = Clause::Where;
    for condition in &query.conditions {
        if condition.operator == Operator::Unknown {
            return Err(ParseErrorKind::ConditionWithoutOperator { clause });
        }
        if condition.operand1.is_empty() {
            return Err(ParseErrorKind::EmptyLeftOperand { clause });
        }
        match &condition.operand2 {
            None => return Err(ParseErrorKind::EmptyRightOperand { clause }),
            Some(Operand::Field(name)) if name.is_empty() => {
                return Err(ParseErrorKind::EmptyRightOperand { clause })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn check_joins(query: &Query) -> Result<(), ParseErrorKind> {
    let clause = Clause::On;
    for join in &query.joins {
        if join.table.is_empty() || join.conditions.is_empty() {
            return Err(ParseErrorKind::IncompleteJoin);
        }
        for condition in &join.conditions {
            if condition.operator == Operator::Unknown {
                return Err(ParseErrorKind::ConditionWithoutOperator { clause });
            }
            if condition.table1.is_empty() || condition.operand1.is_empty() {
                return Err(ParseErrorKind::EmptyLeftOperand { clause });
            }
            if condition.table2.is_empty() || condition.operand2.is_empty() {
                return Err(ParseErrorKind::EmptyRightOperand { clause });
            }
        }
    }
    Ok(())
}

/// Steps that must not be the last one: a separator was read and the item
/// after it never came.
const fn dangling(step: &Step) -> Option<(Clause, &'static str)> {
    match step {
        Step::WhereField => Some((Clause::Where, "field")),
        Step::OrderField => Some((Clause::OrderBy, "field to ORDER")),
        Step::JoinLeftOperand => Some((Clause::On, "<tablename>.<fieldname>")),
        Step::InsertValuesOpeningParens => Some((Clause::InsertInto, "opening parens")),
        Step::InsertValue => Some((Clause::InsertInto, "value")),
        Step::InsertValuesCommaOrClosingParens => {
            Some((Clause::InsertInto, "comma or closing parens"))
        }
        _ => None,
    }
}
