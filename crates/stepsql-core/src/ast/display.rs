//! Canonical SQL rendering of a parsed query.
//!
//! The output re-parses to an equal [`Query`]: literals are always quoted,
//! field references never are, and every ORDER BY field carries its direction.

use std::fmt;

use super::query::{Condition, Join, Operand, Operator, OrderDirection, Query, QueryKind};

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Literal(value) => write!(f, "'{value}'"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operand1, self.operator)?;
        if let Some(operand2) = &self.operand2 {
            write!(f, " {operand2}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.table)?;
        for (i, c) in self.conditions.iter().enumerate() {
            let glue = if i == 0 { "ON" } else { "AND" };
            write!(
                f,
                " {glue} {}.{} {} {}.{}",
                c.table1, c.operand1, c.operator, c.table2, c.operand2
            )?;
        }
        Ok(())
    }
}

/// Writes `items` separated by `sep`.
fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Query {
    fn fmt_where(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return Ok(());
        }
        f.write_str(" WHERE ")?;
        write_list(f, &self.conditions, " AND ")
    }

    fn fmt_order_by(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.order_fields.is_empty() {
            return Ok(());
        }
        f.write_str(" ORDER BY ")?;
        write_list(
            f,
            self.order_by().map(|(field, dir)| format!("{field} {dir}")),
            ", ",
        )
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            QueryKind::Unknown => Ok(()),
            QueryKind::Select => {
                f.write_str("SELECT ")?;
                if let Some(n) = self.max_rows {
                    write!(f, "TOP {n} ")?;
                }
                write_list(f, &self.fields, ", ")?;
                write!(f, " FROM {}", self.qualified_table())?;
                for join in &self.joins {
                    write!(f, " {join}")?;
                }
                self.fmt_where(f)?;
                self.fmt_order_by(f)
            }
            QueryKind::Insert => {
                write!(f, "INSERT INTO {} (", self.qualified_table())?;
                write_list(f, &self.fields, ", ")?;
                f.write_str(") VALUES ")?;
                write_list(
                    f,
                    self.inserts.iter().map(|row| {
                        let values: Vec<String> = row.iter().map(|v| format!("'{v}'")).collect();
                        format!("({})", values.join(", "))
                    }),
                    ", ",
                )
            }
            QueryKind::Update => {
                write!(f, "UPDATE {} SET ", self.qualified_table())?;
                write_list(
                    f,
                    self.updates
                        .iter()
                        .map(|(field, value)| format!("{field} = '{value}'")),
                    ", ",
                )?;
                self.fmt_where(f)?;
                self.fmt_order_by(f)
            }
            QueryKind::Delete => {
                write!(f, "DELETE FROM {}", self.qualified_table())?;
                self.fmt_where(f)?;
                self.fmt_order_by(f)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{JoinCondition, JoinKind};

    #[test]
    fn test_display_select() {
        let mut q = Query::new();
        q.kind = QueryKind::Select;
        q.max_rows = Some(5);
        q.fields = vec!["a".into(), "b".into()];
        q.set_table("db.t");
        q.conditions
            .push(Condition::new("a", Operator::Gt, Operand::Literal("1".into())));
        q.conditions
            .push(Condition::new("b", Operator::Eq, Operand::Field("c".into())));
        q.push_order("a");
        assert_eq!(
            q.to_string(),
            "SELECT TOP 5 a, b FROM db.t WHERE a > '1' AND b = c ORDER BY a ASC"
        );
    }

    #[test]
    fn test_display_join() {
        let join = Join {
            kind: JoinKind::Left,
            table: "b".into(),
            conditions: vec![
                JoinCondition {
                    table1: "a".into(),
                    operand1: "id".into(),
                    operator: Operator::Eq,
                    table2: "b".into(),
                    operand2: "a_id".into(),
                },
                JoinCondition {
                    table1: "a".into(),
                    operand1: "x".into(),
                    operator: Operator::Ne,
                    table2: "b".into(),
                    operand2: "y".into(),
                },
            ],
        };
        assert_eq!(
            join.to_string(),
            "LEFT JOIN b ON a.id = b.a_id AND a.x != b.y"
        );
    }

    #[test]
    fn test_display_insert() {
        let mut q = Query::new();
        q.kind = QueryKind::Insert;
        q.table = "t".into();
        q.fields = vec!["a".into(), "b".into()];
        q.inserts = vec![vec!["1".into(), "x".into()], vec!["2".into(), "y".into()]];
        assert_eq!(
            q.to_string(),
            "INSERT INTO t (a, b) VALUES ('1', 'x'), ('2', 'y')"
        );
    }

    #[test]
    fn test_display_update_and_delete() {
        let mut q = Query::new();
        q.kind = QueryKind::Update;
        q.table = "t".into();
        q.updates.insert("b".into(), "2".into());
        q.updates.insert("a".into(), "1".into());
        q.conditions
            .push(Condition::new("id", Operator::Eq, Operand::Literal("3".into())));
        assert_eq!(q.to_string(), "UPDATE t SET a = '1', b = '2' WHERE id = '3'");

        q.kind = QueryKind::Delete;
        assert_eq!(q.to_string(), "DELETE FROM t WHERE id = '3'");

        q.push_order("id");
        q.set_last_order_direction(OrderDirection::Desc);
        assert_eq!(q.to_string(), "DELETE FROM t WHERE id = '3' ORDER BY id DESC");
    }

    #[test]
    fn test_display_unknown_is_empty() {
        assert_eq!(Query::new().to_string(), "");
    }
}
