//! Tests for parser error cases.

mod common;
use common::*;

use stepsql_core::{normalize, Clause, ParseErrorKind, Parser, QueryKind, Span};

#[test]
fn error_empty_input() {
    assert_eq!(parse_err_kind(""), ParseErrorKind::MissingQueryType);
    assert_eq!(parse_err_kind("   \n\t"), ParseErrorKind::MissingQueryType);
}

#[test]
fn error_unknown_statement() {
    let err = parse_err("TRUNCATE users");
    assert_eq!(err.kind, ParseErrorKind::InvalidQueryType);
    assert_eq!(err.span, Span::new(0, 8));
    assert_eq!(parse_err_kind("INSERT t (a) VALUES (1)"), ParseErrorKind::InvalidQueryType);
}

#[test]
fn error_missing_table() {
    assert_eq!(parse_err_kind("SELECT"), ParseErrorKind::MissingTable);
    assert_eq!(parse_err_kind("SELECT * FROM"), ParseErrorKind::MissingTable);
    assert_eq!(parse_err_kind("DELETE FROM"), ParseErrorKind::MissingTable);
}

#[test]
fn error_missing_comma_between_fields() {
    let err = parse_err("SELECT a b FROM t");
    assert_eq!(
        err.kind,
        ParseErrorKind::Unexpected {
            clause: Clause::Select,
            expected: "comma or FROM",
            found: "b".into(),
        }
    );
    assert_eq!(err.span, Span::new(9, 10));
}

#[test]
fn error_reserved_word_as_field() {
    assert!(matches!(
        parse_err_kind("SELECT from FROM t"),
        ParseErrorKind::Unexpected {
            clause: Clause::Select,
            expected: "field to SELECT",
            ..
        }
    ));
    assert!(matches!(
        parse_err_kind("UPDATE t SET where = 1 WHERE a = 1"),
        ParseErrorKind::Unexpected {
            clause: Clause::Update,
            ..
        }
    ));
}

#[test]
fn error_trailing_garbage_after_table() {
    let err = parse_err("SELECT a FROM t u");
    assert_eq!(
        err.kind,
        ParseErrorKind::Unexpected {
            clause: Clause::Select,
            expected: "WHERE, ORDER BY, JOIN or end of statement",
            found: "u".into(),
        }
    );
}

#[test]
fn error_semicolon_is_not_accepted() {
    let err = parse_err("SELECT a FROM t;");
    assert!(matches!(
        err.kind,
        ParseErrorKind::Unexpected { ref found, .. } if found == ";"
    ));
}

#[test]
fn error_empty_where() {
    assert_eq!(parse_err_kind("SELECT a FROM t WHERE"), ParseErrorKind::EmptyWhere);
}

#[test]
fn error_or_is_not_supported() {
    let err = parse_err("SELECT a FROM t WHERE a = 1 OR b = 2");
    assert_eq!(
        err.kind,
        ParseErrorKind::Unexpected {
            clause: Clause::Where,
            expected: "AND or ORDER BY",
            found: "OR".into(),
        }
    );
    assert_eq!(err.span, Span::new(28, 30));
}

#[test]
fn error_unknown_operator() {
    assert_eq!(
        parse_err_kind("SELECT a FROM t WHERE a ~ 1"),
        ParseErrorKind::UnknownOperator {
            clause: Clause::Where,
            found: "~".into(),
        }
    );
}

#[test]
fn error_condition_without_right_operand() {
    assert_eq!(
        parse_err_kind("SELECT a FROM t WHERE a ="),
        ParseErrorKind::EmptyRightOperand {
            clause: Clause::Where
        }
    );
}

#[test]
fn error_condition_without_operator() {
    assert_eq!(
        parse_err_kind("SELECT a FROM t WHERE a"),
        ParseErrorKind::ConditionWithoutOperator {
            clause: Clause::Where
        }
    );
}

#[test]
fn error_dangling_and() {
    assert_eq!(
        parse_err_kind("SELECT a FROM t WHERE a = 1 AND"),
        ParseErrorKind::Unexpected {
            clause: Clause::Where,
            expected: "field",
            found: String::new(),
        }
    );
}

#[test]
fn error_dangling_order_by() {
    for sql in ["SELECT a FROM t ORDER BY", "SELECT a FROM t ORDER BY a,"] {
        assert!(
            matches!(
                parse_err_kind(sql),
                ParseErrorKind::Unexpected {
                    clause: Clause::OrderBy,
                    ..
                }
            ),
            "{sql}"
        );
    }
}

#[test]
fn error_unterminated_literal() {
    assert!(matches!(
        parse_err_kind("SELECT a FROM t WHERE a = 'open"),
        ParseErrorKind::Unexpected {
            clause: Clause::Where,
            expected: "value",
            ..
        }
    ));
}

#[test]
fn error_top_needs_a_number() {
    assert_eq!(
        parse_err_kind("SELECT TOP many a FROM t"),
        ParseErrorKind::InvalidRowCount("many".into())
    );
    assert_eq!(
        parse_err_kind("SELECT TOP -1 a FROM t"),
        ParseErrorKind::InvalidRowCount("-1".into())
    );
}

#[test]
fn error_grammar_error_wins_over_validation() {
    // The statement would also miss its WHERE, but the grammar fails first.
    assert!(matches!(
        parse_err_kind("DELETE FROM t ORDER BY a"),
        ParseErrorKind::Unexpected {
            clause: Clause::Where,
            ..
        }
    ));
}

#[test]
fn error_span_refers_to_normalized_text() {
    let sql = "SELECT   a\n\tb FROM t";
    let err = parse_err(sql);
    let normalized = normalize(sql);
    assert_eq!(&normalized[err.span.start..err.span.end], "b");
    assert_eq!(
        err.render(&normalized),
        "SELECT a b FROM t\n         ^\n\
         at SELECT: expected comma or FROM, found 'b' at position 9"
    );
}

#[test]
fn error_partial_query_available_from_parser() {
    let sql = normalize("SELECT a, b FROM t WHERE x ~ 1");
    let mut parser = Parser::new(&sql);
    let err = parser.run().unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnknownOperator { .. }));
    let partial = parser.into_query();
    assert_eq!(partial.kind, QueryKind::Select);
    assert_eq!(partial.fields, vec!["a", "b"]);
    assert_eq!(partial.table, "t");
    assert_eq!(partial.conditions.len(), 1);
}
