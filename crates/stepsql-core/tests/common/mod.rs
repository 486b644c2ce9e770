#![allow(dead_code)]

use stepsql_core::{normalize, ParseError, ParseErrorKind, Query, QueryKind};

pub fn parse(sql: &str) -> Query {
    stepsql_core::parse(sql).unwrap_or_else(|e| {
        panic!(
            "Failed to parse: {sql}\n{}",
            e.render(&normalize(sql))
        )
    })
}

pub fn parse_err(sql: &str) -> ParseError {
    match stepsql_core::parse(sql) {
        Ok(q) => panic!("Expected parse error for: {sql}\nGot: {q:?}"),
        Err(e) => e,
    }
}

pub fn parse_err_kind(sql: &str) -> ParseErrorKind {
    parse_err(sql).kind
}

pub fn parse_kind(sql: &str, kind: QueryKind) -> Query {
    let q = parse(sql);
    assert_eq!(q.kind, kind, "Wrong statement kind for: {sql}");
    q
}

pub fn parse_select(sql: &str) -> Query {
    parse_kind(sql, QueryKind::Select)
}

pub fn parse_insert(sql: &str) -> Query {
    parse_kind(sql, QueryKind::Insert)
}

pub fn parse_update(sql: &str) -> Query {
    parse_kind(sql, QueryKind::Update)
}

pub fn parse_delete(sql: &str) -> Query {
    parse_kind(sql, QueryKind::Delete)
}

/// Verifies that `to_string()` produces a fixed point:
/// parse(sql).to_string() re-parses to the same query and renders
/// the same string again.
pub fn round_trip(sql: &str) {
    let ast1 = parse(sql);
    let rendered1 = ast1.to_string();
    let ast2 = parse(&rendered1);
    let rendered2 = ast2.to_string();
    assert_eq!(ast1, ast2, "Re-parsed query differs.\n  Input:    {sql}\n  Rendered: {rendered1}");
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}
