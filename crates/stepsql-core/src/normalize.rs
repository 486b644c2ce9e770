//! Statement preprocessing.

/// Prepares raw statement text for the scanner.
///
/// Backticks are dropped, every run of ASCII whitespace becomes one space,
/// and leading and trailing whitespace is removed. Quoted literals are not
/// special here: whitespace inside them is collapsed too.
///
/// ```
/// assert_eq!(
///     stepsql_core::normalize("  SELECT `a`,\n\tb  FROM t "),
///     "SELECT a, b FROM t"
/// );
/// ```
#[must_use]
pub fn normalize(sql: &str) -> String {
    let unquoted: String = sql.chars().filter(|&c| c != '`').collect();
    unquoted
        .split(|c: char| c.is_ascii_whitespace())
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
