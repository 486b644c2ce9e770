//! stepsql CLI
//!
//! Parses SQL statements and prints the resulting query model, or a located
//! diagnostic for the first statement that fails.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use stepsql_core::{normalize, parse_many, Query};

/// Parse a small SQL subset into a flat query model.
#[derive(Parser)]
#[command(name = "stepsql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Statements to parse, one per argument.
    #[arg(value_name = "STATEMENTS")]
    statements: Vec<String>,

    /// Read statements from a file, one per non-empty line.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, env = "STEPSQL_FORMAT", default_value_t = Format::Pretty)]
    format: Format,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

/// How parsed queries are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Rust debug representation.
    Debug,
    /// JSON object per statement.
    Json,
    /// Canonical SQL text.
    Pretty,
}

/// Reads one statement per non-empty line of `path`.
fn read_statements(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read statements from {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Renders a parsed query in the requested format.
fn format_query(query: &Query, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Debug => format!("{query:#?}"),
        Format::Json => serde_json::to_string_pretty(query)?,
        Format::Pretty => query.to_string(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut statements = cli.statements;
    if let Some(path) = &cli.file {
        let from_file = read_statements(path)?;
        debug!(path = %path.display(), count = from_file.len(), "read statements");
        statements.extend(from_file);
    }
    if statements.is_empty() {
        bail!("no statements given; pass them as arguments or with --file");
    }

    let (queries, failure) = match parse_many(&statements) {
        Ok(queries) => (queries, None),
        Err(err) => (err.parsed, Some((err.index, err.source))),
    };
    for query in &queries {
        println!("{}", format_query(query, cli.format)?);
    }
    debug!(parsed = queries.len(), total = statements.len(), "done");

    if let Some((index, err)) = failure {
        eprintln!("{}", err.render(&normalize(&statements[index])));
        bail!("statement {index} failed to parse");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "stepsql",
            "--format",
            "json",
            "-v",
            "SELECT a FROM t",
            "DELETE FROM t WHERE a = 1",
        ])
        .unwrap();
        assert_eq!(cli.format, Format::Json);
        assert!(cli.verbose);
        assert_eq!(cli.statements.len(), 2);
        assert!(cli.file.is_none());
    }

    #[test]
    fn test_read_statements_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SELECT a FROM t").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "   ").unwrap();
        writeln!(file, "  UPDATE t SET a = 1 WHERE b = 2  ").unwrap();
        let statements = read_statements(file.path()).unwrap();
        assert_eq!(
            statements,
            vec!["SELECT a FROM t", "UPDATE t SET a = 1 WHERE b = 2"]
        );
    }

    #[test]
    fn test_read_statements_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_statements(&dir.path().join("absent.sql")).unwrap_err();
        assert!(err.to_string().contains("absent.sql"));
    }

    #[test]
    fn test_format_query() {
        let query = stepsql_core::parse("select a from t where b = 1").unwrap();
        assert_eq!(
            format_query(&query, Format::Pretty).unwrap(),
            "SELECT a FROM t WHERE b = '1'"
        );
        let json: serde_json::Value =
            serde_json::from_str(&format_query(&query, Format::Json).unwrap()).unwrap();
        assert_eq!(json["table"], "t");
        assert_eq!(json["kind"], "Select");
        assert!(format_query(&query, Format::Debug)
            .unwrap()
            .contains("Select"));
    }
}
