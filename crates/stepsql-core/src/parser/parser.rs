//! Parsing state machine.

use tracing::{debug, trace, warn};

use super::error::{Clause, ParseError, ParseErrorKind};
use super::step::Step;
use super::validate::validate;
use crate::ast::{
    Condition, Join, JoinCondition, JoinKind, Operand, Operator, OrderDirection, Query, QueryKind,
};
use crate::lexer::{is_identifier, Lexer, ReservedWord, Span, Token, TokenKind};

/// Drives one normalized statement through the grammar.
///
/// The parser owns a byte cursor, the [`Step`] it is in, and the [`Query`] it
/// is filling in. Every iteration peeks one token, checks it against the
/// current step, and either fails at that token or consumes it and moves on.
/// The first error is final.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    pos: usize,
    step: Step,
    query: Query,
}

impl<'a> Parser<'a> {
    /// Creates a parser over an already normalized statement.
    ///
    /// See [`crate::normalize`].
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            pos: 0,
            step: Step::default(),
            query: Query::new(),
        }
    }

    /// Parses and validates the statement.
    ///
    /// # Errors
    ///
    /// Returns the first grammar error, or the first failed structural check
    /// if the grammar accepted the input.
    pub fn parse(mut self) -> Result<Query, ParseError> {
        self.run()?;
        if let Err(kind) = validate(&self.query, &self.step) {
            let err = ParseError::new(kind, Span::at(self.pos));
            debug!(error = %err, "statement failed validation");
            return Err(err);
        }
        debug!(kind = %self.query.kind, table = %self.query.table, "statement parsed");
        Ok(self.query)
    }

    /// Runs the state machine to the end of the input, a deliberate stop, or
    /// the first error. The partially built query stays available through
    /// [`Parser::query`] either way.
    ///
    /// # Errors
    ///
    /// Returns the first token that does not fit the grammar.
    pub fn run(&mut self) -> Result<(), ParseError> {
        while !self.lexer.at_end(self.pos) && !self.step.is_done() {
            if let Err(err) = self.advance() {
                debug!(error = %err, step = ?self.step, "statement rejected");
                return Err(err);
            }
        }
        Ok(())
    }

    /// The query built so far.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Consumes the parser, returning the query built so far.
    #[must_use]
    pub fn into_query(self) -> Query {
        self.query
    }

    /// The current grammar step.
    #[must_use]
    pub const fn step(&self) -> &Step {
        &self.step
    }

    /// The cursor, as a byte offset into the normalized statement.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Handles one token according to the current step.
    #[allow(clippy::too_many_lines)]
    fn advance(&mut self) -> Result<(), ParseError> {
        let token = self.peek();
        match self.step.clone() {
            Step::Type => {
                let (kind, next) = match token.reserved() {
                    Some(ReservedWord::Select) => {
                        self.consume(token);
                        let next = if self.peek().is(ReservedWord::Top) {
                            Step::Top
                        } else {
                            Step::SelectField
                        };
                        (QueryKind::Select, next)
                    }
                    Some(ReservedWord::InsertInto) => {
                        self.consume(token);
                        (QueryKind::Insert, Step::InsertTable)
                    }
                    Some(ReservedWord::Update) => {
                        self.consume(token);
                        (QueryKind::Update, Step::UpdateTable)
                    }
                    Some(ReservedWord::DeleteFrom) => {
                        self.consume(token);
                        (QueryKind::Delete, Step::DeleteFromTable)
                    }
                    _ => {
                        return Err(ParseError::new(
                            ParseErrorKind::InvalidQueryType,
                            self.span_of(token),
                        ))
                    }
                };
                debug!(kind = %kind, "classified statement");
                self.query.kind = kind;
                self.transition(next);
            }
            Step::Top => {
                self.consume(token);
                let count = self.peek();
                if count.kind != TokenKind::Identifier {
                    return Err(self.unexpected(Clause::Top, "row count", count));
                }
                let rows = count.text.parse::<u64>().map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::InvalidRowCount(count.text.to_string()),
                        count.span,
                    )
                })?;
                self.query.max_rows = Some(rows);
                self.consume(count);
                self.transition(Step::SelectField);
            }

            // SELECT
            Step::SelectField => {
                if token.kind != TokenKind::Identifier
                    || !(is_identifier(token.text) || token.text == "*")
                {
                    return Err(self.unexpected(Clause::Select, "field to SELECT", token));
                }
                self.query.fields.push(token.text.to_string());
                self.consume(token);
                if self.peek().is(ReservedWord::From) {
                    self.transition(Step::SelectFrom);
                } else {
                    self.transition(Step::SelectComma);
                }
            }
            Step::SelectComma => {
                self.expect(token, ReservedWord::Comma, Clause::Select, "comma or FROM")?;
                self.transition(Step::SelectField);
            }
            Step::SelectFrom => {
                self.expect(token, ReservedWord::From, Clause::Select, "FROM")?;
                self.transition(Step::SelectFromTable);
            }
            Step::SelectFromTable => {
                self.table(token, Clause::Select)?;
                self.after_table(Clause::Select)?;
            }

            // INSERT INTO
            Step::InsertTable => {
                self.table(token, Clause::InsertInto)?;
                self.transition(Step::InsertFieldsOpeningParens);
            }
            Step::InsertFieldsOpeningParens => {
                self.expect(
                    token,
                    ReservedWord::LeftParen,
                    Clause::InsertInto,
                    "opening parens",
                )?;
                self.transition(Step::InsertField);
            }
            Step::InsertField => {
                let field = self.field(token, Clause::InsertInto, "field to insert")?;
                self.query.fields.push(field);
                self.transition(Step::InsertFieldsCommaOrClosingParens);
            }
            Step::InsertFieldsCommaOrClosingParens => match token.reserved() {
                Some(ReservedWord::Comma) => {
                    self.consume(token);
                    self.transition(Step::InsertField);
                }
                Some(ReservedWord::RightParen) => {
                    self.consume(token);
                    self.transition(Step::InsertValuesKeyword);
                }
                _ => {
                    return Err(self.unexpected(
                        Clause::InsertInto,
                        "comma or closing parens",
                        token,
                    ))
                }
            },
            Step::InsertValuesKeyword => {
                self.expect(token, ReservedWord::Values, Clause::InsertInto, "'VALUES'")?;
                self.transition(Step::InsertValuesOpeningParens);
            }
            Step::InsertValuesOpeningParens => {
                self.expect(
                    token,
                    ReservedWord::LeftParen,
                    Clause::InsertInto,
                    "opening parens",
                )?;
                self.query.inserts.push(Vec::new());
                self.transition(Step::InsertValue);
            }
            Step::InsertValue => {
                if !token.is_value() {
                    return Err(self.unexpected(Clause::InsertInto, "value", token));
                }
                if let Some(row) = self.query.inserts.last_mut() {
                    row.push(token.text.to_string());
                }
                self.consume(token);
                self.transition(Step::InsertValuesCommaOrClosingParens);
            }
            Step::InsertValuesCommaOrClosingParens => match token.reserved() {
                Some(ReservedWord::Comma) => {
                    self.consume(token);
                    self.transition(Step::InsertValue);
                }
                Some(ReservedWord::RightParen) => {
                    let row = self.query.inserts.len().saturating_sub(1);
                    let found = self.query.inserts.last().map_or(0, Vec::len);
                    let expected = self.query.fields.len();
                    if found != expected {
                        return Err(ParseError::new(
                            ParseErrorKind::InsertShapeMismatch {
                                row,
                                expected,
                                found,
                            },
                            token.span,
                        ));
                    }
                    self.consume(token);
                    self.transition(Step::InsertRowsComma);
                }
                _ => {
                    return Err(self.unexpected(
                        Clause::InsertInto,
                        "comma or closing parens",
                        token,
                    ))
                }
            },
            Step::InsertRowsComma => match token.reserved() {
                Some(ReservedWord::Comma) => {
                    self.consume(token);
                    self.transition(Step::InsertValuesOpeningParens);
                }
                Some(ReservedWord::OnDuplicateKeyUpdate) => {
                    warn!(
                        position = token.span.start,
                        "ignoring unsupported ON DUPLICATE KEY UPDATE clause"
                    );
                    self.transition(Step::Done);
                }
                _ => return Err(self.unexpected(Clause::InsertInto, "comma", token)),
            },

            // UPDATE
            Step::UpdateTable => {
                self.table(token, Clause::Update)?;
                self.transition(Step::UpdateSet);
            }
            Step::UpdateSet => {
                self.expect(token, ReservedWord::Set, Clause::Update, "'SET'")?;
                self.transition(Step::UpdateField);
            }
            Step::UpdateField => {
                let field = self.field(token, Clause::Update, "field to update")?;
                self.transition(Step::UpdateEquals { field });
            }
            Step::UpdateEquals { field } => {
                self.expect(token, ReservedWord::Eq, Clause::Update, "'='")?;
                self.transition(Step::UpdateValue { field });
            }
            Step::UpdateValue { field } => {
                if !token.is_value() {
                    return Err(self.unexpected(Clause::Update, "value", token));
                }
                self.query.updates.insert(field, token.text.to_string());
                self.consume(token);
                if self.peek().is(ReservedWord::Where) {
                    self.transition(Step::Where);
                } else {
                    self.transition(Step::UpdateComma);
                }
            }
            Step::UpdateComma => {
                self.expect(token, ReservedWord::Comma, Clause::Update, "',' or WHERE")?;
                self.transition(Step::UpdateField);
            }

            // DELETE FROM
            Step::DeleteFromTable => {
                self.table(token, Clause::DeleteFrom)?;
                self.transition(Step::Where);
            }

            // WHERE
            Step::Where => {
                self.expect(token, ReservedWord::Where, Clause::Where, "WHERE")?;
                self.transition(Step::WhereField);
            }
            Step::WhereField => {
                let field = self.field(token, Clause::Where, "field")?;
                self.query.conditions.push(Condition::on_field(field));
                self.transition(Step::WhereOperator);
            }
            Step::WhereOperator => {
                let operator = self.operator(token, Clause::Where)?;
                if let Some(condition) = self.query.conditions.last_mut() {
                    condition.operator = operator;
                }
                self.transition(Step::WhereValue);
            }
            Step::WhereValue => {
                if !token.is_value() {
                    return Err(self.unexpected(Clause::Where, "value", token));
                }
                let operand = if is_field_reference(token) {
                    Operand::Field(token.text.to_string())
                } else {
                    Operand::Literal(token.text.to_string())
                };
                if let Some(condition) = self.query.conditions.last_mut() {
                    condition.operand2 = Some(operand);
                }
                self.consume(token);
                let next = self.peek();
                if next.is(ReservedWord::OrderBy) {
                    self.consume(next);
                    self.transition(Step::OrderField);
                } else {
                    self.transition(Step::WhereAnd);
                }
            }
            Step::WhereAnd => {
                if !is_and(token) {
                    return Err(self.unexpected(Clause::Where, "AND or ORDER BY", token));
                }
                self.consume(token);
                self.transition(Step::WhereField);
            }

            // ORDER BY
            Step::Order => {
                self.expect(token, ReservedWord::OrderBy, Clause::OrderBy, "ORDER BY")?;
                self.transition(Step::OrderField);
            }
            Step::OrderField => {
                let field = self.field(token, Clause::OrderBy, "field to ORDER")?;
                self.query.push_order(field);
                self.transition(Step::OrderDirectionOrComma);
            }
            Step::OrderDirectionOrComma => match token.reserved() {
                Some(ReservedWord::Asc) => {
                    self.query.set_last_order_direction(OrderDirection::Asc);
                    self.consume(token);
                    self.transition(Step::OrderComma);
                }
                Some(ReservedWord::Desc) => {
                    self.query.set_last_order_direction(OrderDirection::Desc);
                    self.consume(token);
                    self.transition(Step::OrderComma);
                }
                Some(ReservedWord::Comma) => {
                    self.consume(token);
                    self.transition(Step::OrderField);
                }
                _ => {
                    return Err(self.unexpected(
                        Clause::OrderBy,
                        "ASC, DESC or comma",
                        token,
                    ))
                }
            },
            Step::OrderComma => {
                self.expect(token, ReservedWord::Comma, Clause::OrderBy, "comma")?;
                self.transition(Step::OrderField);
            }

            // JOIN
            Step::Join => {
                let Some(kind) = token.reserved().and_then(JoinKind::from_reserved) else {
                    return Err(self.unexpected(Clause::Join, "JOIN", token));
                };
                self.query.joins.push(Join::new(kind));
                self.consume(token);
                self.transition(Step::JoinTable);
            }
            Step::JoinTable => {
                let table = self.field(token, Clause::Join, "table name")?;
                if let Some(join) = self.query.joins.last_mut() {
                    join.table = table;
                }
                self.transition(Step::JoinOn);
            }
            Step::JoinOn => {
                self.expect(token, ReservedWord::On, Clause::Join, "ON")?;
                self.transition(Step::JoinLeftOperand);
            }
            Step::JoinLeftOperand => {
                let (table1, operand1) = self.qualified_field(token)?;
                if let Some(join) = self.query.joins.last_mut() {
                    join.conditions.push(JoinCondition {
                        table1,
                        operand1,
                        ..JoinCondition::default()
                    });
                }
                self.transition(Step::JoinOperator);
            }
            Step::JoinOperator => {
                let operator = self.operator(token, Clause::On)?;
                if let Some(condition) = self.current_join_condition() {
                    condition.operator = operator;
                }
                self.transition(Step::JoinRightOperand);
            }
            Step::JoinRightOperand => {
                let (table2, operand2) = self.qualified_field(token)?;
                if let Some(condition) = self.current_join_condition() {
                    condition.table2 = table2;
                    condition.operand2 = operand2;
                }
                self.after_join_condition()?;
            }

            Step::Done => {}
        }
        Ok(())
    }

    /// Decides what follows a table reference.
    fn after_table(&mut self, clause: Clause) -> Result<(), ParseError> {
        let next = self.peek();
        match next.reserved() {
            Some(ReservedWord::Where) => self.transition(Step::Where),
            Some(ReservedWord::OrderBy) => self.transition(Step::Order),
            Some(word) if word.is_join() => self.transition(Step::Join),
            _ if self.lexer.at_end(self.pos) => {}
            _ => {
                return Err(self.unexpected(
                    clause,
                    "WHERE, ORDER BY, JOIN or end of statement",
                    next,
                ))
            }
        }
        Ok(())
    }

    /// Decides what follows a complete join condition.
    fn after_join_condition(&mut self) -> Result<(), ParseError> {
        let next = self.peek();
        match next.reserved() {
            Some(ReservedWord::Where) => self.transition(Step::Where),
            Some(ReservedWord::OrderBy) => self.transition(Step::Order),
            Some(word) if word.is_join() => self.transition(Step::Join),
            _ if is_and(next) => {
                self.consume(next);
                self.transition(Step::JoinLeftOperand);
            }
            _ if self.lexer.at_end(self.pos) => {}
            _ => {
                return Err(self.unexpected(
                    Clause::On,
                    "AND, JOIN, WHERE, ORDER BY or end of statement",
                    next,
                ))
            }
        }
        Ok(())
    }

    // --- Token helpers ---

    /// Reads the token at the cursor without consuming it.
    fn peek(&self) -> Token<'a> {
        self.lexer.token_at(self.pos)
    }

    /// Moves the cursor past `token` and the spaces after it.
    fn consume(&mut self, token: Token<'a>) {
        self.pos = self.lexer.skip_spaces(token.span.end);
    }

    fn transition(&mut self, next: Step) {
        trace!(from = ?self.step, to = ?next, position = self.pos, "step");
        self.step = next;
    }

    /// The span to blame for `token`; empty tokens point at the cursor.
    const fn span_of(&self, token: Token<'a>) -> Span {
        if token.is_empty() {
            Span::at(self.pos)
        } else {
            token.span
        }
    }

    /// The text to report for `token`. An empty token short of the end of
    /// input stands on a character no token class accepts; report that.
    fn found_text(&self, token: Token<'a>) -> &'a str {
        if !token.is_empty() || self.lexer.at_end(self.pos) {
            return token.text;
        }
        let rest = &self.lexer.input()[self.pos..];
        rest.chars()
            .next()
            .map_or(token.text, |c| &rest[..c.len_utf8()])
    }

    fn unexpected(&self, clause: Clause, expected: &'static str, token: Token<'a>) -> ParseError {
        ParseError::unexpected(clause, expected, self.found_text(token), self.span_of(token))
    }

    /// Consumes `token` if it is `word`.
    fn expect(
        &mut self,
        token: Token<'a>,
        word: ReservedWord,
        clause: Clause,
        expected: &'static str,
    ) -> Result<(), ParseError> {
        if token.is(word) {
            self.consume(token);
            Ok(())
        } else {
            Err(self.unexpected(clause, expected, token))
        }
    }

    /// Consumes `token` as a field or table name.
    fn field(
        &mut self,
        token: Token<'a>,
        clause: Clause,
        expected: &'static str,
    ) -> Result<String, ParseError> {
        if token.kind != TokenKind::Identifier || !is_identifier(token.text) {
            return Err(self.unexpected(clause, expected, token));
        }
        self.consume(token);
        Ok(token.text.to_string())
    }

    /// Consumes a possibly qualified table reference into the query.
    fn table(&mut self, token: Token<'a>, clause: Clause) -> Result<(), ParseError> {
        let reference = self.field(token, clause, "table name")?;
        self.query.set_table(&reference);
        Ok(())
    }

    /// Consumes a comparison operator.
    fn operator(&mut self, token: Token<'a>, clause: Clause) -> Result<Operator, ParseError> {
        let Some(operator) = token.reserved().and_then(Operator::from_reserved) else {
            return Err(ParseError::new(
                ParseErrorKind::UnknownOperator {
                    clause,
                    found: self.found_text(token).to_string(),
                },
                self.span_of(token),
            ));
        };
        self.consume(token);
        Ok(operator)
    }

    /// Consumes a `table.field` operand of a join condition.
    fn qualified_field(&mut self, token: Token<'a>) -> Result<(String, String), ParseError> {
        let parts = (token.kind == TokenKind::Identifier)
            .then(|| token.text.split_once('.'))
            .flatten()
            .filter(|(table, field)| {
                is_identifier(table) && is_identifier(field) && !field.contains('.')
            });
        let Some((table, field)) = parts else {
            return Err(self.unexpected(Clause::On, "<tablename>.<fieldname>", token));
        };
        self.consume(token);
        Ok((table.to_string(), field.to_string()))
    }

    fn current_join_condition(&mut self) -> Option<&mut JoinCondition> {
        self.query
            .joins
            .last_mut()
            .and_then(|join| join.conditions.last_mut())
    }
}

/// Unquoted values that start like a name refer to a field; quoted text and
/// numbers are literals.
fn is_field_reference(token: Token<'_>) -> bool {
    token.kind == TokenKind::Identifier
        && token
            .text
            .starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && is_identifier(token.text)
}

/// `AND` is not a catalogue entry, so it scans as an identifier.
fn is_and(token: Token<'_>) -> bool {
    token.kind == TokenKind::Identifier && token.text.eq_ignore_ascii_case("AND")
}
