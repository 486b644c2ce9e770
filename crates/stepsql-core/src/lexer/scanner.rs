//! Scanner implementation.

use super::token::is_identifier_byte;
use super::{ReservedWord, Span, Token, TokenKind};

/// A read-only view over a normalized statement that reads tokens at
/// arbitrary byte offsets.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    /// The normalized statement.
    input: &'a str,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Returns the scanned text.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Returns true if `pos` is at or past the end of the input.
    #[must_use]
    pub const fn at_end(&self, pos: usize) -> bool {
        pos >= self.input.len()
    }

    /// Reads the token starting at `pos`.
    ///
    /// Catalogue entries are tried first, then quoted literals, then
    /// identifiers. Returns an empty [`TokenKind::End`] token when nothing can
    /// be read.
    #[must_use]
    pub fn token_at(&self, pos: usize) -> Token<'a> {
        if self.at_end(pos) {
            return Token::end(pos);
        }
        if let Some(token) = self.reserved_at(pos) {
            return token;
        }
        if self.input.as_bytes()[pos] == b'\'' {
            return self.quoted_at(pos);
        }
        self.identifier_at(pos)
    }

    /// Reads a `'...'` literal starting at `pos`.
    ///
    /// There is no escape syntax: the literal ends at the next quote. An
    /// unterminated literal yields an empty token.
    #[must_use]
    pub fn quoted_at(&self, pos: usize) -> Token<'a> {
        if self.input.as_bytes().get(pos) != Some(&b'\'') {
            return Token::end(pos);
        }
        let content_start = pos + 1;
        match self.input[content_start..].find('\'') {
            Some(offset) => Token::new(
                TokenKind::Quoted,
                &self.input[content_start..content_start + offset],
                Span::new(pos, content_start + offset + 1),
            ),
            None => Token::end(pos),
        }
    }

    /// Reads the longest run of identifier characters starting at `pos`.
    #[must_use]
    pub fn identifier_at(&self, pos: usize) -> Token<'a> {
        let bytes = self.input.as_bytes();
        let mut end = pos;
        while end < bytes.len() && is_identifier_byte(bytes[end]) {
            end += 1;
        }
        if end == pos {
            return Token::end(pos);
        }
        Token::new(
            TokenKind::Identifier,
            &self.input[pos..end],
            Span::new(pos, end),
        )
    }

    /// Returns the first position at or after `pos` that is not a space.
    #[must_use]
    pub fn skip_spaces(&self, mut pos: usize) -> usize {
        let bytes = self.input.as_bytes();
        while pos < bytes.len() && bytes[pos] == b' ' {
            pos += 1;
        }
        pos
    }

    /// Tries the catalogue in declared order.
    ///
    /// Entries ending in an identifier character only match on a word
    /// boundary, so `updated_at` is an identifier and not `UPDATE` + `d_at`.
    fn reserved_at(&self, pos: usize) -> Option<Token<'a>> {
        let rest = &self.input.as_bytes()[pos..];
        ReservedWord::CATALOGUE
            .into_iter()
            .find(|word| {
                let text = word.as_str().as_bytes();
                if rest.len() < text.len() || !rest[..text.len()].eq_ignore_ascii_case(text) {
                    return false;
                }
                let needs_boundary = text.last().is_some_and(|&b| is_identifier_byte(b));
                !needs_boundary || !rest.get(text.len()).is_some_and(|&b| is_identifier_byte(b))
            })
            .map(|word| {
                Token::new(
                    TokenKind::Reserved(word),
                    word.as_str(),
                    Span::new(pos, pos + word.as_str().len()),
                )
            })
    }
}
