//! Token types and the reserved-word catalogue.

use super::Span;

/// Reserved words and punctuation, in catalogue order.
///
/// The scanner tries [`ReservedWord::CATALOGUE`] front to back and the first
/// entry whose text prefixes the input wins, so the order of the array is
/// part of the grammar: two-character operators sit before their one-character
/// prefixes and `ON DUPLICATE KEY UPDATE` sits before `ON`.
///
/// Unlike plain first-prefix matching, entries ending in a word character also
/// need a word boundary after them: `selection` is an identifier, not `SELECT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedWord {
    // Punctuation
    LeftParen,
    RightParen,
    GtEq,
    LtEq,
    NotEq,
    Comma,
    Eq,
    Gt,
    Lt,

    // Keywords
    Select,
    Top,
    InsertInto,
    Values,
    Update,
    DeleteFrom,
    Where,
    From,
    Set,
    OnDuplicateKeyUpdate,
    OrderBy,
    Asc,
    Desc,
    LeftJoin,
    RightJoin,
    InnerJoin,
    Join,
    On,
}

impl ReservedWord {
    /// Every reserved word, in the order the scanner tries them.
    pub const CATALOGUE: [Self; 27] = [
        Self::LeftParen,
        Self::RightParen,
        Self::GtEq,
        Self::LtEq,
        Self::NotEq,
        Self::Comma,
        Self::Eq,
        Self::Gt,
        Self::Lt,
        Self::Select,
        Self::Top,
        Self::InsertInto,
        Self::Values,
        Self::Update,
        Self::DeleteFrom,
        Self::Where,
        Self::From,
        Self::Set,
        Self::OnDuplicateKeyUpdate,
        Self::OrderBy,
        Self::Asc,
        Self::Desc,
        Self::LeftJoin,
        Self::RightJoin,
        Self::InnerJoin,
        Self::Join,
        Self::On,
    ];

    /// Returns the canonical (upper-case) text of the word.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::GtEq => ">=",
            Self::LtEq => "<=",
            Self::NotEq => "!=",
            Self::Comma => ",",
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Select => "SELECT",
            Self::Top => "TOP",
            Self::InsertInto => "INSERT INTO",
            Self::Values => "VALUES",
            Self::Update => "UPDATE",
            Self::DeleteFrom => "DELETE FROM",
            Self::Where => "WHERE",
            Self::From => "FROM",
            Self::Set => "SET",
            Self::OnDuplicateKeyUpdate => "ON DUPLICATE KEY UPDATE",
            Self::OrderBy => "ORDER BY",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::LeftJoin => "LEFT JOIN",
            Self::RightJoin => "RIGHT JOIN",
            Self::InnerJoin => "INNER JOIN",
            Self::Join => "JOIN",
            Self::On => "ON",
        }
    }

    /// Returns true for the punctuation and operator entries.
    #[must_use]
    pub const fn is_punctuation(&self) -> bool {
        matches!(
            self,
            Self::LeftParen
                | Self::RightParen
                | Self::GtEq
                | Self::LtEq
                | Self::NotEq
                | Self::Comma
                | Self::Eq
                | Self::Gt
                | Self::Lt
        )
    }

    /// Returns true for the keywords that open a JOIN clause.
    #[must_use]
    pub const fn is_join(&self) -> bool {
        matches!(
            self,
            Self::LeftJoin | Self::RightJoin | Self::InnerJoin | Self::Join
        )
    }

    /// Iterates the keyword entries only (the catalogue minus punctuation).
    pub fn keywords() -> impl Iterator<Item = Self> {
        Self::CATALOGUE.into_iter().filter(|w| !w.is_punctuation())
    }

    /// Looks up a word by its full text (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::CATALOGUE
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s))
    }
}

/// Returns true if `b` may appear inside an unquoted identifier.
///
/// Dots and `*` are allowed so that `db.table`, `table.field` and `*` scan as
/// a single token.
#[must_use]
pub const fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_' | b'*')
}

/// Returns true if `s` is one of the keyword entries of the catalogue.
#[must_use]
pub fn is_reserved_word(s: &str) -> bool {
    ReservedWord::keywords().any(|w| w.as_str().eq_ignore_ascii_case(s))
}

/// Returns true if `s` can name a field or table.
///
/// The text must be made of identifier characters, contain at least one
/// letter or underscore, and must not spell a reserved word.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(is_identifier_byte)
        && s.bytes().any(|b| b.is_ascii_alphabetic() || b == b'_')
        && ReservedWord::from_str(s).is_none()
}

/// The kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A catalogue entry.
    Reserved(ReservedWord),
    /// The content of a `'...'` literal, quotes stripped.
    Quoted,
    /// A run of identifier characters.
    Identifier,
    /// Nothing could be read: end of input, an unterminated quote, or a
    /// character outside every token class.
    End,
}

/// A token borrowed from the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token kind.
    pub kind: TokenKind,
    /// The token value. Reserved words carry their canonical upper-case text.
    pub text: &'a str,
    /// The bytes the token occupies, quotes included.
    pub span: Span,
}

impl<'a> Token<'a> {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Creates the empty token found at `pos`.
    #[must_use]
    pub const fn end(pos: usize) -> Self {
        Self::new(TokenKind::End, "", Span::at(pos))
    }

    /// Number of input bytes the token consumes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.span.len()
    }

    /// Returns true if nothing could be read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Returns true if this token is the given reserved word.
    #[must_use]
    pub fn is(&self, word: ReservedWord) -> bool {
        self.kind == TokenKind::Reserved(word)
    }

    /// Returns the reserved word, if this token is one.
    #[must_use]
    pub const fn reserved(&self) -> Option<ReservedWord> {
        match self.kind {
            TokenKind::Reserved(word) => Some(word),
            _ => None,
        }
    }

    /// Returns true if the token can serve as a value: a quoted literal or a
    /// bare run of identifier characters such as `42` or `-1.5`.
    #[must_use]
    pub fn is_value(&self) -> bool {
        match self.kind {
            TokenKind::Quoted => true,
            TokenKind::Identifier => !self.text.is_empty(),
            TokenKind::Reserved(_) | TokenKind::End => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_has_no_shadowed_entries() {
        // An entry is dead if an earlier entry is a prefix of it.
        for (i, later) in ReservedWord::CATALOGUE.iter().enumerate() {
            for earlier in &ReservedWord::CATALOGUE[..i] {
                assert!(
                    !later.as_str().starts_with(earlier.as_str()),
                    "{later:?} is shadowed by {earlier:?}"
                );
            }
        }
    }

    #[test]
    fn test_keywords_exclude_punctuation() {
        let keywords: Vec<_> = ReservedWord::keywords().collect();
        assert_eq!(keywords.len(), 18);
        assert_eq!(keywords[0], ReservedWord::Select);
        assert_eq!(keywords[17], ReservedWord::On);
        assert!(keywords.iter().all(|w| !w.is_punctuation()));
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(ReservedWord::from_str("order by"), Some(ReservedWord::OrderBy));
        assert_eq!(ReservedWord::from_str(">="), Some(ReservedWord::GtEq));
        assert_eq!(ReservedWord::from_str("and"), None);
    }

    #[test]
    fn test_is_reserved_word() {
        assert!(is_reserved_word("select"));
        assert!(is_reserved_word("Left Join"));
        assert!(!is_reserved_word("("));
        assert!(!is_reserved_word("users"));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("users"));
        assert!(is_identifier("_id"));
        assert!(is_identifier("db.table"));
        assert!(is_identifier("col_2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("42"));
        assert!(!is_identifier("*"));
        assert!(!is_identifier("WHERE"));
        assert!(!is_identifier(","));
        assert!(!is_identifier("a b"));
    }

    #[test]
    fn test_token_is_value() {
        let quoted = Token::new(TokenKind::Quoted, "", Span::new(0, 2));
        let number = Token::new(TokenKind::Identifier, "42", Span::new(0, 2));
        let comma = Token::new(TokenKind::Reserved(ReservedWord::Comma), ",", Span::new(0, 1));
        assert!(quoted.is_value());
        assert!(number.is_value());
        assert!(!comma.is_value());
        assert!(!Token::end(3).is_value());
    }
}
