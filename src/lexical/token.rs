//! Contains the [`Token`] struct and its related types.

use std::{collections::HashMap, fmt::Display, str::FromStr, sync::OnceLock};

use crate::base::source_file::{Location, SourceElement, SourceIterator, Span};
use derive_more::From;
use enum_as_inner::EnumAsInner;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Is an enumeration representing keywords in Titania.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum KeywordKind {
    Module,
    Procedure,
    Begin,
    End,
    Return,
}

impl Display for KeywordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Is an error that is returned when a string cannot be parsed into a [`Keyword`] in [`FromStr`]
/// trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, thiserror::Error)]
#[error("invalid string representation of keyword.")]
pub struct KeywordParseError;

impl FromStr for KeywordKind {
    type Err = KeywordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static STRING_KEYWORD_MAP: OnceLock<HashMap<&'static str, KeywordKind>> = OnceLock::new();
        let map = STRING_KEYWORD_MAP.get_or_init(|| {
            let mut map = HashMap::new();

            for keyword in Self::iter() {
                map.insert(keyword.as_str(), keyword);
            }

            map
        });

        map.get(s).copied().ok_or(KeywordParseError)
    }
}

impl KeywordKind {
    /// Gets the string representation of the keyword as a `&str`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "MODULE",
            Self::Procedure => "PROCEDURE",
            Self::Begin => "BEGIN",
            Self::End => "END",
            Self::Return => "RETURN",
        }
    }
}

/// The classification of a token, independent of where it was found.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    /// One of the reserved words.
    Keyword(KeywordKind),
    /// A letter followed by letters and digits that is not a keyword.
    Identifier,
    /// A sequence of digits.
    IntegerLiteral,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `*`
    Asterisk,
    /// `.`
    Period,
    /// The end of the source text.
    EndOfInput,
    /// A character that starts no token.
    Invalid,
}

impl TokenKind {
    /// Gets the kind of the punctuation token made of the given character, if there is one.
    #[must_use]
    pub fn from_punctuation(character: char) -> Option<Self> {
        match character {
            ';' => Some(Self::Semicolon),
            ':' => Some(Self::Colon),
            '*' => Some(Self::Asterisk),
            '.' => Some(Self::Period),
            _ => None,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(f, "a keyword token `{keyword}`"),
            Self::Identifier => f.write_str("an identifier token"),
            Self::IntegerLiteral => f.write_str("an integer literal"),
            Self::Semicolon => f.write_str("a punctuation token `;`"),
            Self::Colon => f.write_str("a punctuation token `:`"),
            Self::Asterisk => f.write_str("a punctuation token `*`"),
            Self::Period => f.write_str("a punctuation token `.`"),
            Self::EndOfInput => f.write_str("end of input"),
            Self::Invalid => f.write_str("an invalid character"),
        }
    }
}

/// Is an enumeration containing all kinds of tokens in the Titania programming language.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, From, EnumAsInner)]
#[allow(missing_docs)]
pub enum Token {
    Identifier(Identifier),
    Keyword(Keyword),
    Punctuation(Punctuation),
    Integer(Integer),
    EndOfInput(EndOfInput),
    Invalid(Invalid),
}

impl Token {
    /// Returns the span of the token.
    #[must_use]
    pub fn span(&self) -> &Span {
        match self {
            Self::Identifier(token) => &token.span,
            Self::Keyword(token) => &token.span,
            Self::Punctuation(token) => &token.span,
            Self::Integer(token) => &token.span,
            Self::EndOfInput(token) => &token.span,
            Self::Invalid(token) => &token.span,
        }
    }

    /// Returns the kind of the token.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Identifier(_) => TokenKind::Identifier,
            Self::Keyword(keyword) => TokenKind::Keyword(keyword.keyword),
            Self::Punctuation(punctuation) => punctuation.kind(),
            Self::Integer(_) => TokenKind::IntegerLiteral,
            Self::EndOfInput(_) => TokenKind::EndOfInput,
            Self::Invalid(_) => TokenKind::Invalid,
        }
    }

    /// Returns the exact source text of the token. Empty for [`Token::EndOfInput`].
    #[must_use]
    pub fn lexeme(&self) -> &str {
        self.span().str()
    }

    /// Returns the line and column of the first character of the token.
    #[must_use]
    pub fn location(&self) -> Location {
        self.span().start_location()
    }
}

impl SourceElement for Token {
    fn span(&self) -> Span {
        match self {
            Self::Identifier(token) => token.span(),
            Self::Keyword(token) => token.span(),
            Self::Punctuation(token) => token.span(),
            Self::Integer(token) => token.span(),
            Self::EndOfInput(token) => token.span(),
            Self::Invalid(token) => token.span(),
        }
    }
}

/// Represents a contiguous sequence of letters and digits starting with a letter.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    /// Is the span that makes up the token.
    pub span: Span,
}

impl Identifier {
    /// Returns the name exactly as written.
    #[must_use]
    pub fn name(&self) -> &str {
        self.span.str()
    }
}

impl SourceElement for Identifier {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Represents a contiguous sequence of characters that are reserved for a keyword.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Keyword {
    /// Is the span that makes up the token.
    pub span: Span,

    /// Is the [`KeywordKind`] that the token represents.
    pub keyword: KeywordKind,
}

impl SourceElement for Keyword {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Represents one of the punctuation characters `;`, `:`, `*` and `.`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Punctuation {
    /// Is the span that makes up the token.
    pub span: Span,

    /// Is the ASCII punctuation character that the token represents.
    pub punctuation: char,
}

impl Punctuation {
    /// Returns the kind of the punctuation token.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        TokenKind::from_punctuation(self.punctuation).unwrap_or(TokenKind::Invalid)
    }
}

impl SourceElement for Punctuation {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Represents an unsigned decimal integer literal in the source code.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer {
    /// Is the span that makes up the token.
    pub span: Span,
}

impl SourceElement for Integer {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Marks the end of the source code. Its span is empty and sits behind the last character.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndOfInput {
    /// Is the span that makes up the token.
    pub span: Span,
}

impl SourceElement for EndOfInput {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// A single character that does not start any token.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Invalid {
    /// Is the span that makes up the token.
    pub span: Span,
}

impl Invalid {
    /// Returns the offending character.
    #[must_use]
    pub fn character(&self) -> char {
        self.span.str().chars().next().unwrap_or_default()
    }
}

impl SourceElement for Invalid {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Is an error that can occur when invoking the [`Token::tokenize`] method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
#[allow(missing_docs)]
pub enum TokenizeError {
    #[error("the iterator argument is at the end of the source code.")]
    EndOfSourceCodeIteratorArgument,
}

impl Token {
    /// Increments the iterator while the predicate returns true.
    pub fn walk_iter(iter: &mut SourceIterator, predicate: impl Fn(char) -> bool) {
        while let Some((_, character)) = iter.peek() {
            if !predicate(character) {
                break;
            }

            iter.next();
        }
    }

    /// Creates a span from the given start location to the current location of the iterator.
    fn create_span(start: usize, iter: &mut SourceIterator) -> Span {
        let end = iter.offset();
        Span::new(iter.source_file().clone(), start, end)
            .expect("the iterator only stops on character boundaries")
    }

    /// Checks if the given character is a valid first character of an identifier.
    fn is_first_identifier_character(character: char) -> bool {
        character.is_ascii_alphabetic()
    }

    /// Checks if the given character is a valid character of an identifier.
    fn is_identifier_character(character: char) -> bool {
        character.is_ascii_alphanumeric()
    }

    /// Handles a contiguous sequence of characters that are valid in an identifier.
    fn handle_identifier_and_keyword(iter: &mut SourceIterator, start: usize) -> Self {
        Self::walk_iter(iter, Self::is_identifier_character);

        let span = Self::create_span(start, iter);

        // Checks if the word is a keyword
        KeywordKind::from_str(span.str()).map_or_else(
            |_| Identifier { span: span.clone() }.into(),
            |keyword| {
                Keyword {
                    span: span.clone(),
                    keyword,
                }
                .into()
            },
        )
    }

    /// Handles a sequence of digits
    fn handle_integer_literal(iter: &mut SourceIterator, start: usize) -> Self {
        Self::walk_iter(iter, |character| character.is_ascii_digit());

        Integer {
            span: Self::create_span(start, iter),
        }
        .into()
    }

    /// Lexes the source code from the given iterator.
    ///
    /// The tokenization starts at the current location of the iterator, which must not point at
    /// white space. The function moves the iterator at least once and forwards it until it makes
    /// a token. After the token is made, the iterator is left at the next character that is not
    /// part of the token.
    ///
    /// # Errors
    /// - [`TokenizeError::EndOfSourceCodeIteratorArgument`] - The iterator argument is at the end of the
    ///   source code.
    pub fn tokenize(iter: &mut SourceIterator) -> Result<Self, TokenizeError> {
        // Gets the first character
        let (start, character) = iter
            .next()
            .ok_or(TokenizeError::EndOfSourceCodeIteratorArgument)?;

        // Found identifier/keyword
        if Self::is_first_identifier_character(character) {
            Ok(Self::handle_identifier_and_keyword(iter, start))
        }
        // Found integer literal
        else if character.is_ascii_digit() {
            Ok(Self::handle_integer_literal(iter, start))
        }
        // Found a punctuation
        else if TokenKind::from_punctuation(character).is_some() {
            Ok(Punctuation {
                span: Self::create_span(start, iter),
                punctuation: character,
            }
            .into())
        }
        // Anything else is consumed as a single invalid character
        else {
            Ok(Invalid {
                span: Self::create_span(start, iter),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::source_file::SourceFile;

    fn tokenize_all(source: &str) -> Vec<(TokenKind, String)> {
        let file = SourceFile::from_source("test", source);
        let mut iter = file.iter();
        let mut tokens = Vec::new();

        while let Ok(token) = Token::tokenize(&mut iter) {
            tokens.push((token.kind(), token.lexeme().to_string()));
        }

        tokens
    }

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(KeywordKind::from_str("MODULE"), Ok(KeywordKind::Module));
        assert_eq!(KeywordKind::from_str("RETURN"), Ok(KeywordKind::Return));
        assert_eq!(KeywordKind::from_str("module"), Err(KeywordParseError));
        assert_eq!(KeywordKind::from_str("Begin"), Err(KeywordParseError));

        for keyword in KeywordKind::iter() {
            assert_eq!(KeywordKind::from_str(keyword.as_str()), Ok(keyword));
        }
    }

    #[test]
    fn test_identifier_and_keyword() {
        assert_eq!(
            tokenize_all("abc123"),
            vec![(TokenKind::Identifier, "abc123".to_string())]
        );
        assert_eq!(
            tokenize_all("END"),
            vec![(TokenKind::Keyword(KeywordKind::End), "END".to_string())]
        );
        assert_eq!(
            tokenize_all("ENDING"),
            vec![(TokenKind::Identifier, "ENDING".to_string())]
        );
    }

    #[test]
    fn test_integer_stops_at_letter() {
        assert_eq!(
            tokenize_all("007x"),
            vec![
                (TokenKind::IntegerLiteral, "007".to_string()),
                (TokenKind::Identifier, "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_punctuation_and_invalid() {
        assert_eq!(
            tokenize_all(";:*.(_"),
            vec![
                (TokenKind::Semicolon, ";".to_string()),
                (TokenKind::Colon, ":".to_string()),
                (TokenKind::Asterisk, "*".to_string()),
                (TokenKind::Period, ".".to_string()),
                (TokenKind::Invalid, "(".to_string()),
                (TokenKind::Invalid, "_".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_multibyte_character() {
        let file = SourceFile::from_source("test", "é1");
        let mut iter = file.iter();

        let token = Token::tokenize(&mut iter).unwrap();
        assert_eq!(token.as_invalid().map(Invalid::character), Some('é'));
        assert_eq!(
            Token::tokenize(&mut iter).unwrap().kind(),
            TokenKind::IntegerLiteral
        );
        assert_eq!(
            Token::tokenize(&mut iter),
            Err(TokenizeError::EndOfSourceCodeIteratorArgument)
        );
    }
}
