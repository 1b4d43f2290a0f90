//! Contains the error types that can occur while parsing the syntax of the language.

use std::fmt::Display;

use itertools::Itertools as _;

use crate::{
    base::{
        log::{Message, Severity, SourceCodeDisplay},
        source_file::{Location, Span},
    },
    lexical::token::{KeywordKind, Token, TokenKind},
};

/// An enumeration containing all kinds of syntactic errors that can occur while parsing the
/// source code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    UnexpectedSyntax(#[from] UnexpectedSyntax),
    #[error(transparent)]
    IntegerOverflow(#[from] IntegerOverflow),
}

impl Error {
    /// Gets the line and column the error was detected at.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::UnexpectedSyntax(error) => error.location(),
            Self::IntegerOverflow(error) => error.span.start_location(),
        }
    }

    /// Gets the token kinds that would have been valid where the error was detected.
    ///
    /// An integer literal that is too large still has to be an integer literal.
    #[must_use]
    pub fn expected_kinds(&self) -> Vec<TokenKind> {
        match self {
            Self::UnexpectedSyntax(error) => error.expected_kinds(),
            Self::IntegerOverflow(_) => vec![TokenKind::IntegerLiteral],
        }
    }

    /// Gets the kind of the token the error was detected at.
    #[must_use]
    pub fn found_kind(&self) -> TokenKind {
        match self {
            Self::UnexpectedSyntax(error) => error.found_kind(),
            Self::IntegerOverflow(_) => TokenKind::IntegerLiteral,
        }
    }
}

/// Enumeration containing all kinds of syntax that can be failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum SyntaxKind {
    Either(&'static [SyntaxKind]),
    Punctuation(char),
    Keyword(KeywordKind),
    Identifier,
    Integer,
    EndOfInput,
}

impl SyntaxKind {
    fn expected_binding_str(&self) -> String {
        match self {
            Self::Either(variants) => {
                if variants.is_empty() {
                    "end of input".to_string()
                } else if variants.len() == 1 {
                    variants[0].expected_binding_str()
                } else {
                    let comma_elements = variants[..variants.len() - 1]
                        .iter()
                        .map(Self::expected_binding_str)
                        .join(", ");
                    let last = variants[variants.len() - 1].expected_binding_str();
                    format!("{comma_elements}, or {last}")
                }
            }
            Self::Identifier => TokenKind::Identifier.to_string(),
            Self::Punctuation(char) => format!("a punctuation token `{char}`"),
            Self::Keyword(keyword) => TokenKind::Keyword(*keyword).to_string(),
            Self::Integer => TokenKind::IntegerLiteral.to_string(),
            Self::EndOfInput => TokenKind::EndOfInput.to_string(),
        }
    }

    /// Gets the token kinds that satisfy this syntax, in the order they were listed.
    #[must_use]
    pub fn token_kinds(&self) -> Vec<TokenKind> {
        match self {
            Self::Either(variants) => variants
                .iter()
                .flat_map(Self::token_kinds)
                .unique()
                .collect(),
            Self::Punctuation(char) => TokenKind::from_punctuation(*char).into_iter().collect(),
            Self::Keyword(keyword) => vec![TokenKind::Keyword(*keyword)],
            Self::Identifier => vec![TokenKind::Identifier],
            Self::Integer => vec![TokenKind::IntegerLiteral],
            Self::EndOfInput => vec![TokenKind::EndOfInput],
        }
    }

    /// Whether a token of the given kind satisfies this syntax.
    #[must_use]
    pub fn accepts(&self, kind: TokenKind) -> bool {
        match self {
            Self::Either(variants) => variants.iter().any(|variant| variant.accepts(kind)),
            Self::Punctuation(char) => TokenKind::from_punctuation(*char) == Some(kind),
            Self::Keyword(keyword) => kind == TokenKind::Keyword(*keyword),
            Self::Identifier => kind == TokenKind::Identifier,
            Self::Integer => kind == TokenKind::IntegerLiteral,
            Self::EndOfInput => kind == TokenKind::EndOfInput,
        }
    }

    fn keywords(&self) -> Vec<KeywordKind> {
        self.token_kinds()
            .into_iter()
            .filter_map(|kind| match kind {
                TokenKind::Keyword(keyword) => Some(keyword),
                _ => None,
            })
            .collect()
    }
}

/// A syntax/token is expected but found an other invalid token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnexpectedSyntax {
    /// The kind of syntax that was expected.
    pub expected: SyntaxKind,

    /// The invalid token that was found.
    pub found: Token,
}

impl UnexpectedSyntax {
    /// Gets the line and column of the offending token.
    #[must_use]
    pub fn location(&self) -> Location {
        self.found.location()
    }

    /// Gets every token kind that would have been accepted.
    #[must_use]
    pub fn expected_kinds(&self) -> Vec<TokenKind> {
        self.expected.token_kinds()
    }

    /// Gets the kind of the offending token.
    #[must_use]
    pub fn found_kind(&self) -> TokenKind {
        self.found.kind()
    }

    /// Gets the expected keyword the offending identifier most likely was meant to be.
    #[must_use]
    pub fn suggestion(&self) -> Option<KeywordKind> {
        let identifier = self.found.as_identifier()?.name().to_ascii_uppercase();

        self.expected
            .keywords()
            .into_iter()
            .map(|keyword| {
                (
                    strsim::normalized_damerau_levenshtein(&identifier, keyword.as_str()),
                    keyword,
                )
            })
            .filter(|(similarity, _)| *similarity > 0.7)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, keyword)| keyword)
    }
}

impl Display for UnexpectedSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let expected_binding = self.expected.expected_binding_str();
        let found_binding = match &self.found {
            Token::Keyword(keyword) => TokenKind::Keyword(keyword.keyword).to_string(),
            Token::Punctuation(punctuation) => {
                format!("a punctuation token `{}`", punctuation.punctuation)
            }
            Token::Invalid(invalid) => format!("an invalid character `{}`", invalid.character()),
            token => token.kind().to_string(),
        };

        let message = format!("expected {expected_binding}, but found {found_binding}");

        write!(f, "{}", Message::new(Severity::Error, message))?;

        let help = self
            .suggestion()
            .map(|keyword| format!("did you mean `{keyword}`? keywords are case sensitive"));

        write!(
            f,
            "\n{}",
            SourceCodeDisplay::new(self.found.span(), help)
        )
    }
}

impl std::error::Error for UnexpectedSyntax {}

/// An integer literal whose value does not fit into 64 bits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntegerOverflow {
    /// The span of the integer literal.
    pub span: Span,
}

impl Display for IntegerOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            Message::new(Severity::Error, "integer literal is too large")
        )?;
        write!(
            f,
            "\n{}",
            SourceCodeDisplay::new(
                &self.span,
                Some(format!("the largest integer literal is {}", u64::MAX))
            )
        )
    }
}

impl std::error::Error for IntegerOverflow {}
