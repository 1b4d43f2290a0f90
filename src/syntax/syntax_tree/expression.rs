//! Syntax tree nodes for expressions.

use enum_as_inner::EnumAsInner;
use getset::{CopyGetters, Getters};

use crate::{
    base::{
        source_file::{SourceElement, Span},
        Handler,
    },
    lexical::token::{Integer, TokenKind},
    syntax::{
        error::{Error, IntegerOverflow, SyntaxKind},
        parser::Parser,
    },
};

/// Syntax Synopsis:
///
/// ```ebnf
/// Expression:
///     IntegerLiteral
///     ;
/// ```
#[allow(missing_docs)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum Expression {
    IntegerLiteral(IntegerLiteral),
}

impl Expression {
    /// Checks if a token of the given kind can start an expression.
    #[must_use]
    pub fn starts_with(kind: TokenKind) -> bool {
        kind == TokenKind::IntegerLiteral
    }
}

impl SourceElement for Expression {
    fn span(&self) -> Span {
        match self {
            Self::IntegerLiteral(literal) => literal.span(),
        }
    }
}

/// An unsigned decimal integer and its value.
///
/// Syntax Synopsis:
///
/// ```ebnf
/// IntegerLiteral:
///     Digit { Digit }
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters, CopyGetters)]
pub struct IntegerLiteral {
    /// The integer token as written in the source.
    #[get = "pub"]
    token: Integer,
    /// The numeric value, leading zeros do not matter.
    #[get_copy = "pub"]
    value: u64,
}

impl SourceElement for IntegerLiteral {
    fn span(&self) -> Span {
        self.token.span()
    }
}

impl<'a> Parser<'a> {
    /// Parses an [`Expression`].
    pub fn parse_expression(&mut self, handler: &impl Handler<Error>) -> Option<Expression> {
        let errors_before = self.error_count();
        let token = self
            .expect(SyntaxKind::Integer, &[], handler)?
            .into_integer()
            .ok()?;

        match token.span.str().parse::<u64>() {
            Ok(value) => self.unless_recovered(
                errors_before,
                Some(Expression::IntegerLiteral(IntegerLiteral { token, value })),
            ),
            Err(_) => {
                self.report(IntegerOverflow { span: token.span }, handler);
                None
            }
        }
    }
}
