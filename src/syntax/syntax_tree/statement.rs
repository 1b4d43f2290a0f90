//! Syntax tree nodes for statements.

use enum_as_inner::EnumAsInner;
use getset::Getters;

use crate::{
    base::{
        source_file::{SourceElement, Span},
        Handler,
    },
    lexical::token::{Keyword, KeywordKind, Punctuation},
    syntax::{error::Error, parser::Parser},
};

use super::{expression::Expression, ConnectedList};

/// Syntax Synopsis:
///
/// ``` ebnf
/// Statement:
///     ReturnStatement
///     ;
/// ```
#[allow(missing_docs)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum Statement {
    Return(ReturnStatement),
}

impl SourceElement for Statement {
    fn span(&self) -> Span {
        match self {
            Self::Return(statement) => statement.span(),
        }
    }
}

/// Syntax Synopsis:
///
/// ``` ebnf
/// ReturnStatement:
///     'RETURN' Expression?
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters)]
pub struct ReturnStatement {
    /// The `RETURN` keyword.
    #[get = "pub"]
    return_keyword: Keyword,
    /// The returned value, if any.
    #[get = "pub"]
    value: Option<Expression>,
}

impl ReturnStatement {
    /// Dissolves the [`ReturnStatement`] into its components.
    #[must_use]
    pub fn dissolve(self) -> (Keyword, Option<Expression>) {
        (self.return_keyword, self.value)
    }
}

impl SourceElement for ReturnStatement {
    fn span(&self) -> Span {
        self.value.as_ref().map_or_else(
            || self.return_keyword.span(),
            |value| {
                self.return_keyword
                    .span()
                    .join(&value.span())
                    .expect("The span of the return statement is invalid.")
            },
        )
    }
}

/// The statements of a procedure.
///
/// Syntax Synopsis:
///
/// ``` ebnf
/// Body:
///     'BEGIN' Statement (';' Statement)*
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters)]
pub struct Body {
    /// The `BEGIN` keyword.
    #[get = "pub"]
    begin_keyword: Keyword,
    /// The statements, separated by semicolons.
    #[get = "pub"]
    statements: ConnectedList<Statement, Punctuation>,
}

impl Body {
    /// Returns an iterator over the statements in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.elements()
    }

    /// Gets the number of statements, always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Always `false`, a body holds at least one statement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Dissolves the [`Body`] into its components.
    #[must_use]
    pub fn dissolve(self) -> (Keyword, ConnectedList<Statement, Punctuation>) {
        (self.begin_keyword, self.statements)
    }
}

impl SourceElement for Body {
    fn span(&self) -> Span {
        self.begin_keyword
            .span()
            .join(&self.statements.span())
            .unwrap()
    }
}

impl<'a> Parser<'a> {
    /// Parses a [`Body`].
    pub fn parse_body(&mut self, handler: &impl Handler<Error>) -> Option<Body> {
        let errors_before = self.error_count();
        let begin_keyword = self.parse_keyword(KeywordKind::Begin, &[], handler);
        let statements = self.parse_statement_sequence(handler);

        let body = Body {
            begin_keyword: begin_keyword?,
            statements: statements?,
        };
        self.unless_recovered(errors_before, Some(body))
    }

    /// Parses one or more statements separated by semicolons.
    pub fn parse_statement_sequence(
        &mut self,
        handler: &impl Handler<Error>,
    ) -> Option<ConnectedList<Statement, Punctuation>> {
        let errors_before = self.error_count();
        let first = self.parse_statement(handler);
        let mut rest = Vec::new();
        let mut complete = first.is_some();

        while let Some(semicolon) = self.accept_punctuation(';') {
            match self.parse_statement(handler) {
                Some(statement) => rest.push((semicolon, statement)),
                None => complete = false,
            }
        }

        let mut statements = ConnectedList::new(first?);
        for (semicolon, statement) in rest {
            statements.push(semicolon, statement);
        }

        self.unless_recovered(errors_before, complete.then_some(statements))
    }

    /// Parses a [`Statement`].
    pub fn parse_statement(&mut self, handler: &impl Handler<Error>) -> Option<Statement> {
        let errors_before = self.error_count();
        let return_keyword = self.parse_keyword(KeywordKind::Return, &[], handler)?;

        // the value is optional, `RETURN` may be followed directly by `;` or `END`
        let value = if Expression::starts_with(self.peek_kind()) {
            Some(self.parse_expression(handler)?)
        } else {
            None
        };

        let statement = Statement::Return(ReturnStatement {
            return_keyword,
            value,
        });
        self.unless_recovered(errors_before, Some(statement))
    }
}
