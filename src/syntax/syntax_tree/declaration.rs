//! Syntax tree nodes for declarations.

#![allow(missing_docs)]

use enum_as_inner::EnumAsInner;
use getset::Getters;

use crate::{
    base::{
        source_file::{SourceElement, Span},
        Handler,
    },
    lexical::token::{Identifier, Keyword, KeywordKind, Punctuation, TokenKind},
    syntax::{
        error::{Error, SyntaxKind},
        parser::Parser,
    },
};

use super::statement::Body;

/// Syntax Synopsis:
///
/// ``` ebnf
/// Declaration:
///     ProcedureDeclaration
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum Declaration {
    Procedure(ProcedureDeclaration),
}

impl SourceElement for Declaration {
    fn span(&self) -> Span {
        match self {
            Self::Procedure(procedure) => procedure.span(),
        }
    }
}

/// A procedure terminated by a semicolon.
///
/// Syntax Synopsis:
///
/// ``` ebnf
/// ProcedureDeclaration:
///     Procedure ';'
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters)]
pub struct ProcedureDeclaration {
    #[get = "pub"]
    procedure: Procedure,
    #[get = "pub"]
    semicolon: Punctuation,
}

impl ProcedureDeclaration {
    /// The name of the procedure, as written.
    #[must_use]
    pub fn name(&self) -> &str {
        self.procedure.name()
    }

    /// The name of the procedure as a token.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        self.procedure.identifier()
    }

    /// Whether the procedure is marked for export with `*`.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.procedure.is_exported()
    }

    /// The name of the declared return type, if any.
    #[must_use]
    pub fn return_type_name(&self) -> Option<&str> {
        self.procedure.return_type_name()
    }

    /// The statements of the procedure, [`None`] if the `BEGIN` clause was omitted.
    #[must_use]
    pub fn body(&self) -> Option<&Body> {
        self.procedure.body().as_ref()
    }

    /// Dissolves the [`ProcedureDeclaration`] into its components.
    #[must_use]
    pub fn dissolve(self) -> (Procedure, Punctuation) {
        (self.procedure, self.semicolon)
    }
}

impl SourceElement for ProcedureDeclaration {
    fn span(&self) -> Span {
        self.procedure.span().join(&self.semicolon.span()).unwrap()
    }
}

/// Syntax Synopsis:
///
/// ``` ebnf
/// Procedure:
///     'PROCEDURE' Identifier '*'? ReturnType? ';' Body? 'END'
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters)]
pub struct Procedure {
    #[get = "pub"]
    procedure_keyword: Keyword,
    #[get = "pub"]
    identifier: Identifier,
    #[get = "pub"]
    export_marker: Option<Punctuation>,
    #[get = "pub"]
    return_type: Option<ReturnType>,
    #[get = "pub"]
    semicolon: Punctuation,
    #[get = "pub"]
    body: Option<Body>,
    #[get = "pub"]
    end_keyword: Keyword,
}

impl Procedure {
    /// The name of the procedure, as written.
    #[must_use]
    pub fn name(&self) -> &str {
        self.identifier.name()
    }

    /// Whether the procedure is marked for export with `*`.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.export_marker.is_some()
    }

    /// The name of the declared return type, if any.
    #[must_use]
    pub fn return_type_name(&self) -> Option<&str> {
        self.return_type.as_ref().map(ReturnType::name)
    }

    /// Dissolves the [`Procedure`] into its components.
    #[must_use]
    #[allow(clippy::type_complexity)]
    pub fn dissolve(
        self,
    ) -> (
        Keyword,
        Identifier,
        Option<Punctuation>,
        Option<ReturnType>,
        Punctuation,
        Option<Body>,
        Keyword,
    ) {
        (
            self.procedure_keyword,
            self.identifier,
            self.export_marker,
            self.return_type,
            self.semicolon,
            self.body,
            self.end_keyword,
        )
    }
}

impl SourceElement for Procedure {
    fn span(&self) -> Span {
        self.procedure_keyword
            .span()
            .join(&self.end_keyword.span())
            .unwrap()
    }
}

/// Syntax Synopsis:
///
/// ``` ebnf
/// ReturnType:
///     ':' Identifier
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters)]
pub struct ReturnType {
    #[get = "pub"]
    colon: Punctuation,
    #[get = "pub"]
    identifier: Identifier,
}

impl ReturnType {
    /// The name of the type, as written.
    #[must_use]
    pub fn name(&self) -> &str {
        self.identifier.name()
    }
}

impl SourceElement for ReturnType {
    fn span(&self) -> Span {
        self.colon.span().join(&self.identifier.span()).unwrap()
    }
}

/// Tokens that may follow the procedure name.
const AFTER_NAME: SyntaxKind = SyntaxKind::Either(&[
    SyntaxKind::Punctuation('*'),
    SyntaxKind::Punctuation(':'),
    SyntaxKind::Punctuation(';'),
]);

/// Tokens that may follow the export marker.
const AFTER_EXPORT_MARKER: SyntaxKind =
    SyntaxKind::Either(&[SyntaxKind::Punctuation(':'), SyntaxKind::Punctuation(';')]);

/// Tokens that may follow the procedure heading.
const AFTER_HEADING: SyntaxKind = SyntaxKind::Either(&[
    SyntaxKind::Keyword(KeywordKind::Begin),
    SyntaxKind::Keyword(KeywordKind::End),
]);

/// Tokens that may follow a statement of the body.
const AFTER_STATEMENT: SyntaxKind = SyntaxKind::Either(&[
    SyntaxKind::Punctuation(';'),
    SyntaxKind::Keyword(KeywordKind::End),
]);

impl<'a> Parser<'a> {
    /// Parses a [`Declaration`].
    pub fn parse_declaration(&mut self, handler: &impl Handler<Error>) -> Option<Declaration> {
        let errors_before = self.error_count();
        let procedure = self.parse_procedure(handler);
        let semicolon = self.parse_punctuation(';', &[], handler);

        let declaration = Declaration::Procedure(ProcedureDeclaration {
            procedure: procedure?,
            semicolon: semicolon?,
        });
        self.unless_recovered(errors_before, Some(declaration))
    }

    /// Parses a [`Procedure`].
    pub fn parse_procedure(&mut self, handler: &impl Handler<Error>) -> Option<Procedure> {
        let errors_before = self.error_count();
        let procedure_keyword = self.parse_keyword(KeywordKind::Procedure, &[], handler);

        let identifier = self.parse_identifier(
            &[
                TokenKind::Asterisk,
                TokenKind::Colon,
                TokenKind::Keyword(KeywordKind::Begin),
            ],
            handler,
        );

        let export_marker = self.accept_punctuation('*');

        let return_type = self.accept_punctuation(':').map(|colon| {
            self.parse_identifier(&[TokenKind::Keyword(KeywordKind::Begin)], handler)
                .map(|identifier| ReturnType { colon, identifier })
        });

        let expected_semicolon = match (&export_marker, &return_type) {
            (_, Some(_)) => SyntaxKind::Punctuation(';'),
            (Some(_), None) => AFTER_EXPORT_MARKER,
            (None, None) => AFTER_NAME,
        };
        let semicolon = self
            .expect_reporting(
                SyntaxKind::Punctuation(';'),
                expected_semicolon,
                &[TokenKind::Keyword(KeywordKind::Begin)],
                handler,
            )
            .and_then(|token| token.into_punctuation().ok());

        let body = (self.peek_kind() == TokenKind::Keyword(KeywordKind::Begin))
            .then(|| self.parse_body(handler));

        let expected_end = if body.is_some() {
            AFTER_STATEMENT
        } else {
            AFTER_HEADING
        };
        let end_keyword = self
            .expect_reporting(
                SyntaxKind::Keyword(KeywordKind::End),
                expected_end,
                &[],
                handler,
            )
            .and_then(|token| token.into_keyword().ok());

        let procedure = Procedure {
            procedure_keyword: procedure_keyword?,
            identifier: identifier?,
            export_marker,
            return_type: match return_type {
                Some(return_type) => Some(return_type?),
                None => None,
            },
            semicolon: semicolon?,
            body: match body {
                Some(body) => Some(body?),
                None => None,
            },
            end_keyword: end_keyword?,
        };
        self.unless_recovered(errors_before, Some(procedure))
    }
}
