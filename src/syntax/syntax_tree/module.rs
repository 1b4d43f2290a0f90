//! The module node of the syntax tree.

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

use super::declaration::Declaration;

/// A module is a named collection of declarations, the root of the syntax tree.
///
/// Syntax Synopsis:
///
/// ``` ebnf
/// Module:
///     'MODULE' Identifier ';' Declaration* 'END' '.'
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters)]
pub struct Module {
    /// The `MODULE` keyword.
    #[get = "pub"]
    module_keyword: Keyword,
    /// The name of the module.
    #[get = "pub"]
    identifier: Identifier,
    /// The semicolon terminating the module heading.
    #[get = "pub"]
    semicolon: Punctuation,
    /// The declarations within the module, in source order.
    #[get = "pub"]
    declarations: Vec<Declaration>,
    /// The closing `END` keyword.
    #[get = "pub"]
    end_keyword: Keyword,
    /// The final period.
    #[get = "pub"]
    period: Punctuation,
}

impl Module {
    /// The name of the module, as written.
    #[must_use]
    pub fn name(&self) -> &str {
        self.identifier.name()
    }

    /// Dissolves the [`Module`] into its components.
    #[must_use]
    pub fn dissolve(
        self,
    ) -> (
        Keyword,
        Identifier,
        Punctuation,
        Vec<Declaration>,
        Keyword,
        Punctuation,
    ) {
        (
            self.module_keyword,
            self.identifier,
            self.semicolon,
            self.declarations,
            self.end_keyword,
            self.period,
        )
    }
}

impl SourceElement for Module {
    fn span(&self) -> Span {
        self.module_keyword
            .span()
            .join(&self.period.span())
            .expect("Invalid span")
    }
}

/// Tokens that may follow the declarations of a module.
const AFTER_DECLARATION: SyntaxKind = SyntaxKind::Either(&[
    SyntaxKind::Keyword(KeywordKind::Procedure),
    SyntaxKind::Keyword(KeywordKind::End),
]);

impl<'a> Parser<'a> {
    /// Parses a [`Module`], consuming the whole input.
    ///
    /// Returns [`None`] if any error was reported, even if the parser managed to recover from it.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_module(&mut self, handler: &impl Handler<Error>) -> Option<Module> {
        tracing::debug!("Parsing module");

        let heading_follow = [TokenKind::Keyword(KeywordKind::Procedure)];

        let module_keyword = self.parse_keyword(KeywordKind::Module, &heading_follow, handler);
        let identifier = self.parse_identifier(&heading_follow, handler);
        let semicolon = self.parse_punctuation(';', &heading_follow, handler);

        if let Some(identifier) = &identifier {
            tracing::debug!("Found module '{}', parsing declarations", identifier.name());
        }

        let mut declarations = Vec::new();

        loop {
            match self.peek_kind() {
                TokenKind::Keyword(KeywordKind::Procedure) => {
                    if let Some(declaration) = self.parse_declaration(handler) {
                        declarations.push(declaration);
                    }
                }
                TokenKind::Keyword(KeywordKind::End) | TokenKind::EndOfInput => break,
                _ => {
                    self.recover(
                        AFTER_DECLARATION,
                        &[TokenKind::Keyword(KeywordKind::Procedure)],
                        handler,
                    );

                    // a stray statement separator, skip it and look for the next declaration
                    if self.peek_kind() == TokenKind::Semicolon {
                        self.forward();
                    }
                }
            }
        }

        let end_keyword = self
            .expect_reporting(
                SyntaxKind::Keyword(KeywordKind::End),
                AFTER_DECLARATION,
                &[],
                handler,
            )
            .and_then(|token| token.into_keyword().ok());
        let period = self.parse_punctuation('.', &[], handler);

        // trailing content
        self.expect(SyntaxKind::EndOfInput, &[], handler);

        tracing::debug!(
            declarations = declarations.len(),
            errors = self.error_count(),
            "Finished parsing module"
        );

        let module = Module {
            module_keyword: module_keyword?,
            identifier: identifier?,
            semicolon: semicolon?,
            declarations,
            end_keyword: end_keyword?,
            period: period?,
        };

        (self.error_count() == 0).then_some(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        base::{source_file::SourceFile, SilentHandler},
        lexical::scanner::Scanner,
        syntax::syntax_tree::statement::Statement,
    };

    fn parse_module(source: &str) -> (Option<Module>, Vec<Error>) {
        let file = SourceFile::from_source("test", source);
        let mut parser = Parser::new(Scanner::new(&file));
        let handler = SilentHandler::<Error>::new();

        let module = parser.parse_module(&handler);
        (module, handler.take())
    }

    fn unexpected(error: &Error) -> (usize, usize, Vec<TokenKind>, TokenKind) {
        let Error::UnexpectedSyntax(error) = error else {
            panic!("expected an unexpected syntax error, got {error:?}");
        };
        let location = error.location();
        (
            location.line,
            location.column,
            error.expected_kinds(),
            error.found_kind(),
        )
    }

    #[test]
    fn test_empty_module() {
        let (module, errors) = parse_module("MODULE M; END.");
        let module = module.unwrap();

        assert!(errors.is_empty());
        assert_eq!(module.name(), "M");
        assert!(module.declarations().is_empty());
        assert_eq!(module.span().str(), "MODULE M; END.");
    }

    #[test]
    fn test_procedure_without_body() {
        let (module, errors) = parse_module("MODULE M; PROCEDURE P; END; END.");
        let module = module.unwrap();

        assert!(errors.is_empty());
        assert_eq!(module.declarations().len(), 1);

        let Declaration::Procedure(procedure) = &module.declarations()[0];
        assert_eq!(procedure.name(), "P");
        assert!(!procedure.is_exported());
        assert_eq!(procedure.return_type_name(), None);
        assert!(procedure.body().is_none());
    }

    #[test]
    fn test_exported_procedure_returning_value() {
        let (module, errors) = parse_module("MODULE M; PROCEDURE P*: T; BEGIN RETURN 42 END; END.");
        let module = module.unwrap();

        assert!(errors.is_empty());
        let Declaration::Procedure(procedure) = &module.declarations()[0];
        assert!(procedure.is_exported());
        assert_eq!(procedure.return_type_name(), Some("T"));

        let body = procedure.body().unwrap();
        let statements = body.iter().collect::<Vec<_>>();
        assert_eq!(statements.len(), 1);

        let Statement::Return(statement) = statements[0];
        let value = statement.value().as_ref().unwrap();
        assert_eq!(value.as_integer_literal().map(|literal| literal.value()), Some(42));
    }

    #[test]
    fn test_two_statement_body() {
        let (module, errors) =
            parse_module("MODULE M; PROCEDURE P; BEGIN RETURN; RETURN 7 END; END.");
        let module = module.unwrap();

        assert!(errors.is_empty());
        let Declaration::Procedure(procedure) = &module.declarations()[0];
        let values = procedure
            .body()
            .unwrap()
            .iter()
            .map(|statement| {
                let Statement::Return(statement) = statement;
                statement
                    .value()
                    .as_ref()
                    .and_then(|value| value.as_integer_literal())
                    .map(|literal| literal.value())
            })
            .collect::<Vec<_>>();

        assert_eq!(values, vec![None, Some(7)]);
    }

    #[test]
    fn test_declaration_count_matches_procedures() {
        let (module, errors) = parse_module(
            "MODULE M;\n  PROCEDURE A; END;\n  PROCEDURE B*; BEGIN RETURN END;\n  PROCEDURE A: X; END;\nEND.\n",
        );
        let module = module.unwrap();

        assert!(errors.is_empty());
        let names = module
            .declarations()
            .iter()
            .map(|Declaration::Procedure(procedure)| procedure.name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["A", "B", "A"]);
    }

    #[test]
    fn test_missing_heading_semicolon() {
        let (module, errors) = parse_module("MODULE M PROCEDURE P; END; END.");

        assert!(module.is_none());
        assert_eq!(errors.len(), 1);

        let (line, column, expected, found) = unexpected(&errors[0]);
        assert_eq!((line, column), (1, 10));
        assert!(expected.contains(&TokenKind::Semicolon));
        assert_eq!(found, TokenKind::Keyword(KeywordKind::Procedure));
    }

    #[test]
    fn test_stray_character() {
        let (module, errors) = parse_module("MODULE M; PROCEDURE P@; END; END.");

        assert!(module.is_none());
        assert_eq!(errors.len(), 1);

        let (line, column, _, found) = unexpected(&errors[0]);
        assert_eq!((line, column), (1, 22));
        assert_eq!(found, TokenKind::Invalid);
    }

    #[test]
    fn test_invalid_character_inside_statement() {
        let source = "MODULE M; PROCEDURE P; BEGIN RETURN @ 1 END; END.";
        let (module, errors) = parse_module(source);

        assert!(module.is_none());
        assert_eq!(errors.len(), 1);

        let (_, column, expected, found) = unexpected(&errors[0]);
        assert_eq!(column, 37);
        assert_eq!(
            expected,
            vec![TokenKind::Semicolon, TokenKind::Keyword(KeywordKind::End)]
        );
        assert_eq!(found, TokenKind::Invalid);

        // the neighbours of the invalid character keep their own positions
        let file = SourceFile::from_source("test", source);
        let neighbours = Scanner::new(&file)
            .skip_while(|token| token.lexeme() != "RETURN")
            .take(4)
            .map(|token| (token.kind(), token.location().column))
            .collect::<Vec<_>>();
        assert_eq!(
            neighbours,
            vec![
                (TokenKind::Keyword(KeywordKind::Return), 30),
                (TokenKind::Invalid, 37),
                (TokenKind::IntegerLiteral, 39),
                (TokenKind::Keyword(KeywordKind::End), 41),
            ]
        );
    }

    #[test]
    fn test_parenthesis_star_is_not_a_comment() {
        let (module, errors) = parse_module("MODULE M; (* note *) END.");

        assert!(module.is_none());
        assert_eq!(errors.len(), 1);

        let (_, column, _, found) = unexpected(&errors[0]);
        assert_eq!(column, 11);
        assert_eq!(found, TokenKind::Invalid);
    }

    #[test]
    fn test_stray_token_between_declarations() {
        let (module, errors) = parse_module("MODULE M; PROCEDURE A; END; 42 PROCEDURE B; END; END.");

        assert!(module.is_none());
        assert_eq!(errors.len(), 1);

        let (_, column, expected, found) = unexpected(&errors[0]);
        assert_eq!(column, 29);
        assert_eq!(
            expected,
            vec![
                TokenKind::Keyword(KeywordKind::Procedure),
                TokenKind::Keyword(KeywordKind::End)
            ]
        );
        assert_eq!(found, TokenKind::IntegerLiteral);
    }

    #[test]
    fn test_independent_errors_are_all_reported() {
        let (module, errors) = parse_module(
            "MODULE M;\nPROCEDURE A; BEGIN RETURN 1 2 END;\nPROCEDURE B: ; END;\nEND.",
        );

        assert!(module.is_none());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].location().line, 2);
        assert_eq!(errors[0].location().column, 29);
        assert_eq!(errors[1].location().line, 3);
        assert_eq!(errors[1].location().column, 14);
    }

    #[test]
    fn test_trailing_content() {
        let (module, errors) = parse_module("MODULE M; END. M");

        assert!(module.is_none());
        assert_eq!(errors.len(), 1);

        let (_, column, expected, found) = unexpected(&errors[0]);
        assert_eq!(column, 16);
        assert_eq!(expected, vec![TokenKind::EndOfInput]);
        assert_eq!(found, TokenKind::Identifier);
    }

    #[test]
    fn test_missing_period_at_end_of_input() {
        let (module, errors) = parse_module("MODULE M; END");

        assert!(module.is_none());
        assert_eq!(errors.len(), 1);

        let (_, column, expected, found) = unexpected(&errors[0]);
        assert_eq!(column, 14);
        assert_eq!(expected, vec![TokenKind::Period]);
        assert_eq!(found, TokenKind::EndOfInput);
    }

    #[test]
    fn test_unexpected_end_of_input_stops_parsing() {
        let (module, errors) = parse_module("MODULE M; PROCEDURE P; BEGIN");

        assert!(module.is_none());
        assert_eq!(errors.len(), 1);
        assert_eq!(
            unexpected(&errors[0]).2,
            vec![TokenKind::Keyword(KeywordKind::Return)]
        );
    }

    #[test]
    fn test_empty_input() {
        let (module, errors) = parse_module("");

        assert!(module.is_none());
        assert_eq!(errors.len(), 1);
        assert_eq!(unexpected(&errors[0]).3, TokenKind::EndOfInput);
    }
}
