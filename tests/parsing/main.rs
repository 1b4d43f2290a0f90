use std::path::Path;

use titania::{
    base::{source_file::SourceElement, MemoryProvider, PrintHandler, SilentHandler},
    lexical::token::{KeywordKind, TokenKind},
    syntax::{
        error::Error,
        syntax_tree::{declaration::Declaration, statement::Statement},
    },
};

fn provider(name: &str, source: &str) -> MemoryProvider {
    let mut provider = MemoryProvider::new();
    provider.add_file(name, source);
    provider
}

#[test]
fn parsing_answer() {
    let source = include_str!("./answer.tit");
    let provider = provider("answer.tit", source);

    let parsed = titania::parse(&PrintHandler::new(), &provider, Path::new("answer.tit"))
        .expect("Failed to parse");

    assert_eq!(parsed.name(), "Answers");

    let declarations = parsed.declarations();
    assert_eq!(
        declarations.len(),
        source.matches("PROCEDURE").count(),
        "one declaration per procedure"
    );

    let Declaration::Procedure(answer) = &declarations[0];
    assert_eq!(answer.name(), "Answer");
    assert!(answer.is_exported());
    assert_eq!(answer.return_type_name(), Some("INTEGER"));
    assert_eq!(answer.body().map(|body| body.len()), Some(1));

    let Declaration::Procedure(nothing) = &declarations[1];
    assert_eq!(nothing.identifier().span().str(), "Nothing");
    assert!(!nothing.is_exported());
    assert!(nothing.return_type_name().is_none());
    assert!(nothing.body().is_none());

    let Declaration::Procedure(several) = &declarations[2];
    let values = several
        .body()
        .expect("Expected a body")
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
    assert_eq!(values, vec![None, Some(7), Some(u64::MAX)]);
}

#[test]
fn parsing_invalid() {
    let source = include_str!("./invalid.tit");
    let provider = provider("invalid.tit", source);
    let handler = SilentHandler::<Error>::new();

    let result = titania::parse(&handler, &provider, Path::new("invalid.tit"));
    assert!(result.is_err());

    let errors = handler.take();
    assert_eq!(errors.len(), 3);

    let locations = errors
        .iter()
        .map(|error| {
            let location = error.location();
            (location.line, location.column)
        })
        .collect::<Vec<_>>();
    assert_eq!(locations, vec![(3, 3), (5, 14), (10, 5)]);

    let Error::UnexpectedSyntax(misspelled) = &errors[2] else {
        panic!("Expected an unexpected syntax error");
    };
    assert_eq!(misspelled.found_kind(), TokenKind::Identifier);
    assert_eq!(misspelled.suggestion(), Some(KeywordKind::Return));
}

#[test]
fn parsing_missing_file() {
    let provider = MemoryProvider::new();

    let result = titania::parse(&PrintHandler::new(), &provider, Path::new("missing.tit"));
    assert!(matches!(result, Err(titania::base::Error::IoError(_))));
}

#[test]
fn parsing_str_examples() {
    let module = titania::parse_str("MODULE M; END.").expect("Failed to parse");
    assert_eq!(module.name(), "M");
    assert!(module.declarations().is_empty());

    let module = titania::parse_str("MODULE M; PROCEDURE P*: T; BEGIN RETURN 42 END; END.")
        .expect("Failed to parse");
    let Declaration::Procedure(procedure) = &module.declarations()[0];
    assert!(procedure.is_exported());
    assert_eq!(procedure.return_type_name(), Some("T"));

    let errors = titania::parse_str("MODULE M PROCEDURE P; END; END.").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].location().column, 10);
}

#[test]
fn parsing_str_integer_overflow() {
    let errors = titania::parse_str("MODULE M; PROCEDURE P; BEGIN RETURN 18446744073709551616 END; END.")
        .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], Error::IntegerOverflow(_)));
}

#[test]
fn tokenizing_is_repeatable() {
    let source = include_str!("./answer.tit");
    let provider = provider("answer.tit", source);

    let first = titania::tokenize(&provider, Path::new("answer.tit")).expect("Failed to tokenize");
    let second = titania::tokenize(&provider, Path::new("answer.tit")).expect("Failed to tokenize");

    assert_eq!(first, second);
    assert_eq!(first.last().map(|token| token.kind()), Some(TokenKind::EndOfInput));
}

#[test]
fn parsing_is_repeatable() {
    let source = "MODULE M; PROCEDURE P*: T; BEGIN RETURN; RETURN 7 END; END.";
    assert_eq!(titania::parse_str(source), titania::parse_str(source));
    assert!(titania::parse_str(source).is_ok());

    let invalid = include_str!("./invalid.tit");
    let first = titania::parse_str(invalid).unwrap_err();
    let second = titania::parse_str(invalid).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(
        first.iter().map(Error::found_kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Keyword(KeywordKind::Procedure),
            TokenKind::IntegerLiteral,
            TokenKind::Identifier
        ]
    );
}
