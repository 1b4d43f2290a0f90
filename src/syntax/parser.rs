//! Provides the [`Parser`], the recursive descent parser driving the syntax tree productions.
//!
//! The productions themselves live next to the nodes they build in [`super::syntax_tree`].

use crate::{
    base::{source_file::Span, Handler},
    lexical::{
        scanner::Scanner,
        token::{EndOfInput, Identifier, Keyword, KeywordKind, Punctuation, Token, TokenKind},
    },
};

use super::error::{Error, SyntaxKind, UnexpectedSyntax};

/// Tokens at which panic mode recovery always stops discarding.
const SYNCHRONIZING: &[TokenKind] = &[
    TokenKind::Semicolon,
    TokenKind::Keyword(KeywordKind::End),
    TokenKind::EndOfInput,
];

/// A recursive descent parser with a single token of lookahead.
///
/// Errors are reported to the handler passed to each production. After an error the parser
/// discards tokens until it reaches a synchronizing token and continues, so that one pass
/// reports every independent error. Further mismatches are not reported until a token has
/// been matched again, which keeps one mistake from producing a cascade of errors.
#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token,
    resynchronizing: bool,
    aborted: bool,
    error_count: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser reading from the given scanner.
    #[must_use]
    pub fn new(mut scanner: Scanner<'a>) -> Self {
        let current = scanner.next().unwrap_or_else(|| {
            let source_file = scanner.source_file().clone();
            let end = source_file.content().len();
            EndOfInput {
                span: Span::to_end(source_file, end)
                    .expect("the end of the source is a char boundary"),
            }
            .into()
        });

        Self {
            scanner,
            current,
            resynchronizing: false,
            aborted: false,
            error_count: 0,
        }
    }

    /// Gets the lookahead token without consuming it.
    #[must_use]
    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Gets the kind of the lookahead token.
    #[must_use]
    pub fn peek_kind(&self) -> TokenKind {
        self.current.kind()
    }

    /// Checks if the parser has reached the end of the input.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current.is_end_of_input()
    }

    /// Gets the number of errors reported so far.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Checks if the parser gave up because the input ended in the middle of a production.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Passes the node on only if no error was reported since the count was `errors_before`.
    ///
    /// Productions use this so that a node is never built from input the parser skipped while
    /// recovering.
    #[must_use]
    pub fn unless_recovered<T>(&self, errors_before: usize, node: Option<T>) -> Option<T> {
        node.filter(|_| self.error_count == errors_before)
    }

    /// Consumes the lookahead token and returns it.
    ///
    /// The end of input is never consumed, forwarding past it returns it again.
    pub fn forward(&mut self) -> Token {
        if self.is_exhausted() {
            return self.current.clone();
        }

        let next = self
            .scanner
            .next()
            .unwrap_or_else(|| self.current.clone());
        std::mem::replace(&mut self.current, next)
    }

    /// Reports an error to the handler and counts it.
    pub fn report(&mut self, error: impl Into<Error>, handler: &impl Handler<Error>) {
        let error = error.into();
        self.error_count += 1;

        tracing::debug!(location = %error.location(), "Recorded syntax error");

        handler.receive(error);
    }

    /// Discards tokens until the lookahead satisfies the predicate or the input ends.
    pub fn stop_at(&mut self, predicate: impl Fn(TokenKind) -> bool) {
        while !self.is_exhausted() && !predicate(self.peek_kind()) {
            let discarded = self.forward();
            tracing::trace!(lexeme = discarded.lexeme(), "Discarded token");
        }
    }

    /// Consumes the lookahead token if it satisfies the expected syntax.
    ///
    /// Otherwise an [`UnexpectedSyntax`] error is reported (unless the parser is still
    /// resynchronizing from an earlier error) and tokens are discarded until one that is
    /// synchronizing, expected, or in `follow` is reached. When the expected token is found this
    /// way it is consumed and returned.
    pub fn expect(
        &mut self,
        expected: SyntaxKind,
        follow: &[TokenKind],
        handler: &impl Handler<Error>,
    ) -> Option<Token> {
        self.expect_reporting(expected, expected, follow, handler)
    }

    /// Like [`Parser::expect`], but reports `reported` as the expected syntax.
    ///
    /// Used where optional elements could have appeared before the required token, so the error
    /// lists every token that would have been valid at this point.
    pub fn expect_reporting(
        &mut self,
        accepted: SyntaxKind,
        reported: SyntaxKind,
        follow: &[TokenKind],
        handler: &impl Handler<Error>,
    ) -> Option<Token> {
        if self.aborted {
            return None;
        }

        if accepted.accepts(self.peek_kind()) {
            self.resynchronizing = false;
            return Some(self.forward());
        }

        self.report_unexpected(reported, handler);
        self.synchronize(accepted, follow);

        if accepted.accepts(self.peek_kind()) {
            self.resynchronizing = false;
            Some(self.forward())
        } else {
            None
        }
    }

    /// Reports the lookahead as unexpected and skips to the next synchronizing token,
    /// without consuming it.
    pub fn recover(
        &mut self,
        expected: SyntaxKind,
        follow: &[TokenKind],
        handler: &impl Handler<Error>,
    ) {
        if self.aborted {
            return;
        }

        self.report_unexpected(expected, handler);
        self.synchronize(expected, follow);
    }

    fn report_unexpected(&mut self, expected: SyntaxKind, handler: &impl Handler<Error>) {
        if !self.resynchronizing {
            self.resynchronizing = true;
            self.report(
                UnexpectedSyntax {
                    expected,
                    found: self.current.clone(),
                },
                handler,
            );
        }
    }

    fn synchronize(&mut self, expected: SyntaxKind, follow: &[TokenKind]) {
        self.stop_at(|kind| {
            expected.accepts(kind) || SYNCHRONIZING.contains(&kind) || follow.contains(&kind)
        });

        if self.is_exhausted() && !expected.accepts(TokenKind::EndOfInput) {
            tracing::debug!("Reached the end of input while recovering, stopping");
            self.aborted = true;
        }
    }

    /// Consumes the lookahead token if it is the given punctuation.
    ///
    /// Used for optional grammar elements, a mismatch is not an error.
    pub fn accept_punctuation(&mut self, punctuation: char) -> Option<Punctuation> {
        let matches = matches!(
            &self.current,
            Token::Punctuation(current) if current.punctuation == punctuation
        );

        if matches && !self.aborted {
            self.resynchronizing = false;
            self.forward().into_punctuation().ok()
        } else {
            None
        }
    }

    /// Consumes the lookahead token if it is the given keyword.
    ///
    /// Used for optional grammar elements, a mismatch is not an error.
    pub fn accept_keyword(&mut self, keyword: KeywordKind) -> Option<Keyword> {
        if self.peek_kind() == TokenKind::Keyword(keyword) && !self.aborted {
            self.resynchronizing = false;
            self.forward().into_keyword().ok()
        } else {
            None
        }
    }

    /// Parses the given keyword.
    pub fn parse_keyword(
        &mut self,
        keyword: KeywordKind,
        follow: &[TokenKind],
        handler: &impl Handler<Error>,
    ) -> Option<Keyword> {
        self.expect(SyntaxKind::Keyword(keyword), follow, handler)?
            .into_keyword()
            .ok()
    }

    /// Parses the given punctuation.
    pub fn parse_punctuation(
        &mut self,
        punctuation: char,
        follow: &[TokenKind],
        handler: &impl Handler<Error>,
    ) -> Option<Punctuation> {
        self.expect(SyntaxKind::Punctuation(punctuation), follow, handler)?
            .into_punctuation()
            .ok()
    }

    /// Parses an [`Identifier`].
    pub fn parse_identifier(
        &mut self,
        follow: &[TokenKind],
        handler: &impl Handler<Error>,
    ) -> Option<Identifier> {
        self.expect(SyntaxKind::Identifier, follow, handler)?
            .into_identifier()
            .ok()
    }
}
