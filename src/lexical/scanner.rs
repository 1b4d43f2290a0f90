//! Contains the lazy [`Scanner`] over a source file.

use std::{iter::FusedIterator, sync::Arc};

use crate::base::source_file::{SourceFile, SourceIterator, Span};

use super::token::{EndOfInput, Token, TokenizeError};

/// Produces the tokens of a source file one at a time.
///
/// White space between tokens is skipped. The last token is always a single
/// [`Token::EndOfInput`]; after it the scanner yields [`None`] forever. A scanner
/// cannot be rewound, scanning again requires a new one.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    iter: SourceIterator<'a>,
    finished: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of the source file.
    #[must_use]
    pub fn new(source_file: &'a Arc<SourceFile>) -> Self {
        Self {
            iter: source_file.iter(),
            finished: false,
        }
    }

    /// Gets the source file being scanned.
    #[must_use]
    pub fn source_file(&self) -> &'a Arc<SourceFile> {
        self.iter.source_file()
    }

    fn end_of_input(&mut self) -> Token {
        let source_file = self.iter.source_file().clone();
        let end = source_file.content().len();

        EndOfInput {
            span: Span::to_end(source_file, end).expect("the end of the source is a char boundary"),
        }
        .into()
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        Token::walk_iter(&mut self.iter, char::is_whitespace);

        match Token::tokenize(&mut self.iter) {
            Ok(token) => {
                tracing::trace!(kind = ?token.kind(), lexeme = token.lexeme(), "Scanned token");
                Some(token)
            }
            Err(TokenizeError::EndOfSourceCodeIteratorArgument) => {
                self.finished = true;
                Some(self.end_of_input())
            }
        }
    }
}

impl FusedIterator for Scanner<'_> {}
