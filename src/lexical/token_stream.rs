//! Contains the [`TokenStream`] struct.

use std::{fmt::Debug, sync::Arc};

use derive_more::Deref;

use crate::base::source_file::SourceFile;

use super::{scanner::Scanner, token::Token};

/// Is the complete list of [`Token`]s of a source file, ending with [`Token::EndOfInput`].
///
/// This is the eagerly collected output of a [`Scanner`]. The parser consumes the scanner
/// directly; a token stream is meant for inspecting or comparing scans.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref)]
pub struct TokenStream {
    #[deref]
    tokens: Vec<Token>,
}

impl Debug for TokenStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tokens.iter()).finish()
    }
}

impl TokenStream {
    /// Tokenizes the given source code.
    ///
    /// Invalid characters do not stop the tokenization, they become [`Token::Invalid`] tokens.
    #[must_use]
    #[tracing::instrument(level = "debug", skip_all, fields(source_file = %source_file.path().display()))]
    pub fn tokenize(source_file: &Arc<SourceFile>) -> Self {
        let tokens = Scanner::new(source_file).collect::<Vec<_>>();

        tracing::debug!(
            count = tokens.len(),
            invalid = tokens.iter().filter(|token| token.is_invalid()).count(),
            "Tokenized source code"
        );

        Self { tokens }
    }

    /// Dissolves this struct into the list of tokens.
    #[must_use]
    pub fn dissolve(self) -> Vec<Token> {
        self.tokens
    }
}

impl IntoIterator for TokenStream {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}
