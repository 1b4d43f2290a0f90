//! The `Titania` front end.
//!
//! `Titania` is a small Oberon-like teaching language. This crate turns its source code into
//! tokens and a syntax tree, reporting every syntax error it finds along the way.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

pub mod base;
pub mod lexical;
pub mod syntax;

use std::path::Path;

use base::{source_file::SourceFile, FileProvider, Handler, Result, SilentHandler};
use syntax::syntax_tree::module::Module;

use crate::{
    base::Error,
    lexical::{scanner::Scanner, token_stream::TokenStream},
    syntax::parser::Parser,
};

/// Converts the given source code to tokens.
///
/// # Errors
/// - If an error occurs while reading the file.
pub fn tokenize(file_provider: &impl FileProvider, path: &Path) -> Result<TokenStream> {
    let source_file = SourceFile::load(path, path.to_string_lossy().into_owned(), file_provider)?;

    Ok(TokenStream::tokenize(&source_file))
}

/// Parses the given source code.
///
/// Every syntax error is passed to the handler in the order it was found.
///
/// # Errors
/// - If an error occurs while reading the file.
/// - If an error occurs while parsing the source code.
pub fn parse(
    handler: &impl Handler<syntax::error::Error>,
    file_provider: &impl FileProvider,
    path: &Path,
) -> Result<Module> {
    let source_file = SourceFile::load(path, path.to_string_lossy().into_owned(), file_provider)?;

    tracing::info!("Parsing {}", path.display());

    let mut parser = Parser::new(Scanner::new(&source_file));
    parser.parse_module(handler).ok_or(Error::Other(
        "An error occurred while parsing the source code.",
    ))
}

/// Parses source code held in memory.
///
/// # Errors
/// - The syntax errors of the source code, in the order they were found. The list is never
///   empty.
pub fn parse_str(source: &str) -> std::result::Result<Module, Vec<syntax::error::Error>> {
    let source_file = SourceFile::from_source("<input>", source);
    let handler = SilentHandler::<syntax::error::Error>::new();

    let mut parser = Parser::new(Scanner::new(&source_file));
    parser.parse_module(&handler).ok_or_else(|| handler.take())
}
