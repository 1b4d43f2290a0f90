//! Module for handling source files and their elements.

use std::{
    cmp::Ordering,
    fmt::Debug,
    iter::{Iterator, Peekable},
    ops::Range,
    path::{Path, PathBuf},
    str::CharIndices,
    sync::Arc,
};

use getset::{CopyGetters, Getters};

use super::{file_provider::FileProvider, Error};

/// Represents a source file that contains the source code.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Getters)]
pub struct SourceFile {
    /// Get the path of the source file.
    #[get = "pub"]
    path: PathBuf,
    /// Get the identifier of the source file.
    #[get = "pub"]
    identifier: String,
    /// Get the content of the source file
    #[get = "pub"]
    content: String,
    lines: Vec<Range<usize>>,
}

#[allow(clippy::missing_fields_in_debug)]
impl Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("lines", &self.lines)
            .finish()
    }
}

impl SourceFile {
    fn new(path: PathBuf, identifier: String, content: String) -> Arc<Self> {
        let lines = get_line_byte_positions(&content);

        Arc::new(Self {
            path,
            identifier,
            content,
            lines,
        })
    }

    /// Create a source file that only lives in memory.
    ///
    /// The identifier doubles as the path of the file.
    #[must_use]
    pub fn from_source(identifier: impl Into<String>, content: impl Into<String>) -> Arc<Self> {
        let identifier = identifier.into();
        Self::new(PathBuf::from(&identifier), identifier, content.into())
    }

    /// Get the line of the source file at the given line number.
    ///
    /// Numbering starts at 1.
    #[must_use]
    pub fn get_line(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }

        let line = line - 1;
        self.lines
            .get(line)
            .map(|range| &self.content()[range.clone()])
    }

    /// Get the [`SourceIterator`] for the source file.
    #[must_use]
    pub fn iter<'a>(self: &'a Arc<Self>) -> SourceIterator<'a> {
        SourceIterator {
            source_file: self,
            iterator: self.content().char_indices().peekable(),
        }
    }

    /// Load the source file from the given file path.
    ///
    /// # Errors
    /// - [`Error::IoError`]: Error occurred when reading the file contents.
    pub fn load(
        path: &Path,
        identifier: String,
        provider: &impl FileProvider,
    ) -> Result<Arc<Self>, Error> {
        let source = provider.read_str(path)?;
        Ok(Self::new(
            path.to_path_buf(),
            identifier,
            source.into_owned(),
        ))
    }

    /// Get the [`Location`] of a given byte index.
    ///
    /// The index one past the last byte is valid and points just behind the last character.
    #[must_use]
    pub fn get_location(&self, byte_index: usize) -> Option<Location> {
        if !self.content.is_char_boundary(byte_index) {
            return None;
        }

        let line = if byte_index == self.content.len() {
            self.lines.len() - 1
        } else {
            // get the line number by binary searching the line ranges
            self.lines
                .binary_search_by(|range| {
                    if range.contains(&byte_index) {
                        Ordering::Equal
                    } else if byte_index < range.start {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    }
                })
                .ok()?
        };

        let line_range = &self.lines[line];
        let line_str = &self.content[line_range.clone()];

        // get the column number by iterating through the utf-8 characters (starts at 1)
        let column = line_str
            .char_indices()
            .take_while(|(i, _)| *i + line_range.start < byte_index)
            .count()
            + 1;

        Some(Location {
            line: line + 1,
            column,
        })
    }

    /// Get the relative path of the source file from the current working directory.
    #[must_use]
    pub fn path_relative(&self) -> Option<PathBuf> {
        pathdiff::diff_paths(&self.path, std::env::current_dir().ok()?)
    }

    /// Whether both handles refer to the same source text under the same identifier.
    fn is_same_as(self: &Arc<Self>, other: &Arc<Self>) -> bool {
        Arc::ptr_eq(self, other)
            || (self.identifier == other.identifier && self.content == other.content)
    }
}

/// Represents a range of characters in a source file.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Getters, CopyGetters)]
pub struct Span {
    /// Get the start byte index of the span.
    #[get_copy = "pub"]
    start: usize,

    /// Get the end byte index of the span (exclusive).
    #[get_copy = "pub"]
    end: usize,

    /// Get the source file that the span is located in.
    #[get = "pub"]
    source_file: Arc<SourceFile>,
}

#[allow(clippy::missing_fields_in_debug)]
impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Span")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("content", &self.str())
            .finish()
    }
}

/// Spans are equal when they cover the same range of the same source text, even if the text
/// was loaded twice.
impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.source_file.is_same_as(&other.source_file)
            && self.start == other.start
            && self.end == other.end
    }
}

impl Eq for Span {}

#[allow(clippy::non_canonical_partial_ord_impl)]
impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Span {
    fn cmp(&self, other: &Self) -> Ordering {
        let source_ordering = if self.source_file.is_same_as(&other.source_file) {
            Ordering::Equal
        } else {
            self.source_file
                .identifier
                .cmp(&other.source_file.identifier)
                .then_with(|| self.source_file.content.cmp(&other.source_file.content))
        };

        source_ordering
            .then_with(|| self.start.cmp(&other.start))
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl std::hash::Hash for Span {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
        self.source_file.identifier.hash(state);
    }
}

impl Span {
    /// Create a span from the given start and end byte indices in the source file.
    ///
    /// # Parameters
    /// - `start`: The start byte index of the span.
    /// - `end`: The end byte index of the span (exclusive).
    #[must_use]
    pub fn new(source_file: Arc<SourceFile>, start: usize, end: usize) -> Option<Self> {
        if start > end
            || !source_file.content().is_char_boundary(start)
            || !source_file.content().is_char_boundary(end)
        {
            return None;
        }

        Some(Self {
            start,
            end,
            source_file,
        })
    }

    /// Create a span from the given start byte index to the end of the source file.
    #[must_use]
    pub fn to_end(source_file: Arc<SourceFile>, start: usize) -> Option<Self> {
        if !source_file.content().is_char_boundary(start) {
            return None;
        }
        Some(Self {
            start,
            end: source_file.content().len(),
            source_file,
        })
    }

    /// Get the string slice of the source code that the span represents.
    #[must_use]
    pub fn str(&self) -> &str {
        &self.source_file.content()[self.start..self.end]
    }

    /// Get the starting [`Location`] of the span.
    #[must_use]
    pub fn start_location(&self) -> Location {
        self.source_file
            .get_location(self.start)
            .unwrap_or_default()
    }

    /// Join the starting position of this span with the end position of the given span.
    #[must_use]
    pub fn join(&self, end: &Self) -> Option<Self> {
        if !self.source_file.is_same_as(&end.source_file) || self.start > end.end {
            return None;
        }

        Some(Self {
            start: self.start,
            end: end.end,
            source_file: self.source_file.clone(),
        })
    }
}

/// Pointing to a particular location in a source file.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    /// Line number of the location (starts at 1).
    pub line: usize,

    /// Column number of the location (starts at 1).
    pub column: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents an element that is located within a source file.
pub trait SourceElement {
    /// Get the span location of the element.
    fn span(&self) -> Span;
}

/// Iterator iterating over the characters in a source file that can be peeked at.
#[derive(Debug, Clone, CopyGetters)]
pub struct SourceIterator<'a> {
    /// Get the source file that the iterator is iterating over.
    #[get_copy = "pub"]
    source_file: &'a Arc<SourceFile>,
    iterator: Peekable<CharIndices<'a>>,
}

impl<'a> SourceIterator<'a> {
    /// Peek at the next character in the source file.
    pub fn peek(&mut self) -> Option<(usize, char)> {
        self.iterator.peek().copied()
    }

    /// Byte index of the next character, or the length of the source if the iterator is exhausted.
    pub fn offset(&mut self) -> usize {
        self.peek()
            .map_or_else(|| self.source_file.content().len(), |(index, _)| index)
    }
}

impl<'a> Iterator for SourceIterator<'a> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        self.iterator.next()
    }
}

/// Get the byte positions of the lines in the given text.
fn get_line_byte_positions(text: &str) -> Vec<Range<usize>> {
    let mut current_position = 0;
    let mut results = Vec::new();

    let mut skip = false;

    for (byte, char) in text.char_indices() {
        if skip {
            skip = false;
            continue;
        }

        // lf
        if char == '\n' {
            #[allow(clippy::range_plus_one)]
            results.push(current_position..byte + 1);

            current_position = byte + 1;
        }

        // crlf
        if char == '\r' {
            if text.as_bytes().get(byte + 1) == Some(&b'\n') {
                results.push(current_position..byte + 2);

                current_position = byte + 2;

                skip = true;
            } else {
                #[allow(clippy::range_plus_one)]
                results.push(current_position..byte + 1);

                current_position = byte + 1;
            }
        }
    }

    // add the last line
    results.push(current_position..text.len());

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_byte_positions() {
        assert_eq!(get_line_byte_positions(""), vec![0..0]);
        assert_eq!(get_line_byte_positions("ab\ncd"), vec![0..3, 3..5]);
        assert_eq!(get_line_byte_positions("a\r\nb\rc\n"), vec![0..3, 3..5, 5..7, 7..7]);
    }

    #[test]
    fn test_get_location() {
        let file = SourceFile::from_source("test", "MODULE M;\n  END.");

        assert_eq!(file.get_location(0), Some(Location { line: 1, column: 1 }));
        assert_eq!(file.get_location(7), Some(Location { line: 1, column: 8 }));
        assert_eq!(file.get_location(12), Some(Location { line: 2, column: 3 }));
    }

    #[test]
    fn test_get_location_end_of_file() {
        let file = SourceFile::from_source("test", "END.");
        assert_eq!(file.get_location(4), Some(Location { line: 1, column: 5 }));

        let file = SourceFile::from_source("test", "END.\n");
        assert_eq!(file.get_location(5), Some(Location { line: 2, column: 1 }));

        let file = SourceFile::from_source("test", "");
        assert_eq!(file.get_location(0), Some(Location { line: 1, column: 1 }));
    }

    #[test]
    fn test_get_location_counts_characters() {
        let file = SourceFile::from_source("test", "ä ö x");

        // `x` starts at byte 6 but is the fifth character
        assert_eq!(file.get_location(6), Some(Location { line: 1, column: 5 }));
        assert_eq!(file.get_location(1), None);
    }

    #[test]
    fn test_span() {
        let file = SourceFile::from_source("test", "MODULE Main;");
        let keyword = Span::new(file.clone(), 0, 6).unwrap();
        let name = Span::new(file.clone(), 7, 11).unwrap();

        assert_eq!(keyword.str(), "MODULE");
        assert_eq!(name.start_location(), Location { line: 1, column: 8 });
        assert_eq!(keyword.join(&name).unwrap().str(), "MODULE Main");
        assert!(name.join(&keyword).is_none());
        assert!(Span::new(file.clone(), 5, 2).is_none());
        assert_eq!(Span::to_end(file, 11).unwrap().str(), ";");
    }

    #[test]
    fn test_span_equality_compares_source_text() {
        let first = SourceFile::from_source("test", "END");
        let reloaded = SourceFile::from_source("test", "END");
        let edited = SourceFile::from_source("test", "END.");
        let renamed = SourceFile::from_source("other", "END");

        assert_eq!(Span::new(first.clone(), 0, 3), Span::new(reloaded.clone(), 0, 3));
        assert_eq!(
            Span::new(first.clone(), 0, 3).unwrap().cmp(&Span::new(reloaded.clone(), 0, 3).unwrap()),
            Ordering::Equal
        );
        assert_ne!(Span::new(first.clone(), 0, 3), Span::new(edited, 0, 3));
        assert_ne!(Span::new(first.clone(), 0, 3), Span::new(renamed, 0, 3));

        let keyword = Span::new(first, 0, 1).unwrap();
        let rest = Span::new(reloaded, 1, 3).unwrap();
        assert_eq!(keyword.join(&rest).map(|span| span.str().to_string()), Some("END".to_string()));
    }
}
