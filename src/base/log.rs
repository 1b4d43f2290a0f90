//! Module containing structures and implementations for logging messages to the user.

use colored::Colorize;
use std::fmt::Display;

use super::source_file::Span;

/// Represent the severity of a log message to be printed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Severity {
    Error,
}

/// Struct implementing [`Display`] that represents a log message to be displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Message<T> {
    /// The severity of the log message.
    pub severity: Severity,

    /// The message to be displayed.
    pub display: T,
}
impl<T> Message<T> {
    /// Create a new log message with the given severity and message to be displayed.
    pub fn new(severity: Severity, display: T) -> Self {
        Self { severity, display }
    }
}

impl<T: Display> Display for Message<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let log_header = match self.severity {
            Severity::Error => "[error]:".red().bold(),
        };

        let message_part = &self.display.to_string().bold();

        write!(f, "{log_header} {message_part}")
    }
}

/// Structure implementing [`Display`] that prints the line of source code a span starts on,
/// with the span underlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceCodeDisplay<'a, T> {
    /// The span of the source code to be printed.
    pub span: &'a Span,

    /// The help message to be displayed.
    pub help_display: Option<T>,
}

impl<'a, T> SourceCodeDisplay<'a, T> {
    /// Create a new source code display with the given span and help message to be displayed.
    pub fn new(span: &'a Span, help_display: Option<T>) -> Self {
        Self { span, help_display }
    }
}

impl<'a, T: std::fmt::Display> Display for SourceCodeDisplay<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source_file = self.span.source_file();
        let location = self.span.start_location();
        let path = source_file
            .path_relative()
            .unwrap_or_else(|| source_file.path().clone());

        let line_number = location.line.to_string();
        let gutter = " ".repeat(line_number.len());

        writeln!(
            f,
            "{gutter}{} {}:{location}",
            "-->".cyan().bold(),
            path.display()
        )?;

        let line = source_file
            .get_line(location.line)
            .unwrap_or_default()
            .trim_end_matches(['\n', '\r']);

        // underline at least one column, even for the empty end of input span
        let width = self
            .span
            .str()
            .lines()
            .next()
            .map_or(0, |first| first.chars().count())
            .max(1);

        writeln!(f, "{gutter} {}", "|".cyan().bold())?;
        writeln!(f, "{} {} {line}", line_number.cyan().bold(), "|".cyan().bold())?;
        write!(
            f,
            "{gutter} {} {}{}",
            "|".cyan().bold(),
            " ".repeat(location.column.saturating_sub(1)),
            "^".repeat(width).red().bold()
        )?;

        if let Some(help_display) = &self.help_display {
            write!(f, "\n\n{} {help_display}", "help:".green().bold())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::source_file::SourceFile;

    #[test]
    fn test_source_code_display() {
        colored::control::set_override(false);

        let file = SourceFile::from_source("main.tit", "MODULE M;\nPROCEDURE @;");
        let span = Span::new(file, 20, 21).unwrap();

        let rendered = SourceCodeDisplay::new(&span, Some("remove this character")).to_string();

        assert!(rendered.contains("main.tit:2:11"));
        assert!(rendered.contains("2 | PROCEDURE @;"));
        assert!(rendered.contains("  |           ^"));
        assert!(rendered.ends_with("help: remove this character"));
    }
}
