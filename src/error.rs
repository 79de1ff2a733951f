//! # Error Types
//!
//! This module defines the error and warning types for the chord sheet pipeline.
//!
//! Fatal failures carry enough location information (line/column for source errors,
//! the failing operation for transforms) for a caller to show a useful message.
//! Non-fatal problems, such as a single chord token that does not parse, are
//! reported as [`Warning`]s alongside a successful result.
//!
//! ## Error Types
//! - `ParseError` - ChordPro grammar errors with line and column information
//! - `MetadataError` - Invalid YAML frontmatter in a chord sheet
//! - `TransformError` - A transpose or chord-extraction failure on a parsed song
//! - `ConfigError` - Invalid render options
//!
//! ## Usage
//! ```rust
//! use chordsheet::{parse_chordpro, ChordSheetError};
//!
//! match parse_chordpro("[C]Hello [G") {
//!     Ok(song) => println!("{} lines", song.lines.len()),
//!     Err(ChordSheetError::ParseError { line, column, message }) => {
//!         eprintln!("Parse error at {}:{}: {}", line, column, message);
//!     }
//!     Err(e) => eprintln!("Error in {}: {}", e.area(), e),
//! }
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordSheetError {
    /// Parse error with location information.
    ///
    /// Occurs when ChordPro source has unbalanced brackets or malformed directives.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordSheetError;
    /// let err = ChordSheetError::ParseError {
    ///     line: 3,
    ///     column: 7,
    ///     message: "Unclosed chord bracket".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error at line 3, column 7: Unclosed chord bracket");
    /// ```
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Invalid frontmatter metadata in a chords-over-lyrics sheet.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordSheetError;
    /// let err = ChordSheetError::MetadataError("expected a mapping".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: expected a mapping");
    /// ```
    #[error("Invalid metadata: {0}")]
    MetadataError(String),

    /// An operation on an already parsed song failed.
    ///
    /// Kept apart from `ParseError` so callers can tell "the song is fine, the
    /// operation on it is not".
    #[error("{operation} failed: {message}")]
    TransformError {
        operation: Operation,
        message: String,
    },

    /// Render options could not be read or are out of range.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl ChordSheetError {
    /// Name of the pipeline stage that produced this error, for "Error in {area}" labels.
    pub fn area(&self) -> &'static str {
        match self {
            ChordSheetError::ParseError { .. } | ChordSheetError::MetadataError(_) => "Parser",
            ChordSheetError::TransformError { operation, .. } => operation.area(),
            ChordSheetError::ConfigError(_) => "Configuration",
        }
    }

    pub(crate) fn parse_error(line: usize, column: usize, message: impl Into<String>) -> Self {
        ChordSheetError::ParseError {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Song-level operations that can fail after parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operation {
    Transpose,
    ChordExtraction,
}

impl Operation {
    pub fn area(&self) -> &'static str {
        match self {
            Operation::Transpose => "Transpose",
            Operation::ChordExtraction => "ChordExtraction",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.area())
    }
}

/// A non-fatal problem found while processing a song.
///
/// `line` is the 1-based index into `Song::lines`. Warnings returned by
/// [`render`](crate::render) point at the source line instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub line: usize,
    pub message: String,
}

impl Warning {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// A successful result together with the warnings collected while producing it
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    pub fn new(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }

    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_labels() {
        let parse = ChordSheetError::parse_error(1, 1, "bad");
        assert_eq!(parse.area(), "Parser");
        assert_eq!(ChordSheetError::MetadataError("x".into()).area(), "Parser");
        assert_eq!(ChordSheetError::ConfigError("x".into()).area(), "Configuration");

        let transform = ChordSheetError::TransformError {
            operation: Operation::ChordExtraction,
            message: "too deep".to_string(),
        };
        assert_eq!(transform.area(), "ChordExtraction");
        assert_eq!(transform.to_string(), "ChordExtraction failed: too deep");
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::new(4, "Could not parse chord 'Xyz'");
        assert_eq!(warning.to_string(), "line 4: Could not parse chord 'Xyz'");
    }
}
