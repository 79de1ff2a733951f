//! # Parser Module
//!
//! Turns song text into a [`Song`]. Two dialects are supported:
//!
//! ### ChordPro
//! Chords sit inline in brackets right before the syllable they belong to, and
//! metadata lives in `{name: value}` directive lines:
//! ```text
//! {title: Test}
//! [C]Hello [G]world
//! ```
//!
//! ### Chord sheet (chords over lyrics)
//! A line of chord names sits above the lyric line, aligned by column:
//! ```text
//! C       G
//! Hello there friend
//! ```
//!
//! Both produce the same document model, so transforms and formatters never need
//! to know where a song came from.
//!
//! ## Entry Points
//! - [`parse_chordpro()`] - strict, errors carry line/column
//! - [`parse_chord_sheet()`] - lenient, only frontmatter can fail
//! - [`Dialect::detect()`] - pick a dialect from the text itself
//! - [`strip_tab_sections()`] - remove `start_of_tab` … `end_of_tab` blocks before parsing
//!
//! ## Related Modules
//! - `lexer` - tokenizes ChordPro
//! - `ast` - the Song/Line/Segment types produced here
//! - `chord` - decides which tokens are chords

mod chord_sheet;
mod chordpro;
mod tabs;

pub use chord_sheet::{is_chord_line, ChordSheetOptions, ChordSheetParser};
pub use chordpro::ChordProParser;
pub use tabs::strip_tab_sections;

pub(crate) use tabs::strip_tab_sections_with_lines;

pub(crate) use chord_sheet::snap_to_word;

use crate::ast::{Song, Tag};
use crate::error::ChordSheetError;
use crate::lexer::Lexer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parse ChordPro source into a Song.
///
/// # Example
/// ```rust
/// use chordsheet::parse_chordpro;
///
/// let song = parse_chordpro("{title: Test}\n[C]Hello [G]world\n").unwrap();
/// assert_eq!(song.title(), Some("Test"));
/// assert_eq!(song.lines.len(), 2);
/// ```
pub fn parse_chordpro(source: &str) -> Result<Song, ChordSheetError> {
    let tokens = Lexer::new(source).tokenize()?;
    ChordProParser::new(tokens).parse_song()
}

/// Parse text with inline `[chords]` as lyrics only. Leading `{` and `#` are
/// ordinary text here, so comment bodies keep their exact wording.
pub(crate) fn parse_inline_chords(text: &str) -> Result<Song, ChordSheetError> {
    let tokens = Lexer::new(text).lyrics_only().tokenize()?;
    ChordProParser::new(tokens).parse_song()
}

/// Parse chords-over-lyrics text with default options (whitespace preserved)
pub fn parse_chord_sheet(source: &str) -> Result<Song, ChordSheetError> {
    ChordSheetParser::default().parse(source)
}

/// Parse the inside of a `{...}` directive: `name: value`, `name value` or `name`.
pub(crate) fn parse_directive(inner: &str) -> Result<Tag, String> {
    let inner = inner.trim();
    let (name, value) = match inner.find(|c: char| c == ':' || c.is_whitespace()) {
        Some(idx) => {
            let (name, rest) = inner.split_at(idx);
            let rest = rest.trim_start();
            (name, Some(rest.strip_prefix(':').unwrap_or(rest)))
        }
        None => (inner, None),
    };

    if name.is_empty() {
        return Err("Directive without a name".to_string());
    }
    if !is_directive_name(name) {
        return Err(format!("Invalid directive name '{}'", name));
    }

    Ok(Tag::new(name, value))
}

/// `[A-Za-z][A-Za-z0-9_-]*`
pub(crate) fn is_directive_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Tag for a line that is a well-formed `{...}` directive
pub(crate) fn directive_line(line: &str) -> Option<Tag> {
    let inner = line.trim().strip_prefix('{')?.strip_suffix('}')?;
    parse_directive(inner).ok()
}

/// Source text dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "chordpro")]
    ChordPro,
    #[serde(rename = "chord-sheet")]
    ChordSheet,
    #[default]
    #[serde(rename = "auto")]
    Auto,
}

impl Dialect {
    /// Guess the dialect of `source`.
    ///
    /// Inline `[chord]` brackets mean ChordPro. Otherwise chord lines mean a chord
    /// sheet, and a text with only directives is ChordPro.
    pub fn detect(source: &str) -> Dialect {
        if source.lines().any(has_inline_chord) {
            return Dialect::ChordPro;
        }
        if source.lines().any(is_chord_line) {
            return Dialect::ChordSheet;
        }
        if source.lines().any(|line| directive_line(line).is_some()) {
            return Dialect::ChordPro;
        }
        Dialect::ChordSheet
    }

    /// `Auto` becomes the detected dialect, the others stay as they are
    pub fn resolve(self, source: &str) -> Dialect {
        match self {
            Dialect::Auto => Dialect::detect(source),
            other => other,
        }
    }
}

fn has_inline_chord(line: &str) -> bool {
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) if crate::Chord::parse(&after[..close]).is_some() => return true,
            Some(close) => rest = &after[close + 1..],
            None => return false,
        }
    }
    false
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chordpro" | "cho" => Ok(Dialect::ChordPro),
            "chord-sheet" | "chordsheet" | "text" => Ok(Dialect::ChordSheet),
            "auto" => Ok(Dialect::Auto),
            other => Err(format!("Unknown dialect '{}' (expected chordpro, chord-sheet or auto)", other)),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::ChordPro => "chordpro",
            Dialect::ChordSheet => "chord-sheet",
            Dialect::Auto => "auto",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_forms() {
        let tag = parse_directive("title: Hello: World").unwrap();
        assert_eq!(tag.name, "title");
        assert_eq!(tag.value.as_deref(), Some("Hello: World"));

        let tag = parse_directive("c Play softly").unwrap();
        assert_eq!(tag.name, "comment");
        assert_eq!(tag.value.as_deref(), Some("Play softly"));

        let tag = parse_directive(" soc ").unwrap();
        assert_eq!(tag.name, "start_of_chorus");
        assert_eq!(tag.value, None);

        let tag = parse_directive("title : Spaced").unwrap();
        assert_eq!(tag.value.as_deref(), Some("Spaced"));
    }

    #[test]
    fn test_directive_errors() {
        assert!(parse_directive("").is_err());
        assert!(parse_directive(": value").is_err());
        assert!(parse_directive("9lives: x").is_err());
        assert!(parse_directive("ti{tle: x").is_err());
    }

    #[test]
    fn test_detect_dialect() {
        assert_eq!(Dialect::detect("[C]Hello [G]world"), Dialect::ChordPro);
        assert_eq!(Dialect::detect("C       G\nHello there friend"), Dialect::ChordSheet);
        assert_eq!(Dialect::detect("{title: x}\nC  G\nla la"), Dialect::ChordSheet);
        assert_eq!(Dialect::detect("{title: x}\nla la"), Dialect::ChordPro);
        assert_eq!(Dialect::detect("[Verse]\nla la"), Dialect::ChordSheet);
        assert_eq!(Dialect::Auto.resolve("[Am]x"), Dialect::ChordPro);
        assert_eq!(Dialect::ChordSheet.resolve("[Am]x"), Dialect::ChordSheet);
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("ChordPro".parse::<Dialect>(), Ok(Dialect::ChordPro));
        assert_eq!("chord-sheet".parse::<Dialect>(), Ok(Dialect::ChordSheet));
        assert!("abc".parse::<Dialect>().is_err());
    }
}
