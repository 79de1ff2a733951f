//! # Formatters
//!
//! Render a [`Song`] into one of the output formats:
//!
//! - [`to_html()`] - `div` rows and columns, chord above lyrics
//! - [`to_text()`] - readable text with a title header
//! - [`to_chordpro()`] - ChordPro source (round-trips through the ChordPro parser)
//! - [`to_chord_sheet()`] - chords over lyrics (round-trips through the chord sheet parser)
//!
//! Formatters never fail: any Song, including an empty one, can be rendered.

mod chord_sheet;
mod chordpro;
mod html;
mod text;

pub use chord_sheet::to_chord_sheet;
pub use chordpro::to_chordpro;
pub(crate) use chordpro::line_to_chordpro;
pub use html::to_html;
pub use text::to_text;

use crate::ast::Song;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "chordpro")]
    ChordPro,
    #[serde(rename = "chord-sheet")]
    ChordSheet,
}

impl OutputFormat {
    pub fn render(&self, song: &Song) -> String {
        match self {
            OutputFormat::Html => to_html(song),
            OutputFormat::Text => to_text(song),
            OutputFormat::ChordPro => to_chordpro(song),
            OutputFormat::ChordSheet => to_chord_sheet(song),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "text" | "txt" => Ok(OutputFormat::Text),
            "chordpro" | "cho" => Ok(OutputFormat::ChordPro),
            "chord-sheet" | "chordsheet" => Ok(OutputFormat::ChordSheet),
            other => Err(format!(
                "Unknown output format '{}' (expected html, text, chordpro or chord-sheet)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Html => "html",
            OutputFormat::Text => "text",
            OutputFormat::ChordPro => "chordpro",
            OutputFormat::ChordSheet => "chord-sheet",
        })
    }
}
