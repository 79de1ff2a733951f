pub mod api;
pub mod ast;
pub mod chord;
pub mod config;
pub mod diagrams;
pub mod error;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod transform;

pub use api::{parse_song, render, Rendered};
pub use ast::{Line, Segment, Song, Tag};
pub use chord::{Accidental, Chord, Note, NoteLetter};
pub use config::RenderOptions;
pub use diagrams::{ChordDiagrams, Diagram};
pub use error::*;
pub use format::{to_chord_sheet, to_chordpro, to_html, to_text, OutputFormat};
pub use parser::{
    is_chord_line, parse_chord_sheet, parse_chordpro, strip_tab_sections, ChordSheetOptions, ChordSheetParser,
    Dialect,
};
pub use transform::{extract_chords, transpose_song, ChordCollection, MAX_COMMENT_DEPTH};
