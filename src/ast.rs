//! # Song Document Types
//!
//! Both parsers produce the same structure; every transform and formatter consumes it.
//!
//! ## Type Hierarchy
//! ```text
//! Song
//!   └── Vec<Line>
//!         ├── Lyrics(Vec<Segment>)   lyric/chord line (empty vec = blank line)
//!         │     └── Segment { chord, lyrics }
//!         ├── Tag(Tag)               {name: value} directive
//!         └── Comment(String)        "# ..." source comment
//! ```
//!
//! ## Key Concepts
//!
//! ### Segment
//! One chord (possibly none) and the lyric run it sits above. An empty `chord`
//! string means "no chord"; there is no separate null state. Concatenating the
//! lyrics of a line's segments gives back the lyric line without its chords.
//!
//! ### Tag
//! Names are stored in their long form, so `{t: ...}` and `{title: ...}` produce
//! the same tag. Unknown names are kept as written (lowercased).
//!
//! ### Chord text
//! Segments keep chord text as written. Parsing into [`crate::Chord`] happens in
//! the transforms, where an unparseable chord becomes a warning instead of an error.

use serde::Serialize;

pub const TITLE: &str = "title";
pub const SUBTITLE: &str = "subtitle";
pub const ARTIST: &str = "artist";
pub const COMMENT: &str = "comment";
pub const COMMENT_ITALIC: &str = "comment_italic";
pub const COMMENT_BOX: &str = "comment_box";
pub const START_OF_CHORUS: &str = "start_of_chorus";
pub const END_OF_CHORUS: &str = "end_of_chorus";
pub const START_OF_VERSE: &str = "start_of_verse";
pub const END_OF_VERSE: &str = "end_of_verse";
pub const START_OF_BRIDGE: &str = "start_of_bridge";
pub const END_OF_BRIDGE: &str = "end_of_bridge";
pub const START_OF_TAB: &str = "start_of_tab";
pub const END_OF_TAB: &str = "end_of_tab";

/// Short directive names and their long forms
const ALIASES: [(&str, &str); 14] = [
    ("t", TITLE),
    ("st", SUBTITLE),
    ("a", ARTIST),
    ("c", COMMENT),
    ("ci", COMMENT_ITALIC),
    ("cb", COMMENT_BOX),
    ("soc", START_OF_CHORUS),
    ("eoc", END_OF_CHORUS),
    ("sov", START_OF_VERSE),
    ("eov", END_OF_VERSE),
    ("sob", START_OF_BRIDGE),
    ("eob", END_OF_BRIDGE),
    ("sot", START_OF_TAB),
    ("eot", END_OF_TAB),
];

/// Directives that describe the song rather than a position in it
const METADATA: [&str; 14] = [
    TITLE, SUBTITLE, ARTIST, "composer", "lyricist", "album", "year", "key", "time", "tempo",
    "capo", "duration", "copyright", "arranger",
];

/// Expand a directive alias to its long name (`soc` → `start_of_chorus`)
pub fn canonical_tag_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(short, _)| *short == lower)
        .map(|(_, long)| long.to_string())
        .unwrap_or(lower)
}

/// A chord (possibly none) and the lyric text under it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Segment {
    pub chord: String,
    pub lyrics: String,
}

impl Segment {
    pub fn new(chord: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            chord: chord.into(),
            lyrics: lyrics.into(),
        }
    }

    pub fn lyrics(lyrics: impl Into<String>) -> Self {
        Self::new(String::new(), lyrics)
    }

    pub fn has_chord(&self) -> bool {
        !self.chord.is_empty()
    }
}

/// A `{name: value}` directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub value: Option<String>,
}

impl Tag {
    /// Build a tag, expanding the name alias and dropping an empty value
    pub fn new(name: &str, value: Option<&str>) -> Self {
        let value = value.map(str::trim).filter(|v| !v.is_empty()).map(String::from);
        Self {
            name: canonical_tag_name(name),
            value,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.name.as_str(), COMMENT | COMMENT_ITALIC | COMMENT_BOX)
    }

    pub fn is_metadata(&self) -> bool {
        METADATA.contains(&self.name.as_str())
    }

    pub fn is_section_start(&self) -> bool {
        self.name.starts_with("start_of_")
    }

    pub fn is_section_end(&self) -> bool {
        self.name.starts_with("end_of_")
    }

    /// Human label for a section start: "Verse", "Chorus", ...
    pub fn section_label(&self) -> Option<String> {
        let section = self.name.strip_prefix("start_of_")?;
        let mut chars = section.chars();
        let first = chars.next()?;
        Some(first.to_uppercase().chain(chars).collect())
    }
}

/// A line of a song
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum Line {
    Lyrics(Vec<Segment>),
    Tag(Tag),
    Comment(String),
}

impl Line {
    pub fn blank() -> Self {
        Line::Lyrics(Vec::new())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Line::Lyrics(segments) if segments.is_empty())
    }

    pub fn has_chords(&self) -> bool {
        matches!(self, Line::Lyrics(segments) if segments.iter().any(Segment::has_chord))
    }

    /// Lyric text of the line with chords removed
    pub fn lyrics(&self) -> String {
        match self {
            Line::Lyrics(segments) => segments.iter().map(|s| s.lyrics.as_str()).collect(),
            _ => String::new(),
        }
    }
}

/// A parsed song
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Song {
    pub lines: Vec<Line>,
}

impl Song {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.lines.iter().filter_map(|line| match line {
            Line::Tag(tag) => Some(tag),
            _ => None,
        })
    }

    /// Metadata tags (title, artist, key, ...) in source order
    pub fn metadata(&self) -> impl Iterator<Item = &Tag> {
        self.tags().filter(|tag| tag.is_metadata())
    }

    /// Value of the first tag with this name (aliases allowed)
    pub fn value_of(&self, name: &str) -> Option<&str> {
        let name = canonical_tag_name(name);
        self.tags()
            .find(|tag| tag.name == name)
            .and_then(|tag| tag.value.as_deref())
    }

    pub fn title(&self) -> Option<&str> {
        self.value_of(TITLE)
    }

    pub fn artist(&self) -> Option<&str> {
        self.value_of(ARTIST)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.lines.iter().flat_map(|line| match line {
            Line::Lyrics(segments) => segments.iter(),
            _ => [].iter(),
        })
    }

    /// Structural equality that ignores how much whitespace separates words.
    ///
    /// Chords must match one to one and each chord must sit on the same words.
    /// Chordless whitespace-only segments are ignored.
    pub fn is_equivalent(&self, other: &Song) -> bool {
        self.lines.len() == other.lines.len()
            && self
                .lines
                .iter()
                .zip(&other.lines)
                .all(|(a, b)| match (a, b) {
                    (Line::Lyrics(a), Line::Lyrics(b)) => normalize_segments(a) == normalize_segments(b),
                    _ => a == b,
                })
    }
}

fn normalize_segments(segments: &[Segment]) -> Vec<(&str, String)> {
    segments
        .iter()
        .filter(|s| s.has_chord() || !s.lyrics.trim().is_empty())
        .map(|s| {
            let words: Vec<&str> = s.lyrics.split_whitespace().collect();
            (s.chord.as_str(), words.join(" "))
        })
        .collect()
}
