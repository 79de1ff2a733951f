//! # Song Transforms
//!
//! Operations on a parsed [`Song`] that produce a new value and leave the input alone:
//!
//! - [`transpose_song()`] - shift every chord by a number of semitones
//! - [`extract_chords()`] - the distinct chords of a song in first-seen order
//!
//! Both look inside comments, so `{c: [Dm]hidden chord}` is transposed and its
//! `Dm` is extracted. Extraction parses a comment as a song of its own, and
//! comments can nest; [`MAX_COMMENT_DEPTH`] bounds how deep.
//!
//! Chord text that doesn't parse is never fatal: it is left as written and
//! reported as a [`Warning`].

use crate::ast::{Line, Segment, Song, Tag};
use crate::chord::Chord;
use crate::error::{ChordSheetError, Operation, Outcome, Warning};
use crate::format::line_to_chordpro;
use crate::parser::{parse_chordpro, parse_inline_chords, ChordSheetParser};
use serde::Serialize;
use tracing::{debug, warn};

/// How many comments may be nested inside each other during chord extraction
pub const MAX_COMMENT_DEPTH: usize = 4;

/// Distinct chords in the order they first appear
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChordCollection {
    chords: Vec<Chord>,
}

impl ChordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chord unless an equal one is already present. Returns true if added.
    pub fn push(&mut self, chord: Chord) -> bool {
        if self.chords.contains(&chord) {
            return false;
        }
        self.chords.push(chord);
        true
    }

    pub fn contains(&self, chord: &Chord) -> bool {
        self.chords.contains(chord)
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chord> {
        self.chords.iter()
    }

    /// Chord names as displayed
    pub fn names(&self) -> Vec<String> {
        self.chords.iter().map(Chord::to_string).collect()
    }

    pub fn into_vec(self) -> Vec<Chord> {
        self.chords
    }
}

impl IntoIterator for ChordCollection {
    type Item = Chord;
    type IntoIter = std::vec::IntoIter<Chord>;

    fn into_iter(self) -> Self::IntoIter {
        self.chords.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChordCollection {
    type Item = &'a Chord;
    type IntoIter = std::slice::Iter<'a, Chord>;

    fn into_iter(self) -> Self::IntoIter {
        self.chords.iter()
    }
}

/// Transpose every chord in the song by `delta` semitones.
///
/// A delta that is a multiple of 12 returns an identical copy. Chords that don't
/// parse are kept as written and reported as warnings.
///
/// # Example
/// ```rust
/// use chordsheet::{parse_chordpro, transpose_song, to_chordpro};
///
/// let song = parse_chordpro("[C]Hello [G]world").unwrap();
/// let up = transpose_song(&song, 2).unwrap();
/// assert_eq!(to_chordpro(&up.value), "[D]Hello [A]world\n");
/// ```
pub fn transpose_song(song: &Song, delta: i32) -> Result<Outcome<Song>, ChordSheetError> {
    if delta.rem_euclid(12) == 0 {
        return Ok(Outcome::clean(song.clone()));
    }

    debug!(delta, lines = song.lines.len(), "transposing song");
    let mut warnings = Vec::new();
    let transposed = transpose_lines(song, delta, None, &mut warnings);
    Ok(Outcome::new(transposed, warnings))
}

fn transpose_lines(song: &Song, delta: i32, outer_line: Option<usize>, warnings: &mut Vec<Warning>) -> Song {
    let mut lines = Vec::with_capacity(song.lines.len());
    for (index, line) in song.lines.iter().enumerate() {
        let line_number = outer_line.unwrap_or(index + 1);
        let transposed = match line {
            Line::Lyrics(segments) => Line::Lyrics(
                segments
                    .iter()
                    .map(|segment| transpose_segment(segment, delta, line_number, warnings))
                    .collect(),
            ),
            Line::Tag(tag) if tag.is_comment() => Line::Tag(Tag {
                name: tag.name.clone(),
                value: tag
                    .value
                    .as_deref()
                    .map(|value| transpose_comment(value, delta, line_number, warnings)),
            }),
            Line::Comment(text) => Line::Comment(transpose_comment(text, delta, line_number, warnings)),
            Line::Tag(tag) => Line::Tag(tag.clone()),
        };
        lines.push(transposed);
    }

    Song::new(lines)
}

fn transpose_segment(segment: &Segment, delta: i32, line: usize, warnings: &mut Vec<Warning>) -> Segment {
    if !segment.has_chord() {
        return segment.clone();
    }
    match Chord::parse(&segment.chord) {
        Some(chord) => Segment::new(chord.transpose(delta).to_string(), segment.lyrics.clone()),
        None => {
            warn!(line, chord = %segment.chord, "chord left untransposed");
            warnings.push(Warning::new(
                line,
                format!("Could not transpose '{}': not a recognized chord", segment.chord),
            ));
            segment.clone()
        }
    }
}

/// Transpose the `[chords]` inside a comment. The comment is read as a single
/// lyric line, so everything around the chords is kept character for character,
/// including nested `{c: ...}` text.
fn transpose_comment(text: &str, delta: i32, line: usize, warnings: &mut Vec<Warning>) -> String {
    if !text.contains('[') {
        return text.to_string();
    }

    match parse_inline_chords(text) {
        Ok(inner) => {
            let transposed = transpose_lines(&inner, delta, Some(line), warnings);
            transposed.lines.iter().map(line_to_chordpro).collect::<Vec<_>>().join("\n")
        }
        Err(e) => {
            warn!(line, error = %e, "comment left untransposed");
            warnings.push(Warning::new(line, format!("Comment left untransposed: {}", e)));
            text.to_string()
        }
    }
}

/// Collect the distinct chords of a song, including chords inside comments.
///
/// Order is the order of first appearance. Chord text that doesn't parse is
/// skipped with a warning.
pub fn extract_chords(song: &Song) -> Result<Outcome<ChordCollection>, ChordSheetError> {
    let mut chords = ChordCollection::new();
    let mut warnings = Vec::new();
    collect_chords(song, 0, None, &mut chords, &mut warnings)?;
    debug!(count = chords.len(), "extracted chords");
    Ok(Outcome::new(chords, warnings))
}

fn collect_chords(
    song: &Song,
    depth: usize,
    outer_line: Option<usize>,
    chords: &mut ChordCollection,
    warnings: &mut Vec<Warning>,
) -> Result<(), ChordSheetError> {
    if depth > MAX_COMMENT_DEPTH {
        return Err(too_deep(Operation::ChordExtraction));
    }

    for (index, line) in song.lines.iter().enumerate() {
        let line_number = outer_line.unwrap_or(index + 1);
        match line {
            Line::Lyrics(segments) => {
                for segment in segments.iter().filter(|s| s.has_chord()) {
                    match Chord::parse(&segment.chord) {
                        Some(chord) => {
                            chords.push(chord);
                        }
                        None => {
                            warn!(line = line_number, chord = %segment.chord, "skipping unrecognized chord");
                            warnings.push(Warning::new(
                                line_number,
                                format!("'{}' is not a recognized chord", segment.chord),
                            ));
                        }
                    }
                }
            }
            Line::Tag(tag) if tag.is_comment() => {
                if let Some(value) = &tag.value {
                    collect_comment_chords(value, depth, line_number, chords, warnings)?;
                }
            }
            Line::Comment(text) => collect_comment_chords(text, depth, line_number, chords, warnings)?,
            Line::Tag(_) => {}
        }
    }

    Ok(())
}

fn collect_comment_chords(
    text: &str,
    depth: usize,
    line: usize,
    chords: &mut ChordCollection,
    warnings: &mut Vec<Warning>,
) -> Result<(), ChordSheetError> {
    let cleaned = strip_percent_escapes(text);
    let parsed = if cleaned.contains('[') {
        parse_chordpro(&cleaned)
    } else {
        ChordSheetParser::default().parse(&cleaned)
    };

    match parsed {
        Ok(inner) => collect_chords(&inner, depth + 1, Some(line), chords, warnings),
        Err(e) => {
            warn!(line, error = %e, "could not read chords in comment");
            warnings.push(Warning::new(line, format!("Could not read chords in comment: {}", e)));
            Ok(())
        }
    }
}

/// Drop `%` followed by two digits (URL-style escapes pasted into comments)
fn strip_percent_escapes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut cleaned = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let escape = chars[i] == '%'
            && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
            && chars.get(i + 2).is_some_and(|c| c.is_ascii_digit());
        if escape {
            i += 3;
        } else {
            cleaned.push(chars[i]);
            i += 1;
        }
    }
    cleaned
}

fn too_deep(operation: Operation) -> ChordSheetError {
    ChordSheetError::TransformError {
        operation,
        message: format!("comments nested more than {} levels deep", MAX_COMMENT_DEPTH),
    }
}
