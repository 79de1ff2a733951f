use super::{directive_line, is_directive_name};
use crate::ast::{Line, Segment, Song, Tag};
use crate::chord::Chord;
use crate::error::ChordSheetError;
use serde_yaml::{Mapping, Value};

/// Options for the chords-over-lyrics parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSheetOptions {
    /// Keep every blank line and trailing whitespace exactly as written
    pub preserve_whitespace: bool,
    /// Longest run of blank lines kept when whitespace is not preserved
    pub collapsed_blank_lines: usize,
}

impl Default for ChordSheetOptions {
    fn default() -> Self {
        Self {
            preserve_whitespace: true,
            collapsed_blank_lines: 1,
        }
    }
}

/// A chord name on a chord line and the character column where it starts
#[derive(Debug, Clone, PartialEq)]
struct ChordToken {
    column: usize,
    text: String,
}

/// Parser for chord sheets where a line of chords sits above its lyric line.
///
/// Parsing never fails on the sheet body: anything that isn't a chord line, a
/// directive or a blank line is a lyric. The only error comes from a `---`
/// metadata block that isn't valid YAML.
#[derive(Debug, Clone, Default)]
pub struct ChordSheetParser {
    options: ChordSheetOptions,
}

impl ChordSheetParser {
    pub fn new(options: ChordSheetOptions) -> Self {
        Self { options }
    }

    pub fn parse(&self, source: &str) -> Result<Song, ChordSheetError> {
        self.parse_with_source_lines(source).map(|(song, _)| song)
    }

    /// Parse, also returning for each `Song` line the 1-based source line it
    /// came from. A chord line paired with lyrics reports the chord line.
    pub fn parse_with_source_lines(&self, source: &str) -> Result<(Song, Vec<usize>), ChordSheetError> {
        let raw: Vec<&str> = source.lines().collect();
        let (located, mut index) = frontmatter(&raw)?;
        let (mut lines, mut source_lines): (Vec<Line>, Vec<usize>) = located.into_iter().unzip();
        let mut blank_run = 0;

        while index < raw.len() {
            let text = self.prepare(raw[index]);
            index += 1;
            let number = index;

            if text.trim().is_empty() {
                blank_run += 1;
                if self.options.preserve_whitespace || blank_run <= self.options.collapsed_blank_lines {
                    lines.push(Line::blank());
                    source_lines.push(number);
                }
                continue;
            }
            blank_run = 0;

            if let Some(tag) = directive_line(text) {
                lines.push(Line::Tag(tag));
            } else if is_chord_line(text) {
                let chords = chord_tokens(text);
                let lyrics = raw.get(index).map(|next| self.prepare(next)).filter(|next| is_lyric_line(next));
                match lyrics {
                    Some(lyrics) => {
                        lines.push(Line::Lyrics(align(&chords, lyrics)));
                        index += 1;
                    }
                    None => lines.push(Line::Lyrics(chords_only(&chords))),
                }
            } else {
                lines.push(Line::Lyrics(vec![Segment::lyrics(text)]));
            }
            source_lines.push(number);
        }

        Ok((Song::new(lines), source_lines))
    }

    fn prepare<'s>(&self, line: &'s str) -> &'s str {
        if self.options.preserve_whitespace {
            line
        } else {
            line.trim_end()
        }
    }
}

/// True when every whitespace-separated token on the line is a chord
pub fn is_chord_line(line: &str) -> bool {
    let mut tokens = line.split_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|token| Chord::parse(token).is_some())
}

fn is_lyric_line(line: &str) -> bool {
    !line.trim().is_empty() && !is_chord_line(line) && directive_line(line).is_none()
}

fn chord_tokens(line: &str) -> Vec<ChordToken> {
    let mut tokens = Vec::new();
    let mut current: Option<ChordToken> = None;

    for (column, c) in line.chars().enumerate() {
        if c.is_whitespace() {
            tokens.extend(current.take());
        } else {
            current
                .get_or_insert_with(|| ChordToken {
                    column,
                    text: String::new(),
                })
                .text
                .push(c);
        }
    }
    tokens.extend(current);
    tokens
}

/// Where a chord at `column` attaches in `chars`.
///
/// Inside a word it moves back to the start of that word, on whitespace it moves
/// forward to the next word (or the end of the line).
pub(crate) fn snap_to_word(chars: &[char], column: usize) -> usize {
    if column >= chars.len() {
        return chars.len();
    }
    if chars[column].is_whitespace() {
        return chars[column..]
            .iter()
            .position(|c| !c.is_whitespace())
            .map(|offset| column + offset)
            .unwrap_or(chars.len());
    }
    let mut start = column;
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }
    start
}

/// Cut the lyric line at each chord's word boundary
fn align(chords: &[ChordToken], lyrics: &str) -> Vec<Segment> {
    let chars: Vec<char> = lyrics.chars().collect();
    let mut previous = 0;
    let boundaries: Vec<usize> = chords
        .iter()
        .map(|chord| {
            previous = snap_to_word(&chars, chord.column).max(previous);
            previous
        })
        .collect();

    let mut segments = Vec::with_capacity(chords.len() + 1);
    if let Some(&first) = boundaries.first() {
        if first > 0 {
            segments.push(Segment::lyrics(chars[..first].iter().collect::<String>()));
        }
    }
    for (i, chord) in chords.iter().enumerate() {
        let start = boundaries[i];
        let end = boundaries.get(i + 1).copied().unwrap_or(chars.len());
        segments.push(Segment::new(chord.text.clone(), chars[start..end].iter().collect::<String>()));
    }
    segments
}

/// Segments for a chord line with no lyrics: the lyrics are the gaps between chords
fn chords_only(chords: &[ChordToken]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(chords.len() + 1);
    if let Some(first) = chords.first().filter(|chord| chord.column > 0) {
        segments.push(Segment::lyrics(" ".repeat(first.column)));
    }
    for (i, chord) in chords.iter().enumerate() {
        let width = chords.get(i + 1).map(|next| next.column - chord.column).unwrap_or(0);
        segments.push(Segment::new(chord.text.clone(), " ".repeat(width)));
    }
    segments
}

/// Read a leading `---` YAML block into tags. Returns the tags and the index of
/// the first line after the block.
/// Tags from a leading `---` YAML block, each with the source line of its key,
/// and the index of the first line after the block
fn frontmatter(lines: &[&str]) -> Result<(Vec<(Line, usize)>, usize), ChordSheetError> {
    if lines.first().map(|line| line.trim()) != Some("---") {
        return Ok((Vec::new(), 0));
    }
    let Some(end) = lines.iter().skip(1).position(|line| line.trim() == "---").map(|p| p + 1) else {
        return Ok((Vec::new(), 0));
    };

    let content = lines[1..end].join("\n");
    let mapping: Mapping = if content.trim().is_empty() {
        Mapping::new()
    } else {
        serde_yaml::from_str(&content).map_err(|e| ChordSheetError::MetadataError(e.to_string()))?
    };

    let mut tags = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = yaml_scalar(&key)
            .ok_or_else(|| ChordSheetError::MetadataError(format!("Metadata keys must be text, found {:?}", key)))?;
        if !is_directive_name(name.trim()) {
            return Err(ChordSheetError::MetadataError(format!("Invalid metadata key '{}'", name)));
        }
        let value = yaml_scalar(&value)
            .ok_or_else(|| ChordSheetError::MetadataError(format!("Value of '{}' must be a single value", name)))?;
        // a directive holds one line
        let value = value.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join(" ");

        let key_prefix = format!("{}:", name.trim());
        let number = lines[1..end]
            .iter()
            .position(|line| line.trim_start().starts_with(&key_prefix))
            .map_or(1, |p| p + 2);
        tags.push((Line::Tag(Tag::new(&name, Some(&value))), number));
    }

    Ok((tags, end + 1))
}

fn yaml_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
