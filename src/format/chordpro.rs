use super::chord_sheet::tag_to_directive;
use crate::ast::{Line, Song};

/// Convert a Song to ChordPro text, one source line per line
pub fn to_chordpro(song: &Song) -> String {
    let mut text = String::new();
    for line in &song.lines {
        text.push_str(&line_to_chordpro(line));
        text.push('\n');
    }
    text
}

pub(crate) fn line_to_chordpro(line: &Line) -> String {
    match line {
        Line::Lyrics(segments) => segments
            .iter()
            .map(|segment| {
                if segment.has_chord() {
                    format!("[{}]{}", segment.chord, segment.lyrics)
                } else {
                    segment.lyrics.clone()
                }
            })
            .collect(),
        Line::Tag(tag) => tag_to_directive(tag),
        Line::Comment(comment) => format!("# {}", comment),
    }
}
