use super::chord_sheet::lyric_rows;
use crate::ast::{Line, Song, ARTIST, SUBTITLE, TITLE};

/// Convert a Song to plain text for reading or printing.
///
/// Title, subtitle and artist form a header. The body is chords over lyrics with
/// comments as plain text and section starts as `Label:` lines. Directives have
/// no other visible form.
pub fn to_text(song: &Song) -> String {
    let mut text = String::new();

    let header: Vec<&str> = [TITLE, SUBTITLE, ARTIST]
        .iter()
        .filter_map(|name| song.value_of(name))
        .collect();
    if !header.is_empty() {
        for line in &header {
            text.push_str(line);
            text.push('\n');
        }
        text.push('\n');
    }

    for line in &song.lines {
        match line {
            Line::Lyrics(segments) => {
                for row in lyric_rows(segments) {
                    text.push_str(row.trim_end());
                    text.push('\n');
                }
            }
            Line::Tag(tag) if tag.is_comment() => {
                if let Some(value) = &tag.value {
                    text.push_str(value);
                    text.push('\n');
                }
            }
            Line::Tag(tag) if tag.is_section_start() => {
                let label = tag.value.clone().or_else(|| tag.section_label()).unwrap_or_default();
                text.push_str(&format!("{}:\n", label));
            }
            Line::Tag(_) | Line::Comment(_) => {}
        }
    }

    text
}
