use crate::ast::{Line, Segment, Song, Tag};
use crate::parser::snap_to_word;

/// Convert a Song to chords-over-lyrics text.
///
/// Each chord is written above the first character of its segment. When two
/// chords would overlap, the earlier one first slides left over the spaces before
/// its word. Only if that isn't enough does the later one move right, with the
/// lyric line padded so the chord still lands on its own word when parsed again.
pub fn to_chord_sheet(song: &Song) -> String {
    let mut text = String::new();
    for line in &song.lines {
        match line {
            Line::Lyrics(segments) => {
                for row in lyric_rows(segments) {
                    text.push_str(&row);
                    text.push('\n');
                }
            }
            Line::Tag(tag) => {
                text.push_str(&tag_to_directive(tag));
                text.push('\n');
            }
            Line::Comment(comment) => {
                text.push_str(&format!("# {}\n", comment));
            }
        }
    }
    text
}

pub(crate) fn tag_to_directive(tag: &Tag) -> String {
    match &tag.value {
        Some(value) => format!("{{{}: {}}}", tag.name, value),
        None => format!("{{{}}}", tag.name),
    }
}

/// Output rows for one lyric line: a chord row (if any chords) and a lyric row
/// (if the lyrics aren't blank). A blank line gives one empty row.
pub(crate) fn lyric_rows(segments: &[Segment]) -> Vec<String> {
    let lyric_text: String = segments.iter().map(|s| s.lyrics.as_str()).collect();
    if !segments.iter().any(Segment::has_chord) {
        return vec![lyric_text];
    }

    let mut lyrics: Vec<char> = lyric_text.chars().collect();
    let mut placed: Vec<Placement> = Vec::new();
    let mut offset = 0;

    for segment in segments {
        if segment.has_chord() {
            let mut earliest = placed.last().map(Placement::next_free).unwrap_or(0);
            let mut column = offset.max(earliest);
            if column > offset && snap_to_word(&lyrics, column) != offset {
                if let Some(previous) = placed.last_mut() {
                    previous.shift_left(&lyrics, column - offset);
                    earliest = previous.next_free();
                    column = offset.max(earliest);
                }
            }
            if column > offset && snap_to_word(&lyrics, column) != offset {
                let padding = column - offset;
                lyrics.splice(offset..offset, std::iter::repeat(' ').take(padding));
                offset += padding;
            }
            placed.push(Placement {
                chord: &segment.chord,
                column,
                earliest,
            });
        }
        offset += segment.lyrics.chars().count();
    }

    let mut chords: Vec<char> = Vec::new();
    for placement in &placed {
        chords.resize(placement.column, ' ');
        chords.extend(placement.chord.chars());
    }

    let chord_row: String = chords.into_iter().collect();
    let lyric_row: String = lyrics.into_iter().collect();
    if lyric_row.trim().is_empty() {
        vec![chord_row]
    } else {
        vec![chord_row, lyric_row]
    }
}

/// A chord's position in the chord row
struct Placement<'a> {
    chord: &'a str,
    column: usize,
    /// First column clear of the chord before it
    earliest: usize,
}

impl Placement<'_> {
    fn next_free(&self) -> usize {
        self.column + self.chord.chars().count() + 1
    }

    /// Move left by up to `wanted` columns over the whitespace before the
    /// chord's word, where it still attaches to the same word.
    fn shift_left(&mut self, lyrics: &[char], wanted: usize) {
        let target = snap_to_word(lyrics, self.column);
        let stop = self.column.saturating_sub(wanted).max(self.earliest);
        while self.column > stop && snap_to_word(lyrics, self.column - 1) == target {
            self.column -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_chord_sheet;

    #[test]
    fn test_chords_over_words() {
        let segments = vec![Segment::new("C", "Hello "), Segment::new("G", "world")];
        assert_eq!(lyric_rows(&segments), vec!["C     G", "Hello world"]);
    }

    #[test]
    fn test_leading_text_and_blank_line() {
        let segments = vec![Segment::lyrics("Oh "), Segment::new("Am", "yes")];
        assert_eq!(lyric_rows(&segments), vec!["   Am", "Oh yes"]);
        assert_eq!(lyric_rows(&[]), vec![""]);
    }

    #[test]
    fn test_crowded_chords_pad_lyrics() {
        let segments = vec![Segment::new("Cmaj7", "I "), Segment::new("G", "go")];
        let rows = lyric_rows(&segments);
        assert_eq!(rows, vec!["Cmaj7 G", "I     go"]);

        let reparsed = parse_chord_sheet(&rows.join("\n")).unwrap();
        let original = Song::new(vec![Line::Lyrics(segments)]);
        assert!(reparsed.is_equivalent(&original));
    }

    #[test]
    fn test_crowded_chord_uses_space_before_word() {
        let source = "  C G\nab cd";
        let song = parse_chord_sheet(source).unwrap();
        assert_eq!(
            song.lines,
            vec![Line::Lyrics(vec![
                Segment::lyrics("ab "),
                Segment::new("C", ""),
                Segment::new("G", "cd"),
            ])]
        );
        assert_eq!(to_chord_sheet(&song), format!("{}\n", source));
        assert_eq!(parse_chord_sheet(&to_chord_sheet(&song)).unwrap(), song);
    }

    #[test]
    fn test_chord_only_line() {
        let segments = vec![Segment::new("Am", "   "), Segment::new("G", "")];
        assert_eq!(lyric_rows(&segments), vec!["Am G"]);
    }

    #[test]
    fn test_song_to_chord_sheet() {
        let song = Song::new(vec![
            Line::Tag(Tag::new("title", Some("Test"))),
            Line::Tag(Tag::new("soc", None)),
            Line::Lyrics(vec![Segment::new("C", "Hello "), Segment::new("G", "there friend")]),
            Line::blank(),
            Line::Comment("end".to_string()),
        ]);
        assert_eq!(
            to_chord_sheet(&song),
            "{title: Test}\n{start_of_chorus}\nC     G\nHello there friend\n\n# end\n"
        );
    }
}
