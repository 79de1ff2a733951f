use super::parse_directive;
use crate::ast::{Line, Segment, Song};
use crate::error::ChordSheetError;
use crate::lexer::{LocatedToken, Token};

/// Parser for ChordPro tokens.
///
/// Each source line becomes exactly one [`Line`]: directive lines become tags,
/// `#` lines become comments, everything else becomes segments where every
/// `[chord]` opens a new segment.
pub struct ChordProParser {
    tokens: Vec<LocatedToken>,
    position: usize,
}

impl ChordProParser {
    pub fn new(tokens: Vec<LocatedToken>) -> Self {
        Self { tokens, position: 0 }
    }

    fn current(&self) -> Option<&LocatedToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&LocatedToken> {
        let token = self.tokens.get(self.position);
        self.position += 1;
        token
    }

    pub fn parse_song(&mut self) -> Result<Song, ChordSheetError> {
        let mut lines = Vec::new();

        while self.current().is_some() {
            lines.push(self.parse_line()?);
            if let Some(LocatedToken { token: Token::Newline, .. }) = self.current() {
                self.advance();
            }
        }

        Ok(Song::new(lines))
    }

    /// Parse tokens up to (not including) the next newline
    fn parse_line(&mut self) -> Result<Line, ChordSheetError> {
        let mut segments: Vec<Segment> = Vec::new();

        while let Some(located) = self.current() {
            match &located.token {
                Token::Newline => break,
                Token::Directive(inner) => {
                    let tag = parse_directive(inner).map_err(|message| {
                        ChordSheetError::parse_error(located.line, located.column, message)
                    })?;
                    self.advance();
                    return Ok(Line::Tag(tag));
                }
                Token::Comment(text) => {
                    let line = Line::Comment(text.clone());
                    self.advance();
                    return Ok(line);
                }
                Token::Text(text) => match segments.last_mut() {
                    Some(segment) => segment.lyrics.push_str(text),
                    None => segments.push(Segment::lyrics(text.clone())),
                },
                Token::Chord(chord) => segments.push(Segment::new(chord.clone(), "")),
            }
            self.advance();
        }

        Ok(Line::Lyrics(segments))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Line, Segment, Tag};
    use crate::parser::parse_chordpro;
    use crate::ChordSheetError;

    #[test]
    fn test_title_artist_and_chords() {
        let song = parse_chordpro("{title: Test}\n{artist: Me}\n[C]Hello [G]world\n").unwrap();
        assert_eq!(
            song.lines,
            vec![
                Line::Tag(Tag::new("title", Some("Test"))),
                Line::Tag(Tag::new("artist", Some("Me"))),
                Line::Lyrics(vec![Segment::new("C", "Hello "), Segment::new("G", "world")]),
            ]
        );
    }

    #[test]
    fn test_text_before_first_chord() {
        let song = parse_chordpro("Amazing [G]grace, how [C]sweet").unwrap();
        assert_eq!(
            song.lines[0],
            Line::Lyrics(vec![
                Segment::lyrics("Amazing "),
                Segment::new("G", "grace, how "),
                Segment::new("C", "sweet"),
            ])
        );
    }

    #[test]
    fn test_adjacent_and_trailing_chords() {
        let song = parse_chordpro("[C][G]la [D]").unwrap();
        assert_eq!(
            song.lines[0],
            Line::Lyrics(vec![Segment::new("C", ""), Segment::new("G", "la "), Segment::new("D", "")])
        );
    }

    #[test]
    fn test_blank_lines_and_comments() {
        let song = parse_chordpro("la\n\n# capo 2\n{soc}\n[Am]li\n{eoc}").unwrap();
        assert_eq!(song.lines.len(), 6);
        assert!(song.lines[1].is_blank());
        assert_eq!(song.lines[2], Line::Comment("capo 2".to_string()));
        assert_eq!(song.lines[3], Line::Tag(Tag::new("start_of_chorus", None)));
        assert_eq!(song.lines[5], Line::Tag(Tag::new("end_of_chorus", None)));
    }

    #[test]
    fn test_unknown_tags_are_kept() {
        let song = parse_chordpro("{x_pdf_theme: dark}\n{key: G}").unwrap();
        assert_eq!(song.lines[0], Line::Tag(Tag::new("x_pdf_theme", Some("dark"))));
        assert_eq!(song.value_of("key"), Some("G"));
    }

    #[test]
    fn test_comment_tag_keeps_embedded_chords() {
        let song = parse_chordpro("{c: [Dm]hidden chord}").unwrap();
        assert_eq!(song.lines[0], Line::Tag(Tag::new("comment", Some("[Dm]hidden chord"))));
    }

    #[test]
    fn test_invalid_directive_name_is_located() {
        let err = parse_chordpro("la\n{9: x}").unwrap_err();
        match err {
            ChordSheetError::ParseError { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("Invalid directive name"));
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let source = "{t: A}\n[C]one [G]two\n\n{c: three}";
        assert_eq!(parse_chordpro(source).unwrap(), parse_chordpro(source).unwrap());
    }
}
