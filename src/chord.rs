//! # Chord Model
//!
//! A chord symbol is a root note, a quality suffix and an optional bass note:
//!
//! ```text
//!   F#m7b5/E
//!   ││└──┬┘└─ bass note (slash chord)
//!   ││   └─── quality, kept verbatim ("m7b5")
//!   │└─────── accidental
//!   └──────── root letter
//! ```
//!
//! Parsing never fails loudly: anything that is not a chord yields `None`, and the
//! caller decides whether that is plain text or worth a warning.
//!
//! ## Transposition
//! Roots and bass notes move on a fixed 12-tone table. After a non-zero shift every
//! note is spelled from that table (`C C# D Eb E F F# G Ab A Bb B`), so the result
//! only depends on the pitch class, never on how the chord was written.
//!
//! ```rust
//! use chordsheet::Chord;
//!
//! let chord = Chord::parse("Dm7/A").unwrap();
//! assert_eq!(chord.transpose(3).to_string(), "Fm7/C");
//! assert_eq!(chord.transpose(-14).to_string(), "Cm7/G");
//! ```

use serde::{Serialize, Serializer};
use std::fmt;

/// Note names A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteLetter {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(NoteLetter::C),
            'D' => Some(NoteLetter::D),
            'E' => Some(NoteLetter::E),
            'F' => Some(NoteLetter::F),
            'G' => Some(NoteLetter::G),
            'A' => Some(NoteLetter::A),
            'B' => Some(NoteLetter::B),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            NoteLetter::C => 'C',
            NoteLetter::D => 'D',
            NoteLetter::E => 'E',
            NoteLetter::F => 'F',
            NoteLetter::G => 'G',
            NoteLetter::A => 'A',
            NoteLetter::B => 'B',
        }
    }

    /// Semitone offset from C
    fn semitone(self) -> i8 {
        match self {
            NoteLetter::C => 0,
            NoteLetter::D => 2,
            NoteLetter::E => 4,
            NoteLetter::F => 5,
            NoteLetter::G => 7,
            NoteLetter::A => 9,
            NoteLetter::B => 11,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp, // #
    Flat,  // b
}

impl Accidental {
    fn offset(self) -> i8 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }
}

/// Spelling used for every pitch class after transposition
const CHROMATIC_SPELLING: [(NoteLetter, Accidental); 12] = [
    (NoteLetter::C, Accidental::Natural),
    (NoteLetter::C, Accidental::Sharp),
    (NoteLetter::D, Accidental::Natural),
    (NoteLetter::E, Accidental::Flat),
    (NoteLetter::E, Accidental::Natural),
    (NoteLetter::F, Accidental::Natural),
    (NoteLetter::F, Accidental::Sharp),
    (NoteLetter::G, Accidental::Natural),
    (NoteLetter::A, Accidental::Flat),
    (NoteLetter::A, Accidental::Natural),
    (NoteLetter::B, Accidental::Flat),
    (NoteLetter::B, Accidental::Natural),
];

/// A pitch class spelled as letter + accidental
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub letter: NoteLetter,
    pub accidental: Accidental,
}

impl Note {
    pub fn new(letter: NoteLetter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    /// Pitch class, 0 = C
    pub fn semitone(&self) -> u8 {
        (self.letter.semitone() + self.accidental.offset()).rem_euclid(12) as u8
    }

    /// Canonical spelling of a pitch class
    pub fn from_semitone(semitone: u8) -> Self {
        let (letter, accidental) = CHROMATIC_SPELLING[(semitone % 12) as usize];
        Self { letter, accidental }
    }

    fn shifted(&self, shift: u8) -> Self {
        Note::from_semitone((self.semitone() + shift) % 12)
    }

    /// Parse a note at the start of `text`, returning it with its byte length
    fn parse_prefix(text: &str) -> Option<(Note, usize)> {
        let mut chars = text.chars();
        let letter = NoteLetter::from_char(chars.next()?)?;
        let (accidental, len) = match chars.next() {
            Some('#') => (Accidental::Sharp, 2),
            Some('b') => (Accidental::Flat, 2),
            _ => (Accidental::Natural, 1),
        };
        Some((Note { letter, accidental }, len))
    }

    /// Parse a note that spans the whole of `text`
    pub fn parse(text: &str) -> Option<Note> {
        match Note::parse_prefix(text)? {
            (note, len) if len == text.len() => Some(note),
            _ => None,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.accidental.as_str())
    }
}

/// Building blocks of a chord quality, longest first where they share a prefix
const QUALITY_WORDS: [&str; 21] = [
    "maj", "min", "dim", "aug", "sus", "add", "omit", "alt", "no", "M", "m", "+", "-", "°",
    "ø", "Δ", "△", "^", "(", ")", ",",
];

/// Check that a quality suffix is made only of known chord vocabulary.
///
/// Digits are free-standing, `b`/`#` are alterations only in front of a digit
/// (`b9`, `#11`) and `/` only joins two digits (`6/9`).
fn is_valid_quality(quality: &str) -> bool {
    let mut rest = quality;
    let mut prev_digit = false;

    while let Some(c) = rest.chars().next() {
        let next_is_digit = rest[c.len_utf8()..].starts_with(|n: char| n.is_ascii_digit());

        let consumed = if c.is_ascii_digit() {
            1
        } else if matches!(c, 'b' | '#') && next_is_digit {
            1
        } else if c == '/' && prev_digit && next_is_digit {
            1
        } else if let Some(word) = QUALITY_WORDS.iter().find(|w| rest.starts_with(*w)) {
            word.len()
        } else {
            return false;
        };

        prev_digit = c.is_ascii_digit();
        rest = &rest[consumed..];
    }

    true
}

/// A chord symbol such as `C`, `Am7`, `F#m7b5` or `G/B`.
///
/// Equality compares root, quality and bass, which is the same as comparing the
/// canonical strings produced by `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    pub root: Note,
    pub quality: String,
    pub bass: Option<Note>,
}

impl Chord {
    /// Parse a chord symbol.
    ///
    /// Returns `None` for anything that is not a chord; callers render such tokens
    /// as plain text.
    ///
    /// # Examples
    /// ```
    /// use chordsheet::Chord;
    ///
    /// assert!(Chord::parse("Bbmaj7/D").is_some());
    /// assert!(Chord::parse("C6/9").is_some());
    /// assert!(Chord::parse("Xyz123").is_none());
    /// assert!(Chord::parse("Dog").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Chord> {
        let text: String = text
            .trim()
            .chars()
            .map(|c| match c {
                '♯' => '#',
                '♭' => 'b',
                other => other,
            })
            .collect();

        let (root, root_len) = Note::parse_prefix(&text)?;
        let rest = &text[root_len..];

        let (quality, bass) = match rest.rfind('/') {
            Some(idx) => match Note::parse(&rest[idx + 1..]) {
                Some(bass) => (&rest[..idx], Some(bass)),
                None => (rest, None),
            },
            None => (rest, None),
        };

        if !is_valid_quality(quality) {
            return None;
        }

        Some(Chord {
            root,
            quality: quality.to_string(),
            bass,
        })
    }

    /// Shift root and bass by `delta` semitones (taken mod 12). The quality is untouched.
    pub fn transpose(&self, delta: i32) -> Chord {
        let shift = delta.rem_euclid(12) as u8;
        if shift == 0 {
            return self.clone();
        }

        Chord {
            root: self.root.shifted(shift),
            quality: self.quality.clone(),
            bass: self.bass.map(|bass| bass.shifted(shift)),
        }
    }

    /// Same chord with root and bass respelled from the chromatic table (`Db` → `C#`)
    pub fn normalized(&self) -> Chord {
        Chord {
            root: Note::from_semitone(self.root.semitone()),
            quality: self.quality.clone(),
            bass: self.bass.map(|bass| Note::from_semitone(bass.semitone())),
        }
    }

    pub fn is_minor(&self) -> bool {
        matches!(self.quality.as_str(), "m" | "min" | "-")
    }

    /// Name used to look the chord up in a diagram dictionary.
    ///
    /// Major chords use the bare root, minor chords `m`, augmented chords `+`, and a
    /// bare `sus` is read as `sus4`. Everything else keeps its raw suffix.
    pub fn diagram_name(&self) -> String {
        let suffix = match self.quality.as_str() {
            "" | "maj" | "M" => "",
            "m" | "min" | "-" => "m",
            "aug" | "+" => "+",
            "sus" => "sus4",
            other => other,
        };

        let mut name = format!("{}{}", self.root, suffix);
        if let Some(bass) = self.bass {
            name.push('/');
            name.push_str(&bass.to_string());
        }
        name
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}

impl Serialize for Chord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(text: &str) -> Chord {
        Chord::parse(text).unwrap_or_else(|| panic!("'{}' should parse", text))
    }

    #[test]
    fn test_parse_parts() {
        let c = chord("F#m7b5/E");
        assert_eq!(c.root, Note::new(NoteLetter::F, Accidental::Sharp));
        assert_eq!(c.quality, "m7b5");
        assert_eq!(c.bass, Some(Note::new(NoteLetter::E, Accidental::Natural)));

        let g = chord("G");
        assert_eq!(g.quality, "");
        assert_eq!(g.bass, None);
    }

    #[test]
    fn test_parse_common_qualities() {
        for text in [
            "C", "Cm", "C7", "Cmaj7", "CM7", "Cm7", "Cdim", "Cdim7", "Caug", "C+", "Csus", "Csus2",
            "Csus4", "Cadd9", "C9", "C13", "Cm6", "C7#9", "C7b9", "Cm(maj7)", "C°", "Cø",
            "C-7", "C6/9", "C5", "Cno3", "C7alt", "CΔ7",
        ] {
            assert_eq!(chord(text).to_string(), text, "round trip of {}", text);
        }
    }

    #[test]
    fn test_parse_rejects_words() {
        for text in ["", "Hello", "Dog", "Every", "Be", "Go", "Xyz123", "c", "am", "C/H", "Add", "Ebb", "CmMaj7"] {
            assert!(Chord::parse(text).is_none(), "'{}' should not parse", text);
        }
    }

    #[test]
    fn test_unicode_accidentals_are_canonicalized() {
        assert_eq!(chord("B♭m").to_string(), "Bbm");
        assert_eq!(chord("F♯7").to_string(), "F#7");
    }

    #[test]
    fn test_transpose_basic() {
        assert_eq!(chord("C").transpose(2).to_string(), "D");
        assert_eq!(chord("C").transpose(1).to_string(), "C#");
        assert_eq!(chord("C").transpose(3).to_string(), "Eb");
        assert_eq!(chord("Am").transpose(-2).to_string(), "Gm");
        assert_eq!(chord("B").transpose(1).to_string(), "C");
        assert_eq!(chord("G/B").transpose(5).to_string(), "C/E");
        assert_eq!(chord("Asus").transpose(2).to_string(), "Bsus");
    }

    #[test]
    fn test_transpose_zero_is_identity() {
        for text in ["Db", "Cb", "E#7", "G/B"] {
            assert_eq!(chord(text).transpose(0), chord(text));
            assert_eq!(chord(text).transpose(12), chord(text));
            assert_eq!(chord(text).transpose(-24), chord(text));
        }
    }

    #[test]
    fn test_transpose_group_law_on_canonical_chords() {
        for text in ["C", "C#m7", "Eb/G", "F#dim", "Ab9", "Bbmaj7/D", "B"] {
            let c = chord(text);
            for a in -24..=24 {
                for b in -24..=24 {
                    assert_eq!(c.transpose(a).transpose(b), c.transpose(a + b), "{} {} {}", text, a, b);
                }
            }
        }
    }

    #[test]
    fn test_transpose_round_trip_up_to_spelling() {
        let db = chord("Db");
        assert_eq!(db.transpose(5).transpose(-5), db.normalized());
        assert_eq!(db.normalized().to_string(), "C#");
    }

    #[test]
    fn test_diagram_name() {
        assert_eq!(chord("C").diagram_name(), "C");
        assert_eq!(chord("Cmaj").diagram_name(), "C");
        assert_eq!(chord("Amin").diagram_name(), "Am");
        assert_eq!(chord("A-").diagram_name(), "Am");
        assert_eq!(chord("Eaug").diagram_name(), "E+");
        assert_eq!(chord("Dsus").diagram_name(), "Dsus4");
        assert_eq!(chord("Dsus2").diagram_name(), "Dsus2");
        assert_eq!(chord("G7/B").diagram_name(), "G7/B");
        // the canonical string keeps the written suffix
        assert_eq!(chord("Dsus").to_string(), "Dsus");
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&chord("Bbm7")).unwrap();
        assert_eq!(json, "\"Bbm7\"");
    }
}
