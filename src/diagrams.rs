//! Chord diagram dictionary.
//!
//! A dictionary is JSON mapping chord names to one or more fingerings:
//! ```json
//! { "Am": [{ "positions": ["x", "0", "2", "2", "1", "0"], "fingerings": [["0", "0", "2", "3", "1", "0"]] }] }
//! ```
//! Lookups go through [`Chord::diagram_name`], so `Amin`, `A-` and `Am` all find
//! the `Am` entry, and `Db` falls back to a `C#` entry.

use crate::chord::Chord;
use crate::error::ChordSheetError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One way to play a chord: a fret (or `x`/`0`) per string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    pub positions: Vec<String>,
    #[serde(default)]
    pub fingerings: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ChordDiagrams {
    entries: HashMap<String, Vec<Diagram>>,
    /// Lowercased name to stored name, for lookups that miss on exact case
    folded: HashMap<String, String>,
}

impl ChordDiagrams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ChordSheetError> {
        // sorted, so the entry a case-folded lookup lands on doesn't depend on hashing
        let raw: BTreeMap<String, Vec<Diagram>> = serde_json::from_str(json)
            .map_err(|e| ChordSheetError::ConfigError(format!("chord diagram dictionary: {}", e)))?;

        let mut diagrams = Self::new();
        for (name, entries) in raw {
            diagrams.insert(&name, entries);
        }
        Ok(diagrams)
    }

    pub fn insert(&mut self, name: &str, diagrams: Vec<Diagram>) {
        let name = name.trim().to_string();
        self.folded.entry(name.to_lowercase()).or_insert_with(|| name.clone());
        self.entries.insert(name, diagrams);
    }

    /// Entries stored under `name`. An exact match wins over one that differs only in case.
    pub fn get(&self, name: &str) -> Option<&[Diagram]> {
        let name = name.trim();
        self.entries
            .get(name)
            .or_else(|| {
                self.folded
                    .get(&name.to_lowercase())
                    .and_then(|stored| self.entries.get(stored))
            })
            .map(Vec::as_slice)
    }

    /// Diagrams for a chord, trying its spelling first and then the chromatic one
    pub fn lookup(&self, chord: &Chord) -> Option<&[Diagram]> {
        self.get(&chord.diagram_name())
            .or_else(|| self.get(&chord.normalized().diagram_name()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICTIONARY: &str = r#"{
        "Am": [{ "positions": ["x", "0", "2", "2", "1", "0"], "fingerings": [["0", "0", "2", "3", "1", "0"]] }],
        "C#": [{ "positions": ["x", "4", "6", "6", "6", "4"] }],
        "Gsus4": [{ "positions": ["3", "3", "0", "0", "1", "3"] }],
        "D/F#": [{ "positions": ["2", "x", "0", "2", "3", "2"] }]
    }"#;

    fn diagram(frets: &str) -> Diagram {
        Diagram {
            positions: frets.chars().map(String::from).collect(),
            fingerings: Vec::new(),
        }
    }

    fn chord(name: &str) -> Chord {
        Chord::parse(name).unwrap()
    }

    #[test]
    fn test_lookup_by_diagram_name() {
        let diagrams = ChordDiagrams::from_json(DICTIONARY).unwrap();
        assert_eq!(diagrams.len(), 4);
        assert!(diagrams.lookup(&chord("Am")).is_some());
        assert!(diagrams.lookup(&chord("Amin")).is_some());
        assert!(diagrams.lookup(&chord("A-")).is_some());
        assert!(diagrams.lookup(&chord("Gsus")).is_some());
        assert!(diagrams.lookup(&chord("D/F#")).is_some());
        assert!(diagrams.lookup(&chord("E")).is_none());
    }

    #[test]
    fn test_enharmonic_fallback() {
        let diagrams = ChordDiagrams::from_json(DICTIONARY).unwrap();
        let entry = diagrams.lookup(&chord("Db")).unwrap();
        assert_eq!(entry[0].positions[1], "4");
        assert!(entry[0].fingerings.is_empty());
    }

    #[test]
    fn test_case_insensitive_names() {
        let diagrams = ChordDiagrams::from_json(DICTIONARY).unwrap();
        assert!(diagrams.get("am").is_some());
        assert!(diagrams.get("GSUS4").is_some());
    }

    #[test]
    fn test_exact_case_wins() {
        let mut diagrams = ChordDiagrams::new();
        let minor = diagram("x02010");
        let major = diagram("x02120");
        diagrams.insert("Am7", vec![minor.clone()]);
        diagrams.insert("AM7", vec![major.clone()]);
        assert_eq!(diagrams.get("Am7"), Some(&[minor][..]));
        assert_eq!(diagrams.get("AM7"), Some(&[major][..]));
    }

    #[test]
    fn test_folded_lookup_is_stable_across_loads() {
        let json = r#"{
            "Am7": [{ "positions": ["x", "0", "2", "0", "1", "0"] }],
            "AM7": [{ "positions": ["x", "0", "2", "1", "2", "0"] }]
        }"#;
        for _ in 0..16 {
            let diagrams = ChordDiagrams::from_json(json).unwrap();
            assert_eq!(diagrams.get("am7").unwrap()[0].positions[3], "1");
            assert_eq!(diagrams.get("Am7").unwrap()[0].positions[3], "0");
        }
    }

    #[test]
    fn test_invalid_json() {
        let err = ChordDiagrams::from_json("{\"Am\": 3}").unwrap_err();
        assert!(matches!(err, ChordSheetError::ConfigError(_)));
    }
}
