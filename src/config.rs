//! Render options, readable from YAML:
//!
//! ```yaml
//! dialect: chord-sheet
//! transpose: -2
//! show-tabs: false
//! preserve-whitespace: false
//! collapsed-blank-lines: 1
//! output: text
//! ```
//!
//! Every key is optional; missing keys take the values of [`RenderOptions::default`].

use crate::error::ChordSheetError;
use crate::format::OutputFormat;
use crate::parser::{ChordSheetOptions, Dialect};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RenderOptions {
    pub dialect: Dialect,
    /// Semitones to shift every chord by
    pub transpose: i32,
    /// Keep `start_of_tab` … `end_of_tab` blocks
    pub show_tabs: bool,
    pub preserve_whitespace: bool,
    pub collapsed_blank_lines: usize,
    pub output: OutputFormat,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Auto,
            transpose: 0,
            show_tabs: true,
            preserve_whitespace: true,
            collapsed_blank_lines: 1,
            output: OutputFormat::Html,
        }
    }
}

impl RenderOptions {
    pub fn from_yaml(yaml: &str) -> Result<Self, ChordSheetError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ChordSheetError::ConfigError(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChordSheetError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .map_err(|e| ChordSheetError::ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&yaml)
    }

    pub fn chord_sheet_options(&self) -> ChordSheetOptions {
        ChordSheetOptions {
            preserve_whitespace: self.preserve_whitespace,
            collapsed_blank_lines: self.collapsed_blank_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::from_yaml("").unwrap();
        assert_eq!(options, RenderOptions::default());
        assert!(options.show_tabs);
        assert_eq!(options.output, OutputFormat::Html);
    }

    #[test]
    fn test_partial_yaml() {
        let options = RenderOptions::from_yaml("dialect: chord-sheet\ntranspose: -2\noutput: text\n").unwrap();
        assert_eq!(options.dialect, Dialect::ChordSheet);
        assert_eq!(options.transpose, -2);
        assert_eq!(options.output, OutputFormat::Text);
        assert!(options.preserve_whitespace);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            RenderOptions::from_yaml("dialect: markdown"),
            Err(ChordSheetError::ConfigError(_))
        ));
        assert!(matches!(
            RenderOptions::from_yaml("transpsoe: 2"),
            Err(ChordSheetError::ConfigError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "show-tabs: false\ncollapsed-blank-lines: 2").unwrap();
        let options = RenderOptions::load(file.path()).unwrap();
        assert!(!options.show_tabs);
        assert_eq!(options.chord_sheet_options().collapsed_blank_lines, 2);
    }

    #[test]
    fn test_missing_file() {
        let err = RenderOptions::load("/nonexistent/chordsheet.yaml").unwrap_err();
        assert_eq!(err.area(), "Configuration");
    }
}
