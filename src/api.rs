use crate::ast::Song;
use crate::config::RenderOptions;
use crate::error::{ChordSheetError, Warning};
use crate::parser::{parse_chordpro, strip_tab_sections_with_lines, ChordSheetParser, Dialect};
use crate::transform::{extract_chords, transpose_song, ChordCollection};
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Everything produced by one pass through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// The song after transposition
    pub song: Song,
    pub chords: ChordCollection,
    pub output: String,
    /// Problems found along the way, with `line` pointing into the source text
    pub warnings: Vec<Warning>,
}

/// Parse `source` in the dialect the options ask for (detecting it for `auto`)
pub fn parse_song(source: &str, options: &RenderOptions) -> Result<Song, ChordSheetError> {
    parse_located(source, options).map(|(song, _)| song)
}

/// Parse, also returning the 1-based source line of every `Song` line. Parse
/// errors already point into `source`, even when tab sections were removed first.
fn parse_located(source: &str, options: &RenderOptions) -> Result<(Song, Vec<usize>), ChordSheetError> {
    let dialect = options.dialect.resolve(source);
    debug!(%dialect, show_tabs = options.show_tabs, "parsing song");

    let (source, kept_lines) = if options.show_tabs {
        (Cow::Borrowed(source), None)
    } else {
        let (stripped, kept) = strip_tab_sections_with_lines(source);
        (Cow::Owned(stripped), Some(kept))
    };
    let to_source = |line: usize| match &kept_lines {
        Some(kept) => kept.get(line.wrapping_sub(1)).copied().unwrap_or(line),
        None => line,
    };

    let (song, lines) = match dialect {
        Dialect::ChordSheet => ChordSheetParser::new(options.chord_sheet_options()).parse_with_source_lines(&source)?,
        Dialect::ChordPro | Dialect::Auto => {
            let song = parse_chordpro(&source).map_err(|e| match e {
                ChordSheetError::ParseError { line, column, message } => ChordSheetError::ParseError {
                    line: to_source(line),
                    column,
                    message,
                },
                other => other,
            })?;
            // one song line per source line
            let lines = (1..=song.lines.len()).collect();
            (song, lines)
        }
    };

    let lines = lines.into_iter().map(to_source).collect();
    Ok((song, lines))
}

/// Parse, transpose, extract chords and format in one call.
///
/// Each stage only sees the previous stage's result, so an error names the
/// stage it came from (see [`ChordSheetError::area`]).
///
/// # Example
/// ```rust
/// use chordsheet::{render, OutputFormat, RenderOptions};
///
/// let options = RenderOptions {
///     transpose: 2,
///     output: OutputFormat::ChordPro,
///     ..RenderOptions::default()
/// };
/// let rendered = render("[C]Hello [G]world", &options).unwrap();
/// assert_eq!(rendered.output, "[D]Hello [A]world\n");
/// assert_eq!(rendered.chords.names(), vec!["D", "A"]);
/// ```
pub fn render(source: &str, options: &RenderOptions) -> Result<Rendered, ChordSheetError> {
    let (song, source_lines) = parse_located(source, options)?;
    let transposed = transpose_song(&song, options.transpose)?;
    let extracted = extract_chords(&transposed.value)?;
    let output = options.output.render(&transposed.value);

    let warnings = transposed
        .warnings
        .into_iter()
        .chain(extracted.warnings)
        .map(|warning| Warning {
            line: source_lines.get(warning.line.wrapping_sub(1)).copied().unwrap_or(warning.line),
            ..warning
        })
        .collect();

    Ok(Rendered {
        song: transposed.value,
        chords: extracted.value,
        output,
        warnings,
    })
}
