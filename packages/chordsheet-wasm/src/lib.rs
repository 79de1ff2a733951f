use chordsheet::{ChordSheetError, Dialect, RenderOptions, Warning};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct RenderError {
    area: String,
    message: String,
    line: Option<usize>,
    column: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChordInfo {
    name: String,
    diagram_name: String,
}

#[derive(Serialize)]
struct RenderResult {
    output: String,
    chords: Vec<ChordInfo>,
    warnings: Vec<Warning>,
}

#[derive(Serialize)]
struct Diagnostic {
    message: String,
    line: usize,
    column: usize,
    end_line: usize,
    end_column: usize,
    severity: String,
}

fn error_to_render_error(e: ChordSheetError) -> RenderError {
    let area = e.area().to_string();
    match e {
        ChordSheetError::ParseError { line, column, message } => RenderError {
            area,
            message,
            line: Some(line),
            column: Some(column),
        },
        other => RenderError {
            area,
            message: other.to_string(),
            line: None,
            column: None,
        },
    }
}

fn error_json(e: ChordSheetError) -> String {
    serde_json::to_string(&error_to_render_error(e))
        .unwrap_or_else(|_| r#"{"area":"Unknown","message":"unserializable error"}"#.to_string())
}

fn options_from_js(options: JsValue) -> Result<RenderOptions, ChordSheetError> {
    if options.is_undefined() || options.is_null() {
        return Ok(RenderOptions::default());
    }
    serde_wasm_bindgen::from_value(options).map_err(|e| ChordSheetError::ConfigError(e.to_string()))
}

fn render_json(source: &str, options: &RenderOptions) -> Result<String, String> {
    let rendered = chordsheet::render(source, options).map_err(error_json)?;
    let result = RenderResult {
        output: rendered.output,
        chords: rendered
            .chords
            .iter()
            .map(|chord| ChordInfo {
                name: chord.to_string(),
                diagram_name: chord.diagram_name(),
            })
            .collect(),
        warnings: rendered.warnings,
    };
    serde_json::to_string(&result).map_err(|e| error_json(ChordSheetError::ConfigError(e.to_string())))
}

/// Warnings from `render` already carry source line numbers
fn lint_diagnostics(source: &str, dialect: Dialect) -> Vec<Diagnostic> {
    let lines: Vec<&str> = source.lines().collect();
    let line_end = |line: usize| lines.get(line.saturating_sub(1)).map(|l| l.chars().count()).unwrap_or(0) + 1;

    let options = RenderOptions {
        dialect,
        ..RenderOptions::default()
    };
    match chordsheet::render(source, &options) {
        Ok(rendered) => rendered
            .warnings
            .into_iter()
            .map(|warning| Diagnostic {
                message: warning.message,
                line: warning.line,
                column: 1,
                end_line: warning.line,
                end_column: line_end(warning.line),
                severity: "warning".to_string(),
            })
            .collect(),
        Err(ChordSheetError::ParseError { line, column, message }) => vec![Diagnostic {
            message,
            line,
            column,
            end_line: line,
            end_column: line_end(line),
            severity: "error".to_string(),
        }],
        Err(other) => vec![Diagnostic {
            message: other.to_string(),
            line: 1,
            column: 1,
            end_line: 1,
            end_column: 1,
            severity: "error".to_string(),
        }],
    }
}

/// Render a song. `options` uses the same keys as the YAML config (`show-tabs`, ...).
/// Returns `{ output, chords, warnings }` as JSON.
#[wasm_bindgen]
pub fn render(source: &str, options: JsValue) -> Result<String, JsValue> {
    let options = options_from_js(options).map_err(|e| JsValue::from_str(&error_json(e)))?;
    render_json(source, &options).map_err(|e| JsValue::from_str(&e))
}

/// Distinct chord names of a song, after any transposition in `options`, as a JSON array
#[wasm_bindgen]
pub fn chords(source: &str, options: JsValue) -> Result<String, JsValue> {
    let options = options_from_js(options).map_err(|e| JsValue::from_str(&error_json(e)))?;
    chordsheet::render(source, &options)
        .map(|rendered| serde_json::to_string(&rendered.chords.names()).unwrap_or_else(|_| "[]".to_string()))
        .map_err(|e| JsValue::from_str(&error_json(e)))
}

/// Transpose a single chord name, or `undefined` if it isn't a chord
#[wasm_bindgen]
pub fn transpose_chord(name: &str, delta: i32) -> Option<String> {
    chordsheet::Chord::parse(name).map(|chord| chord.transpose(delta).to_string())
}

/// Lint a song and return diagnostics as a JSON array for inline editor display
#[wasm_bindgen]
pub fn lint(source: &str, dialect: Option<String>) -> String {
    let dialect = dialect
        .as_deref()
        .and_then(|d| d.parse::<Dialect>().ok())
        .unwrap_or_default();
    serde_json::to_string(&lint_diagnostics(source, dialect)).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json() {
        let json = render_json("[C]Hello [Gsus]world", &RenderOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["chords"][1]["name"], "Gsus");
        assert_eq!(value["chords"][1]["diagramName"], "Gsus4");
        assert!(value["output"].as_str().unwrap().contains("chord-sheet"));
    }

    #[test]
    fn test_error_json_has_location() {
        let err = render_json("[C]Hello [G", &RenderOptions::default()).unwrap_err();
        let value: serde_json::Value = serde_json::from_str(&err).unwrap();
        assert_eq!(value["area"], "Parser");
        assert_eq!(value["line"], 1);
        assert_eq!(value["column"], 10);
    }

    #[test]
    fn test_transpose_chord() {
        assert_eq!(transpose_chord("Am7", 2).as_deref(), Some("Bm7"));
        assert_eq!(transpose_chord("H", 2), None);
    }

    #[test]
    fn test_lint() {
        let diagnostics = lint_diagnostics("[C]ok\n[Xyz]bad", Dialect::ChordPro);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[0].severity, "warning");

        let source = "---\ntitle: x\n---\nC\nla\n{c: [Xyz]here}";
        let diagnostics = lint_diagnostics(source, Dialect::ChordSheet);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 6);
        assert_eq!(diagnostics[0].end_column, 15);

        let diagnostics = lint_diagnostics("{title: x\n", Dialect::ChordPro);
        assert_eq!(diagnostics[0].severity, "error");
        assert_eq!(diagnostics[0].line, 1);
    }
}
