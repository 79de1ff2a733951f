use crate::ast::{canonical_tag_name, END_OF_TAB, START_OF_TAB};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InsideTab,
}

/// Remove `start_of_tab` … `end_of_tab` blocks, delimiters included.
///
/// A block without a closing `end_of_tab` is kept as written. A second
/// `start_of_tab` inside a block is part of the block; the first `end_of_tab`
/// closes it.
pub fn strip_tab_sections(source: &str) -> String {
    strip_tab_sections_with_lines(source).0
}

/// Like [`strip_tab_sections`], also returning the 1-based source line number of
/// every line that was kept.
pub(crate) fn strip_tab_sections_with_lines(source: &str) -> (String, Vec<usize>) {
    let mut kept: Vec<(usize, &str)> = Vec::new();
    let mut held: Vec<(usize, &str)> = Vec::new();
    let mut state = ScanState::Normal;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let numbered = (index + 1, line);
        let name = directive_name(line);
        match state {
            ScanState::Normal if name.as_deref() == Some(START_OF_TAB) => {
                held.push(numbered);
                state = ScanState::InsideTab;
            }
            ScanState::Normal => kept.push(numbered),
            ScanState::InsideTab => {
                held.push(numbered);
                if name.as_deref() == Some(END_OF_TAB) {
                    held.clear();
                    state = ScanState::Normal;
                }
            }
        }
    }

    kept.extend(held);
    let text = kept.iter().map(|(_, line)| *line).collect();
    let numbers = kept.into_iter().map(|(number, _)| number).collect();
    (text, numbers)
}

fn directive_name(line: &str) -> Option<String> {
    let inner = line.trim().strip_prefix('{')?.strip_suffix('}')?;
    let name = inner.split(|c: char| c == ':' || c.is_whitespace()).next()?;
    Some(canonical_tag_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_tab_block() {
        let source = "[C]one\n{start_of_tab}\ne|--0--|\n{end_of_tab}\n[G]two\n";
        assert_eq!(strip_tab_sections(source), "[C]one\n[G]two\n");
    }

    #[test]
    fn test_aliases_and_labels() {
        let source = "a\n{sot: Intro}\nx\n{eot}\nb";
        assert_eq!(strip_tab_sections(source), "a\nb");
    }

    #[test]
    fn test_unclosed_block_is_kept() {
        let source = "a\n{sot}\ne|--0--|\n";
        assert_eq!(strip_tab_sections(source), source);
    }

    #[test]
    fn test_nested_start_closes_at_first_end() {
        let source = "a\n{sot}\n{sot}\nx\n{eot}\nb\n{eot}\nc\n";
        assert_eq!(strip_tab_sections(source), "a\nb\n{eot}\nc\n");
    }

    #[test]
    fn test_kept_line_numbers() {
        let (text, numbers) = strip_tab_sections_with_lines("a\n{sot}\nx\n{eot}\nb\n{sot}\ny\n");
        assert_eq!(text, "a\nb\n{sot}\ny\n");
        assert_eq!(numbers, vec![1, 5, 6, 7]);
    }

    #[test]
    fn test_text_without_tabs_unchanged() {
        let source = "{title: x}\n[C]la\n";
        assert_eq!(strip_tab_sections(source), source);
    }
}
