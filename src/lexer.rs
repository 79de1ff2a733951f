use crate::ast::{canonical_tag_name, END_OF_TAB, START_OF_TAB};
use crate::error::ChordSheetError;

/// Token types for ChordPro source
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Lyric text between chords
    Text(String),
    /// Contents of `[...]`
    Chord(String),
    /// Contents of a `{...}` line, braces removed
    Directive(String),
    /// A `#` line, marker removed
    Comment(String),
    Newline,
}

/// A token with its position in the source
#[derive(Debug, Clone)]
pub struct LocatedToken {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// Lexer for ChordPro source.
///
/// Works line by line: a line starting with `{` is a directive, a line starting
/// with `#` is a comment, anything else is lyrics with inline `[chords]`.
/// Between `start_of_tab` and `end_of_tab` lyric lines are emitted verbatim.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    position: usize,
    in_tab: bool,
    lyrics_only: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            position: 0,
            in_tab: false,
            lyrics_only: false,
        }
    }

    /// Treat every line as lyrics, with no directives or comments
    pub fn lyrics_only(mut self) -> Self {
        self.lyrics_only = true;
        self
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Rest of the current line, without the newline or a trailing `\r`
    fn rest_of_line(&self) -> &'a str {
        let input = self.input;
        let remaining = &input[self.position..];
        let line = remaining.split('\n').next().unwrap_or("");
        line.strip_suffix('\r').unwrap_or(line)
    }

    /// Consume up to (not including) the next newline
    fn skip_line(&mut self) {
        while let Some(&c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<LocatedToken>, ChordSheetError> {
        let mut tokens = Vec::new();

        while self.peek().is_some() {
            let line = self.line;
            let column = self.column;
            let text = self.rest_of_line();
            let trimmed = text.trim();

            if self.lyrics_only {
                self.lyric_line(&mut tokens)?;
            } else if trimmed.starts_with('{') {
                let token = self.directive(trimmed, line, column + (text.len() - text.trim_start().len()))?;
                tokens.push(LocatedToken { token, line, column });
                self.skip_line();
            } else if self.in_tab {
                tokens.push(LocatedToken {
                    token: Token::Text(text.to_string()),
                    line,
                    column,
                });
                self.skip_line();
            } else if let Some(comment) = text.strip_prefix('#') {
                tokens.push(LocatedToken {
                    token: Token::Comment(comment.trim().to_string()),
                    line,
                    column,
                });
                self.skip_line();
            } else {
                self.lyric_line(&mut tokens)?;
            }

            if let Some(&'\n') = self.peek() {
                let (line, column) = (self.line, self.column);
                self.advance();
                tokens.push(LocatedToken {
                    token: Token::Newline,
                    line,
                    column,
                });
            }
        }

        Ok(tokens)
    }

    /// Validate a `{...}` line and track tab sections
    fn directive(&mut self, trimmed: &str, line: usize, column: usize) -> Result<Token, ChordSheetError> {
        let inner = trimmed
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| ChordSheetError::parse_error(line, column, "Unterminated directive: expected '}' at end of line"))?;

        let name = inner
            .split(|c: char| c == ':' || c.is_whitespace())
            .next()
            .unwrap_or("");
        match canonical_tag_name(name).as_str() {
            START_OF_TAB => self.in_tab = true,
            END_OF_TAB => self.in_tab = false,
            _ => {}
        }

        Ok(Token::Directive(inner.to_string()))
    }

    /// Split a lyric line into text runs and `[chord]` tokens
    fn lyric_line(&mut self, tokens: &mut Vec<LocatedToken>) -> Result<(), ChordSheetError> {
        let mut text = String::new();
        let mut text_start = (self.line, self.column);

        while let Some(&c) = self.peek() {
            match c {
                '\n' => break,
                '\r' => {
                    self.advance();
                }
                '[' => {
                    let (line, column) = (self.line, self.column);
                    if !text.is_empty() {
                        tokens.push(LocatedToken {
                            token: Token::Text(std::mem::take(&mut text)),
                            line: text_start.0,
                            column: text_start.1,
                        });
                    }
                    self.advance();
                    let chord = self.chord(line, column)?;
                    tokens.push(LocatedToken {
                        token: Token::Chord(chord),
                        line,
                        column,
                    });
                    text_start = (self.line, self.column);
                }
                ']' => {
                    return Err(ChordSheetError::parse_error(
                        self.line,
                        self.column,
                        "Unexpected ']' without a matching '['",
                    ));
                }
                _ => {
                    if text.is_empty() {
                        text_start = (self.line, self.column);
                    }
                    text.push(c);
                    self.advance();
                }
            }
        }

        if !text.is_empty() {
            tokens.push(LocatedToken {
                token: Token::Text(text),
                line: text_start.0,
                column: text_start.1,
            });
        }
        Ok(())
    }

    /// Read a chord name after `[`, consuming the closing `]`
    fn chord(&mut self, line: usize, column: usize) -> Result<String, ChordSheetError> {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(&']') => {
                    self.advance();
                    break;
                }
                Some(&'[') => {
                    return Err(ChordSheetError::parse_error(
                        self.line,
                        self.column,
                        "Nested '[' inside a chord",
                    ));
                }
                Some(&'\n') | None => {
                    return Err(ChordSheetError::parse_error(line, column, "Unclosed chord bracket"));
                }
                Some(&c) => {
                    name.push(c);
                    self.advance();
                }
            }
        }

        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ChordSheetError::parse_error(line, column, "Empty chord '[]'"));
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_types(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        lexer.tokenize().unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_inline_chords() {
        assert_eq!(
            token_types("[C]Hello [G]world"),
            vec![
                Token::Chord("C".to_string()),
                Token::Text("Hello ".to_string()),
                Token::Chord("G".to_string()),
                Token::Text("world".to_string()),
            ]
        );
    }

    #[test]
    fn test_directive_and_comment_lines() {
        assert_eq!(
            token_types("{title: Test}\n# note\nla"),
            vec![
                Token::Directive("title: Test".to_string()),
                Token::Newline,
                Token::Comment("note".to_string()),
                Token::Newline,
                Token::Text("la".to_string()),
            ]
        );
    }

    #[test]
    fn test_lyrics_only_keeps_markers_as_text() {
        let tokens: Vec<Token> = Lexer::new("#1 [C]x {y}")
            .lyrics_only()
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect();
        assert_eq!(
            tokens,
            vec![
                Token::Text("#1 ".to_string()),
                Token::Chord("C".to_string()),
                Token::Text("x {y}".to_string()),
            ]
        );
    }

    #[test]
    fn test_crlf_is_dropped() {
        assert_eq!(
            token_types("[Am]la\r\nli"),
            vec![
                Token::Chord("Am".to_string()),
                Token::Text("la".to_string()),
                Token::Newline,
                Token::Text("li".to_string()),
            ]
        );
    }

    #[test]
    fn test_tab_section_is_verbatim() {
        assert_eq!(
            token_types("{sot}\ne|--[0]--|\n{eot}\n[C]x"),
            vec![
                Token::Directive("sot".to_string()),
                Token::Newline,
                Token::Text("e|--[0]--|".to_string()),
                Token::Newline,
                Token::Directive("eot".to_string()),
                Token::Newline,
                Token::Chord("C".to_string()),
                Token::Text("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_positions() {
        let mut lexer = Lexer::new("ab\n  [D]c");
        let tokens = lexer.tokenize().unwrap();
        let chord = tokens.iter().find(|t| t.token == Token::Chord("D".to_string())).unwrap();
        assert_eq!((chord.line, chord.column), (2, 3));
    }

    #[test]
    fn test_unclosed_chord() {
        let err = Lexer::new("[C]Hello [G").tokenize().unwrap_err();
        assert_eq!(
            err,
            ChordSheetError::ParseError {
                line: 1,
                column: 10,
                message: "Unclosed chord bracket".to_string(),
            }
        );
    }

    #[test]
    fn test_stray_and_nested_brackets() {
        assert!(Lexer::new("Hello] world").tokenize().is_err());
        assert!(Lexer::new("[C[D]]x").tokenize().is_err());
        assert!(Lexer::new("[ ]x").tokenize().is_err());
    }

    #[test]
    fn test_unterminated_directive() {
        let err = Lexer::new("la\n  {title: Test").tokenize().unwrap_err();
        assert_eq!(
            err,
            ChordSheetError::ParseError {
                line: 2,
                column: 3,
                message: "Unterminated directive: expected '}' at end of line".to_string(),
            }
        );
    }
}
