//! Line lexer
//!
//! The program is a list of statement lines, each a list of space-separated
//! words. Tabs are dropped, blank lines and `//` comment lines are skipped,
//! and words belonging to one `"..."` literal are glued back together.

mod token;

pub use token::{Token, dequote, is_string_literal};

use crate::ast::Span;
use crate::error::{Result, ScriptError};
use serde::Serialize;

/// One statement line after lexing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub tokens: Vec<String>,
    /// 1-based line number in the source text
    pub number: usize,
    /// Byte range of the whole line in the source text
    pub span: Span,
}

/// Tokenize source code into statement lines
pub fn tokenize(source: &str) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    let mut offset = 0;

    for (index, raw) in source.split('\n').enumerate() {
        let start = offset;
        offset += raw.len() + 1;

        if raw.trim().is_empty() {
            continue;
        }

        let span = Span::new(start, start + raw.trim_end_matches('\r').len());
        let number = index + 1;
        let words = split_words(raw);

        let Some(first) = words.first() else {
            continue;
        };
        if first.starts_with("//") {
            continue;
        }

        let tokens = merge_string_literals(words).map_err(|e| e.at(number, span))?;
        lines.push(Line {
            tokens,
            number,
            span,
        });
    }

    Ok(lines)
}

/// Render a line back to source form
pub fn render(line: &Line) -> String {
    line.tokens.join(" ")
}

fn split_words(raw: &str) -> Vec<String> {
    raw.replace('\t', "")
        .split(' ')
        .map(|w| w.trim_end_matches('\r'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn merge_string_literals(words: Vec<String>) -> Result<Vec<String>> {
    let mut tokens = Vec::with_capacity(words.len());
    let mut words = words.into_iter();

    while let Some(word) = words.next() {
        if !word.starts_with('"') || is_string_literal(&word) {
            tokens.push(word);
            continue;
        }

        let mut literal = word;
        loop {
            match words.next() {
                Some(next) => {
                    literal.push(' ');
                    literal.push_str(&next);
                    if next.ends_with('"') {
                        break;
                    }
                }
                None => return Err(ScriptError::unclosed_string(&literal)),
            }
        }
        tokens.push(literal);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn words(source: &str) -> Vec<Vec<String>> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|line| line.tokens)
            .collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_whitespace_only() {
        assert!(tokenize("   \t\t\n\n\r\n   ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_splits_on_spaces() {
        assert_eq!(words("x = 1  2 +"), vec![vec!["x", "=", "1", "2", "+"]]);
    }

    #[test]
    fn test_tokenize_strips_tabs() {
        assert_eq!(words("\t\tprint\tx"), vec![vec!["printx"]]);
        assert_eq!(words("\tprint x"), vec![vec!["print", "x"]]);
    }

    #[test]
    fn test_tokenize_skips_comment_lines() {
        let source = "// header\nx = 1\n  // indented comment\nprint x";
        assert_eq!(words(source), vec![vec!["x", "=", "1"], vec!["print", "x"]]);
    }

    #[test]
    fn test_tokenize_keeps_trailing_slashes_in_statement() {
        assert_eq!(words("x = 1 // not a comment"), vec![vec!["x", "=", "1", "//", "not", "a", "comment"]]);
    }

    #[test]
    fn test_tokenize_line_numbers_and_spans() {
        let source = "x = 1\n\nprint x\n";
        let lines = tokenize(source).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].span, Span::new(0, 5));
        assert_eq!(lines[1].number, 3);
        assert_eq!(&source[lines[1].span.start..lines[1].span.end], "print x");
    }

    #[test]
    fn test_tokenize_crlf() {
        let lines = tokenize("print 1\r\nprint 2\r\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].tokens, vec!["print", "1"]);
        assert_eq!(lines[0].span, Span::new(0, 7));
    }

    #[test]
    fn test_tokenize_merges_string_literal() {
        assert_eq!(
            words("print \"hello   big world\" x"),
            vec![vec!["print", "\"hello big world\"", "x"]]
        );
    }

    #[test]
    fn test_tokenize_single_word_string() {
        assert_eq!(words("s = \"hi\""), vec![vec!["s", "=", "\"hi\""]]);
    }

    #[test]
    fn test_tokenize_lone_quote_opens_literal() {
        assert_eq!(words("print \" a \""), vec![vec!["print", "\" a \""]]);
    }

    #[test]
    fn test_tokenize_unclosed_string_error() {
        let err = tokenize("x = 1\nprint \"hello world").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
        assert!(err.message.contains("unclosed string"));
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn test_tokenize_is_idempotent_on_rendered_lines() {
        let source = "while i 10 <\n\tprint \"a  b\"\n  i = i 1 +\nendwhile";
        let first = tokenize(source).unwrap();
        let rendered: Vec<String> = first.iter().map(render).collect();
        let second = tokenize(&rendered.join("\n")).unwrap();
        let a: Vec<_> = first.iter().map(|l| &l.tokens).collect();
        let b: Vec<_> = second.iter().map(|l| &l.tokens).collect();
        assert_eq!(a, b);
    }
}
