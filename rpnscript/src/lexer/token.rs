//! Token definitions
//!
//! Source lines are split on spaces before any of this runs, so `Token`
//! classifies one word at a time rather than scanning whole lines.

use logos::Logos;
use serde::Serialize;

/// rpnscript word classification
#[derive(Logos, Debug, Clone, PartialEq, Serialize)]
pub enum Token {
    // Control flow
    #[token("while")]
    While,
    #[token("endwhile")]
    EndWhile,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("endif")]
    EndIf,

    // Functions
    #[token("void")]
    Void,
    #[token("int")]
    TyInt,
    #[token("string")]
    TyString,
    #[token("endfunc")]
    EndFunc,
    #[token("return")]
    Return,

    // Built-in statements
    #[token("print")]
    Print,
    #[token("dump")]
    Dump,
    #[token("input")]
    Input,

    // Punctuation
    #[token("=")]
    Eq,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,

    // RPN operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token("<=")]
    LtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,

    // Literals
    #[regex("[+-]?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    IntLit(i64),
    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    StringLit(String),
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl Token {
    /// Classify a single word. Returns `None` unless the whole word lexes
    /// as exactly one token.
    pub fn classify(word: &str) -> Option<Token> {
        let mut lexer = Token::lexer(word);
        let token = lexer.next()?.ok()?;
        if lexer.span() != (0..word.len()) || lexer.next().is_some() {
            return None;
        }
        Some(token)
    }

    /// Binary RPN operators
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::Plus
                | Token::Minus
                | Token::Star
                | Token::Slash
                | Token::Percent
                | Token::Gt
                | Token::Lt
                | Token::GtEq
                | Token::LtEq
                | Token::EqEq
                | Token::NotEq
                | Token::AndAnd
                | Token::OrOr
        )
    }
}

/// A complete `"..."` literal, as opposed to a lone or dangling quote
pub fn is_string_literal(word: &str) -> bool {
    word.len() >= 2 && word.starts_with('"') && word.ends_with('"')
}

/// Strip the surrounding quotes of a string literal
pub fn dequote(word: &str) -> Option<&str> {
    if is_string_literal(word) {
        Some(&word[1..word.len() - 1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_keywords() {
        let kinds: Vec<_> = ["while", "endwhile", "if", "else", "endif", "endfunc"]
            .iter()
            .map(|w| Token::classify(w))
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(Token::While),
                Some(Token::EndWhile),
                Some(Token::If),
                Some(Token::Else),
                Some(Token::EndIf),
                Some(Token::EndFunc),
            ]
        );
    }

    #[test]
    fn test_classify_keyword_prefix_is_identifier() {
        assert_eq!(
            Token::classify("whilex"),
            Some(Token::Ident("whilex".to_string()))
        );
        assert_eq!(Token::classify("int_"), Some(Token::Ident("int_".to_string())));
    }

    #[test]
    fn test_classify_operators() {
        for op in ["+", "-", "*", "/", "%", ">", "<", ">=", "<=", "==", "!=", "&&", "||"] {
            let token = Token::classify(op).unwrap();
            assert!(token.is_operator(), "{op} should be an operator");
        }
        assert!(!Token::Eq.is_operator());
    }

    #[test]
    fn test_classify_integers() {
        assert_eq!(Token::classify("42"), Some(Token::IntLit(42)));
        assert_eq!(Token::classify("-7"), Some(Token::IntLit(-7)));
        assert_eq!(Token::classify("+3"), Some(Token::IntLit(3)));
        assert_eq!(Token::classify("007"), Some(Token::IntLit(7)));
    }

    #[test]
    fn test_classify_integer_overflow_is_none() {
        assert_eq!(Token::classify("99999999999999999999"), None);
    }

    #[test]
    fn test_classify_string_literal() {
        assert_eq!(
            Token::classify("\"hello world\""),
            Some(Token::StringLit("hello world".to_string()))
        );
        assert_eq!(Token::classify("\"open"), None);
    }

    #[test]
    fn test_classify_rejects_compound_words() {
        assert_eq!(Token::classify("add(2,"), None);
        assert_eq!(Token::classify("1+"), None);
        assert_eq!(Token::classify(""), None);
    }

    #[test]
    fn test_dequote() {
        assert_eq!(dequote("\"a b\""), Some("a b"));
        assert_eq!(dequote("\"\""), Some(""));
        assert_eq!(dequote("\""), None);
        assert_eq!(dequote("abc"), None);
    }
}
