//! Error types and reporting
//!
//! Every failure is fatal: the engine stops at the first error and the
//! binary reports it and exits non-zero.

use crate::ast::Span;
use std::fmt;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Kinds of script errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unterminated string literal
    Lex,
    /// Malformed declaration, call or statement
    Syntax,
    /// Undeclared function or variable
    Name,
    /// Bad RPN expression or arithmetic fault
    Eval,
    /// Block terminator not found, or return outside a function
    Structural,
    /// Unreadable source or bad `input`
    Io,
    /// Call depth limit exceeded
    Limit,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lex => "Lex",
            ErrorKind::Syntax => "Syntax",
            ErrorKind::Name => "Name",
            ErrorKind::Eval => "Eval",
            ErrorKind::Structural => "Structural",
            ErrorKind::Io => "IO",
            ErrorKind::Limit => "Limit",
        };
        f.write_str(name)
    }
}

/// Script error, optionally located at a source line
#[derive(Debug, Clone, Error)]
#[error("{kind} error{}: {message}", location(.line))]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub message: String,
    /// 1-based source line number
    pub line: Option<usize>,
    pub span: Option<Span>,
}

fn location(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" on line {n}"),
        None => String::new(),
    }
}

impl ScriptError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ScriptError {
            kind,
            message: message.into(),
            line: None,
            span: None,
        }
    }

    pub fn lex(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Lex, message)
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Name, message)
    }

    pub fn eval(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Eval, message)
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structural, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::name(format!("undefined variable: {name}"))
    }

    pub fn undefined_function(name: &str) -> Self {
        Self::name(format!("undefined function: {name}"))
    }

    pub fn division_by_zero() -> Self {
        Self::eval("division by zero")
    }

    pub fn malformed_rpn(detail: &str) -> Self {
        Self::eval(format!("malformed RPN expression: {detail}"))
    }

    pub fn unclosed_string(token: &str) -> Self {
        Self::lex(format!(
            "unclosed string starting at {token}; close the quotes on the same line"
        ))
    }

    pub fn missing_terminator(keyword: &str, terminator: &str) -> Self {
        Self::structural(format!("`{keyword}` has no matching `{terminator}`"))
    }

    pub fn stack_overflow(depth: usize) -> Self {
        Self::new(
            ErrorKind::Limit,
            format!("stack overflow: call depth exceeded {depth}"),
        )
    }

    /// Attach a source location unless one is already present
    pub fn at(mut self, line: usize, span: Span) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
            self.span = Some(span);
        }
        self
    }
}

impl From<std::io::Error> for ScriptError {
    fn from(e: std::io::Error) -> Self {
        ScriptError::io(e.to_string())
    }
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &ScriptError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = format!("{} error", error.kind);

    let report = match error.span {
        Some(span) => Report::build(ReportKind::Error, (filename, span.start..span.end))
            .with_message(kind)
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(&error.message)
                    .with_color(Color::Red),
            )
            .finish(),
        None => Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind}: {}", error.message))
            .finish(),
    };

    if report.eprint((filename, Source::from(source))).is_err() {
        eprintln!("Error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_variable() {
        let err = ScriptError::undefined_variable("foo");
        assert_eq!(err.kind, ErrorKind::Name);
        assert!(err.message.contains("foo"));
    }

    #[test]
    fn test_undefined_function() {
        let err = ScriptError::undefined_function("bar");
        assert_eq!(err.kind, ErrorKind::Name);
        assert!(err.message.contains("bar"));
    }

    #[test]
    fn test_division_by_zero() {
        let err = ScriptError::division_by_zero();
        assert_eq!(err.kind, ErrorKind::Eval);
        assert!(err.message.contains("division by zero"));
    }

    #[test]
    fn test_stack_overflow() {
        let err = ScriptError::stack_overflow(10);
        assert_eq!(err.kind, ErrorKind::Limit);
        assert!(err.message.contains("stack overflow"));
    }

    #[test]
    fn test_display_without_location() {
        let err = ScriptError::malformed_rpn("operator + needs two operands");
        assert_eq!(
            err.to_string(),
            "Eval error: malformed RPN expression: operator + needs two operands"
        );
    }

    #[test]
    fn test_display_with_location() {
        let err = ScriptError::unclosed_string("\"abc").at(3, Span::new(10, 20));
        assert!(err.to_string().starts_with("Lex error on line 3:"));
        assert!(err.message.contains("unclosed string"));
    }

    #[test]
    fn test_at_keeps_first_location() {
        let err = ScriptError::syntax("bad")
            .at(2, Span::new(0, 4))
            .at(9, Span::new(50, 60));
        assert_eq!(err.line, Some(2));
        assert_eq!(err.span, Some(Span::new(0, 4)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.rpn");
        let err: ScriptError = io.into();
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.message.contains("missing.rpn"));
    }
}
