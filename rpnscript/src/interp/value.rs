//! Runtime values for the interpreter

use std::fmt;

/// Runtime value. Scalars only: integer or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// 64-bit integer
    Int(i64),
    /// Dequoted string contents
    Str(String),
}

impl Value {
    /// Get type name for error messages
    pub fn type_name(&self) -> &str {
        match self {
            Value::Int(_) => "int",
            Value::Str(_) => "string",
        }
    }

    /// Try to convert to i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(_) => None,
        }
    }

    /// Try to view as text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    /// Debug rendering used by `dump`: strings keep their quotes
    pub fn render(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Str(s) => format!("\"{s}\""),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(format!("{}", Value::Int(42)), "42");
        assert_eq!(format!("{}", Value::Str("a b".to_string())), "a b");
    }

    #[test]
    fn test_value_render_quotes_strings() {
        assert_eq!(Value::Int(-3).render(), "-3");
        assert_eq!(Value::from("hi").render(), "\"hi\"");
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::from("x").as_int(), None);
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Int(7).as_str(), None);
        assert_eq!(Value::Int(7).type_name(), "int");
        assert_eq!(Value::from("x").type_name(), "string");
    }
}
