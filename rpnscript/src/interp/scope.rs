//! Variable storage for one lexical frame
//!
//! A single name maps to either an integer or a string; assigning a name
//! replaces whatever it held before, of either kind.

use super::Value;
use std::collections::HashMap;

/// Bindings of the global scope or of one function activation
#[derive(Debug, Default, Clone)]
pub struct Scope {
    bindings: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            bindings: HashMap::new(),
        }
    }

    /// Bind or rebind a name
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Integer binding, if the name holds one
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// String binding, if the name holds one
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// `{ a: 1, s: "hi" }`, names sorted
    pub fn snapshot(&self) -> String {
        if self.bindings.is_empty() {
            return "{}".to_string();
        }
        let mut names: Vec<&String> = self.bindings.keys().collect();
        names.sort();
        let fields: Vec<String> = names
            .into_iter()
            .map(|name| format!("{name}: {}", self.bindings[name].render()))
            .collect();
        format!("{{ {} }}", fields.join(", "))
    }
}
