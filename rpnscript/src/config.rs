//! Interpreter configuration

/// Default limit on nested function activations
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Prompt written before reading an `input` line
pub const DEFAULT_PROMPT: &str = "> ";

/// How block keywords find their partner line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockMatching {
    /// Stop at the first line starting with the wanted keyword, ignoring
    /// nesting. A nested `while` closes the outer loop early.
    #[default]
    Legacy,
    /// Count nested `while`/`endwhile` and `if`/`endif` pairs
    Nested,
}

/// Runtime settings for an [`Interpreter`](crate::interp::Interpreter)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub max_call_depth: usize,
    pub block_matching: BlockMatching,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            block_matching: BlockMatching::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
        assert_eq!(config.block_matching, BlockMatching::Legacy);
    }
}
