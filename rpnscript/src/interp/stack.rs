//! Call stack of function activations

use super::Scope;

/// One active function call
#[derive(Debug)]
pub struct Frame {
    /// Name of the called function, for diagnostics and `dump`
    pub function: String,
    /// Statement index of the call site
    pub return_line: usize,
    pub scope: Scope,
}

impl Frame {
    pub fn new(function: impl Into<String>, return_line: usize) -> Self {
        Frame {
            function: function.into(),
            return_line,
            scope: Scope::new(),
        }
    }
}

/// Stack of activation frames. Empty means the global scope is current.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack { frames: Vec::new() }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// Frame directly below the top: the caller of the innermost call
    pub fn caller(&self) -> Option<&Frame> {
        let len = self.frames.len();
        if len >= 2 {
            self.frames.get(len - 2)
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
