//! rpnscript interpreter library
//!
//! A line-oriented scripting language with integer and string variables,
//! `while`/`if` blocks, typed functions and Reverse Polish expressions.
//!
//! The pipeline is: [`lexer::tokenize`] splits source text into statement
//! lines, [`parser::parse`] classifies each line once, and
//! [`interp::Interpreter`] walks the statements with a program counter.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;

pub use ast::Span;
pub use config::{BlockMatching, Config};
pub use error::{ErrorKind, Result, ScriptError};

use std::io::{BufRead, Write};

/// Lex, classify and run a whole program
pub fn run<R: BufRead, W: Write>(source: &str, input: R, output: W, config: Config) -> Result<()> {
    let lines = lexer::tokenize(source)?;
    let program = parser::parse(&lines);
    interp::Interpreter::with_config(program, input, output, config).run()
}
