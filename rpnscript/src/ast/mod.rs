//! Classified statement lines

mod span;

pub use span::*;

use serde::Serialize;

/// A program is an ordered list of statements, indexed by the program counter
#[derive(Debug, Clone, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// One statement with its source location
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub kind: Stmt,
    /// 1-based source line number
    pub line: usize,
    pub span: Span,
}

/// An RPN token sequence, kept as raw words
pub type Rpn = Vec<String>;

/// Statement kinds, decoded once from the first word of a line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    While(Rpn),
    EndWhile,
    If(Rpn),
    Else,
    EndIf,
    FuncDecl(FuncDecl),
    EndFunc,
    Return(Rpn),
    /// Words after `print`
    Print(Vec<String>),
    Dump,
    Input(String),
    Assign { target: String, value: AssignValue },
    Call(CallSyntax),
    /// Neither a keyword, a call nor an assignment
    Unknown(String),
    /// Recognized statement with bad syntax; fails only when executed
    Malformed { message: String },
}

impl Stmt {
    /// Keyword that starts the statement, used by block-boundary scans
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Stmt::While(_) => Some("while"),
            Stmt::EndWhile => Some("endwhile"),
            Stmt::If(_) => Some("if"),
            Stmt::Else => Some("else"),
            Stmt::EndIf => Some("endif"),
            Stmt::EndFunc => Some("endfunc"),
            Stmt::Return(_) => Some("return"),
            _ => None,
        }
    }
}

/// Right-hand side of `name = ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AssignValue {
    /// Dequoted string literal
    Text(String),
    Call(CallSyntax),
    Expr(Rpn),
}

/// `name ( arg , arg , ... )` with each argument kept as raw words
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallSyntax {
    pub name: String,
    pub args: Vec<Vec<String>>,
}

/// `void name(type param, ...)` or `int name(type param, ...)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncDecl {
    pub name: String,
    pub returns_value: bool,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamType {
    Int,
    String,
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamType::Int => write!(f, "int"),
            ParamType::String => write!(f, "string"),
        }
    }
}
