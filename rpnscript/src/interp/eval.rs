//! Statement execution engine
//!
//! A program-counter machine over classified statements. Blocks are not
//! pre-matched: `while`, `if`, `else` and function declarations scan for
//! their partner line when they need to jump.

use super::rpn;
use super::stack::{CallStack, Frame};
use super::{Scope, Value};
use crate::ast::{
    AssignValue, CallSyntax, FuncDecl, Param, ParamType, Program, Stmt,
};
use crate::config::{BlockMatching, Config};
use crate::error::{Result, ScriptError};
use crate::lexer::dequote;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::rc::Rc;
use tracing::{debug, trace};

/// A declared function
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    /// Statement index of the declaration line
    pub start: usize,
    pub params: Vec<Param>,
    pub returns_value: bool,
}

/// What the dispatch loop does with the program counter afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Advance,
    Stay,
}

/// The interpreter
pub struct Interpreter<R, W> {
    program: Rc<Program>,
    /// Program counter: index of the next statement
    pc: usize,
    stack: CallStack,
    globals: Scope,
    functions: HashMap<String, Signature>,
    /// Result of the last `return`, waiting for its call site
    return_value: Option<i64>,
    /// Set while argument expressions of a new call are evaluated
    binding_args: bool,
    config: Config,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Create a new interpreter with default settings
    pub fn new(program: Program, input: R, output: W) -> Self {
        Self::with_config(program, input, output, Config::default())
    }

    pub fn with_config(program: Program, input: R, output: W, config: Config) -> Self {
        Interpreter {
            program: Rc::new(program),
            pc: 0,
            stack: CallStack::new(),
            globals: Scope::new(),
            functions: HashMap::new(),
            return_value: None,
            binding_args: false,
            config,
            input,
            output,
        }
    }

    /// Run until the program counter passes the last statement
    pub fn run(&mut self) -> Result<()> {
        while self.step()? {}
        self.output.flush()?;
        Ok(())
    }

    /// Execute one statement. Returns false once the program has finished.
    pub fn step(&mut self) -> Result<bool> {
        let program = Rc::clone(&self.program);
        let Some(statement) = program.statements.get(self.pc) else {
            return Ok(false);
        };

        trace!(pc = self.pc, line = statement.line, stmt = ?statement.kind, "dispatch");

        let flow = self
            .execute(&statement.kind)
            .map_err(|e| e.at(statement.line, statement.span))?;
        if flow == Flow::Advance {
            self.pc += 1;
        }

        Ok(self.pc < program.statements.len())
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn globals(&self) -> &Scope {
        &self.globals
    }

    pub fn call_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn function(&self, name: &str) -> Option<&Signature> {
        self.functions.get(name)
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::While(expr) => {
                if self.eval_expr(expr)? == 0 {
                    self.jump(self.loop_end()?, stmt);
                }
                Ok(Flow::Advance)
            }
            Stmt::EndWhile => {
                self.jump(self.loop_start()?, stmt);
                Ok(Flow::Stay)
            }
            Stmt::If(expr) => {
                if self.eval_expr(expr)? == 0 {
                    self.jump(self.branch_end()?, stmt);
                }
                Ok(Flow::Advance)
            }
            Stmt::Else => {
                self.jump(self.if_end()?, stmt);
                Ok(Flow::Advance)
            }
            Stmt::EndIf => Ok(Flow::Advance),
            Stmt::FuncDecl(decl) => {
                self.declare(decl)?;
                Ok(Flow::Advance)
            }
            Stmt::EndFunc => {
                let frame = self.pop_frame("endfunc")?;
                debug!(function = %frame.function, to = frame.return_line, "endfunc");
                if self.missing_return(&frame.function) {
                    debug!(
                        function = %frame.function,
                        "int function ended without return, call target left unassigned"
                    );
                }
                self.pc = frame.return_line;
                Ok(Flow::Advance)
            }
            Stmt::Return(expr) => {
                if self.stack.is_empty() {
                    return Err(ScriptError::structural("`return` outside of a function"));
                }
                let value = self.eval_expr(expr)?;
                self.return_value = Some(value);
                let frame = self.pop_frame("return")?;
                debug!(function = %frame.function, value, to = frame.return_line, "return");
                // Land on the call line again so it can collect the value
                self.pc = frame.return_line;
                Ok(Flow::Stay)
            }
            Stmt::Print(args) => {
                self.print(args)?;
                Ok(Flow::Advance)
            }
            Stmt::Dump => {
                let label = self
                    .stack
                    .top()
                    .map_or("global", |frame| frame.function.as_str());
                let line = format!("{label} {}", self.working_scope().snapshot());
                writeln!(self.output, "{line}")?;
                Ok(Flow::Advance)
            }
            Stmt::Input(name) => {
                let value = self.read_int()?;
                self.working_scope_mut().define(name.as_str(), Value::Int(value));
                Ok(Flow::Advance)
            }
            Stmt::Assign { target, value } => self.assign(target, value),
            Stmt::Call(call) => self.call(call, None),
            Stmt::Unknown(word) => Err(ScriptError::name(format!(
                "undefined function or variable: {word}"
            ))),
            Stmt::Malformed { message } => Err(ScriptError::syntax(message.as_str())),
        }
    }

    // ------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------

    /// Scope that name lookups resolve against. While a call binds its
    /// arguments, that is the caller's scope rather than the new frame.
    fn working_scope(&self) -> &Scope {
        let frame = if self.binding_args {
            self.stack.caller()
        } else {
            self.stack.top()
        };
        frame.map_or(&self.globals, |frame| &frame.scope)
    }

    fn working_scope_mut(&mut self) -> &mut Scope {
        match self.stack.top_mut() {
            Some(frame) => &mut frame.scope,
            None => &mut self.globals,
        }
    }

    /// Contents of a string variable when `words` is just its name
    fn string_variable(&self, words: &[String]) -> Option<String> {
        match words {
            [name] => self.working_scope().get_str(name).map(str::to_string),
            _ => None,
        }
    }

    fn eval_expr(&self, expr: &[String]) -> Result<i64> {
        rpn::evaluate(expr, self.working_scope())
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn print(&mut self, args: &[String]) -> Result<()> {
        let Some(first) = args.first() else {
            return Err(ScriptError::syntax("`print` expects a string or an expression"));
        };

        if first.starts_with('"') {
            let text = dequote(first).ok_or_else(|| ScriptError::unclosed_string(first))?;
            writeln!(self.output, "{text}")?;
            return Ok(());
        }

        if let Some(text) = self.string_variable(args) {
            writeln!(self.output, "{text}")?;
            return Ok(());
        }

        let value = self.eval_expr(args)?;
        writeln!(self.output, "{value}")?;
        Ok(())
    }

    fn read_int(&mut self) -> Result<i64> {
        write!(self.output, "{}", self.config.prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ScriptError::io("end of input"));
        }

        let text = line.trim();
        text.parse::<i64>()
            .map_err(|_| ScriptError::io(format!("invalid integer input: {text:?}")))
    }

    fn assign(&mut self, target: &str, value: &AssignValue) -> Result<Flow> {
        let value = match value {
            AssignValue::Text(text) => Value::Str(text.clone()),
            AssignValue::Call(call) => return self.call(call, Some(target)),
            AssignValue::Expr(expr) => match self.string_variable(expr) {
                Some(text) => Value::Str(text),
                None => Value::Int(self.eval_expr(expr)?),
            },
        };
        self.working_scope_mut().define(target, value);
        Ok(Flow::Advance)
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    fn declare(&mut self, decl: &FuncDecl) -> Result<()> {
        if !self.functions.contains_key(&decl.name) {
            debug!(function = %decl.name, start = self.pc, params = decl.params.len(), "declare");
            self.functions.insert(
                decl.name.clone(),
                Signature {
                    start: self.pc,
                    params: decl.params.clone(),
                    returns_value: decl.returns_value,
                },
            );
        }

        let end = self
            .find(
                self.pc + 1..self.program.statements.len(),
                |_| false,
                |_| false,
                |s| matches!(s, Stmt::EndFunc),
                true,
            )
            .ok_or_else(|| {
                ScriptError::structural(format!(
                    "function `{}` has no matching `endfunc`",
                    decl.name
                ))
            })?;
        self.pc = end;
        Ok(())
    }

    /// An `int` function reaching `endfunc` leaves no value for its caller
    fn missing_return(&self, function: &str) -> bool {
        self.functions
            .get(function)
            .is_some_and(|signature| signature.returns_value)
    }

    fn pop_frame(&mut self, keyword: &str) -> Result<Frame> {
        self.stack
            .pop()
            .ok_or_else(|| ScriptError::structural(format!("`{keyword}` outside of a function")))
    }

    /// Call protocol shared by call statements and `x = f(...)`.
    ///
    /// A pending return value means the call already ran and control has
    /// come back to this line: store the value and move on.
    fn call(&mut self, call: &CallSyntax, dest: Option<&str>) -> Result<Flow> {
        let signature = self
            .functions
            .get(&call.name)
            .cloned()
            .ok_or_else(|| ScriptError::undefined_function(&call.name))?;

        if let Some(value) = self.return_value.take() {
            if let Some(dest) = dest {
                self.working_scope_mut().define(dest, Value::Int(value));
            }
            return Ok(Flow::Advance);
        }

        if call.args.len() != signature.params.len() {
            return Err(ScriptError::syntax(format!(
                "function {} expects {} argument(s), got {}",
                call.name,
                signature.params.len(),
                call.args.len()
            )));
        }
        if self.stack.depth() >= self.config.max_call_depth {
            return Err(ScriptError::stack_overflow(self.config.max_call_depth));
        }

        debug!(function = %call.name, depth = self.stack.depth() + 1, from = self.pc, "call");
        self.stack.push(Frame::new(call.name.as_str(), self.pc));

        self.binding_args = true;
        let bound = self.bind_arguments(&call.name, &signature.params, &call.args);
        self.binding_args = false;
        bound?;

        self.pc = signature.start;
        Ok(Flow::Advance)
    }

    fn bind_arguments(&mut self, function: &str, params: &[Param], args: &[Vec<String>]) -> Result<()> {
        for (param, arg) in params.iter().zip(args) {
            let value = self.argument_value(function, param, arg)?;
            if let Some(frame) = self.stack.top_mut() {
                frame.scope.define(param.name.as_str(), value);
            }
        }
        Ok(())
    }

    fn argument_value(&self, function: &str, param: &Param, arg: &[String]) -> Result<Value> {
        if param.ty == ParamType::Int {
            return Ok(Value::Int(self.eval_expr(arg)?));
        }

        if let [word] = arg {
            if let Some(text) = dequote(word) {
                return Ok(Value::Str(text.to_string()));
            }
        }
        self.string_variable(arg).map(Value::Str).ok_or_else(|| {
            ScriptError::syntax(format!(
                "{} parameter `{}` of `{function}` expects a string literal or string variable",
                param.ty, param.name
            ))
        })
    }

    // ------------------------------------------------------------------
    // Block boundaries
    // ------------------------------------------------------------------

    fn jump(&mut self, target: usize, from: &Stmt) {
        trace!(from = self.pc, to = target, keyword = from.keyword().unwrap_or("?"), "jump");
        self.pc = target;
    }

    /// `endwhile` for the `while` at the program counter
    fn loop_end(&self) -> Result<usize> {
        self.find(
            self.pc + 1..self.program.statements.len(),
            |s| matches!(s, Stmt::While(_)),
            |s| matches!(s, Stmt::EndWhile),
            |s| matches!(s, Stmt::EndWhile),
            false,
        )
        .ok_or_else(|| ScriptError::missing_terminator("while", "endwhile"))
    }

    /// `while` for the `endwhile` at the program counter
    fn loop_start(&self) -> Result<usize> {
        self.find(
            (0..self.pc).rev(),
            |s| matches!(s, Stmt::EndWhile),
            |s| matches!(s, Stmt::While(_)),
            |s| matches!(s, Stmt::While(_)),
            false,
        )
        .ok_or_else(|| ScriptError::missing_terminator("endwhile", "while"))
    }

    /// `else` or `endif`, whichever comes first, for a false `if`
    fn branch_end(&self) -> Result<usize> {
        self.find(
            self.pc + 1..self.program.statements.len(),
            |s| matches!(s, Stmt::If(_)),
            |s| matches!(s, Stmt::EndIf),
            |s| matches!(s, Stmt::Else | Stmt::EndIf),
            false,
        )
        .ok_or_else(|| ScriptError::missing_terminator("if", "endif"))
    }

    /// `endif` closing the `else` at the program counter
    fn if_end(&self) -> Result<usize> {
        self.find(
            self.pc + 1..self.program.statements.len(),
            |s| matches!(s, Stmt::If(_)),
            |s| matches!(s, Stmt::EndIf),
            |s| matches!(s, Stmt::EndIf),
            false,
        )
        .ok_or_else(|| ScriptError::missing_terminator("else", "endif"))
    }

    /// First index in `indices` whose statement satisfies `target`.
    ///
    /// With nested matching, `opens` and `closes` track inner blocks and
    /// targets inside them are skipped. Legacy matching, or `flat`, only
    /// looks at `target`.
    fn find(
        &self,
        indices: impl Iterator<Item = usize>,
        opens: impl Fn(&Stmt) -> bool,
        closes: impl Fn(&Stmt) -> bool,
        target: impl Fn(&Stmt) -> bool,
        flat: bool,
    ) -> Option<usize> {
        let nested = !flat && self.config.block_matching == BlockMatching::Nested;
        let mut depth = 0usize;

        for index in indices {
            let stmt = &self.program.statements[index].kind;
            if nested && depth > 0 {
                if opens(stmt) {
                    depth += 1;
                } else if closes(stmt) {
                    depth -= 1;
                }
                continue;
            }
            if target(stmt) {
                return Some(index);
            }
            if nested && opens(stmt) {
                depth += 1;
            }
        }

        None
    }
}
