//! Reverse Polish Notation expression evaluator

use super::{Scope, Value};
use crate::error::{Result, ScriptError};
use crate::lexer::Token;

/// Evaluate an RPN word sequence against one scope.
///
/// Operands are pushed in order; a binary operator pops the right-hand
/// operand first, then the left. Comparisons and logical operators yield
/// 0 or 1. Exactly one value must be left on the stack.
pub fn evaluate(tokens: &[String], scope: &Scope) -> Result<i64> {
    let mut stack: Vec<i64> = Vec::with_capacity(tokens.len());

    for word in tokens {
        match Token::classify(word) {
            Some(Token::IntLit(n)) => stack.push(n),
            Some(op) if op.is_operator() => {
                let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                    return Err(ScriptError::malformed_rpn(&format!(
                        "operator `{word}` needs two operands"
                    )));
                };
                stack.push(apply(&op, lhs, rhs)?);
            }
            _ => stack.push(resolve(word, scope)?),
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        [] => Err(ScriptError::malformed_rpn("empty expression")),
        values => Err(ScriptError::malformed_rpn(&format!(
            "{} values left on the stack",
            values.len()
        ))),
    }
}

fn resolve(name: &str, scope: &Scope) -> Result<i64> {
    match scope.get(name) {
        Some(Value::Int(n)) => Ok(*n),
        Some(other) => Err(ScriptError::eval(format!(
            "type error: `{name}` is a {}, expected int",
            other.type_name()
        ))),
        None => Err(ScriptError::undefined_variable(name)),
    }
}

fn apply(op: &Token, lhs: i64, rhs: i64) -> Result<i64> {
    let value = match op {
        Token::Plus => lhs.wrapping_add(rhs),
        Token::Minus => lhs.wrapping_sub(rhs),
        Token::Star => lhs.wrapping_mul(rhs),
        Token::Slash => {
            if rhs == 0 {
                return Err(ScriptError::division_by_zero());
            }
            lhs.wrapping_div(rhs)
        }
        Token::Percent => {
            if rhs == 0 {
                return Err(ScriptError::division_by_zero());
            }
            lhs.wrapping_rem(rhs)
        }
        Token::Gt => (lhs > rhs) as i64,
        Token::Lt => (lhs < rhs) as i64,
        Token::GtEq => (lhs >= rhs) as i64,
        Token::LtEq => (lhs <= rhs) as i64,
        Token::EqEq => (lhs == rhs) as i64,
        Token::NotEq => (lhs != rhs) as i64,
        Token::AndAnd => (lhs != 0 && rhs != 0) as i64,
        Token::OrOr => (lhs != 0 || rhs != 0) as i64,
        other => {
            return Err(ScriptError::malformed_rpn(&format!(
                "{other:?} is not an operator"
            )));
        }
    };
    Ok(value)
}
