//! Statement classification
//!
//! Each lexed line is decoded once into a [`Stmt`]. Malformed lines are not
//! rejected here: they become [`Stmt::Malformed`] and only fail if the
//! program counter ever reaches them.

use crate::ast::{
    AssignValue, CallSyntax, FuncDecl, Param, ParamType, Program, Statement, Stmt,
};
use crate::lexer::{Line, Token, dequote, is_string_literal};


/// Classify lexed lines into a program
pub fn parse(lines: &[Line]) -> Program {
    let statements = lines
        .iter()
        .map(|line| Statement {
            kind: classify(&line.tokens),
            line: line.number,
            span: line.span,
        })
        .collect();

    Program { statements }
}

/// Classify one line's tokens
pub fn classify(tokens: &[String]) -> Stmt {
    let Some(first) = tokens.first() else {
        return Stmt::Unknown(String::new());
    };
    let rest = &tokens[1..];

    match Token::classify(first) {
        Some(Token::While) => Stmt::While(rest.to_vec()),
        Some(Token::EndWhile) => Stmt::EndWhile,
        Some(Token::If) => Stmt::If(rest.to_vec()),
        Some(Token::Else) => Stmt::Else,
        Some(Token::EndIf) => Stmt::EndIf,
        Some(Token::Void) => declaration(rest, false),
        Some(Token::TyInt) => declaration(rest, true),
        Some(Token::EndFunc) => Stmt::EndFunc,
        Some(Token::Return) => Stmt::Return(rest.to_vec()),
        Some(Token::Print) => Stmt::Print(rest.to_vec()),
        Some(Token::Dump) => Stmt::Dump,
        Some(Token::Input) => match rest {
            [name] => Stmt::Input(name.clone()),
            _ => malformed("`input` expects exactly one variable name"),
        },
        _ => assignment_or_call(tokens),
    }
}

fn malformed(message: impl Into<String>) -> Stmt {
    Stmt::Malformed {
        message: message.into(),
    }
}

fn assignment_or_call(tokens: &[String]) -> Stmt {
    if tokens.get(1).is_some_and(|t| t == "=") {
        return assignment(&tokens[0], &tokens[2..]);
    }

    if tokens.iter().any(|t| !is_string_literal(t) && t.contains('(')) {
        return match call_syntax(tokens) {
            Ok(call) => Stmt::Call(call),
            Err(message) => malformed(message),
        };
    }

    Stmt::Unknown(tokens[0].clone())
}

fn assignment(target: &str, rhs: &[String]) -> Stmt {
    if !matches!(Token::classify(target), Some(Token::Ident(_))) {
        return malformed(format!("invalid assignment target `{target}`"));
    }

    let value = match rhs {
        [] => return malformed(format!("missing value in assignment to `{target}`")),
        [word] if is_string_literal(word) => {
            AssignValue::Text(dequote(word).unwrap_or_default().to_string())
        }
        _ if rhs.iter().any(|t| !is_string_literal(t) && t.contains('(')) => {
            match call_syntax(rhs) {
                Ok(call) => AssignValue::Call(call),
                Err(message) => return malformed(message),
            }
        }
        _ => AssignValue::Expr(rhs.to_vec()),
    };

    Stmt::Assign {
        target: target.to_string(),
        value,
    }
}

/// Split `(`, `)` and `,` off the words they are glued to.
/// Characters between double quotes are never split.
pub fn split_punctuation(tokens: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        let mut word = String::new();
        let mut quoted = false;
        for c in token.chars() {
            if c == '"' {
                quoted = !quoted;
                word.push(c);
            } else if !quoted && matches!(c, '(' | ')' | ',') {
                if !word.is_empty() {
                    out.push(std::mem::take(&mut word));
                }
                out.push(c.to_string());
            } else {
                word.push(c);
            }
        }
        if !word.is_empty() {
            out.push(word);
        }
    }

    out
}

/// `name ( ... )` split into the name and the comma-separated groups
/// between the parentheses
fn parenthesized(tokens: &[String], what: &str) -> Result<(String, Vec<Vec<String>>), String> {
    let parts = split_punctuation(tokens);

    let name = match parts.first().map(|p| Token::classify(p)) {
        Some(Some(Token::Ident(name))) => name,
        Some(_) => return Err(format!("invalid {what} name `{}`", parts[0])),
        None => return Err(format!("missing {what} name")),
    };

    if parts.get(1).map(String::as_str) != Some("(") || parts.last().map(String::as_str) != Some(")")
    {
        return Err(format!("{what} `{name}` is missing its parentheses"));
    }

    let inner = &parts[2..parts.len() - 1];
    if inner.iter().any(|p| p == "(" || p == ")") {
        return Err(format!("unbalanced parentheses in {what} `{name}`"));
    }
    if inner.is_empty() {
        return Ok((name, Vec::new()));
    }

    let groups: Vec<Vec<String>> = inner.split(|p| p == ",").map(<[String]>::to_vec).collect();
    if groups.iter().any(Vec::is_empty) {
        return Err(format!("empty argument in {what} `{name}`"));
    }

    Ok((name, groups))
}

fn call_syntax(tokens: &[String]) -> Result<CallSyntax, String> {
    let (name, args) = parenthesized(tokens, "function call")?;
    Ok(CallSyntax { name, args })
}

fn declaration(rest: &[String], returns_value: bool) -> Stmt {
    let (name, groups) = match parenthesized(rest, "function declaration") {
        Ok(parsed) => parsed,
        Err(message) => return malformed(message),
    };

    let mut params = Vec::with_capacity(groups.len());
    for group in &groups {
        let [ty, param] = group.as_slice() else {
            return malformed(format!(
                "parameter `{}` of `{name}` must be written `<type> <name>`",
                group.join(" ")
            ));
        };
        let ty = match Token::classify(ty) {
            Some(Token::TyInt) => ParamType::Int,
            Some(Token::TyString) => ParamType::String,
            _ => return malformed(format!("unknown parameter type `{ty}` in `{name}`")),
        };
        params.push(Param {
            name: param.clone(),
            ty,
        });
    }

    Stmt::FuncDecl(FuncDecl {
        name,
        returns_value,
        params,
    })
}
