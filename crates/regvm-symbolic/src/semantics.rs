//! Value-level semantics of the register operations.
//!
//! Each function combines register contents the way the VM does when every
//! input is concrete, and falls back to building an expression as soon as one
//! input is symbolic. The empty string is the identity of both `add` and
//! `concat_strings`.

use thiserror::Error;

use crate::symbol::{StrLen, Symbol, Value};

/// Errors raised when a register value cannot be combined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("expected an integer, found {0:?}")]
    NotAnInteger(String),

    #[error("integer overflow")]
    Overflow,

    #[error("character code must be concrete, found `{0}`")]
    SymbolicCharCode(String),

    #[error("{0} is not a valid character code")]
    InvalidCharCode(i64),

    #[error("cannot take the last character of an empty string")]
    EmptyString,
}

/// Parse a concrete register as an integer.
pub fn parse_int(s: &str) -> Result<i64, EvalError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| EvalError::NotAnInteger(s.to_string()))
}

/// Canonical numeric form of an operand: symbols are kept, concrete values
/// are re-rendered as decimal integers.
fn numeric(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Symbolic(_) => Ok(value.clone()),
        Value::Concrete(s) => Ok(Value::Concrete(parse_int(s)?.to_string())),
    }
}

/// Identity rule shared by `add` and `concat_strings`.
fn absorb_empty(left: &Value, right: &Value) -> Option<Value> {
    if right.is_empty() {
        Some(left.clone())
    } else if left.is_empty() {
        Some(right.clone())
    } else {
        None
    }
}

/// `add`: integer addition.
pub fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let Some(v) = absorb_empty(left, right) {
        return Ok(v);
    }
    match (left, right) {
        (Value::Concrete(l), Value::Concrete(r)) => {
            let sum = parse_int(l)?
                .checked_add(parse_int(r)?)
                .ok_or(EvalError::Overflow)?;
            Ok(Value::Concrete(sum.to_string()))
        }
        _ => Ok(Symbol::binary("+", numeric(left)?, numeric(right)?).into()),
    }
}

/// `concat_strings`: string concatenation.
pub fn concat(left: &Value, right: &Value) -> Value {
    if let Some(v) = absorb_empty(left, right) {
        return v;
    }
    match (left, right) {
        (Value::Concrete(l), Value::Concrete(r)) => Value::Concrete(format!("{l}{r}")),
        _ => Symbol::binary("+", left.clone(), right.clone()).into(),
    }
}

/// `append`: concatenate a literal onto a register.
pub fn append(value: &Value, literal: &str) -> Value {
    concat(value, &Value::concrete(literal))
}

/// `invert_sign`: integer negation.
pub fn negate(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Symbolic(_) => Ok(Symbol::unary("-", value.clone()).into()),
        Value::Concrete(s) => {
            let n = parse_int(s)?.checked_neg().ok_or(EvalError::Overflow)?;
            Ok(Value::Concrete(n.to_string()))
        }
    }
}

/// `write_char`: the single character with the given code.
pub fn char_from_code(value: &Value) -> Result<Value, EvalError> {
    let Value::Concrete(s) = value else {
        return Err(EvalError::SymbolicCharCode(value.to_string()));
    };
    let code = parse_int(s)?;
    let c = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or(EvalError::InvalidCharCode(code))?;
    Ok(Value::Concrete(c.to_string()))
}

/// `write_last_char_code`: the code of the last character.
pub fn last_char_code(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Symbolic(
            sym @ Symbol::String {
                len: StrLen::Known(n),
                ..
            },
        ) if *n > 0 => Ok(Symbol::member(sym.clone(), *n - 1).into()),
        Value::Symbolic(sym) => {
            let length = Symbol::member(sym.clone(), "\"length\"");
            Ok(Symbol::member(sym.clone(), Symbol::binary("-", length, "1")).into())
        }
        Value::Concrete(s) => {
            let c = s.chars().last().ok_or(EvalError::EmptyString)?;
            Ok(Value::Concrete((c as u32).to_string()))
        }
    }
}

/// `pop_last_char`: the string without its last character.
pub fn pop_last_char(value: &Value) -> Value {
    match value {
        Value::Symbolic(Symbol::String {
            name,
            len: StrLen::Known(n),
        }) if *n > 0 => Symbol::string(name.clone(), StrLen::Known(*n - 1)).into(),
        Value::Symbolic(sym) => Symbol::member(sym.clone(), ":-1").into(),
        Value::Concrete(s) => {
            let mut popped = s.clone();
            popped.pop();
            Value::Concrete(popped)
        }
    }
}
