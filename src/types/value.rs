use std::fmt;

use winnow::ascii::{digit0, digit1};
use winnow::combinator::opt;
use winnow::prelude::*;
use winnow::token::one_of;

/// A scalar read from a variable's raw text.
///
/// Only three shapes are distinguished; everything that is neither a plain
/// decimal number nor `true`/`false` stays a string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A decimal number.
    Number(f64),
    /// A boolean literal.
    Bool(bool),
    /// Any other text.
    String(String),
}

fn number(input: &mut &str) -> ModalResult<f64> {
    (opt(one_of(['-', '+'])), digit1, opt(('.', digit0)))
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

impl Value {
    /// Classify raw text as a number, bool or string.
    #[must_use]
    pub fn infer(raw: &str) -> Value {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        match number.parse(raw) {
            Ok(n) => Value::Number(n),
            Err(_) => Value::String(raw.to_owned()),
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
        }
    }
}
