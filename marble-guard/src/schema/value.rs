//! Typed field values and the coercions that produce them.

use crate::time::parse_time;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a raw string field is turned into a typed [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coercion {
    /// Keep the string as is
    Text,
    /// Signed integer
    Integer,
    /// `HH:MM:SS.s` clock string, converted to total seconds
    Time,
    /// `true`/`false`, `yes`/`no` or `1`/`0`, case-insensitive
    Boolean,
}

impl Coercion {
    /// Returns the name of the target type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Coercion::Text => "text",
            Coercion::Integer => "integer",
            Coercion::Time => "time",
            Coercion::Boolean => "boolean",
        }
    }

    /// Coerces a raw field value.
    ///
    /// The error carries a human-readable reason; callers attach the table,
    /// row and field.
    pub fn apply(&self, raw: &str) -> std::result::Result<Value, String> {
        match self {
            Coercion::Text => Ok(Value::Text(raw.to_string())),
            Coercion::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| format!("'{raw}' is not an integer")),
            Coercion::Time => parse_time(raw)
                .map(Value::Time)
                .map_err(|_| format!("'{raw}' is not a HH:MM:SS.s time")),
            Coercion::Boolean => parse_bool(raw)
                .map(Value::Boolean)
                .ok_or_else(|| format!("'{raw}' is not a boolean")),
        }
    }
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// A coerced field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    /// Total seconds
    Time(f64),
    Boolean(bool),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<f64> {
        match self {
            Value::Time(seconds) => Some(*seconds),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{text}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Time(seconds) => write!(f, "{}", crate::time::format_time(*seconds)),
            Value::Boolean(flag) => write!(f, "{flag}"),
        }
    }
}
