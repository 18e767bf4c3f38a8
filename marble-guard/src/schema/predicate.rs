//! Named predicates applied to coerced field values.
//!
//! Predicates are plain data so a table schema can be declared as a list of
//! field descriptors. A failing predicate reports its description, which ends
//! up verbatim in the resulting error.

use super::value::Value;
use crate::error::{ErrorKind, MarbleError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

static HEX_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^#[0-9A-F]{6}$").expect("hex code pattern is valid")
});

/// Returns true if `value` is `#` followed by exactly six uppercase hex digits.
///
/// ```rust
/// use marble_guard::schema::is_hex_code;
///
/// assert!(is_hex_code("#1A2B3C"));
/// assert!(!is_hex_code("#1a2b3c"));
/// assert!(!is_hex_code("1A2B3C"));
/// ```
pub fn is_hex_code(value: &str) -> bool {
    HEX_CODE_REGEX.is_match(value)
}

/// An identity namespace whose validated keys other tables may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySpace {
    Colors,
    Marbles,
    Battles,
}

impl KeySpace {
    /// Singular noun used in messages.
    pub fn noun(&self) -> &'static str {
        match self {
            KeySpace::Colors => "color",
            KeySpace::Marbles => "marble",
            KeySpace::Battles => "battle",
        }
    }
}

impl fmt::Display for KeySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.noun())
    }
}

/// Identity sets of tables that have already passed schema validation.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    spaces: HashMap<KeySpace, HashSet<String>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the validated keys of a key space, replacing earlier ones.
    pub fn register<I, S>(&mut self, space: KeySpace, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spaces
            .insert(space, keys.into_iter().map(Into::into).collect());
    }

    pub fn is_registered(&self, space: KeySpace) -> bool {
        self.spaces.contains_key(&space)
    }

    /// Looks up a key.
    ///
    /// Fails with a configuration error when the key space has not been
    /// validated yet, which means tables were validated out of order.
    pub fn contains(&self, space: KeySpace, key: &str) -> Result<bool> {
        self.spaces
            .get(&space)
            .map(|keys| keys.contains(key))
            .ok_or_else(|| {
                MarbleError::Configuration(format!(
                    "{space} keys referenced before the {space} table was validated"
                ))
            })
    }

    /// Number of keys registered for a key space.
    pub fn len(&self, space: KeySpace) -> usize {
        self.spaces.get(&space).map_or(0, HashSet::len)
    }
}

/// A named check over a coerced value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "predicate", content = "args", rename_all = "snake_case")]
pub enum Predicate {
    /// Integer value is zero or more
    NonNegative,
    /// Text value is a `#RRGGBB` hex code
    HexCode,
    /// Text value is one of the listed literals
    OneOf(Vec<String>),
    /// Text value is a validated key of the key space
    KnownKey(KeySpace),
    /// At least one of the inner predicates holds
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    /// Builds a [`Predicate::OneOf`] from string literals.
    pub fn one_of(literals: &[&str]) -> Self {
        Predicate::OneOf(literals.iter().map(|s| s.to_string()).collect())
    }

    /// Short machine-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Predicate::NonNegative => "non_negative",
            Predicate::HexCode => "hex_code",
            Predicate::OneOf(_) => "one_of",
            Predicate::KnownKey(_) => "known_key",
            Predicate::AnyOf(_) => "any_of",
        }
    }

    /// Human-readable description of what the predicate requires.
    pub fn description(&self) -> String {
        match self {
            Predicate::NonNegative => "is a non-negative integer".to_string(),
            Predicate::HexCode => "is a '#RRGGBB' hex code with uppercase digits".to_string(),
            Predicate::OneOf(literals) => format!("is one of [{}]", literals.join(", ")),
            Predicate::KnownKey(space) => format!("is a known {space}"),
            Predicate::AnyOf(inner) => inner
                .iter()
                .map(Predicate::description)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }

    /// Error category of a failure. A malformed hex code is a format problem;
    /// everything else is a schema violation.
    pub fn failure_kind(&self) -> ErrorKind {
        match self {
            Predicate::HexCode => ErrorKind::Format,
            _ => ErrorKind::Schema,
        }
    }

    /// Evaluates the predicate.
    pub fn evaluate(&self, value: &Value, keys: &KeyRegistry) -> Result<bool> {
        match self {
            Predicate::NonNegative => Ok(value.as_integer().is_some_and(|v| v >= 0)),
            Predicate::HexCode => Ok(value.as_text().is_some_and(is_hex_code)),
            Predicate::OneOf(literals) => Ok(value
                .as_text()
                .is_some_and(|text| literals.iter().any(|literal| literal == text))),
            Predicate::KnownKey(space) => match value.as_text() {
                Some(text) => keys.contains(*space, text),
                None => Ok(false),
            },
            Predicate::AnyOf(inner) => {
                for predicate in inner {
                    if predicate.evaluate(value, keys)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Key spaces this predicate depends on.
    pub fn key_spaces(&self) -> Vec<KeySpace> {
        match self {
            Predicate::KnownKey(space) => vec![*space],
            Predicate::AnyOf(inner) => inner.iter().flat_map(Predicate::key_spaces).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
