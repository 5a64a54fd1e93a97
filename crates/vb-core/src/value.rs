//! Field value model shared by the engine, session and store layers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One field value as entered by a user or produced by a calculator.
///
/// Untagged so stored/exported JSON reads naturally:
/// `{"voltage": 230.0, "cable": "2.5mm", "ring_final": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
}

/// Live input snapshot, keyed by field id. BTreeMap keeps export output
/// deterministic.
pub type Inputs = BTreeMap<String, Value>;

/// Computed output snapshot, keyed by output name.
pub type Outputs = BTreeMap<String, Value>;

impl Value {
    /// Numeric view of the value.
    ///
    /// Text is parsed the way a numeric form field would be, so "230" and
    /// 230.0 validate identically. Checkbox values have no numeric view.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True for the empty-string case that `required` treats as absent.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
