//! Field schema definitions.
//!
//! A calculator declares its input form as a list of `CalculatorField`s;
//! the session layer renders defaults from it and the rule evaluator in
//! `validate` runs against it.

use serde::{Deserialize, Serialize};
use vb_core::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculatorField {
    /// Unique within one calculator.
    pub id: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Required when `field_type` is `Select`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Evaluated in declared order; first failure wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl CalculatorField {
    pub fn number(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            field_type: FieldType::Number,
            unit: None,
            options: Vec::new(),
            default_value: None,
            rules: Vec::new(),
            help_text: None,
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help_text = Some(help.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Number,
    Select,
    Checkbox,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// One declarative constraint on a field value.
///
/// `min`/`max` carry an optional limit that defaults to 0 when absent. That
/// default is inherited behavior: an absent `max` means "must be <= 0", so
/// schema authors should always spell the limit out.
///
/// `range` is a typed closed interval. The legacy packed "min,max" string
/// form is rejected at deserialization time instead of being silently
/// ignored at validation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationRule {
    Required {
        message: String,
    },
    Min {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        message: String,
    },
    Max {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        message: String,
    },
    Range {
        min: f64,
        max: f64,
        message: String,
    },
}

impl ValidationRule {
    pub fn required(message: &str) -> Self {
        ValidationRule::Required {
            message: message.to_string(),
        }
    }

    pub fn min(value: f64, message: &str) -> Self {
        ValidationRule::Min {
            value: Some(value),
            message: message.to_string(),
        }
    }

    pub fn max(value: f64, message: &str) -> Self {
        ValidationRule::Max {
            value: Some(value),
            message: message.to_string(),
        }
    }

    pub fn range(min: f64, max: f64, message: &str) -> Self {
        ValidationRule::Range {
            min,
            max,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_serde_shape() {
        let rule = ValidationRule::min(0.1, "Current must be positive");
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(
            json,
            r#"{"rule":"min","value":0.1,"message":"Current must be positive"}"#
        );
        let back: ValidationRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, back);
    }

    #[test]
    fn min_limit_may_be_absent() {
        let rule: ValidationRule =
            serde_json::from_str(r#"{"rule":"min","message":"too small"}"#).unwrap();
        assert_eq!(
            rule,
            ValidationRule::Min {
                value: None,
                message: "too small".to_string()
            }
        );
    }

    #[test]
    fn field_builder() {
        let field = CalculatorField::number("l1", "L1 Current")
            .with_unit("A")
            .with_default(0.0)
            .with_rules(vec![ValidationRule::min(0.0, "Current cannot be negative")]);
        assert_eq!(field.id, "l1");
        assert_eq!(field.unit.as_deref(), Some("A"));
        assert_eq!(field.rules.len(), 1);
    }
}
