//! Stored calculation records.
//!
//! Field names serialize in camelCase so exports and the persisted store
//! match the established on-disk interface (`calculatorType`, `createdAt`,
//! ISO-8601 date strings).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vb_core::{Inputs, Outputs, new_id, now};

/// One completed calculation. Immutable once created; history entries are
/// only ever appended, evicted or deleted, never edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub id: String,
    pub calculator_type: String,
    pub timestamp: DateTime<Utc>,
    pub inputs: Inputs,
    pub outputs: Outputs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CalculationResult {
    pub fn new(calculator_type: &str, inputs: Inputs, outputs: Outputs) -> Self {
        Self {
            id: new_id(),
            calculator_type: calculator_type.to_string(),
            timestamp: now(),
            inputs,
            outputs,
            project: None,
            notes: None,
        }
    }

    pub fn with_project(mut self, project: &str) -> Self {
        self.project = Some(project.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

/// A user-named input snapshot, sufficient to reproduce a result by
/// replaying it through the same calculator kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedCalculation {
    pub id: String,
    pub name: String,
    pub calculator_type: String,
    pub inputs: Inputs,
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at` until the snapshot is edited.
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl SavedCalculation {
    pub fn new(name: &str, calculator_type: &str, inputs: Inputs, tags: Vec<String>) -> Self {
        let created_at = now();
        Self {
            id: new_id(),
            name: name.to_string(),
            calculator_type: calculator_type.to_string(),
            inputs,
            created_at,
            last_modified: created_at,
            tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vb_core::Value;

    #[test]
    fn result_serializes_camel_case_iso_dates() {
        let mut inputs = Inputs::new();
        inputs.insert("voltage".into(), Value::Number(230.0));
        let result = CalculationResult::new("ohms-law", inputs, Outputs::new());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["calculatorType"], "ohms-law");
        // RFC 3339 timestamp string, not a serde struct.
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
        // Unset annotations are omitted entirely.
        assert!(json.get("project").is_none());
    }

    #[test]
    fn saved_calculation_dates_start_equal() {
        let saved = SavedCalculation::new("Kitchen Ring", "ohms-law", Inputs::new(), vec![]);
        assert_eq!(saved.created_at, saved.last_modified);
    }

    #[test]
    fn round_trips_through_json() {
        let mut inputs = Inputs::new();
        inputs.insert("l1".into(), Value::Number(10.0));
        let result = CalculationResult::new("three-phase-balance", inputs, Outputs::new())
            .with_project("Unit 4 DB")
            .with_notes("pre-remedial readings");

        let json = serde_json::to_string(&result).unwrap();
        let back: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
