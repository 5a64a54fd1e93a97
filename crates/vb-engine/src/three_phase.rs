//! Three-phase balance calculator.

use crate::error::EngineResult;
use crate::phase::{
    PhaseReadings, balance_tier, calculate_neutral_current, calculate_phase_balance,
};
use crate::traits::Calculator;
use vb_core::{Inputs, Outputs, Value};
use vb_schema::{CalculatorField, ValidationRule};

/// Phase balance and estimated neutral current from three clamp readings.
pub struct ThreePhaseBalance;

impl ThreePhaseBalance {
    fn reading(inputs: &Inputs, id: &str) -> f64 {
        // Absent or unparseable readings count as 0 A.
        inputs.get(id).and_then(Value::as_number).unwrap_or(0.0)
    }
}

impl Calculator for ThreePhaseBalance {
    fn kind(&self) -> &'static str {
        "three-phase-balance"
    }

    fn label(&self) -> &'static str {
        "Three-Phase Load Balance"
    }

    fn fields(&self) -> Vec<CalculatorField> {
        let current_rules = || vec![ValidationRule::min(0.0, "Current cannot be negative")];
        vec![
            CalculatorField::number("l1", "L1 Current")
                .with_unit("A")
                .with_default(0.0)
                .with_rules(current_rules()),
            CalculatorField::number("l2", "L2 Current")
                .with_unit("A")
                .with_default(0.0)
                .with_rules(current_rules()),
            CalculatorField::number("l3", "L3 Current")
                .with_unit("A")
                .with_default(0.0)
                .with_rules(current_rules())
                .with_help("Clamp readings taken under normal load"),
        ]
    }

    fn evaluate(&self, inputs: &Inputs) -> EngineResult<Outputs> {
        let readings = PhaseReadings::new(
            Self::reading(inputs, "l1"),
            Self::reading(inputs, "l2"),
            Self::reading(inputs, "l3"),
        );

        let balance = calculate_phase_balance(readings)?;
        let neutral = calculate_neutral_current(readings)?;
        let tier = balance_tier(balance.imbalance_percent);

        let mut outputs = Outputs::new();
        outputs.insert(
            "imbalance_percent".into(),
            Value::Number(balance.imbalance_percent),
        );
        outputs.insert("is_compliant".into(), Value::Bool(balance.is_compliant));
        outputs.insert(
            "highest_phase".into(),
            Value::Text(balance.highest_phase.to_string()),
        );
        outputs.insert(
            "lowest_phase".into(),
            Value::Text(balance.lowest_phase.to_string()),
        );
        outputs.insert("tier".into(), Value::Text(tier.as_str().to_string()));
        outputs.insert(
            "neutral_current_amps".into(),
            Value::Number(neutral.estimated_amps),
        );
        if let Some(recommendation) = balance.recommendation {
            outputs.insert("recommendation".into(), Value::Text(recommendation));
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn inputs(l1: f64, l2: f64, l3: f64) -> Inputs {
        let mut m = Inputs::new();
        m.insert("l1".into(), Value::Number(l1));
        m.insert("l2".into(), Value::Number(l2));
        m.insert("l3".into(), Value::Number(l3));
        m
    }

    #[test]
    fn evaluates_known_scenario() {
        let outputs = ThreePhaseBalance.evaluate(&inputs(10.0, 10.0, 16.0)).unwrap();
        assert_eq!(outputs["imbalance_percent"], Value::Number(50.0));
        assert_eq!(outputs["is_compliant"], Value::Bool(false));
        assert_eq!(outputs["highest_phase"], Value::Text("L3".into()));
        assert_eq!(outputs["lowest_phase"], Value::Text("L1".into()));
        assert_eq!(outputs["tier"], Value::Text("critical".into()));
        assert!(outputs.contains_key("recommendation"));
    }

    #[test]
    fn compliant_result_has_no_recommendation() {
        let outputs = ThreePhaseBalance.evaluate(&inputs(20.0, 20.0, 20.0)).unwrap();
        assert_eq!(outputs["is_compliant"], Value::Bool(true));
        assert!(!outputs.contains_key("recommendation"));
    }

    #[test]
    fn missing_fields_read_as_zero() {
        let mut m = Inputs::new();
        m.insert("l1".into(), Value::Number(10.0));
        // l2 unparseable, l3 absent: only one live phase.
        m.insert("l2".into(), Value::Text("oops".into()));
        let err = ThreePhaseBalance.evaluate(&m).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientReadings { .. }));
    }
}
