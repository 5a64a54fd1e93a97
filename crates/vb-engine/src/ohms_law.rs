//! Ohm's law calculator.

use crate::common::required_number;
use crate::error::{EngineError, EngineResult};
use crate::traits::Calculator;
use vb_core::{Inputs, Outputs, Value, ensure_finite, round_to};
use vb_schema::{CalculatorField, ValidationRule};

/// Resistance and power from a measured voltage and current.
pub struct OhmsLaw;

impl Calculator for OhmsLaw {
    fn kind(&self) -> &'static str {
        "ohms-law"
    }

    fn label(&self) -> &'static str {
        "Ohm's Law"
    }

    fn fields(&self) -> Vec<CalculatorField> {
        vec![
            CalculatorField::number("voltage", "Voltage")
                .with_unit("V")
                .with_default(230.0)
                .with_rules(vec![
                    ValidationRule::required("Voltage is required"),
                    ValidationRule::min(0.1, "Voltage must be greater than zero"),
                ]),
            CalculatorField::number("current", "Current")
                .with_unit("A")
                .with_rules(vec![
                    ValidationRule::required("Current is required"),
                    ValidationRule::min(0.01, "Current must be greater than zero"),
                ]),
        ]
    }

    fn evaluate(&self, inputs: &Inputs) -> EngineResult<Outputs> {
        let voltage = required_number(inputs, "voltage")?;
        let current = required_number(inputs, "current")?;
        if current <= 0.0 {
            return Err(EngineError::NonPositiveInput { field: "current" });
        }

        let resistance = ensure_finite(voltage / current, "resistance")?;
        let power = ensure_finite(voltage * current, "power")?;

        let mut outputs = Outputs::new();
        outputs.insert(
            "resistance_ohms".into(),
            Value::Number(round_to(resistance, 2)),
        );
        outputs.insert("power_watts".into(), Value::Number(round_to(power, 2)));
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kitchen_ring() {
        let mut inputs = Inputs::new();
        inputs.insert("voltage".into(), Value::Number(230.0));
        inputs.insert("current".into(), Value::Number(13.0));

        let outputs = OhmsLaw.evaluate(&inputs).unwrap();
        assert_eq!(outputs["resistance_ohms"], Value::Number(17.69));
        assert_eq!(outputs["power_watts"], Value::Number(2990.0));
    }

    #[test]
    fn zero_current_refused() {
        let mut inputs = Inputs::new();
        inputs.insert("voltage".into(), Value::Number(230.0));
        inputs.insert("current".into(), Value::Number(0.0));
        let err = OhmsLaw.evaluate(&inputs).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NonPositiveInput { field: "current" }
        ));
    }

    #[test]
    fn missing_input_named() {
        let err = OhmsLaw.evaluate(&Inputs::new()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingInput { field: "voltage" }
        ));
    }
}
