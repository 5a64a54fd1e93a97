//! Voltage drop calculator (single-phase, copper conductors).

use crate::common::required_number;
use crate::error::{EngineError, EngineResult};
use crate::traits::Calculator;
use vb_core::{Inputs, Outputs, Value, ensure_finite, round_to};
use vb_schema::{CalculatorField, FieldType, SelectOption, ValidationRule};

/// BS 7671 informal limit for a final circuit fed from the public supply.
const DROP_LIMIT_PERCENT: f64 = 5.0;

/// Volt drop over a cable run from the tabulated mV/A/m figure.
pub struct VoltageDrop;

impl Calculator for VoltageDrop {
    fn kind(&self) -> &'static str {
        "voltage-drop"
    }

    fn label(&self) -> &'static str {
        "Voltage Drop"
    }

    fn fields(&self) -> Vec<CalculatorField> {
        let mut cable = CalculatorField::number("mv_per_am", "Cable size");
        cable.field_type = FieldType::Select;
        // Tabulated mV/A/m, copper twin and earth.
        cable.options = vec![
            SelectOption::new("44", "1.0 mm²"),
            SelectOption::new("29", "1.5 mm²"),
            SelectOption::new("18", "2.5 mm²"),
            SelectOption::new("11", "4.0 mm²"),
            SelectOption::new("7.3", "6.0 mm²"),
            SelectOption::new("4.4", "10.0 mm²"),
        ];
        cable.rules = vec![ValidationRule::required("Select a cable size")];

        vec![
            cable,
            CalculatorField::number("current", "Design current")
                .with_unit("A")
                .with_rules(vec![
                    ValidationRule::required("Design current is required"),
                    ValidationRule::min(0.01, "Design current must be greater than zero"),
                ]),
            CalculatorField::number("length", "Circuit length")
                .with_unit("m")
                .with_rules(vec![
                    ValidationRule::required("Circuit length is required"),
                    ValidationRule::range(0.1, 500.0, "Length must be between 0.1 and 500 m"),
                ]),
            CalculatorField::number("supply_voltage", "Supply voltage")
                .with_unit("V")
                .with_default(230.0)
                .with_rules(vec![ValidationRule::min(
                    1.0,
                    "Supply voltage must be at least 1 V",
                )]),
        ]
    }

    fn evaluate(&self, inputs: &Inputs) -> EngineResult<Outputs> {
        let mv_per_am = required_number(inputs, "mv_per_am")?;
        let current = required_number(inputs, "current")?;
        let length = required_number(inputs, "length")?;
        let supply = inputs
            .get("supply_voltage")
            .and_then(Value::as_number)
            .unwrap_or(230.0);
        if supply <= 0.0 {
            return Err(EngineError::NonPositiveInput {
                field: "supply_voltage",
            });
        }

        let drop_volts = ensure_finite(mv_per_am * current * length / 1000.0, "voltage drop")?;
        let drop_percent = ensure_finite(drop_volts / supply * 100.0, "drop percent")?;

        let mut outputs = Outputs::new();
        outputs.insert("drop_volts".into(), Value::Number(round_to(drop_volts, 2)));
        outputs.insert(
            "drop_percent".into(),
            Value::Number(round_to(drop_percent, 1)),
        );
        outputs.insert(
            "is_compliant".into(),
            Value::Bool(round_to(drop_percent, 1) <= DROP_LIMIT_PERCENT),
        );
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(mv: &str, current: f64, length: f64) -> Inputs {
        let mut m = Inputs::new();
        m.insert("mv_per_am".into(), Value::Text(mv.into()));
        m.insert("current".into(), Value::Number(current));
        m.insert("length".into(), Value::Number(length));
        m
    }

    #[test]
    fn ring_final_within_limit() {
        // 18 mV/A/m * 20 A * 25 m = 9 V = 3.9% of 230 V
        let outputs = VoltageDrop.evaluate(&inputs("18", 20.0, 25.0)).unwrap();
        assert_eq!(outputs["drop_volts"], Value::Number(9.0));
        assert_eq!(outputs["drop_percent"], Value::Number(3.9));
        assert_eq!(outputs["is_compliant"], Value::Bool(true));
    }

    #[test]
    fn long_run_fails_limit() {
        // 29 mV/A/m * 16 A * 40 m = 18.56 V = 8.1%
        let outputs = VoltageDrop.evaluate(&inputs("29", 16.0, 40.0)).unwrap();
        assert_eq!(outputs["is_compliant"], Value::Bool(false));
    }

    #[test]
    fn select_value_comes_in_as_text() {
        // The select control stores its option value as a string.
        let outputs = VoltageDrop.evaluate(&inputs("7.3", 10.0, 30.0)).unwrap();
        assert_eq!(outputs["drop_volts"], Value::Number(2.19));
    }
}
