//! vb-schema: calculator field definitions and the rule evaluator.

pub mod field;
pub mod validate;

pub use field::{CalculatorField, FieldType, SelectOption, ValidationRule};
pub use validate::{ValidationReport, validate_all_fields, validate_field};
