//! Helpers shared by calculator implementations.

use crate::error::{EngineError, EngineResult};
use vb_core::{Inputs, Value};

/// Numeric input that validation guarantees but the type system cannot.
pub(crate) fn required_number(inputs: &Inputs, field: &'static str) -> EngineResult<f64> {
    inputs
        .get(field)
        .and_then(Value::as_number)
        .ok_or(EngineError::MissingInput { field })
}
