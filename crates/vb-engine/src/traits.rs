//! Core trait for calculator models.

use crate::error::EngineResult;
use vb_core::{Inputs, Outputs};
use vb_schema::CalculatorField;

/// A calculator is a deterministic function from a validated input snapshot
/// to an output snapshot, plus the field schema describing its form.
///
/// Implementations are stateless; the session layer owns all mutable state.
pub trait Calculator: Send + Sync {
    /// Stable kind tag stored on every result (e.g. "ohms-law").
    fn kind(&self) -> &'static str;

    /// Human-readable name for menus.
    fn label(&self) -> &'static str;

    /// Input form schema, in display order.
    fn fields(&self) -> Vec<CalculatorField>;

    /// Compute outputs from inputs.
    ///
    /// Inputs have already passed the field rules; evaluation may still
    /// refuse combinations the rules cannot express (e.g. fewer than two
    /// live phases).
    fn evaluate(&self, inputs: &Inputs) -> EngineResult<Outputs>;
}
