//! Session controller state machine.

use crate::notify::{Notification, NotificationSink, Severity};
use std::collections::{BTreeMap, VecDeque};
use vb_core::{Inputs, Outputs, Value};
use vb_engine::Calculator;
use vb_schema::{CalculatorField, validate_all_fields};
use vb_store::{CalculationResult, DataManager, SavedCalculation};

/// Recent-activity cache bound. Deliberately smaller than the persisted
/// history bound: this is the "last few results" panel, the durable log
/// lives in the data manager.
pub const SESSION_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No outputs yet, or outputs cleared by reset.
    Idle,
    /// Outputs populated; still editable, recalculation allowed.
    Computed,
}

/// Owns one calculator's live state and orchestrates
/// validate -> calculate -> record.
pub struct SessionController {
    calculator: Box<dyn Calculator>,
    fields: Vec<CalculatorField>,
    inputs: Inputs,
    outputs: Outputs,
    errors: BTreeMap<String, String>,
    state: SessionState,
    step: usize,
    recent: VecDeque<CalculationResult>,
    data: DataManager,
    sink: Box<dyn NotificationSink>,
}

impl SessionController {
    pub fn new(
        calculator: Box<dyn Calculator>,
        data: DataManager,
        sink: Box<dyn NotificationSink>,
    ) -> Self {
        let fields = calculator.fields();
        let inputs = default_inputs(&fields);
        Self {
            calculator,
            fields,
            inputs,
            outputs: Outputs::new(),
            errors: BTreeMap::new(),
            state: SessionState::Idle,
            step: 0,
            recent: VecDeque::new(),
            data,
            sink,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn fields(&self) -> &[CalculatorField] {
        &self.fields
    }

    /// Most recent results first-in order, capped at
    /// `SESSION_HISTORY_LIMIT`.
    pub fn recent(&self) -> impl Iterator<Item = &CalculationResult> {
        self.recent.iter()
    }

    pub fn data(&self) -> &DataManager {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataManager {
        &mut self.data
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn set_step(&mut self, step: usize) {
        self.step = step;
    }

    /// Update one live input. A prior validation error on that field clears
    /// immediately; other fields are not re-validated.
    pub fn handle_input_change(&mut self, field_id: &str, value: Value) {
        self.inputs.insert(field_id.to_string(), value);
        self.errors.remove(field_id);
    }

    /// Validate, then calculate, then record. Returns true when a new
    /// result was produced. Every failure path notifies and leaves prior
    /// outputs untouched.
    pub fn handle_calculate(&mut self) -> bool {
        let report = validate_all_fields(&self.fields, &self.inputs);
        if !report.is_valid {
            let count = report.errors.len();
            self.errors = report.errors;
            self.notify(
                Severity::Warning,
                "Check your inputs",
                &format!("{count} field(s) failed validation"),
            );
            return false;
        }
        self.errors.clear();

        let outputs = match self.calculator.evaluate(&self.inputs) {
            Ok(outputs) => outputs,
            Err(err) => {
                tracing::error!(calculator = self.calculator.kind(), %err, "calculation failed");
                self.notify(Severity::Error, "Calculation failed", &err.to_string());
                return false;
            }
        };

        self.outputs = outputs.clone();
        self.state = SessionState::Computed;

        let result = CalculationResult::new(self.calculator.kind(), self.inputs.clone(), outputs);
        self.recent.push_back(result.clone());
        while self.recent.len() > SESSION_HISTORY_LIMIT {
            self.recent.pop_front();
        }

        if let Err(err) = self.data.record(result) {
            tracing::error!(%err, "failed to persist calculation history");
            self.notify(
                Severity::Error,
                "History not saved",
                "The result was calculated but could not be written to storage",
            );
        }
        true
    }

    /// Back to declared defaults: fields without one are cleared, outputs
    /// and errors emptied, step indicator rewound. Calling twice is the
    /// same as calling once.
    pub fn handle_reset(&mut self) {
        self.inputs = default_inputs(&self.fields);
        self.outputs.clear();
        self.errors.clear();
        self.step = 0;
        self.state = SessionState::Idle;
    }

    /// Replace live inputs with a saved snapshot and recompute. Outputs are
    /// always re-derived, never trusted from any cached copy.
    pub fn load_calculation(&mut self, saved: &SavedCalculation) -> bool {
        self.inputs = saved.inputs.clone();
        self.errors.clear();
        self.handle_calculate()
    }

    /// Snapshot current inputs as a named saved calculation. Returns the
    /// new id.
    pub fn save_current(&mut self, name: &str, tags: Vec<String>) -> Option<String> {
        let saved = SavedCalculation::new(name, self.calculator.kind(), self.inputs.clone(), tags);
        let id = saved.id.clone();
        match self.data.save_calculation(saved) {
            Ok(()) => {
                self.notify(
                    Severity::Success,
                    "Calculation saved",
                    &format!("\"{name}\" added to your saved calculations"),
                );
                Some(id)
            }
            Err(err) => {
                tracing::error!(%err, "failed to save calculation");
                self.notify(Severity::Error, "Save failed", &err.to_string());
                None
            }
        }
    }

    /// Bulk import with the session-level failure taxonomy: parse errors
    /// notify "Import Failed" and leave state untouched.
    pub fn import_data(&mut self, contents: &str) -> bool {
        match self.data.import(contents) {
            Ok(summary) => {
                self.notify(
                    Severity::Success,
                    "Import complete",
                    &format!(
                        "history: {}, saved: {}",
                        if summary.history_replaced { "replaced" } else { "unchanged" },
                        if summary.saved_replaced { "replaced" } else { "unchanged" },
                    ),
                );
                true
            }
            Err(err) => {
                tracing::error!(%err, "import failed");
                self.notify(Severity::Error, "Import Failed", &err.to_string());
                false
            }
        }
    }

    /// Export through the session boundary. The PDF branch is an expected
    /// refusal surfaced as "coming soon".
    pub fn export_data(&mut self, format: vb_store::ExportFormat) -> Option<String> {
        match self.data.export(format) {
            Ok(contents) => Some(contents),
            Err(vb_store::StoreError::ExportUnsupported { format }) => {
                self.notify(
                    Severity::Info,
                    "Coming soon",
                    &format!("{format} export is not available yet"),
                );
                None
            }
            Err(err) => {
                tracing::error!(%err, "export failed");
                self.notify(Severity::Error, "Export failed", &err.to_string());
                None
            }
        }
    }

    fn notify(&self, severity: Severity, title: &str, description: &str) {
        self.sink.notify(Notification {
            severity,
            title: title.to_string(),
            description: description.to_string(),
        });
    }
}

fn default_inputs(fields: &[CalculatorField]) -> Inputs {
    let mut inputs = Inputs::new();
    for field in fields {
        if let Some(default) = &field.default_value {
            inputs.insert(field.id.clone(), default.clone());
        }
    }
    inputs
}
