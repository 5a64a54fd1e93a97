use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Need at least {needed} non-zero readings, got {got}")]
    InsufficientReadings { needed: usize, got: usize },

    #[error("Missing input: {field}")]
    MissingInput { field: &'static str },

    #[error("Input must be greater than zero: {field}")]
    NonPositiveInput { field: &'static str },

    #[error(transparent)]
    Core(#[from] vb_core::CoreError),
}
