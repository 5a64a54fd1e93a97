//! vb-session: live calculator session orchestration.
//!
//! The `SessionController` owns one calculator's input/output state, runs
//! validation before calculation, keeps a short recent-activity history,
//! and mirrors completed results through the data manager. All failures are
//! converted to notifications at this boundary; nothing here is fatal.

pub mod controller;
pub mod notify;

pub use controller::{SESSION_HISTORY_LIMIT, SessionController, SessionState};
pub use notify::{Notification, NotificationSink, RecordingSink, Severity, TracingSink};

pub type SessionResult<T> = Result<T, SessionError>;

/// Unified error for front ends sitting on top of the session layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Unknown calculator: {0}")]
    UnknownCalculator(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<vb_engine::EngineError> for SessionError {
    fn from(err: vb_engine::EngineError) -> Self {
        SessionError::Engine(err.to_string())
    }
}

impl From<vb_store::StoreError> for SessionError {
    fn from(err: vb_store::StoreError) -> Self {
        SessionError::Store(err.to_string())
    }
}
