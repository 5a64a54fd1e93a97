//! vb-store: durable mirror of calculation history and saved calculations,
//! plus bulk import/export and share links.

pub mod exchange;
pub mod manager;
pub mod provider;
pub mod types;

pub use exchange::{
    ExportFormat, ImportSummary, SharePayload, decode_share_payload, export_filename,
};
pub use manager::{DataManager, HISTORY_KEY, HISTORY_LIMIT, SAVED_KEY};
pub use provider::{FileStore, MemoryStore, StorageProvider};
pub use types::{CalculationResult, SavedCalculation};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export format not supported yet: {format}")]
    ExportUnsupported { format: &'static str },

    #[error("Share payload is not valid base64: {0}")]
    ShareDecode(#[from] base64::DecodeError),

    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
