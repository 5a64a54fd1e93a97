//! Identifiers and timestamps for stored calculations.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Fresh unique id for a calculation result or saved calculation.
/// Never reused; ids survive export/import unchanged.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// `YYYY-MM-DD` stamp used in export filenames.
pub fn date_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}
