//! vb-core: stable foundation for voltbench.
//!
//! Contains:
//! - value (field value model + input/output maps)
//! - numeric (display rounding + tolerances + float helpers)
//! - ids (result/saved-calculation identifiers and timestamps)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod value;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use value::*;
