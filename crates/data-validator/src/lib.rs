//! Data Validation
//!
//! Boundary checks for raw sensor readings, the canonical input ranges of
//! the dashboards, and fingerprint normalisation against those ranges.

mod error;
mod fingerprint;
mod validator;

pub use error::ValidationError;
pub use fingerprint::SensorFingerprint;
pub use validator::{FieldRange, InputRanges, ValidationConfig, ValidationResult, Validator};
