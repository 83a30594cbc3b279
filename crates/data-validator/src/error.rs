//! Validation Error Types

use thiserror::Error;

/// Errors during data validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of the configured input range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value violates a physical constraint of the reading
    #[error("{field} value {value} must be {requirement}")]
    NonPhysical {
        field: &'static str,
        value: f64,
        requirement: &'static str,
    },

    /// NaN or infinite value
    #[error("{field} value is not a finite number")]
    NotFinite { field: &'static str },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::NonPhysical { field, .. }
            | ValidationError::NotFinite { field } => field,
        }
    }
}
