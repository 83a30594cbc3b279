//! Data Validator for Range Checking

use crate::error::ValidationError;
use feature_engine::RawReading;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive range for a single field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Canonical input ranges for a reading
///
/// A single source for both boundary checks and fingerprint scaling.
/// Torque tops out at 150 N·m.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRanges {
    /// Air temperature (K)
    pub air_temperature: FieldRange,
    /// Process temperature (K)
    pub process_temperature: FieldRange,
    /// Rotational speed (rpm)
    pub rotational_speed: FieldRange,
    /// Torque (N·m)
    pub torque: FieldRange,
    /// Tool wear (min)
    pub tool_wear: FieldRange,
}

impl Default for InputRanges {
    fn default() -> Self {
        Self {
            air_temperature: FieldRange::new(0.0, 600.0),
            process_temperature: FieldRange::new(100.0, 600.0),
            rotational_speed: FieldRange::new(1000.0, 3000.0),
            torque: FieldRange::new(3.0, 150.0),
            tool_wear: FieldRange::new(0.0, 600.0),
        }
    }
}

impl InputRanges {
    /// Ranges paired with field names, in reading order
    pub fn fields(&self) -> [(&'static str, FieldRange); 5] {
        [
            ("air_temperature", self.air_temperature),
            ("process_temperature", self.process_temperature),
            ("rotational_speed", self.rotational_speed),
            ("torque", self.torque),
            ("tool_wear", self.tool_wear),
        ]
    }
}

/// Validation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject readings outside `ranges` (physical checks always apply)
    pub enforce_ranges: bool,
    /// Canonical input ranges
    pub ranges: InputRanges,
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create a result from collected errors
    pub fn from_errors(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            fields_checked,
        }
    }

    /// Convert into a `Result`, keeping every error
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Boundary validator for raw readings
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Canonical input ranges
    pub fn ranges(&self) -> &InputRanges {
        &self.config.ranges
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: FieldRange,
    ) -> Result<(), ValidationError> {
        if range.contains(value) {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.min,
                max: range.max,
            })
        }
    }

    /// Physical constraints: finite values, positive temperatures and
    /// speed, non-negative torque and tool wear
    pub fn validate_physical(&self, reading: &RawReading) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (field, value) in reading.numeric_fields() {
            if !value.is_finite() {
                errors.push(ValidationError::NotFinite { field });
                continue;
            }
            let (ok, requirement) = match field {
                "torque" | "tool_wear" => (value >= 0.0, "non-negative"),
                _ => (value > 0.0, "positive"),
            };
            if !ok {
                errors.push(ValidationError::NonPhysical {
                    field,
                    value,
                    requirement,
                });
            }
        }

        errors
    }

    /// Check every field against the canonical ranges
    pub fn validate_ranges(&self, reading: &RawReading) -> Vec<ValidationError> {
        reading
            .numeric_fields()
            .into_iter()
            .zip(self.config.ranges.fields())
            .filter_map(|((field, value), (_, range))| {
                self.validate_range(field, value, range).err()
            })
            .collect()
    }

    /// Validate a reading at the service boundary
    pub fn validate(&self, reading: &RawReading) -> ValidationResult {
        let mut errors = self.validate_physical(reading);
        if errors.is_empty() && self.config.enforce_ranges {
            errors = self.validate_ranges(reading);
        }

        if !errors.is_empty() {
            debug!("Reading rejected with {} validation error(s)", errors.len());
        }

        ValidationResult::from_errors(errors, reading.numeric_fields().len())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
