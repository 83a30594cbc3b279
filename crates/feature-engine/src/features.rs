//! Feature Derivation

use crate::columns;
use crate::record::FeatureRecord;
use serde::{Deserialize, Serialize};

/// Reading after feature derivation, ready for the classifier's encoding stage
///
/// Derived columns are present only when their source columns were, so the
/// accessors return `Option`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrichedReading {
    record: FeatureRecord,
}

impl EnrichedReading {
    /// `torque * rotational_speed`, using the untransformed speed
    pub fn power(&self) -> Option<f64> {
        self.record.number(columns::POWER)
    }

    /// `process_temperature - air_temperature`
    pub fn temp_diff(&self) -> Option<f64> {
        self.record.number(columns::TEMP_DIFF)
    }

    /// `ln(1 + rotational_speed)`
    pub fn log_rotational_speed(&self) -> Option<f64> {
        self.record.number(columns::ROTATIONAL_SPEED)
    }

    /// Underlying record
    pub fn as_record(&self) -> &FeatureRecord {
        &self.record
    }

    /// Consume into the underlying record
    pub fn into_record(self) -> FeatureRecord {
        self.record
    }
}

/// Derive `power`, `temp_diff` and the log-transformed rotational speed.
///
/// Returns a modified copy; the input is never touched. Every derived value
/// is read from the input record, so `power` always sees the speed before
/// the `ln_1p` transform. Columns that are missing (or not numeric) skip the
/// features depending on them. No range validation happens here.
pub fn derive(record: &FeatureRecord) -> EnrichedReading {
    let mut enriched = record.clone();

    if let (Some(torque), Some(speed)) = (
        record.number(columns::TORQUE),
        record.number(columns::ROTATIONAL_SPEED),
    ) {
        enriched.insert(columns::POWER, torque * speed);
    }

    if let (Some(process), Some(air)) = (
        record.number(columns::PROCESS_TEMPERATURE),
        record.number(columns::AIR_TEMPERATURE),
    ) {
        enriched.insert(columns::TEMP_DIFF, process - air);
    }

    if let Some(speed) = record.number(columns::ROTATIONAL_SPEED) {
        enriched.insert(columns::ROTATIONAL_SPEED, speed.ln_1p());
    }

    EnrichedReading { record: enriched }
}
