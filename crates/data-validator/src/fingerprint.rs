//! Sensor fingerprint normalisation

use crate::validator::InputRanges;
use feature_engine::RawReading;
use serde::{Deserialize, Serialize};

/// A reading scaled to percentages of each field's upper bound
///
/// This is the radar-chart view of a reading: every axis is
/// `value / range.max * 100`, clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorFingerprint {
    pub air_temperature: f64,
    pub process_temperature: f64,
    pub rotational_speed: f64,
    pub torque: f64,
    pub tool_wear: f64,
}

impl SensorFingerprint {
    /// Axis labels, in chart order
    pub const AXES: [&'static str; 5] = ["Air Temp", "Process Temp", "Speed", "Torque", "Tool Wear"];

    /// Scale a reading against the canonical ranges
    pub fn from_reading(reading: &RawReading, ranges: &InputRanges) -> Self {
        Self {
            air_temperature: scale(reading.air_temperature, ranges.air_temperature.max),
            process_temperature: scale(reading.process_temperature, ranges.process_temperature.max),
            rotational_speed: scale(reading.rotational_speed, ranges.rotational_speed.max),
            torque: scale(reading.torque, ranges.torque.max),
            tool_wear: scale(reading.tool_wear, ranges.tool_wear.max),
        }
    }

    /// Axis values in chart order
    pub fn values(&self) -> [f64; 5] {
        [
            self.air_temperature,
            self.process_temperature,
            self.rotational_speed,
            self.torque,
            self.tool_wear,
        ]
    }
}

fn scale(value: f64, upper: f64) -> f64 {
    if upper <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / upper * 100.0).clamp(0.0, 100.0)
}
