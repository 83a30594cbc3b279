//! Raw sensor readings

use crate::columns;
use crate::features::{derive, EnrichedReading};
use crate::record::FeatureRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Machine quality grade
///
/// Deserialized through [`FromStr`], so requests may send `" m "` and an
/// unknown grade reports [`ParseMachineTypeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum MachineType {
    /// Low quality variant
    L,
    /// Medium quality variant
    M,
    /// High quality variant
    H,
}

impl MachineType {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::L => "L",
            MachineType::M => "M",
            MachineType::H => "H",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown machine grade
#[derive(Debug, Clone, Error)]
#[error("Unknown machine type {0:?}, expected one of L, M, H")]
pub struct ParseMachineTypeError(pub String);

impl FromStr for MachineType {
    type Err = ParseMachineTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(MachineType::L),
            "M" | "m" => Ok(MachineType::M),
            "H" | "h" => Ok(MachineType::H),
            other => Err(ParseMachineTypeError(other.to_string())),
        }
    }
}

impl TryFrom<String> for MachineType {
    type Error = ParseMachineTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One sensor snapshot as received at the boundary
///
/// Field names follow the service schema; the column-style names of the
/// first dashboard clients (`Type`, `Air_temperature_K`, ...) are accepted
/// as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Machine quality grade
    #[serde(alias = "Type")]
    pub machine_type: MachineType,
    /// Air temperature (K)
    #[serde(alias = "Air_temperature_K")]
    pub air_temperature: f64,
    /// Process temperature (K)
    #[serde(alias = "Process_temperature_K")]
    pub process_temperature: f64,
    /// Rotational speed (rpm)
    #[serde(alias = "Rotational_speed_rpm")]
    pub rotational_speed: f64,
    /// Torque (N·m)
    #[serde(alias = "Torque_Nm")]
    pub torque: f64,
    /// Tool wear (min)
    #[serde(alias = "Tool_wear_min")]
    pub tool_wear: f64,
}

impl RawReading {
    /// Full-schema record with dataset column names
    pub fn to_record(&self) -> FeatureRecord {
        FeatureRecord::new()
            .with(columns::AIR_TEMPERATURE, self.air_temperature)
            .with(columns::PROCESS_TEMPERATURE, self.process_temperature)
            .with(columns::ROTATIONAL_SPEED, self.rotational_speed)
            .with(columns::TORQUE, self.torque)
            .with(columns::TOOL_WEAR, self.tool_wear)
            .with(columns::MACHINE_TYPE, self.machine_type.as_str())
    }

    /// Run feature derivation on this reading
    pub fn derive(&self) -> EnrichedReading {
        derive(&self.to_record())
    }

    /// Temperature difference (K) on raw values
    pub fn temp_diff(&self) -> f64 {
        self.process_temperature - self.air_temperature
    }

    /// Numeric fields paired with their column names
    pub fn numeric_fields(&self) -> [(&'static str, f64); 5] {
        [
            ("air_temperature", self.air_temperature),
            ("process_temperature", self.process_temperature),
            ("rotational_speed", self.rotational_speed),
            ("torque", self.torque),
            ("tool_wear", self.tool_wear),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_type_parse() {
        assert_eq!("M".parse::<MachineType>().unwrap(), MachineType::M);
        assert_eq!(" h ".parse::<MachineType>().unwrap(), MachineType::H);
        assert!("X".parse::<MachineType>().is_err());
    }

    #[test]
    fn test_deserialize_service_names() {
        let reading: RawReading = serde_json::from_str(
            r#"{"machine_type":"L","air_temperature":300.0,"process_temperature":310.0,
                "rotational_speed":1500,"torque":40.0,"tool_wear":10}"#,
        )
        .unwrap();
        assert_eq!(reading.machine_type, MachineType::L);
        assert_eq!(reading.rotational_speed, 1500.0);
    }

    #[test]
    fn test_deserialize_dashboard_aliases() {
        let reading: RawReading = serde_json::from_str(
            r#"{"Type":"M","Air_temperature_K":298.1,"Process_temperature_K":308.6,
                "Rotational_speed_rpm":1551,"Torque_Nm":42.8,"Tool_wear_min":108}"#,
        )
        .unwrap();
        assert_eq!(reading.machine_type, MachineType::M);
        assert_eq!(reading.torque, 42.8);
        assert_eq!(reading.tool_wear, 108.0);
    }

    #[test]
    fn test_machine_type_json_is_lenient_and_typed() {
        let grade: MachineType = serde_json::from_str(r#"" m ""#).unwrap();
        assert_eq!(grade, MachineType::M);
        assert_eq!(serde_json::to_string(&grade).unwrap(), r#""M""#);

        let err = serde_json::from_str::<MachineType>(r#""X""#).unwrap_err();
        assert!(err.to_string().contains("Unknown machine type"));
    }

    #[test]
    fn test_missing_field_rejected() {
        let result: Result<RawReading, _> = serde_json::from_str(
            r#"{"Type":"M","Air_temperature_K":298.1,"Process_temperature_K":308.6}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_to_record_is_full_schema() {
        let reading = RawReading {
            machine_type: MachineType::H,
            air_temperature: 300.0,
            process_temperature: 311.0,
            rotational_speed: 1400.0,
            torque: 50.0,
            tool_wear: 5.0,
        };
        let record = reading.to_record();
        assert_eq!(record.len(), 6);
        assert_eq!(record.category(columns::MACHINE_TYPE), Some("H"));
        for name in columns::NUMERIC_RAW {
            assert!(record.number(name).is_some(), "missing {name}");
        }
    }
}
