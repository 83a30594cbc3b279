//! Advisory rules

use feature_engine::RawReading;
use inference_engine::PredictionResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Advisory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Torque above which load reduction is prescribed (N·m)
    pub torque_limit: f64,
    /// Tool wear above which replacement is prescribed (min)
    pub tool_wear_limit: f64,
    /// Process/air temperature gap above which cooling is checked (K)
    pub temp_diff_limit: f64,
    /// Failure probability (%) above which a healthy machine counts as degrading
    pub degradation_probability: f64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            torque_limit: 60.0,
            tool_wear_limit: 200.0,
            temp_diff_limit: 15.0,
            degradation_probability: 40.0,
        }
    }
}

/// Overall machine risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// All systems nominal
    Nominal,
    /// No failure predicted, but probability is elevated
    Degrading,
    /// Failure predicted
    Failure,
}

impl RiskLevel {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Nominal => "nominal",
            RiskLevel::Degrading => "degrading",
            RiskLevel::Failure => "failure",
        }
    }
}

/// A concrete maintenance action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prescription {
    ReduceMotorLoad,
    ReplaceTool,
    CheckCooling,
    ScheduleMaintenance,
}

impl Prescription {
    /// Get recommended action
    pub fn message(&self) -> &'static str {
        match self {
            Prescription::ReduceMotorLoad => "High torque detected: decrease motor load immediately",
            Prescription::ReplaceTool => "Critical tool wear: replace the cutting tool",
            Prescription::CheckCooling => "Overheating: check the cooling system",
            Prescription::ScheduleMaintenance => {
                "Machine is entering a degradation phase: schedule maintenance"
            }
        }
    }
}

/// Advisory for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub risk: RiskLevel,
    pub prescriptions: Vec<Prescription>,
}

impl Advisory {
    /// Human-readable prescription messages
    pub fn messages(&self) -> Vec<&'static str> {
        self.prescriptions.iter().map(Prescription::message).collect()
    }
}

/// Rule-based advisor
pub struct Advisor {
    config: AdvisoryConfig,
}

impl Advisor {
    /// Create a new advisor
    pub fn new(config: AdvisoryConfig) -> Self {
        info!("Creating advisor with config: {:?}", config);
        Self { config }
    }

    /// Assess a reading and its prediction
    pub fn assess(&self, reading: &RawReading, prediction: &PredictionResult) -> Advisory {
        let advisory = if prediction.is_failure() {
            let mut prescriptions = Vec::new();
            if reading.torque > self.config.torque_limit {
                prescriptions.push(Prescription::ReduceMotorLoad);
            }
            if reading.tool_wear > self.config.tool_wear_limit {
                prescriptions.push(Prescription::ReplaceTool);
            }
            if reading.temp_diff() > self.config.temp_diff_limit {
                prescriptions.push(Prescription::CheckCooling);
            }
            Advisory {
                risk: RiskLevel::Failure,
                prescriptions,
            }
        } else if prediction.failure_probability > self.config.degradation_probability {
            Advisory {
                risk: RiskLevel::Degrading,
                prescriptions: vec![Prescription::ScheduleMaintenance],
            }
        } else {
            Advisory {
                risk: RiskLevel::Nominal,
                prescriptions: Vec::new(),
            }
        };

        debug!(
            "Advisory: {} with {} prescription(s)",
            advisory.risk.as_str(),
            advisory.prescriptions.len()
        );
        advisory
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new(AdvisoryConfig::default())
    }
}
