//! Maintenance Alerting
//!
//! Turns a prediction and the reading behind it into an advisory: a risk
//! level plus concrete prescriptions for the operator.

mod advisor;

pub use advisor::{Advisor, AdvisoryConfig, Advisory, Prescription, RiskLevel};
