//! HTTP route handlers

pub mod predictions;
pub mod status;

pub use predictions::{Diagnosis, ProbabilityResponse};
pub use status::{ComponentHealth, HealthResponse, ServiceStatus, SystemStatus};
