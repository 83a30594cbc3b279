//! Status Routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::SharedState;

/// Whether the service can answer predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Online,
    Offline,
}

/// Dashboard status panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    /// Loaded model name, absent when no model is loaded
    pub model_name: Option<String>,
    pub total_scans: u64,
    pub status: ServiceStatus,
}

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub total_scans: u64,
}

/// Component status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub inference: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    pub detail: Option<String>,
}

/// Model name, scan count and online flag
pub async fn system_status(State(state): State<SharedState>) -> Json<SystemStatus> {
    let status = if state.engine.is_loaded() {
        ServiceStatus::Online
    } else {
        ServiceStatus::Offline
    };

    Json(SystemStatus {
        model_name: state.engine.model_name().map(str::to_string),
        total_scans: state.total_scans(),
        status,
    })
}

/// Health check handler
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let inference = match state.engine.unavailable_reason() {
        None => ComponentHealth {
            status: "ok".to_string(),
            detail: state.engine.model_name().map(str::to_string),
        },
        Some(reason) => ComponentHealth {
            status: "unavailable".to_string(),
            detail: Some(reason.to_string()),
        },
    };
    let status = if state.engine.is_loaded() { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus { inference },
        total_scans: state.total_scans(),
    })
}

/// Prometheus exposition
pub async fn metrics(State(state): State<SharedState>) -> Response {
    match state.metrics_handle() {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => (StatusCode::NOT_FOUND, "metrics exporter not installed").into_response(),
    }
}
