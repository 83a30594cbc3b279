//! Predictive Maintenance API Server
//!
//! HTTP prediction endpoint for the failure classifier, plus a small client
//! and a caller-owned diagnostic session for dashboards.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod client;
pub mod config;
mod error;
pub mod routes;
mod session;

pub use client::{ClientError, PredictionClient};
pub use crate::config::{LogFormat, LoggingConfig, ServiceConfig};
pub use error::{ApiError, ErrorBody};
pub use session::DiagnosticSession;

use alerting::Advisor;
use data_validator::Validator;
use inference_engine::InferenceEngine;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Application state shared across handlers
pub struct AppState {
    /// Prediction facade
    pub engine: InferenceEngine,
    /// Boundary validator
    pub validator: Validator,
    /// Advisory rules
    pub advisor: Advisor,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
    /// Predictions served since start (display only)
    scans: AtomicU64,
    /// Prometheus exporter, when installed
    metrics: Option<PrometheusHandle>,
}

/// Shared handle to the application state
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state
    pub fn new(engine: InferenceEngine, config: &ServiceConfig) -> Self {
        Self {
            engine,
            validator: Validator::new(config.validation.clone()),
            advisor: Advisor::new(config.advisory.clone()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
            scans: AtomicU64::new(0),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// Count one served prediction, returning the new total
    pub fn record_scan(&self) -> u64 {
        self.scans.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Predictions served since start
    pub fn total_scans(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }

    /// Prometheus exporter, when installed
    pub fn metrics_handle(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/predict", post(routes::predictions::predict))
        .route("/predict_proba", post(routes::predictions::predict_proba))
        .route("/api/v1/diagnose", post(routes::predictions::diagnose))
        .route("/system_status", get(routes::status::system_status))
        .route("/api/v1/health", get(routes::status::health))
        .route("/metrics", get(routes::status::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging
///
/// An unparseable level falls back to INFO with a warning; configs read
/// through [`ServiceConfig::load_from_path`] have already rejected one.
pub fn init_logging(config: &LoggingConfig) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let parsed = config.level.parse::<Level>();
    let level = parsed.as_ref().copied().unwrap_or(Level::INFO);

    match config.format {
        LogFormat::Pretty => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_target(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Json => {
            let subscriber = FmtSubscriber::builder()
                .json()
                .with_max_level(level)
                .with_target(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    if let Err(e) = parsed {
        warn!("Invalid log level {:?} ({}), using info", config.level, e);
    }
    Ok(())
}

/// Run the server until Ctrl-C
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let engine = InferenceEngine::load(&config.model.artifact_path);
    if !engine.is_loaded() {
        warn!("Serving without a model: predictions will fail with model_unavailable");
    }

    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus exporter not installed: {}", e);
            None
        }
    };

    let state = Arc::new(AppState::new(engine, &config).with_metrics(metrics));
    let mut app = create_router(state);
    if config.server.cors {
        app = app.layer(CorsLayer::permissive());
    }

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    info!("Starting API server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
