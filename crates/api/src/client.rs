//! Prediction API client
//!
//! Thin HTTP client for dashboards and scripts. One request per call and
//! no retries: a connection failure surfaces as [`ClientError::Transport`].

use feature_engine::RawReading;
use inference_engine::PredictionResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::routes::{Diagnosis, ProbabilityResponse, SystemStatus};

/// Client-side errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server unreachable, timed out, or connection dropped
    #[error("Transport error: {0}")]
    Transport(String),
    /// Server answered with a non-success status
    #[error("Server returned {status}: {body}")]
    Server { status: u16, body: String },
    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// HTTP client for the prediction service
#[derive(Debug, Clone)]
pub struct PredictionClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl PredictionClient {
    /// Default request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a client for `base_url`, e.g. `http://127.0.0.1:8000`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /predict`
    pub async fn predict(&self, reading: &RawReading) -> Result<PredictionResult, ClientError> {
        self.post("/predict", reading).await
    }

    /// `POST /predict_proba`, returning the percentage
    pub async fn failure_probability(&self, reading: &RawReading) -> Result<f64, ClientError> {
        let response: ProbabilityResponse = self.post("/predict_proba", reading).await?;
        Ok(response.failure_probability)
    }

    /// `POST /api/v1/diagnose`
    pub async fn diagnose(&self, reading: &RawReading) -> Result<Diagnosis, ClientError> {
        self.post("/api/v1/diagnose", reading).await
    }

    /// `GET /system_status`
    pub async fn system_status(&self) -> Result<SystemStatus, ClientError> {
        let url = format!("{}/system_status", self.base_url);
        let request = self.http_client.get(&url);
        Self::send(request).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);
        Self::send(self.http_client.post(&url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Prediction service returned {}: {}", status, body);
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}
