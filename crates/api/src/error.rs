//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use inference_engine::InferenceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error kind
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Per-field details, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Errors surfaced by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a reading: missing field, wrong type, bad JSON
    #[error("Request does not match the reading schema: {0}")]
    SchemaMismatch(String),
    /// Reading parsed but failed boundary validation
    #[error("Reading failed validation")]
    Validation(Vec<ValidationError>),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl ApiError {
    /// Error kind reported in the body
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::SchemaMismatch(_) => "schema_mismatch",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Inference(InferenceError::ModelUnavailable(_)) => "model_unavailable",
            ApiError::Inference(_) => "inference_failed",
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SchemaMismatch(_) | ApiError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Inference(InferenceError::ModelUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let details = match &self {
            ApiError::Validation(errors) => errors.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        };
        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
