//! Failure Prediction Engine
//!
//! Loads the pre-trained classifier artifact (a JSON random-forest export or
//! an ONNX model run with tract) and wraps it in [`InferenceEngine`], the
//! facade that applies feature derivation and maps the classifier output to
//! a [`PredictionResult`].

mod artifact;
mod classifier;
mod encoder;
mod engine;
mod forest;
mod onnx;

pub use artifact::{load_artifact, sidecar_path};
pub use classifier::{CategoricalFeature, Classifier, ModelDescriptor, Preprocessing, StandardScaler};
pub use encoder::FeatureEncoder;
pub use engine::{FailureLabel, InferenceEngine, PredictionResult};
pub use forest::ForestClassifier;
pub use onnx::OnnxClassifier;

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),
    #[error("Missing feature column: {0}")]
    MissingFeature(String),
    #[error("Unknown category {value:?} for column {column}")]
    UnknownCategory { column: String, value: String },
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}
