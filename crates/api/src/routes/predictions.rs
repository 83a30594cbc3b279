//! Prediction Routes

use alerting::Advisory;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use data_validator::SensorFingerprint;
use feature_engine::RawReading;
use inference_engine::PredictionResult;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::{ApiError, SharedState};

/// Response for the probability endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilityResponse {
    /// Failure probability (%), two decimals
    pub failure_probability: f64,
}

/// Prediction plus dashboard data for one reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub prediction: PredictionResult,
    pub advisory: Advisory,
    pub fingerprint: SensorFingerprint,
}

/// Parse and validate the request body
fn accept(
    state: &SharedState,
    payload: Result<Json<RawReading>, JsonRejection>,
) -> Result<RawReading, ApiError> {
    let Json(reading) = payload.map_err(|rejection| ApiError::SchemaMismatch(rejection.body_text()))?;
    state
        .validator
        .validate(&reading)
        .into_result()
        .map_err(ApiError::Validation)?;
    Ok(reading)
}

fn run_prediction(state: &SharedState, reading: &RawReading) -> Result<PredictionResult, ApiError> {
    let start = Instant::now();
    let result = state.engine.predict(reading)?;
    metrics::histogram!("pdm_inference_seconds").record(start.elapsed().as_secs_f64());
    metrics::counter!("pdm_predictions_total", "label" => result.label.as_str()).increment(1);
    state.record_scan();
    Ok(result)
}

/// Classify a reading
pub async fn predict(
    State(state): State<SharedState>,
    payload: Result<Json<RawReading>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let reading = accept(&state, payload)?;
    Ok(Json(run_prediction(&state, &reading)?))
}

/// Failure probability only
pub async fn predict_proba(
    State(state): State<SharedState>,
    payload: Result<Json<RawReading>, JsonRejection>,
) -> Result<Json<ProbabilityResponse>, ApiError> {
    let reading = accept(&state, payload)?;
    let failure_probability = state.engine.failure_probability(&reading)?;
    Ok(Json(ProbabilityResponse { failure_probability }))
}

/// Prediction, advisory and sensor fingerprint in one call
pub async fn diagnose(
    State(state): State<SharedState>,
    payload: Result<Json<RawReading>, JsonRejection>,
) -> Result<Json<Diagnosis>, ApiError> {
    let reading = accept(&state, payload)?;
    let prediction = run_prediction(&state, &reading)?;
    let advisory = state.advisor.assess(&reading, &prediction);
    let fingerprint = SensorFingerprint::from_reading(&reading, state.validator.ranges());

    Ok(Json(Diagnosis {
        prediction,
        advisory,
        fingerprint,
    }))
}
