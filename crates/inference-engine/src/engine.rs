//! Inference Facade

use crate::artifact::load_artifact;
use crate::classifier::Classifier;
use crate::InferenceError;
use feature_engine::{FeatureRecord, RawReading};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Human-readable outcome of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureLabel {
    #[serde(rename = "Failure")]
    Failure,
    #[serde(rename = "No Failure")]
    NoFailure,
}

impl FailureLabel {
    /// Class 1 is a failure, anything else is not
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            FailureLabel::Failure
        } else {
            FailureLabel::NoFailure
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureLabel::Failure => "Failure",
            FailureLabel::NoFailure => "No Failure",
        }
    }
}

/// Structured prediction returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Hard class: 1 = failure
    pub predicted_class: u8,
    /// Label derived from the class
    pub label: FailureLabel,
    /// Failure probability as a percentage, two decimals
    pub failure_probability: f64,
}

impl PredictionResult {
    /// Build from the classifier's class and positive-class probability
    pub fn new(predicted_class: u8, probability: f64) -> Self {
        Self {
            predicted_class,
            label: FailureLabel::from_class(predicted_class),
            failure_probability: to_percentage(probability),
        }
    }

    /// Whether a failure was predicted
    pub fn is_failure(&self) -> bool {
        self.label == FailureLabel::Failure
    }
}

/// Probability in `[0, 1]` to a percentage rounded to two decimals
///
/// Exact ties round to even, matching `"{:.2f}"` formatting in the training
/// notebooks: 53.125 becomes 53.12.
fn to_percentage(probability: f64) -> f64 {
    let percent = (probability * 100.0).clamp(0.0, 100.0);
    (percent * 100.0).round_ties_even() / 100.0
}

enum ModelState {
    Ready(Arc<dyn Classifier>),
    Unavailable(String),
}

/// Facade composing feature derivation and the opaque classifier
///
/// Derivation runs here unless the artifact declares that it embeds the
/// stage, so each record is derived exactly once. A model that failed to
/// load leaves the engine in the unavailable state and every prediction
/// returns [`InferenceError::ModelUnavailable`].
pub struct InferenceEngine {
    state: ModelState,
}

impl InferenceEngine {
    /// Wrap an already-loaded classifier
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        info!(
            "Creating inference engine with model: {}",
            classifier.descriptor().model_name
        );
        Self {
            state: ModelState::Ready(classifier),
        }
    }

    /// Engine whose every call fails with `ModelUnavailable`
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: ModelState::Unavailable(reason.into()),
        }
    }

    /// Load the artifact at `path`; a failure is logged and kept, not returned
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match load_artifact(path) {
            Ok(classifier) => Self::new(classifier),
            Err(e) => {
                error!("Error loading model from {}: {}", path.display(), e);
                Self::unavailable(e.to_string())
            }
        }
    }

    /// Check if a model is loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    /// Display name of the loaded model
    pub fn model_name(&self) -> Option<&str> {
        match &self.state {
            ModelState::Ready(classifier) => Some(&classifier.descriptor().model_name),
            ModelState::Unavailable(_) => None,
        }
    }

    /// Why the model is unavailable, if it is
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            ModelState::Ready(_) => None,
            ModelState::Unavailable(reason) => Some(reason),
        }
    }

    fn classifier(&self) -> Result<&dyn Classifier, InferenceError> {
        match &self.state {
            ModelState::Ready(classifier) => Ok(classifier.as_ref()),
            ModelState::Unavailable(reason) => {
                Err(InferenceError::ModelUnavailable(reason.clone()))
            }
        }
    }

    fn prepare(classifier: &dyn Classifier, record: &FeatureRecord) -> FeatureRecord {
        if classifier.descriptor().embeds_derivation() {
            record.clone()
        } else {
            feature_engine::derive(record).into_record()
        }
    }

    /// Predict from a full raw reading
    pub fn predict(&self, reading: &RawReading) -> Result<PredictionResult, InferenceError> {
        self.predict_record(&reading.to_record())
    }

    /// Predict from a possibly partial record
    pub fn predict_record(&self, record: &FeatureRecord) -> Result<PredictionResult, InferenceError> {
        let start = std::time::Instant::now();
        let classifier = self.classifier()?;
        let input = Self::prepare(classifier, record);

        let (class, probability) = classifier.classify(&input)?;
        let result = PredictionResult::new(class, probability);

        debug!(
            "Prediction: {} ({:.2}%) in {}us",
            result.label.as_str(),
            result.failure_probability,
            start.elapsed().as_micros()
        );
        Ok(result)
    }

    /// Hard class only
    pub fn predict_class(&self, reading: &RawReading) -> Result<u8, InferenceError> {
        let classifier = self.classifier()?;
        classifier.predict(&Self::prepare(classifier, &reading.to_record()))
    }

    /// Failure probability only, as a two-decimal percentage
    pub fn failure_probability(&self, reading: &RawReading) -> Result<f64, InferenceError> {
        let classifier = self.classifier()?;
        let probability = classifier.predict_proba(&Self::prepare(classifier, &reading.to_record()))?;
        Ok(to_percentage(probability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ModelDescriptor, Preprocessing};
    use feature_engine::{columns, MachineType};
    use std::sync::Mutex;

    /// Returns fixed outputs and records what it was given
    struct FixedClassifier {
        descriptor: ModelDescriptor,
        class: u8,
        probability: f64,
        seen: Mutex<Vec<FeatureRecord>>,
    }

    impl FixedClassifier {
        fn new(class: u8, probability: f64, preprocessing: Preprocessing) -> Arc<Self> {
            Arc::new(Self {
                descriptor: ModelDescriptor {
                    model_name: "Fixed".to_string(),
                    preprocessing,
                    features: Vec::new(),
                    categorical: Vec::new(),
                    scaler: None,
                },
                class,
                probability,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last_seen(&self) -> FeatureRecord {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Classifier for FixedClassifier {
        fn descriptor(&self) -> &ModelDescriptor {
            &self.descriptor
        }

        fn predict(&self, record: &FeatureRecord) -> Result<u8, InferenceError> {
            self.seen.lock().unwrap().push(record.clone());
            Ok(self.class)
        }

        fn predict_proba(&self, record: &FeatureRecord) -> Result<f64, InferenceError> {
            self.seen.lock().unwrap().push(record.clone());
            Ok(self.probability)
        }
    }

    fn reading() -> RawReading {
        RawReading {
            machine_type: MachineType::M,
            air_temperature: 298.1,
            process_temperature: 308.6,
            rotational_speed: 1551.0,
            torque: 42.8,
            tool_wear: 108.0,
        }
    }

    #[test]
    fn test_failure_label() {
        let engine = InferenceEngine::new(FixedClassifier::new(1, 0.9, Preprocessing::None));
        let result = engine.predict(&reading()).unwrap();
        assert_eq!(result.predicted_class, 1);
        assert_eq!(result.label, FailureLabel::Failure);
        assert!(result.is_failure());
    }

    #[test]
    fn test_no_failure_label() {
        let engine = InferenceEngine::new(FixedClassifier::new(0, 0.1, Preprocessing::None));
        let result = engine.predict(&reading()).unwrap();
        assert_eq!(result.predicted_class, 0);
        assert_eq!(result.label, FailureLabel::NoFailure);
    }

    #[test]
    fn test_probability_percentage_rounding() {
        let engine = InferenceEngine::new(FixedClassifier::new(0, 0.123456, Preprocessing::None));
        let result = engine.predict(&reading()).unwrap();
        assert_eq!(result.failure_probability, 12.35);
        assert_eq!(engine.failure_probability(&reading()).unwrap(), 12.35);
    }

    #[test]
    fn test_percentage_ties_round_to_even() {
        assert_eq!(to_percentage(17.0 / 32.0), 53.12);
        assert_eq!(to_percentage(19.0 / 32.0), 59.38);
        assert_eq!(to_percentage(1.5), 100.0);
        assert_eq!(to_percentage(-0.2), 0.0);
    }

    /// Answers only through `classify`, counting evaluations
    struct SinglePass {
        descriptor: ModelDescriptor,
        evaluations: Mutex<usize>,
    }

    impl Classifier for SinglePass {
        fn descriptor(&self) -> &ModelDescriptor {
            &self.descriptor
        }

        fn predict(&self, _record: &FeatureRecord) -> Result<u8, InferenceError> {
            Err(InferenceError::InferenceFailed("predict called".to_string()))
        }

        fn predict_proba(&self, _record: &FeatureRecord) -> Result<f64, InferenceError> {
            Err(InferenceError::InferenceFailed("predict_proba called".to_string()))
        }

        fn classify(&self, _record: &FeatureRecord) -> Result<(u8, f64), InferenceError> {
            *self.evaluations.lock().unwrap() += 1;
            Ok((1, 0.8))
        }
    }

    #[test]
    fn test_full_prediction_evaluates_once() {
        let classifier = Arc::new(SinglePass {
            descriptor: FixedClassifier::new(0, 0.0, Preprocessing::None).descriptor.clone(),
            evaluations: Mutex::new(0),
        });
        let engine = InferenceEngine::new(classifier.clone());

        let result = engine.predict(&reading()).unwrap();
        assert_eq!(result.predicted_class, 1);
        assert_eq!(result.failure_probability, 80.0);
        assert_eq!(*classifier.evaluations.lock().unwrap(), 1);
    }

    #[test]
    fn test_onnx_model_behind_facade() {
        use crate::onnx::fixtures::{torque_model, TORQUE_DESCRIPTOR};
        use crate::OnnxClassifier;

        let descriptor = serde_json::from_str(TORQUE_DESCRIPTOR).unwrap();
        let classifier = OnnxClassifier::from_proto(&torque_model(true), descriptor).unwrap();
        let engine = InferenceEngine::new(Arc::new(classifier));
        assert_eq!(engine.model_name(), Some("Torque Logistic"));

        let healthy = engine.predict(&reading()).unwrap();
        assert_eq!(healthy.label, FailureLabel::NoFailure);
        assert_eq!(healthy.failure_probability, 0.0);

        let stressed = RawReading {
            torque: 70.0,
            ..reading()
        };
        let result = engine.predict(&stressed).unwrap();
        assert!(result.is_failure());
        assert_eq!(result.failure_probability, 100.0);
        assert_eq!(engine.predict_class(&stressed).unwrap(), 1);
    }

    #[test]
    fn test_facade_derives_features() {
        let classifier = FixedClassifier::new(0, 0.2, Preprocessing::None);
        let engine = InferenceEngine::new(classifier.clone());
        engine.predict(&reading()).unwrap();

        let seen = classifier.last_seen();
        assert!((seen.number(columns::POWER).unwrap() - 66_382.8).abs() < 1e-6);
        assert_eq!(seen.number(columns::ROTATIONAL_SPEED), Some(1552.0_f64.ln()));
    }

    #[test]
    fn test_embedded_pipeline_gets_raw_reading() {
        let classifier = FixedClassifier::new(0, 0.2, Preprocessing::DeriveFeatures);
        let engine = InferenceEngine::new(classifier.clone());
        engine.predict(&reading()).unwrap();

        let seen = classifier.last_seen();
        assert_eq!(seen, reading().to_record());
        assert!(!seen.contains(columns::POWER));
    }

    #[test]
    fn test_unavailable_model() {
        let engine = InferenceEngine::unavailable("artifact missing");
        assert!(!engine.is_loaded());
        assert_eq!(engine.model_name(), None);
        assert!(matches!(
            engine.predict(&reading()),
            Err(InferenceError::ModelUnavailable(reason)) if reason == "artifact missing"
        ));
        assert!(engine.predict_class(&reading()).is_err());
        assert!(engine.failure_probability(&reading()).is_err());
    }

    #[test]
    fn test_load_missing_artifact_is_unavailable() {
        let engine = InferenceEngine::load("/nonexistent/predictive_maintenance_model.json");
        assert!(!engine.is_loaded());
        assert!(engine.unavailable_reason().is_some());
        assert!(matches!(
            engine.predict(&reading()),
            Err(InferenceError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_partial_record() {
        let classifier = FixedClassifier::new(0, 0.0, Preprocessing::None);
        let engine = InferenceEngine::new(classifier.clone());
        let record = FeatureRecord::new().with(columns::ROTATIONAL_SPEED, 0.0);
        let result = engine.predict_record(&record).unwrap();
        assert_eq!(result.failure_probability, 0.0);
        assert_eq!(classifier.last_seen().number(columns::ROTATIONAL_SPEED), Some(0.0));
    }

    #[test]
    fn test_label_serialization() {
        let json = serde_json::to_string(&PredictionResult::new(0, 0.5)).unwrap();
        assert!(json.contains(r#""label":"No Failure""#));
        assert!(json.contains(r#""failure_probability":50.0"#));
    }

    proptest::proptest! {
        #[test]
        fn prop_percentage_bounded(probability in -0.5f64..1.5) {
            let percent = to_percentage(probability);
            proptest::prop_assert!((0.0..=100.0).contains(&percent));
            proptest::prop_assert!(((percent * 100.0).round() - percent * 100.0).abs() < 1e-6);
        }
    }
}
