//! Classifier contract and artifact metadata

use crate::InferenceError;
use feature_engine::FeatureRecord;
use serde::{Deserialize, Serialize};

/// Preprocessing stage embedded in an artifact
///
/// Closed set: an artifact that names a stage gets the compiled
/// implementation, there is no lookup by symbol name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preprocessing {
    /// Classifier expects already-derived features
    #[default]
    None,
    /// Classifier pipeline runs feature derivation itself
    DeriveFeatures,
}

impl Preprocessing {
    /// Run the stage on a record
    pub fn apply(&self, record: &FeatureRecord) -> FeatureRecord {
        match self {
            Preprocessing::None => record.clone(),
            Preprocessing::DeriveFeatures => feature_engine::derive(record).into_record(),
        }
    }
}

/// One-hot encoded categorical column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalFeature {
    /// Column name in the feature record
    pub column: String,
    /// Known levels, in encoding order
    pub levels: Vec<String>,
}

/// Standard scaling over the numeric features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

fn default_model_name() -> String {
    "Random Forest Classifier".to_string()
}

/// Artifact metadata: what the classifier consumes and what it embeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Display name
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Preprocessing the artifact applies on its own
    #[serde(default)]
    pub preprocessing: Preprocessing,
    /// Numeric feature columns, in encoding order
    pub features: Vec<String>,
    /// Categorical columns, one-hot encoded after the numeric block
    #[serde(default)]
    pub categorical: Vec<CategoricalFeature>,
    /// Optional scaling of the numeric block
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

impl ModelDescriptor {
    /// Whether the artifact already performs feature derivation
    pub fn embeds_derivation(&self) -> bool {
        self.preprocessing == Preprocessing::DeriveFeatures
    }
}

/// Opaque binary failure classifier
///
/// Implementations are loaded once and shared read-only between request
/// handlers. Both queries receive the record after the facade's
/// preprocessing; an artifact that embeds derivation gets the raw record
/// and must apply [`Preprocessing`] itself.
pub trait Classifier: Send + Sync {
    /// Artifact metadata
    fn descriptor(&self) -> &ModelDescriptor;

    /// Hard class label: 1 = failure, 0 = no failure
    fn predict(&self, record: &FeatureRecord) -> Result<u8, InferenceError>;

    /// Probability of the failure class, in `[0, 1]`
    fn predict_proba(&self, record: &FeatureRecord) -> Result<f64, InferenceError>;

    /// Class and probability together
    ///
    /// Backends that produce both from one evaluation override this so a
    /// full prediction runs the model once.
    fn classify(&self, record: &FeatureRecord) -> Result<(u8, f64), InferenceError> {
        Ok((self.predict(record)?, self.predict_proba(record)?))
    }
}
