//! Feature encoding: record to numeric input vector

use crate::classifier::{CategoricalFeature, ModelDescriptor};
use crate::InferenceError;
use feature_engine::FeatureRecord;

/// Encodes a feature record into the classifier's input layout
///
/// Layout: numeric features in descriptor order (standard-scaled when the
/// descriptor carries a scaler), followed by one one-hot block per
/// categorical column.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    features: Vec<String>,
    categorical: Vec<CategoricalFeature>,
    scaling: Option<(Vec<f64>, Vec<f64>)>,
}

impl FeatureEncoder {
    /// Build an encoder from artifact metadata
    pub fn new(descriptor: &ModelDescriptor) -> Result<Self, InferenceError> {
        let n = descriptor.features.len();

        let scaling = match &descriptor.scaler {
            Some(scaler) => {
                if scaler.mean.len() != n || scaler.scale.len() != n {
                    return Err(InferenceError::InvalidArtifact(format!(
                        "scaler has {} means and {} scales for {} features",
                        scaler.mean.len(),
                        scaler.scale.len(),
                        n
                    )));
                }
                // Zero-variance columns are left unscaled
                let scale = scaler
                    .scale
                    .iter()
                    .map(|&s| if s == 0.0 { 1.0 } else { s })
                    .collect();
                Some((scaler.mean.clone(), scale))
            }
            None => None,
        };

        if let Some(empty) = descriptor.categorical.iter().find(|c| c.levels.is_empty()) {
            return Err(InferenceError::InvalidArtifact(format!(
                "categorical column {} has no levels",
                empty.column
            )));
        }

        Ok(Self {
            features: descriptor.features.clone(),
            categorical: descriptor.categorical.clone(),
            scaling,
        })
    }

    /// Length of the encoded vector
    pub fn width(&self) -> usize {
        self.features.len() + self.categorical.iter().map(|c| c.levels.len()).sum::<usize>()
    }

    /// Encode a record
    pub fn encode(&self, record: &FeatureRecord) -> Result<Vec<f64>, InferenceError> {
        let mut values = Vec::with_capacity(self.width());

        for (i, name) in self.features.iter().enumerate() {
            let raw = record
                .number(name)
                .ok_or_else(|| InferenceError::MissingFeature(name.clone()))?;
            let value = match &self.scaling {
                Some((mean, scale)) => (raw - mean[i]) / scale[i],
                None => raw,
            };
            values.push(value);
        }

        for feature in &self.categorical {
            let level = record
                .category(&feature.column)
                .ok_or_else(|| InferenceError::MissingFeature(feature.column.clone()))?;
            let position = feature
                .levels
                .iter()
                .position(|l| l == level)
                .ok_or_else(|| InferenceError::UnknownCategory {
                    column: feature.column.clone(),
                    value: level.to_string(),
                })?;
            values.extend((0..feature.levels.len()).map(|i| if i == position { 1.0 } else { 0.0 }));
        }

        Ok(values)
    }
}
