//! Artifact loading

use crate::classifier::{Classifier, ModelDescriptor};
use crate::forest::ForestClassifier;
use crate::onnx::OnnxClassifier;
use crate::InferenceError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Metadata file next to an ONNX model: `model.onnx` → `model.onnx.meta.json`
pub fn sidecar_path(model_path: &Path) -> PathBuf {
    let mut name = model_path.as_os_str().to_os_string();
    name.push(".meta.json");
    PathBuf::from(name)
}

fn read_descriptor(path: &Path) -> Result<ModelDescriptor, InferenceError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| InferenceError::InvalidArtifact(format!("{}: {}", path.display(), e)))
}

/// Load a classifier artifact, picking the format from the file extension
///
/// * `.json`: random-forest export
/// * `.onnx`: ONNX model plus its `.meta.json` descriptor
pub fn load_artifact(path: impl AsRef<Path>) -> Result<Arc<dyn Classifier>, InferenceError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    info!("Loading classifier artifact {}", path.display());

    match extension.as_str() {
        "json" => Ok(Arc::new(ForestClassifier::from_path(path)?)),
        "onnx" => {
            let descriptor = read_descriptor(&sidecar_path(path))?;
            Ok(Arc::new(OnnxClassifier::load(path, descriptor)?))
        }
        "pkl" | "joblib" => Err(InferenceError::InvalidArtifact(format!(
            "{}: pickled pipelines cannot be loaded, export the model to JSON or ONNX",
            path.display()
        ))),
        other => Err(InferenceError::InvalidArtifact(format!(
            "{}: unsupported artifact extension {:?}",
            path.display(),
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("inference-engine-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("models/pm.onnx")),
            PathBuf::from("models/pm.onnx.meta.json")
        );
    }

    #[test]
    fn test_load_json_forest() {
        let path = temp_file(
            "forest.json",
            r#"{"model_name": "Stump", "features": ["Torque [Nm]"],
                "trees": [{"nodes": [{"value": [3, 1]}]}]}"#,
        );
        let classifier = load_artifact(&path).unwrap();
        assert_eq!(classifier.descriptor().model_name, "Stump");
    }

    #[test]
    fn test_pickle_rejected() {
        let result = load_artifact("predictive_maintenance_model.pkl");
        assert!(matches!(result, Err(InferenceError::InvalidArtifact(_))));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            load_artifact("model.bin"),
            Err(InferenceError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_onnx_without_sidecar() {
        let path = temp_file("orphan.onnx", "not a model");
        assert!(matches!(
            load_artifact(&path),
            Err(InferenceError::ModelLoadError(_))
        ));
    }

    #[test]
    fn test_load_onnx_with_sidecar() {
        use crate::onnx::fixtures::{torque_model, TORQUE_DESCRIPTOR};
        use feature_engine::FeatureRecord;
        use prost::Message;

        let dir = std::env::temp_dir().join(format!("inference-engine-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("torque.onnx");
        std::fs::write(&path, torque_model(true).encode_to_vec()).unwrap();
        std::fs::write(sidecar_path(&path), TORQUE_DESCRIPTOR).unwrap();

        let classifier = load_artifact(&path).unwrap();
        assert_eq!(classifier.descriptor().model_name, "Torque Logistic");

        let record = FeatureRecord::new().with("Torque [Nm]", 70.0);
        let (class, probability) = classifier.classify(&record).unwrap();
        assert_eq!(class, 1);
        assert!(probability > 0.999);
    }
}
