//! ONNX classifier using tract

use crate::classifier::{Classifier, ModelDescriptor};
use crate::encoder::FeatureEncoder;
use crate::InferenceError;
use feature_engine::FeatureRecord;
use std::fmt::Display;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Classifier exported to ONNX
///
/// Expects a single `[1, width]` float input. A two-output export (sklearn
/// style) yields the label tensor first and class probabilities second; a
/// single-output export yields probabilities only and the class is
/// thresholded at 0.5. Probability tensors may be `[1, 2]`, `[2]`, `[1, 1]`
/// or `[1]`. `seq(map)` outputs (zipmap) are not supported by tract, so
/// export with `zipmap=False`.
pub struct OnnxClassifier {
    descriptor: ModelDescriptor,
    encoder: FeatureEncoder,
    plan: OnnxPlan,
}

fn load_error(e: impl Display) -> InferenceError {
    InferenceError::ModelLoadError(e.to_string())
}

fn run_error(e: impl Display) -> InferenceError {
    InferenceError::InferenceFailed(e.to_string())
}

impl OnnxClassifier {
    /// Load and optimise an ONNX model for the descriptor's input width
    pub fn load(model_path: &Path, descriptor: ModelDescriptor) -> Result<Self, InferenceError> {
        let encoder = FeatureEncoder::new(&descriptor)?;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(load_error)?;
        let classifier = Self::from_model(model, descriptor, encoder)?;

        info!(
            "Loaded ONNX model '{}' from {} (input width {})",
            classifier.descriptor.model_name,
            model_path.display(),
            classifier.encoder.width()
        );
        Ok(classifier)
    }

    /// Build from an already-decoded ONNX protobuf
    pub fn from_proto(
        proto: &tract_onnx::pb::ModelProto,
        descriptor: ModelDescriptor,
    ) -> Result<Self, InferenceError> {
        let encoder = FeatureEncoder::new(&descriptor)?;
        let model = tract_onnx::onnx()
            .model_for_proto_model(proto)
            .map_err(load_error)?;
        Self::from_model(model, descriptor, encoder)
    }

    fn from_model(
        model: InferenceModel,
        descriptor: ModelDescriptor,
        encoder: FeatureEncoder,
    ) -> Result<Self, InferenceError> {
        let plan = model
            .with_input_fact(0, f32::fact([1, encoder.width()]).into())
            .map_err(load_error)?
            .into_optimized()
            .map_err(load_error)?
            .into_runnable()
            .map_err(load_error)?;

        Ok(Self {
            descriptor,
            encoder,
            plan,
        })
    }

    fn run(&self, record: &FeatureRecord) -> Result<TVec<TValue>, InferenceError> {
        let input = self.descriptor.preprocessing.apply(record);
        let values: Vec<f32> = self
            .encoder
            .encode(&input)?
            .into_iter()
            .map(|v| v as f32)
            .collect();
        let width = values.len();

        let tensor: Tensor = tract_ndarray::Array2::from_shape_vec((1, width), values)
            .map_err(run_error)?
            .into();
        let outputs = self.plan.run(tvec!(tensor.into())).map_err(run_error)?;
        debug!("ONNX model produced {} outputs", outputs.len());
        Ok(outputs)
    }
}

fn extract_label(output: &TValue) -> Result<u8, InferenceError> {
    let labels = output.cast_to::<i64>().map_err(run_error)?;
    let label = *labels
        .as_slice::<i64>()
        .map_err(run_error)?
        .first()
        .ok_or_else(|| run_error("empty label tensor"))?;

    match label {
        0 => Ok(0),
        1 => Ok(1),
        other => Err(run_error(format!("unexpected class label {}", other))),
    }
}

fn extract_probability(output: &TValue) -> Result<f64, InferenceError> {
    let probabilities = output.cast_to::<f32>().map_err(run_error)?;
    match probabilities.as_slice::<f32>().map_err(run_error)? {
        [p] | [_, p] => Ok(f64::from(*p)),
        other => Err(InferenceError::InvalidInputShape {
            expected: 2,
            actual: other.len(),
        }),
    }
}

impl Classifier for OnnxClassifier {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    fn predict(&self, record: &FeatureRecord) -> Result<u8, InferenceError> {
        self.classify(record).map(|(class, _)| class)
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<f64, InferenceError> {
        self.classify(record).map(|(_, probability)| probability)
    }

    fn classify(&self, record: &FeatureRecord) -> Result<(u8, f64), InferenceError> {
        let outputs = self.run(record)?;
        match outputs.as_slice() {
            [] => Err(run_error("model produced no outputs")),
            [probabilities] => {
                let probability = extract_probability(probabilities)?;
                Ok((u8::from(probability > 0.5), probability))
            }
            [labels, probabilities, ..] => {
                Ok((extract_label(labels)?, extract_probability(probabilities)?))
            }
        }
    }
}

/// In-memory ONNX graphs for tests
#[cfg(test)]
pub(crate) mod fixtures {
    use tract_onnx::pb;

    /// Logistic model on torque: `p = sigmoid(torque - 60)`
    pub const TORQUE_DESCRIPTOR: &str =
        r#"{"model_name": "Torque Logistic", "features": ["Torque [Nm]"]}"#;

    fn float_input(name: &str) -> pb::ValueInfoProto {
        pb::ValueInfoProto {
            name: name.to_string(),
            r#type: Some(pb::TypeProto {
                value: Some(pb::type_proto::Value::TensorType(pb::type_proto::Tensor {
                    elem_type: pb::tensor_proto::DataType::Float as i32,
                    shape: None,
                })),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn output(name: &str) -> pb::ValueInfoProto {
        pb::ValueInfoProto {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn floats(name: &str, dims: Vec<i64>, data: Vec<f32>) -> pb::TensorProto {
        pb::TensorProto {
            name: name.to_string(),
            dims,
            data_type: pb::tensor_proto::DataType::Float as i32,
            float_data: data,
            ..Default::default()
        }
    }

    fn int_attr(name: &str, value: i64) -> pb::AttributeProto {
        pb::AttributeProto {
            name: name.to_string(),
            r#type: pb::attribute_proto::AttributeType::Int as i32,
            i: value,
            ..Default::default()
        }
    }

    fn node(op: &str, inputs: &[&str], outputs: &[&str], attribute: Vec<pb::AttributeProto>) -> pb::NodeProto {
        pb::NodeProto {
            op_type: op.to_string(),
            input: inputs.iter().map(|s| s.to_string()).collect(),
            output: outputs.iter().map(|s| s.to_string()).collect(),
            attribute,
            ..Default::default()
        }
    }

    /// Two-class logistic over torque; `with_label` adds an ArgMax label output
    pub fn torque_model(with_label: bool) -> pb::ModelProto {
        let mut nodes = vec![
            node("MatMul", &["input", "weights"], &["linear"], Vec::new()),
            node("Add", &["linear", "bias"], &["logits"], Vec::new()),
            node("Softmax", &["logits"], &["probabilities"], vec![int_attr("axis", 1)]),
        ];
        let mut outputs = vec![output("probabilities")];
        if with_label {
            nodes.push(node(
                "ArgMax",
                &["logits"],
                &["label"],
                vec![int_attr("axis", 1), int_attr("keepdims", 0)],
            ));
            outputs.insert(0, output("label"));
        }

        pb::ModelProto {
            ir_version: 7,
            opset_import: vec![pb::OperatorSetIdProto {
                domain: String::new(),
                version: 13,
            }],
            graph: Some(pb::GraphProto {
                name: "torque_logistic".to_string(),
                node: nodes,
                initializer: vec![
                    floats("weights", vec![1, 2], vec![0.0, 1.0]),
                    floats("bias", vec![2], vec![0.0, -60.0]),
                ],
                input: vec![float_input("input")],
                output: outputs,
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{torque_model, TORQUE_DESCRIPTOR};
    use super::*;

    fn descriptor() -> ModelDescriptor {
        serde_json::from_str(TORQUE_DESCRIPTOR).unwrap()
    }

    fn torque(value: f64) -> FeatureRecord {
        FeatureRecord::new().with("Torque [Nm]", value)
    }

    #[test]
    fn test_label_and_probability_outputs() {
        let classifier = OnnxClassifier::from_proto(&torque_model(true), descriptor()).unwrap();

        let (class, probability) = classifier.classify(&torque(50.0)).unwrap();
        assert_eq!(class, 0);
        assert!(probability < 1e-3);

        // sigmoid(ln 3) = 0.75
        let (class, probability) = classifier.classify(&torque(60.0 + 3.0_f64.ln())).unwrap();
        assert_eq!(class, 1);
        assert!((probability - 0.75).abs() < 1e-4);

        assert_eq!(classifier.predict(&torque(70.0)).unwrap(), 1);
        assert!(classifier.predict_proba(&torque(70.0)).unwrap() > 0.999);
    }

    #[test]
    fn test_probability_only_export() {
        let classifier = OnnxClassifier::from_proto(&torque_model(false), descriptor()).unwrap();

        let (class, probability) = classifier.classify(&torque(60.0 - 3.0_f64.ln())).unwrap();
        assert_eq!(class, 0);
        assert!((probability - 0.25).abs() < 1e-4);
        assert_eq!(classifier.predict(&torque(65.0)).unwrap(), 1);
    }

    #[test]
    fn test_missing_input_column() {
        let classifier = OnnxClassifier::from_proto(&torque_model(true), descriptor()).unwrap();
        let record = FeatureRecord::new().with("Tool wear [min]", 10.0);
        assert!(matches!(
            classifier.classify(&record),
            Err(InferenceError::MissingFeature(column)) if column == "Torque [Nm]"
        ));
    }

    #[test]
    fn test_width_mismatch_rejected_at_load() {
        // Two input columns against a [1, 2] weight matrix that expects one
        let descriptor: ModelDescriptor =
            serde_json::from_str(r#"{"features": ["Torque [Nm]", "Tool wear [min]"]}"#).unwrap();
        let result = OnnxClassifier::from_proto(&torque_model(true), descriptor);
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_missing_model_file() {
        let descriptor: ModelDescriptor =
            serde_json::from_str(r#"{"features": ["Torque [Nm]"]}"#).unwrap();
        let result = OnnxClassifier::load(Path::new("/nonexistent/model.onnx"), descriptor);
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_invalid_descriptor_rejected_before_load() {
        let descriptor: ModelDescriptor = serde_json::from_str(
            r#"{"features": [], "categorical": [{"column": "Type", "levels": []}]}"#,
        )
        .unwrap();
        let result = OnnxClassifier::load(Path::new("/nonexistent/model.onnx"), descriptor);
        assert!(matches!(result, Err(InferenceError::InvalidArtifact(_))));
    }
}
