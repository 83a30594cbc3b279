//! Random-forest classifier loaded from a JSON export

use crate::classifier::{Classifier, ModelDescriptor};
use crate::encoder::FeatureEncoder;
use crate::InferenceError;
use feature_engine::FeatureRecord;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// On-disk forest layout: descriptor fields plus the trees
#[derive(Debug, Deserialize)]
struct ForestArtifact {
    #[serde(flatten)]
    descriptor: ModelDescriptor,
    trees: Vec<TreeSpec>,
}

#[derive(Debug, Deserialize)]
struct TreeSpec {
    nodes: Vec<NodeSpec>,
}

/// A split sends `x[feature] <= threshold` left; a leaf holds the class
/// counts (or fractions) for `[no failure, failure]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeSpec {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        failure: f64,
    },
}

/// Binary random forest evaluated in-process
pub struct ForestClassifier {
    descriptor: ModelDescriptor,
    encoder: FeatureEncoder,
    trees: Vec<Vec<Node>>,
}

impl ForestClassifier {
    /// Load a forest export from disk
    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        })?;
        let forest = Self::from_json(&text)?;
        info!(
            "Loaded forest '{}' from {} ({} trees)",
            forest.descriptor.model_name,
            path.display(),
            forest.trees.len()
        );
        Ok(forest)
    }

    /// Parse and validate a forest export
    pub fn from_json(text: &str) -> Result<Self, InferenceError> {
        let artifact: ForestArtifact = serde_json::from_str(text)
            .map_err(|e| InferenceError::InvalidArtifact(e.to_string()))?;

        let encoder = FeatureEncoder::new(&artifact.descriptor)?;
        if artifact.trees.is_empty() {
            return Err(InferenceError::InvalidArtifact("forest has no trees".to_string()));
        }

        let trees = artifact
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| build_tree(i, tree, encoder.width()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            descriptor: artifact.descriptor,
            encoder,
            trees,
        })
    }

    /// Number of trees
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Mean failure probability over all trees
    fn failure_probability(&self, record: &FeatureRecord) -> Result<f64, InferenceError> {
        let input = self.descriptor.preprocessing.apply(record);
        let x = self.encoder.encode(&input)?;

        let total: f64 = self.trees.iter().map(|tree| evaluate(tree, &x)).sum();
        let probability = total / self.trees.len() as f64;
        debug!("Forest probability {:.4} over {} trees", probability, self.trees.len());
        Ok(probability)
    }
}

impl Classifier for ForestClassifier {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    fn predict(&self, record: &FeatureRecord) -> Result<u8, InferenceError> {
        // argmax over [1 - p, p]; ties go to class 0
        let probability = self.failure_probability(record)?;
        Ok(u8::from(probability > 0.5))
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<f64, InferenceError> {
        self.failure_probability(record)
    }

    fn classify(&self, record: &FeatureRecord) -> Result<(u8, f64), InferenceError> {
        let probability = self.failure_probability(record)?;
        Ok((u8::from(probability > 0.5), probability))
    }
}

fn build_tree(index: usize, tree: TreeSpec, width: usize) -> Result<Vec<Node>, InferenceError> {
    let invalid = |msg: String| InferenceError::InvalidArtifact(format!("tree {}: {}", index, msg));
    let len = tree.nodes.len();
    if len == 0 {
        return Err(invalid("no nodes".to_string()));
    }

    tree.nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| match node {
            NodeSpec::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature >= width {
                    return Err(invalid(format!(
                        "node {} splits on feature {} but inputs have width {}",
                        i, feature, width
                    )));
                }
                // Children must come after their parent, which rules out cycles
                if left <= i || right <= i || left >= len || right >= len {
                    return Err(invalid(format!("node {} has invalid children", i)));
                }
                Ok(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                })
            }
            NodeSpec::Leaf { value } => {
                if value.len() != 2 || value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(invalid(format!("leaf {} must hold two non-negative values", i)));
                }
                let total = value[0] + value[1];
                if total <= 0.0 {
                    return Err(invalid(format!("leaf {} is empty", i)));
                }
                Ok(Node::Leaf {
                    failure: value[1] / total,
                })
            }
        })
        .collect()
}

fn evaluate(nodes: &[Node], x: &[f64]) -> f64 {
    let mut index = 0;
    loop {
        match &nodes[index] {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                index = if x[*feature] <= *threshold { *left } else { *right };
            }
            Node::Leaf { failure } => return *failure,
        }
    }
}
