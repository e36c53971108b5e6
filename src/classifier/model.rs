use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::Deserialize;

use super::{ClassifierError, ModelError, PeakClassifier, PeakTensor, TensorShape};
use crate::label::{Label, LabelSet, HIGH_QUALITY, LOW_QUALITY};

#[derive(Debug, Deserialize)]
struct LinearModelArtifact {
    labels: Vec<Label>,
    #[serde(default)]
    graded: Option<(Label, Label)>,
    input_len: usize,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

/// Softmax-over-linear-scores classifier loaded from a JSON artifact
///
/// ```json
/// {
///   "labels": ["High_quality", "Low_quality", "Noise"],
///   "graded": ["High_quality", "Low_quality"],
///   "input_len": 120,
///   "weights": [[...], [...], [...]],
///   "bias": [0.0, 0.0, 0.0]
/// }
/// ```
///
/// `graded` is optional and defaults to `High_quality`/`Low_quality` when
/// both are present.
#[derive(Debug, Clone)]
pub struct LinearModel {
    labels: LabelSet,
    input_len: usize,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl LinearModel {
    /// Build a model, checking that weights and bias match the labels
    pub fn new(
        labels: LabelSet,
        input_len: usize,
        weights: Vec<Vec<f32>>,
        bias: Vec<f32>,
    ) -> Result<Self, ModelError> {
        if input_len == 0 {
            return Err(ModelError::Inconsistent("input_len must be positive".into()));
        }
        if weights.len() != labels.len() || bias.len() != labels.len() {
            return Err(ModelError::Inconsistent(format!(
                "{} labels but {} weight rows and {} bias values",
                labels.len(),
                weights.len(),
                bias.len()
            )));
        }
        if let Some((class, row)) = weights.iter().enumerate().find(|(_, r)| r.len() != input_len) {
            return Err(ModelError::Inconsistent(format!(
                "weight row {} has {} values, expected {}",
                class,
                row.len(),
                input_len
            )));
        }
        let finite = weights.iter().flatten().chain(&bias).all(|v| v.is_finite());
        if !finite {
            return Err(ModelError::Inconsistent("non-finite parameter".into()));
        }

        Ok(Self {
            labels,
            input_len,
            weights,
            bias,
        })
    }

    /// Load a model artifact from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let model = Self::from_json_reader(BufReader::new(File::open(path)?))?;
        info!(
            "Loaded linear model from {} ({} classes, input {})",
            path.display(),
            model.labels.len(),
            model.input_len
        );
        Ok(model)
    }

    /// Load a model artifact from any reader
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let artifact: LinearModelArtifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact)
    }

    /// Parse a model artifact from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let artifact: LinearModelArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: LinearModelArtifact) -> Result<Self, ModelError> {
        let mut labels = LabelSet::new(artifact.labels)?;
        match artifact.graded {
            Some((hi, lo)) => labels = labels.with_graded(&hi, &lo)?,
            None => {
                let (hi, lo) = (Label::new(HIGH_QUALITY), Label::new(LOW_QUALITY));
                if labels.contains(&hi) && labels.contains(&lo) {
                    labels = labels.with_graded(&hi, &lo)?;
                }
            }
        }
        Self::new(labels, artifact.input_len, artifact.weights, artifact.bias)
    }

    /// Class probabilities for one input vector
    pub fn scores(&self, input: &[f32]) -> Vec<f32> {
        let logits: Vec<f32> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect();
        softmax(&logits)
    }
}

impl PeakClassifier for LinearModel {
    fn labels(&self) -> &LabelSet {
        &self.labels
    }

    fn input_shape(&self) -> TensorShape {
        TensorShape::new(1, self.input_len)
    }

    fn predict_batch(&self, batch: &[PeakTensor]) -> Result<Vec<Vec<f32>>, ClassifierError> {
        batch
            .iter()
            .map(|tensor| {
                if tensor.data().len() != self.input_len {
                    return Err(ClassifierError::ShapeMismatch {
                        expected: self.input_shape(),
                        actual: tensor.shape(),
                    });
                }
                Ok(self.scores(tensor.data()))
            })
            .collect()
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.into_iter().map(|v| v / sum).collect()
}
