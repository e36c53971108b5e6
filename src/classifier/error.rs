use super::TensorShape;
use crate::label::LabelError;

/// Errors raised by classification
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Threshold outside the open interval (0, 1)
    #[error("Threshold must lie strictly between 0 and 1, got {0}")]
    InvalidThreshold(f32),

    /// Featurizer and classifier disagree on the tensor shape
    #[error("Classifier expects input shape {expected}, featurizer produces {actual}")]
    ShapeMismatch {
        /// Shape the classifier consumes
        expected: TensorShape,
        /// Shape the featurizer produces
        actual: TensorShape,
    },

    /// Classifier classes differ from the experiment's label set
    #[error("Classifier labels [{classifier}] do not match experiment labels [{experiment}]")]
    LabelMismatch {
        /// Experiment classes, comma separated
        experiment: String,
        /// Classifier classes, comma separated
        classifier: String,
    },

    /// Inference backend failed for a batch
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    /// Classifier returned a malformed result
    #[error("Expected {expected} score values, got {actual}")]
    ScoreLength {
        /// Expected number of values
        expected: usize,
        /// Values returned
        actual: usize,
    },
}

/// Errors raised while loading a model artifact
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// I/O error reading the artifact
    #[error("Failed to read model: {0}")]
    IoError(#[from] std::io::Error),

    /// Artifact is not valid JSON for a linear model
    #[error("Invalid model JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Labels, weights and bias disagree
    #[error("Inconsistent model: {0}")]
    Inconsistent(String),

    /// Label list is not a valid label set
    #[error("Invalid model labels: {0}")]
    Label(#[from] LabelError),
}
