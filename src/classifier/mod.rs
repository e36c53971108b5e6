//! # Classifier Adapter
//!
//! Peak classification is an injected capability. Anything implementing
//! [`PeakClassifier`] can label an [`Experiment`](crate::experiment::Experiment):
//!
//! ```text
//! valid peaks of one sample ──► PeakFeaturizer ──► [PeakTensor] ──► PeakClassifier
//!                                                                       │ scores
//!                          Peak::prediction ◄── decide(threshold) ◄─────┘
//! ```
//!
//! Batches are strictly per sample and invalid peaks are never submitted.
//! With the `parallel` feature the batches are featurized and scored on the
//! rayon thread pool; results are written back afterwards, partitioned by
//! sample.
//!
//! [`LinearModel`] is a small JSON-backed classifier so the pipeline runs
//! end to end without an external inference runtime.

mod decision;
mod error;
mod model;
mod predict;
mod tensor;


pub use decision::{decide, validate_threshold};
pub use error::{ClassifierError, ModelError};
pub use model::LinearModel;
pub use predict::{BatchFailure, PredictionReport};
pub use tensor::{PeakFeaturizer, PeakTensor, TensorShape, DEFAULT_TENSOR_WIDTH};

use crate::label::LabelSet;

/// Scores batches of peak tensors
pub trait PeakClassifier: Send + Sync {
    /// Classes in score order
    fn labels(&self) -> &LabelSet;

    /// Shape every input tensor must have
    fn input_shape(&self) -> TensorShape;

    /// One score vector per tensor, in input order
    fn predict_batch(&self, batch: &[PeakTensor]) -> Result<Vec<Vec<f32>>, ClassifierError>;
}
