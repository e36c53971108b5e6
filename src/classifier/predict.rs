use std::fmt;

use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{decide, validate_threshold, ClassifierError, PeakClassifier, PeakFeaturizer, PeakTensor};
use crate::experiment::{ConsensusId, Experiment, Prediction};
use crate::sample::SampleId;

/// A per-sample batch the classifier rejected
#[derive(Debug)]
pub struct BatchFailure {
    /// Sample whose peaks stay unlabeled
    pub sample: SampleId,
    /// Peaks in the batch
    pub peaks: usize,
    /// Classifier error
    pub error: ClassifierError,
}

/// Outcome of a prediction pass
#[derive(Debug, Default)]
pub struct PredictionReport {
    /// Non-empty per-sample batches submitted
    pub batches: usize,
    /// Peaks that received a prediction
    pub labeled_peaks: usize,
    /// Batches that failed
    pub failures: Vec<BatchFailure>,
}

impl PredictionReport {
    /// Whether every batch succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Peaks left unlabeled by failed batches
    pub fn unlabeled_peaks(&self) -> usize {
        self.failures.iter().map(|f| f.peaks).sum()
    }
}

impl fmt::Display for PredictionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Labeled {} peaks in {} batches ({} failed, {} peaks unlabeled)",
            self.labeled_peaks,
            self.batches,
            self.failures.len(),
            self.unlabeled_peaks()
        )
    }
}

/// Location of one peak: consensus feature and peak position in its feature
type PeakRef = (ConsensusId, usize);

struct Batch {
    sample: SampleId,
    targets: Vec<PeakRef>,
    tensors: Vec<PeakTensor>,
}

impl Experiment {
    /// Classify every valid peak with the default featurizer
    ///
    /// Re-running replaces earlier predictions.
    pub fn predict<C>(&mut self, classifier: &C, threshold: f32) -> Result<PredictionReport, ClassifierError>
    where
        C: PeakClassifier + ?Sized,
    {
        self.predict_with(classifier, &PeakFeaturizer::default(), threshold)
    }

    /// Classify every valid peak, one batch per sample
    ///
    /// Threshold, labels and tensor shape are checked before any batch is
    /// submitted. A failing batch leaves its peaks unlabeled and is recorded
    /// in the report; the remaining batches still run.
    pub fn predict_with<C>(
        &mut self,
        classifier: &C,
        featurizer: &PeakFeaturizer,
        threshold: f32,
    ) -> Result<PredictionReport, ClassifierError>
    where
        C: PeakClassifier + ?Sized,
    {
        validate_threshold(threshold)?;
        if !classifier.labels().iter().eq(self.labels().iter()) {
            let join = |labels: &crate::label::LabelSet| {
                labels.iter().map(|l| l.as_str()).collect::<Vec<_>>().join(", ")
            };
            return Err(ClassifierError::LabelMismatch {
                experiment: join(self.labels()),
                classifier: join(classifier.labels()),
            });
        }
        if classifier.input_shape() != featurizer.shape() {
            return Err(ClassifierError::ShapeMismatch {
                expected: classifier.input_shape(),
                actual: featurizer.shape(),
            });
        }

        let samples: Vec<SampleId> = self.registry().ids().collect();
        #[cfg(feature = "parallel")]
        let outcomes: Vec<(Batch, Result<Vec<Prediction>, ClassifierError>)> = samples
            .par_iter()
            .map(|&sample| {
                let batch = self.collect_batch(sample, featurizer);
                let outcome = run_batch(classifier, &batch, threshold);
                (batch, outcome)
            })
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<(Batch, Result<Vec<Prediction>, ClassifierError>)> = samples
            .iter()
            .map(|&sample| {
                let batch = self.collect_batch(sample, featurizer);
                let outcome = run_batch(classifier, &batch, threshold);
                (batch, outcome)
            })
            .collect();

        let mut report = PredictionReport::default();
        for (batch, outcome) in outcomes {
            if batch.targets.is_empty() {
                continue;
            }
            report.batches += 1;
            match outcome {
                Ok(predictions) => {
                    report.labeled_peaks += predictions.len();
                    for (target, prediction) in batch.targets.iter().zip(predictions) {
                        self.write_prediction(batch.sample, *target, Some(prediction));
                    }
                }
                Err(error) => {
                    warn!(
                        "Classifier failed for sample {}: {}",
                        self.registry().get(batch.sample).name(),
                        error
                    );
                    for target in &batch.targets {
                        self.write_prediction(batch.sample, *target, None);
                    }
                    report.failures.push(BatchFailure {
                        sample: batch.sample,
                        peaks: batch.targets.len(),
                        error,
                    });
                }
            }
        }

        info!("{}", report);
        Ok(report)
    }

    fn collect_batch(&self, sample: SampleId, featurizer: &PeakFeaturizer) -> Batch {
        let mut batch = Batch {
            sample,
            targets: Vec::new(),
            tensors: Vec::new(),
        };
        for consensus in self.consensus_features() {
            let Some(feature) = consensus.feature(sample) else {
                continue;
            };
            let window = feature.window();
            for (position, peak) in feature.peaks().iter().enumerate() {
                if let Some(eic) = peak.eic() {
                    batch.targets.push((consensus.id(), position));
                    batch.tensors.push(featurizer.featurize(&window, eic));
                }
            }
        }
        batch
    }

    fn write_prediction(&mut self, sample: SampleId, (id, position): PeakRef, prediction: Option<Prediction>) {
        let peak = self
            .consensus_mut()
            .get_mut(id.index())
            .and_then(|c| c.feature_mut(sample))
            .and_then(|f| f.peaks_mut().get_mut(position));
        if let Some(peak) = peak {
            peak.set_prediction(prediction);
        }
    }
}

fn run_batch<C>(classifier: &C, batch: &Batch, threshold: f32) -> Result<Vec<Prediction>, ClassifierError>
where
    C: PeakClassifier + ?Sized,
{
    if batch.tensors.is_empty() {
        return Ok(Vec::new());
    }
    let scores = classifier.predict_batch(&batch.tensors)?;
    if scores.len() != batch.tensors.len() {
        return Err(ClassifierError::ScoreLength {
            expected: batch.tensors.len(),
            actual: scores.len(),
        });
    }
    scores
        .iter()
        .map(|s| decide(classifier.labels(), s, threshold))
        .collect()
}
