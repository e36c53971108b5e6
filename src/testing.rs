//! Fixtures shared by unit tests

use crate::classifier::{ClassifierError, PeakClassifier, PeakTensor, TensorShape};
use crate::experiment::{ConsensusId, Experiment, Prediction};
use crate::feature_table::{BlockField, ROW_MZ_COLUMN, ROW_RT_COLUMN};
use crate::label::{Label, LabelSet};
use crate::sample::{Sample, SampleId, SampleRegistry, Scan, Trace};

/// Gaussian peak at RT 5.0 min on m/z 100, scans every 0.05 min over 0..10
pub(crate) fn gaussian_trace(amplitude: f64) -> Trace {
    let scans = (0..=200)
        .map(|i| {
            let rt = i as f64 * 0.05;
            let apex = amplitude * (-((rt - 5.0) / 0.1).powi(2) / 2.0).exp();
            Scan::new(rt, vec![100.0, 200.0], vec![apex, 1.0])
        })
        .collect();
    Trace::new(scans)
}

/// Registry of samples with the given peak amplitudes
pub(crate) fn registry(samples: &[(&str, f64)]) -> SampleRegistry {
    let mut registry = SampleRegistry::new();
    for (name, amplitude) in samples {
        registry
            .insert(Sample::new(*name, gaussian_trace(*amplitude)))
            .unwrap();
    }
    registry
}

/// Content of one sample block in a fixture row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cell {
    /// All-zero block
    Missing,
    /// Block resolving inside the trace
    Valid,
    /// Block whose RT window lies past the end of the trace
    Invalid,
}

fn block(cell: Cell) -> String {
    match cell {
        Cell::Missing => "0,0,0,0,0,0,0,0".to_string(),
        Cell::Valid => "100.0,5.0,4.8,5.2,1000,150,99.99,100.01".to_string(),
        Cell::Invalid => "100.0,20.0,19.8,20.2,1000,150,99.99,100.01".to_string(),
    }
}

/// CSV feature table with an area column, one row per `rows` entry
pub(crate) fn table_csv(samples: &[&str], rows: &[Vec<Cell>]) -> String {
    let mut header = vec![ROW_MZ_COLUMN.to_string(), ROW_RT_COLUMN.to_string()];
    for sample in samples {
        for field in BlockField::ALL {
            header.push(format!("{} {}", sample, field.suffix()));
        }
    }
    let mut csv = header.join(",");
    csv.push('\n');
    for (i, cells) in rows.iter().enumerate() {
        csv.push_str(&format!("{},5.0", 100.0 + i as f64));
        for cell in cells {
            csv.push(',');
            csv.push_str(&block(*cell));
        }
        csv.push('\n');
    }
    csv
}

/// Experiment over peak-carrying samples built from `rows`
pub(crate) fn experiment(samples: &[&str], rows: &[Vec<Cell>]) -> Experiment {
    let with_amplitude: Vec<(&str, f64)> = samples.iter().map(|s| (*s, 1e5)).collect();
    let mut experiment = Experiment::new(registry(&with_amplitude));
    experiment
        .load_feature_table_from_reader(table_csv(samples, rows).as_bytes())
        .unwrap();
    experiment
}

pub(crate) fn sample(experiment: &Experiment, name: &str) -> SampleId {
    experiment.registry().find(name).unwrap()
}

/// Write a prediction directly onto a peak
pub(crate) fn predict(experiment: &mut Experiment, index: usize, sample_name: &str, label: &str) {
    let id = sample(experiment, sample_name);
    experiment
        .feature_mut(ConsensusId::new(index), id)
        .unwrap()
        .peak_mut()
        .set_prediction(Some(Prediction {
            label: Label::new(label),
            confidence: 0.9,
        }));
}

/// Write an annotation directly onto a peak
pub(crate) fn annotate(experiment: &mut Experiment, index: usize, sample_name: &str, label: &str) {
    let id = sample(experiment, sample_name);
    experiment
        .feature_mut(ConsensusId::new(index), id)
        .unwrap()
        .peak_mut()
        .set_annotation(Some(Label::new(label)));
}

/// Deterministic classifier: flat tensors look like noise, anything else
/// like a good peak. Fails batches of one configured size.
pub(crate) struct StubClassifier {
    pub labels: LabelSet,
    pub shape: TensorShape,
    pub fail_on_batch_len: Option<usize>,
    pub peak_scores: Vec<f32>,
}

impl Default for StubClassifier {
    fn default() -> Self {
        Self {
            labels: LabelSet::default(),
            shape: TensorShape::new(1, 120),
            fail_on_batch_len: None,
            peak_scores: vec![0.6, 0.3, 0.1],
        }
    }
}

impl PeakClassifier for StubClassifier {
    fn labels(&self) -> &LabelSet {
        &self.labels
    }

    fn input_shape(&self) -> TensorShape {
        self.shape
    }

    fn predict_batch(&self, batch: &[PeakTensor]) -> Result<Vec<Vec<f32>>, ClassifierError> {
        if self.fail_on_batch_len == Some(batch.len()) {
            return Err(ClassifierError::Unavailable("stub failure".to_string()));
        }
        Ok(batch
            .iter()
            .map(|tensor| {
                if tensor.data().iter().all(|&v| v == 0.0) {
                    vec![0.1, 0.1, 0.8]
                } else {
                    self.peak_scores.clone()
                }
            })
            .collect())
    }
}
