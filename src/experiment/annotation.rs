use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::Deserialize;

use super::{ConsensusId, Experiment};
use crate::label::{Label, LabelError};

/// Errors that can occur while applying manual annotations
#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    /// I/O error reading the annotation file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Sample not registered in the experiment
    #[error("Unknown sample '{sample}' (line {line})")]
    UnknownSample {
        /// 1-based line
        line: u64,
        /// Sample name as written
        sample: String,
    },

    /// Consensus index beyond the built hierarchy
    #[error("Unknown consensus feature {index} (line {line})")]
    UnknownConsensus {
        /// 1-based line
        line: u64,
        /// Index as written
        index: usize,
    },

    /// The sample has no feature for that consensus feature
    #[error("Consensus feature {index} has no feature in sample '{sample}' (line {line})")]
    NoFeature {
        /// 1-based line
        line: u64,
        /// Consensus index
        index: usize,
        /// Sample name
        sample: String,
    },

    /// Label outside the experiment's label set
    #[error("Invalid label on line {line}: {source}")]
    InvalidLabel {
        /// 1-based line
        line: u64,
        /// Underlying label error
        #[source]
        source: LabelError,
    },
}

/// Counts from an annotation import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    /// Peaks that received a label
    pub annotated: usize,
    /// Peaks whose label was cleared (empty label cell)
    pub cleared: usize,
}

#[derive(Debug, Deserialize)]
struct AnnotationRecord {
    consensus_index: usize,
    sample: String,
    #[serde(default)]
    label: String,
}

impl Experiment {
    /// Apply manual labels from a CSV file with the header
    /// `consensus_index,sample,label`
    ///
    /// An empty label clears the annotation. The whole file is validated
    /// before any peak is touched.
    pub fn load_annotations<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<AnnotationReport, AnnotationError> {
        let file = File::open(path)?;
        self.load_annotations_from_reader(BufReader::new(file))
    }

    /// Apply manual labels from any reader
    pub fn load_annotations_from_reader<R: Read>(
        &mut self,
        reader: R,
    ) -> Result<AnnotationReport, AnnotationError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut pending = Vec::new();
        for result in csv_reader.records() {
            let raw = result?;
            let line = raw.position().map(|p| p.line()).unwrap_or(0);
            let record: AnnotationRecord = raw.deserialize(Some(&headers))?;

            let sample = self.registry().find(&record.sample).ok_or_else(|| {
                AnnotationError::UnknownSample {
                    line,
                    sample: record.sample.clone(),
                }
            })?;
            let id = ConsensusId::new(record.consensus_index);
            let consensus = self.consensus(id).ok_or(AnnotationError::UnknownConsensus {
                line,
                index: record.consensus_index,
            })?;
            if consensus.feature(sample).is_none() {
                return Err(AnnotationError::NoFeature {
                    line,
                    index: record.consensus_index,
                    sample: record.sample,
                });
            }

            let label = if record.label.is_empty() {
                None
            } else {
                let label = Label::new(record.label);
                self.labels()
                    .require(&label)
                    .map_err(|source| AnnotationError::InvalidLabel { line, source })?;
                Some(label)
            };
            pending.push((id, sample, label));
        }

        let mut report = AnnotationReport::default();
        for (id, sample, label) in pending {
            if label.is_some() {
                report.annotated += 1;
            } else {
                report.cleared += 1;
            }
            if let Some(feature) = self.feature_mut(id, sample) {
                feature.peak_mut().set_annotation(label);
            }
        }
        info!(
            "Applied {} annotations ({} cleared)",
            report.annotated, report.cleared
        );
        Ok(report)
    }
}
