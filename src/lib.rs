//! # peakqc - Peak Quality Classification for Untargeted Metabolomics
//!
//! `peakqc` reconciles an aligned feature table (as exported by mzMine and
//! similar tools) with the raw MS1 traces of each sample, classifies every
//! chromatographic peak with a pre-trained model and exports filtered,
//! reshaped result tables for downstream statistics.
//!
//! ## Key Features
//!
//! - **Typed hierarchy**: consensus features own per-sample features, which own
//!   peaks. A missing value block and a present-but-unresolvable peak are
//!   different states, not sentinel values.
//!
//! - **Injected classifier**: anything implementing
//!   [`classifier::PeakClassifier`] can label peaks. Batches are per sample and
//!   a failing batch degrades to unlabeled peaks instead of aborting the run.
//!
//! - **One filtering path**: the in-memory [`export::ExportTable`] and the CSV
//!   writer share the same group filter, class filter and sample exclusion.
//!
//! - **Atomic output**: CSV exports are written to a temporary file and moved
//!   into place once complete.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use peakqc::classifier::LinearModel;
//! use peakqc::experiment::Experiment;
//! use peakqc::export::{CsvOptions, ExportConfig};
//! use peakqc::sample::SampleRegistry;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = SampleRegistry::from_mzml_dir("raw/")?;
//! let mut experiment = Experiment::new(registry);
//! experiment.load_feature_table("features.csv")?;
//!
//! let model = LinearModel::from_json_file("model.json")?;
//! let report = experiment.predict(&model, 0.22)?;
//! println!("{}", report);
//!
//! let summary = experiment.export_to_csv("peaks.csv", &ExportConfig::default(), &CsvOptions::default())?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`label`]: peak quality classes and model label sets
//! - [`sample`]: sample registry, MS1 traces and EIC extraction
//! - [`mzml`]: streaming MS1 reader for mzML raw files
//! - [`feature_table`]: feature-table schema validation and parsing
//! - [`experiment`]: the hierarchy, annotations and diagnostics
//! - [`classifier`]: featurization, classifier trait and decision rule
//! - [`export`]: filters, reshaping and CSV output

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod classifier;
pub mod experiment;
pub mod export;
pub mod feature_table;
pub mod label;
#[cfg(feature = "mzml")]
pub mod mzml;
pub mod sample;

#[cfg(test)]
pub(crate) mod testing;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::classifier::{
        ClassifierError, LinearModel, PeakClassifier, PeakFeaturizer, PeakTensor,
        PredictionReport, TensorShape,
    };
    pub use crate::experiment::{
        BuildReport, ConsensusFeature, ConsensusId, Experiment, ExperimentSummary, Feature,
        Peak, PeakSignal, Prediction,
    };
    pub use crate::export::{
        CsvOptions, ExportConfig, ExportError, ExportProperty, ExportSummary, ExportTable,
        Granularity,
    };
    pub use crate::feature_table::{FeatureTable, FeatureTableError, FeatureTableLoader};
    pub use crate::label::{Label, LabelSet};
    pub use crate::sample::{Sample, SampleId, SampleRegistry, Trace};
}
