//! # Experiment
//!
//! The [`Experiment`] is the context object tying everything together: it
//! owns the [`SampleRegistry`], the model's [`LabelSet`] and the consensus
//! features built from one or more feature tables.
//!
//! ```text
//! ConsensusFeature (one table row)
//! └── Feature (one per sample with a present block)
//!     └── Peak (resolved EIC or resolution error, prediction, annotation)
//! ```
//!
//! Entities are append-only. After the build, only predictions and
//! annotations change.

mod annotation;
mod builder;
mod model;
mod summary;

#[cfg(test)]
mod tests;

use std::io::Read;
use std::path::Path;

use log::info;

pub use annotation::{AnnotationError, AnnotationReport};
pub use builder::{BuildReport, HierarchyBuilder};
pub use model::{ConsensusFeature, ConsensusId, Feature, Peak, PeakSignal, Prediction};
pub use summary::ExperimentSummary;

use crate::feature_table::{FeatureTable, FeatureTableError, FeatureTableLoader};
use crate::label::LabelSet;
use crate::sample::{SampleId, SampleRegistry};

/// Samples, labels and the consensus feature hierarchy of one analysis
#[derive(Debug, Clone)]
pub struct Experiment {
    registry: SampleRegistry,
    labels: LabelSet,
    consensus: Vec<ConsensusFeature>,
}

impl Experiment {
    /// Experiment over `registry` using the default three-class label set
    pub fn new(registry: SampleRegistry) -> Self {
        Self::with_labels(registry, LabelSet::default())
    }

    /// Experiment with a custom label set
    pub fn with_labels(registry: SampleRegistry, labels: LabelSet) -> Self {
        Self {
            registry,
            labels,
            consensus: Vec::new(),
        }
    }

    /// Load a feature table from disk and build its hierarchy
    pub fn load_feature_table<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<BuildReport, FeatureTableError> {
        let table = FeatureTableLoader::new(&self.registry).load_path(path)?;
        Ok(self.build(table))
    }

    /// Load a feature table from a reader and build its hierarchy
    pub fn load_feature_table_from_reader<R: Read>(
        &mut self,
        reader: R,
    ) -> Result<BuildReport, FeatureTableError> {
        let table = FeatureTableLoader::new(&self.registry).load_reader(reader)?;
        Ok(self.build(table))
    }

    /// Append the consensus features of an already loaded table
    pub fn build(&mut self, table: FeatureTable) -> BuildReport {
        let report = HierarchyBuilder::new(&self.registry).extend(&mut self.consensus, table.rows);
        info!("{}", report);
        report
    }

    /// Sample registry
    pub fn registry(&self) -> &SampleRegistry {
        &self.registry
    }

    /// Classes known to this experiment
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// All consensus features, in file order
    pub fn consensus_features(&self) -> &[ConsensusFeature] {
        &self.consensus
    }

    /// Consensus feature by id
    pub fn consensus(&self, id: ConsensusId) -> Option<&ConsensusFeature> {
        self.consensus.get(id.index())
    }

    /// Feature of one sample within a consensus feature
    pub fn feature(&self, id: ConsensusId, sample: SampleId) -> Option<&Feature> {
        self.consensus(id)?.feature(sample)
    }

    /// Mutable access to a feature, e.g. for manual curation
    pub fn feature_mut(&mut self, id: ConsensusId, sample: SampleId) -> Option<&mut Feature> {
        self.consensus.get_mut(id.index())?.feature_mut(sample)
    }

    pub(crate) fn consensus_mut(&mut self) -> &mut [ConsensusFeature] {
        &mut self.consensus
    }
}
