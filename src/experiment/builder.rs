use std::fmt;

use log::debug;

use super::{ConsensusFeature, ConsensusId, Feature, Peak};
use crate::feature_table::RawRow;
use crate::sample::SampleRegistry;

/// Counts from a hierarchy build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Consensus features created (one per row)
    pub consensus_features: usize,
    /// Features created (present sample blocks)
    pub features: usize,
    /// Peaks resolved against their trace
    pub valid_peaks: usize,
    /// Peaks that could not be resolved
    pub invalid_peaks: usize,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Built {} consensus features ({} features, {} valid peaks, {} invalid)",
            self.consensus_features, self.features, self.valid_peaks, self.invalid_peaks
        )
    }
}

/// Turns feature-table rows into consensus features
pub struct HierarchyBuilder<'a> {
    registry: &'a SampleRegistry,
}

impl<'a> HierarchyBuilder<'a> {
    /// Builder resolving peaks against `registry`
    pub fn new(registry: &'a SampleRegistry) -> Self {
        Self { registry }
    }

    /// Build one consensus feature from a row
    ///
    /// Present blocks become a feature with one peak; missing blocks yield
    /// nothing. A peak window that cannot be resolved marks the peak invalid.
    pub fn build_row(&self, id: ConsensusId, row: &RawRow, report: &mut BuildReport) -> ConsensusFeature {
        let mut consensus = ConsensusFeature::new(id, row.mz, row.rt);

        for (sample, block) in self.registry.ids().zip(&row.blocks) {
            let Some(block) = block else {
                continue;
            };

            let trace = self.registry.get(sample).trace();
            let peak = match trace.extract(&block.window()) {
                Ok(eic) => {
                    report.valid_peaks += 1;
                    Peak::resolved(eic)
                }
                Err(reason) => {
                    debug!(
                        "Consensus {} in sample {}: {}",
                        id.index(),
                        self.registry.get(sample).name(),
                        reason
                    );
                    report.invalid_peaks += 1;
                    Peak::unresolved(reason)
                }
            };

            if consensus.insert(Feature::new(sample, id, *block, peak)) {
                report.features += 1;
            }
        }

        report.consensus_features += 1;
        consensus
    }

    /// Append one consensus feature per row to `out`, in row order
    ///
    /// Features are pushed as they are built, so stopping early keeps
    /// everything built so far.
    pub fn extend<I>(&self, out: &mut Vec<ConsensusFeature>, rows: I) -> BuildReport
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut report = BuildReport::default();
        for row in rows {
            let id = ConsensusId::new(out.len());
            let consensus = self.build_row(id, &row, &mut report);
            out.push(consensus);
        }
        report
    }
}
