use std::collections::HashSet;
use std::fmt;

use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::error::invalid;
use super::{ExportConfig, ExportError, ExportProperty, Granularity};
use crate::experiment::{ConsensusFeature, ConsensusId, Experiment, Feature};
use crate::label::Label;
use crate::sample::SampleId;

/// A single exported value
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    /// Floating-point measurement
    Number(f64),
    /// Index or count
    Integer(u64),
    /// Label or sample name
    Text(String),
}

impl fmt::Display for ExportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportValue::Number(v) => write!(f, "{}", v),
            ExportValue::Integer(v) => write!(f, "{}", v),
            ExportValue::Text(v) => f.write_str(v),
        }
    }
}

/// One output row
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    /// Consensus feature the row was derived from
    pub consensus: ConsensusId,
    /// Values aligned with [`ExportTable::columns`]; `None` is missing
    pub cells: Vec<Option<ExportValue>>,
}

/// Counts from an export pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Consensus features passing the group filter
    pub retained: usize,
    /// Consensus features dropped by the group filter
    pub dropped: usize,
    /// Rows emitted
    pub rows: usize,
    /// Per-sample cells rendered missing
    pub missing_cells: usize,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exported {} rows ({} consensus features retained, {} dropped, {} missing cells)",
            self.rows, self.retained, self.dropped, self.missing_cells
        )
    }
}

/// Filtered, reshaped view of an experiment
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    columns: Vec<String>,
    rows: Vec<ExportRow>,
    summary: ExportSummary,
}

impl ExportTable {
    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in builder order
    pub fn rows(&self) -> &[ExportRow] {
        &self.rows
    }

    /// Pass statistics
    pub fn summary(&self) -> ExportSummary {
        self.summary
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at a row and named column; `None` when missing or unknown
    pub fn value(&self, row: usize, column: &str) -> Option<&ExportValue> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.cells.get(col)?.as_ref()
    }
}

/// Validated export parameters bound to one experiment
pub(crate) struct ExportPlan<'a> {
    experiment: &'a Experiment,
    properties: Vec<ExportProperty>,
    export_classes: HashSet<&'a Label>,
    group_classes: HashSet<&'a Label>,
    min_group_size: f64,
    use_annotation: bool,
    granularity: Granularity,
    /// Non-excluded samples, registry order
    samples: Vec<SampleId>,
    excluded: Vec<bool>,
}

/// Rows and missing cell count for one consensus feature
type Rendered = (Vec<ExportRow>, usize);

impl<'a> ExportPlan<'a> {
    /// Check `config` against the experiment's labels and samples
    pub(crate) fn new(experiment: &'a Experiment, config: &'a ExportConfig) -> Result<Self, ExportError> {
        let size = config.min_group_size;
        if !(0.0..=1.0).contains(&size) {
            return invalid(format!("min_group_size must lie in [0, 1], got {}", size));
        }
        let properties = config.properties()?;
        if config.export_classes.is_empty() {
            return invalid("export_classes must not be empty");
        }
        let labels = experiment.labels();
        for label in config.export_classes.iter().chain(&config.min_group_classes) {
            if !labels.contains(label) {
                return invalid(format!("Label '{}' is not produced by the model", label));
            }
        }

        let registry = experiment.registry();
        let mut excluded = vec![false; registry.len()];
        for name in &config.exclude {
            match registry.find(name) {
                Some(id) => excluded[id.index()] = true,
                None => warn!("Ignoring unknown excluded sample '{}'", name),
            }
        }
        for id in &config.exclude_ids {
            match excluded.get_mut(id.index()) {
                Some(flag) => *flag = true,
                None => warn!("Ignoring excluded sample id {} outside the registry", id.index()),
            }
        }
        let samples = registry.ids().filter(|id| !excluded[id.index()]).collect();

        Ok(Self {
            experiment,
            properties,
            export_classes: config.export_classes.iter().collect(),
            group_classes: config.min_group_classes.iter().collect(),
            min_group_size: size,
            use_annotation: config.use_annotation,
            granularity: config.granularity,
            samples,
            excluded,
        })
    }

    pub(crate) fn columns(&self) -> Vec<String> {
        match self.granularity {
            Granularity::Consensus => {
                let mut columns = Vec::new();
                for property in &self.properties {
                    if property.is_consensus_level() {
                        columns.push(property.name().to_string());
                        continue;
                    }
                    for &sample in &self.samples {
                        let name = self.experiment.registry().get(sample).name();
                        columns.push(format!("{} {}", name, property.name()));
                    }
                }
                columns
            }
            Granularity::Feature => ["consensus", "sample"]
                .into_iter()
                .map(String::from)
                .chain(self.properties.iter().map(|p| p.name().to_string()))
                .collect(),
        }
    }

    /// Group filter: share of non-excluded present features whose
    /// effective label is a group class
    pub(crate) fn retains(&self, consensus: &ConsensusFeature) -> bool {
        let mut denominator = 0usize;
        let mut numerator = 0usize;
        for feature in consensus.features() {
            if self.excluded[feature.sample().index()] {
                continue;
            }
            denominator += 1;
            let label = feature.peak().effective_label(self.use_annotation);
            if label.is_some_and(|l| self.group_classes.contains(l)) {
                numerator += 1;
            }
        }
        denominator > 0 && numerator as f64 / denominator as f64 >= self.min_group_size
    }

    /// Whether a feature's per-sample values are emitted
    fn exports(&self, feature: &Feature) -> bool {
        feature
            .peak()
            .effective_label(self.use_annotation)
            .is_some_and(|l| self.export_classes.contains(l))
    }

    fn value(&self, property: ExportProperty, consensus: &ConsensusFeature, feature: &Feature) -> Option<ExportValue> {
        let values = feature.values();
        let number = |v: f64| Some(ExportValue::Number(v));
        match property {
            ExportProperty::Rt => number(consensus.rt()),
            ExportProperty::Mz => number(consensus.mz()),
            ExportProperty::PeakRt => number(values.rt),
            ExportProperty::PeakMz => number(values.mz),
            ExportProperty::RtStart => number(values.rt_start),
            ExportProperty::RtEnd => number(values.rt_end),
            ExportProperty::Height => number(values.height),
            ExportProperty::Area => values.area.map(ExportValue::Number),
            ExportProperty::MzMin => number(values.mz_min),
            ExportProperty::MzMax => number(values.mz_max),
            ExportProperty::Label => feature
                .peak()
                .effective_label(self.use_annotation)
                .map(|l| ExportValue::Text(l.to_string())),
            ExportProperty::Confidence => feature
                .peak()
                .prediction()
                .map(|p| ExportValue::Number(f64::from(p.confidence))),
        }
    }

    fn consensus_value(property: ExportProperty, consensus: &ConsensusFeature) -> Option<ExportValue> {
        match property {
            ExportProperty::Rt => Some(ExportValue::Number(consensus.rt())),
            ExportProperty::Mz => Some(ExportValue::Number(consensus.mz())),
            _ => None,
        }
    }

    /// Rows for one consensus feature; empty when the group filter drops it
    pub(crate) fn render(&self, consensus: &ConsensusFeature) -> Option<Rendered> {
        if !self.retains(consensus) {
            return None;
        }
        Some(match self.granularity {
            Granularity::Consensus => self.render_wide(consensus),
            Granularity::Feature => self.render_long(consensus),
        })
    }

    fn render_wide(&self, consensus: &ConsensusFeature) -> Rendered {
        let mut cells = Vec::new();
        let mut missing = 0;
        for &property in &self.properties {
            if property.is_consensus_level() {
                cells.push(Self::consensus_value(property, consensus));
                continue;
            }
            for &sample in &self.samples {
                let value = consensus
                    .feature(sample)
                    .filter(|f| self.exports(f))
                    .and_then(|f| self.value(property, consensus, f));
                if value.is_none() {
                    missing += 1;
                }
                cells.push(value);
            }
        }
        let row = ExportRow {
            consensus: consensus.id(),
            cells,
        };
        (vec![row], missing)
    }

    fn render_long(&self, consensus: &ConsensusFeature) -> Rendered {
        let mut rows = Vec::new();
        let mut missing = 0;
        for &sample in &self.samples {
            let Some(feature) = consensus.feature(sample) else {
                continue;
            };
            let exported = self.exports(feature);
            let mut cells = vec![
                Some(ExportValue::Integer(consensus.id().index() as u64)),
                Some(ExportValue::Text(
                    self.experiment.registry().get(sample).name().to_string(),
                )),
            ];
            for &property in &self.properties {
                let value = if property.is_consensus_level() {
                    Self::consensus_value(property, consensus)
                } else if exported {
                    self.value(property, consensus, feature)
                } else {
                    None
                };
                if value.is_none() && !property.is_consensus_level() {
                    missing += 1;
                }
                cells.push(value);
            }
            rows.push(ExportRow {
                consensus: consensus.id(),
                cells,
            });
        }
        (rows, missing)
    }

    /// Filter and reshape the whole experiment
    pub(crate) fn run(&self) -> ExportTable {
        let consensus = self.experiment.consensus_features();
        #[cfg(feature = "parallel")]
        let rendered: Vec<Option<Rendered>> = consensus.par_iter().map(|c| self.render(c)).collect();
        #[cfg(not(feature = "parallel"))]
        let rendered: Vec<Option<Rendered>> = consensus.iter().map(|c| self.render(c)).collect();

        let mut summary = ExportSummary::default();
        let mut rows = Vec::new();
        for outcome in rendered {
            match outcome {
                Some((mut chunk, missing)) => {
                    summary.retained += 1;
                    summary.missing_cells += missing;
                    rows.append(&mut chunk);
                }
                None => summary.dropped += 1,
            }
        }
        summary.rows = rows.len();
        info!("{}", summary);

        ExportTable {
            columns: self.columns(),
            rows,
            summary,
        }
    }
}

impl Experiment {
    /// Apply the export filters and reshape into an in-memory table
    ///
    /// Configuration errors are reported before any row is produced.
    pub fn export_table(&self, config: &ExportConfig) -> Result<ExportTable, ExportError> {
        Ok(ExportPlan::new(self, config)?.run())
    }
}
