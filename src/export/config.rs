use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{invalid, ExportError};
use crate::label::Label;
use crate::sample::SampleId;

/// A column family that can be exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportProperty {
    /// Consensus retention time
    Rt,
    /// Consensus m/z
    Mz,
    /// Per-sample peak RT
    PeakRt,
    /// Per-sample peak m/z
    PeakMz,
    /// Peak RT start
    RtStart,
    /// Peak RT end
    RtEnd,
    /// Peak height
    Height,
    /// Peak area (extended tables only)
    Area,
    /// Lower m/z bound
    MzMin,
    /// Upper m/z bound
    MzMax,
    /// Effective label
    Label,
    /// Prediction confidence
    Confidence,
}

impl ExportProperty {
    /// Every property, in canonical order
    pub const ALL: [ExportProperty; 12] = [
        ExportProperty::Rt,
        ExportProperty::Mz,
        ExportProperty::PeakRt,
        ExportProperty::PeakMz,
        ExportProperty::RtStart,
        ExportProperty::RtEnd,
        ExportProperty::Height,
        ExportProperty::Area,
        ExportProperty::MzMin,
        ExportProperty::MzMax,
        ExportProperty::Label,
        ExportProperty::Confidence,
    ];

    /// Name used in configuration and column headers
    pub fn name(self) -> &'static str {
        match self {
            ExportProperty::Rt => "rt",
            ExportProperty::Mz => "mz",
            ExportProperty::PeakRt => "peak_rt",
            ExportProperty::PeakMz => "peak_mz",
            ExportProperty::RtStart => "rt_start",
            ExportProperty::RtEnd => "rt_end",
            ExportProperty::Height => "height",
            ExportProperty::Area => "area",
            ExportProperty::MzMin => "mz_min",
            ExportProperty::MzMax => "mz_max",
            ExportProperty::Label => "label",
            ExportProperty::Confidence => "confidence",
        }
    }

    /// Consensus-level properties yield one column, the others one per sample
    pub fn is_consensus_level(self) -> bool {
        matches!(self, ExportProperty::Rt | ExportProperty::Mz)
    }
}

impl fmt::Display for ExportProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportProperty {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match Self::ALL.into_iter().find(|p| p.name() == s) {
            Some(property) => Ok(property),
            None => invalid(format!("Unknown export property '{}'", s)),
        }
    }
}

/// Shape of the exported table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One row per retained consensus feature, per-sample columns
    #[default]
    Consensus,
    /// One row per (retained consensus feature, sample with a feature)
    Feature,
}

impl FromStr for Granularity {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "consensus" => Ok(Granularity::Consensus),
            "feature" => Ok(Granularity::Feature),
            other => invalid(format!("Unknown granularity '{}'", other)),
        }
    }
}

/// Filter and selection parameters of an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Peaks whose effective label is outside this set render missing
    pub export_classes: Vec<Label>,
    /// Classes counted by the group filter
    pub min_group_classes: Vec<Label>,
    /// Minimum fraction of non-excluded samples carrying a group class
    pub min_group_size: f64,
    /// Sample names left out of the filter and the output
    pub exclude: Vec<String>,
    /// Samples left out by id; merged with [`ExportConfig::exclude`]
    #[serde(skip)]
    pub exclude_ids: Vec<SampleId>,
    /// Prefer manual annotations over predictions
    pub use_annotation: bool,
    /// Ordered property names; see [`ExportProperty`]
    pub export_properties: Vec<String>,
    /// Row layout
    pub granularity: Granularity,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            export_classes: vec![Label::high_quality(), Label::low_quality()],
            min_group_classes: vec![Label::high_quality()],
            min_group_size: 0.75,
            exclude: Vec::new(),
            exclude_ids: Vec::new(),
            use_annotation: false,
            export_properties: ["rt", "mz", "height", "area", "label"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            granularity: Granularity::Consensus,
        }
    }
}

impl ExportConfig {
    /// Replace the property list
    pub fn with_properties(mut self, properties: &[ExportProperty]) -> Self {
        self.export_properties = properties.iter().map(|p| p.name().to_string()).collect();
        self
    }

    /// Parse the property names, rejecting unknown or repeated ones
    pub fn properties(&self) -> Result<Vec<ExportProperty>, ExportError> {
        if self.export_properties.is_empty() {
            return invalid("export_properties must not be empty");
        }
        let mut properties = Vec::with_capacity(self.export_properties.len());
        for name in &self.export_properties {
            let property: ExportProperty = name.parse()?;
            if properties.contains(&property) {
                return invalid(format!("Export property '{}' listed twice", property));
            }
            properties.push(property);
        }
        Ok(properties)
    }
}

/// Options of the CSV writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Emit a leading `index` column holding the consensus index
    pub index: bool,
    /// Text written for missing values
    pub na_rep: String,
    /// Field delimiter
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            index: true,
            na_rep: String::new(),
            delimiter: b',',
        }
    }
}
