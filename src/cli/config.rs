//! TOML configuration file support.
//!
//! Export and prediction settings can live in a config file instead of
//! being repeated on every invocation. Every key is optional and command
//! line flags win:
//!
//! ```toml
//! # peakqc.toml
//! [export]
//! export_classes = ["High_quality", "Low_quality"]
//! min_group_classes = ["High_quality"]
//! min_group_size = 0.75
//! exclude = ["Blank_01"]
//! use_annotation = false
//! export_properties = ["rt", "mz", "height", "area", "label"]
//! granularity = "consensus"
//! index = true
//! na_rep = ""
//!
//! [prediction]
//! threshold = 0.22
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use peakqc::export::{CsvOptions, ExportConfig, Granularity};
use peakqc::label::Label;

/// Root configuration structure for peakqc.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Export filter and writer settings.
    #[serde(default)]
    pub export: ExportSection,

    /// Prediction settings.
    #[serde(default)]
    pub prediction: PredictionSection,
}

/// The `[export]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    pub export_classes: Option<Vec<Label>>,
    pub min_group_classes: Option<Vec<Label>>,
    pub min_group_size: Option<f64>,
    pub exclude: Option<Vec<String>>,
    pub use_annotation: Option<bool>,
    pub export_properties: Option<Vec<String>>,
    pub granularity: Option<Granularity>,
    pub index: Option<bool>,
    pub na_rep: Option<String>,
}

/// The `[prediction]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionSection {
    /// Threshold between the two graded classes, in (0, 1).
    pub threshold: Option<f32>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl ExportSection {
    /// Overlay the keys present in the file onto the library defaults.
    pub fn apply(&self, export: &mut ExportConfig, csv: &mut CsvOptions) {
        if let Some(classes) = &self.export_classes {
            export.export_classes = classes.clone();
        }
        if let Some(classes) = &self.min_group_classes {
            export.min_group_classes = classes.clone();
        }
        if let Some(size) = self.min_group_size {
            export.min_group_size = size;
        }
        if let Some(exclude) = &self.exclude {
            export.exclude = exclude.clone();
        }
        if let Some(flag) = self.use_annotation {
            export.use_annotation = flag;
        }
        if let Some(properties) = &self.export_properties {
            export.export_properties = properties.clone();
        }
        if let Some(granularity) = self.granularity {
            export.granularity = granularity;
        }
        if let Some(index) = self.index {
            csv.index = index;
        }
        if let Some(na_rep) = &self.na_rep {
            csv.na_rep = na_rep.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [export]
            export_classes = ["High_quality"]
            min_group_size = 0.5
            exclude = ["Blank"]
            granularity = "feature"
            na_rep = "NA"

            [prediction]
            threshold = 0.22
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.export.min_group_size, Some(0.5));
        assert_eq!(config.export.granularity, Some(Granularity::Feature));
        assert_eq!(config.prediction.threshold, Some(0.22));

        let mut export = ExportConfig::default();
        let mut csv = CsvOptions::default();
        config.export.apply(&mut export, &mut csv);
        assert_eq!(export.export_classes, vec![Label::high_quality()]);
        assert_eq!(export.exclude, vec!["Blank".to_string()]);
        assert_eq!(export.min_group_classes, vec![Label::high_quality()]);
        assert_eq!(csv.na_rep, "NA");
        assert!(csv.index);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.export.min_group_size, None);
        assert_eq!(config.prediction.threshold, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_str("[export]\nmin_group = 0.5\n").is_err());
    }
}
