use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use super::Experiment;
use crate::label::Label;

/// Aggregate counts over an experiment, including degraded peaks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperimentSummary {
    /// Registered samples
    pub samples: usize,
    /// Consensus features
    pub consensus_features: usize,
    /// Features over all samples
    pub features: usize,
    /// Peaks resolved against their trace
    pub valid_peaks: usize,
    /// Peaks that could not be resolved
    pub invalid_peaks: usize,
    /// Valid peaks without a prediction
    pub unlabeled_peaks: usize,
    /// Valid peaks per predicted class
    pub predicted: BTreeMap<Label, usize>,
    /// Valid peaks per manual label
    pub annotated: BTreeMap<Label, usize>,
}

impl ExperimentSummary {
    /// Peaks that will render as missing whatever the export filters
    pub fn degraded_peaks(&self) -> usize {
        self.invalid_peaks + self.unlabeled_peaks
    }

    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Experiment Summary").bold().cyan()));
            output.push_str(&format!("{}\n", style("==================").cyan()));
            output.push_str(&format!("{}: {}\n", style("Samples").bold(), self.samples));
            output.push_str(&format!(
                "{}: {} ({} features)\n",
                style("Consensus features").bold(),
                self.consensus_features,
                self.features
            ));
            output.push_str(&format!(
                "{}: {} valid, {} invalid, {} unlabeled\n",
                style("Peaks").bold(),
                style(self.valid_peaks).green(),
                style(self.invalid_peaks).red(),
                style(self.unlabeled_peaks).yellow()
            ));
            for (label, count) in &self.predicted {
                output.push_str(&format!("  predicted {:<14} {}\n", style(label.as_str()).cyan(), count));
            }
            for (label, count) in &self.annotated {
                output.push_str(&format!("  annotated {:<14} {}\n", style(label.as_str()).magenta(), count));
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ExperimentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Samples:            {}", self.samples)?;
        writeln!(f, "Consensus features: {}", self.consensus_features)?;
        writeln!(f, "Features:           {}", self.features)?;
        writeln!(f, "Valid peaks:        {}", self.valid_peaks)?;
        writeln!(f, "Invalid peaks:      {}", self.invalid_peaks)?;
        writeln!(f, "Unlabeled peaks:    {}", self.unlabeled_peaks)?;
        for (label, count) in &self.predicted {
            writeln!(f, "  predicted {:<14} {}", label.as_str(), count)?;
        }
        for (label, count) in &self.annotated {
            writeln!(f, "  annotated {:<14} {}", label.as_str(), count)?;
        }
        Ok(())
    }
}

impl Experiment {
    /// Count features, peaks and labels
    pub fn summary(&self) -> ExperimentSummary {
        let mut summary = ExperimentSummary {
            samples: self.registry().len(),
            consensus_features: self.consensus_features().len(),
            ..Default::default()
        };

        for feature in self.consensus_features().iter().flat_map(|c| c.features()) {
            summary.features += 1;
            for peak in feature.peaks() {
                if !peak.is_valid() {
                    summary.invalid_peaks += 1;
                    continue;
                }
                summary.valid_peaks += 1;
                match peak.prediction() {
                    Some(p) => *summary.predicted.entry(p.label.clone()).or_default() += 1,
                    None => summary.unlabeled_peaks += 1,
                }
                if let Some(label) = peak.annotation() {
                    *summary.annotated.entry(label.clone()).or_default() += 1;
                }
            }
        }

        summary
    }
}
