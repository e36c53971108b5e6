use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use peakqc::classifier::{LinearModel, PeakClassifier};
use peakqc::export::{CsvOptions, ExportConfig};

use super::{load_experiment, Config, ExportArgs, InputArgs};

impl ExportArgs {
    /// Overlay flags given on the command line.
    pub fn apply(self, export: &mut ExportConfig, csv: &mut CsvOptions) {
        if let Some(classes) = self.export_classes {
            export.export_classes = classes;
        }
        if let Some(classes) = self.min_group_classes {
            export.min_group_classes = classes;
        }
        if let Some(size) = self.min_group_size {
            export.min_group_size = size;
        }
        if !self.exclude.is_empty() {
            export.exclude = self.exclude;
        }
        if self.use_annotation {
            export.use_annotation = true;
        }
        if let Some(properties) = self.properties {
            export.export_properties = properties;
        }
        if let Some(granularity) = self.granularity {
            export.granularity = granularity;
        }
        if self.no_index {
            csv.index = false;
        }
        if let Some(na_rep) = self.na_rep {
            csv.na_rep = na_rep;
        }
    }
}

/// Build, classify and export
pub fn run(
    input: InputArgs,
    model: PathBuf,
    threshold: Option<f32>,
    output: PathBuf,
    config: Option<PathBuf>,
    args: ExportArgs,
) -> Result<()> {
    let file_config = match &config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut export = ExportConfig::default();
    let mut csv = CsvOptions::default();
    file_config.export.apply(&mut export, &mut csv);
    args.apply(&mut export, &mut csv);

    let threshold = threshold
        .or(file_config.prediction.threshold)
        .context("A prediction threshold is required (--threshold or [prediction] threshold)")?;

    info!("peakqc - classify and export");
    info!("============================");
    info!("Feature table: {}", input.feature_table.display());
    info!("Raw data:      {}", input.raw_dir.display());
    info!("Model:         {}", model.display());
    info!("Output:        {}", output.display());
    info!("Threshold:     {}", threshold);

    let model = LinearModel::from_json_file(&model).context("Failed to load model")?;
    let mut experiment = load_experiment(&input, model.labels().clone())?;

    let report = experiment
        .predict(&model, threshold)
        .context("Prediction failed")?;
    for failure in &report.failures {
        warn!(
            "{} peaks of sample {} left unlabeled: {}",
            failure.peaks,
            experiment.registry().get(failure.sample).name(),
            failure.error
        );
    }

    let summary = experiment
        .export_to_csv(&output, &export, &csv)
        .with_context(|| format!("Failed to export to {}", output.display()))?;

    println!("{}", summary);
    if !report.is_complete() {
        println!(
            "{} batches failed; {} peaks rendered missing",
            report.failures.len(),
            report.unlabeled_peaks()
        );
    }

    Ok(())
}
