use anyhow::{Context, Result};
use std::path::PathBuf;

use peakqc::classifier::{LinearModel, PeakClassifier};
use peakqc::label::LabelSet;

use super::{load_experiment, InputArgs};

/// Print hierarchy and label statistics
pub fn run(input: InputArgs, model: Option<PathBuf>, threshold: Option<f32>) -> Result<()> {
    let model = match &model {
        Some(path) => Some(LinearModel::from_json_file(path).context("Failed to load model")?),
        None => None,
    };
    let labels = model
        .as_ref()
        .map_or_else(LabelSet::default, |m| m.labels().clone());
    let mut experiment = load_experiment(&input, labels)?;

    if let (Some(model), Some(threshold)) = (&model, threshold) {
        let report = experiment
            .predict(model, threshold)
            .context("Prediction failed")?;
        println!("{}", report);
    }

    print!("{}", experiment.summary().format_colored());
    Ok(())
}
