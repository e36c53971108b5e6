use anyhow::{Context, Result};
use std::path::PathBuf;

use peakqc::classifier::{LinearModel, PeakClassifier};

/// Display information about a model artifact
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let model = LinearModel::from_json_file(&file).context("Failed to load model")?;
    let labels = model.labels();

    println!("peakqc Model Information");
    println!("========================");
    println!("File: {}", file.display());
    println!("Input shape: {}", model.input_shape());
    println!("Classes:");
    for (i, label) in labels.iter().enumerate() {
        let graded = match labels.graded() {
            Some((hi, _)) if hi == i => " (graded, higher)",
            Some((_, lo)) if lo == i => " (graded, lower)",
            _ => "",
        };
        println!("  {:2}. {}{}", i, label, graded);
    }

    Ok(())
}
