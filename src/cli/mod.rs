use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use peakqc::export::Granularity;
use peakqc::label::Label;
#[cfg(feature = "mzml")]
use {
    anyhow::Context,
    log::info,
    peakqc::experiment::Experiment,
    peakqc::label::LabelSet,
    peakqc::sample::SampleRegistry,
};

mod config;
mod model;
#[cfg(feature = "mzml")]
mod run;
#[cfg(feature = "mzml")]
mod summary;

pub use config::Config;

/// peakqc - Peak quality classification for untargeted metabolomics
#[derive(Parser)]
#[command(name = "peakqc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Feature table and raw data shared by every pipeline command
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Aligned feature table (CSV)
    #[arg(short = 't', long, value_name = "CSV")]
    pub feature_table: PathBuf,

    /// Directory holding one mzML file per sample
    #[arg(short = 'r', long, value_name = "DIR")]
    pub raw_dir: PathBuf,

    /// Manual labels (CSV: consensus_index,sample,label)
    #[arg(short = 'a', long, value_name = "CSV")]
    pub annotations: Option<PathBuf>,
}

/// Export overrides; unset flags fall back to the config file, then defaults
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Classes whose values are exported
    #[arg(long, value_delimiter = ',', value_name = "LABELS")]
    pub export_classes: Option<Vec<Label>>,

    /// Classes counted by the group filter
    #[arg(long, value_delimiter = ',', value_name = "LABELS")]
    pub min_group_classes: Option<Vec<Label>>,

    /// Minimum fraction of samples carrying a group class (0-1)
    #[arg(long, value_name = "FRACTION")]
    pub min_group_size: Option<f64>,

    /// Sample to leave out of filtering and output (repeatable)
    #[arg(short = 'x', long, value_name = "SAMPLE")]
    pub exclude: Vec<String>,

    /// Prefer manual annotations over predictions
    #[arg(long)]
    pub use_annotation: bool,

    /// Ordered properties to export
    #[arg(short = 'p', long, value_delimiter = ',', value_name = "PROPS")]
    pub properties: Option<Vec<String>>,

    /// Row layout (consensus or feature)
    #[arg(long, value_name = "LAYOUT")]
    pub granularity: Option<Granularity>,

    /// Omit the leading index column
    #[arg(long)]
    pub no_index: bool,

    /// Text written for missing values
    #[arg(long, value_name = "TEXT")]
    pub na_rep: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, classify and export a feature table
    #[cfg(feature = "mzml")]
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Linear model artifact (JSON)
        #[arg(short = 'm', long, value_name = "FILE")]
        model: PathBuf,

        /// Threshold between High_quality and Low_quality, in (0, 1)
        #[arg(long)]
        threshold: Option<f32>,

        /// Output CSV path
        #[arg(short = 'o', long, value_name = "FILE")]
        output: PathBuf,

        /// Load settings from a TOML config file
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Build the hierarchy and print peak statistics
    #[cfg(feature = "mzml")]
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Classify with this model before summarizing
        #[arg(short = 'm', long, value_name = "FILE", requires = "threshold")]
        model: Option<PathBuf>,

        /// Threshold used with --model
        #[arg(long)]
        threshold: Option<f32>,
    },

    /// Display information about a model artifact
    Model {
        /// Model JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        #[cfg(feature = "mzml")]
        Commands::Run {
            input,
            model,
            threshold,
            output,
            config,
            export,
        } => run::run(input, model, threshold, output, config, export),
        #[cfg(feature = "mzml")]
        Commands::Summary {
            input,
            model,
            threshold,
        } => summary::run(input, model, threshold),
        Commands::Model { file } => model::run(file),
    }
}

/// Register raw files, build the hierarchy and apply annotations
///
/// `labels` must be the label set of the model that will classify the
/// experiment; annotations are checked against it.
#[cfg(feature = "mzml")]
pub fn load_experiment(input: &InputArgs, labels: LabelSet) -> Result<Experiment> {
    if !input.feature_table.exists() {
        anyhow::bail!("Feature table does not exist: {}", input.feature_table.display());
    }

    let registry = SampleRegistry::from_mzml_dir(&input.raw_dir)
        .with_context(|| format!("Failed to load raw files from {}", input.raw_dir.display()))?;
    let mut experiment = Experiment::with_labels(registry, labels);

    let report = experiment
        .load_feature_table(&input.feature_table)
        .with_context(|| format!("Failed to load {}", input.feature_table.display()))?;
    if report.invalid_peaks > 0 {
        info!("{} peaks could not be resolved and will render missing", report.invalid_peaks);
    }

    if let Some(path) = &input.annotations {
        experiment
            .load_annotations(path)
            .with_context(|| format!("Failed to apply annotations from {}", path.display()))?;
    }

    Ok(experiment)
}
