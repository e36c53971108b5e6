//! # peakqc
//!
//! Command-line front end for peak quality classification.
//!
//! ## Usage
//!
//! ```bash
//! # Classify every peak and export the filtered table
//! peakqc run -t features.csv -r raw/ -m model.json --threshold 0.22 -o peaks.csv
//!
//! # Inspect the hierarchy without exporting
//! peakqc summary -t features.csv -r raw/
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
