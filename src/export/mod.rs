//! # Export Engine
//!
//! Filters, relabels and reshapes the consensus hierarchy of an
//! [`Experiment`](crate::experiment::Experiment) into a flat table.
//!
//! ## Filters
//!
//! - **Group filter**: a consensus feature is retained when the share of its
//!   non-excluded features whose effective label is in `min_group_classes`
//!   reaches `min_group_size`. Invalid peaks count in the denominator and
//!   never in the numerator. A feature without any non-excluded feature is
//!   dropped.
//! - **Class filter**: per-sample values of a peak whose effective label is
//!   not in `export_classes` render missing. Invalid and unlabeled peaks
//!   always render missing.
//! - **Exclusion**: excluded samples take no part in the group filter and
//!   get no columns.
//!
//! ## Example
//!
//! ```rust,ignore
//! use peakqc::export::{CsvOptions, ExportConfig};
//!
//! let config = ExportConfig {
//!     min_group_size: 0.5,
//!     exclude: vec!["Blank".to_string()],
//!     ..Default::default()
//! };
//! let summary = experiment.export_to_csv("peaks.csv", &config, &CsvOptions::default())?;
//! println!("{}", summary);
//! ```

mod config;
mod engine;
mod error;
mod writer;


pub use config::{CsvOptions, ExportConfig, ExportProperty, Granularity};
pub use engine::{ExportRow, ExportSummary, ExportTable, ExportValue};
pub use error::ExportError;
pub use writer::{write_csv, write_csv_file};
