//! # Feature Table Loader
//!
//! Parses aligned feature tables as exported by mzMine. The layout is:
//!
//! ```text
//! row m/z, row retention time, S1 Peak m/z, S1 Peak RT, S1 Peak RT start,
//! S1 Peak RT end, S1 Peak height, [S1 Peak area,] S1 Peak m/z min,
//! S1 Peak m/z max, S2 Peak m/z, ...
//! ```
//!
//! A sample block whose values are all `0` (or empty) means the feature was
//! not detected in that sample. The two consensus columns must always hold a
//! number. Header validation against the
//! [`SampleRegistry`](crate::sample::SampleRegistry) is fatal and happens
//! before any row is read.

mod error;
mod loader;
mod schema;


pub use error::{FeatureTableError, SchemaIssue};
pub use loader::{FeatureTable, FeatureTableLoader, RawRow, ValueBlock};
pub use schema::{BlockField, ColumnLayout, SampleColumns, ROW_MZ_COLUMN, ROW_RT_COLUMN};
