//! # mzML MS1 trace reader
//!
//! A pull-based quick-xml reader that extracts the MS1 scans of an mzML
//! file. Spectrum metadata beyond MS level and scan start time is ignored,
//! and binary arrays of non-MS1 spectra are never decoded.

mod binary;
mod error;
mod reader;

pub use binary::{decode_array, BinaryEncoding, Compression};
pub use error::MzMLError;
pub use reader::{read_ms1_trace, Ms1Reader};
