//! # Sample Registry
//!
//! Maps raw-file identities to their parsed MS1 traces. Each sample is
//! immutable after load; the rest of the crate refers to samples through
//! [`SampleId`] handles issued by the owning [`SampleRegistry`].

mod error;
mod registry;
mod trace;


pub use error::{PeakResolutionError, SampleError};
pub use registry::{sample_key, Sample, SampleId, SampleRegistry};
pub use trace::{Eic, PeakWindow, Scan, Trace};
