use std::path::PathBuf;

/// Errors that can occur while registering samples
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// I/O error while scanning for raw files
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A sample with the same name is already registered
    #[error("Duplicate sample name: {0}")]
    Duplicate(String),

    /// Raw file name cannot be turned into a sample name
    #[error("Cannot derive sample name from path: {}", .0.display())]
    InvalidName(PathBuf),

    /// Raw data directory holds no usable files
    #[error("No raw files found in {}", .0.display())]
    NoRawFiles(PathBuf),

    /// Raw file could not be parsed
    #[cfg(feature = "mzml")]
    #[error("Failed to read {}: {source}", path.display())]
    MzML {
        /// File being parsed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: crate::mzml::MzMLError,
    },
}

/// Reasons a feature's peak window cannot be mapped onto a sample trace
///
/// These are recoverable: the peak is kept but marked invalid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PeakResolutionError {
    /// The sample has no MS1 scans at all
    #[error("Sample trace has no MS1 scans")]
    EmptyTrace,

    /// Start after end, or non-finite bounds
    #[error("Malformed peak window: RT {rt_start}..{rt_end}, m/z {mz_min}..{mz_max}")]
    MalformedWindow {
        /// Window RT start
        rt_start: f64,
        /// Window RT end
        rt_end: f64,
        /// Window lower m/z
        mz_min: f64,
        /// Window upper m/z
        mz_max: f64,
    },

    /// The RT window is not contained in the recorded trace
    #[error("RT window {rt_start}..{rt_end} outside trace range {trace_start}..{trace_end}")]
    OutsideTrace {
        /// Window RT start
        rt_start: f64,
        /// Window RT end
        rt_end: f64,
        /// First scan RT
        trace_start: f64,
        /// Last scan RT
        trace_end: f64,
    },

    /// The RT window falls between two consecutive scans
    #[error("No MS1 scan inside RT window {rt_start}..{rt_end}")]
    NoScans {
        /// Window RT start
        rt_start: f64,
        /// Window RT end
        rt_end: f64,
    },
}
