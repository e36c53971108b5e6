use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[cfg(feature = "mzml")]
use log::{debug, info};

use super::{SampleError, Trace};

/// Raw-file extensions stripped when matching sample names
const RAW_EXTENSIONS: [&str; 2] = [".mzML", ".mzml"];

/// Canonical key used to match feature-table column groups with samples
///
/// `"S1.mzML"` and `"S1"` resolve to the same sample.
pub fn sample_key(name: &str) -> &str {
    let name = name.trim();
    RAW_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name)
}

/// Position of a sample inside its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleId(usize);

impl SampleId {
    /// Zero-based registry position
    pub fn index(self) -> usize {
        self.0
    }
}

/// A raw-data file and its parsed MS1 trace
#[derive(Debug, Clone)]
pub struct Sample {
    name: String,
    trace: Trace,
    source: Option<PathBuf>,
}

impl Sample {
    /// Create a sample from an already parsed trace
    pub fn new(name: impl Into<String>, trace: Trace) -> Self {
        Self {
            name: name.into(),
            trace,
            source: None,
        }
    }

    /// Record the raw file the trace was read from
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Sample name as registered
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MS1 trace
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Raw file path, when loaded from disk
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Read a sample from an mzML file; the name is the file stem
    #[cfg(feature = "mzml")]
    pub fn from_mzml_file<P: AsRef<Path>>(path: P) -> Result<Self, SampleError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(sample_key)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| SampleError::InvalidName(path.to_path_buf()))?
            .to_string();

        let trace = crate::mzml::read_ms1_trace(path).map_err(|source| SampleError::MzML {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded {} MS1 scans for sample {}", trace.len(), name);

        Ok(Self::new(name, trace).with_source(path))
    }
}

/// Owns every sample of an experiment, in registration order
#[derive(Debug, Clone, Default)]
pub struct SampleRegistry {
    samples: Vec<Sample>,
    by_key: HashMap<String, SampleId>,
}

impl SampleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sample; names must be unique after extension stripping
    pub fn insert(&mut self, sample: Sample) -> Result<SampleId, SampleError> {
        let key = sample_key(sample.name()).to_string();
        if self.by_key.contains_key(&key) {
            return Err(SampleError::Duplicate(sample.name));
        }
        let id = SampleId(self.samples.len());
        self.by_key.insert(key, id);
        self.samples.push(sample);
        Ok(id)
    }

    /// Look up a sample by name (with or without raw-file extension)
    pub fn find(&self, name: &str) -> Option<SampleId> {
        self.by_key.get(sample_key(name)).copied()
    }

    /// Sample by id
    ///
    /// Ids are only handed out by this registry, so lookups are infallible.
    pub fn get(&self, id: SampleId) -> &Sample {
        &self.samples[id.0]
    }

    /// Number of registered samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample is registered
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All sample ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = SampleId> + '_ {
        (0..self.samples.len()).map(SampleId)
    }

    /// Iterate `(id, sample)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (SampleId, &Sample)> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, sample)| (SampleId(i), sample))
    }

    /// Register every `.mzML` file in a directory, sorted by file name
    #[cfg(feature = "mzml")]
    pub fn from_mzml_dir<P: AsRef<Path>>(dir: P) -> Result<Self, SampleError> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("mzml"))
            })
            .collect();
        if paths.is_empty() {
            return Err(SampleError::NoRawFiles(dir.to_path_buf()));
        }
        paths.sort();
        Self::from_mzml_files(&paths)
    }

    /// Register the given mzML files in order
    #[cfg(feature = "mzml")]
    pub fn from_mzml_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, SampleError> {
        let mut registry = Self::new();
        for path in paths {
            registry.insert(Sample::from_mzml_file(path)?)?;
        }
        info!("Registered {} samples", registry.len());
        Ok(registry)
    }
}
