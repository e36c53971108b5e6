use std::fmt;

/// Ways a feature-table header can disagree with the sample registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    /// One of the sample-independent leading columns is absent
    MissingRowColumn(&'static str),
    /// Column group whose prefix names no registered sample
    UnknownSample(String),
    /// Registered sample without any column group
    MissingSample(String),
    /// Sample group lacking a required column
    MissingField {
        /// Sample name
        sample: String,
        /// Expected column header
        column: String,
    },
    /// The same header appears twice
    DuplicateColumn(String),
    /// Several column groups resolve to one sample
    AmbiguousSample {
        /// Sample name
        sample: String,
        /// Conflicting column-group prefixes, in header order
        prefixes: Vec<String>,
    },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaIssue::MissingRowColumn(name) => write!(f, "missing column '{}'", name),
            SchemaIssue::UnknownSample(name) => {
                write!(f, "column group '{}' matches no raw file", name)
            }
            SchemaIssue::MissingSample(name) => {
                write!(f, "raw file '{}' has no column group", name)
            }
            SchemaIssue::MissingField { sample, column } => {
                write!(f, "sample '{}' lacks column '{}'", sample, column)
            }
            SchemaIssue::DuplicateColumn(name) => write!(f, "duplicate column '{}'", name),
            SchemaIssue::AmbiguousSample { sample, prefixes } => write!(
                f,
                "column groups '{}' all match raw file '{}'",
                prefixes.join("', '"),
                sample
            ),
        }
    }
}

/// Errors that can occur while loading a feature table
#[derive(Debug, thiserror::Error)]
pub enum FeatureTableError {
    /// I/O error reading the table
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Header and sample registry are inconsistent
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(SchemaIssue),

    /// Cell that is neither empty nor a number
    #[error("Invalid value '{value}' in column '{column}' (line {line})")]
    InvalidValue {
        /// 1-based line in the file
        line: u64,
        /// Column header
        column: String,
        /// Offending cell text
        value: String,
    },
}
