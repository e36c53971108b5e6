/// Errors that can occur during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Export parameters are inconsistent; nothing was written
    #[error("Invalid export configuration: {0}")]
    FilterConfiguration(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Completed temporary file could not replace the target
    #[error("Failed to move export into place: {0}")]
    PersistError(#[source] std::io::Error),
}

pub(crate) fn invalid<T>(message: impl Into<String>) -> Result<T, ExportError> {
    Err(ExportError::FilterConfiguration(message.into()))
}
