use crate::logfile::LogFileError;

/// Errors that can occur during windowed extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// I/O error while streaming log lines
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error opening or indexing a log file
    #[error("Log file error: {0}")]
    LogFileError(#[from] LogFileError),
}
