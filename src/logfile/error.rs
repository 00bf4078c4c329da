use std::path::PathBuf;

/// Errors that can occur while discovering or opening log files
#[derive(Debug, thiserror::Error)]
pub enum LogFileError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The device log directory does not exist
    #[error("Log directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}
