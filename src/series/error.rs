use crate::catalog::CatalogError;
use crate::device::ResolveError;
use crate::extract::ExtractError;
use crate::logfile::LogFileError;

/// Errors that can occur while assembling device series
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// Run window lookup failed
    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),

    /// Device resolution failed
    #[error("Device error: {0}")]
    ResolveError(#[from] ResolveError),

    /// Log directory listing failed
    #[error("Log file error: {0}")]
    LogFileError(#[from] LogFileError),

    /// Extraction failed
    #[error("Extraction error for {diode}: {source}")]
    ExtractError {
        /// Diode whose logs were being read
        diode: String,
        /// Underlying failure
        #[source]
        source: ExtractError,
    },
}
