use std::path::PathBuf;

/// Errors that can occur while loading or querying the run catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file is missing or unreadable
    #[error("Run catalog unavailable at {path}: {source}")]
    Unavailable {
        /// Path that was tried
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A required field is absent from a catalog entry
    #[error("Run {run}: missing required field '{field}'")]
    MissingField {
        /// Run the entry belongs to
        run: String,
        /// Name of the missing field
        field: String,
    },

    /// A field is present but has the wrong shape
    #[error("Run {run}: field '{field}' must be a string")]
    InvalidField {
        /// Run the entry belongs to
        run: String,
        /// Name of the offending field
        field: String,
    },

    /// A begin/end time string could not be parsed
    #[error("Run {run}: cannot parse time '{value}' with format '{format}'")]
    InvalidTime {
        /// Run the entry belongs to
        run: String,
        /// Raw time string
        value: String,
        /// Format that was applied
        format: String,
    },

    /// Requested run is not present in the catalog
    #[error("Run {0} is not in the run catalog")]
    UnknownRun(String),

    /// Window start is not before window end
    #[error("Invalid time window: start {start} is not before end {end}")]
    InvalidWindow {
        /// Window start
        start: chrono::NaiveDateTime,
        /// Window end
        end: chrono::NaiveDateTime,
    },
}
