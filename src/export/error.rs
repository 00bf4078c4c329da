/// Errors that can occur while exporting series
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error writing the output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Arrow array construction error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet encoding error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Unrecognised format name
    #[error("Unknown export format '{0}'. Valid options: json, csv, parquet")]
    UnknownFormat(String),
}
