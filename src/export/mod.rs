//! # Series Export
//!
//! Writes assembled series for an external renderer. Three layouts:
//!
//! - **JSON**: the [`RunSeries`] as is, pretty-printed
//! - **CSV**: one row per sample with the device columns repeated
//! - **Parquet**: one row per device with list columns, see [`wide`]

mod error;
pub mod wide;

#[cfg(test)]
mod tests;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use log::info;
use serde::Serialize;

use crate::series::RunSeries;

pub use error::ExportError;

/// Output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Pretty-printed JSON document
    #[default]
    Json,
    /// Long CSV table
    Csv,
    /// Wide Parquet table
    Parquet,
}

impl ExportFormat {
    /// Returns all available format names.
    pub fn variants() -> &'static [&'static str] {
        &["json", "csv", "parquet"]
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Parquet => write!(f, "parquet"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "parquet" | "pq" => Ok(ExportFormat::Parquet),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Statistics from a completed export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStats {
    /// Layout written
    pub format: ExportFormat,
    /// Devices written
    pub series_written: usize,
    /// Samples written across all devices, boundaries included
    pub samples_written: usize,
}

impl fmt::Display for ExportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} series ({} samples) as {}",
            self.series_written, self.samples_written, self.format
        )
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    diode: &'a str,
    descriptor: &'a str,
    name: &'a str,
    channel: &'a str,
    time: String,
    epoch_seconds: f64,
    voltage: f64,
    current: f64,
    boundary: bool,
}

/// Write `run` to `writer` in `format`
pub fn write_series<W: Write + Send>(
    mut writer: W,
    format: ExportFormat,
    run: &RunSeries,
) -> Result<ExportStats, ExportError> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, run)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        ExportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for series in &run.series {
                let device = &series.device;
                for sample in &series.samples {
                    csv_writer.serialize(CsvRow {
                        diode: &device.diode,
                        descriptor: &device.full,
                        name: &device.name,
                        channel: &device.channel,
                        time: sample.time.to_string(),
                        epoch_seconds: sample.epoch_seconds(),
                        voltage: sample.voltage,
                        current: sample.current,
                        boundary: sample.boundary,
                    })?;
                }
            }
            csv_writer.flush()?;
        }
        ExportFormat::Parquet => {
            wide::write_parquet(writer, run)?;
        }
    }

    Ok(ExportStats {
        format,
        series_written: run.series.len(),
        samples_written: run.series.iter().map(|s| s.samples.len()).sum(),
    })
}

/// Write `run` to a file at `path`
pub fn write_series_file<P: AsRef<Path>>(
    path: P,
    format: ExportFormat,
    run: &RunSeries,
) -> Result<ExportStats, ExportError> {
    let path = path.as_ref();
    let file = BufWriter::new(File::create(path)?);
    let stats = write_series(file, format, run)?;
    info!("{} to {}", stats, path.display());
    Ok(stats)
}
