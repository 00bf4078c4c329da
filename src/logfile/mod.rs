//! # HV Supply Log Files
//!
//! Each device writes an append-only text log that is rotated periodically.
//! Rotated files carry their close time in the name, e.g.
//! `ISEG-NHS_CH4_2016_09_04_12_30_00.log` or `Keithley1_CH0_160904_123000.log`,
//! and a device directory holds many of them. Lines look like
//!
//! ```text
//! 12:29:58 -500.0 -1.234e-09
//! ```
//!
//! with the time of day, the voltage in volts and the current in amps.

mod error;
mod line;


use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, trace};

pub use error::LogFileError;
pub use line::{LogLine, CURRENT_SENTINEL, NANOAMPS_PER_RAW, TIME_OF_DAY_FORMAT};

/// Default input buffer size for log reading (64KB)
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

const LOG_EXTENSION: &str = ".log";

/// A rotated log file and the close time embedded in its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    path: PathBuf,
    closed_at: NaiveDateTime,
}

impl LogFile {
    /// Create a log file entry with an explicit close time
    pub fn new(path: impl Into<PathBuf>, closed_at: NaiveDateTime) -> Self {
        Self {
            path: path.into(),
            closed_at,
        }
    }

    /// Build from a path whose file name carries a close timestamp
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let closed_at = parse_close_time(path.file_name()?.to_str()?)?;
        Some(Self { path, closed_at })
    }

    /// Path on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close (rotation) time embedded in the name
    pub fn closed_at(&self) -> NaiveDateTime {
        self.closed_at
    }

    /// Calendar day used to complete the time-of-day field of every line
    pub fn date(&self) -> NaiveDate {
        self.closed_at.date()
    }

    /// Open for buffered reading
    pub fn open(&self) -> Result<BufReader<File>, LogFileError> {
        let file = File::open(&self.path)?;
        Ok(BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, file))
    }
}

/// Parse the close time out of a log file name.
///
/// The stamp is the concatenation of the trailing all-digit `_` segments of
/// the stem: 14 digits read as `YYYYMMDDHHMMSS`, 12 digits as `YYMMDDHHMMSS`.
pub fn parse_close_time(file_name: &str) -> Option<NaiveDateTime> {
    let stem = file_name.strip_suffix(LOG_EXTENSION)?;

    let mut digits = String::new();
    let mut long_stamp = None;
    let mut short_stamp = None;
    for segment in stem.rsplit('_') {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            break;
        }
        digits.insert_str(0, segment);
        match digits.len() {
            12 => short_stamp = Some(digits.clone()),
            14 => long_stamp = Some(digits.clone()),
            n if n > 14 => break,
            _ => {}
        }
    }

    long_stamp
        .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y%m%d%H%M%S").ok())
        .or_else(|| {
            short_stamp.and_then(|s| NaiveDateTime::parse_from_str(&s, "%y%m%d%H%M%S").ok())
        })
}

/// List the log files of a device directory, ordered by close time.
///
/// Entries whose names carry no close timestamp are ignored.
pub fn discover(dir: &Path) -> Result<Vec<LogFile>, LogFileError> {
    if !dir.is_dir() {
        return Err(LogFileError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match LogFile::from_path(&path) {
            Some(file) => files.push(file),
            None => trace!("Ignoring {}: no close timestamp in name", path.display()),
        }
    }

    files.sort_by(|a, b| a.closed_at.cmp(&b.closed_at).then_with(|| a.path.cmp(&b.path)));
    debug!("Found {} log files in {}", files.len(), dir.display());
    Ok(files)
}
