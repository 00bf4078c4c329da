use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::logfile::LogLine;

/// One point of a device series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall-clock time
    pub time: NaiveDateTime,
    /// Voltage in volts
    pub voltage: f64,
    /// Current in nanoamps
    pub current: f64,
    /// Synthetic point anchoring the series at a window edge
    #[serde(default)]
    pub boundary: bool,
}

impl Sample {
    /// A measured sample
    pub fn new(time: NaiveDateTime, voltage: f64, current: f64) -> Self {
        Self {
            time,
            voltage,
            current,
            boundary: false,
        }
    }

    /// A synthetic boundary sample
    pub fn boundary(time: NaiveDateTime, voltage: f64, current: f64) -> Self {
        Self {
            time,
            voltage,
            current,
            boundary: true,
        }
    }

    /// Signed seconds since the Unix epoch, sub-second precision kept
    pub fn epoch_seconds(&self) -> f64 {
        epoch_seconds(self.time)
    }
}

impl From<&LogLine> for Sample {
    fn from(line: &LogLine) -> Self {
        Self::new(line.time, line.voltage, line.current_nanoamps())
    }
}

/// Signed seconds since the Unix epoch for a naive (UTC-assumed) timestamp
pub fn epoch_seconds(time: NaiveDateTime) -> f64 {
    let utc = time.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9
}
