//! # Windowed Extractor
//!
//! Streams a device's log lines from the position chosen by the
//! [`Locator`](crate::locator::Locator), keeps those strictly inside the time
//! window, runs them through the de-spiking [`SpikeFilter`] and appends the
//! survivors to a caller-owned [`SeriesAccumulator`], framed by two synthetic
//! boundary samples.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hvtrace::extract::{Extractor, SeriesAccumulator};
//! use hvtrace::logfile;
//! # fn example(window: hvtrace::catalog::TimeWindow) -> Result<(), Box<dyn std::error::Error>> {
//! let files = logfile::discover("HV_DATA/ISEG-NHS_CH4".as_ref())?;
//! let mut series = SeriesAccumulator::new();
//! let stats = Extractor::default().extract(&files, &window, &mut series)?;
//! println!("{stats}");
//! # Ok(())
//! # }
//! ```

mod accumulator;
mod despike;
mod error;
mod sample;
mod stream;


use std::fmt;

use log::{debug, info};

use crate::catalog::TimeWindow;
use crate::locator::{Locator, LocatorConfig};
use crate::logfile::LogFile;

pub use accumulator::SeriesAccumulator;
pub use despike::{
    Rejection, SpikeFilter, DEFAULT_ARTIFACT_BAND, DEFAULT_JUMP_FACTOR, DEFAULT_MIN_HISTORY,
    DEFAULT_MIN_PREVIOUS_CURRENT,
};
pub use error::ExtractError;
pub use sample::{epoch_seconds, Sample};
pub use stream::{ScanStats, WindowedLines};

/// Extraction tuning
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExtractionConfig {
    /// De-spiking heuristic
    pub spike_filter: SpikeFilter,
    /// Start-position search
    pub locator: LocatorConfig,
}

/// Outcome of one extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Line counters from the scan
    pub scan: ScanStats,
    /// Samples kept
    pub accepted: usize,
    /// Samples dropped as jumps
    pub rejected_jumps: u64,
    /// Samples dropped inside the artifact band
    pub rejected_band: u64,
    /// The accumulator was already populated and left untouched
    pub skipped: bool,
}

impl fmt::Display for ExtractStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped {
            return write!(f, "Already populated, nothing extracted");
        }
        write!(
            f,
            "Kept {} samples from {} lines in {} files ({} spikes, {} artifact, {} malformed, {} out of range)",
            self.accepted,
            self.scan.lines_read,
            self.scan.files_read,
            self.rejected_jumps,
            self.rejected_band,
            self.scan.malformed,
            self.scan.out_of_range
        )
    }
}

/// Windowed Extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    config: ExtractionConfig,
}

impl Extractor {
    /// Create an extractor with custom tuning
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Tuning in use
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract the `window` slice of `files` into `series`.
    ///
    /// `files` must be ordered by close time. A populated accumulator is left
    /// as it is. On error the accumulator is cleared so that a later call
    /// starts over.
    pub fn extract(
        &self,
        files: &[LogFile],
        window: &TimeWindow,
        series: &mut SeriesAccumulator,
    ) -> Result<ExtractStats, ExtractError> {
        if series.is_populated() {
            debug!("Series already populated, skipping extraction");
            return Ok(ExtractStats {
                skipped: true,
                ..ExtractStats::default()
            });
        }

        let result = self.fill(files, window, series);
        if result.is_err() {
            series.clear();
        }
        result
    }

    fn fill(
        &self,
        files: &[LogFile],
        window: &TimeWindow,
        series: &mut SeriesAccumulator,
    ) -> Result<ExtractStats, ExtractError> {
        let mut stats = ExtractStats::default();
        series.open(window.start);

        let locator = Locator::new(self.config.locator);
        if let Some(start) = locator.locate_start(files, window.start)? {
            let mut lines = WindowedLines::new(files, *window, start);
            for line in lines.by_ref() {
                let sample = Sample::from(&line?);
                match self.config.spike_filter.check(
                    series.accepted(),
                    series.last_current(),
                    sample.current,
                ) {
                    Some(Rejection::Jump) => stats.rejected_jumps += 1,
                    Some(Rejection::ArtifactBand) => stats.rejected_band += 1,
                    None => series.accept(sample),
                }
            }
            stats.scan = lines.stats();
        }

        series.close(window.end);
        stats.accepted = series.accepted();
        info!("{}", stats);
        Ok(stats)
    }
}
