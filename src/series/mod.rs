//! # Series Assembler
//!
//! Runs the extractor for every resolved device and packages each result as a
//! [`SeriesWindow`]: the ordered samples (boundaries included) plus the axis
//! margins a renderer needs. Devices are independent of each other; with the
//! `parallel` feature they are assembled on the rayon thread pool.

mod error;
mod margins;


use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::{RunCatalog, RunRange, TimeWindow};
use crate::device::{self, ChannelTable, Device, DeviceMap};
use crate::extract::{ExtractStats, ExtractionConfig, Extractor, SeriesAccumulator};
use crate::logfile::{self, LogFileError};

pub use crate::extract::Sample;
pub use error::SeriesError;
pub use margins::{
    compute_margins, AxisMargins, AxisRange, SeriesExtent, CURRENT_PAD_FRACTION,
    FULL_VOLTAGE_LIMIT, LOW_VOLTAGE_LIMIT, MIN_CURRENT_SPAN, TIME_PAD_FRACTION,
};

/// Final series of one device over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesWindow {
    /// Device the samples belong to
    pub device: Device,
    /// Requested window
    pub window: TimeWindow,
    /// Ordered samples, first and last are boundaries
    pub samples: Vec<Sample>,
    /// Plot ranges
    pub margins: AxisMargins,
    /// Extraction counters
    #[serde(skip)]
    pub stats: ExtractStats,
}

impl SeriesWindow {
    /// Measured (non-boundary) samples
    pub fn measured(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter().filter(|s| !s.boundary)
    }
}

/// Series for every device of a run range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSeries {
    /// Run range the window was taken from
    pub range: RunRange,
    /// Window covered
    pub window: TimeWindow,
    /// One entry per device, ordered by diode id
    pub series: Vec<SeriesWindow>,
}

/// Series Assembler
#[derive(Debug, Clone)]
pub struct SeriesAssembler {
    data_dir: PathBuf,
    extractor: Extractor,
    window: TimeWindow,
}

impl SeriesAssembler {
    /// Assemble `window` from device directories under `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>, window: TimeWindow, config: ExtractionConfig) -> Self {
        Self {
            data_dir: data_dir.into(),
            extractor: Extractor::new(config),
            window,
        }
    }

    /// Root of the device log directories
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Window being assembled
    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    /// Build the series of one device.
    ///
    /// A missing log directory is not an error: the device gets the two
    /// zero-valued boundary samples.
    pub fn assemble(&self, device: &Device) -> Result<SeriesWindow, SeriesError> {
        let dir = device.log_dir(&self.data_dir);
        let files = match logfile::discover(&dir) {
            Ok(files) => files,
            Err(LogFileError::DirectoryNotFound(path)) => {
                warn!("No log directory for {} at {}", device.diode, path.display());
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };

        let mut accumulator = SeriesAccumulator::new();
        let stats = self
            .extractor
            .extract(&files, &self.window, &mut accumulator)
            .map_err(|source| SeriesError::ExtractError {
                diode: device.diode.clone(),
                source,
            })?;
        info!("{} ({}): {}", device.diode, device.full, stats);

        let samples = accumulator.into_samples();
        let extent = SeriesExtent::from_samples(&samples)
            .unwrap_or_else(|| SeriesExtent::empty(&self.window));
        let margins = compute_margins(&extent);

        Ok(SeriesWindow {
            device: device.clone(),
            window: self.window,
            samples,
            margins,
            stats,
        })
    }

    /// Build the series of every device, ordered by diode id
    #[cfg(not(feature = "parallel"))]
    pub fn assemble_all(&self, devices: &DeviceMap) -> Result<Vec<SeriesWindow>, SeriesError> {
        devices.values().map(|device| self.assemble(device)).collect()
    }

    /// Build the series of every device, ordered by diode id
    #[cfg(feature = "parallel")]
    pub fn assemble_all(&self, devices: &DeviceMap) -> Result<Vec<SeriesWindow>, SeriesError> {
        use rayon::prelude::*;

        let devices: Vec<&Device> = devices.values().collect();
        devices
            .par_iter()
            .map(|device| self.assemble(device))
            .collect()
    }
}

/// Window, resolve and assemble a run range in one go
pub fn assemble_runs(
    catalog: &RunCatalog,
    range: &RunRange,
    channels: &ChannelTable,
    data_dir: &Path,
    config: ExtractionConfig,
) -> Result<RunSeries, SeriesError> {
    let window = catalog.window(range)?;
    let devices = device::resolve(catalog, range, channels)?;
    let assembler = SeriesAssembler::new(data_dir, window, config);
    let series = assembler.assemble_all(&devices)?;

    Ok(RunSeries {
        range: range.clone(),
        window,
        series,
    })
}
