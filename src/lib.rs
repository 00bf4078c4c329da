//! # hvtrace - HV Supply Logs over Beam-Test Runs
//!
//! `hvtrace` extracts the bias voltage and leakage current of detector diodes
//! from the text logs of their high-voltage supplies, for the wall-clock window
//! of one or more beam-test runs.
//!
//! ## Key Features
//!
//! - **Run catalog**: run ids map to begin/end times and to the HV slots
//!   (diode + supply channel) that were active, validated at load time.
//!
//! - **Bounded start search**: device logs are rotated files that can reach
//!   gigabytes; the first file to read is picked from the close time embedded
//!   in each name, and the start offset inside it by a fixed number of halving
//!   probes instead of a full scan.
//!
//! - **Lazy windowed extraction**: lines are streamed one file at a time and
//!   the scan stops at the first line past the window end.
//!
//! - **De-spiking**: implausible current jumps and a known instrument artifact
//!   band are filtered out; the filter can be switched off.
//!
//! - **Renderer boundary**: every device yields an ordered series framed by
//!   boundary samples plus axis margins, exportable as JSON, CSV or Parquet.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hvtrace::catalog::{CatalogTimeFormat, RunCatalog, RunId, RunRange};
//! use hvtrace::device::ChannelTable;
//! use hvtrace::extract::ExtractionConfig;
//! use hvtrace::series::assemble_runs;
//!
//! let catalog = RunCatalog::from_path("run_log.json", &CatalogTimeFormat::default())?;
//! let channels = ChannelTable::from_path("channels.toml")?;
//! let range = RunRange::new(RunId::from("22008"), Some(RunId::from("22010")));
//!
//! let run = assemble_runs(
//!     &catalog,
//!     &range,
//!     &channels,
//!     "HV_DATA".as_ref(),
//!     ExtractionConfig::default(),
//! )?;
//! for series in &run.series {
//!     println!("{}: {} samples", series.device.diode, series.samples.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`catalog`]: run catalog and time windows
//! - [`device`]: channel-name table and device resolution
//! - [`logfile`]: log file naming and line parsing
//! - [`locator`]: start file and offset search
//! - [`extract`]: windowed extraction and de-spiking
//! - [`series`]: per-device series and axis margins
//! - [`export`]: JSON, CSV and Parquet output
//!
//! ## Data Layout
//!
//! ```text
//! HV_DATA/
//! ├── ISEG-NHS_CH4/
//! │   ├── ISEG-NHS_CH4_2016_09_04_12_30_00.log
//! │   └── ISEG-NHS_CH4_2016_09_04_18_30_00.log
//! └── Keithley1_CH0/
//!     └── Keithley1_CH0_160904_123000.log
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod device;
pub mod export;
pub mod extract;
pub mod locator;
pub mod logfile;
pub mod series;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::catalog::{
        CatalogError, CatalogTimeFormat, RunCatalog, RunCatalogEntry, RunId, RunRange, TimeWindow,
    };
    pub use crate::device::{resolve, ChannelTable, Device, DeviceMap, ResolveError, UnitInfo};
    pub use crate::export::{write_series, write_series_file, ExportError, ExportFormat, ExportStats};
    pub use crate::extract::{
        ExtractError, ExtractStats, ExtractionConfig, Extractor, Sample, SeriesAccumulator,
        SpikeFilter,
    };
    pub use crate::locator::{Locator, LocatorConfig, StartPosition};
    pub use crate::logfile::{LogFile, LogFileError, LogLine};
    pub use crate::series::{
        assemble_runs, compute_margins, AxisMargins, AxisRange, RunSeries, SeriesAssembler,
        SeriesError, SeriesExtent, SeriesWindow,
    };
}
