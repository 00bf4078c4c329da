//! # Run Catalog
//!
//! The run catalog maps run ids to their wall-clock interval and the HV slots
//! (diode id + supply descriptor) that were active during the run. It is read
//! once from a JSON object keyed by run id:
//!
//! ```json
//! {
//!   "22008": {
//!     "begin": "Sun Sep 04 10:00:00 2016",
//!     "end": "Sun Sep 04 11:00:00 2016",
//!     "dia1": "II6-B2-Strip", "hv1": "HV7-CH4", "bias1": "-500",
//!     "nevents": "50000"
//!   }
//! }
//! ```
//!
//! Entries are validated at load time so that later stages never see a
//! half-formed record.

mod entry;
mod error;
mod time;


use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use entry::{HvSlot, RunCatalogEntry, RunId, RunRange};
pub use error::CatalogError;
pub use time::{CatalogTimeFormat, DEFAULT_TIME_FORMAT};

/// Half-open wall-clock interval `[start, end)` selected by a run range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Window start
    pub start: NaiveDateTime,
    /// Window end
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Create a window; `start` must be strictly before `end`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, CatalogError> {
        if start >= end {
            return Err(CatalogError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Strictly inside the window: `start < t < end`
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start < t && t < self.end
    }

    /// `t` is at or beyond the window end
    pub fn is_past(&self, t: NaiveDateTime) -> bool {
        t >= self.end
    }

    /// Length of the window
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Run catalog, ordered by run id
#[derive(Debug, Clone, Default)]
pub struct RunCatalog {
    entries: BTreeMap<RunId, RunCatalogEntry>,
}

impl RunCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the catalog from a JSON file
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        time_format: &CatalogTimeFormat,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| CatalogError::Unavailable {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_json_str(&content, time_format)?;
        debug!("Loaded {} runs from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Load the catalog, degrading to an empty catalog when the file cannot be read.
    ///
    /// Only a missing/unreadable file is tolerated; a readable file with bad
    /// content is still an error.
    pub fn load_or_empty<P: AsRef<Path>>(
        path: P,
        time_format: &CatalogTimeFormat,
    ) -> Result<Self, CatalogError> {
        match Self::from_path(path, time_format) {
            Ok(catalog) => Ok(catalog),
            Err(err @ CatalogError::Unavailable { .. }) => {
                warn!("{}\n  Could not load default run catalog!", err);
                Ok(Self::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Parse a catalog from JSON text
    pub fn from_json_str(json: &str, time_format: &CatalogTimeFormat) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, BTreeMap<String, Value>> = serde_json::from_str(json)?;
        let mut entries = BTreeMap::new();
        for (run, fields) in &raw {
            let entry = RunCatalogEntry::from_fields(run, fields, time_format)?;
            entries.insert(entry.run.clone(), entry);
        }
        Ok(Self { entries })
    }

    /// Build a catalog from already validated entries
    pub fn from_entries<I: IntoIterator<Item = RunCatalogEntry>>(entries: I) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.run.clone(), e)).collect(),
        }
    }

    /// Number of runs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no runs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a single run
    pub fn get(&self, run: &RunId) -> Option<&RunCatalogEntry> {
        self.entries.get(run)
    }

    /// All entries in run order
    pub fn iter(&self) -> impl Iterator<Item = &RunCatalogEntry> {
        self.entries.values()
    }

    /// Entries whose run id lies in `range` (inclusive), in run order
    pub fn range<'a>(&'a self, range: &'a RunRange) -> impl Iterator<Item = &'a RunCatalogEntry> {
        self.entries
            .values()
            .filter(move |entry| range.contains(&entry.run))
    }

    /// Time window from the begin of the first run to the end of the last run
    pub fn window(&self, range: &RunRange) -> Result<TimeWindow, CatalogError> {
        let first = self
            .get(&range.start)
            .ok_or_else(|| CatalogError::UnknownRun(range.start.to_string()))?;
        let last = self
            .get(&range.end)
            .ok_or_else(|| CatalogError::UnknownRun(range.end.to_string()))?;
        TimeWindow::new(first.begin, last.end)
    }
}
