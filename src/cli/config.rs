//! TOML configuration file support.
//!
//! Paths, catalog parsing, extraction tuning and the channel-name table can be
//! kept in one file instead of being passed on every call:
//!
//! ```toml
//! # hvtrace.toml
//! [paths]
//! run_log = "run_log.json"
//! data_dir = "HV_DATA"
//!
//! [extraction]
//! ignore_jumps = true
//! artifact_band = [230.0, 250.0]
//!
//! [devices.HV7]
//! name = "ISEG-NHS"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use hvtrace::catalog::CatalogTimeFormat;
use hvtrace::device::ChannelTable;
use hvtrace::extract::{ExtractionConfig, SpikeFilter};
use hvtrace::locator::LocatorConfig;

/// Default run catalog path
pub const DEFAULT_RUN_LOG: &str = "run_log.json";

/// Default root of the device log directories
pub const DEFAULT_DATA_DIR: &str = "HV_DATA";

/// Root configuration structure for hvtrace.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Input locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Run catalog parsing.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Extraction tuning.
    #[serde(default)]
    pub extraction: ExtractionSection,

    /// Channel-name table keyed by descriptor prefix.
    #[serde(default)]
    pub devices: ChannelTable,
}

/// Input locations.
#[derive(Debug, Default, Deserialize)]
pub struct PathsConfig {
    /// Run catalog JSON file.
    pub run_log: Option<PathBuf>,

    /// Directory holding one log directory per device.
    pub data_dir: Option<PathBuf>,
}

/// Run catalog parsing.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// chrono format of begin/end after the weekday token is dropped.
    pub time_format: Option<String>,
}

/// Extraction tuning; unset fields keep the built-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractionSection {
    /// Enable the de-spiking heuristic.
    pub ignore_jumps: Option<bool>,

    /// Ratio to the previous current that marks a spike.
    pub jump_factor: Option<f64>,

    /// Accepted samples required before jump rejection.
    pub min_history: Option<usize>,

    /// Previous current (nA) above which jump rejection applies.
    pub min_previous_current: Option<f64>,

    /// Artifact band in nA, inclusive.
    pub artifact_band: Option<(f64, f64)>,

    /// Files with fewer lines are read from the start.
    pub search_min_lines: Option<u64>,

    /// Halving probes for larger files.
    pub search_steps: Option<u32>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Run catalog path: CLI flag, then config, then default.
    pub fn run_log(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.paths.run_log.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RUN_LOG))
    }

    /// Data directory: CLI flag, then config, then default.
    pub fn data_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.paths.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Catalog time format.
    pub fn time_format(&self) -> CatalogTimeFormat {
        self.catalog
            .time_format
            .as_deref()
            .map(CatalogTimeFormat::new)
            .unwrap_or_default()
    }

    /// Extraction settings merged over the defaults.
    pub fn extraction(&self) -> ExtractionConfig {
        let section = &self.extraction;
        let defaults = ExtractionConfig::default();
        let filter = defaults.spike_filter;
        let locator = defaults.locator;

        ExtractionConfig {
            spike_filter: SpikeFilter {
                enabled: section.ignore_jumps.unwrap_or(filter.enabled),
                jump_factor: section.jump_factor.unwrap_or(filter.jump_factor),
                min_history: section.min_history.unwrap_or(filter.min_history),
                min_previous: section.min_previous_current.unwrap_or(filter.min_previous),
                artifact_band: section.artifact_band.unwrap_or(filter.artifact_band),
            },
            locator: LocatorConfig {
                min_lines: section.search_min_lines.unwrap_or(locator.min_lines),
                halving_steps: section.search_steps.unwrap_or(locator.halving_steps),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [paths]
            run_log = "runs/run_log.json"
            data_dir = "/data/HV"

            [catalog]
            time_format = "%d.%m.%Y %H:%M:%S"

            [extraction]
            ignore_jumps = false
            jump_factor = 50.0
            min_history = 10
            min_previous_current = 0.1
            artifact_band = [100.0, 110.0]
            search_min_lines = 500
            search_steps = 8

            [devices.HV7]
            name = "ISEG-NHS"
            model = "NHS 6220n"

            [devices.HV1]
            name = "Keithley1"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.run_log(None), PathBuf::from("runs/run_log.json"));
        assert_eq!(config.data_dir(None), PathBuf::from("/data/HV"));
        assert_eq!(config.time_format().format(), "%d.%m.%Y %H:%M:%S");

        let extraction = config.extraction();
        assert!(!extraction.spike_filter.enabled);
        assert_eq!(extraction.spike_filter.jump_factor, 50.0);
        assert_eq!(extraction.spike_filter.min_history, 10);
        assert_eq!(extraction.spike_filter.min_previous, 0.1);
        assert_eq!(extraction.spike_filter.artifact_band, (100.0, 110.0));
        assert_eq!(extraction.locator.min_lines, 500);
        assert_eq!(extraction.locator.halving_steps, 8);

        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.devices.get("HV7").unwrap().name, "ISEG-NHS");
        assert_eq!(config.devices.get("HV1").unwrap().model, None);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [extraction]
            ignore_jumps = false
        "#;

        let config = Config::from_str(toml).unwrap();
        let extraction = config.extraction();
        assert!(!extraction.spike_filter.enabled);
        assert_eq!(extraction.spike_filter.jump_factor, 100.0);
        assert_eq!(extraction.locator, LocatorConfig::default());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.run_log(None), PathBuf::from(DEFAULT_RUN_LOG));
        assert_eq!(config.data_dir(None), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.extraction(), ExtractionConfig::default());
        assert!(config.devices.is_empty());
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::from_str("[paths]\ndata_dir = \"cfg\"\n").unwrap();
        assert_eq!(
            config.data_dir(Some(PathBuf::from("flag"))),
            PathBuf::from("flag")
        );
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::from_str("[extraction]\nsearch_steps = \"six\"\n").is_err());
    }
}
