use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ResolveError;

/// Entry of the channel-name table: one HV supply unit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitInfo {
    /// Human-readable device name; also names the log directory
    pub name: String,

    /// Supply model, informational only
    #[serde(default)]
    pub model: Option<String>,
}

/// Channel-name table keyed by descriptor prefix (e.g. `HV7`).
///
/// Stored as TOML with one table per unit:
///
/// ```toml
/// [HV7]
/// name = "ISEG-NHS"
/// model = "NHS 6220n"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelTable {
    units: BTreeMap<String, UnitInfo>,
}

impl ChannelTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a standalone table from a TOML file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ResolveError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse a table from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ResolveError> {
        Ok(toml::from_str(content)?)
    }

    /// Register or replace a unit
    pub fn insert(&mut self, prefix: impl Into<String>, info: UnitInfo) {
        self.units.insert(prefix.into(), info);
    }

    /// Look up a unit by descriptor prefix
    pub fn get(&self, prefix: &str) -> Option<&UnitInfo> {
        self.units.get(prefix)
    }

    /// Known unit prefixes
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    /// Number of units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
