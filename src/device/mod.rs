//! # Device Resolver
//!
//! Turns the HV slots of every run in a run range into the set of monitored
//! devices, keyed by diode id. A descriptor such as `HV7-CH4` names the supply
//! unit (`HV7`, looked up in the [`ChannelTable`]) and the channel (`CH4`,
//! defaulting to `CH0` when absent).
//!
//! A diode that is wired to different descriptors within the range means the
//! catalog is inconsistent; resolution stops with
//! [`ResolveError::ConfigurationConflict`] instead of picking one.

mod channels;
mod error;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::catalog::{RunCatalog, RunRange};

pub use channels::{ChannelTable, UnitInfo};
pub use error::ResolveError;

/// Channel used when a descriptor carries no channel part
pub const DEFAULT_CHANNEL: &str = "CH0";

/// Resolved devices keyed by diode id
pub type DeviceMap = BTreeMap<String, Device>;

/// A monitored detector channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Full descriptor from the catalog, e.g. `HV7-CH4`
    pub full: String,
    /// Display name of the supply unit
    pub name: String,
    /// Supply channel, e.g. `CH4`
    pub channel: String,
    /// Diode (detector) id
    pub diode: String,
}

impl Device {
    /// Directory holding this device's log files: `<data_dir>/<name>_<channel>`
    pub fn log_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}_{}", self.name, self.channel))
    }
}

/// Split a descriptor into unit prefix and channel
pub fn split_descriptor(descriptor: &str) -> (&str, &str) {
    let mut parts = descriptor.split('-');
    let unit = parts.next().unwrap_or(descriptor);
    let channel = parts.next().unwrap_or(DEFAULT_CHANNEL);
    (unit, channel)
}

/// Resolve the devices active in `range`.
///
/// Scans every catalog entry whose run id lies in the range and every HV slot
/// of those entries.
pub fn resolve(
    catalog: &RunCatalog,
    range: &RunRange,
    channels: &ChannelTable,
) -> Result<DeviceMap, ResolveError> {
    let mut devices = DeviceMap::new();

    for entry in catalog.range(range) {
        for slot in &entry.slots {
            if let Some(known) = devices.get(&slot.diode) {
                if known.full != slot.descriptor {
                    return Err(ResolveError::ConfigurationConflict {
                        diode: slot.diode.clone(),
                        existing: known.full.clone(),
                        conflicting: slot.descriptor.clone(),
                        run: entry.run.to_string(),
                    });
                }
                continue;
            }

            let (unit, channel) = split_descriptor(&slot.descriptor);
            let info = channels
                .get(unit)
                .ok_or_else(|| ResolveError::UnknownUnit {
                    unit: unit.to_string(),
                    descriptor: slot.descriptor.clone(),
                })?;

            devices.insert(
                slot.diode.clone(),
                Device {
                    full: slot.descriptor.clone(),
                    name: info.name.clone(),
                    channel: channel.to_string(),
                    diode: slot.diode.clone(),
                },
            );
        }
    }

    info!(
        "HV devices for run {}: {:?}",
        range,
        devices.values().map(|d| d.full.as_str()).collect::<Vec<_>>()
    );
    Ok(devices)
}
