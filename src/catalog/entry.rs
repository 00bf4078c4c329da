use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CatalogError, CatalogTimeFormat};

/// Run identifier as written in the catalog (usually a five-digit number).
///
/// Numeric ids compare numerically; non-numeric ids sort after all numeric
/// ones in plain string order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Create a run id from its catalog key
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Catalog key of this run
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for RunId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for RunId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Inclusive range of runs, `start..=end` in catalog order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRange {
    /// First run of the range
    pub start: RunId,
    /// Last run of the range
    pub end: RunId,
}

impl RunRange {
    /// Range from `start` to `end`; a missing end means a single run
    pub fn new(start: RunId, end: Option<RunId>) -> Self {
        let end = end.unwrap_or_else(|| start.clone());
        Self { start, end }
    }

    /// Range covering exactly one run
    pub fn single(run: RunId) -> Self {
        Self::new(run, None)
    }

    /// Whether `run` lies inside the range (both ends inclusive)
    pub fn contains(&self, run: &RunId) -> bool {
        &self.start <= run && run <= &self.end
    }
}

impl fmt::Display for RunRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} - {}", self.start, self.end)
        }
    }
}

/// One HV slot of a catalog entry: `hv{n}` together with its `dia{n}`/`bias{n}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HvSlot {
    /// Slot key as found in the catalog, e.g. `hv1`
    pub key: String,
    /// Raw device/channel descriptor, e.g. `HV7-CH4`
    pub descriptor: String,
    /// Diode (detector) id assigned to this slot
    pub diode: String,
    /// Bias voltage setting, if recorded
    pub bias: Option<String>,
}

/// Validated run catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCatalogEntry {
    /// Run identifier
    pub run: RunId,
    /// Wall-clock start of the run
    pub begin: NaiveDateTime,
    /// Wall-clock end of the run
    pub end: NaiveDateTime,
    /// HV slots in slot-key order
    pub slots: Vec<HvSlot>,
    /// Number of recorded events, if known
    pub nevents: Option<String>,
}

impl RunCatalogEntry {
    /// Build an entry from the raw JSON object of one run.
    ///
    /// Every `hv{n}` key must be accompanied by a `dia{n}` key.
    pub(super) fn from_fields(
        run: &str,
        fields: &BTreeMap<String, Value>,
        time_format: &CatalogTimeFormat,
    ) -> Result<Self, CatalogError> {
        let begin = parse_time(run, fields, "begin", time_format)?;
        let end = parse_time(run, fields, "end", time_format)?;

        let mut slots = Vec::new();
        for (key, value) in fields {
            let Some(suffix) = key.strip_prefix("hv") else {
                continue;
            };
            let descriptor = value.as_str().ok_or_else(|| CatalogError::InvalidField {
                run: run.to_string(),
                field: key.clone(),
            })?;
            let diode_key = format!("dia{}", suffix);
            let diode = fields
                .get(&diode_key)
                .map(scalar_to_string)
                .ok_or_else(|| CatalogError::MissingField {
                    run: run.to_string(),
                    field: diode_key.clone(),
                })?;

            slots.push(HvSlot {
                key: key.clone(),
                descriptor: descriptor.to_string(),
                diode,
                bias: fields.get(&format!("bias{}", suffix)).map(scalar_to_string),
            });
        }

        Ok(Self {
            run: RunId::new(run),
            begin,
            end,
            slots,
            nevents: fields.get("nevents").map(scalar_to_string),
        })
    }
}

fn parse_time(
    run: &str,
    fields: &BTreeMap<String, Value>,
    field: &str,
    time_format: &CatalogTimeFormat,
) -> Result<NaiveDateTime, CatalogError> {
    let raw = fields.get(field).ok_or_else(|| CatalogError::MissingField {
        run: run.to_string(),
        field: field.to_string(),
    })?;
    let value = raw.as_str().ok_or_else(|| CatalogError::InvalidField {
        run: run.to_string(),
        field: field.to_string(),
    })?;

    time_format
        .parse(value)
        .ok_or_else(|| CatalogError::InvalidTime {
            run: run.to_string(),
            value: value.to_string(),
            format: time_format.format().to_string(),
        })
}

// Catalog writers are inconsistent about quoting numbers.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
