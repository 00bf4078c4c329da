use anyhow::{Context, Result};
use std::io::{self, Write};

use hvtrace::catalog::{RunCatalog, RunRange};
use hvtrace::device::{resolve, split_descriptor, ChannelTable};

use super::{channel_table, heading, write_run_times, InputArgs, RangeArgs};

/// Print the devices resolved for a run range
pub fn run(range_args: RangeArgs, input: InputArgs) -> Result<()> {
    let inputs = input.load()?;
    let range = range_args.range();
    let channels = channel_table(&inputs.config, range_args.channels.as_deref())?;

    let stdout = io::stdout();
    write_devices(&mut stdout.lock(), &inputs.catalog, &range, &channels)
}

/// Resolve first, so a conflicting range writes nothing
fn write_devices<W: Write>(
    out: &mut W,
    catalog: &RunCatalog,
    range: &RunRange,
    channels: &ChannelTable,
) -> Result<()> {
    let devices = resolve(catalog, range, channels)
        .with_context(|| format!("Failed to resolve devices for run {}", range))?;

    write_run_times(out, catalog, range)?;
    writeln!(out, "{}", heading(&format!("{} devices for run {}", devices.len(), range)))?;
    for device in devices.values() {
        let model = channels
            .get(split_descriptor(&device.full).0)
            .and_then(|info| info.model.as_deref())
            .unwrap_or("-");
        writeln!(
            out,
            "  {:<16} {:<12} {:<16} {:<6} {}",
            device.diode, device.full, device.name, device.channel, model
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hvtrace::catalog::{CatalogTimeFormat, RunId};

    const CATALOG: &str = r#"{
        "100": {
            "begin": "Mon Jan 01 10:00:00 2016",
            "end": "Mon Jan 01 11:00:00 2016",
            "dia1": "D1", "hv1": "HV1-CH0"
        },
        "101": {
            "begin": "Mon Jan 01 11:10:00 2016",
            "end": "Mon Jan 01 12:00:00 2016",
            "dia1": "D1", "hv1": "HV7-CH2"
        }
    }"#;

    fn inputs() -> (RunCatalog, ChannelTable) {
        let catalog = RunCatalog::from_json_str(CATALOG, &CatalogTimeFormat::default()).unwrap();
        let channels = ChannelTable::from_toml_str(
            "[HV1]\nname = \"Keithley1\"\n\n[HV7]\nname = \"ISEG-NHS\"\nmodel = \"NHS 6220n\"\n",
        )
        .unwrap();
        (catalog, channels)
    }

    #[test]
    fn test_conflict_writes_nothing() {
        let (catalog, channels) = inputs();
        let range = RunRange::new(RunId::from("100"), Some(RunId::from("101")));

        let mut out = Vec::new();
        assert!(write_devices(&mut out, &catalog, &range, &channels).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_times_precede_devices() {
        let (catalog, channels) = inputs();
        let range = RunRange::single(RunId::from("101"));

        let mut out = Vec::new();
        write_devices(&mut out, &catalog, &range, &channels).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Starting with run 101"));
        assert!(lines[1].starts_with("Ending with run 101"));
        assert!(text.contains("NHS 6220n"));
    }
}
