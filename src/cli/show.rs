use anyhow::{Context, Result};
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use hvtrace::catalog::{RunCatalog, RunRange};
use hvtrace::device::ChannelTable;
use hvtrace::export::{write_series_file, ExportFormat};
use hvtrace::extract::ExtractionConfig;
use hvtrace::series::{assemble_runs, RunSeries, SeriesWindow};

use super::{channel_table, heading, write_run_times, InputArgs, RangeArgs};

/// Extract and summarise the series of every device in a run range
pub fn run(
    range_args: RangeArgs,
    input: InputArgs,
    data_dir: Option<PathBuf>,
    keep_spikes: bool,
    export: Option<PathBuf>,
    format: Option<ExportFormat>,
) -> Result<()> {
    let inputs = input.load()?;
    let config = &inputs.config;
    let range = range_args.range();
    let channels = channel_table(config, range_args.channels.as_deref())?;
    let data_dir = config.data_dir(data_dir);

    let mut extraction = config.extraction();
    if keep_spikes {
        extraction.spike_filter.enabled = false;
    }

    info!("Data directory: {}", data_dir.display());
    info!("De-spiking: {}", extraction.spike_filter.enabled);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let run = write_report(&mut out, &inputs.catalog, &range, &channels, &data_dir, extraction)?;

    if let Some(path) = export {
        let format = format
            .or_else(|| ExportFormat::from_path(&path))
            .unwrap_or_default();
        let stats = write_series_file(&path, format, &run)
            .with_context(|| format!("Failed to export series to {}", path.display()))?;
        writeln!(out)?;
        writeln!(out, "{} to {}", stats, path.display())?;
    }

    Ok(())
}

/// Assemble first, so a failing range writes nothing
fn write_report<W: Write>(
    out: &mut W,
    catalog: &RunCatalog,
    range: &RunRange,
    channels: &ChannelTable,
    data_dir: &Path,
    extraction: ExtractionConfig,
) -> Result<RunSeries> {
    let run = assemble_runs(catalog, range, channels, data_dir, extraction)
        .with_context(|| format!("Failed to assemble series for run {}", range))?;

    write_run_times(out, catalog, range)?;
    writeln!(out)?;
    writeln!(out, "{}", heading(&format!("HV series for run {}", range)))?;
    writeln!(out, "Window: {} - {}", run.window.start, run.window.end)?;
    for series in &run.series {
        write_series_summary(out, series)?;
    }

    Ok(run)
}

fn write_series_summary<W: Write>(out: &mut W, series: &SeriesWindow) -> io::Result<()> {
    let device = &series.device;
    writeln!(out)?;
    writeln!(
        out,
        "  {} on {} ({} {})",
        device.diode, device.full, device.name, device.channel
    )?;

    let measured: Vec<_> = series.measured().collect();
    if measured.is_empty() {
        writeln!(out, "    no data in window")?;
    } else {
        let (first, last) = (measured[0], measured[measured.len() - 1]);
        writeln!(out, "    samples: {}", measured.len())?;
        writeln!(
            out,
            "    first:   {}  {:>9.2} V  {:>10.3} nA",
            first.time, first.voltage, first.current
        )?;
        writeln!(
            out,
            "    last:    {}  {:>9.2} V  {:>10.3} nA",
            last.time, last.voltage, last.current
        )?;
    }

    let margins = &series.margins;
    writeln!(
        out,
        "    axes:    current [{:.3}, {:.3}] nA, voltage [{:.0}, {:.0}] V",
        margins.current.min, margins.current.max, margins.voltage.min, margins.voltage.max
    )?;
    info!("    {}", series.stats);
    Ok(())
}
