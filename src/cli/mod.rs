use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use hvtrace::catalog::{RunCatalog, RunId, RunRange};
use hvtrace::device::ChannelTable;
use hvtrace::export::ExportFormat;

mod devices;
mod runs;
mod show;

mod config;

pub use config::Config;

/// hvtrace - HV supply current and voltage over beam-test runs
#[derive(Parser)]
#[command(name = "hvtrace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Export layout.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    /// Pretty-printed JSON
    Json,
    /// One row per sample
    Csv,
    /// One row per device with list columns
    Parquet,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Parquet => ExportFormat::Parquet,
        }
    }
}

/// Inputs shared by the commands that read the run catalog.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Run catalog JSON file
    #[arg(short = 'l', long = "runlog", value_name = "FILE")]
    run_log: Option<PathBuf>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Run range selection.
#[derive(Args, Debug)]
pub struct RangeArgs {
    /// First run of the range
    #[arg(value_name = "START_RUN")]
    start: String,

    /// Last run of the range (defaults to START_RUN)
    #[arg(value_name = "END_RUN")]
    end: Option<String>,

    /// Channel-name table TOML file, merged over [devices] of the config
    #[arg(long, value_name = "FILE")]
    channels: Option<PathBuf>,
}

impl RangeArgs {
    fn range(&self) -> RunRange {
        RunRange::new(
            RunId::new(self.start.as_str()),
            self.end.as_deref().map(RunId::new),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the HV series of every device active in a run range
    Show {
        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        input: InputArgs,

        /// Directory with one log directory per device
        #[arg(short = 'd', long = "data", value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Keep current spikes instead of filtering them
        #[arg(long)]
        keep_spikes: bool,

        /// Write the series to this file
        #[arg(short = 'o', long, value_name = "PATH")]
        export: Option<PathBuf>,

        /// Export layout (guessed from the file extension when omitted)
        #[arg(short = 'f', long, value_enum)]
        format: Option<FormatArg>,
    },

    /// List the runs of the catalog
    Runs {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the devices active in a run range
    Devices {
        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        input: InputArgs,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Show {
            range,
            input,
            data_dir,
            keep_spikes,
            export,
            format,
        } => show::run(
            range,
            input,
            data_dir,
            keep_spikes,
            export,
            format.map(ExportFormat::from),
        ),
        Commands::Runs { input } => runs::run(input),
        Commands::Devices { range, input } => devices::run(range, input),
    }
}

/// Config plus the run catalog it points to.
struct Inputs {
    config: Config,
    catalog: RunCatalog,
}

impl InputArgs {
    fn load(self) -> Result<Inputs> {
        let config = Config::load(self.config.as_deref())?;
        let run_log = config.run_log(self.run_log);
        let catalog = RunCatalog::load_or_empty(&run_log, &config.time_format())
            .with_context(|| format!("Failed to load run catalog: {}", run_log.display()))?;
        Ok(Inputs { config, catalog })
    }
}

/// Config channel table with an optional standalone table merged over it.
fn channel_table(config: &Config, extra: Option<&Path>) -> Result<ChannelTable> {
    let mut table = config.devices.clone();
    if let Some(path) = extra {
        let loaded = ChannelTable::from_path(path)
            .with_context(|| format!("Failed to load channel table: {}", path.display()))?;
        for prefix in loaded.prefixes() {
            if let Some(info) = loaded.get(prefix) {
                table.insert(prefix, info.clone());
            }
        }
    }
    Ok(table)
}

/// Print the first and last run of a range with their times.
fn write_run_times<W: Write>(out: &mut W, catalog: &RunCatalog, range: &RunRange) -> io::Result<()> {
    if let Some(first) = catalog.get(&range.start) {
        writeln!(out, "Starting with run {} at {}", first.run, first.begin)?;
    }
    if let Some(last) = catalog.get(&range.end) {
        writeln!(out, "Ending with run {} at {}", last.run, last.end)?;
    }
    Ok(())
}

#[cfg(feature = "colorized_output")]
fn heading(text: &str) -> String {
    console::style(text).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn heading(text: &str) -> String {
    text.to_string()
}
