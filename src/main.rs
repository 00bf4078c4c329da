//! # hvtrace
//!
//! Command-line front end for extracting HV supply series over beam-test runs.
//!
//! ## Usage
//!
//! ```bash
//! # Series of every device active in runs 22008 to 22010
//! hvtrace show 22008 22010 -l run_log.json -d HV_DATA
//!
//! # Same, without de-spiking, exported for plotting
//! hvtrace show 22008 --keep-spikes --export run22008.parquet
//!
//! # Catalog overview
//! hvtrace runs -l run_log.json
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
