//! # mcellrel
//!
//! Command-line front end for analyzing MCell binary reaction output.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze a batch of realizations with the mouse NMJ model on 8 threads
//! mcellrel analyze -T 8 -n 2 data/*.bin.bz2
//!
//! # Show the header of one file
//! mcellrel info data/run.0001.bin.bz2
//!
//! # Write synthetic input files
//! mcellrel demo demo_data --count 16
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
