use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use mcellrel::container::ApiVersion;
use std::path::PathBuf;

mod analyze;
mod config;
mod demo;
mod info;

use analyze::AnalyzeArgs;

/// mcellrel - Vesicle release analysis for MCell binary reaction output
#[derive(Parser)]
#[command(name = "mcellrel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Container layout to write.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ApiArg {
    /// MCELL_BINARY_API_1
    V1,
    /// MCELL_BINARY_API_2
    #[default]
    V2,
}

impl From<ApiArg> for ApiVersion {
    fn from(arg: ApiArg) -> Self {
        match arg {
            ApiArg::V1 => ApiVersion::V1,
            ApiArg::V2 => ApiVersion::V2,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Detect vesicle release in MCell binary output files
    Analyze {
        /// Binary output files, one realization each
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Number of worker threads. Each worker holds one decoded file in
        /// memory at a time
        #[arg(short = 'T', long)]
        threads: Option<usize>,

        /// Bound sites required to activate a sensor
        #[arg(short = 'n', long = "sites")]
        sites_required: Option<usize>,

        /// Active sensors required for deterministic release
        #[arg(short = 'a', long = "active")]
        sensors_required_active: Option<usize>,

        /// Model file describing vesicles and sensors (defaults to the
        /// built-in mouse NMJ model)
        #[arg(short = 'm', long, value_name = "FILE")]
        model: Option<PathBuf>,

        /// Load run settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Use the stochastic energy model instead of the threshold rule
        #[arg(long)]
        energy: bool,

        /// Base seed for the energy model
        #[arg(long)]
        rng_seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display header information about a binary output file
    Info {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate synthetic output files for the mouse NMJ model
    Demo {
        /// Directory to write into
        #[arg(value_name = "OUTPUT_DIR", default_value = "demo_data")]
        output_dir: PathBuf,

        /// Number of realizations to write
        #[arg(long, default_value = "8")]
        count: u32,

        /// Container layout
        #[arg(long, default_value = "v2", value_enum)]
        api: ApiArg,

        /// Iterations per realization
        #[arg(long, default_value = "2000")]
        iterations: u64,
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
        Commands::Analyze {
            files,
            threads,
            sites_required,
            sensors_required_active,
            model,
            config,
            energy,
            rng_seed,
            json,
        } => analyze::run(AnalyzeArgs {
            files,
            threads,
            sites_required,
            sensors_required_active,
            model,
            config,
            energy,
            rng_seed,
            json,
        }),
        Commands::Info { file } => info::run(file),
        Commands::Demo {
            output_dir,
            count,
            api,
            iterations,
        } => demo::run(output_dir, count, ApiVersion::from(api), iterations),
    }
}
