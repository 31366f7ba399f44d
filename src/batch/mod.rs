//! # Batch Analysis Module
//!
//! Fans a list of container files out over a fixed pool of workers, runs
//! decoding and release detection on each, and merges the per-file results
//! into an [`AggregateReport`] in input order.
//!
//! A file that cannot be opened or decoded becomes a failed [`FileReport`]
//! and never stops its siblings. Only conditions that leave nothing to
//! analyze are fatal ([`BatchError`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use mcellrel::batch::BatchRunner;
//! use mcellrel::model::presets;
//!
//! let config = presets::mouse_nmj(2)?;
//! let files = vec![PathBuf::from("run.0001.bin.bz2"), PathBuf::from("run.0002.bin.bz2")];
//! let report = BatchRunner::new(&config).run(&files, 4)?;
//! println!("{}", report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod report;
mod runner;

#[cfg(test)]
mod tests;

pub use report::{AggregateReport, FileReport, FileResult, LatencySummary, VesicleLatencies};
pub use runner::{realization_seed, BatchRunner, SeedError, DEFAULT_SEED};

/// Conditions that abort a whole batch run
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The path list is empty
    #[error("no input files given")]
    NoInputs,

    /// Zero workers requested
    #[error("concurrency must be at least 1")]
    InvalidConcurrency,

    /// The worker pool could not be created
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Every input failed with an I/O error
    #[error("none of the {attempted} input files could be read")]
    NoReadableInputs {
        /// Number of files attempted
        attempted: usize,
    },
}
