use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;

use super::report::{AggregateReport, FileReport, FileResult};
use super::BatchError;
use crate::container::ContainerReader;
use crate::model::AnalysisConfig;
use crate::release::{HazardModel, ReleaseDetector};

/// Seed MCell uses when none is given
pub const DEFAULT_SEED: u32 = 1;

/// Runs decode + release detection over many files on a fixed worker pool.
///
/// Paths are split into `concurrency` contiguous partitions, one per worker.
/// Each worker processes its partition sequentially and drops every trace
/// before opening the next file, so peak memory grows with the worker count
/// rather than the file count. Results are merged in partition order, which
/// makes the report independent of scheduling.
pub struct BatchRunner<'a> {
    detector: ReleaseDetector<'a>,
}

impl<'a> BatchRunner<'a> {
    /// Runner using the configured fusion rule
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self {
            detector: ReleaseDetector::new(config),
        }
    }

    /// Runner with a custom hazard for the energy model
    pub fn with_hazard(config: &'a AnalysisConfig, hazard: impl HazardModel + 'a) -> Self {
        Self {
            detector: ReleaseDetector::with_hazard(config, hazard),
        }
    }

    /// Analyze `paths` with `concurrency` workers
    pub fn run(&self, paths: &[PathBuf], concurrency: usize) -> Result<AggregateReport, BatchError> {
        if paths.is_empty() {
            return Err(BatchError::NoInputs);
        }
        if concurrency == 0 {
            return Err(BatchError::InvalidConcurrency);
        }

        let workers = concurrency.min(paths.len());
        let partition_size = (paths.len() + workers - 1) / workers;
        info!(
            "Analyzing {} files with {} workers ({} files each)",
            paths.len(),
            workers,
            partition_size
        );

        let start = Instant::now();
        let files: Vec<FileReport> = if workers == 1 {
            self.process_partition(paths)
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("mcellrel-worker-{}", i))
                .build()?;
            let partitions: Vec<Vec<FileReport>> = pool.install(|| {
                paths
                    .par_chunks(partition_size)
                    .map(|partition| self.process_partition(partition))
                    .collect()
            });
            partitions.into_iter().flatten().collect()
        };

        let readable = files
            .iter()
            .any(|f| !matches!(f.result, FileResult::Failed { io: true, .. }));
        if !readable {
            return Err(BatchError::NoReadableInputs {
                attempted: files.len(),
            });
        }

        let report =
            AggregateReport::from_files(self.detector.config().topology().vesicle_ids(), files);
        info!(
            "Finished in {:.2?}: {} released, {} not released, {} failed vesicles, {} failed files",
            start.elapsed(),
            report.released,
            report.not_released,
            report.failed_vesicles,
            report.failed_files
        );
        Ok(report)
    }

    fn process_partition(&self, partition: &[PathBuf]) -> Vec<FileReport> {
        partition.iter().map(|path| self.process_file(path)).collect()
    }

    fn process_file(&self, path: &Path) -> FileReport {
        let seed = match realization_seed(path) {
            Ok(seed) => seed,
            Err(SeedError::Missing) => {
                warn!(
                    "{}: no seed in file name, assuming seed {}",
                    path.display(),
                    DEFAULT_SEED
                );
                DEFAULT_SEED
            }
            Err(err) => {
                warn!("{}: {}", path.display(), err);
                return FileReport {
                    path: path.to_path_buf(),
                    seed: DEFAULT_SEED,
                    result: FileResult::Failed {
                        error: err.to_string(),
                        io: false,
                    },
                };
            }
        };

        let result = match ContainerReader::open_full(path) {
            Ok(trace) => {
                let outcomes = self.detector.analyze(&trace, seed);
                debug!("{}: analyzed {} vesicles", path.display(), outcomes.len());
                FileResult::Analyzed(outcomes)
            }
            Err(err) => {
                warn!("{}: {}", path.display(), err);
                FileResult::Failed {
                    error: err.to_string(),
                    io: err.is_io(),
                }
            }
        };

        FileReport {
            path: path.to_path_buf(),
            seed,
            result,
        }
    }
}

/// Why no realization seed could be taken from a file name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    /// The name contains no digits
    #[error("no realization seed in file name")]
    Missing,

    /// The digits do not fit a 32-bit seed
    #[error("realization seed {0} in file name is out of range")]
    OutOfRange(String),
}

/// Realization seed encoded in an output file name, e.g. `run.0042.bin.bz2` → 42.
///
/// Compression and `.bin` suffixes are stripped and the last run of digits in
/// what remains is taken as the seed.
pub fn realization_seed(path: &Path) -> Result<u32, SeedError> {
    let mut name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(SeedError::Missing)?;
    for suffix in [".bz2", ".gz", ".bin"] {
        name = name.strip_suffix(suffix).unwrap_or(name);
    }

    let end = name
        .rfind(|c: char| c.is_ascii_digit())
        .ok_or(SeedError::Missing)?
        + 1;
    let start = name[..end]
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |i| i + 1);
    let digits = &name[start..end];
    digits
        .parse()
        .map_err(|_| SeedError::OutOfRange(digits.to_string()))
}
