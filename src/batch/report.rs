use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::Serialize;

use crate::release::ReleaseOutcome;

/// Analysis result for one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Input path
    pub path: PathBuf,
    /// Realization seed the block names were resolved with
    pub seed: u32,
    /// Per-vesicle outcomes, or why the file could not be analyzed
    #[serde(flatten)]
    pub result: FileResult,
}

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileResult {
    /// Outcomes in topology vesicle order
    Analyzed(Vec<ReleaseOutcome>),
    /// Open, decompress or decode failure
    Failed {
        /// Error message
        error: String,
        /// Whether the failure was an I/O error
        io: bool,
    },
}

/// Summary statistics over a set of latencies
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencySummary {
    /// Number of latencies
    pub count: usize,
    /// Mean latency in seconds
    pub mean: f64,
    /// Median latency in seconds
    pub median: f64,
    /// Smallest latency
    pub min: f64,
    /// Largest latency
    pub max: f64,
}

impl LatencySummary {
    /// Summarize `latencies`; `None` when empty
    pub fn from_latencies(latencies: &[f64]) -> Option<Self> {
        if latencies.is_empty() {
            return None;
        }
        let mut sorted = latencies.to_vec();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        let median = if count % 2 == 1 {
            sorted[count / 2]
        } else {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        };
        Some(Self {
            count,
            mean: sorted.iter().sum::<f64>() / count as f64,
            median,
            min: sorted[0],
            max: sorted[count - 1],
        })
    }
}

/// Latencies collected for one vesicle across all files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesicleLatencies {
    /// Vesicle identifier
    pub vesicle_id: String,
    /// Release latencies in input-file order
    pub latencies: Vec<f64>,
}

/// Aggregate over a batch run.
///
/// Keeps "no release" (a valid result) apart from "could not analyze".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    /// Per-file results in input order
    pub files: Vec<FileReport>,
    /// Vesicles that fused
    pub released: usize,
    /// Vesicles analyzed without a release
    pub not_released: usize,
    /// Vesicles that could not be analyzed
    pub failed_vesicles: usize,
    /// Files that could not be decoded
    pub failed_files: usize,
    /// All latencies, in input-file then vesicle order
    pub latencies: Vec<f64>,
    /// Latencies per vesicle, in topology order
    pub per_vesicle: Vec<VesicleLatencies>,
}

impl AggregateReport {
    /// Build the aggregate from per-file reports already in input order
    pub fn from_files(vesicle_ids: &[String], files: Vec<FileReport>) -> Self {
        let mut per_vesicle: Vec<VesicleLatencies> = vesicle_ids
            .iter()
            .map(|id| VesicleLatencies {
                vesicle_id: id.clone(),
                latencies: Vec::new(),
            })
            .collect();

        let mut report = Self {
            files: Vec::new(),
            released: 0,
            not_released: 0,
            failed_vesicles: 0,
            failed_files: 0,
            latencies: Vec::new(),
            per_vesicle: Vec::new(),
        };

        for file in &files {
            let outcomes = match &file.result {
                FileResult::Analyzed(outcomes) => outcomes,
                FileResult::Failed { .. } => {
                    report.failed_files += 1;
                    continue;
                }
            };
            for outcome in outcomes {
                if let Some(latency) = outcome.latency() {
                    report.released += 1;
                    report.latencies.push(latency);
                    if let Some(slot) = per_vesicle
                        .iter_mut()
                        .find(|v| v.vesicle_id == outcome.vesicle_id)
                    {
                        slot.latencies.push(latency);
                    }
                } else if outcome.failure().is_some() {
                    report.failed_vesicles += 1;
                } else {
                    report.not_released += 1;
                }
            }
        }

        report.files = files;
        report.per_vesicle = per_vesicle;
        report
    }

    /// Number of analyzed vesicle outcomes, failures included
    pub fn vesicle_count(&self) -> usize {
        self.released + self.not_released + self.failed_vesicles
    }

    /// Fraction of successfully analyzed vesicles that fused
    pub fn release_probability(&self) -> Option<f64> {
        let analyzed = self.released + self.not_released;
        (analyzed > 0).then(|| self.released as f64 / analyzed as f64)
    }

    /// Summary over all latencies
    pub fn summary(&self) -> Option<LatencySummary> {
        LatencySummary::from_latencies(&self.latencies)
    }
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Release Analysis Report")?;
        writeln!(f, "=======================")?;
        writeln!(
            f,
            "Files: {} analyzed, {} failed",
            self.files.len() - self.failed_files,
            self.failed_files
        )?;
        writeln!(
            f,
            "Vesicles: {} released, {} not released, {} failed",
            self.released, self.not_released, self.failed_vesicles
        )?;
        if let Some(p) = self.release_probability() {
            writeln!(f, "Release probability: {:.4}", p)?;
        }
        if let Some(summary) = self.summary() {
            writeln!(
                f,
                "Latency (s): mean {:.6e}, median {:.6e}, min {:.6e}, max {:.6e}",
                summary.mean, summary.median, summary.min, summary.max
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Per vesicle:")?;
        for vesicle in &self.per_vesicle {
            match LatencySummary::from_latencies(&vesicle.latencies) {
                Some(summary) => writeln!(
                    f,
                    "  {:<8} {:>6} releases, mean latency {:.6e} s",
                    vesicle.vesicle_id, summary.count, summary.mean
                )?,
                None => writeln!(f, "  {:<8} {:>6} releases", vesicle.vesicle_id, 0)?,
            }
        }

        for file in &self.files {
            if let FileResult::Failed { error, .. } = &file.result {
                #[cfg(feature = "colorized_output")]
                writeln!(
                    f,
                    "{} {}: {}",
                    style("✗").red().bold(),
                    file.path.display(),
                    error
                )?;
                #[cfg(not(feature = "colorized_output"))]
                writeln!(f, "✗ {}: {}", file.path.display(), error)?;
            }
        }

        Ok(())
    }
}
