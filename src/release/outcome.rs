use std::fmt;

use serde::Serialize;

/// Why a vesicle could not be analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisFailure {
    /// A site block the topology requires is absent from the trace
    #[error("missing data block {block}")]
    MissingData {
        /// Name of the first missing block
        block: String,
    },
}

/// Result of analyzing one vesicle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The vesicle fused
    Released {
        /// Iteration at which fusion happened
        iteration: u64,
        /// Simulated time of fusion in seconds
        time: f64,
        /// Time since the onset of `pulse`, in seconds
        latency: f64,
        /// Pulse the release is attributed to
        pulse: u32,
    },
    /// The trace ended without fusion
    NotReleased,
    /// The vesicle's data was absent or malformed
    Failed(AnalysisFailure),
}

/// Release decision for one vesicle of one trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseOutcome {
    /// Vesicle identifier
    pub vesicle_id: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ReleaseOutcome {
    /// Whether the vesicle fused
    pub fn released(&self) -> bool {
        matches!(self.outcome, Outcome::Released { .. })
    }

    /// Release latency, present iff released
    pub fn latency(&self) -> Option<f64> {
        match self.outcome {
            Outcome::Released { latency, .. } => Some(latency),
            _ => None,
        }
    }

    /// Failure reason, present iff the vesicle could not be analyzed
    pub fn failure(&self) -> Option<&AnalysisFailure> {
        match &self.outcome {
            Outcome::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for ReleaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Released {
                iteration,
                latency,
                pulse,
                ..
            } => write!(
                f,
                "vesicle {}: released at iteration {} (pulse {}, latency {:.6e} s)",
                self.vesicle_id, iteration, pulse, latency
            ),
            Outcome::NotReleased => write!(f, "vesicle {}: no release", self.vesicle_id),
            Outcome::Failed(reason) => write!(f, "vesicle {}: failed ({})", self.vesicle_id, reason),
        }
    }
}
