//! # Release Detection Module
//!
//! Interprets a decoded [`Trace`](crate::container::Trace) through the
//! sensor topology and decides, per vesicle, whether and when it fused.
//!
//! ## Release Rules
//!
//! - **Threshold** (default): a sensor is active while at least
//!   `num_sites_required_per_sensor` of its sites are bound; the vesicle
//!   fuses at the first iteration with `num_sensors_required_active` active
//!   synaptotagmin sensors.
//! - **Energy model**: sensor activity sets an instantaneous fusion rate
//!   ([`HazardModel`]); the rate is integrated over time and the vesicle fuses
//!   once the cumulative hazard crosses an Exp(1) threshold drawn from a
//!   seeded generator.
//!
//! Missing site blocks fail only the affected vesicle
//! ([`AnalysisFailure::MissingData`]); a vesicle that never fuses is a
//! regular [`Outcome::NotReleased`].

mod detector;
mod hazard;
mod outcome;

#[cfg(test)]
mod tests;

pub use detector::ReleaseDetector;
pub use hazard::{ActivitySnapshot, EnergyHazard, HazardModel};
pub use outcome::{AnalysisFailure, Outcome, ReleaseOutcome};
