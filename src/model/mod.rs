//! # Simulation Model Configuration
//!
//! Describes what is being analyzed: which vesicles exist, which binding
//! sites form each calcium sensor, how many sensors have to be active for
//! release, and where stimulus pulses start.
//!
//! All of it is validated once into an [`AnalysisConfig`] before any file is
//! read; an invalid combination is a [`ConfigError`] for the whole run.

mod config;
mod error;
mod file;
mod fusion;
pub mod presets;
mod topology;


pub use config::{AnalysisConfig, PulseSchedule};
pub use error::ConfigError;
pub use file::{ModelFile, TopologySection};
pub use fusion::{EnergyParameters, FusionModel};
pub use topology::{BlockTemplate, CaSensor, SensorTopology, SiteType};
