//! TOML model files.
//!
//! A model file describes the simulated system so the analyzer does not have
//! to be recompiled per model:
//!
//! ```toml
//! # mouse.toml
//! [topology]
//! vesicles = ["1_1", "1_2"]
//! template = "bound_vesicle_{vesicle}_{type}_{site}.{seed}.dat"
//! sensors = [
//!     { sites = [8, 9, 29, 30, 31], site_type = "syt" },
//!     { sites = [7, 32, 33, 34, 35], site_type = "syt" },
//! ]
//!
//! [fusion]
//! num_sensors_total = 2
//! num_sensors_required_active = 2
//! num_sites_required_per_sensor = 2
//!
//! [pulses]
//! duration = 3e-3
//! count = 1
//! ```

use std::path::Path;

use serde::Deserialize;

use super::config::{AnalysisConfig, PulseSchedule};
use super::error::ConfigError;
use super::fusion::FusionModel;
use super::topology::{BlockTemplate, CaSensor, SensorTopology};

/// Root structure of a model file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelFile {
    /// Vesicles and sensors
    pub topology: TopologySection,
    /// Release rule
    pub fusion: FusionModel,
    /// Latency reference pulses
    #[serde(default)]
    pub pulses: PulseSchedule,
}

/// `[topology]` table
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopologySection {
    /// Vesicle identifiers
    pub vesicles: Vec<String>,
    /// Block name template; defaults to [`BlockTemplate::DEFAULT`]
    pub template: Option<String>,
    /// Sensors shared by all vesicles
    pub sensors: Vec<CaSensor>,
}

impl ModelFile {
    /// Load a model file from disk
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::File(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse a model file from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::File(e.to_string()))
    }

    /// Validate into an [`AnalysisConfig`]
    pub fn into_config(self) -> Result<AnalysisConfig, ConfigError> {
        let template = match self.topology.template {
            Some(pattern) => BlockTemplate::new(pattern)?,
            None => BlockTemplate::default(),
        };
        let topology = SensorTopology::new(self.topology.vesicles, self.topology.sensors, template)?;
        AnalysisConfig::new(topology, self.fusion, self.pulses)
    }
}
