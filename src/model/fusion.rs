use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Inputs of the default energy → fusion-rate mapping.
///
/// The rate is `base_rate · exp(active_syt · syt_energy + bound_y · y_site_energy)`,
/// with energies given in units of kT. Positive energies speed up fusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyParameters {
    /// Fusion rate with no active sensors, in 1/s
    pub base_rate: f64,
    /// Barrier reduction per active synaptotagmin sensor, in kT
    pub syt_energy: f64,
    /// Barrier reduction per bound Y site, in kT
    pub y_site_energy: f64,
}

impl Default for EnergyParameters {
    fn default() -> Self {
        Self {
            base_rate: 4.0e-4,
            syt_energy: 4.5,
            y_site_energy: 0.5,
        }
    }
}

impl EnergyParameters {
    fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("base_rate", self.base_rate, self.base_rate >= 0.0),
            ("syt_energy", self.syt_energy, true),
            ("y_site_energy", self.y_site_energy, true),
        ];
        for (name, value, in_range) in checks {
            if !value.is_finite() || !in_range {
                return Err(ConfigError::InvalidEnergyParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Release rule configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionModel {
    /// Synaptotagmin sensors per vesicle
    pub num_sensors_total: usize,
    /// Sensors that must be active at once for deterministic release
    pub num_sensors_required_active: usize,
    /// Bound sites that make a sensor active
    pub num_sites_required_per_sensor: usize,
    /// Use the stochastic energy model instead of the threshold rule
    #[serde(default)]
    pub energy_model: bool,
    /// Energy model inputs
    #[serde(default)]
    pub energy: EnergyParameters,
    /// Base seed for stochastic sampling
    #[serde(default)]
    pub rng_seed: u64,
}

impl FusionModel {
    /// Deterministic threshold model
    pub fn deterministic(total: usize, required_active: usize, sites_per_sensor: usize) -> Self {
        Self {
            num_sensors_total: total,
            num_sensors_required_active: required_active,
            num_sites_required_per_sensor: sites_per_sensor,
            energy_model: false,
            energy: EnergyParameters::default(),
            rng_seed: 0,
        }
    }

    /// Switch to the stochastic energy model
    pub fn with_energy_model(mut self, energy: EnergyParameters, rng_seed: u64) -> Self {
        self.energy_model = true;
        self.energy = energy;
        self.rng_seed = rng_seed;
        self
    }

    /// Checks that do not depend on the topology
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.num_sensors_required_active > self.num_sensors_total {
            return Err(ConfigError::TooManyActiveSensors {
                required: self.num_sensors_required_active,
                total: self.num_sensors_total,
            });
        }
        if self.energy_model {
            self.energy.validate()?;
        }
        Ok(())
    }
}
