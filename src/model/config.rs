use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::fusion::FusionModel;
use super::topology::{SensorTopology, SiteType};

/// Stimulus pulses used as latency reference points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PulseSchedule {
    /// Length of one pulse period in seconds
    pub duration: f64,
    /// Number of pulses; zero measures latency from t = 0
    pub count: u32,
}

impl PulseSchedule {
    /// `count` back-to-back pulses of `duration` seconds
    pub fn new(duration: f64, count: u32) -> Self {
        Self { duration, count }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.count > 0 && !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::InvalidPulses(format!(
                "{} pulses need a positive duration, got {}",
                self.count, self.duration
            )));
        }
        Ok(())
    }

    /// Pulse index and latency relative to that pulse's onset
    pub fn locate(&self, time: f64) -> (u32, f64) {
        if self.count == 0 || self.duration <= 0.0 {
            return (0, time);
        }
        let pulse = ((time / self.duration).floor().max(0.0) as u64).min(self.count as u64 - 1) as u32;
        (pulse, time - pulse as f64 * self.duration)
    }
}

/// Validated analysis configuration, built once and shared read-only
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    topology: SensorTopology,
    fusion: FusionModel,
    pulses: PulseSchedule,
}

impl AnalysisConfig {
    /// Validate the combination of topology, fusion rule and pulse schedule
    pub fn new(
        topology: SensorTopology,
        fusion: FusionModel,
        pulses: PulseSchedule,
    ) -> Result<Self, ConfigError> {
        fusion.validate()?;
        pulses.validate()?;

        let syt_sensors = topology.count_of(SiteType::Syt);
        if syt_sensors != fusion.num_sensors_total {
            return Err(ConfigError::SensorCountMismatch {
                site_type: SiteType::Syt,
                declared: fusion.num_sensors_total,
                actual: syt_sensors,
            });
        }

        for (index, sensor) in topology.sensors().iter().enumerate() {
            if sensor.site_type == SiteType::Syt
                && sensor.sites.len() < fusion.num_sites_required_per_sensor
            {
                return Err(ConfigError::UnreachableActivation {
                    sensor: index,
                    required: fusion.num_sites_required_per_sensor,
                    available: sensor.sites.len(),
                });
            }
        }

        Ok(Self {
            topology,
            fusion,
            pulses,
        })
    }

    /// Vesicle and sensor layout
    pub fn topology(&self) -> &SensorTopology {
        &self.topology
    }

    /// Release rule
    pub fn fusion(&self) -> &FusionModel {
        &self.fusion
    }

    /// Pulse schedule
    pub fn pulses(&self) -> &PulseSchedule {
        &self.pulses
    }
}
