use crate::model::EnergyParameters;

/// Sensor activity of one vesicle at one iteration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActivitySnapshot {
    /// Synaptotagmin sensors at or above the activation threshold
    pub active_syt: usize,
    /// Bound synaptotagmin sites, summed over all sensors
    pub bound_syt_sites: f64,
    /// Bound Y sites, summed over all Y sensors
    pub bound_y_sites: f64,
}

/// Maps sensor activity to an instantaneous fusion rate (1/s).
///
/// Negative and NaN rates count as zero in the detector, so the cumulative
/// hazard never decreases.
pub trait HazardModel: Send + Sync {
    /// Fusion rate for the given activity
    fn rate(&self, activity: &ActivitySnapshot) -> f64;
}

/// Exponential barrier model: every active sensor and bound Y site lowers the
/// fusion barrier by a fixed energy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyHazard {
    params: EnergyParameters,
}

impl EnergyHazard {
    /// Hazard from validated parameters
    pub fn new(params: EnergyParameters) -> Self {
        Self { params }
    }
}

impl HazardModel for EnergyHazard {
    fn rate(&self, activity: &ActivitySnapshot) -> f64 {
        let energy = activity.active_syt as f64 * self.params.syt_energy
            + activity.bound_y_sites * self.params.y_site_energy;
        self.params.base_rate * energy.exp()
    }
}

impl<F> HazardModel for F
where
    F: Fn(&ActivitySnapshot) -> f64 + Send + Sync,
{
    fn rate(&self, activity: &ActivitySnapshot) -> f64 {
        self(activity)
    }
}
