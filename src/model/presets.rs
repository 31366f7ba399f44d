//! Built-in models

use super::config::{AnalysisConfig, PulseSchedule};
use super::error::ConfigError;
use super::fusion::FusionModel;
use super::topology::{BlockTemplate, CaSensor, SensorTopology};

/// Mouse neuromuscular junction: 6 active zones with two vesicles each,
/// every vesicle carrying 8 synaptotagmin sensors of 5 sites. Release
/// follows the excess calcium binding site model (Dittrich et al.,
/// Biophys. J. 2013, 104:2751-2763) with 2 of 8 sensors required.
pub fn mouse_nmj(num_sites_required_per_sensor: usize) -> Result<AnalysisConfig, ConfigError> {
    let vesicles = [
        "1_1", "1_2", "2_1", "2_2", "3_1", "3_2", "4_1", "4_2", "5_1", "5_2", "6_1", "6_2",
    ];
    let sensors = vec![
        CaSensor::syt(&[8, 9, 29, 30, 31]),
        CaSensor::syt(&[7, 32, 33, 34, 35]),
        CaSensor::syt(&[3, 6, 36, 37, 38]),
        CaSensor::syt(&[17, 39, 40, 41, 42]),
        CaSensor::syt(&[15, 16, 43, 44, 45]),
        CaSensor::syt(&[14, 46, 47, 48, 49]),
        CaSensor::syt(&[4, 12, 24, 50, 51]),
        CaSensor::syt(&[10, 25, 26, 27, 28]),
    ];

    let topology = SensorTopology::new(
        vesicles.iter().map(|v| v.to_string()).collect(),
        sensors,
        BlockTemplate::default(),
    )?;
    let fusion = FusionModel::deterministic(8, 2, num_sites_required_per_sensor);

    AnalysisConfig::new(topology, fusion, PulseSchedule::new(3e-3, 1))
}
