use super::topology::SiteType;

/// Invalid model configuration; fatal for the whole run
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No vesicles to analyze
    #[error("topology lists no vesicles")]
    EmptyTopology,

    /// A vesicle identifier appears twice
    #[error("duplicate vesicle id {0}")]
    DuplicateVesicle(String),

    /// A sensor without binding sites
    #[error("sensor {sensor} has no binding sites")]
    EmptySensor {
        /// Sensor index
        sensor: usize,
    },

    /// A site index appears twice within one sensor
    #[error("sensor {sensor} lists site {site} more than once")]
    DuplicateSite {
        /// Sensor index
        sensor: usize,
        /// Repeated site
        site: u32,
    },

    /// Two sensors of the same type claim the same site
    #[error("site {site} belongs to both sensor {first} and sensor {second}")]
    SharedSite {
        /// Contested site
        site: u32,
        /// Sensor that claimed it first
        first: usize,
        /// Sensor that claimed it again
        second: usize,
    },

    /// The block name template cannot address individual sites
    #[error("invalid block template {template:?}: {reason}")]
    InvalidTemplate {
        /// Offending template
        template: String,
        /// What is wrong with it
        reason: String,
    },

    /// The declared sensor total disagrees with the topology
    #[error("fusion model expects {declared} {site_type} sensors but the topology defines {actual}")]
    SensorCountMismatch {
        /// Site type being counted
        site_type: SiteType,
        /// Value from the fusion model
        declared: usize,
        /// Sensors present in the topology
        actual: usize,
    },

    /// More active sensors required than exist
    #[error("{required} active sensors required but only {total} exist")]
    TooManyActiveSensors {
        /// Required active sensors
        required: usize,
        /// Total sensors
        total: usize,
    },

    /// A sensor can never reach the activation threshold
    #[error("sensor {sensor} has {available} sites but {required} must be bound for activation")]
    UnreachableActivation {
        /// Sensor index
        sensor: usize,
        /// Sites required per sensor
        required: usize,
        /// Sites the sensor has
        available: usize,
    },

    /// An energy model parameter is out of range
    #[error("invalid energy model parameter {name}: {value}")]
    InvalidEnergyParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// An invalid pulse schedule
    #[error("invalid pulse schedule: {0}")]
    InvalidPulses(String),

    /// The model file could not be read or parsed
    #[error("model file error: {0}")]
    File(String),
}
