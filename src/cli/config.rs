//! TOML configuration file support for batch runs.
//!
//! Instead of repeating flags for every batch, settings can live in a file:
//!
//! ```toml
//! # mcellrel.toml
//! [analysis]
//! threads = 8
//! sites_required = 2
//! sensors_required_active = 2
//! model = "models/mouse.toml"
//! energy_model = false
//! rng_seed = 17
//! json = true
//! ```
//!
//! Command-line flags take precedence over file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure for mcellrel.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Analysis-specific settings.
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// Configuration for the analyze command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisSettings {
    /// Number of worker threads.
    pub threads: Option<usize>,

    /// Bound sites required to activate a sensor.
    pub sites_required: Option<usize>,

    /// Active sensors required for deterministic release.
    pub sensors_required_active: Option<usize>,

    /// Model file describing vesicles and sensors.
    pub model: Option<PathBuf>,

    /// Use the stochastic energy model.
    pub energy_model: Option<bool>,

    /// Base seed for the energy model.
    pub rng_seed: Option<u64>,

    /// Print the report as JSON.
    pub json: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [analysis]
            threads = 8
            sites_required = 3
            sensors_required_active = 2
            model = "models/mouse.toml"
            energy_model = true
            rng_seed = 17
            json = false
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.analysis.threads, Some(8));
        assert_eq!(config.analysis.sites_required, Some(3));
        assert_eq!(config.analysis.sensors_required_active, Some(2));
        assert_eq!(
            config.analysis.model.as_deref(),
            Some(Path::new("models/mouse.toml"))
        );
        assert_eq!(config.analysis.energy_model, Some(true));
        assert_eq!(config.analysis.rng_seed, Some(17));
        assert_eq!(config.analysis.json, Some(false));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [analysis]
            threads = 4
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.analysis.threads, Some(4));
        assert_eq!(config.analysis.sites_required, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.analysis.threads, None);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let toml = r#"
            [analysis]
            thread = 4
        "#;

        assert!(Config::from_str(toml).is_err());
    }
}
