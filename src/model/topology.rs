use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Kind of calcium binding site a sensor is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteType {
    /// Synaptotagmin sites; these sensors drive the release rule
    Syt,
    /// Auxiliary "Y" sites; they only contribute to the energy model
    Y,
}

impl SiteType {
    /// Name used inside block names
    pub fn as_str(self) -> &'static str {
        match self {
            SiteType::Syt => "syt",
            SiteType::Y => "y",
        }
    }
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One calcium sensor: a group of binding sites of a single type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaSensor {
    /// Binding-site indices
    pub sites: Vec<u32>,
    /// Site type shared by all sites of the sensor
    pub site_type: SiteType,
}

impl CaSensor {
    /// Synaptotagmin sensor over `sites`
    pub fn syt(sites: &[u32]) -> Self {
        Self {
            sites: sites.to_vec(),
            site_type: SiteType::Syt,
        }
    }

    /// Y-site sensor over `sites`
    pub fn y(sites: &[u32]) -> Self {
        Self {
            sites: sites.to_vec(),
            site_type: SiteType::Y,
        }
    }
}

/// Pattern turning (vesicle, site type, site, seed) into a data block name.
///
/// Placeholders: `{vesicle}`, `{type}`, `{site}` and `{seed}`; the seed is
/// zero-padded to four digits the way MCell names its output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTemplate(String);

impl BlockTemplate {
    /// Template used by the MCell vesicle models
    pub const DEFAULT: &'static str = "bound_vesicle_{vesicle}_{type}_{site}.{seed}.dat";

    /// Parse a template; it must reference at least the vesicle and site
    pub fn new(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        for required in ["{vesicle}", "{site}"] {
            if !pattern.contains(required) {
                return Err(ConfigError::InvalidTemplate {
                    template: pattern,
                    reason: format!("missing {} placeholder", required),
                });
            }
        }
        Ok(Self(pattern))
    }

    /// The raw pattern
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the block name for one site
    pub fn render(&self, vesicle: &str, site_type: SiteType, site: u32, seed: u32) -> String {
        self.0
            .replace("{vesicle}", vesicle)
            .replace("{type}", site_type.as_str())
            .replace("{site}", &site.to_string())
            .replace("{seed}", &format!("{:04}", seed))
    }
}

impl Default for BlockTemplate {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

/// Immutable map from vesicles and their sensors to data blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorTopology {
    vesicle_ids: Vec<String>,
    sensors: Vec<CaSensor>,
    template: BlockTemplate,
    positions: HashMap<String, usize>,
}

impl SensorTopology {
    /// Build a topology, checking identifier uniqueness and that sensors of
    /// one site type never share a binding site.
    pub fn new(
        vesicle_ids: Vec<String>,
        sensors: Vec<CaSensor>,
        template: BlockTemplate,
    ) -> Result<Self, ConfigError> {
        if vesicle_ids.is_empty() {
            return Err(ConfigError::EmptyTopology);
        }

        let mut positions = HashMap::with_capacity(vesicle_ids.len());
        for (i, id) in vesicle_ids.iter().enumerate() {
            if positions.insert(id.clone(), i).is_some() {
                return Err(ConfigError::DuplicateVesicle(id.clone()));
            }
        }

        let mut owners: HashMap<(SiteType, u32), usize> = HashMap::new();
        for (index, sensor) in sensors.iter().enumerate() {
            if sensor.sites.is_empty() {
                return Err(ConfigError::EmptySensor { sensor: index });
            }
            let mut local = HashSet::with_capacity(sensor.sites.len());
            for &site in &sensor.sites {
                if !local.insert(site) {
                    return Err(ConfigError::DuplicateSite {
                        sensor: index,
                        site,
                    });
                }
                if let Some(&other) = owners.get(&(sensor.site_type, site)) {
                    return Err(ConfigError::SharedSite {
                        site,
                        first: other,
                        second: index,
                    });
                }
                owners.insert((sensor.site_type, site), index);
            }
        }

        Ok(Self {
            vesicle_ids,
            sensors,
            template,
            positions,
        })
    }

    /// Vesicle identifiers in analysis order
    pub fn vesicle_ids(&self) -> &[String] {
        &self.vesicle_ids
    }

    /// Sensor descriptors, shared by every vesicle
    pub fn sensors(&self) -> &[CaSensor] {
        &self.sensors
    }

    /// Block name template
    pub fn template(&self) -> &BlockTemplate {
        &self.template
    }

    /// Number of sensors of the given type
    pub fn count_of(&self, site_type: SiteType) -> usize {
        self.sensors
            .iter()
            .filter(|s| s.site_type == site_type)
            .count()
    }

    /// Binding sites of one sensor on one vesicle
    pub fn sites_for(&self, vesicle_id: &str, sensor_index: usize) -> Option<&[u32]> {
        if !self.positions.contains_key(vesicle_id) {
            return None;
        }
        self.sensors
            .get(sensor_index)
            .map(|sensor| sensor.sites.as_slice())
    }

    /// Data block holding the occupancy of one site
    pub fn block_name(&self, vesicle_id: &str, site_type: SiteType, site: u32, seed: u32) -> String {
        self.template.render(vesicle_id, site_type, site, seed)
    }
}
