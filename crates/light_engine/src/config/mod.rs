//! Configuration system
//!
//! Every empirically tuned lighting constant lives here as data; none of
//! the algorithms depend on the exact values.

use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Tunable parameters for the indirect illumination pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GiConfig {
    /// Spacing between surface samples, in world units
    pub sample_spacing: f32,

    /// Spacing between lattice probes; finer than `sample_spacing`
    pub lattice_spacing: f32,

    /// Cutoff radius beyond which a surface sample cannot influence a probe
    pub max_propagation_distance: f32,

    /// Probes at or above floor height plus this cutoff are discarded as
    /// non-occupiable volume
    pub interior_ceiling_cutoff: f32,

    /// Maximum number of lights considered per sample during injection
    pub max_lights_per_sample: usize,

    /// Minimum occlusion-ray distance; guards against hitting the surface
    /// the ray originates from
    pub occlusion_epsilon: f32,

    /// Scale applied to each sample's contribution during propagation
    pub propagation_scale: f32,

    /// Vertical extent of a door opening used when culling surface samples
    pub door_vertical_extent: f32,
}

impl Default for GiConfig {
    fn default() -> Self {
        Self {
            sample_spacing: 0.4,
            lattice_spacing: 0.375,
            max_propagation_distance: 2.6,
            interior_ceiling_cutoff: 2.6,
            max_lights_per_sample: 32,
            occlusion_epsilon: 0.01,
            propagation_scale: 0.05,
            door_vertical_extent: 2.0,
        }
    }
}

impl Config for GiConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: GiConfig = toml::from_str("sample_spacing = 0.8").unwrap();
        assert_eq!(config.sample_spacing, 0.8);
        assert_eq!(config.max_lights_per_sample, 32);
        assert_eq!(config.lattice_spacing, 0.375);
    }

    #[test]
    fn test_lattice_is_finer_than_cloud_by_default() {
        let config = GiConfig::default();
        assert!(config.lattice_spacing < config.sample_spacing);
    }
}
