//! Configuration types for the sparse grid and its codec.

use std::path::Path;

use crate::core::{Bounds, WorldPoint};
use serde::{Deserialize, Serialize};

use super::error::GridError;
use super::map::GridMap;

/// Grid configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// log2 of the patch side length (5 = 32×32 cells per patch)
    pub patch_magnitude: u8,

    /// Meters per cell (e.g., 0.05 = 5cm cells)
    pub delta: f64,

    /// World extent covered by the grid
    pub bounds: Bounds,

    /// World reference point of the grid
    pub center: WorldPoint,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            patch_magnitude: 5,
            delta: 0.05,
            bounds: Bounds::new(-50.0, -50.0, 50.0, 50.0), // 100m square
            center: WorldPoint::ZERO,
        }
    }
}

impl GridConfig {
    /// Create a configuration for an area of the given size (in meters)
    /// centered on the origin.
    pub fn for_area(width_m: f64, height_m: f64, delta: f64) -> Self {
        Self {
            delta,
            bounds: Bounds::new(-width_m / 2.0, -height_m / 2.0, width_m / 2.0, height_m / 2.0),
            ..Self::default()
        }
    }

    /// Build an empty map from this configuration.
    pub fn build_map<A>(&self) -> Result<GridMap<A>, GridError> {
        GridMap::new(self.center, self.bounds, self.delta, self.patch_magnitude)
    }
}

/// Codec behavior switches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Read and write the headerless layout
    pub legacy: bool,

    /// Reject out-of-range coordinates while loading
    pub validate_coordinates: bool,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            legacy: false,
            validate_coordinates: true,
        }
    }
}

/// Full map configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Grid configuration (frame, resolution, patch size)
    pub grid: GridConfig,
    /// Codec configuration (layout, validation)
    pub codec: CodecSettings,
}

impl MapConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}
