//! Sparse hierarchical occupancy grid.
//!
//! Two levels of storage:
//!
//! - [`HierarchicalStorage`]: a coarse `x_size × y_size` table of patch
//!   slots, each either empty or holding a [`Patch`], plus the active area
//!   (the patch coordinates a front end intends to populate)
//! - [`Patch`]: a dense `2^m × 2^m` block of optional cell values
//!
//! [`GridMap`] wraps the storage with the world frame (center, cell size,
//! bounds) and converts between world and cell coordinates.
//! [`MapConfig`] loads both grid and codec settings from YAML.

mod config;
mod error;
mod map;
mod patch;
mod storage;

pub use config::{CodecSettings, ConfigError, GridConfig, MapConfig};
pub use error::GridError;
pub use map::GridMap;
pub use patch::Patch;
pub use storage::{HierarchicalStorage, MAX_PATCH_MAGNITUDE, MAX_SLOTS};
