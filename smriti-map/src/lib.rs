//! # Smriti-Map: Sparse Occupancy Grid Persistence
//!
//! Storage and binary persistence for the sparse, two-level occupancy grids
//! built by scan-matching mappers (GMapping-style `ScanMatcherMap`).
//!
//! ## Features
//!
//! - **Lazy allocation**: the grid is a coarse table of patch slots; a
//!   `2^m × 2^m` patch is allocated only when a cell in it is written
//! - **Byte-exact snapshots**: center, cell size, bounds, active area and
//!   every set cell round-trip without loss
//! - **Legacy layout**: headerless files from GMapping-based mappers load
//!   unchanged
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use smriti_map::core::{PointAccumulator, WorldPoint};
//! use smriti_map::grid::GridConfig;
//! use smriti_map::io::{load_map, save_map};
//!
//! let mut map = GridConfig::for_area(20.0, 20.0, 0.05).build_map::<PointAccumulator>()?;
//!
//! let hit = WorldPoint::new(1.2, -0.4);
//! map.cell_mut_or_allocate(map.world_to_map(hit))?
//!     .get_or_insert_with(Default::default)
//!     .update(true, hit);
//!
//! save_map(&map, Path::new("office.map"))?;
//! let loaded = load_map::<PointAccumulator>(Path::new("office.map"))?;
//! assert!(loaded.equivalent(&map));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Coordinate types and the [`Accumulator`] cell contract
//! - [`grid`]: [`GridMap`], its hierarchical storage and configuration
//! - [`io`]: [`MapCodec`] binary save/load
//!
//! ## Coordinate Frame
//!
//! Cell `(i, j)` is centered at `center + (i - half_x, j - half_y) * delta`,
//! where `(half_x, half_y)` is the cell containing `center`. Patch slot
//! `(x, y)` holds cells `(x << m) + xx`, `(y << m) + yy` for local
//! `xx, yy < 2^m`.

#![warn(missing_docs)]

pub mod core;
pub mod grid;
pub mod io;

pub use crate::core::{Accumulator, Bounds, GridCoord, PointAccumulator, RawAccumulator, WorldPoint};
pub use grid::{GridError, GridMap, HierarchicalStorage, MapConfig, Patch};
pub use io::{MapCodec, MapIoError, load_map, read_map, save_map, write_map};
