//! Grid construction and access errors.

use crate::core::Bounds;

/// Errors raised by [`GridMap`](super::GridMap) and
/// [`HierarchicalStorage`](super::HierarchicalStorage).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Cell size is zero, negative or not finite
    #[error("invalid cell size: {0}")]
    InvalidDelta(f64),

    /// Bounds are not finite or have max < min
    #[error("invalid bounds: {0:?}")]
    InvalidBounds(Bounds),

    /// Center is not finite or too far from the bounds to index
    #[error("invalid center: ({x}, {y})")]
    InvalidCenter {
        /// Center x
        x: f64,
        /// Center y
        y: f64,
    },

    /// Patch side would not fit the cell index range
    #[error("invalid patch magnitude {0} (max {max})", max = super::MAX_PATCH_MAGNITUDE)]
    InvalidPatchMagnitude(u8),

    /// Derived grid exceeds the supported number of cells or patch slots
    #[error("grid too large: {cells_x}x{cells_y} cells")]
    GridTooLarge {
        /// Cells along x
        cells_x: f64,
        /// Cells along y
        cells_y: f64,
    },

    /// Level-1 slot outside `x_size × y_size`
    #[error("patch slot ({x}, {y}) outside {x_size}x{y_size}")]
    SlotOutOfRange {
        /// Slot x
        x: i32,
        /// Slot y
        y: i32,
        /// Slots along x
        x_size: usize,
        /// Slots along y
        y_size: usize,
    },

    /// Cell outside its patch or outside the map
    #[error("cell ({x}, {y}) outside {x_size}x{y_size}")]
    CellOutOfRange {
        /// Cell x
        x: i64,
        /// Cell y
        y: i64,
        /// Cells along x
        x_size: usize,
        /// Cells along y
        y_size: usize,
    },

    /// Slot already holds a patch
    #[error("patch already allocated at ({x}, {y})")]
    PatchAlreadyAllocated {
        /// Slot x
        x: i32,
        /// Slot y
        y: i32,
    },
}
