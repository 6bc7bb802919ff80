//! Point and coordinate types for the hierarchical grid.

use serde::{Deserialize, Serialize};

/// Integer grid coordinates.
///
/// Used both for map cells and for level-1 patch slots. Ordering is
/// lexicographic on `(x, y)`, which is the order active-area entries are
/// written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridCoord {
    /// X coordinate (column index)
    pub x: i32,
    /// Y coordinate (row index)
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Arithmetic shift of both components (cell -> patch slot)
    #[inline]
    pub fn shift_down(self, magnitude: u8) -> Self {
        GridCoord::new(self.x >> magnitude, self.y >> magnitude)
    }

    /// Low `magnitude` bits of both components (cell -> offset inside its patch)
    #[inline]
    pub fn low_bits(self, magnitude: u8) -> Self {
        let mask = (1i32 << magnitude) - 1;
        GridCoord::new(self.x & mask, self.y & mask)
    }

    /// Check `0 <= x < x_max` and `0 <= y < y_max`
    #[inline]
    pub fn is_within(self, x_max: usize, y_max: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < x_max && (self.y as usize) < y_max
    }
}

impl From<(i32, i32)> for GridCoord {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        GridCoord::new(x, y)
    }
}

/// World coordinates (map units, f64)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl WorldPoint {
    /// Create a new world point
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero point (origin)
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Both components are finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Bitwise equality, so that NaN payloads and signed zeros compare exactly.
    #[inline]
    pub fn bit_eq(&self, other: &WorldPoint) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}
