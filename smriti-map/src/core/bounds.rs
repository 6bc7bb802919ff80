//! Axis-aligned world extent of a map.
//!
//! [`Bounds`] records the `(xmin, ymin, xmax, ymax)` rectangle a grid was
//! constructed to cover. The grid derives its cell and patch counts from it,
//! and the map file stores it verbatim so a reloaded grid gets the same
//! coordinate mapping.
//!
//! # Usage
//!
//! ```rust
//! use smriti_map::core::Bounds;
//!
//! let bounds = Bounds::new(-10.0, -5.0, 10.0, 5.0);
//! assert_eq!(bounds.width(), 20.0);
//! assert_eq!(bounds.height(), 10.0);
//! assert!(bounds.is_valid());
//! ```

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum x.
    pub xmin: f64,
    /// Minimum y.
    pub ymin: f64,
    /// Maximum x.
    pub xmax: f64,
    /// Maximum y.
    pub ymax: f64,
}

impl Bounds {
    /// Create bounds from the four extents.
    #[inline]
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Width (x extent).
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Height (y extent).
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// All four extents are finite and max >= min on both axes.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
            && self.xmax >= self.xmin
            && self.ymax >= self.ymin
    }

    /// Extents in file order: `[xmin, ymin, xmax, ymax]`.
    #[inline]
    pub fn as_array(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }

    /// Build from file order: `[xmin, ymin, xmax, ymax]`.
    #[inline]
    pub fn from_array([xmin, ymin, xmax, ymax]: [f64; 4]) -> Self {
        Self::new(xmin, ymin, xmax, ymax)
    }

    /// Bitwise equality of all four extents.
    pub fn bit_eq(&self, other: &Bounds) -> bool {
        self.as_array()
            .iter()
            .zip(other.as_array().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}
