//! World-referenced occupancy map over hierarchical storage.

use crate::core::{Accumulator, Bounds, GridCoord, WorldPoint};

use super::error::GridError;
use super::storage::HierarchicalStorage;

/// Sparse occupancy map: world frame metadata plus cell storage.
///
/// Cell `(i, j)` has its center at
/// `center + ((i - half_x) * delta, (j - half_y) * delta)`, where
/// `(half_x, half_y)` is the cell index of `center` derived from the bounds.
///
/// ```rust
/// use smriti_map::core::{Bounds, PointAccumulator, WorldPoint};
/// use smriti_map::grid::GridMap;
///
/// let mut map: GridMap<PointAccumulator> =
///     GridMap::new(WorldPoint::ZERO, Bounds::new(-8.0, -8.0, 8.0, 8.0), 0.05, 5)?;
///
/// let cell = map.world_to_map(WorldPoint::new(1.0, 0.5));
/// map.cell_mut_or_allocate(cell)?
///     .get_or_insert_with(Default::default)
///     .update(true, WorldPoint::new(1.0, 0.5));
///
/// assert_eq!(map.storage().allocated_patch_count(), 1);
/// # Ok::<(), smriti_map::grid::GridError>(())
/// ```
#[derive(Clone, Debug)]
pub struct GridMap<A> {
    center: WorldPoint,
    delta: f64,
    bounds: Bounds,
    map_size_x: usize,
    map_size_y: usize,
    half_x: i32,
    half_y: i32,
    storage: HierarchicalStorage<A>,
}

impl<A> GridMap<A> {
    /// Build an empty map covering `bounds` with `delta`-sized cells and
    /// `2^patch_magnitude`-sided patches.
    pub fn new(
        center: WorldPoint,
        bounds: Bounds,
        delta: f64,
        patch_magnitude: u8,
    ) -> Result<Self, GridError> {
        if !(delta.is_finite() && delta > 0.0) {
            return Err(GridError::InvalidDelta(delta));
        }
        if !bounds.is_valid() {
            return Err(GridError::InvalidBounds(bounds));
        }
        let invalid_center = GridError::InvalidCenter {
            x: center.x,
            y: center.y,
        };
        if !center.is_finite() {
            return Err(invalid_center);
        }

        let cells_x = (bounds.width() / delta).ceil();
        let cells_y = (bounds.height() / delta).ceil();
        if !(cells_x <= i32::MAX as f64 && cells_y <= i32::MAX as f64) {
            return Err(GridError::GridTooLarge { cells_x, cells_y });
        }

        let half_x = ((center.x - bounds.xmin) / delta).round();
        let half_y = ((center.y - bounds.ymin) / delta).round();
        let index_range = i32::MIN as f64..=i32::MAX as f64;
        if !(index_range.contains(&half_x) && index_range.contains(&half_y)) {
            return Err(invalid_center);
        }

        let map_size_x = cells_x as usize;
        let map_size_y = cells_y as usize;
        let storage = HierarchicalStorage::for_cells(map_size_x, map_size_y, patch_magnitude)?;

        Ok(Self {
            center,
            delta,
            bounds,
            map_size_x,
            map_size_y,
            half_x: half_x as i32,
            half_y: half_y as i32,
            storage,
        })
    }

    // === Metadata ===

    /// World reference point of the grid.
    #[inline]
    pub fn center(&self) -> WorldPoint {
        self.center
    }

    /// Cell side length.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Extent the map was constructed to cover.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Map size in cells `(x, y)`.
    #[inline]
    pub fn map_size(&self) -> (usize, usize) {
        (self.map_size_x, self.map_size_y)
    }

    /// Patch magnitude of the underlying storage.
    #[inline]
    pub fn patch_magnitude(&self) -> u8 {
        self.storage.patch_magnitude()
    }

    /// Cell storage.
    #[inline]
    pub fn storage(&self) -> &HierarchicalStorage<A> {
        &self.storage
    }

    /// Mutable cell storage.
    #[inline]
    pub fn storage_mut(&mut self) -> &mut HierarchicalStorage<A> {
        &mut self.storage
    }

    // === Coordinate conversion ===

    /// Nearest cell to a world point.
    #[inline]
    pub fn world_to_map(&self, point: WorldPoint) -> GridCoord {
        GridCoord::new(
            (((point.x - self.center.x) / self.delta).round() as i32).saturating_add(self.half_x),
            (((point.y - self.center.y) / self.delta).round() as i32).saturating_add(self.half_y),
        )
    }

    /// World position of a cell center.
    #[inline]
    pub fn map_to_world(&self, cell: GridCoord) -> WorldPoint {
        WorldPoint::new(
            (cell.x as f64 - self.half_x as f64) * self.delta + self.center.x,
            (cell.y as f64 - self.half_y as f64) * self.delta + self.center.y,
        )
    }

    /// Check if a cell lies inside the map.
    #[inline]
    pub fn is_inside(&self, cell: GridCoord) -> bool {
        cell.is_within(self.map_size_x, self.map_size_y)
    }

    // === Cell access ===

    /// Value of a cell; `None` if outside the map, unallocated or unset.
    pub fn cell(&self, cell: GridCoord) -> Option<&A> {
        if !self.is_inside(cell) {
            return None;
        }
        self.storage.cell(cell)
    }

    /// Value of the cell under a world point.
    pub fn cell_at_world(&self, point: WorldPoint) -> Option<&A> {
        self.cell(self.world_to_map(point))
    }

    /// Slot of a cell inside the map, allocating its patch on demand.
    pub fn cell_mut_or_allocate(&mut self, cell: GridCoord) -> Result<&mut Option<A>, GridError> {
        if !self.is_inside(cell) {
            return Err(GridError::CellOutOfRange {
                x: cell.x as i64,
                y: cell.y as i64,
                x_size: self.map_size_x,
                y_size: self.map_size_y,
            });
        }
        self.storage.cell_mut_or_allocate(cell)
    }

    /// Same frame: center, delta and bounds bitwise equal, same patch size.
    pub fn same_frame<B>(&self, other: &GridMap<B>) -> bool {
        self.center.bit_eq(&other.center)
            && self.delta.to_bits() == other.delta.to_bits()
            && self.bounds.bit_eq(&other.bounds)
            && self.patch_magnitude() == other.patch_magnitude()
    }
}

impl<A: Accumulator> GridMap<A> {
    /// Persistence equality.
    ///
    /// Two maps are equivalent when they share a frame, have the same active
    /// area as sets, allocate the same slots, and every allocated patch
    /// holds the same set cells with byte-identical records.
    pub fn equivalent(&self, other: &GridMap<A>) -> bool {
        if !self.same_frame(other) || self.storage.active_area() != other.storage.active_area() {
            return false;
        }
        if self.storage.allocated_patch_count() != other.storage.allocated_patch_count() {
            return false;
        }

        self.storage.allocated_patches().all(|(slot, patch)| {
            let Some(theirs) = other.storage.patch_at(slot) else {
                return false;
            };
            patch.active_count() == theirs.active_count()
                && patch.active_cells().all(|(xx, yy, value)| {
                    theirs
                        .cell_at(xx, yy)
                        .is_some_and(|v| v.to_record() == value.to_record())
                })
        })
    }
}
