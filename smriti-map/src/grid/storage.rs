//! Two-level sparse storage for the occupancy grid.
//!
//! Level 1 is a dense table of `x_size × y_size` slots. A slot is either
//! empty or points at a [`Patch`] of `2^m × 2^m` cells. Patches live in one
//! arena vector and slots hold indices into it, so a sparse map costs one
//! `Option<u32>` per slot plus the patches actually touched.
//!
//! ## Layout
//!
//! ```text
//! slots (x-major):   [ -  -  0  -  -  1  -  - ...]
//!                           │        │
//! patches (arena):  [Patch₀] [Patch₁] ...
//!                    └── 2^m × 2^m Option<A> cells
//! ```
//!
//! The active area is a separate set of slot coordinates maintained by the
//! mapping front end. It is not tied to allocation: a slot can be active
//! without a patch and a patch can exist outside the active area.

use std::collections::HashSet;

use log::debug;

use crate::core::GridCoord;

use super::error::GridError;
use super::patch::Patch;

/// Largest supported patch magnitude (patches of 32768 × 32768 cells).
pub const MAX_PATCH_MAGNITUDE: u8 = 15;

/// Largest number of level-1 slots a storage may hold.
pub const MAX_SLOTS: usize = 1 << 24;

/// Sparse hierarchical cell storage.
#[derive(Clone, Debug)]
pub struct HierarchicalStorage<A> {
    x_size: usize,
    y_size: usize,
    magnitude: u8,
    /// Arena index per slot, `x * y_size + y`
    slots: Vec<Option<u32>>,
    patches: Vec<Patch<A>>,
    active_area: HashSet<GridCoord>,
}

impl<A> HierarchicalStorage<A> {
    /// Create storage with `x_size × y_size` empty slots.
    pub fn new(x_size: usize, y_size: usize, magnitude: u8) -> Result<Self, GridError> {
        if magnitude > MAX_PATCH_MAGNITUDE {
            return Err(GridError::InvalidPatchMagnitude(magnitude));
        }
        let slot_count = x_size
            .checked_mul(y_size)
            .filter(|&n| n <= MAX_SLOTS)
            .ok_or(GridError::GridTooLarge {
                cells_x: (x_size as f64) * (1u64 << magnitude) as f64,
                cells_y: (y_size as f64) * (1u64 << magnitude) as f64,
            })?;

        Ok(Self {
            x_size,
            y_size,
            magnitude,
            slots: vec![None; slot_count],
            patches: Vec::new(),
            active_area: HashSet::new(),
        })
    }

    /// Create storage covering `cells_x × cells_y` cells.
    ///
    /// Slot counts round up so every cell has a slot.
    pub fn for_cells(cells_x: usize, cells_y: usize, magnitude: u8) -> Result<Self, GridError> {
        if magnitude > MAX_PATCH_MAGNITUDE {
            return Err(GridError::InvalidPatchMagnitude(magnitude));
        }
        let side = 1usize << magnitude;
        Self::new(cells_x.div_ceil(side), cells_y.div_ceil(side), magnitude)
    }

    // === Dimensions ===

    /// `(x_size, y_size)` in slots.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.x_size, self.y_size)
    }

    /// Slots along x.
    #[inline]
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    /// Slots along y.
    #[inline]
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// log2 of the patch side.
    #[inline]
    pub fn patch_magnitude(&self) -> u8 {
        self.magnitude
    }

    /// Patch side in cells.
    #[inline]
    pub fn patch_size(&self) -> usize {
        1 << self.magnitude
    }

    /// Total slot count.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Cells covered along `(x, y)`.
    #[inline]
    pub fn cell_extent(&self) -> (usize, usize) {
        (self.x_size << self.magnitude, self.y_size << self.magnitude)
    }

    // === Slots ===

    /// Check if `slot` indexes the level-1 table.
    #[inline]
    pub fn is_valid_slot(&self, slot: GridCoord) -> bool {
        slot.is_within(self.x_size, self.y_size)
    }

    #[inline]
    fn slot_index(&self, slot: GridCoord) -> Option<usize> {
        self.is_valid_slot(slot)
            .then(|| slot.x as usize * self.y_size + slot.y as usize)
    }

    /// Patch at `slot`, `None` when unallocated or out of range.
    #[inline]
    pub fn patch_at(&self, slot: GridCoord) -> Option<&Patch<A>> {
        let arena_index = self.slots[self.slot_index(slot)?]?;
        Some(&self.patches[arena_index as usize])
    }

    /// Mutable patch at `slot`.
    #[inline]
    pub fn patch_at_mut(&mut self, slot: GridCoord) -> Option<&mut Patch<A>> {
        let arena_index = self.slots[self.slot_index(slot)?]?;
        Some(&mut self.patches[arena_index as usize])
    }

    /// Allocate an all-unset patch at `slot`.
    ///
    /// Fails if the slot is out of range or already holds a patch.
    pub fn allocate_patch_at(&mut self, slot: GridCoord) -> Result<&mut Patch<A>, GridError> {
        let index = self.slot_index(slot).ok_or(GridError::SlotOutOfRange {
            x: slot.x,
            y: slot.y,
            x_size: self.x_size,
            y_size: self.y_size,
        })?;
        if self.slots[index].is_some() {
            return Err(GridError::PatchAlreadyAllocated {
                x: slot.x,
                y: slot.y,
            });
        }

        // MAX_SLOTS keeps the arena index within u32
        let arena_index = self.patches.len() as u32;
        self.patches.push(Patch::new(self.magnitude));
        self.slots[index] = Some(arena_index);
        Ok(&mut self.patches[arena_index as usize])
    }

    /// Iterate allocated patches in slot order (`x` outer, `y` inner).
    pub fn allocated_patches(&self) -> impl Iterator<Item = (GridCoord, &Patch<A>)> + '_ {
        let y_size = self.y_size;
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            slot.map(|p| {
                let coord = GridCoord::new((i / y_size) as i32, (i % y_size) as i32);
                (coord, &self.patches[p as usize])
            })
        })
    }

    /// Number of allocated patches.
    #[inline]
    pub fn allocated_patch_count(&self) -> usize {
        self.patches.len()
    }

    /// Number of set cells across all patches.
    pub fn active_cell_count(&self) -> usize {
        self.patches.iter().map(Patch::active_count).sum()
    }

    // === Active area ===

    /// Slots marked active by the mapping front end.
    #[inline]
    pub fn active_area(&self) -> &HashSet<GridCoord> {
        &self.active_area
    }

    /// Active area in ascending `(x, y)` order.
    pub fn sorted_active_area(&self) -> Vec<GridCoord> {
        let mut coords: Vec<_> = self.active_area.iter().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Replace the active area wholesale.
    pub fn set_active_area(&mut self, area: HashSet<GridCoord>) {
        self.active_area = area;
    }

    /// Allocate a patch for every in-range active slot that lacks one.
    ///
    /// Returns the number of patches allocated. Out-of-range active slots
    /// are skipped.
    pub fn allocate_active_area(&mut self) -> Result<usize, GridError> {
        let pending: Vec<GridCoord> = self
            .sorted_active_area()
            .into_iter()
            .filter(|&slot| self.is_valid_slot(slot) && self.patch_at(slot).is_none())
            .collect();

        for &slot in &pending {
            self.allocate_patch_at(slot)?;
        }
        debug!(
            "Allocated {} patches for {} active slots",
            pending.len(),
            self.active_area.len()
        );
        Ok(pending.len())
    }

    // === Cell access ===

    /// Slot containing `cell`.
    #[inline]
    pub fn patch_index(&self, cell: GridCoord) -> GridCoord {
        cell.shift_down(self.magnitude)
    }

    /// Offset of `cell` inside its patch.
    #[inline]
    pub fn local_index(&self, cell: GridCoord) -> GridCoord {
        cell.low_bits(self.magnitude)
    }

    /// Value of a global cell; `None` if unset, unallocated or out of range.
    pub fn cell(&self, cell: GridCoord) -> Option<&A> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        let local = self.local_index(cell);
        self.patch_at(self.patch_index(cell))?
            .cell_at(local.x as usize, local.y as usize)
    }

    /// Slot of a global cell, allocating its patch on demand.
    pub fn cell_mut_or_allocate(&mut self, cell: GridCoord) -> Result<&mut Option<A>, GridError> {
        let (extent_x, extent_y) = self.cell_extent();
        if !cell.is_within(extent_x, extent_y) {
            return Err(GridError::CellOutOfRange {
                x: cell.x as i64,
                y: cell.y as i64,
                x_size: extent_x,
                y_size: extent_y,
            });
        }

        let slot = self.patch_index(cell);
        let local = self.local_index(cell);
        let patch = if self.patch_at(slot).is_some() {
            self.patch_at_mut(slot)
        } else {
            Some(self.allocate_patch_at(slot)?)
        };

        // In range by the extent check above
        patch
            .and_then(|p| p.slot_mut(local.x as usize, local.y as usize))
            .ok_or(GridError::CellOutOfRange {
                x: cell.x as i64,
                y: cell.y as i64,
                x_size: extent_x,
                y_size: extent_y,
            })
    }
}
