//! Dense square block of cells, the unit of lazy allocation.

use super::error::GridError;

/// A `2^m × 2^m` block of optional cell values.
///
/// `None` is the unset state. Cells are stored `xx`-major, so walking the
/// backing vector visits `xx` in the outer loop and `yy` in the inner loop,
/// the order the map format lists them in.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch<A> {
    magnitude: u8,
    cells: Vec<Option<A>>,
}

impl<A> Patch<A> {
    /// Create a patch with every cell unset.
    pub fn new(magnitude: u8) -> Self {
        let side = 1usize << magnitude;
        Self {
            magnitude,
            cells: (0..side * side).map(|_| None).collect(),
        }
    }

    /// Side length in cells.
    #[inline]
    pub fn side(&self) -> usize {
        1 << self.magnitude
    }

    /// `(local_x_size, local_y_size)`
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.side(), self.side())
    }

    /// log2 of the side length.
    #[inline]
    pub fn magnitude(&self) -> u8 {
        self.magnitude
    }

    #[inline]
    fn index(&self, xx: usize, yy: usize) -> Option<usize> {
        let side = self.side();
        (xx < side && yy < side).then_some(xx * side + yy)
    }

    fn out_of_range(&self, xx: usize, yy: usize) -> GridError {
        GridError::CellOutOfRange {
            x: xx as i64,
            y: yy as i64,
            x_size: self.side(),
            y_size: self.side(),
        }
    }

    /// Value at `(xx, yy)`; `None` if unset or out of range.
    #[inline]
    pub fn cell_at(&self, xx: usize, yy: usize) -> Option<&A> {
        self.index(xx, yy).and_then(|i| self.cells[i].as_ref())
    }

    /// Mutable slot at `(xx, yy)`, `None` only when out of range.
    #[inline]
    pub fn slot_mut(&mut self, xx: usize, yy: usize) -> Option<&mut Option<A>> {
        self.index(xx, yy).map(move |i| &mut self.cells[i])
    }

    /// Store a value at `(xx, yy)`, replacing what was there.
    pub fn set_cell(&mut self, xx: usize, yy: usize, value: A) -> Result<(), GridError> {
        let i = self.index(xx, yy).ok_or_else(|| self.out_of_range(xx, yy))?;
        self.cells[i] = Some(value);
        Ok(())
    }

    /// Reset `(xx, yy)` to unset, returning the previous value.
    pub fn clear_cell(&mut self, xx: usize, yy: usize) -> Option<A> {
        self.index(xx, yy).and_then(|i| self.cells[i].take())
    }

    /// Iterate set cells as `(xx, yy, value)`, `xx` outer and `yy` inner.
    pub fn active_cells(&self) -> impl Iterator<Item = (usize, usize, &A)> + '_ {
        let side = self.side();
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|v| (i / side, i % side, v)))
    }

    /// Number of set cells.
    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// No cell is set.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}
