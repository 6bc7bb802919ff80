//! Per-cell accumulator values.
//!
//! The mapping front end owns what a cell means. The grid and the map codec
//! only need each value to have a fixed-size, byte-exact record form, which
//! is what the [`Accumulator`] trait describes.
//!
//! Two implementations ship with the crate:
//!
//! - [`PointAccumulator`]: the hit/visit counter used by GMapping-style
//!   scan matchers (16-byte record).
//! - [`RawAccumulator`]: an opaque `N`-byte blob for front ends whose cell
//!   layout is not known here.

use super::point::WorldPoint;

/// A fixed-size cell value with a byte-exact record representation.
///
/// `write_record` must fill exactly [`Accumulator::RECORD_SIZE`] bytes and
/// `read_record` must accept any slice of that length. The codec stores
/// `RECORD_SIZE` in the file header and refuses to load a file written with
/// a different size.
pub trait Accumulator: Clone {
    /// Size of one record in bytes.
    const RECORD_SIZE: usize;

    /// Encode into `out` (`out.len() == RECORD_SIZE`).
    fn write_record(&self, out: &mut [u8]);

    /// Decode from `bytes` (`bytes.len() == RECORD_SIZE`).
    fn read_record(bytes: &[u8]) -> Self;

    /// Encoded record as an owned buffer.
    fn to_record(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::RECORD_SIZE];
        self.write_record(&mut out);
        out
    }
}

/// Hit/visit accumulator of a scan-matcher occupancy cell.
///
/// `acc_x`/`acc_y` sum the world positions of every beam endpoint that fell
/// in the cell, `n` counts those hits and `visits` counts every beam that
/// touched the cell (hit or pass-through).
///
/// Record layout (16 bytes, little-endian):
///
/// ```text
/// ┌────────────┬────────────┬──────────┬──────────────┐
/// │ acc_x: f32 │ acc_y: f32 │ n: i32   │ visits: i32  │
/// └────────────┴────────────┴──────────┴──────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointAccumulator {
    /// Sum of hit x positions
    pub acc_x: f32,
    /// Sum of hit y positions
    pub acc_y: f32,
    /// Number of hits
    pub n: i32,
    /// Number of beams that reached the cell
    pub visits: i32,
}

impl PointAccumulator {
    /// Record one beam observation.
    ///
    /// A hit adds `point` to the running sum and counts towards both `n` and
    /// `visits`; a miss only counts as a visit. Counters saturate at
    /// `i32::MAX`.
    pub fn update(&mut self, hit: bool, point: WorldPoint) {
        if hit {
            self.acc_x += point.x as f32;
            self.acc_y += point.y as f32;
            self.n = self.n.saturating_add(1);
        }
        self.visits = self.visits.saturating_add(1);
    }

    /// Hit ratio `n / visits`, `None` for a cell no beam has reached.
    #[inline]
    pub fn occupancy(&self) -> Option<f64> {
        (self.visits > 0).then(|| self.n as f64 / self.visits as f64)
    }

    /// Mean hit position, `None` without hits.
    pub fn mean(&self) -> Option<WorldPoint> {
        (self.n > 0).then(|| {
            let inv = 1.0 / self.n as f64;
            WorldPoint::new(self.acc_x as f64 * inv, self.acc_y as f64 * inv)
        })
    }

    /// Binary entropy of the occupancy estimate (nats).
    pub fn entropy(&self) -> f64 {
        let Some(p) = self.occupancy() else {
            return std::f64::consts::LN_2;
        };
        if self.n == self.visits || self.n == 0 {
            return 0.0;
        }
        -(p * p.ln() + (1.0 - p) * (1.0 - p).ln())
    }

    /// Merge another accumulator into this one.
    pub fn add(&mut self, other: &PointAccumulator) {
        self.acc_x += other.acc_x;
        self.acc_y += other.acc_y;
        self.n = self.n.saturating_add(other.n);
        self.visits = self.visits.saturating_add(other.visits);
    }
}

impl Accumulator for PointAccumulator {
    const RECORD_SIZE: usize = 16;

    fn write_record(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.acc_x.to_le_bytes());
        out[4..8].copy_from_slice(&self.acc_y.to_le_bytes());
        out[8..12].copy_from_slice(&self.n.to_le_bytes());
        out[12..16].copy_from_slice(&self.visits.to_le_bytes());
    }

    fn read_record(bytes: &[u8]) -> Self {
        let word = |i: usize| [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]];
        Self {
            acc_x: f32::from_le_bytes(word(0)),
            acc_y: f32::from_le_bytes(word(4)),
            n: i32::from_le_bytes(word(8)),
            visits: i32::from_le_bytes(word(12)),
        }
    }
}

/// Opaque fixed-size cell record.
///
/// Stored and written byte-for-byte; the codec never interprets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawAccumulator<const N: usize>(pub [u8; N]);

impl<const N: usize> Default for RawAccumulator<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> RawAccumulator<N> {
    /// Raw bytes
    #[inline]
    pub fn bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> Accumulator for RawAccumulator<N> {
    const RECORD_SIZE: usize = N;

    fn write_record(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.0);
    }

    fn read_record(bytes: &[u8]) -> Self {
        let mut raw = [0u8; N];
        raw.copy_from_slice(bytes);
        Self(raw)
    }
}
