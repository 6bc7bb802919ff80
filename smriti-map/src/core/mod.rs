//! Core types for the smriti-map grid library.
//!
//! This module provides the fundamental types used throughout the library:
//! - [`GridCoord`] and [`WorldPoint`]: Coordinate types
//! - [`Bounds`]: World extent a grid was built to cover
//! - [`Accumulator`]: Fixed-size record contract for cell values, with
//!   [`PointAccumulator`] and [`RawAccumulator`] implementations

mod accumulator;
mod bounds;
mod point;

pub use accumulator::{Accumulator, PointAccumulator, RawAccumulator};
pub use bounds::Bounds;
pub use point::{GridCoord, WorldPoint};
