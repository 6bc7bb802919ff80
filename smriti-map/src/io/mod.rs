//! Map persistence.
//!
//! - [`MapCodec`]: binary save/load of [`GridMap`](crate::grid::GridMap)
//!   snapshots, headered or legacy layout
//! - [`save_map`] / [`load_map`]: path helpers with the default codec
//! - [`write_map`] / [`read_map`]: stream helpers for in-memory buffers

mod error;
mod map_format;
mod wire;

pub use error::MapIoError;
pub use map_format::{
    CodecConfig, DEFAULT_PATCH_MAGNITUDE, HEADER_SIZE, MAGIC, METADATA_SIZE, MapCodec, VERSION,
    load_map, read_map, save_map, write_map,
};
