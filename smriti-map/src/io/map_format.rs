//! Binary map format.
//!
//! Format (all integers i32 and floats f64, little-endian):
//! - Header (12 bytes, omitted in legacy mode):
//!   - Magic: "SMRITI" (6 bytes)
//!   - Version: u8
//!   - Patch magnitude: u8
//!   - Record size: u32 (bytes per accumulator record)
//! - Metadata (56 bytes): center x/y, delta, xmin, ymin, xmax, ymax
//! - Active area: count, then count × (x, y)
//! - Patches: count, then per patch:
//!   - Slot (x, y)
//!   - Cell count, then count × (xx, yy, record)
//!
//! Legacy mode reads and writes the body alone, byte-compatible with files
//! produced by GMapping-based mappers. The patch magnitude then comes from
//! the codec configuration.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, trace, warn};

use crate::core::{Accumulator, Bounds, GridCoord, WorldPoint};
use crate::grid::{GridError, GridMap, MapConfig};

use super::error::MapIoError;
use super::wire::{WireReader, WireWriter};

/// Magic bytes of a headered map file
pub const MAGIC: &[u8; 6] = b"SMRITI";

/// Current format version
pub const VERSION: u8 = 1;

/// Header size in bytes
pub const HEADER_SIZE: usize = 12;

/// Metadata block size in bytes (7 × f64)
pub const METADATA_SIZE: usize = 56;

/// Patch magnitude used by GMapping (32×32 cells per patch)
pub const DEFAULT_PATCH_MAGNITUDE: u8 = 5;

/// Codec behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Headerless layout
    pub legacy: bool,
    /// Reject out-of-range coordinates with [`MapIoError::CoordinateOutOfRange`]
    pub validate_coordinates: bool,
    /// Patch magnitude of maps built on load
    pub patch_magnitude: u8,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            legacy: false,
            validate_coordinates: true,
            patch_magnitude: DEFAULT_PATCH_MAGNITUDE,
        }
    }
}

/// Saves and loads [`GridMap`]s.
///
/// ```rust
/// use smriti_map::core::{Bounds, GridCoord, RawAccumulator, WorldPoint};
/// use smriti_map::grid::GridMap;
/// use smriti_map::io::MapCodec;
///
/// let mut map: GridMap<RawAccumulator<4>> =
///     GridMap::new(WorldPoint::ZERO, Bounds::new(-2.0, -2.0, 2.0, 2.0), 0.1, 5)?;
/// *map.cell_mut_or_allocate(GridCoord::new(3, 5))? = Some(RawAccumulator([1, 2, 3, 4]));
///
/// let codec = MapCodec::default();
/// let mut bytes = Vec::new();
/// codec.write(&map, &mut bytes)?;
///
/// let loaded: GridMap<RawAccumulator<4>> = codec.read(bytes.as_slice())?;
/// assert!(loaded.equivalent(&map));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapCodec {
    config: CodecConfig,
}

impl MapCodec {
    /// Codec with explicit configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Headerless codec for files written by GMapping-based mappers.
    pub fn legacy() -> Self {
        Self::new(CodecConfig {
            legacy: true,
            ..CodecConfig::default()
        })
    }

    /// Codec matching a YAML map configuration.
    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(CodecConfig {
            legacy: config.codec.legacy,
            validate_coordinates: config.codec.validate_coordinates,
            patch_magnitude: config.grid.patch_magnitude,
        })
    }

    /// Same codec with a different patch magnitude.
    pub fn with_patch_magnitude(mut self, patch_magnitude: u8) -> Self {
        self.config.patch_magnitude = patch_magnitude;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    // === Save ===

    /// Save a map to `path`, creating or truncating it.
    pub fn save<A: Accumulator>(&self, map: &GridMap<A>, path: &Path) -> Result<(), MapIoError> {
        // Refuse before truncating an existing file
        self.check_patch_magnitude(map.patch_magnitude())?;
        let file = File::create(path).map_err(|source| MapIoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        let bytes = self.write(map, &mut writer)?;

        let file = writer
            .into_inner()
            .map_err(|e| MapIoError::Io(e.into_error()))?;
        file.sync_all()?;

        debug!("Saved map to {} ({} bytes)", path.display(), bytes);
        Ok(())
    }

    /// Write a map to a stream; returns the number of bytes written.
    ///
    /// Fails with [`MapIoError::PatchMagnitudeMismatch`] unless the map's
    /// patch magnitude is the codec's.
    pub fn write<A: Accumulator, W: Write>(
        &self,
        map: &GridMap<A>,
        writer: W,
    ) -> Result<u64, MapIoError> {
        self.check_patch_magnitude(map.patch_magnitude())?;

        let mut out = WireWriter::new(writer);
        let storage = map.storage();

        if !self.config.legacy {
            let record_size = u32::try_from(A::RECORD_SIZE).map_err(|_| {
                MapIoError::Encode(format!("record size {} exceeds u32", A::RECORD_SIZE))
            })?;
            out.write_bytes(MAGIC)?;
            out.write_bytes(&[VERSION, map.patch_magnitude()])?;
            out.write_u32(record_size)?;
        }

        let center = map.center();
        out.write_f64(center.x)?;
        out.write_f64(center.y)?;
        out.write_f64(map.delta())?;
        for bound in map.bounds().as_array() {
            out.write_f64(bound)?;
        }

        let active_area = storage.sorted_active_area();
        out.write_count("active area count", active_area.len())?;
        for &slot in &active_area {
            out.write_coord(slot)?;
        }

        out.write_count("patch count", storage.allocated_patch_count())?;
        for (slot, patch) in storage.allocated_patches() {
            out.write_coord(slot)?;
            out.write_count("cell count", patch.active_count())?;
            for (xx, yy, value) in patch.active_cells() {
                // xx, yy < 2^15
                out.write_coord(GridCoord::new(xx as i32, yy as i32))?;
                let record = value.to_record();
                if record.len() != A::RECORD_SIZE {
                    return Err(MapIoError::Encode(format!(
                        "record is {} bytes, expected {}",
                        record.len(),
                        A::RECORD_SIZE
                    )));
                }
                out.write_bytes(&record)?;
            }
            trace!(
                "Wrote patch ({}, {}) with {} cells",
                slot.x,
                slot.y,
                patch.active_count()
            );
        }
        out.flush()?;

        debug!(
            "Wrote map: {} active slots, {} patches, {} cells",
            active_area.len(),
            storage.allocated_patch_count(),
            storage.active_cell_count()
        );
        Ok(out.bytes_written())
    }

    fn check_patch_magnitude(&self, found: u8) -> Result<(), MapIoError> {
        if found != self.config.patch_magnitude {
            return Err(MapIoError::PatchMagnitudeMismatch {
                expected: self.config.patch_magnitude,
                found,
            });
        }
        Ok(())
    }

    // === Load ===

    /// Load a map from `path`.
    pub fn load<A: Accumulator>(&self, path: &Path) -> Result<GridMap<A>, MapIoError> {
        let file = File::open(path).map_err(|source| MapIoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let map = self.read(BufReader::new(file))?;
        debug!("Loaded map from {}", path.display());
        Ok(map)
    }

    /// Read a map from a stream, which must end after the last patch.
    pub fn read<A: Accumulator, R: Read>(&self, reader: R) -> Result<GridMap<A>, MapIoError> {
        let mut input = WireReader::new(reader);
        let magnitude = self.config.patch_magnitude;

        if !self.config.validate_coordinates {
            warn!("Coordinate validation disabled; active area is loaded unchecked");
        }
        if !self.config.legacy {
            self.read_header::<A, R>(&mut input)?;
        }

        let center = WorldPoint::new(input.read_f64("center")?, input.read_f64("center")?);
        let delta = input.read_f64("delta")?;
        let mut bounds = [0.0; 4];
        for bound in &mut bounds {
            *bound = input.read_f64("bounds")?;
        }
        let mut map = GridMap::new(center, Bounds::from_array(bounds), delta, magnitude)?;

        let (x_size, y_size) = map.storage().size();
        let slot_count = map.storage().slot_count();

        // Active area
        let max_active = if self.config.validate_coordinates {
            slot_count
        } else {
            i32::MAX as usize
        };
        let active_count = input.read_count("active area count", max_active)?;
        let mut active_area = HashSet::with_capacity(active_count.min(slot_count));
        for _ in 0..active_count {
            let slot = input.read_coord("active area")?;
            if self.config.validate_coordinates && !slot.is_within(x_size, y_size) {
                return Err(coordinate_out_of_range("active area", slot, x_size, y_size));
            }
            active_area.insert(slot);
        }
        map.storage_mut().set_active_area(active_area);

        // Patches
        let side = map.storage().patch_size();
        let patch_count = input.read_count("patch count", slot_count)?;
        for _ in 0..patch_count {
            let slot = input.read_coord("patch")?;
            if self.config.validate_coordinates && !slot.is_within(x_size, y_size) {
                return Err(coordinate_out_of_range("patch", slot, x_size, y_size));
            }
            let patch = match map.storage_mut().allocate_patch_at(slot) {
                Ok(patch) => patch,
                Err(GridError::PatchAlreadyAllocated { x, y }) => {
                    return Err(MapIoError::DuplicatePatch { x, y });
                }
                Err(e) => return Err(e.into()),
            };

            let cell_count = input.read_count("cell count", side * side)?;
            for _ in 0..cell_count {
                let local = input.read_coord("cell")?;
                let mut record = vec![0u8; A::RECORD_SIZE];
                input.read_exact(&mut record, "accumulator record")?;

                if !local.is_within(side, side) {
                    if self.config.validate_coordinates {
                        return Err(coordinate_out_of_range("cell", local, side, side));
                    }
                    return Err(GridError::CellOutOfRange {
                        x: local.x as i64,
                        y: local.y as i64,
                        x_size: side,
                        y_size: side,
                    }
                    .into());
                }
                let (xx, yy) = (local.x as usize, local.y as usize);
                if patch.cell_at(xx, yy).is_some() {
                    return Err(MapIoError::DuplicateCell {
                        x: slot.x,
                        y: slot.y,
                        xx: local.x,
                        yy: local.y,
                    });
                }
                patch.set_cell(xx, yy, A::read_record(&record))?;
            }
            trace!("Read patch ({}, {}) with {} cells", slot.x, slot.y, cell_count);
        }

        input.expect_eof()?;

        debug!(
            "Read map: {} active slots, {} patches, {} cells ({} bytes)",
            map.storage().active_area().len(),
            map.storage().allocated_patch_count(),
            map.storage().active_cell_count(),
            input.offset()
        );
        Ok(map)
    }

    fn read_header<A: Accumulator, R: Read>(
        &self,
        input: &mut WireReader<R>,
    ) -> Result<(), MapIoError> {
        let magic = input.read_array::<6>("magic")?;
        if &magic != MAGIC {
            return Err(MapIoError::InvalidMagic);
        }

        let version = input.read_u8("version")?;
        if version != VERSION {
            return Err(MapIoError::UnsupportedVersion {
                expected: VERSION,
                found: version,
            });
        }

        let magnitude = input.read_u8("patch magnitude")?;
        let record_size = input.read_u32("record size")? as usize;
        if record_size != A::RECORD_SIZE {
            return Err(MapIoError::AccumulatorSizeMismatch {
                expected: A::RECORD_SIZE,
                found: record_size,
            });
        }
        self.check_patch_magnitude(magnitude)
    }
}

fn coordinate_out_of_range(
    context: &'static str,
    coord: GridCoord,
    x_max: usize,
    y_max: usize,
) -> MapIoError {
    MapIoError::CoordinateOutOfRange {
        context,
        x: coord.x,
        y: coord.y,
        x_max,
        y_max,
    }
}

/// Save a map to `path` with the default codec.
pub fn save_map<A: Accumulator>(map: &GridMap<A>, path: &Path) -> Result<(), MapIoError> {
    MapCodec::default().save(map, path)
}

/// Load a map from `path` with the default codec.
pub fn load_map<A: Accumulator>(path: &Path) -> Result<GridMap<A>, MapIoError> {
    MapCodec::default().load(path)
}

/// Write a map to a stream with the default codec.
pub fn write_map<A: Accumulator, W: Write>(map: &GridMap<A>, writer: W) -> Result<u64, MapIoError> {
    MapCodec::default().write(map, writer)
}

/// Read a map from a stream with the default codec.
pub fn read_map<A: Accumulator, R: Read>(reader: R) -> Result<GridMap<A>, MapIoError> {
    MapCodec::default().read(reader)
}
