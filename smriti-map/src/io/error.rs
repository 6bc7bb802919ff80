//! Error types for map persistence

use std::path::PathBuf;

use crate::grid::GridError;

/// Map persistence errors
#[derive(Debug, thiserror::Error)]
pub enum MapIoError {
    /// Destination or source could not be opened
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// Path passed to save or load
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Write, flush or non-EOF read failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream ended inside a declared record
    #[error("truncated map data while reading {context} at byte {offset}")]
    Truncated {
        /// Field being read
        context: &'static str,
        /// Byte offset where the read started
        offset: u64,
    },

    /// Header does not start with the map magic
    #[error("invalid magic bytes")]
    InvalidMagic,

    /// Header carries a format version this reader does not know
    #[error("unsupported format version: expected {expected}, found {found}")]
    UnsupportedVersion {
        /// Supported version
        expected: u8,
        /// Version in the header
        found: u8,
    },

    /// Header record size differs from the reader's accumulator
    #[error("accumulator record size mismatch: expected {expected} bytes, found {found}")]
    AccumulatorSizeMismatch {
        /// Reader's record size
        expected: usize,
        /// Record size in the header
        found: usize,
    },

    /// Header patch magnitude differs from the codec's
    #[error("patch magnitude mismatch: expected {expected}, found {found}")]
    PatchMagnitudeMismatch {
        /// Codec's magnitude
        expected: u8,
        /// Magnitude in the header
        found: u8,
    },

    /// Declared count is negative
    #[error("negative {context}: {count}")]
    NegativeCount {
        /// Count being read
        context: &'static str,
        /// Value found
        count: i32,
    },

    /// Declared count exceeds what the grid can hold
    #[error("{context} {count} exceeds maximum {max}")]
    CountTooLarge {
        /// Count being read
        context: &'static str,
        /// Value found
        count: usize,
        /// Largest acceptable value
        max: usize,
    },

    /// Coordinate pair outside its valid range
    #[error("{context} ({x}, {y}) outside 0..{x_max} x 0..{y_max}")]
    CoordinateOutOfRange {
        /// Coordinate kind
        context: &'static str,
        /// X read from the stream
        x: i32,
        /// Y read from the stream
        y: i32,
        /// Exclusive x limit
        x_max: usize,
        /// Exclusive y limit
        y_max: usize,
    },

    /// Same patch slot listed twice
    #[error("duplicate patch at ({x}, {y})")]
    DuplicatePatch {
        /// Slot x
        x: i32,
        /// Slot y
        y: i32,
    },

    /// Same cell listed twice within one patch
    #[error("duplicate cell ({xx}, {yy}) in patch ({x}, {y})")]
    DuplicateCell {
        /// Slot x
        x: i32,
        /// Slot y
        y: i32,
        /// Local cell x
        xx: i32,
        /// Local cell y
        yy: i32,
    },

    /// Header metadata does not describe a valid grid
    #[error("invalid map metadata: {0}")]
    Grid(#[from] GridError),

    /// Data left after the last declared record
    #[error("{count} trailing bytes after map data")]
    TrailingBytes {
        /// Number of unread bytes
        count: u64,
    },

    /// Map could not be encoded
    #[error("encode error: {0}")]
    Encode(String),
}
