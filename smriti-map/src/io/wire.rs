//! Little-endian primitives of the map format.
//!
//! Integers are 4-byte signed, floats 8-byte IEEE-754, both little-endian.
//! The reader tracks its byte offset so a short stream reports where it
//! ran out.

use std::io::{self, Read, Write};

use crate::core::GridCoord;

use super::error::MapIoError;

/// Byte-counting writer of map primitives.
pub(crate) struct WireWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> WireWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), MapIoError> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    pub(crate) fn write_i32(&mut self, value: i32) -> Result<(), MapIoError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub(crate) fn write_u32(&mut self, value: u32) -> Result<(), MapIoError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub(crate) fn write_f64(&mut self, value: f64) -> Result<(), MapIoError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub(crate) fn write_coord(&mut self, coord: GridCoord) -> Result<(), MapIoError> {
        self.write_i32(coord.x)?;
        self.write_i32(coord.y)
    }

    /// Write a count field; counts above `i32::MAX` cannot be represented.
    pub(crate) fn write_count(&mut self, context: &str, count: usize) -> Result<(), MapIoError> {
        let count = i32::try_from(count)
            .map_err(|_| MapIoError::Encode(format!("{context} {count} exceeds i32::MAX")))?;
        self.write_i32(count)
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.written
    }

    pub(crate) fn flush(&mut self) -> Result<(), MapIoError> {
        self.inner.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.inner
    }
}

/// Offset-tracking reader of map primitives.
pub(crate) struct WireReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> WireReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    pub(crate) fn read_exact(
        &mut self,
        buf: &mut [u8],
        context: &'static str,
    ) -> Result<(), MapIoError> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(MapIoError::Truncated {
                context,
                offset: self.offset,
            }),
            Err(e) => Err(MapIoError::Io(e)),
        }
    }

    pub(crate) fn read_array<const N: usize>(
        &mut self,
        context: &'static str,
    ) -> Result<[u8; N], MapIoError> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf, context)?;
        Ok(buf)
    }

    pub(crate) fn read_u8(&mut self, context: &'static str) -> Result<u8, MapIoError> {
        let [b] = self.read_array::<1>(context)?;
        Ok(b)
    }

    pub(crate) fn read_i32(&mut self, context: &'static str) -> Result<i32, MapIoError> {
        self.read_array(context).map(i32::from_le_bytes)
    }

    pub(crate) fn read_u32(&mut self, context: &'static str) -> Result<u32, MapIoError> {
        self.read_array(context).map(u32::from_le_bytes)
    }

    pub(crate) fn read_f64(&mut self, context: &'static str) -> Result<f64, MapIoError> {
        self.read_array(context).map(f64::from_le_bytes)
    }

    pub(crate) fn read_coord(&mut self, context: &'static str) -> Result<GridCoord, MapIoError> {
        let x = self.read_i32(context)?;
        let y = self.read_i32(context)?;
        Ok(GridCoord::new(x, y))
    }

    /// Read a count field and check it against `max`.
    pub(crate) fn read_count(
        &mut self,
        context: &'static str,
        max: usize,
    ) -> Result<usize, MapIoError> {
        let count = self.read_i32(context)?;
        let count = usize::try_from(count).map_err(|_| MapIoError::NegativeCount { context, count })?;
        if count > max {
            return Err(MapIoError::CountTooLarge {
                context,
                count,
                max,
            });
        }
        Ok(count)
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    /// Fail if anything is left in the stream.
    pub(crate) fn expect_eof(&mut self) -> Result<(), MapIoError> {
        let count = io::copy(&mut self.inner, &mut io::sink())?;
        if count > 0 {
            return Err(MapIoError::TrailingBytes { count });
        }
        Ok(())
    }
}
