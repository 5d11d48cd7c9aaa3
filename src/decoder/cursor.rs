//! Forward-only byte cursor with offset tracking

use super::errors::{FormatError, FormatResult};

/// Sequential reader over an in-memory byte buffer.
///
/// Every failed read reports the absolute byte offset at which the
/// missing data was expected.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current byte offset from the start of the buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Consumes `len` bytes and returns them.
    pub fn take(&mut self, len: u64) -> FormatResult<&'a [u8]> {
        let remaining = self.remaining();
        let n = match usize::try_from(len) {
            Ok(n) if n <= remaining => n,
            _ => return Err(FormatError::truncated(self.offset, len, remaining)),
        };
        let slice = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> FormatResult<u64> {
        let bytes = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> FormatResult<u8> {
        Ok(self.take(1)?[0])
    }
}
