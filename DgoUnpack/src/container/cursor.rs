//! Bounds-checked sequential reader over an in-memory container

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Sequential reader over a byte slice.
///
/// The position may move past the end of the data when aligning; reads
/// from such a position fail with [`Error::TruncatedInput`].
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current read offset from the start of the data.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the data.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// True once the position has reached or passed the end of the data.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Read a little-endian `u32` and advance by 4.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let value = self.peek_u32_le(0)?;
        self.position += 4;
        Ok(value)
    }

    /// Read a little-endian `u32` at `offset` bytes past the position without advancing.
    pub fn peek_u32_le(&self, offset: usize) -> Result<u32> {
        let start = self.position.saturating_add(offset);
        let bytes = self.slice_at(start, 4)?;
        Ok(LittleEndian::read_u32(bytes))
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self.slice_at(self.position, len)?;
        self.position += len;
        Ok(bytes)
    }

    /// Round the position up to the next multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) {
        self.position = self.position.next_multiple_of(alignment);
    }

    /// Bytes from the position to the end of the data.
    pub fn rest(&self) -> &'a [u8] {
        self.data.get(self.position..).unwrap_or_default()
    }

    fn slice_at(&self, start: usize, len: usize) -> Result<&'a [u8]> {
        start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or(Error::TruncatedInput {
                offset: start,
                needed: len,
                available: self.data.len().saturating_sub(start),
            })
    }
}
