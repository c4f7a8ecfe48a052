//! Pre-sized output buffer that decoded blocks are stitched into

use crate::error::{Error, Result};

/// Zero-initialised buffer of exactly the declared output size.
///
/// Blocks are written at a monotonically advancing cursor. Every write is
/// checked against the capacity, so a container that declares more output
/// than its header allows fails with [`Error::OutputOverflow`].
#[derive(Debug, Clone)]
pub struct ReassemblyBuffer {
    data: Vec<u8>,
    cursor: usize,
}

impl ReassemblyBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Offset the next block will be written at.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Copy `bytes` into the buffer at `offset`.
    pub fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let capacity = self.data.len();
        let target = offset
            .checked_add(bytes.len())
            .and_then(|end| self.data.get_mut(offset..end))
            .ok_or(Error::OutputOverflow {
                offset,
                len: bytes.len(),
                capacity,
            })?;
        target.copy_from_slice(bytes);
        Ok(())
    }

    /// Write `bytes` at the cursor and advance past them.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_at(self.cursor, bytes)?;
        self.cursor += bytes.len();
        Ok(())
    }

    /// Hand the unwritten tail to `fill` and advance by the count it reports.
    ///
    /// A count larger than the tail is rejected as an overflow.
    pub fn fill_with<F>(&mut self, fill: F) -> Result<usize>
    where
        F: FnOnce(&mut [u8]) -> Result<usize>,
    {
        let offset = self.cursor;
        let capacity = self.data.len();
        let tail = &mut self.data[offset..];
        let room = tail.len();

        let produced = fill(tail)?;
        if produced > room {
            return Err(Error::OutputOverflow {
                offset,
                len: produced,
                capacity,
            });
        }

        self.cursor += produced;
        Ok(produced)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning all `capacity` bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let buffer = ReassemblyBuffer::new(16);
        assert_eq!(buffer.capacity(), 16);
        assert_eq!(buffer.remaining(), 16);
        assert!(buffer.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_append_advances() {
        let mut buffer = ReassemblyBuffer::new(8);
        buffer.append(&[1, 2, 3]).unwrap();
        buffer.append(&[4, 5]).unwrap();

        assert_eq!(buffer.position(), 5);
        assert_eq!(buffer.into_inner(), vec![1, 2, 3, 4, 5, 0, 0, 0]);
    }

    #[test]
    fn test_write_past_capacity_fails() {
        let mut buffer = ReassemblyBuffer::new(4);
        buffer.append(&[1, 2]).unwrap();

        let err = buffer.append(&[3, 4, 5]).unwrap_err();
        assert!(matches!(
            err,
            Error::OutputOverflow { offset: 2, len: 3, capacity: 4 }
        ));
        // Nothing was written by the failed call
        assert_eq!(buffer.as_slice(), &[1, 2, 0, 0]);
        assert_eq!(buffer.position(), 2);
    }

    #[test]
    fn test_write_at_huge_offset_fails() {
        let mut buffer = ReassemblyBuffer::new(4);
        assert!(buffer.write_at(usize::MAX, &[1]).is_err());
    }

    #[test]
    fn test_fill_with_rejects_overclaim() {
        let mut buffer = ReassemblyBuffer::new(4);
        let err = buffer.fill_with(|tail| Ok(tail.len() + 1)).unwrap_err();

        assert!(matches!(err, Error::OutputOverflow { len: 5, .. }));
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn test_fill_with_advances() {
        let mut buffer = ReassemblyBuffer::new(6);
        buffer.append(&[9]).unwrap();
        let produced = buffer
            .fill_with(|tail| {
                tail[..3].copy_from_slice(&[7, 7, 7]);
                Ok(3)
            })
            .unwrap();

        assert_eq!(produced, 3);
        assert_eq!(buffer.position(), 4);
        assert_eq!(buffer.as_slice(), &[9, 7, 7, 7, 0, 0]);
    }
}
