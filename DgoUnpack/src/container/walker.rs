//! Block stream walk
//!
//! The first block's size comes from the header; each later block is
//! preceded by a u32 size prefix at the 4-byte aligned offset following the
//! previous payload. The walk stops at the end of the input or at a zero
//! prefix.

use std::iter::FusedIterator;

use super::cursor::ByteCursor;
use super::types::BlockDescriptor;
use super::BLOCK_ALIGNMENT;
use crate::error::Result;

/// A block located in the stream, with its payload borrowed from the input.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    pub descriptor: BlockDescriptor,
    pub payload: &'a [u8],
}

/// Why the walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// The consumed-input position reached the end of the data
    EndOfInput,
    /// A zero size prefix was read
    Terminator,
    /// A prefix or payload ran past the end of the data
    Failed,
}

/// Iterator over the blocks of a container.
///
/// Yields at most one error, after which it is exhausted.
#[derive(Debug, Clone)]
pub struct BlockWalker<'a> {
    cursor: ByteCursor<'a>,
    next_size: u32,
    index: usize,
    end: Option<WalkEnd>,
}

impl<'a> BlockWalker<'a> {
    /// Start a walk with `cursor` positioned at the first payload.
    pub fn new(cursor: ByteCursor<'a>, initial_block_size: u32) -> Self {
        Self {
            cursor,
            next_size: initial_block_size,
            index: 0,
            end: None,
        }
    }

    /// Number of blocks yielded so far.
    pub fn blocks_read(&self) -> usize {
        self.index
    }

    /// Why the walk stopped, or `None` while it is still running.
    pub fn end(&self) -> Option<WalkEnd> {
        self.end
    }

    /// Input offset the walk has consumed up to, clamped to the input length.
    pub fn position(&self) -> usize {
        self.cursor.position().min(self.cursor.len())
    }

    /// Bytes ignored after a zero prefix.
    pub fn trailing_bytes(&self) -> usize {
        match self.end {
            Some(WalkEnd::Terminator) => self.cursor.remaining(),
            _ => 0,
        }
    }

    fn finish(&mut self, end: WalkEnd) {
        self.end = Some(end);
    }

    fn next_block(&mut self) -> Result<Option<Block<'a>>> {
        self.cursor.align(BLOCK_ALIGNMENT);
        if self.cursor.is_at_end() {
            self.finish(WalkEnd::EndOfInput);
            return Ok(None);
        }

        if self.index > 0 {
            self.next_size = self.cursor.read_u32_le()?;
        }
        if self.next_size == 0 {
            self.finish(WalkEnd::Terminator);
            return Ok(None);
        }

        let descriptor =
            BlockDescriptor::classify(self.index, self.cursor.position(), self.next_size);
        let payload = self.cursor.take(descriptor.payload_len)?;
        self.index += 1;

        Ok(Some(Block {
            descriptor,
            payload,
        }))
    }
}

impl<'a> Iterator for BlockWalker<'a> {
    type Item = Result<Block<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end.is_some() {
            return None;
        }

        match self.next_block() {
            Ok(block) => block.map(Ok),
            Err(e) => {
                self.finish(WalkEnd::Failed);
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for BlockWalker<'_> {}
