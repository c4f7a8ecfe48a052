//! Types for oZlB container handling

use std::fmt;

use serde::Serialize;

use super::{MASK_THRESHOLD, VERBATIM_BLOCK_SIZE};

/// Fixed 12-byte header at the start of every container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContainerHeader {
    /// Signature, always [`MAGIC`](super::MAGIC) once parsed
    pub magic: u32,
    /// Size of the reconstructed output in bytes
    pub declared_output_size: u32,
    /// Size prefix of the first block
    pub initial_block_size: u32,
}

/// How a block's payload turns into output bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Stored sector, copied byte-for-byte
    Verbatim,
    /// LZO1x-compressed payload
    Compressed,
}

impl BlockKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verbatim => "verbatim",
            Self::Compressed => "compressed",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One block located during the stream walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockDescriptor {
    /// Zero-based position in the block stream
    pub index: usize,
    /// Offset of the payload from the start of the container
    pub offset: usize,
    /// Size prefix exactly as stored
    pub declared_size: u32,
    /// Classification derived from `declared_size`
    pub kind: BlockKind,
    /// Number of payload bytes the block occupies
    pub payload_len: usize,
}

impl BlockDescriptor {
    /// Classify a non-zero size prefix.
    ///
    /// Sizes of `0x8000` and above are verbatim sectors of exactly `0x8000`
    /// bytes, whatever the stored value. Compressed sizes above `0x10000`
    /// keep only their low 16 bits. That branch cannot be reached once the
    /// verbatim check has run, but the rule is part of the format and is
    /// kept as-is rather than turned into an error.
    #[must_use]
    pub fn classify(index: usize, offset: usize, declared_size: u32) -> Self {
        let (kind, payload_len) = if declared_size as usize >= VERBATIM_BLOCK_SIZE {
            (BlockKind::Verbatim, VERBATIM_BLOCK_SIZE)
        } else {
            let size = if declared_size as usize > MASK_THRESHOLD {
                declared_size & 0xFFFF
            } else {
                declared_size
            };
            (BlockKind::Compressed, size as usize)
        };

        Self {
            index,
            offset,
            declared_size,
            kind,
            payload_len,
        }
    }
}

/// Block layout of a container, produced without decompressing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerLayout {
    pub header: ContainerHeader,
    pub blocks: Vec<BlockDescriptor>,
    /// Input offset where the walk stopped
    pub stream_end: usize,
    /// Bytes left unread after the terminating prefix
    pub trailing_bytes: usize,
}

impl ContainerLayout {
    /// Number of verbatim sectors in the stream.
    #[must_use]
    pub fn verbatim_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Verbatim)
            .count()
    }

    /// Number of compressed blocks in the stream.
    #[must_use]
    pub fn compressed_count(&self) -> usize {
        self.blocks.len() - self.verbatim_count()
    }

    /// Total payload bytes across all blocks.
    #[must_use]
    pub fn payload_bytes(&self) -> usize {
        self.blocks.iter().map(|b| b.payload_len).sum()
    }
}
