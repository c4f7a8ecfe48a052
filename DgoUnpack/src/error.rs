//! Error types for `DgoUnpack`

use std::path::PathBuf;

use thiserror::Error;

use crate::compression::DecoderStatus;

/// The error type for `DgoUnpack` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Container Format Errors ====================
    /// The header signature is not the oZlB magic.
    #[error("invalid container magic: expected 0x426C5A6F, found {found:#010X}")]
    InvalidMagic {
        /// The value read from the first four bytes.
        found: u32,
    },

    /// A header field, block prefix or block payload runs past the end of the input.
    #[error("truncated input: needed {needed} bytes at offset {offset:#X}, only {available} available")]
    TruncatedInput {
        /// Offset of the read that failed.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left at `offset`.
        available: usize,
    },

    // ==================== Decode Errors ====================
    /// The block decoder rejected a compressed block.
    #[error("decompression failed for block {block} at offset {offset:#X}: {status}")]
    DecompressionFailed {
        /// Zero-based index of the block in the stream.
        block: usize,
        /// Offset of the block payload in the container.
        offset: usize,
        /// Status reported by the decoder.
        status: DecoderStatus,
    },

    /// A block would write past the declared output size.
    #[error("output overflow at offset {offset:#X}: block needs {len:#X} bytes, declared size is {capacity:#X}")]
    OutputOverflow {
        /// Output offset the block starts at.
        offset: usize,
        /// Bytes the block needs, a lower bound when the decoder ran out of room.
        len: usize,
        /// Declared output size from the header.
        capacity: usize,
    },

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    /// A batch run finished with failed files.
    #[error("{failed} of {total} files failed to unpack")]
    BatchFailed {
        /// Number of files that failed.
        failed: usize,
        /// Number of files attempted.
        total: usize,
        /// Paths of the failed files.
        paths: Vec<PathBuf>,
    },
}

impl Error {
    /// Process exit status for this error.
    ///
    /// Format errors use 2 and 3, decoder failures use the magnitude of the
    /// decoder status so scripts can tell corrupt blocks apart.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidMagic { .. } => 2,
            Self::TruncatedInput { .. } => 3,
            Self::OutputOverflow { .. } => 5,
            Self::DecompressionFailed { status, .. } => status.exit_code(),
            _ => 1,
        }
    }

    /// Whether this error came from the container bytes rather than the environment.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic { .. }
                | Self::TruncatedInput { .. }
                | Self::DecompressionFailed { .. }
                | Self::OutputOverflow { .. }
        )
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `DgoUnpack` operations.
pub type Result<T> = std::result::Result<T, Error>;
