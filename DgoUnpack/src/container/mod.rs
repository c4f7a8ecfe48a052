//! oZlB block container format
//!
//! A container is a 12-byte header followed by a stream of blocks:
//!
//! ```text
//! offset 0:  u32 magic (0x426C5A6F, "oZlB" on disk)
//! offset 4:  u32 declared output size
//! offset 8:  u32 size of the first block
//! offset 12: first block payload, padded to 4 bytes
//!            then repeat { u32 size, payload, padding } until size == 0
//!            or the input ends
//! ```
//!
//! Sizes of `0x8000` and above mark a stored sector of exactly `0x8000`
//! bytes; smaller non-zero sizes are LZO1x-compressed blocks.

mod cursor;
mod output;
mod reader;
mod types;
mod walker;

pub use cursor::ByteCursor;
pub use output::ReassemblyBuffer;
pub use reader::ContainerReader;
pub use types::*;
pub use walker::{Block, BlockWalker, WalkEnd};

use crate::compression::{BlockDecoder, Lzo1xDecoder};
use crate::diagnostics::{DiagnosticsSink, TracingSink};
use crate::error::Result;

/// Container signature, read little-endian from the first four bytes
pub const MAGIC: u32 = 0x426C5A6F;

/// Size of the fixed header
pub const HEADER_SIZE: usize = 12;

/// Size of a stored (uncompressed) sector
pub const VERBATIM_BLOCK_SIZE: usize = 0x8000;

/// Compressed sizes above this are masked to 16 bits
pub const MASK_THRESHOLD: usize = 0x10000;

/// Block payloads are padded to this boundary
pub const BLOCK_ALIGNMENT: usize = 4;

/// Decode a container with the LZO1x decoder, logging block events via `tracing`.
///
/// # Example
///
/// ```no_run
/// let packed = std::fs::read("GAME.CGO")?;
/// let unpacked = dgounpack::container::decode(&packed)?;
/// std::fs::write("GAME.UCGO", unpacked)?;
/// # Ok::<(), dgounpack::Error>(())
/// ```
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    decode_with(input, Lzo1xDecoder, &mut TracingSink)
}

/// Decode a container with a caller-supplied decoder and diagnostics sink.
pub fn decode_with<D, S>(input: &[u8], decoder: D, sink: &mut S) -> Result<Vec<u8>>
where
    D: BlockDecoder,
    S: DiagnosticsSink + ?Sized,
{
    ContainerReader::new(input, decoder).decode(sink)
}

/// Read the header and block table without decompressing.
pub fn scan_container(input: &[u8]) -> Result<ContainerLayout> {
    ContainerReader::new(input, Lzo1xDecoder).scan()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for building containers in tests

    use super::{BLOCK_ALIGNMENT, MAGIC};
    use crate::compression::{BlockDecoder, DecoderStatus};

    /// Assembles container bytes block by block.
    pub(crate) struct TestContainer {
        magic: u32,
        output_size: u32,
        blocks: Vec<(u32, Vec<u8>)>,
        tail: Vec<u8>,
    }

    impl TestContainer {
        pub(crate) fn new(output_size: u32) -> Self {
            Self {
                magic: MAGIC,
                output_size,
                blocks: Vec::new(),
                tail: Vec::new(),
            }
        }

        pub(crate) fn magic(mut self, magic: u32) -> Self {
            self.magic = magic;
            self
        }

        /// Add a block whose prefix is `declared` and whose payload is `payload`.
        pub(crate) fn block(mut self, declared: u32, payload: &[u8]) -> Self {
            self.blocks.push((declared, payload.to_vec()));
            self
        }

        /// Add a compressed block sized by its payload.
        pub(crate) fn compressed(self, payload: &[u8]) -> Self {
            let declared = payload.len() as u32;
            self.block(declared, payload)
        }

        /// Append a zero prefix followed by `trailing` bytes.
        pub(crate) fn terminate(mut self, trailing: &[u8]) -> Self {
            self.tail.extend_from_slice(&0u32.to_le_bytes());
            self.tail.extend_from_slice(trailing);
            self
        }

        pub(crate) fn build(&self) -> Vec<u8> {
            let first = self.blocks.first().map_or(0, |(declared, _)| *declared);

            let mut data = Vec::new();
            data.extend_from_slice(&self.magic.to_le_bytes());
            data.extend_from_slice(&self.output_size.to_le_bytes());
            data.extend_from_slice(&first.to_le_bytes());

            for (i, (declared, payload)) in self.blocks.iter().enumerate() {
                if i > 0 {
                    data.extend_from_slice(&declared.to_le_bytes());
                }
                data.extend_from_slice(payload);
                data.resize(data.len().next_multiple_of(BLOCK_ALIGNMENT), 0);
            }

            data.extend_from_slice(&self.tail);
            data
        }
    }

    /// Decoder double that returns its input unchanged.
    pub(crate) struct IdentityDecoder;

    impl BlockDecoder for IdentityDecoder {
        fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, DecoderStatus> {
            let target = output
                .get_mut(..input.len())
                .ok_or(DecoderStatus::OUTPUT_OVERRUN)?;
            target.copy_from_slice(input);
            Ok(input.len())
        }
    }

    /// Decoder double that rejects every block with a fixed status.
    pub(crate) struct FailingDecoder(pub DecoderStatus);

    impl BlockDecoder for FailingDecoder {
        fn decompress(&self, _input: &[u8], _output: &mut [u8]) -> Result<usize, DecoderStatus> {
            Err(self.0)
        }
    }

    /// Decoder double that claims more output than it was offered.
    pub(crate) struct OverclaimingDecoder;

    impl BlockDecoder for OverclaimingDecoder {
        fn decompress(&self, _input: &[u8], output: &mut [u8]) -> Result<usize, DecoderStatus> {
            Ok(output.len() + 16)
        }
    }
}
