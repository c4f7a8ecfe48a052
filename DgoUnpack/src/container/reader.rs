//! oZlB container reader
//!
//! Validates the header, walks the block stream and stitches each block into
//! a [`ReassemblyBuffer`], copying verbatim sectors and handing compressed
//! blocks to a [`BlockDecoder`].

use super::cursor::ByteCursor;
use super::output::ReassemblyBuffer;
use super::types::{BlockKind, ContainerHeader, ContainerLayout};
use super::walker::{Block, BlockWalker};
use super::{HEADER_SIZE, MAGIC};
use crate::compression::{BlockDecoder, DecoderStatus};
use crate::diagnostics::{DecodeEvent, DiagnosticsSink};
use crate::error::{Error, Result};

/// Decodes one container held in memory.
pub struct ContainerReader<'a, D: BlockDecoder> {
    input: &'a [u8],
    decoder: D,
}

impl<'a, D: BlockDecoder> ContainerReader<'a, D> {
    pub fn new(input: &'a [u8], decoder: D) -> Self {
        Self { input, decoder }
    }

    /// Read and validate the 12-byte header.
    pub fn read_header(&self) -> Result<ContainerHeader> {
        parse_header(&mut ByteCursor::new(self.input))
    }

    /// Walk the block stream without decompressing anything.
    pub fn scan(&self) -> Result<ContainerLayout> {
        let mut cursor = ByteCursor::new(self.input);
        let header = parse_header(&mut cursor)?;

        let mut walker = BlockWalker::new(cursor, header.initial_block_size);
        let blocks = walker
            .by_ref()
            .map(|block| block.map(|b| b.descriptor))
            .collect::<Result<Vec<_>>>()?;

        Ok(ContainerLayout {
            header,
            blocks,
            stream_end: walker.position(),
            trailing_bytes: walker.trailing_bytes(),
        })
    }

    /// Decode the whole container into a buffer of the declared output size.
    ///
    /// Any error aborts the decode; no partially assembled output is returned.
    pub fn decode<S: DiagnosticsSink + ?Sized>(&self, sink: &mut S) -> Result<Vec<u8>> {
        let result = self.decode_inner(sink);
        if let Err(e) = &result {
            tracing::debug!("Container decode failed: {e}");
            sink.record(DecodeEvent::Failed {
                message: e.to_string(),
            });
        }
        result
    }

    fn decode_inner<S: DiagnosticsSink + ?Sized>(&self, sink: &mut S) -> Result<Vec<u8>> {
        let mut cursor = ByteCursor::new(self.input);
        let header = parse_header(&mut cursor)?;

        tracing::debug!(
            "Container header: output size {:#X}, first block {:#X}",
            header.declared_output_size,
            header.initial_block_size
        );
        sink.record(DecodeEvent::HeaderParsed {
            declared_output_size: header.declared_output_size,
            initial_block_size: header.initial_block_size,
        });

        let mut output = ReassemblyBuffer::new(header.declared_output_size as usize);
        let mut walker = BlockWalker::new(cursor, header.initial_block_size);

        for block in walker.by_ref() {
            let block = block?;
            let event = self.write_block(&block, &mut output)?;
            sink.record(event);
        }

        tracing::debug!(
            "Decoded {} blocks into {:#X} of {:#X} bytes",
            walker.blocks_read(),
            output.position(),
            output.capacity()
        );
        sink.record(DecodeEvent::EndOfStream {
            blocks: walker.blocks_read(),
            trailing_bytes: walker.trailing_bytes(),
        });

        Ok(output.into_inner())
    }

    fn write_block(&self, block: &Block<'_>, output: &mut ReassemblyBuffer) -> Result<DecodeEvent> {
        let descriptor = &block.descriptor;

        match descriptor.kind {
            BlockKind::Verbatim => {
                output.append(block.payload)?;
                tracing::trace!(
                    "Block {}: copied {:#X} byte sector",
                    descriptor.index,
                    block.payload.len()
                );
                Ok(DecodeEvent::BlockCopied {
                    index: descriptor.index,
                    offset: descriptor.offset,
                    size: block.payload.len(),
                })
            }
            BlockKind::Compressed => {
                let out_offset = output.position();
                let capacity = output.capacity();
                let produced = output.fill_with(|tail| {
                    let room = tail.len();
                    self.decoder.decompress(block.payload, tail).map_err(|status| {
                        if status == DecoderStatus::OUTPUT_OVERRUN {
                            // Needed more than the room left; room + 1 is a lower bound
                            Error::OutputOverflow {
                                offset: out_offset,
                                len: room.saturating_add(1),
                                capacity,
                            }
                        } else {
                            Error::DecompressionFailed {
                                block: descriptor.index,
                                offset: descriptor.offset,
                                status,
                            }
                        }
                    })
                })?;
                tracing::trace!(
                    "Block {}: decompressed {:#X} bytes into {:#X}",
                    descriptor.index,
                    block.payload.len(),
                    produced
                );
                Ok(DecodeEvent::BlockDecompressed {
                    index: descriptor.index,
                    offset: descriptor.offset,
                    compressed_size: block.payload.len(),
                    produced,
                })
            }
        }
    }
}

fn parse_header(cursor: &mut ByteCursor<'_>) -> Result<ContainerHeader> {
    let magic = cursor.read_u32_le()?;
    if magic != MAGIC {
        return Err(Error::InvalidMagic { found: magic });
    }

    let declared_output_size = cursor.read_u32_le()?;
    let initial_block_size = cursor.read_u32_le()?;
    debug_assert_eq!(cursor.position(), HEADER_SIZE);

    Ok(ContainerHeader {
        magic,
        declared_output_size,
        initial_block_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::testing::{
        FailingDecoder, IdentityDecoder, OverclaimingDecoder, TestContainer,
    };
    use crate::container::{VERBATIM_BLOCK_SIZE, decode_with};
    use crate::diagnostics::{EventLog, NullSink};

    fn decode_identity(input: &[u8]) -> Result<Vec<u8>> {
        decode_with(input, IdentityDecoder, &mut NullSink)
    }

    #[test]
    fn test_single_block_round_trip() {
        let input = TestContainer::new(8).compressed(b"DGOFILE!").build();
        assert_eq!(&input[8..12], &8u32.to_le_bytes());

        let output = decode_identity(&input).unwrap();
        assert_eq!(output, b"DGOFILE!");
    }

    #[test]
    fn test_output_length_matches_declared_size() {
        let input = TestContainer::new(64)
            .compressed(b"abc")
            .compressed(b"defgh")
            .terminate(&[])
            .build();

        let output = decode_identity(&input).unwrap();
        assert_eq!(output.len(), 64);
        assert_eq!(&output[..8], b"abcdefgh");
        assert!(output[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_is_deterministic() {
        let input = TestContainer::new(16)
            .compressed(b"12345")
            .compressed(b"6789")
            .build();

        let first = decode_identity(&input).unwrap();
        let second = decode_identity(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_magic() {
        for magic in [0, 0x6F5A6C42, 0x426C5A6E, u32::MAX] {
            let input = TestContainer::new(8).magic(magic).compressed(b"DGOFILE!").build();
            let err = decode_identity(&input).unwrap_err();
            assert!(matches!(err, Error::InvalidMagic { found } if found == magic));
        }
    }

    #[test]
    fn test_short_header_is_truncated() {
        let input = [0x6F, 0x5A, 0x6C, 0x42, 0x08, 0x00];
        let err = decode_identity(&input).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { offset: 4, .. }));
    }

    #[test]
    fn test_magic_checked_before_length() {
        let err = decode_identity(&[1, 2, 3, 4]).unwrap_err();
        assert!(matches!(err, Error::InvalidMagic { found: 0x04030201 }));
    }

    #[test]
    fn test_zero_prefix_ignores_trailing_data() {
        let input = TestContainer::new(8)
            .compressed(b"ABCD")
            .terminate(&[0xFF; 32])
            .build();

        let mut log = EventLog::new();
        let output = decode_with(&input, IdentityDecoder, &mut log).unwrap();

        assert_eq!(output, b"ABCD\0\0\0\0");
        assert_eq!(
            log.events().last(),
            Some(&DecodeEvent::EndOfStream { blocks: 1, trailing_bytes: 32 })
        );
    }

    #[test]
    fn test_verbatim_sector_copied_whatever_declared() {
        let sector: Vec<u8> = (0..VERBATIM_BLOCK_SIZE).map(|i| (i % 251) as u8).collect();

        for declared in [0x8000, 0x8001, 0xFFFF_FFFF] {
            let input = TestContainer::new(0x8000 + 4)
                .block(declared, &sector)
                .compressed(b"tail")
                .build();

            let mut log = EventLog::new();
            let output = decode_with(&input, FailingDecoder(DecoderStatus::ERROR), &mut log);
            // The compressed tail hits the failing decoder, the sector never does
            assert!(matches!(output, Err(Error::DecompressionFailed { block: 1, .. })));
            assert!(matches!(
                log.events()[1],
                DecodeEvent::BlockCopied { index: 0, offset: 12, size: 0x8000 }
            ));

            let output = decode_identity(&input).unwrap();
            assert_eq!(&output[..0x8000], sector.as_slice());
            assert_eq!(&output[0x8000..], b"tail");
        }
    }

    #[test]
    fn test_alignment_padding_skipped() {
        let input = TestContainer::new(7)
            .compressed(b"five!")
            .compressed(b"ok")
            .build();
        // 12 header + 5 payload + 3 padding, then the prefix
        assert_eq!(&input[20..24], &2u32.to_le_bytes());

        let layout = ContainerReader::new(&input, IdentityDecoder).scan().unwrap();
        assert_eq!(layout.blocks[1].offset, 24);

        assert_eq!(decode_identity(&input).unwrap(), b"five!ok");
    }

    #[test]
    fn test_compressed_blocks_overflow() {
        let input = TestContainer::new(8)
            .compressed(b"12345678")
            .compressed(b"9")
            .build();

        let err = decode_identity(&input).unwrap_err();
        assert!(matches!(
            err,
            Error::OutputOverflow { offset: 8, capacity: 8, .. }
        ));
    }

    #[test]
    fn test_verbatim_sector_overflow() {
        let input = TestContainer::new(0x100)
            .block(0x8000, &vec![0xAB; VERBATIM_BLOCK_SIZE])
            .build();

        let err = decode_identity(&input).unwrap_err();
        assert!(matches!(
            err,
            Error::OutputOverflow { offset: 0, len: 0x8000, capacity: 0x100 }
        ));
    }

    #[test]
    fn test_decoder_overclaim_is_overflow() {
        let input = TestContainer::new(8).compressed(b"xx").build();
        let err = decode_with(&input, OverclaimingDecoder, &mut NullSink).unwrap_err();
        assert!(matches!(err, Error::OutputOverflow { .. }));
    }

    #[test]
    fn test_truncated_mid_prefix() {
        let mut input = TestContainer::new(16).compressed(b"abcd").build();
        input.extend_from_slice(&[0x04, 0x00]);

        let err = decode_identity(&input).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { offset: 16, needed: 4, available: 2 }));
    }

    #[test]
    fn test_truncated_payload() {
        let mut input = TestContainer::new(16).compressed(b"abcdefgh").build();
        input.truncate(15);

        let err = decode_identity(&input).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { offset: 12, needed: 8, .. }));
    }

    #[test]
    fn test_decoder_failure_carries_status() {
        let input = TestContainer::new(8).compressed(b"bad").build();

        let mut log = EventLog::new();
        let err = decode_with(&input, FailingDecoder(DecoderStatus::INPUT_OVERRUN), &mut log)
            .unwrap_err();

        match err {
            Error::DecompressionFailed { block, offset, status } => {
                assert_eq!(block, 0);
                assert_eq!(offset, 12);
                assert_eq!(status, DecoderStatus::INPUT_OVERRUN);
            }
            other => panic!("expected DecompressionFailed, got {other:?}"),
        }
        assert!(matches!(log.events().last(), Some(DecodeEvent::Failed { .. })));
    }

    #[test]
    fn test_header_only_container_is_zero_filled() {
        let input = TestContainer::new(4).build();
        assert_eq!(decode_identity(&input).unwrap(), vec![0; 4]);
    }

    #[test]
    fn test_real_lzo_blocks() {
        let first: Vec<u8> = (0..3000u32).map(|i| (i / 7) as u8).collect();
        let second = b"short tail block".to_vec();
        let packed_first = lzokay::compress::compress(&first).unwrap();
        let packed_second = lzokay::compress::compress(&second).unwrap();

        let input = TestContainer::new((first.len() + second.len()) as u32)
            .compressed(&packed_first)
            .compressed(&packed_second)
            .terminate(&[])
            .build();

        let output = crate::container::decode(&input).unwrap();
        assert_eq!(&output[..first.len()], first.as_slice());
        assert_eq!(&output[first.len()..], second.as_slice());
    }

    #[test]
    fn test_scan_reports_layout() {
        let input = TestContainer::new(0x8010)
            .block(0x9000, &vec![0; VERBATIM_BLOCK_SIZE])
            .compressed(b"0123456789")
            .terminate(&[0; 8])
            .build();

        let layout = ContainerReader::new(&input, IdentityDecoder).scan().unwrap();
        assert_eq!(layout.header.declared_output_size, 0x8010);
        assert_eq!(layout.header.initial_block_size, 0x9000);
        assert_eq!(layout.verbatim_count(), 1);
        assert_eq!(layout.compressed_count(), 1);
        assert_eq!(layout.payload_bytes(), 0x8000 + 10);
        assert_eq!(layout.trailing_bytes, 8);
        assert_eq!(layout.stream_end, input.len() - 8);
    }
}
