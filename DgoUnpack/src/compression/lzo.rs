//! LZO1x block decompression via `lzokay`

use lzokay::decompress::decompress as lzokay_decompress;

use super::{BlockDecoder, DecoderStatus};

/// Stateless LZO1x decoder for compressed container blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lzo1xDecoder;

impl Lzo1xDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BlockDecoder for Lzo1xDecoder {
    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, DecoderStatus> {
        lzokay_decompress(input, output).map_err(DecoderStatus::from)
    }
}

impl From<lzokay::Error> for DecoderStatus {
    fn from(err: lzokay::Error) -> Self {
        match err {
            lzokay::Error::LookbehindOverrun => Self::LOOKBEHIND_OVERRUN,
            lzokay::Error::OutputOverrun => Self::OUTPUT_OVERRUN,
            lzokay::Error::InputOverrun => Self::INPUT_OVERRUN,
            lzokay::Error::InputNotConsumed => Self::INPUT_NOT_CONSUMED,
            lzokay::Error::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        b"oZlB sector data, oZlB sector data, oZlB sector data!"
            .iter()
            .copied()
            .cycle()
            .take(1000)
            .collect()
    }

    #[test]
    fn test_decompress_block() {
        let original = sample();
        let compressed = lzokay::compress::compress(&original).unwrap();

        let mut output = vec![0u8; original.len()];
        let produced = Lzo1xDecoder::new().decompress(&compressed, &mut output).unwrap();

        assert_eq!(produced, original.len());
        assert_eq!(output, original);
    }

    #[test]
    fn test_decompress_reports_short_output() {
        let original = sample();
        let compressed = lzokay::compress::compress(&original).unwrap();

        let mut output = vec![0u8; 4096];
        let produced = Lzo1xDecoder::new().decompress(&compressed, &mut output).unwrap();

        assert_eq!(produced, original.len());
        assert_eq!(&output[..produced], original.as_slice());
        assert!(output[produced..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_output_overrun() {
        let original = sample();
        let compressed = lzokay::compress::compress(&original).unwrap();

        let mut output = vec![0u8; original.len() / 2];
        let err = Lzo1xDecoder::new().decompress(&compressed, &mut output).unwrap_err();

        assert_eq!(err, DecoderStatus::OUTPUT_OVERRUN);
    }

    #[test]
    fn test_garbage_input_fails() {
        let mut output = vec![0u8; 64];
        let result = Lzo1xDecoder::new().decompress(&[0xFF, 0xFF, 0xFF], &mut output);

        assert!(result.is_err());
    }
}
