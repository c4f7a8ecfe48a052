//! Block decompression
//!
//! The container parser only needs one capability from a codec: fill an
//! output slice from a compressed slice and report how much was written.
//! [`BlockDecoder`] is that seam; [`Lzo1xDecoder`] is the implementation
//! used for real containers.

use std::fmt;

pub mod lzo;

pub use lzo::Lzo1xDecoder;

/// Decompresses a single container block.
///
/// Implementations must be deterministic, must never write more than
/// `output.len()` bytes, and must report the exact number of bytes produced.
pub trait BlockDecoder {
    /// Decompress `input` into `output`, returning the number of bytes produced.
    ///
    /// `output.len()` is the maximum decompressed length for this block.
    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, DecoderStatus>;
}

impl<D: BlockDecoder + ?Sized> BlockDecoder for &D {
    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, DecoderStatus> {
        (**self).decompress(input, output)
    }
}

/// Failure status reported by a [`BlockDecoder`].
///
/// Values follow the LZO library's negative return codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoderStatus(pub i32);

impl DecoderStatus {
    pub const ERROR: Self = Self(-1);
    pub const INPUT_OVERRUN: Self = Self(-4);
    pub const OUTPUT_OVERRUN: Self = Self(-5);
    pub const LOOKBEHIND_OVERRUN: Self = Self(-6);
    pub const INPUT_NOT_CONSUMED: Self = Self(-8);

    /// The raw status code.
    #[must_use]
    pub fn code(self) -> i32 {
        self.0
    }

    /// Short name of a known status, if any.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::ERROR => Some("error"),
            Self::INPUT_OVERRUN => Some("input overrun"),
            Self::OUTPUT_OVERRUN => Some("output overrun"),
            Self::LOOKBEHIND_OVERRUN => Some("lookbehind overrun"),
            Self::INPUT_NOT_CONSUMED => Some("input not consumed"),
            _ => None,
        }
    }

    /// Process exit status derived from this code (its magnitude, never 0).
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match u8::try_from(self.0.unsigned_abs()) {
            Ok(0) | Err(_) => 1,
            Ok(code) => code,
        }
    }
}

impl fmt::Display for DecoderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (status {})", self.0),
            None => write!(f, "status {}", self.0),
        }
    }
}
