//! # DgoUnpack
//!
//! A pure-Rust decoder for the oZlB block container used to ship CGO/DGO
//! game archives. A container wraps a sequence of LZO1x-compressed or stored
//! blocks; decoding restores the original archive byte for byte.
//!
//! ## Quick Start
//!
//! ### Decoding a container in memory
//!
//! ```no_run
//! let packed = std::fs::read("GAME.CGO")?;
//! let unpacked = dgounpack::container::decode(&packed)?;
//! # Ok::<(), dgounpack::Error>(())
//! ```
//!
//! ### Unpacking files
//!
//! ```no_run
//! use dgounpack::prelude::*;
//!
//! // Single file, block events collected for inspection
//! let mut events = EventLog::new();
//! unpack_file("GAME.CGO", "GAME.UCGO", &mut events)?;
//!
//! // Every CGO/DGO in a directory, in parallel
//! let options = UnpackOptions::new().with_recursive(true);
//! let result = unpack_directory("iso/", &options, |_progress| {})?;
//! println!("{} unpacked, {} failed", result.success_count, result.fail_count);
//! # Ok::<(), dgounpack::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `dgounpack` command-line binary

pub mod compression;
pub mod container;
pub mod diagnostics;
pub mod error;
pub mod unpack;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::compression::{BlockDecoder, DecoderStatus, Lzo1xDecoder};
    pub use crate::container::{
        BlockDescriptor, BlockKind, ContainerHeader, ContainerLayout, ContainerReader, decode,
        decode_with, scan_container,
    };
    pub use crate::diagnostics::{DecodeEvent, DiagnosticsSink, EventLog, NullSink, TracingSink};
    pub use crate::unpack::{
        BatchUnpackResult, LogFile, UnpackOptions, UnpackProgress, UnpackReport,
        find_container_files, unpack_directory, unpack_file,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
