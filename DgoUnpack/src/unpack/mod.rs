//! File-level unpacking
//!
//! Reads whole containers from disk, decodes them and writes the result.
//! Output files are only created once a decode has fully succeeded.

mod batch;
mod log;
mod options;

use std::path::{Path, PathBuf};

use crate::compression::Lzo1xDecoder;
use crate::container::decode_with;
use crate::diagnostics::DiagnosticsSink;
use crate::error::Result;

pub use batch::{
    BatchUnpackResult, DiscoveredFiles, UnpackProgress, batch_unpack, find_container_files,
    unpack_directory,
};
pub use log::LogFile;
pub use options::{DEFAULT_EXTENSIONS, DEFAULT_LOG_FILE, UnpackOptions};

/// Summary of one unpacked container
#[derive(Debug, Clone)]
pub struct UnpackReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Size of the container on disk
    pub input_size: usize,
    /// Size of the unpacked output
    pub output_size: usize,
}

/// Read a whole container into memory.
pub fn read_container<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

/// Unpack `source` into `destination`, reporting block events to `sink`.
///
/// Parent directories of `destination` are created as needed. Nothing is
/// written if the decode fails.
pub fn unpack_file<S, D>(source: S, destination: D, sink: &mut dyn DiagnosticsSink) -> Result<UnpackReport>
where
    S: AsRef<Path>,
    D: AsRef<Path>,
{
    let source = source.as_ref();
    let destination = destination.as_ref();

    let input = read_container(source)?;
    let output = decode_with(&input, Lzo1xDecoder, sink)?;

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(destination, &output)?;

    tracing::debug!(
        "Unpacked {} -> {} ({} bytes)",
        source.display(),
        destination.display(),
        output.len()
    );

    Ok(UnpackReport {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        input_size: input.len(),
        output_size: output.len(),
    })
}
