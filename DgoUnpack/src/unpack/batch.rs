//! Batch unpack operations
//!
//! This module provides container discovery and parallel unpacking of a
//! directory. Each container is decoded independently; one failure never
//! stops its siblings.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::log::LogFile;
use super::options::UnpackOptions;
use super::unpack_file;
use crate::diagnostics::EventLog;
use crate::error::{Error, Result};

/// Progress information during batch unpacking
#[derive(Debug, Clone)]
pub struct UnpackProgress {
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file being processed (if applicable)
    pub current_file: Option<String>,
}

impl UnpackProgress {
    #[must_use]
    pub fn new(current: usize, total: usize) -> Self {
        Self {
            current,
            total,
            current_file: None,
        }
    }

    #[must_use]
    pub fn with_file(current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Directory entries sorted into containers and everything else
#[derive(Debug, Clone, Default)]
pub struct DiscoveredFiles {
    /// Files with a container extension, sorted
    pub containers: Vec<PathBuf>,
    /// Other files, sorted
    pub skipped: Vec<PathBuf>,
}

/// Result of a batch unpack
#[derive(Debug, Clone, Default)]
pub struct BatchUnpackResult {
    /// Number of containers unpacked
    pub success_count: usize,
    /// Number of containers that failed
    pub fail_count: usize,
    /// Number of non-container files passed over
    pub skipped_count: usize,
    /// Messages for each file processed
    pub results: Vec<String>,
    /// Failed containers with their error messages
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchUnpackResult {
    /// Returns true if no container failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.fail_count == 0
    }

    /// Number of containers attempted
    #[must_use]
    pub fn total(&self) -> usize {
        self.success_count + self.fail_count
    }

    /// Turn a batch with failures into [`Error::BatchFailed`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::BatchFailed {
                failed: self.fail_count,
                total: self.total(),
                paths: self.failures.into_iter().map(|(p, _)| p).collect(),
            })
        }
    }
}

/// Find container files in a directory
///
/// Only the directory itself is searched unless `options.recursive` is set.
/// Unreadable entries are logged and passed over.
pub fn find_container_files<P: AsRef<Path>>(dir: P, options: &UnpackOptions) -> DiscoveredFiles {
    let max_depth = if options.recursive { usize::MAX } else { 1 };

    let mut found = DiscoveredFiles::default();
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|e| tracing::warn!("{}", Error::from(e)))
                .ok()
        })
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.into_path();
        if options.matches(&path) {
            found.containers.push(path);
        } else {
            found.skipped.push(path);
        }
    }

    found.containers.sort();
    found.skipped.sort();
    found
}

/// Batch unpack containers in parallel
///
/// # Arguments
/// * `containers` - Container files to unpack
/// * `source_base` - Base directory of the source (for output layout and display)
/// * `options` - Output placement
/// * `log` - Log file receiving one section per container
/// * `progress` - Callback for progress updates
///
/// # Returns
/// Summary of the batch operation.
pub fn batch_unpack<F>(
    containers: &[PathBuf],
    source_base: &Path,
    options: &UnpackOptions,
    log: Option<&LogFile>,
    progress: F,
) -> BatchUnpackResult
where
    F: Fn(&UnpackProgress) + Send + Sync,
{
    let processed = AtomicUsize::new(0);
    let total = containers.len();

    let outcomes: Vec<(String, Option<(PathBuf, String)>)> = containers
        .par_iter()
        .map(|source| {
            let relative_path = source.strip_prefix(source_base).unwrap_or(source.as_path());
            let display_path = relative_path.to_string_lossy().to_string();

            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&UnpackProgress::with_file(current, total, display_path.clone()));

            let destination = options.output_path_for(source, source_base);
            let mut events = EventLog::new();
            let outcome = unpack_file(source, &destination, &mut events);

            if let Some(log) = log {
                if let Err(e) = log.record_file(source, &events, outcome.as_ref().err()) {
                    tracing::warn!("Failed to write log entry for {display_path}: {e}");
                }
            }

            match outcome {
                Ok(report) => (
                    format!(
                        "Unpacked: {display_path} ({} -> {} bytes)",
                        report.input_size, report.output_size
                    ),
                    None,
                ),
                Err(e) => {
                    if e.is_decode_error() {
                        tracing::warn!("Corrupt container {display_path}: {e}");
                    } else {
                        tracing::warn!("Failed to unpack {display_path}: {e}");
                    }
                    (
                        format!("Failed {display_path}: {e}"),
                        Some((source.clone(), e.to_string())),
                    )
                }
            }
        })
        .collect();

    let mut result = BatchUnpackResult::default();
    for (message, failure) in outcomes {
        result.results.push(message);
        match failure {
            Some(failure) => {
                result.fail_count += 1;
                result.failures.push(failure);
            }
            None => result.success_count += 1,
        }
    }
    result
}

/// Unpack every container in a directory
///
/// Opens the log file named in `options` (if any), records skipped entries,
/// and unpacks the containers in parallel.
pub fn unpack_directory<P, F>(dir: P, options: &UnpackOptions, progress: F) -> Result<BatchUnpackResult>
where
    P: AsRef<Path>,
    F: Fn(&UnpackProgress) + Send + Sync,
{
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::InvalidPath(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let found = find_container_files(dir, options);
    tracing::info!(
        "Found {} containers ({} other files) in {}",
        found.containers.len(),
        found.skipped.len(),
        dir.display()
    );

    let log = options.log_path.as_ref().map(LogFile::create).transpose()?;
    if let Some(log) = &log {
        for path in &found.skipped {
            log.record_skipped(path)?;
        }
    }

    let mut result = batch_unpack(&found.containers, dir, options, log.as_ref(), progress);
    result.skipped_count = found.skipped.len();

    if let Some(log) = &log {
        log.flush()?;
    }
    Ok(result)
}
