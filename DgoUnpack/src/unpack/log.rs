//! Unpack log file
//!
//! One section per container: a `File:` line, that container's decode
//! events, and a failure line when it did not unpack. Sections are built in
//! memory and written under a lock, so parallel unpacks never interleave.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::diagnostics::EventLog;
use crate::error::{Error, Result};

/// Shared, append-only log file.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl LogFile {
    /// Create (or truncate) the log and write its header line.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = BufWriter::new(File::create(&path)?);
        writeln!(
            writer,
            "dgounpack {} (LZO1x via lzokay) - {}",
            crate::VERSION,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;

        Ok(Self {
            path,
            writer: Mutex::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a single line.
    pub fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self.lock();
        writeln!(writer, "{line}")?;
        Ok(())
    }

    /// Note a directory entry that was not a container.
    pub fn record_skipped(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy());
        self.write_line(&format!("Skipping {name}"))
    }

    /// Append the section for one container.
    pub fn record_file(&self, source: &Path, events: &EventLog, error: Option<&Error>) -> Result<()> {
        let section = format_section(source, events, error);
        let mut writer = self.lock();
        writer.write_all(section.as_bytes())?;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.lock().flush()?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, BufWriter<File>> {
        // A panic mid-write leaves at worst a partial line; keep logging
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn format_section(source: &Path, events: &EventLog, error: Option<&Error>) -> String {
    let mut section = String::new();
    let _ = writeln!(section, "\nFile: {}", source.display());
    for line in events.lines() {
        let _ = writeln!(section, "{line}");
    }
    if let Some(e) = error {
        let _ = writeln!(
            section,
            "!!!Non-Zero Return Value for File: {} ({e})",
            source.display()
        );
    }
    section
}
