//! CLI command for unpacking a single container

use std::path::Path;
use std::time::Instant;

use anyhow::Context;

use crate::cli::progress::{DISK, PACKAGE, print_done, print_step};
use crate::diagnostics::{DecodeEvent, EventLog};
use crate::unpack::{LogFile, unpack_file};
use crate::utils::unpacked_output_path;

pub fn execute(source: &Path, output: Option<&Path>, log_path: Option<&Path>) -> anyhow::Result<()> {
    let started = Instant::now();
    let destination = output.map_or_else(|| unpacked_output_path(source), Path::to_path_buf);

    let log = log_path
        .map(LogFile::create)
        .transpose()
        .context("failed to create log file")?;

    print_step(1, 2, PACKAGE, &format!("Unpacking {}...", source.display()));

    let mut events = EventLog::new();
    let outcome = unpack_file(source, &destination, &mut events);

    if let Some(log) = &log {
        log.record_file(source, &events, outcome.as_ref().err())?;
        log.flush()?;
    }

    let report = outcome.with_context(|| format!("failed to unpack {}", source.display()))?;

    print_step(
        2,
        2,
        DISK,
        &format!(
            "Wrote {} ({} -> {} bytes, {} blocks)",
            report.destination.display(),
            report.input_size,
            report.output_size,
            block_count(&events)
        ),
    );
    print_done(started.elapsed());

    Ok(())
}

fn block_count(events: &EventLog) -> usize {
    events
        .events()
        .iter()
        .filter(|e| {
            matches!(
                e,
                DecodeEvent::BlockCopied { .. } | DecodeEvent::BlockDecompressed { .. }
            )
        })
        .count()
}
