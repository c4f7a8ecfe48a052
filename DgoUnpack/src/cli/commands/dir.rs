//! CLI command for unpacking a directory of containers

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{TRUCK, batch_bar, print_done, print_step};
use crate::unpack::{UnpackOptions, unpack_directory};

pub fn execute(
    source: &Path,
    output: Option<&Path>,
    recursive: bool,
    extensions: &[String],
    quiet: bool,
    log_path: Option<&Path>,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let options = UnpackOptions::new()
        .with_extensions(extensions.iter().cloned())
        .with_recursive(recursive)
        .with_output_dir(output.map(Path::to_path_buf))
        .with_log_path(log_path.map(Path::to_path_buf));

    if !quiet {
        print_step(
            1,
            1,
            TRUCK,
            &format!("Unpacking {} containers in {}...", options.extensions.join("/"), source.display()),
        );
    }

    let pb = batch_bar(0, "Unpacking", quiet);
    let result = unpack_directory(source, &options, |progress| {
        pb.set_length(progress.total as u64);
        pb.set_position(progress.current as u64);
        if let Some(file) = &progress.current_file {
            pb.set_message(file.clone());
        }
    })?;
    pb.finish_and_clear();

    if result.total() == 0 {
        println!("No containers found in: {}", source.display());
        return Ok(());
    }

    if !quiet {
        for line in &result.results {
            println!("  {line}");
        }
    }
    for (path, error) in &result.failures {
        eprintln!("Failed: {}: {error}", path.display());
    }

    println!(
        "Unpacked {} of {} containers ({} other files skipped)",
        result.success_count,
        result.total(),
        result.skipped_count
    );
    if let Some(log) = &options.log_path {
        println!("Log written to {}", log.display());
    }
    if !quiet {
        print_done(started.elapsed());
    }

    result.into_result()?;
    Ok(())
}
