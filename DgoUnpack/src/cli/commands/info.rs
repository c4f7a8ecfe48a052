//! CLI command for showing a container's block table

use std::path::Path;

use crate::container::{BlockKind, ContainerLayout, scan_container};
use crate::unpack::read_container;

/// Format byte size for human-readable output
fn format_size(bytes: usize) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1}M", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}K", bytes as f64 / 1024.0)
    } else {
        format!("{bytes}")
    }
}

pub fn execute(source: &Path, json: bool) -> anyhow::Result<()> {
    let data = read_container(source)?;
    let layout = scan_container(&data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    print_layout(source, data.len(), &layout);
    Ok(())
}

fn print_layout(source: &Path, file_size: usize, layout: &ContainerLayout) {
    let header = &layout.header;
    let output_size = header.declared_output_size as usize;

    println!("Container: {}", source.display());
    println!();
    println!("File size:       {} ({file_size} bytes)", format_size(file_size));
    println!(
        "Output size:     {} ({output_size} bytes)",
        format_size(output_size)
    );
    println!("First block:     {:#010X}", header.initial_block_size);
    println!(
        "Blocks:          {} ({} compressed, {} verbatim)",
        layout.blocks.len(),
        layout.compressed_count(),
        layout.verbatim_count()
    );
    if file_size > 0 {
        let ratio = output_size as f64 / file_size as f64;
        println!("Expansion:       {ratio:.2}x");
    }
    if layout.trailing_bytes > 0 {
        println!("Trailing bytes:  {}", layout.trailing_bytes);
    }
    println!();

    println!("{:>6}  {:>10}  {:>10}  {:>10}  kind", "block", "offset", "declared", "payload");
    for block in &layout.blocks {
        let kind = match block.kind {
            BlockKind::Verbatim if block.declared_size as usize != block.payload_len => {
                "verbatim (size clamped)"
            }
            kind => kind.as_str(),
        };
        println!(
            "{:>6}  {:#010X}  {:#010X}  {:>10}  {kind}",
            block.index, block.offset, block.declared_size, block.payload_len
        );
    }
}
