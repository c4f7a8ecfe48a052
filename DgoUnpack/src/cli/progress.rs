//! Terminal output for the unpack commands
//!
//! Numbered steps with emoji (plain text when the terminal cannot show them)
//! and a bar that tracks a directory batch.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

/// Package - a container being unpacked
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Floppy disk - unpacked output written
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Sparkles - run finished
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Truck - directory batch
pub static TRUCK: Emoji<'_, '_> = Emoji("🚚 ", "");

/// Print `[step/steps] <emoji><msg>`
pub fn print_step(step: usize, steps: usize, emoji: Emoji, msg: &str) {
    let counter = style(format!("[{step}/{steps}]")).bold().dim();
    println!("{counter} {emoji}{msg}");
}

/// Print the elapsed time of a finished run
pub fn print_done(elapsed: Duration) {
    println!("{SPARKLE} Done in {}", HumanDuration(elapsed));
}

/// Bar layout used for directory batches: `vi1.dgo [██████░░░░] 3/8`
///
/// # Panics
/// Panics if the template does not parse, which only a code change can cause.
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .expect("valid template")
        .progress_chars("█▓░")
}

/// Bar for a batch of `total` containers; hidden when `quiet` is set
#[must_use]
pub fn batch_bar(total: u64, msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total)
            .with_style(bar_style())
            .with_message(msg.to_owned())
    }
}
