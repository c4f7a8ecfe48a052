//! Path utilities

use std::path::{Path, PathBuf};

/// Output path for an unpacked container: `FOO.CGO` becomes `FOO.UCGO`.
///
/// Files without an extension get a `.U` extension.
pub fn unpacked_output_path<P: AsRef<Path>>(source: P) -> PathBuf {
    let source = source.as_ref();
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    source.with_extension(format!("U{ext}"))
}

/// Check whether `path` ends in one of `extensions` (case-insensitive, no dot).
pub fn has_extension<P: AsRef<Path>, S: AsRef<str>>(path: P, extensions: &[S]) -> bool {
    path.as_ref().extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy();
        extensions
            .iter()
            .any(|wanted| ext.eq_ignore_ascii_case(wanted.as_ref().trim_start_matches('.')))
    })
}
