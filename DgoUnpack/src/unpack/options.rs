//! Options for file and directory unpacking

use std::path::{Path, PathBuf};

use crate::utils::unpacked_output_path;

/// Extensions picked up by directory unpacking when none are configured
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["CGO", "DGO"];

/// Default log file name, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// Options for directory unpacking.
///
/// # Example
///
/// ```
/// use dgounpack::unpack::UnpackOptions;
///
/// let options = UnpackOptions::new()
///     .with_recursive(true)
///     .with_output_dir(Some("unpacked".into()))
///     .with_log_path(None);
/// assert!(options.matches("DATA/VILLAGE1.DGO"));
/// ```
#[derive(Debug, Clone)]
pub struct UnpackOptions {
    /// File extensions (without dot) treated as containers, compared case-insensitively
    pub extensions: Vec<String>,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Directory receiving outputs, mirroring the source layout.
    /// If None, each output is written next to its input.
    pub output_dir: Option<PathBuf>,

    /// Log file path. If None, no log file is written.
    pub log_path: Option<PathBuf>,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl UnpackOptions {
    /// Create options with the default extensions, next-to-input output and `log.txt`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            recursive: false,
            output_dir: None,
            log_path: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }

    /// Replace the extension list. An empty list keeps the defaults.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extensions: Vec<String> = extensions.into_iter().map(Into::into).collect();
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        self
    }

    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    #[must_use]
    pub fn with_log_path(mut self, log_path: Option<PathBuf>) -> Self {
        self.log_path = log_path;
        self
    }

    /// Check whether `path` has one of the configured extensions.
    pub fn matches<P: AsRef<Path>>(&self, path: P) -> bool {
        crate::utils::has_extension(path, &self.extensions)
    }

    /// Where the unpacked form of `source` goes.
    ///
    /// With an output directory, the path of `source` relative to
    /// `source_base` is preserved beneath it.
    pub fn output_path_for(&self, source: &Path, source_base: &Path) -> PathBuf {
        let Some(output_dir) = &self.output_dir else {
            return unpacked_output_path(source);
        };

        let relative = source.strip_prefix(source_base).unwrap_or(source);
        let relative_parent = relative.parent().unwrap_or(Path::new(""));
        let file_name = source.file_name().map(PathBuf::from).unwrap_or_default();

        output_dir
            .join(relative_parent)
            .join(unpacked_output_path(file_name))
    }
}
