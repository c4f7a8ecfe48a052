//! Utility functions

pub mod path;

pub use path::{has_extension, unpacked_output_path};
