//! Filesystem module.
//!
//! Provides:
//! - Destination directory layout
//! - Filename sanitization

pub mod naming;
pub mod paths;

pub use naming::{sanitize_filename, sanitize_path_component};
pub use paths::subdirectory;
