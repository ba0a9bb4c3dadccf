//! Utility functions

pub mod fs;
pub mod path;

pub use fs::{walk_files, write_atomic};
pub use path::{normalize_path, relative_folder};
