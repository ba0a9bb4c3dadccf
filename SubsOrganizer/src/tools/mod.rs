//! Corpus housekeeping around the external converter
//!
//! The game's `.pzd` files are turned into XML (and back) by a separate
//! converter binary. These helpers drive it over whole trees and sort its
//! output into place.

pub mod convert;
pub mod relocate;

pub use convert::{ConvertOptions, ConvertSummary, convert_batch, find_convertible, output_path};
pub use relocate::{MoveSummary, move_by_extension};

/// Whether `path`'s file name ends in `.{extension}` (case-insensitive)
///
/// `extension` may span several dots (`pzd.xml`) and may carry a leading dot.
pub(crate) fn has_extension(path: &std::path::Path, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    path.file_name().is_some_and(|name| {
        let name = name.to_string_lossy().to_ascii_lowercase();
        name.len() > extension.len() + 1
            && name.ends_with(&extension)
            && name[..name.len() - extension.len()].ends_with('.')
    })
}
