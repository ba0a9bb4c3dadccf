//! Path utilities

use std::path::Path;

/// Normalize path separators to forward slashes (for workbook cells)
#[must_use]
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Normalized parent directory of `path` relative to `base`; empty at the root
#[must_use]
pub fn relative_folder<P: AsRef<Path>>(path: P, base: P) -> Option<String> {
    let relative = path.as_ref().strip_prefix(base.as_ref()).ok()?;
    Some(relative.parent().map(normalize_path).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_relative_folder() {
        let base = PathBuf::from("root");
        assert_eq!(
            relative_folder(&base.join("cut").join("ev01").join("a.pzd.xml"), &base).as_deref(),
            Some("cut/ev01")
        );
        assert_eq!(relative_folder(&PathBuf::from("other/a"), &base), None);
        assert_eq!(
            relative_folder(&base.join("cut").join("a.xml"), &base).as_deref(),
            Some("cut")
        );
        assert_eq!(relative_folder(&base.join("a.xml"), &base).as_deref(), Some(""));
    }
}
