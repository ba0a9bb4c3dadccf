//! Moving converter output into a destination tree

use std::fs;
use std::io;
use std::path::Path;

use super::has_extension;
use crate::error::Result;
use crate::report::{ReportKind, RunReport};
use crate::utils::fs::walk_files;

/// Result of a move run
#[derive(Debug, Clone, Default)]
pub struct MoveSummary {
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub report: RunReport,
}

/// Move every file under `source` ending in `.{extension}` to the same
/// relative path under `dest`
///
/// Existing destinations are left alone and reported as skipped. Per-file
/// failures are reported and do not stop the run.
///
/// # Errors
/// Returns an error only if `source` is not a directory.
pub fn move_by_extension<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    dest: Q,
    extension: &str,
) -> Result<MoveSummary> {
    let source = source.as_ref();
    let dest = dest.as_ref();
    if !source.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("source directory not found: {}", source.display()),
        )
        .into());
    }

    let mut summary = MoveSummary::default();
    let files = walk_files(source, false, &mut summary.report, |path| {
        has_extension(path, extension) && !path.starts_with(dest)
    });

    tracing::info!("Moving {} *.{} files to {}", files.len(), extension.trim_start_matches('.'), dest.display());

    for file in &files {
        let Ok(relative) = file.strip_prefix(source) else {
            continue;
        };
        let target = dest.join(relative);

        if target.exists() {
            summary.skipped += 1;
            summary.report.push(
                ReportKind::SkippedExisting,
                Some(&target),
                "destination exists",
            );
            continue;
        }

        match move_file(file, &target) {
            Ok(()) => {
                summary.moved += 1;
                summary.report.push(
                    ReportKind::Moved,
                    Some(&target),
                    format!("from {}", file.display()),
                );
            }
            Err(e) => {
                summary.failed += 1;
                summary
                    .report
                    .push(ReportKind::MoveFailed, Some(file), e.to_string());
            }
        }
    }

    Ok(summary)
}

/// Rename, falling back to copy and delete across file systems
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_preserves_layout() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        let dest = temp.path().join("dst");
        fs::create_dir_all(source.join("cut").join("ev01")).unwrap();
        fs::write(source.join("cut").join("ev01").join("a.pzd.xml"), "new").unwrap();
        fs::write(source.join("cut").join("ev01").join("a.pzd"), "bin").unwrap();
        fs::write(source.join("b.pzd.xml"), "new").unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("b.pzd.xml"), "old").unwrap();

        let summary = move_by_extension(&source, &dest, "pzd.xml").unwrap();

        assert_eq!(summary.moved, 1);
        assert_eq!(summary.skipped, 1);
        assert!(dest.join("cut").join("ev01").join("a.pzd.xml").is_file());
        assert!(!source.join("cut").join("ev01").join("a.pzd.xml").exists());
        assert!(source.join("cut").join("ev01").join("a.pzd").exists());
        assert_eq!(fs::read_to_string(dest.join("b.pzd.xml")).unwrap(), "old");
        assert!(source.join("b.pzd.xml").exists());
    }

    #[test]
    fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        assert!(move_by_extension(temp.path().join("nope"), temp.path(), "xml").is_err());
    }
}
