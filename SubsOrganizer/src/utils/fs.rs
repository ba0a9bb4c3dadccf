//! File discovery and writing helpers

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::report::{ReportKind, RunReport};

/// Files under `root` accepted by `keep`, sorted by path
///
/// Entries that cannot be walked (permissions, broken links, link loops) are
/// recorded in `report` as [`ReportKind::UnreadablePath`] and their subtrees
/// are skipped.
pub fn walk_files<F>(root: &Path, follow_links: bool, report: &mut RunReport, mut keep: F) -> Vec<PathBuf>
where
    F: FnMut(&Path) -> bool,
{
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(follow_links) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && keep(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => {
                let path = err.path().map(Path::to_path_buf);
                report.push(
                    ReportKind::UnreadablePath,
                    path.as_deref(),
                    Error::from(err).to_string(),
                );
            }
        }
    }

    files.sort();
    files
}

/// Write `bytes` to `path` through a temporary file in the same directory
///
/// Readers never observe a half-written file: the temporary file is renamed
/// over the destination only after all bytes are flushed.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(Error::InvalidPath(format!(
            "parent directory does not exist: {}",
            dir.display()
        )));
    }

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_replaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.xml");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope").join("out.xml");
        assert!(matches!(write_atomic(&path, b"x"), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_walk_missing_root_reported() {
        let temp = TempDir::new().unwrap();
        let mut report = RunReport::new();
        let files = walk_files(&temp.path().join("gone"), true, &mut report, |_| true);

        assert!(files.is_empty());
        assert_eq!(report.count(ReportKind::UnreadablePath), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_link_loop_reported() {
        let temp = TempDir::new().unwrap();
        let sub = temp.path().join("sub");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join("a.pzd.xml"), "").unwrap();
        std::os::unix::fs::symlink(temp.path(), sub.join("loop")).unwrap();

        let mut report = RunReport::new();
        let files = walk_files(temp.path(), true, &mut report, |_| true);

        assert_eq!(files, vec![sub.join("a.pzd.xml")]);
        assert_eq!(report.count(ReportKind::UnreadablePath), 1);
        assert!(report.events()[0].path.as_deref().is_some_and(|p| p.ends_with("loop")));
    }
}
