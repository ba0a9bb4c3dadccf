//! Locale corpus reading
//!
//! A locale tree is a directory of `*.pzd.xml` files for one language. Files
//! are discovered recursively and returned sorted by path so that runs are
//! reproducible regardless of directory enumeration order.

use std::path::{Path, PathBuf};

use crate::formats::pzd::{self, MessageFile, XML_EXTENSION};
use crate::report::{ReportKind, RunReport};
use crate::utils::fs::walk_files;
use crate::utils::path::relative_folder;

/// Find all structured message files under `root`, sorted by path
///
/// Unreadable directories are reported and skipped.
#[must_use]
pub fn find_message_files<P: AsRef<Path>>(root: P, report: &mut RunReport) -> Vec<PathBuf> {
    walk_files(root.as_ref(), true, report, |path| {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(XML_EXTENSION))
    })
}

/// Read one message file, naming it relative to `root`
///
/// Parse failures are recorded in `report` and yield a file with no entries.
#[must_use]
pub fn read_message_file(root: &Path, path: &Path, report: &mut RunReport) -> MessageFile {
    let folder = relative_folder(path, root).unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| pzd::display_name(&n.to_string_lossy()).to_string())
        .unwrap_or_default();

    let entries = match pzd::read_pzd(path) {
        Ok(entries) => entries,
        Err(e) => {
            report.push(ReportKind::MalformedSourceFile, Some(path), e.to_string());
            Vec::new()
        }
    };

    MessageFile {
        folder,
        name,
        path: path.to_path_buf(),
        entries,
    }
}

/// Read every message file under `root`, in path order
#[must_use]
pub fn read_corpus<P: AsRef<Path>>(root: P, report: &mut RunReport) -> Vec<MessageFile> {
    let root = root.as_ref();
    let files = find_message_files(root, report);
    tracing::info!("Reading {} message files from {}", files.len(), root.display());

    files
        .iter()
        .map(|path| read_message_file(root, path, report))
        .collect()
}
