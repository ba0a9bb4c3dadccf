//! Batch invocation of the external converter

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::has_extension;
use crate::error::{Error, Result};
use crate::report::{ReportKind, RunReport};
use crate::utils::fs::walk_files;

/// Files per converter invocation unless configured otherwise
pub const DEFAULT_CHUNK_SIZE: usize = 200;

/// How to call the converter
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Converter executable
    pub converter: PathBuf,
    /// Arguments placed before the file list on every call
    pub args: Vec<String>,
    /// Appended to an input path to get the path the converter writes
    pub output_suffix: String,
    /// Maximum files per call
    pub chunk_size: usize,
}

impl ConvertOptions {
    #[must_use]
    pub fn new(converter: impl Into<PathBuf>) -> Self {
        Self {
            converter: converter.into(),
            args: Vec::new(),
            output_suffix: ".xml".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Result of a batch conversion
#[derive(Debug, Clone, Default)]
pub struct ConvertSummary {
    /// Files handed to successful converter calls
    pub converted: usize,
    /// Files whose output already existed
    pub skipped: usize,
    /// Files handed to failed converter calls
    pub failed: usize,
    pub report: RunReport,
}

/// Path the converter is expected to write for `input`
#[must_use]
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Find all files under `root` ending in `.{extension}`, sorted by path
///
/// Unreadable directories are recorded in `report` and skipped.
#[must_use]
pub fn find_convertible<P: AsRef<Path>>(root: P, extension: &str, report: &mut RunReport) -> Vec<PathBuf> {
    walk_files(root.as_ref(), true, report, |path| has_extension(path, extension))
}

/// Run the converter over `files`
///
/// Files whose output already exists are skipped. The rest are passed in
/// chunks of at most `chunk_size`; `progress` is called with the number of
/// files handled so far and the number pending after each chunk.
///
/// # Errors
/// Returns [`Error::ExternalConverterMissing`] if the converter cannot be
/// started; nothing after that point is attempted. A converter that runs but
/// fails is only reported.
pub fn convert_batch<F>(options: &ConvertOptions, files: &[PathBuf], mut progress: F) -> Result<ConvertSummary>
where
    F: FnMut(usize, usize),
{
    let mut summary = ConvertSummary::default();

    let mut pending = Vec::with_capacity(files.len());
    for file in files {
        let output = output_path(file, &options.output_suffix);
        if output.exists() {
            summary.skipped += 1;
            summary.report.push(
                ReportKind::SkippedExisting,
                Some(file),
                format!("output exists: {}", output.display()),
            );
        } else {
            pending.push(file);
        }
    }

    tracing::info!(
        "Converting {} files with {} ({} already converted)",
        pending.len(),
        options.converter.display(),
        summary.skipped
    );

    let total = pending.len();
    let mut done = 0;
    for chunk in pending.chunks(options.chunk_size.max(1)) {
        let status = Command::new(&options.converter)
            .args(&options.args)
            .args(chunk)
            .status();

        match status {
            Ok(status) if status.success() => summary.converted += chunk.len(),
            Ok(status) => {
                let err = Error::ExternalConverterFailure {
                    status: status.to_string(),
                    files: chunk.len(),
                };
                summary.failed += chunk.len();
                summary.report.push(
                    ReportKind::ConverterFailure,
                    chunk.first().copied().map(PathBuf::as_path),
                    err.to_string(),
                );
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ExternalConverterMissing {
                    path: options.converter.clone(),
                });
            }
            Err(e) => return Err(Error::Io(e)),
        }

        done += chunk.len();
        progress(done, total);
    }

    tracing::info!(
        "Conversion complete: {} converted, {} failed",
        summary.converted,
        summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn inputs(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, b"pzd").unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("a/b.pzd"), ".xml"),
            Path::new("a/b.pzd.xml")
        );
    }

    #[test]
    fn test_find_convertible_sorted() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("sub")).unwrap();
        inputs(temp.path(), &["z.pzd", "a.pzd", "a.pzd.xml"]);
        inputs(&temp.path().join("sub"), &["m.PZD"]);

        let mut report = RunReport::new();
        let found = find_convertible(temp.path(), "pzd", &mut report);
        assert!(report.is_empty());
        assert_eq!(found.len(), 3);
        assert!(found[0].ends_with("a.pzd"));
        assert!(found[1].ends_with("sub/m.PZD"));
        assert!(found[2].ends_with("z.pzd"));
    }

    #[test]
    fn test_find_convertible_missing_root_reported() {
        let temp = TempDir::new().unwrap();
        let mut report = RunReport::new();
        let found = find_convertible(temp.path().join("gone"), "pzd", &mut report);

        assert!(found.is_empty());
        assert_eq!(report.count(ReportKind::UnreadablePath), 1);
    }

    #[test]
    fn test_missing_converter_aborts() {
        let temp = TempDir::new().unwrap();
        let files = inputs(temp.path(), &["a.pzd"]);
        let options = ConvertOptions::new(temp.path().join("no-such-converter"));

        let err = convert_batch(&options, &files, |_, _| {}).unwrap_err();
        assert!(matches!(err, Error::ExternalConverterMissing { .. }));
    }

    #[test]
    fn test_existing_output_skipped() {
        let temp = TempDir::new().unwrap();
        let files = inputs(temp.path(), &["a.pzd"]);
        fs::write(temp.path().join("a.pzd.xml"), b"done").unwrap();

        // Never started, so a missing binary is not an error here
        let options = ConvertOptions::new(temp.path().join("no-such-converter"));
        let summary = convert_batch(&options, &files, |_, _| {}).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.converted, 0);
        assert_eq!(summary.report.count(ReportKind::SkippedExisting), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_chunks_and_failures() {
        let temp = TempDir::new().unwrap();
        let files = inputs(temp.path(), &["a.pzd", "b.pzd", "c.pzd"]);

        let mut calls = Vec::new();
        let ok = ConvertOptions::new("true").with_chunk_size(2);
        let summary = convert_batch(&ok, &files, |done, total| calls.push((done, total))).unwrap();
        assert_eq!(summary.converted, 3);
        assert_eq!(calls, vec![(2, 3), (3, 3)]);

        let failing = ConvertOptions::new("false").with_chunk_size(2);
        let summary = convert_batch(&failing, &files, |_, _| {}).unwrap();
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.report.count(ReportKind::ConverterFailure), 2);
    }
}
