//! Workbook write-back
//!
//! Reads retranslations from one column of the workbook and stores them as
//! the `Message` text of the matching entries in the target-locale tree.
//!
//! Rows are applied one at a time in sheet order, then row order. Each row
//! re-reads its file, so two rows editing the same file both land. Within a
//! file the first entry carrying the row's content id is the one updated;
//! later entries with the same id are never touched.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::error::{Error, Result};
use crate::formats::pzd::{self, EditOutcome, EntryEdit};
use crate::report::{ReportKind, RunReport};
use crate::workbook::{COL_FILENAME, COL_FOLDER, COL_ID, SUMMARY_SHEET, column_index};

/// Outcome of a write-back run
#[derive(Debug, Clone, Default)]
pub struct WritebackSummary {
    /// Entries whose text actually changed
    pub applied: usize,
    /// Entries that already held the retranslation
    pub unchanged: usize,
    /// Files opened and rewritten, with or without a text change
    pub files_touched: BTreeSet<PathBuf>,
    /// Every skip, miss and change of the run
    pub report: RunReport,
}

impl WritebackSummary {
    #[must_use]
    pub fn files_touched_count(&self) -> usize {
        self.files_touched.len()
    }
}

/// One non-empty retranslation cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookEdit {
    pub sheet: String,
    /// 1-based spreadsheet row
    pub row: u32,
    pub folder: String,
    pub filename: String,
    pub content_id: String,
    /// Cell value, trimmed and unescaped
    pub text: String,
}

/// Path of the structured file a workbook row refers to
#[must_use]
pub fn target_path(root: &Path, folder: &str, filename: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in folder.split(['/', '\\']).filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push(pzd::file_name_for(filename));
    path
}

/// Undo HTML escaping picked up on the way through the workbook
///
/// Each `&name;`, `&#n;` or `&#xh;` reference is decoded on its own, using the
/// HTML5 entity table. A `&` that does not start a known reference stays as
/// written, and the rest of the text is still decoded.
#[must_use]
pub fn unescape_cell(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let name_len = tail[1..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
            .unwrap_or(tail.len() - 1);
        let reference = &tail[..(name_len + 2).min(tail.len())];
        if name_len > 0
            && reference.ends_with(';')
            && let Ok(decoded) = quick_xml::escape::unescape(reference)
        {
            out.push_str(&decoded);
            rest = &tail[reference.len()..];
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn cell_text(range: &Range<Data>, row: u32, col: u16) -> String {
    range
        .get_value((row, u32::from(col)))
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Collect the non-empty cells of `column` from every folder sheet
///
/// # Errors
/// Returns [`Error::UnresolvableColumnAddress`] for a bad column reference and
/// [`Error::ArtifactUnreadable`] if the workbook or one of its sheets cannot
/// be read.
pub fn read_edits<P: AsRef<Path>>(workbook_path: P, column: &str) -> Result<Vec<WorkbookEdit>> {
    let workbook_path = workbook_path.as_ref();
    let column = column_index(column)?;
    let unreadable = |message: String| Error::ArtifactUnreadable {
        path: workbook_path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(workbook_path).map_err(|e| unreadable(e.to_string()))?;

    let mut edits = Vec::new();
    for sheet in workbook.sheet_names() {
        if sheet == SUMMARY_SHEET {
            continue;
        }
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| unreadable(format!("sheet {sheet}: {e}")))?;
        let Some((last_row, _)) = range.end() else {
            continue;
        };

        // Row 0 is the header
        for row in 1..=last_row {
            let value = cell_text(&range, row, column);
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            edits.push(WorkbookEdit {
                sheet: sheet.clone(),
                row: row + 1,
                folder: cell_text(&range, row, COL_FOLDER),
                filename: cell_text(&range, row, COL_FILENAME),
                content_id: cell_text(&range, row, COL_ID),
                text: unescape_cell(value).into_owned(),
            });
        }
    }

    tracing::debug!("Read {} retranslations from {}", edits.len(), workbook_path.display());
    Ok(edits)
}

/// Write the retranslations in `column` of the workbook back into `root`
///
/// # Errors
/// Fails only on artifact-level problems (see [`read_edits`]). Missing or
/// unparsable files are reported per row and the run continues.
pub fn apply_edits<P: AsRef<Path>, Q: AsRef<Path>>(
    workbook_path: P,
    column: &str,
    root: Q,
) -> Result<WritebackSummary> {
    let root = root.as_ref();
    let edits = read_edits(workbook_path, column)?;
    tracing::info!("Applying {} retranslations to {}", edits.len(), root.display());

    let mut summary = WritebackSummary::default();
    for edit in &edits {
        apply_one(root, edit, &mut summary);
    }

    tracing::info!(
        "Write-back complete: {} changes, {} files touched",
        summary.applied,
        summary.files_touched_count()
    );
    Ok(summary)
}

fn apply_one(root: &Path, edit: &WorkbookEdit, summary: &mut WritebackSummary) {
    let path = target_path(root, &edit.folder, &edit.filename);
    if !path.is_file() {
        let err = Error::MissingTargetFileOnWriteback { path: path.clone() };
        summary.report.push(
            ReportKind::MissingTargetFile,
            Some(&path),
            format!("{} (sheet {}, row {})", err, edit.sheet, edit.row),
        );
        return;
    }

    let entry_edit = EntryEdit::new(edit.content_id.as_str(), edit.text.as_str());
    match pzd::update_pzd_file(&path, &entry_edit) {
        Ok(outcome) => {
            summary.files_touched.insert(path.clone());
            match outcome {
                EditOutcome::Applied { previous } => {
                    summary.applied += 1;
                    summary.report.push(
                        ReportKind::Applied,
                        Some(&path),
                        format!("ID {}: {previous:?} -> {:?}", edit.content_id, edit.text),
                    );
                }
                EditOutcome::Unchanged => {
                    summary.unchanged += 1;
                    summary.report.push(
                        ReportKind::Unchanged,
                        Some(&path),
                        format!("ID {} already up to date", edit.content_id),
                    );
                }
                EditOutcome::NotFound => summary.report.push(
                    ReportKind::EntryNotFound,
                    Some(&path),
                    format!("no entry with ID {:?}", edit.content_id),
                ),
            }
        }
        Err(e) => summary
            .report
            .push(ReportKind::MalformedSourceFile, Some(&path), e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::pzd::read_pzd;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;
    use std::fs;
    use tempfile::TempDir;

    const FILE: &str = r#"<?xml version="1.0" encoding="utf-16"?>
<PzdFile>
  <TextContents>
    <TextContent ID="1" Unknown2="90010001" Unknown3="0">
      <Message>Hi</Message>
    </TextContent>
    <TextContent ID="2" Unknown2="" Unknown3="1">
      <Message>(cough)</Message>
    </TextContent>
  </TextContents>
</PzdFile>"#;

    fn workbook_with(path: &Path, rows: &[[&str; 4]]) {
        let mut workbook = Workbook::new();
        let summary = workbook.add_worksheet();
        summary.set_name(SUMMARY_SHEET).unwrap();
        summary.write_string(4, 8, "ignored").unwrap();

        let sheet = workbook.add_worksheet();
        sheet.set_name("cut").unwrap();
        sheet.write_string(0, 0, "Folder").unwrap();
        for (r, [folder, filename, id, text]) in (1u32..).zip(rows) {
            sheet.write_string(r, 0, *folder).unwrap();
            sheet.write_string(r, 1, *filename).unwrap();
            sheet.write_string(r, 2, *id).unwrap();
            if !text.is_empty() {
                sheet.write_string(r, 8, *text).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    fn corpus() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("cut").join("ev01")).unwrap();
        fs::write(temp.path().join("cut").join("ev01").join("a.pzd.xml"), FILE).unwrap();
        temp
    }

    #[test]
    fn test_target_path() {
        let root = Path::new("/data/en");
        assert_eq!(
            target_path(root, "cut/ev01", "a"),
            Path::new("/data/en/cut/ev01/a.pzd.xml")
        );
        assert_eq!(target_path(root, "", "top"), Path::new("/data/en/top.pzd.xml"));
    }

    #[test]
    fn test_unescape_cell() {
        assert_eq!(unescape_cell("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(unescape_cell("&lt;i&gt;"), "<i>");
        assert_eq!(unescape_cell("AT&T"), "AT&T");
        assert_eq!(unescape_cell("no entities"), "no entities");
    }

    #[test]
    fn test_unescape_cell_mixed_entities() {
        assert_eq!(unescape_cell("Wait&hellip; Tom &amp; Jerry"), "Wait\u{2026} Tom & Jerry");
        assert_eq!(unescape_cell("AT&T &amp; co"), "AT&T & co");
        assert_eq!(unescape_cell("&nbsp;Hi&#39;"), "\u{a0}Hi'");
        assert_eq!(unescape_cell("&#x41;&bogus; &"), "A&bogus; &");
        assert_eq!(unescape_cell("trailing &amp"), "trailing &amp");
    }

    #[test]
    fn test_read_edits_skips_blank_and_summary() {
        let temp = TempDir::new().unwrap();
        let xlsx = temp.path().join("subs.xlsx");
        workbook_with(
            &xlsx,
            &[
                ["cut/ev01", "a", "1", "  Hello  "],
                ["cut/ev01", "a", "2", "   "],
                ["cut/ev01", "a", "3", ""],
            ],
        );

        let edits = read_edits(&xlsx, "I2").unwrap();
        assert_eq!(
            edits,
            vec![WorkbookEdit {
                sheet: "cut".into(),
                row: 2,
                folder: "cut/ev01".into(),
                filename: "a".into(),
                content_id: "1".into(),
                text: "Hello".into(),
            }]
        );
    }

    #[test]
    fn test_apply_edits() {
        let root = corpus();
        let xlsx = root.path().join("subs.xlsx");
        workbook_with(
            &xlsx,
            &[
                ["cut/ev01", "a", "1", "Hello &amp; bye"],
                ["cut/ev01", "missing", "1", "Nope"],
                ["cut/ev01", "a", "9", "Ghost"],
            ],
        );

        let summary = apply_edits(&xlsx, "I", root.path()).unwrap();
        assert_eq!(summary.applied, 1);
        assert_eq!(summary.files_touched_count(), 1);
        assert_eq!(summary.report.count(ReportKind::MissingTargetFile), 1);
        assert_eq!(summary.report.count(ReportKind::EntryNotFound), 1);

        let entries = read_pzd(root.path().join("cut").join("ev01").join("a.pzd.xml")).unwrap();
        assert_eq!(entries[0].text, "Hello & bye");
        assert_eq!(entries[1].text, "(cough)");
    }

    #[test]
    fn test_bad_column_aborts() {
        let root = corpus();
        let xlsx = root.path().join("subs.xlsx");
        workbook_with(&xlsx, &[]);

        let err = apply_edits(&xlsx, "12", root.path()).unwrap_err();
        assert!(matches!(err, Error::UnresolvableColumnAddress(_)));
    }

    #[test]
    fn test_unreadable_workbook_aborts() {
        let root = corpus();
        let bogus = root.path().join("bogus.xlsx");
        fs::write(&bogus, b"not a zip").unwrap();

        let err = apply_edits(&bogus, "I", root.path()).unwrap_err();
        assert!(matches!(err, Error::ArtifactUnreadable { .. }));
    }
}
