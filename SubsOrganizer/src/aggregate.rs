//! Cross-locale entry aggregation
//!
//! Walks the target-locale tree, finds each file's counterpart in the
//! reference-locale tree by relative path, and pairs entries **by index**.
//!
//! Positional pairing is deliberate: a reference file with fewer entries
//! yields empty reference text for the tail, and extra reference entries are
//! ignored. Files whose entry lists diverge anywhere but the tail will be
//! misaligned; ids are not used to re-sync them.

use std::path::Path;

use crate::corpus::{find_message_files, read_message_file};
use crate::error::Error;
use crate::formats::pzd::{self, MessageFile};
use crate::lookup::LookupTables;
use crate::report::{ReportKind, RunReport};

/// One workbook row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedRow {
    /// Folder relative to the locale root (`/`-separated, empty at the root)
    pub folder: String,
    /// File name without `.pzd.xml`
    pub filename: String,
    pub content_id: String,
    /// Resolved subtype label, empty when unknown
    pub subtype: String,
    /// Resolved character name, empty when unknown
    pub character: String,
    pub character_id: String,
    /// Target-locale text
    pub text: String,
    /// Reference-locale text at the same index, empty past its end
    pub reference: String,
    /// Always empty on export; filled in by hand in the workbook
    pub retranslation: String,
}

impl AggregatedRow {
    /// First segment of the folder, used to pick the sheet
    #[must_use]
    pub fn top_level_folder(&self) -> &str {
        pzd::top_level_folder(&self.folder)
    }
}

/// Pair one target file with its reference counterpart
#[must_use]
pub fn pair_entries(
    target: &MessageFile,
    reference: &MessageFile,
    lookup: &LookupTables,
) -> Vec<AggregatedRow> {
    target
        .entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| AggregatedRow {
            folder: target.folder.clone(),
            filename: target.name.clone(),
            content_id: entry.id.clone(),
            subtype: lookup.subtype_label(&entry.subtype).to_string(),
            character: lookup.character_name(&entry.character_id).to_string(),
            character_id: entry.character_id.clone(),
            text: entry.text.clone(),
            reference: reference
                .entries
                .get(idx)
                .map(|r| r.text.clone())
                .unwrap_or_default(),
            retranslation: String::new(),
        })
        .collect()
}

/// Aggregate every file of `target_root` against `reference_root`
///
/// Target files without a reference counterpart are skipped whole and
/// reported as [`ReportKind::MissingReferenceFile`].
#[must_use]
pub fn collect_rows<P: AsRef<Path>>(
    target_root: P,
    reference_root: P,
    lookup: &LookupTables,
    report: &mut RunReport,
) -> Vec<AggregatedRow> {
    let target_root = target_root.as_ref();
    let reference_root = reference_root.as_ref();

    let files = find_message_files(target_root, report);
    tracing::info!(
        "Aggregating {} files: {} against {}",
        files.len(),
        target_root.display(),
        reference_root.display()
    );

    let mut rows = Vec::new();
    for target_path in &files {
        let Ok(relative) = target_path.strip_prefix(target_root) else {
            continue;
        };
        let reference_path = reference_root.join(relative);
        if !reference_path.is_file() {
            let err = Error::MissingReferenceFile {
                path: reference_path.clone(),
            };
            report.push(
                ReportKind::MissingReferenceFile,
                Some(target_path),
                format!("{err}, file skipped"),
            );
            continue;
        }

        let target = read_message_file(target_root, target_path, report);
        let reference = read_message_file(reference_root, &reference_path, report);

        if reference.entries.len() < target.entries.len() {
            tracing::debug!(
                "{}: reference has {} of {} entries",
                relative.display(),
                reference.entries.len(),
                target.entries.len()
            );
        }

        rows.extend(pair_entries(&target, &reference, lookup));
    }

    tracing::info!("Collected {} rows", rows.len());
    rows
}
