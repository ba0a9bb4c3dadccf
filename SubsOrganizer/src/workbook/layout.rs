//! Row placement: which sheet a row lands on, and how it is shaded

use indexmap::IndexMap;

use super::address::column_letter;
use super::sheet_name::SheetNamer;
use crate::aggregate::AggregatedRow;

/// Rows destined for one folder sheet
#[derive(Debug)]
pub struct Partition<'a> {
    /// Sanitized, unique sheet name
    pub sheet: String,
    /// Top-level folder the rows came from (empty for the root)
    pub folder: String,
    pub rows: Vec<&'a AggregatedRow>,
}

impl Partition<'_> {
    /// Cell range covering this partition's data rows
    #[must_use]
    pub fn range(&self) -> Option<SheetRange> {
        let count = u32::try_from(self.rows.len()).ok()?;
        (count > 0).then(|| SheetRange {
            sheet: self.sheet.clone(),
            first_row: 2,
            last_row: count + 1,
        })
    }
}

/// Data rows of one sheet, as 1-based spreadsheet row numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    pub first_row: u32,
    pub last_row: u32,
}

impl SheetRange {
    /// Absolute reference to one column of the range, e.g. `'ev'!$D$2:$D$9`
    #[must_use]
    pub fn column(&self, column: u16) -> String {
        let letter = column_letter(column);
        format!(
            "{}!${letter}${}:${letter}${}",
            quote_sheet(&self.sheet),
            self.first_row,
            self.last_row
        )
    }
}

/// Quote a sheet name for use in a formula
#[must_use]
pub fn quote_sheet(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Split rows into sheets by top-level folder, in order of first appearance
#[must_use]
pub fn partition_rows(rows: &[AggregatedRow]) -> Vec<Partition<'_>> {
    let mut groups: IndexMap<&str, Vec<&AggregatedRow>> = IndexMap::new();
    for row in rows {
        groups.entry(row.top_level_folder()).or_default().push(row);
    }

    let mut namer = SheetNamer::new();
    groups
        .into_iter()
        .map(|(folder, rows)| Partition {
            sheet: namer.name_for(folder),
            folder: folder.to_string(),
            rows,
        })
        .collect()
}

/// Shade flags for consecutive rows keyed by file name
///
/// Rows alternate shading per run of identical keys; the first run is
/// unshaded.
#[must_use]
pub fn band_flags<S: AsRef<str>>(keys: &[S]) -> Vec<bool> {
    let mut flags = Vec::with_capacity(keys.len());
    let mut shaded = true;
    let mut previous: Option<&str> = None;

    for key in keys {
        let key = key.as_ref();
        if previous != Some(key) {
            shaded = !shaded;
            previous = Some(key);
        }
        flags.push(shaded);
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(folder: &str, filename: &str) -> AggregatedRow {
        AggregatedRow {
            folder: folder.into(),
            filename: filename.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_band_runs() {
        let keys = ["a", "a", "a", "b", "b", "c", "c", "c", "c"];
        let flags = band_flags(&keys);
        assert_eq!(
            flags,
            vec![false, false, false, true, true, false, false, false, false]
        );
    }

    #[test]
    fn test_band_reappearing_key_is_new_run() {
        assert_eq!(band_flags(&["a", "b", "a"]), vec![false, true, false]);
        assert!(band_flags::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_partition_by_top_level_folder() {
        let rows = vec![
            row("cut/ev01", "a"),
            row("", "r"),
            row("cut/ev02", "b"),
            row("sys", "m"),
        ];
        let parts = partition_rows(&rows);

        let names: Vec<&str> = parts.iter().map(|p| p.sheet.as_str()).collect();
        assert_eq!(names, vec!["cut", "(root)", "sys"]);
        assert_eq!(parts[0].rows.len(), 2);
        assert_eq!(parts[1].folder, "");
    }

    #[test]
    fn test_range_references() {
        let rows = vec![row("it's", "a"), row("it's", "a"), row("it's", "b")];
        let parts = partition_rows(&rows);
        let range = parts[0].range().unwrap();

        assert_eq!(range.first_row, 2);
        assert_eq!(range.last_row, 4);
        assert_eq!(range.column(3), "'it''s'!$D$2:$D$4");
    }
}
