//! Progress formulas for the summary sheet
//!
//! Every figure is a live formula over the folder sheets, so the summary
//! tracks edits made in the workbook without re-exporting.

use super::layout::SheetRange;
use super::{COL_ID, COL_RETRANSLATION, COL_SUBTYPE};

fn quote_text(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn sum_of<F>(ranges: &[SheetRange], term: F) -> String
where
    F: Fn(&SheetRange) -> String,
{
    if ranges.is_empty() {
        return "=0".to_string();
    }
    let terms: Vec<String> = ranges.iter().map(term).collect();
    format!("={}", terms.join("+"))
}

/// Rows whose subtype is `label`
#[must_use]
pub fn category_total(ranges: &[SheetRange], label: &str) -> String {
    let label = quote_text(label);
    sum_of(ranges, |r| format!("COUNTIF({},{label})", r.column(COL_SUBTYPE)))
}

/// Rows whose subtype is `label` and whose retranslation is blank
#[must_use]
pub fn category_missing(ranges: &[SheetRange], label: &str) -> String {
    let label = quote_text(label);
    sum_of(ranges, |r| {
        format!(
            "COUNTIFS({},{label},{},\"\")",
            r.column(COL_SUBTYPE),
            r.column(COL_RETRANSLATION)
        )
    })
}

/// All data rows
#[must_use]
pub fn overall_total(ranges: &[SheetRange]) -> String {
    sum_of(ranges, |r| format!("ROWS({})", r.column(COL_ID)))
}

/// All data rows with a blank retranslation
#[must_use]
pub fn overall_missing(ranges: &[SheetRange]) -> String {
    sum_of(ranges, |r| format!("COUNTBLANK({})", r.column(COL_RETRANSLATION)))
}

/// Share of rows translated, from the total and missing cells of `row` (1-based)
#[must_use]
pub fn completion(row: u32) -> String {
    format!("=IF(B{row}=0,0,(B{row}-C{row})/B{row})")
}
