//! Retranslation workbook
//!
//! The XLSX artifact handed to translators: a `Summary` sheet of live
//! progress formulas followed by one sheet per top-level folder, each holding
//! a nine-column table of aggregated rows.

mod address;
mod export;
mod layout;
mod sheet_name;
mod summary;

pub use address::{column_index, column_letter};
pub use export::{ExportSummary, build_workbook, export_workbook};
pub use layout::{Partition, SheetRange, band_flags, partition_rows};
pub use sheet_name::{SheetNamer, sanitize_sheet_name};

/// Column headers of every folder sheet
pub const HEADER: [&str; 9] = [
    "Folder",
    "Filename",
    "ID",
    "Sub Type",
    "Character",
    "Character ID",
    "Original Text",
    "Japanese",
    "Retranslation",
];

/// Widths of the nine columns, in characters
pub const COLUMN_WIDTHS: [f64; 9] = [14.0, 22.0, 10.0, 10.0, 14.0, 12.0, 60.0, 60.0, 60.0];

/// Name of the progress sheet
pub const SUMMARY_SHEET: &str = "Summary";

/// Sheet name used for files directly under the locale root
pub const ROOT_SHEET: &str = "(root)";

/// Excel's sheet name length limit
pub const MAX_SHEET_NAME_LEN: usize = 31;

pub const COL_FOLDER: u16 = 0;
pub const COL_FILENAME: u16 = 1;
pub const COL_ID: u16 = 2;
pub const COL_SUBTYPE: u16 = 3;
pub const COL_CHARACTER: u16 = 4;
pub const COL_CHARACTER_ID: u16 = 5;
pub const COL_TEXT: u16 = 6;
pub const COL_REFERENCE: u16 = 7;
pub const COL_RETRANSLATION: u16 = 8;
