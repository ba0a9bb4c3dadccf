//! XLSX export

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use super::layout::{Partition, SheetRange, band_flags, partition_rows};
use super::{
    COL_CHARACTER, COL_CHARACTER_ID, COL_FILENAME, COL_FOLDER, COL_ID, COL_REFERENCE,
    COL_RETRANSLATION, COL_SUBTYPE, COL_TEXT, COLUMN_WIDTHS, HEADER, SUMMARY_SHEET, summary,
};
use crate::aggregate::AggregatedRow;
use crate::error::Result;
use crate::lookup::LookupTables;
use crate::utils::write_atomic;

const BAND_COLOR: u32 = 0x00DD_EBF7;
const HEADER_COLOR: u32 = 0x00BD_D7EE;

/// Result of a workbook export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Folder sheets written (the summary sheet is not counted)
    pub sheets: usize,
    pub rows: usize,
    pub path: PathBuf,
}

struct Formats {
    header: Format,
    plain: Format,
    banded: Format,
    title: Format,
    percent: Format,
    bold: Format,
}

impl Formats {
    fn new() -> Self {
        let cell = Format::new().set_text_wrap().set_align(FormatAlign::Top);
        Self {
            header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(HEADER_COLOR))
                .set_border_bottom(FormatBorder::Thin),
            banded: cell.clone().set_background_color(Color::RGB(BAND_COLOR)),
            plain: cell,
            title: Format::new().set_bold().set_font_size(14),
            percent: Format::new().set_num_format("0.0%"),
            bold: Format::new().set_bold(),
        }
    }
}

/// Export aggregated rows to an XLSX file
///
/// The file is written atomically; an existing workbook at `output` is only
/// replaced once the new one is complete.
///
/// # Errors
/// Returns an error if the workbook cannot be assembled or written.
pub fn export_workbook<P: AsRef<Path>>(
    rows: &[AggregatedRow],
    lookup: &LookupTables,
    output: P,
) -> Result<ExportSummary> {
    let output = output.as_ref();
    let (mut workbook, sheets) = build_workbook(rows, lookup)?;

    let buffer = workbook.save_to_buffer()?;
    write_atomic(output, &buffer)?;

    tracing::info!(
        "Exported {} rows across {} sheets to {}",
        rows.len(),
        sheets,
        output.display()
    );

    Ok(ExportSummary {
        sheets,
        rows: rows.len(),
        path: output.to_path_buf(),
    })
}

/// Assemble the workbook in memory
///
/// Returns the workbook and the number of folder sheets it holds.
///
/// # Errors
/// Returns an error if a sheet name or cell is rejected by the writer.
pub fn build_workbook(rows: &[AggregatedRow], lookup: &LookupTables) -> Result<(Workbook, usize)> {
    let formats = Formats::new();
    let partitions = partition_rows(rows);

    let mut sheets = Vec::with_capacity(partitions.len());
    let mut ranges = Vec::with_capacity(partitions.len());
    for partition in &partitions {
        sheets.push(folder_sheet(partition, &formats)?);
        if let Some(range) = partition.range() {
            ranges.push(range);
        }
    }

    let mut workbook = Workbook::new();
    workbook.push_worksheet(summary_sheet(&ranges, lookup, &formats)?);
    for sheet in sheets {
        workbook.push_worksheet(sheet);
    }

    Ok((workbook, partitions.len()))
}

fn folder_sheet(partition: &Partition<'_>, formats: &Formats) -> Result<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name(&partition.sheet)?;

    for (col, title) in (0u16..).zip(HEADER) {
        sheet.write_string_with_format(0, col, title, &formats.header)?;
    }
    for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
        sheet.set_column_width(col, width)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    let keys: Vec<&str> = partition.rows.iter().map(|r| r.filename.as_str()).collect();
    let bands = band_flags(&keys);

    for ((row_num, row), shaded) in (1u32..).zip(&partition.rows).zip(bands) {
        let format = if shaded { &formats.banded } else { &formats.plain };
        let cells = [
            (COL_FOLDER, row.folder.as_str()),
            (COL_FILENAME, row.filename.as_str()),
            (COL_ID, row.content_id.as_str()),
            (COL_SUBTYPE, row.subtype.as_str()),
            (COL_CHARACTER, row.character.as_str()),
            (COL_CHARACTER_ID, row.character_id.as_str()),
            (COL_TEXT, row.text.as_str()),
            (COL_REFERENCE, row.reference.as_str()),
            (COL_RETRANSLATION, row.retranslation.as_str()),
        ];
        for (col, value) in cells {
            write_cell(&mut sheet, row_num, col, value, format)?;
        }
    }

    if let Some(range) = partition.range() {
        sheet.autofilter(0, 0, range.last_row - 1, COL_RETRANSLATION)?;
    }

    tracing::debug!("Sheet {}: {} rows", partition.sheet, partition.rows.len());
    Ok(sheet)
}

/// Empty values become styled blanks so blank-counting formulas see them
fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &str, format: &Format) -> Result<()> {
    if value.is_empty() {
        sheet.write_blank(row, col, format)?;
    } else {
        sheet.write_string_with_format(row, col, value, format)?;
    }
    Ok(())
}

fn summary_sheet(ranges: &[SheetRange], lookup: &LookupTables, formats: &Formats) -> Result<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name(SUMMARY_SHEET)?;
    sheet.set_column_width(0, 24.0)?;
    sheet.set_column_width(1, 12.0)?;
    sheet.set_column_width(2, 12.0)?;
    sheet.set_column_width(3, 14.0)?;

    sheet.write_string_with_format(0, 0, "FFXVI Subtitle Retranslation Progress", &formats.title)?;
    sheet.write_string(
        1,
        0,
        format!("Generated by subsorganizer {}", crate::VERSION),
    )?;

    for (col, title) in (0u16..).zip(["Category", "Total", "Missing", "Completion"]) {
        sheet.write_string_with_format(3, col, title, &formats.header)?;
    }

    let mut row = 4u32;
    for label in lookup.subtype_labels() {
        sheet.write_string(row, 0, label)?;
        sheet.write_formula(row, 1, summary::category_total(ranges, label).as_str())?;
        sheet.write_formula(row, 2, summary::category_missing(ranges, label).as_str())?;
        sheet.write_formula_with_format(row, 3, summary::completion(row + 1).as_str(), &formats.percent)?;
        row += 1;
    }

    sheet.write_string_with_format(row, 0, "Total", &formats.bold)?;
    sheet.write_formula_with_format(row, 1, summary::overall_total(ranges).as_str(), &formats.bold)?;
    sheet.write_formula_with_format(row, 2, summary::overall_missing(ranges).as_str(), &formats.bold)?;
    sheet.write_formula_with_format(row, 3, summary::completion(row + 1).as_str(), &formats.percent)?;

    // Sheet ranges the formulas above were built from
    row += 2;
    sheet.write_string(row, 0, "Sheet")?;
    sheet.write_string(row, 1, "First row")?;
    sheet.write_string(row, 2, "Last row")?;
    sheet.write_string(row, 3, "Range")?;
    sheet.set_row_hidden(row)?;
    for range in ranges {
        row += 1;
        sheet.write_string(row, 0, &range.sheet)?;
        sheet.write_number(row, 1, range.first_row)?;
        sheet.write_number(row, 2, range.last_row)?;
        sheet.write_string(row, 3, range.column(COL_ID))?;
        sheet.set_row_hidden(row)?;
    }

    Ok(sheet)
}
