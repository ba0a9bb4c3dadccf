//! CLI commands for workbook and HTML export

use std::path::Path;
use std::time::Instant;

use crate::aggregate::{AggregatedRow, collect_rows};
use crate::cli::progress::{DISK, LINK, LOOKING_GLASS, print_done, print_report, print_step, simple_spinner};
use crate::html::export_html;
use crate::lookup::LookupTables;
use crate::report::RunReport;
use crate::workbook::export_workbook;

/// Built-in tables unless a configuration file is given
pub(super) fn load_lookup(config: Option<&Path>) -> anyhow::Result<LookupTables> {
    match config {
        Some(path) => Ok(LookupTables::load(path)?),
        None => Ok(LookupTables::default()),
    }
}

fn gather(
    language: &Path,
    japanese: &Path,
    lookup: &LookupTables,
    quiet: bool,
) -> anyhow::Result<(Vec<AggregatedRow>, RunReport)> {
    if !language.is_dir() {
        anyhow::bail!("Locale folder not found: {}", language.display());
    }
    if !japanese.is_dir() {
        anyhow::bail!("Reference folder not found: {}", japanese.display());
    }

    if !quiet {
        print_step(1, 3, LOOKING_GLASS, &format!("Scanning {}...", language.display()));
        print_step(2, 3, LINK, &format!("Pairing with {}...", japanese.display()));
    }
    let spinner = (!quiet).then(|| simple_spinner("Pairing entries..."));

    let mut report = RunReport::new();
    let rows = collect_rows(language, japanese, lookup, &mut report);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    Ok((rows, report))
}

/// Export paired rows to an XLSX workbook
pub fn to_xlsx(
    language: &Path,
    japanese: &Path,
    output: &Path,
    config: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let lookup = load_lookup(config)?;
    let (rows, report) = gather(language, japanese, &lookup, quiet)?;

    if !quiet {
        print_step(3, 3, DISK, &format!("Writing {}...", output.display()));
    }
    let summary = export_workbook(&rows, &lookup, output)?;

    if !quiet {
        print_report(&report);
        println!(
            "  {} rows on {} sheets -> {}",
            summary.rows,
            summary.sheets,
            summary.path.display()
        );
        print_done(started.elapsed());
    }
    Ok(())
}

/// Export paired rows to an HTML page
pub fn to_html(
    language: &Path,
    japanese: &Path,
    output: &Path,
    config: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let lookup = load_lookup(config)?;
    let (rows, report) = gather(language, japanese, &lookup, quiet)?;

    if !quiet {
        print_step(3, 3, DISK, &format!("Writing {}...", output.display()));
    }
    export_html(&rows, output)?;

    if !quiet {
        print_report(&report);
        println!("  {} rows -> {}", rows.len(), output.display());
        print_done(started.elapsed());
    }
    Ok(())
}
