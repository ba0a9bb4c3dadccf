//! CLI command for workbook write-back

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{LOOKING_GLASS, PENCIL, print_done, print_report, print_step};
use crate::writeback::apply_edits;

pub fn execute(file: &Path, column: &str, language: &Path, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    if !language.is_dir() {
        anyhow::bail!("Locale folder not found: {}", language.display());
    }

    if !quiet {
        print_step(1, 2, LOOKING_GLASS, &format!("Reading {}...", file.display()));
        print_step(2, 2, PENCIL, &format!("Updating {}...", language.display()));
    }
    let summary = apply_edits(file, column, language)?;

    if !quiet {
        print_report(&summary.report);
        println!(
            "  {} changes, {} unchanged, {} files touched",
            summary.applied,
            summary.unchanged,
            summary.files_touched_count()
        );
        print_done(started.elapsed());
    }
    Ok(())
}
