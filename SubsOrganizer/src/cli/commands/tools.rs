//! CLI commands for converter batches and file moves

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{GEAR, LOOKING_GLASS, TRUCK, print_done, print_report, print_step, simple_bar};
use crate::report::RunReport;
use crate::tools::{ConvertOptions, convert_batch, find_convertible, move_by_extension};

/// Convert every `*.{extension}` file under `source`
pub fn convert(
    source: &Path,
    converter: &Path,
    extension: &str,
    output_suffix: &str,
    args: &[String],
    chunk_size: usize,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();

    if !quiet {
        print_step(1, 2, LOOKING_GLASS, &format!("Scanning {}...", source.display()));
    }
    let mut report = RunReport::new();
    let files = find_convertible(source, extension, &mut report);
    if files.is_empty() {
        if !quiet {
            print_report(&report);
        }
        println!("No *.{} files found in {}", extension.trim_start_matches('.'), source.display());
        return Ok(());
    }

    if !quiet {
        print_step(2, 2, GEAR, &format!("Converting {} files...", files.len()));
    }
    let options = ConvertOptions::new(converter)
        .with_args(args.iter().cloned())
        .with_output_suffix(output_suffix)
        .with_chunk_size(chunk_size);

    let pb = (!quiet).then(|| simple_bar(files.len() as u64, "Converting"));
    let summary = convert_batch(&options, &files, |done, total| {
        if let Some(pb) = &pb {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        }
    })?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    report.extend(summary.report);

    if !quiet {
        print_report(&report);
        println!(
            "  {} converted, {} skipped, {} failed",
            summary.converted, summary.skipped, summary.failed
        );
        print_done(started.elapsed());
    }
    Ok(())
}

/// Move every `*.{extension}` file from `source` into `destination`
pub fn relocate(source: &Path, destination: &Path, extension: &str, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();

    if !quiet {
        print_step(1, 1, TRUCK, &format!("Moving *.{} files...", extension.trim_start_matches('.')));
    }
    let summary = move_by_extension(source, destination, extension)?;

    if !quiet {
        print_report(&summary.report);
        println!(
            "  {} moved, {} skipped, {} failed",
            summary.moved, summary.skipped, summary.failed
        );
        print_done(started.elapsed());
    }
    Ok(())
}
