//! CLI progress display utilities
//!
//! Step indicators, spinners and bars for the longer-running commands, plus
//! a printer for run reports.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::report::{ReportKind, RunReport};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Link - for pairing locales
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Pencil - for editing files in place
pub static PENCIL: Emoji<'_, '_> = Emoji("✏️  ", "");
/// Gear - for processing/conversion operations
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
/// Truck - for moving files
pub static TRUCK: Emoji<'_, '_> = Emoji("🚚 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

// =============================================================================
// Step-Based Progress
// =============================================================================

/// Print a step indicator: `[1/3] 🔍 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

// =============================================================================
// Progress Styles
// =============================================================================

/// Progress bar style for determinate progress
///
/// Format: `Converting [████████░░░░░░░░] 50/100`
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Create a spinner for work of unknown length
#[must_use]
pub fn simple_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar over `total` items
#[must_use]
pub fn simple_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style());
    pb.set_message(msg.to_string());
    pb
}

// =============================================================================
// Reports
// =============================================================================

/// Print a one-line tally of the problems in `report`
///
/// Individual events are already logged as they are recorded.
pub fn print_report(report: &RunReport) {
    let kinds = [
        ReportKind::MissingReferenceFile,
        ReportKind::MalformedSourceFile,
        ReportKind::UnreadablePath,
        ReportKind::MissingTargetFile,
        ReportKind::EntryNotFound,
        ReportKind::SkippedExisting,
        ReportKind::ConverterFailure,
        ReportKind::MoveFailed,
    ];
    let tally: Vec<String> = kinds
        .iter()
        .filter_map(|&kind| {
            let n = report.count(kind);
            (n > 0).then(|| format!("{n} {kind}"))
        })
        .collect();
    if tally.is_empty() {
        return;
    }
    let line = tally.join(", ");
    if report.has_problems() {
        println!("  {}", style(line).yellow());
    } else {
        println!("  {}", style(line).dim());
    }
}
