//! # SubsOrganizer
//!
//! Tools for retranslating Final Fantasy XVI subtitles.
//!
//! The game's `.pzd` subtitle files, once converted to XML, are gathered
//! from a target-locale tree and a reference-locale tree, paired entry by
//! entry, and laid out in an XLSX workbook for translators. Finished
//! retranslations are then written back into the target-locale XML.
//!
//! ## Quick Start
//!
//! ### Exporting a workbook
//!
//! ```no_run
//! use subsorganizer::prelude::*;
//!
//! let lookup = LookupTables::default();
//! let mut report = RunReport::new();
//! let rows = collect_rows("0001.en/nxd/text", "0001.ja/nxd/text", &lookup, &mut report);
//! let summary = export_workbook(&rows, &lookup, "ff16_subtitles.xlsx")?;
//! println!("{} rows on {} sheets", summary.rows, summary.sheets);
//! # Ok::<(), subsorganizer::Error>(())
//! ```
//!
//! ### Writing retranslations back
//!
//! ```no_run
//! use subsorganizer::writeback::apply_edits;
//!
//! let summary = apply_edits("ff16_subtitles.xlsx", "I2", "0001.en/nxd/text")?;
//! println!("{} changes in {} files", summary.applied, summary.files_touched_count());
//! # Ok::<(), subsorganizer::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `subsorganizer` command-line binary

pub mod aggregate;
pub mod corpus;
pub mod error;
pub mod formats;
pub mod html;
pub mod lookup;
pub mod report;
pub mod tools;
pub mod utils;
pub mod workbook;
pub mod writeback;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::report::{ReportEvent, ReportKind, RunReport};

    pub use crate::aggregate::{AggregatedRow, collect_rows, pair_entries};
    pub use crate::corpus::{find_message_files, read_corpus, read_message_file};
    pub use crate::formats::pzd::{
        EditOutcome, EntryEdit, MessageEntry, MessageFile, parse_pzd, read_pzd, update_pzd_file,
    };
    pub use crate::lookup::LookupTables;

    pub use crate::html::export_html;
    pub use crate::workbook::{ExportSummary, export_workbook};
    pub use crate::writeback::{WritebackSummary, apply_edits};

    pub use crate::tools::{ConvertOptions, convert_batch, find_convertible, move_by_extension};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
