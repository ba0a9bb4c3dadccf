//! Subcommands

mod edit;
mod execute;
mod export;
mod tools;

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Export paired subtitles to an XLSX workbook
    ToXlsx {
        /// Locale folder to translate (e.g. 0001.en/nxd/text)
        #[arg(short, long)]
        language: PathBuf,

        /// Japanese (reference) locale folder
        #[arg(short, long)]
        japanese: PathBuf,

        /// Output workbook
        #[arg(short, long, default_value = "ff16_subtitles.xlsx")]
        output: PathBuf,

        /// JSON file with `characters` and `subtypes` tables
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Export paired subtitles to a single HTML page
    ToHtml {
        /// Locale folder to translate
        #[arg(short, long)]
        language: PathBuf,

        /// Japanese (reference) locale folder
        #[arg(short, long)]
        japanese: PathBuf,

        /// Output HTML file
        #[arg(short, long, default_value = "ff16_subtitles.html")]
        output: PathBuf,

        /// JSON file with `characters` and `subtypes` tables
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Write retranslations from a workbook back into the XML files
    EditXml {
        /// Workbook produced by `to-xlsx`
        #[arg(short, long)]
        file: PathBuf,

        /// Column holding the retranslations (e.g. I2)
        #[arg(long = "col")]
        column: String,

        /// Locale folder the workbook was exported from
        #[arg(short, long)]
        language: PathBuf,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run the external converter over every matching file in a folder
    Convert {
        /// Folder to scan
        source: PathBuf,

        /// Converter executable
        #[arg(long)]
        converter: PathBuf,

        /// Extension of the files to convert
        #[arg(short, long, default_value = "pzd")]
        extension: String,

        /// Suffix the converter appends to each input's path
        #[arg(long, default_value = ".xml")]
        output_suffix: String,

        /// Argument passed before the file list (repeatable)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Files per converter call
        #[arg(long, default_value_t = crate::tools::convert::DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Move files by extension into another tree, keeping relative paths
    Move {
        /// Folder to move files from
        source: PathBuf,

        /// Folder to move files into
        destination: PathBuf,

        /// Extension of the files to move
        #[arg(short, long, default_value = "pzd.xml")]
        extension: String,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
}
