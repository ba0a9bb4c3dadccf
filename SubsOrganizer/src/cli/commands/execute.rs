//! Command execution

use super::{Commands, edit, export, tools};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::ToXlsx {
                language,
                japanese,
                output,
                config,
                quiet,
            } => export::to_xlsx(language, japanese, output, config.as_deref(), *quiet),
            Commands::ToHtml {
                language,
                japanese,
                output,
                config,
                quiet,
            } => export::to_html(language, japanese, output, config.as_deref(), *quiet),
            Commands::EditXml {
                file,
                column,
                language,
                quiet,
            } => edit::execute(file, column, language, *quiet),
            Commands::Convert {
                source,
                converter,
                extension,
                output_suffix,
                args,
                chunk_size,
                quiet,
            } => tools::convert(
                source,
                converter,
                extension,
                output_suffix,
                args,
                *chunk_size,
                *quiet,
            ),
            Commands::Move {
                source,
                destination,
                extension,
                quiet,
            } => tools::relocate(source, destination, extension, *quiet),
        }
    }
}
