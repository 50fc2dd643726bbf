//! `lore render` command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use lore_markdown::MarkdownEngine;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render, or `-` for stdin.
    file: PathBuf,

    /// Print the extracted title to stderr.
    #[arg(long)]
    title: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or stdout is closed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let text = read_input(&self.file)?;
        tracing::debug!(file = %self.file.display(), bytes = text.len(), "Rendering document");

        let engine = MarkdownEngine::new().with_title_extraction();
        let result = engine.render_document(&text);

        if self.title {
            match &result.title {
                Some(title) => output.highlight(title),
                None => output.warning("No title found"),
            }
        }

        output.emit(&result.html)?;
        Ok(())
    }
}

/// Read the document from a file, or from stdin for `-`.
fn read_input(file: &Path) -> Result<String, CliError> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !file.is_file() {
        return Err(CliError::Validation(format!(
            "File not found: {}",
            file.display()
        )));
    }
    Ok(std::fs::read_to_string(file)?)
}
