//! `lore serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use lore_config::{CliSettings, Config};
use lore_server::{run_server, server_config_from_lore_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover lore.toml).
    #[arg(short, long, env = "LORE_CONFIG")]
    config: Option<PathBuf>,

    /// Content documents directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Structure document (overrides config).
    #[arg(long)]
    structure_file: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (request and navigation logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            structure_file: self.structure_file,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        config.validate()?;

        output.highlight(&format!(
            "Starting server on http://{}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Source directory: {}",
            config.wiki_resolved.source_dir.display()
        ));
        output.info(&format!(
            "Structure document: {}",
            config.wiki_resolved.structure_file.display()
        ));

        if config.wiki_resolved.assets_dir.is_dir() {
            output.info(&format!(
                "Assets directory: {}",
                config.wiki_resolved.assets_dir.display()
            ));
        } else {
            output.warning(&format!(
                "Assets directory not found: {} (API only)",
                config.wiki_resolved.assets_dir.display()
            ));
        }

        let server_config =
            server_config_from_lore_config(&config, version.to_owned(), self.verbose);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
