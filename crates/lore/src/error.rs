//! CLI error types.

use lore_config::ConfigError;
use lore_site::StructureError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Structure(#[from] StructureError),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Validation(String),
}
