//! HTTP server for the Lore wiki.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - API endpoints for navigation, expand/collapse toggles and page rendering
//! - Static files for the frontend SPA
//!
//! # Quick Start
//!
//! ```ignore
//! use lore_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 7979,
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (lore-server)
//!                        │
//!                        ├─► API routes
//!                        │       │
//!                        │       └─► Wiki (structure + resolve + render + bind)
//!                        │
//!                        └─► Static files from assets_dir (SPA fallback)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use lore_site::{SiteConfig, StructureEvent, Wiki};
use lore_storage::{FsStorage, Storage};

pub use error::ServerError;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Content documents directory.
    pub source_dir: PathBuf,
    /// Structure document location.
    pub structure_file: PathBuf,
    /// Suffix appended to logical paths.
    pub content_suffix: String,
    /// Prefix marking wiki-internal links.
    pub link_prefix: String,
    /// Frontend assets directory.
    pub assets_dir: PathBuf,
    /// Enable verbose output.
    pub verbose: bool,
    /// Application version (part of page `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("wiki"),
            structure_file: PathBuf::from("Wiki-Structure.json"),
            content_suffix: ".md".to_owned(),
            link_prefix: lore_site::DEFAULT_LINK_PREFIX.to_owned(),
            assets_dir: PathBuf::from("public"),
            verbose: false,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let storage: Arc<dyn Storage> = Arc::new(
        FsStorage::new(config.source_dir.clone(), config.structure_file.clone())
            .with_suffix(config.content_suffix.clone()),
    );

    let wiki = Arc::new(Wiki::new(
        storage,
        SiteConfig {
            link_prefix: config.link_prefix.clone(),
            extract_title: true,
        },
    ));

    match wiki.load_structure() {
        StructureEvent::Loaded { categories } => {
            tracing::info!(categories, "Navigation ready");
        }
        StructureEvent::LoadFailed { reason } => {
            tracing::warn!(%reason, structure_file = %config.structure_file.display(), "Serving without navigation");
        }
    }

    let state = Arc::new(AppState::new(wiki, &config));
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))
        .map_err(|e| ServerError::InvalidAddress(e.to_string()))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Lore config.
#[must_use]
pub fn server_config_from_lore_config(
    config: &lore_config::Config,
    version: String,
    verbose: bool,
) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.wiki_resolved.source_dir.clone(),
        structure_file: config.wiki_resolved.structure_file.clone(),
        content_suffix: config.wiki_resolved.content_suffix.clone(),
        link_prefix: config.wiki_resolved.link_prefix.clone(),
        assets_dir: config.wiki_resolved.assets_dir.clone(),
        verbose,
        version,
    }
}
