//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lore_site::{ExpansionState, NavigationView, Wiki};

use crate::ServerConfig;

/// Navigation state of the single browsing session.
pub(crate) struct Session {
    /// Expanded category paths.
    pub(crate) expansion: ExpansionState,
    /// Rendered navigation kept in sync with `expansion`.
    pub(crate) view: NavigationView,
}

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Wiki structure and page pipeline.
    pub(crate) wiki: Arc<Wiki>,
    /// Navigation session. Never held across an await.
    session: Mutex<Session>,
    /// Frontend assets directory.
    pub(crate) assets_dir: PathBuf,
    /// Enable verbose output.
    pub(crate) verbose: bool,
    /// Application version for `ETag`s.
    pub(crate) version: String,
}

impl AppState {
    /// Create state with every category collapsed.
    pub(crate) fn new(wiki: Arc<Wiki>, config: &ServerConfig) -> Self {
        let expansion = ExpansionState::new();
        let view = wiki.navigation_view(&expansion);

        Self {
            wiki,
            session: Mutex::new(Session { expansion, view }),
            assets_dir: config.assets_dir.clone(),
            verbose: config.verbose,
            version: config.version.clone(),
        }
    }

    /// Lock the navigation session.
    pub(crate) fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
