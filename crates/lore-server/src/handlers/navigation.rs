//! Navigation API endpoints.
//!
//! Returns the navigation tree for the wiki and applies expand/collapse
//! toggles to the session.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use lore_site::{ExpansionState, NavNode, NavPatch};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Navigation tree items.
    items: Vec<NavNode>,
    /// Navigation rendered to HTML.
    html: String,
    /// Expanded category paths.
    expanded: ExpansionState,
}

/// Response for POST /api/navigation/toggle/{path}.
#[derive(Serialize)]
pub(crate) struct ToggleResponse {
    /// Change applied to the tree.
    patch: NavPatch,
    /// Navigation tree items after the change.
    items: Vec<NavNode>,
    /// Navigation rendered to HTML after the change.
    html: String,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(State(state): State<Arc<AppState>>) -> Json<NavigationResponse> {
    let session = state.session();
    Json(NavigationResponse {
        items: session.view.nodes().to_vec(),
        html: session.view.to_html(),
        expanded: session.expansion.clone(),
    })
}

/// Handle POST /api/navigation/toggle/{path}.
pub(crate) async fn toggle_category(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ToggleResponse>, ServerError> {
    let mut session = state.session();
    let session = &mut *session;

    let patch = session
        .view
        .toggle(&mut session.expansion, &path)
        .ok_or_else(|| ServerError::NotACategory(path.clone()))?;

    if state.verbose {
        tracing::info!(path = %patch.path, expanded = patch.expanded, "Toggled category");
    }

    Ok(Json(ToggleResponse {
        patch,
        items: session.view.nodes().to_vec(),
        html: session.view.to_html(),
    }))
}
