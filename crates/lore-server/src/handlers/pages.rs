//! Pages API endpoint.
//!
//! Resolves and renders a wiki page and returns the fragment with its
//! internal links. Missing pages are answered with the rendered not-found
//! document and `found: false`.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use lore_site::{HOME_PATH, PageRenderResult, WikiLink};
use md5::{Digest, Md5};
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    /// Requested logical path.
    path: String,
    /// Page title (from H1 heading).
    title: Option<String>,
    /// False when the not-found document was rendered.
    found: bool,
    /// Rendered HTML content.
    content: String,
    /// Internal links in the content.
    links: Vec<WikiLink>,
}

impl From<PageRenderResult> for PageResponse {
    fn from(result: PageRenderResult) -> Self {
        Self {
            path: result.path,
            title: result.title,
            found: result.found,
            content: result.html,
            links: result.links,
        }
    }
}

/// Handle GET /api/pages/ (welcome page).
pub(crate) async fn get_home_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    get_page_impl(HOME_PATH, &state, &headers)
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    get_page_impl(&path, &state, &headers)
}

/// Shared implementation for page rendering.
fn get_page_impl(path: &str, state: &AppState, headers: &HeaderMap) -> Response {
    let result = state.wiki.render_page(path);

    if state.verbose && !result.found {
        tracing::warn!(path, "Served not-found document");
    }

    let etag = compute_etag(&state.version, &result.html);

    // Conditional request
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    (
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Json(PageResponse::from(result)),
    )
        .into_response()
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars) - sufficient for
/// cache invalidation with negligible collision probability.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
