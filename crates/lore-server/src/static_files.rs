//! Static file serving.
//!
//! Serves the frontend from the configured assets directory, falling back to
//! `index.html` for client-side routes.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Create router for static file serving with SPA fallback.
pub(crate) fn static_router() -> Router<Arc<AppState>> {
    Router::new().fallback(serve_asset)
}

/// Serve a static asset or fall back to `index.html` for SPA routing.
async fn serve_asset(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response {
    let path = req.uri().path().trim_start_matches('/');

    // Map root to index.html for SPA
    let file_path = if path.is_empty() { "index.html" } else { path };

    let Some(resolved) = asset_path(&state.assets_dir, file_path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if let Some(response) = read_asset(&resolved).await {
        return response;
    }

    // SPA fallback: serve index.html for client-side routing
    if is_spa_route(path)
        && let Some(response) = read_asset(&state.assets_dir.join("index.html")).await
    {
        return response;
    }

    StatusCode::NOT_FOUND.into_response()
}

/// Join `file_path` onto the assets directory, rejecting anything that could
/// escape it.
fn asset_path(assets_dir: &Path, file_path: &str) -> Option<PathBuf> {
    let relative = Path::new(file_path);
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| assets_dir.join(relative))
}

/// Routes handled by the frontend rather than the file system.
fn is_spa_route(path: &str) -> bool {
    !path.starts_with("api/") && !path.contains('.')
}

async fn read_asset(path: &Path) -> Option<Response> {
    let content = tokio::fs::read(path).await.ok()?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Some(([(header::CONTENT_TYPE, mime.to_string())], content).into_response())
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use tower::ServiceExt;

    use super::*;
    use crate::app::tests::test_state;

    async fn get(assets: &Path, uri: &str) -> Response {
        let app = static_router().with_state(test_state(assets));
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn assets() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>lore</html>").unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/wiki.css"), ".wiki-nav-item {}").unwrap();
        dir
    }

    #[test]
    fn test_asset_path_rejects_traversal() {
        let base = Path::new("/srv/public");

        assert_eq!(
            asset_path(base, "css/wiki.css"),
            Some(PathBuf::from("/srv/public/css/wiki.css"))
        );
        assert_eq!(asset_path(base, "../secret.txt"), None);
        assert_eq!(asset_path(base, "css/../../secret.txt"), None);
    }

    #[test]
    fn test_is_spa_route() {
        assert!(is_spa_route("Skills/Mining"));
        assert!(!is_spa_route("api/unknown"));
        assert!(!is_spa_route("missing.js"));
    }

    #[tokio::test]
    async fn test_serves_index_for_root() {
        let dir = assets();

        let response = get(dir.path(), "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<html>lore</html>");
    }

    #[tokio::test]
    async fn test_serves_asset_with_mime_type() {
        let dir = assets();

        let response = get(dir.path(), "/css/wiki.css").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }

    #[tokio::test]
    async fn test_spa_fallback() {
        let dir = assets();

        let response = get(dir.path(), "/Skills/Mining").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<html>lore</html>");
    }

    #[tokio::test]
    async fn test_missing_file_not_found() {
        let dir = assets();

        assert_eq!(get(dir.path(), "/missing.js").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(get(dir.path(), "/api/unknown").await.status(), StatusCode::NOT_FOUND);
    }
}
