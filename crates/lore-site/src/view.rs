//! Page navigation orchestration.
//!
//! [`ViewController::load_page`] drives one navigation:
//!
//! 1. **Loading**: a request id is issued, the loading flag is set and the
//!    view shows its spinner.
//! 2. **Resolve** on the blocking pool; this is the only suspension point.
//!    Success renders the document, failure renders the not-found document
//!    through the same engine.
//! 3. **Cleanup**: the fragment is injected, the loading flag is cleared and
//!    the link router is rebound on the new fragment.
//!
//! Every call carries a monotonically increasing request id. A completion
//! whose id is no longer the latest is discarded without touching the view,
//! so the newest navigation always wins regardless of completion order.
//!
//! The steps are exposed separately ([`ViewController::begin`],
//! [`ViewController::resolve`], [`ViewController::finish`]) for callers that
//! drive resolution themselves.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lore_markdown::MarkdownEngine;
use serde::Serialize;

use crate::resolver::{ContentResolver, NOT_FOUND_DOCUMENT, ResolveError};
use crate::router::{LinkRouter, WikiLink};

/// Injection target for rendered content.
pub trait ContentView: Send {
    /// Show or hide the loading affordance.
    ///
    /// While loading, the content affordance is hidden.
    fn set_loading(&mut self, loading: bool);

    /// Replace the container contents with `html`.
    fn inject(&mut self, html: &str);
}

/// In-memory content container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HtmlContainer {
    html: String,
    loading: bool,
    injections: usize,
}

impl HtmlContainer {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Whether the spinner is showing.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Number of injections so far.
    #[must_use]
    pub fn injections(&self) -> usize {
        self.injections
    }
}

impl ContentView for HtmlContainer {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn inject(&mut self, html: &str) {
        html.clone_into(&mut self.html);
        self.injections += 1;
    }
}

/// Page state owned by the controller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    /// Path of the latest requested page.
    pub current_path: String,
    /// Whether a navigation is in flight.
    pub loading: bool,
}

/// Controller phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewPhase {
    #[default]
    Idle,
    Loading,
    Rendered,
    Failed,
}

/// Result of one navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageOutcome {
    /// Document resolved and injected.
    Rendered {
        request: u64,
        path: String,
        title: Option<String>,
    },
    /// Document missing; the not-found document was injected.
    Failed { request: u64, path: String },
    /// A newer navigation started first; nothing was injected.
    Superseded { request: u64, path: String },
}

impl PageOutcome {
    /// Request id of the navigation.
    #[must_use]
    pub fn request(&self) -> u64 {
        match self {
            Self::Rendered { request, .. }
            | Self::Failed { request, .. }
            | Self::Superseded { request, .. } => *request,
        }
    }
}

/// Handle for a navigation started with [`ViewController::begin`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationTicket {
    /// Request id.
    pub id: u64,
    /// Requested logical path.
    pub path: String,
}

struct Inner<V> {
    view: V,
    state: PageState,
    phase: ViewPhase,
    latest: u64,
    router: LinkRouter,
    links: Vec<WikiLink>,
}

/// Orchestrates navigation into a [`ContentView`].
pub struct ViewController<V> {
    resolver: Arc<ContentResolver>,
    engine: MarkdownEngine,
    inner: Mutex<Inner<V>>,
}

impl<V: ContentView> ViewController<V> {
    /// Create a controller rendering into `view`.
    #[must_use]
    pub fn new(resolver: Arc<ContentResolver>, router: LinkRouter, view: V) -> Self {
        Self {
            resolver,
            engine: MarkdownEngine::new().with_title_extraction(),
            inner: Mutex::new(Inner {
                view,
                state: PageState::default(),
                phase: ViewPhase::Idle,
                latest: 0,
                router,
                links: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Navigate to `path`.
    pub async fn load_page(&self, path: &str) -> PageOutcome {
        let ticket = self.begin(path);

        let resolver = Arc::clone(&self.resolver);
        let target = ticket.path.clone();
        let resolved = tokio::task::spawn_blocking(move || resolver.resolve(&target))
            .await
            .unwrap_or_else(|e| {
                Err(ResolveError::NotFound {
                    path: ticket.path.clone(),
                    source: Box::new(e),
                })
            });

        self.finish(&ticket, resolved)
    }

    /// Navigate to the target of a clicked href.
    ///
    /// Returns `None` without navigating if `href` is not bound to the current
    /// fragment.
    pub async fn follow_link(&self, href: &str) -> Option<PageOutcome> {
        let path = self.link_target(href)?;
        Some(self.load_page(&path).await)
    }

    /// Logical path bound to `href` in the current fragment.
    #[must_use]
    pub fn link_target(&self, href: &str) -> Option<String> {
        self.lock().router.follow(href).map(str::to_owned)
    }

    /// Enter the loading phase for a new navigation.
    pub fn begin(&self, path: &str) -> NavigationTicket {
        // Issued under the lock so ids reach `latest` in issue order.
        let mut inner = self.lock();
        inner.latest += 1;
        let id = inner.latest;
        inner.phase = ViewPhase::Loading;
        path.clone_into(&mut inner.state.current_path);
        inner.state.loading = true;
        inner.view.set_loading(true);

        tracing::info!(request = id, path, "Loading wiki page");
        NavigationTicket {
            id,
            path: path.to_owned(),
        }
    }

    /// Resolve a ticket's path on the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if the document cannot be read.
    pub fn resolve(&self, ticket: &NavigationTicket) -> Result<String, ResolveError> {
        self.resolver.resolve(&ticket.path)
    }

    /// Render, inject and clean up after resolution.
    ///
    /// Stale tickets are discarded without touching the view.
    pub fn finish(
        &self,
        ticket: &NavigationTicket,
        resolved: Result<String, ResolveError>,
    ) -> PageOutcome {
        let (document, phase) = match resolved {
            Ok(text) => (self.engine.render_document(&text), ViewPhase::Rendered),
            Err(e) => {
                tracing::warn!(request = ticket.id, path = %ticket.path, error = %e, "Error loading page");
                (
                    self.engine.render_document(NOT_FOUND_DOCUMENT),
                    ViewPhase::Failed,
                )
            }
        };

        let mut inner = self.lock();
        if inner.latest != ticket.id {
            tracing::debug!(
                request = ticket.id,
                latest = inner.latest,
                "Discarding stale navigation"
            );
            return PageOutcome::Superseded {
                request: ticket.id,
                path: ticket.path.clone(),
            };
        }

        inner.phase = phase;
        let bound = inner.router.bind(&document.html);
        inner.view.inject(&bound.html);
        inner.links = bound.links;

        inner.state.loading = false;
        inner.view.set_loading(false);
        inner.phase = ViewPhase::Idle;

        match phase {
            ViewPhase::Rendered => PageOutcome::Rendered {
                request: ticket.id,
                path: ticket.path.clone(),
                title: document.title,
            },
            _ => PageOutcome::Failed {
                request: ticket.id,
                path: ticket.path.clone(),
            },
        }
    }

    /// Snapshot of the page state.
    #[must_use]
    pub fn page_state(&self) -> PageState {
        self.lock().state.clone()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ViewPhase {
        self.lock().phase
    }

    /// Id of the latest issued request (0 before the first navigation).
    #[must_use]
    pub fn latest_request(&self) -> u64 {
        self.lock().latest
    }

    /// Internal links of the current fragment.
    #[must_use]
    pub fn links(&self) -> Vec<WikiLink> {
        self.lock().links.clone()
    }

    /// Run `f` with the view.
    pub fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.lock().view)
    }
}
