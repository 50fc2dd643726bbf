//! Wiki facade.
//!
//! [`Wiki`] wires the structure store, content resolver, markdown engine and
//! link router around one [`Storage`] backend.

use std::sync::Arc;

use lore_markdown::MarkdownEngine;
use lore_storage::Storage;
use serde::Serialize;

use crate::expansion::ExpansionState;
use crate::navigation::{self, NavNode, NavigationView};
use crate::resolver::{ContentResolver, NOT_FOUND_DOCUMENT};
use crate::router::{DEFAULT_LINK_PREFIX, LinkRouter, WikiLink};
use crate::structure::{StructureEvent, StructureStore, WikiTree};
use crate::view::{ContentView, ViewController};

/// Configuration for [`Wiki`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Prefix marking wiki-internal links.
    pub link_prefix: String,
    /// Extract title from first H1 heading.
    pub extract_title: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            link_prefix: DEFAULT_LINK_PREFIX.to_owned(),
            extract_title: true,
        }
    }
}

/// Result of rendering a page in one shot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageRenderResult {
    /// Requested logical path.
    pub path: String,
    /// Title from the first H1 heading (if enabled).
    pub title: Option<String>,
    /// Rendered fragment with internal links bound.
    pub html: String,
    /// Internal links in the fragment.
    pub links: Vec<WikiLink>,
    /// False when the not-found document was rendered instead.
    pub found: bool,
}

/// Wiki structure and page rendering over a storage backend.
pub struct Wiki {
    storage: Arc<dyn Storage>,
    structure: StructureStore,
    resolver: Arc<ContentResolver>,
    engine: MarkdownEngine,
    link_prefix: String,
}

impl Wiki {
    /// Create a wiki with an empty tree. Call [`Wiki::load_structure`] next.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, config: SiteConfig) -> Self {
        let engine = if config.extract_title {
            MarkdownEngine::new().with_title_extraction()
        } else {
            MarkdownEngine::new()
        };

        Self {
            resolver: Arc::new(ContentResolver::new(Arc::clone(&storage))),
            storage,
            structure: StructureStore::new(),
            engine,
            link_prefix: config.link_prefix,
        }
    }

    /// Load the structure document, degrading to an empty tree on failure.
    pub fn load_structure(&self) -> StructureEvent {
        self.structure.load(self.storage.as_ref())
    }

    /// Current structure tree.
    #[must_use]
    pub fn tree(&self) -> Arc<WikiTree> {
        self.structure.tree()
    }

    /// Full navigation render for `expansion`.
    #[must_use]
    pub fn navigation(&self, expansion: &ExpansionState) -> Vec<NavNode> {
        navigation::render(&self.tree(), expansion)
    }

    /// Navigation view for incremental updates.
    #[must_use]
    pub fn navigation_view(&self, expansion: &ExpansionState) -> NavigationView {
        NavigationView::new(&self.tree(), expansion)
    }

    /// Shared content resolver.
    #[must_use]
    pub fn resolver(&self) -> Arc<ContentResolver> {
        Arc::clone(&self.resolver)
    }

    /// Content address for a logical path.
    #[must_use]
    pub fn address(&self, path: &str) -> String {
        self.resolver.address(path)
    }

    /// Prefix marking wiki-internal links.
    #[must_use]
    pub fn link_prefix(&self) -> &str {
        &self.link_prefix
    }

    /// Fresh link router for this wiki's prefix.
    #[must_use]
    pub fn router(&self) -> LinkRouter {
        LinkRouter::new(self.link_prefix.clone())
    }

    /// Controller injecting pages into `view`.
    #[must_use]
    pub fn view_controller<V: ContentView>(&self, view: V) -> ViewController<V> {
        ViewController::new(self.resolver(), self.router(), view)
    }

    /// Resolve, render and bind a page.
    ///
    /// A missing page renders the not-found document with `found: false`.
    #[must_use]
    pub fn render_page(&self, path: &str) -> PageRenderResult {
        let (document, found) = match self.resolver.resolve(path) {
            Ok(text) => (self.engine.render_document(&text), true),
            Err(e) => {
                tracing::warn!(path, error = %e, "Error loading page");
                (self.engine.render_document(NOT_FOUND_DOCUMENT), false)
            }
        };

        let bound = self.router().bind(&document.html);

        PageRenderResult {
            path: path.to_owned(),
            title: document.title,
            html: bound.html,
            links: bound.links,
            found,
        }
    }
}
