//! Wiki structure, navigation and page pipeline for Lore.
//!
//! This crate provides:
//! - [`WikiTree`] / [`StructureStore`]: the category/item tree loaded from the
//!   structure document
//! - [`ExpansionState`] and the navigation renderer ([`render_navigation`],
//!   [`NavigationView`])
//! - [`ContentResolver`]: logical path to markdown text
//! - [`LinkRouter`]: internal link normalization and binding
//! - [`ViewController`]: end-to-end page navigation into a [`ContentView`]
//! - [`Wiki`]: facade wiring the above around one storage backend
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use lore_site::{ExpansionState, SiteConfig, Wiki};
//! use lore_storage::MockStorage;
//!
//! let storage = MockStorage::new()
//!     .with_structure(r#"{"Skills": {"items": ["Mining"]}}"#)
//!     .with_content("Skills/Mining", "# Mining");
//! let wiki = Wiki::new(Arc::new(storage), SiteConfig::default());
//! wiki.load_structure();
//!
//! let nav = wiki.navigation(&ExpansionState::new());
//! assert_eq!(nav.len(), 1);
//!
//! let page = wiki.render_page("Skills/Mining");
//! assert_eq!(page.title.as_deref(), Some("Mining"));
//! ```

mod expansion;
mod navigation;
mod resolver;
mod router;
mod structure;
mod view;
mod wiki;

pub use expansion::ExpansionState;
pub use navigation::{
    NavAction, NavContainer, NavNode, NavPatch, NavigationView, render as render_navigation,
    to_html as navigation_html,
};
pub use resolver::{ContentResolver, HOME_DOCUMENT, HOME_PATH, NOT_FOUND_DOCUMENT, ResolveError};
pub use router::{BoundFragment, DEFAULT_LINK_PREFIX, LinkRouter, WikiLink, normalize_path};
pub use structure::{NodeId, StructureError, StructureEvent, StructureStore, WikiNode, WikiTree};
pub use view::{
    ContentView, HtmlContainer, NavigationTicket, PageOutcome, PageState, ViewController,
    ViewPhase,
};
pub use wiki::{PageRenderResult, SiteConfig, Wiki};
