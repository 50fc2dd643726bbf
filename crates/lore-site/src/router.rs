//! Internal wiki link routing.
//!
//! Anchors whose `href` starts with the link prefix (`#sectionWiki/` by
//! default) are wiki-internal. The rest of the href is the logical path, with
//! every `-` in a segment read as a space:
//!
//! ```text
//! #sectionWiki/Items/Troll-Leather  ->  Items/Troll Leather
//! ```
//!
//! [`LinkRouter::bind`] is run on every freshly rendered fragment. It marks
//! internal anchors with a `data-wiki-path` attribute and replaces the binding
//! table used by [`LinkRouter::follow`].

use std::collections::HashMap;
use std::sync::LazyLock;

use lore_markdown::escape_html;
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use serde::Serialize;

/// Default prefix marking wiki-internal links.
pub const DEFAULT_LINK_PREFIX: &str = "#sectionWiki/";

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a(\s[^>]*?)?\shref=(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Internal link found in a fragment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WikiLink {
    /// Raw href as written in the fragment.
    pub href: String,
    /// Normalized logical path.
    pub path: String,
}

/// Fragment with internal links bound.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundFragment {
    /// HTML with `data-wiki-path` on internal anchors.
    pub html: String,
    /// Internal links in document order.
    pub links: Vec<WikiLink>,
}

/// Normalize the route part of an internal link.
///
/// Each `/`-separated segment is percent-decoded and has every `-` replaced by
/// a space. Empty segments are dropped.
#[must_use]
pub fn normalize_path(route: &str) -> String {
    route
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().replace('-', " "))
        .collect::<Vec<_>>()
        .join("/")
}

/// Router for internal wiki links.
#[derive(Clone, Debug)]
pub struct LinkRouter {
    prefix: String,
    bindings: HashMap<String, String>,
}

impl Default for LinkRouter {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_PREFIX)
    }
}

impl LinkRouter {
    /// Create a router for links starting with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            bindings: HashMap::new(),
        }
    }

    /// Link prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Logical path for an internal href, `None` for any other href.
    #[must_use]
    pub fn normalize(&self, href: &str) -> Option<String> {
        let route = href.strip_prefix(self.prefix.as_str())?;
        let path = normalize_path(route);
        (!path.is_empty()).then_some(path)
    }

    /// Bind the internal links of a freshly injected fragment.
    ///
    /// Previous bindings are discarded.
    pub fn bind(&mut self, html: &str) -> BoundFragment {
        self.bindings.clear();
        let mut links = Vec::new();

        let bound = ANCHOR_RE.replace_all(html, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let href = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());

            let Some(path) = self.normalize(href) else {
                return whole.to_owned();
            };

            let tagged = format!(
                r#"<a data-wiki-path="{}"{}"#,
                escape_html(&path),
                &whole[2..]
            );
            self.bindings.insert(href.to_owned(), path.clone());
            links.push(WikiLink {
                href: href.to_owned(),
                path,
            });
            tagged
        });

        tracing::debug!(links = links.len(), "Bound internal links");

        BoundFragment {
            html: bound.into_owned(),
            links,
        }
    }

    /// Navigation target for a clicked href.
    ///
    /// Returns `None` for anchors outside the current binding; the default
    /// behaviour applies to those.
    #[must_use]
    pub fn follow(&self, href: &str) -> Option<&str> {
        self.bindings.get(href).map(String::as_str)
    }

    /// Number of bound links.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_normalize_path_replaces_dashes_per_segment() {
        assert_eq!(normalize_path("Items/Troll-Leather"), "Items/Troll Leather");
        assert_eq!(normalize_path("Skills/Arms-Lore/Tips"), "Skills/Arms Lore/Tips");
    }

    #[test]
    fn test_normalize_path_dash_and_space_forms_agree() {
        assert_eq!(
            normalize_path("Troll-Leather"),
            normalize_path("Troll Leather")
        );
    }

    #[test]
    fn test_normalize_path_percent_decodes() {
        assert_eq!(normalize_path("Items/Troll%20Leather"), "Items/Troll Leather");
    }

    #[test]
    fn test_normalize_path_drops_empty_segments() {
        assert_eq!(normalize_path("/Skills//Mining/"), "Skills/Mining");
    }

    #[test]
    fn test_normalize_only_internal() {
        let router = LinkRouter::default();

        assert_eq!(
            router.normalize("#sectionWiki/Skills/Mining").as_deref(),
            Some("Skills/Mining")
        );
        assert_eq!(router.normalize("https://example.com"), None);
        assert_eq!(router.normalize("#sectionWiki/"), None);
    }

    #[test]
    fn test_bind_marks_internal_anchors() {
        let mut router = LinkRouter::default();

        let bound = router.bind(
            r##"<p>See <a href="#sectionWiki/Items/Troll-Leather">Troll Leather</a> and <a href="https://example.com">web</a>.</p>"##,
        );

        assert_eq!(
            bound.html,
            r##"<p>See <a data-wiki-path="Items/Troll Leather" href="#sectionWiki/Items/Troll-Leather">Troll Leather</a> and <a href="https://example.com">web</a>.</p>"##
        );
        assert_eq!(
            bound.links,
            vec![WikiLink {
                href: "#sectionWiki/Items/Troll-Leather".to_owned(),
                path: "Items/Troll Leather".to_owned(),
            }]
        );
    }

    #[test]
    fn test_bind_handles_other_attributes_and_quotes() {
        let mut router = LinkRouter::default();

        let bound = router.bind(r#"<a class="x" href='#sectionWiki/Skills'>S</a>"#);

        assert_eq!(bound.links.len(), 1);
        assert_eq!(router.follow("#sectionWiki/Skills"), Some("Skills"));
        assert!(bound.html.starts_with(r#"<a data-wiki-path="Skills" class="x""#));
    }

    #[test]
    fn test_follow() {
        let mut router = LinkRouter::default();
        router.bind(r##"<a href="#sectionWiki/Skills/Mining">Mining</a>"##);

        assert_eq!(router.follow("#sectionWiki/Skills/Mining"), Some("Skills/Mining"));
        assert_eq!(router.follow("https://example.com"), None);
    }

    #[test]
    fn test_rebind_discards_previous_binding() {
        let mut router = LinkRouter::default();
        router.bind(r##"<a href="#sectionWiki/Skills/Mining">Mining</a>"##);

        router.bind(r##"<a href="#sectionWiki/Skills/Fishing">Fishing</a>"##);

        assert_eq!(router.follow("#sectionWiki/Skills/Mining"), None);
        assert_eq!(router.follow("#sectionWiki/Skills/Fishing"), Some("Skills/Fishing"));
        assert_eq!(router.bound_count(), 1);
    }

    #[test]
    fn test_custom_prefix() {
        let mut router = LinkRouter::new("#/wiki/");

        let bound = router.bind(r##"<a href="#/wiki/Races/High-Elf">x</a>"##);

        assert_eq!(bound.links[0].path, "Races/High Elf");
    }

    #[test]
    fn test_fragment_without_links_unchanged() {
        let mut router = LinkRouter::default();

        let bound = router.bind("<h1>Error</h1>\n<p>Page not found.</p>\n");

        assert_eq!(bound.html, "<h1>Error</h1>\n<p>Page not found.</p>\n");
        assert!(bound.links.is_empty());
    }
}
