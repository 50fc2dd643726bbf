//! Navigation tree rendering.
//!
//! [`render`] turns the structure tree plus the expansion state into a nested
//! list of [`NavNode`]s. Children of a category are always built; whether they
//! are visible is a property of the category node, so expanding never needs
//! to consult the structure again.
//!
//! [`NavigationView`] keeps the last render and applies [`NavPatch`]es keyed by
//! path instead of rebuilding the whole list on every toggle.

use std::collections::HashMap;
use std::fmt::Write as _;

use lore_markdown::escape_html;
use serde::Serialize;

use crate::expansion::ExpansionState;
use crate::structure::{NodeId, WikiNode, WikiTree};

/// What activating a navigation control does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "path", rename_all = "camelCase")]
pub enum NavAction {
    /// Flip the expansion flag of a category.
    Toggle(String),
    /// Load the page at a logical path.
    LoadPage(String),
}

/// Container kind used for a category's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NavContainer {
    /// Flat list of leaf items.
    Items,
    /// Nested categories.
    Subcategories,
}

impl NavContainer {
    fn class(self) -> &'static str {
        match self {
            Self::Items => "wiki-nav-items",
            Self::Subcategories => "wiki-nav-subcategory",
        }
    }
}

/// Rendered navigation node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavNode {
    /// Toggle control with a child container.
    Category {
        label: String,
        path: String,
        expanded: bool,
        container: NavContainer,
        action: NavAction,
        children: Vec<NavNode>,
    },
    /// Page activation control.
    Item {
        label: String,
        path: String,
        action: NavAction,
    },
}

impl NavNode {
    /// Logical path of the node.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Category { path, .. } | Self::Item { path, .. } => path,
        }
    }

    /// Activation attached to the node.
    #[must_use]
    pub fn action(&self) -> &NavAction {
        match self {
            Self::Category { action, .. } | Self::Item { action, .. } => action,
        }
    }
}

/// Render the whole tree against the given expansion state.
///
/// Pure: identical inputs give identical output. Expansion entries for leaf
/// paths are ignored.
#[must_use]
pub fn render(tree: &WikiTree, expansion: &ExpansionState) -> Vec<NavNode> {
    tree.roots()
        .iter()
        .map(|&id| render_node(tree, id, expansion))
        .collect()
}

fn render_node(tree: &WikiTree, id: NodeId, expansion: &ExpansionState) -> NavNode {
    let node = tree.node(id);
    let path = node.path().to_owned();

    let container = match node {
        WikiNode::CategoryWithItems { .. } => NavContainer::Items,
        WikiNode::CategoryWithSubcategories { .. } => NavContainer::Subcategories,
        WikiNode::LeafItem { .. } => {
            return NavNode::Item {
                label: node.name().to_owned(),
                action: NavAction::LoadPage(path.clone()),
                path,
            };
        }
    };

    NavNode::Category {
        label: node.name().to_owned(),
        expanded: expansion.is_expanded(&path),
        container,
        action: NavAction::Toggle(path.clone()),
        children: node
            .children()
            .iter()
            .map(|&child| render_node(tree, child, expansion))
            .collect(),
        path,
    }
}

/// Render navigation nodes to HTML.
#[must_use]
pub fn to_html(nodes: &[NavNode]) -> String {
    let mut html = String::new();
    for node in nodes {
        write_node(&mut html, node);
    }
    html
}

fn write_node(out: &mut String, node: &NavNode) {
    match node {
        NavNode::Item { label, path, .. } => {
            let _ = writeln!(
                out,
                r#"<button class="wiki-nav-item" data-action="load" data-path="{}">{}</button>"#,
                escape_html(path),
                escape_html(label)
            );
        }
        NavNode::Category {
            label,
            path,
            expanded,
            container,
            children,
            ..
        } => {
            let icon_class = if *expanded {
                "wiki-nav-category-icon expanded"
            } else {
                "wiki-nav-category-icon"
            };
            let display = if *expanded { "block" } else { "none" };

            out.push_str("<div class=\"wiki-nav-node\">\n");
            let _ = writeln!(
                out,
                r#"<button class="wiki-nav-item wiki-nav-category" data-action="toggle" data-path="{}" aria-expanded="{expanded}"><svg class="{icon_class}" xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><polyline points="9 18 15 12 9 6"></polyline></svg><span class="wiki-nav-category-text">{}</span></button>"#,
                escape_html(path),
                escape_html(label)
            );
            let _ = writeln!(
                out,
                r#"<div class="{}" style="display:{display}">"#,
                container.class()
            );
            for child in children {
                write_node(out, child);
            }
            out.push_str("</div>\n</div>\n");
        }
    }
}

/// Incremental change to a rendered navigation list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavPatch {
    /// Category path whose flag changed.
    pub path: String,
    /// New expansion flag.
    pub expanded: bool,
}

/// Rendered navigation kept in sync with an [`ExpansionState`] by patches.
#[derive(Clone, Debug, Default)]
pub struct NavigationView {
    nodes: Vec<NavNode>,
    /// Category path -> child index at each depth.
    routes: HashMap<String, Vec<usize>>,
}

impl NavigationView {
    /// Build the view from a full render.
    #[must_use]
    pub fn new(tree: &WikiTree, expansion: &ExpansionState) -> Self {
        let nodes = render(tree, expansion);
        let mut routes = HashMap::new();
        index_routes(&nodes, &mut Vec::new(), &mut routes);
        Self { nodes, routes }
    }

    /// Current nodes.
    #[must_use]
    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    /// Render the current nodes to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        to_html(&self.nodes)
    }

    /// Whether `path` is a category in this view.
    #[must_use]
    pub fn contains_category(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    /// Flip `path` in `expansion` and patch the view to match.
    ///
    /// Returns `None` (leaving `expansion` untouched) when `path` is not a
    /// category.
    pub fn toggle(&mut self, expansion: &mut ExpansionState, path: &str) -> Option<NavPatch> {
        if !self.contains_category(path) {
            tracing::debug!(path, "Ignoring toggle for non-category path");
            return None;
        }

        let patch = NavPatch {
            path: path.to_owned(),
            expanded: expansion.toggle(path),
        };
        self.apply(&patch);
        Some(patch)
    }

    /// Apply a patch. Returns `false` if the path is not a category.
    pub fn apply(&mut self, patch: &NavPatch) -> bool {
        let Some(route) = self.routes.get(&patch.path) else {
            return false;
        };

        let mut nodes = &mut self.nodes;
        let mut target = None;
        for &index in route {
            let Some(NavNode::Category { children, expanded, .. }) = nodes.get_mut(index) else {
                return false;
            };
            target = Some(expanded);
            nodes = children;
        }

        match target {
            Some(expanded) => {
                *expanded = patch.expanded;
                true
            }
            None => false,
        }
    }
}

fn index_routes(
    nodes: &[NavNode],
    prefix: &mut Vec<usize>,
    routes: &mut HashMap<String, Vec<usize>>,
) {
    for (index, node) in nodes.iter().enumerate() {
        if let NavNode::Category { path, children, .. } = node {
            prefix.push(index);
            routes.insert(path.clone(), prefix.clone());
            index_routes(children, prefix, routes);
            prefix.pop();
        }
    }
}
