//! Wiki structure tree.
//!
//! The structure document is parsed once into a [`WikiTree`]. Nodes live in a
//! flat `Vec` and refer to each other by [`NodeId`]; a path index gives O(1)
//! lookups by logical path.
//!
//! # Structure document
//!
//! ```json
//! {
//!   "Skills": { "items": ["Mining", "Fishing"] },
//!   "Items": {
//!     "subcategories": {
//!       "Weapons": { "items": ["Swords"] }
//!     }
//!   }
//! }
//! ```
//!
//! An entry with `items` becomes [`WikiNode::CategoryWithItems`], one with
//! `subcategories` becomes [`WikiNode::CategoryWithSubcategories`]; `items`
//! wins when both are present. Entries with neither key are skipped. Every
//! string in an `items` list becomes a [`WikiNode::LeafItem`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use lore_storage::{Storage, StorageError};
use serde::Serialize;
use serde_json::{Map, Value};

/// Stable identity of a node inside a [`WikiTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node of the wiki structure tree.
///
/// The variant is decided once at load time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WikiNode {
    /// Category holding a flat list of leaf items.
    CategoryWithItems {
        name: String,
        path: String,
        items: Vec<NodeId>,
    },
    /// Category holding nested categories (or leaves).
    CategoryWithSubcategories {
        name: String,
        path: String,
        children: Vec<NodeId>,
    },
    /// Terminal wiki page.
    LeafItem { name: String, path: String },
}

impl WikiNode {
    /// Display name (last path segment).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::CategoryWithItems { name, .. }
            | Self::CategoryWithSubcategories { name, .. }
            | Self::LeafItem { name, .. } => name,
        }
    }

    /// Logical path (ancestor names joined by `/`).
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::CategoryWithItems { path, .. }
            | Self::CategoryWithSubcategories { path, .. }
            | Self::LeafItem { path, .. } => path,
        }
    }

    /// Child node ids in document order. Empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match self {
            Self::CategoryWithItems { items, .. } => items,
            Self::CategoryWithSubcategories { children, .. } => children,
            Self::LeafItem { .. } => &[],
        }
    }

    /// Whether the node can be expanded.
    #[must_use]
    pub fn is_category(&self) -> bool {
        !matches!(self, Self::LeafItem { .. })
    }
}

/// Error returned when the structure document cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    /// Structure document could not be read from storage.
    #[error("Failed to read structure document: {0}")]
    Read(#[source] StorageError),
    /// Structure document is not valid JSON.
    #[error("Invalid structure document: {0}")]
    Parse(#[from] serde_json::Error),
    /// Structure document is valid JSON of the wrong shape.
    #[error("Invalid structure document: {0}")]
    Shape(String),
}

/// Immutable category/item tree with path lookups.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WikiTree {
    nodes: Vec<WikiNode>,
    roots: Vec<NodeId>,
    path_index: HashMap<String, NodeId>,
}

impl WikiTree {
    /// Create an empty tree.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a structure document.
    ///
    /// Entries with an empty name, a name containing `/`, or a name already
    /// used by a sibling are skipped with a warning.
    pub fn from_json(json: &str) -> Result<Self, StructureError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Build a tree from an already parsed structure document.
    pub fn from_value(value: &Value) -> Result<Self, StructureError> {
        let Value::Object(entries) = value else {
            return Err(StructureError::Shape(
                "top level must be an object".to_owned(),
            ));
        };

        let mut builder = WikiTreeBuilder::default();
        builder.add_entries(entries, None);
        Ok(builder.build())
    }

    /// Get node by id.
    ///
    /// Ids are only handed out by this tree, so lookups never miss.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &WikiNode {
        &self.nodes[id.0]
    }

    /// Get node by logical path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&WikiNode> {
        self.find(path).map(|id| self.node(id))
    }

    /// Find node id by logical path.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.path_index.get(path).copied()
    }

    /// Whether `path` names a category in this tree.
    #[must_use]
    pub fn is_category(&self, path: &str) -> bool {
        self.get(path).is_some_and(WikiNode::is_category)
    }

    /// Top-level nodes in document order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of top-level categories.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.roots
            .iter()
            .filter(|&&id| self.node(id).is_category())
            .count()
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in arena order (parents before children).
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &WikiNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

#[derive(Default)]
struct WikiTreeBuilder {
    nodes: Vec<WikiNode>,
    roots: Vec<NodeId>,
    path_index: HashMap<String, NodeId>,
}

impl WikiTreeBuilder {
    fn add_entries(&mut self, entries: &Map<String, Value>, parent: Option<NodeId>) {
        for (name, value) in entries {
            self.add_entry(name, value, parent);
        }
    }

    fn add_entry(&mut self, name: &str, value: &Value, parent: Option<NodeId>) {
        let items = value.get("items").and_then(Value::as_array);
        let subcategories = value.get("subcategories").and_then(Value::as_object);

        if items.is_none() && subcategories.is_none() {
            tracing::warn!(name, %value, "Skipping entry without items or subcategories");
            return;
        }

        let node = |path: String| {
            if items.is_some() {
                WikiNode::CategoryWithItems {
                    name: name.to_owned(),
                    path,
                    items: Vec::new(),
                }
            } else {
                WikiNode::CategoryWithSubcategories {
                    name: name.to_owned(),
                    path,
                    children: Vec::new(),
                }
            }
        };

        let Some(id) = self.push(name, parent, node) else {
            return;
        };

        if let Some(items) = items {
            for item in items {
                match item.as_str() {
                    Some(item) => {
                        self.push(item, Some(id), |path| WikiNode::LeafItem {
                            name: item.to_owned(),
                            path,
                        });
                    }
                    None => {
                        tracing::warn!(category = %self.nodes[id.0].path(), %item, "Skipping non-string item");
                    }
                }
            }
        } else if let Some(subcategories) = subcategories {
            self.add_entries(subcategories, Some(id));
        }
    }

    /// Add a node below `parent`, computing its path.
    ///
    /// Returns `None` when the name is unusable as a path segment.
    fn push(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        make: impl FnOnce(String) -> WikiNode,
    ) -> Option<NodeId> {
        if name.trim().is_empty() || name.contains('/') {
            tracing::warn!(name, "Skipping entry with invalid name");
            return None;
        }

        let path = match parent {
            Some(parent) => format!("{}/{name}", self.nodes[parent.0].path()),
            None => name.to_owned(),
        };

        if self.path_index.contains_key(&path) {
            tracing::warn!(%path, "Skipping duplicate entry");
            return None;
        }

        let id = NodeId(self.nodes.len());
        self.path_index.insert(path.clone(), id);
        self.nodes.push(make(path));

        match parent {
            Some(parent) => match &mut self.nodes[parent.0] {
                WikiNode::CategoryWithItems { items: children, .. }
                | WikiNode::CategoryWithSubcategories { children, .. } => children.push(id),
                WikiNode::LeafItem { .. } => {}
            },
            None => self.roots.push(id),
        }

        Some(id)
    }

    fn build(self) -> WikiTree {
        WikiTree {
            nodes: self.nodes,
            roots: self.roots,
            path_index: self.path_index,
        }
    }
}

/// Outcome of loading the structure document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum StructureEvent {
    /// Tree loaded; `categories` top-level categories are available.
    Loaded { categories: usize },
    /// Loading failed; the tree is empty.
    LoadFailed { reason: String },
}

/// Holder of the current structure tree.
///
/// The tree is swapped atomically on load; readers get an `Arc` snapshot.
#[derive(Debug, Default)]
pub struct StructureStore {
    current: RwLock<Arc<WikiTree>>,
}

impl StructureStore {
    /// Create a store holding an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tree snapshot.
    #[must_use]
    pub fn tree(&self) -> Arc<WikiTree> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Read and parse the structure document from storage.
    pub fn read(storage: &dyn Storage) -> Result<WikiTree, StructureError> {
        let json = storage.structure().map_err(StructureError::Read)?;
        WikiTree::from_json(&json)
    }

    /// Load the structure document, degrading to an empty tree on failure.
    pub fn load(&self, storage: &dyn Storage) -> StructureEvent {
        let (tree, event) = match Self::read(storage) {
            Ok(tree) => {
                let categories = tree.category_count();
                tracing::info!(categories, nodes = tree.len(), "Wiki structure loaded");
                (tree, StructureEvent::Loaded { categories })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Wiki structure missing, using empty tree");
                (
                    WikiTree::empty(),
                    StructureEvent::LoadFailed {
                        reason: e.to_string(),
                    },
                )
            }
        };

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(tree);
        event
    }
}
