//! Expand/collapse state of navigation categories.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::structure::WikiTree;

/// Set of expanded category paths.
///
/// A path that is absent is collapsed. Only expanded paths are stored, so
/// toggling a path twice yields a state equal to the original.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    expanded: BTreeSet<String>,
}

impl ExpansionState {
    /// Create a state with every category collapsed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the category at `path` is expanded.
    #[must_use]
    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Flip the flag for `path` and return the new value.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_owned());
            true
        }
    }

    /// Set the flag for `path`.
    pub fn set(&mut self, path: &str, expanded: bool) {
        if expanded {
            self.expanded.insert(path.to_owned());
        } else {
            self.expanded.remove(path);
        }
    }

    /// Expanded paths in sorted order.
    pub fn expanded_paths(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    /// Drop entries that no longer name a category in `tree`.
    pub fn retain_categories(&mut self, tree: &WikiTree) {
        self.expanded.retain(|path| tree.is_category(path));
    }

    /// Collapse everything.
    pub fn reset(&mut self) {
        self.expanded.clear();
    }
}
