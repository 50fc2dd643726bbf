//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores documents in memory. Use the builder methods to configure the mock
/// with test data.
///
/// # Example
///
/// ```ignore
/// use lore_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_structure(r#"{"Skills": {"items": ["Mining"]}}"#)
///     .with_content("Skills/Mining", "# Mining\n\nDig.");
///
/// let text = storage.read("Skills/Mining").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    contents: RwLock<HashMap<String, String>>,
    structure: RwLock<Option<String>>,
    unavailable: RwLock<HashSet<String>>,
    reads: AtomicUsize,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add content for a logical path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_content(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.contents
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Set the structure document.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_structure(self, json: impl Into<String>) -> Self {
        *self.structure.write().unwrap() = Some(json.into());
        self
    }

    /// Make reads of `path` fail as if the backend were unreachable.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_unavailable(self, path: impl Into<String>) -> Self {
        self.unavailable.write().unwrap().insert(path.into());
        self
    }

    /// Replace or add content after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_content(&self, path: impl Into<String>, content: impl Into<String>) {
        self.contents
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Number of `read()` calls served so far.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Storage for MockStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.read().unwrap().contains(path) {
            return Err(StorageError::new(StorageErrorKind::Unavailable)
                .with_path(self.address(path))
                .with_backend(BACKEND));
        }

        self.contents
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(self.address(path)).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.contents.read().unwrap().contains_key(path)
    }

    fn address(&self, path: &str) -> String {
        format!("{path}.md")
    }

    fn structure(&self) -> Result<String, StorageError> {
        self.structure
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| StorageError::not_found("Wiki-Structure.json").with_backend(BACKEND))
    }
}
