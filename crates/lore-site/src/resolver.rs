//! Logical path to markdown text.

use std::sync::Arc;

use lore_storage::Storage;

/// Logical path of the built-in welcome document.
pub const HOME_PATH: &str = "home";

/// Built-in welcome document served for [`HOME_PATH`].
pub const HOME_DOCUMENT: &str = "# Lore Wiki

Welcome to the official wiki of our shard!

## What you will find here

This wiki holds detailed information about:

- **Skills**: every ability available in the game
- **Classes**: the playable classes and their specializations
- **Races**: the unique races of our world
- **Items**: objects, weapons, tools and resources

## How to navigate

Use the side menu to explore the sections. Click a category to expand it and see every entry it contains.

## Recent updates

The wiki is updated constantly with new information about the world. Check back often!";

/// Document rendered when a page cannot be resolved.
pub const NOT_FOUND_DOCUMENT: &str = "# Error\nPage not found.";

/// Error returned when a logical path has no content.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Content document missing or unreadable.
    #[error("Page not found: {path}")]
    NotFound {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ResolveError {
    /// Logical path that failed to resolve.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path, .. } => path,
        }
    }
}

/// Maps logical paths to raw markdown text.
///
/// Never substitutes filler content: a miss is an error and the caller picks
/// the fallback.
pub struct ContentResolver {
    storage: Arc<dyn Storage>,
}

impl ContentResolver {
    /// Create a resolver backed by `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Resolve a logical path to markdown text.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] for any storage failure.
    pub fn resolve(&self, path: &str) -> Result<String, ResolveError> {
        if path == HOME_PATH {
            return Ok(HOME_DOCUMENT.to_owned());
        }

        self.storage.read(path).map_err(|e| {
            tracing::debug!(path, error = %e, "Content document not resolved");
            ResolveError::NotFound {
                path: path.to_owned(),
                source: Box::new(e),
            }
        })
    }

    /// Content address for a logical path.
    #[must_use]
    pub fn address(&self, path: &str) -> String {
        self.storage.address(path)
    }
}

#[cfg(test)]
mod tests {
    use lore_storage::{MockStorage, StorageError, StorageErrorKind};

    use super::*;

    fn resolver(storage: MockStorage) -> ContentResolver {
        ContentResolver::new(Arc::new(storage))
    }

    #[test]
    fn test_home_is_builtin() {
        let storage = Arc::new(MockStorage::new());
        let resolver = ContentResolver::new(Arc::clone(&storage) as Arc<dyn Storage>);

        let first = resolver.resolve("home").unwrap();

        assert_eq!(first, HOME_DOCUMENT);
        assert_eq!(storage.read_count(), 0);
    }

    #[test]
    fn test_home_is_idempotent() {
        let resolver = resolver(MockStorage::new().with_content("Skills/Mining", "# Mining"));

        let first = resolver.resolve("home").unwrap();
        let _ = resolver.resolve("Skills/Mining");
        let _ = resolver.resolve("Nonexistent/Page");

        assert_eq!(resolver.resolve("home").unwrap(), first);
    }

    #[test]
    fn test_home_ignores_stored_document() {
        let resolver = resolver(MockStorage::new().with_content("home", "# Stored"));

        assert_eq!(resolver.resolve("home").unwrap(), HOME_DOCUMENT);
    }

    #[test]
    fn test_resolve_from_storage() {
        let resolver = resolver(MockStorage::new().with_content("Skills/Mining", "# Mining"));

        assert_eq!(resolver.resolve("Skills/Mining").unwrap(), "# Mining");
    }

    #[test]
    fn test_resolve_missing_is_not_found() {
        let resolver = resolver(MockStorage::new());

        let err = resolver.resolve("Nonexistent/Page").unwrap_err();

        assert!(matches!(err, ResolveError::NotFound { .. }));
        assert_eq!(err.path(), "Nonexistent/Page");
        assert_eq!(err.to_string(), "Page not found: Nonexistent/Page");
    }

    #[test]
    fn test_resolve_transport_failure_is_not_found() {
        let resolver = resolver(
            MockStorage::new()
                .with_content("Skills/Mining", "# Mining")
                .with_unavailable("Skills/Mining"),
        );

        let err = resolver.resolve("Skills/Mining").unwrap_err();

        let source = std::error::Error::source(&err)
            .and_then(|s| s.downcast_ref::<StorageError>())
            .unwrap();
        assert_eq!(source.kind, StorageErrorKind::Unavailable);
    }

    #[test]
    fn test_address_appends_suffix() {
        let resolver = resolver(MockStorage::new());

        assert_eq!(resolver.address("Items/Troll Leather"), "Items/Troll Leather.md");
    }
}
