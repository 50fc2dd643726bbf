//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading the structure document and content
//! documents from the local filesystem.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Default suffix appended to a logical path.
const DEFAULT_SUFFIX: &str = ".md";

/// Filesystem storage implementation.
///
/// Content for logical path `P` lives at `<source_dir>/<P><suffix>`. The
/// structure document is a separate file anywhere on disk.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use lore_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("wiki"), PathBuf::from("Wiki-Structure.json"))
///     .with_suffix(".md");
/// assert_eq!(storage.address("Skills/Mining"), "Skills/Mining.md");
/// ```
#[derive(Debug)]
pub struct FsStorage {
    /// Root directory for content documents.
    source_dir: PathBuf,
    /// Location of the structure document.
    structure_path: PathBuf,
    /// Suffix appended to logical paths.
    suffix: String,
}

impl FsStorage {
    /// Create a new filesystem storage using the `.md` suffix.
    #[must_use]
    pub fn new(source_dir: PathBuf, structure_path: PathBuf) -> Self {
        Self {
            source_dir,
            structure_path,
            suffix: DEFAULT_SUFFIX.to_owned(),
        }
    }

    /// Use a different content suffix (e.g. `.markdown`).
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Root directory for content documents.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Validate that a logical path stays inside the source directory.
    ///
    /// Rejects empty paths, absolute paths and `..` components so a link like
    /// `../../etc/passwd` can never leave the wiki.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        let escapes = Path::new(path).components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });

        if path.trim().is_empty() || escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Resolve a logical path to a file inside the source directory.
    fn file_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        Self::validate_path(path)?;
        Ok(self.source_dir.join(self.address(path)))
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        let file = self.file_path(path)?;
        tracing::debug!(path, file = %file.display(), "Reading content document");
        fs::read_to_string(&file)
            .map_err(|e| StorageError::io(e, file).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.file_path(path).is_ok_and(|file| file.is_file())
    }

    fn address(&self, path: &str) -> String {
        format!("{path}{}", self.suffix)
    }

    fn structure(&self) -> Result<String, StorageError> {
        fs::read_to_string(&self.structure_path).map_err(|e| {
            StorageError::io(e, self.structure_path.clone()).with_backend(BACKEND)
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn create_storage() -> (TempDir, FsStorage) {
        let temp_dir = tempfile::tempdir().unwrap();
        let source_dir = temp_dir.path().join("wiki");
        fs::create_dir_all(source_dir.join("Skills")).unwrap();
        fs::write(source_dir.join("Skills/Mining.md"), "# Mining\n").unwrap();
        fs::write(source_dir.join("Skills/Troll Leather.md"), "# Troll Leather\n").unwrap();
        fs::write(
            temp_dir.path().join("Wiki-Structure.json"),
            r#"{"Skills": {"items": ["Mining"]}}"#,
        )
        .unwrap();

        let storage = FsStorage::new(source_dir, temp_dir.path().join("Wiki-Structure.json"));
        (temp_dir, storage)
    }

    #[test]
    fn test_read_existing_document() {
        let (_temp_dir, storage) = create_storage();

        assert_eq!(storage.read("Skills/Mining").unwrap(), "# Mining\n");
    }

    #[test]
    fn test_read_path_with_spaces() {
        let (_temp_dir, storage) = create_storage();

        assert_eq!(
            storage.read("Skills/Troll Leather").unwrap(),
            "# Troll Leather\n"
        );
    }

    #[test]
    fn test_read_missing_document_is_not_found() {
        let (_temp_dir, storage) = create_storage();

        let err = storage.read("Nonexistent/Page").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_read_rejects_parent_traversal() {
        let (_temp_dir, storage) = create_storage();

        let err = storage.read("../Wiki-Structure").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_read_rejects_absolute_path() {
        let (_temp_dir, storage) = create_storage();

        let err = storage.read("/etc/passwd").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_read_rejects_empty_path() {
        let (_temp_dir, storage) = create_storage();

        assert_eq!(
            storage.read("").unwrap_err().kind,
            StorageErrorKind::InvalidPath
        );
    }

    #[test]
    fn test_exists() {
        let (_temp_dir, storage) = create_storage();

        assert!(storage.exists("Skills/Mining"));
        assert!(!storage.exists("Skills/Fishing"));
        assert!(!storage.exists("../Wiki-Structure"));
        // Directories are not documents
        assert!(!storage.exists("Skills"));
    }

    #[test]
    fn test_address_appends_suffix() {
        let (_temp_dir, storage) = create_storage();

        assert_eq!(storage.address("Skills/Mining"), "Skills/Mining.md");
    }

    #[test]
    fn test_custom_suffix() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("Guide.markdown"), "text").unwrap();
        let storage = FsStorage::new(
            temp_dir.path().to_path_buf(),
            temp_dir.path().join("tree.json"),
        )
        .with_suffix(".markdown");

        assert_eq!(storage.address("Guide"), "Guide.markdown");
        assert_eq!(storage.read("Guide").unwrap(), "text");
    }

    #[test]
    fn test_structure() {
        let (_temp_dir, storage) = create_storage();

        assert!(storage.structure().unwrap().contains("Skills"));
    }

    #[test]
    fn test_structure_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(
            temp_dir.path().to_path_buf(),
            temp_dir.path().join("missing.json"),
        );

        assert_eq!(
            storage.structure().unwrap_err().kind,
            StorageErrorKind::NotFound
        );
    }
}
