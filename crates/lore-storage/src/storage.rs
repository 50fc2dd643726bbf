//! Storage trait and error types.
//!
//! # Logical Path Convention
//!
//! All path parameters in Storage methods are **logical paths**, not file paths:
//! - `"Skills"` - top-level category
//! - `"Skills/Mining"` - item inside a category
//! - `"Items/Weapons/Swords"` - item inside a nested subcategory
//!
//! Storage implementations derive the content address from the logical path
//! by appending their content suffix.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// What went wrong, independent of the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// The document is not there. Normal for unwritten pages.
    NotFound,
    /// The logical path cannot be mapped to an address.
    InvalidPath,
    /// The backend refused to serve the document.
    Unavailable,
    /// Anything else, see the source.
    Other,
}

impl StorageErrorKind {
    fn describe(self) -> &'static str {
        match self {
            Self::NotFound => "Not found",
            Self::InvalidPath => "Invalid path",
            Self::Unavailable => "Unavailable",
            Self::Other => "Error",
        }
    }
}

/// Error reading the structure document or a content document.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Address or file that failed.
    pub path: Option<PathBuf>,
    /// Backend name (`"Fs"`, `"Mock"`).
    pub backend: Option<&'static str>,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Missing document at `path`.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Failed file read. Only `NotFound` keeps its meaning; every other I/O
    /// failure is [`StorageErrorKind::Other`].
    #[must_use]
    pub fn io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        let kind = if err.kind() == io::ErrorKind::NotFound {
            StorageErrorKind::NotFound
        } else {
            StorageErrorKind::Other
        };
        Self::new(kind).with_path(path).with_source(err)
    }

    /// Whether this error means the document simply isn't there.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // [Fs] Not found: <source> (path: Skills/Mining.md)
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        f.write_str(self.kind.describe())?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|s| s as &(dyn Error + 'static))
    }
}

/// Storage abstraction for the structure document and content documents.
///
/// All path parameters are **logical paths** (`"Skills/Mining"`), never file
/// paths. The backend owns the mapping from logical path to content address.
pub trait Storage: Send + Sync {
    /// Read the raw markdown text of the content document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document doesn't exist or can't be read.
    /// A missing document is a normal condition and uses
    /// [`StorageErrorKind::NotFound`].
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Check if a content document exists at the given logical path.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;

    /// Content address derived from a logical path.
    ///
    /// Deterministic: the same logical path always yields the same address.
    fn address(&self, path: &str) -> String;

    /// Read the raw structure document (JSON).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document is missing or unreadable.
    fn structure(&self) -> Result<String, StorageError>;
}
