//! Storage abstraction for the Lore wiki.
//!
//! This crate provides a [`Storage`] trait that hides where the structure
//! document and the markdown content documents live. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (filesystem today, anything addressable tomorrow)
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `read()`, `exists()`, `address()` and `structure()`
//! - [`FsStorage`] implementation for filesystem backends
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use lore_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("wiki"), PathBuf::from("Wiki-Structure.json"));
//! let text = storage.read("Skills/Mining")?;
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};
