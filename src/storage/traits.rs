//! Storage traits and error types
//!
//! This module defines the checkpoint/commit protocol every collection store
//! implements and the errors it can raise.

use crate::model::Collection;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed collection file {}: {source}", .path.display())]
    Serialization {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Collection file not found: {}", .0.display())]
    Missing(PathBuf),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A collection loaded at the start of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCollection {
    pub collection: Collection,

    /// True when the collection came from a staging file left by an
    /// interrupted run
    pub resumed: bool,
}

/// Durable home of the article collection
///
/// Writers never touch the durable copy directly. They `stage` the whole
/// collection as often as they like and `commit` once, which replaces the
/// durable copy in a single rename. A crash at any point leaves either the
/// old or the new durable copy, never a partial one.
pub trait CollectionStore: Send + Sync {
    /// Reads the durable collection
    ///
    /// Fails with [`StorageError::Missing`] when it does not exist.
    fn load(&self) -> StorageResult<Collection>;

    /// Reads the staging copy if a usable one exists, else the durable one
    fn load_resumable(&self) -> StorageResult<LoadedCollection>;

    /// Writes the full collection to the staging copy and flushes it to disk
    fn stage(&self, collection: &Collection) -> StorageResult<()>;

    /// Atomically replaces the durable copy with the staging copy
    fn commit(&self) -> StorageResult<()>;

    /// Removes the staging copy, if any
    fn discard_staging(&self) -> StorageResult<()>;

    /// Stages and commits in one step
    fn save(&self, collection: &Collection) -> StorageResult<()> {
        self.stage(collection)?;
        self.commit()
    }
}
