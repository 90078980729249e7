//! JSON file implementation of the collection store

use crate::model::Collection;
use crate::storage::traits::{CollectionStore, LoadedCollection, StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Collection store backed by a durable JSON file and a staging sibling
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    durable: PathBuf,
    staging: PathBuf,
}

/// Staging path for a durable file: `articles.json` → `articles.tmp.json`
pub fn staging_path_for(durable: &Path) -> PathBuf {
    let stem = durable
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match durable.extension() {
        Some(ext) => format!("{}.tmp.{}", stem, ext.to_string_lossy()),
        None => format!("{}.tmp", stem),
    };

    durable.with_file_name(name)
}

impl JsonFileStore {
    pub fn new(durable: impl Into<PathBuf>) -> Self {
        let durable = durable.into();
        let staging = staging_path_for(&durable);
        Self { durable, staging }
    }

    pub fn durable_path(&self) -> &Path {
        &self.durable
    }

    pub fn staging_path(&self) -> &Path {
        &self.staging
    }

    fn read(path: &Path) -> StorageResult<Collection> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::Missing(path.to_path_buf()))
            }
            Err(e) => return Err(StorageError::io(path, e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Serialization {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parent_dir(&self) -> PathBuf {
        match self.durable.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Flushes the directory entry so a completed rename survives a crash
    #[cfg(unix)]
    fn sync_dir(&self) -> StorageResult<()> {
        let dir = self.parent_dir();
        File::open(&dir)
            .and_then(|handle| handle.sync_all())
            .map_err(|e| StorageError::io(dir, e))
    }

    #[cfg(not(unix))]
    fn sync_dir(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl CollectionStore for JsonFileStore {
    fn load(&self) -> StorageResult<Collection> {
        Self::read(&self.durable)
    }

    fn load_resumable(&self) -> StorageResult<LoadedCollection> {
        match Self::read(&self.staging) {
            Ok(collection) => {
                tracing::info!(
                    "Resuming from staging file {} ({} articles)",
                    self.staging.display(),
                    collection.len()
                );
                return Ok(LoadedCollection {
                    collection,
                    resumed: true,
                });
            }
            Err(StorageError::Missing(_)) => {}
            Err(e) => {
                tracing::warn!("Ignoring unusable staging file: {}", e);
            }
        }

        Ok(LoadedCollection {
            collection: self.load()?,
            resumed: false,
        })
    }

    fn stage(&self, collection: &Collection) -> StorageResult<()> {
        let json = serde_json::to_vec_pretty(collection).map_err(|source| {
            StorageError::Serialization {
                path: self.staging.clone(),
                source,
            }
        })?;

        fs::create_dir_all(self.parent_dir()).map_err(|e| StorageError::io(self.parent_dir(), e))?;

        let mut file = File::create(&self.staging).map_err(|e| StorageError::io(&self.staging, e))?;
        file.write_all(&json)
            .and_then(|_| file.sync_all())
            .map_err(|e| StorageError::io(&self.staging, e))?;

        tracing::debug!("Staged {} articles to {}", collection.len(), self.staging.display());
        Ok(())
    }

    fn commit(&self) -> StorageResult<()> {
        fs::rename(&self.staging, &self.durable).map_err(|e| StorageError::io(&self.durable, e))?;
        self.sync_dir()?;

        tracing::info!("Committed collection to {}", self.durable.display());
        Ok(())
    }

    fn discard_staging(&self) -> StorageResult<()> {
        match fs::remove_file(&self.staging) {
            Ok(()) => {
                tracing::debug!("Discarded staging file {}", self.staging.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&self.staging, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArticleStub;
    use tempfile::TempDir;

    fn collection(links: &[&str]) -> Collection {
        Collection::from_stubs(
            links
                .iter()
                .map(|link| ArticleStub {
                    title: link.to_string(),
                    link: link.to_string(),
                    date: None,
                    lead_image: None,
                })
                .collect(),
        )
    }

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("articles.json"))
    }

    #[test]
    fn test_staging_path_for() {
        assert_eq!(
            staging_path_for(Path::new("data/articles.json")),
            PathBuf::from("data/articles.tmp.json")
        );
        assert_eq!(
            staging_path_for(Path::new("articles")),
            PathBuf::from("articles.tmp")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(!store.durable_path().is_file());
        assert!(matches!(store.load(), Err(StorageError::Missing(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let articles = collection(&["https://example.com/a", "https://example.com/b"]);

        store.save(&articles).unwrap();

        assert_eq!(store.load().unwrap(), articles);
        assert!(!store.staging_path().exists());
    }

    #[test]
    fn test_uncommitted_stage_leaves_durable_intact() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&collection(&["https://example.com/a"])).unwrap();
        let before = fs::read(store.durable_path()).unwrap();

        // Process dies between stage and commit
        store
            .stage(&collection(&["https://example.com/a", "https://example.com/b"]))
            .unwrap();

        assert_eq!(fs::read(store.durable_path()).unwrap(), before);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_load_resumable_prefers_staging() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&collection(&["https://example.com/a"])).unwrap();
        store
            .stage(&collection(&["https://example.com/a", "https://example.com/b"]))
            .unwrap();

        let loaded = store.load_resumable().unwrap();

        assert!(loaded.resumed);
        assert_eq!(loaded.collection.len(), 2);
    }

    #[test]
    fn test_load_resumable_ignores_corrupt_staging() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&collection(&["https://example.com/a"])).unwrap();
        fs::write(store.staging_path(), b"[{\"title\": ").unwrap();

        let loaded = store.load_resumable().unwrap();

        assert!(!loaded.resumed);
        assert_eq!(loaded.collection.len(), 1);
    }

    #[test]
    fn test_malformed_durable_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.durable_path(), b"not json").unwrap();

        assert!(matches!(
            store.load(),
            Err(StorageError::Serialization { .. })
        ));
    }

    #[test]
    fn test_discard_staging_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.stage(&collection(&["https://example.com/a"])).unwrap();

        store.discard_staging().unwrap();
        store.discard_staging().unwrap();

        assert!(!store.staging_path().exists());
    }

    #[test]
    fn test_stage_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/data/articles.json"));

        store.save(&collection(&["https://example.com/a"])).unwrap();

        assert!(store.durable_path().is_file());
    }
}
