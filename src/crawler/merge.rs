//! Folding a crawl's stubs into the stored collection

use crate::model::{ArticleStub, Collection};
use crate::storage::{CollectionStore, LoadedCollection, StorageError, StorageResult};

/// What a merge did to the stored collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub found: usize,
    pub added: usize,
    pub total: usize,

    /// Whether the merge started from an interrupted enrichment's staging file
    pub resumed: bool,
}

/// Merges `stubs` into the store's collection by link and commits the result
///
/// Starts from the staging copy when an interrupted enrichment left a usable
/// one, so its progress lands in the durable file instead of being
/// overwritten. A missing collection starts out empty.
pub fn merge_crawl<S: CollectionStore>(
    store: &S,
    stubs: Vec<ArticleStub>,
) -> StorageResult<MergeReport> {
    let LoadedCollection {
        mut collection,
        resumed,
    } = match store.load_resumable() {
        Ok(loaded) => loaded,
        Err(StorageError::Missing(path)) => {
            tracing::info!("No collection at {} yet, starting a new one", path.display());
            LoadedCollection {
                collection: Collection::default(),
                resumed: false,
            }
        }
        Err(e) => return Err(e),
    };

    let found = stubs.len();
    let added = collection.merge_stubs(stubs);
    store.save(&collection)?;

    tracing::info!("{} new articles, {} in collection", added, collection.len());

    Ok(MergeReport {
        found,
        added,
        total: collection.len(),
        resumed,
    })
}
