//! Storage module for persisting the article collection
//!
//! The collection lives in two JSON files next to each other:
//! - the durable file (`articles.json`), the only copy external readers use
//! - the staging file (`articles.tmp.json`), rewritten after every enriched
//!   article and renamed over the durable file at the end of a run

mod json_store;
mod traits;

pub use json_store::{staging_path_for, JsonFileStore};
pub use traits::{CollectionStore, LoadedCollection, StorageError, StorageResult};
