//! Data model shared by every pipeline stage
//!
//! The crawler produces [`ArticleStub`]s, the enrichment driver turns them into
//! [`ArticleRecord`]s, and the whole ordered [`Collection`] is the only durable
//! state of a run.

mod article;
mod content;

pub use article::{ArticleDetails, ArticleRecord, ArticleStub, Collection, UNDATED_BUCKET};
pub use content::ContentNode;
