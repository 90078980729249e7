//! Crawler module for fetching and walking the article index
//!
//! This module contains the network-facing half of the pipeline:
//! - HTTP fetching with the injected request configuration
//! - Pacing of every fixed delay between requests
//! - The paginated index crawl that discovers article stubs
//! - Merging the discovered stubs into the stored collection

mod fetcher;
mod merge;
mod pacing;
mod paginator;

pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use merge::{merge_crawl, MergeReport};
pub use pacing::{InstantPacer, Pacer, TokioPacer};
pub use paginator::{CrawlOutcome, Paginator, PAGE_DELAY};

use crate::site::SiteAdapter;
use crate::HarvestError;

/// Crawls the index from `start_url` and returns every stub found
///
/// Convenience entry point over [`Paginator`].
pub async fn crawl<F, P, A>(
    fetcher: &F,
    pacer: &P,
    adapter: &A,
    start_url: &str,
) -> Result<CrawlOutcome, HarvestError>
where
    F: Fetcher,
    P: Pacer,
    A: SiteAdapter,
{
    Paginator::new(fetcher, pacer, adapter).crawl(start_url).await
}
