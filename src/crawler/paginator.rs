//! Paginated index crawl
//!
//! Walks the archive index page by page, one request in flight at a time,
//! until a page no longer links to a successor.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::pacing::Pacer;
use crate::model::ArticleStub;
use crate::site::SiteAdapter;
use crate::HarvestError;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Fixed delay between successive index page fetches
pub const PAGE_DELAY: Duration = Duration::from_secs(1);

/// Outcome of a completed crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Stubs in page-then-document order
    pub stubs: Vec<ArticleStub>,

    /// Number of index pages fetched
    pub pages: usize,
}

/// Drives the listing parser across the paginated index
pub struct Paginator<'a, F, P, A> {
    fetcher: &'a F,
    pacer: &'a P,
    adapter: &'a A,
}

impl<'a, F: Fetcher, P: Pacer, A: SiteAdapter> Paginator<'a, F, P, A> {
    pub fn new(fetcher: &'a F, pacer: &'a P, adapter: &'a A) -> Self {
        Self {
            fetcher,
            pacer,
            adapter,
        }
    }

    /// Crawls from `start_url` until no next-page link remains
    ///
    /// Any fetch error aborts the crawl.
    pub async fn crawl(&self, start_url: &str) -> Result<CrawlOutcome, HarvestError> {
        let mut outcome = CrawlOutcome::default();
        let mut visited = HashSet::new();
        let mut current = Some(start_url.to_string());

        while let Some(url) = current.take() {
            if !visited.insert(url.clone()) {
                tracing::warn!("Index page {} already visited, stopping pagination", url);
                break;
            }

            if outcome.pages > 0 {
                self.pacer.pause(PAGE_DELAY).await;
            }

            outcome.pages += 1;
            tracing::info!("Fetching index page {}: {}", outcome.pages, url);

            let page_url = Url::parse(&url)?;
            let body = self.fetcher.fetch_text(&url).await?;
            let page = self.adapter.parse_listing(&body, &page_url);

            tracing::info!("Found {} articles on page {}", page.stubs.len(), outcome.pages);
            outcome.stubs.extend(page.stubs);
            current = page.next_page;
        }

        tracing::info!(
            "Crawl finished: {} articles across {} pages",
            outcome.stubs.len(),
            outcome.pages
        );

        Ok(outcome)
    }
}
