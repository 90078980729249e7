//! Enrichment driver
//!
//! Walks the collection in order and fills in the body-derived fields of every
//! record that is not enriched yet (or every record when forced). Each article
//! is fetched and extracted on its own: a failure is logged and the walk moves
//! on. After every processed article the whole collection is staged, so an
//! interrupted run can pick up where it stopped.

use crate::crawler::{Fetcher, Pacer};
use crate::model::{ArticleDetails, Collection};
use crate::site::SiteAdapter;
use crate::storage::{CollectionStore, LoadedCollection};
use crate::HarvestError;
use std::time::Duration;
use url::Url;

/// Fixed delay between successive detail page fetches
pub const DETAIL_DELAY: Duration = Duration::from_millis(250);

/// Counters for one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub updated: usize,
    pub failed: usize,
    pub skipped: usize,

    /// Whether the pass continued from an interrupted run's staging file
    pub resumed: bool,

    /// Whether the durable collection was replaced
    pub committed: bool,
}

pub struct EnrichmentDriver<'a, F, P, A, S> {
    fetcher: &'a F,
    pacer: &'a P,
    adapter: &'a A,
    store: &'a S,
}

impl<'a, F, P, A, S> EnrichmentDriver<'a, F, P, A, S>
where
    F: Fetcher,
    P: Pacer,
    A: SiteAdapter,
    S: CollectionStore,
{
    pub fn new(fetcher: &'a F, pacer: &'a P, adapter: &'a A, store: &'a S) -> Self {
        Self {
            fetcher,
            pacer,
            adapter,
            store,
        }
    }

    /// Loads the collection, enriches it and commits the result
    ///
    /// The durable file is only replaced when this pass updated at least one
    /// record or continued an interrupted run; otherwise it is left untouched
    /// byte for byte.
    pub async fn run(&self, force: bool) -> Result<EnrichReport, HarvestError> {
        let LoadedCollection {
            mut collection,
            resumed,
        } = self.store.load_resumable()?;

        let mut report = self.enrich(&mut collection, force).await?;
        report.resumed = resumed;

        if report.updated > 0 || resumed {
            if report.updated == 0 {
                // Nothing new was staged; make sure the staging copy matches
                // what was loaded before renaming it
                self.store.stage(&collection)?;
            }
            self.store.commit()?;
            report.committed = true;
        } else {
            self.store.discard_staging()?;
        }

        Ok(report)
    }

    /// Enriches `collection` in place, staging it after every processed record
    ///
    /// Only a staging failure ends the pass early.
    pub async fn enrich(
        &self,
        collection: &mut Collection,
        force: bool,
    ) -> Result<EnrichReport, HarvestError> {
        let mut report = EnrichReport::default();
        let pending = collection
            .iter()
            .filter(|record| force || !record.is_enriched())
            .count();

        tracing::info!(
            "Enriching {} of {} articles{}",
            pending,
            collection.len(),
            if force { " (forced)" } else { "" }
        );

        let mut processed = 0;
        for index in 0..collection.len() {
            let record = &collection.records()[index];
            if !force && record.is_enriched() {
                tracing::debug!("Skipping enriched article {}", record.link());
                report.skipped += 1;
                continue;
            }

            if processed > 0 {
                self.pacer.pause(DETAIL_DELAY).await;
            }

            let link = record.link().to_string();
            tracing::info!("Enriching {}", record.title());

            match self.fetch_details(&link).await {
                Ok(details) => {
                    tracing::debug!(
                        "Extracted {} content nodes and {} images from {}",
                        details.content.len(),
                        details.images.len(),
                        link
                    );
                    collection.records_mut()[index].apply_details(details);
                    report.updated += 1;
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        "Failed to enrich {}: {} ({} remaining)",
                        link,
                        e,
                        pending - processed - 1
                    );
                }
            }

            processed += 1;
            self.store.stage(collection)?;
        }

        tracing::info!(
            "Enrichment finished: {} updated, {} failed, {} skipped",
            report.updated,
            report.failed,
            report.skipped
        );

        Ok(report)
    }

    async fn fetch_details(&self, link: &str) -> Result<ArticleDetails, HarvestError> {
        let url = Url::parse(link)?;
        let body = self.fetcher.fetch_text(link).await?;
        Ok(self.adapter.parse_article(&body, &url))
    }
}
