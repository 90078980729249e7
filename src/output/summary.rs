//! End-of-run summary
//!
//! Every command fills in the sections for the stages it ran; the summary is
//! printed to stdout once the run is over.

use crate::download::DownloadReport;
use crate::enrich::EnrichReport;
use chrono::{DateTime, Utc};

/// Counters of the index crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlCounts {
    pub pages: usize,
    pub articles_found: usize,
    pub articles_added: usize,
}

/// Everything a run reports at the end
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config_hash: String,
    pub crawl: Option<CrawlCounts>,
    pub enrich: Option<EnrichReport>,
    pub download: Option<DownloadReport>,
    pub rendered_pages: Option<usize>,
}

impl RunSummary {
    pub fn start(config_hash: impl Into<String>) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            config_hash: config_hash.into(),
            crawl: None,
            enrich: None,
            download: None,
            rendered_pages: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// True when any stage left work undone
    pub fn has_failures(&self) -> bool {
        self.enrich.map_or(false, |e| e.failed > 0)
            || self.download.map_or(false, |d| d.failed > 0)
    }
}

/// Formats the summary as plain text
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Run Summary ===\n\n");
    out.push_str(&format!("Config hash: {}\n", summary.config_hash));
    if let Some(seconds) = summary.duration_seconds() {
        out.push_str(&format!("Duration: {}s\n", seconds));
    }

    if let Some(crawl) = &summary.crawl {
        out.push_str("\nCrawl:\n");
        out.push_str(&format!("  Index pages fetched: {}\n", crawl.pages));
        out.push_str(&format!("  Articles found: {}\n", crawl.articles_found));
        out.push_str(&format!("  New articles: {}\n", crawl.articles_added));
    }

    if let Some(enrich) = &summary.enrich {
        out.push_str("\nEnrichment:\n");
        out.push_str(&format!("  Updated: {}\n", enrich.updated));
        out.push_str(&format!("  Failed: {}\n", enrich.failed));
        out.push_str(&format!("  Skipped (already enriched): {}\n", enrich.skipped));
        if enrich.resumed {
            out.push_str("  Resumed from an interrupted run\n");
        }
        out.push_str(&format!(
            "  Collection {}\n",
            if enrich.committed { "committed" } else { "unchanged" }
        ));
    }

    if let Some(download) = &summary.download {
        out.push_str("\nImages:\n");
        out.push_str(&format!("  Downloaded: {}\n", download.downloaded));
        out.push_str(&format!("  Failed: {}\n", download.failed));
        out.push_str(&format!("  Already present: {}\n", download.skipped_existing));
        if download.collisions > 0 {
            out.push_str(&format!("  Filename collisions: {}\n", download.collisions));
        }
    }

    if let Some(pages) = summary.rendered_pages {
        out.push_str("\nSite:\n");
        out.push_str(&format!("  Article pages rendered: {}\n", pages));
    }

    out
}

/// Prints the summary to stdout
pub fn print_summary(summary: &RunSummary) {
    print!("{}", format_summary(summary));
}
