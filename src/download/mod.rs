//! Image download queue manager
//!
//! Mirrors every image referenced by the collection into
//! `<image-dir>/<YYYY-MM-DD>/<filename>`. The run is best effort: missing
//! images are counted in the [`DownloadReport`], and only the inability to
//! create the bucket directories aborts it.

mod executor;
mod naming;
mod queue;

pub use executor::{
    backoff_delay, DownloadExecutor, ExecutionReport, BATCH_DELAY, BATCH_SIZE, MAX_ATTEMPTS,
    RETRY_BASE_DELAY,
};
pub use naming::{image_filename, image_path, url_segment};
pub use queue::{plan_downloads, DownloadPlan, DownloadTask};

use crate::config::FileNaming;
use crate::crawler::{Fetcher, Pacer};
use crate::model::Collection;
use crate::HarvestError;
use std::path::Path;

/// Counters for one download run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: usize,
    pub failed: usize,
    pub skipped_existing: usize,
    pub collisions: usize,
}

/// Downloads every image of `collection` not yet present under `image_dir`
pub async fn download_all<F: Fetcher, P: Pacer>(
    fetcher: &F,
    pacer: &P,
    collection: &Collection,
    image_dir: &Path,
    naming: FileNaming,
) -> Result<DownloadReport, HarvestError> {
    let plan = plan_downloads(collection, image_dir, naming)?;
    let executed = DownloadExecutor::new(fetcher, pacer)
        .execute(&plan.tasks)
        .await;

    let report = DownloadReport {
        downloaded: executed.downloaded,
        failed: executed.failed,
        skipped_existing: plan.skipped_existing,
        collisions: plan.collisions,
    };

    tracing::info!(
        "Downloads finished: {} downloaded, {} failed, {} skipped",
        report.downloaded,
        report.failed,
        report.skipped_existing
    );

    Ok(report)
}
