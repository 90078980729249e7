//! Batched download execution with retry
//!
//! Tasks run [`BATCH_SIZE`] at a time. A batch finishes completely before the
//! next one starts, and every image gets up to [`MAX_ATTEMPTS`] tries with
//! exponential backoff. Payloads are written to `<dest>.tmp` first and renamed
//! into place, so a destination file is either absent or complete.

use crate::crawler::{Fetcher, Pacer};
use crate::download::queue::DownloadTask;
use crate::HarvestError;
use futures::future::join_all;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Concurrent downloads per batch
pub const BATCH_SIZE: usize = 5;

/// Pause between consecutive batches
pub const BATCH_DELAY: Duration = Duration::from_millis(500);

/// Tries per image before giving up
pub const MAX_ATTEMPTS: u32 = 3;

/// Backoff after the first failed attempt; doubles after each further one
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);

/// Delay before the attempt following failed attempt number `attempt` (1-based)
pub fn backoff_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// `<dest>.tmp`
fn temp_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Outcome counters of one execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub downloaded: usize,
    pub failed: usize,
}

pub struct DownloadExecutor<'a, F, P> {
    fetcher: &'a F,
    pacer: &'a P,
}

impl<'a, F: Fetcher, P: Pacer> DownloadExecutor<'a, F, P> {
    pub fn new(fetcher: &'a F, pacer: &'a P) -> Self {
        Self { fetcher, pacer }
    }

    /// Runs every task; individual failures are counted, never returned
    pub async fn execute(&self, tasks: &[DownloadTask]) -> ExecutionReport {
        let total = tasks.len();
        let completed = &AtomicUsize::new(0);
        let mut report = ExecutionReport::default();

        let mut batches = tasks.chunks(BATCH_SIZE).peekable();
        while let Some(batch) = batches.next() {
            let results = join_all(batch.iter().map(|task| async move {
                let ok = self.download(task).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::info!("Progress: {}/{}", done, total);
                ok
            }))
            .await;

            for ok in results {
                if ok {
                    report.downloaded += 1;
                } else {
                    report.failed += 1;
                }
            }

            if batches.peek().is_some() {
                self.pacer.pause(BATCH_DELAY).await;
            }
        }

        report
    }

    /// Downloads one task with retries; returns whether it succeeded
    async fn download(&self, task: &DownloadTask) -> bool {
        tracing::info!("Downloading {}", task.url);

        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(task).await {
                Ok(()) => return true,
                Err(e) if attempt == MAX_ATTEMPTS => {
                    tracing::warn!(
                        "Failed to download {} after {} attempts: {}",
                        task.url,
                        MAX_ATTEMPTS,
                        e
                    );
                }
                Err(e) => {
                    let delay = backoff_delay(attempt);
                    tracing::debug!(
                        "Attempt {} for {} failed ({}), retrying in {:?}",
                        attempt,
                        task.url,
                        e,
                        delay
                    );
                    self.pacer.pause(delay).await;
                }
            }
        }

        false
    }

    async fn attempt(&self, task: &DownloadTask) -> Result<(), HarvestError> {
        let bytes = self.fetcher.fetch_bytes(&task.url).await?;
        let tmp = temp_path(&task.destination);

        let written = async {
            tokio::fs::write(&tmp, &bytes).await?;
            tokio::fs::rename(&tmp, &task.destination).await
        }
        .await;

        if written.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }

        written.map_err(HarvestError::from)
    }
}
