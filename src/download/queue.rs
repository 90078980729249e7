//! Download queue construction
//!
//! Turns the image lists of a collection into a flat queue of tasks. Files
//! already on disk are never queued, so re-running the downloader only fetches
//! what is missing.

use crate::config::FileNaming;
use crate::download::naming::image_path;
use crate::model::Collection;
use crate::HarvestError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One image to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,
    pub destination: PathBuf,
}

/// The queue for one run plus what was left out of it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadPlan {
    pub tasks: Vec<DownloadTask>,

    /// Destinations already present on disk
    pub skipped_existing: usize,

    /// Distinct URLs whose destination was claimed by an earlier URL
    pub collisions: usize,
}

/// Builds the download queue for `collection`
///
/// Creates every date bucket directory that receives images. Fails only when
/// a directory cannot be created.
pub fn plan_downloads(
    collection: &Collection,
    image_dir: &Path,
    naming: FileNaming,
) -> Result<DownloadPlan, HarvestError> {
    let mut plan = DownloadPlan::default();
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();

    for record in collection.iter().filter(|r| !r.images.is_empty()) {
        let bucket = record.stub.date_bucket();
        fs::create_dir_all(image_dir.join(&bucket))?;

        for url in &record.images {
            let destination = image_path(image_dir, &bucket, url, naming);

            if let Some(owner) = claimed.get(&destination) {
                if *owner != url.as_str() {
                    plan.collisions += 1;
                    tracing::warn!(
                        "Skipping {}: {} is already taken by {}",
                        url,
                        destination.display(),
                        owner
                    );
                }
                continue;
            }
            claimed.insert(destination.clone(), url);

            if destination.exists() {
                tracing::debug!("Skipping {} (already exists)", url);
                plan.skipped_existing += 1;
                continue;
            }

            plan.tasks.push(DownloadTask {
                url: url.clone(),
                destination,
            });
        }
    }

    tracing::info!(
        "Queued {} images ({} already present, {} collisions)",
        plan.tasks.len(),
        plan.skipped_existing,
        plan.collisions
    );

    Ok(plan)
}
