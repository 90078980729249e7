//! Static site renderer
//!
//! Writes `archive.html` and one `article-<n>.html` per record into the site
//! directory. Records are shown newest first; undated ones go last. Image
//! references point into `images/<bucket>/` next to the pages, using the same
//! file names the downloader writes.

mod pages;

pub use pages::{archive_page, article_file_name, article_page, local_image_src};

use crate::config::FileNaming;
use crate::model::{ArticleRecord, Collection};
use crate::HarvestError;
use std::fs;
use std::path::Path;

/// Records in display order: newest first, undated last, ties in collection order
pub fn display_order(collection: &Collection) -> Vec<&ArticleRecord> {
    let mut records: Vec<&ArticleRecord> = collection.iter().collect();
    records.sort_by(|a, b| b.stub.date.cmp(&a.stub.date));
    records
}

/// Renders the whole site into `site_dir`; returns the number of article pages
pub fn render_site(
    collection: &Collection,
    site_dir: &Path,
    naming: FileNaming,
) -> Result<usize, HarvestError> {
    fs::create_dir_all(site_dir)?;

    let records = display_order(collection);

    for (index, record) in records.iter().enumerate() {
        let markup = article_page(record, naming).map_err(|e| {
            HarvestError::Render(format!("article {}: {}", record.link(), e))
        })?;
        fs::write(site_dir.join(article_file_name(index + 1)), markup.into_string())?;
    }

    let archive = archive_page(&records, naming);
    fs::write(site_dir.join("archive.html"), archive.into_string())?;

    tracing::info!(
        "Rendered archive and {} article pages into {}",
        records.len(),
        site_dir.display()
    );

    Ok(records.len())
}
