//! Local file names for remote images
//!
//! The downloader and the renderer both go through [`image_path`], so a page
//! always links to the file the downloader wrote.

use crate::config::FileNaming;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Last path segment of `url` with query and fragment removed
///
/// Returns `None` when the segment is empty or would escape its directory.
pub fn url_segment(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    let segment = without_query.rsplit('/').next().unwrap_or_default();

    match segment {
        "" | "." | ".." => None,
        s if s.contains('\\') => None,
        s => Some(s),
    }
}

/// First eight hex digits of the URL's SHA-256
fn short_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(&digest[..4])
}

/// File name under which the image at `url` is stored
pub fn image_filename(url: &str, naming: FileNaming) -> String {
    match (url_segment(url), naming) {
        (Some(segment), FileNaming::Original) => segment.to_string(),
        (Some(segment), FileNaming::HashQualified) => {
            format!("{}-{}", short_hash(url), segment)
        }
        (None, _) => format!("image-{}", short_hash(url)),
    }
}

/// Destination of the image at `url` inside the date bucket `bucket`
pub fn image_path(image_dir: &Path, bucket: &str, url: &str, naming: FileNaming) -> PathBuf {
    image_dir.join(bucket).join(image_filename(url, naming))
}
