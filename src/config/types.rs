use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

/// Where the crawl starts
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// First index page of the paginated archive
    #[serde(rename = "start-url")]
    pub start_url: String,
}

/// Request settings threaded into every fetch
#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cookies sent with every request. The defaults get past the origin's
    /// consent wall.
    #[serde(default = "default_cookies")]
    pub cookies: BTreeMap<String, String>,
}

impl RequestConfig {
    /// Formats the cookies as a single `Cookie` header value
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            cookies: default_cookies(),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Durable collection file; the staging file lives next to it
    #[serde(rename = "collection-path", default = "default_collection_path")]
    pub collection_path: PathBuf,

    /// Root of the date-bucketed image store
    #[serde(rename = "image-dir", default = "default_image_dir")]
    pub image_dir: PathBuf,

    /// Directory receiving the rendered HTML pages
    #[serde(rename = "site-dir", default = "default_site_dir")]
    pub site_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            collection_path: default_collection_path(),
            image_dir: default_image_dir(),
            site_dir: default_site_dir(),
        }
    }
}

/// Image download settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadConfig {
    #[serde(rename = "file-naming", default)]
    pub file_naming: FileNaming,
}

/// How image URLs map to filenames in the image store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileNaming {
    /// Last path segment of the URL, query stripped
    #[default]
    Original,

    /// Last path segment prefixed with a short hash of the full URL
    HashQualified,
}

fn default_user_agent() -> String {
    format!("photoblog-harvester/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cookies() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("DSGVO_ZUSAGE_V1".to_string(), "true".to_string()),
        ("tcfs".to_string(), "1".to_string()),
    ])
}

fn default_collection_path() -> PathBuf {
    PathBuf::from("articles.json")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("output/images")
}

fn default_site_dir() -> PathBuf {
    PathBuf::from("output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cookie_header() {
        let request = RequestConfig::default();
        assert_eq!(
            request.cookie_header(),
            Some("DSGVO_ZUSAGE_V1=true; tcfs=1".to_string())
        );
    }

    #[test]
    fn test_empty_cookies_produce_no_header() {
        let request = RequestConfig {
            cookies: BTreeMap::new(),
            ..RequestConfig::default()
        };
        assert_eq!(request.cookie_header(), None);
    }
}
