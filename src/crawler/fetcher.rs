//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of the pipeline:
//! - Building the HTTP client from the injected [`RequestConfig`]
//!   (user agent, timeout, consent cookies)
//! - GET requests returning page text or image bytes
//! - Error classification (timeout, transport, non-success status)

use crate::config::RequestConfig;
use crate::{ConfigError, HarvestError};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Response};
use std::future::Future;
use std::time::Duration;

/// Source of page and image payloads
///
/// Every stage fetches through this trait so tests can substitute canned
/// responses for the network.
pub trait Fetcher: Send + Sync {
    /// Fetches a document and returns its body as text
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String, HarvestError>> + Send;

    /// Fetches a binary payload such as an image
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HarvestError>> + Send;
}

/// Builds an HTTP client carrying the configured request settings
///
/// The cookies are installed as a default `Cookie` header so every request,
/// listing page, detail page or image, passes the origin's consent wall.
///
/// # Example
///
/// ```no_run
/// use photoblog_harvester::config::RequestConfig;
/// use photoblog_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&RequestConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &RequestConfig) -> Result<Client, HarvestError> {
    let mut headers = HeaderMap::new();

    if let Some(cookie) = config.cookie_header() {
        let value = HeaderValue::from_str(&cookie).map_err(|e| {
            ConfigError::Validation(format!("cookies do not form a valid header: {}", e))
        })?;
        headers.insert(COOKIE, value);
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(HarvestError::from)
}

/// Reqwest-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &RequestConfig) -> Result<Self, HarvestError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Sends a GET request and rejects non-success statuses
    async fn get(&self, url: &str) -> Result<Response, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, HarvestError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| classify_error(url, e))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, HarvestError> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await.map_err(|e| classify_error(url, e))?;
        Ok(bytes.to_vec())
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> HarvestError {
    if error.is_timeout() {
        HarvestError::Timeout {
            url: url.to_string(),
        }
    } else {
        HarvestError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
