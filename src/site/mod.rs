//! Site adapters: everything that knows the origin's markup
//!
//! The crawl, enrichment and download stages never touch selectors directly.
//! They go through a [`SiteAdapter`], which exposes the four extraction
//! operations of the pipeline:
//!
//! | Operation | Used by |
//! |-----------|---------|
//! | [`SiteAdapter::extract_stubs`] | listing parser |
//! | [`SiteAdapter::extract_next_link`] | listing parser |
//! | [`SiteAdapter::extract_body`] | detail extractor |
//! | [`SiteAdapter::extract_byline`] | detail extractor |
//!
//! Parsing happens inside synchronous helpers ([`SiteAdapter::parse_listing`],
//! [`SiteAdapter::parse_article`]) so the non-`Send` DOM never lives across an
//! await point.

mod standard;
pub mod text;

pub use standard::StandardAdapter;

use crate::model::{ArticleDetails, ArticleStub, ContentNode};
use scraper::Html;
use url::Url;

/// Result of parsing one index page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub stubs: Vec<ArticleStub>,

    /// Absolute URL of the following index page, if any
    pub next_page: Option<String>,
}

/// Body-derived fields of an article page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleBody {
    /// Every image under the body, deduplicated, first occurrence first
    pub images: Vec<String>,

    /// Ordered text and image nodes
    pub content: Vec<ContentNode>,

    /// Body container inner markup, verbatim
    pub raw_body_html: String,
}

/// Summary fields of an article page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Byline {
    pub teaser: String,
    pub author: Option<String>,
}

/// Markup-specific extraction for one news site
///
/// None of the operations fail: missing elements resolve to empty or absent
/// values.
pub trait SiteAdapter: Send + Sync {
    /// Extracts every article stub on an index page, in document order
    fn extract_stubs(&self, document: &Html, page_url: &Url) -> Vec<ArticleStub>;

    /// Finds the link to the next index page
    fn extract_next_link(&self, document: &Html, page_url: &Url) -> Option<String>;

    /// Walks the article body into ordered content nodes
    fn extract_body(&self, document: &Html, article_url: &Url) -> ArticleBody;

    /// Extracts teaser text and author
    fn extract_byline(&self, document: &Html) -> Byline;

    /// Parses an index page into stubs and the next-page link
    fn parse_listing(&self, html: &str, page_url: &Url) -> ListingPage {
        let document = Html::parse_document(html);
        ListingPage {
            stubs: self.extract_stubs(&document, page_url),
            next_page: self.extract_next_link(&document, page_url),
        }
    }

    /// Parses an article page into its enrichment fields
    fn parse_article(&self, html: &str, article_url: &Url) -> ArticleDetails {
        let document = Html::parse_document(html);
        let body = self.extract_body(&document, article_url);
        let byline = self.extract_byline(&document);

        ArticleDetails {
            images: body.images,
            content: body.content,
            raw_body_html: body.raw_body_html,
            teaser: byline.teaser,
            author: byline.author,
        }
    }
}
