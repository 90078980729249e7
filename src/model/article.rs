//! Article stubs, enriched records and the collection that holds them

use crate::model::ContentNode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Bucket name used for records without a publication date
pub const UNDATED_BUCKET: &str = "undated";

/// An article as discovered on an index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleStub {
    pub title: String,

    /// Absolute article URL; the unique key of a record
    pub link: String,

    pub date: Option<DateTime<Utc>>,

    /// Teaser image shown on the index page
    #[serde(rename = "image")]
    pub lead_image: Option<String>,
}

impl ArticleStub {
    /// Calendar date (`YYYY-MM-DD`, UTC) used to group this article's images
    pub fn date_bucket(&self) -> String {
        match self.date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => UNDATED_BUCKET.to_string(),
        }
    }
}

/// Fields produced by the detail extractor for one article
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDetails {
    pub images: Vec<String>,
    pub content: Vec<ContentNode>,
    pub raw_body_html: String,
    pub teaser: String,
    pub author: Option<String>,
}

/// A stub plus its enrichment fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(flatten)]
    pub stub: ArticleStub,

    /// Unique image URLs in first-seen order
    #[serde(default)]
    pub images: Vec<String>,

    /// Canonical ordered body representation
    #[serde(default)]
    pub content: Vec<ContentNode>,

    /// Verbatim body markup, used when `content` is empty
    #[serde(rename = "text", default)]
    pub raw_body_html: Option<String>,

    #[serde(default)]
    pub teaser: Option<String>,

    #[serde(default)]
    pub author: Option<String>,
}

impl ArticleRecord {
    pub fn from_stub(stub: ArticleStub) -> Self {
        Self {
            stub,
            images: Vec::new(),
            content: Vec::new(),
            raw_body_html: None,
            teaser: None,
            author: None,
        }
    }

    /// A record is enriched once both the body markup and the teaser are set
    pub fn is_enriched(&self) -> bool {
        self.raw_body_html.is_some() && self.teaser.is_some()
    }

    /// Overwrites every enrichment field with freshly extracted details
    pub fn apply_details(&mut self, details: ArticleDetails) {
        self.images = details.images;
        self.content = details.content;
        self.raw_body_html = Some(details.raw_body_html);
        self.teaser = Some(details.teaser);
        self.author = details.author;
    }

    pub fn link(&self) -> &str {
        &self.stub.link
    }

    pub fn title(&self) -> &str {
        &self.stub.title
    }
}

/// The ordered sequence of records persisted as a single JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    records: Vec<ArticleRecord>,
}

impl Collection {
    pub fn new(records: Vec<ArticleRecord>) -> Self {
        Self { records }
    }

    pub fn from_stubs(stubs: Vec<ArticleStub>) -> Self {
        let mut collection = Self::default();
        collection.merge_stubs(stubs);
        collection
    }

    /// Appends stubs whose link is not yet in the collection
    ///
    /// Existing records keep their position and enrichment. Returns the number
    /// of records added.
    pub fn merge_stubs(&mut self, stubs: Vec<ArticleStub>) -> usize {
        let mut known: HashSet<String> = self.records.iter().map(|r| r.stub.link.clone()).collect();
        let before = self.records.len();

        for stub in stubs {
            if known.insert(stub.link.clone()) {
                self.records.push(ArticleRecord::from_stub(stub));
            }
        }

        self.records.len() - before
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [ArticleRecord] {
        &mut self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArticleRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<ArticleRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a ArticleRecord;
    type IntoIter = std::slice::Iter<'a, ArticleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
