//! Adapter for the news site's index and article markup
//!
//! # Index pages
//!
//! ```html
//! <section data-type="date">
//!   <time datetime="2024-01-15T10:00">...</time>
//!   <article data-type="story">
//!     <a href="/story/1"><img src="..." data-src="..."></a>
//!     <h1 class="teaser-title">Title</h1>
//!   </article>
//! </section>
//! <div class="overview-readmore"><a href="/archive?page=2">more</a></div>
//! ```
//!
//! # Article pages
//!
//! `meta[name=description]`, `.story-lead`, `.article-author` and the
//! `.article-body` container whose direct children are walked in order.

use crate::model::{ArticleStub, ContentNode};
use crate::site::text::{first_attr, image_source, normalize_whitespace, parse_timestamp, resolve_url};
use crate::site::{ArticleBody, Byline, SiteAdapter};
use crate::HarvestError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Compiled selectors for the site's markup
#[derive(Debug, Clone)]
struct Selectors {
    story: Selector,
    link: Selector,
    title: Selector,
    date_section: Selector,
    time: Selector,
    image: Selector,
    next_page: Selector,
    description: Selector,
    lead: Selector,
    author: Selector,
    body: Selector,
    figcaption: Selector,
}

fn compile(selector: &str) -> Result<Selector, HarvestError> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

impl Selectors {
    fn new() -> Result<Self, HarvestError> {
        Ok(Self {
            story: compile(r#"article[data-type="story"]"#)?,
            link: compile("a[href]")?,
            title: compile(".teaser-title")?,
            date_section: compile(r#"section[data-type="date"]"#)?,
            time: compile("time[datetime]")?,
            image: compile("img")?,
            next_page: compile(".overview-readmore a")?,
            description: compile(r#"meta[name="description"]"#)?,
            lead: compile(".story-lead")?,
            author: compile(".article-author")?,
            body: compile(".article-body")?,
            figcaption: compile("figcaption")?,
        })
    }
}

/// [`SiteAdapter`] for the news site's current markup
#[derive(Debug, Clone)]
pub struct StandardAdapter {
    selectors: Selectors,
}

impl StandardAdapter {
    pub fn new() -> Result<Self, HarvestError> {
        Ok(Self {
            selectors: Selectors::new()?,
        })
    }

    /// Publication time from the story's enclosing date section
    fn story_date(&self, story: &ElementRef<'_>) -> Option<chrono::DateTime<chrono::Utc>> {
        let section = story
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| self.selectors.date_section.matches(el))?;

        let datetime = section
            .select(&self.selectors.time)
            .next()?
            .value()
            .attr("datetime")?;

        parse_timestamp(datetime)
    }

    fn story_image(&self, story: &ElementRef<'_>, page_url: &Url) -> Option<String> {
        let image = story.select(&self.selectors.image).next()?;
        first_attr(&image, &["src", "data-src"]).and_then(|src| resolve_url(page_url, src))
    }

    /// An element is image-bearing if it is a figure or holds an image
    fn is_image_bearing(&self, element: &ElementRef<'_>) -> bool {
        element.value().name() == "figure" || element.select(&self.selectors.image).next().is_some()
    }

    /// Caption text of the image's nearest enclosing figure
    fn caption_of(&self, image: &ElementRef<'_>) -> String {
        image
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "figure")
            .map(|figure| {
                figure
                    .select(&self.selectors.figcaption)
                    .flat_map(|caption| caption.text())
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .unwrap_or_default()
    }
}

impl SiteAdapter for StandardAdapter {
    fn extract_stubs(&self, document: &Html, page_url: &Url) -> Vec<ArticleStub> {
        let mut stubs = Vec::new();

        for story in document.select(&self.selectors.story) {
            let link = story
                .select(&self.selectors.link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| resolve_url(page_url, href));

            let Some(link) = link else {
                tracing::debug!("Skipping story without link on {}", page_url);
                continue;
            };

            let title: String = story
                .select(&self.selectors.title)
                .flat_map(|el| el.text())
                .collect();

            stubs.push(ArticleStub {
                title: title.trim().to_string(),
                link,
                date: self.story_date(&story),
                lead_image: self.story_image(&story, page_url),
            });
        }

        stubs
    }

    fn extract_next_link(&self, document: &Html, page_url: &Url) -> Option<String> {
        document
            .select(&self.selectors.next_page)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_url(page_url, href))
    }

    fn extract_body(&self, document: &Html, article_url: &Url) -> ArticleBody {
        let Some(body) = document.select(&self.selectors.body).next() else {
            tracing::debug!("No article body found on {}", article_url);
            return ArticleBody::default();
        };

        let mut content = Vec::new();
        for child in body.children().filter_map(ElementRef::wrap) {
            if self.is_image_bearing(&child) {
                // Only the images survive; the figure's other markup is dropped.
                for image in child.select(&self.selectors.image) {
                    if let Some(src) = image_source(&image, article_url) {
                        content.push(ContentNode::image(src, self.caption_of(&image)));
                    }
                }
                continue;
            }

            let html = normalize_whitespace(&child.inner_html());
            if !html.is_empty() {
                content.push(ContentNode::text(html));
            }
        }

        let mut seen = HashSet::new();
        let images = body
            .select(&self.selectors.image)
            .filter_map(|image| image_source(&image, article_url))
            .filter(|src| seen.insert(src.clone()))
            .collect();

        ArticleBody {
            images,
            content,
            raw_body_html: body.inner_html(),
        }
    }

    fn extract_byline(&self, document: &Html) -> Byline {
        let description = document
            .select(&self.selectors.description)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .unwrap_or_default()
            .to_string();

        let lead: String = document
            .select(&self.selectors.lead)
            .flat_map(|el| el.text())
            .collect();

        let teaser = normalize_whitespace(
            &[description, lead]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        );

        let author: String = document
            .select(&self.selectors.author)
            .flat_map(|el| el.text())
            .collect();
        let author = author.trim();

        Byline {
            teaser,
            author: (!author.is_empty()).then(|| author.to_string()),
        }
    }
}
