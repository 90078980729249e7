//! Page templates

use crate::config::FileNaming;
use crate::download::image_filename;
use crate::model::{ArticleRecord, ContentNode};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::Serialize;

const SITE_TITLE: &str = "Photoblog Archive";

const BASE_CSS: &str = r#"
body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; line-height: 1.6; color: #333; }
.container { padding: 1rem; margin: 0 auto; max-width: 100%; box-sizing: border-box; }
header h1 { margin: 0 0 1rem; }
header a, a { color: #333; text-decoration: none; }
a:hover { color: #000; text-decoration: underline; }
.article-meta { color: #666; margin-bottom: 1em; }
.article-teaser { color: #444; }
img { max-width: 100%; height: auto; display: block; }
@media (min-width: 768px) { .container { max-width: 800px; padding: 2rem; } }
@media (min-width: 1200px) { .container { max-width: 1000px; } }
"#;

const ARCHIVE_CSS: &str = r#"
.search-container { margin-bottom: 2rem; }
.search-container input[type="text"] { width: 100%; padding: 0.5rem; box-sizing: border-box; }
.date-filters { display: flex; gap: 1rem; margin-top: 0.5rem; }
.article { margin-bottom: 2.5em; }
.article.hidden { display: none; }
.article h2 { margin: 0 0 0.25em; }
@media (min-width: 768px) { .article-row { display: flex; gap: 1.5rem; } .article-image { flex: 0 0 40%; } }
"#;

const ARTICLE_CSS: &str = r#"
.article h1 { font-size: 2em; line-height: 1.2; }
.article-teaser { font-size: 1.2em; margin-bottom: 2em; }
.image-container { margin: 2em 0; }
.image-caption { font-size: 0.9em; color: #666; font-style: italic; margin: 0.5em 0; }
.article-content img { cursor: zoom-in; }
.article-footer { margin-top: 3em; padding-top: 1em; border-top: 1px solid #eee; }
.lightbox { display: none; position: fixed; inset: 0; background: rgba(0, 0, 0, 0.9); z-index: 10; align-items: center; justify-content: center; flex-direction: column; }
.lightbox.active { display: flex; }
.lightbox img { max-width: 90vw; max-height: 85vh; }
.lightbox-caption { color: #eee; margin-top: 1em; }
.lightbox-nav, .lightbox-close { position: absolute; color: #fff; font-size: 3em; cursor: pointer; user-select: none; }
.lightbox-prev { left: 1rem; top: 50%; }
.lightbox-next { right: 1rem; top: 50%; }
.lightbox-close { right: 1rem; top: 0.5rem; }
"#;

const FILTER_SCRIPT: &str = r#"
function filterArticles() {
    const terms = document.getElementById('searchInput').value.toLowerCase().split(/\s+/).filter(Boolean);
    const from = document.getElementById('dateFrom').value;
    const to = document.getElementById('dateTo').value;
    document.querySelectorAll('.article').forEach(function (article) {
        const text = (article.querySelector('h2 a').textContent + ' ' +
            article.querySelector('.article-teaser').textContent).toLowerCase();
        const date = article.dataset.date;
        const matchesSearch = terms.length === 0 || terms.some(function (t) { return text.includes(t); });
        const matchesDate = date === 'undated' || ((!from || date >= from) && (!to || date <= to));
        article.classList.toggle('hidden', !matchesSearch || !matchesDate);
    });
}
document.getElementById('searchInput').addEventListener('input', filterArticles);
document.getElementById('dateFrom').addEventListener('change', filterArticles);
document.getElementById('dateTo').addEventListener('change', filterArticles);
"#;

const LIGHTBOX_SCRIPT: &str = r#"
let current = 0;
function showImage() {
    const box = document.querySelector('.lightbox');
    box.querySelector('img').src = images[current].src;
    box.querySelector('img').alt = images[current].caption;
    box.querySelector('.lightbox-caption').textContent = images[current].caption;
}
function openLightbox(img) {
    current = parseInt(img.dataset.index, 10);
    showImage();
    document.querySelector('.lightbox').classList.add('active');
    document.body.style.overflow = 'hidden';
}
function closeLightbox() {
    document.querySelector('.lightbox').classList.remove('active');
    document.body.style.overflow = '';
}
function navigateImage(step, event) {
    if (event) { event.stopPropagation(); }
    current = (current + step + images.length) % images.length;
    showImage();
}
document.addEventListener('keydown', function (e) {
    if (!document.querySelector('.lightbox.active')) { return; }
    if (e.key === 'ArrowLeft') { navigateImage(-1); }
    if (e.key === 'ArrowRight') { navigateImage(1); }
    if (e.key === 'Escape') { closeLightbox(); }
});
document.querySelector('.lightbox').addEventListener('click', function (e) {
    if (e.target === this) { closeLightbox(); }
});
"#;

/// Site-relative path of a downloaded image
pub fn local_image_src(record: &ArticleRecord, url: &str, naming: FileNaming) -> String {
    format!(
        "images/{}/{}",
        record.stub.date_bucket(),
        image_filename(url, naming)
    )
}

/// `article-<n>.html`, numbered from 1
pub fn article_file_name(number: usize) -> String {
    format!("article-{}.html", number)
}

/// Display date, `dd.mm.yyyy`
fn display_date(record: &ArticleRecord) -> Option<String> {
    record.stub.date.map(|date| date.format("%d.%m.%Y").to_string())
}

fn meta_line(record: &ArticleRecord) -> Markup {
    html! {
        div.article-meta {
            @if let Some(date) = display_date(record) {
                (date)
            }
            @if let Some(author) = &record.author {
                " • " (author)
            }
        }
    }
}

fn page(title: &str, extra_css: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="de" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(BASE_CSS)) (PreEscaped(extra_css)) }
            }
            body { (body) }
        }
    }
}

/// Archive listing; `records` must already be in display order
pub fn archive_page(records: &[&ArticleRecord], naming: FileNaming) -> Markup {
    let dates: Vec<String> = records
        .iter()
        .filter_map(|r| r.stub.date.map(|d| d.format("%Y-%m-%d").to_string()))
        .collect();
    let min_date = dates.iter().min();
    let max_date = dates.iter().max();

    let body = html! {
        div.container {
            header { h1 { (SITE_TITLE) } }

            div.search-container {
                input #searchInput type="text" placeholder="Suche nach Stichworten...";
                div.date-filters {
                    label {
                        "Von: "
                        input #dateFrom type="date" min=[min_date] max=[max_date] value=[min_date];
                    }
                    label {
                        "Bis: "
                        input #dateTo type="date" min=[min_date] max=[max_date] value=[max_date];
                    }
                }
            }

            @for (index, record) in records.iter().enumerate() {
                article.article data-date=(record.stub.date_bucket()) {
                    h2 { a href=(article_file_name(index + 1)) { (record.title()) } }
                    (meta_line(record))
                    div.article-row {
                        @if let Some(first) = record.images.first() {
                            div.article-image {
                                a href=(article_file_name(index + 1)) {
                                    img src=(local_image_src(record, first, naming)) alt=(record.title()) loading="lazy";
                                }
                            }
                        }
                        div.article-content {
                            div.article-teaser { (record.teaser.as_deref().unwrap_or_default()) }
                            a.read-more href=(article_file_name(index + 1)) { "Weiterlesen →" }
                        }
                    }
                }
            }
        }
        script { (PreEscaped(FILTER_SCRIPT)) }
    };

    page(SITE_TITLE, ARCHIVE_CSS, body)
}

#[derive(Serialize)]
struct LightboxImage {
    src: String,
    caption: String,
}

/// JSON for an inline script; `</` is escaped so the data cannot close the tag
fn script_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Detail page for one article
pub fn article_page(record: &ArticleRecord, naming: FileNaming) -> Result<Markup, serde_json::Error> {
    let lightbox: Vec<LightboxImage> = record
        .content
        .iter()
        .filter_map(|node| match node {
            ContentNode::Image { src, caption } => Some(LightboxImage {
                src: local_image_src(record, src, naming),
                caption: caption.clone(),
            }),
            ContentNode::Text { .. } => None,
        })
        .collect();
    let images_json = script_json(&lightbox)?;

    // Each image node paired with its position in the lightbox list
    let mut images_seen = 0;
    let nodes: Vec<(&ContentNode, usize)> = record
        .content
        .iter()
        .map(|node| {
            let position = images_seen;
            if node.is_image() {
                images_seen += 1;
            }
            (node, position)
        })
        .collect();

    let body = html! {
        div.container {
            header { h1 { a href="archive.html" { (SITE_TITLE) } } }

            article.article {
                h1 { (record.title()) }
                (meta_line(record))
                div.article-teaser { (record.teaser.as_deref().unwrap_or_default()) }

                div.article-content {
                    @if record.content.is_empty() {
                        (PreEscaped(record.raw_body_html.as_deref().unwrap_or_default()))
                    }
                    @for (node, position) in &nodes {
                        @match node {
                            ContentNode::Text { html: fragment } => {
                                (PreEscaped(fragment))
                            }
                            ContentNode::Image { src, caption } => {
                                div.image-container {
                                    @if !caption.is_empty() {
                                        div.image-caption { (caption) }
                                    }
                                    img src=(local_image_src(record, src, naming)) alt=(caption)
                                        data-index=(position) onclick="openLightbox(this)";
                                }
                            }
                        }
                    }
                }

                div.article-footer {
                    a href="archive.html" { "← Zurück zur Übersicht" }
                }
            }
        }

        div.lightbox {
            div.lightbox-close onclick="closeLightbox()" { "×" }
            div.lightbox-nav.lightbox-prev onclick="navigateImage(-1, event)" { "‹" }
            div.lightbox-nav.lightbox-next onclick="navigateImage(1, event)" { "›" }
            img src="" alt="";
            div.lightbox-caption {}
        }

        script {
            (PreEscaped(format!("const images = {};", images_json)))
            (PreEscaped(LIGHTBOX_SCRIPT))
        }
    };

    Ok(page(record.title(), ARTICLE_CSS, body))
}
