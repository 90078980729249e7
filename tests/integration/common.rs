//! Shared fixtures: a mock news site served by wiremock

use photoblog_harvester::config::RequestConfig;
use photoblog_harvester::crawler::HttpFetcher;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&RequestConfig::default()).expect("Failed to build HTTP client")
}

/// One index page; `stories` are `(href, title, image)` tuples
pub fn index_page(date: &str, stories: &[(&str, &str, &str)], next: Option<&str>) -> String {
    let stories: String = stories
        .iter()
        .map(|(href, title, image)| {
            format!(
                r#"<article data-type="story">
                    <a href="{}"><img data-src="{}"></a>
                    <h1 class="teaser-title"> {} </h1>
                </article>"#,
                href, image, title
            )
        })
        .collect();

    let more = next
        .map(|href| {
            format!(
                r#"<div class="overview-readmore"><a href="{}">Mehr laden</a></div>"#,
                href
            )
        })
        .unwrap_or_default();

    format!(
        r#"<html><body>
            <section data-type="date"><time datetime="{}T08:00:00+01:00">{}</time>{}</section>
            {}
        </body></html>"#,
        date, date, stories, more
    )
}

/// An article page whose body holds a paragraph and one captioned figure
pub fn article_page(teaser: &str, image: &str) -> String {
    format!(
        r#"<html><head><meta name="description" content="{}"></head><body>
            <p class="story-lead">Lead paragraph</p>
            <div class="article-body">
                <p>Opening paragraph</p>
                <figure><img src="{}"><figcaption> A caption </figcaption></figure>
                <p>Closing paragraph</p>
            </div>
            <span class="article-author">Staff Photographer</span>
        </body></html>"#,
        teaser, image
    )
}

pub async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts a two-page index with three stories, their article pages and one
/// image per article. Each article page and image expects exactly `hits`
/// requests over the server's lifetime.
pub async fn mount_site(server: &MockServer, hits: u64) {
    mount_html(
        server,
        "/",
        index_page(
            "2024-01-15",
            &[
                ("/story/1", "First story", "/teaser/1.jpg"),
                ("/story/2", "Second story", "/teaser/2.jpg"),
            ],
            Some("/page/2"),
        ),
    )
    .await;
    mount_html(
        server,
        "/page/2",
        index_page("2024-01-16", &[("/story/3", "Third story", "/teaser/3.jpg")], None),
    )
    .await;

    for n in 1..=3 {
        Mock::given(method("GET"))
            .and(path(format!("/story/{}", n)))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(article_page(
                    &format!("Teaser {}", n),
                    &format!("/img/photo{}.jpg", n),
                )),
            )
            .expect(hits)
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/img/photo{}.jpg", n)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(format!("jpeg-{}", n).into_bytes()))
            .expect(hits)
            .mount(server)
            .await;
    }
}
