//! End-to-end tests of crawl → enrich → download → render against a mock site

use crate::common::{article_page, fetcher, index_page, mount_html, mount_site};
use photoblog_harvester::config::FileNaming;
use photoblog_harvester::crawler::{crawl, InstantPacer};
use photoblog_harvester::download::download_all;
use photoblog_harvester::enrich::EnrichmentDriver;
use photoblog_harvester::model::{ArticleStub, Collection, ContentNode};
use photoblog_harvester::render::render_site;
use photoblog_harvester::site::StandardAdapter;
use photoblog_harvester::storage::{CollectionStore, JsonFileStore};
use photoblog_harvester::HarvestError;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_pipeline_two_pages() {
    let server = MockServer::start().await;
    mount_site(&server, 1).await;
    let base = server.uri();

    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("articles.json"));
    let image_dir = dir.path().join("images");
    let fetcher = fetcher();
    let pacer = InstantPacer::new();
    let adapter = StandardAdapter::new().unwrap();

    // Crawl
    let outcome = crawl(&fetcher, &pacer, &adapter, &format!("{}/", base))
        .await
        .unwrap();
    assert_eq!(outcome.pages, 2);
    assert_eq!(outcome.stubs.len(), 3);
    assert_eq!(outcome.stubs[0].title, "First story");
    assert_eq!(outcome.stubs[0].link, format!("{}/story/1", base));
    assert_eq!(
        outcome.stubs[0].lead_image.as_deref(),
        Some(format!("{}/teaser/1.jpg", base).as_str())
    );
    store.save(&Collection::from_stubs(outcome.stubs)).unwrap();

    // Enrich
    let report = EnrichmentDriver::new(&fetcher, &pacer, &adapter, &store)
        .run(false)
        .await
        .unwrap();
    assert_eq!(report.updated, 3);
    assert!(report.committed);

    let collection = store.load().unwrap();
    let first = &collection.records()[0];
    assert_eq!(first.teaser.as_deref(), Some("Teaser 1 Lead paragraph"));
    assert_eq!(first.author.as_deref(), Some("Staff Photographer"));
    assert_eq!(
        first.content,
        vec![
            ContentNode::text("Opening paragraph"),
            ContentNode::image(format!("{}/img/photo1.jpg", base), "A caption"),
            ContentNode::text("Closing paragraph"),
        ]
    );

    // Download
    let downloads = download_all(&fetcher, &pacer, &collection, &image_dir, FileNaming::Original)
        .await
        .unwrap();
    assert_eq!(downloads.downloaded, 3);
    assert_eq!(downloads.failed, 0);
    assert_eq!(
        fs::read(image_dir.join("2024-01-15/photo1.jpg")).unwrap(),
        b"jpeg-1"
    );
    assert!(image_dir.join("2024-01-15/photo2.jpg").is_file());
    assert!(image_dir.join("2024-01-16/photo3.jpg").is_file());

    // Render
    let site_dir = dir.path().join("site");
    let pages = render_site(&collection, &site_dir, FileNaming::Original).unwrap();
    assert_eq!(pages, 3);
    let newest = fs::read_to_string(site_dir.join("article-1.html")).unwrap();
    assert!(newest.contains("Third story"));
    assert!(newest.contains("images/2024-01-16/photo3.jpg"));
}

#[tokio::test]
async fn test_second_run_does_no_network_work() {
    let server = MockServer::start().await;
    // Every article page and image may be requested once across both runs
    mount_site(&server, 1).await;
    let base = server.uri();

    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("articles.json"));
    let image_dir = dir.path().join("images");
    let fetcher = fetcher();
    let pacer = InstantPacer::new();
    let adapter = StandardAdapter::new().unwrap();

    let outcome = crawl(&fetcher, &pacer, &adapter, &format!("{}/", base))
        .await
        .unwrap();
    store.save(&Collection::from_stubs(outcome.stubs)).unwrap();

    let driver = EnrichmentDriver::new(&fetcher, &pacer, &adapter, &store);
    driver.run(false).await.unwrap();
    let collection = store.load().unwrap();
    download_all(&fetcher, &pacer, &collection, &image_dir, FileNaming::Original)
        .await
        .unwrap();
    let durable = fs::read(store.durable_path()).unwrap();

    let report = driver.run(false).await.unwrap();
    assert_eq!(report.skipped, 3);
    assert!(!report.committed);
    assert_eq!(fs::read(store.durable_path()).unwrap(), durable);

    let downloads = download_all(&fetcher, &pacer, &collection, &image_dir, FileNaming::Original)
        .await
        .unwrap();
    assert_eq!(downloads.downloaded, 0);
    assert_eq!(downloads.skipped_existing, 3);
}

#[tokio::test]
async fn test_failed_article_is_retried_on_next_run() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/story/2"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    for n in 1..=2 {
        mount_html(
            &server,
            &format!("/story/{}", n),
            article_page("Teaser", &format!("/img/{}.jpg", n)),
        )
        .await;
    }

    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("articles.json"));
    let stubs = (1..=2)
        .map(|n| ArticleStub {
            title: format!("Story {}", n),
            link: format!("{}/story/{}", base, n),
            date: None,
            lead_image: None,
        })
        .collect();
    store.save(&Collection::from_stubs(stubs)).unwrap();

    let fetcher = fetcher();
    let pacer = InstantPacer::new();
    let adapter = StandardAdapter::new().unwrap();
    let driver = EnrichmentDriver::new(&fetcher, &pacer, &adapter, &store);

    let first = driver.run(false).await.unwrap();
    assert_eq!((first.updated, first.failed), (1, 1));
    assert!(!store.load().unwrap().records()[1].is_enriched());

    let second = driver.run(false).await.unwrap();
    assert_eq!((second.updated, second.failed, second.skipped), (1, 0, 1));
    assert!(store.load().unwrap().iter().all(|r| r.is_enriched()));
}

#[tokio::test]
async fn test_consent_cookies_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("cookie", "DSGVO_ZUSAGE_V1=true; tcfs=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = crawl(
        &fetcher(),
        &InstantPacer::new(),
        &StandardAdapter::new().unwrap(),
        &format!("{}/", server.uri()),
    )
    .await
    .unwrap();

    assert_eq!(outcome.pages, 1);
    assert!(outcome.stubs.is_empty());
}

#[tokio::test]
async fn test_crawl_aborts_on_missing_page() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        index_page(
            "2024-01-15",
            &[("/story/1", "Story", "/t.jpg")],
            Some("/page/2"),
        ),
    )
    .await;

    let result = crawl(
        &fetcher(),
        &InstantPacer::new(),
        &StandardAdapter::new().unwrap(),
        &format!("{}/", server.uri()),
    )
    .await;

    assert!(matches!(
        result,
        Err(HarvestError::HttpStatus { status: 404, .. })
    ));
}
