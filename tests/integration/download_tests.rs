//! Download queue tests against a mock image host

use crate::common::fetcher;
use chrono::{TimeZone, Utc};
use photoblog_harvester::config::FileNaming;
use photoblog_harvester::crawler::InstantPacer;
use photoblog_harvester::download::{download_all, BATCH_DELAY};
use photoblog_harvester::model::{ArticleRecord, ArticleStub, Collection};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record_with_images(link: &str, images: Vec<String>) -> ArticleRecord {
    let mut record = ArticleRecord::from_stub(ArticleStub {
        title: link.to_string(),
        link: link.to_string(),
        date: Some(Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap()),
        lead_image: None,
    });
    record.images = images;
    record
}

#[tokio::test]
async fn test_transient_errors_are_retried_with_backoff() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/flaky.jpg"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/flaky.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let collection = Collection::new(vec![record_with_images(
        "https://news.example.com/a",
        vec![format!("{}/img/flaky.jpg?w=1200", server.uri())],
    )]);
    let pacer = InstantPacer::new();

    let report = download_all(&fetcher(), &pacer, &collection, dir.path(), FileNaming::Original)
        .await
        .unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(
        pacer.pauses(),
        vec![Duration::from_secs(2), Duration::from_secs(4)]
    );
    assert_eq!(fs::read(dir.path().join("2024-02-01/flaky.jpg")).unwrap(), b"jpeg");
}

#[tokio::test]
async fn test_missing_images_are_counted_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/ok.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/gone.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let collection = Collection::new(vec![record_with_images(
        "https://news.example.com/a",
        vec![
            format!("{}/img/gone.jpg", server.uri()),
            format!("{}/img/ok.jpg", server.uri()),
        ],
    )]);

    let report = download_all(
        &fetcher(),
        &InstantPacer::new(),
        &collection,
        dir.path(),
        FileNaming::Original,
    )
    .await
    .unwrap();

    assert_eq!((report.downloaded, report.failed), (1, 1));
    assert!(!dir.path().join("2024-02-01/gone.jpg").exists());
    assert!(!dir.path().join("2024-02-01/gone.jpg.tmp").exists());
}

#[tokio::test]
async fn test_large_queue_runs_in_paced_batches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .expect(12)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let images = (0..12)
        .map(|i| format!("{}/img/{}.jpg", server.uri(), i))
        .collect();
    let collection = Collection::new(vec![record_with_images("https://news.example.com/a", images)]);
    let pacer = InstantPacer::new();

    let report = download_all(&fetcher(), &pacer, &collection, dir.path(), FileNaming::HashQualified)
        .await
        .unwrap();

    assert_eq!(report.downloaded, 12);
    // 5 + 5 + 2: two pauses between three batches
    assert_eq!(pacer.pauses(), vec![BATCH_DELAY, BATCH_DELAY]);
    assert_eq!(fs::read_dir(dir.path().join("2024-02-01")).unwrap().count(), 12);
}
