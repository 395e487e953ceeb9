//! Scheduler overlap and lifecycle tests

use crate::common::{
    create_test_config, link_list_source, listing_html, mount_text, open_store, orchestrator,
};
use docket::crawler::{CrawlOrchestrator, Schedule, Scheduler};
use docket::storage::DocumentStore;
use docket::DocketError;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_trigger_during_running_cycle_is_skipped() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    // A slow listing keeps the first cycle busy
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(listing_html(&[("/a.txt", "Agenda")]), "text/html")
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;
    mount_text(&server, "/a.txt", "Agenda text").await;

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;
    let orchestrator = orchestrator(
        vec![link_list_source(format!("{}/list", base_url))],
        &db_path,
        store.clone(),
    );
    let scheduler = Arc::new(Scheduler::new(
        Schedule::parse("0 2 * * *").unwrap(),
        Arc::new(orchestrator),
    ));

    let running = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move { scheduler.trigger_now().await })
    };

    // Wait until the first cycle holds the lock
    for _ in 0..100 {
        if scheduler.is_running() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(scheduler.is_running());

    assert!(matches!(
        scheduler.trigger_now().await,
        Err(DocketError::CycleInProgress)
    ));

    let summary = running.await.unwrap().unwrap();
    assert_eq!(summary.documents_upserted, 1);
    assert!(!scheduler.is_running());

    // Only the first trigger produced a cycle
    assert_eq!(store.recent_cycles(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_stop_cancels_between_sources() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/a/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(listing_html(&[("/a.txt", "Agenda")]), "text/html")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    mount_text(&server, "/a.txt", "Agenda text").await;

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;

    // One source at a time, so the second source starts after cancellation
    let sources = vec![
        link_list_source(format!("{}/a/list", base_url)),
        link_list_source(format!("{}/b/list", base_url)),
    ];
    let mut config = create_test_config(sources, &db_path);
    config.crawler.max_concurrent_sources = 1;
    let orchestrator = CrawlOrchestrator::from_config(
        &config,
        "test-hash".to_string(),
        store.clone(),
    )
    .unwrap();

    let scheduler = Arc::new(Scheduler::new(
        Schedule::parse("0 2 * * *").unwrap(),
        Arc::new(orchestrator),
    ));

    let running = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move { scheduler.trigger_now().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    scheduler.stop().await;

    let summary = running.await.unwrap().unwrap();
    assert!(summary.cancelled);
    assert_eq!(summary.documents_upserted, 1);
    assert_eq!(summary.sources_skipped, 1);
    assert!(!scheduler.is_running());
}
