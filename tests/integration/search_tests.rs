//! Search over crawled documents

use crate::common::{
    link_list_source, listing_html, mount_listing, mount_text, open_store, orchestrator,
    stored_ids,
};
use docket::storage::{DocumentStore, StorageError};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

#[tokio::test]
async fn test_search_ranks_crawled_documents() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(
        &server,
        "/list",
        listing_html(&[
            ("/budget.txt", "Budget Report 2023"),
            ("/zoning.txt", "Zoning Map"),
        ]),
    )
    .await;
    mount_text(&server, "/budget.txt", "annual budget financial report").await;
    mount_text(&server, "/zoning.txt", "zoning district map").await;

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;
    let orchestrator = orchestrator(
        vec![link_list_source(format!("{}/list", base_url))],
        &db_path,
        store.clone(),
    );
    let summary = orchestrator.run(&CancellationToken::new()).await;
    let ids = stored_ids(&summary.reports[0]);

    let hits = store.search("budget").await.unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0].id, ids[0]);
    assert_eq!(hits[0].title, "Budget Report 2023");
    assert_eq!(hits[0].doc_type, "document");
    assert!(hits.iter().all(|hit| hit.id != ids[1]));

    assert!(store.search("xyzzy").await.unwrap().is_empty());

    let hits = store.search("map OR budget").await.unwrap();
    assert_eq!(hits.len(), 2);
    for pair in hits.windows(2) {
        assert!(pair[0].relevance >= pair[1].relevance);
    }

    let hits = store.search("+map -budget").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, ids[1]);
}

#[tokio::test]
async fn test_outage_is_distinguishable_from_no_results() {
    let dir = TempDir::new().unwrap();
    let (store, _db_path) = open_store(&dir).await;

    assert!(store.search("budget").await.unwrap().is_empty());

    store.close();
    let err = store.search("budget").await.unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
    assert!(err.is_retryable());
}
