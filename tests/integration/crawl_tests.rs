//! End-to-end crawl cycle tests

use crate::common::{
    link_list_source, listing_html, mount_listing, mount_text, open_store, orchestrator,
    stored_ids,
};
use docket::config::{FamilyName, SourceEntry};
use docket::crawler::{FetchError, SourceFailure, SourceStatus};
use docket::storage::DocumentStore;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_repeated_crawl_is_idempotent() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(
        &server,
        "/list",
        listing_html(&[("/a.txt", "Agenda"), ("b.txt", "Minutes")]),
    )
    .await;
    mount_text(&server, "/a.txt", "Agenda for the March meeting").await;
    mount_text(&server, "/b.txt", "Minutes of the March meeting").await;

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;
    let orchestrator = orchestrator(
        vec![link_list_source(format!("{}/list", base_url))],
        &db_path,
        store.clone(),
    );

    let first = orchestrator.run(&CancellationToken::new()).await;
    let second = orchestrator.run(&CancellationToken::new()).await;

    assert_eq!(first.documents_upserted, 2);
    assert_eq!(second.documents_upserted, 2);
    assert_eq!(stored_ids(&first.reports[0]), stored_ids(&second.reports[0]));
    assert_eq!(store.stats().await.unwrap().documents, 2);
    assert_eq!(store.recent_cycles(10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_source_does_not_block_others() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(&server, "/a/list", listing_html(&[("/a/1.txt", "A one")])).await;
    mount_listing(
        &server,
        "/c/list",
        listing_html(&[("/c/1.txt", "C one"), ("/c/2.txt", "C two")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/b/list"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    for route in ["/a/1.txt", "/c/1.txt", "/c/2.txt"] {
        mount_text(&server, route, "public notice text").await;
    }

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;
    let orchestrator = orchestrator(
        vec![
            link_list_source(format!("{}/a/list", base_url)),
            link_list_source(format!("{}/b/list", base_url)),
            link_list_source(format!("{}/c/list", base_url)),
        ],
        &db_path,
        store.clone(),
    );

    let summary = orchestrator.run(&CancellationToken::new()).await;

    assert_eq!(summary.sources_total, 3);
    assert_eq!(summary.sources_failed, 1);
    assert_eq!(summary.documents_upserted, 3);
    assert!(matches!(
        summary.reports[1].status,
        SourceStatus::Failed(SourceFailure::Transport(FetchError::Status { status: 500, .. }))
    ));
    assert!(matches!(summary.reports[0].status, SourceStatus::Completed));
    assert!(matches!(summary.reports[2].status, SourceStatus::Completed));

    let last = store.stats().await.unwrap().last_cycle.unwrap();
    assert_eq!(last.sources_failed, 1);
    assert_eq!(last.config_hash, "test-hash");
}

#[tokio::test]
async fn test_unparseable_listing_fails_source() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;
    let orchestrator = orchestrator(
        vec![link_list_source(format!("{}/list", server.uri()))],
        &db_path,
        store,
    );

    let summary = orchestrator.run(&CancellationToken::new()).await;
    assert_eq!(summary.sources_failed, 1);
    assert!(matches!(
        summary.reports[0].status,
        SourceStatus::Failed(SourceFailure::Parse(_))
    ));
}

#[tokio::test]
async fn test_content_failure_keeps_metadata_and_last_good_content() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let listing = listing_html(&[("/notice.txt", "Water rate notice")]);

    mount_listing(&server, "/list", listing.clone()).await;
    Mock::given(method("GET"))
        .and(path("/notice.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;
    let orchestrator = orchestrator(
        vec![link_list_source(format!("{}/list", base_url))],
        &db_path,
        store.clone(),
    );

    // Content unavailable on first sight: metadata is still stored
    let summary = orchestrator.run(&CancellationToken::new()).await;
    assert_eq!(summary.documents_upserted, 1);
    assert_eq!(summary.content_missing, 1);
    let id = stored_ids(&summary.reports[0])[0];
    let document = store.load(id).await.unwrap();
    assert_eq!(document.title, "Water rate notice");
    assert_eq!(document.content, "");

    // Content becomes available
    server.reset().await;
    mount_listing(&server, "/list", listing.clone()).await;
    mount_text(&server, "/notice.txt", "Rates rise in July").await;
    let summary = orchestrator.run(&CancellationToken::new()).await;
    assert_eq!(summary.content_missing, 0);
    assert_eq!(store.load(id).await.unwrap().content, "Rates rise in July");

    // Content fails again: the stored text survives
    server.reset().await;
    mount_listing(&server, "/list", listing).await;
    Mock::given(method("GET"))
        .and(path("/notice.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let summary = orchestrator.run(&CancellationToken::new()).await;
    assert_eq!(summary.content_missing, 1);
    assert_eq!(stored_ids(&summary.reports[0]), vec![id]);
    assert_eq!(store.load(id).await.unwrap().content, "Rates rise in July");
}

#[tokio::test]
async fn test_changed_title_updates_existing_document() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(&server, "/list", listing_html(&[("/budget.txt", "Draft Budget")])).await;
    mount_text(&server, "/budget.txt", "Proposed spending plan").await;

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;
    let orchestrator = orchestrator(
        vec![link_list_source(format!("{}/list", base_url))],
        &db_path,
        store.clone(),
    );

    let summary = orchestrator.run(&CancellationToken::new()).await;
    let id = stored_ids(&summary.reports[0])[0];
    let before = store.load(id).await.unwrap();

    server.reset().await;
    mount_listing(&server, "/list", listing_html(&[("/budget.txt", "Final Budget")])).await;
    mount_text(&server, "/budget.txt", "Adopted spending plan").await;

    let summary = orchestrator.run(&CancellationToken::new()).await;
    assert_eq!(stored_ids(&summary.reports[0]), vec![id]);

    let after = store.load(id).await.unwrap();
    assert_eq!(after.title, "Final Budget");
    assert_eq!(after.content, "Adopted spending plan");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
    assert_eq!(store.stats().await.unwrap().documents, 1);
}

#[tokio::test]
async fn test_relative_links_tags_and_location() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(
        &server,
        "/council/list",
        r#"<html><body>
            <div class="document-item">
              <span class="doc-title">Norfolk  Budget Hearing</span>
              <a href="/docs/a.txt">Download</a>
            </div>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_text(&server, "/docs/a.txt", "Hearing at City Hall, 23510.").await;

    let source = SourceEntry {
        url: format!("{}/council/list", base_url),
        family: FamilyName::DocumentCenter,
        category: "Budget".to_string(),
        tags: vec!["Finance".to_string()],
        item_selector: None,
        title_selector: None,
        link_selector: None,
    };

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;
    let orchestrator = orchestrator(vec![source], &db_path, store.clone());

    let summary = orchestrator.run(&CancellationToken::new()).await;
    let id = stored_ids(&summary.reports[0])[0];
    let document = store.load(id).await.unwrap();

    assert_eq!(document.link, format!("{}/docs/a.txt", base_url));
    assert_eq!(document.title, "Norfolk Budget Hearing");
    assert_eq!(document.doc_type, "Budget");
    assert_eq!(document.source, format!("{}/council/list", base_url));

    for tag in ["budget", "document-center", "127.0.0.1", "norfolk", "finance"] {
        assert!(document.tags.contains(tag), "missing tag {}", tag);
    }

    let location = document.location.expect("location should be detected");
    assert_eq!(location.city.as_deref(), Some("Norfolk"));
    assert_eq!(location.zip_code.as_deref(), Some("23510"));
}

#[tokio::test]
async fn test_sources_listing_the_same_document_share_one_row() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let listing = listing_html(&[("/shared.txt", "Shared ordinance")]);
    mount_listing(&server, "/a/list", listing.clone()).await;
    mount_listing(&server, "/b/list", listing).await;
    mount_text(&server, "/shared.txt", "Ordinance text").await;

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;
    let orchestrator = orchestrator(
        vec![
            link_list_source(format!("{}/a/list", base_url)),
            link_list_source(format!("{}/b/list", base_url)),
        ],
        &db_path,
        store.clone(),
    );

    let summary = orchestrator.run(&CancellationToken::new()).await;
    assert_eq!(summary.documents_upserted, 2);
    assert_eq!(stored_ids(&summary.reports[0]), stored_ids(&summary.reports[1]));
    assert_eq!(store.stats().await.unwrap().documents, 1);
}

#[tokio::test]
async fn test_cancelled_cycle_skips_unstarted_sources() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let dir = TempDir::new().unwrap();
    let (store, db_path) = open_store(&dir).await;
    let orchestrator = orchestrator(
        vec![
            link_list_source(format!("{}/a/list", base_url)),
            link_list_source(format!("{}/b/list", base_url)),
        ],
        &db_path,
        store.clone(),
    );

    let cancel = CancellationToken::new();
    cancel.cancel();
    let summary = orchestrator.run(&cancel).await;

    assert!(summary.cancelled);
    assert_eq!(summary.sources_skipped, 2);
    assert_eq!(summary.sources_failed, 0);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(store.recent_cycles(1).await.unwrap()[0].cancelled);
}
