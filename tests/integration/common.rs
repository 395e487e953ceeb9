//! Shared fixtures for integration tests

use docket::config::{
    Config, CrawlerConfig, DatabaseConfig, FamilyName, ScheduleConfig, SearchConfig, SourceEntry,
    UserAgentConfig,
};
use docket::crawler::{CrawlOrchestrator, ItemStatus, SourceReport};
use docket::storage::SqliteStore;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a link-list source entry for a listing page
pub fn link_list_source(url: String) -> SourceEntry {
    SourceEntry {
        url,
        family: FamilyName::LinkList,
        category: "document".to_string(),
        tags: Vec::new(),
        item_selector: None,
        title_selector: None,
        link_selector: None,
    }
}

/// Creates a test configuration with the given sources
pub fn create_test_config(sources: Vec<SourceEntry>, db_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_sources: 2,
            max_concurrent_resolves: 3,
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
            max_content_length: 10_000,
            max_body_bytes: 1024 * 1024,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.gov/contact".to_string(),
            contact_email: "test@example.gov".to_string(),
        },
        database: DatabaseConfig {
            path: db_path.to_string(),
            pool_size: 4,
            acquire_timeout_ms: 5_000,
            busy_timeout_ms: 5_000,
        },
        schedule: ScheduleConfig::default(),
        search: SearchConfig::default(),
        sources,
    }
}

/// Opens a store in a fresh temporary directory
pub async fn open_store(dir: &TempDir) -> (Arc<SqliteStore>, String) {
    let db_path = dir.path().join("docket.db").to_string_lossy().into_owned();
    let config = create_test_config(Vec::new(), &db_path);
    let store = SqliteStore::open(&config.database, config.search.max_results)
        .await
        .expect("Failed to open store");
    (Arc::new(store), db_path)
}

/// Builds an orchestrator over the given sources and store
pub fn orchestrator(sources: Vec<SourceEntry>, db_path: &str, store: Arc<SqliteStore>) -> CrawlOrchestrator {
    let config = create_test_config(sources, db_path);
    CrawlOrchestrator::from_config(&config, "test-hash".to_string(), store)
        .expect("Failed to build orchestrator")
}

/// Serves an HTML listing page at `route`
pub async fn mount_listing(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html, "text/html"),
        )
        .mount(server)
        .await;
}

/// Serves a plain-text document at `route`
pub async fn mount_text(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.to_string(), "text/plain"),
        )
        .mount(server)
        .await;
}

/// Builds a listing page linking to each `(href, title)` pair
pub fn listing_html(links: &[(&str, &str)]) -> String {
    let items: String = links
        .iter()
        .map(|(href, title)| format!(r#"<li><a href="{}">{}</a></li>"#, href, title))
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", items)
}

/// Identifiers of the documents a source stored, in listing order
pub fn stored_ids(report: &SourceReport) -> Vec<i64> {
    report
        .items
        .iter()
        .filter_map(|item| match item.status {
            ItemStatus::Stored { id, .. } => Some(id),
            _ => None,
        })
        .collect()
}
