//! SQLite storage implementation
//!
//! This module provides a pooled SQLite implementation of the DocumentStore
//! trait. Connections come from a bounded `deadpool-sqlite` pool; callers
//! wait at most the configured acquire timeout for a free connection and
//! then get [`StorageError::Unavailable`].

use crate::config::DatabaseConfig;
use crate::location::Location;
use crate::storage::query::build_match_query;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::{normalize_tags, CycleRecord, Document, NewDocument, SearchHit, StoreStats};
use crate::url::normalize_url;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_sqlite::{Config as PoolSettings, Pool, PoolConfig, Runtime};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

const UPSERT_SQL: &str = "
    INSERT INTO documents (link, title, content, doc_type, source, location, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
    ON CONFLICT(link) DO UPDATE SET
        title = CASE WHEN excluded.title = '' THEN documents.title ELSE excluded.title END,
        content = CASE WHEN excluded.content = '' THEN documents.content ELSE excluded.content END,
        location = COALESCE(excluded.location, documents.location),
        updated_at = excluded.updated_at
    RETURNING id";

const SEARCH_SQL: &str = "
    SELECT d.id, d.title, d.doc_type, d.link, d.created_at,
           -bm25(documents_fts, 10.0, 1.0) AS relevance
    FROM documents_fts
    JOIN documents d ON d.id = documents_fts.rowid
    WHERE documents_fts MATCH ?1
    ORDER BY relevance DESC, d.id ASC
    LIMIT ?2";

const CYCLE_COLUMNS: &str = "id, started_at, finished_at, config_hash, sources_total, \
     sources_failed, documents_upserted, content_missing, records_rejected, storage_failures, \
     cancelled";

/// SQLite document store backed by a connection pool
pub struct SqliteStore {
    pool: Pool,
    busy_timeout: Duration,
    max_results: u32,
}

impl SqliteStore {
    /// Opens (creating if needed) the database and prepares the schema
    ///
    /// # Arguments
    ///
    /// * `config` - Database path, pool size and timeouts
    /// * `max_results` - Upper bound on search results
    pub async fn open(config: &DatabaseConfig, max_results: u32) -> StorageResult<Self> {
        if let Some(parent) = Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Unavailable(format!("{}: {}", parent.display(), e)))?;
            }
        }

        let mut pool_config = PoolConfig::new(config.pool_size);
        pool_config.timeouts.wait = Some(Duration::from_millis(config.acquire_timeout_ms));
        pool_config.timeouts.create = Some(Duration::from_millis(config.acquire_timeout_ms));

        let mut settings = PoolSettings::new(&config.path);
        settings.pool = Some(pool_config);

        let pool = settings
            .create_pool(Runtime::Tokio1)
            .map_err(|e| StorageError::Unavailable(format!("failed to create pool: {}", e)))?;

        let store = Self {
            pool,
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
            max_results,
        };

        store
            .with_connection(|conn| {
                conn.execute_batch(
                    "
                    PRAGMA journal_mode = WAL;
                    PRAGMA synchronous = NORMAL;
                ",
                )?;
                initialize_schema(conn)?;
                Ok(())
            })
            .await?;

        tracing::debug!(path = %config.path, pool_size = config.pool_size, "Document store opened");
        Ok(store)
    }

    /// Closes the pool; outstanding connections are dropped when returned
    pub fn close(&self) {
        self.pool.close();
    }

    /// Runs a closure on a pooled connection off the async runtime
    async fn with_connection<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Connection) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StorageError::Unavailable(format!("connection pool: {}", e)))?;

        let busy_timeout = self.busy_timeout;
        conn.interact(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.pragma_update(None, "foreign_keys", true)?;
            f(conn)
        })
        .await
        .map_err(|e| StorageError::Unavailable(format!("connection task failed: {}", e)))?
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn upsert(&self, document: NewDocument) -> StorageResult<i64> {
        let natural_key = normalize_url(&document.link).map_err(|e| {
            StorageError::ConstraintViolation(format!("invalid link '{}': {}", document.link, e))
        })?;
        if document.doc_type.trim().is_empty() {
            return Err(StorageError::ConstraintViolation(format!(
                "document {} has no type",
                natural_key
            )));
        }
        if document.source.trim().is_empty() {
            return Err(StorageError::ConstraintViolation(format!(
                "document {} has no source",
                natural_key
            )));
        }

        let location = document
            .location
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let tags = normalize_tags(&document.tags);
        let now = Utc::now().to_rfc3339();

        self.with_connection(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let id: i64 = tx.query_row(
                UPSERT_SQL,
                params![
                    natural_key.as_str(),
                    document.title.trim(),
                    document.content,
                    document.doc_type,
                    document.source,
                    location,
                    now,
                ],
                |row| row.get(0),
            )?;

            for tag in &tags {
                tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", params![tag])?;
                tx.execute(
                    "INSERT OR IGNORE INTO document_tags (document_id, tag_id)
                     SELECT ?1, id FROM tags WHERE name = ?2",
                    params![id, tag],
                )?;
            }

            tx.commit()?;
            Ok(id)
        })
        .await
    }

    async fn load(&self, id: i64) -> StorageResult<Document> {
        self.with_connection(move |conn| {
            let document = conn
                .query_row(
                    "SELECT id, link, title, content, doc_type, source, location, created_at, updated_at
                     FROM documents WHERE id = ?1",
                    params![id],
                    |row| Ok(document_from_row(row)),
                )
                .optional()?
                .ok_or(StorageError::NotFound(id))??;

            let mut stmt = conn.prepare(
                "SELECT t.name FROM tags t
                 JOIN document_tags dt ON dt.tag_id = t.id
                 WHERE dt.document_id = ?1",
            )?;
            let tags: BTreeSet<String> = stmt
                .query_map(params![id], |row| row.get::<_, String>(0))?
                .collect::<Result<_, _>>()?;

            Ok(Document { tags, ..document })
        })
        .await
    }

    async fn search(&self, query: &str) -> StorageResult<Vec<SearchHit>> {
        let Some(match_query) = build_match_query(query) else {
            return Ok(Vec::new());
        };
        let limit = self.max_results;

        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(SEARCH_SQL)?;
            let rows = stmt.query_map(params![match_query, limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, f64>(5)?,
                ))
            })?;

            let mut hits = Vec::new();
            for row in rows {
                let (id, title, doc_type, link, created_at, relevance) = row?;
                hits.push(SearchHit {
                    id,
                    title,
                    doc_type,
                    link,
                    relevance,
                    created_at: parse_timestamp(&created_at)?,
                });
            }
            Ok(hits)
        })
        .await
    }

    async fn record_cycle(&self, record: &CycleRecord) -> StorageResult<i64> {
        let record = record.clone();

        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO crawl_cycles (started_at, finished_at, config_hash, sources_total,
                    sources_failed, documents_upserted, content_missing, records_rejected,
                    storage_failures, cancelled)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.started_at.to_rfc3339(),
                    record.finished_at.to_rfc3339(),
                    record.config_hash,
                    record.sources_total,
                    record.sources_failed,
                    record.documents_upserted,
                    record.content_missing,
                    record.records_rejected,
                    record.storage_failures,
                    record.cancelled,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn recent_cycles(&self, limit: u32) -> StorageResult<Vec<CycleRecord>> {
        self.with_connection(move |conn| query_cycles(conn, limit)).await
    }

    async fn stats(&self) -> StorageResult<StoreStats> {
        self.with_connection(|conn| {
            let count = |sql: &str| -> StorageResult<u64> {
                let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
                Ok(n as u64)
            };

            let documents = count("SELECT COUNT(*) FROM documents")?;
            let documents_with_content =
                count("SELECT COUNT(*) FROM documents WHERE content != ''")?;
            let documents_with_location =
                count("SELECT COUNT(*) FROM documents WHERE location IS NOT NULL")?;
            let tags = count("SELECT COUNT(*) FROM tags")?;

            let mut stmt = conn.prepare(
                "SELECT doc_type, COUNT(*) FROM documents GROUP BY doc_type ORDER BY COUNT(*) DESC, doc_type",
            )?;
            let documents_by_type = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64)))?
                .collect::<Result<Vec<_>, _>>()?;

            let last_cycle = query_cycles(conn, 1)?.into_iter().next();

            Ok(StoreStats {
                documents,
                documents_with_content,
                documents_with_location,
                tags,
                documents_by_type,
                last_cycle,
            })
        })
        .await
    }
}

fn query_cycles(conn: &Connection, limit: u32) -> StorageResult<Vec<CycleRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM crawl_cycles ORDER BY id DESC LIMIT ?1",
        CYCLE_COLUMNS
    ))?;
    let rows = stmt.query_map(params![limit], |row| Ok(cycle_from_row(row)))?;

    let mut cycles = Vec::new();
    for row in rows {
        cycles.push(row??);
    }
    Ok(cycles)
}

/// Maps a documents row; tags are loaded separately
fn document_from_row(row: &Row) -> StorageResult<Document> {
    let location: Option<String> = row.get(6)?;
    let location = location
        .map(|json| serde_json::from_str::<Location>(&json))
        .transpose()?;

    Ok(Document {
        id: row.get(0)?,
        link: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        doc_type: row.get(4)?,
        source: row.get(5)?,
        location,
        tags: Default::default(),
        created_at: parse_timestamp(&row.get::<_, String>(7)?)?,
        updated_at: parse_timestamp(&row.get::<_, String>(8)?)?,
    })
}

fn cycle_from_row(row: &Row) -> StorageResult<CycleRecord> {
    Ok(CycleRecord {
        id: Some(row.get(0)?),
        started_at: parse_timestamp(&row.get::<_, String>(1)?)?,
        finished_at: parse_timestamp(&row.get::<_, String>(2)?)?,
        config_hash: row.get(3)?,
        sources_total: row.get(4)?,
        sources_failed: row.get(5)?,
        documents_upserted: row.get(6)?,
        content_missing: row.get(7)?,
        records_rejected: row.get(8)?,
        storage_failures: row.get(9)?,
        cancelled: row.get(10)?,
    })
}

fn parse_timestamp(value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Serialization(format!("bad timestamp '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir) -> SqliteStore {
        open_store_with(dir, 4, 5_000).await
    }

    async fn open_store_with(dir: &TempDir, pool_size: usize, acquire_timeout_ms: u64) -> SqliteStore {
        let config = DatabaseConfig {
            path: dir.path().join("docket.db").to_string_lossy().into_owned(),
            pool_size,
            acquire_timeout_ms,
            busy_timeout_ms: 5_000,
        };
        SqliteStore::open(&config, 50).await.unwrap()
    }

    fn new_doc(link: &str, title: &str, content: &str) -> NewDocument {
        NewDocument {
            link: link.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            doc_type: "report".to_string(),
            source: "https://example.gov/documents".to_string(),
            location: None,
            tags: vec!["report".to_string()],
        }
    }

    #[tokio::test]
    async fn test_upsert_and_load() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let id = store
            .upsert(new_doc("https://example.gov/a.pdf", "Budget 2024", "Annual budget text"))
            .await
            .unwrap();

        let doc = store.load(id).await.unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.link, "https://example.gov/a.pdf");
        assert_eq!(doc.title, "Budget 2024");
        assert_eq!(doc.content, "Annual budget text");
        assert_eq!(doc.doc_type, "report");
        assert!(doc.tags.contains("report"));
        assert_eq!(doc.created_at, doc.updated_at);
    }

    #[tokio::test]
    async fn test_same_link_keeps_identity() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let first = store
            .upsert(new_doc("https://www.example.gov/a.pdf?utm_source=x", "Old", "text"))
            .await
            .unwrap();
        let before = store.load(first).await.unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = store
            .upsert(new_doc("https://example.gov/a.pdf", "New title", "text"))
            .await
            .unwrap();
        assert_eq!(first, second);

        let after = store.load(second).await.unwrap();
        assert_eq!(after.title, "New title");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(store.stats().await.unwrap().documents, 1);
    }

    #[tokio::test]
    async fn test_empty_content_keeps_last_good_content() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let id = store
            .upsert(new_doc("https://example.gov/a.pdf", "Budget", "real content"))
            .await
            .unwrap();
        store
            .upsert(new_doc("https://example.gov/a.pdf", "", ""))
            .await
            .unwrap();

        let doc = store.load(id).await.unwrap();
        assert_eq!(doc.content, "real content");
        assert_eq!(doc.title, "Budget");

        store
            .upsert(new_doc("https://example.gov/a.pdf", "Budget", "fresh content"))
            .await
            .unwrap();
        assert_eq!(store.load(id).await.unwrap().content, "fresh content");
    }

    #[tokio::test]
    async fn test_tags_accumulate_without_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let mut doc = new_doc("https://example.gov/a.pdf", "Budget", "text");
        doc.tags = vec!["Budget".to_string(), "norfolk".to_string()];
        let id = store.upsert(doc.clone()).await.unwrap();

        doc.tags = vec!["budget ".to_string(), "finance".to_string(), "".to_string()];
        store.upsert(doc).await.unwrap();

        let tags: Vec<_> = store.load(id).await.unwrap().tags.into_iter().collect();
        assert_eq!(tags, vec!["budget", "finance", "norfolk"]);
        assert_eq!(store.stats().await.unwrap().tags, 3);
    }

    #[tokio::test]
    async fn test_location_kept_when_not_redetected() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let location = Location {
            city: Some("Norfolk".to_string()),
            coordinates: Some([36.8508, -76.2859]),
            zip_code: None,
            confidence: 0.8,
        };
        let mut doc = new_doc("https://example.gov/a.pdf", "Norfolk budget", "text");
        doc.location = Some(location.clone());
        let id = store.upsert(doc.clone()).await.unwrap();

        doc.location = None;
        store.upsert(doc).await.unwrap();

        assert_eq!(store.load(id).await.unwrap().location, Some(location));
    }

    #[tokio::test]
    async fn test_invalid_records_rejected() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let err = store
            .upsert(new_doc("not a link", "Title", "text"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
        assert!(!err.is_retryable());

        let mut doc = new_doc("https://example.gov/a.pdf", "Title", "text");
        doc.doc_type = " ".to_string();
        assert!(matches!(
            store.upsert(doc).await,
            Err(StorageError::ConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_load_missing_document() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        assert!(matches!(store.load(42).await, Err(StorageError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_search_ranks_matches() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let budget_id = store
            .upsert(new_doc(
                "https://example.gov/budget.pdf",
                "Budget 2024",
                "The annual budget covers schools and roads.",
            ))
            .await
            .unwrap();
        store
            .upsert(new_doc(
                "https://example.gov/zoning.pdf",
                "Zoning update",
                "Changes to residential zoning districts.",
            ))
            .await
            .unwrap();
        let mention_id = store
            .upsert(new_doc(
                "https://example.gov/minutes.pdf",
                "Council minutes",
                "Discussion of the budget timeline.",
            ))
            .await
            .unwrap();

        let hits = store.search("budget").await.unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![budget_id, mention_id]);
        assert!(hits[0].relevance >= hits[1].relevance);
        assert!(hits.iter().all(|h| h.relevance > 0.0));

        assert!(store.search("xyzzy").await.unwrap().is_empty());
        assert!(store.search("   ").await.unwrap().is_empty());

        let hits = store.search("budget -timeline").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, budget_id);

        let hits = store.search("+zon*").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Zoning update");
    }

    #[tokio::test]
    async fn test_search_sees_updated_content() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store
            .upsert(new_doc("https://example.gov/a.pdf", "Notice", "water rates"))
            .await
            .unwrap();
        store
            .upsert(new_doc("https://example.gov/a.pdf", "Notice", "sewer fees"))
            .await
            .unwrap();

        assert!(store.search("water").await.unwrap().is_empty());
        assert_eq!(store.search("sewer").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_result_bound() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("docket.db").to_string_lossy().into_owned(),
            pool_size: 2,
            acquire_timeout_ms: 5_000,
            busy_timeout_ms: 5_000,
        };
        let store = SqliteStore::open(&config, 3).await.unwrap();

        for i in 0..5 {
            store
                .upsert(new_doc(
                    &format!("https://example.gov/{}.pdf", i),
                    "Agenda",
                    "meeting agenda",
                ))
                .await
                .unwrap();
        }

        assert_eq!(store.search("agenda").await.unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_same_link() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(open_store(&dir).await);

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let mut doc = new_doc("https://example.gov/same.pdf", "Same", "text");
                doc.tags = vec![format!("tag{}", i % 3)];
                store.upsert(doc).await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.documents, 1);
        assert_eq!(store.load(ids[0]).await.unwrap().tags.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_never_tear_a_document() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(open_store(&dir).await);

        let mut handles = Vec::new();
        for i in 0..12 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let doc = new_doc(
                    "https://example.gov/minutes.pdf",
                    &format!("Minutes revision {}", i),
                    &format!("minutes body written by writer {}", i),
                );
                store.upsert(doc).await
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap());
        }
        assert_eq!(ids.len(), 1);
        assert_eq!(store.stats().await.unwrap().documents, 1);

        let id = ids.into_iter().next().unwrap();
        let stored = store.load(id).await.unwrap();
        let writer = stored
            .title
            .strip_prefix("Minutes revision ")
            .expect("title comes from one of the writers");
        assert_eq!(
            stored.content,
            format!("minutes body written by writer {}", writer)
        );
    }

    #[tokio::test]
    async fn test_exhausted_pool_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = open_store_with(&dir, 1, 50).await;

        let _held = store.pool.get().await.unwrap();
        let err = store.load(1).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.close();
        assert!(matches!(
            store.search("budget").await,
            Err(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_cycle_history_and_stats() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let mut doc = new_doc("https://example.gov/a.pdf", "Budget", "");
        doc.doc_type = "budget".to_string();
        store.upsert(doc).await.unwrap();
        store
            .upsert(new_doc("https://example.gov/b.pdf", "Minutes", "text"))
            .await
            .unwrap();

        let started_at = Utc::now();
        for upserted in [2, 5] {
            let record = CycleRecord {
                id: None,
                started_at,
                finished_at: started_at,
                config_hash: "abc".to_string(),
                sources_total: 3,
                sources_failed: 1,
                documents_upserted: upserted,
                content_missing: 1,
                records_rejected: 0,
                storage_failures: upserted - 2,
                cancelled: false,
            };
            store.record_cycle(&record).await.unwrap();
        }

        let cycles = store.recent_cycles(10).await.unwrap();
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].documents_upserted, 5);
        assert_eq!(cycles[1].documents_upserted, 2);
        assert_eq!(cycles[0].storage_failures, 3);
        assert_eq!(cycles[1].storage_failures, 0);

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.documents_with_content, 1);
        assert_eq!(stats.documents_with_location, 0);
        assert_eq!(stats.documents_by_type.len(), 2);
        assert_eq!(stats.last_cycle.map(|c| c.documents_upserted), Some(5));
    }
}
