//! Storage module for persisting harvested documents
//!
//! This module handles all database operations, including:
//! - SQLite schema management and connection pooling
//! - Deduplicating document upserts keyed by normalized link
//! - Tag associations
//! - Full-text search with ranked results
//! - Crawl cycle history

mod query;
mod schema;
mod sqlite;
mod traits;

pub use query::build_match_query;
pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, StorageError, StorageResult};

use crate::location::Location;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// A document as handed to the store by the crawler
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    /// Link to the document; normalized into the natural key on upsert
    pub link: String,

    /// Title; an empty title never replaces a stored one
    pub title: String,

    /// Extracted text; empty when content could not be resolved
    pub content: String,

    pub doc_type: String,

    /// Listing page URL the document was discovered on
    pub source: String,

    pub location: Option<Location>,

    /// Tags to associate; existing associations are kept
    pub tags: Vec<String>,
}

/// A persisted document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: i64,
    pub link: String,
    pub title: String,
    pub content: String,
    pub doc_type: String,
    pub source: String,
    pub location: Option<Location>,
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub title: String,
    pub doc_type: String,
    pub link: String,

    /// Higher is more relevant
    pub relevance: f64,

    pub created_at: DateTime<Utc>,
}

/// Persisted summary of one crawl cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleRecord {
    /// Row identifier; `None` until recorded
    pub id: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: String,
    pub sources_total: u32,
    pub sources_failed: u32,
    pub documents_upserted: u32,
    pub content_missing: u32,
    pub records_rejected: u32,

    /// Upserts lost to store outages during the cycle
    pub storage_failures: u32,
    pub cancelled: bool,
}

/// Aggregate counts over the document store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    pub documents: u64,
    pub documents_with_content: u64,
    pub documents_with_location: u64,
    pub tags: u64,
    pub documents_by_type: Vec<(String, u64)>,
    pub last_cycle: Option<CycleRecord>,
}

/// Lowercases and trims tags, dropping empty ones and duplicates
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
