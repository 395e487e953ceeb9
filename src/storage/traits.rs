//! Storage traits and error types
//!
//! This module defines the trait interface for document store backends and
//! the error taxonomy callers use to tell transient outages from bad records.

use crate::storage::{CycleRecord, Document, NewDocument, SearchHit, StoreStats};
use async_trait::async_trait;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be reached in time (pool exhausted, database
    /// locked, I/O failure). Retrying later may succeed.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The record itself is invalid. Retrying will not help.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Document not found: {0}")]
    NotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl StorageError {
    /// Whether the same call might succeed if retried later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::SystemIoFailure
                | ErrorCode::CannotOpen
                | ErrorCode::DiskFull
                | ErrorCode::OutOfMemory => Self::Unavailable(err.to_string()),
                ErrorCode::ConstraintViolation => Self::ConstraintViolation(err.to_string()),
                _ => Self::Database(err.to_string()),
            },
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document store implementations
///
/// Implementations must be safe to share across tasks: every method may be
/// called concurrently from many in-flight crawl and search operations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document or updates the one with the same natural key
    ///
    /// # Returns
    ///
    /// The stable identifier of the stored document. Re-upserting the same
    /// link always returns the same identifier.
    async fn upsert(&self, document: NewDocument) -> StorageResult<i64>;

    /// Loads a document with its tags
    async fn load(&self, id: i64) -> StorageResult<Document>;

    /// Full-text search over titles and content, best matches first
    ///
    /// An empty result means nothing matched. An outage is always an error.
    async fn search(&self, query: &str) -> StorageResult<Vec<SearchHit>>;

    /// Appends a finished cycle to the history
    async fn record_cycle(&self, record: &CycleRecord) -> StorageResult<i64>;

    /// Most recent cycles, newest first
    async fn recent_cycles(&self, limit: u32) -> StorageResult<Vec<CycleRecord>>;

    /// Aggregate counts over the store
    async fn stats(&self) -> StorageResult<StoreStats>;
}
