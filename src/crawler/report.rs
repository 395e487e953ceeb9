//! Per-item, per-source and per-cycle outcomes
//!
//! Every failure the orchestrator tolerates ends up here as a value, so a
//! cycle's result can be inspected without reading logs.

use super::extractor::ExtractError;
use super::fetcher::FetchError;
use crate::storage::CycleRecord;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// What happened to one descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum ItemStatus {
    /// Stored (inserted or updated) under `id`
    Stored { id: i64, content_missing: bool },

    /// The store refused the record itself
    Rejected(String),

    /// The store could not be reached
    StorageFailed(String),
}

#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub link: String,
    pub title: String,
    pub status: ItemStatus,
}

/// Why a source produced nothing this cycle
#[derive(Debug, Clone, Error)]
pub enum SourceFailure {
    #[error(transparent)]
    Transport(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ExtractError),
}

#[derive(Debug, Clone)]
pub enum SourceStatus {
    Completed,
    Failed(SourceFailure),

    /// Not started because the cycle was cancelled
    Skipped,
}

/// Outcome of crawling one configured source
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: String,
    pub status: SourceStatus,
    pub items: Vec<ItemOutcome>,

    /// Descriptors never started because the cycle was cancelled
    pub items_skipped: u32,
}

impl SourceReport {
    pub fn completed(source: &str, items: Vec<ItemOutcome>) -> Self {
        Self {
            source: source.to_string(),
            status: SourceStatus::Completed,
            items,
            items_skipped: 0,
        }
    }

    pub fn with_items_skipped(mut self, items_skipped: u32) -> Self {
        self.items_skipped = items_skipped;
        self
    }

    pub fn failed(source: &str, failure: SourceFailure) -> Self {
        Self {
            source: source.to_string(),
            status: SourceStatus::Failed(failure),
            items: Vec::new(),
            items_skipped: 0,
        }
    }

    pub fn skipped(source: &str) -> Self {
        Self {
            source: source.to_string(),
            status: SourceStatus::Skipped,
            items: Vec::new(),
            items_skipped: 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SourceStatus::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, SourceStatus::Skipped)
    }

    pub fn documents_upserted(&self) -> u32 {
        self.count(|s| matches!(s, ItemStatus::Stored { .. }))
    }

    pub fn content_missing(&self) -> u32 {
        self.count(|s| {
            matches!(
                s,
                ItemStatus::Stored {
                    content_missing: true,
                    ..
                }
            )
        })
    }

    pub fn records_rejected(&self) -> u32 {
        self.count(|s| matches!(s, ItemStatus::Rejected(_)))
    }

    pub fn storage_failures(&self) -> u32 {
        self.count(|s| matches!(s, ItemStatus::StorageFailed(_)))
    }

    fn count(&self, pred: impl Fn(&ItemStatus) -> bool) -> u32 {
        self.items.iter().filter(|item| pred(&item.status)).count() as u32
    }
}

/// Result of one crawl cycle
#[derive(Debug, Clone)]
pub struct CycleSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: String,
    pub sources_total: u32,
    pub sources_failed: u32,
    pub sources_skipped: u32,
    pub documents_upserted: u32,
    pub content_missing: u32,
    pub records_rejected: u32,
    pub storage_failures: u32,
    pub items_skipped: u32,
    pub cancelled: bool,
    pub reports: Vec<SourceReport>,
}

impl CycleSummary {
    /// Aggregates source reports into cycle totals
    pub fn new(
        started_at: DateTime<Utc>,
        config_hash: String,
        cancelled: bool,
        reports: Vec<SourceReport>,
    ) -> Self {
        let sum = |f: fn(&SourceReport) -> u32| reports.iter().map(f).sum::<u32>();

        Self {
            started_at,
            finished_at: Utc::now(),
            config_hash,
            sources_total: reports.len() as u32,
            sources_failed: reports.iter().filter(|r| r.is_failed()).count() as u32,
            sources_skipped: reports.iter().filter(|r| r.is_skipped()).count() as u32,
            documents_upserted: sum(SourceReport::documents_upserted),
            content_missing: sum(SourceReport::content_missing),
            records_rejected: sum(SourceReport::records_rejected),
            storage_failures: sum(SourceReport::storage_failures),
            items_skipped: reports.iter().map(|r| r.items_skipped).sum(),
            cancelled,
            reports,
        }
    }

    /// Row persisted in the cycle history
    pub fn to_record(&self) -> CycleRecord {
        CycleRecord {
            id: None,
            started_at: self.started_at,
            finished_at: self.finished_at,
            config_hash: self.config_hash.clone(),
            sources_total: self.sources_total,
            sources_failed: self.sources_failed,
            documents_upserted: self.documents_upserted,
            content_missing: self.content_missing,
            records_rejected: self.records_rejected,
            storage_failures: self.storage_failures,
            cancelled: self.cancelled,
        }
    }
}
