//! Crawl orchestration
//!
//! One cycle walks every configured source:
//! fetch listing → extract descriptors → resolve content → upsert.
//!
//! Sources run concurrently up to `max-concurrent-sources`; descriptors of a
//! single source are resolved concurrently up to `max-concurrent-resolves`
//! but reach the store in listing order. Failures are isolated per source
//! and per descriptor and reported in the returned [`CycleSummary`].

use super::extractor::{extract, DocumentDescriptor, SourceFamily};
use super::fetcher::Fetcher;
use super::report::{CycleSummary, ItemOutcome, ItemStatus, SourceFailure, SourceReport};
use super::resolver::{ContentResolver, ResolvedContent};
use crate::config::{Config, CrawlerConfig, SourceEntry};
use crate::location::detect_location;
use crate::storage::{DocumentStore, NewDocument, StorageError};
use crate::url::host_tag;
use crate::{ConfigError, DocketError};
use chrono::Utc;
use futures::future;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A configured listing page, ready to crawl
#[derive(Debug, Clone)]
pub struct Source {
    pub url: Url,
    pub family: SourceFamily,

    /// Stored as the document type
    pub category: String,

    /// Tags applied to every document from this source
    pub tags: Vec<String>,
}

impl Source {
    pub fn from_entry(entry: &SourceEntry) -> Result<Self, ConfigError> {
        let url = Url::parse(&entry.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", entry.url, e)))?;

        Ok(Self {
            url,
            family: SourceFamily::from_entry(entry)?,
            category: entry.category.trim().to_string(),
            tags: entry.tags.clone(),
        })
    }

    /// Tags for a document from this source
    fn document_tags(&self, locality: Option<&str>) -> Vec<String> {
        let mut tags = vec![self.category.clone(), self.family.name().to_string()];
        tags.extend(host_tag(&self.url));
        tags.extend(locality.map(str::to_lowercase));
        tags.extend(self.tags.iter().cloned());
        tags
    }
}

/// Runs crawl cycles over a fixed set of sources
pub struct CrawlOrchestrator {
    sources: Vec<Source>,
    fetcher: Fetcher,
    resolver: ContentResolver,
    store: Arc<dyn DocumentStore>,
    max_concurrent_sources: usize,
    max_concurrent_resolves: usize,
    config_hash: String,
}

impl CrawlOrchestrator {
    pub fn new(
        sources: Vec<Source>,
        fetcher: Fetcher,
        resolver: ContentResolver,
        store: Arc<dyn DocumentStore>,
        config: &CrawlerConfig,
    ) -> Self {
        Self {
            sources,
            fetcher,
            resolver,
            store,
            max_concurrent_sources: config.max_concurrent_sources.max(1) as usize,
            max_concurrent_resolves: config.max_concurrent_resolves.max(1) as usize,
            config_hash: String::new(),
        }
    }

    /// Builds the orchestrator and its HTTP stack from a validated config
    pub fn from_config(
        config: &Config,
        config_hash: String,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, DocketError> {
        let sources = config
            .sources
            .iter()
            .map(Source::from_entry)
            .collect::<Result<Vec<_>, _>>()?;

        let fetcher = Fetcher::new(&config.crawler, &config.user_agent)?;
        let resolver = ContentResolver::new(fetcher.clone(), config.crawler.max_content_length);

        Ok(Self::new(sources, fetcher, resolver, store, &config.crawler).with_config_hash(config_hash))
    }

    /// Hash of the configuration recorded with each cycle
    pub fn with_config_hash(mut self, config_hash: String) -> Self {
        self.config_hash = config_hash;
        self
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Runs one full cycle over all sources
    ///
    /// Cancellation is checked before each source and each descriptor
    /// starts. Work already in flight finishes normally; sources that never
    /// started are reported as skipped.
    pub async fn run(&self, cancel: &CancellationToken) -> CycleSummary {
        let started_at = Utc::now();
        tracing::info!(sources = self.sources.len(), "Starting crawl cycle");

        let pending: Vec<_> = self
            .sources
            .iter()
            .map(|source| self.run_source(source, cancel))
            .collect();

        let reports: Vec<SourceReport> = stream::iter(pending)
            .buffered(self.max_concurrent_sources)
            .collect()
            .await;

        let summary = CycleSummary::new(
            started_at,
            self.config_hash.clone(),
            cancel.is_cancelled(),
            reports,
        );

        if let Err(e) = self.store.record_cycle(&summary.to_record()).await {
            tracing::warn!(error = %e, "Failed to record crawl cycle");
        }

        tracing::info!(
            documents = summary.documents_upserted,
            sources_failed = summary.sources_failed,
            content_missing = summary.content_missing,
            rejected = summary.records_rejected,
            cancelled = summary.cancelled,
            "Crawl cycle finished"
        );

        summary
    }

    async fn run_source(&self, source: &Source, cancel: &CancellationToken) -> SourceReport {
        if cancel.is_cancelled() {
            tracing::info!(source = %source.url, "Cycle cancelled, skipping source");
            return SourceReport::skipped(source.url.as_str());
        }
        self.crawl_source(source, cancel).await
    }

    async fn crawl_source(&self, source: &Source, cancel: &CancellationToken) -> SourceReport {
        let source_url = source.url.as_str();
        tracing::debug!(source = source_url, family = source.family.name(), "Fetching listing");

        let (final_url, markup) = match self.fetcher.fetch_page(source_url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(source = source_url, error = %e, "Listing fetch failed");
                return SourceReport::failed(source_url, SourceFailure::Transport(e));
            }
        };

        let base_url = Url::parse(&final_url).unwrap_or_else(|_| source.url.clone());
        let descriptors = match extract(&markup, &base_url, &source.family, &source.category) {
            Ok(descriptors) => descriptors,
            Err(e) => {
                tracing::warn!(source = source_url, error = %e, "Listing extraction failed");
                return SourceReport::failed(source_url, SourceFailure::Parse(e));
            }
        };

        tracing::info!(
            source = source_url,
            documents = descriptors.len(),
            "Listing extracted"
        );

        let listed = descriptors.len();
        let items: Vec<ItemOutcome> = stream::iter(descriptors)
            .take_while(|_| future::ready(!cancel.is_cancelled()))
            .map(|descriptor| async move {
                let content = self.resolver.resolve(&descriptor).await;
                (descriptor, content)
            })
            .buffered(self.max_concurrent_resolves)
            .then(|(descriptor, content)| self.store_document(source, descriptor, content))
            .collect()
            .await;

        let items_skipped = (listed - items.len()) as u32;
        if items_skipped > 0 {
            tracing::info!(
                source = source_url,
                items_skipped,
                "Cycle cancelled, remaining documents skipped"
            );
        }

        SourceReport::completed(source_url, items).with_items_skipped(items_skipped)
    }

    async fn store_document(
        &self,
        source: &Source,
        descriptor: DocumentDescriptor,
        content: ResolvedContent,
    ) -> ItemOutcome {
        let content_missing = !content.is_available();
        let content = content.into_text();

        let location = detect_location(&descriptor.title, &content);
        let locality = location.as_ref().and_then(|l| l.city.as_deref());
        let tags = source.document_tags(locality);

        let document = NewDocument {
            link: descriptor.link.clone(),
            title: descriptor.title.clone(),
            content,
            doc_type: descriptor.doc_type,
            source: source.url.to_string(),
            location,
            tags,
        };

        let status = match self.store.upsert(document).await {
            Ok(id) => {
                tracing::trace!(id, link = %descriptor.link, "Document stored");
                ItemStatus::Stored {
                    id,
                    content_missing,
                }
            }
            Err(e @ StorageError::ConstraintViolation(_)) => {
                tracing::warn!(link = %descriptor.link, error = %e, "Document rejected");
                ItemStatus::Rejected(e.to_string())
            }
            Err(e) => {
                tracing::warn!(link = %descriptor.link, error = %e, "Document not stored");
                ItemStatus::StorageFailed(e.to_string())
            }
        };

        ItemOutcome {
            link: descriptor.link,
            title: descriptor.title,
            status,
        }
    }
}
