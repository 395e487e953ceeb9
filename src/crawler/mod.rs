//! Crawler module for harvesting documents from listing pages
//!
//! This module contains the crawl pipeline, including:
//! - HTTP fetching with bounded timeouts
//! - Listing extraction per source family
//! - Document content resolution (HTML, PDF, plain text)
//! - Cycle orchestration with per-source failure isolation
//! - Recurring and manual cycle scheduling

mod extractor;
mod fetcher;
mod orchestrator;
mod report;
mod resolver;
mod schedule;
mod scheduler;

pub use extractor::{extract, CustomSelectors, DocumentDescriptor, ExtractError, SourceFamily};
pub use fetcher::{build_http_client, FetchError, FetchedBody, Fetcher};
pub use orchestrator::{CrawlOrchestrator, Source};
pub use report::{CycleSummary, ItemOutcome, ItemStatus, SourceFailure, SourceReport, SourceStatus};
pub use resolver::{html_main_text, ContentResolver, ContentUnavailable, ResolvedContent};
pub use schedule::Schedule;
pub use scheduler::Scheduler;
