//! Output module for terminal reports
//!
//! This module handles:
//! - Formatting crawl cycle summaries
//! - Formatting search results and single documents
//! - Loading and formatting store statistics

mod summary;
pub mod stats;

pub use stats::{format_statistics, load_statistics, print_statistics, StoreReport};
pub use summary::{format_cycle_summary, format_document, format_search_results};
