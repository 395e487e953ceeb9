//! Docket: a government document harvester
//!
//! This crate crawls document listing pages published by government sites,
//! extracts candidate documents, resolves their text content and persists them
//! into a searchable SQLite store with deduplication and tagging.

pub mod config;
pub mod crawler;
pub mod location;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Docket operations
#[derive(Debug, Error)]
pub enum DocketError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("A crawl cycle is already running")]
    CycleInProgress,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid schedule expression: {0}")]
    InvalidSchedule(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Docket operations
pub type Result<T> = std::result::Result<T, DocketError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOrchestrator, CycleSummary, Scheduler};
pub use storage::{Document, DocumentStore, SearchHit, SqliteStore, StorageError};
pub use crate::url::{extract_domain, normalize_url, resolve_link};
