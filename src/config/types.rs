use serde::Deserialize;

/// Main configuration structure for Docket
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(rename = "source", default)]
    pub sources: Vec<SourceEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of sources processed concurrently within one cycle
    #[serde(rename = "max-concurrent-sources", default = "default_concurrency")]
    pub max_concurrent_sources: u32,

    /// Number of content fetches in flight per source
    #[serde(rename = "max-concurrent-resolves", default = "default_concurrency")]
    pub max_concurrent_resolves: u32,

    /// Total time allowed for a single HTTP request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Characters of extracted text kept per document
    #[serde(rename = "max-content-length", default = "default_max_content_length")]
    pub max_content_length: usize,

    /// Largest response body read from the network (bytes)
    #[serde(rename = "max-body-bytes", default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sources: default_concurrency(),
            max_concurrent_resolves: default_concurrency(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_content_length: default_max_content_length(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,

    /// Maximum number of pooled connections
    #[serde(rename = "pool-size", default = "default_pool_size")]
    pub pool_size: usize,

    /// How long a caller waits for a free connection (milliseconds)
    #[serde(rename = "acquire-timeout-ms", default = "default_db_timeout")]
    pub acquire_timeout_ms: u64,

    /// How long a statement waits on a locked database (milliseconds)
    #[serde(rename = "busy-timeout-ms", default = "default_db_timeout")]
    pub busy_timeout_ms: u64,
}

/// Recurring crawl schedule
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Cron-style expression, minute and hour fields only (e.g. "0 2 * * *")
    #[serde(default = "default_schedule_expression")]
    pub expression: String,

    /// Run one cycle immediately when the scheduler starts
    #[serde(rename = "run-on-start", default)]
    pub run_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            expression: default_schedule_expression(),
            run_on_start: false,
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Upper bound on the number of ranked results returned
    #[serde(rename = "max-results", default = "default_max_results")]
    pub max_results: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

/// Listing page family, selecting the extraction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FamilyName {
    #[default]
    DocumentCenter,
    LinkList,
    Custom,
}

impl FamilyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentCenter => "document-center",
            Self::LinkList => "link-list",
            Self::Custom => "custom",
        }
    }
}

/// A listing page to crawl every cycle
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    /// Listing page URL
    pub url: String,

    #[serde(default)]
    pub family: FamilyName,

    /// Category stored as the document type
    #[serde(default = "default_category")]
    pub category: String,

    /// Extra tags applied to every document from this source
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(rename = "item-selector")]
    pub item_selector: Option<String>,

    #[serde(rename = "title-selector")]
    pub title_selector: Option<String>,

    #[serde(rename = "link-selector")]
    pub link_selector: Option<String>,
}

fn default_concurrency() -> u32 {
    4
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_content_length() -> usize {
    200_000
}

fn default_max_body_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_pool_size() -> usize {
    8
}

fn default_db_timeout() -> u64 {
    5_000
}

fn default_schedule_expression() -> String {
    "0 2 * * *".to_string()
}

fn default_max_results() -> u32 {
    50
}

fn default_category() -> String {
    "document".to_string()
}
