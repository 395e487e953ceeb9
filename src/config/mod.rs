//! Configuration module for Docket
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use docket::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docket.toml")).unwrap();
//! println!("Crawling {} sources", config.sources.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DatabaseConfig, FamilyName, ScheduleConfig, SearchConfig, SourceEntry,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, hash_content, load_config, load_config_with_hash, parse_config};
