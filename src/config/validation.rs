use crate::config::types::{
    Config, CrawlerConfig, DatabaseConfig, SearchConfig, SourceEntry, UserAgentConfig,
};
use crate::crawler::{Schedule, SourceFamily};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_database_config(&config.database)?;
    validate_search_config(&config.search)?;
    Schedule::parse(&config.schedule.expression)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    check_range(
        "max_concurrent_sources",
        config.max_concurrent_sources as u64,
        1,
        32,
    )?;
    check_range(
        "max_concurrent_resolves",
        config.max_concurrent_resolves as u64,
        1,
        32,
    )?;

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_content_length < 1_000 {
        return Err(ConfigError::Validation(format!(
            "max_content_length must be >= 1000, got {}",
            config.max_content_length
        )));
    }

    if config.max_body_bytes < 1_024 {
        return Err(ConfigError::Validation(format!(
            "max_body_bytes must be >= 1024, got {}",
            config.max_body_bytes
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the document store configuration
fn validate_database_config(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database path cannot be empty".to_string(),
        ));
    }

    check_range("pool_size", config.pool_size as u64, 1, 64)?;

    if config.acquire_timeout_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "acquire_timeout_ms must be >= 10ms, got {}ms",
            config.acquire_timeout_ms
        )));
    }

    if config.busy_timeout_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "busy_timeout_ms must be >= 10ms, got {}ms",
            config.busy_timeout_ms
        )));
    }

    Ok(())
}

fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    check_range("max_results", config.max_results as u64, 1, 500)
}

/// Validates the configured listing sources
fn validate_sources(sources: &[SourceEntry]) -> Result<(), ConfigError> {
    if sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[source]] must be configured".to_string(),
        ));
    }

    for entry in sources {
        let url = Url::parse(&entry.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid source URL '{}': {}", entry.url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Source URL '{}' must use HTTP or HTTPS",
                entry.url
            )));
        }

        if entry.category.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Source '{}' has an empty category",
                entry.url
            )));
        }

        // Builds the extraction strategy, which checks custom selectors
        SourceFamily::from_entry(entry)?;
    }

    Ok(())
}

fn check_range(name: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Validation(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Must contain exactly one @ with text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
