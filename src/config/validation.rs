use crate::config::types::{
    CatalogEntry, ClientConfig, Config, CrawlConfig, ScheduleConfig, SourceConfig, StorageConfig,
    SweepConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_client_config(&config.client)?;
    validate_crawl_config(&config.crawl)?;
    validate_sweep_config(&config.sweep)?;
    validate_storage_config(&config.storage)?;
    validate_schedule_config(&config.schedule)?;
    validate_catalog("types", &config.types)?;
    validate_catalog("locations", &config.locations)?;
    validate_catalog("categories", &config.categories)?;
    Ok(())
}

/// Validates source site configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use an http or https scheme, got '{}'",
            base.scheme()
        )));
    }

    base.join(&config.listing_path)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing-path: {}", e)))?;

    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    // Validate contact URL
    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    // Validate contact email (basic validation)
    validate_email(&config.contact_email)?;

    // A valid header value must be non-empty visible ASCII
    if config.accept_language.is_empty()
        || !config
            .accept_language
            .chars()
            .all(|c| c.is_ascii() && c != '\r' && c != '\n')
    {
        return Err(ConfigError::Validation(format!(
            "accept-language must be a non-empty ASCII header value, got '{}'",
            config.accept_language
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates single-query crawl defaults
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > 100 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between 1 and 100, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates sweep configuration
fn validate_sweep_config(config: &SweepConfig) -> Result<(), ConfigError> {
    if config.combination_delay_ms < 1000 {
        return Err(ConfigError::Validation(format!(
            "combination-delay-ms must be >= 1000ms, got {}ms",
            config.combination_delay_ms
        )));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates scheduled trigger configuration
fn validate_schedule_config(config: &ScheduleConfig) -> Result<(), ConfigError> {
    validate_cron("schedule.purge", &config.purge)?;
    validate_cron("schedule.sweep", &config.sweep)?;
    Ok(())
}

/// Checks the shape of a six-field cron expression
///
/// The scheduler parses the expression fully at registration time; this only
/// rejects obviously broken values before any crawling starts.
fn validate_cron(field: &str, expression: &str) -> Result<(), ConfigError> {
    let fields = expression.split_whitespace().count();
    if fields != 6 && fields != 7 {
        return Err(ConfigError::Validation(format!(
            "{} must be a 6-field cron expression (sec min hour dom month dow), got '{}'",
            field, expression
        )));
    }

    Ok(())
}

/// Validates one filter catalog
fn validate_catalog(name: &str, entries: &[CatalogEntry]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();
    let mut seen_values = HashSet::new();

    for entry in entries {
        if entry.name.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{}: entry {} has an empty name",
                name, entry.id
            )));
        }

        if entry.value < 0 {
            return Err(ConfigError::Validation(format!(
                "{}: entry '{}' has a negative value {}",
                name, entry.name, entry.value
            )));
        }

        if !seen_ids.insert(entry.id) {
            return Err(ConfigError::Validation(format!(
                "{}: duplicate id {}",
                name, entry.id
            )));
        }

        if !seen_values.insert(entry.value) {
            return Err(ConfigError::Validation(format!(
                "{}: duplicate value {} on entry '{}'",
                name, entry.value, entry.name
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
