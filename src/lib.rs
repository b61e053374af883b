//! Saqme: a polite job board harvester
//!
//! This crate implements a crawler for a paginated job listing board. It
//! fetches listing pages politely, extracts structured job records from the
//! HTML, normalizes the board's date formats, and persists deduplicated
//! records to SQLite. A full-catalog sweep walks every filter combination to
//! approximate complete coverage of a board whose pagination is shallow.

pub mod config;
pub mod crawler;
pub mod schedule;
pub mod storage;

use thiserror::Error;

/// Main error type for Saqme operations
#[derive(Debug, Error)]
pub enum SaqmeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed for {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("A full-catalog sweep is already running")]
    SweepInProgress,

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio_cron_scheduler::JobSchedulerError> for SaqmeError {
    fn from(e: tokio_cron_scheduler::JobSchedulerError) -> Self {
        SaqmeError::Scheduler(e.to_string())
    }
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
}

/// Result type alias for Saqme operations
pub type Result<T> = std::result::Result<T, SaqmeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    CrawlRequest, CrawlResult, Crawler, RawListing, StopReason, SweepSummary, Sweeper,
};
pub use storage::{FilterKind, FilterOption, JobRecord, JobStore, SqliteStorage};
