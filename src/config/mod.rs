//! Configuration module for Saqme
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use saqme::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Database at: {}", config.storage.database_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CatalogEntry, ClientConfig, Config, CrawlConfig, ScheduleConfig, SourceConfig, StorageConfig,
    SweepConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
