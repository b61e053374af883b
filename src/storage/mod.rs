//! Storage module for persisting harvested jobs
//!
//! This module handles all database operations for the harvester, including:
//! - SQLite database initialization and schema management
//! - Job record upserts keyed by the source-assigned listing id
//! - Expired job cleanup
//! - Filter catalog seeding and enumeration

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{JobStore, StorageError, StorageResult, UpsertOutcome};

use crate::SaqmeError;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(SaqmeError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SaqmeError> {
    Ok(SqliteStorage::new(path)?)
}

/// A normalized job record as persisted to the database
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    /// Surrogate identifier assigned at conversion time
    pub id: String,
    /// Source-assigned listing identifier; the natural key for upserts
    pub external_id: i64,
    pub title: String,
    pub company: String,
    pub company_img_url: Option<String>,
    pub type_name: String,
    pub location_name: String,
    pub category_name: String,
    pub type_id: i64,
    pub location_id: i64,
    pub category_id: i64,
    /// When the listing was published, normalized to UTC
    pub published_at: DateTime<Utc>,
    /// Application deadline, normalized to UTC
    pub deadline_at: DateTime<Utc>,
}

/// One entry of a filter catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Storage key
    pub id: i64,
    /// Display name
    pub name: String,
    /// Source-site wire value; 0 means "no filter"
    pub value: i64,
}

impl FilterOption {
    /// True for the "no filter" entry, which sweeps skip
    pub fn is_wildcard(&self) -> bool {
        self.value == 0
    }
}

/// Which filter catalog a storage call addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    JobType,
    Location,
    Category,
}

impl FilterKind {
    /// Name of the backing table
    pub fn table(&self) -> &'static str {
        match self {
            Self::JobType => "job_types",
            Self::Location => "locations",
            Self::Category => "categories",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_kind_tables_are_distinct() {
        let tables = [
            FilterKind::JobType.table(),
            FilterKind::Location.table(),
            FilterKind::Category.table(),
        ];
        assert_eq!(tables, ["job_types", "locations", "categories"]);
    }

    #[test]
    fn test_wildcard_detection() {
        let any = FilterOption {
            id: 1,
            name: "Any".to_string(),
            value: 0,
        };
        let tbilisi = FilterOption {
            id: 2,
            name: "Tbilisi".to_string(),
            value: 1,
        };

        assert!(any.is_wildcard());
        assert!(!tbilisi.is_wildcard());
    }
}
