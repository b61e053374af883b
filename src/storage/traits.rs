//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{FilterKind, FilterOption, JobRecord};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid stored timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Counts reported by a bulk upsert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Records that did not exist before
    pub inserted: u64,
    /// Records that were refreshed in place
    pub updated: u64,
}

impl UpsertOutcome {
    /// Total records written
    pub fn total(&self) -> u64 {
        self.inserted + self.updated
    }
}

/// Trait for job storage backend implementations
///
/// This trait defines all database operations needed by the harvester.
/// Records are keyed by the source-assigned listing id, so repeated
/// harvests refresh existing rows instead of duplicating them.
pub trait JobStore {
    // ===== Job Management =====

    /// Inserts or updates job records keyed by their external id
    ///
    /// Existing records are updated in place: the surrogate id and the
    /// creation timestamp of the stored row survive the refresh.
    ///
    /// # Arguments
    ///
    /// * `jobs` - Records to write
    ///
    /// # Returns
    ///
    /// Counts of newly inserted and refreshed records
    fn upsert_jobs(&mut self, jobs: &[JobRecord]) -> StorageResult<UpsertOutcome>;

    /// Returns all stored jobs, most recently created first
    fn list_jobs(&self) -> StorageResult<Vec<JobRecord>>;

    /// Number of stored jobs
    fn count_jobs(&self) -> StorageResult<u64>;

    /// Deletes every stored job, returning how many were removed
    fn delete_all_jobs(&mut self) -> StorageResult<u64>;

    /// Deletes jobs whose deadline is strictly before the given instant
    ///
    /// # Arguments
    ///
    /// * `now` - Cutoff instant; jobs expiring exactly at it survive
    ///
    /// # Returns
    ///
    /// How many jobs were removed
    fn delete_jobs_with_deadline_before(&mut self, now: DateTime<Utc>) -> StorageResult<u64>;

    // ===== Filter Catalogs =====

    /// Returns one filter catalog ordered by id
    fn list_filter_options(&self, kind: FilterKind) -> StorageResult<Vec<FilterOption>>;

    /// Bulk-inserts catalog entries, skipping ids that already exist
    ///
    /// # Returns
    ///
    /// How many entries were actually inserted
    fn seed_filter_options(
        &mut self,
        kind: FilterKind,
        options: &[FilterOption],
    ) -> StorageResult<u64>;
}
