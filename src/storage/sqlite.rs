//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the JobStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{JobStore, StorageResult, UpsertOutcome};
use crate::storage::{FilterKind, FilterOption, JobRecord};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Reads an RFC 3339 timestamp column back into a UTC instant
fn read_timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn job_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<JobRecord> {
    Ok(JobRecord {
        id: row.get(0)?,
        external_id: row.get(1)?,
        title: row.get(2)?,
        company: row.get(3)?,
        company_img_url: row.get(4)?,
        type_name: row.get(5)?,
        location_name: row.get(6)?,
        category_name: row.get(7)?,
        type_id: row.get(8)?,
        location_id: row.get(9)?,
        category_id: row.get(10)?,
        published_at: read_timestamp(row, 11)?,
        deadline_at: read_timestamp(row, 12)?,
    })
}

const JOB_COLUMNS: &str = "id, external_id, title, company, company_img_url, type, location, \
                           category, type_id, location_id, category_id, published_at, deadline_at";

impl JobStore for SqliteStorage {
    // ===== Job Management =====

    fn upsert_jobs(&mut self, jobs: &[JobRecord]) -> StorageResult<UpsertOutcome> {
        let mut outcome = UpsertOutcome::default();
        let tx = self.conn.transaction()?;

        {
            let mut exists_stmt = tx.prepare("SELECT 1 FROM jobs WHERE external_id = ?1")?;
            let mut upsert_stmt = tx.prepare(
                "INSERT INTO jobs (id, external_id, title, company, company_img_url, type,
                     location, category, type_id, location_id, category_id, published_at,
                     deadline_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)
                 ON CONFLICT(external_id) DO UPDATE SET
                     title = excluded.title,
                     company = excluded.company,
                     company_img_url = excluded.company_img_url,
                     type = excluded.type,
                     location = excluded.location,
                     category = excluded.category,
                     type_id = excluded.type_id,
                     location_id = excluded.location_id,
                     category_id = excluded.category_id,
                     published_at = excluded.published_at,
                     deadline_at = excluded.deadline_at,
                     updated_at = excluded.updated_at",
            )?;

            for job in jobs {
                let existing: Option<i64> = exists_stmt
                    .query_row(params![job.external_id], |row| row.get(0))
                    .optional()?;

                let now = Utc::now().to_rfc3339();
                upsert_stmt.execute(params![
                    job.id,
                    job.external_id,
                    job.title,
                    job.company,
                    job.company_img_url,
                    job.type_name,
                    job.location_name,
                    job.category_name,
                    job.type_id,
                    job.location_id,
                    job.category_id,
                    job.published_at.to_rfc3339(),
                    job.deadline_at.to_rfc3339(),
                    now,
                ])?;

                if existing.is_some() {
                    outcome.updated += 1;
                } else {
                    outcome.inserted += 1;
                }
            }
        }

        tx.commit()?;
        Ok(outcome)
    }

    fn list_jobs(&self) -> StorageResult<Vec<JobRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM jobs ORDER BY created_at DESC",
            JOB_COLUMNS
        ))?;

        let jobs = stmt
            .query_map([], job_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(jobs)
    }

    fn count_jobs(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn delete_all_jobs(&mut self) -> StorageResult<u64> {
        let deleted = self.conn.execute("DELETE FROM jobs", [])?;
        Ok(deleted as u64)
    }

    fn delete_jobs_with_deadline_before(&mut self, now: DateTime<Utc>) -> StorageResult<u64> {
        // RFC 3339 strings with a fixed +00:00 offset compare in
        // chronological order, so the cutoff works as plain text
        let deleted = self.conn.execute(
            "DELETE FROM jobs WHERE deadline_at < ?1",
            params![now.to_rfc3339()],
        )?;
        Ok(deleted as u64)
    }

    // ===== Filter Catalogs =====

    fn list_filter_options(&self, kind: FilterKind) -> StorageResult<Vec<FilterOption>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, value FROM {} ORDER BY id ASC",
            kind.table()
        ))?;

        let options = stmt
            .query_map([], |row| {
                Ok(FilterOption {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    value: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(options)
    }

    fn seed_filter_options(
        &mut self,
        kind: FilterKind,
        options: &[FilterOption],
    ) -> StorageResult<u64> {
        let mut inserted = 0u64;
        let tx = self.conn.transaction()?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR IGNORE INTO {} (id, name, value) VALUES (?1, ?2, ?3)",
                kind.table()
            ))?;

            for option in options {
                inserted += stmt.execute(params![option.id, option.name, option.value])? as u64;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_job(external_id: i64) -> JobRecord {
        JobRecord {
            id: format!("surrogate-{}", external_id),
            external_id,
            title: format!("Listing {}", external_id),
            company: "Acme".to_string(),
            company_img_url: Some("https://jobs.ge/logos/acme.png".to_string()),
            type_name: "Vacancy".to_string(),
            location_name: "Tbilisi".to_string(),
            category_name: "IT/Programming".to_string(),
            type_id: 1,
            location_id: 1,
            category_id: 6,
            published_at: Utc.with_ymd_and_hms(2026, 8, 1, 4, 0, 0).unwrap(),
            deadline_at: Utc.with_ymd_and_hms(2026, 9, 1, 4, 0, 0).unwrap(),
        }
    }

    fn option(id: i64, name: &str, value: i64) -> FilterOption {
        FilterOption {
            id,
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_upsert_inserts_new_jobs() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        let outcome = storage
            .upsert_jobs(&[sample_job(100), sample_job(101)])
            .unwrap();

        assert_eq!(outcome.inserted, 2);
        assert_eq!(outcome.updated, 0);
        assert_eq!(outcome.total(), 2);
        assert_eq!(storage.count_jobs().unwrap(), 2);
    }

    #[test]
    fn test_upsert_refreshes_existing_in_place() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.upsert_jobs(&[sample_job(100)]).unwrap();

        let mut refreshed = sample_job(100);
        refreshed.id = "a-different-surrogate".to_string();
        refreshed.title = "Updated title".to_string();

        let outcome = storage.upsert_jobs(&[refreshed]).unwrap();
        assert_eq!(outcome.inserted, 0);
        assert_eq!(outcome.updated, 1);

        // No duplicate row, new field values, original surrogate id kept
        assert_eq!(storage.count_jobs().unwrap(), 1);
        let stored = &storage.list_jobs().unwrap()[0];
        assert_eq!(stored.title, "Updated title");
        assert_eq!(stored.id, "surrogate-100");
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let job = sample_job(42);
        storage.upsert_jobs(&[job.clone()]).unwrap();

        let jobs = storage.list_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0], job);
    }

    #[test]
    fn test_missing_company_image_round_trips_as_none() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let mut job = sample_job(7);
        job.company_img_url = None;
        storage.upsert_jobs(&[job]).unwrap();

        let jobs = storage.list_jobs().unwrap();
        assert_eq!(jobs[0].company_img_url, None);
    }

    #[test]
    fn test_list_jobs_newest_first() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.upsert_jobs(&[sample_job(1)]).unwrap();
        storage.upsert_jobs(&[sample_job(2)]).unwrap();

        let jobs = storage.list_jobs().unwrap();
        assert_eq!(jobs[0].external_id, 2);
        assert_eq!(jobs[1].external_id, 1);
    }

    #[test]
    fn test_delete_all_jobs() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_jobs(&[sample_job(1), sample_job(2), sample_job(3)])
            .unwrap();

        assert_eq!(storage.delete_all_jobs().unwrap(), 3);
        assert_eq!(storage.count_jobs().unwrap(), 0);
    }

    #[test]
    fn test_delete_expired_uses_strict_cutoff() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let cutoff = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();

        let mut expired = sample_job(1);
        expired.deadline_at = cutoff - chrono::Duration::days(1);
        let mut boundary = sample_job(2);
        boundary.deadline_at = cutoff;
        let mut live = sample_job(3);
        live.deadline_at = cutoff + chrono::Duration::days(1);

        storage.upsert_jobs(&[expired, boundary, live]).unwrap();

        let deleted = storage.delete_jobs_with_deadline_before(cutoff).unwrap();
        assert_eq!(deleted, 1);

        let remaining: Vec<i64> = storage
            .list_jobs()
            .unwrap()
            .iter()
            .map(|j| j.external_id)
            .collect();
        assert!(remaining.contains(&2));
        assert!(remaining.contains(&3));
    }

    #[test]
    fn test_seed_skips_existing_ids() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        let first = storage
            .seed_filter_options(
                FilterKind::Location,
                &[option(1, "Any", 0), option(2, "Tbilisi", 1)],
            )
            .unwrap();
        assert_eq!(first, 2);

        let second = storage
            .seed_filter_options(
                FilterKind::Location,
                &[option(2, "Tbilisi", 1), option(3, "Batumi", 14)],
            )
            .unwrap();
        assert_eq!(second, 1);

        let options = storage.list_filter_options(FilterKind::Location).unwrap();
        assert_eq!(options.len(), 3);
        // Ordered by id
        assert_eq!(options[0].name, "Any");
        assert_eq!(options[2].name, "Batumi");
    }

    #[test]
    fn test_catalogs_are_isolated() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        storage
            .seed_filter_options(FilterKind::JobType, &[option(1, "Vacancy", 1)])
            .unwrap();
        storage
            .seed_filter_options(FilterKind::Category, &[option(1, "IT/Programming", 6)])
            .unwrap();

        assert_eq!(
            storage
                .list_filter_options(FilterKind::JobType)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            storage
                .list_filter_options(FilterKind::Location)
                .unwrap()
                .len(),
            0
        );
        assert_eq!(
            storage.list_filter_options(FilterKind::Category).unwrap()[0].name,
            "IT/Programming"
        );
    }
}
