//! Database schema definitions and migrations
//!
//! This module contains all SQL schema definitions for the Saqme database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Harvested job records; external_id is the source-assigned listing id
-- and the natural key for upserts
CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    external_id INTEGER NOT NULL UNIQUE,
    title TEXT NOT NULL,
    company TEXT NOT NULL,
    company_img_url TEXT,
    type TEXT NOT NULL,
    location TEXT NOT NULL,
    category TEXT NOT NULL,
    type_id INTEGER NOT NULL,
    location_id INTEGER NOT NULL,
    category_id INTEGER NOT NULL,
    published_at TEXT NOT NULL,
    deadline_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_jobs_deadline ON jobs(deadline_at);
CREATE INDEX IF NOT EXISTS idx_jobs_created ON jobs(created_at);

-- Filter catalogs: one row per selectable option; value is the wire
-- value sent to the source site, with 0 reserved for "no filter"
CREATE TABLE IF NOT EXISTS job_types (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    value INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    value INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    value INTEGER NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
