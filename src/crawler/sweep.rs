//! Full-catalog sweep
//!
//! The board caps every query at a few pages, so no single query can see
//! the whole board. The sweep approximates full coverage by crawling one
//! page of every concrete type/location/category combination, trusting
//! the board to surface each listing under at least one of them. Results
//! are deduplicated by listing id and bulk-upserted at the end.

use crate::crawler::coordinator::{Crawler, CrawlRequest};
use crate::crawler::dates::normalize_date;
use crate::crawler::parser::RawListing;
use crate::storage::{FilterKind, FilterOption, JobRecord, JobStore, SqliteStorage};
use crate::SaqmeError;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Report of one completed sweep
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepSummary {
    /// Filter combinations enumerated
    pub combinations: u32,
    /// Combinations that failed and were skipped
    pub failed_combinations: u32,
    /// Unique jobs accumulated across all combinations
    pub unique_jobs: usize,
    /// Records written to storage
    pub saved: usize,
}

/// One cell of the filter cartesian product
#[derive(Debug, Clone)]
struct Combination {
    job_type: FilterOption,
    location: FilterOption,
    category: FilterOption,
}

/// Runs full-catalog sweeps and deadline purges against shared storage
pub struct Sweeper {
    crawler: Crawler,
    storage: Arc<Mutex<SqliteStorage>>,
    combination_delay: Duration,
    in_flight: tokio::sync::Mutex<()>,
}

impl Sweeper {
    /// Creates a new sweeper
    ///
    /// # Arguments
    ///
    /// * `crawler` - The page crawler to drive
    /// * `storage` - Shared storage holding catalogs and job records
    /// * `combination_delay` - Pause after each filter combination
    pub fn new(
        crawler: Crawler,
        storage: Arc<Mutex<SqliteStorage>>,
        combination_delay: Duration,
    ) -> Self {
        Self {
            crawler,
            storage,
            combination_delay,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Crawls one page of every concrete filter combination and persists
    /// the deduplicated result
    ///
    /// A failing combination is logged and skipped so one bad page cannot
    /// void hours of progress. The sweep as a whole only fails when the
    /// catalogs cannot be read, the final save fails, or another sweep is
    /// still running.
    ///
    /// # Returns
    ///
    /// * `Ok(SweepSummary)` - Counts of combinations, failures, and saves
    /// * `Err(SaqmeError::SweepInProgress)` - An earlier sweep holds the gate
    pub async fn run_full_sweep(&self) -> Result<SweepSummary, SaqmeError> {
        // Overlapping sweeps would hammer the board and interleave writes
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| SaqmeError::SweepInProgress)?;

        let (types, locations, categories) = {
            let storage = self.storage.lock().unwrap();
            let types = concrete_options(storage.list_filter_options(FilterKind::JobType)?);
            let locations = concrete_options(storage.list_filter_options(FilterKind::Location)?);
            let categories = concrete_options(storage.list_filter_options(FilterKind::Category)?);
            (types, locations, categories)
        };

        let total = (types.len() * locations.len() * categories.len()) as u32;
        tracing::info!(
            "Starting full sweep: {} types x {} locations x {} categories = {} combinations",
            types.len(),
            locations.len(),
            categories.len(),
            total
        );

        let mut summary = SweepSummary::default();
        let mut jobs_by_external_id: HashMap<i64, JobRecord> = HashMap::new();

        for job_type in &types {
            for location in &locations {
                for category in &categories {
                    let combination = Combination {
                        job_type: job_type.clone(),
                        location: location.clone(),
                        category: category.clone(),
                    };
                    summary.combinations += 1;

                    match self.crawl_combination(&combination).await {
                        Ok(listings) => {
                            for listing in &listings {
                                if let Some(job) = convert_listing(listing, &combination) {
                                    // First sighting of a listing wins
                                    jobs_by_external_id.entry(job.external_id).or_insert(job);
                                }
                            }
                        }
                        Err(e) => {
                            summary.failed_combinations += 1;
                            tracing::error!(
                                "Combination {}/{}/{} failed, skipping: {}",
                                combination.job_type.name,
                                combination.location.name,
                                combination.category.name,
                                e
                            );
                        }
                    }

                    if summary.combinations % 50 == 0 {
                        tracing::info!(
                            "Sweep progress: {}/{} combinations, {} unique jobs",
                            summary.combinations,
                            total,
                            jobs_by_external_id.len()
                        );
                    }

                    tokio::time::sleep(self.combination_delay).await;
                }
            }
        }

        summary.unique_jobs = jobs_by_external_id.len();

        if jobs_by_external_id.is_empty() {
            tracing::warn!(
                "Sweep found no jobs across {} combinations, nothing saved",
                summary.combinations
            );
            return Ok(summary);
        }

        let jobs: Vec<JobRecord> = jobs_by_external_id.into_values().collect();
        let outcome = {
            let mut storage = self.storage.lock().unwrap();
            storage.upsert_jobs(&jobs)?
        };
        summary.saved = jobs.len();

        tracing::info!(
            "Sweep complete: {} combinations ({} failed), {} unique jobs ({} new, {} refreshed)",
            summary.combinations,
            summary.failed_combinations,
            summary.saved,
            outcome.inserted,
            outcome.updated
        );

        Ok(summary)
    }

    /// Crawls one page of a single filter combination
    async fn crawl_combination(
        &self,
        combination: &Combination,
    ) -> Result<Vec<RawListing>, SaqmeError> {
        tracing::debug!(
            "Sweeping combination: type={} location={} category={}",
            combination.job_type.name,
            combination.location.name,
            combination.category.name
        );

        // One page per combination; the per-page delay never fires, the
        // inter-combination delay does the pacing
        let request = CrawlRequest {
            job_type: combination.job_type.value.to_string(),
            location: combination.location.value.to_string(),
            category: combination.category.value.to_string(),
            max_pages: 1,
            page_delay: Duration::ZERO,
            ..CrawlRequest::default()
        };

        let result = self.crawler.crawl(&request).await?;
        Ok(result.listings)
    }

    /// Deletes jobs whose application deadline has passed
    ///
    /// # Returns
    ///
    /// How many jobs were removed
    pub fn purge_expired(&self) -> Result<u64, SaqmeError> {
        let deleted = {
            let mut storage = self.storage.lock().unwrap();
            storage.delete_jobs_with_deadline_before(Utc::now())?
        };

        tracing::info!("Purged {} expired jobs", deleted);
        Ok(deleted)
    }
}

/// Converts a parsed listing into a persistable record
///
/// Listings without a resolvable external id cannot be upserted and are
/// dropped here. Dates are normalized at conversion time so every record
/// of one sweep shares the same "now".
fn convert_listing(listing: &RawListing, combination: &Combination) -> Option<JobRecord> {
    let external_id = listing.external_id?;

    Some(JobRecord {
        id: Uuid::new_v4().to_string(),
        external_id,
        title: listing.title.clone(),
        company: listing.company.clone(),
        company_img_url: listing.company_img_url.clone(),
        type_name: combination.job_type.name.clone(),
        location_name: combination.location.name.clone(),
        category_name: combination.category.name.clone(),
        type_id: combination.job_type.id,
        location_id: combination.location.id,
        category_id: combination.category.id,
        published_at: normalize_date(&listing.published_raw),
        deadline_at: normalize_date(&listing.deadline_raw),
    })
}

/// Filters a catalog down to its concrete options
///
/// The wildcard entry would re-fetch the unfiltered front page on every
/// pass through the loops without adding coverage.
fn concrete_options(options: Vec<FilterOption>) -> Vec<FilterOption> {
    options.into_iter().filter(|o| !o.is_wildcard()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: i64, name: &str, value: i64) -> FilterOption {
        FilterOption {
            id,
            name: name.to_string(),
            value,
        }
    }

    fn combination() -> Combination {
        Combination {
            job_type: option(1, "Vacancy", 1),
            location: option(2, "Tbilisi", 1),
            category: option(3, "IT/Programming", 6),
        }
    }

    fn listing(external_id: Option<i64>) -> RawListing {
        RawListing {
            title: "Backend Developer".to_string(),
            url: "https://jobs.ge/en/?view=jobs&id=100".to_string(),
            company: "Acme".to_string(),
            external_id,
            published_raw: "25.08.2026".to_string(),
            deadline_raw: "25.09.2026".to_string(),
            company_img_url: Some("https://jobs.ge/logos/acme.png".to_string()),
        }
    }

    #[test]
    fn test_convert_listing_carries_combination_labels() {
        let job = convert_listing(&listing(Some(100)), &combination()).unwrap();

        assert_eq!(job.external_id, 100);
        assert_eq!(job.title, "Backend Developer");
        assert_eq!(job.type_name, "Vacancy");
        assert_eq!(job.location_name, "Tbilisi");
        assert_eq!(job.category_name, "IT/Programming");
        assert_eq!(job.type_id, 1);
        assert_eq!(job.location_id, 2);
        assert_eq!(job.category_id, 3);
        assert!(!job.id.is_empty());
    }

    #[test]
    fn test_convert_listing_normalizes_dates() {
        let job = convert_listing(&listing(Some(100)), &combination()).unwrap();
        assert_eq!(job.published_at.to_rfc3339(), "2026-08-25T00:00:00+00:00");
        assert_eq!(job.deadline_at.to_rfc3339(), "2026-09-25T00:00:00+00:00");
    }

    #[test]
    fn test_convert_listing_without_id_dropped() {
        assert!(convert_listing(&listing(None), &combination()).is_none());
    }

    #[test]
    fn test_surrogate_ids_are_unique() {
        let a = convert_listing(&listing(Some(1)), &combination()).unwrap();
        let b = convert_listing(&listing(Some(1)), &combination()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_concrete_options_drop_wildcards() {
        let options = vec![
            option(1, "Any", 0),
            option(2, "Tbilisi", 1),
            option(3, "Batumi", 14),
        ];

        let concrete = concrete_options(options);
        assert_eq!(concrete.len(), 2);
        assert!(concrete.iter().all(|o| !o.is_wildcard()));
    }

    #[test]
    fn test_first_sighting_wins_in_accumulator() {
        let mut jobs: HashMap<i64, JobRecord> = HashMap::new();

        let first = Combination {
            category: option(3, "IT/Programming", 6),
            ..combination()
        };
        let second = Combination {
            category: option(9, "Other", 17),
            ..combination()
        };

        for combo in [&first, &second] {
            if let Some(job) = convert_listing(&listing(Some(100)), combo) {
                jobs.entry(job.external_id).or_insert(job);
            }
        }

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[&100].category_name, "IT/Programming");
    }
}
