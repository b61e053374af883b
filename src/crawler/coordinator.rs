//! Crawl coordinator - single-query orchestration
//!
//! This module drives the fetch/parse loop for one query across
//! sequential listing pages, including:
//! - Building page URLs from the request parameters
//! - Fetching and parsing each page in order
//! - Stopping at the page cap or when pagination runs out
//! - Pausing between pages to stay polite

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::{parse_listing_page, RawListing};
use crate::crawler::query::{build_listing_url, ListingQuery};
use crate::SaqmeError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Parameters for one bounded multi-page query
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// Free-text search term; empty matches everything
    pub query: String,
    /// Job type wire value; "0" means "no filter"
    pub job_type: String,
    /// Location wire value; "0" means "no filter"
    pub location: String,
    /// Category wire value; "0" means "no filter"
    pub category: String,
    /// First page to fetch
    pub start_page: u32,
    /// Upper bound on pages fetched
    pub max_pages: u32,
    /// Pause between consecutive page fetches
    pub page_delay: Duration,
}

impl Default for CrawlRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            job_type: "0".to_string(),
            location: "0".to_string(),
            category: "0".to_string(),
            start_page: 1,
            max_pages: 3,
            page_delay: Duration::from_millis(2000),
        }
    }
}

/// Why a crawl stopped fetching further pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last fetched page signaled no further pages
    Exhausted,
    /// The request's page cap was reached
    PageCapReached,
}

/// Aggregate outcome of one crawl request
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// Listings in the order the pages surfaced them
    pub listings: Vec<RawListing>,
    /// Number of pages actually fetched
    pub pages_fetched: u32,
    /// Terminal state of the page loop
    pub stop: StopReason,
}

impl CrawlResult {
    /// Number of listings gathered across all fetched pages
    pub fn total_found(&self) -> usize {
        self.listings.len()
    }
}

/// Crawls the listing board one page at a time
pub struct Crawler {
    client: Client,
    base_url: Url,
    listing_url: Url,
}

impl Crawler {
    /// Creates a new crawler from the configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(SaqmeError)` - Bad source URLs or client build failure
    pub fn new(config: &Config) -> Result<Self, SaqmeError> {
        let base_url = Url::parse(&config.source.base_url)?;
        let listing_url = base_url.join(&config.source.listing_path)?;
        let client = build_http_client(&config.client)?;

        Ok(Self {
            client,
            base_url,
            listing_url,
        })
    }

    /// Runs one bounded multi-page query
    ///
    /// Pages are fetched strictly in sequence. The loop stops early when a
    /// page carries no next-page signal; otherwise it stops at the page
    /// cap. Any fetch failure aborts the whole request, since a partial
    /// result would silently undercount the query.
    ///
    /// # Arguments
    ///
    /// * `request` - Query text, filters, and paging bounds
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Listings plus how and why the loop ended
    /// * `Err(SaqmeError)` - A page failed to fetch
    pub async fn crawl(&self, request: &CrawlRequest) -> Result<CrawlResult, SaqmeError> {
        tracing::info!(
            "Starting crawl: q='{}' jid={} lid={} cid={} start_page={} max_pages={}",
            request.query,
            request.job_type,
            request.location,
            request.category,
            request.start_page,
            request.max_pages
        );

        let mut listings = Vec::new();
        let mut current_page = request.start_page;
        let mut pages_fetched = 0u32;
        let mut stop = StopReason::PageCapReached;

        for iteration in 0..request.max_pages {
            let page_url = build_listing_url(
                &self.listing_url,
                &ListingQuery {
                    page: current_page,
                    query: &request.query,
                    job_type: &request.job_type,
                    location: &request.location,
                    category: &request.category,
                },
            );

            let html = fetch_page(&self.client, &page_url).await?;
            let parsed = parse_listing_page(&html, &self.base_url);
            pages_fetched += 1;

            tracing::debug!(
                "Page {}: {} listings, has_next={}",
                current_page,
                parsed.listings.len(),
                parsed.has_next
            );
            listings.extend(parsed.listings);

            if !parsed.has_next {
                stop = StopReason::Exhausted;
                break;
            }

            current_page += 1;

            // No pause after the final page of the window
            if iteration + 1 < request.max_pages {
                tokio::time::sleep(request.page_delay).await;
            }
        }

        let result = CrawlResult {
            listings,
            pages_fetched,
            stop,
        };

        tracing::info!(
            "Crawl finished: {} listings from {} pages ({:?})",
            result.total_found(),
            result.pages_fetched,
            result.stop
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, SourceConfig};

    fn test_config() -> Config {
        Config {
            source: SourceConfig {
                base_url: "https://jobs.ge/".to_string(),
                listing_path: "en/".to_string(),
            },
            client: ClientConfig {
                crawler_name: "TestHarvester".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
                accept_language: "ka, en;q=0.8".to_string(),
                request_timeout_secs: 20,
            },
            crawl: Default::default(),
            sweep: Default::default(),
            storage: crate::config::StorageConfig {
                database_path: "./test.db".to_string(),
            },
            schedule: Default::default(),
            types: Vec::new(),
            locations: Vec::new(),
            categories: Vec::new(),
        }
    }

    #[test]
    fn test_request_defaults() {
        let request = CrawlRequest::default();
        assert_eq!(request.query, "");
        assert_eq!(request.job_type, "0");
        assert_eq!(request.location, "0");
        assert_eq!(request.category, "0");
        assert_eq!(request.start_page, 1);
        assert_eq!(request.max_pages, 3);
        assert_eq!(request.page_delay, Duration::from_millis(2000));
    }

    #[test]
    fn test_crawler_resolves_listing_endpoint() {
        let crawler = Crawler::new(&test_config()).unwrap();
        assert_eq!(crawler.listing_url.as_str(), "https://jobs.ge/en/");
    }

    #[test]
    fn test_crawler_rejects_bad_base_url() {
        let mut config = test_config();
        config.source.base_url = "not a url".to_string();
        assert!(Crawler::new(&config).is_err());
    }

    // The page loop itself is covered by the wiremock integration tests
    // in tests/crawl_tests.rs
}
