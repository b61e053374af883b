//! Crawler module for listing page fetching and extraction
//!
//! This module contains the core harvesting logic, including:
//! - Listing URL construction
//! - HTTP fetching with a polite, honest client
//! - HTML parsing and listing extraction
//! - Single-query crawl orchestration
//! - Full-catalog sweeps with deduplication
//! - Date normalization for the board's date formats

mod coordinator;
mod dates;
mod fetcher;
mod parser;
mod query;
mod sweep;

pub use coordinator::{CrawlRequest, CrawlResult, Crawler, StopReason};
pub use dates::{normalize_date, normalize_date_at};
pub use fetcher::{build_http_client, fetch_page};
pub use parser::{parse_listing_page, ParsedPage, RawListing};
pub use query::{build_listing_url, ListingQuery};
pub use sweep::{SweepSummary, Sweeper};
