//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch listing pages
//! - Error classification for failed fetches
//!
//! The fetcher makes exactly one attempt per page. Transient failures are
//! surfaced to the caller, which decides whether the whole crawl aborts or
//! the failing combination is skipped.

use crate::config::ClientConfig;
use crate::SaqmeError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// The client identifies itself honestly, asks for Georgian with an
/// English fallback, and decompresses gzip and brotli bodies.
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use saqme::config::ClientConfig;
/// use saqme::crawler::build_http_client;
///
/// let config = ClientConfig {
///     crawler_name: "Saqme".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
///     accept_language: "ka, en;q=0.8".to_string(),
///     request_timeout_secs: 20,
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    let mut headers = HeaderMap::new();
    // Config validation guarantees an ASCII header value
    if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one listing page and returns its body
///
/// Non-success status codes are errors: the board serves listing pages
/// with 200, so anything else means the query or the site is broken and
/// the body would not be worth parsing.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The fully built listing page URL
///
/// # Returns
///
/// * `Ok(String)` - The response body
/// * `Err(SaqmeError::FetchFailed)` - Request, status, or body read failed
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, SaqmeError> {
    tracing::debug!("Fetching page: {}", url);

    let response = client.get(url.clone()).send().await.map_err(|e| {
        SaqmeError::FetchFailed {
            url: url.to_string(),
            source: e,
        }
    })?;

    let response = response
        .error_for_status()
        .map_err(|e| SaqmeError::FetchFailed {
            url: url.to_string(),
            source: e,
        })?;

    response.text().await.map_err(|e| SaqmeError::FetchFailed {
        url: url.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
            accept_language: "ka, en;q=0.8".to_string(),
            request_timeout_secs: 20,
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        let config = test_config();
        let user_agent = format!(
            "{}/{} (+{}; {})",
            config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
        );
        assert_eq!(
            user_agent,
            "TestHarvester/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    // Fetch behavior against live responses is covered by the wiremock
    // integration tests in tests/crawl_tests.rs
}
