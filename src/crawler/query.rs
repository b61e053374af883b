//! Listing URL construction
//!
//! Builds the URL for one listing page from the page number, the free-text
//! search term, and the three filter dimensions. Parameters are written in
//! a fixed order so the same query always produces the same URL, which
//! keeps logs and caches stable.

use url::Url;

/// Query parameters for one listing page request
#[derive(Debug, Clone)]
pub struct ListingQuery<'a> {
    /// 1-based page number
    pub page: u32,
    /// Free-text search term; empty means "match everything"
    pub query: &'a str,
    /// Job type wire value; "0" means "no filter"
    pub job_type: &'a str,
    /// Location wire value; "0" means "no filter"
    pub location: &'a str,
    /// Category wire value; "0" means "no filter"
    pub category: &'a str,
}

impl Default for ListingQuery<'_> {
    fn default() -> Self {
        Self {
            page: 1,
            query: "",
            job_type: "0",
            location: "0",
            category: "0",
        }
    }
}

/// Builds the URL for one listing page
///
/// Wire values are passed through verbatim: the board ignores filter
/// parameters it does not understand, and coercing them here would hide
/// catalog mistakes instead of surfacing empty result pages.
///
/// # Arguments
///
/// * `listing_url` - The board's listing endpoint
/// * `query` - Page number, search term, and filter values
///
/// # Example
///
/// ```
/// use saqme::crawler::{build_listing_url, ListingQuery};
/// use url::Url;
///
/// let listing = Url::parse("https://jobs.ge/en/").unwrap();
/// let url = build_listing_url(&listing, &ListingQuery::default());
/// assert_eq!(url.as_str(), "https://jobs.ge/en/?page=1&q=&cid=0&lid=0&jid=0");
/// ```
pub fn build_listing_url(listing_url: &Url, query: &ListingQuery<'_>) -> Url {
    let mut url = listing_url.clone();

    url.query_pairs_mut()
        .clear()
        .append_pair("page", &query.page.to_string())
        .append_pair("q", query.query)
        .append_pair("cid", query.category)
        .append_pair("lid", query.location)
        .append_pair("jid", query.job_type);

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_url() -> Url {
        Url::parse("https://jobs.ge/en/").unwrap()
    }

    #[test]
    fn test_default_query_url() {
        let url = build_listing_url(&listing_url(), &ListingQuery::default());
        assert_eq!(
            url.as_str(),
            "https://jobs.ge/en/?page=1&q=&cid=0&lid=0&jid=0"
        );
    }

    #[test]
    fn test_parameter_order_is_fixed() {
        let query = ListingQuery {
            page: 7,
            query: "nurse",
            job_type: "4",
            location: "14",
            category: "9",
        };
        let url = build_listing_url(&listing_url(), &query);
        assert_eq!(
            url.as_str(),
            "https://jobs.ge/en/?page=7&q=nurse&cid=9&lid=14&jid=4"
        );
    }

    #[test]
    fn test_same_query_same_url() {
        let query = ListingQuery {
            page: 2,
            query: "engineer",
            ..ListingQuery::default()
        };
        let first = build_listing_url(&listing_url(), &query);
        let second = build_listing_url(&listing_url(), &query);
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_term_is_encoded() {
        let query = ListingQuery {
            query: "software engineer",
            ..ListingQuery::default()
        };
        let url = build_listing_url(&listing_url(), &query);
        assert_eq!(
            url.as_str(),
            "https://jobs.ge/en/?page=1&q=software+engineer&cid=0&lid=0&jid=0"
        );
    }

    #[test]
    fn test_non_numeric_wire_values_pass_through() {
        let query = ListingQuery {
            job_type: "weird",
            ..ListingQuery::default()
        };
        let url = build_listing_url(&listing_url(), &query);
        assert!(url.as_str().ends_with("jid=weird"));
    }

    #[test]
    fn test_existing_query_is_replaced() {
        let listing = Url::parse("https://jobs.ge/en/?stale=1").unwrap();
        let url = build_listing_url(&listing, &ListingQuery::default());
        assert!(!url.as_str().contains("stale"));
        assert!(url.as_str().contains("page=1"));
    }
}
