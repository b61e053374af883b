use serde::Deserialize;

/// Main configuration structure for Saqme
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub client: ClientConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub types: Vec<CatalogEntry>,
    #[serde(default)]
    pub locations: Vec<CatalogEntry>,
    #[serde(default)]
    pub categories: Vec<CatalogEntry>,
}

/// Source site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Root URL of the job board, also used to absolutize relative links
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Listing page path, resolved against the base URL
    #[serde(rename = "listing-path", default = "default_listing_path")]
    pub listing_path: String,
}

/// HTTP client identification and behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,

    /// Accept-Language header sent with every request
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Defaults for single-query crawls
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Maximum listing pages fetched per query
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between consecutive page fetches (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

/// Full-catalog sweep configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    /// Pause between filter combinations (milliseconds)
    #[serde(rename = "combination-delay-ms", default = "default_combination_delay_ms")]
    pub combination_delay_ms: u64,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Cron expressions for the scheduled triggers
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// When to purge expired jobs (six-field cron)
    #[serde(default = "default_purge_cron")]
    pub purge: String,

    /// When to run the full-catalog sweep (six-field cron)
    #[serde(default = "default_sweep_cron")]
    pub sweep: String,
}

/// One filter catalog entry (job type, location, or category)
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    /// Storage key
    pub id: i64,

    /// Display name
    pub name: String,

    /// Source-site wire value; 0 means "no filter"
    pub value: i64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            combination_delay_ms: default_combination_delay_ms(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            purge: default_purge_cron(),
            sweep: default_sweep_cron(),
        }
    }
}

fn default_listing_path() -> String {
    "en/".to_string()
}

fn default_accept_language() -> String {
    "ka, en;q=0.8".to_string()
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_max_pages() -> u32 {
    3
}

fn default_page_delay_ms() -> u64 {
    2000
}

fn default_combination_delay_ms() -> u64 {
    5000
}

fn default_purge_cron() -> String {
    "0 0 0 * * *".to_string()
}

fn default_sweep_cron() -> String {
    "0 0 4 * * *".to_string()
}
