use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_MAX_REDIRECTS: u32 = 10;
pub const DEFAULT_MAX_WORKERS: usize = 10;
pub const DEFAULT_EXPECTED_URLS: usize = 1000;
pub const DEFAULT_ERROR_RATE: f64 = 0.001;
pub const DEFAULT_LIMIT: u64 = 500_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_USER_AGENT: &str = concat!("site-census/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid root URL '{url}': {source}")]
    InvalidRootUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("expected_urls must be greater than zero")]
    ZeroExpectedUrls,

    #[error("error_rate must be within (0, 1), got {0}")]
    ErrorRateOutOfRange(f64),

    #[error("max_workers must be greater than zero")]
    ZeroWorkers,
}

/// Immutable settings for one crawl, fixed at construction.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Absolute URL the crawl starts from; its string form is also the
    /// same-prefix scope anchor for discovered links.
    pub root_url: Url,
    /// Redirect budget handed to every freshly discovered page task.
    pub max_redirects: u32,
    /// Number of concurrent workers pulling from the queue.
    pub max_workers: usize,
    /// Expected URL count used to size the dedup filter.
    pub expected_urls: usize,
    /// Tolerated false-positive rate of the dedup filter.
    pub error_rate: f64,
    /// Refuse new tasks once crawled plus queued URLs reach this count.
    pub limit: u64,
    /// Recorded on the session; result storage currently keeps every entry
    /// regardless of this flag.
    pub collect_all: bool,
    /// Per-request timeout covering connect through body read.
    pub timeout: Duration,
    /// Value of the User-Agent header sent with every request.
    pub user_agent: String,
}

impl CrawlConfig {
    /// Parse the root URL and apply defaults for everything else.
    pub fn new(root_url: &str) -> Result<Self, ConfigError> {
        let root_url = Url::parse(root_url).map_err(|source| ConfigError::InvalidRootUrl {
            url: root_url.to_string(),
            source,
        })?;

        Ok(Self {
            root_url,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_workers: DEFAULT_MAX_WORKERS,
            expected_urls: DEFAULT_EXPECTED_URLS,
            error_rate: DEFAULT_ERROR_RATE,
            limit: DEFAULT_LIMIT,
            collect_all: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Reject values the filter and the worker pool cannot be built from.
    /// Called before any work starts; this and the root URL parse are the
    /// only ways a crawl can fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expected_urls == 0 {
            return Err(ConfigError::ZeroExpectedUrls);
        }
        if !(self.error_rate > 0.0 && self.error_rate < 1.0) {
            return Err(ConfigError::ErrorRateOutOfRange(self.error_rate));
        }
        if self.max_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}
