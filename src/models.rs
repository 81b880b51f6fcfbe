use chrono::{DateTime, Utc};

use crate::metrics::CounterSnapshot;

/// One unit of crawl work: a URL together with the redirect budget it may
/// still spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// Absolute URL to fetch.
    pub url: String,

    /// Redirects this task may still follow. Freshly discovered pages start
    /// with the configured maximum; each followed redirect hands the target
    /// one less.
    pub remaining_redirects: u32,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, remaining_redirects: u32) -> Self {
        Self {
            url: url.into(),
            remaining_redirects,
        }
    }
}

/// Terminal outcome of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    /// The URL as it was fetched.
    pub url: String,

    /// HTTP status of the response, or 0 when the request produced no
    /// response at all (timeout, connection failure, and the like).
    pub status_code: u16,
}

/// Everything a finished crawl hands back to the caller.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Root URL the crawl was seeded with.
    pub root_url: String,

    /// Final counter values.
    pub counters: CounterSnapshot,

    /// One entry per fetch attempt, in completion order.
    pub results: Vec<CrawlResult>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlOutcome {
    /// Wall-clock duration of the crawl.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new_stores_url_and_budget() {
        let task = CrawlTask::new("https://test.local/page", 10);
        assert_eq!(task.url, "https://test.local/page");
        assert_eq!(task.remaining_redirects, 10);
    }

    #[test]
    fn test_result_equality_covers_both_fields() {
        let a = CrawlResult {
            url: "https://test.local/".to_string(),
            status_code: 200,
        };
        let b = CrawlResult {
            url: "https://test.local/".to_string(),
            status_code: 404,
        };
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_outcome_elapsed() {
        let started_at = Utc::now();
        let finished_at = started_at + chrono::Duration::seconds(3);
        let outcome = CrawlOutcome {
            root_url: "https://test.local/".to_string(),
            counters: CounterSnapshot::default(),
            results: Vec::new(),
            started_at,
            finished_at,
        };
        assert_eq!(outcome.elapsed(), chrono::Duration::seconds(3));
    }
}
