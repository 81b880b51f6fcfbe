use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// Atomic counter for lock-free updates from concurrent workers
#[derive(Debug)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Clone for Counter {
    fn clone(&self) -> Self {
        Self {
            value: AtomicU64::new(self.value.load(Ordering::Relaxed)),
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared tallies of one crawl, updated lock-free by every worker.
///
/// The four status buckets cover 2xx, 301/302, 4xx and 5xx responses.
/// `crawled` counts every terminal fetch outcome including failed requests,
/// so the bucket sum never exceeds it. `remaining` tracks tasks queued but
/// not yet picked up.
#[derive(Debug, Default)]
pub struct CrawlCounters {
    pub success_2xx: Counter,
    pub redirect_3xx: Counter,
    pub client_error_4xx: Counter,
    pub server_error_5xx: Counter,
    pub crawled: Counter,
    pub remaining: Counter,
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            success_2xx: self.success_2xx.get(),
            redirect_3xx: self.redirect_3xx.get(),
            client_error_4xx: self.client_error_4xx.get(),
            server_error_5xx: self.server_error_5xx.get(),
            crawled: self.crawled.get(),
            remaining: self.remaining.get(),
        }
    }
}

/// Point-in-time copy of the crawl counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    pub success_2xx: u64,
    pub redirect_3xx: u64,
    pub client_error_4xx: u64,
    pub server_error_5xx: u64,
    pub crawled: u64,
    pub remaining: u64,
}

impl CounterSnapshot {
    /// Sum of the four status buckets. Equals `crawled` when every fetch
    /// produced an HTTP response with a classified status.
    pub fn classified(&self) -> u64 {
        self.success_2xx + self.redirect_3xx + self.client_error_4xx + self.server_error_5xx
    }
}

impl fmt::Display for CounterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "crawled: {}, 2xx: {}, 3xx: {}, 4xx: {}, 5xx: {}, remaining: {}",
            self.crawled,
            self.success_2xx,
            self.redirect_3xx,
            self.client_error_4xx,
            self.server_error_5xx,
            self.remaining
        )
    }
}
