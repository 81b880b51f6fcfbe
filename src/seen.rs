use bloomfilter::Bloom;
use parking_lot::RwLock;

/// Probabilistic set of URLs the crawl has already claimed.
///
/// Backed by a bloom filter sized for the expected URL count and tolerated
/// false-positive rate. A false positive makes the crawl skip a URL it never
/// visited; a false negative cannot happen, so no URL is ever fetched twice.
pub struct SeenSet {
    bloom: RwLock<Bloom<String>>,
}

impl SeenSet {
    pub fn new(expected_urls: usize, error_rate: f64) -> Self {
        Self {
            bloom: RwLock::new(Bloom::new_for_fp_rate(expected_urls, error_rate)),
        }
    }

    /// Insert a URL, returning true when it was not present before.
    ///
    /// Check and set happen under a single write lock so two workers racing
    /// on the same URL can never both see it as new.
    pub fn insert(&self, url: &str) -> bool {
        let key = url.to_string();
        !self.bloom.write().check_and_set(&key)
    }

    /// Membership test without claiming the URL.
    pub fn contains(&self, url: &str) -> bool {
        let key = url.to_string();
        self.bloom.read().check(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_new_url_returns_true() {
        let seen = SeenSet::new(1000, 0.001);
        assert!(seen.insert("https://test.local/page"));
    }

    #[test]
    fn test_insert_twice_returns_false() {
        let seen = SeenSet::new(1000, 0.001);
        assert!(seen.insert("https://test.local/page"));
        assert!(!seen.insert("https://test.local/page"));
    }

    #[test]
    fn test_no_false_negatives() {
        let seen = SeenSet::new(1000, 0.001);
        let urls: Vec<String> = (0..500)
            .map(|i| format!("https://test.local/page/{}", i))
            .collect();

        for url in &urls {
            seen.insert(url);
        }
        for url in &urls {
            assert!(seen.contains(url), "inserted URL missing: {}", url);
        }
    }

    #[test]
    fn test_fresh_set_is_empty() {
        let seen = SeenSet::new(1000, 0.001);
        assert!(!seen.contains("https://test.local/never-inserted"));
    }

    #[test]
    fn test_concurrent_insert_claims_once() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let seen = Arc::new(SeenSet::new(10_000, 0.001));
        let claims = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seen = Arc::clone(&seen);
                let claims = Arc::clone(&claims);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        let url = format!("https://test.local/{}", i);
                        if seen.insert(&url) {
                            claims.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Every URL is claimed by exactly one thread; false positives can
        // only lower the count, never raise it.
        assert!(claims.load(Ordering::SeqCst) <= 200);
        assert!(claims.load(Ordering::SeqCst) > 0);
    }
}
