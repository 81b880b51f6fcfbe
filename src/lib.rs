pub mod cli;
pub mod config;
pub mod crawler;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod network;
pub mod parser;
pub mod queue;
pub mod seen;
pub mod storage;
pub mod url_utils;

// Re-export main types for library usage
pub use config::{ConfigError, CrawlConfig};
pub use crawler::{CrawlError, Crawler};
pub use metrics::{Counter, CounterSnapshot, CrawlCounters};
pub use models::{CrawlOutcome, CrawlResult, CrawlTask};
pub use network::{FetchError, FetchedPage, HttpClient};
pub use parser::extract_links;
pub use queue::WorkQueue;
pub use seen::SeenSet;
pub use storage::{SessionRecord, Store, StoreError};
