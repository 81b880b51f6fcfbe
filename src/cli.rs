use clap::{Args, Parser, Subcommand};

use crate::config;

#[derive(Parser, Debug)]
#[command(name = "site-census")]
#[command(about = "Crawl a site and tally every URL by HTTP status")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Verbosity: -v for debug, -vv for trace (RUST_LOG overrides)"
    )]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl from a root URL and store the session when finished
    Crawl(CrawlArgs),

    /// List stored crawl sessions, newest first
    Sessions {
        #[arg(long, default_value = "site-census.db", help = "SQLite database to read")]
        db: String,
    },
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    #[arg(help = "Absolute URL the crawl starts from")]
    pub root_url: String,

    #[arg(
        long,
        default_value_t = config::DEFAULT_MAX_REDIRECTS,
        help = "Redirect budget per discovered page"
    )]
    pub max_redirects: u32,

    #[arg(
        short,
        long,
        default_value_t = config::DEFAULT_MAX_WORKERS,
        help = "Concurrent workers pulling from the queue"
    )]
    pub workers: usize,

    #[arg(
        long,
        default_value_t = config::DEFAULT_EXPECTED_URLS,
        help = "Expected URL count used to size the dedup filter"
    )]
    pub expected_urls: usize,

    #[arg(
        long,
        default_value_t = config::DEFAULT_ERROR_RATE,
        help = "Tolerated dedup false-positive rate"
    )]
    pub error_rate: f64,

    #[arg(
        long,
        default_value_t = config::DEFAULT_LIMIT,
        help = "Stop queueing new URLs once crawled plus queued reach this count"
    )]
    pub limit: u64,

    #[arg(
        long,
        help = "Mark the session as collecting every result (results are currently always stored in full)"
    )]
    pub collect_all: bool,

    #[arg(
        short,
        long,
        default_value_t = config::DEFAULT_TIMEOUT_SECS,
        help = "Per-request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(
        long,
        default_value = "site-census.db",
        help = "SQLite database the session is written to"
    )]
    pub db: String,
}
