use std::path::Path;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::info;

use site_census::cli::{Cli, Commands, CrawlArgs};
use site_census::config::{ConfigError, CrawlConfig};
use site_census::crawler::{CrawlError, Crawler};
use site_census::logging;
use site_census::storage::{Store, StoreError};

#[derive(Error, Debug)]
enum MainError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("crawl error: {0}")]
    Crawl(#[from] CrawlError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Crawl(args) => run_crawl(args).await,
        Commands::Sessions { db } => run_sessions(&db),
    }
}

async fn run_crawl(args: CrawlArgs) -> Result<(), MainError> {
    let mut config = CrawlConfig::new(&args.root_url)?;
    config.max_redirects = args.max_redirects;
    config.max_workers = args.workers;
    config.expected_urls = args.expected_urls;
    config.error_rate = args.error_rate;
    config.limit = args.limit;
    config.collect_all = args.collect_all;
    config.timeout = Duration::from_secs(args.timeout);

    info!(
        root = %config.root_url,
        workers = config.max_workers,
        max_redirects = config.max_redirects,
        expected_urls = config.expected_urls,
        limit = config.limit,
        "starting crawl"
    );

    let crawler = Crawler::new(config)?;
    let outcome = crawler.run().await;

    let mut store = Store::open(Path::new(&args.db))?;
    let session_id = store.persist_outcome(&outcome)?;

    info!(
        session_id,
        db = %args.db,
        elapsed_ms = outcome.elapsed().num_milliseconds(),
        results = outcome.results.len(),
        "session stored"
    );

    println!("session #{}: {}", session_id, outcome.counters);
    Ok(())
}

fn run_sessions(db: &str) -> Result<(), MainError> {
    let store = Store::open(Path::new(db))?;
    let sessions = store.list_sessions()?;

    if sessions.is_empty() {
        println!("no stored sessions in {}", db);
        return Ok(());
    }

    for session in sessions {
        println!(
            "#{} {} | {} -> {} | crawled {} (2xx {}, 3xx {}, 4xx {}, 5xx {}) | {} results",
            session.id,
            session.base_url,
            session.started_at,
            session.finished_at,
            session.crawled,
            session.successes,
            session.redirects,
            session.soft_errors,
            session.hard_errors,
            session.result_count
        );
    }
    Ok(())
}
