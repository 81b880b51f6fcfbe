//! Crawl coordinator and worker pool.
//!
//! A fixed pool of workers pulls tasks from the shared queue, fetches each
//! URL once, tallies the status, and feeds newly discovered in-scope URLs
//! back into the queue. The crawl ends when the queue reports that every
//! task put was marked done; the workers are then cancelled while parked in
//! `get`, never mid-fetch.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{ConfigError, CrawlConfig};
use crate::metrics::CrawlCounters;
use crate::models::{CrawlOutcome, CrawlResult, CrawlTask};
use crate::network::{FetchedPage, HttpClient};
use crate::parser;
use crate::queue::WorkQueue;
use crate::seen::SeenSet;
use crate::url_utils;

/// Errors that prevent a crawl from starting. Nothing that happens after
/// startup is fatal; failed fetches become results with status 0.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// State shared by every worker.
struct CrawlContext {
    config: CrawlConfig,
    queue: WorkQueue,
    seen: SeenSet,
    counters: CrawlCounters,
    results: Mutex<Vec<CrawlResult>>,
    http: HttpClient,
}

impl CrawlContext {
    /// Enqueue a task unless the crawl-size cap is reached. `remaining` is
    /// incremented here so it always tracks queued-but-unclaimed tasks.
    fn enqueue(&self, task: CrawlTask) {
        if self.counters.crawled.get() + self.counters.remaining.get() >= self.config.limit {
            debug!(url = %task.url, limit = self.config.limit, "crawl limit reached, dropping task");
            return;
        }
        self.counters.remaining.inc();
        self.queue.put(task);
    }
}

pub struct Crawler {
    ctx: Arc<CrawlContext>,
}

impl Crawler {
    /// Validate the configuration and build the HTTP client. This is the
    /// only fallible step of a crawl.
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        config.validate()?;
        let http = HttpClient::new(&config.user_agent, config.timeout)?;

        Ok(Self {
            ctx: Arc::new(CrawlContext {
                queue: WorkQueue::new(),
                seen: SeenSet::new(config.expected_urls, config.error_rate),
                counters: CrawlCounters::new(),
                results: Mutex::new(Vec::new()),
                http,
                config,
            }),
        })
    }

    /// Run the crawl to completion: seed the root, start the workers, wait
    /// for the queue to drain, cancel the workers, and hand back the
    /// aggregate outcome.
    pub async fn run(self) -> CrawlOutcome {
        let started_at = Utc::now();
        let ctx = self.ctx;

        // The root task carries the full redirect budget and is claimed in
        // the dedup filter up front.
        ctx.seen.insert(ctx.config.root_url.as_str());
        ctx.enqueue(CrawlTask::new(
            ctx.config.root_url.as_str(),
            ctx.config.max_redirects,
        ));
        debug!(root = %ctx.config.root_url, "seeded root task");

        let mut workers = JoinSet::new();
        for _ in 0..ctx.config.max_workers {
            workers.spawn(worker_loop(Arc::clone(&ctx)));
        }
        debug!(workers = ctx.config.max_workers, "worker pool running");

        ctx.queue.join().await;
        debug!("queue drained, cancelling workers");

        // Once the queue is drained no worker holds a task, so every worker
        // is parked in get() and aborts cleanly.
        workers.abort_all();
        while workers.join_next().await.is_some() {}

        let finished_at = Utc::now();
        let results = std::mem::take(&mut *ctx.results.lock());
        let counters = ctx.counters.snapshot();

        info!(
            root = %ctx.config.root_url,
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            crawled = counters.crawled,
            success_2xx = counters.success_2xx,
            redirect_3xx = counters.redirect_3xx,
            client_error_4xx = counters.client_error_4xx,
            server_error_5xx = counters.server_error_5xx,
            "crawl finished"
        );

        CrawlOutcome {
            root_url: ctx.config.root_url.to_string(),
            counters,
            results,
            started_at,
            finished_at,
        }
    }
}

/// One worker: claim a task, process it, mark it done, repeat until the
/// coordinator cancels the pool.
async fn worker_loop(ctx: Arc<CrawlContext>) {
    loop {
        let task = ctx.queue.get().await;
        ctx.counters.remaining.dec();
        process_task(&ctx, task).await;
        ctx.queue.task_done();
    }
}

/// Fetch one URL and settle it: exactly one result is recorded and
/// `crawled` is incremented exactly once, whatever happens.
async fn process_task(ctx: &CrawlContext, task: CrawlTask) {
    let fetched = ctx.http.fetch(&task.url).await;

    let status_code = match &fetched {
        Ok(page) => {
            debug!(url = %task.url, status = page.status_code, "fetched");
            page.status_code
        }
        Err(error) => {
            warn!(url = %task.url, %error, "fetch failed");
            0
        }
    };

    ctx.results.lock().push(CrawlResult {
        url: task.url.clone(),
        status_code,
    });
    ctx.counters.crawled.inc();

    if let Ok(page) = fetched {
        classify(ctx, &task, &page);
    }
}

/// Tally the response into its status bucket and queue any follow-up work.
fn classify(ctx: &CrawlContext, task: &CrawlTask, page: &FetchedPage) {
    match page.status_code {
        status if (200..300).contains(&status) => {
            ctx.counters.success_2xx.inc();
            if let Some(body) = &page.body {
                collect_links(ctx, &task.url, body);
            }
        }
        301 | 302 => {
            ctx.counters.redirect_3xx.inc();
            follow_redirect(ctx, task, page.location.as_deref());
        }
        status if (400..500).contains(&status) => {
            ctx.counters.client_error_4xx.inc();
        }
        status if (500..600).contains(&status) => {
            ctx.counters.server_error_5xx.inc();
        }
        status => {
            debug!(url = %task.url, status, "status outside classified ranges");
        }
    }
}

/// Queue the target of a 301/302 when budget remains and the target is new.
/// Redirect targets skip the same-prefix test; only the dedup filter and
/// the budget bound them.
fn follow_redirect(ctx: &CrawlContext, task: &CrawlTask, location: Option<&str>) {
    if task.remaining_redirects == 0 {
        debug!(url = %task.url, "redirect budget exhausted");
        return;
    }

    let Some(location) = location else {
        debug!(url = %task.url, "redirect without a Location header");
        return;
    };

    // Task URLs were built from parsed URLs, so this parse holds.
    let Ok(current) = Url::parse(&task.url) else {
        return;
    };
    let Some(target) = url_utils::resolve_link(&current, location) else {
        debug!(url = %task.url, location, "unresolvable Location header");
        return;
    };

    if ctx.seen.insert(target.as_str()) {
        ctx.enqueue(CrawlTask::new(
            target.as_str(),
            task.remaining_redirects - 1,
        ));
    }
}

/// Resolve the page's hrefs, keep the in-scope page URLs, and queue the
/// ones not seen before with a fresh redirect budget.
fn collect_links(ctx: &CrawlContext, page_url: &str, body: &str) {
    let Ok(base) = Url::parse(page_url) else {
        return;
    };

    let mut discovered = 0usize;
    for href in parser::extract_links(body) {
        let Some(link) = url_utils::resolve_link(&base, &href) else {
            continue;
        };
        if url_utils::is_static_asset(link.as_str()) {
            continue;
        }
        if !url_utils::in_scope(link.as_str(), ctx.config.root_url.as_str()) {
            continue;
        }
        if ctx.seen.insert(link.as_str()) {
            ctx.enqueue(CrawlTask::new(link.as_str(), ctx.config.max_redirects));
            discovered += 1;
        }
    }

    if discovered > 0 {
        debug!(url = %page_url, discovered, "queued discovered links");
    }
}
