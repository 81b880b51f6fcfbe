//! SQLite persistence for finished crawls.
//!
//! One `sessions` row per crawl carries the counters and timestamps; every
//! crawl result lands in `results` with a foreign key back to its session.
//! Results are written in fixed-size batches, one transaction per batch.

use std::path::Path;

use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::debug;

use crate::models::{CrawlOutcome, CrawlResult};

/// Result rows inserted per transaction.
pub const RESULT_BATCH_SIZE: usize = 250;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    base_url TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    successes INTEGER NOT NULL DEFAULT 0,
    redirects INTEGER NOT NULL DEFAULT 0,
    soft_errors INTEGER NOT NULL DEFAULT 0,
    hard_errors INTEGER NOT NULL DEFAULT 0,
    crawled INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
    url TEXT NOT NULL,
    status_code INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_results_session ON results(session_id);
"#;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Stored session row, one per finished crawl.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: i64,
    pub base_url: String,
    pub started_at: String,
    pub finished_at: String,
    pub successes: u64,
    pub redirects: u64,
    pub soft_errors: u64,
    pub hard_errors: u64,
    pub crawled: u64,
    pub result_count: u64,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database at `path` and ensure the schema
    /// exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// In-memory database for tests.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Persist a finished crawl and return the new session id. The full
    /// result set is stored regardless of the collect_all flag.
    pub fn persist_outcome(&mut self, outcome: &CrawlOutcome) -> Result<i64, StoreError> {
        let session_id = self.create_session(outcome)?;
        self.insert_results(session_id, &outcome.results)?;
        Ok(session_id)
    }

    fn create_session(&mut self, outcome: &CrawlOutcome) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO sessions (base_url, started_at, finished_at,
                                   successes, redirects, soft_errors, hard_errors, crawled)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                outcome.root_url,
                outcome.started_at.to_rfc3339(),
                outcome.finished_at.to_rfc3339(),
                outcome.counters.success_2xx as i64,
                outcome.counters.redirect_3xx as i64,
                outcome.counters.client_error_4xx as i64,
                outcome.counters.server_error_5xx as i64,
                outcome.counters.crawled as i64,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_results(
        &mut self,
        session_id: i64,
        results: &[CrawlResult],
    ) -> Result<(), StoreError> {
        for batch in results.chunks(RESULT_BATCH_SIZE) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO results (session_id, url, status_code) VALUES (?1, ?2, ?3)",
                )?;
                for result in batch {
                    stmt.execute(params![session_id, result.url, result.status_code])?;
                }
            }
            tx.commit()?;
            debug!(session_id, rows = batch.len(), "stored result batch");
        }
        Ok(())
    }

    /// All sessions, newest first, each with its stored result count.
    pub fn list_sessions(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.base_url, s.started_at, s.finished_at,
                    s.successes, s.redirects, s.soft_errors, s.hard_errors, s.crawled,
                    COUNT(r.id)
             FROM sessions s
             LEFT JOIN results r ON r.session_id = s.id
             GROUP BY s.id
             ORDER BY s.id DESC",
        )?;

        let sessions = stmt
            .query_map([], |row| {
                Ok(SessionRecord {
                    id: row.get(0)?,
                    base_url: row.get(1)?,
                    started_at: row.get(2)?,
                    finished_at: row.get(3)?,
                    successes: row.get::<_, i64>(4)? as u64,
                    redirects: row.get::<_, i64>(5)? as u64,
                    soft_errors: row.get::<_, i64>(6)? as u64,
                    hard_errors: row.get::<_, i64>(7)? as u64,
                    crawled: row.get::<_, i64>(8)? as u64,
                    result_count: row.get::<_, i64>(9)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    /// Results stored for one session, in insertion order.
    pub fn session_results(&self, session_id: i64) -> Result<Vec<CrawlResult>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT url, status_code FROM results WHERE session_id = ?1 ORDER BY id",
        )?;

        let results = stmt
            .query_map(params![session_id], |row| {
                Ok(CrawlResult {
                    url: row.get(0)?,
                    status_code: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(results)
    }
}
