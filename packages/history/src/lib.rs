#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Search history backed by `SQLite`.
//!
//! Every case search, successful or not, is appended to the `searches`
//! table in `data/case_searches.db` so recent lookups can be listed from
//! the API and CLI. Uses `switchy_database` for all database operations.

use std::path::Path;

use async_trait::async_trait;
use case_lookup_case_models::{SearchHistoryEntry, SearchLogEntry, SearchStatus};
use case_lookup_scraper::service::{SearchLog, SearchLogError};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};
use switchy_database_connection::init_sqlite_rusqlite;
use thiserror::Error;

/// Default path for the history database.
pub const DEFAULT_DB_PATH: &str = "data/case_searches.db";

/// Environment variable overriding [`DEFAULT_DB_PATH`].
pub const DB_PATH_ENV: &str = "CASE_LOOKUP_DB";

/// Number of entries returned when no limit is given.
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from history storage operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A database query or command failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored outcome could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Append-only log of searches.
pub struct SearchHistory {
    db: Box<dyn Database>,
}

impl SearchHistory {
    /// Opens (or creates) the history database at `path` and ensures the
    /// schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the database cannot be opened or schema
    /// creation fails.
    pub async fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = init_sqlite_rusqlite(Some(path)).map_err(|e| HistoryError::Database(e.to_string()))?;

        ensure_schema(db.as_ref()).await?;

        log::debug!("Opened search history at {}", path.display());

        Ok(Self { db })
    }

    /// Appends one search and returns its row ID.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the insert fails.
    pub async fn log_search(&self, entry: &SearchLogEntry) -> Result<i64, HistoryError> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let outcome = serde_json::to_string(&entry.outcome)?;

        let rows = self
            .db
            .query_raw_params(
                "INSERT INTO searches
                    (timestamp, case_type, case_number, year, search_duration,
                     status, outcome, error_message, origin)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 RETURNING id",
                &[
                    DatabaseValue::String(timestamp),
                    DatabaseValue::String(entry.case_type.clone()),
                    DatabaseValue::String(entry.case_number.clone()),
                    DatabaseValue::String(entry.year.clone()),
                    DatabaseValue::Real64(entry.duration_secs),
                    DatabaseValue::String(entry.status.to_string()),
                    DatabaseValue::String(outcome),
                    opt_str(entry.error_message.as_deref()),
                    opt_str(entry.origin.as_deref()),
                ],
            )
            .await
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        Ok(rows.first().and_then(|r| r.to_value("id").ok()).unwrap_or(0))
    }

    /// Returns up to `limit` searches, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the query fails.
    pub async fn recent(&self, limit: u32) -> Result<Vec<SearchHistoryEntry>, HistoryError> {
        let rows = self
            .db
            .query_raw_params(
                "SELECT id, timestamp, case_type, case_number, year, search_duration,
                        status, error_message, origin
                 FROM searches
                 ORDER BY id DESC
                 LIMIT $1",
                &[DatabaseValue::Int64(i64::from(limit))],
            )
            .await
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let status: String = row.to_value("status").unwrap_or_default();
            entries.push(SearchHistoryEntry {
                id: row.to_value("id").unwrap_or(0),
                timestamp: row.to_value("timestamp").unwrap_or_default(),
                case_type: row.to_value("case_type").unwrap_or_default(),
                case_number: row.to_value("case_number").unwrap_or_default(),
                year: row.to_value("year").unwrap_or_default(),
                duration_secs: row.to_value("search_duration").unwrap_or(0.0),
                status: status.parse().unwrap_or(SearchStatus::Error),
                error_message: row.to_value("error_message").unwrap_or(None),
                origin: row.to_value("origin").unwrap_or(None),
            });
        }

        Ok(entries)
    }

    /// Returns the total number of logged searches.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the query fails.
    pub async fn count(&self) -> Result<u64, HistoryError> {
        let rows = self
            .db
            .query_raw_params("SELECT COUNT(*) as cnt FROM searches", &[])
            .await
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        let count: i64 = rows.first().map_or(0, |r| r.to_value("cnt").unwrap_or(0));

        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Deletes every logged search and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the delete fails.
    pub async fn clear(&self) -> Result<u64, HistoryError> {
        let deleted = self
            .db
            .exec_raw_params("DELETE FROM searches", &[])
            .await
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        log::info!("Cleared {deleted} search history entries");

        Ok(deleted)
    }

    /// Whether the database answers a trivial query.
    pub async fn is_healthy(&self) -> bool {
        self.db.query_raw_params("SELECT 1 as ok", &[]).await.is_ok()
    }
}

#[async_trait]
impl SearchLog for SearchHistory {
    async fn record(&self, entry: &SearchLogEntry) -> Result<(), SearchLogError> {
        self.log_search(entry).await?;
        Ok(())
    }
}

/// Creates the table and indexes if they don't already exist.
async fn ensure_schema(db: &dyn Database) -> Result<(), HistoryError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS searches (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp       TEXT NOT NULL,
            case_type       TEXT NOT NULL,
            case_number     TEXT NOT NULL,
            year            TEXT NOT NULL,
            search_duration REAL NOT NULL,
            status          TEXT NOT NULL,
            outcome         TEXT NOT NULL,
            error_message   TEXT,
            origin          TEXT
        )",
    )
    .await
    .map_err(|e| HistoryError::Database(e.to_string()))?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_searches_timestamp ON searches (timestamp)")
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_searches_case
         ON searches (case_type, case_number, year)",
    )
    .await
    .map_err(|e| HistoryError::Database(e.to_string()))?;

    Ok(())
}

/// Converts an `Option<&str>` to a [`DatabaseValue`], using `Null` for `None`.
fn opt_str(value: Option<&str>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, |s| DatabaseValue::String(s.to_string()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use case_lookup_case_models::{CaseRecord, SearchOutcome};

    use super::*;

    fn db_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("case_lookup_history_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("searches.db")
    }

    fn entry(case_number: &str, outcome: SearchOutcome) -> SearchLogEntry {
        SearchLogEntry {
            case_type: "W.P.(C)".to_string(),
            case_number: case_number.to_string(),
            year: "2025".to_string(),
            duration_secs: 1.5,
            status: outcome.status(),
            error_message: outcome.reason().map(ToOwned::to_owned),
            outcome,
            origin: Some("127.0.0.1".to_string()),
        }
    }

    #[tokio::test]
    async fn logs_and_lists_newest_first() {
        let history = SearchHistory::open(&db_path("list")).await.unwrap();

        history
            .log_search(&entry(
                "1",
                SearchOutcome::Success {
                    records: vec![CaseRecord::default()],
                },
            ))
            .await
            .unwrap();
        history
            .log_search(&entry(
                "2",
                SearchOutcome::Error {
                    reason: "fetch failed: request timed out".to_string(),
                },
            ))
            .await
            .unwrap();

        let recent = history.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].case_number, "2");
        assert_eq!(recent[0].status, SearchStatus::Error);
        assert_eq!(
            recent[0].error_message.as_deref(),
            Some("fetch failed: request timed out")
        );
        assert_eq!(recent[1].case_number, "1");
        assert_eq!(recent[1].status, SearchStatus::Success);
        assert_eq!(recent[1].error_message, None);
        assert_eq!(recent[1].origin.as_deref(), Some("127.0.0.1"));
        assert!((recent[1].duration_secs - 1.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn respects_limit() {
        let history = SearchHistory::open(&db_path("limit")).await.unwrap();
        for n in 0..5 {
            history
                .log_search(&entry(
                    &n.to_string(),
                    SearchOutcome::NoResults {
                        reason: "none".to_string(),
                    },
                ))
                .await
                .unwrap();
        }

        let recent = history.recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].case_number, "4");
        assert_eq!(history.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn clear_reports_deleted_rows() {
        let history = SearchHistory::open(&db_path("clear")).await.unwrap();
        for n in 0..3 {
            history
                .record(&entry(
                    &n.to_string(),
                    SearchOutcome::Error {
                        reason: "x".to_string(),
                    },
                ))
                .await
                .unwrap();
        }

        assert_eq!(history.clear().await.unwrap(), 3);
        assert_eq!(history.count().await.unwrap(), 0);
        assert!(history.recent(10).await.unwrap().is_empty());
        assert_eq!(history.clear().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reopening_keeps_entries() {
        let path = db_path("reopen");
        {
            let history = SearchHistory::open(&path).await.unwrap();
            history
                .log_search(&entry(
                    "7",
                    SearchOutcome::NoResults {
                        reason: "none".to_string(),
                    },
                ))
                .await
                .unwrap();
        }

        let history = SearchHistory::open(&path).await.unwrap();
        assert!(history.is_healthy().await);
        assert_eq!(history.count().await.unwrap(), 1);
    }
}
