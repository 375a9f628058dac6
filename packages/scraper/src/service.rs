//! Entry point used by the server and CLI: validate, search, log, respond.

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use case_lookup_case_models::{CaseQuery, SearchLogEntry, SearchResponse};

use crate::{ScrapeError, session::SessionPipeline};

/// Error type returned by a [`SearchLog`] sink.
pub type SearchLogError = Box<dyn std::error::Error + Send + Sync>;

/// Persists one entry per search.
#[async_trait]
pub trait SearchLog: Send + Sync {
    /// Records `entry`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry could not be stored. Callers log and
    /// otherwise ignore it.
    async fn record(&self, entry: &SearchLogEntry) -> Result<(), SearchLogError>;
}

/// Runs searches and writes each one to an optional [`SearchLog`].
pub struct SearchService {
    pipeline: SessionPipeline,
    sink: Option<Arc<dyn SearchLog>>,
}

impl SearchService {
    #[must_use]
    pub const fn new(pipeline: SessionPipeline) -> Self {
        Self {
            pipeline,
            sink: None,
        }
    }

    #[must_use]
    pub fn with_log(mut self, sink: Arc<dyn SearchLog>) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use]
    pub const fn pipeline(&self) -> &SessionPipeline {
        &self.pipeline
    }

    /// Searches for one case.
    ///
    /// Invalid input is reported as an error response without touching the
    /// network. Every call, valid or not, produces exactly one log entry; a
    /// failing sink never changes the response.
    pub async fn search(
        &self,
        case_type: &str,
        case_number: &str,
        year: &str,
        origin: Option<&str>,
    ) -> SearchResponse {
        let started = Instant::now();

        let outcome = match CaseQuery::new(case_type, case_number, year) {
            Ok(query) => self.pipeline.execute(&query).await,
            Err(e) => {
                log::warn!("Rejected search input: {e}");
                ScrapeError::InvalidQuery(e).into_outcome()
            }
        };

        let duration_secs = started.elapsed().as_secs_f64();
        log::info!(
            "Search {} {}/{} finished in {duration_secs:.2}s: {}",
            case_type.trim(),
            case_number.trim(),
            year.trim(),
            outcome.status()
        );

        if let Some(sink) = &self.sink {
            let entry = SearchLogEntry {
                case_type: case_type.trim().to_owned(),
                case_number: case_number.trim().to_owned(),
                year: year.trim().to_owned(),
                duration_secs,
                status: outcome.status(),
                error_message: outcome.reason().map(ToOwned::to_owned),
                outcome: outcome.clone(),
                origin: origin.map(ToOwned::to_owned),
            };
            if let Err(e) = sink.record(&entry).await {
                log::error!("Failed to record search history: {e}");
            }
        }

        SearchResponse::from(outcome)
    }
}
