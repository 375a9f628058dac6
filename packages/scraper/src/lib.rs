#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case-status scraper for the court's case-lookup portal.
//!
//! A search runs the portal's anti-bot flow as a four-stage
//! [`session::SessionPipeline`] (fetch page, extract CAPTCHA and token,
//! validate CAPTCHA, submit search) and hands the returned HTML to
//! [`parse::ResultsParser`], which recognises the known result-table
//! layouts and normalises every row into a
//! [`case_lookup_case_models::CaseRecord`].
//!
//! The network is reached only through the [`transport::Transport`] trait,
//! so every stage can be exercised against scripted responses.

pub mod classify;
pub mod config;
pub mod download;
pub mod extract;
pub mod parse;
pub mod progress;
pub mod service;
pub mod session;
pub mod text;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

use case_lookup_case_models::{QueryError, SearchOutcome};
use strum_macros::{AsRefStr, Display};

pub use config::PortalConfig;
pub use reqwest::Url;
pub use parse::{RawPage, ResultsParser};
pub use service::{SearchLog, SearchService};
pub use session::{PipelineState, SessionContext, SessionPipeline};
pub use transport::{ReqwestTransport, Transport};

/// One step of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// GET the case-lookup page.
    Fetch,
    /// Pull the CAPTCHA text and anti-forgery token out of the page.
    Extract,
    /// POST the CAPTCHA to the validation endpoint.
    Validate,
    /// POST the search form.
    Submit,
    /// Classify and parse the results page.
    Parse,
}

impl Stage {
    /// Human-readable progress label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fetch => "Fetching search page",
            Self::Extract => "Extracting CAPTCHA and token",
            Self::Validate => "Validating CAPTCHA",
            Self::Submit => "Submitting case search",
            Self::Parse => "Parsing results",
        }
    }
}

/// Errors raised by a [`transport::Transport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client failed (connection, TLS, body read, ...).
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The portal answered with a non-2xx status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// A configured or scraped URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A request header name or value was not valid HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }
}

/// Errors that end a search.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// A network call failed or returned a non-2xx status.
    #[error("{stage} failed: {source}")]
    Transport {
        /// Stage whose request failed.
        stage: Stage,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// An element the flow depends on was absent or empty.
    #[error("extract failed: element '{element}' not found or empty")]
    Extraction {
        /// Identifier of the missing element.
        element: &'static str,
    },

    /// The portal explicitly reported that nothing matched.
    #[error("No case results found - website returned: {phrase}")]
    NoResults {
        /// The "no results" phrase found on the page.
        phrase: String,
    },

    /// The results page held no recognisable table.
    #[error("parse failed: {message}")]
    Parse {
        /// What the parser could not find.
        message: String,
    },

    /// The query failed validation before any request was made.
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),
}

impl ScrapeError {
    /// Returns the pipeline stage this error belongs to, if any.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Transport { stage, .. } => Some(*stage),
            Self::Extraction { .. } => Some(Stage::Extract),
            Self::NoResults { .. } | Self::Parse { .. } => Some(Stage::Parse),
            Self::InvalidQuery(_) => None,
        }
    }

    /// Maps this error onto the search outcome reported to callers.
    #[must_use]
    pub fn into_outcome(self) -> SearchOutcome {
        let reason = self.to_string();
        match self {
            Self::NoResults { .. } => SearchOutcome::NoResults { reason },
            Self::Transport { .. }
            | Self::Extraction { .. }
            | Self::Parse { .. }
            | Self::InvalidQuery(_) => SearchOutcome::Error { reason },
        }
    }
}
