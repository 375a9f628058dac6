#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case query, normalized case record, and search outcome types.
//!
//! Every results layout the portal renders (judgment listings, case-status
//! listings, unrecognised tables) is normalized into the single
//! [`CaseRecord`] shape defined here. Absent values are always the
//! [`NOT_AVAILABLE`] sentinel, never missing.

pub mod case_types;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel stored in any [`CaseRecord`] field the source page omits.
pub const NOT_AVAILABLE: &str = "NA";

/// Returns [`NOT_AVAILABLE`] as an owned string.
#[must_use]
pub fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Errors produced when validating a [`CaseQuery`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A required field was empty after trimming.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The case number contained something other than ASCII digits.
    #[error("case number must be numeric, got '{0}'")]
    NonNumericCaseNumber(String),

    /// The year was not exactly four ASCII digits.
    #[error("year must be a 4-digit number, got '{0}'")]
    InvalidYear(String),
}

/// Immutable input to a single search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseQuery {
    case_type_code: String,
    case_number: String,
    year: String,
}

impl CaseQuery {
    /// Builds a validated query from raw (possibly padded) user input.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if any field is empty, the case number is not
    /// all digits, or the year is not exactly four digits.
    pub fn new(case_type_code: &str, case_number: &str, year: &str) -> Result<Self, QueryError> {
        let case_type_code = case_type_code.trim();
        let case_number = case_number.trim();
        let year = year.trim();

        if case_type_code.is_empty() {
            return Err(QueryError::MissingField("case type"));
        }
        if case_number.is_empty() {
            return Err(QueryError::MissingField("case number"));
        }
        if year.is_empty() {
            return Err(QueryError::MissingField("year"));
        }
        if !case_number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QueryError::NonNumericCaseNumber(case_number.to_string()));
        }
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QueryError::InvalidYear(year.to_string()));
        }

        Ok(Self {
            case_type_code: case_type_code.to_string(),
            case_number: case_number.to_string(),
            year: year.to_string(),
        })
    }

    /// Portal code for the case type (e.g. `"CRLMM"`).
    #[must_use]
    pub fn case_type_code(&self) -> &str {
        &self.case_type_code
    }

    /// Numeric case number as text.
    #[must_use]
    pub fn case_number(&self) -> &str {
        &self.case_number
    }

    /// Four-digit filing year as text.
    #[must_use]
    pub fn year(&self) -> &str {
        &self.year
    }
}

impl std::fmt::Display for CaseQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}/{}", self.case_type_code, self.case_number, self.year)
    }
}

/// One normalized case row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Case type prefix as printed by the portal (e.g. `"W.P.(C)"`).
    pub case_type: String,
    /// Case number.
    pub case_number: String,
    /// Filing year.
    pub year: String,
    /// First party named in the cause title.
    pub petitioner: String,
    /// Opposing party named in the cause title.
    pub respondent: String,
    /// Next listing date, as printed.
    pub next_date: String,
    /// Last listing date, as printed.
    pub last_date: String,
    /// Judgment/order date (`dd-mm-yyyy`).
    pub judgment_date: String,
    /// Absolute URL of the judgment document.
    pub judgment_link: String,
    /// Disposal status marker (e.g. `"DISPOSED"`).
    pub status: String,
    /// Absolute URL of the orders/detail page.
    pub orders_link: String,
    /// Court room number from the listing details.
    pub court_number: String,
}

impl Default for CaseRecord {
    fn default() -> Self {
        Self {
            case_type: not_available(),
            case_number: not_available(),
            year: not_available(),
            petitioner: not_available(),
            respondent: not_available(),
            next_date: not_available(),
            last_date: not_available(),
            judgment_date: not_available(),
            judgment_link: not_available(),
            status: not_available(),
            orders_link: not_available(),
            court_number: not_available(),
        }
    }
}

/// Coarse classification of a search, as stored in the search history.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchStatus {
    /// At least one case record was returned.
    Success,
    /// The portal reported (or rendered) no matching cases.
    NoResults,
    /// The search failed at some stage.
    Error,
}

/// Result of one search. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Records in the order the portal listed them.
    Success {
        /// Normalized rows.
        records: Vec<CaseRecord>,
    },
    /// The portal reported no matching case.
    NoResults {
        /// Why the search was classified as empty.
        reason: String,
    },
    /// The search failed.
    Error {
        /// Stage-specific failure description.
        reason: String,
    },
}

impl SearchOutcome {
    /// Reason used when a recognised results table has no data rows.
    pub const EMPTY_TABLE_REASON: &'static str = "no case rows in results table";

    /// Wraps parsed rows, treating an empty list as [`Self::NoResults`].
    #[must_use]
    pub fn from_records(records: Vec<CaseRecord>) -> Self {
        if records.is_empty() {
            Self::NoResults {
                reason: Self::EMPTY_TABLE_REASON.to_string(),
            }
        } else {
            Self::Success { records }
        }
    }

    /// Returns the history classification for this outcome.
    #[must_use]
    pub const fn status(&self) -> SearchStatus {
        match self {
            Self::Success { .. } => SearchStatus::Success,
            Self::NoResults { .. } => SearchStatus::NoResults,
            Self::Error { .. } => SearchStatus::Error,
        }
    }

    /// Returns the parsed records (empty unless [`Self::Success`]).
    #[must_use]
    pub fn records(&self) -> &[CaseRecord] {
        match self {
            Self::Success { records } => records,
            Self::NoResults { .. } | Self::Error { .. } => &[],
        }
    }

    /// Returns the reason text for non-success outcomes.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::NoResults { reason } | Self::Error { reason } => Some(reason),
        }
    }
}

/// Payload of a successful (or empty) search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchData {
    /// Normalized case rows.
    pub cases: Vec<CaseRecord>,
}

/// The Search Service's external response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// `true` only when at least one case was found.
    pub success: bool,
    /// Coarse classification, so callers can tell "nothing found" apart
    /// from a failure.
    pub status: SearchStatus,
    /// Present for [`SearchStatus::Success`] and [`SearchStatus::NoResults`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SearchData>,
    /// Present for [`SearchStatus::NoResults`] and [`SearchStatus::Error`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Success { records } => Self {
                success: true,
                status: SearchStatus::Success,
                data: Some(SearchData { cases: records }),
                error: None,
            },
            SearchOutcome::NoResults { reason } => Self {
                success: false,
                status: SearchStatus::NoResults,
                data: Some(SearchData { cases: Vec::new() }),
                error: Some(reason),
            },
            SearchOutcome::Error { reason } => Self {
                success: false,
                status: SearchStatus::Error,
                data: None,
                error: Some(reason),
            },
        }
    }
}

/// One search, as written to the history sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchLogEntry {
    /// Case type as supplied by the caller.
    pub case_type: String,
    /// Case number as supplied by the caller.
    pub case_number: String,
    /// Year as supplied by the caller.
    pub year: String,
    /// Wall-clock duration of the search in seconds.
    pub duration_secs: f64,
    /// Outcome classification.
    pub status: SearchStatus,
    /// Full outcome payload.
    pub outcome: SearchOutcome,
    /// Failure or no-result reason, if any.
    pub error_message: Option<String>,
    /// Caller origin (e.g. client IP address).
    pub origin: Option<String>,
}

/// One search, as read back from the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    /// Row identifier.
    pub id: i64,
    /// Local time the search was logged (`YYYY-MM-DD HH:MM:SS`).
    pub timestamp: String,
    /// Case type as supplied by the caller.
    pub case_type: String,
    /// Case number as supplied by the caller.
    pub case_number: String,
    /// Year as supplied by the caller.
    pub year: String,
    /// Wall-clock duration in seconds.
    pub duration_secs: f64,
    /// Outcome classification.
    pub status: SearchStatus,
    /// Failure or no-result reason, if any.
    pub error_message: Option<String>,
    /// Caller origin.
    pub origin: Option<String>,
}
