#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the case lookup server.
//!
//! Search results themselves are returned as
//! [`case_lookup_case_models::SearchResponse`]; the types here cover the
//! request bodies, query strings, and the remaining endpoints.

use case_lookup_case_models::{SearchHistoryEntry, SearchStatus, case_types::CaseType};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server and its history database are usable.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Whether the history database answered.
    pub database: bool,
}

/// A selectable case type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCaseType {
    /// Display name, e.g. `W.P.(C)`.
    pub name: String,
    /// Code submitted to the portal, e.g. `CW`.
    pub code: String,
}

impl From<&CaseType> for ApiCaseType {
    fn from(case_type: &CaseType) -> Self {
        Self {
            name: case_type.name.to_string(),
            code: case_type.code.to_string(),
        }
    }
}

/// Body of `POST /api/search`.
///
/// Missing fields deserialize as empty strings so that validation, not
/// JSON extraction, reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Case type display name or portal code.
    #[serde(default, alias = "case_type")]
    pub case_type: String,
    /// Case number (digits).
    #[serde(default, alias = "case_number")]
    pub case_number: String,
    /// Four-digit filing year.
    #[serde(default)]
    pub year: String,
}

/// Query parameters for `GET /api/history`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    /// Maximum number of entries (default 10).
    pub limit: Option<u32>,
}

/// One past search as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHistoryEntry {
    pub id: i64,
    pub timestamp: String,
    pub case_type: String,
    pub case_number: String,
    pub year: String,
    /// Wall-clock duration in seconds.
    pub duration_secs: f64,
    pub status: SearchStatus,
    pub error_message: Option<String>,
    pub origin: Option<String>,
}

impl From<SearchHistoryEntry> for ApiHistoryEntry {
    fn from(entry: SearchHistoryEntry) -> Self {
        Self {
            id: entry.id,
            timestamp: entry.timestamp,
            case_type: entry.case_type,
            case_number: entry.case_number,
            year: entry.year,
            duration_secs: entry.duration_secs,
            status: entry.status,
            error_message: entry.error_message,
            origin: entry.origin,
        }
    }
}

/// Response of `DELETE /api/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryResponse {
    /// Number of entries removed.
    pub deleted: u64,
}

/// Query parameters for `GET /api/download`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQuery {
    /// Absolute document URL from a search result.
    pub url: String,
    /// Case identifier used to name the saved file.
    #[serde(default, alias = "case_id")]
    pub case_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_accepts_both_spellings() {
        let camel: SearchRequest =
            serde_json::from_str(r#"{"caseType":"CRL.M.C.","caseNumber":"558","year":"2025"}"#)
                .unwrap();
        let snake: SearchRequest =
            serde_json::from_str(r#"{"case_type":"CRL.M.C.","case_number":"558","year":"2025"}"#)
                .unwrap();
        assert_eq!(camel.case_type, snake.case_type);
        assert_eq!(camel.case_number, "558");
        assert_eq!(snake.case_number, "558");
    }

    #[test]
    fn search_request_defaults_missing_fields() {
        let request: SearchRequest = serde_json::from_str(r#"{"year":"2025"}"#).unwrap();
        assert!(request.case_type.is_empty());
        assert!(request.case_number.is_empty());
    }

    #[test]
    fn history_entry_serializes_camel_case() {
        let entry = ApiHistoryEntry {
            id: 1,
            timestamp: "2025-07-21 10:00:00".to_string(),
            case_type: "CRLMM".to_string(),
            case_number: "558".to_string(),
            year: "2025".to_string(),
            duration_secs: 2.5,
            status: SearchStatus::NoResults,
            error_message: Some("none".to_string()),
            origin: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["caseNumber"], "558");
        assert_eq!(json["durationSecs"], 2.5);
        assert_eq!(json["status"], "NO_RESULTS");
    }
}
