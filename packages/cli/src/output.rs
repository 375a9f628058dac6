//! Plain-text rendering for search results, history, and case types.

use std::fmt::Write as _;

use case_lookup_case_models::{
    CaseRecord, NOT_AVAILABLE, SearchHistoryEntry, SearchResponse, SearchStatus, case_types,
};

const RULE_WIDTH: usize = 100;

/// Renders a search response for the terminal.
#[must_use]
pub fn format_response(response: &SearchResponse) -> String {
    let mut out = String::new();

    match response.status {
        SearchStatus::Success => {
            let cases = response.data.as_ref().map_or(&[][..], |d| d.cases.as_slice());
            for (i, case) in cases.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                out.push_str(&format_record(case));
            }
            let _ = writeln!(out, "\n{} case(s)", cases.len());
        }
        SearchStatus::NoResults => {
            let reason = response.error.as_deref().unwrap_or("no matching cases");
            let _ = writeln!(out, "No cases found: {reason}");
        }
        SearchStatus::Error => {
            let reason = response.error.as_deref().unwrap_or("unknown error");
            let _ = writeln!(out, "Search failed: {reason}");
        }
    }

    out
}

/// Renders one case as labelled lines, skipping fields the portal left
/// blank.
#[must_use]
pub fn format_record(case: &CaseRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}/{}",
        case.case_type, case.case_number, case.year
    );

    let fields = [
        ("Petitioner", &case.petitioner),
        ("Respondent", &case.respondent),
        ("Status", &case.status),
        ("Next date", &case.next_date),
        ("Last date", &case.last_date),
        ("Court no.", &case.court_number),
        ("Judgment", &case.judgment_date),
        ("Document", &case.judgment_link),
        ("Orders", &case.orders_link),
    ];

    for (label, value) in fields {
        if value != NOT_AVAILABLE {
            let _ = writeln!(out, "  {label:<11} {value}");
        }
    }

    out
}

/// Renders history entries as a table.
#[must_use]
pub fn format_history(entries: &[SearchHistoryEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<20} {:<24} {:<11} {:>7}  DETAIL",
        "ID", "TIMESTAMP", "CASE", "STATUS", "SECS"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for entry in entries {
        let case = format!("{} {}/{}", entry.case_type, entry.case_number, entry.year);
        let detail = entry.error_message.as_deref().unwrap_or("");
        let _ = writeln!(
            out,
            "{:<6} {:<20} {:<24} {:<11} {:>7.2}  {}",
            entry.id,
            entry.timestamp,
            truncate(&case, 24),
            entry.status,
            entry.duration_secs,
            truncate(detail, 40)
        );
    }

    let _ = writeln!(out, "\n{} search(es)", entries.len());
    out
}

/// Renders every case type with its portal code.
#[must_use]
pub fn format_case_types() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<24} CODE", "CASE TYPE");
    let _ = writeln!(out, "{}", "-".repeat(40));
    for case_type in case_types::all() {
        let _ = writeln!(out, "{:<24} {}", case_type.name, case_type.code);
    }
    out
}

/// Shortens `s` to at most `max` characters, ending in `...` when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
