//! Turns a results page into [`CaseRecord`]s.

use std::sync::LazyLock;

use case_lookup_case_models::{CaseRecord, SearchOutcome, not_available};
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::{
    ScrapeError,
    classify::{Classification, TableShape, classify},
    extract::{
        extract_case_identifier, extract_judgment_link, extract_listing_details,
        extract_orders_link, extract_status, split_parties,
    },
    text::element_text,
};

/// Message reported when a page holds neither results nor a no-results
/// notice.
pub const UNRECOGNIZED_PAGE_MESSAGE: &str =
    "No case results found - no recognizable data tables in response";

/// A hyphenated `<prefix>-<number>/<year>` identifier somewhere in a cell.
static GENERIC_IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+-\d+/\d{4}").expect("valid regex"));

/// HTML returned by the search submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    body: String,
}

impl RawPage {
    /// Wraps a response body.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// The raw HTML.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.body
    }
}

/// Parses results pages, resolving relative links against the portal
/// origin.
#[derive(Debug, Clone)]
pub struct ResultsParser {
    base: Url,
}

impl ResultsParser {
    #[must_use]
    pub const fn new(base: Url) -> Self {
        Self { base }
    }

    /// Classifies `page` and extracts every case row from the recognised
    /// table.
    ///
    /// # Errors
    ///
    /// * [`ScrapeError::NoResults`] if the page carries a no-results phrase
    /// * [`ScrapeError::Parse`] if no recognised table is present
    pub fn parse_records(&self, page: &RawPage) -> Result<Vec<CaseRecord>, ScrapeError> {
        let document = Html::parse_document(page.as_str());

        match classify(&document) {
            Classification::NoResults(phrase) => Err(ScrapeError::NoResults {
                phrase: phrase.to_owned(),
            }),
            Classification::Table { shape, table } => {
                log::debug!("Parsing results table as {shape:?}");
                Ok(match shape {
                    TableShape::Judgment => parse_judgment_table(table, &self.base),
                    TableShape::CaseStatus => parse_case_status_table(table, &self.base),
                    TableShape::Generic => parse_generic_table(table),
                })
            }
            Classification::Unrecognized => {
                log::warn!("No recognizable data tables in results page");
                Err(ScrapeError::Parse {
                    message: UNRECOGNIZED_PAGE_MESSAGE.to_owned(),
                })
            }
        }
    }

    /// Parses `page` into a terminal search outcome. Never panics and never
    /// fails; every problem becomes a `NoResults` or `Error` outcome.
    #[must_use]
    pub fn parse(&self, page: &RawPage) -> SearchOutcome {
        match self.parse_records(page) {
            Ok(records) => SearchOutcome::from_records(records),
            Err(ScrapeError::Parse { message }) => SearchOutcome::Error { reason: message },
            Err(e) => e.into_outcome(),
        }
    }
}

// ── Table walkers ──────────────────────────────────────────────────────

/// Direct child rows of the given table sections, in document order.
fn section_rows<'a>(table: ElementRef<'a>, sections: &[&str]) -> Vec<ElementRef<'a>> {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|section| sections.contains(&section.value().name()))
        .flat_map(|section| section.children().filter_map(ElementRef::wrap))
        .filter(|row| row.value().name() == "tr")
        .collect()
}

/// Direct child cells of `row` whose tag is one of `tags`.
fn row_cells<'a>(row: ElementRef<'a>, tags: &[&str]) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| tags.contains(&cell.value().name()))
        .collect()
}

/// Body rows with at least `min_cells` data cells. Header rows made of
/// `th` cells drop out here.
fn data_rows(table: ElementRef<'_>, min_cells: usize) -> Vec<Vec<ElementRef<'_>>> {
    section_rows(table, &["tbody"])
        .into_iter()
        .map(|row| row_cells(row, &["td"]))
        .filter(|cells| cells.len() >= min_cells)
        .collect()
}

fn apply_identifier(record: &mut CaseRecord, text: &str) {
    if let Some(id) = extract_case_identifier(text) {
        record.case_type = id.case_type;
        record.case_number = id.number;
        record.year = id.year;
    }
}

fn apply_parties(record: &mut CaseRecord, text: &str) {
    let parties = split_parties(text);
    record.petitioner = parties.petitioner.unwrap_or_else(not_available);
    record.respondent = parties.respondent.unwrap_or_else(not_available);
}

// ── Layout parsers ─────────────────────────────────────────────────────

/// Judgment layout: serial, identifier, judgment link, parties.
fn parse_judgment_table(table: ElementRef<'_>, base: &Url) -> Vec<CaseRecord> {
    data_rows(table, 4)
        .into_iter()
        .map(|cells| {
            let mut record = CaseRecord::default();

            apply_identifier(&mut record, &element_text(cells[1]));

            if let Some(link) = extract_judgment_link(cells[2], base) {
                record.judgment_link = link.url;
                if let Some(date) = link.date {
                    record.judgment_date = date;
                }
            }

            apply_parties(&mut record, &element_text(cells[3]));

            record
        })
        .collect()
}

/// Case-status layout: serial, identifier with status and orders link,
/// parties, listing details.
fn parse_case_status_table(table: ElementRef<'_>, base: &Url) -> Vec<CaseRecord> {
    data_rows(table, 4)
        .into_iter()
        .map(|cells| {
            let mut record = CaseRecord::default();

            apply_identifier(&mut record, &element_text(cells[1]));
            if let Some(status) = extract_status(cells[1]) {
                record.status = status;
            }
            if let Some(orders) = extract_orders_link(cells[1], base) {
                record.orders_link = orders;
            }

            apply_parties(&mut record, &element_text(cells[2]));

            let listing = extract_listing_details(&element_text(cells[3]));
            record.next_date = listing.next_date.unwrap_or_else(not_available);
            record.last_date = listing.last_date.unwrap_or_else(not_available);
            record.court_number = listing.court_number.unwrap_or_else(not_available);

            record
        })
        .collect()
}

/// Any other case table: first row is a header, identifier comes from the
/// first of the first three cells holding a hyphenated identifier.
fn parse_generic_table(table: ElementRef<'_>) -> Vec<CaseRecord> {
    section_rows(table, &["thead", "tbody", "tfoot"])
        .into_iter()
        .skip(1)
        .map(|row| row_cells(row, &["td", "th"]))
        .filter(|cells| cells.len() >= 3)
        .map(|cells| {
            let mut record = CaseRecord::default();
            if let Some(text) = cells
                .iter()
                .take(3)
                .map(|cell| element_text(*cell))
                .find(|text| GENERIC_IDENTIFIER_RE.is_match(text))
            {
                apply_identifier(&mut record, &text);
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use case_lookup_case_models::{NOT_AVAILABLE, SearchStatus};

    use super::*;
    use crate::testing::{CASE_STATUS_PAGE, JUDGMENT_PAGE};

    fn parser() -> ResultsParser {
        ResultsParser::new(Url::parse("https://delhihighcourt.nic.in").unwrap())
    }

    #[test]
    fn parses_judgment_table() {
        let records = parser().parse_records(&RawPage::new(JUDGMENT_PAGE)).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.case_type, "W.P.(C)");
        assert_eq!(record.case_number, "11180");
        assert_eq!(record.year, "2025");
        assert_eq!(record.petitioner, "ANIJAY TYAGI");
        assert_eq!(record.respondent, "MUNICIPAL CORPORATION OF DELHI");
        assert_eq!(
            record.judgment_link,
            "https://delhihighcourt.nic.in/app/showFileJudgment/11180.pdf"
        );
        assert_eq!(record.judgment_date, "21-07-2025");
        assert_eq!(record.next_date, NOT_AVAILABLE);
        assert_eq!(record.court_number, NOT_AVAILABLE);
    }

    #[test]
    fn parses_case_status_table() {
        let records = parser().parse_records(&RawPage::new(CASE_STATUS_PAGE)).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.case_type, "CRL.M.C");
        assert_eq!(first.case_number, "558");
        assert_eq!(first.year, "2025");
        assert_eq!(first.status, "DISPOSED");
        assert_eq!(first.petitioner, "RAM KUMAR");
        assert_eq!(first.respondent, "STATE OF NCT OF DELHI");
        assert_eq!(first.next_date, "15/09/2025");
        assert_eq!(first.last_date, "10/07/2025");
        assert_eq!(first.court_number, "12");
        assert_eq!(
            first.orders_link,
            "https://delhihighcourt.nic.in/app/case-type-status-details/abc"
        );
        assert_eq!(first.judgment_link, NOT_AVAILABLE);

        let second = &records[1];
        assert_eq!(second.case_type, NOT_AVAILABLE);
        assert_eq!(second.petitioner, "SOLE PARTY");
        assert_eq!(second.respondent, NOT_AVAILABLE);
        assert_eq!(second.next_date, NOT_AVAILABLE);
        assert_eq!(second.status, NOT_AVAILABLE);
    }

    #[test]
    fn skips_short_rows() {
        let html = r#"<table id="caseTable">
            <tr><td>1</td><td>W.P.(C)-1/2025</td></tr>
            <tr><td>2</td><td>W.P.(C)-2/2025</td><td>A VS B</td><td></td></tr>
        </table>"#;
        let records = parser().parse_records(&RawPage::new(html)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].case_number, "2");
    }

    #[test]
    fn generic_table_extracts_identifier_only() {
        let html = r#"<table class="table table-bordered">
            <tr><th>S.No</th><th>Case No</th><th>Parties</th></tr>
            <tr><td>1</td><td>FAO-77/2023</td><td>X VS Y</td></tr>
            <tr><td>2</td><td>pending</td><td>Z</td></tr>
        </table>"#;
        let records = parser().parse_records(&RawPage::new(html)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].case_type, "FAO");
        assert_eq!(records[0].case_number, "77");
        assert_eq!(records[0].petitioner, NOT_AVAILABLE);
        assert_eq!(records[1], CaseRecord::default());
    }

    #[test]
    fn generic_table_needs_hyphenated_identifier() {
        let html = r#"<table class="table table-bordered">
            <tr><th>S.No</th><th>Case No</th><th>Parties</th></tr>
            <tr><td>1</td><td>Diary 558/2025</td><td>X VS Y</td></tr>
            <tr><td>2</td><td>Diary 99/2024</td><td>W.P.(C)-5/2025</td></tr>
        </table>"#;
        let records = parser().parse_records(&RawPage::new(html)).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].case_type, NOT_AVAILABLE);
        assert_eq!(records[0].case_number, NOT_AVAILABLE);
        assert_eq!(records[0].year, NOT_AVAILABLE);

        assert_eq!(records[1].case_type, "W.P.(C)");
        assert_eq!(records[1].case_number, "5");
        assert_eq!(records[1].year, "2025");
    }

    #[test]
    fn empty_recognised_table_is_no_results() {
        let html = r#"<table id="s_judgeTable"><thead><tr><th>S.No</th></tr></thead></table>"#;
        let outcome = parser().parse(&RawPage::new(html));
        assert_eq!(outcome.status(), SearchStatus::NoResults);
        assert_eq!(outcome.reason(), Some(SearchOutcome::EMPTY_TABLE_REASON));
    }

    #[test]
    fn no_results_phrase_short_circuits() {
        let html = format!("<p>No records found</p>{CASE_STATUS_PAGE}");
        let outcome = parser().parse(&RawPage::new(html));
        assert_eq!(outcome.status(), SearchStatus::NoResults);
        assert!(outcome.records().is_empty());
        assert!(outcome.reason().unwrap().contains("no records found"));
    }

    #[test]
    fn unrecognised_page_is_error() {
        let outcome = parser().parse(&RawPage::new("<html><body>Maintenance</body></html>"));
        assert_eq!(
            outcome,
            SearchOutcome::Error {
                reason: UNRECOGNIZED_PAGE_MESSAGE.to_owned()
            }
        );
    }

    #[test]
    fn parsing_is_idempotent() {
        let page = RawPage::new(CASE_STATUS_PAGE);
        assert_eq!(parser().parse(&page), parser().parse(&page));
    }
}
