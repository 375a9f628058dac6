//! Recognises what kind of results page the portal returned.
//!
//! The portal answers a search with one of several layouts: an explicit
//! "nothing found" message, a judgment table, a case-status table, or some
//! other table that still lists cases. Classification picks exactly one.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::text::{element_text, normalize_text};

/// Phrases the portal uses to say nothing matched, in match order.
pub const NO_RESULTS_PHRASES: &[&str] = &[
    "no case found",
    "no cases found",
    "no record found",
    "no records found",
    "case not found",
    "no result found",
    "no data found",
    "record not available",
];

/// Keywords that mark a generic table as listing cases.
pub const CASE_TABLE_KEYWORDS: &[&str] = &[
    "case no",
    "diary no",
    "judgment",
    "party",
    "petitioner",
    "respondent",
];

static JUDGMENT_TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#s_judgeTable").unwrap_or_else(|_| unreachable!()));
static CASE_TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#caseTable").unwrap_or_else(|_| unreachable!()));
static GENERIC_TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.table, table.table-hover, table.table-bordered")
        .unwrap_or_else(|_| unreachable!())
});

/// Known results-table layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// `#s_judgeTable`: serial, identifier, judgment link, parties.
    Judgment,
    /// `#caseTable`: serial, identifier with status, parties, listing.
    CaseStatus,
    /// Any styled table mentioning case-related column names.
    Generic,
}

impl TableShape {
    /// Shapes in the order they are tried.
    pub const PRIORITY: [Self; 3] = [Self::Judgment, Self::CaseStatus, Self::Generic];

    /// Finds the first table of this shape in `document`.
    #[must_use]
    pub fn locate(self, document: &Html) -> Option<ElementRef<'_>> {
        match self {
            Self::Judgment => document.select(&JUDGMENT_TABLE_SEL).next(),
            Self::CaseStatus => document.select(&CASE_TABLE_SEL).next(),
            Self::Generic => document
                .select(&GENERIC_TABLE_SEL)
                .find(|table| looks_like_case_table(&element_text(*table))),
        }
    }
}

/// Result of classifying a results page.
#[derive(Debug, Clone, Copy)]
pub enum Classification<'a> {
    /// The page says nothing matched. Wins over any table on the page.
    NoResults(&'static str),
    /// A recognised results table.
    Table {
        /// Which layout matched.
        shape: TableShape,
        /// The table element.
        table: ElementRef<'a>,
    },
    /// Neither a no-results message nor a recognised table.
    Unrecognized,
}

/// Returns the first no-results phrase contained in `text`, ignoring case
/// and whitespace layout.
#[must_use]
pub fn find_no_results_phrase(text: &str) -> Option<&'static str> {
    let text = normalize_text(text).to_lowercase();
    NO_RESULTS_PHRASES
        .iter()
        .copied()
        .find(|phrase| text.contains(phrase))
}

/// Whether a table's text mentions any case-related column keyword.
#[must_use]
pub fn looks_like_case_table(text: &str) -> bool {
    let text = text.to_lowercase();
    CASE_TABLE_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// Classifies a parsed results page.
#[must_use]
pub fn classify(document: &Html) -> Classification<'_> {
    let page_text = element_text(document.root_element());
    if let Some(phrase) = find_no_results_phrase(&page_text) {
        return Classification::NoResults(phrase);
    }

    TableShape::PRIORITY
        .into_iter()
        .find_map(|shape| shape.locate(document).map(|table| Classification::Table { shape, table }))
        .unwrap_or(Classification::Unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape_of(html: &str) -> Option<TableShape> {
        let document = Html::parse_document(html);
        match classify(&document) {
            Classification::Table { shape, .. } => Some(shape),
            Classification::NoResults(_) | Classification::Unrecognized => None,
        }
    }

    #[test]
    fn finds_no_results_phrase_case_insensitively() {
        assert_eq!(
            find_no_results_phrase("Sorry,   NO RECORD\n FOUND for this query"),
            Some("no record found")
        );
        assert_eq!(find_no_results_phrase("3 cases listed"), None);
    }

    #[test]
    fn no_results_message_wins_over_tables() {
        let document = Html::parse_document(
            r#"<html><body><p>No Case Found</p>
               <table id="caseTable"><tr><td>1</td></tr></table></body></html>"#,
        );
        assert!(matches!(
            classify(&document),
            Classification::NoResults("no case found")
        ));
    }

    #[test]
    fn prefers_judgment_table_over_case_table() {
        let html = r#"<html><body>
            <table id="caseTable"><tr><td>x</td></tr></table>
            <table id="s_judgeTable"><tr><td>y</td></tr></table>
            </body></html>"#;
        assert_eq!(shape_of(html), Some(TableShape::Judgment));
    }

    #[test]
    fn recognises_case_status_table() {
        let html = r#"<table id="caseTable"><tr><td>x</td></tr></table>"#;
        assert_eq!(shape_of(html), Some(TableShape::CaseStatus));
    }

    #[test]
    fn generic_table_needs_case_keywords() {
        let unrelated = r#"<table class="table"><tr><th>Name</th><th>Age</th></tr></table>"#;
        assert_eq!(shape_of(unrelated), None);

        let cases = r#"<table class="table table-bordered"><tr><th>S.No</th><th>Case No</th></tr></table>"#;
        assert_eq!(shape_of(cases), Some(TableShape::Generic));
    }

    #[test]
    fn skips_unrelated_generic_tables_before_matching_one() {
        let html = r#"<table class="table"><tr><td>Menu</td></tr></table>
            <table class="table-hover"><tr><th>Petitioner</th></tr></table>"#;
        let document = Html::parse_document(html);
        let Classification::Table { table, .. } = classify(&document) else {
            panic!("expected a table");
        };
        assert!(element_text(table).contains("Petitioner"));
    }

    #[test]
    fn page_without_tables_is_unrecognized() {
        let document = Html::parse_document("<html><body><p>Welcome</p></body></html>");
        assert!(matches!(classify(&document), Classification::Unrecognized));
    }
}
