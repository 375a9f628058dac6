//! Field extractors for individual result-table cells.
//!
//! Each extractor takes cleaned cell text (or the cell element when links
//! are involved) and returns an optional structured value. None of them
//! fail: anything unrecognised comes back as `None` and the record builder
//! substitutes the `"NA"` sentinel.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Selector};

use crate::text::{element_text, normalize_text};

static CASE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+?)-(\d+)/(\d{4})").expect("valid regex"));
static NUMBER_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)/(\d{4})").expect("valid regex"));
static TRAILING_DOTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.+$").expect("valid regex"));
static TRAILING_SEPARATORS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+$").expect("valid regex"));

static PARTY_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bvs\b\.?\s*").expect("valid regex"));
static PETITIONER_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^PETITIONER\s*:?\s*").expect("valid regex"));
static RESPONDENT_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^RESPONDENT\s*:?\s*").expect("valid regex"));
static LEADING_DOTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.+\s*").expect("valid regex"));

static LISTING_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(NEXT\s+DATE|LAST\s+DATE|COURT\s+NO)\s*:").expect("valid regex")
});
static COURT_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)COURT\s+NO\s*:\s*(\d+)").expect("valid regex"));

static DOCUMENT_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}-\d{2}-\d{4}").expect("valid regex"));

static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap_or_else(|_| unreachable!()));
static STATUS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"font[color="red"]"#).unwrap_or_else(|_| unreachable!()));

/// Link target fragment identifying a case's orders page.
const ORDERS_HREF_MARKER: &str = "case-type-status-details";

/// Case type, number, and year parsed from an identifier like
/// `W.P.(C)-11180/2025`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseIdentifier {
    /// Case-type prefix as displayed, e.g. `CRL.M.C`.
    pub case_type: String,
    /// Case number.
    pub number: String,
    /// Four-digit year.
    pub year: String,
}

/// Petitioner and respondent split out of a parties cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parties {
    /// Party before the separator.
    pub petitioner: Option<String>,
    /// Party after the separator.
    pub respondent: Option<String>,
}

/// Labelled listing fields from a case-status cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDetails {
    /// Value following `NEXT DATE:`.
    pub next_date: Option<String>,
    /// Value following `Last Date:`.
    pub last_date: Option<String>,
    /// Digits following `COURT NO:`.
    pub court_number: Option<String>,
}

/// A judgment document link and the date shown in its text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JudgmentLink {
    /// `dd-mm-yyyy` date from the link text.
    pub date: Option<String>,
    /// Absolute document URL.
    pub url: String,
}

/// Parses a case identifier.
///
/// The primary form is `<type>-<number>/<year>`, where the type may itself
/// contain dots, brackets, and spaces. When no hyphen separates type and
/// number, falls back to `<type> <number>/<year>`. Returns `None` when no
/// usable case type precedes the number.
#[must_use]
pub fn extract_case_identifier(text: &str) -> Option<CaseIdentifier> {
    let text = text.trim();

    if let Some(caps) = CASE_ID_RE.captures(text) {
        let case_type = normalize_text(&caps[1]);
        let case_type = TRAILING_DOTS_RE.replace(&case_type, "").trim().to_owned();
        if !case_type.is_empty() {
            return Some(CaseIdentifier {
                case_type,
                number: caps[2].to_owned(),
                year: caps[3].to_owned(),
            });
        }
    }

    let caps = NUMBER_YEAR_RE.captures(text)?;
    let start = caps.get(0)?.start();
    let prefix = TRAILING_SEPARATORS_RE.replace(&text[..start], "");
    let case_type = normalize_text(&prefix);
    if case_type.is_empty() {
        return None;
    }

    Some(CaseIdentifier {
        case_type,
        number: caps[1].to_owned(),
        year: caps[2].to_owned(),
    })
}

/// Splits a parties cell on the first standalone `vs` (any case, optional
/// trailing period).
///
/// `PETITIONER:` / `RESPONDENT:` labels and dots left over from `VS.` are
/// stripped. Without a separator the whole text is the petitioner.
#[must_use]
pub fn split_parties(text: &str) -> Parties {
    let text = normalize_text(text);

    let Some(sep) = PARTY_SEPARATOR_RE.find(&text) else {
        return Parties {
            petitioner: non_empty(text),
            respondent: None,
        };
    };

    let petitioner = PETITIONER_LABEL_RE.replace(text[..sep.start()].trim(), "");
    let respondent = RESPONDENT_LABEL_RE.replace(text[sep.end()..].trim(), "");
    let respondent = LEADING_DOTS_RE.replace(&respondent, "");

    Parties {
        petitioner: non_empty(petitioner.trim().to_owned()),
        respondent: non_empty(respondent.trim().to_owned()),
    }
}

/// Reads the `NEXT DATE`, `Last Date`, and `COURT NO` fields out of a
/// listing cell.
///
/// Labels match case-insensitively in any order. Each value runs up to the
/// next recognised label or the end of the text.
#[must_use]
pub fn extract_listing_details(text: &str) -> ListingDetails {
    let text = normalize_text(text);
    let labels: Vec<_> = LISTING_LABEL_RE.captures_iter(&text).collect();

    let mut details = ListingDetails::default();

    for (i, caps) in labels.iter().enumerate() {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = labels
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let value = non_empty(text[whole.end()..end].trim().to_owned());

        let label = normalize_text(label.as_str()).to_ascii_lowercase();
        match label.as_str() {
            "next date" if details.next_date.is_none() => details.next_date = value,
            "last date" if details.last_date.is_none() => details.last_date = value,
            _ => {}
        }
    }

    details.court_number = COURT_NO_RE.captures(&text).map(|caps| caps[1].to_owned());

    details
}

/// Finds the first link in `cell` whose target mentions `pdf` and resolves
/// it against `base`.
#[must_use]
pub fn extract_judgment_link(cell: ElementRef<'_>, base: &Url) -> Option<JudgmentLink> {
    let anchor = cell.select(&ANCHOR_SEL).find(|a| {
        a.value()
            .attr("href")
            .is_some_and(|href| href.to_ascii_lowercase().contains("pdf"))
    })?;
    let href = anchor.value().attr("href")?;

    let text = element_text(anchor);
    let date = DOCUMENT_DATE_RE.find(&text).map(|m| m.as_str().to_owned());

    Some(JudgmentLink {
        date,
        url: resolve_url(base, href),
    })
}

/// Reads the bracketed status marker (e.g. `[DISPOSED]`) from a cell.
#[must_use]
pub fn extract_status(cell: ElementRef<'_>) -> Option<String> {
    let marker = cell.select(&STATUS_SEL).next()?;
    let status = element_text(marker).replace(['[', ']'], "");
    non_empty(status.trim().to_owned())
}

/// Finds the case's orders link, either by its `Orders` label or by the
/// status-details path in its target.
#[must_use]
pub fn extract_orders_link(cell: ElementRef<'_>, base: &Url) -> Option<String> {
    let anchor = cell.select(&ANCHOR_SEL).find(|a| {
        element_text(*a).eq_ignore_ascii_case("orders")
            || a.value()
                .attr("href")
                .is_some_and(|href| href.contains(ORDERS_HREF_MARKER))
    })?;

    anchor.value().attr("href").map(|href| resolve_url(base, href))
}

/// Resolves `href` against `base`, keeping it verbatim if it cannot be
/// joined.
#[must_use]
pub fn resolve_url(base: &Url, href: &str) -> String {
    let href = href.trim();
    base.join(href).map_or_else(|_| href.to_owned(), |url| url.to_string())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
