//! Text cleanup for content pulled out of portal HTML.

use scraper::ElementRef;

/// Collapses every whitespace run (including newlines and non-breaking
/// spaces) to a single space, drops stray `&nbsp` entity text, and trims.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let cleaned = raw.replace("&nbsp;", " ").replace("&nbsp", " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the normalized text content of an element, with a space
/// between adjacent text nodes.
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<Vec<_>>().join(" "))
}
