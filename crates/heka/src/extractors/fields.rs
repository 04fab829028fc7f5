// ABOUTME: Small DOM helpers used by the metadata and content extractors.
// ABOUTME: Whitespace-normalized element text and first-non-empty meta/attribute lookups.

//! Field extraction helpers.
//!
//! - Selectors are tried in order; the first non-empty match wins.
//! - Whitespace is collapsed to single spaces and trimmed.
//! - Empty strings are treated as no match.

use scraper::{ElementRef, Html};

use crate::extractors::compiled::get_or_compile;

/// Collapses runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The element's descendant text, whitespace-normalized.
pub fn element_text(el: &ElementRef<'_>) -> String {
    let text: String = el.text().collect();
    normalize_whitespace(&text)
}

/// Extracts the first non-empty attribute value for one selector.
pub fn extract_attr_first(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let sel = get_or_compile(selector)?;
    doc.select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(normalize_whitespace)
        .find(|v| !v.is_empty())
}

/// Tries each selector in order and returns the first non-empty attribute value.
pub fn extract_first_attr(doc: &Html, selectors: &[&str], attr: &str) -> Option<String> {
    selectors
        .iter()
        .find_map(|sel| extract_attr_first(doc, sel, attr))
}

/// The page-level description, from the standard meta tags.
pub fn page_description(doc: &Html) -> Option<String> {
    extract_first_attr(
        doc,
        &[
            "meta[name='description']",
            "meta[property='og:description']",
        ],
        "content",
    )
}
