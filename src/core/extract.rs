//! Embedded-JSON extraction for snapstory-dl
//!
//! The story page carries its structured data in a single data island:
//! `<script id="__NEXT_DATA__" type="application/json">`. That one element is
//! the only wire contract with the upstream page; if it is missing or does
//! not parse, the page has been redesigned and the error says so. No
//! heuristic fallback scraping is attempted.

use scraper::{Html, Selector};
use serde_json::Value;

use crate::core::error::{Error, Result};

const DATA_ISLAND_SELECTOR: &str = "script#__NEXT_DATA__";

/// Locate and parse the embedded JSON payload of a story page.
pub fn extract_next_data(html: &str) -> Result<Value> {
    let selector =
        Selector::parse(DATA_ISLAND_SELECTOR).expect("Failed to parse data island selector");

    let document = Html::parse_document(html);
    let element = document
        .select(&selector)
        .next()
        .ok_or_else(|| Error::PageStructure("data island missing".to_string()))?;

    let raw: String = element.text().collect();
    serde_json::from_str(&raw)
        .map_err(|e| Error::PageStructure(format!("embedded JSON invalid: {e}")))
}
