//! Box-office ranking page scraping.
//!
//! The ranking is a list of `<li>` items inside the element with
//! `id="mainBodyWrapper"`; each item's text starts with `Title (Year)`.

use crate::domain::model::FilmRef;
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

const CONTAINER_ID: &str = "mainBodyWrapper";

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#mainBodyWrapper").expect("container selector"));
static ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("item selector"));
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*\((\d{4})\)").expect("entry regex"));

/// Parses every ranked film on the page, in page order.
///
/// Only `<li>` elements inside the container count. An item whose text
/// does not start with `Title (Year)` is a [`EtlError::ParseError`] naming
/// the item text.
pub fn parse_ranking(html: &str) -> Result<Vec<FilmRef>> {
    let document = Html::parse_document(html);
    let container = document
        .select(&CONTAINER_SELECTOR)
        .next()
        .ok_or_else(|| EtlError::parse(CONTAINER_ID, "ranking container not found on page"))?;

    let mut films = Vec::new();
    for item in container.select(&ITEM_SELECTOR) {
        let text = compact_ws(&item.text().collect::<String>());
        if text.is_empty() {
            continue;
        }
        films.push(parse_entry(&text)?);
    }

    if films.is_empty() {
        tracing::warn!("Ranking page contained no film entries");
    }
    Ok(films)
}

/// Parses one `Title (Year) ...` fragment.
pub fn parse_entry(text: &str) -> Result<FilmRef> {
    let caps = ENTRY_RE
        .captures(text)
        .ok_or_else(|| EtlError::parse(text, "expected 'Title (Year)'"))?;

    let title = caps[1].trim();
    if title.is_empty() {
        return Err(EtlError::parse(text, "empty film title"));
    }
    let year = caps[2]
        .parse::<i32>()
        .map_err(|e| EtlError::parse(text, format!("invalid year: {}", e)))?;

    Ok(FilmRef::new(title, year))
}

fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
