pub mod espn_game_page;
pub mod espn_schedule;

use crate::error::ParseError;
use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::Selector(css.to_string()))
}

/// Text nodes trimmed and joined with single spaces
pub(crate) fn cell_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves `href` against `base`; absolute hrefs pass through
pub fn absolute_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let base = reqwest::Url::parse(base).ok()?;
    base.join(href).ok().map(|url| url.to_string())
}
