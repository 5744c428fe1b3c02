//! Slot extraction from rendered booking grid HTML.
//!
//! Locates the grid element via its CSS selector, then walks its
//! descendants in document order and classifies every element matching
//! the busy or free selector as one [`Slot`].

use court_watch_occupancy_models::Slot;
use court_watch_venue_models::GridSelectors;
use scraper::{ElementRef, Html, Selector};

use crate::ScrapeError;

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidSelector`] if `selector` is malformed.
pub fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_owned(),
        message: e.to_string(),
    })
}

/// Extracts the slots of the first grid matching `selectors.grid`.
///
/// Matching elements outside that grid (a second calendar, a legend) are
/// not counted, so a page-wide count can be higher than this one.
///
/// An element matching both the busy and free selectors counts once, as
/// busy. Slots carry the value of `selectors.time_attribute` as their time
/// label when it is configured and present.
///
/// # Errors
///
/// Returns [`ScrapeError::GridNotFound`] if the document has no grid, or
/// [`ScrapeError::InvalidSelector`] if a selector is malformed.
pub fn extract_slots(html: &str, selectors: &GridSelectors) -> Result<Vec<Slot>, ScrapeError> {
    let grid_sel = parse_selector(&selectors.grid)?;
    let free_sel = parse_selector(&selectors.free)?;
    let busy_sel = parse_selector(&selectors.busy)?;

    let document = Html::parse_document(html);
    let grid = document
        .select(&grid_sel)
        .next()
        .ok_or_else(|| ScrapeError::GridNotFound(selectors.grid.clone()))?;

    let time_label = |element: &ElementRef<'_>| {
        selectors
            .time_attribute
            .as_deref()
            .and_then(|attr| element.value().attr(attr))
            .map(str::to_owned)
    };

    let slots = grid
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|element| {
            let busy = if busy_sel.matches(&element) {
                true
            } else if free_sel.matches(&element) {
                false
            } else {
                return None;
            };
            Some(Slot {
                busy,
                time: time_label(&element),
            })
        })
        .collect();

    Ok(slots)
}
