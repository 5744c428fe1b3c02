#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Booking grid snapshot providers.
//!
//! Provides the [`SnapshotProvider`] trait and two implementations: a
//! headless Chromium provider ([`browser`]) for grids rendered client-side,
//! and a plain HTTP provider ([`http`]) for server-rendered grids. Both hand
//! the final HTML to [`extract::extract_slots`], which turns the venue's
//! selectors into a list of [`Slot`] records.
//!
//! This crate knows about markup and nothing about occupancy statistics.
//! Failures are returned to the caller as [`ScrapeError`] and are never
//! retried here.

pub mod browser;
pub mod extract;
pub mod http;

use std::time::Duration;

use court_watch_occupancy_models::Slot;
use court_watch_venue_models::VenueDefinition;
use strum_macros::{AsRefStr, Display, EnumString};

pub use extract::extract_slots;

/// Errors that can occur while taking a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The headless browser reported an error.
    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// The headless browser could not be configured.
    #[error("Browser configuration error: {0}")]
    BrowserConfig(String),

    /// The grid never appeared on the page.
    #[error("Grid '{selector}' did not appear within {}s", timeout.as_secs())]
    GridTimeout {
        /// Selector that was waited for.
        selector: String,
        /// How long we waited.
        timeout: Duration,
    },

    /// The page was loaded but contains no grid.
    #[error("No element matching '{0}' found in page")]
    GridNotFound(String),

    /// A configured CSS selector is malformed.
    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector {
        /// The offending selector.
        selector: String,
        /// Parser message.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which snapshot provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ProviderKind {
    /// Headless Chromium; waits for client-side rendering.
    Browser,
    /// Plain HTTP GET; no JavaScript.
    Http,
}

/// Produces the current slot list for a venue.
///
/// Implementations own everything about reaching the page and reading its
/// markup. They return the slots in page order once the grid is available.
pub trait SnapshotProvider: Send + Sync {
    /// Takes one snapshot of `venue`'s booking grid.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if the page cannot be loaded, the grid does
    /// not appear, or its markup cannot be read.
    fn snapshot(
        &self,
        venue: &VenueDefinition,
    ) -> impl std::future::Future<Output = Result<Vec<Slot>, ScrapeError>> + Send;

    /// Returns the name of the provider (e.g. `"browser"`, `"http"`).
    fn name(&self) -> &str;
}
