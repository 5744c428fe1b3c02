//! Plain HTTP snapshot provider.
//!
//! Fetches the booking page with a single GET and extracts slots from the
//! HTML as served. Suitable only for grids rendered on the server; pages that
//! build their grid with JavaScript need the [`crate::browser`] provider.

use std::time::Duration;

use court_watch_occupancy_models::Slot;
use court_watch_venue_models::VenueDefinition;

use crate::{ScrapeError, SnapshotProvider, extract_slots};

const USER_AGENT: &str = concat!("court_watch/", env!("CARGO_PKG_VERSION"));

/// Snapshot provider that reads the grid from the raw HTTP response.
#[derive(Debug, Clone)]
pub struct HttpSnapshotProvider {
    client: reqwest::Client,
}

impl HttpSnapshotProvider {
    /// Creates a provider whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl SnapshotProvider for HttpSnapshotProvider {
    async fn snapshot(&self, venue: &VenueDefinition) -> Result<Vec<Slot>, ScrapeError> {
        log::info!("[{}] Fetching {}", venue.key, venue.url);

        let response = self
            .client
            .get(&venue.url)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let slots = extract_slots(&body, &venue.selectors)?;
        log::debug!("[{}] Extracted {} slots", venue.key, slots.len());
        Ok(slots)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
