#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Monitored venue registry.
//!
//! Venues are defined as TOML files embedded at compile time (see
//! [`registry`]). This crate also builds the per-venue [`PeakRuleTable`]
//! the aggregator consults.

pub mod registry;

use std::sync::Arc;

use court_watch_occupancy::PeakRuleTable;
use court_watch_venue_models::VenueDefinition;
use thiserror::Error;

pub use registry::{all_venues, find_venue, select_venues};

/// Errors that can occur while resolving venues.
#[derive(Debug, Error)]
pub enum VenueError {
    /// No registered venue matches the requested key.
    #[error("Unknown venue '{key}' (known: {known})")]
    UnknownVenue {
        /// The key that was requested.
        key: String,
        /// Comma-separated list of registered keys.
        known: String,
    },
}

/// Builds a [`PeakRuleTable`] holding each venue's configured schedule.
#[must_use]
pub fn peak_rules(venues: &[VenueDefinition]) -> PeakRuleTable {
    let mut table = PeakRuleTable::new();
    for venue in venues {
        table.insert(&venue.key, Arc::new(venue.peak.clone()));
    }
    table
}
