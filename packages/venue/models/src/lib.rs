#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Venue definition types.
//!
//! Defines the TOML schema for a monitored venue: where its booking grid
//! lives, how a snapshot provider recognises free and busy slots on it, and
//! which hours count as peak time.

use chrono::Weekday;
use court_watch_occupancy_models::PeakHours;
use serde::{Deserialize, Serialize};

/// A monitored court booking venue, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDefinition {
    /// Unique venue key used in output lines (e.g., `"PadelLK"`).
    pub key: String,
    /// Human-readable name.
    pub name: String,
    /// Booking grid page URL.
    pub url: String,
    /// How to find slots on the rendered page.
    pub selectors: GridSelectors,
    /// Which hours count as peak time.
    #[serde(default)]
    pub peak: PeakSchedule,
}

/// CSS selectors locating the booking grid and its slots.
///
/// Only snapshot providers read these; the aggregator never sees markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSelectors {
    /// The element that appears once the grid has rendered.
    pub grid: String,
    /// Free slots inside the grid.
    pub free: String,
    /// Booked slots inside the grid.
    pub busy: String,
    /// Attribute on a slot element carrying its time label, if the page
    /// exposes one.
    #[serde(default)]
    pub time_attribute: Option<String>,
}

/// A half-open range of hours, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    /// First peak hour (0–23).
    pub start: u8,
    /// First hour after the range (1–24).
    pub end: u8,
}

impl HourRange {
    /// Whether `hour` falls inside the range.
    #[must_use]
    pub const fn contains(&self, hour: u8) -> bool {
        hour >= self.start && hour < self.end
    }

    /// Whether the range is non-empty and within a single day.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.start < self.end && self.end <= 24
    }
}

/// Data-driven peak hours policy.
///
/// Saturdays and Sundays are peak all day when `weekend_all_day` is set.
/// Otherwise an hour is peak when it falls inside any of the `weekday`
/// ranges. The default schedule has no peak hours at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakSchedule {
    /// Treat the whole weekend as peak.
    #[serde(default)]
    pub weekend_all_day: bool,
    /// Peak ranges that apply Monday to Friday (and on weekends when
    /// `weekend_all_day` is off).
    #[serde(default)]
    pub weekday: Vec<HourRange>,
}

impl PeakHours for PeakSchedule {
    fn is_peak(&self, hour: u8, weekday: Weekday) -> bool {
        if self.weekend_all_day && matches!(weekday, Weekday::Sat | Weekday::Sun) {
            return true;
        }
        self.weekday.iter().any(|range| range.contains(hour))
    }
}
