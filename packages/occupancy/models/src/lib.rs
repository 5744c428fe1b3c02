#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Slot and occupancy report types.
//!
//! A snapshot provider yields [`Slot`] records for a venue; the aggregator
//! in `court_watch_occupancy` folds them into an [`OccupancyReport`]. The
//! report is a plain structured record so that any output formatter can
//! render it without recomputing anything.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize, Serializer};

/// One bookable cell in a venue's reservation grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Whether the slot is already booked.
    pub busy: bool,
    /// Raw time label as it appears on the page (e.g. `"18:00"`). `None`
    /// when the page does not expose one for this slot.
    pub time: Option<String>,
}

impl Slot {
    /// A free slot with no time label.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            busy: false,
            time: None,
        }
    }

    /// A busy slot with no time label.
    #[must_use]
    pub const fn busy() -> Self {
        Self {
            busy: true,
            time: None,
        }
    }

    /// Attaches a time label to this slot.
    #[must_use]
    pub fn at(mut self, time: &str) -> Self {
        self.time = Some(time.to_owned());
        self
    }
}

/// A percentage with one decimal place, stored as integer tenths.
///
/// Computed with half-up rounding so the same counts always render the same
/// string. Displays and serializes as e.g. `"92.9"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent {
    tenths: u64,
}

impl Percent {
    /// Percentage of `part` in `whole`, or `0.0` when `whole` is zero.
    #[must_use]
    #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
    pub const fn of(part: u64, whole: u64) -> Self {
        if whole == 0 {
            return Self { tenths: 0 };
        }
        let tenths = (part as u128 * 1000 + whole as u128 / 2) / whole as u128;
        Self {
            tenths: if tenths > u64::MAX as u128 {
                u64::MAX
            } else {
                tenths as u64
            },
        }
    }

    /// The value in tenths of a percent (`929` for `92.9%`).
    #[must_use]
    pub const fn tenths(self) -> u64 {
        self.tenths
    }

    /// The value as a float, for consumers that want a number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        self.tenths as f64 / 10.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Free/busy tallies for one bucket of slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCounts {
    /// Slots still available.
    pub free: u64,
    /// Slots already booked.
    pub busy: u64,
    /// `free + busy`.
    pub total: u64,
    /// `busy / total`, `0.0` for an empty bucket.
    pub occupied_pct: Percent,
}

impl SlotCounts {
    /// Builds a bucket from its free and busy tallies.
    #[must_use]
    pub const fn new(free: u64, busy: u64) -> Self {
        let total = free + busy;
        Self {
            free,
            busy,
            total,
            occupied_pct: Percent::of(busy, total),
        }
    }
}

/// Occupancy statistics for one venue at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyReport {
    /// Venue key (e.g. `"PadelLK"`).
    pub venue: String,
    /// Day of week the peak rule was evaluated against.
    pub weekday: Weekday,
    /// Every slot in the snapshot.
    pub overall: SlotCounts,
    /// Slots whose hour falls in the venue's peak hours. `None` when no slot
    /// carried a usable time label.
    pub peak: Option<SlotCounts>,
    /// Slots outside peak hours. `None` when no slot carried a usable time
    /// label.
    pub off_peak: Option<SlotCounts>,
    /// Slots counted in `overall` but in neither peak bucket because their
    /// time label was missing or unparseable.
    pub uncategorized: u64,
}

impl OccupancyReport {
    /// Whether the peak/off-peak split is available.
    #[must_use]
    pub const fn has_peak_split(&self) -> bool {
        self.peak.is_some() && self.off_peak.is_some()
    }
}

/// Decides whether an hour of a given day is peak time for a venue.
///
/// Implemented by data-driven schedules and by any plain closure, so a
/// venue's rule can be swapped without touching the aggregation.
pub trait PeakHours: Send + Sync {
    /// Returns `true` when `hour` (0–23) on `weekday` is peak time.
    fn is_peak(&self, hour: u8, weekday: Weekday) -> bool;
}

impl<F> PeakHours for F
where
    F: Fn(u8, Weekday) -> bool + Send + Sync,
{
    fn is_peak(&self, hour: u8, weekday: Weekday) -> bool {
        self(hour, weekday)
    }
}
