//! Per-venue peak rule lookup.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::Weekday;
use court_watch_occupancy_models::{OccupancyReport, PeakHours, Slot};

use crate::aggregate;

fn never_peak(_hour: u8, _weekday: Weekday) -> bool {
    false
}

/// Used for venues without a registered rule: every slot is off-peak.
static OFF_PEAK_ONLY: fn(u8, Weekday) -> bool = never_peak;

/// Maps venue keys to their [`PeakHours`] rule.
#[derive(Clone, Default)]
pub struct PeakRuleTable {
    rules: BTreeMap<String, Arc<dyn PeakHours>>,
}

impl PeakRuleTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the rule for `venue`.
    pub fn insert(&mut self, venue: &str, rule: Arc<dyn PeakHours>) {
        self.rules.insert(venue.to_owned(), rule);
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with_rule(mut self, venue: &str, rule: impl PeakHours + 'static) -> Self {
        self.insert(venue, Arc::new(rule));
        self
    }

    /// Whether a rule is registered for `venue`.
    #[must_use]
    pub fn contains(&self, venue: &str) -> bool {
        self.rules.contains_key(venue)
    }

    /// Returns the rule for `venue`, or an all-off-peak rule when none is
    /// registered.
    #[must_use]
    pub fn get(&self, venue: &str) -> &dyn PeakHours {
        match self.rules.get(venue) {
            Some(rule) => rule.as_ref(),
            None => &OFF_PEAK_ONLY,
        }
    }

    /// Aggregates `slots` using the rule registered for `venue`.
    #[must_use]
    pub fn aggregate(&self, venue: &str, slots: &[Slot], weekday: Weekday) -> OccupancyReport {
        if !self.contains(venue) {
            log::debug!("[{venue}] no peak rule registered, treating every slot as off-peak");
        }
        aggregate(venue, slots, self.get(venue), weekday)
    }
}

impl fmt::Debug for PeakRuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeakRuleTable")
            .field("venues", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}
