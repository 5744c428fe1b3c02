#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Occupancy classification and aggregation.
//!
//! [`aggregate`] folds a venue's snapshot into an [`OccupancyReport`]. It is
//! a pure function: it never fails, never blocks, and returns the same
//! report for the same inputs. Slots whose time label cannot be read are
//! still counted overall but left out of the peak/off-peak split.
//!
//! Which hours count as peak is decided by a [`PeakHours`] rule looked up
//! per venue in a [`PeakRuleTable`], so adding a venue or changing its
//! policy never touches the aggregation itself.

pub mod rules;
pub mod time_label;

use chrono::Weekday;
use court_watch_occupancy_models::{OccupancyReport, PeakHours, Slot, SlotCounts};

pub use rules::PeakRuleTable;
pub use time_label::parse_hour;

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    free: u64,
    busy: u64,
}

impl Tally {
    const fn add(&mut self, busy: bool) {
        if busy {
            self.busy += 1;
        } else {
            self.free += 1;
        }
    }

    const fn counts(self) -> SlotCounts {
        SlotCounts::new(self.free, self.busy)
    }
}

/// Computes occupancy statistics for one venue's snapshot.
///
/// `weekday` is the day the peak rule is evaluated against, normally the
/// day the snapshot was taken.
#[must_use]
pub fn aggregate(
    venue: &str,
    slots: &[Slot],
    peak_rule: &(impl PeakHours + ?Sized),
    weekday: Weekday,
) -> OccupancyReport {
    let mut overall = Tally::default();
    let mut peak = Tally::default();
    let mut off_peak = Tally::default();
    let mut categorized = false;
    let mut uncategorized = 0;

    for slot in slots {
        overall.add(slot.busy);

        match slot.time.as_deref().and_then(parse_hour) {
            Some(hour) => {
                categorized = true;
                if peak_rule.is_peak(hour, weekday) {
                    peak.add(slot.busy);
                } else {
                    off_peak.add(slot.busy);
                }
            }
            None => uncategorized += 1,
        }
    }

    log::trace!(
        "[{venue}] {} slots, {uncategorized} without a usable time label",
        slots.len()
    );

    OccupancyReport {
        venue: venue.to_owned(),
        weekday,
        overall: overall.counts(),
        peak: categorized.then(|| peak.counts()),
        off_peak: categorized.then(|| off_peak.counts()),
        uncategorized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekday_evenings(hour: u8, day: Weekday) -> bool {
        !matches!(day, Weekday::Sat | Weekday::Sun) && (16..22).contains(&hour)
    }

    #[test]
    fn splits_labelled_slots_into_peak_and_off_peak() {
        let slots = [Slot::busy().at("18:00"), Slot::free().at("09:00")];
        let report = aggregate("PadelLK", &slots, &weekday_evenings, Weekday::Tue);

        assert_eq!(report.overall.free, 1);
        assert_eq!(report.overall.busy, 1);
        assert_eq!(report.overall.total, 2);

        let peak = report.peak.unwrap();
        assert_eq!(peak.busy, 1);
        assert_eq!(peak.total, 1);

        let off_peak = report.off_peak.unwrap();
        assert_eq!(off_peak.busy, 0);
        assert_eq!(off_peak.total, 1);
        assert_eq!(report.uncategorized, 0);
    }

    #[test]
    fn unlabelled_slots_only_count_overall() {
        let slots = [
            Slot::busy().at(""),
            Slot::free(),
            Slot::busy().at("not a time"),
            Slot::free().at("17:00"),
        ];
        let report = aggregate("PadelLK", &slots, &weekday_evenings, Weekday::Wed);

        assert_eq!(report.overall.total, 4);
        assert_eq!(report.overall.busy, 2);
        assert_eq!(report.overall.free, 2);
        assert_eq!(report.uncategorized, 3);

        let peak = report.peak.unwrap();
        let off_peak = report.off_peak.unwrap();
        assert_eq!(peak.total + off_peak.total, 1);
        assert_eq!(peak.free, 1);
    }

    #[test]
    fn no_split_without_any_time_labels() {
        let slots = [Slot::busy(), Slot::free(), Slot::busy()];
        let report = aggregate("ProjectPadel", &slots, &weekday_evenings, Weekday::Mon);

        assert!(report.peak.is_none());
        assert!(report.off_peak.is_none());
        assert!(!report.has_peak_split());
        assert_eq!(report.overall.occupied_pct.to_string(), "66.7");
    }

    #[test]
    fn empty_snapshot_reports_zero_percent() {
        let report = aggregate("PadelLK", &[], &weekday_evenings, Weekday::Fri);

        assert_eq!(report.overall.total, 0);
        assert_eq!(report.overall.occupied_pct.to_string(), "0.0");
        assert!(report.peak.is_none());
    }

    #[test]
    fn empty_peak_bucket_reports_zero_percent() {
        let slots = [Slot::busy().at("08:00"), Slot::busy().at("10:00")];
        let report = aggregate("PadelLK", &slots, &weekday_evenings, Weekday::Thu);

        let peak = report.peak.unwrap();
        assert_eq!(peak.total, 0);
        assert_eq!(peak.occupied_pct.to_string(), "0.0");
        assert_eq!(report.off_peak.unwrap().occupied_pct.to_string(), "100.0");
    }

    #[test]
    fn rounds_occupancy_to_one_decimal() {
        let mut slots = vec![Slot::busy(); 26];
        slots.extend([Slot::free(), Slot::free()]);
        let report = aggregate("PadelLK", &slots, &weekday_evenings, Weekday::Tue);

        assert_eq!(report.overall.total, 28);
        assert_eq!(report.overall.occupied_pct.to_string(), "92.9");
    }

    #[test]
    fn weekday_changes_classification() {
        let slots = [Slot::busy().at("10:00")];
        let weekend_all_day =
            |hour: u8, day: Weekday| matches!(day, Weekday::Sat | Weekday::Sun) || hour >= 16;

        let saturday = aggregate("PadelLK", &slots, &weekend_all_day, Weekday::Sat);
        assert_eq!(saturday.peak.unwrap().busy, 1);

        let monday = aggregate("PadelLK", &slots, &weekend_all_day, Weekday::Mon);
        assert_eq!(monday.off_peak.unwrap().busy, 1);
    }

    #[test]
    fn totals_stay_consistent_for_mixed_snapshots() {
        let labels = ["06:00", "12:30", "16:00", "21:59", "22:00", "23:00"];
        for n in 0..3 {
            let slots: Vec<Slot> = labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let slot = if (i + n) % 3 == 0 {
                        Slot::busy()
                    } else {
                        Slot::free()
                    };
                    slot.at(label)
                })
                .collect();
            let report = aggregate("PadelLK", &slots, &weekday_evenings, Weekday::Tue);

            assert_eq!(
                report.overall.free + report.overall.busy,
                report.overall.total
            );
            assert_eq!(
                report.peak.unwrap().total + report.off_peak.unwrap().total,
                report.overall.total
            );
        }
    }

    #[test]
    fn aggregation_is_repeatable() {
        let slots = [
            Slot::busy().at("18:00"),
            Slot::free().at("09:00"),
            Slot::free(),
        ];
        let first = aggregate("PadelLK", &slots, &weekday_evenings, Weekday::Tue);
        let second = aggregate("PadelLK", &slots, &weekday_evenings, Weekday::Tue);
        assert_eq!(first, second);
    }
}
