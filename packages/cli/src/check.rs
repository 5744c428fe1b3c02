//! Sequential venue check runner.
//!
//! Takes one snapshot per venue, in order, and aggregates it once the full
//! slot list is available. A failed or timed-out snapshot is recorded as
//! that venue's error; the remaining venues are still checked.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc, Weekday};
use court_watch_cli_utils::ProgressCallback;
use court_watch_occupancy::PeakRuleTable;
use court_watch_occupancy_models::OccupancyReport;
use court_watch_scraper::SnapshotProvider;
use court_watch_venue_models::VenueDefinition;

/// Settings shared by every venue in a run.
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions {
    /// Day the peak rules are evaluated against.
    pub weekday: Weekday,
    /// Upper bound on one venue's snapshot, including browser navigation.
    pub venue_timeout: Duration,
}

impl CheckOptions {
    /// Ensures a venue's snapshot gets to finish its own grid wait.
    ///
    /// When the venue timeout fires first, the snapshot is cancelled before
    /// the provider can report [`court_watch_scraper::ScrapeError::GridTimeout`]
    /// or write its debug screenshot.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::VenueTimeoutTooShort`] if `venue_timeout` is not
    /// longer than `grid_timeout`.
    pub fn ensure_outlasts(&self, grid_timeout: Duration) -> Result<(), CheckError> {
        if self.venue_timeout <= grid_timeout {
            return Err(CheckError::VenueTimeoutTooShort {
                venue_timeout: self.venue_timeout,
                grid_timeout,
            });
        }
        Ok(())
    }
}

/// Errors raised before any venue is checked.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The per-venue timeout would cut the grid wait short.
    #[error(
        "Venue timeout ({}s) must be longer than the grid timeout ({}s)",
        venue_timeout.as_secs(),
        grid_timeout.as_secs()
    )]
    VenueTimeoutTooShort {
        /// Overall per-venue bound.
        venue_timeout: Duration,
        /// Grid selector wait inside the provider.
        grid_timeout: Duration,
    },
}

/// The result of checking one venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueCheck {
    /// Venue key.
    pub venue: String,
    /// When the snapshot finished (or failed).
    pub checked_at: DateTime<Utc>,
    /// The report, or a description of why no snapshot was available.
    pub outcome: Result<OccupancyReport, String>,
}

impl VenueCheck {
    /// Whether a report was produced.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Checks every venue in order and returns one [`VenueCheck`] per venue.
pub async fn run_checks(
    provider: &(impl SnapshotProvider + ?Sized),
    venues: &[VenueDefinition],
    rules: &PeakRuleTable,
    options: &CheckOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Vec<VenueCheck> {
    progress.set_total(venues.len() as u64);
    log::debug!(
        "Checking {} venues with the {} provider",
        venues.len(),
        provider.name()
    );

    let mut checks = Vec::with_capacity(venues.len());

    for venue in venues {
        progress.set_message(venue.key.clone());

        let outcome =
            match tokio::time::timeout(options.venue_timeout, provider.snapshot(venue)).await {
                Ok(Ok(slots)) => {
                    let report = rules.aggregate(&venue.key, &slots, options.weekday);
                    log::info!(
                        "[{}] {} busy / {} slots",
                        venue.key,
                        report.overall.busy,
                        report.overall.total
                    );
                    Ok(report)
                }
                Ok(Err(e)) => {
                    log::error!("[{}] Snapshot failed: {e}", venue.key);
                    Err(e.to_string())
                }
                Err(_) => {
                    log::error!(
                        "[{}] Snapshot timed out after {:?}",
                        venue.key,
                        options.venue_timeout
                    );
                    Err(format!("timed out after {:?}", options.venue_timeout))
                }
            };

        checks.push(VenueCheck {
            venue: venue.key.clone(),
            checked_at: Utc::now(),
            outcome,
        });
        progress.inc(1);
    }

    progress.finish_and_clear();
    checks
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use court_watch_cli_utils::null_progress;
    use court_watch_occupancy_models::Slot;
    use court_watch_scraper::ScrapeError;
    use court_watch_venue::{peak_rules, select_venues};

    use super::*;

    /// Serves canned snapshots keyed by venue; venues without an entry hang.
    struct FakeProvider {
        snapshots: BTreeMap<String, Vec<Slot>>,
        broken: Vec<String>,
    }

    impl SnapshotProvider for FakeProvider {
        async fn snapshot(&self, venue: &VenueDefinition) -> Result<Vec<Slot>, ScrapeError> {
            if self.broken.contains(&venue.key) {
                return Err(ScrapeError::GridNotFound(venue.selectors.grid.clone()));
            }
            match self.snapshots.get(&venue.key) {
                Some(slots) => Ok(slots.clone()),
                None => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(Vec::new())
                }
            }
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    fn options() -> CheckOptions {
        CheckOptions {
            weekday: Weekday::Tue,
            venue_timeout: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn reports_every_venue_in_order() {
        let venues = select_venues(&[]).unwrap();
        let rules = peak_rules(&venues);
        let provider = FakeProvider {
            snapshots: BTreeMap::from([
                (
                    "PadelLK".to_owned(),
                    vec![Slot::busy().at("18:00"), Slot::free().at("09:00")],
                ),
                ("ProjectPadel".to_owned(), vec![Slot::busy(), Slot::busy()]),
            ]),
            broken: Vec::new(),
        };

        let checks = run_checks(&provider, &venues, &rules, &options(), &null_progress()).await;

        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].venue, "PadelLK");
        assert_eq!(checks[1].venue, "ProjectPadel");

        let padel_lk = checks[0].outcome.as_ref().unwrap();
        assert_eq!(padel_lk.overall.total, 2);
        assert_eq!(padel_lk.peak.unwrap().busy, 1);
        assert_eq!(padel_lk.off_peak.unwrap().free, 1);

        let project = checks[1].outcome.as_ref().unwrap();
        assert_eq!(project.overall.occupied_pct.to_string(), "100.0");
        assert!(project.peak.is_none());
    }

    #[tokio::test]
    async fn failed_snapshot_does_not_stop_other_venues() {
        let venues = select_venues(&[]).unwrap();
        let rules = peak_rules(&venues);
        let provider = FakeProvider {
            snapshots: BTreeMap::from([("ProjectPadel".to_owned(), vec![Slot::free()])]),
            broken: vec!["PadelLK".to_owned()],
        };

        let checks = run_checks(&provider, &venues, &rules, &options(), &null_progress()).await;

        assert!(!checks[0].is_ok());
        assert_eq!(
            checks[0].outcome.as_ref().unwrap_err(),
            "No element matching 'svg#tablaReserva' found in page"
        );
        assert!(checks[1].is_ok());
    }

    #[tokio::test]
    async fn slow_snapshot_times_out() {
        let venues = select_venues(&["ProjectPadel".to_owned()]).unwrap();
        let rules = peak_rules(&venues);
        let provider = FakeProvider {
            snapshots: BTreeMap::new(),
            broken: Vec::new(),
        };

        let checks = run_checks(&provider, &venues, &rules, &options(), &null_progress()).await;

        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].outcome.as_ref().unwrap_err(), "timed out after 50ms");
    }

    #[test]
    fn venue_timeout_must_outlast_grid_timeout() {
        let options = CheckOptions {
            weekday: Weekday::Tue,
            venue_timeout: Duration::from_secs(10),
        };

        let err = options.ensure_outlasts(Duration::from_secs(30)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Venue timeout (10s) must be longer than the grid timeout (30s)"
        );
        assert!(options.ensure_outlasts(Duration::from_secs(10)).is_err());
        assert!(options.ensure_outlasts(Duration::from_secs(9)).is_ok());
    }

    #[test]
    fn default_timeouts_are_accepted() {
        let options = CheckOptions {
            weekday: Weekday::Sat,
            venue_timeout: Duration::from_secs(90),
        };
        assert!(options.ensure_outlasts(Duration::from_secs(30)).is_ok());
    }

    #[tokio::test]
    async fn no_venues_yields_no_checks() {
        let provider = FakeProvider {
            snapshots: BTreeMap::new(),
            broken: Vec::new(),
        };
        let checks = run_checks(
            &provider,
            &[],
            &PeakRuleTable::new(),
            &options(),
            &null_progress(),
        )
        .await;
        assert!(checks.is_empty());
    }
}
