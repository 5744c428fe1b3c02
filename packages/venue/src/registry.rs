//! Compile-time registry of monitored venues.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a venue requires creating a TOML file in `venues/` and adding a
//! corresponding entry here.

use court_watch_venue_models::VenueDefinition;

use crate::VenueError;

/// Number of registered venues. Enforced by a test.
#[cfg(test)]
const EXPECTED_VENUE_COUNT: usize = 2;

/// Embedded TOML venue definitions.
const VENUE_TOMLS: &[(&str, &str)] = &[
    ("padel_lk", include_str!("../venues/padel_lk.toml")),
    ("project_padel", include_str!("../venues/project_padel.toml")),
];

/// Returns all registered venues, in registration order.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_venues() -> Vec<VenueDefinition> {
    VENUE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse venue '{name}': {e}"))
        })
        .collect()
}

/// Looks up a venue by key, ignoring ASCII case.
#[must_use]
pub fn find_venue(key: &str) -> Option<VenueDefinition> {
    all_venues()
        .into_iter()
        .find(|venue| venue.key.eq_ignore_ascii_case(key))
}

/// Resolves the venues to check. An empty `keys` list selects every
/// registered venue.
///
/// # Errors
///
/// Returns [`VenueError::UnknownVenue`] for the first key that matches no
/// registered venue.
pub fn select_venues(keys: &[String]) -> Result<Vec<VenueDefinition>, VenueError> {
    if keys.is_empty() {
        return Ok(all_venues());
    }

    keys.iter()
        .map(|key| {
            find_venue(key).ok_or_else(|| VenueError::UnknownVenue {
                key: key.clone(),
                known: all_venues()
                    .iter()
                    .map(|venue| venue.key.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_venues() {
        let venues = all_venues();
        assert_eq!(
            venues.len(),
            EXPECTED_VENUE_COUNT,
            "Expected {EXPECTED_VENUE_COUNT} venues, found {}. \
             Update EXPECTED_VENUE_COUNT after adding/removing venues.",
            venues.len()
        );
    }

    #[test]
    fn venue_keys_are_unique() {
        let mut seen = BTreeSet::new();
        for venue in &all_venues() {
            assert!(
                seen.insert(venue.key.to_ascii_lowercase()),
                "Duplicate venue key: {}",
                venue.key
            );
        }
    }

    #[test]
    fn all_venues_have_required_fields() {
        for venue in &all_venues() {
            assert!(!venue.key.is_empty(), "Venue has empty key");
            assert!(!venue.name.is_empty(), "Venue {} has empty name", venue.key);
            assert!(
                venue.url.starts_with("https://"),
                "Venue {} has non-https url: {}",
                venue.key,
                venue.url
            );
            assert!(!venue.selectors.grid.is_empty(), "{}: empty grid selector", venue.key);
            assert!(!venue.selectors.free.is_empty(), "{}: empty free selector", venue.key);
            assert!(!venue.selectors.busy.is_empty(), "{}: empty busy selector", venue.key);
        }
    }

    #[test]
    fn peak_ranges_are_valid() {
        for venue in &all_venues() {
            for range in &venue.peak.weekday {
                assert!(
                    range.is_valid(),
                    "Venue {} has invalid peak range {range:?}",
                    venue.key
                );
            }
        }
    }

    #[test]
    fn finds_venue_ignoring_case() {
        let venue = find_venue("padellk").unwrap();
        assert_eq!(venue.key, "PadelLK");
        assert_eq!(venue.url, "https://www.padellk.ie/Booking/Grid.aspx");
        assert!(find_venue("nowhere").is_none());
    }

    #[test]
    fn selects_every_venue_by_default() {
        let venues = select_venues(&[]).unwrap();
        let keys: Vec<&str> = venues.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, ["PadelLK", "ProjectPadel"]);
    }

    #[test]
    fn selects_requested_venues_in_order() {
        let venues = select_venues(&["ProjectPadel".to_owned(), "PadelLK".to_owned()]).unwrap();
        let keys: Vec<&str> = venues.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, ["ProjectPadel", "PadelLK"]);
    }

    #[test]
    fn rejects_unknown_venue() {
        let err = select_venues(&["PadelLK".to_owned(), "Nowhere".to_owned()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown venue 'Nowhere' (known: PadelLK, ProjectPadel)"
        );
    }
}
