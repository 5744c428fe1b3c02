//! Time label parsing.
//!
//! Booking grids label their slots in a handful of ways (`18:00`,
//! `18:00 - 19:00`, `6:00 PM`, `6pm`, plain `18`). Only the starting hour
//! matters for peak classification.

use chrono::{NaiveTime, Timelike};

/// Extracts the starting hour (0–23) from a slot's time label.
///
/// Returns `None` for empty, malformed, or out-of-range labels. Ranges such
/// as `"18:00-19:00"` resolve to their start.
#[must_use]
pub fn parse_hour(label: &str) -> Option<u8> {
    let start = label.split(['-', '–', '—']).next()?.trim();
    if start.is_empty() {
        return None;
    }

    for format in ["%H:%M", "%H:%M:%S", "%H.%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(start, format) {
            return u8::try_from(time.hour()).ok();
        }
    }

    if let Some(hour) = parse_meridiem(start) {
        return Some(hour);
    }

    start.parse::<u8>().ok().filter(|hour| *hour < 24)
}

/// Parses 12-hour labels like `"6:30 PM"` or `"6am"`.
fn parse_meridiem(label: &str) -> Option<u8> {
    let upper = label.to_ascii_uppercase();
    let (clock, pm) = if let Some(rest) = upper.strip_suffix("PM") {
        (rest, true)
    } else if let Some(rest) = upper.strip_suffix("AM") {
        (rest, false)
    } else {
        return None;
    };

    let mut parts = clock.trim().splitn(2, ':');
    let hour = parts.next()?.parse::<u8>().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    if let Some(minutes) = parts.next() {
        let minutes = minutes.parse::<u8>().ok()?;
        if minutes >= 60 {
            return None;
        }
    }

    Some(match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (hour, false) => hour,
        (hour, true) => hour + 12,
    })
}
