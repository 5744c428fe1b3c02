//! Result formatting.
//!
//! Renders each [`VenueCheck`] as a single line of text, either human
//! readable (`line`) or one JSON object per line (`json`). Formatters only
//! read the structured report; nothing is recomputed here.

use chrono::{DateTime, Utc};
use court_watch_occupancy_models::{OccupancyReport, SlotCounts};
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::check::VenueCheck;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum OutputFormat {
    /// `PadelLK: 2 free, 26 busy / 28 slots → 92.9% occupied`
    Line,
    /// One JSON object per venue.
    Json,
}

/// Renders one venue's result in the requested format.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if JSON serialization fails.
pub fn render(check: &VenueCheck, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Line => Ok(render_line(check)),
        OutputFormat::Json => render_json(check),
    }
}

/// Renders a check as a single human-readable line.
#[must_use]
pub fn render_line(check: &VenueCheck) -> String {
    match &check.outcome {
        Ok(report) => format!("{}: {}", check.venue, describe(report)),
        Err(message) => format!("{}: ERROR ({message})", check.venue),
    }
}

fn describe(report: &OccupancyReport) -> String {
    let overall = &report.overall;
    let mut line = format!(
        "{} free, {} busy / {} slots → {}% occupied",
        overall.free, overall.busy, overall.total, overall.occupied_pct
    );

    if let (Some(peak), Some(off_peak)) = (&report.peak, &report.off_peak) {
        line.push_str(&format!(
            " | peak {} | off-peak {}",
            bucket(peak),
            bucket(off_peak)
        ));
    }

    line
}

fn bucket(counts: &SlotCounts) -> String {
    format!(
        "{}/{} busy ({}%)",
        counts.busy, counts.total, counts.occupied_pct
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonLine<'a> {
    venue: &'a str,
    checked_at: DateTime<Utc>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a OccupancyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Renders a check as a single-line JSON object.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if serialization fails.
pub fn render_json(check: &VenueCheck) -> Result<String, serde_json::Error> {
    let line = match &check.outcome {
        Ok(report) => JsonLine {
            venue: &check.venue,
            checked_at: check.checked_at,
            status: "ok",
            report: Some(report),
            error: None,
        },
        Err(message) => JsonLine {
            venue: &check.venue,
            checked_at: check.checked_at,
            status: "error",
            report: None,
            error: Some(message),
        },
    };
    serde_json::to_string(&line)
}
