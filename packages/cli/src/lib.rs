#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Court booking occupancy probe.
//!
//! [`check::run_checks`] snapshots each venue in turn and aggregates the
//! result; [`output`] renders the reports. The `court_watch` binary wires
//! these to a snapshot provider chosen on the command line.

pub mod check;
pub mod output;
