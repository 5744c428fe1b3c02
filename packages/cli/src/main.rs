#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the court booking occupancy probe.
//!
//! Loads each venue's booking grid, prints one occupancy line per venue to
//! stdout, and exits non-zero if any venue could not be checked. Logs and
//! the progress bar go to stderr, so stdout can be captured as-is by CI.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike as _, Local};
use clap::{Args, Parser, Subcommand};
use court_watch_cli::check::{CheckOptions, run_checks};
use court_watch_cli::output::{OutputFormat, render};
use court_watch_cli_utils::IndicatifProgress;
use court_watch_scraper::ProviderKind;
use court_watch_scraper::browser::{BrowserOptions, BrowserSnapshotProvider};
use court_watch_scraper::http::HttpSnapshotProvider;
use court_watch_venue::{all_venues, peak_rules, select_venues};

#[derive(Parser)]
#[command(
    name = "court_watch",
    about = "Court booking occupancy probe",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    check: CheckArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Check venue occupancy (the default)
    Check(CheckArgs),
    /// List registered venues
    Venues,
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
struct CheckArgs {
    /// Venue key to check (repeatable; defaults to every venue)
    #[arg(short, long = "venue")]
    venues: Vec<String>,

    /// Snapshot provider: `browser` or `http`
    #[arg(long, default_value = "browser")]
    provider: ProviderKind,

    /// Output format: `line` or `json`
    #[arg(long, default_value = "line")]
    format: OutputFormat,

    /// Seconds to wait for the booking grid to render
    #[arg(long, default_value_t = 30)]
    grid_timeout_secs: u64,

    /// Overall seconds allowed per venue
    #[arg(long, default_value_t = 90)]
    venue_timeout_secs: u64,

    /// Directory for `debug-<venue>.png` screenshots
    #[arg(long, default_value = ".")]
    screenshot_dir: PathBuf,

    /// Do not save screenshots when the grid is missing
    #[arg(long)]
    no_screenshots: bool,

    /// Launch Chromium without its sandbox (CI containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Check(cli.check)) {
        Commands::Check(args) => check(args).await,
        Commands::Venues => {
            for venue in all_venues() {
                println!("{}\t{}", venue.key, venue.url);
            }
            Ok(())
        }
    }
}

async fn check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let multi = court_watch_cli_utils::init_logger(!args.no_progress);

    let venues = select_venues(&args.venues)?;
    let rules = peak_rules(&venues);
    let options = CheckOptions {
        weekday: Local::now().weekday(),
        venue_timeout: Duration::from_secs(args.venue_timeout_secs),
    };
    let grid_timeout = Duration::from_secs(args.grid_timeout_secs);
    options.ensure_outlasts(grid_timeout)?;

    let progress = IndicatifProgress::steps_bar(&multi, "Checking venues", venues.len() as u64);

    log::info!(
        "Checking {} venues ({} provider, peak rules for {:?})",
        venues.len(),
        args.provider,
        options.weekday
    );

    let checks = match args.provider {
        ProviderKind::Browser => {
            let provider = BrowserSnapshotProvider::launch(BrowserOptions {
                grid_timeout,
                screenshot_dir: (!args.no_screenshots).then_some(args.screenshot_dir),
                no_sandbox: args.no_sandbox,
                ..BrowserOptions::default()
            })
            .await?;

            let checks = run_checks(&provider, &venues, &rules, &options, &progress).await;

            if let Err(e) = provider.close().await {
                log::warn!("Failed to close browser: {e}");
            }
            checks
        }
        ProviderKind::Http => {
            let provider = HttpSnapshotProvider::new(grid_timeout)?;
            run_checks(&provider, &venues, &rules, &options, &progress).await
        }
    };

    for check in &checks {
        println!("{}", render(check, args.format)?);
    }

    let failed = checks.iter().filter(|check| !check.is_ok()).count();
    if failed > 0 {
        return Err(format!("{failed} of {} venues could not be checked", checks.len()).into());
    }

    Ok(())
}
