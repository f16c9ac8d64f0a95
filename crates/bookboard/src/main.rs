//! bookboard - Booking analytics reports from the command line

mod cli;

use anyhow::{Context, Result};
use bookboard_core::analytics::RangeToken;
use bookboard_core::{AnalyticsConfig, BookingReport, BookingSnapshot, CoreError};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "bookboard",
    version,
    about = "Booking analytics reports from the command line",
    long_about = "Computes the reporting pages of a booking dashboard from a JSON snapshot\n\
                  of bookings and clients: status rates, revenue, growth against the previous\n\
                  period, monthly trends, busy hours, leaderboards and insight cards.\n\
                  \n\
                  Examples:\n\
                    bookboard report snapshot.json               # Last 30 days\n\
                    bookboard report snapshot.json --range 12m   # Last 12 months\n\
                    bookboard trend snapshot.json --json         # Monthly series as JSON\n\
                    bookboard insights snapshot.json --range 7d  # Insight cards only\n\
                  \n\
                  Environment Variables:\n\
                    BOOKBOARD_CONFIG                 # Config file (default: <config dir>/bookboard/config.toml)\n\
                    BOOKBOARD_NOW                    # Reference time, RFC 3339\n\
                    BOOKBOARD_NO_COLOR               # Disable ANSI colors (log-friendly)\n\
                    RUST_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// Path to config file
    #[arg(long, global = true, env = "BOOKBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Reference time for the report (RFC 3339, default: now)
    #[arg(long, global = true, env = "BOOKBOARD_NOW")]
    now: Option<String>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, global = true, env = "BOOKBOARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Print the full report for a range
    Report {
        /// Snapshot JSON file
        snapshot: PathBuf,
        /// Range: 7d, 30d, 90d, 12m
        #[arg(long, short = 'r')]
        range: Option<String>,
        /// Leaderboard size
        #[arg(long, short = 'n')]
        top: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print monthly bookings, revenue and new clients
    Trend {
        /// Snapshot JSON file
        snapshot: PathBuf,
        /// Number of months
        #[arg(long, short = 'm')]
        months: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print insight cards for a range
    Insights {
        /// Snapshot JSON file
        snapshot: PathBuf,
        /// Range: 7d, 30d, 90d, 12m
        #[arg(long, short = 'r')]
        range: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        if let Some(hint) = e.downcast_ref::<CoreError>().and_then(CoreError::suggestion) {
            eprintln!("  hint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    let now = cli::parse_now(cli.now.as_deref())?;
    let no_color = cli.no_color;

    match cli.mode {
        Mode::Report {
            snapshot,
            range,
            top,
            json,
        } => {
            if let Some(top) = top {
                config.top_n = top;
                config.leaderboard_top_n = top;
                config.validate()?;
            }
            let report = compute_report(&snapshot, range.as_deref(), now, &config)?;
            println!("{}", cli::format_report(&report, json, no_color));
        }
        Mode::Trend {
            snapshot,
            months,
            json,
        } => {
            if let Some(months) = months {
                config.months_back = months;
                config.validate()?;
            }
            let report = compute_report(&snapshot, None, now, &config)?;
            println!("{}", cli::format_trend(&report, json, no_color));
        }
        Mode::Insights {
            snapshot,
            range,
            json,
        } => {
            let report = compute_report(&snapshot, range.as_deref(), now, &config)?;
            println!("{}", cli::format_insights(&report.insights, json, no_color));
        }
    }

    Ok(())
}

/// Explicit path, else the per-user config file, else defaults
fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match dirs::config_dir() {
            Some(dir) => dir.join("bookboard").join("config.toml"),
            None => {
                tracing::debug!("No config directory, using defaults");
                return Ok(AnalyticsConfig::default());
            }
        },
    };

    AnalyticsConfig::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

fn compute_report(
    snapshot_path: &Path,
    range: Option<&str>,
    now: chrono::DateTime<chrono::Utc>,
    config: &AnalyticsConfig,
) -> Result<BookingReport> {
    let snapshot = BookingSnapshot::from_path(snapshot_path)?;
    if snapshot.is_empty() {
        tracing::warn!("Snapshot {} has no records", snapshot_path.display());
    }

    let range = match range {
        Some(token) => RangeToken::parse(token)?,
        None => config.default_range,
    };
    Ok(BookingReport::compute(&snapshot, range, now, config))
}
