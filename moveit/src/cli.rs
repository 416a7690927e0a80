//! Command-line surfaces of the `flow` and `moveit` binaries.
//!
//! Argument types live in the library so both binaries and their tests share
//! one parser definition.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::{validate_threshold, LaneStrategy};

/// Render one timeline chart per bucket of a rebalance event log.
#[derive(Parser, Debug)]
#[command(name = "flow", version)]
pub struct FlowArgs {
    /// Newline-delimited JSON event log
    pub log: PathBuf,

    /// Directory the charts are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Configuration file (defaults to moveit.toml or config/moveit.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lane layout: round-robin or first-fit
    #[arg(long, value_parser = parse_lane_strategy)]
    pub lanes: Option<LaneStrategy>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Print movement durations and phase hotspots per bucket.
#[derive(Parser, Debug)]
#[command(name = "moveit", version)]
pub struct ReportArgs {
    /// Newline-delimited JSON event log
    pub log: PathBuf,

    /// Hotspot threshold, in percent of the partition's move time
    #[arg(value_parser = parse_threshold)]
    pub threshold: Option<f64>,

    /// Configuration file (defaults to moveit.toml or config/moveit.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    validate_threshold(value)
}

fn parse_lane_strategy(raw: &str) -> Result<LaneStrategy, String> {
    raw.parse()
}

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with
/// `verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_lowercase()));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
