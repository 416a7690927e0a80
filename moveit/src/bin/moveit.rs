//! Print movement durations and phase hotspots per bucket.
//!
//! # Usage
//!
//! ```bash
//! moveit rebalance.json        # threshold from config, 10% by default
//! moveit rebalance.json 25     # flag gaps above 25% of the move time
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: info, or debug with `-v`)

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use moveit::cli::{init_tracing, ReportArgs};
use moveit::parsing::read_event_log;
use moveit::services::{analyze_log, write_reports, BucketReport};
use moveit::MoveitConfig;

fn main() -> Result<()> {
    // An invalid threshold exits here, before the log is touched.
    let args = ReportArgs::parse();
    init_tracing(args.verbose);

    let config = MoveitConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    let threshold = args.threshold.unwrap_or(config.report.hotspot_threshold);

    let log = read_event_log(&args.log)
        .with_context(|| format!("Failed to read event log {}", args.log.display()))?;
    info!(buckets = log.len(), threshold, "loaded event log");

    let reports: Vec<BucketReport> = analyze_log(&log, config.analysis)
        .iter()
        .map(|analysis| {
            BucketReport::build(&analysis.bucket, &analysis.phase_timelines(), threshold)
        })
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_reports(&reports, &mut out);
    Ok(())
}
