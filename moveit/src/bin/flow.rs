//! Render per-bucket rebalance timelines.
//!
//! # Usage
//!
//! ```bash
//! flow rebalance.json -o charts/
//! ```
//!
//! One SVG per bucket is written to the output directory, named
//! `<bucket>_<log file name>.svg`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: info, or debug with `-v`)

use std::io;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use moveit::cli::{init_tracing, FlowArgs};
use moveit::parsing::read_event_log;
use moveit::services::{analyze_log, render_charts, write_chart_paths};
use moveit::MoveitConfig;

fn main() -> Result<()> {
    let args = FlowArgs::parse();
    init_tracing(args.verbose);

    let mut config = MoveitConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(lanes) = args.lanes {
        config.analysis.lane_strategy = lanes;
    }
    let palette = config.palette()?;

    let log = read_event_log(&args.log)
        .with_context(|| format!("Failed to read event log {}", args.log.display()))?;
    info!(buckets = log.len(), events = log.total_events(), "loaded event log");

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let analyses = analyze_log(&log, config.analysis);
    let run = render_charts(&analyses, &config.canvas, &palette, &args.output_dir, &args.log);

    if let Err(e) = write_chart_paths(&run.written, &mut io::stdout().lock()) {
        match e.kind() {
            io::ErrorKind::BrokenPipe => debug!("stdout closed, chart list truncated"),
            _ => warn!(error = %e, "could not print chart paths"),
        }
    }

    if !run.failed.is_empty() {
        bail!(
            "{} of {} charts could not be written: {}",
            run.failed.len(),
            analyses.len(),
            run.failed.join(", ")
        );
    }
    Ok(())
}
