use std::io::{self, Write};
use tracing::{debug, warn};

use crate::algorithms::{find_hotspots, total_move_time, Hotspot, PhaseTimelines};
use crate::models::PartitionId;

/// Summary statistics over movement durations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Compute statistics for a set of durations.
///
/// Returns `None` for an empty set.
pub fn compute_stats(values: &[f64]) -> Option<DurationStats> {
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(DurationStats {
        count,
        mean: sum / count as f64,
        min,
        max,
    })
}

/// Total move time and hotspots of one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTiming {
    pub partition: PartitionId,
    pub total: f64,
    pub hotspots: Vec<Hotspot>,
}

/// Text report of one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketReport {
    pub bucket: String,
    /// Timed partitions in order of first appearance.
    pub timings: Vec<PartitionTiming>,
}

impl BucketReport {
    /// Time every partition and collect its hotspots.
    ///
    /// Partitions without a complete positive move time are left out.
    pub fn build(bucket: &str, timelines: &PhaseTimelines, threshold: f64) -> Self {
        let timings: Vec<PartitionTiming> = timelines
            .iter()
            .filter_map(|(partition, timeline)| {
                let total = total_move_time(timeline)?;
                Some(PartitionTiming {
                    partition: *partition,
                    total,
                    hotspots: find_hotspots(timeline, total, threshold),
                })
            })
            .collect();

        debug!(bucket, partitions = timings.len(), "built report");
        Self {
            bucket: bucket.to_string(),
            timings,
        }
    }

    /// Duration statistics; `None` when no partition was timed.
    pub fn stats(&self) -> Option<DurationStats> {
        let totals: Vec<f64> = self.timings.iter().map(|t| t.total).collect();
        compute_stats(&totals)
    }

    /// Write the report as text. Writes nothing for a bucket without timings.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(stats) = self.stats() else {
            return Ok(());
        };

        writeln!(
            out,
            "{}: {} movements, mean: {:.1}s, max: {:.1}s, min: {:.1}s",
            self.bucket, stats.count, stats.mean, stats.max, stats.min
        )?;
        for timing in &self.timings {
            writeln!(out, "{:>8}: {:.1}s", timing.partition, timing.total)?;
            for hotspot in &timing.hotspots {
                writeln!(
                    out,
                    "{:10}{} -> {}: {:.1}%",
                    "", hotspot.from, hotspot.to, hotspot.share
                )?;
            }
        }
        Ok(())
    }
}

/// Write every report to `out` in order.
///
/// A failed write ends that bucket's report only; the remaining buckets are
/// still attempted. Returns the number of reports written in full.
pub fn write_reports<W: Write>(reports: &[BucketReport], out: &mut W) -> usize {
    let mut written = 0;
    for report in reports {
        match report.write_to(out).and_then(|_| out.flush()) {
            Ok(()) => written += 1,
            Err(e) => warn!(bucket = %report.bucket, error = %e, "report output failed"),
        }
    }
    written
}
