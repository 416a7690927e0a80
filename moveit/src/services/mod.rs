//! Service layer for per-bucket orchestration.
//!
//! Services sit between the parsed event log and the two outputs. They run
//! the analysis pipeline for each bucket, lay out timeline charts and build
//! the text report.

pub mod analysis;
pub mod report;
pub mod timeline;


pub use analysis::{analyze_log, BucketAnalysis};
pub use report::{compute_stats, write_reports, BucketReport, DurationStats, PartitionTiming};
pub use timeline::{
    chart_path, layout_timeline, render_bucket_chart, render_charts, write_chart_paths, ChartRun,
    TimeScale,
};
