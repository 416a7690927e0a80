use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use super::analysis::BucketAnalysis;
use crate::config::CanvasSettings;
use crate::error::Result;
use crate::models::{NodeId, TimeWindow, Timestamp};
use crate::render::{write_svg_file, Palette, Shape, TimelineLayout, BLACK, WHITE};

/// Linear map from timestamps to horizontal document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    window: TimeWindow,
    canvas_width: f64,
    left_margin: f64,
}

impl TimeScale {
    /// Callers must pass a non-degenerate window.
    pub fn new(window: TimeWindow, canvas_width: f64, left_margin: f64) -> Self {
        Self {
            window,
            canvas_width,
            left_margin,
        }
    }

    /// Horizontal position of `ts`.
    pub fn x(&self, ts: Timestamp) -> f64 {
        (ts - self.window.start) / self.window.duration() * self.canvas_width + self.left_margin
    }

    /// Horizontal extent of a duration in seconds.
    pub fn width(&self, seconds: f64) -> f64 {
        seconds / self.window.duration() * self.canvas_width
    }
}

/// Vertical band of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    offset: f32,
    height: f32,
}

/// Heights of the two kinds of node span.
///
/// Destinations share what the fixed-height source-only spans leave over.
///
/// The equal-share fallback deliberately departs from that leftover split:
/// with many source-only nodes the leftover shrinks below a source-only span,
/// or below zero, so every node gets `height / (active + source_only)`.
fn span_heights(canvas: &CanvasSettings, active: usize, source_only: usize) -> (f32, f32) {
    let fixed = canvas.source_span_height;
    let remaining = canvas.height - source_only as f32 * fixed;
    let active_height = remaining / active as f32;
    if active_height >= fixed {
        (active_height, fixed)
    } else {
        let equal = canvas.height / (active + source_only) as f32;
        (equal, equal)
    }
}

/// Compute the chart of one bucket.
///
/// Fails with a skippable error for buckets that have nothing to draw.
pub fn layout_timeline(
    analysis: &BucketAnalysis,
    canvas: &CanvasSettings,
    palette: &Palette,
) -> Result<TimelineLayout> {
    let window = analysis.window()?;
    let scale = TimeScale::new(window, canvas.width as f64, canvas.left_margin as f64);

    let nodes = analysis.nodes();
    let counts = &analysis.movement_counts;
    let active = nodes.iter().filter(|n| counts.is_active(n)).count();
    let (active_height, source_height) = span_heights(canvas, active, nodes.len() - active);

    let mut layout = TimelineLayout::new(
        canvas.width + canvas.left_margin,
        canvas.height + canvas.top_margin,
    );
    draw_border(&mut layout, canvas);
    draw_grid(&mut layout, canvas);

    let mut offset = canvas.top_margin;
    for (idx, node) in nodes.iter().enumerate() {
        let is_active = counts.is_active(node);
        let span = Span {
            offset,
            height: if is_active { active_height } else { source_height },
        };
        offset += span.height;

        // Node placeholder
        layout.push(Shape::Rect {
            x: canvas.dest_padding / 2.0,
            y: span.offset,
            w: canvas.left_margin - canvas.dest_padding,
            h: span.height,
            fill: palette.color(idx),
            stroke: Some(WHITE),
            radius: canvas.corner_radius,
        });

        // Separating line
        layout.push(Shape::Line {
            x1: canvas.left_margin,
            y1: span.offset,
            x2: canvas.width + canvas.left_margin,
            y2: span.offset,
            color: BLACK,
            dashed: true,
        });

        if is_active {
            draw_movement_bars(&mut layout, analysis, node, span, &scale, palette);
        }

        // Node address and number of movements
        layout.push(Shape::Rect {
            x: canvas.left_margin,
            y: span.offset + span.height - canvas.label_height,
            w: canvas.label_width,
            h: canvas.label_height,
            fill: WHITE,
            stroke: Some(BLACK),
            radius: 0.0,
        });
        layout.push(Shape::Text {
            x: canvas.left_margin + 5.0,
            y: span.offset + span.height - 5.0,
            content: format!("{}: {}", node, counts.get(node)),
            size: canvas.font_size,
        });
    }

    draw_legend(&mut layout, canvas, &window);
    Ok(layout)
}

fn draw_movement_bars(
    layout: &mut TimelineLayout,
    analysis: &BucketAnalysis,
    destination: &NodeId,
    span: Span,
    scale: &TimeScale,
    palette: &Palette,
) {
    let (Some(group), Some(lanes)) = (
        analysis.reconstruction.movements.get(destination),
        analysis.lanes_for(destination),
    ) else {
        return;
    };
    let bar_height = span.height / lanes.lane_count() as f32;

    for movement in group.transfers() {
        let Some(lane) = lanes.lane_of(movement.partition) else {
            continue;
        };
        let color_idx = analysis.reconstruction.node_index(&movement.source).unwrap_or(0);
        layout.push(Shape::Rect {
            x: scale.x(movement.start) as f32,
            y: span.offset + lane as f32 * bar_height,
            w: scale.width(movement.duration()) as f32,
            h: bar_height,
            fill: palette.color(color_idx),
            stroke: Some(BLACK),
            radius: 0.0,
        });
    }
}

fn draw_border(layout: &mut TimelineLayout, canvas: &CanvasSettings) {
    layout.push(Shape::Rect {
        x: 0.0,
        y: 0.0,
        w: canvas.width + canvas.left_margin,
        h: canvas.height + canvas.top_margin,
        fill: WHITE,
        stroke: None,
        radius: 0.0,
    });
    layout.push(Shape::Rect {
        x: canvas.left_margin,
        y: canvas.top_margin,
        w: canvas.width,
        h: canvas.height,
        fill: WHITE,
        stroke: Some(BLACK),
        radius: 0.0,
    });
}

fn draw_grid(layout: &mut TimelineLayout, canvas: &CanvasSettings) {
    let mut x = canvas.left_margin;
    while x < canvas.width {
        layout.push(Shape::Line {
            x1: x,
            y1: canvas.top_margin,
            x2: x,
            y2: canvas.height + canvas.top_margin,
            color: BLACK,
            dashed: true,
        });
        x += canvas.grid_spacing;
    }
}

fn draw_legend(layout: &mut TimelineLayout, canvas: &CanvasSettings, window: &TimeWindow) {
    let x = canvas.left_margin + canvas.width - canvas.legend_width;
    layout.push(Shape::Rect {
        x,
        y: canvas.top_margin,
        w: canvas.legend_width,
        h: canvas.legend_height,
        fill: WHITE,
        stroke: Some(BLACK),
        radius: 0.0,
    });
    layout.push(Shape::Text {
        x: x + 5.0,
        y: canvas.top_margin + 20.0,
        content: format!("Total duration: {:.1} min", window.duration_minutes()),
        size: canvas.font_size,
    });
}

/// Chart file name for `bucket`, derived from the log's file name.
pub fn chart_path(output_dir: &Path, bucket: &str, log_path: &Path) -> PathBuf {
    let log_name = log_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "events".to_string());
    let bucket: String = bucket
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    output_dir.join(format!("{}_{}.svg", bucket, log_name))
}

/// Lay out and write the chart of one bucket.
///
/// Returns `Ok(None)` when the bucket has nothing to draw.
pub fn render_bucket_chart(
    analysis: &BucketAnalysis,
    canvas: &CanvasSettings,
    palette: &Palette,
    output_dir: &Path,
    log_path: &Path,
) -> Result<Option<PathBuf>> {
    let layout = match layout_timeline(analysis, canvas, palette) {
        Ok(layout) => layout,
        Err(e) if e.is_skippable() => {
            info!(bucket = %analysis.bucket, reason = %e, "skipping chart");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let started = analysis.window()?.start;
    let path = chart_path(output_dir, &analysis.bucket, log_path);
    write_svg_file(&layout, &path)?;
    info!(
        bucket = %analysis.bucket,
        path = %path.display(),
        started = %started.to_rfc3339(),
        "wrote chart"
    );
    Ok(Some(path))
}

/// Outcome of charting every bucket of a log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartRun {
    /// Charts written, in bucket order.
    pub written: Vec<PathBuf>,
    /// Buckets whose chart could not be written.
    pub failed: Vec<String>,
}

/// Chart every bucket in parallel.
///
/// A bucket whose chart fails is logged and counted; the others are still
/// written.
pub fn render_charts(
    analyses: &[BucketAnalysis],
    canvas: &CanvasSettings,
    palette: &Palette,
    output_dir: &Path,
    log_path: &Path,
) -> ChartRun {
    let results: Vec<Result<Option<PathBuf>>> = analyses
        .par_iter()
        .map(|analysis| render_bucket_chart(analysis, canvas, palette, output_dir, log_path))
        .collect();

    let mut run = ChartRun::default();
    for (analysis, result) in analyses.iter().zip(results) {
        match result {
            Ok(Some(path)) => run.written.push(path),
            Ok(None) => {}
            Err(e) => {
                warn!(bucket = %analysis.bucket, error = %e, "chart output failed");
                run.failed.push(analysis.bucket.clone());
            }
        }
    }
    run
}

/// Print one chart path per line, stopping at the first write error.
pub fn write_chart_paths<W: Write>(paths: &[PathBuf], out: &mut W) -> io::Result<()> {
    for path in paths {
        writeln!(out, "{}", path.display())?;
    }
    out.flush()
}
