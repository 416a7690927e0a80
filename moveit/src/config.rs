//! Analyzer configuration file support.
//!
//! Settings are read from an optional TOML file. Every key has a default, so an
//! empty file (or no file at all) reproduces the stock chart and report.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{MoveitError, Result};
use crate::render::Palette;

/// Default hotspot threshold, in percent of a partition's total move time.
pub const DEFAULT_HOTSPOT_THRESHOLD: f64 = 10.0;

const DEFAULT_PALETTE: [&str; 10] = [
    "#51A351", "#F89406", "#7D1935", "#4A96AD", "#DE1B1B", "#E9E581", "#A2AB58", "#FFE658",
    "#118C4E", "#193D4F",
];

/// Full analyzer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveitConfig {
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub palette: PaletteSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// Chart geometry, in SVG user units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSettings {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_left_margin")]
    pub left_margin: f32,
    #[serde(default = "default_top_margin")]
    pub top_margin: f32,
    #[serde(default = "default_dest_padding")]
    pub dest_padding: f32,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f32,
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: f32,
    #[serde(default = "default_source_span_height")]
    pub source_span_height: f32,
    #[serde(default = "default_legend_width")]
    pub legend_width: f32,
    #[serde(default = "default_legend_height")]
    pub legend_height: f32,
    #[serde(default = "default_label_width")]
    pub label_width: f32,
    #[serde(default = "default_label_height")]
    pub label_height: f32,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_width() -> f32 {
    1300.0
}

fn default_height() -> f32 {
    640.0
}

fn default_left_margin() -> f32 {
    50.0
}

fn default_top_margin() -> f32 {
    5.0
}

fn default_dest_padding() -> f32 {
    10.0
}

fn default_corner_radius() -> f32 {
    7.0
}

fn default_grid_spacing() -> f32 {
    100.0
}

fn default_source_span_height() -> f32 {
    20.0
}

fn default_legend_width() -> f32 {
    180.0
}

fn default_legend_height() -> f32 {
    30.0
}

fn default_label_width() -> f32 {
    140.0
}

fn default_label_height() -> f32 {
    20.0
}

fn default_font_size() -> f32 {
    14.0
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            left_margin: default_left_margin(),
            top_margin: default_top_margin(),
            dest_padding: default_dest_padding(),
            corner_radius: default_corner_radius(),
            grid_spacing: default_grid_spacing(),
            source_span_height: default_source_span_height(),
            legend_width: default_legend_width(),
            legend_height: default_legend_height(),
            label_width: default_label_width(),
            label_height: default_label_height(),
            font_size: default_font_size(),
        }
    }
}

/// Node colors, assigned by position in the sorted node list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteSettings {
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
}

fn default_colors() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            colors: default_colors(),
        }
    }
}

/// Text report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_hotspot_threshold")]
    pub hotspot_threshold: f64,
}

fn default_hotspot_threshold() -> f64 {
    DEFAULT_HOTSPOT_THRESHOLD
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            hotspot_threshold: default_hotspot_threshold(),
        }
    }
}

/// Which peers a movement is compared against when estimating concurrency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapScope {
    /// Every other movement into the same destination.
    #[default]
    Destination,
    /// Only movements into the same destination from the same source;
    /// self-loop movements never count.
    Source,
}

/// How movement bars are spread over a destination's lanes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneStrategy {
    /// Cycle through the estimated lane count in arrival order.
    #[default]
    RoundRobin,
    /// Lowest lane whose bars do not intersect the movement; may open lanes
    /// beyond the estimate.
    FirstFit,
}

impl FromStr for LaneStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "round_robin" => Ok(LaneStrategy::RoundRobin),
            "first_fit" => Ok(LaneStrategy::FirstFit),
            other => Err(format!("unknown lane strategy: {}", other)),
        }
    }
}

/// Reconstruction and estimation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default)]
    pub overlap_scope: OverlapScope,
    #[serde(default)]
    pub lane_strategy: LaneStrategy,
}

impl MoveitConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| MoveitError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MoveitConfig = toml::from_str(content)
            .map_err(|e| MoveitError::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Search the standard locations, falling back to defaults when none exist.
    ///
    /// Searched, in order:
    /// 1. `moveit.toml`
    /// 2. `config/moveit.toml`
    pub fn from_default_location() -> Result<Self> {
        let search_paths = [
            PathBuf::from("moveit.toml"),
            PathBuf::from("config/moveit.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load from an explicit path, or from the standard locations.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_default_location(),
        }
    }

    /// Reject values the chart or report cannot work with.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.report.hotspot_threshold).map_err(MoveitError::Config)?;

        let canvas = &self.canvas;
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(MoveitError::Config(format!(
                "canvas must have a positive size, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        if canvas.grid_spacing <= 0.0 {
            return Err(MoveitError::Config(
                "canvas.grid_spacing must be positive".to_string(),
            ));
        }
        if canvas.source_span_height < 0.0 {
            return Err(MoveitError::Config(
                "canvas.source_span_height must not be negative".to_string(),
            ));
        }

        self.palette()?;
        Ok(())
    }

    /// Parsed node colors.
    pub fn palette(&self) -> Result<Palette> {
        Palette::from_hex(&self.palette.colors)
    }
}

/// Check a hotspot threshold, in percent.
pub fn validate_threshold(threshold: f64) -> std::result::Result<f64, String> {
    if (0.0..=100.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(format!(
            "threshold must be between 0 and 100, got {}",
            threshold
        ))
    }
}
