//! # moveit
//!
//! Rebalance event log analysis for a partitioned database cluster.
//!
//! During a rebalance every partition ("vbucket") is moved between nodes and
//! the cluster writes one JSON event per line describing each step. This crate
//! turns such a log into per-bucket timeline charts and text reports.
//!
//! ## Features
//!
//! - **Parsing**: read newline-delimited JSON event logs, last rebalance only
//! - **Reconstruction**: pair move start/done events into movement intervals
//! - **Concurrency**: estimate overlapping movements per destination node
//! - **Layout**: assign movement bars to lanes and render SVG timelines
//! - **Reporting**: movement duration statistics and per-phase hotspots
//!
//! ## Architecture
//!
//! - [`parsing`]: event log reader
//! - [`models`]: events, node and partition ids, movements, time
//! - [`algorithms`]: normalization, reconstruction, concurrency, lanes, hotspots
//! - [`services`]: per-bucket analysis, chart layout, text report
//! - [`render`]: drawing primitives and the SVG sink
//! - [`config`]: TOML configuration
//! - [`cli`]: argument parsers for the `flow` and `moveit` binaries

pub mod algorithms;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod render;
pub mod services;

pub use config::MoveitConfig;
pub use error::{MoveitError, Result};
