//! Parsers for cluster manager master event logs.
//!
//! # Parsers
//!
//! - [`event_log`]: Decode newline-delimited JSON events, keep the last
//!   rebalance only and group the events by bucket.
//!
//! # Example
//!
//! ```no_run
//! use moveit::parsing::read_event_log;
//! use std::path::Path;
//!
//! let log = read_event_log(Path::new("master_events.log"))
//!     .expect("Failed to parse event log");
//! for (bucket, events) in log.buckets() {
//!     println!("{}: {} events", bucket, events.len());
//! }
//! ```

pub mod event_log;

#[cfg(test)]
mod event_log_tests;

pub use event_log::{parse_event_log, parse_event_log_str, read_event_log, EventLog};
