//! Movement reconstruction and concurrency analytics.
//!
//! # Components
//!
//! - [`normalizer`]: Timestamp ordering and per-partition phase timelines
//! - [`reconstruction`]: Pairing move start/done events into movements
//! - [`concurrency`]: Overlap-based concurrency estimate per destination
//! - [`lanes`]: Assigning movement bars to lanes
//! - [`hotspots`]: Long gaps between consecutive phases of a move
//!
//! # Example
//!
//! ```
//! use moveit::algorithms::{estimate_concurrency, normalize, reconstruct};
//! use moveit::config::OverlapScope;
//! use moveit::models::Event;
//!
//! let events = vec![
//!     Event::move_done("b", 1, 50.0),
//!     Event::move_start("b", 1, 10.0, &["A:1"], &["B:1"]),
//! ];
//! let sorted = normalize(&events);
//! let reconstruction = reconstruct(&sorted);
//! let estimate = estimate_concurrency(&reconstruction.movements, OverlapScope::Destination);
//! assert_eq!(reconstruction.movement_total(), 1);
//! assert_eq!(estimate.lanes_for(&"B".parse().unwrap()), 1);
//! ```

pub mod concurrency;
pub mod hotspots;
pub mod lanes;
pub mod normalizer;
pub mod reconstruction;


pub use concurrency::{count_movements, estimate_concurrency, ConcurrencyEstimate, MovementCount};
pub use hotspots::{find_hotspots, total_move_time, Hotspot};
pub use lanes::{assign_lanes, LaneAssignment};
pub use normalizer::{normalize, phase_timelines, Phase, PhaseTimelines};
pub use reconstruction::{reconstruct, MovementMap, Reconstruction};
