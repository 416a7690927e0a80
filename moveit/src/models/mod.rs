//! Domain models for rebalance event analysis.
//!
//! Everything here is derived from a single bucket's events and is read-only
//! once built.

pub mod event;
pub mod movement;
pub mod time;

pub use event::{Chain, Event, EventKind, NodeId, PartitionId};
pub use movement::{DestinationGroup, Movement, OpenMovement};
pub use time::{TimeWindow, Timestamp};
