use indexmap::IndexMap;

use crate::models::{Event, EventKind, PartitionId, Timestamp};

/// One step in a partition's move, as seen in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub kind: EventKind,
    pub ts: Timestamp,
}

/// Phase lists per partition, in order of each partition's first event.
pub type PhaseTimelines = IndexMap<PartitionId, Vec<Phase>>;

/// Copy of `events` in ascending timestamp order.
///
/// The sort is stable, so events sharing a timestamp keep their log order.
/// A `vbucketMoveDone` must never be seen before its `vbucketMoveStart`, which
/// makes this ordering a precondition of reconstruction.
pub fn normalize(events: &[Event]) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| a.ts.total_cmp(&b.ts));
    sorted
}

/// Group the events that carry a partition id into per-partition timelines.
///
/// `events` must already be sorted.
pub fn phase_timelines(events: &[Event]) -> PhaseTimelines {
    let mut timelines = PhaseTimelines::new();
    for event in events {
        if let Some(partition) = event.partition {
            timelines.entry(partition).or_default().push(Phase {
                kind: event.kind.clone(),
                ts: event.ts,
            });
        }
    }
    timelines
}
