use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

use crate::models::{
    DestinationGroup, Event, EventKind, Movement, NodeId, OpenMovement, PartitionId, TimeWindow,
    Timestamp,
};

/// Completed movements per destination node.
pub type MovementMap = BTreeMap<NodeId, DestinationGroup>;

/// Everything recovered from one bucket's move events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstruction {
    /// Completed movements per destination, in arrival order of their starts.
    pub movements: MovementMap,
    /// Every source and destination node, sorted.
    pub nodes: Vec<NodeId>,
    /// Earliest accepted move start.
    pub first_start: Option<Timestamp>,
    /// Latest completed move end.
    pub last_end: Option<Timestamp>,
    /// Partitions whose move only reshuffled replicas.
    pub replica_swaps: BTreeSet<PartitionId>,
    /// Moves still open when the log ended.
    pub unfinished: Vec<OpenMovement>,
    /// `vbucketMoveDone` events that matched no open move.
    pub orphaned_done: usize,
}

impl Reconstruction {
    /// The `[first start, last end]` window, if both ends were seen.
    pub fn window(&self) -> Option<TimeWindow> {
        match (self.first_start, self.last_end) {
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
            _ => None,
        }
    }

    /// Number of completed movements, self-loops included.
    pub fn movement_total(&self) -> usize {
        self.movements.values().map(DestinationGroup::len).sum()
    }

    /// Look up the completed movement of `partition`, whatever its destination.
    pub fn movement(&self, partition: PartitionId) -> Option<&Movement> {
        self.movements.values().find_map(|group| group.get(partition))
    }

    /// Index of `node` in the sorted node list.
    pub fn node_index(&self, node: &NodeId) -> Option<usize> {
        self.nodes.binary_search(node).ok()
    }
}

/// Pairs start and done events while walking a sorted event stream.
#[derive(Debug, Default)]
struct MovementTracker {
    open: HashMap<PartitionId, OpenMovement>,
    excluded: BTreeSet<PartitionId>,
    groups: MovementMap,
    arrival: HashMap<(NodeId, PartitionId), usize>,
    nodes: BTreeSet<NodeId>,
    first_start: Option<Timestamp>,
    last_end: Option<Timestamp>,
    orphaned_done: usize,
}

impl MovementTracker {
    fn on_event(&mut self, event: &Event) {
        let Some(partition) = event.partition else {
            return;
        };
        match event.kind {
            EventKind::MoveStart => self.on_start(event, partition),
            EventKind::MoveDone => self.on_done(event, partition),
            _ => {}
        }
    }

    fn on_start(&mut self, event: &Event, partition: PartitionId) {
        if self.excluded.contains(&partition) {
            return;
        }
        if event.chain_before.same_members(&event.chain_after) {
            debug!(bucket = %event.bucket, %partition, "replica swap, no data moved");
            self.excluded.insert(partition);
            self.open.remove(&partition);
            return;
        }

        let (Some(source), Some(destination)) =
            (event.chain_before.primary(), event.chain_after.primary())
        else {
            warn!(
                bucket = %event.bucket,
                %partition,
                ts = %event.ts,
                "move start with an empty chain"
            );
            return;
        };

        let next = self.arrival.len();
        self.arrival
            .entry((destination.clone(), partition))
            .or_insert(next);
        self.nodes.insert(source.clone());
        self.nodes.insert(destination.clone());
        self.first_start = Some(match self.first_start {
            Some(ts) if ts <= event.ts => ts,
            _ => event.ts,
        });

        let movement = OpenMovement {
            partition,
            destination: destination.clone(),
            source: source.clone(),
            start: event.ts,
        };
        if let Some(previous) = self.open.insert(partition, movement) {
            warn!(
                bucket = %event.bucket,
                %partition,
                started = %previous.start,
                "move restarted before it completed"
            );
        }
    }

    fn on_done(&mut self, event: &Event, partition: PartitionId) {
        if self.excluded.contains(&partition) {
            return;
        }
        let Some(open) = self.open.remove(&partition) else {
            self.orphaned_done += 1;
            warn!(
                bucket = %event.bucket,
                %partition,
                ts = %event.ts,
                "move done without a matching start"
            );
            return;
        };

        self.last_end = Some(match self.last_end {
            Some(ts) if ts >= event.ts => ts,
            _ => event.ts,
        });
        let movement = open.close(event.ts);
        self.groups
            .entry(movement.destination.clone())
            .or_default()
            .insert(movement);
    }

    fn finish(self) -> Reconstruction {
        let MovementTracker {
            open,
            excluded,
            mut groups,
            arrival,
            nodes,
            first_start,
            last_end,
            orphaned_done,
        } = self;

        for (destination, group) in groups.iter_mut() {
            group.sort_by_key(|m| {
                arrival
                    .get(&(destination.clone(), m.partition))
                    .copied()
                    .unwrap_or(usize::MAX)
            });
        }

        let mut unfinished: Vec<OpenMovement> = open.into_values().collect();
        unfinished.sort_by_key(|m| m.partition);
        if !unfinished.is_empty() {
            warn!(count = unfinished.len(), "moves never completed");
        }

        Reconstruction {
            movements: groups,
            nodes: nodes.into_iter().collect(),
            first_start,
            last_end,
            replica_swaps: excluded,
            unfinished,
            orphaned_done,
        }
    }
}

/// Pair each partition's `vbucketMoveStart` with its `vbucketMoveDone`.
///
/// `events` must be sorted by timestamp. A start whose before and after chains
/// hold the same nodes excludes the partition from all further pairing.
/// Done events with no open move are counted and otherwise ignored.
pub fn reconstruct(events: &[Event]) -> Reconstruction {
    let mut tracker = MovementTracker::default();
    for event in events {
        tracker.on_event(event);
    }
    let reconstruction = tracker.finish();
    debug!(
        destinations = reconstruction.movements.len(),
        movements = reconstruction.movement_total(),
        swaps = reconstruction.replica_swaps.len(),
        "reconstructed movements"
    );
    reconstruction
}
