use indexmap::IndexMap;

use crate::config::LaneStrategy;
use crate::models::{DestinationGroup, Movement, PartitionId};

/// Lane index of every drawn movement of one destination.
///
/// Self-loop movements are never drawn and get no lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneAssignment {
    lanes: usize,
    assignments: IndexMap<PartitionId, usize>,
}

impl LaneAssignment {
    /// Number of lanes the destination span is divided into.
    pub fn lane_count(&self) -> usize {
        self.lanes
    }

    pub fn lane_of(&self, partition: PartitionId) -> Option<usize> {
        self.assignments.get(&partition).copied()
    }

    /// `(partition, lane)` pairs in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = (PartitionId, usize)> + '_ {
        self.assignments.iter().map(|(p, lane)| (*p, *lane))
    }
}

/// Assign the transfers of `group` to lanes.
///
/// `concurrency` is the destination's estimate; it is clamped to at least one.
pub fn assign_lanes(
    group: &DestinationGroup,
    concurrency: usize,
    strategy: LaneStrategy,
) -> LaneAssignment {
    match strategy {
        LaneStrategy::RoundRobin => round_robin(group, concurrency.max(1)),
        LaneStrategy::FirstFit => first_fit(group),
    }
}

/// Cycle `0, 1, .., lanes - 1` in arrival order.
///
/// Not interval aware: two bars in one lane may overlap when the estimate is
/// below the real peak.
fn round_robin(group: &DestinationGroup, lanes: usize) -> LaneAssignment {
    let assignments = group
        .transfers()
        .zip((0..lanes).cycle())
        .map(|(movement, lane)| (movement.partition, lane))
        .collect();
    LaneAssignment { lanes, assignments }
}

/// Put each movement in the lowest lane none of whose bars it intersects.
fn first_fit(group: &DestinationGroup) -> LaneAssignment {
    let mut lanes: Vec<Vec<&Movement>> = Vec::new();
    let mut assignments = IndexMap::new();

    for movement in group.transfers() {
        let free = lanes
            .iter()
            .position(|lane| lane.iter().all(|placed| !placed.intersects(movement)));
        let lane = match free {
            Some(lane) => lane,
            None => {
                lanes.push(Vec::new());
                lanes.len() - 1
            }
        };
        lanes[lane].push(movement);
        assignments.insert(movement.partition, lane);
    }

    LaneAssignment {
        lanes: lanes.len().max(1),
        assignments,
    }
}
