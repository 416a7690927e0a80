use std::collections::BTreeMap;

use super::reconstruction::MovementMap;
use crate::config::OverlapScope;
use crate::models::{DestinationGroup, Movement, NodeId};

/// Estimated number of concurrent movements per destination node.
///
/// For each destination this is the largest number of *other* movements any
/// single movement overlaps with. Pairwise and endpoint based, it is a lower
/// bound on the real peak and only used to size lanes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcurrencyEstimate(BTreeMap<NodeId, usize>);

impl ConcurrencyEstimate {
    /// Raw estimate; 0 for unknown nodes.
    pub fn get(&self, node: &NodeId) -> usize {
        self.0.get(node).copied().unwrap_or(0)
    }

    /// Lane count for layout, never below one.
    pub fn lanes_for(&self, node: &NodeId) -> usize {
        self.get(node).max(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, usize)> {
        self.0.iter().map(|(node, c)| (node, *c))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Number of data-transferring movements per destination.
///
/// Destinations whose movements are all self-loops have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementCount(BTreeMap<NodeId, usize>);

impl MovementCount {
    pub fn get(&self, node: &NodeId) -> usize {
        self.0.get(node).copied().unwrap_or(0)
    }

    /// Whether `node` received at least one real movement.
    pub fn is_active(&self, node: &NodeId) -> bool {
        self.0.contains_key(node)
    }

    /// Active destinations, sorted.
    pub fn destinations(&self) -> impl Iterator<Item = &NodeId> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Count the non-self-loop movements into each destination.
pub fn count_movements(movements: &MovementMap) -> MovementCount {
    MovementCount(
        movements
            .iter()
            .filter_map(|(destination, group)| {
                let count = group.transfers().count();
                (count > 0).then(|| (destination.clone(), count))
            })
            .collect(),
    )
}

/// Estimate concurrency for every destination in `movements`.
pub fn estimate_concurrency(movements: &MovementMap, scope: OverlapScope) -> ConcurrencyEstimate {
    ConcurrencyEstimate(
        movements
            .iter()
            .map(|(destination, group)| {
                (
                    destination.clone(),
                    destination_concurrency(destination, group, scope),
                )
            })
            .collect(),
    )
}

/// Whether `peer` counts against `movement` under `scope`.
fn is_peer(
    movement: &Movement,
    peer: &Movement,
    destination: &NodeId,
    scope: OverlapScope,
) -> bool {
    if movement.partition == peer.partition {
        return false;
    }
    match scope {
        OverlapScope::Destination => true,
        OverlapScope::Source => movement.source == peer.source && movement.source != *destination,
    }
}

fn destination_concurrency(
    destination: &NodeId,
    group: &DestinationGroup,
    scope: OverlapScope,
) -> usize {
    group
        .iter()
        .map(|movement| {
            group
                .iter()
                .filter(|peer| is_peer(movement, peer, destination, scope))
                .filter(|peer| movement.has_endpoint_within(peer))
                .count()
        })
        .max()
        .unwrap_or(0)
}
