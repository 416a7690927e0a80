use indexmap::IndexMap;

use super::event::{NodeId, PartitionId};
use super::time::Timestamp;

/// A partition move whose `vbucketMoveDone` has not been seen yet.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenMovement {
    pub partition: PartitionId,
    pub destination: NodeId,
    pub source: NodeId,
    pub start: Timestamp,
}

impl OpenMovement {
    /// Complete the move at `end`.
    pub fn close(self, end: Timestamp) -> Movement {
        Movement {
            partition: self.partition,
            destination: self.destination,
            source: self.source,
            start: self.start,
            end,
        }
    }
}

/// A completed partition move from `source` to `destination`.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub partition: PartitionId,
    pub destination: NodeId,
    pub source: NodeId,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Movement {
    /// The active copy stayed on the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.destination
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether either endpoint of `self` lies strictly inside `other`.
    ///
    /// This is endpoint containment, not interval intersection: a movement that
    /// fully contains `other` does not match, and neither do identical spans.
    pub fn has_endpoint_within(&self, other: &Movement) -> bool {
        let inside = |ts: Timestamp| other.start < ts && ts < other.end;
        inside(self.start) || inside(self.end)
    }

    /// Plain half-open interval intersection.
    pub fn intersects(&self, other: &Movement) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// All completed movements into one destination, keyed by partition in the
/// order their `vbucketMoveStart` events arrived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationGroup {
    movements: IndexMap<PartitionId, Movement>,
}

impl DestinationGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a movement; a partition already present keeps its position.
    pub fn insert(&mut self, movement: Movement) {
        self.movements.insert(movement.partition, movement);
    }

    pub fn get(&self, partition: PartitionId) -> Option<&Movement> {
        self.movements.get(&partition)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movement> {
        self.movements.values()
    }

    /// Movements that actually transfer data.
    pub fn transfers(&self) -> impl Iterator<Item = &Movement> {
        self.iter().filter(|m| !m.is_self_loop())
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Reorder by a caller-provided key, stable for equal keys.
    pub(crate) fn sort_by_key<K: Ord>(&mut self, mut key: impl FnMut(&Movement) -> K) {
        self.movements.sort_by(|_, a, _, b| key(a).cmp(&key(b)));
    }
}

impl FromIterator<Movement> for DestinationGroup {
    fn from_iter<T: IntoIterator<Item = Movement>>(iter: T) -> Self {
        let mut group = DestinationGroup::new();
        for movement in iter {
            group.insert(movement);
        }
        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(partition: u32, source: &str, destination: &str, start: f64, end: f64) -> Movement {
        Movement {
            partition: PartitionId::new(partition),
            destination: NodeId::parse(destination),
            source: NodeId::parse(source),
            start: Timestamp::new(start),
            end: Timestamp::new(end),
        }
    }

    #[test]
    fn test_close_open_movement() {
        let open = OpenMovement {
            partition: PartitionId::new(1),
            destination: NodeId::parse("B"),
            source: NodeId::parse("A"),
            start: Timestamp::new(10.0),
        };
        let closed = open.close(Timestamp::new(50.0));
        assert_eq!(closed.duration(), 40.0);
        assert!(!closed.is_self_loop());
    }

    #[test]
    fn test_endpoint_containment() {
        let a = movement(1, "A", "B", 0.0, 10.0);
        let b = movement(2, "A", "B", 5.0, 15.0);
        let c = movement(3, "A", "B", 20.0, 30.0);
        assert!(a.has_endpoint_within(&b));
        assert!(b.has_endpoint_within(&a));
        assert!(!a.has_endpoint_within(&c));
        assert!(!c.has_endpoint_within(&a));
    }

    #[test]
    fn test_containment_is_not_intersection() {
        let outer = movement(1, "A", "B", 0.0, 100.0);
        let inner = movement(2, "A", "B", 10.0, 20.0);
        // the inner span sits wholly inside the outer one
        assert!(inner.has_endpoint_within(&outer));
        assert!(!outer.has_endpoint_within(&inner));
        assert!(outer.intersects(&inner));

        let twin = movement(3, "A", "B", 0.0, 100.0);
        assert!(!outer.has_endpoint_within(&twin));
        assert!(outer.intersects(&twin));
    }

    #[test]
    fn test_group_keeps_first_position() {
        let mut group: DestinationGroup = vec![
            movement(7, "A", "B", 0.0, 1.0),
            movement(3, "A", "B", 2.0, 3.0),
        ]
        .into_iter()
        .collect();
        group.insert(movement(7, "C", "B", 4.0, 5.0));

        let order: Vec<u32> = group.iter().map(|m| m.partition.value()).collect();
        assert_eq!(order, vec![7, 3]);
        assert_eq!(group.get(PartitionId::new(7)).map(|m| m.source.as_str()), Some("C"));
    }

    #[test]
    fn test_transfers_skip_self_loops() {
        let group: DestinationGroup = vec![
            movement(1, "A", "B", 0.0, 1.0),
            movement(2, "B", "B", 0.0, 1.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(group.len(), 2);
        assert_eq!(group.transfers().count(), 1);
    }
}
