use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::time::Timestamp;

/// Master event types the analyzer reacts to.
///
/// Every other type is kept verbatim in [`EventKind::Other`] so that phase
/// timelines can still name it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    RebalanceStart,
    MoveStart,
    MoveDone,
    FastForwardUpdate,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::RebalanceStart => "rebalanceStart",
            EventKind::MoveStart => "vbucketMoveStart",
            EventKind::MoveDone => "vbucketMoveDone",
            EventKind::FastForwardUpdate => "updateFastForwardMap",
            EventKind::Other(name) => name,
        }
    }
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        match name {
            "rebalanceStart" => EventKind::RebalanceStart,
            "vbucketMoveStart" => EventKind::MoveStart,
            "vbucketMoveDone" => EventKind::MoveDone,
            "updateFastForwardMap" => EventKind::FastForwardUpdate,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partition (vbucket) number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionId(u32);

impl PartitionId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // honour width/alignment flags so reports can right-align ids
        fmt::Display::fmt(&self.0, f)
    }
}

/// Cluster node name with the port suffix removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(String);

impl NodeId {
    /// Parse a chain entry such as `ns_1@10.1.2.3:8091`.
    ///
    /// Only a trailing all-digit suffix after the last `:` is treated as a port.
    pub fn parse(address: &str) -> Self {
        match address.rsplit_once(':') {
            Some((host, port))
                if !host.is_empty()
                    && !port.is_empty()
                    && port.bytes().all(|b| b.is_ascii_digit()) =>
            {
                NodeId(host.to_string())
            }
            _ => NodeId(address.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for NodeId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NodeId::parse(s))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replica placement for a partition; the first entry is the active copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain(Vec<NodeId>);

impl Chain {
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self(nodes)
    }

    /// Build a chain from raw addresses; missing replicas are named `undefined`.
    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        Self(
            addresses
                .into_iter()
                .map(|entry| match entry {
                    Some(address) => NodeId::parse(address.as_ref()),
                    None => NodeId::parse("undefined"),
                })
                .collect(),
        )
    }

    pub fn primary(&self) -> Option<&NodeId> {
        self.0.first()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when both chains hold the same nodes, ignoring order.
    ///
    /// Such a move only reshuffles replicas and transfers no data.
    pub fn same_members(&self, other: &Chain) -> bool {
        let mut lhs: Vec<&NodeId> = self.0.iter().collect();
        let mut rhs: Vec<&NodeId> = other.0.iter().collect();
        lhs.sort();
        rhs.sort();
        lhs == rhs
    }
}

/// One decoded master event line.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub ts: Timestamp,
    pub bucket: String,
    pub partition: Option<PartitionId>,
    pub chain_before: Chain,
    pub chain_after: Chain,
}

impl Event {
    /// Event with no partition or chains attached.
    pub fn new(kind: EventKind, ts: impl Into<Timestamp>, bucket: impl Into<String>) -> Self {
        Self {
            kind,
            ts: ts.into(),
            bucket: bucket.into(),
            partition: None,
            chain_before: Chain::default(),
            chain_after: Chain::default(),
        }
    }

    pub fn with_partition(mut self, partition: u32) -> Self {
        self.partition = Some(PartitionId::new(partition));
        self
    }

    pub fn with_chains(mut self, before: &[&str], after: &[&str]) -> Self {
        self.chain_before = Chain::from_addresses(before.iter().map(Some));
        self.chain_after = Chain::from_addresses(after.iter().map(Some));
        self
    }

    /// A `vbucketMoveStart` event.
    pub fn move_start(
        bucket: &str,
        partition: u32,
        ts: f64,
        before: &[&str],
        after: &[&str],
    ) -> Self {
        Event::new(EventKind::MoveStart, ts, bucket)
            .with_partition(partition)
            .with_chains(before, after)
    }

    /// A `vbucketMoveDone` event.
    pub fn move_done(bucket: &str, partition: u32, ts: f64) -> Self {
        Event::new(EventKind::MoveDone, ts, bucket).with_partition(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_strips_port() {
        assert_eq!(NodeId::parse("ns_1@10.1.2.3:8091").as_str(), "ns_1@10.1.2.3");
        assert_eq!(NodeId::parse("A:1").as_str(), "A");
    }

    #[test]
    fn test_node_id_without_port() {
        assert_eq!(NodeId::parse("ns_1@node-a").as_str(), "ns_1@node-a");
        assert_eq!(NodeId::parse("host:http").as_str(), "host:http");
        assert_eq!(NodeId::parse(":8091").as_str(), ":8091");
    }

    #[test]
    fn test_event_kind_round_trip_names() {
        for name in [
            "rebalanceStart",
            "vbucketMoveStart",
            "vbucketMoveDone",
            "updateFastForwardMap",
            "backfillPhaseEnded",
        ] {
            assert_eq!(EventKind::from(name).to_string(), name);
        }
        assert_eq!(
            EventKind::from("seqnoWaitingStarted"),
            EventKind::Other("seqnoWaitingStarted".to_string())
        );
    }

    #[test]
    fn test_chain_same_members_ignores_order() {
        let a = Chain::from_addresses([Some("A:1"), Some("B:1")]);
        let b = Chain::from_addresses([Some("B:2"), Some("A:2")]);
        let c = Chain::from_addresses([Some("A:1"), Some("C:1")]);
        assert!(a.same_members(&b));
        assert!(!a.same_members(&c));
    }

    #[test]
    fn test_chain_missing_replica() {
        let chain = Chain::from_addresses([Some("A:1"), None::<&str>]);
        assert_eq!(chain.nodes()[1].as_str(), "undefined");
        assert_eq!(chain.primary().map(NodeId::as_str), Some("A"));
    }

    #[test]
    fn test_partition_display_width() {
        assert_eq!(format!("{:>8}", PartitionId::new(42)), "      42");
    }
}
