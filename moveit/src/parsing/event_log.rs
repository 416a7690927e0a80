use indexmap::IndexMap;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::error::{MoveitError, Result};
use crate::models::{Chain, Event, EventKind, PartitionId, Timestamp};

/// Bucket value the cluster manager writes for events outside any bucket.
const UNDEFINED_BUCKET: &str = "undefined";

/// Raw JSON structure of one master event line.
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    ts: Option<f64>,
    bucket: Option<String>,
    vbucket: Option<u32>,
    #[serde(rename = "chainBefore")]
    chain_before: Option<Vec<Option<String>>>,
    #[serde(rename = "chainAfter")]
    chain_after: Option<Vec<Option<String>>>,
}

/// Events of the most recent rebalance, grouped by bucket in order of first
/// appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    buckets: IndexMap<String, Vec<Event>>,
}

impl EventLog {
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[Event])> {
        self.buckets
            .iter()
            .map(|(name, events)| (name.as_str(), events.as_slice()))
    }

    pub fn bucket(&self, name: &str) -> Option<&[Event]> {
        self.buckets.get(name).map(Vec::as_slice)
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_events(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Read and decode an event log file.
pub fn read_event_log(path: &Path) -> Result<EventLog> {
    let file = File::open(path).map_err(|e| MoveitError::io(path, e))?;
    parse_event_log(BufReader::new(file)).map_err(|e| match e {
        MoveitError::Io { source, .. } => MoveitError::io(path, source),
        other => other,
    })
}

/// Decode an event log from a string.
pub fn parse_event_log_str(log: &str) -> Result<EventLog> {
    parse_event_log(log.as_bytes())
}

/// Decode newline-delimited JSON events.
///
/// A `rebalanceStart` event discards everything collected so far, so only the
/// last rebalance in the log survives. Events without a bucket are dropped.
/// Any undecodable line aborts the whole parse.
pub fn parse_event_log<R: BufRead>(reader: R) -> Result<EventLog> {
    let mut buckets: IndexMap<String, Vec<Event>> = IndexMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| MoveitError::io("<event log>", e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let raw: RawEvent = serde_json::from_str(line).map_err(|source| {
            MoveitError::MalformedEvent {
                line: line_no,
                source,
            }
        })?;

        let kind = EventKind::from(raw.kind.as_str());
        if kind == EventKind::RebalanceStart {
            buckets.clear();
        }

        let bucket = match raw.bucket.as_deref() {
            None | Some(UNDEFINED_BUCKET) => continue,
            Some(bucket) => bucket.to_string(),
        };

        let event = convert_raw_event(raw, kind, bucket.clone(), line_no)?;
        buckets.entry(bucket).or_default().push(event);
    }

    let log = EventLog { buckets };
    debug!(
        buckets = log.len(),
        events = log.total_events(),
        "decoded event log"
    );
    Ok(log)
}

fn require<T>(value: Option<T>, line: usize, field: &'static str) -> Result<T> {
    value.ok_or(MoveitError::MissingField { line, field })
}

/// Convert a raw line into a domain event, checking the fields its type needs.
fn convert_raw_event(
    raw: RawEvent,
    kind: EventKind,
    bucket: String,
    line: usize,
) -> Result<Event> {
    let ts = Timestamp::new(require(raw.ts, line, "ts")?);

    let (partition, chain_before, chain_after) = match kind {
        EventKind::MoveStart => (
            Some(require(raw.vbucket, line, "vbucket")?),
            Chain::from_addresses(require(raw.chain_before, line, "chainBefore")?),
            Chain::from_addresses(require(raw.chain_after, line, "chainAfter")?),
        ),
        EventKind::MoveDone => (
            Some(require(raw.vbucket, line, "vbucket")?),
            Chain::default(),
            Chain::default(),
        ),
        _ => (
            raw.vbucket,
            raw.chain_before.map(Chain::from_addresses).unwrap_or_default(),
            raw.chain_after.map(Chain::from_addresses).unwrap_or_default(),
        ),
    };

    Ok(Event {
        kind,
        ts,
        bucket,
        partition: partition.map(PartitionId::new),
        chain_before,
        chain_after,
    })
}
