#[cfg(test)]
mod tests {
    use crate::error::MoveitError;
    use crate::models::{EventKind, PartitionId};
    use crate::parsing::event_log::{parse_event_log_str, read_event_log};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SIMPLE_LOG: &str = r#"{"type":"rebalanceStart","ts":0}
{"type":"vbucketMoveStart","bucket":"b","vbucket":1,"ts":10,"chainBefore":["A:1"],"chainAfter":["B:1"]}
{"type":"vbucketMoveDone","bucket":"b","vbucket":1,"ts":50}
"#;

    /// Test decoding a minimal rebalance
    #[test]
    fn test_parse_simple_log() {
        let log = parse_event_log_str(SIMPLE_LOG).unwrap();
        assert_eq!(log.len(), 1);

        let events = log.bucket("b").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::MoveStart);
        assert_eq!(events[0].partition, Some(PartitionId::new(1)));
        assert_eq!(events[0].chain_before.primary().unwrap().as_str(), "A");
        assert_eq!(events[0].chain_after.primary().unwrap().as_str(), "B");
        assert_eq!(events[1].kind, EventKind::MoveDone);
        assert_eq!(events[1].ts.value(), 50.0);
    }

    /// Only events after the last rebalanceStart survive
    #[test]
    fn test_last_rebalance_only() {
        let log = r#"{"type":"rebalanceStart","ts":0}
{"type":"vbucketMoveStart","bucket":"old","vbucket":1,"ts":1,"chainBefore":["A:1"],"chainAfter":["B:1"]}
{"type":"vbucketMoveDone","bucket":"old","vbucket":1,"ts":2}
{"type":"rebalanceStart","ts":100}
{"type":"vbucketMoveStart","bucket":"new","vbucket":2,"ts":101,"chainBefore":["A:1"],"chainAfter":["C:1"]}
"#;
        let log = parse_event_log_str(log).unwrap();
        assert!(log.bucket("old").is_none());
        assert_eq!(log.bucket("new").unwrap().len(), 1);
    }

    /// A rebalanceStart carrying a bucket is itself kept
    #[test]
    fn test_rebalance_start_with_bucket_is_kept() {
        let log = r#"{"type":"rebalanceStart","bucket":"b","ts":5}
"#;
        let log = parse_event_log_str(log).unwrap();
        let events = log.bucket("b").unwrap();
        assert_eq!(events[0].kind, EventKind::RebalanceStart);
    }

    /// Events without a usable bucket are dropped
    #[test]
    fn test_undefined_bucket_dropped() {
        let log = r#"{"type":"vbucketMoveStart","bucket":"undefined","vbucket":1,"ts":1,"chainBefore":["A:1"],"chainAfter":["B:1"]}
{"type":"someNodeEvent","ts":2}
{"type":"updateFastForwardMap","bucket":"b","ts":3}
"#;
        let log = parse_event_log_str(log).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.total_events(), 1);
        assert_eq!(log.bucket("b").unwrap()[0].kind, EventKind::FastForwardUpdate);
    }

    /// Buckets keep the order of first appearance
    #[test]
    fn test_bucket_order() {
        let log = r#"{"type":"x","bucket":"zeta","ts":1}
{"type":"x","bucket":"alpha","ts":2}
{"type":"x","bucket":"zeta","ts":3}
"#;
        let log = parse_event_log_str(log).unwrap();
        let names: Vec<&str> = log.buckets().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    /// Blank lines are tolerated
    #[test]
    fn test_blank_lines_skipped() {
        let log = "\n{\"type\":\"x\",\"bucket\":\"b\",\"ts\":1}\n   \n";
        let log = parse_event_log_str(log).unwrap();
        assert_eq!(log.total_events(), 1);
    }

    /// Invalid JSON aborts with the line number
    #[test]
    fn test_malformed_line_is_fatal() {
        let log = r#"{"type":"rebalanceStart","ts":0}
{"type":"vbucketMoveStart", oops}
"#;
        let err = parse_event_log_str(log).unwrap_err();
        match err {
            MoveitError::MalformedEvent { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    /// Move events must carry a partition id
    #[test]
    fn test_move_done_without_vbucket() {
        let log = r#"{"type":"vbucketMoveDone","bucket":"b","ts":3}
"#;
        let err = parse_event_log_str(log).unwrap_err();
        assert!(matches!(
            err,
            MoveitError::MissingField {
                line: 1,
                field: "vbucket"
            }
        ));
    }

    /// Move starts must carry both chains
    #[test]
    fn test_move_start_without_chain() {
        let log = r#"{"type":"vbucketMoveStart","bucket":"b","vbucket":4,"ts":3,"chainBefore":["A:1"]}
"#;
        let err = parse_event_log_str(log).unwrap_err();
        assert!(err.to_string().contains("chainAfter"));
    }

    /// Kept events need a timestamp
    #[test]
    fn test_missing_ts() {
        let log = r#"{"type":"backfillPhaseEnded","bucket":"b","vbucket":4}
"#;
        let err = parse_event_log_str(log).unwrap_err();
        assert!(matches!(err, MoveitError::MissingField { field: "ts", .. }));
    }

    /// Null replica slots decode as "undefined" nodes
    #[test]
    fn test_null_chain_entries() {
        let log = r#"{"type":"vbucketMoveStart","bucket":"b","vbucket":0,"ts":1,"chainBefore":["A:1",null],"chainAfter":["B:1","A:1"]}
"#;
        let log = parse_event_log_str(log).unwrap();
        let event = &log.bucket("b").unwrap()[0];
        assert_eq!(event.partition, Some(PartitionId::new(0)));
        assert_eq!(event.chain_before.nodes()[1].as_str(), "undefined");
    }

    /// Reading from disk
    #[test]
    fn test_read_event_log_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SIMPLE_LOG.as_bytes()).unwrap();
        let log = read_event_log(file.path()).unwrap();
        assert_eq!(log.total_events(), 2);
    }

    /// Missing file reports the path
    #[test]
    fn test_read_event_log_missing_file() {
        let err = read_event_log(std::path::Path::new("/no/such/master_events.log")).unwrap_err();
        assert!(err.to_string().contains("master_events.log"));
    }
}
