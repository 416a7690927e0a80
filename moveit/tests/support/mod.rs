#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

/// A temporary directory holding one event log.
pub struct LogFixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

/// Write `lines` as a newline-delimited log named `name` in a fresh directory.
pub fn write_log(name: &str, lines: &[String]) -> LogFixture {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create log");
    for line in lines {
        writeln!(file, "{}", line).expect("write log line");
    }
    LogFixture { dir, path }
}

pub fn rebalance_start(ts: f64) -> String {
    format!(r#"{{"type":"rebalanceStart","ts":{}}}"#, ts)
}

pub fn move_start(bucket: &str, vbucket: u32, ts: f64, before: &[&str], after: &[&str]) -> String {
    format!(
        r#"{{"type":"vbucketMoveStart","bucket":"{}","vbucket":{},"ts":{},"chainBefore":{},"chainAfter":{}}}"#,
        bucket,
        vbucket,
        ts,
        serde_json::to_string(before).expect("chain json"),
        serde_json::to_string(after).expect("chain json"),
    )
}

pub fn move_done(bucket: &str, vbucket: u32, ts: f64) -> String {
    format!(
        r#"{{"type":"vbucketMoveDone","bucket":"{}","vbucket":{},"ts":{}}}"#,
        bucket, vbucket, ts
    )
}

/// Any other per-partition event, e.g. a backfill phase marker.
pub fn phase(kind: &str, bucket: &str, vbucket: u32, ts: f64) -> String {
    format!(
        r#"{{"type":"{}","bucket":"{}","vbucket":{},"ts":{}}}"#,
        kind, bucket, vbucket, ts
    )
}

/// One movement of partition 1 from A to B in bucket "b", lasting 40 seconds.
pub fn single_movement_log() -> Vec<String> {
    vec![
        rebalance_start(0.0),
        move_start("b", 1, 10.0, &["A:1"], &["B:1"]),
        move_done("b", 1, 50.0),
    ]
}
