use rayon::prelude::*;
use tracing::debug;

use crate::algorithms::{
    assign_lanes, count_movements, estimate_concurrency, normalize, phase_timelines, reconstruct,
    ConcurrencyEstimate, LaneAssignment, MovementCount, PhaseTimelines, Reconstruction,
};
use crate::config::AnalysisSettings;
use crate::error::{MoveitError, Result};
use crate::models::{Event, NodeId, TimeWindow};
use crate::parsing::EventLog;

/// Everything derived from one bucket's events.
///
/// Built once per bucket and never shared across buckets.
#[derive(Debug, Clone)]
pub struct BucketAnalysis {
    pub bucket: String,
    /// The bucket's events in timestamp order.
    pub events: Vec<Event>,
    pub reconstruction: Reconstruction,
    pub concurrency: ConcurrencyEstimate,
    pub movement_counts: MovementCount,
    pub settings: AnalysisSettings,
}

impl BucketAnalysis {
    /// Run normalization, reconstruction and estimation for one bucket.
    pub fn build(bucket: &str, events: &[Event], settings: AnalysisSettings) -> Self {
        let events = normalize(events);
        let reconstruction = reconstruct(&events);
        let concurrency = estimate_concurrency(&reconstruction.movements, settings.overlap_scope);
        let movement_counts = count_movements(&reconstruction.movements);

        let started = reconstruction
            .window()
            .map(|window| window.start.to_rfc3339())
            .unwrap_or_default();
        debug!(
            bucket,
            movements = reconstruction.movement_total(),
            started = %started,
            destinations = movement_counts.len(),
            "analysed bucket"
        );

        Self {
            bucket: bucket.to_string(),
            events,
            reconstruction,
            concurrency,
            movement_counts,
            settings,
        }
    }

    /// Time window of the drawn movements.
    ///
    /// Fails with a skippable error when there is nothing to lay out.
    pub fn window(&self) -> Result<TimeWindow> {
        if self.movement_counts.is_empty() {
            return Err(MoveitError::EmptyBucket {
                bucket: self.bucket.clone(),
            });
        }
        match self.reconstruction.window() {
            Some(window) if !window.is_degenerate() => Ok(window),
            _ => Err(MoveitError::DegenerateWindow {
                bucket: self.bucket.clone(),
            }),
        }
    }

    /// All source and destination nodes, sorted.
    pub fn nodes(&self) -> &[NodeId] {
        &self.reconstruction.nodes
    }

    /// Lane layout of the movements into `destination`.
    pub fn lanes_for(&self, destination: &NodeId) -> Option<LaneAssignment> {
        self.reconstruction.movements.get(destination).map(|group| {
            assign_lanes(
                group,
                self.concurrency.get(destination),
                self.settings.lane_strategy,
            )
        })
    }

    /// Per-partition phase lists for the hotspot report.
    pub fn phase_timelines(&self) -> PhaseTimelines {
        phase_timelines(&self.events)
    }
}

/// Analyse every bucket of `log` in parallel, keeping bucket order.
pub fn analyze_log(log: &EventLog, settings: AnalysisSettings) -> Vec<BucketAnalysis> {
    let buckets: Vec<(&str, &[Event])> = log.buckets().collect();
    buckets
        .into_par_iter()
        .map(|(bucket, events)| BucketAnalysis::build(bucket, events, settings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LaneStrategy, OverlapScope};
    use crate::parsing::parse_event_log_str;

    #[test]
    fn test_end_to_end_single_movement() {
        let log = parse_event_log_str(
            r#"{"type":"rebalanceStart","ts":0}
{"type":"vbucketMoveStart","vbucket":1,"bucket":"b","ts":10,"chainBefore":["A:1"],"chainAfter":["B:1"]}
{"type":"vbucketMoveDone","vbucket":1,"bucket":"b","ts":50}
"#,
        )
        .unwrap();
        let analyses = analyze_log(&log, AnalysisSettings::default());
        assert_eq!(analyses.len(), 1);

        let analysis = &analyses[0];
        assert_eq!(analysis.bucket, "b");
        assert_eq!(analysis.reconstruction.movement_total(), 1);
        let b = NodeId::parse("B");
        assert_eq!(analysis.concurrency.get(&b), 0);
        assert_eq!(analysis.movement_counts.get(&b), 1);

        let window = analysis.window().unwrap();
        assert_eq!(window.duration(), 40.0);
        assert_eq!(analysis.lanes_for(&b).unwrap().lane_count(), 1);
        assert!(analysis.lanes_for(&NodeId::parse("A")).is_none());
    }

    #[test]
    fn test_bucket_without_movements_is_skippable() {
        let events = vec![Event::move_start("b", 1, 10.0, &["A:1"], &["B:1"])];
        let analysis = BucketAnalysis::build("b", &events, AnalysisSettings::default());
        let err = analysis.window().unwrap_err();
        assert!(err.is_skippable());
        assert!(matches!(err, MoveitError::EmptyBucket { .. }));
    }

    #[test]
    fn test_zero_length_window_is_skippable() {
        let events = vec![
            Event::move_start("b", 1, 10.0, &["A:1"], &["B:1"]),
            Event::move_done("b", 1, 10.0),
        ];
        let analysis = BucketAnalysis::build("b", &events, AnalysisSettings::default());
        assert!(matches!(
            analysis.window(),
            Err(MoveitError::DegenerateWindow { .. })
        ));
    }

    #[test]
    fn test_settings_flow_through() {
        let events = vec![
            Event::move_start("b", 1, 0.0, &["A:1"], &["D:1"]),
            Event::move_start("b", 2, 5.0, &["C:1"], &["D:1"]),
            Event::move_done("b", 1, 10.0),
            Event::move_done("b", 2, 15.0),
        ];
        let settings = AnalysisSettings {
            overlap_scope: OverlapScope::Source,
            lane_strategy: LaneStrategy::FirstFit,
        };
        let analysis = BucketAnalysis::build("b", &events, settings);
        let d = NodeId::parse("D");
        assert_eq!(analysis.concurrency.get(&d), 0);
        assert_eq!(analysis.lanes_for(&d).unwrap().lane_count(), 2);
    }

    #[test]
    fn test_buckets_analysed_in_log_order() {
        let log = parse_event_log_str(
            r#"{"type":"x","bucket":"second","ts":1}
{"type":"x","bucket":"first","ts":0}
"#,
        )
        .unwrap();
        let names: Vec<String> = analyze_log(&log, AnalysisSettings::default())
            .into_iter()
            .map(|a| a.bucket)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }
}
