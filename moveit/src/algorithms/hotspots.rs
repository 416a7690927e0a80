use super::normalizer::Phase;
use crate::models::{EventKind, Timestamp};

/// A gap between two consecutive phases that took a large share of the move.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub from: EventKind,
    pub to: EventKind,
    /// Gap length as a percentage of the total move time.
    pub share: f64,
}

/// Time from the partition's last move start to its last move done.
///
/// `None` when either event is missing or the result is not positive.
pub fn total_move_time(timeline: &[Phase]) -> Option<f64> {
    let mut start: Option<Timestamp> = None;
    let mut done: Option<Timestamp> = None;
    for phase in timeline {
        match phase.kind {
            EventKind::MoveStart => start = Some(phase.ts),
            EventKind::MoveDone => done = Some(phase.ts),
            _ => {}
        }
    }

    let total = done? - start?;
    (total > 0.0).then_some(total)
}

/// Consecutive phases separated by more than `threshold` percent of `total`.
///
/// Fast-forward map updates are bucket-wide bookkeeping and are skipped.
pub fn find_hotspots(timeline: &[Phase], total: f64, threshold: f64) -> Vec<Hotspot> {
    let mut hotspots = Vec::new();
    let mut previous: Option<&Phase> = None;

    for phase in timeline {
        if phase.kind == EventKind::FastForwardUpdate {
            continue;
        }
        if let Some(prev) = previous {
            let share = 100.0 * (phase.ts - prev.ts) / total;
            if share > threshold {
                hotspots.push(Hotspot {
                    from: prev.kind.clone(),
                    to: phase.kind.clone(),
                    share,
                });
            }
        }
        previous = Some(phase);
    }

    hotspots
}
