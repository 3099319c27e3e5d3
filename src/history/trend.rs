// =============================================================================
// Snapshot Trends — Deltas between consecutive history entries
// =============================================================================

use serde::Serialize;

use crate::history::snapshot::Snapshot;

/// One history entry annotated with its movement since the previous capture.
///
/// Deltas are current minus previous-in-time, computed on whole-number
/// rounded values. Whether a falling risk delta is "good" is a presentation
/// concern left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub snapshot: Snapshot,
    pub risk_delta: i64,
    pub confidence_delta: i64,
}

/// Annotate a newest-first snapshot slice with per-entry deltas.
///
/// The previous capture of entry `i` is entry `i + 1`; the oldest entry has
/// no predecessor and reports zero deltas.
pub fn trend(snapshots: &[Snapshot]) -> Vec<TrendPoint> {
    snapshots
        .iter()
        .enumerate()
        .map(|(i, snapshot)| {
            let risk = snapshot.risk_score.round() as i64;
            let confidence = snapshot.confidence.round() as i64;

            let (risk_delta, confidence_delta) = match snapshots.get(i + 1) {
                Some(prev) => (
                    risk - prev.risk_score.round() as i64,
                    confidence - prev.confidence.round() as i64,
                ),
                None => (0, 0),
            };

            TrendPoint {
                snapshot: snapshot.clone(),
                risk_delta,
                confidence_delta,
            }
        })
        .collect()
}
