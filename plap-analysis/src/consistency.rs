//! Lap-to-lap consistency scoring

use plap_core::model::ConsistencyMetrics;
use plap_core::{Lap, Thresholds};

/// Spread of lap times and a 0-100 score penalising standard deviation
pub fn analyze_consistency(laps: &[Lap<'_>], thresholds: &Thresholds) -> ConsistencyMetrics {
    if laps.is_empty() {
        return ConsistencyMetrics {
            avg_lap_time: 0.0,
            best_lap_time: 0.0,
            worst_lap_time: 0.0,
            std_deviation: 0.0,
            per_lap_deviation: Vec::new(),
            consistency_score: 100.0,
        };
    }

    let times: Vec<f64> = laps.iter().map(|lap| lap.lap_time).collect();
    let n = times.len() as f64;
    let avg = times.iter().sum::<f64>() / n;
    let best = times.iter().copied().fold(f64::INFINITY, f64::min);
    let worst = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Population variance
    let variance = times.iter().map(|t| (t - avg).powi(2)).sum::<f64>() / n;
    let std_deviation = variance.sqrt();

    let score = 100.0 - std_deviation * thresholds.consistency_penalty_per_second;

    ConsistencyMetrics {
        avg_lap_time: avg,
        best_lap_time: best,
        worst_lap_time: worst,
        std_deviation,
        per_lap_deviation: times.iter().map(|t| t - best).collect(),
        consistency_score: score.clamp(0.0, 100.0),
    }
}
