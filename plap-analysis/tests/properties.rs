//! Property tests over generated layouts and sessions

use plap_analysis::analyze_samples;
use plap_analysis::consistency::analyze_consistency;
use plap_core::{AnalysisConfig, Lap, SectorDefinition, TelemetrySample, Thresholds};
use proptest::prelude::*;

fn layout(cuts: &[u32]) -> Vec<SectorDefinition> {
    let mut bounds: Vec<f64> = cuts.iter().map(|c| *c as f64).collect();
    bounds.sort_by(f64::total_cmp);
    bounds.dedup();

    let mut sectors = Vec::new();
    let mut start = 0.0;
    for (i, end) in bounds.iter().enumerate() {
        sectors.push(SectorDefinition::new(format!("S{}", i + 1), start, *end));
        start = *end;
    }
    sectors.push(SectorDefinition::open_ended(format!("S{}", bounds.len() + 1), start));
    sectors
}

/// Laps sampled every 25m to 3400m, one speed per 1000m block
fn session(lap_speeds: &[[f64; 4]]) -> Vec<TelemetrySample> {
    let mut samples = Vec::new();
    let mut t = 0.0;
    for speeds in lap_speeds {
        for i in 0..=136 {
            let distance = i as f64 * 25.0;
            let speed = speeds[((distance / 1000.0) as usize).min(3)];
            samples.push(TelemetrySample {
                timestamp: t,
                lap_distance: distance,
                speed,
                ..TelemetrySample::default()
            });
            t += 25.0 / (speed / 3.6);
        }
    }
    samples
}

proptest! {
    #[test]
    fn layouts_partition_the_distance_domain(
        cuts in prop::collection::vec(1u32..5000, 0..6),
        distance in 0.0f64..100_000.0,
    ) {
        let config = AnalysisConfig::new(layout(&cuts), Thresholds::default());
        prop_assert!(config.validate().is_ok());
        let owners = config.sectors.iter().filter(|s| s.contains(distance)).count();
        prop_assert_eq!(owners, 1);
    }

    #[test]
    fn consistency_score_is_bounded(lap_times in prop::collection::vec(1.0f64..400.0, 1..12)) {
        let mut samples = Vec::new();
        let mut start = 0.0;
        for lap_time in &lap_times {
            samples.push(TelemetrySample { timestamp: start, ..TelemetrySample::default() });
            samples.push(TelemetrySample { timestamp: start + lap_time, ..TelemetrySample::default() });
            start += lap_time;
        }
        let laps: Vec<_> = (0..lap_times.len())
            .map(|i| Lap::new(i as u32 + 1, 2 * i..2 * i + 2, &samples))
            .collect();
        let metrics = analyze_consistency(&laps, &Thresholds::default());
        prop_assert!((0.0..=100.0).contains(&metrics.consistency_score));
        prop_assert!(metrics.per_lap_deviation.iter().all(|d| *d >= 0.0));
    }

    #[test]
    fn synthesized_lap_invariants_hold(
        lap_speeds in prop::collection::vec(prop::array::uniform4(60.0f64..180.0), 1..5),
        cuts in prop::collection::vec(100u32..3300, 1..5),
    ) {
        let samples = session(&lap_speeds);
        let config = AnalysisConfig::new(layout(&cuts), Thresholds::default());

        // Every sector drafting on every lap is a legitimate failure
        if let Ok(result) = analyze_samples(&samples, &config) {
            let sum: f64 = result.sector_stats.iter().map(|s| s.best_time).sum();
            prop_assert_eq!(result.theoretical_time, sum);
            prop_assert!(result.sector_stats.iter().all(|s| s.time_gain >= 0.0));
            prop_assert!((0.0..=100.0).contains(&result.consistency.consistency_score));
            prop_assert!(result.improvement_areas.len() <= 8);
            prop_assert_eq!(result.lap_summaries.len(), lap_speeds.len());

            let again = analyze_samples(&samples, &config).unwrap();
            prop_assert_eq!(result, again);
        }
    }
}
