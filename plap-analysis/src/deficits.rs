//! Speed deficit sampling
//!
//! For each sector of the synthesized lap, the speed traces of every lap
//! through that sector are aligned by sample index and compared at a few
//! evenly spaced points. Where the best lap is clearly faster than the
//! average, the gap is reported.

use crate::sectors::extract_sector;
use plap_core::model::SpeedDeficitPoint;
use plap_core::{AnalysisConfig, Lap, Sector};

pub fn analyze_speed_deficits(
    winners: &[Sector<'_>],
    laps: &[Lap<'_>],
    config: &AnalysisConfig,
) -> Vec<SpeedDeficitPoint> {
    let t = &config.thresholds;
    let mut points = Vec::new();

    for winner in winners {
        let traces: Vec<Vec<f64>> = laps
            .iter()
            .filter_map(|lap| extract_sector(lap, winner.definition, winner.definition_index, t))
            .map(|sector| sector.samples.iter().map(|s| s.speed).collect())
            .collect();

        let Some(common_len) = traces.iter().map(Vec::len).min() else {
            continue;
        };
        let common_len = common_len.min(winner.samples.len());
        if common_len == 0 {
            continue;
        }

        let mut indices: Vec<usize> = (0..t.deficit_sample_points)
            .map(|k| k * common_len / t.deficit_sample_points)
            .collect();
        indices.dedup();

        for idx in indices {
            let speeds = traces.iter().map(|trace| trace[idx]);
            let avg_speed = speeds.clone().sum::<f64>() / traces.len() as f64;
            let best_speed = speeds.fold(f64::NEG_INFINITY, f64::max);
            let speed_loss = best_speed - avg_speed;

            if speed_loss > t.deficit_min_speed_loss {
                let distance = winner.samples[idx].lap_distance;
                points.push(SpeedDeficitPoint {
                    sector: winner.name().to_string(),
                    distance,
                    speed_loss,
                    best_speed,
                    avg_speed,
                    description: format!(
                        "{:.1} km/h slower than best at {:.0}m",
                        speed_loss, distance
                    ),
                });
            }
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::synthesize;
    use plap_core::{SectorDefinition, TelemetrySample, Thresholds};

    fn lap_samples(start_time: f64, speed: f64, count: usize) -> Vec<TelemetrySample> {
        (0..count)
            .map(|i| TelemetrySample {
                timestamp: start_time + i as f64,
                lap_distance: i as f64 * 10.0,
                speed,
                ..TelemetrySample::default()
            })
            .collect()
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::new(
            vec![SectorDefinition::open_ended("Lap", 0.0)],
            Thresholds::default(),
        )
    }

    #[test]
    fn test_reports_deficit_where_laps_are_slower() {
        let a = lap_samples(0.0, 140.0, 20);
        let b = lap_samples(100.0, 120.0, 25);
        let laps = vec![Lap::new(1, 0..20, &a), Lap::new(2, 0..25, &b)];
        let config = config();
        let synthesis = synthesize(&laps, &config).unwrap();

        let points = analyze_speed_deficits(&synthesis.winners, &laps, &config);
        // Common length 20: indices 0, 4, 8, 12, 16
        assert_eq!(points.len(), 5);
        assert_eq!(points[1].distance, 40.0);
        assert_eq!(points[0].best_speed, 140.0);
        assert_eq!(points[0].avg_speed, 130.0);
        assert_eq!(points[0].speed_loss, 10.0);
        assert_eq!(points[0].description, "10.0 km/h slower than best at 0m");
    }

    #[test]
    fn test_small_gaps_are_not_reported() {
        let a = lap_samples(0.0, 140.0, 20);
        let b = lap_samples(100.0, 132.0, 20);
        let laps = vec![Lap::new(1, 0..20, &a), Lap::new(2, 0..20, &b)];
        let config = config();
        let synthesis = synthesize(&laps, &config).unwrap();
        // Loss is exactly 4 km/h, below the 5 km/h floor
        assert!(analyze_speed_deficits(&synthesis.winners, &laps, &config).is_empty());
    }

    #[test]
    fn test_short_traces_dedup_indices() {
        let a = lap_samples(0.0, 150.0, 3);
        let b = lap_samples(10.0, 100.0, 3);
        let laps = vec![Lap::new(1, 0..3, &a), Lap::new(2, 0..3, &b)];
        let config = config();
        let synthesis = synthesize(&laps, &config).unwrap();
        // indices 0,0,1,1,2 collapse to 0,1,2
        let points = analyze_speed_deficits(&synthesis.winners, &laps, &config);
        assert_eq!(points.len(), 3);
    }
}
