//! Corner apex extraction
//!
//! The apex of a sector pass is taken to be its minimum-speed sample.

use crate::sectors::extract_sector;
use plap_core::model::CornerObservation;
use plap_core::{AnalysisConfig, Lap};

pub fn analyze_corners(laps: &[Lap<'_>], config: &AnalysisConfig) -> Vec<CornerObservation> {
    let t = &config.thresholds;
    let mut observations = Vec::new();

    for lap in laps {
        for (idx, definition) in config.sectors.iter().enumerate() {
            let Some(sector) = extract_sector(lap, definition, idx, t) else {
                continue;
            };
            if sector.samples.len() < t.corner_min_samples {
                continue;
            }
            // min_by keeps the first of equal minima
            let Some(apex) = sector
                .samples
                .iter()
                .min_by(|a, b| a.speed.total_cmp(&b.speed))
            else {
                continue;
            };
            let (Some(entry), Some(exit)) = (sector.samples.first(), sector.samples.last()) else {
                continue;
            };

            observations.push(CornerObservation {
                sector: definition.name.clone(),
                distance: apex.lap_distance,
                min_speed: apex.speed,
                lap_number: lap.lap_number,
                entry_speed: entry.speed,
                exit_speed: exit.speed,
            });
        }
    }

    observations
}

#[cfg(test)]
mod tests {
    use super::*;
    use plap_core::{SectorDefinition, TelemetrySample, Thresholds};

    fn config() -> AnalysisConfig {
        AnalysisConfig::new(
            vec![
                SectorDefinition::new("Straight", 0.0, 100.0),
                SectorDefinition::open_ended("Hairpin", 100.0),
            ],
            Thresholds::default(),
        )
    }

    fn samples(speeds: &[(f64, f64)]) -> Vec<TelemetrySample> {
        speeds
            .iter()
            .enumerate()
            .map(|(i, (distance, speed))| TelemetrySample {
                timestamp: i as f64,
                lap_distance: *distance,
                speed: *speed,
                ..TelemetrySample::default()
            })
            .collect()
    }

    #[test]
    fn test_apex_is_minimum_speed_point() {
        let data = samples(&[
            (0.0, 150.0),
            (50.0, 140.0),
            (100.0, 120.0),
            (120.0, 90.0),
            (140.0, 62.0),
            (160.0, 70.0),
            (180.0, 95.0),
        ]);
        let lap = Lap::new(3, 0..data.len(), &data);
        let corners = analyze_corners(std::slice::from_ref(&lap), &config());

        // Straight has only 2 samples and is skipped
        assert_eq!(corners.len(), 1);
        let apex = &corners[0];
        assert_eq!(apex.sector, "Hairpin");
        assert_eq!(apex.distance, 140.0);
        assert_eq!(apex.min_speed, 62.0);
        assert_eq!(apex.entry_speed, 120.0);
        assert_eq!(apex.exit_speed, 95.0);
        assert_eq!(apex.lap_number, 3);
    }

    #[test]
    fn test_equal_minima_keep_first() {
        let data = samples(&[
            (100.0, 80.0),
            (110.0, 60.0),
            (120.0, 70.0),
            (130.0, 60.0),
            (140.0, 90.0),
        ]);
        let lap = Lap::new(1, 0..data.len(), &data);
        let corners = analyze_corners(std::slice::from_ref(&lap), &config());
        assert_eq!(corners[0].distance, 110.0);
    }

    #[test]
    fn test_four_samples_are_not_enough() {
        let data = samples(&[(100.0, 80.0), (110.0, 60.0), (120.0, 70.0), (130.0, 90.0)]);
        let lap = Lap::new(1, 0..data.len(), &data);
        assert!(analyze_corners(std::slice::from_ref(&lap), &config()).is_empty());
    }
}
