//! Theoretical best lap synthesis
//!
//! For every sector of the layout the fastest non-drafting pass across all
//! laps is kept. The synthesized lap is the concatenation of those passes; its
//! time is the sum of their times.

use crate::drafting::is_drafting;
use crate::sectors::extract_sector;
use plap_core::model::{ChartPoint, SectorStat};
use plap_core::{AnalysisConfig, AnalysisError, Lap, Sector};
use tracing::{debug, info};

/// Winning sector passes and their derived statistics
#[derive(Debug, Clone)]
pub struct Synthesis<'a> {
    /// One per sector that had a surviving pass, in layout order
    pub winners: Vec<Sector<'a>>,
    pub sector_stats: Vec<SectorStat>,
    pub theoretical_time: f64,
    pub chart_data: Vec<ChartPoint>,
}

pub fn synthesize<'a>(
    laps: &[Lap<'_>],
    config: &'a AnalysisConfig,
) -> Result<Synthesis<'a>, AnalysisError> {
    let thresholds = &config.thresholds;
    let mut winners = Vec::new();
    let mut sector_stats = Vec::new();

    for (idx, definition) in config.sectors.iter().enumerate() {
        let candidates: Vec<Sector<'a>> = laps
            .iter()
            .filter_map(|lap| extract_sector(lap, definition, idx, thresholds))
            .filter(|sector| {
                let drafting = is_drafting(sector, thresholds);
                if drafting {
                    debug!(
                        "Excluding {} on lap {}: top speed {:.1} suggests drafting",
                        sector.name(),
                        sector.lap_number,
                        sector.max_speed
                    );
                }
                !drafting
            })
            .collect();

        // Strict comparison keeps the earliest lap on exact ties
        let mut best: Option<&Sector<'a>> = None;
        for candidate in &candidates {
            if best.map_or(true, |b| candidate.time < b.time) {
                best = Some(candidate);
            }
        }
        let Some(best) = best else {
            debug!("No valid pass through {} on any lap", definition.name);
            continue;
        };

        let mean_time =
            candidates.iter().map(|s| s.time).sum::<f64>() / candidates.len() as f64;

        sector_stats.push(SectorStat {
            sector_name: definition.name.clone(),
            best_time: best.time,
            lap_number: best.lap_number,
            time_gain: (mean_time - best.time).max(0.0),
            avg_speed: best.avg_speed(),
        });
        winners.push(best.clone());
    }

    if winners.is_empty() {
        return Err(AnalysisError::NoValidSectors);
    }

    let theoretical_time = sector_stats.iter().map(|s| s.best_time).sum();

    let chart_data = winners
        .iter()
        .flat_map(|sector| {
            sector.samples.iter().map(move |s| ChartPoint {
                distance: s.lap_distance,
                speed: s.speed,
                sector_name: sector.name().to_string(),
            })
        })
        .collect();

    info!(
        "Synthesized theoretical lap of {:.3}s from {} sectors",
        theoretical_time,
        winners.len()
    );

    Ok(Synthesis {
        winners,
        sector_stats,
        theoretical_time,
        chart_data,
    })
}
