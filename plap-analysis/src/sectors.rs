//! Sector slicing

use plap_core::{Lap, Sector, SectorDefinition, Thresholds};

/// Cut one lap's pass through one sector
///
/// Returns `None` when fewer than the configured minimum of samples fall in
/// `[start, end)`.
pub fn extract_sector<'a>(
    lap: &Lap<'_>,
    definition: &'a SectorDefinition,
    definition_index: usize,
    thresholds: &Thresholds,
) -> Option<Sector<'a>> {
    let samples: Vec<_> = lap
        .samples
        .iter()
        .filter(|s| definition.contains(s.lap_distance))
        .copied()
        .collect();

    if samples.len() < thresholds.min_sector_samples.max(2) {
        return None;
    }

    let first = samples.first()?;
    let last = samples.last()?;
    let time = last.timestamp - first.timestamp;
    let max_speed = samples
        .iter()
        .map(|s| s.speed)
        .fold(f64::NEG_INFINITY, f64::max);

    Some(Sector {
        definition,
        definition_index,
        lap_number: lap.lap_number,
        time,
        max_speed,
        samples,
    })
}
