//! Lap segmentation
//!
//! Logged lap counters cannot be trusted, so laps are cut where lap distance
//! drops from near the end of the circuit to near the start/finish line.
//! Segments too short to be a lap (out-lap fragments, logger restarts) are
//! dropped and do not consume a lap number.

use plap_core::{AnalysisError, Lap, TelemetrySample, Thresholds};
use std::ops::Range;
use tracing::{debug, info};

/// Split a session into laps at every lap distance reset
pub fn detect_laps<'a>(
    samples: &'a [TelemetrySample],
    thresholds: &Thresholds,
) -> Result<Vec<Lap<'a>>, AnalysisError> {
    let mut laps: Vec<Lap<'a>> = Vec::new();
    let close = |range: Range<usize>, laps: &mut Vec<Lap<'a>>| {
        if range.len() > thresholds.min_lap_samples {
            let lap_number = laps.len() as u32 + 1;
            laps.push(Lap::new(lap_number, range, samples));
        } else if !range.is_empty() {
            debug!(
                "Discarding {} samples at rows {}..{}: too short for a lap",
                range.len(),
                range.start,
                range.end
            );
        }
    };

    let mut current_lap_start = 0;
    for i in 1..samples.len() {
        let prev = samples[i - 1].lap_distance;
        let curr = samples[i].lap_distance;
        if prev > thresholds.lap_reset_high_distance && curr < thresholds.lap_reset_low_distance {
            close(current_lap_start..i, &mut laps);
            current_lap_start = i;
        }
    }
    close(current_lap_start..samples.len(), &mut laps);

    if laps.is_empty() {
        return Err(AnalysisError::NoLapsDetected);
    }

    info!("Detected {} laps", laps.len());
    Ok(laps)
}
