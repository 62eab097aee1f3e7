//! Braking and acceleration zone extraction
//!
//! Each lap is scanned once per zone kind with a simple in-zone flag. A zone
//! is committed when the condition stops holding, provided it lasted longer
//! than the debounce length. A zone still open when the lap ends is not
//! committed.

use plap_core::model::{AccelerationZone, BrakingZone};
use plap_core::{AnalysisConfig, Lap, TelemetrySample};
use std::ops::Range;

/// Index ranges over which `active` held for more than `min_samples` samples
pub fn scan_zones(
    samples: &[TelemetrySample],
    active: impl Fn(&TelemetrySample) -> bool,
    min_samples: usize,
) -> Vec<Range<usize>> {
    let mut zones = Vec::new();
    let mut in_zone = false;
    let mut zone_start = 0;

    for (i, sample) in samples.iter().enumerate() {
        let on = active(sample);
        if on && !in_zone {
            in_zone = true;
            zone_start = i;
        } else if !on && in_zone {
            in_zone = false;
            if i - zone_start > min_samples {
                zones.push(zone_start..i);
            }
        }
    }

    zones
}

struct ZoneShape<'a> {
    sector: String,
    distance: f64,
    entry_speed: f64,
    exit_speed: f64,
    samples: &'a [TelemetrySample],
}

fn shape<'a>(lap: &Lap<'a>, range: Range<usize>, config: &AnalysisConfig) -> ZoneShape<'a> {
    let samples = &lap.samples[range];
    let mid = &samples[samples.len() / 2];
    ZoneShape {
        sector: config.sector_name_for(mid.lap_distance).to_string(),
        distance: mid.lap_distance,
        entry_speed: samples[0].speed,
        exit_speed: samples[samples.len() - 1].speed,
        samples,
    }
}

fn mean(samples: &[TelemetrySample], value: impl Fn(&TelemetrySample) -> f64) -> f64 {
    samples.iter().map(value).sum::<f64>() / samples.len() as f64
}

pub fn braking_zones(laps: &[Lap<'_>], config: &AnalysisConfig) -> Vec<BrakingZone> {
    let t = &config.thresholds;
    laps.iter()
        .flat_map(|lap| {
            scan_zones(
                lap.samples,
                |s| s.front_brake_pressure > t.braking_pressure,
                t.zone_min_samples,
            )
            .into_iter()
            .map(move |range| {
                let zone = shape(lap, range, config);
                BrakingZone {
                    avg_pressure: mean(zone.samples, |s| s.front_brake_pressure),
                    sector: zone.sector,
                    distance: zone.distance,
                    entry_speed: zone.entry_speed,
                    exit_speed: zone.exit_speed,
                    lap_number: lap.lap_number,
                }
            })
        })
        .collect()
}

pub fn acceleration_zones(laps: &[Lap<'_>], config: &AnalysisConfig) -> Vec<AccelerationZone> {
    let t = &config.thresholds;
    laps.iter()
        .flat_map(|lap| {
            scan_zones(
                lap.samples,
                |s| {
                    s.throttle_position > t.acceleration_throttle
                        && s.front_brake_pressure < t.acceleration_max_brake
                },
                t.zone_min_samples,
            )
            .into_iter()
            .map(move |range| {
                let zone = shape(lap, range, config);
                AccelerationZone {
                    avg_throttle: mean(zone.samples, |s| s.throttle_position),
                    sector: zone.sector,
                    distance: zone.distance,
                    entry_speed: zone.entry_speed,
                    exit_speed: zone.exit_speed,
                    lap_number: lap.lap_number,
                }
            })
        })
        .collect()
}
