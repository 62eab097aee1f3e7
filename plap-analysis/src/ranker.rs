//! Improvement ranking
//!
//! Folds the analyzer outputs into a short, prioritized coaching agenda:
//! sector pace losses, overall lap-time consistency, braking point
//! repeatability and apex speed repeatability.

use plap_core::model::{
    BrakingZone, ConsistencyMetrics, CornerObservation, ImprovementArea, Priority, SectorStat,
    SpeedDeficitPoint,
};
use plap_core::Thresholds;
use std::collections::BTreeMap;

/// Analyzer outputs the ranker draws from
pub struct RankingInput<'a> {
    pub sector_stats: &'a [SectorStat],
    pub consistency: &'a ConsistencyMetrics,
    pub braking_zones: &'a [BrakingZone],
    pub corners: &'a [CornerObservation],
    pub speed_deficits: &'a [SpeedDeficitPoint],
}

pub fn rank_improvements(input: &RankingInput<'_>, t: &Thresholds) -> Vec<ImprovementArea> {
    let mut areas = Vec::new();
    areas.extend(pace_losses(input.sector_stats, input.speed_deficits, t));
    areas.extend(consistency_issue(input.consistency, t));
    areas.extend(braking_variation(input.braking_zones, t));
    areas.extend(apex_variation(input.corners, t));

    // Stable: equal keys keep aggregation order
    areas.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(b.time_loss.total_cmp(&a.time_loss))
    });
    areas.truncate(t.max_improvements);
    areas
}

fn pace_losses(
    stats: &[SectorStat],
    deficits: &[SpeedDeficitPoint],
    t: &Thresholds,
) -> Vec<ImprovementArea> {
    stats
        .iter()
        .filter(|stat| stat.time_gain > t.pace_gain_min)
        .map(|stat| {
            let priority = if stat.time_gain > t.pace_gain_high {
                Priority::High
            } else if stat.time_gain > t.pace_gain_medium {
                Priority::Medium
            } else {
                Priority::Low
            };

            let mut description = format!(
                "Averaging {:.3}s slower through {} than your best (lap {})",
                stat.time_gain, stat.sector_name, stat.lap_number
            );
            let worst_deficit = deficits
                .iter()
                .filter(|d| d.sector == stat.sector_name)
                .max_by(|a, b| a.speed_loss.total_cmp(&b.speed_loss));
            if let Some(deficit) = worst_deficit {
                description.push_str(&format!("; {}", deficit.description));
            }

            ImprovementArea {
                area: "Sector Time".to_string(),
                sector: stat.sector_name.clone(),
                time_loss: stat.time_gain,
                description,
                recommendation: format!(
                    "Review lap {} through {} and repeat its braking point, line and throttle application",
                    stat.lap_number, stat.sector_name
                ),
                priority,
            }
        })
        .collect()
}

fn consistency_issue(metrics: &ConsistencyMetrics, t: &Thresholds) -> Option<ImprovementArea> {
    if metrics.consistency_score >= t.consistency_floor {
        return None;
    }
    Some(ImprovementArea {
        area: "Consistency".to_string(),
        sector: "All Sectors".to_string(),
        time_loss: metrics.std_deviation,
        description: format!(
            "Lap times vary by {:.2}s standard deviation (consistency score {:.0}/100)",
            metrics.std_deviation, metrics.consistency_score
        ),
        recommendation: "Hit the same braking markers and turn-in points every lap before pushing for more pace"
            .to_string(),
        priority: Priority::High,
    })
}

/// Group values by sector and distance bucket, in deterministic key order
fn bucketed<'a, T>(
    items: &'a [T],
    bucket_size: f64,
    key: impl Fn(&'a T) -> (&'a str, f64),
) -> BTreeMap<(&'a str, i64), Vec<&'a T>> {
    let mut groups: BTreeMap<(&str, i64), Vec<&T>> = BTreeMap::new();
    for item in items {
        let (sector, distance) = key(item);
        let bucket = (distance / bucket_size).floor() as i64;
        groups.entry((sector, bucket)).or_default().push(item);
    }
    groups
}

fn spread(values: impl Iterator<Item = f64>) -> (f64, f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    (min, max, max - min)
}

fn braking_variation(zones: &[BrakingZone], t: &Thresholds) -> Vec<ImprovementArea> {
    bucketed(zones, t.braking_bucket_size, |z| (z.sector.as_str(), z.distance))
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .filter_map(|((sector, _), group)| {
            let (earliest, latest, range) = spread(group.iter().map(|z| z.distance));
            if range <= t.braking_spread_min {
                return None;
            }
            Some(ImprovementArea {
                area: "Braking Point".to_string(),
                sector: sector.to_string(),
                time_loss: range * t.braking_severity_per_meter,
                description: format!(
                    "Braking point varies by {:.0}m ({:.0}m to {:.0}m)",
                    range, earliest, latest
                ),
                recommendation: format!(
                    "Pick a fixed reference near {:.0}m and brake at it every lap",
                    latest
                ),
                priority: Priority::Medium,
            })
        })
        .collect()
}

fn apex_variation(corners: &[CornerObservation], t: &Thresholds) -> Vec<ImprovementArea> {
    bucketed(corners, t.apex_bucket_size, |c| (c.sector.as_str(), c.distance))
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .filter_map(|((sector, _), group)| {
            let (slowest, fastest, range) = spread(group.iter().map(|c| c.min_speed));
            if range <= t.apex_spread_medium {
                return None;
            }
            let priority = if range > t.apex_spread_high {
                Priority::High
            } else {
                Priority::Medium
            };
            Some(ImprovementArea {
                area: "Corner Speed".to_string(),
                sector: sector.to_string(),
                time_loss: range * t.apex_severity_per_unit,
                description: format!(
                    "Minimum corner speed varies by {:.1} km/h ({:.1} to {:.1})",
                    range, slowest, fastest
                ),
                recommendation: format!(
                    "Carry the {:.1} km/h apex speed of your best pass with a consistent turn-in and brake release",
                    fastest
                ),
                priority,
            })
        })
        .collect()
}
