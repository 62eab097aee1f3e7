//! Telemetry and analysis result model
//!
//! Input samples are immutable once parsed. Laps and sector instances borrow
//! or copy from the sample buffer of a single analysis run and never outlive
//! it. Result types serialize as camelCase JSON for the API, persistence and
//! coaching layers.

use crate::config::SectorDefinition;
use crate::units::{round3, round3_vec};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One row of logged telemetry
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    /// Seconds
    pub timestamp: f64,

    /// Distance from the start/finish line (metres)
    pub lap_distance: f64,

    /// km/h
    pub speed: f64,

    pub steering_angle: f64,

    pub front_brake_pressure: f64,

    /// Throttle input (0.0 to 1.0)
    pub throttle_position: f64,
}

/// A contiguous run of samples between two start/finish crossings
#[derive(Debug, Clone)]
pub struct Lap<'a> {
    pub lap_number: u32,
    /// Index range into the session's sample buffer
    pub sample_range: Range<usize>,
    pub samples: &'a [TelemetrySample],
    pub lap_time: f64,
}

impl<'a> Lap<'a> {
    /// Build a lap over `session[range]`; the range must be non-empty
    pub fn new(lap_number: u32, sample_range: Range<usize>, session: &'a [TelemetrySample]) -> Self {
        let samples = &session[sample_range.clone()];
        let lap_time = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        };
        Self {
            lap_number,
            sample_range,
            samples,
            lap_time,
        }
    }

    pub fn max_speed(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.speed)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// One lap's pass through one sector definition
#[derive(Debug, Clone)]
pub struct Sector<'a> {
    pub definition: &'a SectorDefinition,
    /// Position of the definition in the configured layout
    pub definition_index: usize,
    pub lap_number: u32,
    pub time: f64,
    pub max_speed: f64,
    pub samples: Vec<TelemetrySample>,
}

impl Sector<'_> {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn distance_range(&self) -> (f64, f64) {
        (self.definition.start_distance, self.definition.end())
    }

    pub fn avg_speed(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().map(|s| s.speed).sum::<f64>() / self.samples.len() as f64
    }
}

/// Best surviving time for one sector definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorStat {
    pub sector_name: String,
    #[serde(serialize_with = "round3")]
    pub best_time: f64,
    pub lap_number: u32,
    /// Mean non-drafting time minus best time, never negative
    #[serde(serialize_with = "round3")]
    pub time_gain: f64,
    #[serde(serialize_with = "round3")]
    pub avg_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyMetrics {
    #[serde(serialize_with = "round3")]
    pub avg_lap_time: f64,
    #[serde(serialize_with = "round3")]
    pub best_lap_time: f64,
    #[serde(serialize_with = "round3")]
    pub worst_lap_time: f64,
    #[serde(serialize_with = "round3")]
    pub std_deviation: f64,
    /// Lap time minus best lap time, in lap order
    #[serde(serialize_with = "round3_vec")]
    pub per_lap_deviation: Vec<f64>,
    /// 0 to 100
    #[serde(serialize_with = "round3")]
    pub consistency_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrakingZone {
    pub sector: String,
    /// Lap distance at the zone's midpoint sample
    #[serde(serialize_with = "round3")]
    pub distance: f64,
    #[serde(serialize_with = "round3")]
    pub entry_speed: f64,
    #[serde(serialize_with = "round3")]
    pub exit_speed: f64,
    #[serde(serialize_with = "round3")]
    pub avg_pressure: f64,
    pub lap_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccelerationZone {
    pub sector: String,
    #[serde(serialize_with = "round3")]
    pub distance: f64,
    #[serde(serialize_with = "round3")]
    pub entry_speed: f64,
    #[serde(serialize_with = "round3")]
    pub exit_speed: f64,
    #[serde(serialize_with = "round3")]
    pub avg_throttle: f64,
    pub lap_number: u32,
}

/// Minimum-speed point of one lap through one sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerObservation {
    pub sector: String,
    /// Apex location
    #[serde(serialize_with = "round3")]
    pub distance: f64,
    #[serde(serialize_with = "round3")]
    pub min_speed: f64,
    pub lap_number: u32,
    #[serde(serialize_with = "round3")]
    pub entry_speed: f64,
    #[serde(serialize_with = "round3")]
    pub exit_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedDeficitPoint {
    pub sector: String,
    #[serde(serialize_with = "round3")]
    pub distance: f64,
    #[serde(serialize_with = "round3")]
    pub speed_loss: f64,
    #[serde(serialize_with = "round3")]
    pub best_speed: f64,
    #[serde(serialize_with = "round3")]
    pub avg_speed: f64,
    pub description: String,
}

/// Coaching priority, ordered most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementArea {
    pub area: String,
    pub sector: String,
    /// Severity proxy; seconds for pace items, scaled spreads otherwise
    #[serde(serialize_with = "round3")]
    pub time_loss: f64,
    pub description: String,
    pub recommendation: String,
    pub priority: Priority,
}

/// One point of the synthesized lap's speed trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    #[serde(serialize_with = "round3")]
    pub distance: f64,
    #[serde(serialize_with = "round3")]
    pub speed: f64,
    pub sector_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapSummary {
    pub lap_number: u32,
    #[serde(serialize_with = "round3")]
    pub lap_time: f64,
    pub sample_count: usize,
    #[serde(serialize_with = "round3")]
    pub max_speed: f64,
}

impl From<&Lap<'_>> for LapSummary {
    fn from(lap: &Lap<'_>) -> Self {
        Self {
            lap_number: lap.lap_number,
            lap_time: lap.lap_time,
            sample_count: lap.samples.len(),
            max_speed: lap.max_speed(),
        }
    }
}

/// Complete output of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfectLapResult {
    /// Sum of every sector's best time
    #[serde(serialize_with = "round3")]
    pub theoretical_time: f64,
    /// Best actual lap minus the theoretical lap
    #[serde(serialize_with = "round3")]
    pub potential_gain: f64,
    pub chart_data: Vec<ChartPoint>,
    /// In sector layout order
    pub sector_stats: Vec<SectorStat>,
    pub consistency: ConsistencyMetrics,
    /// At most the configured cap, priority sorted
    pub improvement_areas: Vec<ImprovementArea>,
    pub braking_zones: Vec<BrakingZone>,
    pub acceleration_zones: Vec<AccelerationZone>,
    pub corner_analysis: Vec<CornerObservation>,
    pub speed_deficits: Vec<SpeedDeficitPoint>,
    pub lap_summaries: Vec<LapSummary>,
}
