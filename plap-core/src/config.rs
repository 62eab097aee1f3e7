//! Analysis configuration
//!
//! A circuit is described by an ordered list of sector definitions that
//! partition the lap distance domain `[0, ∞)`, plus the numeric thresholds
//! every analysis stage reads. The whole value is built once per run and
//! passed down to each stage; nothing in the engine reads global state.

use crate::error::AnalysisError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Fallback label for distances outside every sector
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// A fixed distance range of the circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorDefinition {
    pub name: String,

    /// Inclusive start of the range
    pub start_distance: f64,

    /// Exclusive end of the range; `None` is open-ended (+∞)
    #[serde(default)]
    pub end_distance: Option<f64>,
}

impl SectorDefinition {
    pub fn new(name: impl Into<String>, start_distance: f64, end_distance: f64) -> Self {
        Self {
            name: name.into(),
            start_distance,
            end_distance: Some(end_distance),
        }
    }

    /// The last section of a lap, running to the finish line
    pub fn open_ended(name: impl Into<String>, start_distance: f64) -> Self {
        Self {
            name: name.into(),
            start_distance,
            end_distance: None,
        }
    }

    pub fn end(&self) -> f64 {
        self.end_distance.unwrap_or(f64::INFINITY)
    }

    /// Whether `distance` lies in `[start, end)`
    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.start_distance && distance < self.end()
    }
}

/// Numeric thresholds for every analysis stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thresholds {
    // === Ingestion ===
    /// Leading rows inspected for plausible signal
    pub plausibility_rows: usize,
    /// Standings-vocabulary header matches that reject a file
    pub wrong_file_min_matches: usize,

    // === Lap detection ===
    /// Lap distance above which a reset may follow
    pub lap_reset_high_distance: f64,
    /// Lap distance below which a reset is recognised
    pub lap_reset_low_distance: f64,
    /// A lap must have strictly more samples than this
    pub min_lap_samples: usize,

    // === Sectors ===
    pub min_sector_samples: usize,
    /// Top speed above which a non-opening sector is treated as slipstreamed
    pub drafting_speed: f64,

    // === Zones ===
    pub braking_pressure: f64,
    pub acceleration_throttle: f64,
    pub acceleration_max_brake: f64,
    /// A zone must span strictly more samples than this
    pub zone_min_samples: usize,

    // === Corners ===
    pub corner_min_samples: usize,

    // === Speed deficits ===
    pub deficit_sample_points: usize,
    pub deficit_min_speed_loss: f64,

    // === Consistency ===
    pub consistency_floor: f64,
    pub consistency_penalty_per_second: f64,

    // === Improvement ranking ===
    pub pace_gain_min: f64,
    pub pace_gain_medium: f64,
    pub pace_gain_high: f64,
    /// Width of the distance buckets braking points are compared within
    pub braking_bucket_size: f64,
    pub braking_spread_min: f64,
    /// Width of the distance buckets corner apexes are compared within
    pub apex_bucket_size: f64,
    pub apex_spread_medium: f64,
    pub apex_spread_high: f64,
    /// Severity proxy per metre of braking point spread
    pub braking_severity_per_meter: f64,
    /// Severity proxy per speed unit of apex speed spread
    pub apex_severity_per_unit: f64,
    pub max_improvements: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            plausibility_rows: 10,
            wrong_file_min_matches: 3,
            lap_reset_high_distance: 3000.0,
            lap_reset_low_distance: 200.0,
            min_lap_samples: 10,
            min_sector_samples: 2,
            drafting_speed: 162.0,
            braking_pressure: 0.3,
            acceleration_throttle: 0.7,
            acceleration_max_brake: 0.1,
            zone_min_samples: 3,
            corner_min_samples: 5,
            deficit_sample_points: 5,
            deficit_min_speed_loss: 5.0,
            consistency_floor: 70.0,
            consistency_penalty_per_second: 10.0,
            pace_gain_min: 0.1,
            pace_gain_medium: 0.15,
            pace_gain_high: 0.3,
            braking_bucket_size: 100.0,
            braking_spread_min: 30.0,
            apex_bucket_size: 100.0,
            apex_spread_medium: 3.0,
            apex_spread_high: 8.0,
            braking_severity_per_meter: 0.01,
            apex_severity_per_unit: 0.05,
            max_improvements: 8,
        }
    }
}

impl Thresholds {
    fn float_fields(&self) -> [(&'static str, f64); 19] {
        [
            ("lapResetHighDistance", self.lap_reset_high_distance),
            ("lapResetLowDistance", self.lap_reset_low_distance),
            ("draftingSpeed", self.drafting_speed),
            ("brakingPressure", self.braking_pressure),
            ("accelerationThrottle", self.acceleration_throttle),
            ("accelerationMaxBrake", self.acceleration_max_brake),
            ("deficitMinSpeedLoss", self.deficit_min_speed_loss),
            ("consistencyFloor", self.consistency_floor),
            ("consistencyPenaltyPerSecond", self.consistency_penalty_per_second),
            ("paceGainMin", self.pace_gain_min),
            ("paceGainMedium", self.pace_gain_medium),
            ("paceGainHigh", self.pace_gain_high),
            ("brakingBucketSize", self.braking_bucket_size),
            ("brakingSpreadMin", self.braking_spread_min),
            ("apexBucketSize", self.apex_bucket_size),
            ("apexSpreadMedium", self.apex_spread_medium),
            ("apexSpreadHigh", self.apex_spread_high),
            ("brakingSeverityPerMeter", self.braking_severity_per_meter),
            ("apexSeverityPerUnit", self.apex_severity_per_unit),
        ]
    }
}

/// Complete configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Ordered sector layout; must partition `[0, ∞)`
    pub sectors: Vec<SectorDefinition>,

    #[serde(default)]
    pub thresholds: Thresholds,
}

/// Five-sector layout of a ~3.7 km road course
impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sectors: vec![
                SectorDefinition::new("S1", 0.0, 700.0),
                SectorDefinition::new("S2", 700.0, 1500.0),
                SectorDefinition::new("S3", 1500.0, 2400.0),
                SectorDefinition::new("S4", 2400.0, 3200.0),
                SectorDefinition::open_ended("S5", 3200.0),
            ],
            thresholds: Thresholds::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn new(sectors: Vec<SectorDefinition>, thresholds: Thresholds) -> Self {
        Self {
            sectors,
            thresholds,
        }
    }

    /// Load and validate a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config JSON: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the sectors partition `[0, ∞)` and thresholds are usable
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let invalid = |msg: String| Err(AnalysisError::InvalidConfig(msg));

        let Some(first) = self.sectors.first() else {
            return invalid("at least one sector is required".to_string());
        };
        if first.start_distance != 0.0 {
            return invalid(format!(
                "first sector '{}' must start at 0, starts at {}",
                first.name, first.start_distance
            ));
        }

        let last_idx = self.sectors.len() - 1;
        for (i, sector) in self.sectors.iter().enumerate() {
            if !sector.start_distance.is_finite() {
                return invalid(format!("sector '{}' has a non-finite start", sector.name));
            }
            match sector.end_distance {
                None if i != last_idx => {
                    return invalid(format!(
                        "only the last sector may be open-ended, '{}' is not last",
                        sector.name
                    ));
                }
                None => {}
                Some(_) if i == last_idx => {
                    return invalid(format!(
                        "last sector '{}' must be open-ended to cover every distance",
                        sector.name
                    ));
                }
                Some(end) => {
                    if !end.is_finite() || end <= sector.start_distance {
                        return invalid(format!(
                            "sector '{}' must end after it starts",
                            sector.name
                        ));
                    }
                    let next = &self.sectors[i + 1];
                    if next.start_distance != end {
                        return invalid(format!(
                            "sector '{}' ends at {} but '{}' starts at {}",
                            sector.name, end, next.name, next.start_distance
                        ));
                    }
                }
            }
        }

        for (name, value) in self.thresholds.float_fields() {
            if !value.is_finite() {
                return invalid(format!("threshold {} must be finite", name));
            }
        }
        for (name, size) in [
            ("brakingBucketSize", self.thresholds.braking_bucket_size),
            ("apexBucketSize", self.thresholds.apex_bucket_size),
        ] {
            if size <= 0.0 {
                return invalid(format!("threshold {} must be positive", name));
            }
        }
        if self.thresholds.plausibility_rows == 0 {
            return invalid("threshold plausibilityRows must be at least 1".to_string());
        }
        if self.thresholds.deficit_sample_points == 0 {
            return invalid("threshold deficitSamplePoints must be at least 1".to_string());
        }

        Ok(())
    }

    /// Locate the sector containing `distance`
    pub fn sector_for(&self, distance: f64) -> Option<(usize, &SectorDefinition)> {
        self.sectors
            .iter()
            .enumerate()
            .find(|(_, sector)| sector.contains(distance))
    }

    /// Name of the sector containing `distance`, or [`UNKNOWN_SECTOR`]
    pub fn sector_name_for(&self, distance: f64) -> &str {
        self.sector_for(distance)
            .map(|(_, sector)| sector.name.as_str())
            .unwrap_or(UNKNOWN_SECTOR)
    }
}
