//! Errors raised by the analysis engine
//!
//! Every variant is fatal to the current analysis run. Partially degraded
//! input (a missing column, an unparseable cell) is not an error; it is
//! defaulted and logged by the ingestor instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The header row looks like a race results/standings export
    #[error("not a telemetry file: header matches race-standings columns ({})", .matched.join(", "))]
    WrongFileKind { matched: Vec<String> },

    /// No timestamp, speed or lap distance signal in the leading rows
    #[error("no plausible timestamp, speed or lap distance values in the first {rows_checked} rows")]
    EmptyOrInvalidData { rows_checked: usize },

    /// No lap survived the minimum sample count
    #[error("no laps detected in telemetry")]
    NoLapsDetected,

    /// Every sector was absent or drafting-affected on every lap
    #[error("no valid sectors: every sector was missing or drafting-affected on all laps")]
    NoValidSectors,

    /// Sector layout or thresholds are unusable
    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),
}
