//! PerfectLap Core Library
//!
//! This crate provides the telemetry data model, the analysis configuration,
//! the error type shared by every analysis stage, and the trait through which
//! raw telemetry text is obtained.

pub mod config;
pub mod error;
pub mod model;
pub mod source;
pub mod units;

pub use config::{AnalysisConfig, SectorDefinition, Thresholds};
pub use error::AnalysisError;
pub use model::{Lap, PerfectLapResult, Sector, TelemetrySample};
pub use source::TelemetrySource;
pub use units::format_lap_time;
