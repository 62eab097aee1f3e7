//! Telemetry ingestion and sources for PerfectLap

pub mod csv_ingest;
pub mod demo;
pub mod file;

pub use csv_ingest::parse_telemetry;
pub use demo::DemoSource;
pub use file::{FileSource, TextSource};
