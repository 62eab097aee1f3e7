//! Telemetry source trait definition

use anyhow::Result;

/// Trait for anything that can hand the engine a complete telemetry export
///
/// Each source is responsible for:
/// - Locating or producing the raw delimited text
/// - Reporting a human-readable name used in logs and reports
///
/// Parsing is not the source's concern; the ingestor turns the text into
/// samples.
pub trait TelemetrySource: Send {
    /// Get the name of this source (e.g. a file path, "Demo")
    fn name(&self) -> &str;

    /// Read the complete telemetry export as text
    ///
    /// Called once per analysis run.
    fn read_text(&mut self) -> Result<String>;
}
