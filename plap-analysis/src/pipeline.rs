//! End-to-end analysis run

use crate::consistency::analyze_consistency;
use crate::corners::analyze_corners;
use crate::deficits::analyze_speed_deficits;
use crate::laps::detect_laps;
use crate::ranker::{rank_improvements, RankingInput};
use crate::synth::synthesize;
use crate::zones::{acceleration_zones, braking_zones};
use anyhow::Context;
use plap_adapters::parse_telemetry;
use plap_core::model::LapSummary;
use plap_core::{AnalysisConfig, AnalysisError, PerfectLapResult, TelemetrySample, TelemetrySource};
use tracing::info;

/// Analyze an already-parsed session
pub fn analyze_samples(
    samples: &[TelemetrySample],
    config: &AnalysisConfig,
) -> Result<PerfectLapResult, AnalysisError> {
    config.validate()?;
    let thresholds = &config.thresholds;

    let laps = detect_laps(samples, thresholds)?;
    let synthesis = synthesize(&laps, config)?;

    let consistency = analyze_consistency(&laps, thresholds);
    let braking = braking_zones(&laps, config);
    let acceleration = acceleration_zones(&laps, config);
    let corners = analyze_corners(&laps, config);
    let speed_deficits = analyze_speed_deficits(&synthesis.winners, &laps, config);

    let improvement_areas = rank_improvements(
        &RankingInput {
            sector_stats: &synthesis.sector_stats,
            consistency: &consistency,
            braking_zones: &braking,
            corners: &corners,
            speed_deficits: &speed_deficits,
        },
        thresholds,
    );

    info!(
        "Analysis complete: {} laps, {} braking zones, {} improvement areas",
        laps.len(),
        braking.len(),
        improvement_areas.len()
    );

    Ok(PerfectLapResult {
        theoretical_time: synthesis.theoretical_time,
        potential_gain: consistency.best_lap_time - synthesis.theoretical_time,
        chart_data: synthesis.chart_data,
        sector_stats: synthesis.sector_stats,
        consistency,
        improvement_areas,
        braking_zones: braking,
        acceleration_zones: acceleration,
        corner_analysis: corners,
        speed_deficits,
        lap_summaries: laps.iter().map(LapSummary::from).collect(),
    })
}

/// Parse and analyze a telemetry CSV export
pub fn analyze_text(
    text: &str,
    config: &AnalysisConfig,
) -> Result<PerfectLapResult, AnalysisError> {
    config.validate()?;
    let samples = parse_telemetry(text, &config.thresholds)?;
    analyze_samples(&samples, config)
}

/// Read a source and analyze it
///
/// Engine errors stay downcastable to [`AnalysisError`] through the context.
pub fn analyze_source(
    source: &mut dyn TelemetrySource,
    config: &AnalysisConfig,
) -> anyhow::Result<PerfectLapResult> {
    let text = source.read_text()?;
    let result = analyze_text(&text, config)
        .with_context(|| format!("Failed to analyze telemetry from {}", source.name()))?;
    Ok(result)
}
