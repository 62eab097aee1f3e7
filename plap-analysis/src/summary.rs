//! Plain-text rendering of an analysis result
//!
//! The coaching text generator is an external service; it receives this
//! summary as context alongside the driver's question.

use plap_core::model::Priority;
use plap_core::{format_lap_time, PerfectLapResult};
use std::fmt;

pub fn coaching_context(result: &PerfectLapResult) -> String {
    CoachingContext(result).to_string()
}

/// Display adapter that writes the coaching sections
struct CoachingContext<'a>(&'a PerfectLapResult);

impl fmt::Display for CoachingContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let c = &result.consistency;

        writeln!(f, "SESSION OVERVIEW")?;
        writeln!(f, "Laps analyzed: {}", result.lap_summaries.len())?;
        writeln!(f, "Best lap: {}", format_lap_time(c.best_lap_time))?;
        writeln!(
            f,
            "Theoretical best: {} ({:.3}s available)",
            format_lap_time(result.theoretical_time),
            result.potential_gain
        )?;
        writeln!(
            f,
            "Consistency: {:.0}/100 (std dev {:.3}s, average {})",
            c.consistency_score,
            c.std_deviation,
            format_lap_time(c.avg_lap_time)
        )?;

        writeln!(f, "\nLAPS")?;
        for lap in &result.lap_summaries {
            writeln!(
                f,
                "Lap {}: {} (top speed {:.1} km/h)",
                lap.lap_number,
                format_lap_time(lap.lap_time),
                lap.max_speed
            )?;
        }

        writeln!(f, "\nBEST SECTORS")?;
        for stat in &result.sector_stats {
            writeln!(
                f,
                "{}: {:.3}s on lap {} (avg {:.1} km/h), {:.3}s gain vs average",
                stat.sector_name, stat.best_time, stat.lap_number, stat.avg_speed, stat.time_gain
            )?;
        }

        if result.improvement_areas.is_empty() {
            return Ok(());
        }
        writeln!(f, "\nIMPROVEMENT AREAS")?;
        for (i, area) in result.improvement_areas.iter().enumerate() {
            let priority = match area.priority {
                Priority::High => "HIGH",
                Priority::Medium => "MEDIUM",
                Priority::Low => "LOW",
            };
            writeln!(
                f,
                "{}. [{}] {} - {}: {}",
                i + 1,
                priority,
                area.area,
                area.sector,
                area.description
            )?;
            writeln!(f, "   Recommendation: {}", area.recommendation)?;
        }
        Ok(())
    }
}
