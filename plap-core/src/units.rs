//! Presentation helpers for times and output values
//!
//! All analysis values are kept at full precision in memory. Serialized output
//! rounds floats to 3 decimal places to keep JSON payloads compact.

/// Round f64 to 3 decimal places for compact JSON serialization
pub(crate) fn round3<S: serde::Serializer>(val: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64((*val * 1000.0).round() / 1000.0)
}

/// [`round3`] applied to every element of a sequence
pub(crate) fn round3_vec<S: serde::Serializer>(vals: &[f64], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(vals.iter().map(|v| (v * 1000.0).round() / 1000.0))
}

/// Format seconds as a lap time: `M:SS.mmm`
///
/// Negative and non-finite inputs render as `0:00.000`.
pub fn format_lap_time(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let minutes = total_ms / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{}:{:02}.{:03}", minutes, secs, millis)
}
