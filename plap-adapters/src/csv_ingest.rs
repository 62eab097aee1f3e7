//! CSV telemetry ingestion
//!
//! Turns an exported logger CSV into [`TelemetrySample`]s. Loggers disagree
//! on column names, so each channel is resolved against a priority list of
//! aliases: exact match first, then case-insensitive, then substring in
//! either direction. Missing or unparseable cells become 0 and are reported
//! as warnings; only files with no usable signal at all are rejected.

use chrono::{DateTime, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use plap_core::{AnalysisError, TelemetrySample, Thresholds};
use tracing::{debug, info, warn};

/// Header names of race results/standings exports
pub const STANDINGS_HEADERS: &[&str] = &[
    "POSITION",
    "NUMBER",
    "STATUS",
    "LAPS",
    "TOTAL_TIME",
    "GAP_FIRST",
    "GAP_PREVIOUS",
    "FL_LAPNUM",
    "FL_TIME",
    "FL_KPH",
];

/// A semantic telemetry channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Timestamp,
    LapDistance,
    Speed,
    SteeringAngle,
    FrontBrakePressure,
    ThrottlePosition,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Timestamp,
        Channel::LapDistance,
        Channel::Speed,
        Channel::SteeringAngle,
        Channel::FrontBrakePressure,
        Channel::ThrottlePosition,
    ];

    /// Known header spellings, most specific first
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Channel::Timestamp => &["timestamp", "time", "elapsed_time", "meta_time"],
            Channel::LapDistance => &[
                "Laptrigger_lapdist_dls",
                "lap_distance",
                "lapdist",
                "distance",
            ],
            Channel::Speed => &["speed", "vCar", "velocity"],
            Channel::SteeringAngle => &["Steering_Angle", "steering_angle", "steering", "steer"],
            Channel::FrontBrakePressure => &[
                "pbrake_f",
                "front_brake_pressure",
                "brake_pressure_front",
                "brake",
            ],
            Channel::ThrottlePosition => &["aps", "ath", "throttle_position", "throttle"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Timestamp => "timestamp",
            Channel::LapDistance => "lap distance",
            Channel::Speed => "speed",
            Channel::SteeringAngle => "steering angle",
            Channel::FrontBrakePressure => "front brake pressure",
            Channel::ThrottlePosition => "throttle position",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Header column resolved for each channel, built once per parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: [Option<usize>; 6],
}

impl ColumnMap {
    pub fn resolve(headers: &[&str]) -> Self {
        let mut columns = [None; 6];
        for channel in Channel::ALL {
            columns[channel.index()] = resolve_column(headers, channel.aliases());
        }
        Self { columns }
    }

    pub fn get(&self, channel: Channel) -> Option<usize> {
        self.columns[channel.index()]
    }
}

/// Shortest text that may take part in a substring match
///
/// Abbreviations such as `aps` occur inside unrelated names (`elapsed_time`,
/// `laps`), so they only match whole headers.
const MIN_SUBSTRING_LEN: usize = 4;

/// Find the header matching the first alias that matches at all
///
/// For each alias in order: exact, then case-insensitive, then substring
/// containment in either direction. The contained side of a substring match
/// must be at least [`MIN_SUBSTRING_LEN`] characters. Empty headers never
/// match.
pub fn resolve_column(headers: &[&str], aliases: &[&str]) -> Option<usize> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

    for alias in aliases {
        if let Some(idx) = headers.iter().position(|h| h == alias) {
            return Some(idx);
        }

        let alias_lower = alias.to_lowercase();
        if let Some(idx) = lowered.iter().position(|h| *h == alias_lower) {
            return Some(idx);
        }

        if let Some(idx) = lowered.iter().position(|h| {
            let header_in_alias =
                h.chars().count() >= MIN_SUBSTRING_LEN && alias_lower.contains(h.as_str());
            let alias_in_header = alias_lower.chars().count() >= MIN_SUBSTRING_LEN
                && h.contains(&alias_lower);
            header_in_alias || alias_in_header
        }) {
            return Some(idx);
        }
    }
    None
}

/// Standings headers present in `headers`, if there are enough to reject the file
///
/// Cells are also split on `;` because results exports are semicolon
/// separated and arrive here as a single header cell.
pub fn detect_standings_file(headers: &[&str], min_matches: usize) -> Option<Vec<String>> {
    let matched: Vec<String> = headers
        .iter()
        .flat_map(|h| h.split(';'))
        .map(str::trim)
        .filter(|h| STANDINGS_HEADERS.contains(h))
        .map(str::to_string)
        .collect();

    if matched.len() >= min_matches.max(1) {
        Some(matched)
    } else {
        None
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric seconds, or a date-time converted to epoch seconds
fn parse_timestamp(cell: &str) -> Option<f64> {
    if let Some(v) = parse_number(cell) {
        return Some(v);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.timestamp_millis() as f64 / 1000.0);
    }
    NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis() as f64 / 1000.0)
}

struct RowParser {
    columns: ColumnMap,
    unparseable: [usize; 6],
}

impl RowParser {
    fn cell(&mut self, record: &StringRecord, channel: Channel) -> f64 {
        let Some(idx) = self.columns.get(channel) else {
            return 0.0;
        };
        let raw = record.get(idx).unwrap_or("");
        let parsed = match channel {
            Channel::Timestamp => parse_timestamp(raw),
            _ => parse_number(raw),
        };
        parsed.unwrap_or_else(|| {
            self.unparseable[channel.index()] += 1;
            0.0
        })
    }

    fn sample(&mut self, record: &StringRecord) -> TelemetrySample {
        TelemetrySample {
            timestamp: self.cell(record, Channel::Timestamp),
            lap_distance: self.cell(record, Channel::LapDistance),
            speed: self.cell(record, Channel::Speed),
            steering_angle: self.cell(record, Channel::SteeringAngle),
            front_brake_pressure: self.cell(record, Channel::FrontBrakePressure),
            throttle_position: self.cell(record, Channel::ThrottlePosition),
        }
    }
}

/// Parse a telemetry CSV export into samples, in row order
pub fn parse_telemetry(
    text: &str,
    thresholds: &Thresholds,
) -> Result<Vec<TelemetrySample>, AnalysisError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    // Input is valid UTF-8 and the reader is flexible, so reads cannot fail
    let headers = reader.headers().cloned().unwrap_or_default();
    let header_names: Vec<&str> = headers.iter().collect();

    if let Some(matched) = detect_standings_file(&header_names, thresholds.wrong_file_min_matches)
    {
        warn!("Rejecting upload: header looks like race standings ({})", matched.join(", "));
        return Err(AnalysisError::WrongFileKind { matched });
    }

    let columns = ColumnMap::resolve(&header_names);
    for channel in Channel::ALL {
        match columns.get(channel) {
            Some(idx) => debug!("Mapped {} to column '{}'", channel.label(), header_names[idx]),
            None => warn!("No column found for {}; defaulting to 0", channel.label()),
        }
    }

    let mut parser = RowParser {
        columns,
        unparseable: [0; 6],
    };
    let mut samples = Vec::new();
    for record in reader.records().flatten() {
        samples.push(parser.sample(&record));
    }

    for channel in Channel::ALL {
        let count = parser.unparseable[channel.index()];
        if count > 0 && parser.columns.get(channel).is_some() {
            warn!(
                "{} unparseable {} cells defaulted to 0",
                count,
                channel.label()
            );
        }
    }

    check_plausibility(&samples, thresholds.plausibility_rows)?;

    info!("Parsed {} telemetry samples", samples.len());
    Ok(samples)
}

/// Reject data with no signal in the leading rows; warn on partial signal
fn check_plausibility(samples: &[TelemetrySample], rows: usize) -> Result<(), AnalysisError> {
    let head = &samples[..samples.len().min(rows)];
    let has_time = head.iter().any(|s| s.timestamp > 0.0);
    let has_speed = head.iter().any(|s| s.speed > 0.0);
    let has_distance = head.iter().any(|s| s.lap_distance > 0.0);

    if !(has_time || has_speed || has_distance) {
        return Err(AnalysisError::EmptyOrInvalidData {
            rows_checked: head.len(),
        });
    }

    for (present, channel) in [
        (has_time, Channel::Timestamp),
        (has_speed, Channel::Speed),
        (has_distance, Channel::LapDistance),
    ] {
        if !present {
            warn!(
                "No positive {} values in the first {} rows; results may be degraded",
                channel.label(),
                head.len()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_before_case_insensitive() {
        let headers = ["SPEED", "speed", "time"];
        assert_eq!(resolve_column(&headers, &["speed"]), Some(1));
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let headers = ["Time", "SPEED"];
        assert_eq!(resolve_column(&headers, Channel::Speed.aliases()), Some(1));
    }

    #[test]
    fn test_resolve_substring_either_direction() {
        // header contains alias
        assert_eq!(resolve_column(&["gps_speed_kph"], &["speed"]), Some(0));
        // alias contains header
        assert_eq!(resolve_column(&["lapdist"], &["lapdist_dls"]), Some(0));
    }

    #[test]
    fn test_resolve_alias_priority_wins_over_column_order() {
        let headers = ["distance", "Laptrigger_lapdist_dls"];
        assert_eq!(
            resolve_column(&headers, Channel::LapDistance.aliases()),
            Some(1)
        );
    }

    #[test]
    fn test_short_aliases_only_match_whole_headers() {
        let headers = ["elapsed_time", "lap_distance", "speed", "steering", "brake", "throttle"];
        let map = ColumnMap::resolve(&headers);
        assert_eq!(map.get(Channel::Timestamp), Some(0));
        assert_eq!(map.get(Channel::SteeringAngle), Some(3));
        assert_eq!(map.get(Channel::FrontBrakePressure), Some(4));
        assert_eq!(map.get(Channel::ThrottlePosition), Some(5));

        let headers = ["timestamp", "laps", "lap_distance", "speed", "throttle"];
        let map = ColumnMap::resolve(&headers);
        assert_eq!(map.get(Channel::LapDistance), Some(2));
        assert_eq!(map.get(Channel::ThrottlePosition), Some(4));

        // Still matched when the abbreviation is the whole header
        assert_eq!(resolve_column(&["APS"], Channel::ThrottlePosition.aliases()), Some(0));
        assert_eq!(resolve_column(&["laps"], &["aps"]), None);
    }

    #[test]
    fn test_short_headers_are_not_found_inside_aliases() {
        assert_eq!(resolve_column(&["lap"], Channel::LapDistance.aliases()), None);
    }

    #[test]
    fn test_resolve_ignores_empty_headers() {
        assert_eq!(resolve_column(&["", "x"], &["speed"]), None);
    }

    #[test]
    fn test_column_map_for_logger_export() {
        let headers = [
            "timestamp",
            "Laptrigger_lapdist_dls",
            "speed",
            "Steering_Angle",
            "pbrake_f",
            "aps",
        ];
        let map = ColumnMap::resolve(&headers);
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(map.get(*channel), Some(i), "{} mis-mapped", channel.label());
        }
    }

    #[test]
    fn test_detect_standings_file() {
        let headers = ["POSITION", "NUMBER", "STATUS", "DRIVER"];
        let matched = detect_standings_file(&headers, 3).unwrap();
        assert_eq!(matched, vec!["POSITION", "NUMBER", "STATUS"]);

        assert!(detect_standings_file(&["POSITION", "speed", "time"], 3).is_none());
    }

    #[test]
    fn test_detect_semicolon_standings_header() {
        let headers = ["POSITION;NUMBER;STATUS;LAPS;TOTAL_TIME"];
        assert!(detect_standings_file(&headers, 3).is_some());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("12.5"), Some(12.5));
        assert_eq!(
            parse_timestamp("1970-01-01T00:01:00.250Z"),
            Some(60.25)
        );
        assert_eq!(parse_timestamp("1970-01-01 00:00:02.5"), Some(2.5));
        assert_eq!(parse_timestamp("soon"), None);
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-3.5"), Some(-3.5));
    }

    #[test]
    fn test_plausibility_only_checks_leading_rows() {
        let mut samples = vec![TelemetrySample::default(); 12];
        samples[11].speed = 100.0;
        let err = check_plausibility(&samples, 10).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyOrInvalidData { rows_checked: 10 });

        samples[3].speed = 50.0;
        assert!(check_plausibility(&samples, 10).is_ok());
    }
}
