//! Ingestion tests against realistic logger exports

use plap_adapters::parse_telemetry;
use plap_core::{AnalysisError, TelemetrySource, Thresholds};

#[test]
fn test_logger_export_with_canonical_headers() {
    let csv = "timestamp,Laptrigger_lapdist_dls,speed,Steering_Angle,pbrake_f,aps\n\
               0.00,12.5,141.2,-1.5,0.000,1.000\n\
               0.05,14.4,141.9,-1.2,0.000,1.000\n\
               0.10,16.4,142.4,-0.8,0.420,0.000\n";
    let samples = parse_telemetry(csv, &Thresholds::default()).unwrap();
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[2].timestamp, 0.10);
    assert_eq!(samples[2].lap_distance, 16.4);
    assert_eq!(samples[2].speed, 142.4);
    assert_eq!(samples[2].steering_angle, -0.8);
    assert_eq!(samples[2].front_brake_pressure, 0.42);
    assert_eq!(samples[2].throttle_position, 0.0);
}

#[test]
fn test_alias_headers_are_mapped() {
    let csv = "Time,Lap_Distance,vCar,steer,brake,ath\n1.5,250,120,4,0.1,0.9\n";
    let samples = parse_telemetry(csv, &Thresholds::default()).unwrap();
    assert_eq!(samples[0].timestamp, 1.5);
    assert_eq!(samples[0].lap_distance, 250.0);
    assert_eq!(samples[0].speed, 120.0);
    assert_eq!(samples[0].steering_angle, 4.0);
    assert_eq!(samples[0].front_brake_pressure, 0.1);
    assert_eq!(samples[0].throttle_position, 0.9);
}

#[test]
fn test_missing_and_unparseable_cells_default_to_zero() {
    let csv = "timestamp,lap_distance,speed\n1.0,,n/a\n2.0,10,95\n";
    let samples = parse_telemetry(csv, &Thresholds::default()).unwrap();
    assert_eq!(samples[0].lap_distance, 0.0);
    assert_eq!(samples[0].speed, 0.0);
    assert_eq!(samples[0].throttle_position, 0.0);
    assert_eq!(samples[1].speed, 95.0);
}

#[test]
fn test_iso_timestamps_become_seconds() {
    let csv = "timestamp,lap_distance,speed\n\
               2024-05-18T14:03:20.000Z,100,150\n\
               2024-05-18T14:03:20.250Z,110,151\n\
               2024-05-18 14:03:20.500,120,152\n";
    let samples = parse_telemetry(csv, &Thresholds::default()).unwrap();
    assert!((samples[1].timestamp - samples[0].timestamp - 0.25).abs() < 1e-6);
    assert!((samples[2].timestamp - samples[0].timestamp - 0.5).abs() < 1e-6);
}

#[test]
fn test_standings_export_is_wrong_file_kind() {
    let csv = "POSITION;NUMBER;STATUS;LAPS;TOTAL_TIME;GAP_FIRST\n1;13;Classified;22;45:12.345;-\n";
    match parse_telemetry(csv, &Thresholds::default()) {
        Err(AnalysisError::WrongFileKind { matched }) => {
            assert!(matched.contains(&"POSITION".to_string()));
            assert!(matched.len() >= 3);
        }
        other => panic!("expected WrongFileKind, got {:?}", other),
    }
}

#[test]
fn test_two_standings_headers_are_tolerated() {
    let csv = "timestamp,lap_distance,speed,STATUS,LAPS\n1,10,100,ok,3\n";
    assert!(parse_telemetry(csv, &Thresholds::default()).is_ok());
}

#[test]
fn test_no_signal_is_rejected() {
    let csv = "timestamp,lap_distance,speed\n0,0,0\n0,0,0\n";
    assert_eq!(
        parse_telemetry(csv, &Thresholds::default()).unwrap_err(),
        AnalysisError::EmptyOrInvalidData { rows_checked: 2 }
    );
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let csv = "\u{feff}timestamp,speed\n1,100\n";
    let samples = parse_telemetry(csv, &Thresholds::default()).unwrap();
    assert_eq!(samples[0].timestamp, 1.0);
    assert_eq!(samples[0].speed, 100.0);
}

#[test]
fn test_text_source_feeds_parser() {
    let mut source = plap_adapters::TextSource::new("upload", "speed,time\n80,0.5\n");
    let text = source.read_text().unwrap();
    let samples = parse_telemetry(&text, &Thresholds::default()).unwrap();
    assert_eq!(samples[0].speed, 80.0);
    assert_eq!(samples[0].timestamp, 0.5);
}

#[test]
fn test_elapsed_time_is_not_read_as_throttle() {
    let csv = "elapsed_time,lap_distance,speed,steering,brake,throttle\n\
               12.5,310,128,-4,0.0,0.2\n\
               12.6,313,129,-3,0.0,0.25\n";
    let samples = parse_telemetry(csv, &Thresholds::default()).unwrap();
    assert_eq!(samples[0].timestamp, 12.5);
    assert_eq!(samples[0].throttle_position, 0.2);
    assert_eq!(samples[1].throttle_position, 0.25);
}

#[test]
fn test_lap_counter_is_not_read_as_throttle() {
    let csv = "timestamp,laps,lap_distance,speed,throttle\n1.0,3,120,140,0.95\n";
    let samples = parse_telemetry(csv, &Thresholds::default()).unwrap();
    assert_eq!(samples[0].lap_distance, 120.0);
    assert_eq!(samples[0].throttle_position, 0.95);
}

#[test]
fn test_ragged_rows_are_padded_not_rejected() {
    let csv = "timestamp,lap_distance,speed,aps\n\
               1.0,100,120\n\
               1.1,102,121,0.8,extra\n";
    let samples = parse_telemetry(csv, &Thresholds::default()).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].throttle_position, 0.0);
    assert_eq!(samples[1].throttle_position, 0.8);
}
