//! Demo source that generates a synthetic logged session
//!
//! Simulates laps around a ~3.7 km road course with straights, braking zones,
//! corners and acceleration phases, sampled at 20Hz and rendered as a logger
//! CSV export. Output is fully deterministic: lap-to-lap variation comes from
//! fixed per-lap pace factors and seeded jitter, never from a clock or RNG.

use anyhow::{Context, Result};
use plap_core::{TelemetrySample, TelemetrySource};

// =============================================================================
// Track definition: a sequence of segments that form a lap
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    Straight, // Full throttle
    Braking,  // Heavy braking into a corner
    Corner,   // Maintenance throttle, minimum speed
    Accel,    // Progressive throttle on exit
}

#[derive(Clone, Copy)]
struct TrackSegment {
    kind: SegmentKind,
    length: f64,       // metres
    target_speed: f64, // km/h at end of segment
    steering: f64,     // peak steering angle in degrees (signed: + = right)
}

const fn seg(kind: SegmentKind, length: f64, target_speed: f64, steering: f64) -> TrackSegment {
    TrackSegment {
        kind,
        length,
        target_speed,
        steering,
    }
}

/// A 3.7 km circuit. Only the opening straight exceeds 160 km/h.
const TRACK: [TrackSegment; 16] = [
    // Start/finish straight, T1 braking
    seg(SegmentKind::Straight, 500.0, 170.0, 0.0),
    seg(SegmentKind::Braking, 150.0, 80.0, 2.0),
    seg(SegmentKind::Corner, 150.0, 75.0, 95.0),
    seg(SegmentKind::Accel, 200.0, 140.0, 20.0),
    // Short straight into T2
    seg(SegmentKind::Straight, 300.0, 150.0, 0.0),
    seg(SegmentKind::Braking, 100.0, 95.0, -2.0),
    seg(SegmentKind::Corner, 200.0, 90.0, -60.0),
    seg(SegmentKind::Accel, 200.0, 135.0, -10.0),
    // Back straight into the hairpin
    seg(SegmentKind::Straight, 500.0, 155.0, 0.0),
    seg(SegmentKind::Braking, 120.0, 70.0, 3.0),
    seg(SegmentKind::Corner, 180.0, 65.0, 120.0),
    seg(SegmentKind::Accel, 200.0, 125.0, 15.0),
    // T5 complex
    seg(SegmentKind::Braking, 150.0, 85.0, -2.0),
    seg(SegmentKind::Corner, 200.0, 80.0, -85.0),
    seg(SegmentKind::Accel, 250.0, 130.0, -10.0),
    // Run to the line
    seg(SegmentKind::Straight, 300.0, 150.0, 0.0),
];

/// Index of the back straight, where a drafting lap picks up a tow
const BACK_STRAIGHT: usize = 8;
const DRAFT_BONUS_KPH: f64 = 14.0;

/// Per-lap pace multipliers, cycled
const LAP_PACE: [f64; 5] = [0.975, 0.99, 0.985, 1.0, 0.98];
/// Per-lap braking point offsets in metres, cycled
const BRAKE_SHIFT: [f64; 5] = [0.0, 18.0, -12.0, 6.0, 30.0];

pub const DEMO_HEADERS: [&str; 6] = [
    "timestamp",
    "Laptrigger_lapdist_dls",
    "speed",
    "Steering_Angle",
    "pbrake_f",
    "aps",
];

fn track_length() -> f64 {
    TRACK.iter().map(|s| s.length).sum()
}

// =============================================================================
// Interpolation state derived from track position
// =============================================================================

struct LapState {
    speed: f64,
    throttle: f64,
    brake: f64,
    steering: f64,
}

fn compute_lap_state(distance: f64, lap_index: usize, drafting: bool) -> LapState {
    let lap_length = track_length();
    let shifted = (distance + BRAKE_SHIFT[lap_index % BRAKE_SHIFT.len()]).rem_euclid(lap_length);

    // Find current segment
    let mut start = 0.0;
    let mut seg_idx = TRACK.len() - 1;
    for (i, segment) in TRACK.iter().enumerate() {
        if shifted < start + segment.length {
            seg_idx = i;
            break;
        }
        start += segment.length;
    }
    if seg_idx == TRACK.len() - 1 {
        start = lap_length - TRACK[seg_idx].length;
    }

    let segment = TRACK[seg_idx];
    let seg_t = ((shifted - start) / segment.length).clamp(0.0, 1.0);
    let prev_target = if seg_idx > 0 {
        TRACK[seg_idx - 1].target_speed
    } else {
        TRACK[TRACK.len() - 1].target_speed
    };

    let smooth_t = smoothstep(seg_t);
    let mut speed = lerp(prev_target, segment.target_speed, smooth_t)
        * LAP_PACE[lap_index % LAP_PACE.len()];
    if drafting && seg_idx == BACK_STRAIGHT {
        speed += DRAFT_BONUS_KPH * smooth_t;
    }

    let (throttle, brake) = match segment.kind {
        SegmentKind::Straight => (1.0, 0.0),
        SegmentKind::Braking => (0.0, 0.85 - 0.35 * smooth_t),
        SegmentKind::Corner => (0.25 + 0.3 * seg_t, 0.0),
        SegmentKind::Accel => (0.6 + 0.4 * smooth_t, 0.0),
    };

    // Steering: ramp in during first half, ramp out during second half
    let envelope = if seg_t < 0.5 {
        smoothstep(seg_t * 2.0)
    } else {
        smoothstep((1.0 - seg_t) * 2.0)
    };

    LapState {
        speed,
        throttle,
        brake,
        steering: segment.steering * envelope,
    }
}

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Simple deterministic noise from a seed
fn noise(seed: f64) -> f64 {
    let x = (seed * 12.9898 + 78.233).sin() * 43_758.547;
    x - x.floor()
}

/// Small jitter centered around 0
fn jitter(seed: f64, amplitude: f64) -> f64 {
    (noise(seed) - 0.5) * 2.0 * amplitude
}

// =============================================================================
// DemoSource
// =============================================================================

pub struct DemoSource {
    laps: u32,
    drafting_lap: Option<u32>,
    sample_rate_hz: f64,
}

impl DemoSource {
    pub fn new(laps: u32) -> Self {
        Self {
            laps: laps.max(1),
            drafting_lap: None,
            sample_rate_hz: 20.0,
        }
    }

    /// Give lap `lap_number` (1-based) a slipstream tow down the back straight
    pub fn with_drafting_lap(mut self, lap_number: u32) -> Self {
        self.drafting_lap = Some(lap_number);
        self
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Simulate the session sample by sample
    pub fn generate_samples(&self) -> Vec<TelemetrySample> {
        let dt = 1.0 / self.sample_rate_hz;
        let lap_length = track_length();
        let mut samples = Vec::new();

        let mut timestamp = 0.0;
        let mut distance = 0.0;
        let mut lap_index = 0usize;
        let mut n = 0.0;

        while lap_index < self.laps as usize {
            let drafting = self.drafting_lap == Some(lap_index as u32 + 1);
            let state = compute_lap_state(distance, lap_index, drafting);
            n += 1.0;

            let speed = (state.speed + jitter(n, 0.3)).max(1.0);
            let brake = if state.brake > 0.0 {
                (state.brake + jitter(n * 1.3, 0.02)).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let throttle = (state.throttle + jitter(n * 1.2, 0.02)).clamp(0.0, 1.0);

            samples.push(TelemetrySample {
                timestamp,
                lap_distance: distance,
                speed,
                steering_angle: state.steering + jitter(n * 1.4, 0.5),
                front_brake_pressure: brake,
                throttle_position: throttle,
            });

            timestamp += dt;
            distance += speed / 3.6 * dt;
            if distance >= lap_length {
                distance -= lap_length;
                lap_index += 1;
            }
        }

        samples
    }

    /// Render the session as a logger CSV export
    pub fn generate_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(DEMO_HEADERS)?;
        for s in self.generate_samples() {
            writer.write_record(&[
                format!("{:.3}", s.timestamp),
                format!("{:.2}", s.lap_distance),
                format!("{:.2}", s.speed),
                format!("{:.2}", s.steering_angle),
                format!("{:.3}", s.front_brake_pressure),
                format!("{:.3}", s.throttle_position),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush demo CSV: {}", e))?;
        String::from_utf8(bytes).context("Demo CSV is not valid UTF-8")
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new(5)
    }
}

impl TelemetrySource for DemoSource {
    fn name(&self) -> &str {
        "Demo"
    }

    fn read_text(&mut self) -> Result<String> {
        self.generate_csv()
    }
}
