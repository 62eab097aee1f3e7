//! PerfectLap analysis engine
//!
//! Segments a logged session into laps, synthesizes the theoretical best lap
//! from the fastest non-drafting sector passes, and runs the coaching
//! analyzers (consistency, braking/acceleration zones, corner apexes, speed
//! deficits) whose outputs are ranked into improvement areas.
//!
//! Every stage is a pure function of the samples and the [`AnalysisConfig`];
//! nothing is cached between runs.
//!
//! [`AnalysisConfig`]: plap_core::AnalysisConfig

pub mod consistency;
pub mod corners;
pub mod deficits;
pub mod drafting;
pub mod laps;
pub mod pipeline;
pub mod ranker;
pub mod sectors;
pub mod summary;
pub mod synth;
pub mod zones;

pub use pipeline::{analyze_samples, analyze_source, analyze_text};
pub use summary::coaching_context;
