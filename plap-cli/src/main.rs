//! PerfectLap command line
//!
//! Analyzes a logged session into a theoretical best lap report, or writes a
//! synthetic demo session to play with.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use plap_adapters::{DemoSource, FileSource};
use plap_analysis::{analyze_source, coaching_context};
use plap_core::{AnalysisConfig, PerfectLapResult, TelemetrySource};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Theoretical best lap analysis for logged telemetry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a telemetry CSV export
    Analyze(AnalyzeArgs),
    /// Write a synthetic multi-lap session as CSV
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Telemetry CSV file
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Sector layout and thresholds JSON (defaults to the built-in layout)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,

    /// Print the plain-text coaching context instead of JSON
    #[arg(long, action = ArgAction::SetTrue)]
    summary: bool,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Number of laps to simulate
    #[arg(long, default_value_t = 5)]
    laps: u32,

    /// Lap (1-based) that picks up a tow on the back straight
    #[arg(long)]
    drafting_lap: Option<u32>,

    /// Output CSV path (stdout when omitted)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    source: &'a str,
    result: &'a PerfectLapResult,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Demo(args) => run_demo(args),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    let mut source = FileSource::new(&args.input);
    info!("Analyzing {}", source.name());
    let result = analyze_source(&mut source, &config)?;

    let output = if args.summary {
        coaching_context(&result)
    } else {
        let report = Report {
            generated_at: Utc::now(),
            source: source.name(),
            result: &result,
        };
        if args.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        }
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output).context("Failed to write report")?;
    Ok(())
}

fn run_demo(args: DemoArgs) -> Result<()> {
    let mut source = DemoSource::new(args.laps);
    if let Some(lap) = args.drafting_lap {
        source = source.with_drafting_lap(lap);
    }
    let csv = source.read_text()?;

    match &args.output {
        Some(path) => {
            fs::write(path, &csv)
                .with_context(|| format!("Failed to write demo session: {}", path.display()))?;
            info!("Wrote {} demo laps to {}", source.laps(), path.display());
        }
        None => {
            io::stdout()
                .lock()
                .write_all(csv.as_bytes())
                .context("Failed to write demo session")?;
        }
    }
    Ok(())
}
