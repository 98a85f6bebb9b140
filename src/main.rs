//! SmartRoom batch runner.
//!
//! Reads a JSON array of room cycles, evaluates every room once, and
//! prints one JSON outcome per line on stdout. Logs go to stderr.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                      │
//! │  JsonConfigFile   ReplayPredictor   LogEventSink   logger     │
//! │  (ConfigPort)     (Predictor)       (EventSink)    (stderr)   │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ───────────────────     │
//! │                                                               │
//! │  ┌─────────────────────────────────────────────────────┐      │
//! │  │            RoomController (pure logic)              │      │
//! │  │  validate · fusion · rules · aggregate · reconcile  │      │
//! │  └─────────────────────────────────────────────────────┘      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! **Usage:**
//! ```bash
//! smartroom cycles.json [--config controller.json] [--strategy ml-if-confident --threshold 0.8] [--verbose]
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use smartroom::adapters::config_file::JsonConfigFile;
use smartroom::adapters::log_sink::LogEventSink;
use smartroom::adapters::logger;
use smartroom::adapters::predictor::ReplayPredictor;
use smartroom::app::commands::AppCommand;
use smartroom::app::service::{RoomController, RoomCycle};
use smartroom::config::ControllerConfig;
use smartroom::fusion::FusionStrategy;

/// Evaluate room readings and print the actions to issue
#[derive(Parser, Debug)]
#[command(name = "smartroom", version)]
struct Args {
    /// JSON file holding an array of room cycles
    #[arg(value_name = "CYCLES")]
    cycles: PathBuf,

    /// Controller configuration (JSON); defaults are used if absent
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured default fusion strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Confidence threshold for `ml-if-confident`
    #[arg(long, default_value_t = FusionStrategy::DEFAULT_CONFIDENCE_THRESHOLD)]
    threshold: f32,

    /// Write the effective configuration back to `--config`
    #[arg(long, requires = "config")]
    save_config: bool,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    LogicalOr,
    MlIfConfident,
    ManualOnly,
}

impl StrategyArg {
    fn into_strategy(self, threshold: f32) -> FusionStrategy {
        match self {
            Self::LogicalOr => FusionStrategy::LogicalOr,
            Self::MlIfConfident => FusionStrategy::ml_if_confident(threshold),
            Self::ManualOnly => FusionStrategy::ManualOnly,
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose).map_err(|e| anyhow!("logger init failed: {e}"))?;
    info!("smartroom v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Configuration ──────────────────────────────────────
    let storage = args.config.as_ref().map(JsonConfigFile::new);
    let mut controller = match &storage {
        Some(port) => RoomController::from_storage(port)
            .with_context(|| format!("loading config {}", port.path().display()))?,
        None => RoomController::new(ControllerConfig::default())?,
    };

    let mut sink = LogEventSink::new();
    if let Some(arg) = args.strategy {
        controller.handle_command(AppCommand::SetFusionStrategy(arg.into_strategy(args.threshold)), &mut sink)?;
    }
    if args.save_config {
        if let Some(port) = &storage {
            controller.save_config(port)?;
        }
    }

    // ── 2. Input ──────────────────────────────────────────────
    let text = fs::read_to_string(&args.cycles).with_context(|| format!("reading {}", args.cycles.display()))?;
    let cycles: Vec<RoomCycle> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", args.cycles.display()))?;
    let mut predictor = ReplayPredictor::from_cycles(&cycles);
    info!("{} cycles, {} recorded predictions", cycles.len(), predictor.len());

    // ── 3. Evaluate ───────────────────────────────────────────
    let report = controller.run_batch(&cycles, &mut predictor, &mut sink);

    for outcome in &report.outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }

    // ── 4. Summary ────────────────────────────────────────────
    for (action, n) in report.tally.iter() {
        info!("  {:<12} {}", action.to_string(), n);
    }
    for rejected in &report.rejected {
        warn!("rejected {}: {}", rejected.room, rejected.error);
    }
    let discrepancies = report.discrepancy_count();
    if discrepancies > 0 {
        warn!("{} room(s) disagree with the reasoner", discrepancies);
    }
    if report.occupancy_score.total() > 0 {
        let (o, r) = (&report.occupancy_score, &report.rule_presence_score);
        info!(
            "occupancy  P={:.2} R={:.2} F1={:.2} | rule presence  P={:.2} R={:.2} F1={:.2}",
            o.precision(),
            o.recall(),
            o.f1(),
            r.precision(),
            r.recall(),
            r.f1()
        );
    }

    Ok(())
}
