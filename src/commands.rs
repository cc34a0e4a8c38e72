use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use cykel_engine::{
    cycle_stats, Clock, CycleHistoryStore, CyclePhase, CyclePredictor, CycleRecord, EngineConfig,
    FixedClock, JsonHistoryStore, PredictionEngine, SystemClock,
};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Args)]
pub struct HistoryArgs {
    /// History file (defaults to the local data directory)
    #[arg(long)]
    pub history: Option<PathBuf>,
}

#[derive(Args)]
pub struct EngineArgs {
    #[command(flatten)]
    pub history: HistoryArgs,
    /// Engine config file (defaults to the user config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

#[derive(Serialize)]
struct PhaseReport {
    today: NaiveDate,
    phase: CyclePhase,
    cycle_day: Option<i64>,
    days_until_next_period: i64,
    is_overdue: bool,
    in_fertile_window: bool,
}

pub fn predict(args: EngineArgs) -> CommandResult {
    let cycles = load_history(&args.history)?;
    let engine = build_engine(&args)?;
    let prediction = engine.predict_next_period(&cycles);
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

pub fn phase(args: EngineArgs) -> CommandResult {
    let cycles = load_history(&args.history)?;
    let engine = build_engine(&args)?;
    let snapshot = engine.snapshot(&cycles);
    let prediction = &snapshot.prediction;

    let report = PhaseReport {
        today: snapshot.today,
        phase: snapshot.phase,
        cycle_day: snapshot.cycle_day,
        days_until_next_period: prediction.days_until_next_period(snapshot.today),
        is_overdue: snapshot.is_overdue,
        in_fertile_window: prediction.is_in_fertile_window(snapshot.today),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn stats(args: HistoryArgs) -> CommandResult {
    let cycles = load_history(&args)?;
    println!("{}", serde_json::to_string_pretty(&cycle_stats(&cycles))?);
    Ok(())
}

fn load_history(args: &HistoryArgs) -> Result<Vec<CycleRecord>, Box<dyn std::error::Error>> {
    let store = match &args.history {
        Some(path) => JsonHistoryStore::new(path),
        None => JsonHistoryStore::default_location()?,
    };
    log::info!("reading cycle history from {}", store.path().display());
    Ok(store.fetch_all_cycles()?)
}

fn build_engine(
    args: &EngineArgs,
) -> Result<PredictionEngine<FixedClock>, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::load_default()?,
    };
    // Pin the date once so prediction and phase agree even across midnight.
    let today = args.today.unwrap_or_else(|| SystemClock.today());
    Ok(PredictionEngine::with_clock(config, FixedClock(today)))
}
