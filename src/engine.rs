use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, EngineConstants, FallbackConfig};
use crate::estimator;
use crate::models::{CycleEstimate, CyclePhase, CycleRecord, PredictionResult};
use crate::phase;
use crate::prediction;

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// The surface the rest of the app depends on. Implementations hold no
/// state that changes between calls.
pub trait CyclePredictor {
    /// Predict the next period from the full history. Never fails.
    fn predict_next_period(&self, history: &[CycleRecord]) -> PredictionResult;

    /// Phase for today. `None` means no cycle has ever been logged, which
    /// always yields [`CyclePhase::Follicular`].
    fn current_phase(
        &self,
        last_period_start: Option<NaiveDate>,
        prediction: &PredictionResult,
    ) -> CyclePhase;
}

/// Everything a screen needs to render for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub today: NaiveDate,
    pub prediction: PredictionResult,
    pub phase: CyclePhase,
    pub cycle_day: Option<i64>,
    pub is_overdue: bool,
}

/// Production predictor. "Today" comes from the injected clock.
#[derive(Debug, Clone)]
pub struct PredictionEngine<C = SystemClock> {
    config: EngineConfig,
    clock: C,
}

impl PredictionEngine<SystemClock> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for PredictionEngine<SystemClock> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<C: Clock> PredictionEngine<C> {
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn estimate(&self, history: &[CycleRecord]) -> CycleEstimate {
        estimator::estimate(history, &self.config)
    }

    /// Classify an explicit date rather than the clock's today.
    pub fn current_phase_on(
        &self,
        today: NaiveDate,
        last_period_start: Option<NaiveDate>,
        prediction: &PredictionResult,
    ) -> CyclePhase {
        // No logged cycle: neutral phase, even if the caller passed the
        // synthetic today anchor.
        match (last_period_start, prediction.last_period_start) {
            (Some(start), Some(_)) => {
                phase::current_phase(today, start, prediction, &self.config.constants)
            }
            _ => CyclePhase::Follicular,
        }
    }

    /// Prediction and phase for today in one call.
    pub fn snapshot(&self, history: &[CycleRecord]) -> EngineSnapshot {
        let today = self.today();
        let prediction = self.predict_next_period(history);
        let phase = self.current_phase_on(today, prediction.last_period_start, &prediction);
        EngineSnapshot {
            today,
            cycle_day: prediction.cycle_day(today),
            is_overdue: prediction.last_period_start.is_some() && prediction.is_overdue(today),
            prediction,
            phase,
        }
    }
}

impl<C: Clock> CyclePredictor for PredictionEngine<C> {
    fn predict_next_period(&self, history: &[CycleRecord]) -> PredictionResult {
        let normalized = estimator::normalize(history);
        let estimate = estimator::estimate_normalized(&normalized, &self.config);

        match normalized.last_start() {
            Some(last_start) => {
                prediction::predict_next_period(last_start, &estimate, &self.config.constants)
            }
            None => {
                // No history: anchor on today so every date is defined, but
                // report that no real cycle start exists.
                let today = self.today();
                log::debug!("empty cycle history; anchoring prediction on {today}");
                PredictionResult {
                    last_period_start: None,
                    ..prediction::predict_next_period(today, &estimate, &self.config.constants)
                }
            }
        }
    }

    fn current_phase(
        &self,
        last_period_start: Option<NaiveDate>,
        prediction: &PredictionResult,
    ) -> CyclePhase {
        self.current_phase_on(self.today(), last_period_start, prediction)
    }
}

/// Predictor returning the same prediction and phase for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCyclePredictor {
    pub prediction: PredictionResult,
    pub phase: CyclePhase,
}

impl FixedCyclePredictor {
    pub fn new(prediction: PredictionResult, phase: CyclePhase) -> Self {
        Self { prediction, phase }
    }

    /// A regular 28/5 cycle starting on `last_period_start`.
    pub fn seeded(last_period_start: NaiveDate, phase: CyclePhase) -> Self {
        let fallback = FallbackConfig::default();
        let estimate = CycleEstimate {
            estimated_cycle_length: fallback.default_cycle_length,
            estimated_period_length: fallback.default_period_length,
            is_regular: true,
            sample_size: 6,
        };
        let prediction = prediction::predict_next_period(
            last_period_start,
            &estimate,
            &EngineConstants::default(),
        );
        Self::new(prediction, phase)
    }
}

impl CyclePredictor for FixedCyclePredictor {
    fn predict_next_period(&self, _history: &[CycleRecord]) -> PredictionResult {
        self.prediction.clone()
    }

    fn current_phase(
        &self,
        _last_period_start: Option<NaiveDate>,
        _prediction: &PredictionResult,
    ) -> CyclePhase {
        self.phase
    }
}
