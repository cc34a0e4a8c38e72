pub mod config;
pub mod engine;
pub mod estimator;
pub mod models;
pub mod phase;
pub mod prediction;
pub mod stats;
pub mod store;

pub use config::{ConfigError, EngineConfig, EngineConstants, FallbackConfig};
pub use engine::{
    Clock, CyclePredictor, EngineSnapshot, FixedClock, FixedCyclePredictor, PredictionEngine,
    SystemClock,
};
pub use models::{CycleEstimate, CyclePhase, CycleRecord, CycleStats, PredictionResult};
pub use stats::cycle_stats;
pub use store::{CycleHistoryStore, InMemoryHistoryStore, JsonHistoryStore, StoreError};
