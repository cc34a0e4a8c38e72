use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Upper bound accepted for `window_size`.
pub const MAX_WINDOW_SIZE: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("config directory not found")]
    NoConfigDir,
}

/// Lengths used when the history is too short to estimate anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default = "default_cycle_length")]
    pub default_cycle_length: i64,
    #[serde(default = "default_period_length")]
    pub default_period_length: i64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            default_cycle_length: default_cycle_length(),
            default_period_length: default_period_length(),
        }
    }
}

/// Calibration constants. The defaults follow common clinical convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConstants {
    /// Maximum number of recent cycle-length gaps considered.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Population standard deviation of gaps (days) at or below which history counts as regular.
    #[serde(default = "default_regularity_threshold")]
    pub regularity_threshold_days: f64,
    /// Days between ovulation and the next period start.
    #[serde(default = "default_luteal_length")]
    pub luteal_length_days: i64,
    #[serde(default = "default_min_cycle_length")]
    pub min_cycle_length: i64,
    #[serde(default = "default_max_cycle_length")]
    pub max_cycle_length: i64,
    #[serde(default = "default_min_period_length")]
    pub min_period_length: i64,
    #[serde(default = "default_max_period_length")]
    pub max_period_length: i64,
    #[serde(default = "default_fertile_before")]
    pub fertile_days_before_ovulation: i64,
    #[serde(default = "default_fertile_after")]
    pub fertile_days_after_ovulation: i64,
    /// Half-width of the ovulation phase around the ovulation date.
    #[serde(default = "default_ovulation_margin")]
    pub ovulation_margin_days: i64,
}

impl Default for EngineConstants {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            regularity_threshold_days: default_regularity_threshold(),
            luteal_length_days: default_luteal_length(),
            min_cycle_length: default_min_cycle_length(),
            max_cycle_length: default_max_cycle_length(),
            min_period_length: default_min_period_length(),
            max_period_length: default_max_period_length(),
            fertile_days_before_ovulation: default_fertile_before(),
            fertile_days_after_ovulation: default_fertile_after(),
            ovulation_margin_days: default_ovulation_margin(),
        }
    }
}

/// Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub constants: EngineConstants,
}

impl EngineConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when no file exists.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_path()?;
        if !path.exists() {
            log::debug!("no engine config at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.constants;
        positive("fallback.default_cycle_length", self.fallback.default_cycle_length)?;
        positive("fallback.default_period_length", self.fallback.default_period_length)?;
        if c.window_size == 0 || c.window_size > MAX_WINDOW_SIZE {
            return Err(invalid(
                "constants.window_size",
                format!("must be between 1 and {MAX_WINDOW_SIZE}"),
            ));
        }
        if c.regularity_threshold_days.is_nan() || c.regularity_threshold_days < 0.0 {
            return Err(invalid(
                "constants.regularity_threshold_days",
                "must be a non-negative number",
            ));
        }
        positive("constants.luteal_length_days", c.luteal_length_days)?;
        positive("constants.min_cycle_length", c.min_cycle_length)?;
        positive("constants.min_period_length", c.min_period_length)?;
        if c.min_cycle_length > c.max_cycle_length {
            return Err(invalid(
                "constants.max_cycle_length",
                "must not be below min_cycle_length",
            ));
        }
        if c.min_period_length > c.max_period_length {
            return Err(invalid(
                "constants.max_period_length",
                "must not be below min_period_length",
            ));
        }
        non_negative(
            "constants.fertile_days_before_ovulation",
            c.fertile_days_before_ovulation,
        )?;
        non_negative(
            "constants.fertile_days_after_ovulation",
            c.fertile_days_after_ovulation,
        )?;
        non_negative("constants.ovulation_margin_days", c.ovulation_margin_days)?;
        Ok(())
    }
}

/// `<config dir>/cykel/engine.json`
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("cykel").join("engine.json"))
}

fn positive(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value < 1 {
        return Err(invalid(field, format!("must be positive, got {value}")));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value < 0 {
        return Err(invalid(field, format!("must not be negative, got {value}")));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn default_cycle_length() -> i64 {
    28
}
fn default_period_length() -> i64 {
    5
}
fn default_window_size() -> usize {
    6
}
fn default_regularity_threshold() -> f64 {
    4.0
}
fn default_luteal_length() -> i64 {
    14
}
fn default_min_cycle_length() -> i64 {
    21
}
fn default_max_cycle_length() -> i64 {
    35
}
fn default_min_period_length() -> i64 {
    2
}
fn default_max_period_length() -> i64 {
    10
}
fn default_fertile_before() -> i64 {
    5
}
fn default_fertile_after() -> i64 {
    1
}
fn default_ovulation_margin() -> i64 {
    1
}
