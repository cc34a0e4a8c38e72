use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged cycle. The end date is only known once the period has finished.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl CycleRecord {
    pub fn new(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_date,
            end_date,
        }
    }

    /// A cycle whose period is still ongoing (no end date yet).
    pub fn open(start_date: NaiveDate) -> Self {
        Self::new(start_date, None)
    }

    /// Inclusive length of the bleeding interval in days.
    /// `None` when the end date is missing or precedes the start date.
    pub fn period_length(&self) -> Option<i64> {
        let end = self.end_date?;
        let days = days_between(self.start_date, end);
        (days >= 0).then_some(days + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl CyclePhase {
    /// Phases in the order they occur within one cycle.
    pub const ALL: [CyclePhase; 4] = [
        CyclePhase::Menstrual,
        CyclePhase::Follicular,
        CyclePhase::Ovulation,
        CyclePhase::Luteal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "menstrual",
            CyclePhase::Follicular => "follicular",
            CyclePhase::Ovulation => "ovulation",
            CyclePhase::Luteal => "luteal",
        }
    }

    /// The phase that follows this one; luteal wraps back to menstrual.
    pub fn next(&self) -> CyclePhase {
        match self {
            CyclePhase::Menstrual => CyclePhase::Follicular,
            CyclePhase::Follicular => CyclePhase::Ovulation,
            CyclePhase::Ovulation => CyclePhase::Luteal,
            CyclePhase::Luteal => CyclePhase::Menstrual,
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typical lengths derived from recent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleEstimate {
    pub estimated_cycle_length: i64,
    pub estimated_period_length: i64,
    pub is_regular: bool,
    /// Number of cycle-length gaps the estimate was computed from.
    pub sample_size: usize,
}

/// Snapshot of the next predicted period. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub estimated_cycle_length: i64,
    pub estimated_period_length: i64,
    pub next_period_start: NaiveDate,
    pub predicted_period_end: NaiveDate,
    pub ovulation_date: NaiveDate,
    pub fertile_window_start: NaiveDate,
    pub fertile_window_end: NaiveDate,
    pub is_regular: bool,
    pub sample_size: usize,
    /// Start of the most recent logged cycle, `None` when there was no history.
    pub last_period_start: Option<NaiveDate>,
}

impl PredictionResult {
    /// True once `today` reaches the predicted start without a new cycle logged.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        today >= self.next_period_start
    }

    /// Negative when overdue.
    pub fn days_until_next_period(&self, today: NaiveDate) -> i64 {
        days_between(today, self.next_period_start)
    }

    pub fn is_in_fertile_window(&self, today: NaiveDate) -> bool {
        today >= self.fertile_window_start && today <= self.fertile_window_end
    }

    /// 1-indexed day of the current cycle. Dates before the cycle start count as day 1.
    pub fn cycle_day(&self, today: NaiveDate) -> Option<i64> {
        self.last_period_start.map(|start| cycle_day(start, today))
    }
}

/// Summary numbers for a stats view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleStats {
    pub total_cycles: usize,
    pub avg_cycle_length: Option<f32>,
    pub avg_period_length: Option<f32>,
    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub last_period_start: Option<NaiveDate>,
    pub last_period_end: Option<NaiveDate>,
}

/// Calendar-day offset, saturating at the ends of the representable range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    chrono::Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

/// Whole days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

pub(crate) fn cycle_day(cycle_start: NaiveDate, today: NaiveDate) -> i64 {
    days_between(cycle_start, today).saturating_add(1).max(1)
}
