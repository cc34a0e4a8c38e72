use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::models::{days_between, CycleEstimate, CycleRecord};

/// History sorted by start date with duplicate starts collapsed.
#[derive(Debug, Clone)]
pub struct NormalizedHistory<'a> {
    pub records: Vec<&'a CycleRecord>,
    /// Input was out of order, had duplicate starts, overlapping ranges or an
    /// end date before its start.
    pub anomalous: bool,
}

impl<'a> NormalizedHistory<'a> {
    pub fn last_start(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.start_date)
    }
}

/// Sort by start date and collapse duplicate starts. Malformed input is
/// flagged, never rejected.
pub fn normalize(history: &[CycleRecord]) -> NormalizedHistory<'_> {
    let mut anomalous = !history
        .windows(2)
        .all(|w| w[0].start_date < w[1].start_date);

    let mut sorted: Vec<&CycleRecord> = history.iter().collect();
    sorted.sort_by_key(|r| r.start_date);

    let mut records: Vec<&CycleRecord> = Vec::with_capacity(sorted.len());
    for record in sorted {
        if record.end_date.is_some() && record.period_length().is_none() {
            anomalous = true;
        }
        if let Some(last) = records
            .last_mut()
            .filter(|last| last.start_date == record.start_date)
        {
            // Same start logged twice: prefer the copy that knows its end.
            if last.end_date.is_none() && record.end_date.is_some() {
                *last = record;
            }
            continue;
        }
        records.push(record);
    }

    let overlapping = records
        .windows(2)
        .any(|w| w[0].end_date.is_some_and(|end| end >= w[1].start_date));
    anomalous |= overlapping;

    if anomalous {
        log::debug!(
            "cycle history needed normalisation ({} records in, {} kept)",
            history.len(),
            records.len()
        );
    }

    NormalizedHistory { records, anomalous }
}

/// Estimate typical cycle and period length from `history`.
///
/// With fewer than two records the fallback lengths are returned unchanged.
pub fn estimate(history: &[CycleRecord], config: &EngineConfig) -> CycleEstimate {
    estimate_normalized(&normalize(history), config)
}

pub(crate) fn estimate_normalized(
    history: &NormalizedHistory<'_>,
    config: &EngineConfig,
) -> CycleEstimate {
    let constants = &config.constants;
    let records = &history.records;

    if records.len() < 2 {
        log::debug!(
            "not enough history ({} records); using fallback lengths",
            records.len()
        );
        return fallback(config);
    }

    // `window_size` gaps need one more start date.
    let window_start = records
        .len()
        .saturating_sub(constants.window_size.max(1).saturating_add(1));
    let recent = &records[window_start..];

    let gaps: Vec<f64> = recent
        .windows(2)
        .map(|w| days_between(w[0].start_date, w[1].start_date) as f64)
        .collect();

    let period_lengths: Vec<f64> = recent
        .iter()
        .filter_map(|r| r.period_length())
        .map(|days| days as f64)
        .collect();

    let raw_cycle = mean(&gaps).round() as i64;
    let raw_period = if period_lengths.is_empty() {
        config.fallback.default_period_length
    } else {
        mean(&period_lengths).round() as i64
    };

    let cycle_length = clamp_to(raw_cycle, constants.min_cycle_length, constants.max_cycle_length);
    let period_length =
        clamp_to(raw_period, constants.min_period_length, constants.max_period_length);
    let clamped = cycle_length != raw_cycle || period_length != raw_period;
    if clamped {
        log::warn!(
            "estimate outside plausible bounds (cycle {raw_cycle}, period {raw_period}); clamped to {cycle_length}/{period_length}"
        );
    }

    let spread = std_deviation(&gaps);
    let is_regular =
        spread <= constants.regularity_threshold_days && !clamped && !history.anomalous;

    log::trace!(
        "estimated cycle {cycle_length}d, period {period_length}d, stddev {spread:.2} over {} gaps",
        gaps.len()
    );

    CycleEstimate {
        estimated_cycle_length: cycle_length,
        estimated_period_length: period_length,
        is_regular,
        sample_size: gaps.len(),
    }
}

fn fallback(config: &EngineConfig) -> CycleEstimate {
    CycleEstimate {
        estimated_cycle_length: config.fallback.default_cycle_length,
        estimated_period_length: config.fallback.default_period_length,
        is_regular: false,
        sample_size: 0,
    }
}

/// Like `Ord::clamp`, but an inverted range collapses to `min` instead of panicking.
fn clamp_to(value: i64, min: i64, max: i64) -> i64 {
    value.clamp(min, max.max(min))
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub(crate) fn std_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
