use crate::estimator::{mean, normalize};
use crate::models::{days_between, CycleRecord, CycleStats};

/// Compute cycle statistics over the whole history for the stats view.
pub fn cycle_stats(cycles: &[CycleRecord]) -> CycleStats {
    let history = normalize(cycles);
    let records = &history.records;

    let Some(last) = records.last() else {
        return CycleStats {
            total_cycles: 0,
            avg_cycle_length: None,
            avg_period_length: None,
            shortest_cycle: None,
            longest_cycle: None,
            last_period_start: None,
            last_period_end: None,
        };
    };

    let period_lengths: Vec<f64> = records
        .iter()
        .filter_map(|c| c.period_length())
        .map(|days| days as f64)
        .collect();

    let cycle_lengths: Vec<i64> = records
        .windows(2)
        .map(|w| days_between(w[0].start_date, w[1].start_date))
        .collect();
    let cycle_lengths_f: Vec<f64> = cycle_lengths.iter().map(|&d| d as f64).collect();

    CycleStats {
        total_cycles: records.len(),
        avg_cycle_length: (!cycle_lengths.is_empty()).then(|| mean(&cycle_lengths_f) as f32),
        avg_period_length: (!period_lengths.is_empty()).then(|| mean(&period_lengths) as f32),
        shortest_cycle: cycle_lengths.iter().copied().min(),
        longest_cycle: cycle_lengths.iter().copied().max(),
        last_period_start: Some(last.start_date),
        last_period_end: last.end_date,
    }
}
