use chrono::NaiveDate;

use crate::config::EngineConstants;
use crate::models::{add_days, CycleEstimate, PredictionResult};

/// Predict the next period from the most recent cycle start.
///
/// Ovulation is placed a fixed luteal length before the next period; cycle
/// length variation is attributed to the follicular phase. The prediction is
/// never moved forward when the predicted date has passed.
pub fn predict_next_period(
    last_cycle_start: NaiveDate,
    estimate: &CycleEstimate,
    constants: &EngineConstants,
) -> PredictionResult {
    let next_period_start = add_days(last_cycle_start, estimate.estimated_cycle_length);
    let predicted_period_end = add_days(
        next_period_start,
        estimate.estimated_period_length.saturating_sub(1).max(0),
    );

    let ovulation_date = add_days(next_period_start, constants.luteal_length_days.saturating_neg());
    let fertile_window_start = add_days(
        ovulation_date,
        constants.fertile_days_before_ovulation.saturating_neg(),
    );
    let fertile_window_end = add_days(ovulation_date, constants.fertile_days_after_ovulation);

    PredictionResult {
        estimated_cycle_length: estimate.estimated_cycle_length,
        estimated_period_length: estimate.estimated_period_length,
        next_period_start,
        predicted_period_end,
        ovulation_date,
        fertile_window_start,
        fertile_window_end,
        is_regular: estimate.is_regular,
        sample_size: estimate.sample_size,
        last_period_start: Some(last_cycle_start),
    }
}
