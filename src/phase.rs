use chrono::NaiveDate;

use crate::config::EngineConstants;
use crate::models::{add_days, cycle_day, CyclePhase, PredictionResult};

/// Classify `today` within the cycle that began on `last_cycle_start`.
///
/// Total: every date maps to exactly one phase. Dates before the cycle start
/// count as day 1. Once the predicted start has passed without a new cycle
/// being logged the phase stays luteal; a new cycle only begins when one is
/// recorded.
pub fn current_phase(
    today: NaiveDate,
    last_cycle_start: NaiveDate,
    prediction: &PredictionResult,
    constants: &EngineConstants,
) -> CyclePhase {
    let day = cycle_day(last_cycle_start, today);
    if day <= prediction.estimated_period_length {
        return CyclePhase::Menstrual;
    }

    let ovulation_start = add_days(
        prediction.ovulation_date,
        constants.ovulation_margin_days.saturating_neg(),
    );
    let ovulation_end = add_days(prediction.ovulation_date, constants.ovulation_margin_days);

    if today < ovulation_start {
        CyclePhase::Follicular
    } else if today <= ovulation_end {
        CyclePhase::Ovulation
    } else {
        CyclePhase::Luteal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CycleEstimate;
    use crate::prediction::predict_next_period;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn prediction_from(start: NaiveDate, cycle: i64, period: i64) -> PredictionResult {
        let estimate = CycleEstimate {
            estimated_cycle_length: cycle,
            estimated_period_length: period,
            is_regular: true,
            sample_size: 1,
        };
        predict_next_period(start, &estimate, &EngineConstants::default())
    }

    fn phase_on(today: &str, start: &str, cycle: i64, period: i64) -> CyclePhase {
        let start = date(start);
        let pred = prediction_from(start, cycle, period);
        current_phase(date(today), start, &pred, &EngineConstants::default())
    }

    #[test]
    fn standard_cycle_phases() {
        assert_eq!(phase_on("2024-01-01", "2024-01-01", 28, 5), CyclePhase::Menstrual);
        assert_eq!(phase_on("2024-01-05", "2024-01-01", 28, 5), CyclePhase::Menstrual);
        assert_eq!(phase_on("2024-01-06", "2024-01-01", 28, 5), CyclePhase::Follicular);
        assert_eq!(phase_on("2024-01-13", "2024-01-01", 28, 5), CyclePhase::Follicular);
        assert_eq!(phase_on("2024-01-14", "2024-01-01", 28, 5), CyclePhase::Ovulation);
        assert_eq!(phase_on("2024-01-16", "2024-01-01", 28, 5), CyclePhase::Ovulation);
        assert_eq!(phase_on("2024-01-17", "2024-01-01", 28, 5), CyclePhase::Luteal);
        assert_eq!(phase_on("2024-01-28", "2024-01-01", 28, 5), CyclePhase::Luteal);
    }

    #[test]
    fn overdue_stays_luteal() {
        assert_eq!(phase_on("2024-01-29", "2024-01-01", 28, 5), CyclePhase::Luteal);
        assert_eq!(phase_on("2024-02-08", "2024-01-01", 28, 5), CyclePhase::Luteal);
        assert_eq!(phase_on("2025-06-01", "2024-01-01", 28, 5), CyclePhase::Luteal);
    }

    #[test]
    fn date_before_cycle_start_counts_as_day_one() {
        assert_eq!(phase_on("2023-12-20", "2024-01-01", 28, 5), CyclePhase::Menstrual);
    }

    #[test]
    fn menstrual_takes_precedence_over_early_ovulation() {
        // 21-day cycle with a 10-day period: ovulation (day 8) falls inside the period.
        assert_eq!(phase_on("2024-01-08", "2024-01-01", 21, 10), CyclePhase::Menstrual);
        assert_eq!(phase_on("2024-01-11", "2024-01-01", 21, 10), CyclePhase::Luteal);
    }

    #[test]
    fn wider_ovulation_margin() {
        let start = date("2024-01-01");
        let pred = prediction_from(start, 28, 5);
        let constants = EngineConstants {
            ovulation_margin_days: 2,
            ..EngineConstants::default()
        };
        assert_eq!(
            current_phase(date("2024-01-13"), start, &pred, &constants),
            CyclePhase::Ovulation
        );
        assert_eq!(
            current_phase(date("2024-01-18"), start, &pred, &constants),
            CyclePhase::Luteal
        );
    }
}
