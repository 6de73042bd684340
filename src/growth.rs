use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of the vegetative phase in days (5 weeks). Not configurable.
pub const VEGETATIVE_DAYS: i64 = 35;

/// Flowering duration used when a plant does not specify one
pub const DEFAULT_FLOWERING_WEEKS: i64 = 8;

/// Longest flowering duration a plant may be stored with
pub const MAX_FLOWERING_WEEKS: i64 = 52;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrowthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Vegetative,
    Flowering,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Vegetative => write!(f, "Vegetative phase"),
            Phase::Flowering => write!(f, "Flowering phase"),
        }
    }
}

/// Where a plant stands in its grow, derived from its planting date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDescriptor {
    pub current_day: i64,
    pub phase: Phase,
    pub label: String,
    /// Not clamped: exceeds 100 once flowering runs past its planned length
    pub progress_percent: f64,
    pub days_in_phase: i64,
    pub total_phase_days: i64,
}

impl PhaseDescriptor {
    /// Progress clamped to 0..=100 for gauges and bars
    pub fn display_percent(&self) -> f64 {
        self.progress_percent.clamp(0.0, 100.0)
    }

    /// True once flowering has run longer than the configured weeks
    pub fn is_overdue(&self) -> bool {
        self.phase == Phase::Flowering && self.days_in_phase > self.total_phase_days
    }
}

pub struct GrowthPhaseCalculator;

impl GrowthPhaseCalculator {
    /// Compute the phase descriptor for a plant planted on `planted_on`,
    /// evaluated on `today`.
    pub fn evaluate(
        planted_on: NaiveDate,
        flowering_weeks: i64,
        today: NaiveDate,
    ) -> Result<PhaseDescriptor, GrowthError> {
        if flowering_weeks <= 0 {
            return Err(GrowthError::InvalidInput(format!(
                "flowering weeks must be positive, got {}",
                flowering_weeks
            )));
        }

        let days_since_planting = (today - planted_on).num_days();
        if days_since_planting < 0 {
            return Err(GrowthError::InvalidInput(format!(
                "planting date {} is after {}",
                planted_on, today
            )));
        }

        let flowering_days = flowering_weeks.checked_mul(7).ok_or_else(|| {
            GrowthError::InvalidInput(format!(
                "flowering weeks {} is too large",
                flowering_weeks
            ))
        })?;

        let (phase, label, days_in_phase, total_phase_days) =
            if days_since_planting <= VEGETATIVE_DAYS {
                (
                    Phase::Vegetative,
                    format!("VT{}", days_since_planting),
                    days_since_planting,
                    VEGETATIVE_DAYS,
                )
            } else {
                let days_into_flowering = days_since_planting - VEGETATIVE_DAYS;
                (
                    Phase::Flowering,
                    format!("BT{} ({} weeks)", days_into_flowering, flowering_weeks),
                    days_into_flowering,
                    flowering_days,
                )
            };

        Ok(PhaseDescriptor {
            current_day: days_since_planting,
            phase,
            label,
            progress_percent: days_in_phase as f64 / total_phase_days as f64 * 100.0,
            days_in_phase,
            total_phase_days,
        })
    }

    /// Same as [`evaluate`](Self::evaluate), using the UTC calendar date of `now`
    pub fn evaluate_at(
        planted_on: NaiveDate,
        flowering_weeks: i64,
        now: DateTime<Utc>,
    ) -> Result<PhaseDescriptor, GrowthError> {
        Self::evaluate(planted_on, flowering_weeks, now.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn planted() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn after(days: i64) -> NaiveDate {
        planted() + Duration::days(days)
    }

    #[test]
    fn planted_today_is_day_zero() {
        let info = GrowthPhaseCalculator::evaluate(planted(), 8, planted()).unwrap();
        assert_eq!(info.current_day, 0);
        assert_eq!(info.phase, Phase::Vegetative);
        assert_eq!(info.label, "VT0");
        assert_eq!(info.progress_percent, 0.0);
        assert_eq!(info.total_phase_days, 35);
    }

    #[test]
    fn day_35_is_still_vegetative() {
        let info = GrowthPhaseCalculator::evaluate(planted(), 8, after(35)).unwrap();
        assert_eq!(info.phase, Phase::Vegetative);
        assert_eq!(info.label, "VT35");
        assert_eq!(info.days_in_phase, 35);
        assert_eq!(info.progress_percent, 100.0);
    }

    #[test]
    fn day_36_starts_flowering() {
        let info = GrowthPhaseCalculator::evaluate(planted(), 8, after(36)).unwrap();
        assert_eq!(info.phase, Phase::Flowering);
        assert_eq!(info.days_in_phase, 1);
        assert_eq!(info.label, "BT1 (8 weeks)");
        assert_eq!(info.total_phase_days, 56);
        assert!((info.progress_percent - 100.0 / 56.0).abs() < 1e-9);
    }

    #[test]
    fn day_91_completes_eight_week_flowering() {
        let info = GrowthPhaseCalculator::evaluate(planted(), 8, after(91)).unwrap();
        assert_eq!(info.phase, Phase::Flowering);
        assert_eq!(info.days_in_phase, 56);
        assert_eq!(info.progress_percent, 100.0);
        assert!(!info.is_overdue());
    }

    #[test]
    fn progress_is_not_clamped_past_flowering() {
        let info = GrowthPhaseCalculator::evaluate(planted(), 8, after(100)).unwrap();
        assert_eq!(info.days_in_phase, 65);
        assert!(info.progress_percent > 100.0);
        assert_eq!(info.display_percent(), 100.0);
        assert!(info.is_overdue());
    }

    #[test]
    fn flowering_weeks_sets_phase_length() {
        let info = GrowthPhaseCalculator::evaluate(planted(), 10, after(50)).unwrap();
        assert_eq!(info.label, "BT15 (10 weeks)");
        assert_eq!(info.total_phase_days, 70);
    }

    #[test]
    fn non_positive_weeks_are_rejected() {
        for weeks in [0, -3] {
            let err = GrowthPhaseCalculator::evaluate(planted(), weeks, after(10)).unwrap_err();
            assert!(matches!(err, GrowthError::InvalidInput(_)));
        }
    }

    #[test]
    fn oversized_weeks_are_rejected_instead_of_overflowing() {
        let err = GrowthPhaseCalculator::evaluate(planted(), i64::MAX, after(3)).unwrap_err();
        assert!(matches!(err, GrowthError::InvalidInput(_)));
        let err = GrowthPhaseCalculator::evaluate(planted(), i64::MAX / 7 + 1, after(50)).unwrap_err();
        assert!(matches!(err, GrowthError::InvalidInput(_)));
    }

    #[test]
    fn future_planting_date_is_rejected() {
        let err = GrowthPhaseCalculator::evaluate(after(3), 8, planted()).unwrap_err();
        assert!(matches!(err, GrowthError::InvalidInput(_)));
    }

    #[test]
    fn evaluate_at_floors_to_whole_days() {
        let late_evening = Utc.with_ymd_and_hms(2024, 3, 11, 23, 59, 59).unwrap();
        let info = GrowthPhaseCalculator::evaluate_at(planted(), 8, late_evening).unwrap();
        assert_eq!(info.current_day, 10);
        assert_eq!(info.label, "VT10");
    }

    #[test]
    fn evaluation_is_idempotent() {
        let a = GrowthPhaseCalculator::evaluate(planted(), 8, after(42)).unwrap();
        let b = GrowthPhaseCalculator::evaluate(planted(), 8, after(42)).unwrap();
        assert_eq!(a, b);
    }
}
