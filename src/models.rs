use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::growth::{
    DEFAULT_FLOWERING_WEEKS, GrowthError, GrowthPhaseCalculator, MAX_FLOWERING_WEEKS,
    PhaseDescriptor,
};
use crate::utils::{get_current_timestamp_string, parse_date, parse_timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: Option<i64>,
    pub name: String,
    pub strain: Option<String>,
    pub plant_date: String,                   // ISO 8601: YYYY-MM-DD
    pub flowering_start_date: Option<String>, // YYYY-MM-DD HH:MM:SS (UTC)
    pub flowering_weeks: i64,
    pub notes: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WateringRecord {
    pub id: Option<i64>,
    pub plant_id: i64,
    pub watered_at: String,
    pub notes: Option<String>,
}

impl Plant {
    pub fn new(name: String, plant_date: String) -> Self {
        let now = get_current_timestamp_string();
        Self {
            id: None,
            name,
            strain: None,
            plant_date,
            flowering_start_date: None,
            flowering_weeks: DEFAULT_FLOWERING_WEEKS,
            notes: None,
            image_urls: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Check the fields the store and the calculator rely on
    pub fn validate(&self) -> Result<(), GrowthError> {
        if self.name.trim().is_empty() {
            return Err(GrowthError::InvalidInput("plant name must not be empty".to_string()));
        }
        parse_date(&self.plant_date).map_err(|e| {
            GrowthError::InvalidInput(format!("planting date '{}': {}", self.plant_date, e))
        })?;
        if !(1..=MAX_FLOWERING_WEEKS).contains(&self.flowering_weeks) {
            return Err(GrowthError::InvalidInput(format!(
                "flowering weeks must be between 1 and {}, got {}",
                MAX_FLOWERING_WEEKS, self.flowering_weeks
            )));
        }
        if let Some(ref started) = self.flowering_start_date {
            parse_timestamp(started).map_err(|e| {
                GrowthError::InvalidInput(format!("flowering start '{}': {}", started, e))
            })?;
        }
        Ok(())
    }

    /// Growth phase of this plant as of `now`
    pub fn growth_at(&self, now: DateTime<Utc>) -> Result<PhaseDescriptor, GrowthError> {
        let planted_on = parse_date(&self.plant_date).map_err(|e| {
            GrowthError::InvalidInput(format!("planting date '{}': {}", self.plant_date, e))
        })?;
        GrowthPhaseCalculator::evaluate_at(planted_on, self.flowering_weeks, now)
    }
}

impl WateringRecord {
    pub fn new(plant_id: i64, notes: Option<String>) -> Self {
        Self {
            id: None,
            plant_id,
            watered_at: get_current_timestamp_string(),
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_plant_uses_default_flowering_weeks() {
        let plant = Plant::new("Lemon Haze".to_string(), "2024-05-01".to_string());
        assert_eq!(plant.flowering_weeks, 8);
        assert!(plant.image_urls.is_empty());
        assert_eq!(plant.created_at, plant.updated_at);
        assert!(plant.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let mut plant = Plant::new("  ".to_string(), "2024-05-01".to_string());
        assert!(plant.validate().is_err());

        plant.name = "Basil".to_string();
        plant.plant_date = "01.05.2024".to_string();
        assert!(plant.validate().is_err());

        plant.plant_date = "2024-05-01".to_string();
        plant.flowering_weeks = 0;
        assert!(plant.validate().is_err());
    }

    #[test]
    fn validate_bounds_flowering_weeks() {
        let mut plant = Plant::new("Basil".to_string(), "2024-05-01".to_string());
        plant.flowering_weeks = MAX_FLOWERING_WEEKS;
        assert!(plant.validate().is_ok());
        plant.flowering_weeks = MAX_FLOWERING_WEEKS + 1;
        assert!(plant.validate().is_err());
        plant.flowering_weeks = i64::MAX;
        assert!(plant.validate().is_err());
    }

    #[test]
    fn validate_checks_flowering_start() {
        let mut plant = Plant::new("Basil".to_string(), "2024-05-01".to_string());
        plant.flowering_start_date = Some("2024-06-05 07:30:00".to_string());
        assert!(plant.validate().is_ok());
        plant.flowering_start_date = Some("2024-06-05".to_string());
        assert!(plant.validate().is_ok());
        plant.flowering_start_date = Some("not a date".to_string());
        assert!(matches!(plant.validate(), Err(GrowthError::InvalidInput(_))));
    }

    #[test]
    fn growth_at_uses_stored_planting_date() {
        let plant = Plant::new("Basil".to_string(), "2024-05-01".to_string());
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let info = plant.growth_at(now).unwrap();
        assert_eq!(info.current_day, 40);
        assert_eq!(info.label, "BT5 (8 weeks)");
    }

    #[test]
    fn growth_at_reports_unparseable_date() {
        let mut plant = Plant::new("Basil".to_string(), "2024-05-01".to_string());
        plant.plant_date = String::new();
        assert!(matches!(plant.growth_at(Utc::now()), Err(GrowthError::InvalidInput(_))));
    }
}
