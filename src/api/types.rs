//! JSON request and response bodies. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::growth::PhaseDescriptor;
use crate::models::{Plant, WateringRecord};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// A plant plus its growth phase as of the request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantResponse {
    pub id: i64,
    pub name: String,
    pub strain: Option<String>,
    pub plant_date: String,
    pub flowering_start_date: Option<String>,
    pub flowering_weeks: i64,
    pub notes: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub growth: Option<PhaseDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_error: Option<String>,
}

impl PlantResponse {
    pub fn from_plant(plant: Plant, now: DateTime<Utc>) -> Self {
        let (growth, growth_error) = match plant.growth_at(now) {
            Ok(info) => (Some(info), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            id: plant.id.unwrap_or_default(),
            name: plant.name,
            strain: plant.strain,
            plant_date: plant.plant_date,
            flowering_start_date: plant.flowering_start_date,
            flowering_weeks: plant.flowering_weeks,
            notes: plant.notes,
            image_urls: plant.image_urls,
            created_at: plant.created_at,
            updated_at: plant.updated_at,
            growth,
            growth_error,
        }
    }
}

/// Body of `POST /api/plants`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlantRequest {
    pub name: String,
    #[serde(default)]
    pub strain: Option<String>,
    pub plant_date: String,
    /// Falls back to the configured default when absent
    #[serde(default)]
    pub flowering_weeks: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `PUT /api/plants/{id}`. Absent fields keep their stored value;
/// an empty string clears an optional text field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlantRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub strain: Option<String>,
    #[serde(default)]
    pub plant_date: Option<String>,
    #[serde(default)]
    pub flowering_start_date: Option<String>,
    #[serde(default)]
    pub flowering_weeks: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

/// Body of `POST /api/plants/{id}/water`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaterRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WateringResponse {
    pub id: i64,
    pub plant_id: i64,
    pub watered_at: String,
    pub notes: Option<String>,
}

impl From<WateringRecord> for WateringResponse {
    fn from(record: WateringRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            plant_id: record.plant_id,
            watered_at: record.watered_at,
            notes: record.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
