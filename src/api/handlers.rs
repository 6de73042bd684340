//! HTTP endpoint handlers.

use axum::{Json, extract::{Path, State}};
use chrono::Utc;

use super::{
    AppState,
    error::ApiError,
    types::{
        CreatePlantRequest, DeleteResponse, HealthResponse, PlantResponse, UpdatePlantRequest,
        WaterRequest, WateringResponse,
    },
};
use crate::models::{Plant, WateringRecord};

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Health check endpoint.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// List plants, newest first.
pub async fn list_plants_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlantResponse>>, ApiError> {
    let db = state.db.lock().await;
    let now = Utc::now();
    let plants = db.get_all_plants()?
        .into_iter()
        .map(|plant| PlantResponse::from_plant(plant, now))
        .collect();
    Ok(Json(plants))
}

/// Create a plant.
pub async fn create_plant_handler(
    State(state): State<AppState>,
    Json(request): Json<CreatePlantRequest>,
) -> Result<Json<PlantResponse>, ApiError> {
    let mut plant = Plant::new(request.name, request.plant_date);
    plant.strain = non_empty(request.strain);
    plant.notes = non_empty(request.notes);
    plant.flowering_weeks = request.flowering_weeks.unwrap_or(state.default_flowering_weeks);

    let db = state.db.lock().await;
    let id = db.insert_plant(&plant)?;
    let stored = db.get_plant(id)?;
    Ok(Json(PlantResponse::from_plant(stored, Utc::now())))
}

/// Fetch one plant.
pub async fn get_plant_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PlantResponse>, ApiError> {
    let db = state.db.lock().await;
    let plant = db.get_plant(id)?;
    Ok(Json(PlantResponse::from_plant(plant, Utc::now())))
}

/// Update a plant. Fields missing from the body are left unchanged.
pub async fn update_plant_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePlantRequest>,
) -> Result<Json<PlantResponse>, ApiError> {
    let db = state.db.lock().await;
    let mut plant = db.get_plant(id)?;

    if let Some(name) = request.name {
        plant.name = name;
    }
    if let Some(strain) = request.strain {
        plant.strain = non_empty(Some(strain));
    }
    if let Some(plant_date) = request.plant_date {
        plant.plant_date = plant_date;
    }
    if let Some(start) = request.flowering_start_date {
        plant.flowering_start_date = non_empty(Some(start));
    }
    if let Some(weeks) = request.flowering_weeks {
        plant.flowering_weeks = weeks;
    }
    if let Some(notes) = request.notes {
        plant.notes = non_empty(Some(notes));
    }
    if let Some(image_urls) = request.image_urls {
        plant.image_urls = image_urls;
    }

    db.update_plant(&plant)?;
    let stored = db.get_plant(id)?;
    Ok(Json(PlantResponse::from_plant(stored, Utc::now())))
}

/// Delete a plant and its watering records.
pub async fn delete_plant_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let db = state.db.lock().await;
    db.delete_plant(id)?;
    Ok(Json(DeleteResponse { success: true }))
}

/// Record a watering.
pub async fn water_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<WaterRequest>,
) -> Result<Json<WateringResponse>, ApiError> {
    let db = state.db.lock().await;
    let record = db.insert_watering(&WateringRecord::new(id, non_empty(request.notes)))?;
    Ok(Json(record.into()))
}

/// Watering history for a plant, newest first.
pub async fn list_waterings_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<WateringResponse>>, ApiError> {
    let db = state.db.lock().await;
    db.get_plant(id)?;
    let records = db.get_waterings(id)?
        .into_iter()
        .map(WateringResponse::from)
        .collect();
    Ok(Json(records))
}

/// Stamp the flowering start time. The computed phase is unaffected.
pub async fn start_flowering_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PlantResponse>, ApiError> {
    let db = state.db.lock().await;
    let plant = db.start_flowering(id)?;
    Ok(Json(PlantResponse::from_plant(plant, Utc::now())))
}
