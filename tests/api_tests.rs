//! Integration tests for the Grow Tracker HTTP API.
//!
//! Uses axum-test against the router with a throwaway SQLite file.

#![allow(clippy::unwrap_used, clippy::panic)]

use axum_test::TestServer;
use chrono::{Duration, Utc};
use grow_tracker::Database;
use grow_tracker::api::{
    AppState, DeleteResponse, ErrorResponse, HealthResponse, PlantResponse, WateringResponse,
    create_router,
};
use grow_tracker::growth::Phase;
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Test server over a fresh database. Keep the TempDir alive for the test.
fn create_test_server() -> (TestServer, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("grow.db").to_str().unwrap()).unwrap();
    let state = AppState::new(db, 8);
    (TestServer::new(create_router(state)).unwrap(), dir)
}

fn days_ago(days: i64) -> String {
    (Utc::now().date_naive() - Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

async fn create_plant(server: &TestServer, name: &str, planted: &str) -> PlantResponse {
    let response = server
        .post("/api/plants")
        .json(&json!({ "name": name, "plantDate": planted }))
        .await;
    response.assert_status_ok();
    response.json::<PlantResponse>()
}

// =============================================================================
// HEALTH
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _dir) = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: HealthResponse = response.json();
    assert_eq!(body.status, "ok");
    assert!(!body.version.is_empty());
}

// =============================================================================
// PLANTS
// =============================================================================

#[tokio::test]
async fn test_create_plant_uses_default_weeks() {
    let (server, _dir) = create_test_server();

    let plant = create_plant(&server, "Northern Lights", &days_ago(10)).await;
    assert!(plant.id > 0);
    assert_eq!(plant.flowering_weeks, 8);

    let growth = plant.growth.unwrap();
    assert_eq!(growth.current_day, 10);
    assert_eq!(growth.phase, Phase::Vegetative);
    assert_eq!(growth.label, "VT10");
}

#[tokio::test]
async fn test_create_plant_reports_flowering_phase() {
    let (server, _dir) = create_test_server();

    let response = server
        .post("/api/plants")
        .json(&json!({ "name": "Haze", "plantDate": days_ago(40), "floweringWeeks": 10 }))
        .await;
    response.assert_status_ok();

    let plant: PlantResponse = response.json();
    let growth = plant.growth.unwrap();
    assert_eq!(growth.phase, Phase::Flowering);
    assert_eq!(growth.label, "BT5 (10 weeks)");
    assert_eq!(growth.days_in_phase, 5);
    assert_eq!(growth.total_phase_days, 70);
}

#[tokio::test]
async fn test_create_plant_rejects_zero_weeks() {
    let (server, _dir) = create_test_server();

    let response = server
        .post("/api/plants")
        .json(&json!({ "name": "Zero", "plantDate": "2024-01-01", "floweringWeeks": 0 }))
        .await;
    response.assert_status_bad_request();

    let body: ErrorResponse = response.json();
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn test_create_plant_rejects_oversized_weeks() {
    let (server, _dir) = create_test_server();

    let response = server
        .post("/api/plants")
        .json(&json!({ "name": "Huge", "plantDate": "2024-01-01", "floweringWeeks": i64::MAX }))
        .await;
    response.assert_status_bad_request();

    // Nothing was stored, so listing still works
    let listed = server.get("/api/plants").await;
    listed.assert_status_ok();
    assert!(listed.json::<Vec<PlantResponse>>().is_empty());
}

#[tokio::test]
async fn test_create_plant_rejects_bad_date_and_empty_name() {
    let (server, _dir) = create_test_server();

    let bad_date = server
        .post("/api/plants")
        .json(&json!({ "name": "Bad", "plantDate": "2024-13-40" }))
        .await;
    bad_date.assert_status_bad_request();

    let empty_name = server
        .post("/api/plants")
        .json(&json!({ "name": "  ", "plantDate": "2024-01-01" }))
        .await;
    empty_name.assert_status_bad_request();
}

#[tokio::test]
async fn test_future_plant_date_reports_growth_error() {
    let (server, _dir) = create_test_server();

    let plant = create_plant(&server, "Tomorrow", &days_ago(-3)).await;
    assert!(plant.growth.is_none());
    assert!(plant.growth_error.is_some());
}

#[tokio::test]
async fn test_list_plants_newest_first() {
    let (server, _dir) = create_test_server();

    let first = create_plant(&server, "First", &days_ago(5)).await;
    let second = create_plant(&server, "Second", &days_ago(5)).await;

    let response = server.get("/api/plants").await;
    response.assert_status_ok();

    let plants: Vec<PlantResponse> = response.json();
    let ids: Vec<i64> = plants.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_get_missing_plant_is_not_found() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api/plants/999").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_update_plant_is_partial() {
    let (server, _dir) = create_test_server();

    let created = server
        .post("/api/plants")
        .json(&json!({ "name": "Skunk", "plantDate": days_ago(20), "strain": "Skunk #1", "notes": "window" }))
        .await
        .json::<PlantResponse>();

    let response = server
        .put(&format!("/api/plants/{}", created.id))
        .json(&json!({ "floweringWeeks": 9, "notes": "" }))
        .await;
    response.assert_status_ok();

    let updated: PlantResponse = response.json();
    assert_eq!(updated.name, "Skunk");
    assert_eq!(updated.strain.as_deref(), Some("Skunk #1"));
    assert_eq!(updated.flowering_weeks, 9);
    assert_eq!(updated.notes, None);
}

#[tokio::test]
async fn test_update_rejects_zero_weeks_and_missing_plant() {
    let (server, _dir) = create_test_server();
    let plant = create_plant(&server, "Keep", &days_ago(1)).await;

    let response = server
        .put(&format!("/api/plants/{}", plant.id))
        .json(&json!({ "floweringWeeks": 0 }))
        .await;
    response.assert_status_bad_request();

    let missing = server
        .put("/api/plants/999")
        .json(&json!({ "name": "Ghost" }))
        .await;
    missing.assert_status_not_found();
}

#[tokio::test]
async fn test_update_validates_flowering_start() {
    let (server, _dir) = create_test_server();
    let plant = create_plant(&server, "Stamped", &days_ago(40)).await;
    let path = format!("/api/plants/{}", plant.id);

    let rejected = server
        .put(&path)
        .json(&json!({ "floweringStartDate": "not a date" }))
        .await;
    rejected.assert_status_bad_request();
    let unchanged = server.get(&path).await.json::<PlantResponse>();
    assert_eq!(unchanged.flowering_start_date, None);

    let accepted = server
        .put(&path)
        .json(&json!({ "floweringStartDate": "2024-06-05 07:30:00" }))
        .await;
    accepted.assert_status_ok();
    assert_eq!(
        accepted.json::<PlantResponse>().flowering_start_date.as_deref(),
        Some("2024-06-05 07:30:00")
    );

    // An empty string clears it
    let cleared = server
        .put(&path)
        .json(&json!({ "floweringStartDate": "" }))
        .await;
    cleared.assert_status_ok();
    assert_eq!(cleared.json::<PlantResponse>().flowering_start_date, None);
}

#[tokio::test]
async fn test_delete_plant_removes_waterings() {
    let (server, _dir) = create_test_server();
    let plant = create_plant(&server, "Gone", &days_ago(1)).await;

    server
        .post(&format!("/api/plants/{}/water", plant.id))
        .json(&json!({}))
        .await
        .assert_status_ok();

    let response = server.delete(&format!("/api/plants/{}", plant.id)).await;
    response.assert_status_ok();
    assert!(response.json::<DeleteResponse>().success);

    server
        .get(&format!("/api/plants/{}", plant.id))
        .await
        .assert_status_not_found();
    server
        .get(&format!("/api/plants/{}/watering", plant.id))
        .await
        .assert_status_not_found();
    server
        .delete(&format!("/api/plants/{}", plant.id))
        .await
        .assert_status_not_found();
}

// =============================================================================
// WATERING AND FLOWERING
// =============================================================================

#[tokio::test]
async fn test_waterings_are_newest_first() {
    let (server, _dir) = create_test_server();
    let plant = create_plant(&server, "Thirsty", &days_ago(3)).await;

    let first = server
        .post(&format!("/api/plants/{}/water", plant.id))
        .json(&json!({ "notes": "first" }))
        .await
        .json::<WateringResponse>();
    let second = server
        .post(&format!("/api/plants/{}/water", plant.id))
        .json(&json!({ "notes": "second" }))
        .await
        .json::<WateringResponse>();
    assert_eq!(first.plant_id, plant.id);

    let response = server.get(&format!("/api/plants/{}/watering", plant.id)).await;
    response.assert_status_ok();

    let records: Vec<WateringResponse> = response.json();
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(records[0].notes.as_deref(), Some("second"));
}

#[tokio::test]
async fn test_water_missing_plant_is_not_found() {
    let (server, _dir) = create_test_server();

    let response = server
        .post("/api/plants/42/water")
        .json(&json!({ "notes": "nobody home" }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_start_flowering_keeps_computed_phase() {
    let (server, _dir) = create_test_server();
    let plant = create_plant(&server, "Early", &days_ago(12)).await;

    let response = server
        .post(&format!("/api/plants/{}/start-flowering", plant.id))
        .await;
    response.assert_status_ok();

    let updated: PlantResponse = response.json();
    assert!(updated.flowering_start_date.is_some());
    let growth = updated.growth.unwrap();
    assert_eq!(growth.phase, Phase::Vegetative);
    assert_eq!(growth.label, "VT12");
}
