//! # HTTP API
//!
//! JSON endpoints over the plant store, served with axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/plants` - List plants with their growth phase
//! - `POST /api/plants` - Create a plant
//! - `GET /api/plants/{id}` - Fetch a plant
//! - `PUT /api/plants/{id}` - Update a plant
//! - `DELETE /api/plants/{id}` - Delete a plant and its waterings
//! - `POST /api/plants/{id}/water` - Record a watering
//! - `GET /api/plants/{id}/watering` - Watering history, newest first
//! - `POST /api/plants/{id}/start-flowering` - Stamp the flowering start

mod error;
mod handlers;
mod types;

pub use error::ApiError;
pub use types::{
    CreatePlantRequest, DeleteResponse, ErrorResponse, HealthResponse, PlantResponse,
    UpdatePlantRequest, WaterRequest, WateringResponse,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::database::Database;

/// Shared server state. SQLite access is serialized behind one lock.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub default_flowering_weeks: i64,
}

impl AppState {
    pub fn new(db: Database, default_flowering_weeks: i64) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            default_flowering_weeks,
        }
    }
}

/// Create the axum router with all endpoints and request tracing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/api/plants",
            get(handlers::list_plants_handler).post(handlers::create_plant_handler),
        )
        .route(
            "/api/plants/{id}",
            get(handlers::get_plant_handler)
                .put(handlers::update_plant_handler)
                .delete(handlers::delete_plant_handler),
        )
        .route("/api/plants/{id}/water", post(handlers::water_handler))
        .route("/api/plants/{id}/watering", get(handlers::list_waterings_handler))
        .route(
            "/api/plants/{id}/start-flowering",
            post(handlers::start_flowering_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C.
pub async fn serve(state: AppState, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Grow Tracker API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
