//! Health endpoint.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /health`: reports the version and whether the store is reachable.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        version: texmage_core::version().to_string(),
        database: state.store.ping().await,
    })
}
