use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use shared::HealthResponse;
use tracing::info;

use crate::io::rest::errors::error_response;
use crate::AppState;

/// Liveness plus a storage round-trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/health");

    match state.kid_service.count_kids().await {
        Ok(kid_count) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                kid_count,
            }),
        )
            .into_response(),
        Err(e) => error_response(&e, "Storage unavailable"),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
