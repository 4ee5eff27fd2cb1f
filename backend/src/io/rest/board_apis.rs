//! # REST API for the Task Board
//!
//! Read-only view of the in-memory board: every loaded task, bucketed by
//! due date.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Local;
use tracing::info;

use crate::io::rest::mappers::TaskMapper;
use crate::AppState;

pub async fn get_board(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/board");

    let snapshot = state.assignment_service.board().snapshot();
    let now = Local::now().naive_local();
    (StatusCode::OK, Json(TaskMapper::to_board_dto(&snapshot, now))).into_response()
}

pub fn router() -> Router<AppState> {
    Router::new().route("/board", get(get_board))
}
