//! # REST API for Chores
//!
//! CRUD over reusable chore definitions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use shared::{CreateChoreRequest, UpdateChoreRequest};
use tracing::info;

use crate::io::rest::errors::error_response;
use crate::io::rest::mappers::ChoreMapper;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChoreListQuery {
    pub limit: Option<u32>,
}

pub async fn create_chore(
    State(state): State<AppState>,
    Json(request): Json<CreateChoreRequest>,
) -> impl IntoResponse {
    info!("POST /api/chores - request: {:?}", request);

    let command = ChoreMapper::to_create_command(request);
    match state.chore_service.create_chore(command).await {
        Ok(chore) => (
            StatusCode::CREATED,
            Json(ChoreMapper::to_chore_response(chore, "Chore created")),
        )
            .into_response(),
        Err(e) => error_response(&e, "Failed to create chore"),
    }
}

/// Newest chores first, optionally capped by `?limit=`
pub async fn list_chores(State(state): State<AppState>, Query(query): Query<ChoreListQuery>) -> impl IntoResponse {
    info!("GET /api/chores - query: {:?}", query);

    match state.chore_service.list_chores(query.limit).await {
        Ok(chores) => (StatusCode::OK, Json(ChoreMapper::to_chore_list_dto(chores))).into_response(),
        Err(e) => error_response(&e, "Failed to list chores"),
    }
}

pub async fn update_chore(
    State(state): State<AppState>,
    Path(chore_id): Path<i64>,
    Json(request): Json<UpdateChoreRequest>,
) -> impl IntoResponse {
    info!("PUT /api/chores/{} - request: {:?}", chore_id, request);

    let command = ChoreMapper::to_update_command(chore_id, request);
    match state.chore_service.update_chore(command).await {
        Ok(chore) => (StatusCode::OK, Json(ChoreMapper::to_chore_response(chore, "Chore updated"))).into_response(),
        Err(e) => error_response(&e, "Failed to update chore"),
    }
}

/// Delete a chore; its assignments go with it
pub async fn delete_chore(State(state): State<AppState>, Path(chore_id): Path<i64>) -> impl IntoResponse {
    info!("DELETE /api/chores/{}", chore_id);

    match state.chore_service.delete_chore(chore_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e, "Failed to delete chore"),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chores", get(list_chores).post(create_chore))
        .route("/chores/:id", put(update_chore).delete(delete_chore))
}
