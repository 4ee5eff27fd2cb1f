//! # REST API for Kids
//!
//! Endpoints for adding kids, editing their avatar, awarding points and
//! listing the chores assigned to them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use shared::{AwardPointsRequest, CreateKidRequest, UpdateAvatarRequest};
use tracing::info;

use crate::io::rest::errors::error_response;
use crate::io::rest::mappers::{AssignmentMapper, KidMapper};
use crate::AppState;

/// Create a new kid
pub async fn create_kid(
    State(state): State<AppState>,
    Json(request): Json<CreateKidRequest>,
) -> impl IntoResponse {
    info!("POST /api/kids - request: {:?}", request);

    let command = KidMapper::to_create_command(request);
    match state.kid_service.create_kid(command).await {
        Ok(kid) => {
            let message = format!("Added {}", kid.full_name());
            (StatusCode::CREATED, Json(KidMapper::to_kid_response(kid, message))).into_response()
        }
        Err(e) => error_response(&e, "Failed to create kid"),
    }
}

/// List all kids in creation order
pub async fn list_kids(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/kids");

    match state.kid_service.list_kids().await {
        Ok(kids) => (StatusCode::OK, Json(KidMapper::to_kid_list_dto(kids))).into_response(),
        Err(e) => error_response(&e, "Failed to list kids"),
    }
}

pub async fn get_kid(State(state): State<AppState>, Path(kid_id): Path<i64>) -> impl IntoResponse {
    info!("GET /api/kids/{}", kid_id);

    match state.kid_service.get_kid(kid_id).await {
        Ok(kid) => (StatusCode::OK, Json(KidMapper::to_dto(kid))).into_response(),
        Err(e) => error_response(&e, "Failed to get kid"),
    }
}

/// Replace or clear a kid's avatar
pub async fn update_avatar(
    State(state): State<AppState>,
    Path(kid_id): Path<i64>,
    Json(request): Json<UpdateAvatarRequest>,
) -> impl IntoResponse {
    info!("PUT /api/kids/{}/avatar - request: {:?}", kid_id, request);

    match state.kid_service.update_avatar(kid_id, request.avatar_url).await {
        Ok(kid) => (StatusCode::OK, Json(KidMapper::to_kid_response(kid, "Avatar updated"))).into_response(),
        Err(e) => error_response(&e, "Failed to update avatar"),
    }
}

pub async fn award_points(
    State(state): State<AppState>,
    Path(kid_id): Path<i64>,
    Json(request): Json<AwardPointsRequest>,
) -> impl IntoResponse {
    info!("POST /api/kids/{}/points - request: {:?}", kid_id, request);

    match state.kid_service.award_points(kid_id, request.points).await {
        Ok(kid) => {
            let message = format!("{} now has {} points", kid.first_name, kid.points);
            (StatusCode::OK, Json(KidMapper::to_kid_response(kid, message))).into_response()
        }
        Err(e) => error_response(&e, "Failed to award points"),
    }
}

/// Chores assigned to one kid, newest date first
pub async fn list_kid_chores(State(state): State<AppState>, Path(kid_id): Path<i64>) -> impl IntoResponse {
    info!("GET /api/kids/{}/chores", kid_id);

    match state.assignment_service.list_kid_chores(kid_id).await {
        Ok(chores) => (
            StatusCode::OK,
            Json(AssignmentMapper::to_kid_chore_list_dto(kid_id, chores)),
        )
            .into_response(),
        Err(e) => error_response(&e, "Failed to list kid chores"),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kids", get(list_kids).post(create_kid))
        .route("/kids/:id", get(get_kid))
        .route("/kids/:id/avatar", put(update_avatar))
        .route("/kids/:id/points", post(award_points))
        .route("/kids/:id/chores", get(list_kid_chores))
}
