//! # REST API for Assignments
//!
//! Assigning chores to kids (optionally as a recurring series), reassigning,
//! completing and removing them. Every mutation also updates the in-memory
//! board so the next board read reflects it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{post, put},
    Router,
};
use chrono::Local;
use shared::{AssignChoreRequest, UpdateAssignmentRequest};
use tracing::info;

use crate::io::rest::errors::{bad_request, error_response};
use crate::io::rest::mappers::AssignmentMapper;
use crate::AppState;

/// Assign a chore to a kid
///
/// Answers 409 when the kid already has this chore on one of the dates; in
/// that case nothing is stored.
pub async fn assign_chore(
    State(state): State<AppState>,
    Json(request): Json<AssignChoreRequest>,
) -> impl IntoResponse {
    info!("POST /api/assignments - request: {:?}", request);

    let command = match AssignmentMapper::to_assign_command(request) {
        Ok(command) => command,
        Err(e) => return bad_request(e.to_string()),
    };

    // stops early if the server starts shutting down mid-request
    let cancel = state.shutdown.child_token();
    match state.assignment_service.assign_chore(command, &cancel).await {
        Ok(outcome) => {
            let now = Local::now().naive_local();
            (StatusCode::CREATED, Json(AssignmentMapper::to_assign_response(outcome, now))).into_response()
        }
        Err(e) => error_response(&e, "Failed to assign chore"),
    }
}

/// Move an assignment to another kid and/or chore
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<i64>,
    Json(request): Json<UpdateAssignmentRequest>,
) -> impl IntoResponse {
    info!("PUT /api/assignments/{} - request: {:?}", assignment_id, request);

    let command = AssignmentMapper::to_update_command(assignment_id, request);
    match state.assignment_service.update_assignment(command).await {
        Ok(assignment) => (
            StatusCode::OK,
            Json(AssignmentMapper::to_assignment_response(assignment, "Assignment updated")),
        )
            .into_response(),
        Err(e) => error_response(&e, "Failed to update assignment"),
    }
}

pub async fn toggle_completion(State(state): State<AppState>, Path(assignment_id): Path<i64>) -> impl IntoResponse {
    info!("POST /api/assignments/{}/toggle", assignment_id);

    match state.assignment_service.toggle_completion(assignment_id).await {
        Ok(assignment) => {
            let message = if assignment.completed {
                "Marked complete"
            } else {
                "Marked incomplete"
            };
            (
                StatusCode::OK,
                Json(AssignmentMapper::to_assignment_response(assignment, message)),
            )
                .into_response()
        }
        Err(e) => error_response(&e, "Failed to toggle assignment"),
    }
}

pub async fn delete_assignment(State(state): State<AppState>, Path(assignment_id): Path<i64>) -> impl IntoResponse {
    info!("DELETE /api/assignments/{}", assignment_id);

    match state.assignment_service.delete_assignment(assignment_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e, "Failed to delete assignment"),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assignments", post(assign_chore))
        .route("/assignments/:id", put(update_assignment).delete(delete_assignment))
        .route("/assignments/:id/toggle", post(toggle_completion))
}
