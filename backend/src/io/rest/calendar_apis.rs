use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{Datelike, Local};
use serde::Deserialize;
use shared::DayTasksResponse;
use tracing::info;

use crate::io::rest::errors::{bad_request, error_response};
use crate::io::rest::mappers::{AssignmentMapper, TaskMapper};
use crate::AppState;

// Missing fields default to the current month
#[derive(Debug, Deserialize)]
pub struct CalendarMonthQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarDayQuery {
    pub date: String,
}

/// Create a router for calendar related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/month", get(get_calendar_month))
        .route("/day", get(get_day_tasks))
        .route("/current-date", get(get_current_date))
}

/// Month grid with one indicator per task; also refreshes that month of the board
async fn get_calendar_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month - query: {:?}", query);

    let today = Local::now().date_naive();
    let month = query.month.unwrap_or_else(|| today.month());
    let year = query.year.unwrap_or_else(|| today.year());

    match state.assignment_service.calendar_month(year, month, today).await {
        Ok(calendar) => (StatusCode::OK, Json(calendar)).into_response(),
        Err(e) => error_response(&e, "Failed to load calendar month"),
    }
}

async fn get_day_tasks(State(state): State<AppState>, Query(query): Query<CalendarDayQuery>) -> impl IntoResponse {
    info!("GET /api/calendar/day - query: {:?}", query);

    let date = match AssignmentMapper::parse_date(&query.date) {
        Ok(date) => date,
        Err(e) => return bad_request(e.to_string()),
    };

    match state.assignment_service.day_tasks(date).await {
        Ok(tasks) => (
            StatusCode::OK,
            Json(DayTasksResponse {
                date: query.date.trim().to_string(),
                tasks: TaskMapper::to_dtos(tasks, Local::now().naive_local()),
            }),
        )
            .into_response(),
        Err(e) => error_response(&e, "Failed to load tasks for day"),
    }
}

async fn get_current_date(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/calendar/current-date");

    let today = Local::now().date_naive();
    (StatusCode::OK, Json(state.calendar_service.get_current_date(today))).into_response()
}
