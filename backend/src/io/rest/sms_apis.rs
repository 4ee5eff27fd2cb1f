//! # SMS Relay
//!
//! Forwards a text message to the configured SMS provider so that browser
//! clients never hold provider credentials.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use shared::{SendSmsRequest, SendSmsResponse};
use tracing::info;

use crate::io::rest::errors::error_response;
use crate::AppState;

pub async fn send_sms(State(state): State<AppState>, Json(request): Json<SendSmsRequest>) -> impl IntoResponse {
    // message bodies stay out of the logs
    info!("POST /api/send-sms - to: {}", request.phone);

    match state.sms_service.send_sms(&request.phone, &request.message).await {
        Ok(()) => (StatusCode::OK, Json(SendSmsResponse { success: true })).into_response(),
        Err(e) => error_response(&e, "Failed to send SMS"),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/send-sms", post(send_sms))
}
