//! Translating service errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use tracing::error;

use crate::domain::calendar::CalendarError;
use crate::domain::models::assignment::AssignmentError;
use crate::domain::models::chore::ChoreValidationError;
use crate::domain::models::kid::KidError;
use crate::domain::sms_service::SmsError;

pub fn status_for(err: &anyhow::Error) -> StatusCode {
    if let Some(e) = err.downcast_ref::<AssignmentError>() {
        return match e {
            AssignmentError::AlreadyAssigned { .. } => StatusCode::CONFLICT,
            AssignmentError::NotFound(_) => StatusCode::NOT_FOUND,
            // a missing kid or chore in an assign request is bad input
            AssignmentError::KidNotFound(_)
            | AssignmentError::ChoreNotFound(_)
            | AssignmentError::InvalidOccurrences { .. }
            | AssignmentError::InvalidDate(_)
            | AssignmentError::InvalidTime(_) => StatusCode::BAD_REQUEST,
            AssignmentError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        };
    }
    if let Some(e) = err.downcast_ref::<KidError>() {
        return match e {
            KidError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
    }
    if let Some(e) = err.downcast_ref::<ChoreValidationError>() {
        return match e {
            ChoreValidationError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
    }
    if err.downcast_ref::<CalendarError>().is_some() {
        return StatusCode::BAD_REQUEST;
    }
    if let Some(e) = err.downcast_ref::<SmsError>() {
        return match e {
            SmsError::MissingPhone | SmsError::MissingMessage => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Client errors echo the error message; server errors answer with
/// `fallback` only.
pub fn error_response(err: &anyhow::Error, fallback: &str) -> Response {
    let status = status_for(err);
    error!("{}: {:#}", fallback, err);
    let message = if status.is_server_error() {
        fallback.to_string()
    } else {
        err.to_string()
    };
    (status, Json(ErrorResponse { error: message })).into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    let message = message.into();
    error!("Rejected request: {}", message);
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_for_domain_errors() {
        let duplicate = anyhow::Error::new(AssignmentError::AlreadyAssigned {
            kid_id: 1,
            chore_id: 2,
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        });
        assert_eq!(status_for(&duplicate), StatusCode::CONFLICT);
        assert_eq!(status_for(&anyhow::Error::new(KidError::NotFound(9))), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&anyhow::Error::new(ChoreValidationError::EmptyDescription)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&anyhow::Error::new(SmsError::MissingPhone)), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&anyhow::Error::new(SmsError::Provider {
                status: 401,
                body: "denied".to_string()
            })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_for(&anyhow::anyhow!("disk full")), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_survives_context() {
        let err = anyhow::Error::new(AssignmentError::NotFound(4)).context("Failed to toggle assignment");
        assert_eq!(status_for(&err), StatusCode::NOT_FOUND);
    }
}
