//! # REST API Interface Layer
//!
//! HTTP endpoints for the chore board. Handlers translate JSON requests into
//! domain commands, call the services on [`crate::AppState`] and turn domain
//! errors into status codes. No business logic lives here.
//!
//! Every module exposes a `router()` that `create_router` nests under `/api`.

pub mod assignment_apis;
pub mod board_apis;
pub mod calendar_apis;
pub mod chore_apis;
pub mod errors;
pub mod health_apis;
pub mod kid_apis;
pub mod mappers;
pub mod sms_apis;
