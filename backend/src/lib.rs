//! # Chore Board Backend
//!
//! HTTP server for a household chore board. Kids get chores assigned on
//! calendar dates, optionally as a daily, weekly or monthly series; assigned
//! chores show up as tasks on a month calendar and on a date-bucketed board,
//! and each kid with a phone number gets an SMS reminder shortly before a
//! task is due.
//!
//! ## Layers
//!
//! - **io**: axum handlers, DTO mappers, error translation
//! - **domain**: services, recurrence, aggregation, the board store,
//!   reminders and SMS delivery
//! - **storage**: SQLite via sqlx (`kids`, `chores`, `kids_chores`)

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    response::Redirect,
    routing::get,
    Router,
};
use chrono::{Datelike, Local};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};
use tracing::{info, warn};

use crate::config::BoardConfig;
use crate::domain::sms_service::{SmsProvider, SmsReminderSink, TwilioSmsProvider};
use crate::domain::{
    AssignmentService, BoardStore, CalendarService, ChoreService, KidService, NotificationScheduler, SmsService,
};
use crate::io::rest::{assignment_apis, board_apis, calendar_apis, chore_apis, health_apis, kid_apis, sms_apis};
use crate::storage::DbConnection;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub kid_service: KidService<DbConnection>,
    pub chore_service: ChoreService<DbConnection>,
    pub assignment_service: AssignmentService<DbConnection>,
    pub calendar_service: CalendarService,
    pub sms_service: SmsService,
    /// Cancelled when the server shuts down; stops pending reminders and
    /// in-flight assign requests
    pub shutdown: CancellationToken,
    pub config: Arc<BoardConfig>,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: BoardConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url).await?;

    info!("Setting up SMS provider");
    let provider: Arc<dyn SmsProvider> = Arc::new(TwilioSmsProvider::new(config.twilio.clone()));

    initialize_backend_with(config, db_conn, provider).await
}

/// Wire the services on top of an open database and an SMS provider
pub async fn initialize_backend_with(
    config: BoardConfig,
    db_conn: DbConnection,
    provider: Arc<dyn SmsProvider>,
) -> Result<AppState> {
    let shutdown = CancellationToken::new();

    info!("Setting up reminders");
    let sms_service = SmsService::new(provider);
    let sink = SmsReminderSink::new(sms_service.clone(), shutdown.child_token());
    let scheduler = NotificationScheduler::new(Arc::new(sink));
    let permission = scheduler.request_permission(sms_service.ensure_ready());
    info!("Reminder permission: {:?}", permission);

    info!("Setting up domain model");
    let board = BoardStore::new();
    let kid_service = KidService::new(&db_conn);
    let chore_service = ChoreService::new(&db_conn);
    let assignment_service =
        AssignmentService::new(&db_conn, scheduler, board, config.reminder_lead_minutes);
    let calendar_service = CalendarService::new();

    let today = Local::now().date_naive();
    match assignment_service.refresh_month(today.year(), today.month()).await {
        Ok(board) => info!("Loaded {} tasks for the current month", board.len()),
        Err(e) => warn!("Could not preload the current month: {:#}", e),
    }

    info!("Setting up application state");
    Ok(AppState {
        kid_service,
        chore_service,
        assignment_service,
        calendar_service,
        sms_service,
        shutdown,
        config: Arc::new(config),
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let config = Arc::clone(&app_state.config);

    // CORS setup to allow the frontend dev server to make requests
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    match config.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(_) => warn!("Invalid ALLOWED_ORIGIN '{}', CORS disabled", config.allowed_origin),
    }

    let api_routes = Router::new()
        .merge(health_apis::router())
        .merge(kid_apis::router())
        .merge(chore_apis::router())
        .merge(assignment_apis::router())
        .merge(board_apis::router())
        .merge(sms_apis::router())
        .nest("/calendar", calendar_apis::router());

    // Unknown paths fall through to the frontend bundle, which routes client side
    let index = config.static_dir.join("index.html");
    let static_files = ServeDir::new(&config.static_dir).not_found_service(ServeFile::new(index));

    Router::new()
        .route("/", get(|| async { Redirect::temporary("/admin") }))
        .nest("/api", api_routes)
        .fallback_service(static_files)
        .layer(cors)
        .with_state(app_state)
}
