//! # Domain Layer
//!
//! Business logic for the chore board: recurrence expansion, task
//! aggregation, the in-memory board, the calendar grid, reminders and the
//! services that tie them to storage. Nothing here knows about HTTP.

pub mod assignment_service;
pub mod calendar;
pub mod chore_service;
pub mod commands;
pub mod kid_service;
pub mod models;
pub mod notification;
pub mod recurrence;
pub mod sms_service;
pub mod task_aggregator;
pub mod task_board;

pub use assignment_service::AssignmentService;
pub use calendar::CalendarService;
pub use chore_service::ChoreService;
pub use kid_service::KidService;
pub use notification::NotificationScheduler;
pub use sms_service::SmsService;
pub use task_board::BoardStore;
