//! Reminder scheduling for newly created tasks.
//!
//! The scheduler decides whether and when a reminder should fire. Delivery is
//! handed off to a [`ReminderSink`]; the scheduler never talks to a provider.

use std::sync::{Arc, RwLock};

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::models::display_task::DisplayTask;

/// Minutes before the due time that a reminder fires
pub const DEFAULT_LEAD_MINUTES: i64 = 15;

/// Longest accepted lead time (one week)
pub const MAX_LEAD_MINUTES: i64 = 10_080;

pub const REMINDER_TITLE: &str = "Task Reminder";

/// Outcome of the startup permission request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NotificationPermission {
    #[default]
    NotRequested,
    Granted,
    Denied { reason: String },
}

/// Structured data handed to the delivery side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderPayload {
    pub task_id: i64,
    pub title: String,
    pub body: String,
    /// Collapses repeated reminders for the same task
    pub tag: String,
    pub due_date: NaiveDate,
    pub due_time: NaiveTime,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledReminder {
    pub notify_at: NaiveDateTime,
    pub payload: ReminderPayload,
}

/// Receives reminders that are due in the future
pub trait ReminderSink: Send + Sync {
    fn hand_off(&self, reminder: ScheduledReminder) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct NotificationScheduler {
    permission: Arc<RwLock<NotificationPermission>>,
    sink: Arc<dyn ReminderSink>,
}

impl NotificationScheduler {
    pub fn new(sink: Arc<dyn ReminderSink>) -> Self {
        Self {
            permission: Arc::new(RwLock::new(NotificationPermission::NotRequested)),
            sink,
        }
    }

    /// Record the result of the permission request.
    ///
    /// `probe` is whatever check the delivery channel needs to pass before
    /// reminders make sense; an error leaves the feature disabled.
    pub fn request_permission(&self, probe: anyhow::Result<()>) -> NotificationPermission {
        let outcome = match probe {
            Ok(()) => {
                info!("Reminder permission granted");
                NotificationPermission::Granted
            }
            Err(e) => {
                warn!("Reminder permission denied: {}", e);
                NotificationPermission::Denied {
                    reason: e.to_string(),
                }
            }
        };

        match self.permission.write() {
            Ok(mut guard) => *guard = outcome.clone(),
            Err(poisoned) => *poisoned.into_inner() = outcome.clone(),
        }
        outcome
    }

    pub fn permission(&self) -> NotificationPermission {
        match self.permission.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_granted(&self) -> bool {
        self.permission() == NotificationPermission::Granted
    }

    /// Work out the reminder for `task`, or None if it would fire at or before
    /// `now` or falls outside the representable date range
    pub fn plan(task: &DisplayTask, lead_minutes: i64, now: NaiveDateTime) -> Option<ScheduledReminder> {
        let notify_at = Duration::try_minutes(lead_minutes)
            .and_then(|lead| task.due_at().checked_sub_signed(lead))?;
        if notify_at <= now {
            return None;
        }

        Some(ScheduledReminder {
            notify_at,
            payload: ReminderPayload {
                task_id: task.id,
                title: REMINDER_TITLE.to_string(),
                body: format!("Task \"{}\" is due in {} minutes", task.text, lead_minutes),
                tag: task.id.to_string(),
                due_date: task.due_date,
                due_time: task.due_time,
                phone: task.assignee_phone.clone(),
            },
        })
    }

    /// Schedule a reminder for `task` if permission is granted and it is not too late.
    ///
    /// `now` is only evaluated once permission has been checked.
    pub fn maybe_schedule<F>(&self, task: &DisplayTask, lead_minutes: i64, now: F) -> Option<ScheduledReminder>
    where
        F: FnOnce() -> NaiveDateTime,
    {
        if !self.is_granted() {
            return None;
        }

        let Some(reminder) = Self::plan(task, lead_minutes, now()) else {
            debug!(task_id = task.id, "Reminder time already passed, skipping");
            return None;
        };

        match self.sink.hand_off(reminder.clone()) {
            Ok(()) => {
                info!(task_id = task.id, notify_at = %reminder.notify_at, "Scheduled reminder");
                Some(reminder)
            }
            Err(e) => {
                warn!(task_id = task.id, "Failed to hand off reminder: {}", e);
                None
            }
        }
    }
}
