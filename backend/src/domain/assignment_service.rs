//! Assigning chores to kids, and keeping the in-memory board in step with
//! storage.
//!
//! Creating an assignment expands its recurrence into one row per date,
//! inserts them in a single transaction, synthesizes display tasks, schedules
//! reminders and merges the tasks into the board. Month reads rebuild that
//! month of the board from storage.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Utc};
use shared::{CalendarMonth, RecurrenceRequest};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::calendar::CalendarService;
use crate::domain::commands::{AssignChoreCommand, UpdateAssignmentCommand};
use crate::domain::models::assignment::{Assignment, AssignmentError, KidChore, NewAssignment, SeriesPosition};
use crate::domain::models::chore::Chore;
use crate::domain::models::display_task::{default_due_time, DisplayTask};
use crate::domain::models::kid::{Kid, KidError};
use crate::domain::notification::NotificationScheduler;
use crate::domain::recurrence::{expand, RecurrencePattern};
use crate::domain::task_aggregator::{TaskAggregator, TaskBuckets};
use crate::domain::task_board::{BoardStore, TaskBoard};
use crate::storage::{AssignmentStorage, ChoreStorage, Connection, KidStorage};

type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Everything produced by one assign operation
#[derive(Debug, Clone, PartialEq)]
pub struct AssignOutcome {
    pub assignments: Vec<Assignment>,
    pub tasks: Vec<DisplayTask>,
    pub reminders_scheduled: usize,
}

/// Recurrence actually applied when assigning `chore`.
///
/// A chore with its own recurring frequency uses that step with the requested
/// occurrence count (one if none was requested). A one-time chore follows the
/// request. Any pattern makes the assignments a series, even of one. None
/// means a single, non-series assignment.
pub fn effective_pattern(
    chore: &Chore,
    requested: Option<&RecurrenceRequest>,
) -> Result<Option<RecurrencePattern>, AssignmentError> {
    let pattern = match (chore.frequency.recurrence_type(), requested) {
        (Some(recurrence_type), Some(request)) => RecurrencePattern::checked(recurrence_type, request.occurrences)?,
        (Some(recurrence_type), None) => RecurrencePattern::checked(recurrence_type, 1)?,
        (None, Some(request)) => RecurrencePattern::from_request(request)?,
        (None, None) => return Ok(None),
    };
    Ok(Some(pattern))
}

#[derive(Clone)]
pub struct AssignmentService<C: Connection> {
    assignment_repository: C::AssignmentRepository,
    kid_repository: C::KidRepository,
    chore_repository: C::ChoreRepository,
    calendar: CalendarService,
    aggregator: TaskAggregator,
    scheduler: NotificationScheduler,
    board: BoardStore,
    reminder_lead_minutes: i64,
    clock: Clock,
}

impl<C: Connection> AssignmentService<C> {
    pub fn new(connection: &C, scheduler: NotificationScheduler, board: BoardStore, reminder_lead_minutes: i64) -> Self {
        Self {
            assignment_repository: connection.create_assignment_repository(),
            kid_repository: connection.create_kid_repository(),
            chore_repository: connection.create_chore_repository(),
            calendar: CalendarService::new(),
            aggregator: TaskAggregator::new(),
            scheduler,
            board,
            reminder_lead_minutes,
            clock: Arc::new(|| Local::now().naive_local()),
        }
    }

    /// Replace the wall clock used for reminder decisions
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDateTime + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn board(&self) -> &BoardStore {
        &self.board
    }

    /// Assign a chore, aborting if `cancel` fires first.
    ///
    /// Cancellation drops the in-flight transaction, so a cancelled assign
    /// writes nothing.
    pub async fn assign_chore(&self, command: AssignChoreCommand, cancel: &CancellationToken) -> Result<AssignOutcome> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(kid_id = command.kid_id, chore_id = command.chore_id, "Assignment cancelled");
                Err(AssignmentError::Cancelled.into())
            }
            outcome = self.assign_chore_inner(&command) => outcome,
        }
    }

    async fn assign_chore_inner(&self, command: &AssignChoreCommand) -> Result<AssignOutcome> {
        info!(
            "Assigning chore {} to kid {} from {}",
            command.chore_id, command.kid_id, command.start_date
        );

        let kid = self.require_kid(command.kid_id).await?;
        let chore = self.require_chore(command.chore_id).await?;

        let pattern = effective_pattern(&chore, command.recurrence.as_ref())?;
        let dates = match &pattern {
            Some(pattern) => expand(command.start_date, pattern),
            None => vec![command.start_date],
        };
        let total = u32::try_from(dates.len()).unwrap_or(u32::MAX);
        let is_series = pattern.is_some();

        let rows: Vec<NewAssignment> = dates
            .iter()
            .zip(1u32..)
            .map(|(date, index)| NewAssignment {
                kid_id: kid.id,
                chore_id: chore.id,
                assigned_date: *date,
                series: is_series.then_some(SeriesPosition { index, total }),
            })
            .collect();

        let assignments = self.assignment_repository.insert_assignments(&rows).await?;

        let due_time = command.due_time.unwrap_or_else(default_due_time);
        let tasks: Vec<DisplayTask> = assignments
            .iter()
            .map(|assignment| self.aggregator.synthesize_at(assignment, &kid, &chore, due_time))
            .collect();

        let reminders_scheduled = tasks
            .iter()
            .filter_map(|task| {
                self.scheduler
                    .maybe_schedule(task, self.reminder_lead_minutes, || (self.clock)())
            })
            .count();

        self.board.update(|board| board.with_tasks(&tasks));

        info!(
            "Created {} assignments for kid {}, {} reminders scheduled",
            assignments.len(),
            kid.id,
            reminders_scheduled
        );

        Ok(AssignOutcome {
            assignments,
            tasks,
            reminders_scheduled,
        })
    }

    /// Flip completion; completing stamps `last_completed`, un-completing clears it
    pub async fn toggle_completion(&self, assignment_id: i64) -> Result<Assignment> {
        let current = self.require_assignment(assignment_id).await?;
        let completed = !current.completed;
        let last_completed = completed.then(Utc::now);

        let updated = self
            .assignment_repository
            .set_completion(assignment_id, completed, last_completed)
            .await?
            .ok_or(AssignmentError::NotFound(assignment_id))?;

        self.board.update(|board| board.with_completion(assignment_id, completed));
        info!("Assignment {} completed={}", assignment_id, completed);
        Ok(updated)
    }

    /// Reassign to another kid and/or chore, keeping the date
    pub async fn update_assignment(&self, command: UpdateAssignmentCommand) -> Result<Assignment> {
        let current = self.require_assignment(command.assignment_id).await?;
        let kid = self.require_kid(command.kid_id.unwrap_or(current.kid_id)).await?;
        let chore = self.require_chore(command.chore_id.unwrap_or(current.chore_id)).await?;

        let updated = self
            .assignment_repository
            .update_assignment_refs(current.id, kid.id, chore.id)
            .await?
            .ok_or(AssignmentError::NotFound(current.id))?;

        let snapshot = self.board.snapshot();
        let due_time = snapshot
            .find(updated.id)
            .map(|task| task.due_time)
            .unwrap_or_else(default_due_time);
        let task = self.aggregator.synthesize_at(&updated, &kid, &chore, due_time);
        self.board.update(|board| board.with_task_replaced(task));

        info!("Updated assignment {}: kid={}, chore={}", updated.id, kid.id, chore.id);
        Ok(updated)
    }

    pub async fn delete_assignment(&self, assignment_id: i64) -> Result<()> {
        if !self.assignment_repository.delete_assignment(assignment_id).await? {
            return Err(AssignmentError::NotFound(assignment_id).into());
        }
        self.board.update(|board| board.without_task(assignment_id));
        info!("Deleted assignment {}", assignment_id);
        Ok(())
    }

    /// Display tasks for every assignment in the month, grouped by date
    pub async fn load_month(&self, year: i32, month: u32) -> Result<TaskBuckets> {
        let (first, last) = self.calendar.month_bounds(year, month)?;
        let assignments = self
            .assignment_repository
            .list_assignments_between(first, last)
            .await?;

        let kids = self.kid_repository.list_kids().await?;
        let kids_by_id: HashMap<i64, Kid> = kids.into_iter().map(|kid| (kid.id, kid)).collect();
        let chores = self.chore_repository.list_chores(None).await?;
        let chores_by_id: HashMap<i64, Chore> = chores.into_iter().map(|chore| (chore.id, chore)).collect();

        Ok(self
            .aggregator
            .aggregate(&assignments, &kids_by_id, &chores_by_id, TaskBuckets::new()))
    }

    /// Rebuild one month of the board from storage
    pub async fn refresh_month(&self, year: i32, month: u32) -> Result<Arc<TaskBoard>> {
        let fresh = self.load_month(year, month).await?;
        Ok(self
            .board
            .update(|board| board.with_month_refreshed(year, month, fresh)))
    }

    pub async fn calendar_month(&self, year: i32, month: u32, today: NaiveDate) -> Result<CalendarMonth> {
        let board = self.refresh_month(year, month).await?;
        Ok(self.calendar.generate_calendar_month(year, month, &board, today)?)
    }

    pub async fn day_tasks(&self, date: NaiveDate) -> Result<Vec<DisplayTask>> {
        let board = self.refresh_month(date.year(), date.month()).await?;
        Ok(board.tasks_for_date(date))
    }

    pub async fn list_kid_chores(&self, kid_id: i64) -> Result<Vec<KidChore>> {
        if self.kid_repository.get_kid(kid_id).await?.is_none() {
            return Err(KidError::NotFound(kid_id).into());
        }
        self.assignment_repository.list_kid_chores(kid_id).await
    }

    async fn require_kid(&self, kid_id: i64) -> Result<Kid> {
        Ok(self
            .kid_repository
            .get_kid(kid_id)
            .await?
            .ok_or(AssignmentError::KidNotFound(kid_id))?)
    }

    async fn require_chore(&self, chore_id: i64) -> Result<Chore> {
        Ok(self
            .chore_repository
            .get_chore(chore_id)
            .await?
            .ok_or(AssignmentError::ChoreNotFound(chore_id))?)
    }

    async fn require_assignment(&self, assignment_id: i64) -> Result<Assignment> {
        Ok(self
            .assignment_repository
            .get_assignment(assignment_id)
            .await?
            .ok_or(AssignmentError::NotFound(assignment_id))?)
    }
}
