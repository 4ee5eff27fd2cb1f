//! Domain-level inputs for service operations, parsed and typed by the REST
//! mappers before they reach a service.

use chrono::{NaiveDate, NaiveTime};
use shared::{ChoreFrequency, RecurrenceRequest};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateKidCommand {
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateChoreCommand {
    pub description: String,
    pub frequency: ChoreFrequency,
}

/// Fields left as None keep their current value
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateChoreCommand {
    pub chore_id: i64,
    pub description: Option<String>,
    pub frequency: Option<ChoreFrequency>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignChoreCommand {
    pub kid_id: i64,
    pub chore_id: i64,
    pub start_date: NaiveDate,
    /// None means the default due time
    pub due_time: Option<NaiveTime>,
    pub recurrence: Option<RecurrenceRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAssignmentCommand {
    pub assignment_id: i64,
    pub kid_id: Option<i64>,
    pub chore_id: Option<i64>,
}
