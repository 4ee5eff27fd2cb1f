use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Position of an assignment within a recurrence series, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPosition {
    pub index: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub kid_id: i64,
    pub chore_id: i64,
    pub assigned_date: NaiveDate,
    pub completed: bool,
    pub last_completed: Option<DateTime<Utc>>,
    pub series: Option<SeriesPosition>,
}

/// An assignment row that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub kid_id: i64,
    pub chore_id: i64,
    pub assigned_date: NaiveDate,
    pub series: Option<SeriesPosition>,
}

/// One of a kid's assignments joined with its chore
#[derive(Debug, Clone, PartialEq)]
pub struct KidChore {
    pub assignment_id: i64,
    pub chore_id: i64,
    pub description: String,
    pub assigned_date: NaiveDate,
    pub completed: bool,
    pub last_completed: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error("This chore is already assigned to this kid on {date}")]
    AlreadyAssigned {
        kid_id: i64,
        chore_id: i64,
        date: NaiveDate,
    },
    #[error("Assignment not found: {0}")]
    NotFound(i64),
    #[error("Kid not found: {0}")]
    KidNotFound(i64),
    #[error("Chore not found: {0}")]
    ChoreNotFound(i64),
    #[error("Occurrences must be between 1 and {max}, got {got}")]
    InvalidOccurrences { got: u32, max: u32 },
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("Assignment was cancelled before it completed")]
    Cancelled,
}
