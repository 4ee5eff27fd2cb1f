use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Due time used when the source data carries no time of day
pub fn default_due_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

/// A task ready for display: an assignment joined with its kid and chore.
/// Never persisted; rebuilt on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTask {
    pub id: i64,
    pub text: String,
    pub assigned_to: String,
    pub assignee_phone: Option<String>,
    pub due_date: NaiveDate,
    pub due_time: NaiveTime,
    pub color: String,
    pub completed: bool,
    pub kid_id: i64,
    pub chore_id: i64,
}

impl DisplayTask {
    pub fn due_at(&self) -> NaiveDateTime {
        self.due_date.and_time(self.due_time)
    }

    /// Incomplete and past its due date/time
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && now > self.due_at()
    }

    /// Same (text, assignee, due date) as `other`
    pub fn is_duplicate_of(&self, other: &DisplayTask) -> bool {
        self.text == other.text
            && self.assigned_to == other.assigned_to
            && self.due_date == other.due_date
    }
}
