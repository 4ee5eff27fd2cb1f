use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display colors handed out to kids in creation order
pub const KID_COLOR_PALETTE: [&str; 4] = ["#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4"];

/// A family member that chores get assigned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kid {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Accumulated point total
    pub points: i64,
    pub avatar_url: Option<String>,
    /// Hex color used for task indicators (e.g. "#FF6B6B")
    pub color: String,
    /// Reminder contact (phone number or SMS gateway address)
    pub phone: Option<String>,
}

/// How often a chore is meant to repeat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ChoreFrequency {
    #[default]
    OneTime,
    Daily,
    Weekly,
    Monthly,
}

/// A reusable chore definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: i64,
    pub description: String,
    pub frequency: ChoreFrequency,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// A chore bound to a kid on a calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub kid_id: i64,
    pub chore_id: i64,
    /// Calendar date (YYYY-MM-DD)
    pub assigned_date: String,
    pub completed: bool,
    /// Completion timestamp (RFC 3339), cleared when un-completed
    pub last_completed: Option<String>,
    /// 1-based position within a recurrence series
    pub series_index: Option<u32>,
    pub series_total: Option<u32>,
}

/// Recurrence step between two occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
}

/// Recurrence as submitted by a client; validated into a domain pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRequest {
    #[serde(rename = "type")]
    pub recurrence_type: RecurrenceType,
    pub occurrences: u32,
}

/// UI-facing task synthesized from an assignment, its kid and its chore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTask {
    /// Assignment id
    pub id: i64,
    pub text: String,
    pub assigned_to: String,
    pub assignee_phone: Option<String>,
    /// YYYY-MM-DD
    pub due_date: String,
    /// HH:MM
    pub due_time: String,
    pub color: String,
    pub completed: bool,
    /// Not completed and past its due date/time when the response was built
    pub overdue: bool,
    pub kid_id: i64,
    pub chore_id: i64,
}

/// Type of calendar cell for explicit rendering logic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CalendarDayType {
    /// Empty padding cell before day 1 of the month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
}

/// One colored dot per task due on a day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskIndicator {
    pub task_id: i64,
    pub color: String,
}

/// A single cell of the month grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    /// Day of month, 0 for padding cells
    pub day: u32,
    pub day_type: CalendarDayType,
    pub indicators: Vec<TaskIndicator>,
    pub is_today: bool,
}

/// A month/year pair used for calendar navigation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthYear {
    pub month: u32,
    pub year: i32,
}

/// A calendar month laid out as a grid with task indicators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonth {
    pub month: u32,
    pub year: i32,
    pub month_name: String,
    pub days: Vec<CalendarDay>,
    pub first_day_of_week: u32, // 0 = Sunday, 1 = Monday, etc.
    /// Targets for the previous/next month buttons
    pub previous: MonthYear,
    pub next: MonthYear,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentDateResponse {
    pub month: u32,
    pub year: i32,
    pub day: u32,
    pub formatted_date: String,
    pub iso_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayTasksResponse {
    pub date: String,
    pub tasks: Vec<DisplayTask>,
}

/// One date bucket of the in-memory board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardDate {
    /// Human-readable date key, e.g. "Mon Jun 03 2024"
    pub date_key: String,
    pub tasks: Vec<DisplayTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardResponse {
    pub dates: Vec<BoardDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateKidRequest {
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAvatarRequest {
    /// None clears the avatar
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardPointsRequest {
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KidResponse {
    pub kid: Kid,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KidListResponse {
    pub kids: Vec<Kid>,
}

/// A kid's assignment joined with its chore, as shown on the profile page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KidChore {
    pub assignment_id: i64,
    pub chore_id: i64,
    pub description: String,
    pub assigned_date: String,
    pub completed: bool,
    pub last_completed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KidChoreListResponse {
    pub kid_id: i64,
    pub chores: Vec<KidChore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChoreRequest {
    pub description: String,
    /// Defaults to one-time
    pub frequency: Option<ChoreFrequency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateChoreRequest {
    pub description: Option<String>,
    pub frequency: Option<ChoreFrequency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreResponse {
    pub chore: Chore,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreListResponse {
    pub chores: Vec<Chore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignChoreRequest {
    pub kid_id: i64,
    pub chore_id: i64,
    /// First due date (YYYY-MM-DD)
    pub start_date: String,
    /// Due time (HH:MM), defaults to 12:00
    pub due_time: Option<String>,
    /// Ignored when the chore carries its own recurring frequency
    pub recurrence: Option<RecurrenceRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignChoreResponse {
    pub assignments: Vec<Assignment>,
    pub tasks: Vec<DisplayTask>,
    pub reminders_scheduled: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub kid_id: Option<i64>,
    pub chore_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    pub assignment: Assignment,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendSmsRequest {
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendSmsResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub kid_count: i64,
}

impl Kid {
    /// "First Last", the name shown as a task's assignee
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Palette color for the kid at the given creation index
    pub fn palette_color(index: usize) -> &'static str {
        KID_COLOR_PALETTE[index % KID_COLOR_PALETTE.len()]
    }
}

impl ChoreFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChoreFrequency::OneTime => "one-time",
            ChoreFrequency::Daily => "daily",
            ChoreFrequency::Weekly => "weekly",
            ChoreFrequency::Monthly => "monthly",
        }
    }

    /// The recurrence step implied by this frequency, None for one-time chores
    pub fn recurrence_type(&self) -> Option<RecurrenceType> {
        match self {
            ChoreFrequency::OneTime => None,
            ChoreFrequency::Daily => Some(RecurrenceType::Daily),
            ChoreFrequency::Weekly => Some(RecurrenceType::Weekly),
            ChoreFrequency::Monthly => Some(RecurrenceType::Monthly),
        }
    }
}

impl fmt::Display for ChoreFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownFrequencyError(pub String);

impl fmt::Display for UnknownFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown chore frequency: '{}'", self.0)
    }
}

impl std::error::Error for UnknownFrequencyError {}

impl FromStr for ChoreFrequency {
    type Err = UnknownFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "one-time" | "" => Ok(ChoreFrequency::OneTime),
            "daily" => Ok(ChoreFrequency::Daily),
            "weekly" => Ok(ChoreFrequency::Weekly),
            "monthly" => Ok(ChoreFrequency::Monthly),
            other => Err(UnknownFrequencyError(other.to_string())),
        }
    }
}
