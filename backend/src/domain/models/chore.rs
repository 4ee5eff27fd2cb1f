use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::ChoreFrequency;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: i64,
    pub description: String,
    pub frequency: ChoreFrequency,
    pub created_at: DateTime<Utc>,
}

/// A chore that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewChore {
    pub description: String,
    pub frequency: ChoreFrequency,
    pub created_at: DateTime<Utc>,
}

pub const MAX_DESCRIPTION_LEN: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum ChoreValidationError {
    #[error("Please enter a chore description")]
    EmptyDescription,
    #[error("Chore description cannot exceed 256 characters")]
    DescriptionTooLong,
    #[error("Chore not found: {0}")]
    NotFound(i64),
}
