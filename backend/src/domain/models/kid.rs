use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kid {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub points: i64,
    pub avatar_url: Option<String>,
    pub color: String,
    pub phone: Option<String>,
}

impl Kid {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A kid that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewKid {
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub color: String,
    pub phone: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum KidError {
    #[error("First name cannot be empty")]
    EmptyFirstName,
    #[error("Name is too long")]
    NameTooLong,
    #[error("Points award cannot be zero")]
    ZeroPoints,
    #[error("Kid not found: {0}")]
    NotFound(i64),
}
