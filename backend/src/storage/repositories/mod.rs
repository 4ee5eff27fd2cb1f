//! sqlx-backed repositories. Dates are stored as `YYYY-MM-DD` text and
//! timestamps as RFC 3339 text.

pub mod assignment_repository;
pub mod chore_repository;
pub mod kid_repository;

pub use assignment_repository::AssignmentRepository;
pub use chore_repository::ChoreRepository;
pub use kid_repository::KidRepository;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).with_context(|| format!("Invalid stored date '{}'", value))
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid stored timestamp '{}'", value))
}
