//! Recurring-date expansion.
//!
//! A recurrence pattern is expanded once, when an assignment is created, into
//! the ordered list of calendar dates it is due on. Each date then becomes its
//! own assignment row.
//!
//! Monthly recurrence is anchored to the start date: occurrence `k` is
//! `start + k months`, clamped to the last day of the target month. Starting
//! on Jan 31 therefore gives Jan 31, Feb 29 (leap year), Mar 31, and the day
//! of month never drifts after a short month.

use std::num::NonZeroU32;

use chrono::{Days, Months, NaiveDate};
use shared::{RecurrenceRequest, RecurrenceType};

use crate::domain::models::assignment::AssignmentError;

/// Upper bound on occurrences accepted from a client
pub const MAX_OCCURRENCES: u32 = 52;

/// Recurrence step plus how many occurrences to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrencePattern {
    pub recurrence_type: RecurrenceType,
    pub occurrences: NonZeroU32,
}

impl RecurrencePattern {
    pub fn new(recurrence_type: RecurrenceType, occurrences: NonZeroU32) -> Self {
        Self {
            recurrence_type,
            occurrences,
        }
    }

    /// Validate a client-supplied recurrence (1..=MAX_OCCURRENCES)
    pub fn from_request(request: &RecurrenceRequest) -> Result<Self, AssignmentError> {
        Self::checked(request.recurrence_type, request.occurrences)
    }

    pub fn checked(recurrence_type: RecurrenceType, occurrences: u32) -> Result<Self, AssignmentError> {
        if occurrences > MAX_OCCURRENCES {
            return Err(AssignmentError::InvalidOccurrences {
                got: occurrences,
                max: MAX_OCCURRENCES,
            });
        }
        let occurrences = NonZeroU32::new(occurrences).ok_or(AssignmentError::InvalidOccurrences {
            got: occurrences,
            max: MAX_OCCURRENCES,
        })?;
        Ok(Self::new(recurrence_type, occurrences))
    }
}

/// Expand `pattern` from `start` into its ordered due dates.
///
/// The first date is always `start`. The result holds `occurrences` dates
/// unless a date would fall outside chrono's representable range, in which
/// case expansion stops there.
pub fn expand(start: NaiveDate, pattern: &RecurrencePattern) -> Vec<NaiveDate> {
    (0..pattern.occurrences.get())
        .map_while(|k| nth_occurrence(start, pattern.recurrence_type, k))
        .collect()
}

/// The `k`-th (0-based) occurrence of a series starting at `start`
fn nth_occurrence(start: NaiveDate, recurrence_type: RecurrenceType, k: u32) -> Option<NaiveDate> {
    match recurrence_type {
        RecurrenceType::Daily => start.checked_add_days(Days::new(u64::from(k))),
        RecurrenceType::Weekly => start.checked_add_days(Days::new(7 * u64::from(k))),
        RecurrenceType::Monthly => start.checked_add_months(Months::new(k)),
    }
}
