use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use shared::{
    AssignChoreRequest, AssignChoreResponse, Assignment as SharedAssignment, AssignmentResponse,
    KidChore as SharedKidChore, KidChoreListResponse, UpdateAssignmentRequest,
};

use crate::domain::assignment_service::AssignOutcome;
use crate::domain::commands::{AssignChoreCommand, UpdateAssignmentCommand};
use crate::domain::models::assignment::{Assignment as DomainAssignment, AssignmentError, KidChore};
use crate::io::rest::mappers::task_mapper::{TaskMapper, TIME_FORMAT};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Mapper to convert between shared Assignment DTOs and domain models.
pub struct AssignmentMapper;

impl AssignmentMapper {
    pub fn to_dto(domain: DomainAssignment) -> SharedAssignment {
        SharedAssignment {
            id: domain.id,
            kid_id: domain.kid_id,
            chore_id: domain.chore_id,
            assigned_date: domain.assigned_date.format(DATE_FORMAT).to_string(),
            completed: domain.completed,
            last_completed: domain.last_completed.map(|at| at.to_rfc3339()),
            series_index: domain.series.map(|s| s.index),
            series_total: domain.series.map(|s| s.total),
        }
    }

    pub fn to_assignment_response(domain: DomainAssignment, success_message: impl Into<String>) -> AssignmentResponse {
        AssignmentResponse {
            assignment: Self::to_dto(domain),
            success_message: success_message.into(),
        }
    }

    pub fn to_assign_response(outcome: AssignOutcome, now: NaiveDateTime) -> AssignChoreResponse {
        let count = outcome.assignments.len();
        let success_message = if count == 1 {
            "Chore assigned".to_string()
        } else {
            format!("Chore assigned on {} dates", count)
        };

        AssignChoreResponse {
            assignments: outcome.assignments.into_iter().map(Self::to_dto).collect(),
            tasks: TaskMapper::to_dtos(outcome.tasks, now),
            reminders_scheduled: outcome.reminders_scheduled,
            success_message,
        }
    }

    pub fn to_kid_chore_dto(domain: KidChore) -> SharedKidChore {
        SharedKidChore {
            assignment_id: domain.assignment_id,
            chore_id: domain.chore_id,
            description: domain.description,
            assigned_date: domain.assigned_date.format(DATE_FORMAT).to_string(),
            completed: domain.completed,
            last_completed: domain.last_completed.map(|at| at.to_rfc3339()),
        }
    }

    pub fn to_kid_chore_list_dto(kid_id: i64, chores: Vec<KidChore>) -> KidChoreListResponse {
        KidChoreListResponse {
            kid_id,
            chores: chores.into_iter().map(Self::to_kid_chore_dto).collect(),
        }
    }

    pub fn to_assign_command(request: AssignChoreRequest) -> Result<AssignChoreCommand, AssignmentError> {
        let start_date = Self::parse_date(&request.start_date)?;
        let due_time = match request.due_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                NaiveTime::parse_from_str(raw, TIME_FORMAT)
                    .map_err(|_| AssignmentError::InvalidTime(raw.to_string()))?,
            ),
        };

        Ok(AssignChoreCommand {
            kid_id: request.kid_id,
            chore_id: request.chore_id,
            start_date,
            due_time,
            recurrence: request.recurrence,
        })
    }

    pub fn to_update_command(assignment_id: i64, request: UpdateAssignmentRequest) -> UpdateAssignmentCommand {
        UpdateAssignmentCommand {
            assignment_id,
            kid_id: request.kid_id,
            chore_id: request.chore_id,
        }
    }

    pub fn parse_date(raw: &str) -> Result<NaiveDate, AssignmentError> {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| AssignmentError::InvalidDate(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::assignment::SeriesPosition;
    use shared::{RecurrenceRequest, RecurrenceType};

    fn request(start_date: &str, due_time: Option<&str>) -> AssignChoreRequest {
        AssignChoreRequest {
            kid_id: 1,
            chore_id: 2,
            start_date: start_date.to_string(),
            due_time: due_time.map(str::to_string),
            recurrence: Some(RecurrenceRequest {
                recurrence_type: RecurrenceType::Weekly,
                occurrences: 4,
            }),
        }
    }

    #[test]
    fn test_to_assign_command_parses_date_and_time() {
        let command = AssignmentMapper::to_assign_command(request("2024-06-03", Some("18:30"))).unwrap();
        assert_eq!(command.start_date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(command.due_time, NaiveTime::from_hms_opt(18, 30, 0));
        assert_eq!(command.recurrence.unwrap().occurrences, 4);
    }

    #[test]
    fn test_blank_due_time_is_none() {
        let command = AssignmentMapper::to_assign_command(request("2024-06-03", Some("  "))).unwrap();
        assert_eq!(command.due_time, None);
    }

    #[test]
    fn test_bad_input_is_rejected() {
        assert!(matches!(
            AssignmentMapper::to_assign_command(request("06/03/2024", None)),
            Err(AssignmentError::InvalidDate(_))
        ));
        assert!(matches!(
            AssignmentMapper::to_assign_command(request("2024-06-03", Some("6pm"))),
            Err(AssignmentError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_to_dto_flattens_series() {
        let dto = AssignmentMapper::to_dto(DomainAssignment {
            id: 7,
            kid_id: 1,
            chore_id: 2,
            assigned_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            completed: false,
            last_completed: None,
            series: Some(SeriesPosition { index: 2, total: 4 }),
        });
        assert_eq!(dto.assigned_date, "2024-06-10");
        assert_eq!(dto.series_index, Some(2));
        assert_eq!(dto.series_total, Some(4));
    }
}
