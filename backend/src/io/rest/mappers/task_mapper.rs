use chrono::NaiveDateTime;
use shared::{BoardDate, BoardResponse, DisplayTask as SharedTask};

use crate::domain::models::display_task::DisplayTask as DomainTask;
use crate::domain::task_board::TaskBoard;

pub const TIME_FORMAT: &str = "%H:%M";

pub struct TaskMapper;

impl TaskMapper {
    /// `now` decides the overdue flag
    pub fn to_dto(domain: DomainTask, now: NaiveDateTime) -> SharedTask {
        let overdue = domain.is_overdue(now);
        SharedTask {
            id: domain.id,
            text: domain.text,
            assigned_to: domain.assigned_to,
            assignee_phone: domain.assignee_phone,
            due_date: domain.due_date.format("%Y-%m-%d").to_string(),
            due_time: domain.due_time.format(TIME_FORMAT).to_string(),
            color: domain.color,
            completed: domain.completed,
            overdue,
            kid_id: domain.kid_id,
            chore_id: domain.chore_id,
        }
    }

    pub fn to_dtos(tasks: Vec<DomainTask>, now: NaiveDateTime) -> Vec<SharedTask> {
        tasks.into_iter().map(|task| Self::to_dto(task, now)).collect()
    }

    /// Board snapshot as date buckets in calendar order
    pub fn to_board_dto(board: &TaskBoard, now: NaiveDateTime) -> BoardResponse {
        BoardResponse {
            dates: board
                .dates()
                .into_iter()
                .map(|(date_key, tasks)| BoardDate {
                    date_key,
                    tasks: Self::to_dtos(tasks, now),
                })
                .collect(),
        }
    }
}
