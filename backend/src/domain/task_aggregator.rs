//! Joins assignment rows with their kid and chore into display tasks,
//! grouped by calendar date.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use tracing::warn;

use crate::domain::models::{
    assignment::{Assignment, SeriesPosition},
    chore::Chore,
    display_task::{default_due_time, DisplayTask},
    kid::Kid,
};

/// Display tasks keyed by human-readable date (see [`date_key`])
pub type TaskBuckets = HashMap<String, Vec<DisplayTask>>;

/// Bucket key for a date, e.g. "Mon Jun 03 2024"
pub fn date_key(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Chore description, suffixed with "(i/N)" for recurring assignments
pub fn task_text(description: &str, series: Option<SeriesPosition>) -> String {
    match series {
        Some(position) => format!("{} ({}/{})", description, position.index, position.total),
        None => description.to_string(),
    }
}

/// Append `task` to its date bucket unless an equivalent task is already there
pub fn push_unique(buckets: &mut TaskBuckets, task: DisplayTask) -> bool {
    let bucket = buckets.entry(date_key(task.due_date)).or_default();
    if bucket.iter().any(|existing| existing.is_duplicate_of(&task)) {
        return false;
    }
    bucket.push(task);
    true
}

#[derive(Debug, Clone)]
pub struct TaskAggregator {
    default_due_time: NaiveTime,
}

impl TaskAggregator {
    pub fn new() -> Self {
        Self {
            default_due_time: default_due_time(),
        }
    }

    /// Build a display task for one assignment
    pub fn synthesize(&self, assignment: &Assignment, kid: &Kid, chore: &Chore) -> DisplayTask {
        self.synthesize_at(assignment, kid, chore, self.default_due_time)
    }

    /// Build a display task with an explicit due time
    pub fn synthesize_at(
        &self,
        assignment: &Assignment,
        kid: &Kid,
        chore: &Chore,
        due_time: NaiveTime,
    ) -> DisplayTask {
        DisplayTask {
            id: assignment.id,
            text: task_text(&chore.description, assignment.series),
            assigned_to: kid.full_name(),
            assignee_phone: kid.phone.clone(),
            due_date: assignment.assigned_date,
            due_time,
            color: kid.color.clone(),
            completed: assignment.completed,
            kid_id: kid.id,
            chore_id: chore.id,
        }
    }

    /// Merge `assignments` into `existing`, returning the new buckets.
    ///
    /// Assignments whose kid or chore is missing are skipped. A task equal to
    /// one already in its bucket (same text, assignee and due date) is not
    /// appended again, so aggregating the same rows twice is a no-op. Within a
    /// bucket, tasks keep input order.
    pub fn aggregate(
        &self,
        assignments: &[Assignment],
        kids_by_id: &HashMap<i64, Kid>,
        chores_by_id: &HashMap<i64, Chore>,
        existing: TaskBuckets,
    ) -> TaskBuckets {
        let mut buckets = existing;

        for assignment in assignments {
            let Some(kid) = kids_by_id.get(&assignment.kid_id) else {
                warn!(
                    assignment_id = assignment.id,
                    kid_id = assignment.kid_id,
                    "Skipping assignment with unknown kid"
                );
                continue;
            };
            let Some(chore) = chores_by_id.get(&assignment.chore_id) else {
                warn!(
                    assignment_id = assignment.id,
                    chore_id = assignment.chore_id,
                    "Skipping assignment with unknown chore"
                );
                continue;
            };

            push_unique(&mut buckets, self.synthesize(assignment, kid, chore));
        }

        buckets
    }
}

impl Default for TaskAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::ChoreFrequency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn kid(id: i64, first: &str, color: &str) -> Kid {
        Kid {
            id,
            first_name: first.to_string(),
            last_name: "Smith".to_string(),
            points: 0,
            avatar_url: None,
            color: color.to_string(),
            phone: Some("+15550000000".to_string()),
        }
    }

    fn chore(id: i64, description: &str) -> Chore {
        Chore {
            id,
            description: description.to_string(),
            frequency: ChoreFrequency::OneTime,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn assignment(id: i64, kid_id: i64, chore_id: i64, on: NaiveDate) -> Assignment {
        Assignment {
            id,
            kid_id,
            chore_id,
            assigned_date: on,
            completed: false,
            last_completed: None,
            series: None,
        }
    }

    fn reference_data() -> (HashMap<i64, Kid>, HashMap<i64, Chore>) {
        let kids = HashMap::from([
            (1, kid(1, "Jerry", "#FF6B6B")),
            (2, kid(2, "Mike", "#4ECDC4")),
        ]);
        let chores = HashMap::from([(10, chore(10, "Dishes")), (11, chore(11, "Take out trash"))]);
        (kids, chores)
    }

    #[test]
    fn test_date_key_format() {
        assert_eq!(date_key(date(2024, 6, 3)), "Mon Jun 03 2024");
        assert_eq!(date_key(date(2024, 2, 29)), "Thu Feb 29 2024");
    }

    #[test]
    fn test_task_text_suffix() {
        assert_eq!(task_text("Dishes", None), "Dishes");
        assert_eq!(
            task_text("Dishes", Some(SeriesPosition { index: 2, total: 4 })),
            "Dishes (2/4)"
        );
    }

    #[test]
    fn test_aggregate_groups_by_date_in_input_order() {
        let aggregator = TaskAggregator::new();
        let (kids, chores) = reference_data();
        let day = date(2024, 6, 3);
        let assignments = vec![
            assignment(1, 2, 11, day),
            assignment(2, 1, 10, day),
            assignment(3, 1, 10, date(2024, 6, 4)),
        ];

        let buckets = aggregator.aggregate(&assignments, &kids, &chores, TaskBuckets::new());

        assert_eq!(buckets.len(), 2);
        let monday = &buckets["Mon Jun 03 2024"];
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].text, "Take out trash");
        assert_eq!(monday[0].assigned_to, "Mike Smith");
        assert_eq!(monday[0].color, "#4ECDC4");
        assert_eq!(monday[1].text, "Dishes");
        assert_eq!(monday[1].due_time, default_due_time());
        assert_eq!(buckets["Tue Jun 04 2024"].len(), 1);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let aggregator = TaskAggregator::new();
        let (kids, chores) = reference_data();
        let assignments = vec![
            assignment(1, 1, 10, date(2024, 6, 3)),
            assignment(2, 2, 10, date(2024, 6, 3)),
            assignment(3, 1, 11, date(2024, 6, 5)),
        ];

        let once = aggregator.aggregate(&assignments, &kids, &chores, TaskBuckets::new());
        let twice = aggregator.aggregate(&assignments, &kids, &chores, once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_aggregate_skips_missing_references() {
        let aggregator = TaskAggregator::new();
        let (kids, chores) = reference_data();
        let day = date(2024, 6, 3);
        let assignments = vec![
            assignment(1, 99, 10, day),
            assignment(2, 1, 99, day),
            assignment(3, 1, 10, day),
        ];

        let buckets = aggregator.aggregate(&assignments, &kids, &chores, TaskBuckets::new());

        let all: Vec<&DisplayTask> = buckets.values().flatten().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 3);
    }

    #[test]
    fn test_aggregate_suppresses_duplicates_within_input() {
        let aggregator = TaskAggregator::new();
        let (kids, chores) = reference_data();
        let day = date(2024, 6, 3);
        let assignments = vec![assignment(1, 1, 10, day), assignment(7, 1, 10, day)];

        let buckets = aggregator.aggregate(&assignments, &kids, &chores, TaskBuckets::new());

        assert_eq!(buckets["Mon Jun 03 2024"].len(), 1);
        assert_eq!(buckets["Mon Jun 03 2024"][0].id, 1);
    }

    #[test]
    fn test_series_tasks_are_distinct() {
        let aggregator = TaskAggregator::new();
        let (kids, chores) = reference_data();
        let mut first = assignment(1, 1, 11, date(2024, 6, 3));
        first.series = Some(SeriesPosition { index: 1, total: 2 });
        let mut second = assignment(2, 1, 11, date(2024, 6, 10));
        second.series = Some(SeriesPosition { index: 2, total: 2 });

        let buckets = aggregator.aggregate(&[first, second], &kids, &chores, TaskBuckets::new());

        assert_eq!(buckets["Mon Jun 03 2024"][0].text, "Take out trash (1/2)");
        assert_eq!(buckets["Mon Jun 10 2024"][0].text, "Take out trash (2/2)");
    }
}
