//! The in-memory board: display tasks keyed by date.
//!
//! A [`TaskBoard`] is an immutable value. Every mutation goes through a reducer
//! that returns a new board, and [`BoardStore`] swaps the whole snapshot in one
//! step. Readers holding an older `Arc<TaskBoard>` keep a consistent view.

use std::sync::{Arc, RwLock};

use chrono::{Datelike, NaiveDate};

use crate::domain::models::display_task::DisplayTask;
use crate::domain::task_aggregator::{push_unique, TaskBuckets};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    buckets: TaskBuckets,
}

impl TaskBoard {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of tasks across all dates
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, task_id: i64) -> Option<&DisplayTask> {
        self.buckets.values().flatten().find(|task| task.id == task_id)
    }

    /// All tasks due on `date`, in bucket order
    pub fn tasks_for_date(&self, date: NaiveDate) -> Vec<DisplayTask> {
        let mut tasks: Vec<DisplayTask> = self
            .buckets
            .values()
            .flatten()
            .filter(|task| task.due_date == date)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.due_time, task.id));
        tasks
    }

    /// Bucket keys with their tasks, ordered by date
    pub fn dates(&self) -> Vec<(String, Vec<DisplayTask>)> {
        let mut dates: Vec<(NaiveDate, String, Vec<DisplayTask>)> = self
            .buckets
            .iter()
            .filter_map(|(key, tasks)| {
                tasks
                    .first()
                    .map(|first| (first.due_date, key.clone(), tasks.clone()))
            })
            .collect();
        dates.sort_by_key(|(date, _, _)| *date);
        dates.into_iter().map(|(_, key, tasks)| (key, tasks)).collect()
    }

    /// Board with `tasks` appended, skipping ones already present
    pub fn with_tasks(&self, tasks: &[DisplayTask]) -> TaskBoard {
        let mut buckets = self.buckets.clone();
        for task in tasks {
            push_unique(&mut buckets, task.clone());
        }
        TaskBoard { buckets }
    }

    /// Board with the task's completion flag set
    pub fn with_completion(&self, task_id: i64, completed: bool) -> TaskBoard {
        self.map_task(task_id, |task| DisplayTask {
            completed,
            ..task.clone()
        })
    }

    /// Board with the task carrying `task.id` replaced by `task`
    pub fn with_task_replaced(&self, task: DisplayTask) -> TaskBoard {
        let without = self.without_task(task.id);
        without.with_tasks(&[task])
    }

    /// Board without the task; empty date buckets are dropped
    pub fn without_task(&self, task_id: i64) -> TaskBoard {
        let buckets = self
            .buckets
            .iter()
            .filter_map(|(key, tasks)| {
                let kept: Vec<DisplayTask> =
                    tasks.iter().filter(|task| task.id != task_id).cloned().collect();
                (!kept.is_empty()).then(|| (key.clone(), kept))
            })
            .collect();
        TaskBoard { buckets }
    }

    /// Board whose tasks for `year`/`month` are replaced by `fresh`
    pub fn with_month_refreshed(&self, year: i32, month: u32, fresh: TaskBuckets) -> TaskBoard {
        let in_month = |task: &DisplayTask| task.due_date.year() == year && task.due_date.month() == month;

        let mut buckets: TaskBuckets = self
            .buckets
            .iter()
            .filter_map(|(key, tasks)| {
                let kept: Vec<DisplayTask> = tasks.iter().filter(|t| !in_month(t)).cloned().collect();
                (!kept.is_empty()).then(|| (key.clone(), kept))
            })
            .collect();

        for task in fresh.into_values().flatten() {
            push_unique(&mut buckets, task);
        }
        TaskBoard { buckets }
    }

    fn map_task<F>(&self, task_id: i64, f: F) -> TaskBoard
    where
        F: Fn(&DisplayTask) -> DisplayTask,
    {
        let buckets = self
            .buckets
            .iter()
            .map(|(key, tasks)| {
                let mapped = tasks
                    .iter()
                    .map(|task| if task.id == task_id { f(task) } else { task.clone() })
                    .collect();
                (key.clone(), mapped)
            })
            .collect();
        TaskBoard { buckets }
    }
}

/// Shared handle to the current board snapshot
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    current: Arc<RwLock<Arc<TaskBoard>>>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<TaskBoard> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Apply a reducer and publish its result, returning the new snapshot
    pub fn update<F>(&self, reducer: F) -> Arc<TaskBoard>
    where
        F: FnOnce(&TaskBoard) -> TaskBoard,
    {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = Arc::new(reducer(&**guard));
        *guard = Arc::clone(&next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::display_task::default_due_time;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, text: &str, on: NaiveDate) -> DisplayTask {
        DisplayTask {
            id,
            text: text.to_string(),
            assigned_to: "Jerry Smith".to_string(),
            assignee_phone: None,
            due_date: on,
            due_time: default_due_time(),
            color: "#FF6B6B".to_string(),
            completed: false,
            kid_id: 1,
            chore_id: 1,
        }
    }

    #[test]
    fn test_reducers_do_not_mutate_original() {
        let board = TaskBoard::empty().with_tasks(&[task(1, "Dishes", date(2024, 6, 3))]);
        let toggled = board.with_completion(1, true);

        assert!(!board.find(1).unwrap().completed);
        assert!(toggled.find(1).unwrap().completed);
    }

    #[test]
    fn test_with_tasks_skips_duplicates() {
        let t = task(1, "Dishes", date(2024, 6, 3));
        let board = TaskBoard::empty().with_tasks(&[t.clone()]).with_tasks(&[t]);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_without_task_drops_empty_bucket() {
        let board = TaskBoard::empty().with_tasks(&[
            task(1, "Dishes", date(2024, 6, 3)),
            task(2, "Laundry", date(2024, 6, 4)),
        ]);

        let removed = board.without_task(1);

        assert_eq!(removed.len(), 1);
        assert_eq!(removed.dates().len(), 1);
        assert!(removed.tasks_for_date(date(2024, 6, 3)).is_empty());
        assert!(removed.find(2).is_some());
    }

    #[test]
    fn test_with_completion_sets_flag() {
        let board = TaskBoard::empty().with_tasks(&[task(1, "Dishes", date(2024, 6, 3))]);
        let done = board.with_completion(1, true);
        assert!(done.find(1).unwrap().completed);
        assert!(done.with_completion(1, true).find(1).unwrap().completed);
    }

    #[test]
    fn test_with_task_replaced_moves_text() {
        let board = TaskBoard::empty().with_tasks(&[task(1, "Dishes", date(2024, 6, 3))]);
        let replaced = board.with_task_replaced(task(1, "Vacuum", date(2024, 6, 3)));
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced.find(1).unwrap().text, "Vacuum");
    }

    #[test]
    fn test_tasks_for_date_and_dates_ordering() {
        let board = TaskBoard::empty().with_tasks(&[
            task(3, "Trash", date(2024, 6, 10)),
            task(1, "Dishes", date(2024, 6, 3)),
            task(2, "Laundry", date(2024, 6, 3)),
        ]);

        let monday = board.tasks_for_date(date(2024, 6, 3));
        assert_eq!(monday.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);

        let keys: Vec<String> = board.dates().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["Mon Jun 03 2024", "Mon Jun 10 2024"]);
    }

    #[test]
    fn test_with_month_refreshed_only_touches_that_month() {
        let board = TaskBoard::empty().with_tasks(&[
            task(1, "Stale", date(2024, 6, 3)),
            task(2, "May chore", date(2024, 5, 31)),
        ]);
        let mut fresh = TaskBuckets::new();
        push_unique(&mut fresh, task(5, "Fresh", date(2024, 6, 20)));

        let refreshed = board.with_month_refreshed(2024, 6, fresh);

        assert!(refreshed.find(1).is_none());
        assert!(refreshed.find(2).is_some());
        assert!(refreshed.find(5).is_some());
    }

    #[test]
    fn test_store_update_publishes_new_snapshot() {
        let store = BoardStore::new();
        let before = store.snapshot();

        store.update(|board| board.with_tasks(&[task(1, "Dishes", date(2024, 6, 3))]));

        assert!(before.is_empty());
        assert_eq!(store.snapshot().len(), 1);
    }
}
