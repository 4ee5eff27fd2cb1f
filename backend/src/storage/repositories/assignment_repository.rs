use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};
use tracing::debug;

use super::{format_date, parse_date, parse_timestamp};
use crate::domain::models::assignment::{Assignment, AssignmentError, KidChore, NewAssignment, SeriesPosition};
use crate::storage::connection::DbConnection;
use crate::storage::traits::AssignmentStorage;

const ASSIGNMENT_COLUMNS: &str =
    "id, kid_id, chore_id, assigned_date, completed, last_completed, series_index, series_total";

#[derive(Clone)]
pub struct AssignmentRepository {
    db: DbConnection,
}

impl AssignmentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_assignment(row: &SqliteRow) -> Result<Assignment> {
        let assigned_date: String = row.try_get("assigned_date")?;
        let last_completed: Option<String> = row.try_get("last_completed")?;
        let series_index: Option<i64> = row.try_get("series_index")?;
        let series_total: Option<i64> = row.try_get("series_total")?;

        Ok(Assignment {
            id: row.try_get("id")?,
            kid_id: row.try_get("kid_id")?,
            chore_id: row.try_get("chore_id")?,
            assigned_date: parse_date(&assigned_date)?,
            completed: row.try_get("completed")?,
            last_completed: last_completed.as_deref().map(parse_timestamp).transpose()?,
            series: series_position(series_index, series_total),
        })
    }

    /// The joined row always comes back as one flat record; a chore that
    /// vanished between reads simply drops the row from the inner join.
    fn row_to_kid_chore(row: &SqliteRow) -> Result<KidChore> {
        let assigned_date: String = row.try_get("assigned_date")?;
        let last_completed: Option<String> = row.try_get("last_completed")?;

        Ok(KidChore {
            assignment_id: row.try_get("assignment_id")?,
            chore_id: row.try_get("chore_id")?,
            description: row.try_get("description")?,
            assigned_date: parse_date(&assigned_date)?,
            completed: row.try_get("completed")?,
            last_completed: last_completed.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    async fn exists(conn: &mut SqliteConnection, table: &str, id: i64) -> Result<bool> {
        let row = sqlx::query(&format!("SELECT 1 FROM {} WHERE id = ?", table))
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.is_some())
    }
}

fn series_position(index: Option<i64>, total: Option<i64>) -> Option<SeriesPosition> {
    match (index, total) {
        (Some(index), Some(total)) => Some(SeriesPosition {
            index: u32::try_from(index).ok()?,
            total: u32::try_from(total).ok()?,
        }),
        _ => None,
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl AssignmentStorage for AssignmentRepository {
    async fn insert_assignments(&self, assignments: &[NewAssignment]) -> Result<Vec<Assignment>> {
        let mut tx = self.db.pool().begin().await?;

        let kid_ids: BTreeSet<i64> = assignments.iter().map(|a| a.kid_id).collect();
        for kid_id in kid_ids {
            if !Self::exists(&mut tx, "kids", kid_id).await? {
                return Err(AssignmentError::KidNotFound(kid_id).into());
            }
        }
        let chore_ids: BTreeSet<i64> = assignments.iter().map(|a| a.chore_id).collect();
        for chore_id in chore_ids {
            if !Self::exists(&mut tx, "chores", chore_id).await? {
                return Err(AssignmentError::ChoreNotFound(chore_id).into());
            }
        }

        let mut stored = Vec::with_capacity(assignments.len());
        for new in assignments {
            let already_assigned = AssignmentError::AlreadyAssigned {
                kid_id: new.kid_id,
                chore_id: new.chore_id,
                date: new.assigned_date,
            };

            let existing = sqlx::query(
                "SELECT id FROM kids_chores WHERE kid_id = ? AND chore_id = ? AND assigned_date = ?",
            )
            .bind(new.kid_id)
            .bind(new.chore_id)
            .bind(format_date(new.assigned_date))
            .fetch_optional(&mut *tx)
            .await?;
            if existing.is_some() {
                return Err(already_assigned.into());
            }

            let result = sqlx::query(
                "INSERT INTO kids_chores (kid_id, chore_id, assigned_date, completed, series_index, series_total) VALUES (?, ?, ?, 0, ?, ?)",
            )
            .bind(new.kid_id)
            .bind(new.chore_id)
            .bind(format_date(new.assigned_date))
            .bind(new.series.map(|s| i64::from(s.index)))
            .bind(new.series.map(|s| i64::from(s.total)))
            .execute(&mut *tx)
            .await;

            let result = match result {
                Ok(result) => result,
                // A concurrent writer got there between the check and the insert
                Err(e) if is_unique_violation(&e) => return Err(already_assigned.into()),
                Err(e) => return Err(e.into()),
            };

            stored.push(Assignment {
                id: result.last_insert_rowid(),
                kid_id: new.kid_id,
                chore_id: new.chore_id,
                assigned_date: new.assigned_date,
                completed: false,
                last_completed: None,
                series: new.series,
            });
        }

        tx.commit().await?;
        debug!("Inserted {} assignments", stored.len());
        Ok(stored)
    }

    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let row = sqlx::query(&format!("SELECT {} FROM kids_chores WHERE id = ?", ASSIGNMENT_COLUMNS))
            .bind(assignment_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_assignment).transpose()
    }

    async fn list_assignments_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Assignment>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM kids_chores WHERE assigned_date >= ? AND assigned_date <= ? ORDER BY assigned_date, id",
            ASSIGNMENT_COLUMNS
        ))
        .bind(format_date(start))
        .bind(format_date(end))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_assignment).collect()
    }

    async fn list_kid_chores(&self, kid_id: i64) -> Result<Vec<KidChore>> {
        let rows = sqlx::query(
            r#"
            SELECT kc.id AS assignment_id, kc.chore_id, c.description, kc.assigned_date,
                   kc.completed, kc.last_completed
            FROM kids_chores kc
            INNER JOIN chores c ON c.id = kc.chore_id
            WHERE kc.kid_id = ?
            ORDER BY kc.assigned_date DESC, kc.id DESC
            "#,
        )
        .bind(kid_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_kid_chore).collect()
    }

    async fn set_completion(
        &self,
        assignment_id: i64,
        completed: bool,
        last_completed: Option<DateTime<Utc>>,
    ) -> Result<Option<Assignment>> {
        let result = sqlx::query("UPDATE kids_chores SET completed = ?, last_completed = ? WHERE id = ?")
            .bind(completed)
            .bind(last_completed.map(|ts| ts.to_rfc3339()))
            .bind(assignment_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_assignment(assignment_id).await
    }

    async fn update_assignment_refs(&self, assignment_id: i64, kid_id: i64, chore_id: i64) -> Result<Option<Assignment>> {
        let Some(current) = self.get_assignment(assignment_id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("UPDATE kids_chores SET kid_id = ?, chore_id = ? WHERE id = ?")
            .bind(kid_id)
            .bind(chore_id)
            .bind(assignment_id)
            .execute(self.db.pool())
            .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(AssignmentError::AlreadyAssigned {
                    kid_id,
                    chore_id,
                    date: current.assigned_date,
                }
                .into())
            }
            Err(e) => return Err(e.into()),
        }

        self.get_assignment(assignment_id).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kids_chores WHERE id = ?")
            .bind(assignment_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::chore::NewChore;
    use crate::domain::models::kid::NewKid;
    use crate::storage::repositories::{ChoreRepository, KidRepository};
    use crate::storage::traits::{ChoreStorage, KidStorage};
    use shared::ChoreFrequency;

    struct Fixture {
        repo: AssignmentRepository,
        chores: ChoreRepository,
        kid_id: i64,
        other_kid_id: i64,
        chore_id: i64,
    }

    async fn setup_test() -> Fixture {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let kids = KidRepository::new(db.clone());
        let chores = ChoreRepository::new(db.clone());

        let mut kid_ids = Vec::new();
        for name in ["Jerry", "Mike"] {
            let kid = kids
                .insert_kid(&NewKid {
                    first_name: name.to_string(),
                    last_name: "Smith".to_string(),
                    avatar_url: None,
                    color: "#FF6B6B".to_string(),
                    phone: None,
                })
                .await
                .unwrap();
            kid_ids.push(kid.id);
        }
        let chore = chores
            .insert_chore(&NewChore {
                description: "Take out trash".to_string(),
                frequency: ChoreFrequency::Weekly,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        Fixture {
            repo: AssignmentRepository::new(db),
            chores,
            kid_id: kid_ids[0],
            other_kid_id: kid_ids[1],
            chore_id: chore.id,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_assignment(f: &Fixture, on: NaiveDate) -> NewAssignment {
        NewAssignment {
            kid_id: f.kid_id,
            chore_id: f.chore_id,
            assigned_date: on,
            series: None,
        }
    }

    #[tokio::test]
    async fn test_insert_series_and_list_by_range() {
        let f = setup_test().await;
        let rows: Vec<NewAssignment> = [3, 10, 17, 24]
            .iter()
            .enumerate()
            .map(|(i, d)| NewAssignment {
                series: Some(SeriesPosition {
                    index: i as u32 + 1,
                    total: 4,
                }),
                ..new_assignment(&f, date(2024, 6, *d))
            })
            .collect();

        let stored = f.repo.insert_assignments(&rows).await.unwrap();
        assert_eq!(stored.len(), 4);

        let listed = f
            .repo
            .list_assignments_between(date(2024, 6, 1), date(2024, 6, 17))
            .await
            .unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[2].assigned_date, date(2024, 6, 17));
        assert_eq!(listed[2].series, Some(SeriesPosition { index: 3, total: 4 }));
        assert!(!listed[0].completed);
    }

    #[tokio::test]
    async fn test_duplicate_triple_is_rejected_and_rolled_back() {
        let f = setup_test().await;
        f.repo
            .insert_assignments(&[new_assignment(&f, date(2024, 6, 3))])
            .await
            .unwrap();

        // Second batch contains one fresh date and one duplicate
        let err = f
            .repo
            .insert_assignments(&[
                new_assignment(&f, date(2024, 6, 4)),
                new_assignment(&f, date(2024, 6, 3)),
            ])
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssignmentError>(),
            Some(AssignmentError::AlreadyAssigned { .. })
        ));

        let listed = f
            .repo
            .list_assignments_between(date(2024, 6, 1), date(2024, 6, 30))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_unique_index_rejects_direct_duplicate_insert() {
        let f = setup_test().await;
        let insert = "INSERT INTO kids_chores (kid_id, chore_id, assigned_date) VALUES (?, ?, ?)";
        sqlx::query(insert)
            .bind(f.kid_id)
            .bind(f.chore_id)
            .bind("2024-06-03")
            .execute(f.repo.db.pool())
            .await
            .unwrap();

        let err = sqlx::query(insert)
            .bind(f.kid_id)
            .bind(f.chore_id)
            .bind("2024-06-03")
            .execute(f.repo.db.pool())
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_insert_with_missing_references() {
        let f = setup_test().await;
        let mut row = new_assignment(&f, date(2024, 6, 3));
        row.kid_id = 999;
        let err = f.repo.insert_assignments(&[row]).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<AssignmentError>(), Some(AssignmentError::KidNotFound(999))));

        let mut row = new_assignment(&f, date(2024, 6, 3));
        row.chore_id = 999;
        let err = f.repo.insert_assignments(&[row]).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<AssignmentError>(), Some(AssignmentError::ChoreNotFound(999))));
    }

    #[tokio::test]
    async fn test_set_completion_sets_and_clears_timestamp() {
        let f = setup_test().await;
        let stored = f
            .repo
            .insert_assignments(&[new_assignment(&f, date(2024, 6, 3))])
            .await
            .unwrap();
        let id = stored[0].id;

        let done = f.repo.set_completion(id, true, Some(Utc::now())).await.unwrap().unwrap();
        assert!(done.completed);
        assert!(done.last_completed.is_some());

        let undone = f.repo.set_completion(id, false, None).await.unwrap().unwrap();
        assert!(!undone.completed);
        assert!(undone.last_completed.is_none());

        assert!(f.repo.set_completion(999, true, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_kid_chores_joins_description() {
        let f = setup_test().await;
        f.repo
            .insert_assignments(&[
                new_assignment(&f, date(2024, 6, 3)),
                new_assignment(&f, date(2024, 6, 10)),
            ])
            .await
            .unwrap();

        let chores = f.repo.list_kid_chores(f.kid_id).await.unwrap();
        assert_eq!(chores.len(), 2);
        assert_eq!(chores[0].assigned_date, date(2024, 6, 10));
        assert!(chores.iter().all(|c| c.description == "Take out trash"));

        assert!(f.repo.list_kid_chores(f.other_kid_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_refs_and_delete() {
        let f = setup_test().await;
        let stored = f
            .repo
            .insert_assignments(&[
                new_assignment(&f, date(2024, 6, 3)),
                NewAssignment {
                    kid_id: f.other_kid_id,
                    ..new_assignment(&f, date(2024, 6, 3))
                },
            ])
            .await
            .unwrap();

        // Moving the first onto the second's kid collides on the same date
        let err = f
            .repo
            .update_assignment_refs(stored[0].id, f.other_kid_id, f.chore_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssignmentError>(),
            Some(AssignmentError::AlreadyAssigned { .. })
        ));

        assert!(f.repo.delete_assignment(stored[1].id).await.unwrap());
        let moved = f
            .repo
            .update_assignment_refs(stored[0].id, f.other_kid_id, f.chore_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.kid_id, f.other_kid_id);
        assert!(f.repo.update_assignment_refs(999, f.kid_id, f.chore_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_chore_cascades_to_assignments() {
        let f = setup_test().await;
        let inserted = f
            .repo
            .insert_assignments(&[new_assignment(&f, date(2024, 6, 3))])
            .await
            .unwrap();

        assert!(f.chores.delete_chore(f.chore_id).await.unwrap());

        let found = f.repo.get_assignment(inserted[0].id).await.unwrap();
        assert!(found.is_none());
    }
}
