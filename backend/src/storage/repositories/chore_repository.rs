use anyhow::Result;
use async_trait::async_trait;
use shared::ChoreFrequency;
use sqlx::{sqlite::SqliteRow, Row};

use super::parse_timestamp;
use crate::domain::models::chore::{Chore, NewChore};
use crate::storage::connection::DbConnection;
use crate::storage::traits::ChoreStorage;

#[derive(Clone)]
pub struct ChoreRepository {
    db: DbConnection,
}

impl ChoreRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_chore(row: &SqliteRow) -> Result<Chore> {
        let frequency: String = row.try_get("frequency")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Chore {
            id: row.try_get("id")?,
            description: row.try_get("description")?,
            frequency: frequency.parse::<ChoreFrequency>()?,
            created_at: parse_timestamp(&created_at)?,
        })
    }
}

#[async_trait]
impl ChoreStorage for ChoreRepository {
    async fn insert_chore(&self, chore: &NewChore) -> Result<Chore> {
        let result = sqlx::query("INSERT INTO chores (description, frequency, created_at) VALUES (?, ?, ?)")
            .bind(&chore.description)
            .bind(chore.frequency.as_str())
            .bind(chore.created_at.to_rfc3339())
            .execute(self.db.pool())
            .await?;

        Ok(Chore {
            id: result.last_insert_rowid(),
            description: chore.description.clone(),
            frequency: chore.frequency,
            created_at: chore.created_at,
        })
    }

    async fn get_chore(&self, chore_id: i64) -> Result<Option<Chore>> {
        let row = sqlx::query("SELECT id, description, frequency, created_at FROM chores WHERE id = ?")
            .bind(chore_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_chore).transpose()
    }

    async fn list_chores(&self, limit: Option<u32>) -> Result<Vec<Chore>> {
        // SQLite treats a negative LIMIT as no limit
        let limit = limit.map(i64::from).unwrap_or(-1);

        let rows = sqlx::query(
            "SELECT id, description, frequency, created_at FROM chores ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_chore).collect()
    }

    async fn update_chore(&self, chore: &Chore) -> Result<bool> {
        let result = sqlx::query("UPDATE chores SET description = ?, frequency = ? WHERE id = ?")
            .bind(&chore.description)
            .bind(chore.frequency.as_str())
            .bind(chore.id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_chore(&self, chore_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM chores WHERE id = ?")
            .bind(chore_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
