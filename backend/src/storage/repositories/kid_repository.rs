use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::models::kid::{Kid, NewKid};
use crate::storage::connection::DbConnection;
use crate::storage::traits::KidStorage;

const KID_COLUMNS: &str = "id, first_name, last_name, points, avatar_url, color, phone";

#[derive(Clone)]
pub struct KidRepository {
    db: DbConnection,
}

impl KidRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_kid(row: &SqliteRow) -> Result<Kid> {
        Ok(Kid {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            points: row.try_get("points")?,
            avatar_url: row.try_get("avatar_url")?,
            color: row.try_get("color")?,
            phone: row.try_get("phone")?,
        })
    }
}

#[async_trait]
impl KidStorage for KidRepository {
    async fn insert_kid(&self, kid: &NewKid) -> Result<Kid> {
        let result = sqlx::query(
            "INSERT INTO kids (first_name, last_name, points, avatar_url, color, phone) VALUES (?, ?, 0, ?, ?, ?)",
        )
        .bind(&kid.first_name)
        .bind(&kid.last_name)
        .bind(&kid.avatar_url)
        .bind(&kid.color)
        .bind(&kid.phone)
        .execute(self.db.pool())
        .await?;

        Ok(Kid {
            id: result.last_insert_rowid(),
            first_name: kid.first_name.clone(),
            last_name: kid.last_name.clone(),
            points: 0,
            avatar_url: kid.avatar_url.clone(),
            color: kid.color.clone(),
            phone: kid.phone.clone(),
        })
    }

    async fn get_kid(&self, kid_id: i64) -> Result<Option<Kid>> {
        let row = sqlx::query(&format!("SELECT {} FROM kids WHERE id = ?", KID_COLUMNS))
            .bind(kid_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_kid).transpose()
    }

    async fn list_kids(&self) -> Result<Vec<Kid>> {
        let rows = sqlx::query(&format!("SELECT {} FROM kids ORDER BY id", KID_COLUMNS))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::row_to_kid).collect()
    }

    async fn count_kids(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM kids")
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn update_avatar(&self, kid_id: i64, avatar_url: Option<&str>) -> Result<bool> {
        let result = sqlx::query("UPDATE kids SET avatar_url = ? WHERE id = ?")
            .bind(avatar_url)
            .bind(kid_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_points(&self, kid_id: i64, points: i64) -> Result<Option<Kid>> {
        let result = sqlx::query("UPDATE kids SET points = points + ? WHERE id = ?")
            .bind(points)
            .bind(kid_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_kid(kid_id).await
    }
}
