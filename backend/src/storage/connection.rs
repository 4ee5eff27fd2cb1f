use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::storage::repositories::{AssignmentRepository, ChoreRepository, KidRepository};
use crate::storage::traits::Connection;

/// DbConnection owns the SQLite pool shared by all repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kids (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                points INTEGER NOT NULL DEFAULT 0,
                avatar_url TEXT,
                color TEXT NOT NULL,
                phone TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                frequency TEXT NOT NULL DEFAULT 'one-time',
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kids_chores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kid_id INTEGER NOT NULL REFERENCES kids(id) ON DELETE CASCADE,
                chore_id INTEGER NOT NULL REFERENCES chores(id) ON DELETE CASCADE,
                assigned_date TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                last_completed TEXT,
                series_index INTEGER,
                series_total INTEGER
            );
            "#,
        )
        .execute(pool)
        .await?;

        // One assignment per (kid, chore, date)
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_kids_chores_unique
                ON kids_chores (kid_id, chore_id, assigned_date);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_kids_chores_date ON kids_chores (assigned_date);",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Connection for DbConnection {
    type KidRepository = KidRepository;
    type ChoreRepository = ChoreRepository;
    type AssignmentRepository = AssignmentRepository;

    fn create_kid_repository(&self) -> Self::KidRepository {
        KidRepository::new(self.clone())
    }

    fn create_chore_repository(&self) -> Self::ChoreRepository {
        ChoreRepository::new(self.clone())
    }

    fn create_assignment_repository(&self) -> Self::AssignmentRepository {
        AssignmentRepository::new(self.clone())
    }
}
