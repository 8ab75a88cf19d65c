use anyhow::{Context as _, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};

/// A task record as stored and as served. `due_date` holds a `YYYY-MM-DD`
/// string; `created_at` / `updated_at` are RFC 3339 UTC timestamps.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("taskd.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::migrate!("src/storage/migrations")
            .run(pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    // ─── Tasks ──────────────────────────────────────────────────────────────

    pub async fn create_task(
        &self,
        title: &str,
        description: &str,
        due_date: &str,
        status: &str,
    ) -> Result<TaskRow> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, due_date, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(title)
        .bind(description)
        .bind(due_date)
        .bind(status)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_task(result.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow::anyhow!("task not found after insert"))
    }

    pub async fn get_task(&self, id: i64) -> Result<Option<TaskRow>> {
        Ok(sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// All tasks, newest first. Ties on `created_at` break by id so the
    /// ordering stays stable.
    pub async fn list_tasks(&self) -> Result<Vec<TaskRow>> {
        Ok(
            sqlx::query_as("SELECT * FROM tasks ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Full-row overwrite of every mutable field. `created_at` is never
    /// touched; `updated_at` is refreshed.
    pub async fn update_task(&self, task: &TaskRow) -> Result<TaskRow> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, due_date = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.due_date)
        .bind(&task.status)
        .bind(&now)
        .bind(task.id)
        .execute(&self.pool)
        .await?;

        self.get_task(task.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("task not found after update"))
    }

    /// Unconditional delete. A missing id is not an error.
    pub async fn delete_task(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_storage() -> (Storage, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path()).await.unwrap();
        (storage, dir)
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (storage, _dir) = test_storage().await;
        let created = storage
            .create_task("Buy milk", "2% fat", "2025-01-15", "pending")
            .await
            .unwrap();
        assert!(created.id > 0);
        assert_eq!(created.title, "Buy milk");
        assert_eq!(created.description, "2% fat");
        assert_eq!(created.due_date, "2025-01-15");
        assert_eq!(created.status, "pending");
        assert_eq!(created.created_at, created.updated_at);

        let fetched = storage.get_task(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (storage, _dir) = test_storage().await;
        assert!(storage.get_task(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let (storage, _dir) = test_storage().await;
        for title in ["task A", "task B", "task C"] {
            storage
                .create_task(title, "", "2025-06-01", "pending")
                .await
                .unwrap();
        }
        let tasks = storage.list_tasks().await.unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["task C", "task B", "task A"]);
    }

    #[tokio::test]
    async fn list_empty_store_is_not_an_error() {
        let (storage, _dir) = test_storage().await;
        assert!(storage.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_created_at() {
        let (storage, _dir) = test_storage().await;
        let mut task = storage
            .create_task("Buy milk", "", "2025-01-15", "pending")
            .await
            .unwrap();
        task.status = "completed".to_string();
        task.description = "done at the corner shop".to_string();

        let updated = storage.update_task(&task).await.unwrap();
        assert_eq!(updated.status, "completed");
        assert_eq!(updated.description, "done at the corner shop");
        assert_eq!(updated.title, "Buy milk");
        assert_eq!(updated.created_at, task.created_at);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (storage, _dir) = test_storage().await;
        let task = storage
            .create_task("Buy milk", "", "2025-01-15", "pending")
            .await
            .unwrap();

        storage.delete_task(task.id).await.unwrap();
        assert!(storage.get_task(task.id).await.unwrap().is_none());
        // Second delete of the same id still succeeds.
        storage.delete_task(task.id).await.unwrap();
        // So does deleting an id that never existed.
        storage.delete_task(12345).await.unwrap();
    }
}
