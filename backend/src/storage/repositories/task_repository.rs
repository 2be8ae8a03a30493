use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use shared::{Task, TaskStatus};
use sqlx::{sqlite::SqliteRow, Row};
use crate::storage::connection::DbConnection;

const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, tags, created_at, updated_at";

/// Repository for todo tasks
#[derive(Clone)]
pub struct TaskRepository {
    db: DbConnection,
}

impl TaskRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a new task
    pub async fn store_task(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, user_id, title, description, status, priority, due_date, tags, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(serde_json::to_string(&task.tags)?)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Overwrite every mutable column of an existing task
    pub async fn update_task(&self, task: &Task) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, status = ?, priority = ?, due_date = ?, tags = ?, updated_at = ?
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(serde_json::to_string(&task.tags)?)
        .bind(task.updated_at)
        .bind(&task.user_id)
        .bind(&task.id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_task(&self, user_id: &str, task_id: &str) -> Result<Option<Task>> {
        let query = format!("SELECT {} FROM tasks WHERE user_id = ? AND id = ?", TASK_COLUMNS);
        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(task_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(task_from_row).transpose()
    }

    pub async fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(task_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All of the user's tasks, newest first
    pub async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let query = format!(
            "SELECT {} FROM tasks WHERE user_id = ? ORDER BY created_at DESC, ROWID DESC",
            TASK_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(task_from_row).collect()
    }

    /// Tasks with a due date in `[start, end)`
    pub async fn list_due_between(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Task>> {
        let query = format!(
            r#"
            SELECT {} FROM tasks
            WHERE user_id = ? AND due_date IS NOT NULL AND due_date >= ? AND due_date < ?
            ORDER BY due_date ASC, id ASC
            "#,
            TASK_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(task_from_row).collect()
    }

    /// DONE tasks last modified in `[start, end)`
    pub async fn list_completed_between(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Task>> {
        let query = format!(
            r#"
            SELECT {} FROM tasks
            WHERE user_id = ? AND status = ? AND updated_at >= ? AND updated_at < ?
            ORDER BY updated_at ASC, id ASC
            "#,
            TASK_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(TaskStatus::Done.as_str())
            .bind(start)
            .bind(end)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(task_from_row).collect()
    }

    /// Number of the user's tasks not yet DONE
    pub async fn count_open(&self, user_id: &str) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM tasks WHERE user_id = ? AND status != ?")
            .bind(user_id)
            .bind(TaskStatus::Done.as_str())
            .fetch_one(self.db.pool())
            .await?;
        let count: i64 = row.get("n");
        Ok(count.max(0) as u64)
    }
}

fn task_from_row(row: &SqliteRow) -> Result<Task> {
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    let tags: String = row.get("tags");

    Ok(Task {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        status: status.parse().map_err(|e: String| anyhow!(e))?,
        priority: priority.parse().map_err(|e: String| anyhow!(e))?,
        due_date: row.get("due_date"),
        tags: serde_json::from_str(&tags)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::TaskPriority;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn task(id: &str, status: TaskStatus, due: Option<NaiveDateTime>, updated: NaiveDateTime) -> Task {
        Task {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: format!("Task {}", id),
            description: None,
            status,
            priority: TaskPriority::High,
            due_date: due,
            tags: vec!["work".to_string(), "q1".to_string()],
            created_at: at(1, 9),
            updated_at: updated,
        }
    }

    async fn setup() -> TaskRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        TaskRepository::new(db)
    }

    #[tokio::test]
    async fn test_store_and_get_preserves_tags_and_enums() {
        let repo = setup().await;
        let original = task("t1", TaskStatus::InProgress, Some(at(10, 0)), at(2, 9));
        repo.store_task(&original).await.unwrap();

        let loaded = repo.get_task("u1", "t1").await.unwrap().unwrap();
        assert_eq!(loaded, original);
        assert!(repo.get_task("someone-else", "t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_due_and_completed_ranges() {
        let repo = setup().await;
        repo.store_task(&task("due-in", TaskStatus::Pending, Some(at(5, 12)), at(1, 9))).await.unwrap();
        repo.store_task(&task("due-out", TaskStatus::Pending, Some(at(9, 0)), at(1, 9))).await.unwrap();
        repo.store_task(&task("no-due", TaskStatus::Done, None, at(6, 18))).await.unwrap();
        repo.store_task(&task("done-old", TaskStatus::Done, None, at(2, 10))).await.unwrap();

        let due = repo.list_due_between("u1", at(5, 0), at(9, 0)).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "due-in");

        let done = repo.list_completed_between("u1", at(5, 0), at(9, 0)).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, "no-due");

        assert_eq!(repo.count_open("u1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup().await;
        let mut t = task("t1", TaskStatus::Pending, None, at(1, 9));
        repo.store_task(&t).await.unwrap();

        t.status = TaskStatus::Done;
        t.updated_at = at(3, 14);
        assert!(repo.update_task(&t).await.unwrap());
        assert_eq!(repo.get_task("u1", "t1").await.unwrap().unwrap().status, TaskStatus::Done);

        assert!(repo.delete_task("u1", "t1").await.unwrap());
        assert!(!repo.delete_task("u1", "t1").await.unwrap());
        assert!(repo.list_tasks("u1").await.unwrap().is_empty());
    }
}
