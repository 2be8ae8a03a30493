use anyhow::Result;
use chrono::NaiveDateTime;
use shared::Event;
use sqlx::{sqlite::SqliteRow, Row};
use crate::storage::connection::DbConnection;

/// Repository for user-authored calendar events
#[derive(Clone)]
pub struct EventRepository {
    db: DbConnection,
}

impl EventRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_event(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, user_id, title, description, date, color)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(&event.user_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.color)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn delete_event(&self, user_id: &str, event_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(event_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Events dated in `[start, end)`
    pub async fn list_between(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Event>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, description, date, color
            FROM events
            WHERE user_id = ? AND date >= ? AND date < ?
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(event_from_row).collect())
    }
}

fn event_from_row(row: &SqliteRow) -> Event {
    Event {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        date: row.get("date"),
        color: row.get("color"),
    }
}
