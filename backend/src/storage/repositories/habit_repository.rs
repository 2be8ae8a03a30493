use anyhow::Result;
use chrono::NaiveDateTime;
use shared::{Habit, HabitLog};
use sqlx::{sqlite::SqliteRow, Row};
use crate::storage::connection::DbConnection;

/// Repository for habits and their completion logs
#[derive(Clone)]
pub struct HabitRepository {
    db: DbConnection,
}

impl HabitRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a new habit
    pub async fn store_habit(&self, habit: &Habit) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO habits (id, user_id, name, description, frequency, color, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&habit.id)
        .bind(&habit.user_id)
        .bind(&habit.name)
        .bind(&habit.description)
        .bind(&habit.frequency)
        .bind(&habit.color)
        .bind(habit.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Get a habit owned by the given user
    pub async fn get_habit(&self, user_id: &str, habit_id: &str) -> Result<Option<Habit>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, description, frequency, color, created_at
            FROM habits
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(habit_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(habit_from_row))
    }

    /// List the user's habits, oldest first
    pub async fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, description, frequency, color, created_at
            FROM habits
            WHERE user_id = ?
            ORDER BY created_at ASC, ROWID ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(habit_from_row).collect())
    }

    /// Delete a habit; its logs go with it through the cascade
    pub async fn delete_habit(&self, user_id: &str, habit_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM habits WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(habit_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Completion logs of the user's habits dated in `[start, end)`
    pub async fn list_logs_between(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<HabitLog>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.habit_id, h.name AS habit_name, h.color AS habit_color, l.date, l.completed
            FROM habit_logs l
            JOIN habits h ON h.id = l.habit_id
            WHERE h.user_id = ? AND l.completed = TRUE AND l.date >= ? AND l.date < ?
            ORDER BY l.date ASC, l.id ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(log_from_row).collect())
    }

    /// Flip the habit's log for the calendar day of `date`.
    ///
    /// Returns whether the day is completed afterwards.
    pub async fn toggle_log(&self, habit_id: &str, log_id: &str, date: NaiveDateTime) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        let removed = sqlx::query("DELETE FROM habit_logs WHERE habit_id = ? AND day = ?")
            .bind(habit_id)
            .bind(date.date())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            insert_log(&mut tx, habit_id, log_id, date).await?;
        }

        tx.commit().await?;
        Ok(removed == 0)
    }

    /// Set the habit's log for the calendar day of `date` to the requested state
    pub async fn set_log(
        &self,
        habit_id: &str,
        log_id: &str,
        date: NaiveDateTime,
        completed: bool,
    ) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        if completed {
            insert_log(&mut tx, habit_id, log_id, date).await?;
        } else {
            sqlx::query("DELETE FROM habit_logs WHERE habit_id = ? AND day = ?")
                .bind(habit_id)
                .bind(date.date())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(completed)
    }

    /// Count logs stored for a habit (all days)
    pub async fn count_logs(&self, habit_id: &str) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM habit_logs WHERE habit_id = ?")
            .bind(habit_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.get("n"))
    }
}

async fn insert_log(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    habit_id: &str,
    log_id: &str,
    date: NaiveDateTime,
) -> Result<()> {
    // The (habit_id, day) constraint turns a racing second insert into a no-op
    sqlx::query(
        r#"
        INSERT INTO habit_logs (id, habit_id, day, date, completed)
        VALUES (?, ?, ?, ?, TRUE)
        ON CONFLICT (habit_id, day) DO NOTHING
        "#,
    )
    .bind(log_id)
    .bind(habit_id)
    .bind(date.date())
    .bind(date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn habit_from_row(row: &SqliteRow) -> Habit {
    Habit {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        frequency: row.get("frequency"),
        color: row.get("color"),
        created_at: row.get("created_at"),
    }
}

fn log_from_row(row: &SqliteRow) -> HabitLog {
    HabitLog {
        id: row.get("id"),
        habit_id: row.get("habit_id"),
        habit_name: row.get("habit_name"),
        habit_color: row.get("habit_color"),
        date: row.get("date"),
        completed: row.get("completed"),
    }
}
