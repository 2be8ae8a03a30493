//! # Storage Traits
//!
//! The aggregation layer reads through this trait so it can run against
//! SQLite in production and against in-memory fixtures in tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{Event, Expense, Habit, HabitLog, Income, Saving, Task};

/// Read-only, owner-scoped range reads over the six activity streams.
///
/// Every `*_between` read is half-open: `start <= date < end`, compared on the
/// stored wall-clock value. Results are ordered by date, then id.
#[async_trait]
pub trait ActivityStorage: Send + Sync {
    /// The owner's habit roster, oldest first
    async fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>>;

    /// Completion logs of the owner's habits
    async fn habit_logs_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<HabitLog>>;

    /// Tasks whose due date falls in the range
    async fn tasks_due_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Task>>;

    /// DONE tasks whose last modification falls in the range
    async fn tasks_completed_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Task>>;

    async fn events_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Event>>;

    async fn incomes_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Income>>;

    async fn expenses_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Expense>>;

    async fn savings_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Saving>>;

    /// Number of the owner's tasks not in DONE
    async fn count_open_tasks(&self, user_id: &str) -> Result<u64>;
}
