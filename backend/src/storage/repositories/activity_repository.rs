use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{Event, Expense, Habit, HabitLog, Income, Saving, Task};
use crate::storage::connection::DbConnection;
use crate::storage::traits::ActivityStorage;
use super::{EventRepository, FinanceRepository, HabitRepository, TaskRepository};

/// SQLite-backed `ActivityStorage`, composed from the per-entity repositories
#[derive(Clone)]
pub struct ActivityRepository {
    habits: HabitRepository,
    tasks: TaskRepository,
    events: EventRepository,
    finance: FinanceRepository,
}

impl ActivityRepository {
    pub fn new(db: DbConnection) -> Self {
        Self {
            habits: HabitRepository::new(db.clone()),
            tasks: TaskRepository::new(db.clone()),
            events: EventRepository::new(db.clone()),
            finance: FinanceRepository::new(db),
        }
    }
}

#[async_trait]
impl ActivityStorage for ActivityRepository {
    async fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>> {
        self.habits.list_habits(user_id).await
    }

    async fn habit_logs_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<HabitLog>> {
        self.habits.list_logs_between(user_id, start, end).await
    }

    async fn tasks_due_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Task>> {
        self.tasks.list_due_between(user_id, start, end).await
    }

    async fn tasks_completed_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Task>> {
        self.tasks.list_completed_between(user_id, start, end).await
    }

    async fn events_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Event>> {
        self.events.list_between(user_id, start, end).await
    }

    async fn incomes_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Income>> {
        self.finance.incomes_between(user_id, start, end).await
    }

    async fn expenses_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Expense>> {
        self.finance.expenses_between(user_id, start, end).await
    }

    async fn savings_between(&self, user_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Saving>> {
        self.finance.savings_between(user_id, start, end).await
    }

    async fn count_open_tasks(&self, user_id: &str) -> Result<u64> {
        self.tasks.count_open(user_id).await
    }
}
