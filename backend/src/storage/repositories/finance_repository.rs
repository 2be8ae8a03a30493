use anyhow::Result;
use chrono::NaiveDateTime;
use shared::{Expense, FinanceKind, Income, Saving};
use sqlx::{sqlite::SqliteRow, Row};
use crate::storage::connection::DbConnection;

/// Repository for the three budget ledgers: incomes, expenses and savings
#[derive(Clone)]
pub struct FinanceRepository {
    db: DbConnection,
}

impl FinanceRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_income(&self, income: &Income) -> Result<()> {
        sqlx::query("INSERT INTO incomes (id, user_id, amount, source, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&income.id)
            .bind(&income.user_id)
            .bind(income.amount)
            .bind(&income.source)
            .bind(income.date)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    pub async fn store_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            "INSERT INTO expenses (id, user_id, amount, category, description, date) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&expense.id)
        .bind(&expense.user_id)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.date)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn store_saving(&self, saving: &Saving) -> Result<()> {
        sqlx::query("INSERT INTO savings (id, user_id, amount, purpose, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&saving.id)
            .bind(&saving.user_id)
            .bind(saving.amount)
            .bind(&saving.purpose)
            .bind(saving.date)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Delete one ledger row of the given kind
    pub async fn delete(&self, kind: FinanceKind, user_id: &str, id: &str) -> Result<bool> {
        let statement = format!("DELETE FROM {} WHERE user_id = ? AND id = ?", table_for(kind));
        let result = sqlx::query(&statement)
            .bind(user_id)
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_incomes(&self, user_id: &str) -> Result<Vec<Income>> {
        let rows = sqlx::query(
            "SELECT id, user_id, amount, source, date FROM incomes WHERE user_id = ? ORDER BY date DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows.iter().map(income_from_row).collect())
    }

    pub async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            "SELECT id, user_id, amount, category, description, date FROM expenses WHERE user_id = ? ORDER BY date DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows.iter().map(expense_from_row).collect())
    }

    pub async fn list_savings(&self, user_id: &str) -> Result<Vec<Saving>> {
        let rows = sqlx::query(
            "SELECT id, user_id, amount, purpose, date FROM savings WHERE user_id = ? ORDER BY date DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows.iter().map(saving_from_row).collect())
    }

    /// Incomes dated in `[start, end)`, oldest first
    pub async fn incomes_between(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Income>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, amount, source, date FROM incomes
            WHERE user_id = ? AND date >= ? AND date < ?
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows.iter().map(income_from_row).collect())
    }

    /// Expenses dated in `[start, end)`, oldest first
    pub async fn expenses_between(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, amount, category, description, date FROM expenses
            WHERE user_id = ? AND date >= ? AND date < ?
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows.iter().map(expense_from_row).collect())
    }

    /// Savings dated in `[start, end)`, oldest first
    pub async fn savings_between(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Saving>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, amount, purpose, date FROM savings
            WHERE user_id = ? AND date >= ? AND date < ?
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows.iter().map(saving_from_row).collect())
    }
}

fn table_for(kind: FinanceKind) -> &'static str {
    match kind {
        FinanceKind::Income => "incomes",
        FinanceKind::Expense => "expenses",
        FinanceKind::Saving => "savings",
    }
}

fn income_from_row(row: &SqliteRow) -> Income {
    Income {
        id: row.get("id"),
        user_id: row.get("user_id"),
        amount: row.get("amount"),
        source: row.get("source"),
        date: row.get("date"),
    }
}

fn expense_from_row(row: &SqliteRow) -> Expense {
    Expense {
        id: row.get("id"),
        user_id: row.get("user_id"),
        amount: row.get("amount"),
        category: row.get("category"),
        description: row.get("description"),
        date: row.get("date"),
    }
}

fn saving_from_row(row: &SqliteRow) -> Saving {
    Saving {
        id: row.get("id"),
        user_id: row.get("user_id"),
        amount: row.get("amount"),
        purpose: row.get("purpose"),
        date: row.get("date"),
    }
}
