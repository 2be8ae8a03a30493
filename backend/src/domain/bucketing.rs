//! Bucketing engine.
//!
//! Turns a `TimeWindow` into a contiguous run of buckets and folds every
//! fetched record into exactly one of them. Bucket membership is decided by
//! truncating the record's stored wall-clock value, never by converting it
//! through a timezone.

use chrono::NaiveDateTime;
use shared::{TaskPriority, TaskStatus, TrackedHabit};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::models::{ActivitySnapshot, Granularity, TimeWindow};
use super::statistics::completion_percentage;

/// Ordered, gap-free bucket starts spanning a window
#[derive(Debug, Clone, PartialEq)]
pub struct BucketPlan {
    granularity: Granularity,
    starts: Vec<NaiveDateTime>,
}

impl BucketPlan {
    pub fn for_window(window: &TimeWindow) -> Self {
        let step = window.granularity().step();
        let mut starts = Vec::with_capacity(window.bucket_count());
        let mut cursor = window.start();
        while cursor <= window.last_bucket() {
            starts.push(cursor);
            cursor += step;
        }

        Self {
            granularity: window.granularity(),
            starts,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn starts(&self) -> &[NaiveDateTime] {
        &self.starts
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Index of the bucket holding `at`, or `None` when `at` is outside the plan
    pub fn index_of(&self, at: NaiveDateTime) -> Option<usize> {
        let first = *self.starts.first()?;
        let key = self.granularity.truncate(at);
        if key < first {
            return None;
        }

        let offset = match self.granularity {
            Granularity::Day => (key - first).num_days(),
            Granularity::Hour => (key - first).num_hours(),
        };
        let index = usize::try_from(offset).ok()?;
        (index < self.starts.len()).then_some(index)
    }
}

/// Every numeric figure of one bucket. Fields are always present and start at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketFigures {
    pub start: NaiveDateTime,
    pub habits_completed: u32,
    pub habit_total: u32,
    pub habit_percentage: u32,
    /// 0 or 100 per tracked habit key
    pub tracked: BTreeMap<String, u32>,
    pub tasks_done: u32,
    pub tasks_high: u32,
    pub tasks_medium: u32,
    pub tasks_low: u32,
    pub income: f64,
    pub expense: f64,
    pub savings: f64,
    pub cumulative_income: f64,
    pub cumulative_expense: f64,
    pub cumulative_savings: f64,
    pub cumulative_balance: f64,
}

impl BucketFigures {
    fn zeroed(start: NaiveDateTime, habit_total: u32, tracked: &[TrackedHabit]) -> Self {
        Self {
            start,
            habits_completed: 0,
            habit_total,
            habit_percentage: 0,
            tracked: tracked.iter().map(|h| (h.key.clone(), 0)).collect(),
            tasks_done: 0,
            tasks_high: 0,
            tasks_medium: 0,
            tasks_low: 0,
            income: 0.0,
            expense: 0.0,
            savings: 0.0,
            cumulative_income: 0.0,
            cumulative_expense: 0.0,
            cumulative_savings: 0.0,
            cumulative_balance: 0.0,
        }
    }

    /// Income minus expense for this bucket alone
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Fold a snapshot into per-bucket figures aligned with `plan`.
///
/// Records dated outside the plan are skipped.
pub fn fold(plan: &BucketPlan, snapshot: &ActivitySnapshot, tracked: &[TrackedHabit]) -> Vec<BucketFigures> {
    let habit_total = count(snapshot.habits.len());
    let mut figures: Vec<BucketFigures> = plan
        .starts()
        .iter()
        .map(|start| BucketFigures::zeroed(*start, habit_total, tracked))
        .collect();

    fold_habits(plan, snapshot, tracked, &mut figures);
    fold_tasks(plan, snapshot, &mut figures);
    fold_money(plan, snapshot, &mut figures);
    accumulate(&mut figures);

    debug!(
        "Folded {} buckets from {} habit logs, {} completed tasks, {} incomes, {} expenses, {} savings",
        figures.len(),
        snapshot.habit_logs.len(),
        snapshot.tasks_completed.len(),
        snapshot.incomes.len(),
        snapshot.expenses.len(),
        snapshot.savings.len()
    );

    figures
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Habit presence is boolean per (habit, bucket); a second log never counts twice
fn fold_habits(plan: &BucketPlan, snapshot: &ActivitySnapshot, tracked: &[TrackedHabit], figures: &mut [BucketFigures]) {
    let roster: HashSet<&str> = snapshot.habits.iter().map(|h| h.id.as_str()).collect();
    let mut done: Vec<HashSet<&str>> = vec![HashSet::new(); plan.len()];

    for log in &snapshot.habit_logs {
        if !log.completed || !roster.contains(log.habit_id.as_str()) {
            continue;
        }
        if let Some(index) = plan.index_of(log.date) {
            done[index].insert(log.habit_id.as_str());
        }
    }

    for (bucket, completed) in figures.iter_mut().zip(done.iter()) {
        bucket.habits_completed = count(completed.len());
        bucket.habit_percentage = completion_percentage(completed.len(), snapshot.habits.len());
        for habit in tracked {
            if completed.contains(habit.id.as_str()) {
                bucket.tracked.insert(habit.key.clone(), 100);
            }
        }
    }
}

fn fold_tasks(plan: &BucketPlan, snapshot: &ActivitySnapshot, figures: &mut [BucketFigures]) {
    for task in snapshot.tasks_completed.iter().filter(|t| t.status == TaskStatus::Done) {
        let Some(index) = plan.index_of(task.updated_at) else {
            continue;
        };
        let bucket = &mut figures[index];
        bucket.tasks_done += 1;
        match task.priority {
            TaskPriority::High => bucket.tasks_high += 1,
            TaskPriority::Medium => bucket.tasks_medium += 1,
            TaskPriority::Low => bucket.tasks_low += 1,
        }
    }
}

fn fold_money(plan: &BucketPlan, snapshot: &ActivitySnapshot, figures: &mut [BucketFigures]) {
    for income in &snapshot.incomes {
        if let Some(index) = plan.index_of(income.date) {
            figures[index].income += income.amount;
        }
    }
    for expense in &snapshot.expenses {
        if let Some(index) = plan.index_of(expense.date) {
            figures[index].expense += expense.amount;
        }
    }
    for saving in &snapshot.savings {
        if let Some(index) = plan.index_of(saving.date) {
            figures[index].savings += saving.amount;
        }
    }
}

/// Carry running totals forward in chronological (plan) order
fn accumulate(figures: &mut [BucketFigures]) {
    let mut income = 0.0;
    let mut expense = 0.0;
    let mut savings = 0.0;

    for bucket in figures.iter_mut() {
        income += bucket.income;
        expense += bucket.expense;
        savings += bucket.savings;
        bucket.cumulative_income = income;
        bucket.cumulative_expense = expense;
        bucket.cumulative_savings = savings;
        bucket.cumulative_balance = income - expense;
    }
}
