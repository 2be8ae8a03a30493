//! View composer.
//!
//! Shapes folded figures and raw records into what the UI renders: per-day
//! calendar item lists and point-aligned chart series.

use chrono::{NaiveDate, NaiveDateTime};
use shared::{
    BudgetPoint, CalendarItem, CategoryTotal, ChartSeries, Expense, Habit, HabitPoint, ItemKind,
    TaskPoint, TrackedHabit,
};
use std::collections::{BTreeMap, HashSet};

use super::bucketing::BucketFigures;
use super::models::{ActivitySnapshot, TimeWindow};

pub const TASK_COLOR: &str = "#ec4899";
pub const INCOME_COLOR: &str = "#22c55e";
pub const EXPENSE_COLOR: &str = "#f43f5e";
pub const SAVING_COLOR: &str = "#0ea5e9";

/// Number of habits that get their own chart line
const TRACKED_HABIT_LIMIT: usize = 3;

/// How bucket starts are labelled on the x-axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// `Mon`
    Weekday,
    /// `14:00`
    Hour,
    /// `Jan 15`
    MonthDay,
}

impl LabelStyle {
    pub fn label(&self, start: NaiveDateTime) -> String {
        match self {
            LabelStyle::Weekday => start.format("%a").to_string(),
            LabelStyle::Hour => start.format("%H:%M").to_string(),
            LabelStyle::MonthDay => start.format("%b %-d").to_string(),
        }
    }
}

/// Calendar items grouped by day, kind-major within each day
#[derive(Debug, Clone, Default)]
pub struct CalendarIndex {
    by_day: BTreeMap<NaiveDate, Vec<CalendarItem>>,
}

impl CalendarIndex {
    /// Index every record of the snapshot by its calendar day.
    ///
    /// Kinds are pushed in display order, so each day's list comes out as
    /// habits, tasks, events, incomes, expenses, savings.
    pub fn build(snapshot: &ActivitySnapshot) -> Self {
        let mut index = Self::default();

        for log in snapshot.habit_logs.iter().filter(|l| l.completed) {
            index.push(log.date.date(), CalendarItem {
                id: log.id.clone(),
                title: log.habit_name.clone(),
                kind: ItemKind::Habit,
                color: log.habit_color.clone(),
                source_id: log.habit_id.clone(),
            });
        }

        for task in &snapshot.tasks_due {
            if let Some(due) = task.due_date {
                index.push(due.date(), CalendarItem {
                    id: task.id.clone(),
                    title: task.title.clone(),
                    kind: ItemKind::Task,
                    color: TASK_COLOR.to_string(),
                    source_id: task.id.clone(),
                });
            }
        }

        for event in &snapshot.events {
            index.push(event.date.date(), CalendarItem {
                id: event.id.clone(),
                title: event.title.clone(),
                kind: ItemKind::Event,
                color: event.color.clone(),
                source_id: event.id.clone(),
            });
        }

        for income in &snapshot.incomes {
            index.push(income.date.date(), CalendarItem {
                id: income.id.clone(),
                title: income.source.clone(),
                kind: ItemKind::Income,
                color: INCOME_COLOR.to_string(),
                source_id: income.id.clone(),
            });
        }

        for expense in &snapshot.expenses {
            index.push(expense.date.date(), CalendarItem {
                id: expense.id.clone(),
                title: expense_title(expense),
                kind: ItemKind::Expense,
                color: EXPENSE_COLOR.to_string(),
                source_id: expense.id.clone(),
            });
        }

        for saving in &snapshot.savings {
            index.push(saving.date.date(), CalendarItem {
                id: saving.id.clone(),
                title: saving.purpose.clone(),
                kind: ItemKind::Saving,
                color: SAVING_COLOR.to_string(),
                source_id: saving.id.clone(),
            });
        }

        index
    }

    fn push(&mut self, day: NaiveDate, item: CalendarItem) {
        self.by_day.entry(day).or_default().push(item);
    }

    /// Items for one day; empty when nothing happened
    pub fn for_day(&self, day: NaiveDate) -> Vec<CalendarItem> {
        self.by_day.get(&day).cloned().unwrap_or_default()
    }
}

/// Description when present, otherwise the category
pub fn expense_title(expense: &Expense) -> String {
    match expense.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => description.to_string(),
        _ => expense.category.clone(),
    }
}

/// Split folded figures into the three chart families, one point per bucket
pub fn chart_series(figures: &[BucketFigures], style: LabelStyle) -> ChartSeries {
    let mut series = ChartSeries {
        habits: Vec::with_capacity(figures.len()),
        tasks: Vec::with_capacity(figures.len()),
        budget: Vec::with_capacity(figures.len()),
    };

    for bucket in figures {
        let label = style.label(bucket.start);

        series.habits.push(HabitPoint {
            start: bucket.start,
            label: label.clone(),
            completed: bucket.habits_completed,
            total: bucket.habit_total,
            percentage: bucket.habit_percentage,
            tracked: bucket.tracked.clone(),
        });

        series.tasks.push(TaskPoint {
            start: bucket.start,
            label: label.clone(),
            done: bucket.tasks_done,
            high: bucket.tasks_high,
            medium: bucket.tasks_medium,
            low: bucket.tasks_low,
            rate: (bucket.tasks_done.saturating_mul(20)).min(100),
        });

        series.budget.push(BudgetPoint {
            start: bucket.start,
            label,
            income: bucket.income,
            expense: bucket.expense,
            savings: bucket.savings,
            net: bucket.net(),
            cumulative_income: bucket.cumulative_income,
            cumulative_expense: bucket.cumulative_expense,
            cumulative_savings: bucket.cumulative_savings,
            cumulative_balance: bucket.cumulative_balance,
        });
    }

    series
}

/// Expense totals per category inside the window, largest first
pub fn expense_breakdown(expenses: &[Expense], window: &TimeWindow) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses.iter().filter(|e| window.contains(e.date)) {
        *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    breakdown
}

/// The first habits of the roster, each with a unique series key
pub fn tracked_habits(habits: &[Habit]) -> Vec<TrackedHabit> {
    let mut used: HashSet<String> = HashSet::new();
    habits
        .iter()
        .take(TRACKED_HABIT_LIMIT)
        .map(|habit| {
            let mut key = habit_key(&habit.name);
            if key.is_empty() || used.contains(&key) {
                key = format!("{}{}", key, habit_key(&habit.id));
            }
            let base = key.clone();
            let mut suffix = 2;
            while used.contains(&key) {
                key = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            used.insert(key.clone());
            TrackedHabit {
                id: habit.id.clone(),
                name: habit.name.clone(),
                key,
            }
        })
        .collect()
}

/// Lowercase ASCII letters and digits of a name: `Morning Run!` -> `morningrun`
pub fn habit_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
