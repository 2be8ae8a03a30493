//! Derived scalar statistics for the dashboard header.
//!
//! Recomputed from the request's snapshot every time; nothing is cached.

use chrono::{Duration, NaiveDate, NaiveTime};
use shared::DashboardStats;
use std::collections::HashSet;

use super::floating_time::month_start;
use super::models::ActivitySnapshot;

/// `completed / total` as a whole percent, rounded half-up. Zero when `total` is zero.
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    u32::try_from((completed * 200 + total) / (total * 2)).unwrap_or(100)
}

/// Percent of the roster with a completion log on `today`
pub fn habit_completion_today(snapshot: &ActivitySnapshot, today: NaiveDate) -> u32 {
    let roster: HashSet<&str> = snapshot.habits.iter().map(|h| h.id.as_str()).collect();
    let done_today: HashSet<&str> = snapshot
        .habit_logs
        .iter()
        .filter(|log| log.completed && log.date.date() == today)
        .map(|log| log.habit_id.as_str())
        .filter(|id| roster.contains(id))
        .collect();

    completion_percentage(done_today.len(), roster.len())
}

/// Income minus expense from the first of `today`'s month through the end of `today`
pub fn monthly_net_savings(snapshot: &ActivitySnapshot, today: NaiveDate) -> f64 {
    let from = month_start(today);
    let until = today.and_time(NaiveTime::MIN) + Duration::days(1);

    let income: f64 = snapshot
        .incomes
        .iter()
        .filter(|i| i.date >= from && i.date < until)
        .map(|i| i.amount)
        .sum();
    let expense: f64 = snapshot
        .expenses
        .iter()
        .filter(|e| e.date >= from && e.date < until)
        .map(|e| e.amount)
        .sum();

    income - expense
}

pub fn dashboard_stats(snapshot: &ActivitySnapshot, today: NaiveDate) -> DashboardStats {
    DashboardStats {
        habit_completion: habit_completion_today(snapshot, today),
        pending_tasks: snapshot.open_tasks,
        monthly_savings: monthly_net_savings(snapshot, today),
    }
}
